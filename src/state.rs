use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    ArticleService, CommentService, ProfileService, SeaOrmArticleService, SeaOrmCommentService,
    SeaOrmProfileService, SeaOrmUserService, UserService,
};

/// Everything a request handler can reach: the store, the token service
/// and the domain services. Built once at startup; no global registry.
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub jwt: Arc<JwtKeys>,

    pub article_service: Arc<dyn ArticleService>,

    pub profile_service: Arc<dyn ProfileService>,

    pub comment_service: Arc<dyn CommentService>,

    pub user_service: Arc<dyn UserService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let jwt = Arc::new(JwtKeys::new(
            &config.auth.jwt_secret,
            config.auth.token_expiry_hours * 3600,
        ));

        let article_service =
            Arc::new(SeaOrmArticleService::new(store.clone())) as Arc<dyn ArticleService>;
        let profile_service =
            Arc::new(SeaOrmProfileService::new(store.clone())) as Arc<dyn ProfileService>;
        let comment_service =
            Arc::new(SeaOrmCommentService::new(store.clone())) as Arc<dyn CommentService>;
        let user_service = Arc::new(SeaOrmUserService::new(store.clone(), jwt.clone()))
            as Arc<dyn UserService>;

        Ok(Self {
            config,
            store,
            jwt,
            article_service,
            profile_service,
            comment_service,
            user_service,
        })
    }
}
