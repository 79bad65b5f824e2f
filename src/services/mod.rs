pub mod social;
pub use social::{DecoratedArticle, SocialGraphResolver};

pub mod article_service;
pub use article_service::{ArticleError, ArticleService};

pub mod article_service_impl;
pub use article_service_impl::SeaOrmArticleService;

pub mod profile_service;
pub use profile_service::{ProfileError, ProfileService};

pub mod profile_service_impl;
pub use profile_service_impl::SeaOrmProfileService;

pub mod comment_service;
pub use comment_service::{CommentError, CommentService};

pub mod comment_service_impl;
pub use comment_service_impl::SeaOrmCommentService;

pub mod user_service;
pub use user_service::{NewUser, UserError, UserService};

pub mod user_service_impl;
pub use user_service_impl::SeaOrmUserService;
