use super::ApiError;

pub fn validate_title(title: &str) -> Result<&str, ApiError> {
    let len = title.chars().count();
    if !(5..=50).contains(&len) {
        return Err(ApiError::validation(
            "Title must be between 5 and 50 characters",
        ));
    }
    Ok(title)
}

pub fn validate_description(description: &str) -> Result<&str, ApiError> {
    if description.chars().count() > 100 {
        return Err(ApiError::validation(
            "Description must be 100 characters or less",
        ));
    }
    Ok(description)
}

pub fn validate_article_body(body: &str) -> Result<&str, ApiError> {
    if body.chars().count() > 5000 {
        return Err(ApiError::validation("Body must be 5000 characters or less"));
    }
    Ok(body)
}

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Username cannot be empty"));
    }
    if trimmed.chars().count() > 50 {
        return Err(ApiError::validation(
            "Username must be 50 characters or less",
        ));
    }
    Ok(trimmed)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(ApiError::validation("A valid email address is required"));
    }
    Ok(trimmed)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.is_empty() {
        return Err(ApiError::validation("Password cannot be empty"));
    }
    Ok(password)
}

pub fn validate_comment_body(body: &str) -> Result<&str, ApiError> {
    if body.trim().is_empty() {
        return Err(ApiError::validation("Comment body cannot be empty"));
    }
    if body.chars().count() > 5000 {
        return Err(ApiError::validation(
            "Comment body must be 5000 characters or less",
        ));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_bounds() {
        assert!(validate_title("Hello").is_ok());
        assert!(validate_title("Hi").is_err());
        assert!(validate_title(&"a".repeat(50)).is_ok());
        assert!(validate_title(&"a".repeat(51)).is_err());
    }

    #[test]
    fn description_and_body_bounds() {
        assert!(validate_description(&"d".repeat(100)).is_ok());
        assert!(validate_description(&"d".repeat(101)).is_err());
        assert!(validate_article_body(&"b".repeat(5000)).is_ok());
        assert!(validate_article_body(&"b".repeat(5001)).is_err());
    }

    #[test]
    fn user_fields() {
        assert!(validate_username("mario").is_ok());
        assert!(validate_username("  ").is_err());
        assert!(validate_email("mario@super.io").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn comment_body_bounds() {
        assert!(validate_comment_body("nice article").is_ok());
        assert!(validate_comment_body("   ").is_err());
        assert!(validate_comment_body(&"c".repeat(5001)).is_err());
    }
}
