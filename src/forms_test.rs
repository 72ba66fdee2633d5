use super::*;

#[test]
fn validate_login_trims_email() {
    assert_eq!(
        validate_login("  a@b.com ", "pw"),
        Ok(("a@b.com".to_owned(), "pw".to_owned()))
    );
}

#[test]
fn validate_login_requires_both_fields() {
    assert_eq!(validate_login("   ", "pw"), Err(ValidationError::MissingCredentials));
    assert_eq!(validate_login("a@b.com", ""), Err(ValidationError::MissingCredentials));
}

#[test]
fn validate_login_keeps_password_whitespace() {
    assert_eq!(validate_login("a@b.com", " pw "), Ok(("a@b.com".to_owned(), " pw ".to_owned())));
}

#[test]
fn require_title_trims() {
    assert_eq!(require_title("  Hike  "), Ok("Hike"));
    assert_eq!(require_title(" \t\n"), Err(ValidationError::TitleRequired));
}

#[test]
fn validation_messages_match_alert_text() {
    assert_eq!(ValidationError::PasswordMismatch.to_string(), "Passwords do not match");
    assert_eq!(ValidationError::MissingCredentials.to_string(), "Email and password are required");
    assert_eq!(ValidationError::TitleRequired.to_string(), "Title is required");
    assert_eq!(ValidationError::ShareTitleRequired.error_code(), "E_TITLE_REQUIRED");
}
