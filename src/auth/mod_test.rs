use super::*;

fn account(password: &str, confirm: &str) -> NewAccount {
    NewAccount {
        email: "new@example.com".into(),
        password: password.into(),
        password_confirm: confirm.into(),
        name: None,
    }
}

#[test]
fn new_account_mismatch_checked_first() {
    let mut acct = account("secret123", "secret124");
    acct.email.clear();
    assert_eq!(acct.validate(), Err(ValidationError::PasswordMismatch));
}

#[test]
fn new_account_requires_email_and_password() {
    let mut acct = account("", "");
    assert_eq!(acct.validate(), Err(ValidationError::MissingCredentials));
    acct = account("secret123", "secret123");
    acct.email = "  ".into();
    assert_eq!(acct.validate(), Err(ValidationError::MissingCredentials));
}

#[test]
fn new_account_body_defaults_name_to_empty() {
    let body = account("secret123", "secret123").to_body();
    assert_eq!(body["name"], "");
    assert_eq!(body["passwordConfirm"], "secret123");
}

#[test]
fn new_account_body_keeps_name_and_trims_email() {
    let mut acct = account("pw", "pw");
    acct.email = " new@example.com ".into();
    acct.name = Some("Ann".into());
    let body = acct.to_body();
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["name"], "Ann");
}

#[test]
fn signup_message_prefers_validation_then_backend_text() {
    assert_eq!(AuthError::from(ValidationError::PasswordMismatch).signup_message(), "Passwords do not match");
    let backend = AuthError::from(ClientError::Response { status: 400, message: "Failed to create record.".into() });
    assert_eq!(backend.signup_message(), "Failed to create record.");
    assert_eq!(AuthError::NotInitialized.signup_message(), SIGNUP_FAILED_FALLBACK);
}

#[test]
fn signup_alert_pairs_title_with_message() {
    let (title, body) = AuthError::from(ValidationError::PasswordMismatch).signup_alert();
    assert_eq!(title, "Signup Failed");
    assert_eq!(body, "Passwords do not match");
}

#[test]
fn error_codes_delegate_to_inner_errors() {
    let backend = AuthError::from(ClientError::Response { status: 404, message: String::new() });
    assert_eq!(backend.error_code(), "E_NOT_FOUND");
    assert_eq!(AuthError::Superseded.error_code(), "E_SUPERSEDED");
    assert!(AuthError::from(ClientError::Network("reset".into())).retryable());
    assert!(!AuthError::NotInitialized.retryable());
}

#[test]
fn login_message_hides_backend_detail() {
    let wrong = AuthError::from(ClientError::Response { status: 400, message: "Failed to authenticate.".into() });
    assert_eq!(wrong.login_message(), LOGIN_FAILED);
    assert_eq!(AuthError::from(ValidationError::MissingCredentials).login_message(), "Email and password are required");
    assert_eq!(AuthError::NotInitialized.login_message(), UNEXPECTED_ERROR);
}

#[test]
fn sign_out_alert_only_on_warning() {
    assert_eq!(SignOut::default().alert(), None);
    let failed = SignOut { warning: Some(StorageError::Io("denied".into())) };
    assert_eq!(failed.alert(), Some(SIGN_OUT_FAILED));
}
