use super::*;

fn config(base_url: &str) -> BackendConfig {
    BackendConfig { base_url: base_url.to_owned(), request_timeout: None, connect_timeout: None }
}

#[test]
fn records_url_formats_collection_path() {
    assert_eq!(records_url("http://pb", "Post"), "http://pb/api/collections/Post/records");
}

#[test]
fn new_trims_trailing_slash() {
    let client = PocketBaseClient::new(&config("http://127.0.0.1:8090/")).unwrap();
    assert_eq!(client.base_url(), "http://127.0.0.1:8090");
    assert_eq!(client.record_url("Post", "r1"), "http://127.0.0.1:8090/api/collections/Post/records/r1");
}

#[test]
fn auth_token_round_trips() {
    let client = PocketBaseClient::new(&config("http://pb")).unwrap();
    assert_eq!(client.auth_token(), None);
    client.set_auth_token(Some("tok".into()));
    assert_eq!(client.auth_token().as_deref(), Some("tok"));
    client.set_auth_token(None);
    assert_eq!(client.auth_token(), None);
}

#[test]
fn parse_error_uses_backend_message() {
    let body = r#"{"code":400,"message":"Failed to authenticate.","data":{}}"#;
    assert_eq!(
        parse_error(400, body),
        ClientError::Response { status: 400, message: "Failed to authenticate.".into() }
    );
}

#[test]
fn parse_error_appends_field_messages() {
    let body = r#"{"code":400,"message":"Failed to create record.","data":{
        "email":{"code":"validation_invalid_email","message":"The email is invalid or already in use."},
        "password":{"code":"validation_length_out_of_range","message":"Must be at least 8 characters."}
    }}"#;
    let err = parse_error(400, body);
    assert_eq!(
        err,
        ClientError::Response {
            status: 400,
            message: "Failed to create record. (email: The email is invalid or already in use.; password: Must be at least 8 characters.)".into(),
        }
    );
}

#[test]
fn parse_error_tolerates_non_json_body() {
    let err = parse_error(502, "<html>bad gateway</html>");
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "backend responded 502: request failed with status 502");
}

#[test]
fn parse_error_404_is_not_found() {
    let body = r#"{"code":404,"message":"The requested resource wasn't found.","data":{}}"#;
    assert!(parse_error(404, body).is_not_found());
}

#[test]
fn parse_json_reports_parse_errors() {
    let err = parse_json::<AuthResponse>("{}").unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
}
