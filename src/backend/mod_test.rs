use super::*;

#[derive(Debug, Deserialize, PartialEq)]
struct Titled {
    id: String,
    #[serde(rename = "Title")]
    title: String,
}

#[test]
fn list_page_parses_backend_envelope() {
    let raw = serde_json::json!({
        "page": 1,
        "perPage": 20,
        "totalItems": 2,
        "totalPages": 1,
        "items": [{ "id": "a", "Title": "A" }, { "id": "b", "Title": "B" }]
    });
    let page: ListPage<Value> = serde_json::from_value(raw).unwrap();
    let typed: ListPage<Titled> = page.decode().unwrap();
    assert_eq!(typed.per_page, 20);
    assert_eq!(typed.total_items, 2);
    assert_eq!(typed.items[1], Titled { id: "b".into(), title: "B".into() });
}

#[test]
fn list_page_decode_reports_bad_item() {
    let page = ListPage { page: 1, per_page: 1, total_items: 1, total_pages: 1, items: vec![serde_json::json!(42)] };
    let err = page.decode::<Titled>().unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
}

#[test]
fn auth_response_carries_record() {
    let raw = r#"{"token":"t","record":{"id":"u1","email":"a@b.com","name":"Ann","collectionName":"users"}}"#;
    let resp: AuthResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(resp.token, "t");
    assert_eq!(resp.record.email, "a@b.com");
    assert_eq!(resp.record.fields["collectionName"], "users");
}

#[derive(Debug, Deserialize)]
struct Related {
    #[serde(default, deserialize_with = "one_or_many")]
    ids: Vec<String>,
}

#[test]
fn one_or_many_accepts_single_list_and_null() {
    let one: Related = serde_json::from_str(r#"{"ids":"u1"}"#).unwrap();
    assert_eq!(one.ids, vec!["u1"]);
    let many: Related = serde_json::from_str(r#"{"ids":["u1","u2"]}"#).unwrap();
    assert_eq!(many.ids, vec!["u1", "u2"]);
    let null: Related = serde_json::from_str(r#"{"ids":null}"#).unwrap();
    assert!(null.ids.is_empty());
    let missing: Related = serde_json::from_str("{}").unwrap();
    assert!(missing.ids.is_empty());
}
