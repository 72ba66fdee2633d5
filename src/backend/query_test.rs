use super::*;

#[test]
fn default_query_is_first_page() {
    let query = ListQuery::default();
    assert_eq!(query.to_pairs(), vec![("page", "1".to_owned()), ("perPage", "30".to_owned())]);
}

#[test]
fn page_clamps_zero_to_one() {
    let query = ListQuery::page(0, 0);
    assert_eq!(query.page, 1);
    assert_eq!(query.per_page, 1);
}

#[test]
fn pairs_include_optional_parameters_in_order() {
    let query = ListQuery::page(2, 50)
        .sort("-created")
        .filter("Creator ~ 'u1'")
        .expand("Tags");
    assert_eq!(
        query.to_pairs(),
        vec![
            ("page", "2".to_owned()),
            ("perPage", "50".to_owned()),
            ("sort", "-created".to_owned()),
            ("filter", "Creator ~ 'u1'".to_owned()),
            ("expand", "Tags".to_owned()),
        ]
    );
}

#[test]
fn contains_builds_array_contains_expression() {
    assert_eq!(contains("Creator", "abc123"), "Creator ~ 'abc123'");
}

#[test]
fn equals_builds_equality_expression() {
    assert_eq!(equals("creator.id", "u1"), "creator.id = 'u1'");
}

#[test]
fn quote_escapes_quotes_and_backslashes() {
    assert_eq!(quote("o'neil"), r"'o\'neil'");
    assert_eq!(quote(r"a\b"), r"'a\\b'");
    assert_eq!(contains("Creator", "x' || id != '"), r"Creator ~ 'x\' || id != \''");
}

#[test]
fn sort_desc_prefixes_minus() {
    assert_eq!(sort_desc("created"), "-created");
}
