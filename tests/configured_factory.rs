//! Factories built from a `sieve.toml` on disk

use serde_json::json;
use sieve::{
    Error, ErrorKind, Factory, FieldDirectory, FieldType, FilterConfig, QueryableField,
    CONFIG_FILE_NAME, DEFAULT_MAX_NESTING_DEPTH,
};
use tempfile::TempDir;

fn directory() -> FieldDirectory {
    FieldDirectory::new(vec![
        QueryableField::new("name", FieldType::String).search_indexed(true),
        QueryableField::new("score", FieldType::Int).search_indexed(true),
    ])
}

#[test]
fn test_default_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    FilterConfig::write_default_if_missing(&path).unwrap();

    let config = FilterConfig::from_file(&path).unwrap();
    assert_eq!(config, FilterConfig::default());
    assert_eq!(config.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);

    let fields = directory();
    let factory = Factory::from_config(&fields, &config).unwrap();
    assert!(factory.collation().is_none());
    let filter = factory.wrapped_filter(br#"{"name": "alice"}"#).unwrap();
    assert!(!filter.matches(br#"{"name": "ALICE"}"#));
}

#[test]
fn test_case_insensitive_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "case = \"ci\"\nmax_nesting_depth = 4\n").unwrap();

    let config = FilterConfig::from_file(&path).unwrap();
    let fields = directory();
    let filter = Factory::from_config(&fields, &config)
        .unwrap()
        .wrapped_filter(br#"{"name": "alice", "score": {"$gt": 1}}"#)
        .unwrap();

    let doc = json!({"name": "ALICE", "score": 2});
    assert!(filter.matches_doc(doc.as_object().unwrap()));
    assert!(!filter.is_search_indexed());
    assert_eq!(filter.search_filter(), "");

    let numeric_only = Factory::from_config(&fields, &config)
        .unwrap()
        .wrapped_filter(br#"{"score": {"$gt": 1}}"#)
        .unwrap();
    assert_eq!(numeric_only.search_filter(), "score:>1");
}

#[test]
fn test_existing_config_is_not_overwritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "max_nesting_depth = 1\n").unwrap();
    FilterConfig::write_default_if_missing(&path).unwrap();

    let config = FilterConfig::from_file(&path).unwrap();
    assert_eq!(config.max_nesting_depth, 1);

    let fields = directory();
    let err = Factory::from_config(&fields, &config)
        .unwrap()
        .factorize(br#"{"$or": [{"$and": [{"score": 1}]}]}"#)
        .unwrap_err();
    assert_eq!(err, Error::NestingTooDeep { depth: 2, max: 1 });
}

#[test]
fn test_bad_config_is_internal_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "case = \"upper\"\n").unwrap();

    let err = FilterConfig::from_file(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);

    let missing = FilterConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(missing, Error::Config { .. }));
}
