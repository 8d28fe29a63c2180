use super::*;
use crate::schema::AbTestsSettings;

fn valid_config() -> Config {
    Config {
        ab_tests: AbTestsSettings::new("https://ab.example.com", "token"),
        ..Default::default()
    }
}

#[test]
fn test_validate_valid_config() {
    let result = ConfigValidator::validate(&valid_config());
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_default_config_is_invalid() {
    let result = ConfigValidator::validate(&Config::default());
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "ab_tests.host"));
    assert!(result.errors.iter().any(|e| e.path == "ab_tests.api_token"));
}

#[test]
fn test_validate_host_scheme() {
    let mut config = valid_config();
    config.ab_tests.host = "ab.example.com".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "ab_tests.host"));

    config.ab_tests.host = "ftp://ab.example.com".to_string();
    assert!(!ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_validate_trailing_slash_warning() {
    let mut config = valid_config();
    config.ab_tests.host = "https://ab.example.com/".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "ab_tests.host"));
}

#[test]
fn test_validate_empty_block_name() {
    let mut config = valid_config();
    config.content.extra_block_names = vec!["core/group".to_string(), " ".to_string()];

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert_eq!(result.errors[0].path, "content.extra_block_names[1]");
}

#[test]
fn test_validate_empty_origin_warning() {
    let mut config = valid_config();
    config.content.origin = String::new();

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "content.origin"));
}

#[test]
fn test_into_result() {
    let warnings = ConfigValidator::validate(&valid_config()).into_result().unwrap();
    assert!(warnings.is_empty());

    let err = ConfigValidator::validate(&Config::default())
        .into_result()
        .unwrap_err();
    assert!(err.to_string().contains("ab_tests.host"));
}

#[test]
fn test_validation_error_new() {
    let err = ValidationError::new("path", "message");
    assert_eq!(err.path, "path");
    assert_eq!(err.message, "message");
}
