//! Integration tests for schema registration, detection and validation

use serde_json::json;
use urlsift_domain::{ContentType, ExtractionResult};
use urlsift_schema::{SchemaError, SchemaRegistry, SchemaValidator};

fn result(value: serde_json::Value) -> ExtractionResult {
    ExtractionResult::from_value(value).unwrap()
}

#[test]
fn test_bitcoin_content_on_social_url_is_crypto() {
    let registry = SchemaRegistry::new();
    let detected = registry.generate_dynamic_schema(
        "Why I just bought more bitcoin",
        Some("https://twitter.com/someone/status/42"),
    );
    assert_eq!(detected, ContentType::Crypto);
}

#[test]
fn test_missing_defaulted_field_is_filled() {
    let validator = SchemaValidator::new(SchemaRegistry::new());
    let mut raw = result(json!({
        "title": "Vote tonight",
        "content": "Parliament votes on the bill tonight."
    }));

    let (is_valid, errors) = validator.validate(&mut raw, Some("news"), None, true);

    assert!(is_valid || errors.iter().all(|e| !e.is_critical()));
    assert_eq!(raw.get("category"), Some(&json!("general")));
    assert_eq!(raw.get("summary"), Some(&json!("")));
}

#[test]
fn test_missing_required_field_raises() {
    let validator = SchemaValidator::new(SchemaRegistry::new());
    let raw = result(json!({"title": "ETH merge", "content": "..."}));

    let error = validator
        .validate_and_enhance(raw, "ethereum merge completed", None, Some("crypto"))
        .unwrap_err();

    match &error {
        SchemaError::Validation {
            content_type,
            errors,
        } => {
            assert_eq!(content_type, "crypto");
            assert!(!errors.is_empty());
            for e in errors {
                assert!(e.message.contains("required property"), "{}", e.message);
            }
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_value_quoting_required_phrase_stays_recoverable() {
    let validator = SchemaValidator::new(SchemaRegistry::new());
    let raw = result(json!({
        "title": "Editor's note",
        "content": "Corrections follow.",
        "tags": "note: 'x' is a required property"
    }));

    let enhanced = validator
        .validate_and_enhance(raw, "Corrections follow.", None, Some("news"))
        .unwrap();

    let recorded = enhanced.metadata().unwrap()["validation_errors"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0]["path"], "tags");
    assert_eq!(recorded[0]["schema_path"], "properties.tags.type");
    assert!(recorded[0]["message"]
        .as_str()
        .unwrap()
        .contains("is a required property"));
}

#[test]
fn test_registered_schema_drives_validation() {
    let mut validator = SchemaValidator::new(SchemaRegistry::new());
    validator
        .registry_mut()
        .register_schema(
            "job_posting",
            &json!({
                "properties": {
                    "company": {"type": "string"},
                    "remote": {"type": "boolean", "default": false}
                },
                "required": ["company"]
            }),
        )
        .unwrap();

    let ok = validator
        .validate_and_enhance(
            result(json!({"title": "Rust engineer", "company": "Acme"})),
            "We are hiring",
            None,
            Some("job_posting"),
        )
        .unwrap();
    assert_eq!(ok.get("remote"), Some(&json!(false)));
    assert_eq!(ok.metadata().unwrap()["content_type"], "job_posting");

    let missing = validator.validate_and_enhance(
        result(json!({"title": "Rust engineer"})),
        "We are hiring",
        None,
        Some("job_posting"),
    );
    assert!(matches!(missing, Err(SchemaError::Validation { .. })));
}

#[test]
fn test_enhanced_result_always_has_metadata() {
    let validator = SchemaValidator::new(SchemaRegistry::new());
    let enhanced = validator
        .validate_and_enhance(
            result(json!({"title": "Untitled", "_metadata": "garbage"})),
            "",
            Some("https://example.com/page"),
            Some("general"),
        )
        .unwrap();

    let metadata = enhanced.metadata().unwrap();
    assert_eq!(metadata["content_type"], "general");
    assert_eq!(metadata["validation_errors"].as_array().unwrap().len(), 1);
}
