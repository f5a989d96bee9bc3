//! Integration tests for common schemata workflows.
//!
//! These tests verify that the most common use cases work correctly.

use schemata::prelude::*;
use serde_json::json;
use std::io::Write;

// =============================================================================
// Form Validation
// =============================================================================

fn signup_schema() -> Schema {
    Schema::new()
        .scalar("username", RuleSet::required().rule("minLength", 3).rule("maxLength", 16))
        .scalar("password", RuleSet::required().rule("minLength", 8))
        .scalar("confirm", RuleSet::required().rule("sameAs", "password"))
        .field(Field::scalar("referral", RuleSet::new().rule("match", r"^[A-Z]{4}\d{2}$")).optional())
}

#[test]
fn test_signup_form_workflow() {
    let validator = Validator::new();
    let schema = signup_schema();
    validator.check(&schema).unwrap();

    // Fully valid submission
    let outcome = validator
        .validate(
            &json!({"username": "ada", "password": "analytical", "confirm": "analytical"}),
            &schema,
        )
        .unwrap();
    assert!(outcome.is_valid());

    // Every field wrong in its own way
    let outcome = validator
        .validate(
            &json!({
                "username": "a-very-long-username-indeed",
                "password": "short",
                "confirm": "other",
                "referral": "nope"
            }),
            &schema,
        )
        .unwrap();
    assert_eq!(
        outcome.to_json(),
        json!({
            "username": "has length greater than maximal 16 chars",
            "password": "has length less than minimal 8 chars",
            "confirm": "is not same as password",
            "referral": "did not match required expression."
        })
    );

    // Empty submission: each non-optional field reports required
    let outcome = validator.validate(&json!({}), &schema).unwrap();
    let errors = outcome.into_errors().unwrap();
    assert_eq!(errors.keys().collect::<Vec<_>>(), ["confirm", "password", "username"]);
}

#[test]
fn test_field_by_field_workflow() {
    let validator = Validator::new();
    let schema = signup_schema();

    // Live validation of a single input as the user types
    let steps = ["", "a", "ad", "ada"];
    let verdicts: Vec<_> = steps
        .iter()
        .map(|s| validator.validate_field(&json!(s), "username", &schema).unwrap())
        .collect();

    assert_eq!(verdicts[0], Verdict::fail("is required."));
    assert_eq!(verdicts[1], Verdict::fail("has length less than minimal 3 chars"));
    assert!(verdicts[3].is_pass());
}

// =============================================================================
// Nested Documents
// =============================================================================

#[test]
fn test_invoice_with_keyed_lines() {
    let validator = Validator::new();
    let schema = validator
        .schema_from_value(&json!({
            "number": {"required": true, "match": ["^INV-\\d+$", "must look like INV-123"]},
            "billing{}": {
                "name": {"required": true},
                "vat": {"optional": true, "minLength": 8}
            },
            "lines[]": {
                "__indexBy__": "sku",
                "sku": {"required": true},
                "description": {"required": true, "maxLength": 20}
            },
            "notes[v]": {"__optional": true, "maxLength": 10}
        }))
        .unwrap();

    let outcome = validator
        .validate(
            &json!({
                "number": "123",
                "billing": {"name": "ACME", "vat": "123"},
                "lines": [
                    {"sku": "A-1", "description": "Anvil"},
                    {"sku": "R-2", "description": "Rocket skates, extra fast"}
                ]
            }),
            &schema,
        )
        .unwrap();

    assert_eq!(
        outcome.to_json(),
        json!({
            "number": "must look like INV-123",
            "billing": {"vat": "has length less than minimal 8 chars"},
            "lines": {"R-2": {"description": "has length greater than maximal 20 chars"}}
        })
    );
    assert_eq!(outcome.errors().map(ErrorTree::leaf_count), Some(3));
}

// =============================================================================
// Custom Rules & Configuration
// =============================================================================

#[test]
fn test_custom_rule_workflow() {
    let mut validator = Validator::new();
    validator.add_validator("between", |value, param, _| {
        let bounds = param.as_value().and_then(|p| p.as_array());
        match (value.as_f64(), bounds) {
            (Some(n), Some(b)) if b.len() == 2 => {
                let (lo, hi) = (b[0].as_f64().unwrap_or(f64::MIN), b[1].as_f64().unwrap_or(f64::MAX));
                if n < lo || n > hi {
                    Verdict::fail(format!("must be between {} and {}", b[0], b[1]))
                } else {
                    Verdict::Pass
                }
            }
            _ => Verdict::Pass,
        }
    });

    let schema = Schema::new().values("scores", RuleSet::new().rule("between", json!([0, 100])));
    let outcome = validator
        .validate(&json!({"scores": [10, 250, -1]}), &schema)
        .unwrap();

    assert_eq!(
        outcome.to_json(),
        json!({"scores": {"1": "must be between 0 and 100", "2": "must be between 0 and 100"}})
    );

    // A fresh validator is unaffected
    assert!(matches!(
        Validator::new().validate(&json!({"scores": [1]}), &schema),
        Err(ConfigurationError::UnknownRule(_))
    ));
}

#[test]
fn test_settings_file_workflow() {
    let mut settings_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(settings_file, "path_separator = \"/\"").unwrap();
    writeln!(settings_file, "[syntax]").unwrap();
    writeln!(settings_file, "nested_optional_key = \"?\"").unwrap();

    let settings = ValidatorSettings::load(settings_file.path()).unwrap();
    let validator = Validator::new().with_settings(settings);

    let schema = validator
        .schema_from_value(&json!({
            "profile{}": {"?": true, "bio": {"maxLength": 5}}
        }))
        .unwrap();

    assert!(validator.validate(&json!({}), &schema).unwrap().is_valid());
    assert_eq!(
        validator.validate_field(&json!("too long"), "profile/bio", &schema).unwrap(),
        Verdict::fail("has length greater than maximal 5 chars")
    );
}

#[test]
fn test_missing_inputs_are_errors() {
    let validator = Validator::new();
    assert!(matches!(
        validator.validate(&serde_json::Value::Null, &signup_schema()),
        Err(ConfigurationError::MissingData)
    ));
    assert!(matches!(
        validator.schema_from_value(&serde_json::Value::Null),
        Err(ConfigurationError::MissingSchema)
    ));
}

#[test]
fn test_log_level_is_adjustable() {
    schemata::schemata_log::set_level(schemata::schemata_log::Level::Error);
    assert_eq!(
        schemata::schemata_log::current_level(),
        schemata::schemata_log::Level::Error
    );
}
