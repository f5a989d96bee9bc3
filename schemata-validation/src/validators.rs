// Built-in rules
//
// Length and pattern rules only judge non-empty strings; every other value
// passes them. Presence is the job of `required`.

use crate::{Param, Result, Rule, Verdict};
use serde_json::Value;

/// Truthiness as the legacy schemas expect it: `null`, `false`, `0`, `NaN`
/// and `""` are falsy, everything else (including empty arrays and objects)
/// is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Fails unless the value is truthy. The parameter is not consulted.
pub struct Required;

impl Rule for Required {
    fn name(&self) -> &str {
        "required"
    }

    fn check(&self, value: &Value, _param: &Param, _context: Option<&Value>) -> Result<Verdict> {
        if is_truthy(value) {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::fail("is required."))
        }
    }
}

/// Fails when a non-empty string has no match for the pattern.
pub struct Match;

impl Rule for Match {
    fn name(&self) -> &str {
        "match"
    }

    fn check(&self, value: &Value, param: &Param, _context: Option<&Value>) -> Result<Verdict> {
        let pattern = param.to_pattern(self.name())?;
        match non_empty_str(value) {
            Some(text) if !pattern.is_match(text) => {
                Ok(Verdict::fail("did not match required expression."))
            }
            _ => Ok(Verdict::Pass),
        }
    }
}

/// Fails when a truthy value differs from the named sibling field of the
/// containing object, or when there is no containing object.
pub struct SameAs;

impl Rule for SameAs {
    fn name(&self) -> &str {
        "sameAs"
    }

    fn check(&self, value: &Value, param: &Param, context: Option<&Value>) -> Result<Verdict> {
        let field = param.as_str().ok_or_else(|| {
            crate::ConfigurationError::invalid_parameter(self.name(), "expected a field name")
        })?;
        if !is_truthy(value) {
            return Ok(Verdict::Pass);
        }
        let sibling = context
            .and_then(Value::as_object)
            .and_then(|object| object.get(field));
        if sibling == Some(value) {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::fail(format!("is not same as {}", field)))
        }
    }
}

/// Fails when a non-empty string is shorter than the bound, in characters.
pub struct MinLength;

impl Rule for MinLength {
    fn name(&self) -> &str {
        "minLength"
    }

    fn check(&self, value: &Value, param: &Param, _context: Option<&Value>) -> Result<Verdict> {
        let min = param.as_length(self.name())?;
        match non_empty_str(value) {
            Some(text) if text.chars().count() < min => Ok(Verdict::fail(format!(
                "has length less than minimal {} chars",
                min
            ))),
            _ => Ok(Verdict::Pass),
        }
    }
}

/// Fails when a non-empty string is longer than the bound, in characters.
pub struct MaxLength;

impl Rule for MaxLength {
    fn name(&self) -> &str {
        "maxLength"
    }

    fn check(&self, value: &Value, param: &Param, _context: Option<&Value>) -> Result<Verdict> {
        let max = param.as_length(self.name())?;
        match non_empty_str(value) {
            Some(text) if text.chars().count() > max => Ok(Verdict::fail(format!(
                "has length greater than maximal {} chars",
                max
            ))),
            _ => Ok(Verdict::Pass),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use serde_json::json;

    fn pass(verdict: Result<Verdict>) -> bool {
        verdict.unwrap().is_pass()
    }

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
        }
        for truthy in [json!(true), json!(-1), json!("0"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{} should be truthy", truthy);
        }
    }

    #[test]
    fn test_required() {
        let p = Param::from(true);
        assert!(pass(Required.check(&json!("some text"), &p, None)));
        assert_eq!(
            Required.check(&json!(""), &p, None).unwrap(),
            Verdict::fail("is required.")
        );
        assert!(!pass(Required.check(&json!(null), &p, None)));
    }

    #[test]
    fn test_required_ignores_param() {
        assert!(!pass(Required.check(&json!(""), &Param::from(false), None)));
    }

    #[test]
    fn test_match_passes_non_strings() {
        let p = Param::from("");
        for value in [json!(null), json!(123), json!({"a": "asd"}), json!([{}]), json!(true)] {
            assert!(pass(Match.check(&value, &p, None)), "{} should pass", value);
        }
    }

    #[test]
    fn test_match_passes_empty_string() {
        let p = Param::from(Regex::new(r"^\d+$").unwrap());
        assert!(pass(Match.check(&json!(""), &p, None)));
    }

    #[test]
    fn test_match_strings() {
        let word = Param::from(Regex::new(r"(?i)\w+").unwrap());
        assert!(pass(Match.check(&json!("aaa"), &word, None)));

        let digits = Param::from(Regex::new(r"\d+").unwrap());
        assert_eq!(
            Match.check(&json!("aaa"), &digits, None).unwrap(),
            Verdict::fail("did not match required expression.")
        );
    }

    #[test]
    fn test_match_rejects_non_pattern_param() {
        assert!(Match.check(&json!("aaa"), &Param::from(3), None).is_err());
    }

    #[test]
    fn test_same_as() {
        let p = Param::from("password");
        let ctx = json!({"password": "s3cret", "confirm": "s3cret"});
        assert!(pass(SameAs.check(&json!("s3cret"), &p, Some(&ctx))));
        assert_eq!(
            SameAs.check(&json!("other"), &p, Some(&ctx)).unwrap(),
            Verdict::fail("is not same as password")
        );
    }

    #[test]
    fn test_same_as_without_context_fails_truthy_values() {
        let p = Param::from("password");
        assert!(!pass(SameAs.check(&json!("x"), &p, None)));
        assert!(pass(SameAs.check(&json!(""), &p, None)));
    }

    #[test]
    fn test_same_as_missing_sibling() {
        let p = Param::from("password");
        assert!(!pass(SameAs.check(&json!("x"), &p, Some(&json!({})))));
    }

    #[test]
    fn test_same_as_is_strict() {
        let p = Param::from("count");
        let ctx = json!({"count": 1});
        assert!(!pass(SameAs.check(&json!("1"), &p, Some(&ctx))));
    }

    #[test]
    fn test_min_length() {
        let p = Param::from(5);
        assert!(pass(MinLength.check(&json!("hello"), &p, None)));
        assert_eq!(
            MinLength.check(&json!("hi"), &p, None).unwrap(),
            Verdict::fail("has length less than minimal 5 chars")
        );
    }

    #[test]
    fn test_max_length() {
        let p = Param::from(5);
        assert!(pass(MaxLength.check(&json!("exact"), &p, None)));
        assert_eq!(
            MaxLength.check(&json!("sixsix"), &p, None).unwrap(),
            Verdict::fail("has length greater than maximal 5 chars")
        );
    }

    #[test]
    fn test_length_bounds_are_independent() {
        let p = Param::from(3);
        assert!(pass(MaxLength.check(&json!("ab"), &p, None)));
        assert!(pass(MinLength.check(&json!("abcd"), &p, None)));
    }

    #[test]
    fn test_length_counts_characters() {
        let p = Param::from(3);
        assert!(pass(MaxLength.check(&json!("äöü"), &p, None)));
    }

    #[test]
    fn test_length_rules_pass_non_strings_and_empty() {
        let p = Param::from(3);
        for value in [json!(""), json!(12345), json!(null), json!(["a"])] {
            assert!(pass(MinLength.check(&value, &p, None)));
            assert!(pass(MaxLength.check(&value, &Param::from(0), None)));
        }
    }

    #[test]
    fn test_length_rules_reject_bad_param() {
        assert!(MinLength.check(&json!("abc"), &Param::from("3"), None).is_err());
        assert!(MaxLength.check(&json!(""), &Param::from(-2), None).is_err());
    }
}
