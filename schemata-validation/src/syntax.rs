// Decoding of suffix-encoded schemas
//
// The encoded form is a nested mapping where the key suffix picks the
// traversal kind:
//
//   "name"      scalar, value is a rule set
//   "name[]"    array of objects, value is a nested schema
//   "name[v]"   array of values, value is a rule set
//   "name{}"    object, value is a nested schema
//
// Rule specs are bare parameters or `[param, message]` pairs.

use crate::loader;
use crate::{
    ConfigurationError, Field, Param, Result, RuleSet, RuleSpec, Schema, SchemaNode, SchemaSyntax,
};
use regex::{Regex, RegexBuilder};
use schemata_log::debug;
use serde_json::{Map, Value};
use std::path::Path;

impl Schema {
    /// Decode a suffix-encoded schema.
    ///
    /// ```
    /// use schemata_validation::{Schema, SchemaSyntax};
    /// use serde_json::json;
    ///
    /// let schema = Schema::from_value(
    ///     &json!({
    ///         "email": {"required": true, "match": ["^\\S+@\\S+$", "not an email"]},
    ///         "items[]": {"__indexBy__": "sku", "sku": {"required": true}},
    ///         "address{}": {"__optional": true, "city": {"required": true}}
    ///     }),
    ///     &SchemaSyntax::default(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(schema.len(), 3);
    /// assert_eq!(schema.resolve("items").unwrap().node.index_by(), Some("sku"));
    /// assert!(schema.resolve("address").unwrap().optional);
    /// ```
    pub fn from_value(value: &Value, syntax: &SchemaSyntax) -> Result<Schema> {
        if value.is_null() {
            return Err(ConfigurationError::MissingSchema);
        }
        let schema = decode_schema(value, syntax, "")?;
        debug!("Decoded schema with {} top-level fields", schema.len());
        Ok(schema)
    }

    pub fn from_json_str(content: &str, syntax: &SchemaSyntax) -> Result<Schema> {
        Self::from_value(&loader::FileFormat::Json.parse(content)?, syntax)
    }

    pub fn from_toml_str(content: &str, syntax: &SchemaSyntax) -> Result<Schema> {
        Self::from_value(&loader::FileFormat::Toml.parse(content)?, syntax)
    }

    /// Load a JSON or TOML schema file
    pub fn load(path: impl AsRef<Path>, syntax: &SchemaSyntax) -> Result<Schema> {
        Self::from_value(&loader::load_file(path)?, syntax)
    }
}

fn join(at: &str, key: &str) -> String {
    if at.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", at, key)
    }
}

fn as_map<'a>(value: &'a Value, at: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ConfigurationError::invalid_schema(at, "expected an object"))
}

fn decode_schema(value: &Value, syntax: &SchemaSyntax, at: &str) -> Result<Schema> {
    let map = as_map(value, at)?;
    let mut schema = Schema::new();
    for (key, node) in map {
        if syntax.is_reserved(key) {
            continue;
        }
        schema.push(decode_field(key, node, syntax, &join(at, key))?);
    }
    Ok(schema)
}

fn strip<'a>(key: &'a str, suffix: &str) -> Option<&'a str> {
    if suffix.is_empty() {
        None
    } else {
        key.strip_suffix(suffix)
    }
}

fn decode_field(key: &str, node: &Value, syntax: &SchemaSyntax, at: &str) -> Result<Field> {
    let nested_optional = node
        .as_object()
        .is_some_and(|map| map.contains_key(&syntax.nested_optional_key));

    let (name, kind, optional) = if let Some(name) = strip(key, &syntax.array_suffix) {
        let kind = SchemaNode::ArrayOfObjects {
            schema: decode_schema(node, syntax, at)?,
            index_by: index_by(node, syntax, at)?,
        };
        (name, kind, nested_optional)
    } else if let Some(name) = strip(key, &syntax.values_suffix) {
        let kind = SchemaNode::ArrayOfValues {
            rules: decode_rules(node, syntax, at)?,
            index_by: index_by(node, syntax, at)?,
        };
        (name, kind, nested_optional)
    } else if let Some(name) = strip(key, &syntax.object_suffix) {
        (name, SchemaNode::Object(decode_schema(node, syntax, at)?), nested_optional)
    } else {
        let optional = as_map(node, at)?.contains_key(&syntax.optional_key);
        (key, SchemaNode::Scalar(decode_rules(node, syntax, at)?), optional)
    };

    if name.is_empty() {
        return Err(ConfigurationError::invalid_schema(at, "empty field name"));
    }

    Ok(Field {
        name: name.to_string(),
        node: kind,
        optional,
    })
}

fn index_by(node: &Value, syntax: &SchemaSyntax, at: &str) -> Result<Option<String>> {
    match node.get(&syntax.index_by_key) {
        None => Ok(None),
        Some(Value::String(property)) => Ok(Some(property.clone())),
        Some(_) => Err(ConfigurationError::invalid_schema(
            at,
            format!("{} must name a property", syntax.index_by_key),
        )),
    }
}

fn decode_rules(node: &Value, syntax: &SchemaSyntax, at: &str) -> Result<RuleSet> {
    let map = as_map(node, at)?;
    let mut rules = RuleSet::new();
    for (name, spec) in map {
        if syntax.is_reserved(name) || *name == syntax.optional_key {
            continue;
        }
        let (param, message) = match spec {
            Value::Array(pair) => (
                pair.first().cloned().unwrap_or(Value::Null),
                pair.get(1)
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string),
            ),
            other => (other.clone(), None),
        };

        let param = match param {
            Value::String(source) if syntax.is_pattern_rule(name) => {
                Param::Pattern(compile_pattern(&source).map_err(|e| {
                    ConfigurationError::invalid_schema(&join(at, name), e.to_string())
                })?)
            }
            other => Param::Value(other),
        };

        rules.push(RuleSpec {
            name: name.clone(),
            param,
            message,
        });
    }
    Ok(rules)
}

/// Compile a pattern. Sources written as `/body/flags` are accepted with
/// the `i`, `m`, `s` and `x` flags; `g` and `u` are ignored.
pub fn compile_pattern(source: &str) -> std::result::Result<Regex, regex::Error> {
    let delimited = source
        .strip_prefix('/')
        .and_then(|rest| rest.rfind('/').map(|end| (&rest[..end], &rest[end + 1..])))
        .filter(|(_, flags)| flags.chars().all(|c| "gimsux".contains(c)));

    let Some((body, flags)) = delimited else {
        return Regex::new(source);
    };

    RegexBuilder::new(body)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .ignore_whitespace(flags.contains('x'))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> Result<Schema> {
        Schema::from_value(&value, &SchemaSyntax::default())
    }

    #[test]
    fn test_suffixes_pick_kinds() {
        let schema = decode(json!({
            "name": {"required": true},
            "lines[]": {"qty": {"required": true}},
            "tags[v]": {"maxLength": 5},
            "meta{}": {"owner": {"required": true}}
        }))
        .unwrap();

        let kinds: Vec<_> = schema.iter().map(|f| (f.name.as_str(), f.node.kind())).collect();
        assert_eq!(
            kinds,
            [
                ("name", "scalar"),
                ("lines", "array of objects"),
                ("tags", "array of values"),
                ("meta", "object"),
            ]
        );
    }

    #[test]
    fn test_optional_markers() {
        let schema = decode(json!({
            "nick": {"optional": true, "minLength": 2},
            "meta{}": {"__optional": true, "owner": {"required": true}},
            "tags[v]": {"__optional": true, "maxLength": 5},
            "plain": {"minLength": 1}
        }))
        .unwrap();

        assert!(schema.resolve("nick").unwrap().optional);
        assert!(schema.resolve("meta").unwrap().optional);
        assert!(schema.resolve("tags").unwrap().optional);
        assert!(!schema.resolve("plain").unwrap().optional);
    }

    #[test]
    fn test_markers_are_not_rules_or_fields() {
        let schema = decode(json!({
            "nick": {"optional": true, "minLength": 2},
            "tags[v]": {"__optional": true, "__indexBy__": "code", "maxLength": 5},
            "meta{}": {"__optional": true, "owner": {"required": true}}
        }))
        .unwrap();

        let nick = schema.resolve("nick").unwrap().node.rules().unwrap();
        assert_eq!(nick.names().collect::<Vec<_>>(), ["minLength"]);

        let tags = schema.resolve("tags").unwrap().node.rules().unwrap();
        assert_eq!(tags.names().collect::<Vec<_>>(), ["maxLength"]);

        let meta = schema.resolve("meta").unwrap().node.schema().unwrap();
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn test_rule_spec_pairs() {
        let schema = decode(json!({
            "code": {"match": ["^\\d+$", "digits only"], "minLength": [3, ""], "maxLength": 9}
        }))
        .unwrap();

        let rules = schema.resolve("code").unwrap().node.rules().unwrap();
        let matcher = rules.get("match").unwrap();
        assert!(matches!(matcher.param, Param::Pattern(_)));
        assert_eq!(matcher.custom_message(), Some("digits only"));
        assert_eq!(rules.get("minLength").unwrap().message, None);
        assert_eq!(rules.get("maxLength").unwrap().param.as_length("maxLength").unwrap(), 9);
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let schema = decode(json!({"z": {}, "a": {}, "m": {}})).unwrap();
        let names: Vec<_> = schema.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["z", "a", "m"]);
    }

    #[test]
    fn test_invalid_schemas() {
        assert!(matches!(
            decode(Value::Null),
            Err(ConfigurationError::MissingSchema)
        ));
        assert!(matches!(
            decode(json!(["a"])),
            Err(ConfigurationError::InvalidSchema { .. })
        ));
        assert!(matches!(
            decode(json!({"a": true})),
            Err(ConfigurationError::InvalidSchema { .. })
        ));
        assert!(matches!(
            decode(json!({"[]": {}})),
            Err(ConfigurationError::InvalidSchema { .. })
        ));
        assert!(matches!(
            decode(json!({"items[]": {"__indexBy__": 3}})),
            Err(ConfigurationError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_bad_pattern_names_location() {
        let err = decode(json!({"user{}": {"name": {"match": "(open"}}})).unwrap_err();
        match err {
            ConfigurationError::InvalidSchema { at, .. } => assert_eq!(at, "user{}.name.match"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_delimited_patterns() {
        let re = compile_pattern("/^abc$/i").unwrap();
        assert!(re.is_match("ABC"));

        let re = compile_pattern(r"/\d+/g").unwrap();
        assert!(re.is_match("a1"));

        let re = compile_pattern("a/b").unwrap();
        assert!(re.is_match("a/b"));

        // unknown flag: the whole source is the pattern
        let re = compile_pattern("/x/q").unwrap();
        assert!(re.is_match("/x/q"));
        assert!(!re.is_match("x"));
    }

    #[test]
    fn test_custom_syntax() {
        let syntax = SchemaSyntax {
            array_suffix: "*".to_string(),
            index_by_key: "$index".to_string(),
            ..SchemaSyntax::default()
        };
        let schema = Schema::from_value(
            &json!({"rows*": {"$index": "id", "id": {"required": true}}}),
            &syntax,
        )
        .unwrap();

        let rows = schema.resolve("rows").unwrap();
        assert_eq!(rows.node.index_by(), Some("id"));
        assert_eq!(rows.node.schema().unwrap().len(), 1);
    }

    #[test]
    fn test_toml_keeps_declaration_order() {
        let schema = Schema::from_toml_str(
            r#"
            [z]
            required = true

            [code]
            maxLength = 2
            match = "^\\d+$"

            [a]
            required = true
            "#,
            &SchemaSyntax::default(),
        )
        .unwrap();

        let names: Vec<_> = schema.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["z", "code", "a"]);

        let rules = schema.resolve("code").unwrap().node.rules().unwrap();
        assert_eq!(rules.names().collect::<Vec<_>>(), ["maxLength", "match"]);

        let verdict = crate::Validator::new()
            .validate_field(&Value::from("abcd"), "code", &schema)
            .unwrap();
        assert_eq!(verdict, crate::Verdict::fail("has length greater than maximal 2 chars"));
    }

    #[test]
    fn test_from_toml_str() {
        let schema = Schema::from_toml_str(
            r#"
            [email]
            required = true
            match = ["^\\S+@\\S+$", "not an email"]

            ["roles[v]"]
            minLength = 2
            "#,
            &SchemaSyntax::default(),
        )
        .unwrap();

        assert_eq!(schema.len(), 2);
        assert!(matches!(
            schema.resolve("email").unwrap().node.rules().unwrap().get("match").unwrap().param,
            Param::Pattern(_)
        ));
    }
}
