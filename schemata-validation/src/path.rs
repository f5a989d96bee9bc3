// Single-field validation through a dotted path

use crate::{ConfigurationError, Result, RuleSet, Schema, SchemaNode, Validator, Verdict};
use serde_json::Value;

impl Validator {
    /// Validate one value against the rule set found at `path`.
    ///
    /// Useful for checking a single form input as it changes. There is no
    /// containing object, so cross-field rules such as `sameAs` fail on any
    /// truthy value.
    ///
    /// ```
    /// use schemata_validation::{Field, RuleSet, Schema, Validator, Verdict};
    /// use serde_json::json;
    ///
    /// let schema = Schema::new().field(Field::array(
    ///     "contacts",
    ///     Schema::new().scalar("email", RuleSet::new().rule_with_message("match", "@", "bad email")),
    /// ));
    ///
    /// let verdict = Validator::new()
    ///     .validate_field(&json!("nobody"), "contacts.email", &schema)
    ///     .unwrap();
    /// assert_eq!(verdict, Verdict::fail("bad email"));
    /// ```
    pub fn validate_field(&self, value: &Value, path: &str, schema: &Schema) -> Result<Verdict> {
        let rules = self.resolve_rules(path, schema)?;
        self.validate_value(None, value, rules)
    }

    /// Rule set at `path`, split on the configured separator
    pub fn resolve_rules<'s>(&self, path: &str, schema: &'s Schema) -> Result<&'s RuleSet> {
        resolve(path, schema, self.settings().path_separator)
    }
}

#[derive(Clone, Copy)]
enum Level<'s> {
    Schema(&'s Schema),
    Leaf(&'s RuleSet),
}

/// Resolve `path` segment by segment down to a leaf rule set.
pub fn resolve<'s>(path: &str, schema: &'s Schema, separator: char) -> Result<&'s RuleSet> {
    let invalid = |segment: &str| ConfigurationError::InvalidPath {
        path: path.to_string(),
        segment: segment.to_string(),
    };

    let mut level = Level::Schema(schema);
    for segment in path.split(separator) {
        let Level::Schema(current) = level else {
            return Err(invalid(segment));
        };
        let field = current.resolve(segment).ok_or_else(|| invalid(segment))?;
        level = match &field.node {
            SchemaNode::Scalar(rules) | SchemaNode::ArrayOfValues { rules, .. } => {
                Level::Leaf(rules)
            }
            SchemaNode::Object(nested) | SchemaNode::ArrayOfObjects { schema: nested, .. } => {
                Level::Schema(nested)
            }
        };
    }

    match level {
        Level::Leaf(rules) => Ok(rules),
        Level::Schema(_) => Err(ConfigurationError::NotALeaf(path.to_string())),
    }
}
