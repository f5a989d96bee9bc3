// Schema walker: dispatch, rule invocation and error aggregation

use crate::rules::REQUIRED_RULE;
use crate::{
    ConfigurationError, ErrorNode, ErrorTree, Field, Outcome, Param, Result, Rule, RuleRegistry,
    RuleSet, Schema, SchemaNode, ValidatorSettings, Verdict,
};
use schemata_log::{trace, warn};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Validates data against schemas using its own rule registry.
///
/// ```
/// use schemata_validation::{RuleSet, Schema, Validator};
/// use serde_json::json;
///
/// let validator = Validator::new();
/// let schema = Schema::new().scalar("a", RuleSet::required());
///
/// let outcome = validator.validate(&json!({"a": ""}), &schema).unwrap();
/// assert_eq!(outcome.to_json(), json!({"a": "is required."}));
///
/// let outcome = validator.validate(&json!({"a": "ok"}), &schema).unwrap();
/// assert!(outcome.is_valid());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    registry: RuleRegistry,
    settings: ValidatorSettings,
}

/// Position of an element inside the collection being walked
#[derive(Clone, Copy)]
enum Position<'a> {
    Index(usize),
    Member(&'a str),
}

impl Position<'_> {
    fn key(self, element: &Value, index_by: Option<&str>) -> String {
        if let Some(value) = index_by.and_then(|property| element.get(property)) {
            return match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
        }
        match self {
            Position::Index(i) => i.to_string(),
            Position::Member(key) => key.to_string(),
        }
    }
}

impl Validator {
    /// Validator with the built-in rules and default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self {
            registry,
            settings: ValidatorSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ValidatorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ValidatorSettings {
        &self.settings
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut RuleRegistry {
        &mut self.registry
    }

    /// Install or replace a closure rule
    pub fn add_validator<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&Value, &Param, Option<&Value>) -> Verdict + Send + Sync + 'static,
    {
        self.registry.register(name, func);
        self
    }

    /// Install or replace a [`Rule`] implementation
    pub fn add_rule<R: Rule + 'static>(&mut self, rule: R) -> &mut Self {
        self.registry.register_rule(rule);
        self
    }

    /// Decode a suffix-encoded schema using this validator's syntax settings
    pub fn schema_from_value(&self, value: &Value) -> Result<Schema> {
        Schema::from_value(value, &self.settings.syntax)
    }

    /// Load a JSON or TOML schema file using this validator's syntax settings
    pub fn load_schema(&self, path: impl AsRef<Path>) -> Result<Schema> {
        Schema::load(path, &self.settings.syntax)
    }

    /// Fail fast when `schema` references a rule that is not registered.
    pub fn check(&self, schema: &Schema) -> Result<()> {
        match schema
            .rule_names()
            .into_iter()
            .find(|name| !self.registry.contains(name))
        {
            Some(name) => {
                warn!("Schema references unregistered rule '{}'", name);
                Err(ConfigurationError::UnknownRule(name.to_string()))
            }
            None => Ok(()),
        }
    }

    /// Validate `data` against `schema`.
    ///
    /// Returns `Err` only for configuration mistakes: `null` data, a rule
    /// name missing from the registry, or a rule parameter of the wrong
    /// shape. Failing data is reported through [`Outcome::Invalid`].
    pub fn validate(&self, data: &Value, schema: &Schema) -> Result<Outcome> {
        if data.is_null() {
            warn!("Validation called without data");
            return Err(ConfigurationError::MissingData);
        }
        let outcome = Outcome::from_tree(self.walk(data, schema)?);
        trace!(
            "Validation finished with {} failing values",
            outcome.errors().map_or(0, ErrorTree::leaf_count)
        );
        Ok(outcome)
    }

    /// Serialize `data` with serde, then validate it.
    pub fn validate_serialize<T: Serialize + ?Sized>(
        &self,
        data: &T,
        schema: &Schema,
    ) -> Result<Outcome> {
        let value = serde_json::to_value(data)
            .map_err(|e| ConfigurationError::Serialization(e.to_string()))?;
        self.validate(&value, schema)
    }

    /// Check one value against a rule set: `required` first, then the
    /// remaining rules in declaration order, stopping at the first failure.
    /// A rule's custom message replaces its own.
    pub fn validate_value(
        &self,
        context: Option<&Value>,
        value: &Value,
        rules: &RuleSet,
    ) -> Result<Verdict> {
        for spec in rules.evaluation_order() {
            let verdict = self
                .registry
                .invoke(&spec.name, value, &spec.param, context)?;
            if let Verdict::Fail(message) = verdict {
                trace!("Rule '{}' failed", spec.name);
                return Ok(Verdict::Fail(
                    spec.custom_message().map(str::to_string).unwrap_or(message),
                ));
            }
        }
        Ok(Verdict::Pass)
    }

    /// Walk one object level. `None` means no field failed.
    fn walk(&self, data: &Value, schema: &Schema) -> Result<Option<ErrorTree>> {
        let mut errors: Option<ErrorTree> = None;
        for field in schema {
            trace!("Validating {} field '{}'", field.node.kind(), field.name);
            let node = match data.get(field.name.as_str()) {
                Some(value) => self.walk_present(data, value, field)?,
                None if field.optional => None,
                None => self.missing()?,
            };
            if let Some(node) = node {
                errors
                    .get_or_insert_with(ErrorTree::new)
                    .insert(field.name.as_str(), node);
            }
        }
        Ok(errors)
    }

    fn walk_present(
        &self,
        container: &Value,
        value: &Value,
        field: &Field,
    ) -> Result<Option<ErrorNode>> {
        match &field.node {
            SchemaNode::Scalar(rules) => Ok(self
                .validate_value(Some(container), value, rules)?
                .message()
                .map(|m| ErrorNode::Message(m.to_string()))),
            SchemaNode::Object(schema) => Ok(self.walk(value, schema)?.map(ErrorNode::Nested)),
            SchemaNode::ArrayOfObjects { schema, index_by } => {
                self.walk_elements(value, index_by.as_deref(), |element| {
                    Ok(self.walk(element, schema)?.map(ErrorNode::Nested))
                })
            }
            SchemaNode::ArrayOfValues { rules, index_by } => {
                self.walk_elements(value, index_by.as_deref(), |element| {
                    Ok(self
                        .validate_value(Some(container), element, rules)?
                        .message()
                        .map(|m| ErrorNode::Message(m.to_string())))
                })
            }
        }
    }

    /// Apply `check` to each element of an array, or each member of an
    /// object, keying failures by position or by the `index_by` property.
    fn walk_elements<F>(
        &self,
        collection: &Value,
        index_by: Option<&str>,
        mut check: F,
    ) -> Result<Option<ErrorNode>>
    where
        F: FnMut(&Value) -> Result<Option<ErrorNode>>,
    {
        let mut errors: Option<ErrorTree> = None;
        let mut visit = |position: Position<'_>, element: &Value| -> Result<()> {
            if let Some(node) = check(element)? {
                errors
                    .get_or_insert_with(ErrorTree::new)
                    .insert(position.key(element, index_by), node);
            }
            Ok(())
        };

        match collection {
            Value::Array(items) => {
                for (i, element) in items.iter().enumerate() {
                    visit(Position::Index(i), element)?;
                }
            }
            Value::Object(members) => {
                for (key, element) in members {
                    visit(Position::Member(key), element)?;
                }
            }
            _ => trace!("Skipping non-collection value"),
        }

        Ok(errors.map(ErrorNode::Nested))
    }

    /// Error for a missing non-optional field, produced by the registry's
    /// `required` rule so a replaced rule also changes this message.
    fn missing(&self) -> Result<Option<ErrorNode>> {
        let verdict = self.registry.invoke(
            REQUIRED_RULE,
            &Value::Bool(false),
            &Param::from(true),
            None,
        )?;
        Ok(verdict.message().map(|m| ErrorNode::Message(m.to_string())))
    }
}
