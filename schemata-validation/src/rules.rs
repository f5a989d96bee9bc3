// Declarative rule sets attached to schema leaves

use crate::{ConfigurationError, Result};
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;

/// Name of the rule that is always evaluated first.
pub const REQUIRED_RULE: &str = "required";

/// Parameter handed to a rule on every invocation.
#[derive(Debug, Clone)]
pub enum Param {
    Value(Value),
    /// Pre-compiled pattern, used by `match`
    Pattern(Regex),
}

impl Param {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Param::Value(value) => Some(value),
            Param::Pattern(_) => None,
        }
    }

    /// String form: the string value, or the pattern source
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Param::Value(value) => value.as_str(),
            Param::Pattern(regex) => Some(regex.as_str()),
        }
    }

    /// Read the parameter as a non-negative length bound.
    pub fn as_length(&self, rule: &str) -> Result<usize> {
        self.as_value()
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                ConfigurationError::invalid_parameter(rule, "expected a non-negative integer")
            })
    }

    /// Read the parameter as a regex, compiling string parameters on demand.
    /// `/body/flags` sources are accepted as in decoded schemas.
    pub fn to_pattern(&self, rule: &str) -> Result<Cow<'_, Regex>> {
        match self {
            Param::Pattern(regex) => Ok(Cow::Borrowed(regex)),
            Param::Value(Value::String(source)) => crate::compile_pattern(source)
                .map(Cow::Owned)
                .map_err(|e| ConfigurationError::invalid_parameter(rule, e.to_string())),
            Param::Value(_) => Err(ConfigurationError::invalid_parameter(
                rule,
                "expected a pattern",
            )),
        }
    }

    /// Parameter as it appears in an encoded schema
    pub fn to_json(&self) -> Value {
        match self {
            Param::Value(value) => value.clone(),
            Param::Pattern(regex) => Value::String(regex.as_str().to_string()),
        }
    }
}

macro_rules! param_from_value {
    ($($t:ty),*) => {
        $(impl From<$t> for Param {
            fn from(value: $t) -> Self {
                Param::Value(Value::from(value))
            }
        })*
    };
}

param_from_value!(bool, i32, i64, u32, u64, usize, f64, &str, String);

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        Param::Value(value)
    }
}

impl From<Regex> for Param {
    fn from(regex: Regex) -> Self {
        Param::Pattern(regex)
    }
}

/// One named rule with its parameter and optional custom message.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub name: String,
    pub param: Param,
    /// Replaces the rule's own message when the rule fails
    pub message: Option<String>,
}

impl RuleSpec {
    pub fn new(name: impl Into<String>, param: impl Into<Param>) -> Self {
        Self {
            name: name.into(),
            param: param.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.name == REQUIRED_RULE
    }

    /// Custom message, ignoring empty strings
    pub fn custom_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Ordered rules applied to a single value.
///
/// ```
/// use schemata_validation::RuleSet;
///
/// let rules = RuleSet::new()
///     .rule("required", true)
///     .rule("minLength", 3)
///     .rule_with_message("match", r"^[a-z]+$", "lowercase only");
///
/// assert_eq!(rules.names().collect::<Vec<_>>(), ["required", "minLength", "match"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<RuleSpec>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a set holding only `required`
    pub fn required() -> Self {
        Self::new().rule(REQUIRED_RULE, true)
    }

    /// Append a rule
    pub fn rule(self, name: impl Into<String>, param: impl Into<Param>) -> Self {
        self.with(RuleSpec::new(name, param))
    }

    /// Append a rule with a custom failure message
    pub fn rule_with_message(
        self,
        name: impl Into<String>,
        param: impl Into<Param>,
        message: impl Into<String>,
    ) -> Self {
        self.with(RuleSpec::new(name, param).with_message(message))
    }

    pub fn with(mut self, spec: RuleSpec) -> Self {
        self.push(spec);
        self
    }

    pub fn push(&mut self, spec: RuleSpec) {
        self.rules.push(spec);
    }

    pub fn get(&self, name: &str) -> Option<&RuleSpec> {
        self.rules.iter().find(|spec| spec.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|spec| spec.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleSpec> {
        self.rules.iter()
    }

    /// Evaluation order: every `required` spec, then the rest as declared.
    pub fn evaluation_order(&self) -> impl Iterator<Item = &RuleSpec> {
        let required = self.rules.iter().filter(|spec| spec.is_required());
        let rest = self.rules.iter().filter(|spec| !spec.is_required());
        required.chain(rest)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a RuleSpec;
    type IntoIter = std::slice::Iter<'a, RuleSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl FromIterator<RuleSpec> for RuleSet {
    fn from_iter<I: IntoIterator<Item = RuleSpec>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
