// Rule registry

use crate::validators::{Match, MaxLength, MinLength, Required, SameAs};
use crate::{ConfigurationError, FnRule, Param, Result, Rule, Verdict};
use once_cell::sync::Lazy;
use schemata_log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type RuleRef = Arc<dyn Rule>;

static BUILTINS: Lazy<RuleRegistry> = Lazy::new(|| {
    let mut registry = RuleRegistry::empty();
    registry
        .register_rule(Required)
        .register_rule(Match)
        .register_rule(SameAs)
        .register_rule(MinLength)
        .register_rule(MaxLength);
    registry
});

/// Mapping from rule name to predicate.
///
/// A registry is an ordinary value: clone it, extend it and hand it to a
/// [`Validator`](crate::Validator). Mutation needs `&mut self`, so a registry
/// shared across threads behind `&` is read-only.
#[derive(Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, RuleRef>,
}

impl RuleRegistry {
    /// Registry holding the built-in rules
    pub fn new() -> Self {
        BUILTINS.clone()
    }

    /// Registry with no rules at all
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Install or replace a closure rule under `name`.
    ///
    /// ```
    /// use schemata_validation::{RuleRegistry, Verdict};
    /// use serde_json::json;
    ///
    /// let mut registry = RuleRegistry::new();
    /// registry.register("even", |value, _param, _ctx| match value.as_i64() {
    ///     Some(n) if n % 2 != 0 => Verdict::fail("must be even"),
    ///     _ => Verdict::Pass,
    /// });
    ///
    /// let verdict = registry.invoke("even", &json!(3), &true.into(), None).unwrap();
    /// assert_eq!(verdict, Verdict::fail("must be even"));
    /// ```
    pub fn register<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&Value, &Param, Option<&Value>) -> Verdict + Send + Sync + 'static,
    {
        self.register_rule(FnRule::new(name, func))
    }

    /// Install or replace a [`Rule`] under its own name
    pub fn register_rule<R: Rule + 'static>(&mut self, rule: R) -> &mut Self {
        self.insert(Arc::new(rule))
    }

    /// Install or replace an already shared rule
    pub fn insert(&mut self, rule: RuleRef) -> &mut Self {
        let name = rule.name().to_string();
        if self.rules.insert(name.clone(), rule).is_some() {
            debug!("Replaced validation rule '{}'", name);
        } else {
            debug!("Registered validation rule '{}'", name);
        }
        self
    }

    /// Remove a rule, returning it if it was present
    pub fn remove(&mut self, name: &str) -> Option<RuleRef> {
        self.rules.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&RuleRef> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up `name` and run it.
    pub fn invoke(
        &self,
        name: &str,
        value: &Value,
        param: &Param,
        context: Option<&Value>,
    ) -> Result<Verdict> {
        let rule = self.rules.get(name).ok_or_else(|| {
            warn!("Validation rule '{}' is not registered", name);
            ConfigurationError::UnknownRule(name.to_string())
        })?;
        rule.check(value, param, context)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}
