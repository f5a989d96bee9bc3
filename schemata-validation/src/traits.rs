// Rule traits

use crate::{Param, Result, Verdict};
use serde_json::Value;

/// A named validation predicate stored in a [`RuleRegistry`](crate::RuleRegistry).
///
/// `context` is the object containing the value (for array elements, the
/// object containing the array), or `None` when validating a value on its
/// own. Implementations must be pure: the engine stops at the first failing
/// rule and assumes that is indistinguishable from evaluating all of them.
pub trait Rule: Send + Sync {
    /// Registry name
    fn name(&self) -> &str;

    /// Check a value. Errors are reserved for misconfiguration such as a
    /// parameter of the wrong shape.
    fn check(&self, value: &Value, param: &Param, context: Option<&Value>) -> Result<Verdict>;
}

/// Adapter turning a closure into a [`Rule`].
pub struct FnRule<F> {
    name: String,
    func: F,
}

impl<F> FnRule<F>
where
    F: Fn(&Value, &Param, Option<&Value>) -> Verdict + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Rule for FnRule<F>
where
    F: Fn(&Value, &Param, Option<&Value>) -> Verdict + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, value: &Value, param: &Param, context: Option<&Value>) -> Result<Verdict> {
        Ok((self.func)(value, param, context))
    }
}

/// Types that can be validated against a schema through serde.
pub trait Validate {
    fn validate_with(
        &self,
        validator: &crate::Validator,
        schema: &crate::Schema,
    ) -> Result<crate::Outcome>;
}

impl<T: serde::Serialize> Validate for T {
    fn validate_with(
        &self,
        validator: &crate::Validator,
        schema: &crate::Schema,
    ) -> Result<crate::Outcome> {
        validator.validate_serialize(self, schema)
    }
}
