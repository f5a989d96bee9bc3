// Validation results: per-value verdicts and the nested error tree

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Result of checking one value against one rule or one rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(String),
}

impl Verdict {
    pub fn fail(message: impl Into<String>) -> Self {
        Verdict::Fail(message.into())
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn is_fail(&self) -> bool {
        !self.is_pass()
    }

    /// The failure message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(message) => Some(message),
        }
    }
}

/// One entry of an [`ErrorTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorNode {
    /// Failure message of a scalar value
    Message(String),
    /// Errors below a nested object or array
    Nested(ErrorTree),
}

impl ErrorNode {
    pub fn as_message(&self) -> Option<&str> {
        match self {
            ErrorNode::Message(message) => Some(message),
            ErrorNode::Nested(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&ErrorTree> {
        match self {
            ErrorNode::Message(_) => None,
            ErrorNode::Nested(tree) => Some(tree),
        }
    }
}

/// Errors keyed by field name, array position or index-field value.
///
/// The walker only inserts failing entries and never inserts an empty
/// nested tree, so a tree reachable from [`Outcome::Invalid`] is never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorTree {
    entries: BTreeMap<String, ErrorNode>,
}

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous entry under the same key
    pub fn insert(&mut self, key: impl Into<String>, node: ErrorNode) {
        self.entries.insert(key.into(), node);
    }

    pub fn get(&self, key: &str) -> Option<&ErrorNode> {
        self.entries.get(key)
    }

    /// Message stored directly under `key`
    pub fn message(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ErrorNode::as_message)
    }

    /// Nested tree stored under `key`
    pub fn nested(&self, key: &str) -> Option<&ErrorTree> {
        self.get(key).and_then(ErrorNode::as_tree)
    }

    /// Follow a dotted key path down the tree
    ///
    /// ```
    /// use schemata_validation::{ErrorNode, ErrorTree};
    ///
    /// let mut inner = ErrorTree::new();
    /// inner.insert("city", ErrorNode::Message("is required.".into()));
    /// let mut tree = ErrorTree::new();
    /// tree.insert("address", ErrorNode::Nested(inner));
    ///
    /// assert_eq!(
    ///     tree.lookup("address.city").and_then(|n| n.as_message()),
    ///     Some("is required.")
    /// );
    /// ```
    pub fn lookup(&self, path: &str) -> Option<&ErrorNode> {
        let mut segments = path.split('.');
        let mut node = self.get(segments.next()?)?;
        for segment in segments {
            node = node.as_tree()?.get(segment)?;
        }
        Some(node)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ErrorNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of failing leaf values anywhere in the tree
    pub fn leaf_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                ErrorNode::Message(_) => 1,
                ErrorNode::Nested(tree) => tree.leaf_count(),
            })
            .sum()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn write_lines(&self, prefix: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, node) in &self.entries {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            match node {
                ErrorNode::Message(message) => writeln!(f, "{}: {}", path, message)?,
                ErrorNode::Nested(tree) => tree.write_lines(&path, f)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_lines("", f)
    }
}

impl<'a> IntoIterator for &'a ErrorTree {
    type Item = (&'a String, &'a ErrorNode);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ErrorNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Result of validating a whole data value against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid(ErrorTree),
}

impl Outcome {
    /// `Valid` for an empty tree, `Invalid` otherwise
    pub fn from_tree(tree: Option<ErrorTree>) -> Self {
        match tree {
            Some(tree) if !tree.is_empty() => Outcome::Invalid(tree),
            _ => Outcome::Valid,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    pub fn errors(&self) -> Option<&ErrorTree> {
        match self {
            Outcome::Valid => None,
            Outcome::Invalid(tree) => Some(tree),
        }
    }

    pub fn into_errors(self) -> Option<ErrorTree> {
        match self {
            Outcome::Valid => None,
            Outcome::Invalid(tree) => Some(tree),
        }
    }

    /// Legacy encoding: `false` when valid, the nested error map otherwise
    pub fn to_json(&self) -> Value {
        match self {
            Outcome::Valid => Value::Bool(false),
            Outcome::Invalid(tree) => tree.to_json(),
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Valid => serializer.serialize_bool(false),
            Outcome::Invalid(tree) => tree.serialize(serializer),
        }
    }
}
