// Typed schema: fields, traversal kinds and optionality

use crate::RuleSet;

/// How a field's value is traversed.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    /// A single value checked against a rule set
    Scalar(RuleSet),
    /// A sub-object walked with a nested schema
    Object(Schema),
    /// A collection whose every element is walked with a nested schema
    ArrayOfObjects {
        schema: Schema,
        /// Element property whose value keys the element's errors
        index_by: Option<String>,
    },
    /// A collection whose every element is checked against a rule set
    ArrayOfValues {
        rules: RuleSet,
        index_by: Option<String>,
    },
}

impl SchemaNode {
    /// Rule set of a leaf node
    pub fn rules(&self) -> Option<&RuleSet> {
        match self {
            SchemaNode::Scalar(rules) | SchemaNode::ArrayOfValues { rules, .. } => Some(rules),
            SchemaNode::Object(_) | SchemaNode::ArrayOfObjects { .. } => None,
        }
    }

    /// Nested schema of an object or array-of-objects node
    pub fn schema(&self) -> Option<&Schema> {
        match self {
            SchemaNode::Object(schema) | SchemaNode::ArrayOfObjects { schema, .. } => Some(schema),
            SchemaNode::Scalar(_) | SchemaNode::ArrayOfValues { .. } => None,
        }
    }

    pub fn index_by(&self) -> Option<&str> {
        match self {
            SchemaNode::ArrayOfObjects { index_by, .. }
            | SchemaNode::ArrayOfValues { index_by, .. } => index_by.as_deref(),
            SchemaNode::Scalar(_) | SchemaNode::Object(_) => None,
        }
    }

    /// Short name of the traversal kind, for logs and messages
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaNode::Scalar(_) => "scalar",
            SchemaNode::Object(_) => "object",
            SchemaNode::ArrayOfObjects { .. } => "array of objects",
            SchemaNode::ArrayOfValues { .. } => "array of values",
        }
    }

    /// Precedence when a path segment names several fields; lower wins.
    pub(crate) fn path_rank(&self) -> u8 {
        match self {
            SchemaNode::Scalar(_) => 0,
            SchemaNode::ArrayOfObjects { .. } => 1,
            SchemaNode::ArrayOfValues { .. } => 2,
            SchemaNode::Object(_) => 3,
        }
    }
}

/// One named entry of a [`Schema`].
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub node: SchemaNode,
    /// An absent optional field produces no error
    pub optional: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, node: SchemaNode) -> Self {
        Self {
            name: name.into(),
            node,
            optional: false,
        }
    }

    pub fn scalar(name: impl Into<String>, rules: RuleSet) -> Self {
        Self::new(name, SchemaNode::Scalar(rules))
    }

    pub fn object(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, SchemaNode::Object(schema))
    }

    pub fn array(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(
            name,
            SchemaNode::ArrayOfObjects {
                schema,
                index_by: None,
            },
        )
    }

    pub fn values(name: impl Into<String>, rules: RuleSet) -> Self {
        Self::new(
            name,
            SchemaNode::ArrayOfValues {
                rules,
                index_by: None,
            },
        )
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Key element errors by `property` instead of position. Ignored for
    /// scalar and object fields.
    pub fn index_by(mut self, property: impl Into<String>) -> Self {
        match &mut self.node {
            SchemaNode::ArrayOfObjects { index_by, .. }
            | SchemaNode::ArrayOfValues { index_by, .. } => *index_by = Some(property.into()),
            SchemaNode::Scalar(_) | SchemaNode::Object(_) => {}
        }
        self
    }
}

/// Ordered set of fields describing one object level.
///
/// ```
/// use schemata_validation::{Field, RuleSet, Schema};
///
/// let schema = Schema::new()
///     .field(Field::scalar("email", RuleSet::required()))
///     .field(
///         Field::array("items", Schema::new().scalar("sku", RuleSet::required()))
///             .index_by("sku"),
///     )
///     .field(Field::object("address", Schema::new().scalar("city", RuleSet::required())).optional());
///
/// assert_eq!(schema.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.push(field);
        self
    }

    /// Shorthand for a required-by-default scalar field
    pub fn scalar(self, name: impl Into<String>, rules: RuleSet) -> Self {
        self.field(Field::scalar(name, rules))
    }

    pub fn object(self, name: impl Into<String>, schema: Schema) -> Self {
        self.field(Field::object(name, schema))
    }

    pub fn array(self, name: impl Into<String>, schema: Schema) -> Self {
        self.field(Field::array(name, schema))
    }

    pub fn values(self, name: impl Into<String>, rules: RuleSet) -> Self {
        self.field(Field::values(name, rules))
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Field used when a path segment names `name`, following scalar,
    /// array of objects, array of values, object precedence.
    pub fn resolve(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .filter(|field| field.name == name)
            .min_by_key(|field| field.node.path_rank())
    }

    /// Every rule name referenced anywhere below this schema
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_rule_names(&mut names);
        names.sort_unstable();
        names.dedup();
        names
    }

    fn collect_rule_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        for field in &self.fields {
            match &field.node {
                SchemaNode::Scalar(rules) | SchemaNode::ArrayOfValues { rules, .. } => {
                    names.extend(rules.names())
                }
                SchemaNode::Object(schema) | SchemaNode::ArrayOfObjects { schema, .. } => {
                    schema.collect_rule_names(names)
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
