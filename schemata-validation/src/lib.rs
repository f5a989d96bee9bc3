//! Schema-driven validation of nested data
//!
//! A [`Schema`] describes, field by field, how a `serde_json::Value` is
//! walked (scalar, nested object, array of objects, array of values) and
//! which named rules each leaf must satisfy. A [`Validator`] walks the data,
//! invokes rules from its [`RuleRegistry`] and returns an [`Outcome`] whose
//! error tree mirrors the schema.
//!
//! # Examples
//!
//! ## Building a schema in code
//!
//! ```
//! use schemata_validation::{Field, RuleSet, Schema, Validator};
//! use serde_json::json;
//!
//! let schema = Schema::new()
//!     .scalar("username", RuleSet::required().rule("minLength", 3))
//!     .scalar("confirm", RuleSet::required().rule("sameAs", "password"))
//!     .scalar("password", RuleSet::required())
//!     .field(
//!         Field::array("items", Schema::new().scalar("qty", RuleSet::required()))
//!             .index_by("sku"),
//!     );
//!
//! let data = json!({
//!     "username": "jo",
//!     "password": "hunter2",
//!     "confirm": "hunter2",
//!     "items": [{"sku": "A-1", "qty": 2}, {"sku": "B-9", "qty": 0}]
//! });
//!
//! let outcome = Validator::new().validate(&data, &schema).unwrap();
//! assert_eq!(
//!     outcome.to_json(),
//!     json!({
//!         "username": "has length less than minimal 3 chars",
//!         "items": {"B-9": {"qty": "is required."}}
//!     })
//! );
//! ```
//!
//! ## Suffix-encoded schemas
//!
//! ```
//! use schemata_validation::Validator;
//! use serde_json::json;
//!
//! let validator = Validator::new();
//! let schema = validator
//!     .schema_from_value(&json!({
//!         "email": {"required": true, "match": ["/^\\S+@\\S+$/", "not an email"]},
//!         "tags[v]": {"__optional": true, "maxLength": 12},
//!         "profile{}": {"bio": {"optional": true, "maxLength": 140}}
//!     }))
//!     .unwrap();
//!
//! let outcome = validator
//!     .validate(&json!({"email": "nope", "profile": {}}), &schema)
//!     .unwrap();
//! assert_eq!(outcome.to_json(), json!({"email": "not an email"}));
//! ```
//!
//! ## Custom rules
//!
//! ```
//! use schemata_validation::{RuleSet, Schema, Validator, Verdict};
//! use serde_json::json;
//!
//! let mut validator = Validator::new();
//! validator.add_validator("oneOf", |value, param, _ctx| {
//!     let allowed = param.as_value().and_then(|p| p.as_array());
//!     match allowed {
//!         Some(list) if !list.contains(value) => Verdict::fail("is not an allowed value"),
//!         _ => Verdict::Pass,
//!     }
//! });
//!
//! let schema = Schema::new().scalar("role", RuleSet::new().rule("oneOf", json!(["admin", "user"])));
//! let verdict = validator.validate_field(&json!("root"), "role", &schema).unwrap();
//! assert_eq!(verdict, Verdict::fail("is not an allowed value"));
//! ```

mod errors;
mod loader;
mod path;
mod registry;
mod rules;
mod schema;
mod settings;
mod syntax;
mod traits;
mod tree;
mod validators;
mod walker;

pub use errors::*;
pub use loader::{FileFormat, load_file};
pub use path::resolve;
pub use registry::*;
pub use rules::*;
pub use schema::*;
pub use settings::*;
pub use syntax::compile_pattern;
pub use traits::*;
pub use tree::*;
pub use validators::*;
pub use walker::*;
