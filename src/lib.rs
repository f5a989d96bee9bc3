// Schemata - schema-driven validation of nested data
//
// This library walks objects and arrays against a declarative schema,
// applies named rules from an injectable registry and reports failures in
// an error tree shaped like the schema.

// Re-export the validation engine
pub use schemata_validation::*;

// Re-export logging so applications can tune verbosity
pub use schemata_log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ConfigurationError,
        ErrorTree,
        Field,
        Outcome,
        // Rule plumbing
        Param,
        Rule,
        RuleRegistry,
        RuleSet,
        Schema,
        Validate,
        Validator,
        ValidatorSettings,
        Verdict,
    };
}
