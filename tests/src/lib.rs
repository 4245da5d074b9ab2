//! Integration test framework for Vigil.
//!
//! A `Scenario` pairs a schema with named steps. Each step validates one
//! value and verifies the outcome against an `Assertion`:
//!
//! ```ignore
//! Scenario::new("bar_range")
//!     .schema(fixtures::foo().unwrap())
//!     .step("in_range", "Foo", fixtures::foo_value(5), |a| a.ok().unwrapped("bar"))
//!     .step("out_of_range", "Foo", fixtures::foo_value(15), |a| a.error("bar_range"))
//!     .run()
//!     .unwrap();
//! ```

mod assertion;
mod error;
pub mod fixtures;
mod scenario;

pub use assertion::{node_at, Assertion};
pub use error::{ScenarioError, ScenarioResult};
pub use scenario::Scenario;

pub mod prelude {
    pub use crate::fixtures;
    pub use crate::{node_at, Assertion, Scenario, ScenarioError, ScenarioResult};
    pub use vigil_constraint::{
        CheckResult, Checks, FieldPath, Validated, ValidationError, Validator, ValidatorConfig,
    };
    pub use vigil_core::{map, object, FieldType, TypeTag, Value};
    pub use vigil_registry::{FieldDef, Schema, SchemaBuilder, SchemaError};
}
