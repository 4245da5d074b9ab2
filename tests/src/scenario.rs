//! Scenario definition and runner.

use vigil_constraint::{Validator, ValidatorConfig};
use vigil_core::{FieldType, Value};
use vigil_registry::Schema;

use crate::assertion::Assertion;
use crate::error::{ScenarioError, ScenarioResult};

/// A single validation step.
#[derive(Debug)]
pub struct Step {
    pub name: String,
    pub field_type: FieldType,
    pub value: Value,
    pub assertion: Assertion,
}

/// A schema and the steps run against it.
#[derive(Debug)]
pub struct Scenario {
    name: String,
    schema: Option<Schema>,
    config: ValidatorConfig,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            config: ValidatorConfig::default(),
            steps: Vec::new(),
        }
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate `value` as an instance of `class`.
    pub fn step<F>(self, name: &str, class: &str, value: impl Into<Value>, f: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        self.typed_step(name, FieldType::class(class), value, f)
    }

    /// Validate `value` against an arbitrary root type.
    pub fn typed_step<F>(
        mut self,
        name: &str,
        field_type: FieldType,
        value: impl Into<Value>,
        f: F,
    ) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        self.steps.push(Step {
            name: name.to_string(),
            field_type,
            value: value.into(),
            assertion: f(Assertion::new()),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step in order, stopping at the first failed assertion.
    pub fn run(&self) -> ScenarioResult<()> {
        let schema = self
            .schema
            .as_ref()
            .ok_or_else(|| ScenarioError::MissingSchema(self.name.clone()))?;
        let validator = Validator::new(schema, self.config.clone());

        for step in &self.steps {
            let result = validator.validate(&step.field_type, &step.value);
            step.assertion
                .verify(&format!("{}:{}", self.name, step.name), &result)?;
        }
        Ok(())
    }
}
