//! Assertion types and builders for verifying step results.

use vigil_constraint::{Validated, ValidationError, ValidationResult};
use vigil_core::Value;

use crate::error::{ScenarioError, ScenarioResult};

/// Expected outcome of one validation step.
///
/// Field paths are dotted field names with optional list indexes, as in
/// `items[1].id`; the empty path is the validated value itself.
#[derive(Default)]
pub struct Assertion {
    pub ok: bool,
    pub error: Option<String>,
    pub error_path: Option<String>,
    pub structural: bool,

    /// (path, check name, passed)
    pub checks: Vec<(String, String, bool)>,
    /// (path, exact set of check names)
    pub check_keys: Vec<(String, Vec<String>)>,
    pub unwrapped: Vec<String>,
    pub value: Option<Value>,

    #[allow(clippy::type_complexity)]
    pub custom: Option<Box<dyn Fn(&Validated) -> bool + Send + Sync>>,
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assertion")
            .field("ok", &self.ok)
            .field("error", &self.error)
            .field("error_path", &self.error_path)
            .field("checks", &self.checks)
            .field("check_keys", &self.check_keys)
            .field("unwrapped", &self.unwrapped)
            .field("value", &self.value)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Assertion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect validation to succeed.
    pub fn ok(mut self) -> Self {
        self.ok = true;
        self
    }

    /// Expect validation to abort with this constraint message.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Expect the abort to happen at this path, e.g. `Foo.bar`.
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.error_path = Some(path.into());
        self
    }

    /// Expect a type mismatch, unknown class or depth error.
    pub fn structural_error(mut self) -> Self {
        self.structural = true;
        self
    }

    pub fn check(mut self, path: impl Into<String>, name: impl Into<String>, passed: bool) -> Self {
        self.ok = true;
        self.checks.push((path.into(), name.into(), passed));
        self
    }

    pub fn check_keys(mut self, path: impl Into<String>, names: &[&str]) -> Self {
        self.ok = true;
        self.check_keys
            .push((path.into(), names.iter().map(|n| n.to_string()).collect()));
        self
    }

    /// Expect the node at `path` to carry no checks map.
    pub fn unwrapped(mut self, path: impl Into<String>) -> Self {
        self.ok = true;
        self.unwrapped.push(path.into());
        self
    }

    /// Expect the validated tree, with wrappers stripped, to equal `value`.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.ok = true;
        self.value = Some(value.into());
        self
    }

    pub fn custom<F>(mut self, f: F) -> Self
    where
        F: Fn(&Validated) -> bool + Send + Sync + 'static,
    {
        self.ok = true;
        self.custom = Some(Box::new(f));
        self
    }

    /// Verify the assertion against a validation result.
    pub fn verify(&self, step: &str, result: &ValidationResult<Validated>) -> ScenarioResult<()> {
        match result {
            Err(err) => self.verify_error(step, err),
            Ok(validated) => self.verify_success(step, validated),
        }
    }

    fn verify_error(&self, step: &str, err: &ValidationError) -> ScenarioResult<()> {
        if self.ok || (self.error.is_none() && !self.structural) {
            return Err(ScenarioError::assertion_failed(
                step,
                format!("expected success, got error: {}", err),
            ));
        }
        if self.structural
            && (err.is_assertion() || matches!(err, ValidationError::Evaluation { .. }))
        {
            return Err(ScenarioError::assertion_failed(
                step,
                format!("expected a structural error, got: {}", err),
            ));
        }
        if let Some(expected) = &self.error {
            if err.message() != expected.as_str() {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error '{}', got: {}", expected, err),
                ));
            }
        }
        if let Some(expected) = &self.error_path {
            let found = err.path().map(ToString::to_string).unwrap_or_default();
            if &found != expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error at '{}', got it at '{}'", expected, found),
                ));
            }
        }
        Ok(())
    }

    fn verify_success(&self, step: &str, validated: &Validated) -> ScenarioResult<()> {
        if let Some(expected) = &self.error {
            return Err(ScenarioError::assertion_failed(
                step,
                format!("expected error '{}', but validation succeeded", expected),
            ));
        }
        if self.structural {
            return Err(ScenarioError::assertion_failed(
                step,
                "expected a structural error, but validation succeeded",
            ));
        }

        for (path, name, passed) in &self.checks {
            let found = lookup(step, validated, path)?
                .checks()
                .and_then(|checks| checks.passed(name));
            if found != Some(*passed) {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!(
                        "expected check '{}' at '{}' to be {}, got {:?}",
                        name, path, passed, found
                    ),
                ));
            }
        }

        for (path, expected) in &self.check_keys {
            let node = lookup(step, validated, path)?;
            let mut found: Vec<String> = node
                .checks()
                .map(|checks| checks.names().map(str::to_string).collect())
                .unwrap_or_default();
            let mut expected = expected.clone();
            found.sort();
            expected.sort();
            if found != expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected checks {:?} at '{}', got {:?}", expected, path, found),
                ));
            }
        }

        for path in &self.unwrapped {
            if lookup(step, validated, path)?.is_checked() {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected '{}' to be unwrapped", path),
                ));
            }
        }

        if let Some(expected) = &self.value {
            let found = validated.clone().into_value();
            if &found != expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected value {}, got {}", expected, found),
                ));
            }
        }

        if let Some(custom) = &self.custom {
            if !custom(validated) {
                return Err(ScenarioError::assertion_failed(
                    step,
                    "custom assertion returned false",
                ));
            }
        }

        Ok(())
    }
}

fn lookup<'v>(step: &str, validated: &'v Validated, path: &str) -> ScenarioResult<&'v Validated> {
    node_at(validated, path).ok_or_else(|| {
        ScenarioError::assertion_failed(step, format!("no node at path '{}'", path))
    })
}

/// Find the node at a dotted path such as `items[1].id`.
pub fn node_at<'v>(validated: &'v Validated, path: &str) -> Option<&'v Validated> {
    let mut node = validated;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let (name, indexes) = match segment.find('[') {
            Some(pos) => segment.split_at(pos),
            None => (segment, ""),
        };
        if !name.is_empty() {
            node = node.field(name)?;
        }
        for index in indexes
            .split(|c| c == '[' || c == ']')
            .filter(|s| !s.is_empty())
        {
            node = node.index(index.parse().ok()?)?;
        }
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_at_walks_fields_and_indexes() {
        let tree = Validated::Object {
            type_name: "Catalog".into(),
            fields: vec![(
                "items".into(),
                Validated::List(vec![
                    Validated::Scalar(Value::Int(1)),
                    Validated::Scalar(Value::Int(2)),
                ]),
            )],
        };

        assert_eq!(
            node_at(&tree, "items[1]").and_then(Validated::as_scalar),
            Some(&Value::Int(2))
        );
        assert_eq!(node_at(&tree, ""), Some(&tree));
        assert!(node_at(&tree, "missing").is_none());
        assert!(node_at(&tree, "items[5]").is_none());
    }

    #[test]
    fn test_error_expectation_on_success_fails() {
        let assertion = Assertion::new().error("bar_range");
        let result = Ok(Validated::Scalar(Value::Int(5)));

        assert!(assertion.verify("step", &result).is_err());
    }
}
