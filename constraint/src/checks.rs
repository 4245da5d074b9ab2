//! Results of check constraints.

use serde_json::{json, Map, Value as Json};

/// Outcome of one check constraint, keyed by its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// The check's declared message.
    pub name: String,
    /// Source text of the check, when the validator is configured to keep it.
    pub expression: Option<String>,
    pub passed: bool,
}

impl CheckResult {
    pub fn new(name: impl Into<String>, passed: bool) -> Self {
        Self {
            name: name.into(),
            expression: None,
            passed,
        }
    }

    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// `"succeeded"` or `"failed"`.
    pub fn status(&self) -> &'static str {
        if self.passed {
            "succeeded"
        } else {
            "failed"
        }
    }

    pub fn to_json(&self) -> Json {
        let mut out = json!({ "name": self.name, "status": self.status() });
        if let Some(expression) = &self.expression {
            out["expression"] = Json::String(expression.clone());
        }
        out
    }
}

/// The checks map of one field or one class, in evaluation order.
///
/// Holds only the checks that applied to the live value; checks bound to
/// another union variant are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checks {
    results: Vec<CheckResult>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Result of the check declared with this message.
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Shorthand for `get(name).map(|r| r.passed)`.
    pub fn passed(&self, name: &str) -> Option<bool> {
        self.get(name).map(|r| r.passed)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CheckResult> {
        self.results.iter()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn to_json(&self) -> Json {
        let mut map = Map::new();
        for result in &self.results {
            map.insert(result.name.clone(), result.to_json());
        }
        Json::Object(map)
    }
}

impl IntoIterator for Checks {
    type Item = CheckResult;
    type IntoIter = std::vec::IntoIter<CheckResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a Checks {
    type Item = &'a CheckResult;
    type IntoIter = std::slice::Iter<'a, CheckResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_failures() {
        let mut checks = Checks::new();
        checks.push(CheckResult::new("positive", true));
        checks.push(CheckResult::new("small", false).with_expression("this < 10"));

        assert_eq!(checks.len(), 2);
        assert_eq!(checks.passed("positive"), Some(true));
        assert_eq!(checks.passed("small"), Some(false));
        assert_eq!(checks.passed("absent"), None);
        assert!(!checks.all_passed());
        assert_eq!(
            checks.failed().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["small"]
        );
        assert_eq!(checks.names().collect::<Vec<_>>(), vec!["positive", "small"]);
    }

    #[test]
    fn test_to_json() {
        let mut checks = Checks::new();
        checks.push(CheckResult::new("small", false).with_expression("this < 10"));
        checks.push(CheckResult::new("even", true));

        assert_eq!(
            checks.to_json(),
            json!({
                "small": { "name": "small", "expression": "this < 10", "status": "failed" },
                "even": { "name": "even", "status": "succeeded" },
            })
        );
    }

    #[test]
    fn test_empty_checks_pass() {
        let checks = Checks::new();
        assert!(checks.is_empty());
        assert!(checks.all_passed());
        assert_eq!(checks.to_json(), json!({}));
    }
}
