//! Validation properties that hold for every schema.
//!
//! These tests cover:
//! - Wrapper presence (assert-only fields are bare, checked fields wrapped)
//! - Checks map key sets
//! - Determinism
//! - Dependency short-circuit
//! - Fail-fast asserts and exhaustive checks
//! - Union variant binding

use pretty_assertions::assert_eq;
use vigil_tests::prelude::*;

mod wrappers {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("wrappers")
            .schema(fixtures::chain().unwrap())
            .step("assert_only_field_is_bare", "Chain", fixtures::chain_value(1, 2), |a| {
                a.unwrapped("a")
            })
            .step("checked_field_is_wrapped", "Chain", fixtures::chain_value(1, 2), |a| {
                a.check_keys("b", &["positive", "even", "small"])
            })
            .step("object_without_class_checks_is_bare", "Chain", fixtures::chain_value(1, 2), |a| {
                a.unwrapped("")
            })
    }

    #[test]
    fn test_wrapper_presence() {
        scenario().run().unwrap();
    }
}

mod check_keys {
    use super::*;

    pub fn scenario() -> Scenario {
        // The key set is the same whether every check passes or fails
        Scenario::new("check_keys")
            .schema(fixtures::chain().unwrap())
            .step("all_pass", "Chain", fixtures::chain_value(1, 4), |a| {
                a.check_keys("b", &["positive", "even", "small"])
                    .check("b", "positive", true)
                    .check("b", "even", true)
                    .check("b", "small", true)
            })
            .step("all_fail", "Chain", fixtures::chain_value(1, -101), |a| {
                a.check_keys("b", &["positive", "even", "small"])
                    .check("b", "positive", false)
                    .check("b", "even", false)
                    .check("b", "small", true)
            })
    }

    #[test]
    fn test_check_key_set_is_stable() {
        scenario().run().unwrap();
    }
}

mod determinism {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_same_input_same_result() {
        // GIVEN
        let schema = fixtures::shirt().unwrap();
        let validator = Validator::with_defaults(&schema);
        let value = fixtures::shirt_value("XL", "SLIM", Some("a note"));

        // WHEN
        let first = validator.validate_class("Shirt", &value);
        let second = validator.validate_class("Shirt", &value);

        // THEN
        assert_eq!(first, second);
        assert_eq!(
            first.unwrap().to_json(),
            second.unwrap().to_json()
        );
    }

    #[test]
    fn test_same_error_every_time() {
        let schema = fixtures::foo().unwrap();
        let validator = Validator::with_defaults(&schema);
        let value = fixtures::foo_value(15);

        let errors: Vec<_> = (0..5)
            .map(|_| validator.validate_class("Foo", &value).unwrap_err())
            .collect();

        assert!(errors.windows(2).all(|w| w[0] == w[1]));
    }
}

mod dependency_short_circuit {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("dependency_short_circuit")
            .schema(fixtures::ratio().unwrap())
            // ratio would divide by zero if it ran before divisor
            .step("failing_dependency_is_reported", "Ratio", fixtures::ratio_value(5, 0), |a| {
                a.error("non_zero").at("Ratio.divisor")
            })
            .step("dependent_runs_after_dependency_passes", "Ratio", fixtures::ratio_value(500, 2), |a| {
                a.error("ratio_bounded").at("Ratio.ratio")
            })
            .step("both_pass", "Ratio", fixtures::ratio_value(50, 2), |a| {
                a.value(fixtures::ratio_value(50, 2))
            })
    }

    #[test]
    fn test_dependency_short_circuit() {
        scenario().run().unwrap();
    }
}

mod chained_constraints {
    use super::*;
    use pretty_assertions::assert_eq;

    pub fn scenario() -> Scenario {
        Scenario::new("chained_constraints")
            .schema(fixtures::chain().unwrap())
            // `second` divides by `a`; reaching it with a = 0 would be an
            // evaluation error instead of the `first` failure
            .step("first_assert_stops_the_chain", "Chain", fixtures::chain_value(0, 2), |a| {
                a.error("first").at("Chain.a")
            })
            .step("second_assert_runs_when_first_passes", "Chain", fixtures::chain_value(20, 2), |a| {
                a.error("second").at("Chain.a")
            })
            .step("every_check_runs", "Chain", fixtures::chain_value(1, -3), |a| {
                a.check("b", "positive", false)
                    .check("b", "even", false)
                    .check("b", "small", true)
            })
    }

    #[test]
    fn test_asserts_fail_fast_checks_are_exhaustive() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_evaluation_error_in_check_is_fatal() {
        // GIVEN a check that divides by the field
        let mut builder = SchemaBuilder::new();
        builder
            .add_class("Div")
            .field(FieldDef::new("n", FieldType::int()).check("inverse_small", "1 / this < 1"))
            .done()
            .unwrap();
        let schema = builder.build().unwrap();
        let validator = Validator::with_defaults(&schema);

        // WHEN
        let err = validator
            .validate_class("Div", &object!("Div", { "n" => 0 }).into())
            .unwrap_err();

        // THEN
        assert!(matches!(err, ValidationError::Evaluation { .. }));
        assert_eq!(err.message(), "inverse_small");
        assert_eq!(err.path().unwrap().to_string(), "Div.n");
    }
}

mod union_binding {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("union_binding")
            .schema(fixtures::shirt().unwrap())
            .step("label_skips_number_constraints", "Shirt", fixtures::shirt_value("M", "REGULAR", None), |a| {
                a.check_keys("size", &["known_label"])
                    .check("size", "known_label", true)
            })
            .step("number_skips_label_check", "Shirt", fixtures::shirt_value(41, "REGULAR", None), |a| {
                a.check_keys("size", &["even_size"])
                    .check("size", "even_size", false)
            })
            .step("bound_assert_applies_to_its_variant", "Shirt", fixtures::shirt_value(70, "REGULAR", None), |a| {
                a.error("size_range").at("Shirt.size")
            })
            .step("bound_assert_ignores_other_variant", "Shirt", fixtures::shirt_value("XXL", "REGULAR", None), |a| {
                a.check("size", "known_label", false)
            })
    }

    #[test]
    fn test_variant_bound_constraints() {
        scenario().run().unwrap();
    }
}
