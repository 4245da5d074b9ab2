//! End-to-end validation scenarios.
//!
//! These tests cover:
//! - A bounded integer field
//! - Uniqueness across a list of objects
//! - A failing check next to a passing assert
//! - Optional fields, enums and class-level checks
//! - JSON rendering of validated output

use pretty_assertions::assert_eq;
use serde_json::json;
use vigil_tests::prelude::*;

mod bounded_field {
    use super::*;
    use pretty_assertions::assert_eq;

    pub fn scenario() -> Scenario {
        Scenario::new("bounded_field")
            .schema(fixtures::foo().unwrap())
            .step("in_range", "Foo", fixtures::foo_value(5), |a| {
                a.unwrapped("bar").value(fixtures::foo_value(5))
            })
            .step("above_range", "Foo", fixtures::foo_value(15), |a| {
                a.error("bar_range").at("Foo.bar")
            })
            .step("lower_bound_is_exclusive", "Foo", fixtures::foo_value(0), |a| {
                a.error("bar_range")
            })
            .step("wrong_type", "Foo", object!("Foo", { "bar" => "5" }), |a| {
                a.structural_error().at("Foo.bar")
            })
    }

    #[test]
    fn test_bounded_field() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_error_carries_declared_message() {
        let schema = fixtures::foo().unwrap();
        let validator = Validator::with_defaults(&schema);

        let err = validator
            .validate_class("Foo", &fixtures::foo_value(15))
            .unwrap_err();

        assert_eq!(
            err,
            ValidationError::AssertionFailed {
                message: "bar_range".into(),
                path: FieldPath::new("Foo").field("bar"),
                expression: Some("0 < this < 10".into()),
            }
        );
    }
}

mod uniqueness {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("uniqueness")
            .schema(fixtures::catalog().unwrap())
            .step(
                "distinct_ids",
                "Catalog",
                fixtures::catalog_value(vec![
                    fixtures::item(1, "pen"),
                    fixtures::item(2, "ink"),
                    fixtures::item(3, "pad"),
                ]),
                |a| a.unwrapped("items[2]"),
            )
            .step(
                "duplicate_ids",
                "Catalog",
                fixtures::catalog_value(vec![
                    fixtures::item(1, "pen"),
                    fixtures::item(2, "ink"),
                    fixtures::item(1, "pad"),
                ]),
                |a| a.error("unique_ids").at("Catalog"),
            )
            // Element constraints run before the class-level one
            .step(
                "element_failure_comes_first",
                "Catalog",
                fixtures::catalog_value(vec![
                    fixtures::item(1, "pen"),
                    fixtures::item(1, "ink"),
                    fixtures::item(3, ""),
                ]),
                |a| a.error("has_name").at("Catalog.items[2].name"),
            )
    }

    #[test]
    fn test_uniqueness_across_list() {
        scenario().run().unwrap();
    }
}

mod citation {
    use super::*;
    use pretty_assertions::assert_eq;

    pub fn scenario() -> Scenario {
        Scenario::new("citation")
            .schema(fixtures::citation().unwrap())
            .step(
                "empty_quote_is_recorded",
                "Citation",
                fixtures::citation_value("", "https://example.com"),
                |a| {
                    a.check_keys("quote", &["exact_citation_not_found"])
                        .check("quote", "exact_citation_not_found", false)
                        .unwrapped("website_link")
                },
            )
            .step(
                "quote_found",
                "Citation",
                fixtures::citation_value("to be or not to be", "http://example.com"),
                |a| a.check("quote", "exact_citation_not_found", true),
            )
            .step(
                "bad_link_aborts",
                "Citation",
                fixtures::citation_value("", "ftp://example.com"),
                |a| a.error("invalid_link").at("Citation.website_link"),
            )
    }

    #[test]
    fn test_citation() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_citation_json() {
        let schema = fixtures::citation().unwrap();
        let validator = Validator::with_defaults(&schema);

        let validated = validator
            .validate_class("Citation", &fixtures::citation_value("", "https://example.com"))
            .unwrap();

        assert_eq!(
            validated.to_json(),
            json!({
                "quote": {
                    "value": "",
                    "checks": {
                        "exact_citation_not_found": {
                            "name": "exact_citation_not_found",
                            "expression": "this|length > 0",
                            "status": "failed",
                        }
                    }
                },
                "website_link": "https://example.com",
            })
        );
    }
}

mod shirt {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("shirt")
            .schema(fixtures::shirt().unwrap())
            .step("missing_optional_note", "Shirt", object!("Shirt", {
                "size" => "M",
                "fit" => Value::enum_variant("Fit", "REGULAR"),
            }), |a| a.check("note", "short_note", true))
            .step("long_note", "Shirt", fixtures::shirt_value("M", "REGULAR", Some("a note well over twenty characters")), |a| {
                a.check("note", "short_note", false)
            })
            .step("class_check_wraps_object", "Shirt", fixtures::shirt_value("L", "SLIM", None), |a| {
                a.check("", "slim_small", false)
            })
            .step("class_check_passes", "Shirt", fixtures::shirt_value("S", "SLIM", None), |a| {
                a.check("", "slim_small", true)
            })
            .step("unknown_enum_member", "Shirt", fixtures::shirt_value("S", "BAGGY", None), |a| {
                a.structural_error().at("Shirt.fit")
            })
            .step("wrong_class", "Shirt", fixtures::foo_value(1), |a| {
                a.structural_error().at("Shirt")
            })
    }

    #[test]
    fn test_shirt() {
        scenario().run().unwrap();
    }
}

mod root_types {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("root_types")
            .schema(fixtures::foo().unwrap())
            .typed_step(
                "list_of_objects",
                FieldType::list(FieldType::class("Foo")),
                vec![fixtures::foo_value(1), fixtures::foo_value(10)],
                |a| a.error("bar_range").at("root[1].bar"),
            )
            .typed_step(
                "map_of_objects",
                FieldType::map(FieldType::string(), FieldType::class("Foo")),
                map! { "x" => fixtures::foo_value(3), "y" => fixtures::foo_value(4) },
                |a| a.value(map! { "x" => fixtures::foo_value(3), "y" => fixtures::foo_value(4) }),
            )
            .typed_step(
                "optional_root_null",
                FieldType::optional(FieldType::class("Foo")),
                Value::Null,
                |a| a.value(Value::Null),
            )
    }

    #[test]
    fn test_root_types() {
        scenario().run().unwrap();
    }
}
