//! Batch validation and configuration.

use pretty_assertions::assert_eq;
use vigil_tests::prelude::*;

fn values() -> Vec<Value> {
    (0..50).map(|i| fixtures::foo_value(i % 15)).collect()
}

#[test]
fn test_parallel_batch_keeps_input_order() {
    // GIVEN
    let schema = fixtures::foo().unwrap();
    let values = values();
    let ty = FieldType::class("Foo");
    let config = ValidatorConfig::default().with_parallel_batches(true);

    // WHEN
    let results = Validator::new(&schema, config).validate_batch(&ty, &values);

    // THEN every result lines up with its own input
    assert_eq!(results.len(), values.len());
    for (value, result) in values.iter().zip(&results) {
        let bar = value.as_object().and_then(|o| o.get("bar")).and_then(Value::as_int).unwrap();
        assert_eq!(result.is_ok(), (1..10).contains(&bar), "bar = {}", bar);
    }
}

#[test]
fn test_parallel_and_sequential_agree() {
    let schema = fixtures::catalog().unwrap();
    let values: Vec<Value> = (0..12)
        .map(|i| {
            fixtures::catalog_value(vec![
                fixtures::item(1, "a"),
                fixtures::item(i % 3 + 1, "b"),
            ])
        })
        .collect();
    let ty = FieldType::class("Catalog");

    let sequential = Validator::with_defaults(&schema).validate_batch(&ty, &values);
    let parallel = Validator::new(&schema, ValidatorConfig::default().with_parallel_batches(true))
        .validate_batch(&ty, &values);

    assert_eq!(sequential, parallel);
}

#[test]
fn test_validator_is_shareable_across_threads() {
    let schema = fixtures::foo().unwrap();
    let validator = Validator::with_defaults(&schema);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (1..5)
            .map(|i| {
                let validator = &validator;
                scope.spawn(move || validator.validate_class("Foo", &fixtures::foo_value(i)).is_ok())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    });
}

#[test]
fn test_config_from_toml_drives_validator() {
    let config = ValidatorConfig::from_toml_str(
        r#"
        max_depth = 1
        include_expressions = false
        "#,
    )
    .unwrap();
    let schema = fixtures::catalog().unwrap();
    let validator = Validator::new(&schema, config);

    // Catalog.items[0] is two levels below the root
    let err = validator
        .validate_class("Catalog", &fixtures::catalog_value(vec![fixtures::item(1, "a")]))
        .unwrap_err();

    assert!(matches!(err, ValidationError::DepthExceeded { limit: 1, .. }));
    assert_eq!(err.path().unwrap().to_string(), "Catalog.items[0]");
}
