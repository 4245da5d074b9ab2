//! Schemas and values shared by the integration tests.

use vigil_core::{object, FieldType, TypeTag, Value};
use vigil_registry::{FieldDef, Schema, SchemaBuilder, SchemaResult};

/// `Foo { bar: int }` with `0 < this < 10` on `bar`.
pub fn foo() -> SchemaResult<Schema> {
    let mut builder = SchemaBuilder::new();
    builder
        .add_class("Foo")
        .field(FieldDef::new("bar", FieldType::int()).assert("bar_range", "0 < this < 10"))
        .done()?;
    builder.build()
}

pub fn foo_value(bar: i64) -> Value {
    object!("Foo", { "bar" => bar }).into()
}

/// A cited quote: an empty quote is recorded, a malformed link aborts.
pub fn citation() -> SchemaResult<Schema> {
    let mut builder = SchemaBuilder::new();
    builder
        .add_class("Citation")
        .field(
            FieldDef::new("quote", FieldType::string())
                .check("exact_citation_not_found", "this|length > 0"),
        )
        .field(
            FieldDef::new("website_link", FieldType::string())
                .assert("invalid_link", "this matches '^https?://'"),
        )
        .done()?;
    builder.build()
}

pub fn citation_value(quote: &str, website_link: &str) -> Value {
    object!("Citation", { "quote" => quote, "website_link" => website_link }).into()
}

/// A catalog of items whose ids must be unique.
pub fn catalog() -> SchemaResult<Schema> {
    let mut builder = SchemaBuilder::new();
    builder
        .add_class("Item")
        .field(FieldDef::new("id", FieldType::int()).assert("positive_id", "this > 0"))
        .field(FieldDef::new("name", FieldType::string()).assert("has_name", "this|length > 0"))
        .done()?;
    builder
        .add_class("Catalog")
        .field(FieldDef::new("items", FieldType::list(FieldType::class("Item"))))
        .assert(
            "unique_ids",
            "this.items|pluck('id')|unique|length == this.items|length",
        )
        .done()?;
    builder.build()
}

pub fn item(id: i64, name: &str) -> Value {
    object!("Item", { "id" => id, "name" => name }).into()
}

pub fn catalog_value(items: Vec<Value>) -> Value {
    object!("Catalog", { "items" => items }).into()
}

/// `ratio` is declared first but divides by `divisor`, so `divisor` is
/// validated first.
pub fn ratio() -> SchemaResult<Schema> {
    let mut builder = SchemaBuilder::new();
    builder
        .add_class("Ratio")
        .field(
            FieldDef::new("ratio", FieldType::int())
                .assert("ratio_bounded", "this / block.divisor < 100"),
        )
        .field(FieldDef::new("divisor", FieldType::int()).assert("non_zero", "this != 0"))
        .done()?;
    builder.build()
}

pub fn ratio_value(ratio: i64, divisor: i64) -> Value {
    object!("Ratio", { "ratio" => ratio, "divisor" => divisor }).into()
}

/// Two asserts on `a`, where the second divides by `a`; three checks on `b`.
pub fn chain() -> SchemaResult<Schema> {
    let mut builder = SchemaBuilder::new();
    builder
        .add_class("Chain")
        .field(
            FieldDef::new("a", FieldType::int())
                .assert("first", "this != 0")
                .assert("second", "10 / this > 1"),
        )
        .field(
            FieldDef::new("b", FieldType::int())
                .check("positive", "this > 0")
                .check("even", "this % 2 == 0")
                .check("small", "this < 100"),
        )
        .done()?;
    builder.build()
}

pub fn chain_value(a: i64, b: i64) -> Value {
    object!("Chain", { "a" => a, "b" => b }).into()
}

/// A size given either as a number or as a label, an optional note, and a
/// class-level check across both.
pub fn shirt() -> SchemaResult<Schema> {
    let mut builder = SchemaBuilder::new();
    builder.add_enum("Fit", ["SLIM", "REGULAR"])?;
    builder
        .add_class("Shirt")
        .field(
            FieldDef::new("size", FieldType::union(vec![FieldType::int(), FieldType::string()]))
                .assert_variant(TypeTag::Int, "size_range", "30 <= this <= 60")
                .check_variant(TypeTag::Int, "even_size", "this % 2 == 0")
                .check_variant(TypeTag::String, "known_label", "this in ['S', 'M', 'L']"),
        )
        .field(FieldDef::new("fit", FieldType::enumeration("Fit")))
        .field(
            FieldDef::new("note", FieldType::optional(FieldType::string()))
                .check("short_note", "this == null or this|length <= 20"),
        )
        .check("slim_small", "this.fit != 'SLIM' or this.size in ['S', 'M']")
        .done()?;
    builder.build()
}

pub fn shirt_value(size: impl Into<Value>, fit: &str, note: Option<&str>) -> Value {
    object!("Shirt", {
        "size" => Into::<Value>::into(size),
        "fit" => Value::enum_variant("Fit", fit),
        "note" => note,
    })
    .into()
}
