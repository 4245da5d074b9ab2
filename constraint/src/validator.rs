//! The validation walk.
//!
//! A value is validated bottom-up: the elements of lists and maps and the
//! fields of objects are validated before the constraints of the field that
//! holds them run, and an object's fields are visited in their class's
//! dependency order before its class-level constraints.

use rayon::prelude::*;
use tracing::{debug, trace};
use vigil_core::{FieldType, Object, TypeTag, Value};
use vigil_eval::{EvalContext, EvalError, EvalResult, Evaluator};
use vigil_registry::{Block, Constraint, ConstraintKind, Schema};

use crate::{
    CheckResult, Checks, FieldPath, Validated, ValidationError, ValidationResult, ValidatorConfig,
};

static NULL: Value = Value::Null;

/// Result of evaluating one constraint against one value.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Passed,
    Failed,
    Errored(EvalError),
}

impl Outcome {
    pub fn from_result(result: EvalResult<bool>) -> Self {
        match result {
            Ok(true) => Outcome::Passed,
            Ok(false) => Outcome::Failed,
            Err(err) => Outcome::Errored(err),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Errored(_) => "errored",
        }
    }
}

/// Per-call traversal state.
struct Walk<'v> {
    root: &'v Value,
    path: FieldPath,
}

/// Validates values against a compiled schema.
///
/// The validator borrows the schema and holds no mutable state, so one
/// instance can serve many threads.
#[derive(Debug, Clone)]
pub struct Validator<'s> {
    schema: &'s Schema,
    config: ValidatorConfig,
    evaluator: Evaluator,
}

impl<'s> Validator<'s> {
    pub fn new(schema: &'s Schema, config: ValidatorConfig) -> Self {
        Self {
            schema,
            config,
            evaluator: Evaluator::new(),
        }
    }

    pub fn with_defaults(schema: &'s Schema) -> Self {
        Self::new(schema, ValidatorConfig::default())
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a value of the given type.
    ///
    /// The first failing assertion, the first constraint that cannot be
    /// evaluated, or the first structural mismatch aborts the call. Failing
    /// checks are recorded in the returned tree instead.
    pub fn validate(&self, ty: &FieldType, value: &Value) -> ValidationResult<Validated> {
        let root = match ty {
            FieldType::Class(name) => name.as_str(),
            _ => "root",
        };
        let mut walk = Walk {
            root: value,
            path: FieldPath::new(root),
        };

        let result = self.validate_value(&mut walk, ty, value);
        match &result {
            Ok(_) => debug!(event = "validated", root),
            Err(err) => debug!(event = "validation_failed", root, error = %err),
        }
        result
    }

    /// Validate an instance of a named class.
    pub fn validate_class(&self, name: &str, value: &Value) -> ValidationResult<Validated> {
        if self.schema.block(name).is_none() {
            return Err(ValidationError::unknown_class(name));
        }
        self.validate(&FieldType::class(name), value)
    }

    /// Validate independent values of the same type. Results come back in
    /// input order; with `parallel_batches` the values are spread over the
    /// rayon pool.
    pub fn validate_batch(
        &self,
        ty: &FieldType,
        values: &[Value],
    ) -> Vec<ValidationResult<Validated>> {
        debug!(
            event = "batch",
            size = values.len(),
            parallel = self.config.parallel_batches
        );
        if self.config.parallel_batches {
            values.par_iter().map(|v| self.validate(ty, v)).collect()
        } else {
            values.iter().map(|v| self.validate(ty, v)).collect()
        }
    }

    fn validate_value(
        &self,
        walk: &mut Walk<'_>,
        ty: &FieldType,
        value: &Value,
    ) -> ValidationResult<Validated> {
        if walk.path.depth() > self.config.max_depth {
            return Err(ValidationError::DepthExceeded {
                path: walk.path.clone(),
                limit: self.config.max_depth,
            });
        }

        match ty {
            FieldType::Union(_) | FieldType::Optional(_) => {
                let variant = ty.select_variant(value).ok_or_else(|| {
                    ValidationError::type_mismatch(&walk.path, ty.to_string(), value.type_name())
                })?;
                self.validate_value(walk, variant, value)
            }
            FieldType::Primitive(_) => {
                if ty.accepts(value) {
                    Ok(Validated::Scalar(value.clone()))
                } else {
                    Err(ValidationError::type_mismatch(
                        &walk.path,
                        ty.to_string(),
                        value.type_name(),
                    ))
                }
            }
            FieldType::Enum(name) => self.validate_enum(walk, name, value),
            FieldType::Class(name) => {
                let block = self
                    .schema
                    .block(name)
                    .ok_or_else(|| ValidationError::unknown_class(name))?;
                if !ty.accepts(value) {
                    return Err(ValidationError::type_mismatch(
                        &walk.path,
                        name.as_str(),
                        value.type_name(),
                    ));
                }
                self.validate_object(walk, block, value)
            }
            FieldType::List(inner) => {
                let items = value.as_list().ok_or_else(|| {
                    ValidationError::type_mismatch(&walk.path, ty.to_string(), value.type_name())
                })?;
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    walk.path.push_index(i);
                    out.push(self.validate_value(walk, inner, item)?);
                    walk.path.pop();
                }
                Ok(Validated::List(out))
            }
            FieldType::Map(key_type, value_type) => {
                let map = value.as_map().ok_or_else(|| {
                    ValidationError::type_mismatch(&walk.path, ty.to_string(), value.type_name())
                })?;
                let mut out = std::collections::BTreeMap::new();
                for (key, item) in map {
                    walk.path.push_key(key.as_str());
                    if !self.accepts_key(key_type, key) {
                        return Err(ValidationError::type_mismatch(
                            &walk.path,
                            key_type.to_string(),
                            format!("key {:?}", key),
                        ));
                    }
                    out.insert(key.clone(), self.validate_value(walk, value_type, item)?);
                    walk.path.pop();
                }
                Ok(Validated::Map(out))
            }
        }
    }

    fn validate_enum(
        &self,
        walk: &Walk<'_>,
        name: &str,
        value: &Value,
    ) -> ValidationResult<Validated> {
        let declared = match value {
            Value::Enum { type_name, variant } if type_name == name => self
                .schema
                .enum_def(name)
                .is_some_and(|def| def.has_variant(variant)),
            _ => false,
        };
        if !declared {
            return Err(ValidationError::type_mismatch(
                &walk.path,
                name,
                value.to_string(),
            ));
        }
        Ok(Validated::Scalar(value.clone()))
    }

    /// Map keys are strings; an enum key type restricts them to its variants.
    fn accepts_key(&self, key_type: &FieldType, key: &str) -> bool {
        key_type.variants().iter().any(|variant| match variant {
            FieldType::Enum(name) => self
                .schema
                .enum_def(name)
                .is_some_and(|def| def.has_variant(key)),
            other => other.accepts(&Value::String(key.to_string())),
        })
    }

    fn validate_object(
        &self,
        walk: &mut Walk<'_>,
        block: &Block,
        value: &Value,
    ) -> ValidationResult<Validated> {
        let Some(object) = value.as_object() else {
            return Err(ValidationError::type_mismatch(
                &walk.path,
                block.name(),
                value.type_name(),
            ));
        };
        let fields = block.fields();
        let mut slots: Vec<Option<Validated>> = vec![None; fields.len()];
        // `this` and `block` see missing nullable fields as null.
        let filled = fill_missing(block, object);
        let context = filled.as_ref().unwrap_or(value);

        for &index in block.evaluation_indices() {
            let field = &fields[index];
            walk.path.push_field(field.name());

            let field_value = match object.get(field.name()) {
                Some(v) => v,
                None if field.field_type().accepts(&NULL) => &NULL,
                None => {
                    return Err(ValidationError::type_mismatch(
                        &walk.path,
                        field.field_type().to_string(),
                        "missing field",
                    ))
                }
            };

            let validated = self.validate_value(walk, field.field_type(), field_value)?;
            let tag = field
                .field_type()
                .select_variant(field_value)
                .and_then(FieldType::tag);
            let ctx = EvalContext::for_field(field_value, context, walk.root);
            let checks = self.apply(&walk.path, field.constraints(), tag.as_ref(), ctx)?;
            walk.path.pop();

            slots[index] = Some(if field.has_checks() {
                Validated::Checked {
                    value: Box::new(validated),
                    checks,
                }
            } else {
                validated
            });
        }

        let mut out: Vec<(String, Validated)> = fields
            .iter()
            .zip(slots)
            .filter_map(|(field, slot)| slot.map(|v| (field.name().to_string(), v)))
            .collect();
        for (name, extra) in object.fields() {
            if block.field(name).is_none() {
                trace!(event = "undeclared_field", path = %walk.path, field = name);
                out.push((name.to_string(), Validated::from_value(extra.clone())));
            }
        }

        let tag = TypeTag::Class(block.name().to_string());
        let ctx = EvalContext::for_block(context, walk.root);
        let checks = self.apply(&walk.path, block.constraints(), Some(&tag), ctx)?;

        let node = Validated::Object {
            type_name: block.name().to_string(),
            fields: out,
        };
        Ok(if block.has_checks() {
            Validated::Checked {
                value: Box::new(node),
                checks,
            }
        } else {
            node
        })
    }

    /// Run constraints in declaration order. Asserts abort on failure,
    /// checks are collected, and an evaluation error aborts either way.
    fn apply(
        &self,
        path: &FieldPath,
        constraints: &[Constraint],
        tag: Option<&TypeTag>,
        ctx: EvalContext<'_>,
    ) -> ValidationResult<Checks> {
        let mut checks = Checks::new();

        for constraint in constraints {
            let applies = match tag {
                Some(tag) => constraint.applies_to(tag),
                None => constraint.variant_binding().is_none(),
            };
            if !applies {
                trace!(event = "constraint_skipped", path = %path, message = %constraint.message);
                continue;
            }

            let outcome = Outcome::from_result(self.evaluator.check(&constraint.expr, ctx));
            trace!(
                event = "constraint",
                path = %path,
                kind = %constraint.kind,
                message = %constraint.message,
                outcome = outcome.label()
            );

            let expression = self
                .config
                .include_expressions
                .then(|| constraint.expr.source().to_string());
            match (constraint.kind, outcome) {
                (_, Outcome::Errored(source)) => {
                    return Err(ValidationError::Evaluation {
                        message: constraint.message.clone(),
                        path: path.clone(),
                        expression,
                        source,
                    })
                }
                (ConstraintKind::Assert, Outcome::Passed) => {}
                (ConstraintKind::Assert, Outcome::Failed) => {
                    return Err(ValidationError::AssertionFailed {
                        message: constraint.message.clone(),
                        path: path.clone(),
                        expression,
                    })
                }
                (ConstraintKind::Check, outcome) => checks.push(CheckResult {
                    name: constraint.message.clone(),
                    expression,
                    passed: outcome.is_passed(),
                }),
            }
        }

        Ok(checks)
    }
}

/// The object with each missing field that accepts null set to null, or
/// `None` when no such field is missing.
fn fill_missing(block: &Block, object: &Object) -> Option<Value> {
    let mut missing = block
        .fields()
        .iter()
        .filter(|f| !object.contains(f.name()) && f.field_type().accepts(&NULL))
        .peekable();
    missing.peek()?;
    let mut filled = object.clone();
    for field in missing {
        filled.insert(field.name(), Value::Null);
    }
    Some(Value::from(filled))
}
