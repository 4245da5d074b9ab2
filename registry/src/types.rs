//! Schema definition types.

use vigil_core::{FieldType, TypeTag};
use vigil_parser::CompiledExpr;

/// How a constraint failure is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Failure aborts the whole validation call.
    Assert,
    /// Failure is recorded in the checks map; validation continues.
    Check,
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::Assert => write!(f, "assert"),
            ConstraintKind::Check => write!(f, "check"),
        }
    }
}

/// A compiled constraint attached to a field or to a whole class.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub kind: ConstraintKind,
    /// Reported on failure; for checks, also the key in the checks map.
    pub message: String,
    pub expr: CompiledExpr,
    /// The union alternative this constraint applies to, if bound.
    pub variant: Option<TypeTag>,
}

impl Constraint {
    /// The variant this constraint is bound to.
    pub fn variant_binding(&self) -> Option<&TypeTag> {
        self.variant.as_ref()
    }

    /// Returns true if this constraint applies when the live value has `tag`.
    pub fn applies_to(&self, tag: &TypeTag) -> bool {
        self.variant.as_ref().map_or(true, |bound| bound == tag)
    }

    pub fn is_check(&self) -> bool {
        self.kind == ConstraintKind::Check
    }
}

/// A constraint as written, before its expression is compiled.
#[derive(Debug, Clone)]
pub(crate) struct ConstraintDef {
    pub kind: ConstraintKind,
    pub message: String,
    pub source: String,
    pub variant: Option<TypeTag>,
}

/// Field declaration used with `ClassBuilder::field`.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub(crate) name: String,
    pub(crate) field_type: FieldType,
    pub(crate) constraints: Vec<ConstraintDef>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            constraints: Vec::new(),
        }
    }

    pub fn assert(self, message: impl Into<String>, expr: impl Into<String>) -> Self {
        self.constraint(ConstraintKind::Assert, None, message, expr)
    }

    pub fn check(self, message: impl Into<String>, expr: impl Into<String>) -> Self {
        self.constraint(ConstraintKind::Check, None, message, expr)
    }

    /// Assert that only applies while the field holds `variant`.
    pub fn assert_variant(
        self,
        variant: TypeTag,
        message: impl Into<String>,
        expr: impl Into<String>,
    ) -> Self {
        self.constraint(ConstraintKind::Assert, Some(variant), message, expr)
    }

    /// Check that only applies while the field holds `variant`.
    pub fn check_variant(
        self,
        variant: TypeTag,
        message: impl Into<String>,
        expr: impl Into<String>,
    ) -> Self {
        self.constraint(ConstraintKind::Check, Some(variant), message, expr)
    }

    fn constraint(
        mut self,
        kind: ConstraintKind,
        variant: Option<TypeTag>,
        message: impl Into<String>,
        expr: impl Into<String>,
    ) -> Self {
        self.constraints.push(ConstraintDef {
            kind,
            message: message.into(),
            source: expr.into(),
            variant,
        });
        self
    }
}

/// A declared field of a class.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) field_type: FieldType,
    pub(crate) constraints: Vec<Constraint>,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Constraints in declaration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Returns true if any constraint, in any variant, is a check.
    ///
    /// Such a field is always reported with a checks map.
    pub fn has_checks(&self) -> bool {
        self.constraints.iter().any(Constraint::is_check)
    }
}

/// A class: fields plus class-level constraints, with a precomputed
/// evaluation order.
#[derive(Debug, Clone)]
pub struct Block {
    pub(crate) name: String,
    pub(crate) fields: Vec<Field>,
    pub(crate) constraints: Vec<Constraint>,
    /// Field indexes in dependency order.
    pub(crate) order: Vec<usize>,
}

impl Block {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Class-level constraints in declaration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Fields in the order they must be validated: every field referenced
    /// through `block.<name>` comes before the fields that reference it.
    pub fn evaluation_order(&self) -> impl Iterator<Item = &Field> {
        self.order.iter().map(move |&i| &self.fields[i])
    }

    /// Indexes into `fields()`, in evaluation order.
    pub fn evaluation_indices(&self) -> &[usize] {
        &self.order
    }

    /// Returns true if any class-level constraint is a check.
    pub fn has_checks(&self) -> bool {
        self.constraints.iter().any(Constraint::is_check)
    }
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<String>,
}

impl EnumDef {
    pub fn has_variant(&self, variant: &str) -> bool {
        self.variants.iter().any(|v| v == variant)
    }
}
