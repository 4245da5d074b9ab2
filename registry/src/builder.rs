//! SchemaBuilder for constructing an immutable Schema.

use crate::resolve::evaluation_order;
use crate::{
    Block, Constraint, ConstraintDef, ConstraintKind, EnumDef, Field, FieldDef, Schema,
    SchemaError, SchemaResult,
};
use std::collections::HashMap;
use tracing::debug;
use vigil_core::{FieldType, TypeTag};
use vigil_parser::CompiledExpr;

/// Builder for constructing an immutable Schema.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    /// Classes in declaration order.
    blocks: Vec<Block>,
    /// Class name to index mapping.
    block_names: HashMap<String, usize>,
    /// Enums by name.
    enums: HashMap<String, EnumDef>,
}

impl SchemaBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class definition.
    pub fn add_class(&mut self, name: impl Into<String>) -> ClassBuilder<'_> {
        ClassBuilder {
            builder: self,
            name: name.into(),
            fields: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Add an enum definition.
    pub fn add_enum<I, S>(&mut self, name: impl Into<String>, variants: I) -> SchemaResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if self.enums.contains_key(&name) || self.block_names.contains_key(&name) {
            return Err(SchemaError::DuplicateEnum(name));
        }

        let mut def = EnumDef {
            name: name.clone(),
            variants: Vec::new(),
        };
        for variant in variants {
            let variant = variant.into();
            if def.has_variant(&variant) {
                return Err(SchemaError::DuplicateVariant { name, variant });
            }
            def.variants.push(variant);
        }

        self.enums.insert(name, def);
        Ok(())
    }

    /// Returns true if a class or enum with this name was added.
    pub fn is_declared(&self, name: &str) -> bool {
        self.block_names.contains_key(name) || self.enums.contains_key(name)
    }

    /// Build the immutable Schema.
    ///
    /// Resolves type references, variant bindings and `block.<name>`
    /// references, and computes each class's evaluation order.
    pub fn build(mut self) -> SchemaResult<Schema> {
        for block in &self.blocks {
            for field in &block.fields {
                self.check_type_refs(block, field, &field.field_type)?;
                for constraint in &field.constraints {
                    check_binding(block, field, constraint)?;
                }
            }
        }

        for block in &mut self.blocks {
            block.order = resolve_block(block)?;
            let order: Vec<&str> = block.evaluation_order().map(Field::name).collect();
            debug!(event = "evaluation_order", class = %block.name, order = ?order);
        }

        debug!(
            event = "schema_built",
            classes = self.blocks.len(),
            enums = self.enums.len(),
        );

        Ok(Schema::new(self.blocks, self.block_names, self.enums))
    }

    fn check_type_refs(&self, block: &Block, field: &Field, ty: &FieldType) -> SchemaResult<()> {
        match ty {
            FieldType::Primitive(_) => Ok(()),
            FieldType::Class(name) if self.block_names.contains_key(name) => Ok(()),
            FieldType::Enum(name) if self.enums.contains_key(name) => Ok(()),
            FieldType::Class(name) | FieldType::Enum(name) => {
                Err(SchemaError::unknown_type(&block.name, &field.name, name))
            }
            FieldType::List(inner) | FieldType::Optional(inner) => {
                self.check_type_refs(block, field, inner)
            }
            FieldType::Map(key, value) => {
                self.check_type_refs(block, field, key)?;
                self.check_type_refs(block, field, value)
            }
            FieldType::Union(items) => items
                .iter()
                .try_for_each(|item| self.check_type_refs(block, field, item)),
        }
    }
}

/// A constraint on a field with several alternatives must be bound to one of
/// them, and a binding must name an alternative the field actually has.
fn check_binding(block: &Block, field: &Field, constraint: &Constraint) -> SchemaResult<()> {
    match constraint.variant_binding() {
        None if field.field_type.is_union() => Err(SchemaError::UnboundUnionConstraint {
            class: block.name.clone(),
            field: field.name.clone(),
            message: constraint.message.clone(),
        }),
        None => Ok(()),
        Some(tag) => {
            let known = field
                .field_type
                .variants()
                .iter()
                .any(|v| v.tag().as_ref() == Some(tag));
            if known {
                Ok(())
            } else {
                Err(SchemaError::InvalidVariantBinding {
                    class: block.name.clone(),
                    field: field.name.clone(),
                    message: constraint.message.clone(),
                    variant: tag.clone(),
                    field_type: field.field_type.to_string(),
                })
            }
        }
    }
}

/// Check every `block.<name>` reference and order the fields.
fn resolve_block(block: &Block) -> SchemaResult<Vec<usize>> {
    let index_of = |name: &str| block.fields.iter().position(|f| f.name == name);

    let mut deps = Vec::with_capacity(block.fields.len());
    for (i, field) in block.fields.iter().enumerate() {
        let mut field_deps: Vec<usize> = Vec::new();
        for constraint in &field.constraints {
            for reference in constraint.expr.block_references() {
                let dep = index_of(reference).ok_or_else(|| SchemaError::UnknownFieldReference {
                    owner: format!("{}.{}", block.name, field.name),
                    message: constraint.message.clone(),
                    reference: reference.to_string(),
                })?;
                if dep != i && !field_deps.contains(&dep) {
                    field_deps.push(dep);
                }
            }
        }
        // A field reading the whole block waits for every sibling.
        if field.constraints.iter().any(|c| c.expr.reads_whole_block()) {
            field_deps = (0..block.fields.len()).filter(|&d| d != i).collect();
        }
        field_deps.sort_unstable();
        deps.push(field_deps);
    }

    for constraint in &block.constraints {
        for reference in constraint.expr.block_references() {
            if index_of(reference).is_none() {
                return Err(SchemaError::UnknownFieldReference {
                    owner: block.name.clone(),
                    message: constraint.message.clone(),
                    reference: reference.to_string(),
                });
            }
        }
    }

    let names: Vec<&str> = block.fields.iter().map(Field::name).collect();
    evaluation_order(&block.name, &names, &deps)
}

fn compile(owner: &str, def: ConstraintDef) -> SchemaResult<Constraint> {
    let expr = CompiledExpr::compile(&def.source)
        .map_err(|e| SchemaError::expression(owner, &def.source, e))?;
    Ok(Constraint {
        kind: def.kind,
        message: def.message,
        expr,
        variant: def.variant,
    })
}

/// Check messages key the checks map, so two checks that can apply to the
/// same value must not share one. Checks bound to different variants never
/// apply together.
fn check_unique_checks(owner: &str, defs: &[ConstraintDef]) -> SchemaResult<()> {
    let checks: Vec<&ConstraintDef> = defs
        .iter()
        .filter(|d| d.kind == ConstraintKind::Check)
        .collect();
    for (i, def) in checks.iter().enumerate() {
        let clash = checks[..i]
            .iter()
            .any(|prev| prev.message == def.message && prev.variant == def.variant);
        if clash {
            return Err(SchemaError::DuplicateCheck {
                owner: owner.to_string(),
                message: def.message.clone(),
            });
        }
    }
    Ok(())
}

/// Builder for a class definition.
pub struct ClassBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    name: String,
    fields: Vec<FieldDef>,
    constraints: Vec<ConstraintDef>,
}

impl<'a> ClassBuilder<'a> {
    /// Add a field.
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a class-level assert. `this` is the whole object.
    pub fn assert(self, message: impl Into<String>, expr: impl Into<String>) -> Self {
        self.constraint(ConstraintKind::Assert, message, expr)
    }

    /// Add a class-level check. `this` is the whole object.
    pub fn check(self, message: impl Into<String>, expr: impl Into<String>) -> Self {
        self.constraint(ConstraintKind::Check, message, expr)
    }

    fn constraint(
        mut self,
        kind: ConstraintKind,
        message: impl Into<String>,
        expr: impl Into<String>,
    ) -> Self {
        self.constraints.push(ConstraintDef {
            kind,
            message: message.into(),
            source: expr.into(),
            variant: None,
        });
        self
    }

    /// Finish building this class, compiling its constraint expressions.
    pub fn done(self) -> SchemaResult<()> {
        if self.builder.is_declared(&self.name) {
            return Err(SchemaError::DuplicateClass(self.name));
        }

        let mut fields: Vec<Field> = Vec::with_capacity(self.fields.len());
        for def in self.fields {
            if fields.iter().any(|f| f.name == def.name) {
                return Err(SchemaError::DuplicateField {
                    class: self.name,
                    field: def.name,
                });
            }
            let owner = format!("{}.{}", self.name, def.name);
            check_unique_checks(&owner, &def.constraints)?;
            let constraints = def
                .constraints
                .into_iter()
                .map(|c| compile(&owner, c))
                .collect::<SchemaResult<Vec<_>>>()?;
            fields.push(Field {
                name: def.name,
                field_type: def.field_type,
                constraints,
            });
        }

        check_unique_checks(&self.name, &self.constraints)?;
        let constraints = self
            .constraints
            .into_iter()
            .map(|c| compile(&self.name, c))
            .collect::<SchemaResult<Vec<_>>>()?;

        let block = Block {
            name: self.name.clone(),
            order: (0..fields.len()).collect(),
            fields,
            constraints,
        };

        let index = self.builder.blocks.len();
        self.builder.block_names.insert(self.name, index);
        self.builder.blocks.push(block);
        Ok(())
    }
}

/// Tag of a declared class, for variant bindings.
pub fn class_tag(name: impl Into<String>) -> TypeTag {
    TypeTag::Class(name.into())
}
