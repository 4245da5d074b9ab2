//! The Schema - immutable constraint model lookup.

use crate::{Block, Constraint, EnumDef};
use std::collections::HashMap;

/// The Schema provides lookup of classes, enums and their constraints.
/// It is immutable after construction and shared freely across threads.
#[derive(Debug)]
pub struct Schema {
    /// Classes in declaration order.
    blocks: Vec<Block>,
    /// Class index lookup by name.
    block_names: HashMap<String, usize>,
    /// Enums by name.
    enums: HashMap<String, EnumDef>,
}

impl Schema {
    /// Create a schema (use SchemaBuilder for construction).
    pub(crate) fn new(
        blocks: Vec<Block>,
        block_names: HashMap<String, usize>,
        enums: HashMap<String, EnumDef>,
    ) -> Self {
        Self {
            blocks,
            block_names,
            enums,
        }
    }

    // ==================== Class Lookups ====================

    /// Get a class by name.
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.block_names.get(name).map(|&i| &self.blocks[i])
    }

    /// All classes in declaration order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Get the number of classes.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    // ==================== Enum Lookups ====================

    /// Get an enum by name.
    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }

    // ==================== Constraint Lookups ====================

    /// Constraints of one field, in declaration order. Empty if the class or
    /// field is unknown.
    pub fn constraints_for(&self, block: &str, field: &str) -> &[Constraint] {
        self.block(block)
            .and_then(|b| b.field(field))
            .map(|f| f.constraints())
            .unwrap_or(&[])
    }

    /// Class-level constraints, in declaration order.
    pub fn block_constraints_for(&self, block: &str) -> &[Constraint] {
        self.block(block).map(Block::constraints).unwrap_or(&[])
    }
}
