//! Evaluation context.

use vigil_core::Value;

/// The values an expression can reach: `this`, `block` and `root`.
///
/// Passed by value into every evaluation; nothing is looked up globally.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub this: &'a Value,
    pub block: &'a Value,
    pub root: &'a Value,
}

impl<'a> EvalContext<'a> {
    pub fn new(this: &'a Value, block: &'a Value, root: &'a Value) -> Self {
        Self { this, block, root }
    }

    /// Context for a constraint attached to a whole object: `this` and
    /// `block` are both the object.
    pub fn for_block(object: &'a Value, root: &'a Value) -> Self {
        Self::new(object, object, root)
    }

    /// Context for a constraint attached to one field of `block`.
    pub fn for_field(value: &'a Value, block: &'a Value, root: &'a Value) -> Self {
        Self::new(value, block, root)
    }

    /// Context where every root is the same value.
    pub fn standalone(value: &'a Value) -> Self {
        Self::new(value, value, value)
    }
}
