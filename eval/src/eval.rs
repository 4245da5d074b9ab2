//! Expression evaluation.

use crate::{EvalContext, EvalError, EvalResult};
use std::borrow::Cow;
use std::cmp::Ordering;
use vigil_core::Value;
use vigil_parser::{BinaryOp, CompareOp, CompiledExpr, Expr, LiteralKind, Root, UnaryOp};

static NULL: Value = Value::Null;

/// Expression evaluator.
///
/// The evaluator is stateless: everything an expression can see arrives in
/// the `EvalContext` of each call, so one evaluator is shared freely across
/// threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    /// Create a new evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Evaluate an expression to a value.
    pub fn eval(&self, expr: &Expr, ctx: EvalContext<'_>) -> EvalResult<Value> {
        self.eval_ref(expr, ctx).map(Cow::into_owned)
    }

    /// Evaluate an expression as a constraint predicate.
    ///
    /// `null` counts as `false`; any other non-boolean is an error.
    pub fn eval_bool(&self, expr: &Expr, ctx: EvalContext<'_>) -> EvalResult<bool> {
        let val = self.eval_ref(expr, ctx)?;
        match &*val {
            Value::Bool(b) => Ok(*b),
            Value::Null => Ok(false),
            other => Err(EvalError::not_boolean(other.type_name())),
        }
    }

    /// Evaluate a compiled constraint expression as a predicate.
    pub fn check(&self, expr: &CompiledExpr, ctx: EvalContext<'_>) -> EvalResult<bool> {
        self.eval_bool(expr.expr(), ctx)
    }

    /// Evaluate without cloning values reached through paths.
    pub(crate) fn eval_ref<'a>(
        &self,
        expr: &Expr,
        ctx: EvalContext<'a>,
    ) -> EvalResult<Cow<'a, Value>> {
        match expr {
            Expr::Literal(lit) => Ok(Cow::Owned(match &lit.kind {
                LiteralKind::Null => Value::Null,
                LiteralKind::Bool(b) => Value::Bool(*b),
                LiteralKind::Int(i) => Value::Int(*i),
                LiteralKind::Float(f) => Value::Float(*f),
                LiteralKind::String(s) => Value::String(s.clone()),
            })),
            Expr::Root(root, _) => Ok(Cow::Borrowed(match root {
                Root::This => ctx.this,
                Root::Block => ctx.block,
                Root::Root => ctx.root,
            })),
            Expr::Field(base, name, _) => {
                let base = self.eval_ref(base, ctx)?;
                match base {
                    Cow::Borrowed(v) => field_of(v, name).map(Cow::Borrowed),
                    Cow::Owned(v) => field_of(&v, name).map(|c| Cow::Owned(c.clone())),
                }
            }
            Expr::Index(base, index, _) => {
                let base = self.eval_ref(base, ctx)?;
                let index = self.eval_ref(index, ctx)?;
                if let (Value::String(s), Value::Int(i)) = (&*base, &*index) {
                    return char_at(s, *i).map(Cow::Owned);
                }
                match base {
                    Cow::Borrowed(v) => index_of(v, &index).map(Cow::Borrowed),
                    Cow::Owned(v) => index_of(&v, &index).map(|c| Cow::Owned(c.clone())),
                }
            }
            Expr::BinaryOp(BinaryOp::And, left, right, _) => {
                self.eval_and(left, right, ctx).map(Cow::Owned)
            }
            Expr::BinaryOp(BinaryOp::Or, left, right, _) => {
                self.eval_or(left, right, ctx).map(Cow::Owned)
            }
            Expr::BinaryOp(op, left, right, _) => {
                let left_val = self.eval_ref(left, ctx)?;
                let right_val = self.eval_ref(right, ctx)?;
                self.eval_binary_op(*op, &left_val, &right_val)
                    .map(Cow::Owned)
            }
            Expr::Compare(first, rest, _) => self.eval_compare(first, rest, ctx).map(Cow::Owned),
            Expr::UnaryOp(op, operand, _) => {
                let val = self.eval_ref(operand, ctx)?;
                self.eval_unary_op(*op, &val).map(Cow::Owned)
            }
            Expr::Matches(operand, pattern, _) => {
                let val = self.eval_ref(operand, ctx)?;
                match &*val {
                    Value::Null => Ok(Cow::Owned(Value::Null)),
                    v => match text(v) {
                        Some(s) => Ok(Cow::Owned(Value::Bool(pattern.is_match(s)))),
                        None => Err(EvalError::type_error(format!(
                            "cannot match {} against a regular expression",
                            v.type_name()
                        ))),
                    },
                }
            }
            Expr::FnCall(fc) => {
                let args = fc
                    .args
                    .iter()
                    .map(|arg| self.eval_ref(arg, ctx))
                    .collect::<EvalResult<Vec<_>>>()?;
                self.call(&fc.name, args).map(Cow::Owned)
            }
            Expr::List(elements, _) => {
                let values: EvalResult<Vec<Value>> =
                    elements.iter().map(|e| self.eval(e, ctx)).collect();
                Ok(Cow::Owned(Value::List(values?)))
            }
        }
    }

    // ========== Logical helpers ==========

    /// `false and x` never evaluates `x`; `null and false` is `false`.
    fn eval_and(&self, left: &Expr, right: &Expr, ctx: EvalContext<'_>) -> EvalResult<Value> {
        let left_val = self.eval_ref(left, ctx)?;
        match logical_operand("and", &left_val)? {
            Some(false) => Ok(Value::Bool(false)),
            Some(true) => {
                let right_val = self.eval_ref(right, ctx)?;
                Ok(logical_operand("and", &right_val)?.map_or(Value::Null, Value::Bool))
            }
            None => {
                let right_val = self.eval_ref(right, ctx)?;
                match logical_operand("and", &right_val)? {
                    Some(false) => Ok(Value::Bool(false)),
                    _ => Ok(Value::Null),
                }
            }
        }
    }

    /// `true or x` never evaluates `x`; `null or true` is `true`.
    fn eval_or(&self, left: &Expr, right: &Expr, ctx: EvalContext<'_>) -> EvalResult<Value> {
        let left_val = self.eval_ref(left, ctx)?;
        match logical_operand("or", &left_val)? {
            Some(true) => Ok(Value::Bool(true)),
            Some(false) => {
                let right_val = self.eval_ref(right, ctx)?;
                Ok(logical_operand("or", &right_val)?.map_or(Value::Null, Value::Bool))
            }
            None => {
                let right_val = self.eval_ref(right, ctx)?;
                match logical_operand("or", &right_val)? {
                    Some(true) => Ok(Value::Bool(true)),
                    _ => Ok(Value::Null),
                }
            }
        }
    }

    // ========== Comparison helpers ==========

    /// `a < b < c` is `a < b and b < c` with `b` evaluated once.
    fn eval_compare(
        &self,
        first: &Expr,
        rest: &[(CompareOp, Expr)],
        ctx: EvalContext<'_>,
    ) -> EvalResult<Value> {
        let mut left = self.eval_ref(first, ctx)?;
        let mut result = Value::Bool(true);

        for (op, operand) in rest {
            let right = self.eval_ref(operand, ctx)?;
            match compare_values(*op, &left, &right)? {
                Value::Bool(false) => return Ok(Value::Bool(false)),
                Value::Null => result = Value::Null,
                _ => {}
            }
            left = right;
        }

        Ok(result)
    }

    // ========== Operators ==========

    fn eval_binary_op(&self, op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
        match op {
            BinaryOp::Add => self.eval_add(left, right),
            BinaryOp::Sub => self.eval_arith(op, left, right, i64::checked_sub, |a, b| a - b),
            BinaryOp::Mul => self.eval_arith(op, left, right, i64::checked_mul, |a, b| a * b),
            BinaryOp::Div => self.eval_div(left, right),
            BinaryOp::Mod => self.eval_mod(left, right),
            BinaryOp::In => membership(left, right),
            BinaryOp::NotIn => Ok(match membership(left, right)? {
                Value::Bool(b) => Value::Bool(!b),
                other => other,
            }),
            // Short-circuit operators never reach here
            BinaryOp::And | BinaryOp::Or => Err(EvalError::type_error(format!(
                "'{}' needs unevaluated operands",
                op
            ))),
        }
    }

    fn eval_unary_op(&self, op: UnaryOp, val: &Value) -> EvalResult<Value> {
        match op {
            UnaryOp::Neg => match val {
                Value::Null => Ok(Value::Null),
                Value::Int(i) => i
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| EvalError::type_error("integer overflow")),
                Value::Float(f) => Ok(Value::Float(-f)),
                _ => Err(EvalError::type_error(format!(
                    "cannot negate {}",
                    val.type_name()
                ))),
            },
            UnaryOp::Not => match val {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                Value::Null => Ok(Value::Null), // not null = null
                _ => Err(EvalError::type_error(format!(
                    "cannot apply 'not' to {}",
                    val.type_name()
                ))),
            },
        }
    }

    fn eval_add(&self, left: &Value, right: &Value) -> EvalResult<Value> {
        match (left, right) {
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            (Value::List(a), Value::List(b)) => {
                Ok(Value::List(a.iter().chain(b.iter()).cloned().collect()))
            }
            _ => self.eval_arith(BinaryOp::Add, left, right, i64::checked_add, |a, b| a + b),
        }
    }

    fn eval_arith(
        &self,
        op: BinaryOp,
        left: &Value,
        right: &Value,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> EvalResult<Value> {
        match (left, right) {
            // Null propagation
            (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
            (Value::Int(a), Value::Int(b)) => int_op(*a, *b)
                .map(Value::Int)
                .ok_or_else(|| EvalError::type_error("integer overflow")),
            (a, b) if a.is_numeric() && b.is_numeric() => match (a.as_float(), b.as_float()) {
                (Some(x), Some(y)) => Ok(Value::Float(float_op(x, y))),
                _ => Err(arith_error(op, left, right)),
            },
            _ => Err(arith_error(op, left, right)),
        }
    }

    fn eval_div(&self, left: &Value, right: &Value) -> EvalResult<Value> {
        match (left, right) {
            (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
            (Value::Int(_), Value::Int(0)) => Err(EvalError::DivisionByZero),
            (Value::Int(a), Value::Int(b)) => a
                .checked_div(*b)
                .map(Value::Int)
                .ok_or_else(|| EvalError::type_error("integer overflow")),
            (a, b) if a.is_numeric() && b.is_numeric() => match (a.as_float(), b.as_float()) {
                (Some(_), Some(y)) if y == 0.0 => Err(EvalError::DivisionByZero),
                (Some(x), Some(y)) => Ok(Value::Float(x / y)),
                _ => Err(arith_error(BinaryOp::Div, left, right)),
            },
            _ => Err(arith_error(BinaryOp::Div, left, right)),
        }
    }

    fn eval_mod(&self, left: &Value, right: &Value) -> EvalResult<Value> {
        match (left, right) {
            (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
            (Value::Int(_), Value::Int(0)) => Err(EvalError::DivisionByZero),
            (Value::Int(a), Value::Int(b)) => a
                .checked_rem(*b)
                .map(Value::Int)
                .ok_or_else(|| EvalError::type_error("integer overflow")),
            _ => Err(arith_error(BinaryOp::Mod, left, right)),
        }
    }
}

// ========== Value helpers ==========

fn arith_error(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    EvalError::type_error(format!(
        "cannot apply '{}' to {} and {}",
        op,
        left.type_name(),
        right.type_name()
    ))
}

fn logical_operand(op: &str, val: &Value) -> EvalResult<Option<bool>> {
    match val {
        Value::Bool(b) => Ok(Some(*b)),
        Value::Null => Ok(None),
        _ => Err(EvalError::type_error(format!(
            "'{}' expects booleans, got {}",
            op,
            val.type_name()
        ))),
    }
}

/// String content of a value; enum members read as their variant name.
pub(crate) fn text(val: &Value) -> Option<&str> {
    match val {
        Value::String(s) => Some(s),
        Value::Enum { variant, .. } => Some(variant),
        _ => None,
    }
}

/// Equality as expressions see it: numbers compare across Int/Float and an
/// enum member equals its variant name.
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Enum { variant, .. }, Value::String(s))
        | (Value::String(s), Value::Enum { variant, .. }) => variant == s,
        _ => left.loose_eq(right),
    }
}

pub(crate) fn compare_values(op: CompareOp, left: &Value, right: &Value) -> EvalResult<Value> {
    match op {
        CompareOp::Eq => return Ok(Value::Bool(values_equal(left, right))),
        CompareOp::NotEq => return Ok(Value::Bool(!values_equal(left, right))),
        _ => {}
    }

    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    // NaN is unordered: every ordering comparison with it is false
    if is_nan(left) || is_nan(right) {
        return Ok(Value::Bool(false));
    }

    let ordering = order(left, right).ok_or_else(|| {
        EvalError::type_error(format!(
            "cannot compare {} {} {}",
            left.type_name(),
            op,
            right.type_name()
        ))
    })?;

    Ok(Value::Bool(match op {
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::LtEq => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::GtEq => ordering != Ordering::Less,
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::NotEq => ordering != Ordering::Equal,
    }))
}

fn is_nan(value: &Value) -> bool {
    matches!(value, Value::Float(f) if f.is_nan())
}

/// Ordering used by comparisons and `min`/`max`.
pub(crate) fn order(left: &Value, right: &Value) -> Option<Ordering> {
    match (text(left), text(right)) {
        (Some(a), Some(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
        _ => left.compare(right),
    }
}

/// `needle in haystack` for lists, map keys, object fields and substrings.
pub(crate) fn membership(needle: &Value, haystack: &Value) -> EvalResult<Value> {
    match haystack {
        Value::Null => Ok(Value::Null),
        Value::List(items) => Ok(Value::Bool(
            items.iter().any(|item| values_equal(needle, item)),
        )),
        Value::Map(map) => match text(needle) {
            Some(key) => Ok(Value::Bool(map.contains_key(key))),
            None => Err(membership_error(needle, haystack)),
        },
        Value::Object(obj) => match text(needle) {
            Some(name) => Ok(Value::Bool(obj.contains(name))),
            None => Err(membership_error(needle, haystack)),
        },
        Value::String(s) => match text(needle) {
            Some(sub) => Ok(Value::Bool(s.contains(sub))),
            None => Err(membership_error(needle, haystack)),
        },
        _ => Err(membership_error(needle, haystack)),
    }
}

fn membership_error(needle: &Value, haystack: &Value) -> EvalError {
    EvalError::type_error(format!(
        "cannot test {} membership in {}",
        needle.type_name(),
        haystack.type_name()
    ))
}

/// Named field of an object or key of a map. Null propagates.
pub(crate) fn field_of<'v>(base: &'v Value, name: &str) -> EvalResult<&'v Value> {
    match base {
        Value::Object(obj) => obj
            .get(name)
            .ok_or_else(|| EvalError::unknown_field(name, obj.type_name())),
        Value::Map(map) => map.get(name).ok_or_else(|| EvalError::missing_key(name)),
        Value::Null => Ok(&NULL),
        _ => Err(EvalError::type_error(format!(
            "cannot access field '{}' on {}",
            name,
            base.type_name()
        ))),
    }
}

fn index_of<'v>(base: &'v Value, index: &Value) -> EvalResult<&'v Value> {
    match (base, index) {
        (Value::Null, _) => Ok(&NULL),
        (Value::List(items), Value::Int(i)) => {
            let pos = resolve_index(*i, items.len())?;
            Ok(&items[pos])
        }
        (Value::Map(_) | Value::Object(_), key) => match text(key) {
            Some(key) => field_of(base, key),
            None => Err(EvalError::type_error(format!(
                "cannot index {} with {}",
                base.type_name(),
                key.type_name()
            ))),
        },
        _ => Err(EvalError::type_error(format!(
            "cannot index {} with {}",
            base.type_name(),
            index.type_name()
        ))),
    }
}

/// Negative indexes count from the end.
fn resolve_index(index: i64, len: usize) -> EvalResult<usize> {
    let pos = if index < 0 { len as i64 + index } else { index };
    if pos < 0 || pos >= len as i64 {
        Err(EvalError::index_out_of_range(index, len))
    } else {
        Ok(pos as usize)
    }
}

fn char_at(s: &str, index: i64) -> EvalResult<Value> {
    let len = s.chars().count();
    let pos = resolve_index(index, len)?;
    Ok(s.chars()
        .nth(pos)
        .map(|c| Value::String(c.to_string()))
        .unwrap_or(Value::Null))
}
