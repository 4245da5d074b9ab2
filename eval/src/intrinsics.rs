//! Intrinsic function library.
//!
//! Functions are called directly (`length(this)`) or through filter pipes
//! (`this|length`), which pass the piped value as the first argument.

use crate::eval::{field_of, membership, order, text, values_equal};
use crate::{EvalError, EvalResult, Evaluator};
use regex_lite::Regex;
use std::borrow::Cow;
use std::cmp::Ordering;
use vigil_core::Value;

type Args<'a> = Vec<Cow<'a, Value>>;

impl Evaluator {
    /// Evaluate a function call over already evaluated arguments.
    pub(crate) fn call(&self, name: &str, args: Args<'_>) -> EvalResult<Value> {
        let name_lower = name.to_lowercase();

        match name_lower.as_str() {
            "length" | "len" => {
                arity(name, &args, 1)?;
                match &*args[0] {
                    Value::Null => Ok(Value::Null),
                    v => v.len().map(|n| Value::Int(n as i64)).ok_or_else(|| {
                        EvalError::type_error(format!("{} has no length", v.type_name()))
                    }),
                }
            }
            "lower" => string_map(name, &args, str::to_lowercase),
            "upper" => string_map(name, &args, str::to_uppercase),
            "trim" => string_map(name, &args, |s| s.trim().to_string()),
            "contains" => {
                arity(name, &args, 2)?;
                membership(&args[1], &args[0])
            }
            "starts_with" => string_test(name, &args, |s, p| s.starts_with(p)),
            "ends_with" => string_test(name, &args, |s, p| s.ends_with(p)),
            "regex_match" => {
                arity(name, &args, 2)?;
                let pattern = text(&args[1]).ok_or_else(|| {
                    EvalError::type_error("regex_match expects a string pattern")
                })?;
                let regex =
                    Regex::new(pattern).map_err(|e| EvalError::invalid_regex(pattern, e))?;
                match &*args[0] {
                    Value::Null => Ok(Value::Null),
                    v => text(v)
                        .map(|s| Value::Bool(regex.is_match(s)))
                        .ok_or_else(|| {
                            EvalError::type_error(format!(
                                "regex_match expects a string, got {}",
                                v.type_name()
                            ))
                        }),
                }
            }
            "unique" => {
                arity(name, &args, 1)?;
                let items = list_arg(name, &args[0])?;
                let mut seen: Vec<Value> = Vec::with_capacity(items.len());
                for item in items {
                    if !seen.iter().any(|s| values_equal(s, item)) {
                        seen.push(item.clone());
                    }
                }
                Ok(Value::List(seen))
            }
            "pluck" | "map" => {
                arity(name, &args, 2)?;
                let items = list_arg(name, &args[0])?;
                let field = text(&args[1]).ok_or_else(|| {
                    EvalError::type_error(format!("{} expects a field name", name))
                })?;
                let values: EvalResult<Vec<Value>> = items
                    .iter()
                    .map(|item| field_of(item, field).cloned())
                    .collect();
                Ok(Value::List(values?))
            }
            "sum" => {
                arity(name, &args, 1)?;
                let items = list_arg(name, &args[0])?;
                sum(items)
            }
            "min" => extreme(name, &args, Ordering::Less),
            "max" => extreme(name, &args, Ordering::Greater),
            "abs" => {
                arity(name, &args, 1)?;
                match &*args[0] {
                    Value::Null => Ok(Value::Null),
                    Value::Int(i) => i
                        .checked_abs()
                        .map(Value::Int)
                        .ok_or_else(|| EvalError::type_error("integer overflow")),
                    Value::Float(f) => Ok(Value::Float(f.abs())),
                    v => Err(EvalError::type_error(format!(
                        "abs expects a number, got {}",
                        v.type_name()
                    ))),
                }
            }
            "round" => {
                if args.is_empty() || args.len() > 2 {
                    return Err(EvalError::arity(name, "1 or 2", args.len()));
                }
                let digits = match args.get(1).map(|d| &**d) {
                    None => None,
                    Some(Value::Int(d)) => Some(*d),
                    Some(v) => {
                        return Err(EvalError::type_error(format!(
                            "round expects integer digits, got {}",
                            v.type_name()
                        )))
                    }
                };
                match (&*args[0], digits) {
                    (Value::Null, _) => Ok(Value::Null),
                    (Value::Int(i), None) => Ok(Value::Int(*i)),
                    (Value::Float(f), None) => Ok(Value::Float(f.round())),
                    (v, Some(d)) if v.is_numeric() => {
                        let scale = 10f64.powi(d.clamp(-308, 308) as i32);
                        let x = v.as_float().unwrap_or_default();
                        Ok(Value::Float((x * scale).round() / scale))
                    }
                    (v, _) => Err(EvalError::type_error(format!(
                        "round expects a number, got {}",
                        v.type_name()
                    ))),
                }
            }
            "keys" => {
                arity(name, &args, 1)?;
                match &*args[0] {
                    Value::Map(map) => Ok(Value::List(
                        map.keys().map(|k| Value::String(k.clone())).collect(),
                    )),
                    Value::Object(obj) => Ok(Value::List(
                        obj.fields().map(|(k, _)| Value::from(k)).collect(),
                    )),
                    v => Err(EvalError::type_error(format!(
                        "keys expects a map or object, got {}",
                        v.type_name()
                    ))),
                }
            }
            "values" => {
                arity(name, &args, 1)?;
                match &*args[0] {
                    Value::Map(map) => Ok(Value::List(map.values().cloned().collect())),
                    Value::Object(obj) => {
                        Ok(Value::List(obj.fields().map(|(_, v)| v.clone()).collect()))
                    }
                    v => Err(EvalError::type_error(format!(
                        "values expects a map or object, got {}",
                        v.type_name()
                    ))),
                }
            }
            "first" | "last" => {
                arity(name, &args, 1)?;
                let first = name_lower == "first";
                match &*args[0] {
                    Value::Null => Ok(Value::Null),
                    Value::List(items) => {
                        let item = if first { items.first() } else { items.last() };
                        Ok(item.cloned().unwrap_or(Value::Null))
                    }
                    Value::String(s) => {
                        let c = if first { s.chars().next() } else { s.chars().last() };
                        Ok(c.map(|c| Value::String(c.to_string()))
                            .unwrap_or(Value::Null))
                    }
                    v => Err(EvalError::type_error(format!(
                        "{} expects a list or string, got {}",
                        name,
                        v.type_name()
                    ))),
                }
            }
            "is_null" => {
                arity(name, &args, 1)?;
                Ok(Value::Bool(args[0].is_null()))
            }
            _ => Err(EvalError::unknown_function(name)),
        }
    }
}

fn arity(name: &str, args: &Args<'_>, expected: usize) -> EvalResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(EvalError::arity(name, expected.to_string(), args.len()))
    }
}

fn list_arg<'v>(name: &str, val: &'v Value) -> EvalResult<&'v [Value]> {
    val.as_list().ok_or_else(|| {
        EvalError::type_error(format!(
            "{} expects a list, got {}",
            name,
            val.type_name()
        ))
    })
}

fn string_map(name: &str, args: &Args<'_>, f: impl Fn(&str) -> String) -> EvalResult<Value> {
    arity(name, args, 1)?;
    match &*args[0] {
        Value::Null => Ok(Value::Null),
        v => text(v).map(|s| Value::String(f(s))).ok_or_else(|| {
            EvalError::type_error(format!(
                "{} expects a string, got {}",
                name,
                v.type_name()
            ))
        }),
    }
}

fn string_test(
    name: &str,
    args: &Args<'_>,
    f: impl Fn(&str, &str) -> bool,
) -> EvalResult<Value> {
    arity(name, args, 2)?;
    match (&*args[0], &*args[1]) {
        (Value::Null, _) => Ok(Value::Null),
        (a, b) => match (text(a), text(b)) {
            (Some(s), Some(p)) => Ok(Value::Bool(f(s, p))),
            _ => Err(EvalError::type_error(format!(
                "{} expects strings, got {} and {}",
                name,
                a.type_name(),
                b.type_name()
            ))),
        },
    }
}

fn sum(items: &[Value]) -> EvalResult<Value> {
    let mut total = Value::Int(0);
    for item in items {
        total = match (&total, item) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_add(*b)
                .map(Value::Int)
                .ok_or_else(|| EvalError::type_error("integer overflow"))?,
            (a, b) if b.is_numeric() => match (a.as_float(), b.as_float()) {
                (Some(x), Some(y)) => Value::Float(x + y),
                _ => return Err(EvalError::type_error("sum expects numbers")),
            },
            (_, b) => {
                return Err(EvalError::type_error(format!(
                    "sum expects numbers, got {}",
                    b.type_name()
                )))
            }
        };
    }
    Ok(total)
}

/// `min(list)` / `max(list)` or `min(a, b, ...)` / `max(a, b, ...)`.
/// An empty list yields null.
fn extreme(name: &str, args: &Args<'_>, keep: Ordering) -> EvalResult<Value> {
    let candidates: Vec<&Value> = match args.len() {
        0 => return Err(EvalError::arity(name, "at least 1", 0)),
        1 => list_arg(name, &args[0])?.iter().collect(),
        _ => args.iter().map(|a| &**a).collect(),
    };

    let mut best: Option<&Value> = None;
    for candidate in candidates {
        best = match best {
            None => Some(candidate),
            Some(current) => {
                let ordering = order(candidate, current).ok_or_else(|| {
                    EvalError::type_error(format!(
                        "{} cannot compare {} and {}",
                        name,
                        candidate.type_name(),
                        current.type_name()
                    ))
                })?;
                if ordering == keep {
                    Some(candidate)
                } else {
                    Some(current)
                }
            }
        };
    }

    Ok(best.cloned().unwrap_or(Value::Null))
}
