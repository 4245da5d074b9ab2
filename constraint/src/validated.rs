//! The validated value tree.
//!
//! Mirrors the input value. Any field carrying check constraints, and any
//! object whose class declares checks, is wrapped in `Checked` together with
//! the results of those checks.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value as Json};
use vigil_core::{Object, Value};

use crate::Checks;

/// A value that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    /// A primitive, enum member or null.
    Scalar(Value),
    List(Vec<Validated>),
    Map(BTreeMap<String, Validated>),
    /// An object; fields in declaration order.
    Object {
        type_name: String,
        fields: Vec<(String, Validated)>,
    },
    /// A value together with the checks evaluated on it.
    Checked {
        value: Box<Validated>,
        checks: Checks,
    },
}

impl Validated {
    /// Wrap an unvalidated value.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::List(items) => {
                Validated::List(items.into_iter().map(Validated::from_value).collect())
            }
            Value::Map(map) => Validated::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Validated::from_value(v)))
                    .collect(),
            ),
            Value::Object(obj) => Validated::Object {
                type_name: obj.type_name().to_string(),
                fields: obj
                    .fields()
                    .map(|(k, v)| (k.to_string(), Validated::from_value(v.clone())))
                    .collect(),
            },
            scalar => Validated::Scalar(scalar),
        }
    }

    /// Field of an object, looking through a `Checked` wrapper.
    pub fn field(&self, name: &str) -> Option<&Validated> {
        match self.value() {
            Validated::Object { fields, .. } => {
                fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Element of a list, looking through a `Checked` wrapper.
    pub fn index(&self, index: usize) -> Option<&Validated> {
        match self.value() {
            Validated::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Entry of a map, looking through a `Checked` wrapper.
    pub fn key(&self, key: &str) -> Option<&Validated> {
        match self.value() {
            Validated::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// The checks attached to this node, if it is wrapped.
    pub fn checks(&self) -> Option<&Checks> {
        match self {
            Validated::Checked { checks, .. } => Some(checks),
            _ => None,
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, Validated::Checked { .. })
    }

    /// This node without its `Checked` wrapper.
    pub fn value(&self) -> &Validated {
        match self {
            Validated::Checked { value, .. } => value,
            other => other,
        }
    }

    /// The scalar held by this node, if any.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self.value() {
            Validated::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// Strip every wrapper and rebuild the plain value.
    pub fn into_value(self) -> Value {
        match self {
            Validated::Scalar(v) => v,
            Validated::List(items) => {
                Value::List(items.into_iter().map(Validated::into_value).collect())
            }
            Validated::Map(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, v.into_value()))
                    .collect(),
            ),
            Validated::Object { type_name, fields } => {
                let mut obj = Object::new(type_name);
                for (name, value) in fields {
                    obj.insert(name, value.into_value());
                }
                Value::Object(obj)
            }
            Validated::Checked { value, .. } => value.into_value(),
        }
    }

    /// Render as JSON; wrapped nodes become `{"value": ..., "checks": ...}`.
    pub fn to_json(&self) -> Json {
        match self {
            Validated::Scalar(v) => v.to_json(),
            Validated::List(items) => Json::Array(items.iter().map(Validated::to_json).collect()),
            Validated::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Validated::Object { fields, .. } => {
                let mut out = Map::new();
                for (name, value) in fields {
                    out.insert(name.clone(), value.to_json());
                }
                Json::Object(out)
            }
            Validated::Checked { value, checks } => json!({
                "value": value.to_json(),
                "checks": checks.to_json(),
            }),
        }
    }
}
