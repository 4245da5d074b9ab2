//! Declared field types and runtime type tags.

use crate::Value;
use std::fmt;

/// Runtime tag of a value, used to select union variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Bool,
    Int,
    Float,
    String,
    /// A member of the named enum.
    Enum(String),
    /// An instance of the named class.
    Class(String),
    List,
    Map,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Null => write!(f, "null"),
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::Int => write!(f, "int"),
            TypeTag::Float => write!(f, "float"),
            TypeTag::String => write!(f, "string"),
            TypeTag::Enum(name) | TypeTag::Class(name) => write!(f, "{}", name),
            TypeTag::List => write!(f, "list"),
            TypeTag::Map => write!(f, "map"),
        }
    }
}

/// Primitive scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Null,
    Bool,
    Int,
    Float,
    String,
}

impl Primitive {
    fn tag(self) -> TypeTag {
        match self {
            Primitive::Null => TypeTag::Null,
            Primitive::Bool => TypeTag::Bool,
            Primitive::Int => TypeTag::Int,
            Primitive::Float => TypeTag::Float,
            Primitive::String => TypeTag::String,
        }
    }
}

/// The declared type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Primitive(Primitive),
    /// Reference to a declared enum.
    Enum(String),
    /// Reference to a declared class.
    Class(String),
    List(Box<FieldType>),
    /// String-keyed map; the key type is informational.
    Map(Box<FieldType>, Box<FieldType>),
    Union(Vec<FieldType>),
    Optional(Box<FieldType>),
}

impl FieldType {
    pub fn null() -> Self {
        FieldType::Primitive(Primitive::Null)
    }

    pub fn bool() -> Self {
        FieldType::Primitive(Primitive::Bool)
    }

    pub fn int() -> Self {
        FieldType::Primitive(Primitive::Int)
    }

    pub fn float() -> Self {
        FieldType::Primitive(Primitive::Float)
    }

    pub fn string() -> Self {
        FieldType::Primitive(Primitive::String)
    }

    pub fn class(name: impl Into<String>) -> Self {
        FieldType::Class(name.into())
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        FieldType::Enum(name.into())
    }

    pub fn list(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    pub fn map(key: FieldType, value: FieldType) -> Self {
        FieldType::Map(Box::new(key), Box::new(value))
    }

    pub fn union(variants: Vec<FieldType>) -> Self {
        FieldType::Union(variants)
    }

    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional(Box::new(inner))
    }

    /// The tag of a non-union type. Unions and optionals have no single tag.
    pub fn tag(&self) -> Option<TypeTag> {
        match self {
            FieldType::Primitive(p) => Some(p.tag()),
            FieldType::Enum(name) => Some(TypeTag::Enum(name.clone())),
            FieldType::Class(name) => Some(TypeTag::Class(name.clone())),
            FieldType::List(_) => Some(TypeTag::List),
            FieldType::Map(_, _) => Some(TypeTag::Map),
            FieldType::Union(_) | FieldType::Optional(_) => None,
        }
    }

    /// Flattened alternatives of this type.
    ///
    /// Nested unions are flattened and `T?` contributes `T`'s alternatives
    /// followed by `null`. A non-union type is its own single alternative.
    pub fn variants(&self) -> Vec<&FieldType> {
        let mut out = Vec::new();
        self.collect_variants(&mut out);
        out
    }

    fn collect_variants<'a>(&'a self, out: &mut Vec<&'a FieldType>) {
        static NULL: FieldType = FieldType::Primitive(Primitive::Null);
        match self {
            FieldType::Union(items) => {
                for item in items {
                    item.collect_variants(out);
                }
            }
            FieldType::Optional(inner) => {
                inner.collect_variants(out);
                out.push(&NULL);
            }
            other => out.push(other),
        }
    }

    /// Returns true if this type has more than one non-null alternative.
    pub fn is_union(&self) -> bool {
        self.variants()
            .iter()
            .filter(|v| v.tag() != Some(TypeTag::Null))
            .count()
            > 1
    }

    /// Shallow check that a value is an instance of this non-union type.
    ///
    /// An Int is accepted where a Float is declared.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldType::Union(_) | FieldType::Optional(_), _) => {
                self.select_variant(value).is_some()
            }
            (FieldType::Primitive(Primitive::Float), Value::Int(_)) => true,
            (FieldType::Primitive(p), v) => p.tag() == v.type_tag(),
            (FieldType::Enum(name), Value::Enum { type_name, .. }) => name == type_name,
            (FieldType::Class(name), Value::Object(obj)) => name == obj.type_name(),
            (FieldType::List(_), Value::List(_)) => true,
            (FieldType::Map(_, _), Value::Map(_)) => true,
            _ => false,
        }
    }

    /// Select the alternative of this type that the live value inhabits.
    ///
    /// An alternative whose tag equals the value's tag wins; otherwise the
    /// first alternative that accepts the value is chosen.
    pub fn select_variant(&self, value: &Value) -> Option<&FieldType> {
        let variants = self.variants();
        let tag = value.type_tag();
        variants
            .iter()
            .find(|v| v.tag().as_ref() == Some(&tag))
            .or_else(|| variants.iter().find(|v| v.accepts(value)))
            .copied()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Primitive(p) => write!(f, "{}", p.tag()),
            FieldType::Enum(name) | FieldType::Class(name) => write!(f, "{}", name),
            FieldType::List(inner) => match **inner {
                FieldType::Union(_) => write!(f, "({})[]", inner),
                _ => write!(f, "{}[]", inner),
            },
            FieldType::Map(key, value) => write!(f, "map<{}, {}>", key, value),
            FieldType::Union(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            FieldType::Optional(inner) => write!(f, "{}?", inner),
        }
    }
}
