//! The type-descriptor IR.
//!
//! A [`TypeDescriptor`] is the normalized, serializable description of a type
//! produced by the resolution engine. It is a closed, tagged union: consumers
//! match on it exhaustively and never see partially-resolved shapes (a failed
//! resolution returns an error, not a half-built tree).

use serde::{Deserialize, Serialize};

/// A literal value carried by a literal type.
///
/// Numbers are stored as `f64` to match the source language's single number
/// type; the string-pattern resolver renders them back to text with the same
/// rules the source language uses for `toString`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl LiteralValue {
    /// Render the literal the way the source language stringifies it.
    ///
    /// Numbers follow `Number#toString(10)`: integer-like values print without
    /// a fraction, and magnitudes outside `[1e-6, 1e21)` use scientific
    /// notation with an explicit `+` on positive exponents.
    pub fn to_text(&self) -> String {
        match self {
            LiteralValue::String(s) => s.clone(),
            LiteralValue::Boolean(b) => {
                if *b {
                    "true".to_string()
                } else {
                    "false".to_string()
                }
            }
            LiteralValue::Number(n) => {
                let abs = n.abs();
                if *n == 0.0 {
                    "0".to_string()
                } else if abs < 1e-6 || abs >= 1e21 {
                    let mut s = format!("{:e}", n);
                    // Rust prints "1e21" where the source language prints "1e+21".
                    if s.contains('e') && !s.contains("e-") && !s.contains("e+") {
                        let parts: Vec<&str> = s.split('e').collect();
                        if parts.len() == 2 {
                            s = format!("{}e+{}", parts[0], parts[1]);
                        }
                    }
                    s
                } else if n.fract() == 0.0 && abs < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }
}

/// The kind of key an index signature accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKeyKind {
    String,
    Number,
}

/// One member of a resolved object type.
///
/// Member order is significant and preserved from the declaration; downstream
/// code generation relies on it for stable output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    pub optional: bool,
    pub readonly: bool,
    /// Single-line documentation comment attached to the member, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

/// A resolved index signature. At most one per object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSignatureDescriptor {
    pub key_kind: IndexKeyKind,
    pub value_type: Box<TypeDescriptor>,
    pub readonly: bool,
}

/// A declared generic parameter, with its constraint and default if present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericParamDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<TypeDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<TypeDescriptor>,
}

/// The resolved description of a type.
///
/// Exactly one variant is active per instance. The enum is closed: adding a
/// variant is a breaking change for every consumer, which is intentional —
/// code generators must handle every shape the engine can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TypeDescriptor {
    /// A built-in primitive, named as in the source language
    /// (`string`, `number`, `boolean`, ...).
    Primitive { name: String },
    /// A structural object type with its resolved member list.
    Object {
        properties: Vec<PropertyDescriptor>,
        #[serde(skip_serializing_if = "Option::is_none")]
        generic_params: Option<Vec<GenericParamDescriptor>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        index_signature: Option<IndexSignatureDescriptor>,
    },
    /// `T[]`
    Array { element: Box<TypeDescriptor> },
    /// `[A, B, C]`
    Tuple { elements: Vec<TypeDescriptor> },
    /// `A | B | C`, member order preserved.
    Union { members: Vec<TypeDescriptor> },
    /// `A & B & C`, member order preserved.
    Intersection { members: Vec<TypeDescriptor> },
    /// A callable, captured as best-effort signature text.
    Function { signature: String },
    /// A literal type (`"dev"`, `42`, `true`).
    Literal { value: LiteralValue },
    /// A named reference the engine did not (or could not) expand.
    Reference {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
    /// An unbound generic parameter left in place.
    Generic { name: String },
    /// Key extraction: the set of keys of the target.
    Keyof { target: Box<TypeDescriptor> },
    /// Value-of query: the type of a named value.
    Typeof { target: Box<TypeDescriptor> },
    /// Indexed access: the type found at `index` of `object`.
    Index {
        object: Box<TypeDescriptor>,
        index: Box<TypeDescriptor>,
    },
    /// A named enum, kept nominal.
    Enum { name: String },
    /// Resolution degraded; no structural information is available.
    Unknown,
    /// The empty type.
    Never,
}

impl TypeDescriptor {
    pub fn primitive(name: impl Into<String>) -> Self {
        TypeDescriptor::Primitive { name: name.into() }
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        TypeDescriptor::Literal {
            value: LiteralValue::String(value.into()),
        }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeDescriptor::Reference {
            name: name.into(),
            source: None,
        }
    }

    /// Check if this descriptor is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive { .. })
    }

    /// Check if this descriptor is a literal type.
    pub fn is_literal(&self) -> bool {
        matches!(self, TypeDescriptor::Literal { .. })
    }

    /// Check if this descriptor is an object-like type.
    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Object { .. } | TypeDescriptor::Function { .. }
        )
    }

    /// Check if this descriptor is a composite (union or intersection).
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Union { .. } | TypeDescriptor::Intersection { .. }
        )
    }

    /// Check if this descriptor is a collection (array or tuple).
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Array { .. } | TypeDescriptor::Tuple { .. }
        )
    }

    /// Check if this descriptor is one of the operator forms recovered
    /// heuristically from rendered text.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Keyof { .. }
                | TypeDescriptor::Typeof { .. }
                | TypeDescriptor::Index { .. }
        )
    }
}
