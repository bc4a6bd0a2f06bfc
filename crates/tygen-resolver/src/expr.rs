//! The input type-expression model.
//!
//! A [`TypeExpr`] is the opaque handle the declaration provider hands to the
//! dispatcher. It mirrors the shape of a type annotation in the source
//! language without carrying any checker state: the engine only needs enough
//! structure to *describe* the type, never to validate it.
//!
//! Operator forms (`keyof T`, `typeof v`, `T[K]`) arrive as [`TypeExpr::Raw`]
//! carrying their rendered text. A provider whose host model knows which
//! operator it rendered can set the matching [`OperatorFlags`] bit; when the
//! flags are empty the operator resolver falls back to recognizing the
//! characteristic textual prefix.

use bitflags::bitflags;
use tygen_ir::{IndexKeyKind, LiteralValue};

bitflags! {
    /// Structural hints a provider may attach to a [`TypeExpr::Raw`] handle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct OperatorFlags: u8 {
        /// The text renders a key-extraction operator (`keyof T`).
        const KEYOF = 1 << 0;
        /// The text renders a value-of query (`typeof v`).
        const TYPEOF = 1 << 1;
        /// The text renders an indexed access (`T[K]`).
        const INDEXED_ACCESS = 1 << 2;
    }
}

/// One segment of a string-pattern type.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSpan {
    /// Static text between placeholders.
    Text(String),
    /// An embedded sub-type to be expanded or collapsed.
    Placeholder(TypeExpr),
}

/// One declared member of an object literal type.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMember {
    pub name: String,
    pub ty: TypeExpr,
    pub optional: bool,
    pub readonly: bool,
    /// Documentation comment attached to the member, if any. Only the first
    /// line survives resolution.
    pub docs: Option<String>,
}

impl ObjectMember {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            readonly: false,
            docs: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }
}

/// A declared index signature on an object literal type.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSignatureDecl {
    pub key_kind: IndexKeyKind,
    pub value: Box<TypeExpr>,
    pub readonly: bool,
}

/// A declared generic parameter with optional constraint and default.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericParamDecl {
    pub name: String,
    pub constraint: Option<TypeExpr>,
    pub default: Option<TypeExpr>,
}

impl GenericParamDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
            default: None,
        }
    }

    pub fn with_constraint(mut self, constraint: TypeExpr) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn with_default(mut self, default: TypeExpr) -> Self {
        self.default = Some(default);
        self
    }
}

/// A structural object type: ordered members, optional generic parameter
/// declarations, at most one index signature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectLiteral {
    pub members: Vec<ObjectMember>,
    pub generic_params: Vec<GenericParamDecl>,
    pub index_signature: Option<IndexSignatureDecl>,
}

impl ObjectLiteral {
    pub fn new(members: Vec<ObjectMember>) -> Self {
        Self {
            members,
            generic_params: Vec::new(),
            index_signature: None,
        }
    }
}

/// One parameter of a callable signature.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSig {
    pub name: String,
    pub optional: bool,
    /// Textual type annotation, when the provider had one.
    pub type_text: Option<String>,
}

impl ParamSig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
            type_text: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn typed(mut self, text: impl Into<String>) -> Self {
        self.type_text = Some(text.into());
        self
    }
}

/// A callable type, captured at the level of detail the provider exposes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionSig {
    pub params: Vec<ParamSig>,
    /// Textual return annotation, when the provider had one.
    pub return_text: Option<String>,
}

/// A type expression handed to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A built-in primitive (`string`, `number`, `boolean`, ...).
    Primitive(String),
    /// A literal type (`"dev"`, `42`, `true`).
    Literal(LiteralValue),
    /// A structural object type.
    Object(ObjectLiteral),
    /// `T[]`
    Array(Box<TypeExpr>),
    /// `[A, B, C]`
    Tuple(Vec<TypeExpr>),
    /// `A | B | C`
    Union(Vec<TypeExpr>),
    /// `A & B & C`
    Intersection(Vec<TypeExpr>),
    /// A callable type.
    Function(FunctionSig),
    /// A named reference, possibly with type arguments (`Foo`, `Pick<T, K>`).
    Ref {
        name: String,
        type_args: Vec<TypeExpr>,
    },
    /// A string-pattern type built from static text and placeholders.
    Template(Vec<TemplateSpan>),
    /// A reference to a named enum declaration, kept nominal.
    EnumRef(String),
    /// A rendered type expression with no structural handle. Operator forms
    /// are recovered from this text heuristically.
    Raw {
        text: String,
        flags: OperatorFlags,
    },
}

impl TypeExpr {
    pub fn primitive(name: impl Into<String>) -> Self {
        TypeExpr::Primitive(name.into())
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        TypeExpr::Literal(LiteralValue::String(value.into()))
    }

    pub fn number_literal(value: f64) -> Self {
        TypeExpr::Literal(LiteralValue::Number(value))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeExpr::Ref {
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    pub fn applied(name: impl Into<String>, type_args: Vec<TypeExpr>) -> Self {
        TypeExpr::Ref {
            name: name.into(),
            type_args,
        }
    }

    pub fn array(element: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(element))
    }

    /// A raw rendering with no structural hint.
    pub fn raw(text: impl Into<String>) -> Self {
        TypeExpr::Raw {
            text: text.into(),
            flags: OperatorFlags::empty(),
        }
    }

    /// A raw rendering with an operator hint from the host model.
    pub fn raw_flagged(text: impl Into<String>, flags: OperatorFlags) -> Self {
        TypeExpr::Raw {
            text: text.into(),
            flags,
        }
    }
}
