//! Expression classification.
//!
//! A single match that sorts any [`TypeExpr`] into the category the
//! dispatcher routes on. Each variant carries the borrowed data the matching
//! resolver needs, so the expression is looked at exactly once per dispatch.

use crate::expr::{FunctionSig, ObjectLiteral, TemplateSpan, TypeExpr};
use crate::operators;
use tygen_ir::LiteralValue;

/// The routing category of a type expression.
#[derive(Debug)]
pub enum ExprClassification<'a> {
    Primitive(&'a str),
    Literal(&'a LiteralValue),
    Object(&'a ObjectLiteral),
    Array(&'a TypeExpr),
    Tuple(&'a [TypeExpr]),
    Union(&'a [TypeExpr]),
    Intersection(&'a [TypeExpr]),
    Callable(&'a FunctionSig),
    Reference {
        name: &'a str,
        type_args: &'a [TypeExpr],
    },
    Template(&'a [TemplateSpan]),
    Enum(&'a str),
    /// `keyof T`, recovered from rendered text.
    KeyExtraction(&'a str),
    /// `typeof v`, recovered from rendered text.
    ValueOf(&'a str),
    /// `T[K]`, recovered from rendered text.
    IndexedAccess(&'a str),
    /// Rendered text matching no known form.
    Unrecognized(&'a str),
}

/// Classify an expression into its routing category.
///
/// Raw renderings are split by the operator predicates: a provider-supplied
/// flag wins, then the characteristic textual prefix, then `Unrecognized`.
pub fn classify(expr: &TypeExpr) -> ExprClassification<'_> {
    match expr {
        TypeExpr::Primitive(name) => ExprClassification::Primitive(name.as_str()),
        TypeExpr::Literal(value) => ExprClassification::Literal(value),
        TypeExpr::Object(obj) => ExprClassification::Object(obj),
        TypeExpr::Array(elem) => ExprClassification::Array(elem),
        TypeExpr::Tuple(elems) => ExprClassification::Tuple(elems.as_slice()),
        TypeExpr::Union(branches) => ExprClassification::Union(branches.as_slice()),
        TypeExpr::Intersection(branches) => {
            ExprClassification::Intersection(branches.as_slice())
        }
        TypeExpr::Function(sig) => ExprClassification::Callable(sig),
        TypeExpr::Ref { name, type_args } => ExprClassification::Reference {
            name: name.as_str(),
            type_args: type_args.as_slice(),
        },
        TypeExpr::Template(spans) => ExprClassification::Template(spans.as_slice()),
        TypeExpr::EnumRef(name) => ExprClassification::Enum(name.as_str()),
        TypeExpr::Raw { text, .. } => {
            if operators::is_key_extraction(expr) {
                ExprClassification::KeyExtraction(text)
            } else if operators::is_value_of(expr) {
                ExprClassification::ValueOf(text)
            } else if operators::is_indexed_access(expr) {
                ExprClassification::IndexedAccess(text)
            } else {
                ExprClassification::Unrecognized(text)
            }
        }
    }
}
