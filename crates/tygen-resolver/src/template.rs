//! String-pattern type expansion.
//!
//! A pattern type interleaves static text with placeholder sub-types. When
//! every placeholder resolves to a finite set of literals, the pattern
//! expands to the union of all literal strings formed by the cartesian
//! product, in construction order: `https://{dev|prod}-{us|eu}.example.com`
//! yields four members. When any placeholder is an unbounded primitive, the
//! whole pattern collapses to that primitive instead of enumerating.
//!
//! The dispatcher's own resolve function comes in as a callback so this
//! module never depends on the dispatcher directly; nested patterns recurse
//! through it naturally.

use crate::expr::{TemplateSpan, TypeExpr};
use tygen_ir::{ResolveError, TypeDescriptor};

/// Outcome of resolving one placeholder.
enum PlaceholderValues {
    /// Every possibility, rendered to text.
    Finite(Vec<String>),
    /// An unbounded primitive; enumeration is impossible.
    Unbounded(String),
}

/// Probe-and-resolve a string-pattern type.
///
/// Returns `Ok(None)` when `expr` is not a pattern at all, letting the
/// dispatcher fall back cheaply. A pattern with zero placeholders resolves to
/// a single literal of its static text (the empty string included). A
/// product larger than `expansion_limit` collapses to the `string` primitive
/// rather than enumerating; the limit is checked before any strings are
/// built.
pub fn resolve_pattern(
    expr: &TypeExpr,
    expansion_limit: usize,
    resolve_sub: &mut dyn FnMut(&TypeExpr) -> Result<TypeDescriptor, ResolveError>,
) -> Result<Option<TypeDescriptor>, ResolveError> {
    let TypeExpr::Template(spans) = expr else {
        return Ok(None);
    };

    tracing::trace!(span_count = spans.len(), "resolving string pattern");

    // All-text patterns concatenate to a single literal.
    let all_text = spans.iter().all(|s| matches!(s, TemplateSpan::Text(_)));
    if all_text {
        let mut text = String::new();
        for span in spans {
            if let TemplateSpan::Text(t) = span {
                text.push_str(t);
            }
        }
        return Ok(Some(TypeDescriptor::string_literal(text)));
    }

    // First pass: resolve every placeholder and pre-compute the product size
    // against the limit, so no expansion work happens if it cannot finish.
    let mut resolved: Vec<Vec<String>> = Vec::new();
    let mut total: usize = 1;
    for span in spans {
        let TemplateSpan::Placeholder(sub) = span else {
            continue;
        };
        let desc = resolve_sub(sub)?;
        match placeholder_values(&desc) {
            Some(PlaceholderValues::Finite(values)) => {
                total = total.saturating_mul(values.len().max(1));
                if values.is_empty() {
                    // A placeholder with no possibilities empties the product.
                    return Ok(Some(TypeDescriptor::Never));
                }
                if total > expansion_limit {
                    tracing::debug!(
                        limit = expansion_limit,
                        "pattern expansion past limit, collapsing to string"
                    );
                    return Ok(Some(TypeDescriptor::primitive("string")));
                }
                resolved.push(values);
            }
            Some(PlaceholderValues::Unbounded(primitive)) => {
                tracing::trace!(%primitive, "unbounded placeholder, collapsing pattern");
                return Ok(Some(TypeDescriptor::Primitive { name: primitive }));
            }
            None => {
                // No literal rendering for this placeholder (an object, an
                // unexpanded reference). The pattern still describes strings.
                return Ok(Some(TypeDescriptor::primitive("string")));
            }
        }
    }

    // Second pass: cartesian product in construction order.
    let mut combinations = vec![String::new()];
    let mut next_placeholder = 0usize;
    for span in spans {
        match span {
            TemplateSpan::Text(text) => {
                for combo in &mut combinations {
                    combo.push_str(text);
                }
            }
            TemplateSpan::Placeholder(_) => {
                let values = &resolved[next_placeholder];
                next_placeholder += 1;
                let mut expanded = Vec::with_capacity(combinations.len() * values.len());
                for combo in &combinations {
                    for value in values {
                        expanded.push(format!("{}{}", combo, value));
                    }
                }
                combinations = expanded;
            }
        }
    }

    let mut members: Vec<TypeDescriptor> = combinations
        .into_iter()
        .map(TypeDescriptor::string_literal)
        .collect();
    if members.len() == 1 {
        let only = members.remove(0);
        return Ok(Some(only));
    }
    Ok(Some(TypeDescriptor::Union { members }))
}

/// Classify a resolved placeholder.
///
/// Literals (and unions of literals, recursively) render to their finite
/// string forms; bare primitives are unbounded; anything else has no literal
/// rendering at all.
fn placeholder_values(desc: &TypeDescriptor) -> Option<PlaceholderValues> {
    match desc {
        TypeDescriptor::Literal { value } => {
            Some(PlaceholderValues::Finite(vec![value.to_text()]))
        }
        TypeDescriptor::Union { members } => {
            let mut values = Vec::with_capacity(members.len());
            for member in members {
                match placeholder_values(member)? {
                    PlaceholderValues::Finite(more) => values.extend(more),
                    unbounded @ PlaceholderValues::Unbounded(_) => return Some(unbounded),
                }
            }
            Some(PlaceholderValues::Finite(values))
        }
        TypeDescriptor::Primitive { name } => {
            Some(PlaceholderValues::Unbounded(name.clone()))
        }
        TypeDescriptor::Never => Some(PlaceholderValues::Finite(Vec::new())),
        _ => None,
    }
}
