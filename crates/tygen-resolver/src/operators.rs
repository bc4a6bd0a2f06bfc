//! Heuristic operator recovery.
//!
//! Key-extraction (`keyof T`), value-of (`typeof v`) and indexed-access
//! (`T[K]`) expressions reach the engine as rendered text, because the host
//! type model does not expose a structural handle for every operator form.
//! This module recognizes the characteristic shapes and recovers them as
//! `Keyof`/`Typeof`/`Index` descriptors over opaque references.
//!
//! This family is best-effort by design: text that does not match the
//! expected pattern degrades to `TypeDescriptor::Unknown`, never to an error.
//! Callers must tolerate the degraded result.

use crate::expr::{OperatorFlags, TypeExpr};
use tygen_ir::TypeDescriptor;

/// Check if an expression renders a key-extraction operator.
///
/// A provider-supplied flag wins; otherwise the `keyof ` prefix decides.
pub fn is_key_extraction(expr: &TypeExpr) -> bool {
    match expr {
        TypeExpr::Raw { text, flags } => {
            flags.contains(OperatorFlags::KEYOF) || text.trim_start().starts_with("keyof ")
        }
        _ => false,
    }
}

/// Check if an expression renders a value-of query.
pub fn is_value_of(expr: &TypeExpr) -> bool {
    match expr {
        TypeExpr::Raw { text, flags } => {
            flags.contains(OperatorFlags::TYPEOF) || text.trim_start().starts_with("typeof ")
        }
        _ => false,
    }
}

/// Check if an expression renders an indexed access.
///
/// The textual fallback requires an object part before the bracket, so a
/// rendering that *starts* with `[` (a tuple, say) is not mistaken for one.
pub fn is_indexed_access(expr: &TypeExpr) -> bool {
    match expr {
        TypeExpr::Raw { text, flags } => {
            if flags.contains(OperatorFlags::INDEXED_ACCESS) {
                return true;
            }
            let t = text.trim();
            t.ends_with(']') && !t.starts_with('[') && t.contains('[')
        }
        _ => false,
    }
}

/// Recover `keyof <target>` from rendered text.
pub fn resolve_key_extraction(text: &str) -> TypeDescriptor {
    let t = text.trim();
    let Some(target) = t.strip_prefix("keyof ") else {
        tracing::trace!(text = t, "key extraction text did not match, degrading");
        return TypeDescriptor::Unknown;
    };
    let target = target.trim();
    if target.is_empty() {
        return TypeDescriptor::Unknown;
    }
    TypeDescriptor::Keyof {
        target: Box::new(resolve_operand(target)),
    }
}

/// Recover `typeof <target>` from rendered text.
pub fn resolve_value_of(text: &str) -> TypeDescriptor {
    let t = text.trim();
    let Some(target) = t.strip_prefix("typeof ") else {
        tracing::trace!(text = t, "value-of text did not match, degrading");
        return TypeDescriptor::Unknown;
    };
    let target = target.trim();
    if target.is_empty() {
        return TypeDescriptor::Unknown;
    }
    TypeDescriptor::Typeof {
        target: Box::new(resolve_operand(target)),
    }
}

/// Recover `<object>[<index>]` from rendered text.
///
/// The split happens at the *first* opening bracket, so nested accesses keep
/// the remainder inside the index sub-expression.
pub fn resolve_indexed_access(text: &str) -> TypeDescriptor {
    let t = text.trim();
    if !t.ends_with(']') {
        return TypeDescriptor::Unknown;
    }
    let Some(open) = t.find('[') else {
        return TypeDescriptor::Unknown;
    };
    let object = t[..open].trim();
    let index = t[open + 1..t.len() - 1].trim();
    if object.is_empty() || index.is_empty() {
        // Empty brackets (or a bare `[K]`) carry no recoverable structure.
        tracing::trace!(text = t, "indexed access text did not match, degrading");
        return TypeDescriptor::Unknown;
    }
    TypeDescriptor::Index {
        object: Box::new(resolve_operand(object)),
        index: Box::new(index_descriptor(index)),
    }
}

/// Re-resolve an extracted sub-expression.
///
/// Operator operands can themselves be operator renderings (`keyof typeof x`);
/// anything that is not gets wrapped as an opaque reference.
fn resolve_operand(text: &str) -> TypeDescriptor {
    let t = text.trim();
    if t.starts_with("keyof ") {
        return resolve_key_extraction(t);
    }
    if t.starts_with("typeof ") {
        return resolve_value_of(t);
    }
    if t.ends_with(']') && !t.starts_with('[') && t.contains('[') {
        return resolve_indexed_access(t);
    }
    TypeDescriptor::reference(t)
}

/// A quoted index renders as a string-literal key; anything else is an
/// opaque reference (a generic parameter name, usually).
fn index_descriptor(text: &str) -> TypeDescriptor {
    let t = text.trim();
    let quoted = (t.starts_with('"') && t.ends_with('"') && t.len() >= 2)
        || (t.starts_with('\'') && t.ends_with('\'') && t.len() >= 2);
    if quoted {
        TypeDescriptor::string_literal(&t[1..t.len() - 1])
    } else {
        resolve_operand(t)
    }
}
