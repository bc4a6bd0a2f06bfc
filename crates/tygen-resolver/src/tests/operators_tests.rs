use crate::expr::{OperatorFlags, TypeExpr};
use crate::operators::{
    is_indexed_access, is_key_extraction, is_value_of, resolve_indexed_access,
    resolve_key_extraction, resolve_value_of,
};
use tygen_ir::TypeDescriptor;

#[test]
fn test_predicates_from_text_prefix() {
    assert!(is_key_extraction(&TypeExpr::raw("keyof Person")));
    assert!(is_value_of(&TypeExpr::raw("typeof config")));
    assert!(is_indexed_access(&TypeExpr::raw("Person[\"name\"]")));

    assert!(!is_key_extraction(&TypeExpr::raw("keyofPerson")));
    assert!(!is_value_of(&TypeExpr::raw("typeofconfig")));
    // A rendering that starts with a bracket is not an indexed access.
    assert!(!is_indexed_access(&TypeExpr::raw("[string, number]")));
    assert!(!is_key_extraction(&TypeExpr::primitive("string")));
}

#[test]
fn test_predicates_from_provider_flags() {
    // A structural flag wins even when the text alone would not match.
    let flagged = TypeExpr::raw_flagged("Person", OperatorFlags::KEYOF);
    assert!(is_key_extraction(&flagged));

    let flagged = TypeExpr::raw_flagged("cfg", OperatorFlags::TYPEOF);
    assert!(is_value_of(&flagged));

    let flagged = TypeExpr::raw_flagged("x", OperatorFlags::INDEXED_ACCESS);
    assert!(is_indexed_access(&flagged));
}

#[test]
fn test_resolve_key_extraction() {
    let resolved = resolve_key_extraction("keyof Person");
    assert_eq!(
        resolved,
        TypeDescriptor::Keyof {
            target: Box::new(TypeDescriptor::reference("Person")),
        }
    );
}

#[test]
fn test_resolve_value_of() {
    let resolved = resolve_value_of("typeof defaultConfig");
    assert_eq!(
        resolved,
        TypeDescriptor::Typeof {
            target: Box::new(TypeDescriptor::reference("defaultConfig")),
        }
    );
}

#[test]
fn test_resolve_indexed_access_with_quoted_index() {
    let resolved = resolve_indexed_access("Person[\"name\"]");
    assert_eq!(
        resolved,
        TypeDescriptor::Index {
            object: Box::new(TypeDescriptor::reference("Person")),
            index: Box::new(TypeDescriptor::string_literal("name")),
        }
    );
}

#[test]
fn test_resolve_indexed_access_with_reference_index() {
    let resolved = resolve_indexed_access("Person[K]");
    assert_eq!(
        resolved,
        TypeDescriptor::Index {
            object: Box::new(TypeDescriptor::reference("Person")),
            index: Box::new(TypeDescriptor::reference("K")),
        }
    );
}

#[test]
fn test_nested_operator_operands_re_resolve() {
    let resolved = resolve_key_extraction("keyof typeof config");
    assert_eq!(
        resolved,
        TypeDescriptor::Keyof {
            target: Box::new(TypeDescriptor::Typeof {
                target: Box::new(TypeDescriptor::reference("config")),
            }),
        }
    );
}

#[test]
fn test_malformed_text_degrades_to_unknown() {
    // Empty brackets carry no recoverable structure.
    assert_eq!(resolve_indexed_access("Person[]"), TypeDescriptor::Unknown);
    // Missing operand.
    assert_eq!(resolve_key_extraction("keyof "), TypeDescriptor::Unknown);
    assert_eq!(resolve_value_of("typeof "), TypeDescriptor::Unknown);
    // Text that never matched the pattern at all.
    assert_eq!(resolve_key_extraction("Person"), TypeDescriptor::Unknown);
    assert_eq!(resolve_indexed_access("Person"), TypeDescriptor::Unknown);
}
