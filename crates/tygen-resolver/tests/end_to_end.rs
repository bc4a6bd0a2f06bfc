//! End-to-end resolution through the public API: in-memory declarations in,
//! serialized descriptor JSON out.

use serde_json::json;
use tygen_ir::TypeDescriptor;
use tygen_resolver::{
    GenericParamDecl, MemoryProvider, ObjectLiteral, ObjectMember, SourceId, TemplateSpan,
    TypeDecl, TypeExpr, TypeResolver,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn models() -> SourceId {
    SourceId::new("src/models.ts")
}

fn build_provider() -> MemoryProvider {
    let mut provider = MemoryProvider::new();

    provider.insert(
        models(),
        TypeDecl::new(
            "Address",
            TypeExpr::Object(ObjectLiteral::new(vec![
                ObjectMember::new("street", TypeExpr::primitive("string")),
                ObjectMember::new("city", TypeExpr::primitive("string")),
                ObjectMember::new("zip", TypeExpr::primitive("string")).optional(),
            ])),
        ),
    );
    provider.insert(
        models(),
        TypeDecl::new(
            "User",
            TypeExpr::Object(ObjectLiteral::new(vec![
                ObjectMember::new("id", TypeExpr::primitive("string"))
                    .readonly()
                    .with_docs("Stable identifier."),
                ObjectMember::new("tags", TypeExpr::array(TypeExpr::primitive("string")))
                    .optional(),
                ObjectMember::new("address", TypeExpr::reference("Address")),
            ])),
        ),
    );
    provider.insert(
        models(),
        TypeDecl::new(
            "ApiResult",
            TypeExpr::Object(ObjectLiteral::new(vec![
                ObjectMember::new("data", TypeExpr::reference("T")),
                ObjectMember::new("error", TypeExpr::primitive("string")).optional(),
            ])),
        )
        .with_params(vec![GenericParamDecl::new("T")]),
    );
    provider.insert(
        models(),
        TypeDecl::new(
            "UserResult",
            TypeExpr::applied("ApiResult", vec![TypeExpr::reference("User")]),
        ),
    );
    provider.insert(
        models(),
        TypeDecl::new(
            "Endpoint",
            TypeExpr::Template(vec![
                TemplateSpan::Text("/api/".to_string()),
                TemplateSpan::Placeholder(TypeExpr::Union(vec![
                    TypeExpr::string_literal("users"),
                    TypeExpr::string_literal("orders"),
                ])),
            ]),
        ),
    );
    provider
}

#[test]
fn test_resolves_nested_declarations_structurally() {
    init_tracing();
    let provider = build_provider();
    let mut resolver = TypeResolver::new(&provider);

    let user = resolver.resolve_named(&models(), "User").unwrap();
    let TypeDescriptor::Object { properties, .. } = &user else {
        panic!("expected object");
    };
    assert_eq!(properties.len(), 3);

    let TypeDescriptor::Object {
        properties: address,
        ..
    } = &properties[2].ty
    else {
        panic!("expected inlined address object");
    };
    assert_eq!(address[1].name, "city");
    assert!(address[2].optional);
}

#[test]
fn test_generic_instantiation_through_public_api() {
    init_tracing();
    let provider = build_provider();
    let mut resolver = TypeResolver::new(&provider);

    let result = resolver.resolve_named(&models(), "UserResult").unwrap();
    let TypeDescriptor::Object { properties, .. } = &result else {
        panic!("expected object");
    };
    // `data: T` was substituted with the full User structure.
    let TypeDescriptor::Object {
        properties: user, ..
    } = &properties[0].ty
    else {
        panic!("expected substituted object, got {:?}", properties[0].ty);
    };
    assert_eq!(user[0].name, "id");
}

#[test]
fn test_template_declaration_expands_to_union() {
    init_tracing();
    let provider = build_provider();
    let mut resolver = TypeResolver::new(&provider);

    let endpoint = resolver.resolve_named(&models(), "Endpoint").unwrap();
    assert_eq!(
        endpoint,
        TypeDescriptor::Union {
            members: vec![
                TypeDescriptor::string_literal("/api/users"),
                TypeDescriptor::string_literal("/api/orders"),
            ],
        }
    );
}

#[test]
fn test_descriptor_serializes_to_tagged_json() {
    init_tracing();
    let provider = build_provider();
    let mut resolver = TypeResolver::new(&provider);

    let address = resolver.resolve_named(&models(), "Address").unwrap();
    let value = serde_json::to_value(&address).unwrap();
    assert_eq!(
        value,
        json!({
            "kind": "object",
            "properties": [
                {"name": "street", "type": {"kind": "primitive", "name": "string"},
                 "optional": false, "readonly": false},
                {"name": "city", "type": {"kind": "primitive", "name": "string"},
                 "optional": false, "readonly": false},
                {"name": "zip", "type": {"kind": "primitive", "name": "string"},
                 "optional": true, "readonly": false},
            ],
        })
    );
}

#[test]
fn test_serialized_descriptor_round_trips() {
    init_tracing();
    let provider = build_provider();
    let mut resolver = TypeResolver::new(&provider);

    let user = resolver.resolve_named(&models(), "User").unwrap();
    let text = serde_json::to_string(&user).unwrap();
    let back: TypeDescriptor = serde_json::from_str(&text).unwrap();
    assert_eq!(back, user);
}

#[test]
fn test_repeated_requests_are_stable() {
    init_tracing();
    let provider = build_provider();
    let mut resolver = TypeResolver::new(&provider);

    let first = resolver.resolve_named(&models(), "User").unwrap();
    // Second request is served from the descriptor cache.
    let second = resolver.resolve_named(&models(), "User").unwrap();
    let third = resolver.resolve_named(&models(), "User").unwrap();
    assert_eq!(first, second);
    assert_eq!(second, third);
}
