use crate::context::{MergeStrategy, ScopeArena};
use tygen_ir::{GenericParamDescriptor, ResolveError, TypeDescriptor};

fn param(name: &str) -> GenericParamDescriptor {
    GenericParamDescriptor {
        name: name.to_string(),
        constraint: None,
        default: None,
    }
}

fn constrained(name: &str, constraint: TypeDescriptor) -> GenericParamDescriptor {
    GenericParamDescriptor {
        name: name.to_string(),
        constraint: Some(constraint),
        default: None,
    }
}

#[test]
fn test_register_and_lookup() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    arena.register_param(root, param("T")).unwrap();

    assert!(arena.lookup_param(root, "T").is_some());
    assert!(arena.lookup_param(root, "U").is_none());
}

#[test]
fn test_invalid_names_rejected() {
    let mut arena = ScopeArena::new();
    let root = arena.root();

    for bad in ["", "1T", "T-U", "a b"] {
        let err = arena.register_param(root, param(bad)).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidParamName { .. }), "{bad}");
    }
    arena.register_param(root, param("_private")).unwrap();
}

#[test]
fn test_child_shadows_parent() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let child = arena.create_child(root);

    arena
        .register_param(root, constrained("T", TypeDescriptor::primitive("string")))
        .unwrap();
    arena
        .register_param(child, constrained("T", TypeDescriptor::primitive("number")))
        .unwrap();

    let from_child = arena.lookup_param(child, "T").unwrap();
    assert_eq!(
        from_child.constraint,
        Some(TypeDescriptor::primitive("number"))
    );
    // The parent's own view is unaffected by the shadow.
    let from_root = arena.lookup_param(root, "T").unwrap();
    assert_eq!(
        from_root.constraint,
        Some(TypeDescriptor::primitive("string"))
    );
}

#[test]
fn test_circular_constraint_rejected() {
    let mut arena = ScopeArena::new();
    let root = arena.root();

    // T extends U is fine on its own, even with U still undeclared.
    arena
        .register_param(root, constrained("T", TypeDescriptor::reference("U")))
        .unwrap();
    // U extends T closes the loop.
    let err = arena
        .register_param(root, constrained("U", TypeDescriptor::reference("T")))
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::CircularConstraint {
            name: "U".to_string()
        }
    );
}

#[test]
fn test_self_constraint_rejected() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let err = arena
        .register_param(root, constrained("T", TypeDescriptor::reference("T")))
        .unwrap_err();
    assert!(matches!(err, ResolveError::CircularConstraint { .. }));
}

#[test]
fn test_acyclic_constraint_chain_accepted() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    arena
        .register_param(root, constrained("T", TypeDescriptor::primitive("string")))
        .unwrap();
    arena
        .register_param(root, constrained("U", TypeDescriptor::reference("T")))
        .unwrap();
    arena
        .register_param(root, constrained("V", TypeDescriptor::reference("U")))
        .unwrap();
}

#[test]
fn test_cycle_detected_across_ancestor_chain() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let child = arena.create_child(root);

    arena
        .register_param(root, constrained("T", TypeDescriptor::reference("U")))
        .unwrap();
    // The flattened view includes the parent's T, so the child's U closes
    // the same loop.
    let err = arena
        .register_param(child, constrained("U", TypeDescriptor::reference("T")))
        .unwrap_err();
    assert!(matches!(err, ResolveError::CircularConstraint { .. }));
}

#[test]
fn test_register_params_is_all_or_nothing() {
    let mut arena = ScopeArena::new();
    let root = arena.root();

    let err = arena
        .register_params(
            root,
            vec![
                param("A"),
                constrained("T", TypeDescriptor::reference("U")),
                constrained("U", TypeDescriptor::reference("T")),
            ],
        )
        .unwrap_err();
    assert!(matches!(err, ResolveError::CircularConstraint { .. }));

    // Nothing from the batch landed, including the valid leading entries.
    assert!(arena.lookup_param(root, "A").is_none());
    assert!(arena.lookup_param(root, "T").is_none());
}

#[test]
fn test_bind_argument_requires_declaration() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let child = arena.create_child(root);

    let err = arena
        .bind_argument(child, "T", TypeDescriptor::primitive("string"))
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::UnboundParameter {
            name: "T".to_string()
        }
    );

    // Declared in the parent, bindable from the child.
    arena.register_param(root, param("T")).unwrap();
    arena
        .bind_argument(child, "T", TypeDescriptor::primitive("string"))
        .unwrap();
    assert_eq!(
        arena.lookup_binding(child, "T"),
        Some(&TypeDescriptor::primitive("string"))
    );
    // The binding is local to the child.
    assert!(arena.lookup_binding(root, "T").is_none());
}

#[test]
fn test_binding_shadows_ancestor_binding() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let child = arena.create_child(root);

    arena.register_param(root, param("T")).unwrap();
    arena
        .bind_argument(root, "T", TypeDescriptor::primitive("string"))
        .unwrap();
    arena
        .bind_argument(child, "T", TypeDescriptor::primitive("number"))
        .unwrap();

    assert_eq!(
        arena.lookup_binding(child, "T"),
        Some(&TypeDescriptor::primitive("number"))
    );
    assert_eq!(
        arena.lookup_binding(root, "T"),
        Some(&TypeDescriptor::primitive("string"))
    );
}

#[test]
fn test_list_all_params_deduplicates_most_local_wins() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let child = arena.create_child(root);

    arena
        .register_param(root, constrained("T", TypeDescriptor::primitive("string")))
        .unwrap();
    arena.register_param(root, param("U")).unwrap();
    arena
        .register_param(child, constrained("T", TypeDescriptor::primitive("number")))
        .unwrap();

    let all = arena.list_all_params(child);
    assert_eq!(all.len(), 2);
    let t = all.iter().find(|p| p.name == "T").unwrap();
    assert_eq!(t.constraint, Some(TypeDescriptor::primitive("number")));
}

#[test]
fn test_list_all_params_cache_sees_ancestor_registration() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let child = arena.create_child(root);

    arena.register_param(child, param("T")).unwrap();
    // Prime the child's cached flattened view.
    assert_eq!(arena.list_all_params(child).len(), 1);

    // A parent registration after the fact must be visible to the child.
    arena.register_param(root, param("U")).unwrap();
    let all = arena.list_all_params(child);
    assert_eq!(all.len(), 2);
}

#[test]
fn test_release_reclaims_scopes_created_after_checkpoint() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    arena.register_param(root, param("P")).unwrap();

    let checkpoint = arena.checkpoint();
    let child = arena.create_child(root);
    arena.register_param(child, param("T")).unwrap();
    let grandchild = arena.create_child(child);
    arena.register_param(grandchild, param("U")).unwrap();

    arena.release(checkpoint);
    assert_eq!(arena.checkpoint(), checkpoint);
    // Scopes from before the checkpoint are untouched.
    assert!(arena.lookup_param(root, "P").is_some());
}

#[test]
fn test_release_never_drops_the_root() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    arena.release(0);
    arena.register_param(root, param("T")).unwrap();
    assert!(arena.lookup_param(root, "T").is_some());
}

#[test]
fn test_clone_scope_is_isolated() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    arena.register_param(root, param("P")).unwrap();

    let original = arena.create_child(root);
    arena.register_param(original, param("T")).unwrap();
    let copy = arena.clone_scope(original);

    // Copy sees the original's local layer and the shared ancestors.
    assert!(arena.lookup_param(copy, "T").is_some());
    assert!(arena.lookup_param(copy, "P").is_some());

    // Mutating the copy never affects the original, and vice versa.
    arena.register_param(copy, param("U")).unwrap();
    assert!(arena.lookup_param(original, "U").is_none());
    arena.register_param(original, param("V")).unwrap();
    assert!(arena.lookup_param(copy, "V").is_none());
}

#[test]
fn test_merge_keep_existing() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let dst = arena.create_child(root);
    let src = arena.create_child(root);

    arena
        .register_param(dst, constrained("T", TypeDescriptor::primitive("string")))
        .unwrap();
    arena
        .register_param(src, constrained("T", TypeDescriptor::primitive("number")))
        .unwrap();
    arena.register_param(src, param("U")).unwrap();

    arena.merge(dst, src, MergeStrategy::KeepExisting).unwrap();
    let t = arena.lookup_param(dst, "T").unwrap();
    assert_eq!(t.constraint, Some(TypeDescriptor::primitive("string")));
    assert!(arena.lookup_param(dst, "U").is_some());
}

#[test]
fn test_merge_overwrite() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let dst = arena.create_child(root);
    let src = arena.create_child(root);

    arena
        .register_param(dst, constrained("T", TypeDescriptor::primitive("string")))
        .unwrap();
    arena
        .register_param(src, constrained("T", TypeDescriptor::primitive("number")))
        .unwrap();

    arena.merge(dst, src, MergeStrategy::Overwrite).unwrap();
    let t = arena.lookup_param(dst, "T").unwrap();
    assert_eq!(t.constraint, Some(TypeDescriptor::primitive("number")));
}

#[test]
fn test_merge_error_on_conflict_is_all_or_nothing() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let dst = arena.create_child(root);
    let src = arena.create_child(root);

    arena.register_param(dst, param("T")).unwrap();
    arena.register_param(src, param("T")).unwrap();
    arena.register_param(src, param("U")).unwrap();

    let err = arena
        .merge(dst, src, MergeStrategy::ErrorOnConflict)
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::MergeConflict {
            name: "T".to_string()
        }
    );
    // Nothing merged, not even the conflict-free U.
    assert!(arena.lookup_param(dst, "U").is_none());
}

#[test]
fn test_merge_applies_to_bindings_independently() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let dst = arena.create_child(root);
    let src = arena.create_child(root);

    arena.register_param(root, param("T")).unwrap();
    arena
        .bind_argument(dst, "T", TypeDescriptor::primitive("string"))
        .unwrap();
    arena
        .bind_argument(src, "T", TypeDescriptor::primitive("number"))
        .unwrap();

    arena.merge(dst, src, MergeStrategy::KeepExisting).unwrap();
    assert_eq!(
        arena.lookup_binding(dst, "T"),
        Some(&TypeDescriptor::primitive("string"))
    );

    arena.merge(dst, src, MergeStrategy::Overwrite).unwrap();
    assert_eq!(
        arena.lookup_binding(dst, "T"),
        Some(&TypeDescriptor::primitive("number"))
    );
}
