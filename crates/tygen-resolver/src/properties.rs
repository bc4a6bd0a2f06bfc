//! Property and index-signature resolution, plus utility-type expansion.
//!
//! Members resolve in declaration order, and that order is preserved all the
//! way into the IR: downstream code generation depends on it for stable
//! output. Utility forms (`Partial`, `Required`, `Readonly`, `Pick`, `Omit`,
//! `Record`) expand over the *already resolved* member list, so stacked
//! derivations and derivations mixed into intersections compose by plain
//! sequencing — consumers never see the derivation operator itself.

use crate::context::ScopeId;
use crate::expr::{FunctionSig, GenericParamDecl, ObjectLiteral, TypeExpr};
use crate::provider::DeclarationProvider;
use crate::resolver::TypeResolver;
use rustc_hash::FxHashSet;
use tygen_ir::{
    GenericParamDescriptor, IndexKeyKind, IndexSignatureDescriptor, PropertyDescriptor,
    ResolveError, TypeDescriptor,
};

/// A structural view of a resolved object-like descriptor: its members and
/// index signature, with intersections already flattened.
type ObjectView = (Vec<PropertyDescriptor>, Option<IndexSignatureDescriptor>);

impl<'p, P: DeclarationProvider> TypeResolver<'p, P> {
    /// Resolve a structural object type to its descriptor.
    ///
    /// When the object declares generic parameters they are registered in a
    /// child scope first, so member types can refer to them.
    pub fn resolve_object(
        &mut self,
        obj: &ObjectLiteral,
        depth: u32,
        scope: ScopeId,
    ) -> Result<TypeDescriptor, ResolveError> {
        let (inner, generic_params) = if obj.generic_params.is_empty() {
            (scope, None)
        } else {
            let child = self.scopes.create_child(scope);
            let descriptors = self.register_decl_params(&obj.generic_params, child, depth)?;
            (child, Some(descriptors))
        };
        let properties = self.resolve_properties(obj, depth, inner)?;
        let index_signature = self.resolve_index_signature(obj, depth, inner)?;
        Ok(TypeDescriptor::Object {
            properties,
            generic_params,
            index_signature,
        })
    }

    /// Resolve the declared members of an object type, in declaration order.
    ///
    /// Optional/readonly flags come from the declaration; a member's
    /// documentation keeps only its first line and is dropped when absent.
    pub fn resolve_properties(
        &mut self,
        obj: &ObjectLiteral,
        depth: u32,
        scope: ScopeId,
    ) -> Result<Vec<PropertyDescriptor>, ResolveError> {
        let mut properties = Vec::with_capacity(obj.members.len());
        for member in &obj.members {
            let ty = self.resolve_expr(&member.ty, depth + 1, scope)?;
            properties.push(PropertyDescriptor {
                name: member.name.clone(),
                ty,
                optional: member.optional,
                readonly: member.readonly,
                documentation: member.docs.as_deref().map(first_line),
            });
        }
        Ok(properties)
    }

    /// Resolve the object's index signature, or `None` when it declares none.
    pub fn resolve_index_signature(
        &mut self,
        obj: &ObjectLiteral,
        depth: u32,
        scope: ScopeId,
    ) -> Result<Option<IndexSignatureDescriptor>, ResolveError> {
        let Some(decl) = &obj.index_signature else {
            return Ok(None);
        };
        let value_type = self.resolve_expr(&decl.value, depth + 1, scope)?;
        Ok(Some(IndexSignatureDescriptor {
            key_kind: decl.key_kind,
            value_type: Box::new(value_type),
            readonly: decl.readonly,
        }))
    }

    /// Register declared generic parameters into `scope`.
    ///
    /// Names are declared first, so a constraint may reference any parameter
    /// of the same list — not just earlier ones — and such a reference always
    /// shadows a same-named top-level declaration. Constraint and default
    /// expressions are then resolved and installed in declaration order.
    /// Returns the resolved descriptors in declaration order.
    pub(crate) fn register_decl_params(
        &mut self,
        params: &[GenericParamDecl],
        scope: ScopeId,
        depth: u32,
    ) -> Result<Vec<GenericParamDescriptor>, ResolveError> {
        for param in params {
            self.scopes.register_param(
                scope,
                GenericParamDescriptor {
                    name: param.name.clone(),
                    constraint: None,
                    default: None,
                },
            )?;
        }
        let mut descriptors = Vec::with_capacity(params.len());
        for param in params {
            let constraint = match &param.constraint {
                Some(expr) => Some(self.resolve_expr(expr, depth + 1, scope)?),
                None => None,
            };
            let default = match &param.default {
                Some(expr) => Some(self.resolve_expr(expr, depth + 1, scope)?),
                None => None,
            };
            let descriptor = GenericParamDescriptor {
                name: param.name.clone(),
                constraint,
                default,
            };
            self.scopes.register_param(scope, descriptor.clone())?;
            descriptors.push(descriptor);
        }
        Ok(descriptors)
    }

    /// Expand a derived/utility type reference into its concrete effect.
    ///
    /// Returns `Ok(None)` when `name` is not a utility form, letting the
    /// dispatcher fall through to a declaration lookup. A utility applied to
    /// something without a structural member list degrades to `Unknown`.
    pub(crate) fn expand_utility(
        &mut self,
        name: &str,
        args: &[TypeExpr],
        depth: u32,
        scope: ScopeId,
    ) -> Result<Option<TypeDescriptor>, ResolveError> {
        let expanded = match (name, args.len()) {
            ("Partial", 1) => self.expand_modifier(&args[0], depth, scope, Modifier::AllOptional)?,
            ("Required", 1) => {
                self.expand_modifier(&args[0], depth, scope, Modifier::AllRequired)?
            }
            ("Readonly", 1) => {
                self.expand_modifier(&args[0], depth, scope, Modifier::AllReadonly)?
            }
            ("Pick", 2) => self.expand_subset(&args[0], &args[1], depth, scope, true)?,
            ("Omit", 2) => self.expand_subset(&args[0], &args[1], depth, scope, false)?,
            ("Record", 2) => self.expand_record(&args[0], &args[1], depth, scope)?,
            _ => return Ok(None),
        };
        tracing::trace!(utility = name, "expanded utility type");
        Ok(Some(expanded))
    }

    fn expand_modifier(
        &mut self,
        base: &TypeExpr,
        depth: u32,
        scope: ScopeId,
        modifier: Modifier,
    ) -> Result<TypeDescriptor, ResolveError> {
        let Some((mut properties, mut index_signature)) =
            self.object_view(base, depth, scope)?
        else {
            return Ok(TypeDescriptor::Unknown);
        };
        for prop in &mut properties {
            match modifier {
                Modifier::AllOptional => prop.optional = true,
                Modifier::AllRequired => prop.optional = false,
                Modifier::AllReadonly => prop.readonly = true,
            }
        }
        if modifier == Modifier::AllReadonly {
            if let Some(sig) = &mut index_signature {
                sig.readonly = true;
            }
        }
        Ok(TypeDescriptor::Object {
            properties,
            generic_params: None,
            index_signature,
        })
    }

    fn expand_subset(
        &mut self,
        base: &TypeExpr,
        keys: &TypeExpr,
        depth: u32,
        scope: ScopeId,
        keep: bool,
    ) -> Result<TypeDescriptor, ResolveError> {
        let Some((properties, _)) = self.object_view(base, depth, scope)? else {
            return Ok(TypeDescriptor::Unknown);
        };
        let keys_desc = self.resolve_expr(keys, depth + 1, scope)?;
        let Some(names) = literal_key_set(&keys_desc) else {
            // The key argument has no enumerable names (a `keyof` left
            // opaque, say); no subset can be taken.
            return Ok(TypeDescriptor::Unknown);
        };
        let properties = properties
            .into_iter()
            .filter(|p| names.contains(p.name.as_str()) == keep)
            .collect();
        Ok(TypeDescriptor::Object {
            properties,
            generic_params: None,
            index_signature: None,
        })
    }

    fn expand_record(
        &mut self,
        keys: &TypeExpr,
        value: &TypeExpr,
        depth: u32,
        scope: ScopeId,
    ) -> Result<TypeDescriptor, ResolveError> {
        let keys_desc = self.resolve_expr(keys, depth + 1, scope)?;
        let value_type = self.resolve_expr(value, depth + 1, scope)?;

        if let TypeDescriptor::Primitive { name } = &keys_desc {
            let key_kind = match name.as_str() {
                "string" => Some(IndexKeyKind::String),
                "number" => Some(IndexKeyKind::Number),
                _ => None,
            };
            if let Some(key_kind) = key_kind {
                return Ok(TypeDescriptor::Object {
                    properties: Vec::new(),
                    generic_params: None,
                    index_signature: Some(IndexSignatureDescriptor {
                        key_kind,
                        value_type: Box::new(value_type),
                        readonly: false,
                    }),
                });
            }
            return Ok(TypeDescriptor::Unknown);
        }

        let Some(names) = literal_key_list(&keys_desc) else {
            return Ok(TypeDescriptor::Unknown);
        };
        let properties = names
            .into_iter()
            .map(|name| PropertyDescriptor {
                name,
                ty: value_type.clone(),
                optional: false,
                readonly: false,
                documentation: None,
            })
            .collect();
        Ok(TypeDescriptor::Object {
            properties,
            generic_params: None,
            index_signature: None,
        })
    }

    /// Resolve a base expression down to its member list and index
    /// signature. Intersections flatten in branch order: a later member with
    /// an existing name replaces that member's type in place, and the last
    /// index signature wins. Non-object branches contribute nothing.
    fn object_view(
        &mut self,
        base: &TypeExpr,
        depth: u32,
        scope: ScopeId,
    ) -> Result<Option<ObjectView>, ResolveError> {
        let resolved = self.resolve_expr(base, depth + 1, scope)?;
        Ok(descriptor_object_view(resolved))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    AllOptional,
    AllRequired,
    AllReadonly,
}

fn descriptor_object_view(desc: TypeDescriptor) -> Option<ObjectView> {
    match desc {
        TypeDescriptor::Object {
            properties,
            index_signature,
            ..
        } => Some((properties, index_signature)),
        TypeDescriptor::Intersection { members } => {
            let mut properties: Vec<PropertyDescriptor> = Vec::new();
            let mut index_signature = None;
            let mut any_object = false;
            for member in members {
                let Some((props, sig)) = descriptor_object_view(member) else {
                    continue;
                };
                any_object = true;
                for prop in props {
                    if let Some(existing) =
                        properties.iter_mut().find(|p| p.name == prop.name)
                    {
                        existing.ty = prop.ty;
                        existing.optional = prop.optional;
                        existing.readonly = prop.readonly;
                    } else {
                        properties.push(prop);
                    }
                }
                if sig.is_some() {
                    index_signature = sig;
                }
            }
            if any_object {
                Some((properties, index_signature))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Names from a key argument that is a literal or a union of literals.
fn literal_key_set(desc: &TypeDescriptor) -> Option<FxHashSet<String>> {
    literal_key_list(desc).map(|names| names.into_iter().collect())
}

fn literal_key_list(desc: &TypeDescriptor) -> Option<Vec<String>> {
    match desc {
        TypeDescriptor::Literal { value } => Some(vec![value.to_text()]),
        TypeDescriptor::Union { members } => {
            let mut names = Vec::with_capacity(members.len());
            for member in members {
                names.extend(literal_key_list(member)?);
            }
            Some(names)
        }
        _ => None,
    }
}

/// Best-effort rendering of a callable signature.
///
/// Parameter names and optional markers are always available; missing type
/// information degrades to `any` rather than failing.
pub(crate) fn render_signature(sig: &FunctionSig) -> String {
    let params: Vec<String> = sig
        .params
        .iter()
        .map(|p| {
            format!(
                "{}{}: {}",
                p.name,
                if p.optional { "?" } else { "" },
                p.type_text.as_deref().unwrap_or("any")
            )
        })
        .collect();
    format!(
        "({}) => {}",
        params.join(", "),
        sig.return_text.as_deref().unwrap_or("any")
    )
}

fn first_line(docs: &str) -> String {
    docs.lines().next().unwrap_or("").trim().to_string()
}
