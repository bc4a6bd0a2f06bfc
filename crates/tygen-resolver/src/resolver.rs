//! The dispatcher.
//!
//! `TypeResolver` is the top-level recursive function of the engine: it
//! classifies a type expression and routes it to the matching resolver,
//! threading a depth counter through every recursive call. The depth bound is
//! the termination guarantee against self-referential declarations — a plain
//! counter, not a visited set, because identity tracking through generic
//! instantiations costs more than the bound buys.
//!
//! The dispatcher owns the resolution cache and the root generic scope for
//! the lifetime of one resolver; child scopes created while descending into a
//! generic declaration live only as long as that descent.

use crate::cache::{DescriptorKey, ResolutionCache};
use crate::classify::{classify, ExprClassification};
use crate::context::{ScopeArena, ScopeId};
use crate::expr::TypeExpr;
use crate::operators;
use crate::properties;
use crate::provider::{DeclarationProvider, SourceId, TypeDecl};
use crate::template;
use tygen_ir::{limits, ResolveError, TypeDescriptor};

/// Tunables for one resolver instance.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Maximum recursion depth before a resolution fails with
    /// `DepthExceeded`.
    pub max_depth: u32,
    /// Maximum number of literal combinations a string pattern may expand to
    /// before collapsing to `string`.
    pub template_expansion_limit: usize,
    pub descriptor_cache_capacity: usize,
    pub handle_cache_capacity: usize,
    pub source_cache_capacity: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: limits::MAX_RESOLUTION_DEPTH,
            template_expansion_limit: limits::TEMPLATE_EXPANSION_LIMIT,
            descriptor_cache_capacity: limits::DESCRIPTOR_CACHE_CAPACITY,
            handle_cache_capacity: limits::HANDLE_CACHE_CAPACITY,
            source_cache_capacity: limits::SOURCE_CACHE_CAPACITY,
        }
    }
}

/// The type resolution engine.
///
/// One resolver serves one sequence of top-level requests; concurrent
/// resolutions each get their own resolver (and with it their own cache and
/// scope arena).
pub struct TypeResolver<'p, P: DeclarationProvider> {
    provider: &'p P,
    options: ResolverOptions,
    cache: ResolutionCache,
    pub(crate) scopes: ScopeArena,
    /// Source artifact of the request currently being resolved; named
    /// references inside it resolve against the same artifact.
    current_source: Option<SourceId>,
}

impl<'p, P: DeclarationProvider> TypeResolver<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self::with_options(provider, ResolverOptions::default())
    }

    pub fn with_options(provider: &'p P, options: ResolverOptions) -> Self {
        let cache = ResolutionCache::new(
            options.descriptor_cache_capacity,
            options.handle_cache_capacity,
            options.source_cache_capacity,
        );
        Self {
            provider,
            options,
            cache,
            scopes: ScopeArena::new(),
            current_source: None,
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// The cache owned by this resolver. Exposed so a driving embedder can
    /// populate the parsed-source store and clear everything between runs.
    pub fn cache_mut(&mut self) -> &mut ResolutionCache {
        &mut self.cache
    }

    /// Resolve the declaration named `name` inside `source` to its complete
    /// descriptor. This is the code generator's entry point; it consults the
    /// descriptor cache by logical key before doing any work.
    pub fn resolve_named(
        &mut self,
        source: &SourceId,
        name: &str,
    ) -> Result<TypeDescriptor, ResolveError> {
        tracing::debug!(source = %source, name, "resolving named declaration");
        let previous = self.current_source.replace(source.clone());
        let checkpoint = self.scopes.checkpoint();
        let result = self.resolve_expr(&TypeExpr::reference(name), 0, self.scopes.root());
        // Scopes created while descending into generic declarations are dead
        // once the request completes; reclaim them.
        self.scopes.release(checkpoint);
        self.current_source = previous;
        result
    }

    /// The recursive dispatcher: classify `expr` and route it.
    pub(crate) fn resolve_expr(
        &mut self,
        expr: &TypeExpr,
        depth: u32,
        scope: ScopeId,
    ) -> Result<TypeDescriptor, ResolveError> {
        if depth > self.options.max_depth {
            tracing::debug!(depth, "resolution depth limit hit");
            return Err(ResolveError::DepthExceeded {
                depth: self.options.max_depth,
            });
        }

        match classify(expr) {
            ExprClassification::Primitive(name) => Ok(TypeDescriptor::primitive(name)),
            ExprClassification::Literal(value) => Ok(TypeDescriptor::Literal {
                value: value.clone(),
            }),
            ExprClassification::Object(obj) => self.resolve_object(obj, depth, scope),
            ExprClassification::Array(element) => {
                let element = self.resolve_expr(element, depth + 1, scope)?;
                Ok(TypeDescriptor::Array {
                    element: Box::new(element),
                })
            }
            ExprClassification::Tuple(elements) => {
                let mut resolved = Vec::with_capacity(elements.len());
                for element in elements {
                    resolved.push(self.resolve_expr(element, depth + 1, scope)?);
                }
                Ok(TypeDescriptor::Tuple { elements: resolved })
            }
            ExprClassification::Union(branches) => self.resolve_union(branches, depth, scope),
            ExprClassification::Intersection(branches) => {
                self.resolve_intersection(branches, depth, scope)
            }
            ExprClassification::Callable(sig) => Ok(TypeDescriptor::Function {
                signature: properties::render_signature(sig),
            }),
            ExprClassification::Template(_) => {
                let limit = self.options.template_expansion_limit;
                let pattern = template::resolve_pattern(expr, limit, &mut |sub| {
                    self.resolve_expr(sub, depth + 1, scope)
                })?;
                Ok(pattern.unwrap_or(TypeDescriptor::Unknown))
            }
            ExprClassification::Enum(name) => Ok(TypeDescriptor::Enum {
                name: name.to_string(),
            }),
            ExprClassification::KeyExtraction(text) => {
                Ok(operators::resolve_key_extraction(text))
            }
            ExprClassification::ValueOf(text) => Ok(operators::resolve_value_of(text)),
            ExprClassification::IndexedAccess(text) => {
                Ok(operators::resolve_indexed_access(text))
            }
            ExprClassification::Unrecognized(text) => {
                tracing::trace!(text, "unrecognized rendering, degrading to unknown");
                Ok(TypeDescriptor::Unknown)
            }
            ExprClassification::Reference { name, type_args } => {
                self.resolve_reference(name, type_args, depth, scope)
            }
        }
    }

    /// Resolve a named reference: a generic parameter in scope, a utility
    /// form, or a declaration supplied by the provider — in that order.
    fn resolve_reference(
        &mut self,
        name: &str,
        type_args: &[TypeExpr],
        depth: u32,
        scope: ScopeId,
    ) -> Result<TypeDescriptor, ResolveError> {
        if type_args.is_empty() {
            if let Some(bound) = self.scopes.lookup_binding(scope, name) {
                return Ok(bound.clone());
            }
            if self.scopes.lookup_param(scope, name).is_some() {
                return Ok(TypeDescriptor::Generic {
                    name: name.to_string(),
                });
            }
        }

        if let Some(expanded) = self.expand_utility(name, type_args, depth, scope)? {
            return Ok(expanded);
        }

        let Some(source) = self.current_source.clone() else {
            return Ok(TypeDescriptor::reference(name));
        };

        // Instantiations with explicit arguments are not cached: the logical
        // key has no room for the argument list, and two instantiations of
        // the same name must not collide.
        let cacheable = type_args.is_empty();
        if cacheable {
            let key = DescriptorKey::new(source.clone(), name);
            if let Some(hit) = self.cache.descriptors().get(&key) {
                tracing::trace!(source = %source, name, "descriptor cache hit");
                return Ok(hit.clone());
            }
            tracing::trace!(source = %source, name, "descriptor cache miss");
        }

        let Some(decl) = self.lookup_decl(&source, name) else {
            // A name the provider cannot supply stays an opaque reference;
            // the consumer decides how to render foreign names.
            return Ok(TypeDescriptor::Reference {
                name: name.to_string(),
                source: Some(source.as_str().to_string()),
            });
        };

        let mut declared_params = None;
        let decl_scope = if decl.params.is_empty() {
            self.scopes.root()
        } else {
            // The declaration's body sees its own parameters only, never the
            // referencing scope's.
            let child = self.scopes.create_child(self.scopes.root());
            let descriptors = self.register_decl_params(&decl.params, child, depth)?;
            declared_params = Some(descriptors);
            for (position, param) in decl.params.iter().enumerate() {
                let argument = match type_args.get(position) {
                    Some(arg) => Some(self.resolve_expr(arg, depth + 1, scope)?),
                    None => self
                        .scopes
                        .lookup_param(child, &param.name)
                        .and_then(|p| p.default.clone()),
                };
                if let Some(ty) = argument {
                    self.scopes.bind_argument(child, &param.name, ty)?;
                }
            }
            child
        };

        let mut resolved = self.resolve_expr(&decl.expr, depth + 1, decl_scope)?;
        // An open generic object (referenced without arguments) keeps its
        // declared parameter list on the descriptor.
        if type_args.is_empty() {
            if let (
                Some(descriptors),
                TypeDescriptor::Object {
                    generic_params: generic_params @ None,
                    ..
                },
            ) = (declared_params, &mut resolved)
            {
                *generic_params = Some(descriptors);
            }
        }
        if cacheable {
            let key = DescriptorKey::new(source, name);
            self.cache.descriptors().set(key, resolved.clone());
        }
        Ok(resolved)
    }

    /// Fetch a declaration handle, going through the handle store before the
    /// provider. The store is keyed by the same structured (source, name)
    /// composite as the descriptor store: distinct pairs must never collapse
    /// into one entry.
    fn lookup_decl(&mut self, source: &SourceId, name: &str) -> Option<TypeDecl> {
        let key = DescriptorKey::new(source.clone(), name);
        if let Some(decl) = self.cache.decls().get(&key) {
            return Some(decl.clone());
        }
        let decl = self.provider.declaration(source, name)?.clone();
        self.cache.decls().set(key, decl.clone());
        Some(decl)
    }
}
