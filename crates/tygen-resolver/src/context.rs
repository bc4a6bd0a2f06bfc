//! Generic parameter scopes.
//!
//! Scopes form a parent-linked tree held in an arena and addressed by
//! [`ScopeId`] handles. Each node owns its *local* parameter declarations and
//! its *local* type-argument bindings; lookups walk from the node up through
//! its ancestors, so a child's declaration shadows a parent's.
//!
//! The one invariant-bearing validation the arena performs happens at
//! registration: a parameter whose constraint graph becomes cyclic across the
//! flattened ancestor chain is rejected with `CircularConstraint`. Rejecting
//! it here is what lets constraint resolution elsewhere in the engine recurse
//! without its own cycle bookkeeping.
//!
//! The flattened parameter list of a node is cached per node and stamped with
//! an arena-wide version counter. Every registration anywhere bumps the
//! counter, so a parent gaining a parameter after a child has cached its view
//! invalidates the child's cache too.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;

use tygen_ir::{GenericParamDescriptor, ResolveError, TypeDescriptor};

/// Handle to a scope node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

/// Collision policy for [`ScopeArena::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// The destination's entry wins on a name collision.
    #[default]
    KeepExisting,
    /// The source's entry wins on a name collision.
    Overwrite,
    /// Any name collision fails the whole merge.
    ErrorOnConflict,
}

#[derive(Debug, Clone)]
struct CachedView {
    version: u64,
    params: Vec<GenericParamDescriptor>,
}

#[derive(Debug)]
struct ScopeNode {
    parent: Option<ScopeId>,
    params: IndexMap<String, GenericParamDescriptor>,
    bindings: IndexMap<String, TypeDescriptor>,
    flattened: RefCell<Option<CachedView>>,
}

impl ScopeNode {
    fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            params: IndexMap::new(),
            bindings: IndexMap::new(),
            flattened: RefCell::new(None),
        }
    }
}

/// Arena of generic parameter scopes.
#[derive(Debug)]
pub struct ScopeArena {
    nodes: Vec<ScopeNode>,
    /// Bumped on every registration, binding, or merge anywhere in the arena.
    version: u64,
}

impl ScopeArena {
    /// Create an arena holding a single root scope.
    pub fn new() -> Self {
        Self {
            nodes: vec![ScopeNode::new(None)],
            version: 0,
        }
    }

    /// The root scope created with the arena.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Create a new scope whose ancestor is `parent`.
    pub fn create_child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.nodes.len() as u32);
        self.nodes.push(ScopeNode::new(Some(parent)));
        id
    }

    /// Copy a scope's local layer into a new scope linked to the same
    /// ancestor chain. Mutations to the copy never affect the original.
    pub fn clone_scope(&mut self, scope: ScopeId) -> ScopeId {
        let node = self.node(scope);
        let copy = ScopeNode {
            parent: node.parent,
            params: node.params.clone(),
            bindings: node.bindings.clone(),
            flattened: RefCell::new(None),
        };
        let id = ScopeId(self.nodes.len() as u32);
        self.nodes.push(copy);
        id
    }

    /// The current node count; pair with [`release`](Self::release) to
    /// reclaim every scope created after this point.
    pub fn checkpoint(&self) -> usize {
        self.nodes.len()
    }

    /// Drop every scope created after `checkpoint` was taken. The root scope
    /// is never dropped. Callers must not use a handle to a dropped scope
    /// afterwards.
    pub fn release(&mut self, checkpoint: usize) {
        self.nodes.truncate(checkpoint.max(1));
    }

    /// Declare a generic parameter in `scope`.
    ///
    /// Fails with `InvalidParamName` if the name is empty or not an
    /// identifier, and with `CircularConstraint` if the constraint graph over
    /// the flattened ancestor chain would become cyclic.
    pub fn register_param(
        &mut self,
        scope: ScopeId,
        param: GenericParamDescriptor,
    ) -> Result<(), ResolveError> {
        self.validate_param(scope, &param, &IndexMap::new())?;
        tracing::trace!(scope = scope.0, name = %param.name, "registering generic parameter");
        self.node_mut(scope).params.insert(param.name.clone(), param);
        self.version += 1;
        Ok(())
    }

    /// Declare a batch of parameters, all-or-nothing: on the first failing
    /// parameter nothing from the batch is registered.
    pub fn register_params(
        &mut self,
        scope: ScopeId,
        params: Vec<GenericParamDescriptor>,
    ) -> Result<(), ResolveError> {
        let mut staged: IndexMap<String, GenericParamDescriptor> = IndexMap::new();
        for param in &params {
            self.validate_param(scope, param, &staged)?;
            staged.insert(param.name.clone(), param.clone());
        }
        let count = staged.len() as u64;
        let node = self.node_mut(scope);
        for (name, param) in staged {
            node.params.insert(name, param);
        }
        self.version += count;
        Ok(())
    }

    /// Bind a resolved type argument to a declared parameter.
    ///
    /// The binding is stored locally in `scope`; the declaration may live
    /// anywhere up the chain. Fails with `UnboundParameter` if no scope in
    /// the chain declares `name`.
    pub fn bind_argument(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: TypeDescriptor,
    ) -> Result<(), ResolveError> {
        if self.lookup_param(scope, name).is_none() {
            return Err(ResolveError::UnboundParameter {
                name: name.to_string(),
            });
        }
        tracing::trace!(scope = scope.0, name, "binding type argument");
        self.node_mut(scope).bindings.insert(name.to_string(), ty);
        self.version += 1;
        Ok(())
    }

    /// Look up a parameter declaration, walking local to root. A local
    /// declaration shadows an ancestor's.
    pub fn lookup_param(&self, scope: ScopeId, name: &str) -> Option<&GenericParamDescriptor> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let node = self.node(id);
            if let Some(param) = node.params.get(name) {
                return Some(param);
            }
            current = node.parent;
        }
        None
    }

    /// Look up a bound type argument, walking local to root.
    pub fn lookup_binding(&self, scope: ScopeId, name: &str) -> Option<&TypeDescriptor> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let node = self.node(id);
            if let Some(ty) = node.bindings.get(name) {
                return Some(ty);
            }
            current = node.parent;
        }
        None
    }

    /// All parameters declared across the chain, de-duplicated by name with
    /// the most-local declaration winning.
    ///
    /// The flattened view is cached per node; the arena-wide version stamp
    /// invalidates it after any registration, including one in an ancestor.
    pub fn list_all_params(&self, scope: ScopeId) -> Vec<GenericParamDescriptor> {
        {
            let cached = self.node(scope).flattened.borrow();
            if let Some(view) = cached.as_ref() {
                if view.version == self.version {
                    return view.params.clone();
                }
            }
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut params = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            let node = self.node(id);
            for param in node.params.values() {
                if seen.insert(param.name.as_str()) {
                    params.push(param.clone());
                }
            }
            current = node.parent;
        }

        *self.node(scope).flattened.borrow_mut() = Some(CachedView {
            version: self.version,
            params: params.clone(),
        });
        params
    }

    /// Merge `src`'s local layer into `dst`'s local layer.
    ///
    /// The strategy applies to declared parameters and bound arguments
    /// independently. `ErrorOnConflict` is all-or-nothing: conflicts are
    /// checked up front and nothing is merged on failure.
    pub fn merge(
        &mut self,
        dst: ScopeId,
        src: ScopeId,
        strategy: MergeStrategy,
    ) -> Result<(), ResolveError> {
        if strategy == MergeStrategy::ErrorOnConflict {
            let dst_node = self.node(dst);
            let src_node = self.node(src);
            for name in src_node.params.keys() {
                if dst_node.params.contains_key(name) {
                    return Err(ResolveError::MergeConflict { name: name.clone() });
                }
            }
            for name in src_node.bindings.keys() {
                if dst_node.bindings.contains_key(name) {
                    return Err(ResolveError::MergeConflict { name: name.clone() });
                }
            }
        }

        let src_params = self.node(src).params.clone();
        let src_bindings = self.node(src).bindings.clone();
        let dst_node = self.node_mut(dst);
        for (name, param) in src_params {
            match strategy {
                MergeStrategy::KeepExisting => {
                    dst_node.params.entry(name).or_insert(param);
                }
                MergeStrategy::Overwrite | MergeStrategy::ErrorOnConflict => {
                    dst_node.params.insert(name, param);
                }
            }
        }
        for (name, ty) in src_bindings {
            match strategy {
                MergeStrategy::KeepExisting => {
                    dst_node.bindings.entry(name).or_insert(ty);
                }
                MergeStrategy::Overwrite | MergeStrategy::ErrorOnConflict => {
                    dst_node.bindings.insert(name, ty);
                }
            }
        }
        self.version += 1;
        Ok(())
    }

    fn node(&self, id: ScopeId) -> &ScopeNode {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: ScopeId) -> &mut ScopeNode {
        &mut self.nodes[id.0 as usize]
    }

    fn validate_param(
        &self,
        scope: ScopeId,
        param: &GenericParamDescriptor,
        staged: &IndexMap<String, GenericParamDescriptor>,
    ) -> Result<(), ResolveError> {
        if !is_valid_param_name(&param.name) {
            return Err(ResolveError::InvalidParamName {
                name: param.name.clone(),
            });
        }

        // Constraint graph over the flattened chain, overlaid with the batch
        // staged so far and the candidate itself. Most-local wins.
        let mut edges: FxHashMap<String, FxHashSet<String>> = FxHashMap::default();
        let mut insert_edges = |edges: &mut FxHashMap<String, FxHashSet<String>>,
                                p: &GenericParamDescriptor| {
            if edges.contains_key(&p.name) {
                return;
            }
            let mut refs = FxHashSet::default();
            if let Some(constraint) = &p.constraint {
                collect_named_refs(constraint, &mut refs);
            }
            edges.insert(p.name.clone(), refs);
        };

        insert_edges(&mut edges, param);
        for p in staged.values() {
            insert_edges(&mut edges, p);
        }
        let mut current = Some(scope);
        while let Some(id) = current {
            let node = self.node(id);
            for p in node.params.values() {
                insert_edges(&mut edges, p);
            }
            current = node.parent;
        }

        if reaches_itself(&edges, &param.name) {
            return Err(ResolveError::CircularConstraint {
                name: param.name.clone(),
            });
        }
        Ok(())
    }
}

fn is_valid_param_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Walk a constraint descriptor collecting every name it can refer to.
fn collect_named_refs(desc: &TypeDescriptor, out: &mut FxHashSet<String>) {
    match desc {
        TypeDescriptor::Reference { name, .. } | TypeDescriptor::Generic { name } => {
            out.insert(name.clone());
        }
        TypeDescriptor::Array { element } => collect_named_refs(element, out),
        TypeDescriptor::Tuple { elements } => {
            for e in elements {
                collect_named_refs(e, out);
            }
        }
        TypeDescriptor::Union { members } | TypeDescriptor::Intersection { members } => {
            for m in members {
                collect_named_refs(m, out);
            }
        }
        TypeDescriptor::Keyof { target } | TypeDescriptor::Typeof { target } => {
            collect_named_refs(target, out);
        }
        TypeDescriptor::Index { object, index } => {
            collect_named_refs(object, out);
            collect_named_refs(index, out);
        }
        TypeDescriptor::Object {
            properties,
            generic_params,
            index_signature,
        } => {
            for p in properties {
                collect_named_refs(&p.ty, out);
            }
            if let Some(params) = generic_params {
                for gp in params {
                    if let Some(c) = &gp.constraint {
                        collect_named_refs(c, out);
                    }
                    if let Some(d) = &gp.default {
                        collect_named_refs(d, out);
                    }
                }
            }
            if let Some(sig) = index_signature {
                collect_named_refs(&sig.value_type, out);
            }
        }
        TypeDescriptor::Primitive { .. }
        | TypeDescriptor::Function { .. }
        | TypeDescriptor::Literal { .. }
        | TypeDescriptor::Enum { .. }
        | TypeDescriptor::Unknown
        | TypeDescriptor::Never => {}
    }
}

/// Depth-first walk of the constraint edges, checking whether `start` can
/// reach itself.
fn reaches_itself(edges: &FxHashMap<String, FxHashSet<String>>, start: &str) -> bool {
    let Some(initial) = edges.get(start) else {
        return false;
    };
    let mut stack: Vec<&str> = initial.iter().map(String::as_str).collect();
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    while let Some(name) = stack.pop() {
        if name == start {
            return true;
        }
        if !visited.insert(name) {
            continue;
        }
        if let Some(next) = edges.get(name) {
            stack.extend(next.iter().map(String::as_str));
        }
    }
    false
}
