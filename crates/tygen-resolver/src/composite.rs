//! Union and intersection resolution.
//!
//! Both composites share one algorithm: resolve each branch independently in
//! its declared order and collect the results, preserving order. One branch's
//! resolution never observes another's. An empty branch list is an
//! empty-members composite, not an error; the first failing branch aborts the
//! whole composite, carrying that branch's error unchanged as the cause.

use crate::context::ScopeId;
use crate::expr::TypeExpr;
use crate::provider::DeclarationProvider;
use crate::resolver::TypeResolver;
use tygen_ir::{ResolveError, TypeDescriptor};

impl<'p, P: DeclarationProvider> TypeResolver<'p, P> {
    /// Resolve a union type, preserving branch order.
    pub fn resolve_union(
        &mut self,
        branches: &[TypeExpr],
        depth: u32,
        scope: ScopeId,
    ) -> Result<TypeDescriptor, ResolveError> {
        let members = self.resolve_branches(branches, depth, scope)?;
        Ok(TypeDescriptor::Union { members })
    }

    /// Resolve an intersection type, preserving branch order.
    pub fn resolve_intersection(
        &mut self,
        branches: &[TypeExpr],
        depth: u32,
        scope: ScopeId,
    ) -> Result<TypeDescriptor, ResolveError> {
        let members = self.resolve_branches(branches, depth, scope)?;
        Ok(TypeDescriptor::Intersection { members })
    }

    fn resolve_branches(
        &mut self,
        branches: &[TypeExpr],
        depth: u32,
        scope: ScopeId,
    ) -> Result<Vec<TypeDescriptor>, ResolveError> {
        let mut members = Vec::with_capacity(branches.len());
        for (index, branch) in branches.iter().enumerate() {
            match self.resolve_expr(branch, depth + 1, scope) {
                Ok(member) => members.push(member),
                Err(err) => {
                    tracing::debug!(index, %err, "composite branch failed to resolve");
                    return Err(ResolveError::UnresolvedBranch {
                        index,
                        source: Box::new(err),
                    });
                }
            }
        }
        Ok(members)
    }
}
