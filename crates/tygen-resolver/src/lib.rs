//! Type resolution engine.
//!
//! Resolves a reference to a named type declaration into a complete,
//! structural [`TypeDescriptor`](tygen_ir::TypeDescriptor) for a downstream
//! code generator. The dispatcher classifies an arbitrary type expression and
//! routes it to specialized resolvers for object members, composites,
//! operator forms and string patterns, guaranteeing termination through a
//! recursion-depth bound and practical performance through LRU caching.
//!
//! Key pieces:
//! - [`TypeResolver`] — the recursive dispatcher and engine entry point
//! - [`ScopeArena`] — parent-linked generic parameter scopes
//! - [`ResolutionCache`] — three independently-sized LRU stores
//! - [`DeclarationProvider`] — the inbound seam supplying declarations

pub mod cache;
pub mod classify;
mod composite;
pub mod context;
pub mod expr;
pub mod operators;
mod properties;
pub mod provider;
pub mod resolver;
pub mod template;

pub use cache::{DescriptorKey, LruStore, ResolutionCache};
pub use classify::{classify, ExprClassification};
pub use context::{MergeStrategy, ScopeArena, ScopeId};
pub use expr::{
    FunctionSig, GenericParamDecl, IndexSignatureDecl, ObjectLiteral, ObjectMember,
    OperatorFlags, ParamSig, TemplateSpan, TypeExpr,
};
pub use provider::{DeclarationProvider, MemoryProvider, ParsedSource, SourceId, TypeDecl};
pub use resolver::{ResolverOptions, TypeResolver};

#[cfg(test)]
mod tests;
