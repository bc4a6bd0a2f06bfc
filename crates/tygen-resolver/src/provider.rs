//! The declaration provider boundary.
//!
//! The engine never parses source text itself: a [`DeclarationProvider`]
//! supplies opaque [`TypeDecl`] handles for a declared name inside a source
//! artifact. The provider also supplies the stable
//! (source-artifact-identifier, declared-name) pair the cache combines into a
//! collision-safe composite key.

use rustc_hash::FxHashMap;
use std::fmt;

use crate::expr::{GenericParamDecl, TypeExpr};

/// Stable identifier for a source artifact (file path, module id, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        SourceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        SourceId(s.to_string())
    }
}

/// A named type declaration as the provider exposes it.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub params: Vec<GenericParamDecl>,
    pub expr: TypeExpr,
    pub docs: Option<String>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, expr: TypeExpr) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            expr,
            docs: None,
        }
    }

    pub fn with_params(mut self, params: Vec<GenericParamDecl>) -> Self {
        self.params = params;
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }
}

/// A parsed source artifact: the unit the source cache retains per file path.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSource {
    pub source: SourceId,
    pub declarations: Vec<TypeDecl>,
}

/// Supplies type declarations to the dispatcher.
///
/// This is the engine's only inbound seam. Implementations are free to parse
/// files, query a compiler API, or serve from memory; the engine treats the
/// result purely as an opaque handle factory.
pub trait DeclarationProvider {
    /// Look up the declaration named `name` inside `source`.
    fn declaration(&self, source: &SourceId, name: &str) -> Option<&TypeDecl>;
}

/// An in-memory provider backed by a hash map.
///
/// Used by the test suites and by embedders that already hold their
/// declarations in memory.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    decls: FxHashMap<SourceId, FxHashMap<String, TypeDecl>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self {
            decls: FxHashMap::default(),
        }
    }

    /// Register a declaration under a source artifact.
    pub fn insert(&mut self, source: SourceId, decl: TypeDecl) {
        self.decls
            .entry(source)
            .or_default()
            .insert(decl.name.clone(), decl);
    }

    /// Register every declaration of a parsed source artifact.
    pub fn insert_source(&mut self, parsed: ParsedSource) {
        for decl in parsed.declarations {
            self.insert(parsed.source.clone(), decl);
        }
    }

    pub fn len(&self) -> usize {
        self.decls.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DeclarationProvider for MemoryProvider {
    fn declaration(&self, source: &SourceId, name: &str) -> Option<&TypeDecl> {
        self.decls.get(source).and_then(|m| m.get(name))
    }
}
