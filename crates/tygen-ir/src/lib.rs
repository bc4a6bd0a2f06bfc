//! Shared definitions for the tygen type resolution engine.
//!
//! This crate is the leaf of the workspace: it defines the serializable
//! [`TypeDescriptor`] IR that the resolver produces and the code generator
//! consumes, the typed error taxonomy, and the centralized limits used to
//! bound recursive work.

pub mod descriptor;
pub mod error;
pub mod limits;

pub use descriptor::{
    GenericParamDescriptor, IndexKeyKind, IndexSignatureDescriptor, LiteralValue,
    PropertyDescriptor, TypeDescriptor,
};
pub use error::ResolveError;
