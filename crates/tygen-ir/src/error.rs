//! Typed errors for the resolution engine.
//!
//! Every fallible operation in the engine returns `Result<_, ResolveError>`;
//! nothing is thrown or panicked across an API boundary. Note what is *not*
//! here: malformed operator text is not an error — operator recovery is
//! heuristic and degrades to `TypeDescriptor::Unknown` instead.

use std::error::Error;
use std::fmt;

/// The error taxonomy of the resolution engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The recursion guard tripped. Fatal to the current resolution; callers
    /// treat this as "this declaration cannot be generated", not as a reason
    /// to abort the whole run.
    DepthExceeded { depth: u32 },
    /// A generic parameter's constraint graph references itself, directly or
    /// transitively, across the whole scope chain. Rejected at registration
    /// so constraint resolution can never loop.
    CircularConstraint { name: String },
    /// A type argument was bound to a parameter name never declared in the
    /// reachable scope chain.
    UnboundParameter { name: String },
    /// A union/intersection branch failed to resolve. Carries the original
    /// branch error unchanged plus the branch position for diagnostics.
    UnresolvedBranch {
        index: usize,
        source: Box<ResolveError>,
    },
    /// A generic parameter name is empty or not a valid identifier.
    InvalidParamName { name: String },
    /// A scope merge with the error-on-conflict strategy hit a name collision.
    MergeConflict { name: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::DepthExceeded { depth } => {
                write!(f, "maximum resolution depth {} exceeded", depth)
            }
            ResolveError::CircularConstraint { name } => {
                write!(
                    f,
                    "generic parameter '{}' has a circular constraint",
                    name
                )
            }
            ResolveError::UnboundParameter { name } => {
                write!(
                    f,
                    "cannot bind argument for undeclared generic parameter '{}'",
                    name
                )
            }
            ResolveError::UnresolvedBranch { index, source } => {
                write!(f, "branch {} failed to resolve: {}", index, source)
            }
            ResolveError::InvalidParamName { name } => {
                write!(f, "invalid generic parameter name '{}'", name)
            }
            ResolveError::MergeConflict { name } => {
                write!(f, "scope merge conflict on name '{}'", name)
            }
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ResolveError::UnresolvedBranch { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl ResolveError {
    /// Unwrap the original branch error from an `UnresolvedBranch` chain.
    ///
    /// Composite resolution propagates a failing branch's error unchanged;
    /// this walks to the innermost cause for callers that only care about
    /// the root failure.
    pub fn root_cause(&self) -> &ResolveError {
        match self {
            ResolveError::UnresolvedBranch { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
