//! Centralized limits for the resolution engine.
//!
//! Every bound on recursive or combinatorial work lives here, so limits are
//! tuned in one place and every construction site says what it means instead
//! of repeating a magic number.

/// Maximum recursion depth for type resolution.
///
/// This is the engine's termination guarantee against self-referential
/// declarations (a node type containing a list of itself, and so on). The
/// guard is a plain counter threaded through the recursive resolve call, not
/// a visited set: identity tracking through generic instantiations costs more
/// than it buys, and a depth bound terminates every cycle a visited set
/// would.
///
/// Fifty levels is deep enough for any hand-written declaration; a type that
/// legitimately nests past it is better served by raising
/// `ResolverOptions::max_depth` than by a bigger default.
pub const MAX_RESOLUTION_DEPTH: u32 = 50;

/// Maximum number of literal combinations a string-pattern type may expand to.
///
/// Pattern expansion is a cartesian product over placeholder value sets, so a
/// handful of multi-valued placeholders can blow up combinatorially. The
/// product size is computed before any strings are built; past this limit the
/// pattern collapses to the `string` primitive instead of enumerating.
pub const TEMPLATE_EXPANSION_LIMIT: usize = 100_000;

/// Default capacity of the resolved-descriptor cache (logical-key store).
pub const DESCRIPTOR_CACHE_CAPACITY: usize = 1_024;

/// Default capacity of the intermediate type-handle cache.
pub const HANDLE_CACHE_CAPACITY: usize = 4_096;

/// Default capacity of the parsed-source cache.
///
/// Keyed by file path; sized for a typical project's working set of source
/// artifacts rather than for every file on disk.
pub const SOURCE_CACHE_CAPACITY: usize = 256;
