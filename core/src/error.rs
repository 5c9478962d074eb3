//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace, plus the
//! narrower `ResolveError` reported at the type resolver boundary.

use derive_more::{Display, From};

/// Failure reported by a `TypeResolver` when a name does not identify exactly one type.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ResolveError {
    /// No type with this name exists in any searched source.
    #[display("type '{name}' not found (searched: {})", searched.join(", "))]
    TypeNotFound {
        /// The name that was looked up.
        name: String,
        /// Labels of the sources that were searched.
        searched: Vec<String>,
    },

    /// The name matches several types; callers must use a qualified name.
    #[display("type '{name}' is ambiguous; candidates: {}", candidates.join(", "))]
    AmbiguousType {
        /// The name that was looked up.
        name: String,
        /// Every fully qualified name that matched.
        candidates: Vec<String>,
    },
}

impl std::error::Error for ResolveError {}

/// The Global Error Enum.
///
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// A generic token declared more arguments than the sequence supplies,
    /// or a token does not follow the `name[`N][[]]` grammar.
    #[from(ignore)]
    #[display("Malformed generic reference: {_0}")]
    MalformedGenericReference(String),

    /// Tokens were left over after the root reference was decoded.
    #[from(ignore)]
    #[display("Out of order generic reference: {_0}")]
    OutOfOrderGenericReference(String),

    /// A referenced type could not be resolved.
    #[from(ignore)]
    #[display("Unresolved type reference '{reference}': {source}")]
    UnresolvedTypeReference {
        /// The reference as written, e.g. `Page<User>`.
        reference: String,
        /// The resolver failure.
        source: ResolveError,
    },

    /// A generic type received a different number of arguments than it declares.
    #[from(ignore)]
    #[display("Type '{name}' expects {expected} generic argument(s), found {found}")]
    GenericArityMismatch {
        /// Fully qualified name of the generic definition.
        name: String,
        /// Declared generic parameter count.
        expected: usize,
        /// Supplied argument count.
        found: usize,
    },

    /// Type nesting grew past the compiler's depth bound, e.g. a generic whose
    /// property instantiates itself with an ever larger argument.
    #[from(ignore)]
    #[display("Type reference '{reference}' nests deeper than {limit} levels")]
    RecursionLimit {
        /// The reference at which the bound was hit.
        reference: String,
        /// The depth bound.
        limit: usize,
    },

    /// A registry entry was still a placeholder when it was read out.
    #[from(ignore)]
    #[display("Schema '{_0}' is still pending compilation")]
    PendingSchema(String),

    /// A type catalog could not be loaded.
    #[from(ignore)]
    #[display("Catalog Error: {_0}")]
    Catalog(String),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::UnresolvedTypeReference { source, .. } => Some(source),
            AppError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
