//! # Type Resolver
//!
//! The capability the compiler uses to ask the host type system about a name.

use crate::error::ResolveError;
use crate::types::descriptor::TypeDescriptor;

/// Resolves a (possibly unqualified) type name to its descriptor.
pub trait TypeResolver {
    /// Looks up `name`.
    ///
    /// Fails with `TypeNotFound` when nothing matches and `AmbiguousType`
    /// when the name alone matches several fully qualified types.
    fn resolve(&self, name: &str) -> Result<TypeDescriptor, ResolveError>;
}

impl<R: TypeResolver + ?Sized> TypeResolver for &R {
    fn resolve(&self, name: &str) -> Result<TypeDescriptor, ResolveError> {
        (**self).resolve(name)
    }
}

impl<R: TypeResolver + ?Sized> TypeResolver for std::sync::Arc<R> {
    fn resolve(&self, name: &str) -> Result<TypeDescriptor, ResolveError> {
        (**self).resolve(name)
    }
}
