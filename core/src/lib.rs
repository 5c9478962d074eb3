#![deny(missing_docs)]

//! # crefgen Core
//!
//! Turns documentation type references into a de-duplicated OpenAPI schema graph.
//!
//! 1. `typeref` decodes the flattened token list (``["Page`1", "User"]``) into a tree.
//! 2. `schema` resolves every node through a `TypeResolver` and compiles it,
//!    registering object types once under a sanitized identity key.
//! 3. `emitter` serializes the registry and top-level nodes.

/// Shared error types.
pub mod error;

/// Generic type reference tokens, trees and the decoder.
pub mod typeref;

/// Host type descriptors and resolvers.
pub mod types;

/// Schema compilation and the reference registry.
pub mod schema;

/// OpenAPI document output.
pub mod emitter;

pub use emitter::{DocumentEmitter, DocumentInfo, OpenApiEmitter, OutputFormat};
pub use error::{AppError, AppResult, ResolveError};
pub use schema::{
    compile, compile_tokens, is_legal_key, sanitize_key, RegistryEntry, SchemaRegistry,
    SharedRegistry,
};
pub use typeref::{decode, TypeReferenceTree};
pub use types::{
    PrimitiveType, PropertyDescriptor, TypeCatalog, TypeDescriptor, TypeKind, TypeResolver,
};
