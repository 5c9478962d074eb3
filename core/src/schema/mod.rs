#![deny(missing_docs)]

//! # Schema Compilation
//!
//! - **compiler**: Reference tree -> inline schema or `$ref`.
//! - **registry**: The de-duplicating, cycle-safe component store.
//! - **sanitize**: Legal component keys for type identities.
//! - **primitives**: Wire schemas of primitive types.

pub mod compiler;
pub mod primitives;
pub mod registry;
pub mod sanitize;

pub use compiler::{compile, compile_tokens, identity, registry_key, MAX_NESTING_DEPTH};
pub use primitives::{opaque_string_schema, primitive_schema, EMPTY_GUID};
pub use registry::{Checkpoint, RegistryEntry, SchemaRegistry, SharedRegistry};
pub use sanitize::{is_legal_key, restore_key, sanitize_key};
