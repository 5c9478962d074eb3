#![deny(missing_docs)]

//! # Host Type Model
//!
//! - **descriptor**: Resolved type information (kinds, properties, members).
//! - **resolver**: The `TypeResolver` capability.
//! - **catalog**: A static, file-backed resolver.

pub mod catalog;
pub mod descriptor;
pub mod resolver;

pub use catalog::{TypeCatalog, BUILTIN_SOURCE};
pub use descriptor::{PrimitiveType, PropertyDescriptor, TypeDescriptor, TypeKind};
pub use resolver::TypeResolver;
