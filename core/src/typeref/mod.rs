#![deny(missing_docs)]

//! # Type References
//!
//! - **token**: Grammar of a single flattened token.
//! - **tree**: The decoded reference tree.
//! - **decoder**: Flat pre-order token list -> tree.

pub mod decoder;
pub mod token;
pub mod tree;

pub use decoder::{decode, decode_node, TokenCursor};
pub use token::{strip_arity, TypeToken, ARRAY_MARKER};
pub use tree::TypeReferenceTree;
