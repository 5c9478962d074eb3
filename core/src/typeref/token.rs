#![deny(missing_docs)]

//! # Type Tokens
//!
//! Parsing of a single textual token of the flattened generic grammar:
//! `base`, an optional `` `N `` arity suffix, and an optional trailing `[]`.

use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

/// Marker appended to a token to denote a single-element collection.
pub const ARRAY_MARKER: &str = "[]";

/// One parsed token of a flattened type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeToken {
    /// Base text with the arity suffix retained (e.g. ``Pair`2``), array marker removed.
    pub name: String,
    /// Declared number of generic arguments (0 when there is no suffix).
    pub arity: usize,
    /// Whether the token ended with the array marker.
    pub array: bool,
}

impl TypeToken {
    /// Parses a raw token.
    ///
    /// Only the outermost `[]` is stripped; `Int32[][]` parses as an array
    /// token whose element text is `Int32[]`.
    pub fn parse(raw: &str) -> AppResult<Self> {
        static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
        let token_re = TOKEN_RE.get_or_init(|| {
            Regex::new(r"^([^`\[\]<>,\s]+)(?:`(\d+))?((?:\[\])*)$").expect("Invalid regex")
        });

        let raw = raw.trim();
        let caps = token_re.captures(raw).ok_or_else(|| {
            AppError::MalformedGenericReference(format!("'{}' is not a valid type token", raw))
        })?;

        let arity = match caps.get(2) {
            Some(m) => m.as_str().parse::<usize>().map_err(|_| {
                AppError::MalformedGenericReference(format!(
                    "arity suffix of '{}' is out of range",
                    raw
                ))
            })?,
            None => 0,
        };

        let array = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
        let name = if array {
            raw[..raw.len() - ARRAY_MARKER.len()].to_string()
        } else {
            raw.to_string()
        };

        Ok(TypeToken { name, arity, array })
    }

    /// Whether the token declares generic arguments.
    pub fn is_generic(&self) -> bool {
        self.arity > 0
    }
}

/// Removes a trailing `` `N `` arity suffix, if any.
pub fn strip_arity(name: &str) -> &str {
    match name.rfind('`') {
        Some(idx) if name[idx + 1..].chars().all(|c| c.is_ascii_digit()) && idx + 1 < name.len() => {
            &name[..idx]
        }
        _ => name,
    }
}
