#![deny(missing_docs)]

//! # Generic Reference Decoder
//!
//! Turns a flat, pre-order token list (``["Pair`2", "Int32", "String"]``) into a
//! nested `TypeReferenceTree`. Sibling arguments may themselves be generic, so
//! every node claims its tokens from one shared cursor, left to right.

use crate::error::{AppError, AppResult};
use crate::typeref::token::TypeToken;
use crate::typeref::tree::TypeReferenceTree;

/// Owned cursor over a flat token sequence.
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<String>,
    position: usize,
}

impl TokenCursor {
    /// Creates a cursor positioned at the first token.
    pub fn new<S: AsRef<str>>(tokens: &[S]) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.as_ref().to_string()).collect(),
            position: 0,
        }
    }

    /// Index of the next unread token.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of unread tokens.
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.position
    }

    fn next_token(&mut self) -> Option<&str> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }
}

/// Decodes a complete token sequence.
///
/// Returns `Ok(None)` for an empty sequence. Every token must belong to the
/// root reference; leftovers mean the tokens were not declared in pre-order.
pub fn decode<S: AsRef<str>>(tokens: &[S]) -> AppResult<Option<TypeReferenceTree>> {
    if tokens.is_empty() {
        return Ok(None);
    }

    let mut cursor = TokenCursor::new(tokens);
    let tree = decode_node(&mut cursor)?;

    if cursor.remaining() > 0 {
        let leftover: Vec<&str> = cursor.tokens[cursor.position..]
            .iter()
            .map(String::as_str)
            .collect();
        return Err(AppError::OutOfOrderGenericReference(format!(
            "'{}' is complete after {} token(s) but [{}] follow; only a generic token may claim further arguments",
            tree,
            cursor.position,
            leftover.join(", ")
        )));
    }

    Ok(Some(tree))
}

/// Decodes one node starting at the cursor, leaving the cursor on the first
/// token of the next sibling.
pub fn decode_node(cursor: &mut TokenCursor) -> AppResult<TypeReferenceTree> {
    let start = cursor.position;
    let raw = cursor.next_token().map(str::to_string).ok_or_else(|| {
        AppError::MalformedGenericReference(format!(
            "expected a type token at position {}, found end of sequence",
            start
        ))
    })?;
    let token = TypeToken::parse(&raw)?;

    if token.array {
        if token.is_generic() {
            return Err(AppError::MalformedGenericReference(format!(
                "array token '{}' cannot declare generic arguments",
                raw
            )));
        }
        return decode_array_element(&token.name).map(TypeReferenceTree::array_of);
    }

    if !token.is_generic() {
        return Ok(TypeReferenceTree::named(token.name));
    }

    let mut arguments = Vec::with_capacity(token.arity);
    for _ in 0..token.arity {
        arguments.push(decode_node(cursor)?);
    }

    Ok(TypeReferenceTree::generic(token.name, arguments))
}

/// Element of an array token: the marker-stripped text of the same token.
fn decode_array_element(text: &str) -> AppResult<TypeReferenceTree> {
    let element = TypeToken::parse(text)?;
    if element.array {
        return decode_array_element(&element.name).map(TypeReferenceTree::array_of);
    }
    Ok(TypeReferenceTree::named(element.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_sequence_is_absent() {
        let empty: [&str; 0] = [];
        assert!(decode(&empty).unwrap().is_none());
    }

    #[test]
    fn test_leaf_token() {
        let tree = decode(&["Contoso.User"]).unwrap().unwrap();
        assert_eq!(tree, TypeReferenceTree::named("Contoso.User"));
    }

    #[test]
    fn test_pair() {
        let tree = decode(&["Pair`2", "Int32", "String"]).unwrap().unwrap();
        assert_eq!(tree.to_string(), "Pair<Int32,String>");
        assert_eq!(tree.arguments().len(), 2);
    }

    #[test]
    fn test_nested_pair_first_argument() {
        let tree = decode(&["Pair`2", "Pair`2", "Int32", "String", "Bool"])
            .unwrap()
            .unwrap();
        assert_eq!(tree.to_string(), "Pair<Pair<Int32,String>,Bool>");
    }

    #[test]
    fn test_nested_pair_second_argument() {
        let tree = decode(&["Pair`2", "Bool", "Pair`2", "Int32", "String"])
            .unwrap()
            .unwrap();
        assert_eq!(tree.to_string(), "Pair<Bool,Pair<Int32,String>>");
    }

    #[test]
    fn test_cursor_stops_at_next_sibling() {
        let tokens = ["Pair`2", "Int32", "List`1", "String", "Bool"];
        let mut cursor = TokenCursor::new(&tokens);
        let first = decode_node(&mut cursor).unwrap();
        assert_eq!(first.to_string(), "Pair<Int32,List<String>>");
        assert_eq!(cursor.position(), 4);

        let sibling = decode_node(&mut cursor).unwrap();
        assert_eq!(sibling, TypeReferenceTree::named("Bool"));
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_array_tokens() {
        let tree = decode(&["Int32[]"]).unwrap().unwrap();
        assert_eq!(
            tree,
            TypeReferenceTree::array_of(TypeReferenceTree::named("Int32"))
        );

        let jagged = decode(&["Int32[][]"]).unwrap().unwrap();
        assert_eq!(jagged.to_string(), "Int32[][]");
    }

    #[test]
    fn test_array_argument_consumes_one_token() {
        let tree = decode(&["Pair`2", "User[]", "String"]).unwrap().unwrap();
        assert_eq!(tree.to_string(), "Pair<User[],String>");
    }

    #[test]
    fn test_generic_array_token_rejected() {
        let err = decode(&["List`1[]", "String"]).unwrap_err();
        assert!(matches!(err, AppError::MalformedGenericReference(_)));
    }

    #[test]
    fn test_too_few_arguments() {
        let err = decode(&["Pair`2", "Int32"]).unwrap_err();
        assert!(matches!(err, AppError::MalformedGenericReference(_)));

        let err = decode(&["Pair`2", "Pair`2", "Int32", "String"]).unwrap_err();
        assert!(matches!(err, AppError::MalformedGenericReference(_)));
    }

    #[test]
    fn test_missing_argument_reports_position() {
        let err = decode(&["Pair`2", "Int32"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed generic reference: expected a type token at position 2, found end of sequence"
        );
    }

    #[test]
    fn test_out_of_order_tokens() {
        let err = decode(&["Int32", "Pair`2", "A", "B"]).unwrap_err();
        assert!(matches!(err, AppError::OutOfOrderGenericReference(_)));

        let err = decode(&["List`1", "Int32", "String"]).unwrap_err();
        assert!(matches!(err, AppError::OutOfOrderGenericReference(_)));
    }
}
