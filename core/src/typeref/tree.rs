#![deny(missing_docs)]

//! # Type Reference Trees
//!
//! The structured form of a decoded type reference.

use crate::typeref::token::strip_arity;
use std::collections::HashMap;
use std::fmt::{self, Display};

/// A decoded, possibly generic or array-shaped, type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeReferenceTree {
    /// A named type with its ordered generic arguments (empty when not generic).
    Named {
        /// Base identifier as written, arity suffix included.
        name: String,
        /// Ordered generic arguments.
        arguments: Vec<TypeReferenceTree>,
    },
    /// A single-argument collection produced by the `[]` marker.
    Array(Box<TypeReferenceTree>),
}

impl TypeReferenceTree {
    /// Creates a non-generic leaf.
    pub fn named(name: impl Into<String>) -> Self {
        TypeReferenceTree::Named {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Creates a generic reference with the given arguments.
    pub fn generic(name: impl Into<String>, arguments: Vec<TypeReferenceTree>) -> Self {
        TypeReferenceTree::Named {
            name: name.into(),
            arguments,
        }
    }

    /// Wraps an element type in an array-of node.
    pub fn array_of(element: TypeReferenceTree) -> Self {
        TypeReferenceTree::Array(Box::new(element))
    }

    /// The base identifier, or `None` for array nodes.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeReferenceTree::Named { name, .. } => Some(name),
            TypeReferenceTree::Array(_) => None,
        }
    }

    /// Generic arguments of a named node; arrays report their element.
    pub fn arguments(&self) -> &[TypeReferenceTree] {
        match self {
            TypeReferenceTree::Named { arguments, .. } => arguments,
            TypeReferenceTree::Array(element) => std::slice::from_ref(element.as_ref()),
        }
    }

    /// Whether this node is an array-of wrapper.
    pub fn is_array(&self) -> bool {
        matches!(self, TypeReferenceTree::Array(_))
    }

    /// Replaces leaves naming a bound generic parameter with their binding.
    ///
    /// A bound leaf must not carry arguments of its own; such nodes are left untouched.
    pub fn substitute(&self, bindings: &HashMap<String, TypeReferenceTree>) -> TypeReferenceTree {
        match self {
            TypeReferenceTree::Array(element) => {
                TypeReferenceTree::array_of(element.substitute(bindings))
            }
            TypeReferenceTree::Named { name, arguments } => {
                if arguments.is_empty() {
                    if let Some(bound) = bindings.get(name) {
                        return bound.clone();
                    }
                }
                TypeReferenceTree::Named {
                    name: name.clone(),
                    arguments: arguments.iter().map(|a| a.substitute(bindings)).collect(),
                }
            }
        }
    }
}

impl Display for TypeReferenceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeReferenceTree::Array(element) => write!(f, "{}[]", element),
            TypeReferenceTree::Named { name, arguments } => {
                write!(f, "{}", strip_arity(name))?;
                if !arguments.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in arguments.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested() {
        let tree = TypeReferenceTree::generic(
            "Pair`2",
            vec![
                TypeReferenceTree::generic(
                    "Pair`2",
                    vec![
                        TypeReferenceTree::named("Int32"),
                        TypeReferenceTree::named("String"),
                    ],
                ),
                TypeReferenceTree::array_of(TypeReferenceTree::named("Bool")),
            ],
        );
        assert_eq!(tree.to_string(), "Pair<Pair<Int32,String>,Bool[]>");
    }

    #[test]
    fn test_substitute_generic_parameter() {
        let open = TypeReferenceTree::generic(
            "List`1",
            vec![TypeReferenceTree::array_of(TypeReferenceTree::named("T"))],
        );
        let mut bindings = HashMap::new();
        bindings.insert("T".to_string(), TypeReferenceTree::named("User"));

        let closed = open.substitute(&bindings);
        assert_eq!(closed.to_string(), "List<User[]>");
    }

    #[test]
    fn test_array_arguments_report_element() {
        let tree = TypeReferenceTree::array_of(TypeReferenceTree::named("Int32"));
        assert!(tree.is_array());
        assert!(tree.name().is_none());
        assert_eq!(tree.arguments(), &[TypeReferenceTree::named("Int32")]);
    }
}
