#![deny(missing_docs)]

//! # Type Descriptors
//!
//! Resolved, structured information about a host type, as handed out by a
//! `TypeResolver`. Descriptors can be written by hand in YAML/JSON catalogs;
//! type references inside them use the flattened token grammar.

use crate::error::AppError;
use crate::typeref::{decode, TypeReferenceTree};
use serde::Deserialize;

/// Primitive host types with a direct wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    /// `System.Boolean`
    Boolean,
    /// `System.Byte`
    Byte,
    /// `System.SByte`
    #[serde(rename = "sbyte")]
    SByte,
    /// `System.Char`
    Char,
    /// `System.Int16`
    Int16,
    /// `System.Int32`
    Int32,
    /// `System.Int64`
    Int64,
    /// `System.UInt16`
    #[serde(rename = "uint16")]
    UInt16,
    /// `System.UInt32`
    #[serde(rename = "uint32")]
    UInt32,
    /// `System.UInt64`
    #[serde(rename = "uint64")]
    UInt64,
    /// `System.Single`
    Single,
    /// `System.Double`
    Double,
    /// `System.Decimal`
    Decimal,
    /// `System.String`
    String,
    /// `System.DateTime`
    DateTime,
    /// `System.DateTimeOffset`
    DateTimeOffset,
    /// `System.TimeSpan`
    TimeSpan,
    /// `System.Guid`
    Guid,
}

/// Classification of a resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    /// A type with a direct wire representation.
    Primitive {
        /// Which primitive.
        primitive: PrimitiveType,
    },
    /// An enumeration, members in declaration order.
    Enum {
        /// Member names.
        members: Vec<String>,
    },
    /// A string-keyed map; only the value type is represented on the wire.
    Dictionary {
        /// Value type, possibly naming a generic parameter.
        value_type: TypeReferenceTree,
    },
    /// A sequence of a single element type.
    Enumerable {
        /// Element type, possibly naming a generic parameter.
        item_type: TypeReferenceTree,
    },
    /// Any other type, described by its properties.
    Object {
        /// Properties in declaration order.
        #[serde(default)]
        properties: Vec<PropertyDescriptor>,
    },
}

/// A property of an object type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertyDescriptor {
    /// Host property name.
    pub name: String,
    /// Property type.
    #[serde(rename = "type")]
    pub type_ref: TypeReferenceTree,
    /// False for properties without a public setter.
    #[serde(default = "default_writable")]
    pub writable: bool,
    /// Whether the serialization contract always requires the property.
    #[serde(default)]
    pub required: bool,
    /// Name used on the wire instead of `name`.
    #[serde(default)]
    pub serialized_name: Option<String>,
}

fn default_writable() -> bool {
    true
}

impl PropertyDescriptor {
    /// Creates a writable, optional property.
    pub fn new(name: impl Into<String>, type_ref: TypeReferenceTree) -> Self {
        Self {
            name: name.into(),
            type_ref,
            writable: true,
            required: false,
            serialized_name: None,
        }
    }

    /// Marks the property as having no setter.
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Marks the property as always required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Overrides the serialized name.
    pub fn with_serialized_name(mut self, name: impl Into<String>) -> Self {
        self.serialized_name = Some(name.into());
        self
    }

    /// The name the property carries on the wire.
    pub fn wire_name(&self) -> &str {
        self.serialized_name.as_deref().unwrap_or(&self.name)
    }
}

/// Resolved description of a host type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeDescriptor {
    /// Fully qualified name; generic definitions keep their arity suffix.
    pub name: String,
    /// Names of the generic parameters, in order.
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    /// Kind-specific details.
    #[serde(flatten)]
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Creates a non-generic descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            generic_parameters: Vec::new(),
            kind,
        }
    }

    /// Declares generic parameters.
    pub fn with_generic_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generic_parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Creates an object descriptor.
    pub fn object(name: impl Into<String>, properties: Vec<PropertyDescriptor>) -> Self {
        Self::new(name, TypeKind::Object { properties })
    }

    /// Creates an enum descriptor.
    pub fn enumeration<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            TypeKind::Enum {
                members: members.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Creates a primitive descriptor.
    pub fn primitive(name: impl Into<String>, primitive: PrimitiveType) -> Self {
        Self::new(name, TypeKind::Primitive { primitive })
    }
}

/// Raw catalog form of a type reference: one token or a pre-order token list.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawReference {
    Token(String),
    Tokens(Vec<String>),
}

impl TryFrom<RawReference> for TypeReferenceTree {
    type Error = AppError;

    fn try_from(raw: RawReference) -> Result<Self, Self::Error> {
        let tokens = match raw {
            RawReference::Token(token) => vec![token],
            RawReference::Tokens(tokens) => tokens,
        };
        decode(&tokens)?
            .ok_or_else(|| AppError::Catalog("empty type reference".to_string()))
    }
}

impl<'de> Deserialize<'de> for TypeReferenceTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawReference::deserialize(deserializer)?;
        TypeReferenceTree::try_from(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_object_descriptor() {
        let yaml = r#"
name: Contoso.Page`1
generic_parameters: [T]
kind: object
properties:
  - name: Items
    type: "T[]"
    required: true
  - name: Total
    type: System.Int64
    writable: false
    serialized_name: total
  - name: Lookup
    type: ["System.Collections.Generic.Dictionary`2", "System.String", "T"]
"#;
        let descriptor: TypeDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(descriptor.generic_parameters, vec!["T".to_string()]);

        let TypeKind::Object { properties } = &descriptor.kind else {
            panic!("expected object kind");
        };
        assert_eq!(properties.len(), 3);
        assert_eq!(properties[0].type_ref.to_string(), "T[]");
        assert!(properties[0].required);
        assert!(properties[0].writable);
        assert!(!properties[1].writable);
        assert_eq!(properties[1].wire_name(), "total");
        assert_eq!(
            properties[2].type_ref.to_string(),
            "System.Collections.Generic.Dictionary<System.String,T>"
        );
    }

    #[test]
    fn test_deserialize_enum_and_primitive() {
        let color: TypeDescriptor =
            serde_yaml::from_str("{ name: Contoso.Color, kind: enum, members: [Red, Green] }")
                .unwrap();
        assert_eq!(
            color,
            TypeDescriptor::enumeration("Contoso.Color", ["Red", "Green"])
        );

        let id: TypeDescriptor =
            serde_yaml::from_str("{ name: Contoso.Id, kind: primitive, primitive: guid }").unwrap();
        assert_eq!(
            id.kind,
            TypeKind::Primitive {
                primitive: PrimitiveType::Guid
            }
        );
    }

    #[test]
    fn test_malformed_reference_rejected() {
        let yaml = r#"
name: Broken
kind: object
properties:
  - name: Pair
    type: ["Pair`2", "Int32"]
"#;
        let err = serde_yaml::from_str::<TypeDescriptor>(yaml).unwrap_err();
        assert!(err.to_string().contains("Malformed generic reference"));
    }
}
