#![deny(missing_docs)]

//! # Type Catalog
//!
//! A static `TypeResolver` backed by descriptors loaded from YAML or JSON
//! files, seeded with the host language's primitives and standard generic
//! collections.
//!
//! ```yaml
//! types:
//!   - name: Contoso.Models.User
//!     kind: object
//!     properties:
//!       - { name: Id, type: System.Guid, writable: false, required: true }
//!       - { name: Manager, type: Contoso.Models.User }
//! ```

use crate::error::{AppError, AppResult, ResolveError};
use crate::typeref::TypeReferenceTree;
use crate::types::descriptor::{PrimitiveType, TypeDescriptor, TypeKind};
use crate::types::resolver::TypeResolver;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Source label of the seeded descriptors.
pub const BUILTIN_SOURCE: &str = "builtin";

const PRIMITIVES: &[(&str, &str, PrimitiveType)] = &[
    ("System.Boolean", "bool", PrimitiveType::Boolean),
    ("System.Byte", "byte", PrimitiveType::Byte),
    ("System.SByte", "sbyte", PrimitiveType::SByte),
    ("System.Char", "char", PrimitiveType::Char),
    ("System.Int16", "short", PrimitiveType::Int16),
    ("System.Int32", "int", PrimitiveType::Int32),
    ("System.Int64", "long", PrimitiveType::Int64),
    ("System.UInt16", "ushort", PrimitiveType::UInt16),
    ("System.UInt32", "uint", PrimitiveType::UInt32),
    ("System.UInt64", "ulong", PrimitiveType::UInt64),
    ("System.Single", "float", PrimitiveType::Single),
    ("System.Double", "double", PrimitiveType::Double),
    ("System.Decimal", "decimal", PrimitiveType::Decimal),
    ("System.String", "string", PrimitiveType::String),
    ("System.DateTime", "", PrimitiveType::DateTime),
    ("System.DateTimeOffset", "", PrimitiveType::DateTimeOffset),
    ("System.TimeSpan", "", PrimitiveType::TimeSpan),
    ("System.Guid", "", PrimitiveType::Guid),
];

const ENUMERABLES: &[&str] = &[
    "System.Collections.Generic.List`1",
    "System.Collections.Generic.IList`1",
    "System.Collections.Generic.ICollection`1",
    "System.Collections.Generic.IEnumerable`1",
    "System.Collections.Generic.IReadOnlyList`1",
    "System.Collections.Generic.IReadOnlyCollection`1",
    "System.Collections.Generic.HashSet`1",
];

const DICTIONARIES: &[&str] = &[
    "System.Collections.Generic.Dictionary`2",
    "System.Collections.Generic.IDictionary`2",
    "System.Collections.Generic.IReadOnlyDictionary`2",
];

/// On-disk catalog layout.
#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    types: Vec<TypeDescriptor>,
}

/// Static catalog of type descriptors.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    types: IndexMap<String, TypeDescriptor>,
    aliases: HashMap<String, String>,
    sources: Vec<String>,
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCatalog {
    /// Creates a catalog seeded with primitives and standard collections.
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        catalog.sources.push(BUILTIN_SOURCE.to_string());

        for (name, alias, primitive) in PRIMITIVES {
            catalog
                .types
                .insert(name.to_string(), TypeDescriptor::primitive(*name, *primitive));
            if !alias.is_empty() {
                catalog.aliases.insert(alias.to_string(), name.to_string());
            }
        }

        for name in ENUMERABLES {
            let descriptor = TypeDescriptor::new(
                *name,
                TypeKind::Enumerable {
                    item_type: TypeReferenceTree::named("T"),
                },
            )
            .with_generic_parameters(["T"]);
            catalog.types.insert(name.to_string(), descriptor);
        }

        for name in DICTIONARIES {
            let descriptor = TypeDescriptor::new(
                *name,
                TypeKind::Dictionary {
                    value_type: TypeReferenceTree::named("TValue"),
                },
            )
            .with_generic_parameters(["TKey", "TValue"]);
            catalog.types.insert(name.to_string(), descriptor);
        }

        catalog
    }

    /// Creates a catalog with no descriptors at all.
    pub fn empty() -> Self {
        Self {
            types: IndexMap::new(),
            aliases: HashMap::new(),
            sources: Vec::new(),
        }
    }

    /// Number of known descriptors.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the catalog holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Labels of every loaded source, in load order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Adds a descriptor. Fully qualified names must be unique.
    pub fn insert(&mut self, descriptor: TypeDescriptor) -> AppResult<()> {
        if descriptor.name.trim().is_empty() {
            return Err(AppError::Catalog("type descriptor without a name".into()));
        }
        if self.types.contains_key(&descriptor.name) {
            return Err(AppError::Catalog(format!(
                "type '{}' is declared more than once",
                descriptor.name
            )));
        }
        self.types.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Loads descriptors from a YAML document under the given source label.
    pub fn load_yaml_str(&mut self, source: &str, yaml: &str) -> AppResult<usize> {
        let file: CatalogFile = serde_yaml::from_str(yaml).map_err(|e| {
            AppError::Catalog(format!("Failed to parse catalog '{}': {}", source, e))
        })?;
        self.absorb(source, file)
    }

    /// Loads descriptors from a JSON document under the given source label.
    pub fn load_json_str(&mut self, source: &str, json: &str) -> AppResult<usize> {
        let file: CatalogFile = serde_json::from_str(json).map_err(|e| {
            AppError::Catalog(format!("Failed to parse catalog '{}': {}", source, e))
        })?;
        self.absorb(source, file)
    }

    /// Loads a catalog file; `.json` files are read as JSON, anything else as YAML.
    pub fn load_file(&mut self, path: &Path) -> AppResult<usize> {
        let content = std::fs::read_to_string(path)?;
        let source = path.display().to_string();
        if path.extension().is_some_and(|ext| ext == "json") {
            self.load_json_str(&source, &content)
        } else {
            self.load_yaml_str(&source, &content)
        }
    }

    fn absorb(&mut self, source: &str, file: CatalogFile) -> AppResult<usize> {
        let count = file.types.len();
        for descriptor in file.types {
            self.insert(descriptor)?;
        }
        self.sources.push(source.to_string());
        tracing::debug!(source, count, "loaded type catalog");
        Ok(count)
    }

    fn candidates(&self, name: &str) -> Vec<&str> {
        let dotted = format!(".{}", name);
        let nested = format!("+{}", name);
        let mut found: Vec<&str> = self
            .types
            .keys()
            .filter(|full| full.ends_with(&dotted) || full.ends_with(&nested))
            .map(String::as_str)
            .collect();
        found.sort_unstable();
        found
    }
}

impl TypeResolver for TypeCatalog {
    fn resolve(&self, name: &str) -> Result<TypeDescriptor, ResolveError> {
        let name = name.trim();
        let name = self.aliases.get(name).map(String::as_str).unwrap_or(name);

        if let Some(descriptor) = self.types.get(name) {
            return Ok(descriptor.clone());
        }

        let candidates = self.candidates(name);
        match candidates.as_slice() {
            [] => Err(ResolveError::TypeNotFound {
                name: name.to_string(),
                searched: self.sources.clone(),
            }),
            [only] => Ok(self.types[*only].clone()),
            many => Err(ResolveError::AmbiguousType {
                name: name.to_string(),
                candidates: many.iter().map(|c| c.to_string()).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::descriptor::PropertyDescriptor;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtins_resolve_by_full_simple_and_alias() {
        let catalog = TypeCatalog::new();
        for name in ["System.Int32", "Int32", "int"] {
            let d = catalog.resolve(name).unwrap();
            assert_eq!(d.name, "System.Int32");
            assert_eq!(
                d.kind,
                TypeKind::Primitive {
                    primitive: PrimitiveType::Int32
                }
            );
        }

        let list = catalog.resolve("List`1").unwrap();
        assert_eq!(list.generic_parameters, vec!["T".to_string()]);
    }

    #[test]
    fn test_not_found_lists_sources() {
        let mut catalog = TypeCatalog::new();
        catalog
            .load_yaml_str("models.yaml", "types: []")
            .unwrap();

        let err = catalog.resolve("Contoso.Missing").unwrap_err();
        assert_eq!(
            err,
            ResolveError::TypeNotFound {
                name: "Contoso.Missing".into(),
                searched: vec![BUILTIN_SOURCE.into(), "models.yaml".into()],
            }
        );
    }

    #[test]
    fn test_ambiguous_simple_name() {
        let mut catalog = TypeCatalog::empty();
        catalog
            .insert(TypeDescriptor::object("Sales.User", vec![]))
            .unwrap();
        catalog
            .insert(TypeDescriptor::object("Billing.User", vec![]))
            .unwrap();

        match catalog.resolve("User").unwrap_err() {
            ResolveError::AmbiguousType { candidates, .. } => {
                assert_eq!(candidates, vec!["Billing.User", "Sales.User"]);
            }
            other => panic!("expected ambiguity, got {}", other),
        }

        assert_eq!(catalog.resolve("Sales.User").unwrap().name, "Sales.User");
    }

    #[test]
    fn test_nested_type_simple_name() {
        let mut catalog = TypeCatalog::empty();
        catalog
            .insert(TypeDescriptor::object("Contoso.Outer+Inner", vec![]))
            .unwrap();
        assert_eq!(
            catalog.resolve("Inner").unwrap().name,
            "Contoso.Outer+Inner"
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut catalog = TypeCatalog::empty();
        let user = TypeDescriptor::object(
            "Contoso.User",
            vec![PropertyDescriptor::new(
                "Name",
                TypeReferenceTree::named("System.String"),
            )],
        );
        catalog.insert(user.clone()).unwrap();
        assert!(matches!(catalog.insert(user), Err(AppError::Catalog(_))));
    }

    #[test]
    fn test_load_json() {
        let mut catalog = TypeCatalog::empty();
        let count = catalog
            .load_json_str(
                "inline",
                r#"{"types":[{"name":"Contoso.Color","kind":"enum","members":["Red"]}]}"#,
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(catalog.sources(), &["inline".to_string()]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_load_bad_yaml() {
        let mut catalog = TypeCatalog::empty();
        let err = catalog.load_yaml_str("bad", "types: [{ kind: object }]");
        assert!(matches!(err, Err(AppError::Catalog(_))));
    }
}
