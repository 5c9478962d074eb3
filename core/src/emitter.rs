#![deny(missing_docs)]

//! # Document Emitter
//!
//! Turns a finished registry plus the top-level schema of every compiled
//! reference into a serialized OpenAPI document. Registry entries land in
//! `components.schemas`; top-level nodes are listed under `x-references`
//! in the order they were compiled.

use crate::error::{AppError, AppResult};
use crate::schema::SchemaRegistry;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use utoipa::openapi::{schema::Schema, Info, OpenApi, Paths, RefOr};

/// Extension key holding the top-level reference schemas.
pub const REFERENCES_EXTENSION: &str = "x-references";

/// Serialization format of the emitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    #[default]
    Yaml,
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// API title.
    pub title: String,
    /// API document version.
    pub version: String,
}

impl DocumentInfo {
    /// Creates document metadata.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
        }
    }
}

/// Consumer of a finished schema graph.
pub trait DocumentEmitter {
    /// What the emitter produces.
    type Output;

    /// Emits the registry and the named top-level nodes.
    fn emit(
        &self,
        registry: &SchemaRegistry,
        references: &IndexMap<String, RefOr<Schema>>,
    ) -> AppResult<Self::Output>;
}

/// Emits an OpenAPI document as JSON or YAML text.
#[derive(Debug, Clone)]
pub struct OpenApiEmitter {
    info: DocumentInfo,
    format: OutputFormat,
}

impl OpenApiEmitter {
    /// Creates an emitter.
    pub fn new(info: DocumentInfo, format: OutputFormat) -> Self {
        Self { info, format }
    }

    /// Builds the document as a JSON value.
    pub fn build_document(
        &self,
        registry: &SchemaRegistry,
        references: &IndexMap<String, RefOr<Schema>>,
    ) -> AppResult<Value> {
        let mut openapi = OpenApi::new(
            Info::new(self.info.title.clone(), self.info.version.clone()),
            Paths::new(),
        );
        openapi.components = Some(registry.to_components()?);

        let mut document = serde_json::to_value(&openapi)
            .map_err(|e| AppError::General(format!("Failed to serialize OpenAPI: {}", e)))?;

        if !references.is_empty() {
            let mut nodes = Map::new();
            for (name, node) in references {
                let value = serde_json::to_value(node).map_err(|e| {
                    AppError::General(format!("Failed to serialize reference '{}': {}", name, e))
                })?;
                nodes.insert(name.clone(), value);
            }
            if let Value::Object(root) = &mut document {
                root.insert(REFERENCES_EXTENSION.to_string(), Value::Object(nodes));
            }
        }

        Ok(document)
    }
}

impl DocumentEmitter for OpenApiEmitter {
    type Output = String;

    fn emit(
        &self,
        registry: &SchemaRegistry,
        references: &IndexMap<String, RefOr<Schema>>,
    ) -> AppResult<String> {
        let document = self.build_document(registry, references)?;
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&document)
                .map_err(|e| AppError::General(format!("Failed to write JSON: {}", e))),
            OutputFormat::Yaml => serde_yaml::to_string(&document)
                .map_err(|e| AppError::General(format!("Failed to write YAML: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::compile;
    use crate::typeref::TypeReferenceTree;
    use crate::types::{PropertyDescriptor, TypeCatalog, TypeDescriptor};

    fn compiled() -> (SchemaRegistry, IndexMap<String, RefOr<Schema>>) {
        let mut catalog = TypeCatalog::new();
        catalog
            .insert(TypeDescriptor::object(
                "Contoso.Tree",
                vec![PropertyDescriptor::new(
                    "Children",
                    TypeReferenceTree::array_of(TypeReferenceTree::named("Contoso.Tree")),
                )],
            ))
            .unwrap();

        let mut registry = SchemaRegistry::new();
        let mut references = IndexMap::new();
        for (name, reference) in [
            ("getTree", TypeReferenceTree::named("Tree")),
            ("count", TypeReferenceTree::named("int")),
        ] {
            let node = compile(&reference, &catalog, &mut registry).unwrap();
            references.insert(name.to_string(), node);
        }
        (registry, references)
    }

    #[test]
    fn test_document_layout() {
        let (registry, references) = compiled();
        let emitter = OpenApiEmitter::new(DocumentInfo::new("Trees", "1.0"), OutputFormat::Json);
        let doc = emitter.build_document(&registry, &references).unwrap();

        assert_eq!(doc["info"]["title"], "Trees");
        assert_eq!(
            doc["components"]["schemas"]["Contoso.Tree"]["properties"]["Children"]["items"]["$ref"],
            "#/components/schemas/Contoso.Tree"
        );
        assert_eq!(
            doc[REFERENCES_EXTENSION]["getTree"]["$ref"],
            "#/components/schemas/Contoso.Tree"
        );
        assert_eq!(doc[REFERENCES_EXTENSION]["count"]["type"], "integer");
    }

    #[test]
    fn test_emit_yaml_parses_back() {
        let (registry, references) = compiled();
        let emitter = OpenApiEmitter::new(DocumentInfo::new("Trees", "1.0"), OutputFormat::Yaml);
        let text = emitter.emit(&registry, &references).unwrap();

        let parsed: Value = serde_yaml::from_str(&text).unwrap();
        assert!(parsed["components"]["schemas"]
            .get("Contoso.Tree")
            .is_some());
    }

    #[test]
    fn test_pending_entries_block_emission() {
        let mut registry = SchemaRegistry::new();
        registry.reserve("Half");
        let emitter = OpenApiEmitter::new(DocumentInfo::new("T", "1"), OutputFormat::Json);
        assert!(matches!(
            emitter.emit(&registry, &IndexMap::new()),
            Err(AppError::PendingSchema(_))
        ));
    }
}
