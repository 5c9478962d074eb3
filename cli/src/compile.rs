#![deny(missing_docs)]

//! # Compile Command
//!
//! Implements the pipeline: Catalogs -> Resolver -> Reference list -> Registry -> OpenAPI.
//!
//! 1. **Catalogs**: Loads every `--catalog` file into one `TypeCatalog`.
//! 2. **References**: Reads the named token lists to compile.
//! 3. **Compile**: Compiles each list against one registry, so shared types are emitted once.
//! 4. **Emit**: Writes components plus `x-references` as JSON or YAML.

use crefgen_core::schema::opaque_string_schema;
use crefgen_core::{
    compile_tokens, AppError, AppResult, DocumentEmitter, DocumentInfo, OpenApiEmitter,
    OutputFormat, SchemaRegistry, TypeCatalog,
};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use utoipa::openapi::{schema::Schema, RefOr};

/// Output format flag.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Yaml => OutputFormat::Yaml,
        }
    }
}

/// Arguments for the compile command.
#[derive(clap::Args, Debug, Clone)]
pub struct CompileArgs {
    /// Type catalog files (YAML, or JSON by `.json` extension).
    #[clap(
        long = "catalog",
        required = true,
        env = "CREFGEN_CATALOG",
        value_delimiter = ','
    )]
    pub catalogs: Vec<PathBuf>,

    /// Reference list: `[{ name, tokens: [...] }]` in YAML or JSON.
    #[clap(long)]
    pub references: PathBuf,

    /// Output file (stdout when omitted).
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Output format.
    #[clap(long, value_enum, default_value = "yaml", env = "CREFGEN_FORMAT")]
    pub format: Format,

    /// Document title.
    #[clap(long, default_value = "API")]
    pub title: String,

    /// Document version.
    #[clap(long = "api-version", default_value = "1.0.0")]
    pub api_version: String,

    /// Degrade references whose types cannot be resolved to `type: string`
    /// instead of failing.
    #[clap(long)]
    pub lenient: bool,

    /// Do not seed the catalog with primitives and standard collections.
    #[clap(long)]
    pub no_builtins: bool,
}

/// One named entry of the reference list.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedReference {
    /// Name under which the top-level schema is emitted.
    pub name: String,
    /// Flat, pre-order generic tokens.
    pub tokens: Vec<String>,
}

/// Executes the compile command.
pub fn execute(args: &CompileArgs) -> AppResult<()> {
    let document = run(args)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::General(format!("Failed to create output dir: {}", e))
                })?;
            }
            fs::write(path, document)
                .map_err(|e| AppError::General(format!("Failed to write document: {}", e)))?;
            tracing::info!(path = %path.display(), "wrote OpenAPI document");
        }
        None => print!("{}", document),
    }

    Ok(())
}

/// Runs the pipeline and returns the serialized document.
pub fn run(args: &CompileArgs) -> AppResult<String> {
    // 1. Catalogs
    let mut catalog = if args.no_builtins {
        TypeCatalog::empty()
    } else {
        TypeCatalog::new()
    };
    for path in &args.catalogs {
        catalog.load_file(path)?;
    }

    // 2. References
    let references = load_references(&args.references)?;

    // 3. Compile
    let mut registry = SchemaRegistry::new();
    let mut nodes: IndexMap<String, RefOr<Schema>> = IndexMap::new();
    for reference in references {
        match compile_tokens(&reference.tokens, &catalog, &mut registry) {
            Ok(Some(node)) => {
                nodes.insert(reference.name, node);
            }
            Ok(None) => {
                tracing::warn!(name = %reference.name, "reference has no tokens, skipped");
            }
            Err(e @ AppError::UnresolvedTypeReference { .. }) if args.lenient => {
                tracing::warn!(name = %reference.name, error = %e, "falling back to string schema");
                nodes.insert(reference.name, RefOr::T(opaque_string_schema()));
            }
            Err(e) => {
                return Err(AppError::General(format!(
                    "Failed to compile reference '{}': {}",
                    reference.name, e
                )))
            }
        }
    }

    // 4. Emit
    let emitter = OpenApiEmitter::new(
        DocumentInfo::new(&args.title, &args.api_version),
        args.format.into(),
    );
    emitter.emit(&registry, &nodes)
}

fn load_references(path: &Path) -> AppResult<Vec<NamedReference>> {
    let content = fs::read_to_string(path)?;
    if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)
            .map_err(|e| AppError::General(format!("Failed to parse reference list: {}", e)))
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::General(format!("Failed to parse reference list: {}", e)))
    }
}
