//! # Inspection Commands
//!
//! Small helpers for checking what a token list decodes to and which component
//! key a type will be registered under.

use crefgen_core::schema::{registry_key, restore_key};
use crefgen_core::typeref::decode as decode_tokens;
use crefgen_core::{sanitize_key, AppError, AppResult, TypeCatalog};
use std::path::PathBuf;

/// Arguments for the decode command.
#[derive(clap::Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Tokens in pre-order, e.g. ``Pair`2 Int32 String``.
    #[clap(required = true)]
    pub tokens: Vec<String>,

    /// Resolve against these catalogs and also print the component key.
    #[clap(long = "catalog")]
    pub catalogs: Vec<PathBuf>,
}

/// Arguments for the sanitize command.
#[derive(clap::Args, Debug, Clone)]
pub struct SanitizeArgs {
    /// Type identity, e.g. `Contoso.Map<System.Int32,System.String>`.
    pub identity: String,

    /// Treat the input as a key and print the identity it encodes.
    #[clap(long)]
    pub restore: bool,
}

/// Decodes the tokens and prints the tree (and key, with catalogs).
pub fn decode(args: &DecodeArgs) -> AppResult<()> {
    let lines = describe(args)?;
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn describe(args: &DecodeArgs) -> AppResult<Vec<String>> {
    let tree = decode_tokens(&args.tokens)?
        .ok_or_else(|| AppError::General("no tokens given".into()))?;
    let mut lines = vec![tree.to_string()];

    if !args.catalogs.is_empty() {
        let mut catalog = TypeCatalog::new();
        for path in &args.catalogs {
            catalog.load_file(path)?;
        }
        lines.push(registry_key(&tree, &catalog)?);
    }
    Ok(lines)
}

/// Prints the key for an identity, or the identity for a key.
pub fn sanitize(args: &SanitizeArgs) -> AppResult<()> {
    if args.restore {
        let identity = restore_key(&args.identity).ok_or_else(|| {
            AppError::General(format!("'{}' is not a sanitized key", args.identity))
        })?;
        println!("{}", identity);
    } else {
        println!("{}", sanitize_key(&args.identity));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_without_catalog() {
        let args = DecodeArgs {
            tokens: vec!["Pair`2".into(), "Int32".into(), "String".into()],
            catalogs: vec![],
        };
        assert_eq!(describe(&args).unwrap(), vec!["Pair<Int32,String>"]);
    }

    #[test]
    fn test_describe_with_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.yaml");
        std::fs::write(
            &path,
            "types:\n  - { name: Lib.Box`1, generic_parameters: [T], kind: object }\n",
        )
        .unwrap();

        let args = DecodeArgs {
            tokens: vec!["Box`1".into(), "int".into()],
            catalogs: vec![path],
        };
        assert_eq!(
            describe(&args).unwrap(),
            vec!["Box<int>", "Lib.Box-3C-System.Int32-3E-"]
        );
    }
}
