#![deny(missing_docs)]

//! # Reference Registry
//!
//! De-duplicating store of compiled object schemas keyed by sanitized type
//! identity. Lives for one document build: it accumulates across many
//! reference compilations and is cleared before the next build.
//!
//! An entry is `Pending` only while the object it names is being compiled;
//! recursive references that meet a `Pending` entry stop there and emit a
//! `$ref`, which is what terminates cyclic type graphs.

use crate::error::{AppError, AppResult};
use crate::schema::compiler;
use crate::typeref::TypeReferenceTree;
use crate::types::TypeResolver;
use indexmap::IndexMap;
use std::sync::{Arc, Mutex, MutexGuard};
use utoipa::openapi::{schema::Schema, Components, ComponentsBuilder, RefOr};

/// State of one registry slot.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEntry {
    /// Compilation of this type has started but not finished.
    Pending,
    /// The finished schema.
    Ready(Schema),
}

/// Marks a registry size to return to with `SchemaRegistry::rollback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Mapping from sanitized identity key to compiled schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: IndexMap<String, RegistryEntry>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, pending ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is present, pending or ready.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the entry under `key`.
    pub fn get(&self, key: &str) -> Option<&RegistryEntry> {
        self.entries.get(key)
    }

    /// Returns the finished schema under `key`.
    pub fn schema(&self, key: &str) -> Option<&Schema> {
        match self.entries.get(key)? {
            RegistryEntry::Ready(schema) => Some(schema),
            RegistryEntry::Pending => None,
        }
    }

    /// Inserts a `Pending` placeholder unless `key` already exists.
    ///
    /// Returns `true` when the caller now owns compilation of `key`.
    pub fn reserve(&mut self, key: &str) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_string(), RegistryEntry::Pending);
        true
    }

    /// Replaces the placeholder under `key` with the finished schema.
    pub fn finalize(&mut self, key: &str, schema: Schema) {
        self.entries
            .insert(key.to_string(), RegistryEntry::Ready(schema));
    }

    /// Records the current size.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.entries.len())
    }

    /// Drops every entry added after `checkpoint`.
    ///
    /// Entries that existed at the checkpoint are never modified afterwards,
    /// so truncation restores the earlier state exactly.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.entries.truncate(checkpoint.0);
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys of every entry that is still pending.
    pub fn pending_keys(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, entry)| matches!(entry, RegistryEntry::Pending))
            .map(|(key, _)| key)
            .collect()
    }

    /// Builds the OpenAPI components section.
    pub fn to_components(&self) -> AppResult<Components> {
        let mut builder = ComponentsBuilder::new();
        for (key, entry) in self.iter() {
            match entry {
                RegistryEntry::Ready(schema) => {
                    builder = builder.schema(key, schema.clone());
                }
                RegistryEntry::Pending => return Err(AppError::PendingSchema(key.to_string())),
            }
        }
        Ok(builder.build())
    }
}

/// A registry shared between threads building the same document.
///
/// `compile` holds the lock for a whole compilation, so no other thread can
/// observe a `Pending` entry or a half-built object graph.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<SchemaRegistry>>,
}

impl SharedRegistry {
    /// Creates an empty shared registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, SchemaRegistry>> {
        self.inner
            .lock()
            .map_err(|_| AppError::General("schema registry lock poisoned".into()))
    }

    /// Compiles `reference` under the registry lock.
    pub fn compile<R: TypeResolver + ?Sized>(
        &self,
        reference: &TypeReferenceTree,
        resolver: &R,
    ) -> AppResult<RefOr<Schema>> {
        let mut registry = self.lock()?;
        compiler::compile(reference, resolver, &mut registry)
    }

    /// Copies the current registry contents.
    pub fn snapshot(&self) -> AppResult<SchemaRegistry> {
        Ok(self.lock()?.clone())
    }

    /// Clears the registry before an unrelated document build.
    pub fn reset(&self) -> AppResult<()> {
        self.lock()?.clear();
        Ok(())
    }
}
