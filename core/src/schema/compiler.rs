#![deny(missing_docs)]

//! # Schema Compiler
//!
//! Compiles a `TypeReferenceTree` into a schema node, registering every
//! object type it meets under a sanitized identity key.
//!
//! Classification order (first match wins):
//! 1. array marker -> inline `array`
//! 2. primitive -> inline schema
//! 3. enum -> inline `string` with `enum`
//! 4. dictionary -> inline `object` with `additionalProperties` (key type dropped)
//! 5. enumerable -> inline `array`
//! 6. object -> `$ref` into the registry

use crate::error::{AppError, AppResult};
use crate::schema::primitives::primitive_schema;
use crate::schema::registry::SchemaRegistry;
use crate::schema::sanitize::sanitize_key;
use crate::typeref::{decode, strip_arity, TypeReferenceTree};
use crate::types::{PropertyDescriptor, TypeDescriptor, TypeKind, TypeResolver};
use std::collections::HashMap;
use utoipa::openapi::extensions::Extensions;
use utoipa::openapi::schema::{
    AdditionalProperties, AllOfBuilder, Array, ObjectBuilder, Schema, Type,
};
use utoipa::openapi::{Ref, RefOr};

/// Deepest type nesting a single `compile` call will follow.
///
/// Identity memoization stops ordinary recursion, but an expansive generic
/// (`Nest<T>` holding a `Nest<List<T>>`) yields a new identity at every level.
pub const MAX_NESTING_DEPTH: usize = 64;

const READ_ONLY: &str = "readOnly";

/// Compiles one reference against a shared registry.
///
/// Primitives, enums and collections come back inline; object types come back
/// as a `$ref` whose target is guaranteed to be `Ready` in `registry` once this
/// returns `Ok`. On error the registry is restored to its state before the call.
pub fn compile<R: TypeResolver + ?Sized>(
    reference: &TypeReferenceTree,
    resolver: &R,
    registry: &mut SchemaRegistry,
) -> AppResult<RefOr<Schema>> {
    let checkpoint = registry.checkpoint();
    let mut compilation = Compilation {
        resolver,
        registry,
        depth: 0,
    };
    let result = compilation.compile_node(reference);
    if let Err(e) = &result {
        tracing::debug!(reference = %reference, error = %e, "compilation failed, rolling back");
        compilation.registry.rollback(checkpoint);
    }
    result
}

/// Decodes a flat token list and compiles it.
///
/// An empty token list means "no type" and yields `Ok(None)`.
pub fn compile_tokens<S: AsRef<str>, R: TypeResolver + ?Sized>(
    tokens: &[S],
    resolver: &R,
    registry: &mut SchemaRegistry,
) -> AppResult<Option<RefOr<Schema>>> {
    match decode(tokens)? {
        Some(reference) => compile(&reference, resolver, registry).map(Some),
        None => Ok(None),
    }
}

/// Renders the fully qualified identity of a reference, e.g.
/// `Contoso.Page<System.Int32>` or `Contoso.User[]`.
pub fn identity<R: TypeResolver + ?Sized>(
    reference: &TypeReferenceTree,
    resolver: &R,
) -> AppResult<String> {
    match reference {
        TypeReferenceTree::Array(element) => Ok(format!("{}[]", identity(element, resolver)?)),
        TypeReferenceTree::Named { name, arguments } => {
            let descriptor = resolve(resolver, reference, name)?;
            render_identity(&descriptor, arguments, resolver)
        }
    }
}

/// The registry key a reference compiles under, if it compiled to an object.
pub fn registry_key<R: TypeResolver + ?Sized>(
    reference: &TypeReferenceTree,
    resolver: &R,
) -> AppResult<String> {
    Ok(sanitize_key(&identity(reference, resolver)?))
}

fn render_identity<R: TypeResolver + ?Sized>(
    descriptor: &TypeDescriptor,
    arguments: &[TypeReferenceTree],
    resolver: &R,
) -> AppResult<String> {
    let base = strip_arity(&descriptor.name);
    if arguments.is_empty() {
        return Ok(base.to_string());
    }
    let rendered = arguments
        .iter()
        .map(|arg| identity(arg, resolver))
        .collect::<AppResult<Vec<_>>>()?;
    Ok(format!("{}<{}>", base, rendered.join(",")))
}

fn resolve<R: TypeResolver + ?Sized>(
    resolver: &R,
    reference: &TypeReferenceTree,
    name: &str,
) -> AppResult<TypeDescriptor> {
    resolver
        .resolve(name)
        .map_err(|source| AppError::UnresolvedTypeReference {
            reference: reference.to_string(),
            source,
        })
}

/// Maps the descriptor's generic parameters to the supplied arguments.
fn bind_generics(
    descriptor: &TypeDescriptor,
    arguments: &[TypeReferenceTree],
) -> AppResult<HashMap<String, TypeReferenceTree>> {
    if descriptor.generic_parameters.len() != arguments.len() {
        return Err(AppError::GenericArityMismatch {
            name: descriptor.name.clone(),
            expected: descriptor.generic_parameters.len(),
            found: arguments.len(),
        });
    }
    Ok(descriptor
        .generic_parameters
        .iter()
        .cloned()
        .zip(arguments.iter().cloned())
        .collect())
}

/// One outer `compile` call.
struct Compilation<'a, R: ?Sized> {
    resolver: &'a R,
    registry: &'a mut SchemaRegistry,
    depth: usize,
}

impl<R: TypeResolver + ?Sized> Compilation<'_, R> {
    fn compile_node(&mut self, reference: &TypeReferenceTree) -> AppResult<RefOr<Schema>> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(AppError::RecursionLimit {
                reference: reference.to_string(),
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.classify(reference);
        self.depth -= 1;
        result
    }

    fn classify(&mut self, reference: &TypeReferenceTree) -> AppResult<RefOr<Schema>> {
        let (name, arguments) = match reference {
            TypeReferenceTree::Array(element) => {
                let items = self.compile_node(element)?;
                return Ok(array_schema(items));
            }
            TypeReferenceTree::Named { name, arguments } => (name, arguments),
        };

        let descriptor = resolve(self.resolver, reference, name)?;
        let bindings = bind_generics(&descriptor, arguments)?;

        match &descriptor.kind {
            TypeKind::Primitive { primitive } => Ok(RefOr::T(primitive_schema(*primitive))),
            TypeKind::Enum { members } => Ok(enum_schema(members)),
            TypeKind::Dictionary { value_type } => {
                let value = self.compile_node(&value_type.substitute(&bindings))?;
                Ok(dictionary_schema(value))
            }
            TypeKind::Enumerable { item_type } => {
                let items = self.compile_node(&item_type.substitute(&bindings))?;
                Ok(array_schema(items))
            }
            TypeKind::Object { properties } => {
                self.compile_object(&descriptor, arguments, properties, &bindings)
            }
        }
    }

    fn compile_object(
        &mut self,
        descriptor: &TypeDescriptor,
        arguments: &[TypeReferenceTree],
        properties: &[PropertyDescriptor],
        bindings: &HashMap<String, TypeReferenceTree>,
    ) -> AppResult<RefOr<Schema>> {
        let identity = render_identity(descriptor, arguments, self.resolver)?;
        let key = sanitize_key(&identity);

        // A pending entry means we are inside this type's own compilation.
        if !self.registry.reserve(&key) {
            tracing::trace!(%key, "schema already registered");
            return Ok(RefOr::Ref(Ref::from_schema_name(key)));
        }

        tracing::debug!(%identity, %key, "compiling object schema");

        let mut builder = ObjectBuilder::new().schema_type(Type::Object);
        for property in properties {
            let mut schema = self.compile_node(&property.type_ref.substitute(bindings))?;
            if !property.writable {
                schema = mark_read_only(schema);
            }
            let wire_name = property.wire_name();
            builder = builder.property(wire_name, schema);
            if property.required {
                builder = builder.required(wire_name);
            }
        }

        self.registry
            .finalize(&key, Schema::Object(builder.build()));
        Ok(RefOr::Ref(Ref::from_schema_name(key)))
    }
}

/// Flags a property schema `readOnly`.
///
/// Objects carry the keyword natively. Arrays get it through their extension
/// map, and a `$ref` is wrapped in a single-item `allOf` that carries it.
fn mark_read_only(schema: RefOr<Schema>) -> RefOr<Schema> {
    match schema {
        RefOr::T(Schema::Object(mut object)) => {
            object.read_only = Some(true);
            RefOr::T(Schema::Object(object))
        }
        RefOr::T(Schema::Array(mut array)) => {
            array
                .extensions
                .get_or_insert_with(Extensions::default)
                .insert(READ_ONLY.to_string(), true.into());
            RefOr::T(Schema::Array(array))
        }
        other => {
            let mut wrapper = AllOfBuilder::new().item(other).build();
            wrapper.extensions = Some(Extensions::from_iter([(READ_ONLY, true)]));
            RefOr::T(Schema::AllOf(wrapper))
        }
    }
}

fn enum_schema(members: &[String]) -> RefOr<Schema> {
    RefOr::T(Schema::Object(
        ObjectBuilder::new()
            .schema_type(Type::String)
            .enum_values(Some(members.iter().cloned()))
            .build(),
    ))
}

fn dictionary_schema(value: RefOr<Schema>) -> RefOr<Schema> {
    RefOr::T(Schema::Object(
        ObjectBuilder::new()
            .schema_type(Type::Object)
            .additional_properties(Some(AdditionalProperties::RefOr(value)))
            .build(),
    ))
}

fn array_schema(items: RefOr<Schema>) -> RefOr<Schema> {
    RefOr::T(Schema::Array(Array::new(items)))
}
