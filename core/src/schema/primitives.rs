//! # Primitive Schemas
//!
//! Inline wire schemas for primitive host types.

use crate::types::PrimitiveType;
use serde_json::json;
use utoipa::openapi::schema::{KnownFormat, Object, ObjectBuilder, Schema, SchemaFormat, Type};

/// Example value attached to unique-identifier schemas.
pub const EMPTY_GUID: &str = "00000000-0000-0000-0000-000000000000";

/// Builds the inline schema for a primitive.
pub fn primitive_schema(primitive: PrimitiveType) -> Schema {
    let object = match primitive {
        PrimitiveType::Boolean => ObjectBuilder::new().schema_type(Type::Boolean).build(),
        PrimitiveType::Byte => formatted(Type::String, KnownFormat::Byte),
        PrimitiveType::SByte
        | PrimitiveType::Int16
        | PrimitiveType::UInt16
        | PrimitiveType::Int32 => formatted(Type::Integer, KnownFormat::Int32),
        PrimitiveType::UInt32 | PrimitiveType::Int64 | PrimitiveType::UInt64 => {
            formatted(Type::Integer, KnownFormat::Int64)
        }
        PrimitiveType::Single => formatted(Type::Number, KnownFormat::Float),
        PrimitiveType::Double | PrimitiveType::Decimal => {
            formatted(Type::Number, KnownFormat::Double)
        }
        PrimitiveType::String | PrimitiveType::TimeSpan => string(),
        PrimitiveType::DateTime | PrimitiveType::DateTimeOffset => {
            formatted(Type::String, KnownFormat::DateTime)
        }
        PrimitiveType::Char => ObjectBuilder::new()
            .schema_type(Type::String)
            .min_length(Some(1))
            .max_length(Some(1))
            .build(),
        PrimitiveType::Guid => {
            let mut guid = ObjectBuilder::new()
                .schema_type(Type::String)
                .format(Some(SchemaFormat::KnownFormat(KnownFormat::Uuid)))
                .min_length(Some(EMPTY_GUID.len()))
                .max_length(Some(EMPTY_GUID.len()))
                .build();
            guid.examples = vec![json!(EMPTY_GUID)];
            guid
        }
    };
    Schema::Object(object)
}

/// Plain `type: string` schema, also used as the opaque fallback for unresolved types.
pub fn opaque_string_schema() -> Schema {
    Schema::Object(string())
}

fn string() -> Object {
    ObjectBuilder::new().schema_type(Type::String).build()
}

fn formatted(schema_type: Type, format: KnownFormat) -> Object {
    ObjectBuilder::new()
        .schema_type(schema_type)
        .format(Some(SchemaFormat::KnownFormat(format)))
        .build()
}
