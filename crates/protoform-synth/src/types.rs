//! Schema field types → protobuf wire types.

use crate::descriptor::{EnumDescriptor, FieldDescriptor};
use crate::error::SynthError;
use crate::naming::{pascal, shouty_snake};
use protoform_schema::entity::{ID_FIELD_NAME, ID_FIELD_NUMBER};
use protoform_schema::{Edge, Entity, EnumTable, Field, FieldKind, ProtoType, ProtoTypeOverride};
use std::collections::HashMap;

/// The wire type chosen for one schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub proto_type: ProtoType,
    pub type_name: Option<String>,
    pub repeated: bool,
    /// Enum declared by the field itself, to be nested in the entity message.
    pub enum_descriptor: Option<EnumDescriptor>,
}

impl MappedType {
    fn scalar(proto_type: ProtoType) -> Self {
        Self {
            proto_type,
            type_name: None,
            repeated: false,
            enum_descriptor: None,
        }
    }

    pub fn to_field(&self, name: impl Into<String>, number: i32) -> FieldDescriptor {
        FieldDescriptor {
            name: name.into(),
            number,
            repeated: self.repeated,
            proto_type: self.proto_type,
            type_name: self.type_name.clone(),
        }
    }
}

/// Fixed kind → wire type table. `None` means no protobuf equivalent.
pub const fn scalar_type(kind: FieldKind) -> Option<ProtoType> {
    match kind {
        FieldKind::Bool => Some(ProtoType::Bool),
        FieldKind::String => Some(ProtoType::String),
        FieldKind::Bytes | FieldKind::Uuid => Some(ProtoType::Bytes),
        FieldKind::Int | FieldKind::Int64 | FieldKind::Time => Some(ProtoType::Int64),
        FieldKind::Int8 | FieldKind::Int16 | FieldKind::Int32 => Some(ProtoType::Int32),
        FieldKind::Uint | FieldKind::Uint64 => Some(ProtoType::Uint64),
        FieldKind::Uint8 | FieldKind::Uint16 | FieldKind::Uint32 => Some(ProtoType::Uint32),
        FieldKind::Float32 => Some(ProtoType::Float),
        FieldKind::Float64 => Some(ProtoType::Double),
        FieldKind::Int128
        | FieldKind::Uint128
        | FieldKind::Enum
        | FieldKind::Json
        | FieldKind::Other => None,
    }
}

/// Map a schema field, honoring an explicit protobuf type when annotated.
pub fn map_field(entity: &str, field: &Field) -> Result<MappedType, SynthError> {
    let type_error = |reason: String| SynthError::TypeMapping {
        entity: entity.to_string(),
        field: field.name.clone(),
        reason,
    };

    if let Some(ov) = field.annotation.as_ref().and_then(|a| a.proto_type.as_ref()) {
        return map_override(ov).map_err(type_error);
    }

    if field.kind == FieldKind::Enum {
        let table = field
            .enum_table
            .as_ref()
            .ok_or_else(|| type_error("enum field is missing its value table".to_string()))?;
        let descriptor = enum_descriptor(field, table).map_err(type_error)?;
        return Ok(MappedType {
            proto_type: ProtoType::Enum,
            type_name: Some(format!("{entity}.{}", descriptor.name)),
            repeated: false,
            enum_descriptor: Some(descriptor),
        });
    }

    scalar_type(field.kind)
        .map(MappedType::scalar)
        .ok_or_else(|| type_error(format!("type `{}` has no protobuf equivalent", field.kind)))
}

fn map_override(ov: &ProtoTypeOverride) -> Result<MappedType, String> {
    match (&ov.type_name, ov.proto_type.requires_type_name()) {
        (Some(name), true) => Ok(MappedType {
            proto_type: ov.proto_type,
            type_name: Some(name.clone()),
            repeated: false,
            enum_descriptor: None,
        }),
        (None, true) => Err(format!(
            "explicit type {} requires a type_name",
            ov.proto_type
        )),
        (Some(name), false) => Err(format!(
            "explicit scalar type {} cannot reference `{name}`",
            ov.proto_type
        )),
        (None, false) => Ok(MappedType::scalar(ov.proto_type)),
    }
}

/// Build the enum for an enum field.
///
/// Values are emitted in table order, prefixed with the field name. A
/// `<FIELD>_UNSPECIFIED = 0` value leads unless the table already maps
/// something to 0.
pub fn enum_descriptor(field: &Field, table: &EnumTable) -> Result<EnumDescriptor, String> {
    if let Some(missing) = field.enum_values.iter().find(|v| !table.contains_key(*v)) {
        return Err(format!("enum value `{missing}` has no protobuf number"));
    }

    let mut seen: HashMap<i32, &str> = HashMap::new();
    for (value, number) in table {
        if let Some(prev) = seen.insert(*number, value) {
            return Err(format!(
                "enum values `{prev}` and `{value}` share number {number}"
            ));
        }
    }

    let prefix = shouty_snake(&field.name);
    let mut descriptor = EnumDescriptor::new(pascal(&field.name));
    if !seen.contains_key(&0) {
        descriptor = descriptor.with_value(format!("{prefix}_UNSPECIFIED"), 0);
    }
    for (value, number) in table {
        descriptor = descriptor.with_value(format!("{prefix}_{}", shouty_snake(value)), *number);
    }
    Ok(descriptor)
}

/// Edge-derived field: the target entity's message, repeated unless unique.
pub fn map_edge(edge: &Edge) -> MappedType {
    MappedType {
        proto_type: ProtoType::Message,
        type_name: Some(edge.target.clone()),
        repeated: !edge.unique,
        enum_descriptor: None,
    }
}

/// The `id` field (number 1) typed from the entity's ID kind.
pub fn id_field(entity: &Entity) -> Result<FieldDescriptor, SynthError> {
    let proto_type = scalar_type(entity.id.kind).ok_or_else(|| SynthError::TypeMapping {
        entity: entity.name.clone(),
        field: ID_FIELD_NAME.to_string(),
        reason: format!("id type `{}` has no protobuf equivalent", entity.id.kind),
    })?;
    Ok(FieldDescriptor::scalar(ID_FIELD_NAME, ID_FIELD_NUMBER, proto_type))
}
