//! Entity schema model (already resolved by the schema loader).

use crate::annotations::{MessageConfig, ServiceConfig};
use crate::proto_type::ProtoType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the identifier field on every entity message.
pub const ID_FIELD_NAME: &str = "id";

/// Field number reserved for the identifier field.
pub const ID_FIELD_NUMBER: i32 = 1;

// ============================================================================
// Field kinds
// ============================================================================

/// Semantic type of a schema field, independent of any wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Bool,
    String,
    Bytes,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint128,
    Float32,
    Float64,
    Time,
    Uuid,
    Enum,
    Json,
    Other,
}

impl FieldKind {
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Int128
                | Self::Uint
                | Self::Uint8
                | Self::Uint16
                | Self::Uint32
                | Self::Uint64
                | Self::Uint128
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Int128 => "int128",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uint128 => "uint128",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Time => "time",
            Self::Uuid => "uuid",
            Self::Enum => "enum",
            Self::Json => "json",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Per-field annotations
// ============================================================================

/// Explicit protobuf type for a field, bypassing kind-based mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtoTypeOverride {
    #[serde(rename = "type")]
    pub proto_type: ProtoType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

/// `Field(number)` annotation, shared by schema fields and edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAnnotation {
    pub number: i32,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub proto_type: Option<ProtoTypeOverride>,
}

impl FieldAnnotation {
    pub fn number(number: i32) -> Self {
        Self {
            number,
            proto_type: None,
        }
    }
}

/// `Enum(valueTable)` annotation: value name → protobuf enum number, in
/// declaration order.
pub type EnumTable = IndexMap<String, i32>;

// ============================================================================
// Fields, edges, entities
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    /// Declared value names (enum fields only).
    pub enum_values: Vec<String>,
    pub annotation: Option<FieldAnnotation>,
    pub enum_table: Option<EnumTable>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            enum_values: Vec::new(),
            annotation: None,
            enum_table: None,
        }
    }

    pub fn with_number(mut self, number: i32) -> Self {
        match &mut self.annotation {
            Some(annotation) => annotation.number = number,
            None => self.annotation = Some(FieldAnnotation::number(number)),
        }
        self
    }

    pub fn with_proto_type(mut self, proto_type: ProtoType, type_name: Option<&str>) -> Self {
        let ov = ProtoTypeOverride {
            proto_type,
            type_name: type_name.map(str::to_string),
        };
        match &mut self.annotation {
            Some(annotation) => annotation.proto_type = Some(ov),
            None => {
                self.annotation = Some(FieldAnnotation {
                    number: 0,
                    proto_type: Some(ov),
                })
            }
        }
        self
    }

    pub fn with_enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_enum_table<I, S>(mut self, table: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        self.enum_table = Some(table.into_iter().map(|(k, v)| (k.into(), v)).collect());
        self
    }

    /// Annotated protobuf field number, if any.
    pub fn number(&self) -> Option<i32> {
        self.annotation.as_ref().map(|a| a.number).filter(|n| *n > 0)
    }
}

/// A relation to another entity.
///
/// Each edge contributes one edge-derived field typed by the target entity's
/// message; non-unique edges are repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub name: String,
    pub target: String,
    pub unique: bool,
    pub annotation: Option<FieldAnnotation>,
}

impl Edge {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            unique: false,
            annotation: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_number(mut self, number: i32) -> Self {
        self.annotation = Some(FieldAnnotation::number(number));
        self
    }

    pub fn number(&self) -> Option<i32> {
        self.annotation.as_ref().map(|a| a.number).filter(|n| *n > 0)
    }
}

/// The entity's identifier. Always named `id`, always field number 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdField {
    pub kind: FieldKind,
}

impl IdField {
    pub const fn new(kind: FieldKind) -> Self {
        Self { kind }
    }
}

impl Default for IdField {
    fn default() -> Self {
        Self::new(FieldKind::Int)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub id: IdField,
    pub fields: Vec<Field>,
    pub edges: Vec<Edge>,
    pub service: Option<ServiceConfig>,
    pub message: Option<MessageConfig>,
}

impl Entity {
    pub fn new(name: impl Into<String>, id: IdField) -> Self {
        Self {
            name: name.into(),
            id,
            fields: Vec::new(),
            edges: Vec::new(),
            service: None,
            message: None,
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_message(mut self, message: MessageConfig) -> Self {
        self.message = Some(message);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn edge(&self, name: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.name == name)
    }
}

/// Ordered collection of entities; names are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaGraph {
    pub entities: Vec<Entity>,
}

impl SchemaGraph {
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}
