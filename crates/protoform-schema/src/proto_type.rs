//! Protobuf field wire types.
//!
//! Serialized with the `google.protobuf.FieldDescriptorProto.Type` enum names
//! (`TYPE_INT32`, ...), matching Buf's descriptor-set JSON. Lowercase `.proto`
//! keywords (`int32`) are accepted as aliases when decoding annotations.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtoType {
    #[serde(rename = "TYPE_DOUBLE", alias = "double")]
    Double,
    #[serde(rename = "TYPE_FLOAT", alias = "float")]
    Float,
    #[serde(rename = "TYPE_INT64", alias = "int64")]
    Int64,
    #[serde(rename = "TYPE_UINT64", alias = "uint64")]
    Uint64,
    #[serde(rename = "TYPE_INT32", alias = "int32")]
    Int32,
    #[serde(rename = "TYPE_FIXED64", alias = "fixed64")]
    Fixed64,
    #[serde(rename = "TYPE_FIXED32", alias = "fixed32")]
    Fixed32,
    #[serde(rename = "TYPE_BOOL", alias = "bool")]
    Bool,
    #[serde(rename = "TYPE_STRING", alias = "string")]
    String,
    #[serde(rename = "TYPE_MESSAGE", alias = "message")]
    Message,
    #[serde(rename = "TYPE_BYTES", alias = "bytes")]
    Bytes,
    #[serde(rename = "TYPE_UINT32", alias = "uint32")]
    Uint32,
    #[serde(rename = "TYPE_ENUM", alias = "enum")]
    Enum,
    #[serde(rename = "TYPE_SFIXED32", alias = "sfixed32")]
    Sfixed32,
    #[serde(rename = "TYPE_SFIXED64", alias = "sfixed64")]
    Sfixed64,
    #[serde(rename = "TYPE_SINT32", alias = "sint32")]
    Sint32,
    #[serde(rename = "TYPE_SINT64", alias = "sint64")]
    Sint64,
}

impl ProtoType {
    /// ENUM and MESSAGE fields must carry a `type_name`; scalars never do.
    pub const fn requires_type_name(self) -> bool {
        matches!(self, Self::Enum | Self::Message)
    }

    /// Numeric value of `google.protobuf.FieldDescriptorProto.Type`.
    pub const fn descriptor_code(self) -> i32 {
        match self {
            Self::Double => 1,
            Self::Float => 2,
            Self::Int64 => 3,
            Self::Uint64 => 4,
            Self::Int32 => 5,
            Self::Fixed64 => 6,
            Self::Fixed32 => 7,
            Self::Bool => 8,
            Self::String => 9,
            Self::Message => 11,
            Self::Bytes => 12,
            Self::Uint32 => 13,
            Self::Enum => 14,
            Self::Sfixed32 => 15,
            Self::Sfixed64 => 16,
            Self::Sint32 => 17,
            Self::Sint64 => 18,
        }
    }

    /// Scalar keyword used in `.proto` source. `None` for ENUM / MESSAGE,
    /// which are spelled by their type name instead.
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Double => Some("double"),
            Self::Float => Some("float"),
            Self::Int64 => Some("int64"),
            Self::Uint64 => Some("uint64"),
            Self::Int32 => Some("int32"),
            Self::Fixed64 => Some("fixed64"),
            Self::Fixed32 => Some("fixed32"),
            Self::Bool => Some("bool"),
            Self::String => Some("string"),
            Self::Bytes => Some("bytes"),
            Self::Uint32 => Some("uint32"),
            Self::Sfixed32 => Some("sfixed32"),
            Self::Sfixed64 => Some("sfixed64"),
            Self::Sint32 => Some("sint32"),
            Self::Sint64 => Some("sint64"),
            Self::Enum | Self::Message => None,
        }
    }
}

impl fmt::Display for ProtoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.keyword() {
            Some(kw) => f.write_str(kw),
            None if *self == Self::Enum => f.write_str("enum"),
            None => f.write_str("message"),
        }
    }
}
