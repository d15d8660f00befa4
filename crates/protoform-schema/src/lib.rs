//! Protoform schema model
//!
//! This crate holds the *already-resolved* entity schema that descriptor
//! synthesis consumes:
//!
//! - entities with an ordered field list, an ID type and ordered edges
//! - typed protobuf annotations (`Service`, `Message`, `Field`, `Enum`)
//! - the JSON loader that decodes annotation payloads into those types
//!
//! Nothing here knows about storage or query builders. Schema authoring tools
//! hand us a `SchemaGraph`; `protoform-synth` turns it into descriptors.

pub mod annotations;
pub mod entity;
pub mod error;
pub mod load;
pub mod proto_type;

pub use annotations::{
    ExtraField, ExtraMethodSpec, FieldGroup, FieldGroups, MessageConfig, MethodKind, MethodSet,
    NamedMessageSpec, PbField, ServiceConfig,
};
pub use entity::{
    Edge, Entity, EnumTable, Field, FieldAnnotation, FieldKind, IdField, ProtoTypeOverride,
    SchemaGraph,
};
pub use error::SchemaError;
pub use load::{
    load_schema_json, ENUM_ANNOTATION, FIELD_ANNOTATION, MESSAGE_ANNOTATION, SERVICE_ANNOTATION,
};
pub use proto_type::ProtoType;
