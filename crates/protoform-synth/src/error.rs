use protoform_schema::FieldKind;
use thiserror::Error;

/// Errors produced while synthesizing descriptors for one entity.
///
/// Every variant names the entity; numbering and lookup errors also name the
/// message they occurred in. None of these are retryable: the schema must be
/// corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthError {
    #[error("entity `{entity}` has no {} annotation", protoform_schema::SERVICE_ANNOTATION)]
    MissingServiceAnnotation { entity: String },

    #[error("entity `{entity}`: field `{field}`: {reason}")]
    TypeMapping {
        entity: String,
        field: String,
        reason: String,
    },

    #[error("entity `{entity}`: message `{message}` references unknown field group `{group}`")]
    UnknownGroup {
        entity: String,
        message: String,
        group: String,
    },

    #[error("entity `{entity}`: field group `{group}` references unknown field or edge `{member}`")]
    UnknownGroupMember {
        entity: String,
        group: String,
        member: String,
    },

    #[error("entity `{entity}`: list method does not support id type `{id_type}`")]
    UnsupportedIdType { entity: String, id_type: FieldKind },

    #[error(
        "entity `{entity}`: message `{message}` uses field number {number} for both `{first}` and `{second}`"
    )]
    DuplicateFieldNumber {
        entity: String,
        message: String,
        number: i32,
        first: String,
        second: String,
    },

    #[error(
        "entity `{entity}`: message `{message}`: field `{field}` number {number} collides with `{existing}`"
    )]
    FieldNumberCollision {
        entity: String,
        message: String,
        number: i32,
        field: String,
        existing: String,
    },

    #[error("entity `{entity}`: message `{message}` declares field `{field}` more than once")]
    DuplicateFieldName {
        entity: String,
        message: String,
        field: String,
    },

    #[error("entity `{entity}`: `{field}` has no protobuf field number annotation")]
    MissingFieldNumber { entity: String, field: String },

    #[error("entity `{entity}`: edge `{edge}` targets `{target}`, which has no generated message")]
    UnknownEdgeTarget {
        entity: String,
        edge: String,
        target: String,
    },

    #[error(
        "entity `{entity}`: edge `{edge}` targets `{target}` in package `{target_package}`; cross-package edges are not supported"
    )]
    CrossPackageEdge {
        entity: String,
        edge: String,
        target: String,
        target_package: String,
    },
}

impl SynthError {
    /// Entity the error belongs to.
    pub fn entity(&self) -> &str {
        match self {
            Self::MissingServiceAnnotation { entity }
            | Self::TypeMapping { entity, .. }
            | Self::UnknownGroup { entity, .. }
            | Self::UnknownGroupMember { entity, .. }
            | Self::UnsupportedIdType { entity, .. }
            | Self::DuplicateFieldNumber { entity, .. }
            | Self::FieldNumberCollision { entity, .. }
            | Self::DuplicateFieldName { entity, .. }
            | Self::MissingFieldNumber { entity, .. }
            | Self::UnknownEdgeTarget { entity, .. }
            | Self::CrossPackageEdge { entity, .. } => entity,
        }
    }
}
