//! Field group resolution.
//!
//! A group names an ordered selection of an entity's fields and edges. The
//! resolver only selects and orders: every member carries its own annotated
//! field number.

use crate::descriptor::{EnumDescriptor, FieldDescriptor};
use crate::error::SynthError;
use crate::types::{id_field, map_edge, map_field};
use protoform_schema::entity::ID_FIELD_NAME;
use protoform_schema::{Edge, Entity, Field, FieldGroups};

/// One member of an entity's field list, as seen by a group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaFieldRef<'a> {
    Id,
    Field(&'a Field),
    Edge(&'a Edge),
}

impl<'a> SchemaFieldRef<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            Self::Id => ID_FIELD_NAME,
            Self::Field(f) => &f.name,
            Self::Edge(e) => &e.name,
        }
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, Self::Edge(_))
    }

    /// Look a member up by name. Plain fields shadow edges of the same name.
    pub fn lookup(entity: &'a Entity, name: &str) -> Option<Self> {
        if name == ID_FIELD_NAME {
            return Some(Self::Id);
        }
        entity
            .field(name)
            .map(Self::Field)
            .or_else(|| entity.edge(name).map(Self::Edge))
    }

    /// Descriptor for this member, plus the enum it declares (enum fields only).
    pub fn descriptor(
        &self,
        entity: &Entity,
    ) -> Result<(FieldDescriptor, Option<EnumDescriptor>), SynthError> {
        let missing = |name: &str| SynthError::MissingFieldNumber {
            entity: entity.name.clone(),
            field: name.to_string(),
        };
        match self {
            Self::Id => Ok((id_field(entity)?, None)),
            Self::Field(field) => {
                let number = field.number().ok_or_else(|| missing(&field.name))?;
                let mapped = map_field(&entity.name, field)?;
                Ok((mapped.to_field(&field.name, number), mapped.enum_descriptor))
            }
            Self::Edge(edge) => {
                let number = edge.number().ok_or_else(|| missing(&edge.name))?;
                Ok((map_edge(edge).to_field(&edge.name, number), None))
            }
        }
    }
}

/// Resolve `group` to its members in declared order.
///
/// `requested_by` names the message asking, for error context.
pub fn resolve_group<'a>(
    entity: &'a Entity,
    groups: &FieldGroups,
    group: &str,
    requested_by: &str,
) -> Result<Vec<SchemaFieldRef<'a>>, SynthError> {
    let declared = groups.get(group).ok_or_else(|| SynthError::UnknownGroup {
        entity: entity.name.clone(),
        message: requested_by.to_string(),
        group: group.to_string(),
    })?;

    declared
        .fields
        .iter()
        .map(|member| {
            SchemaFieldRef::lookup(entity, member).ok_or_else(|| SynthError::UnknownGroupMember {
                entity: entity.name.clone(),
                group: group.to_string(),
                member: member.clone(),
            })
        })
        .collect()
}
