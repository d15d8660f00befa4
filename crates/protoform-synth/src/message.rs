//! The entity message: `id`, then fields, then edge-derived fields.

use crate::descriptor::{FieldDescriptor, MessageDescriptor};
use crate::error::SynthError;
use crate::groups::SchemaFieldRef;
use protoform_schema::Entity;
use std::collections::HashMap;

pub fn synthesize_entity_message(entity: &Entity) -> Result<MessageDescriptor, SynthError> {
    let members = std::iter::once(SchemaFieldRef::Id)
        .chain(entity.fields.iter().map(SchemaFieldRef::Field))
        .chain(entity.edges.iter().map(SchemaFieldRef::Edge));

    let mut message = MessageDescriptor::new(&entity.name);
    let mut by_number: HashMap<i32, String> = HashMap::new();

    for member in members {
        let (field, nested) = member.descriptor(entity)?;
        check_unique(entity, &entity.name, &by_number, &message.fields, &field)?;
        by_number.insert(field.number, field.name.clone());
        message.fields.push(field);
        if let Some(nested) = nested {
            message.nested_enums.push(nested);
        }
    }

    tracing::debug!(
        entity = %entity.name,
        fields = message.fields.len(),
        enums = message.nested_enums.len(),
        "synthesized entity message"
    );
    Ok(message)
}

/// Reject a field whose number or name is already taken in `message`.
pub(crate) fn check_unique(
    entity: &Entity,
    message: &str,
    by_number: &HashMap<i32, String>,
    existing: &[FieldDescriptor],
    field: &FieldDescriptor,
) -> Result<(), SynthError> {
    if let Some(owner) = by_number.get(&field.number) {
        return Err(SynthError::FieldNumberCollision {
            entity: entity.name.clone(),
            message: message.to_string(),
            number: field.number,
            field: field.name.clone(),
            existing: owner.clone(),
        });
    }
    if existing.iter().any(|f| f.name == field.name) {
        return Err(SynthError::DuplicateFieldName {
            entity: entity.name.clone(),
            message: message.to_string(),
            field: field.name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoform_schema::{Edge, Field, FieldKind, IdField, ProtoType};

    fn user() -> Entity {
        Entity::new("User", IdField::default())
            .with_field(Field::new("name", FieldKind::String).with_number(2))
            .with_field(
                Field::new("status", FieldKind::Enum)
                    .with_number(3)
                    .with_enum_values(["active", "banned"])
                    .with_enum_table([("active", 1), ("banned", 2)]),
            )
            .with_edge(Edge::new("pets", "Pet").with_number(4))
            .with_edge(Edge::new("group", "Group").unique().with_number(5))
    }

    #[test]
    fn id_then_fields_then_edges() {
        let msg = synthesize_entity_message(&user()).unwrap();
        let layout: Vec<_> = msg.fields.iter().map(|f| (f.name.as_str(), f.number)).collect();
        assert_eq!(
            layout,
            [("id", 1), ("name", 2), ("status", 3), ("pets", 4), ("group", 5)]
        );
        assert_eq!(msg.field("id").unwrap().proto_type, ProtoType::Int64);
        assert!(msg.field("pets").unwrap().repeated);
        assert!(!msg.field("group").unwrap().repeated);
    }

    #[test]
    fn enum_fields_nest_their_enum() {
        let msg = synthesize_entity_message(&user()).unwrap();
        let status = msg.field("status").unwrap();
        assert_eq!(status.type_name.as_deref(), Some("User.Status"));
        let nested = msg.nested_enum("Status").unwrap();
        assert_eq!(nested.value("STATUS_UNSPECIFIED"), Some(0));
        assert_eq!(nested.value("STATUS_BANNED"), Some(2));
    }

    #[test]
    fn missing_number_fails() {
        let entity = user().with_field(Field::new("bio", FieldKind::String));
        let err = synthesize_entity_message(&entity).unwrap_err();
        assert!(matches!(err, SynthError::MissingFieldNumber { ref field, .. } if field == "bio"));
    }

    #[test]
    fn numbers_may_not_collide_with_id_or_each_other() {
        let clash_id = Entity::new("User", IdField::default())
            .with_field(Field::new("name", FieldKind::String).with_number(1));
        let err = synthesize_entity_message(&clash_id).unwrap_err();
        assert!(matches!(
            err,
            SynthError::FieldNumberCollision { number: 1, ref existing, .. } if existing == "id"
        ));

        let clash = user().with_edge(Edge::new("friends", "User").with_number(2));
        let err = synthesize_entity_message(&clash).unwrap_err();
        assert!(matches!(
            err,
            SynthError::FieldNumberCollision { ref field, ref existing, .. }
                if field == "friends" && existing == "name"
        ));
    }
}
