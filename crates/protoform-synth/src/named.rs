//! Named messages: independently-named shapes built from a field group.
//!
//! Layout is `id` (unless skipped), then the group's members (edges dropped
//! when `skip_edges`), then the extra fields with their declared numbers.

use crate::descriptor::MessageDescriptor;
use crate::error::SynthError;
use crate::extra::pb_field_descriptor;
use crate::groups::{resolve_group, SchemaFieldRef};
use crate::message::check_unique;
use protoform_schema::{Entity, FieldGroups, NamedMessageSpec};
use std::collections::HashMap;

pub fn compose_named_message(
    entity: &Entity,
    groups: &FieldGroups,
    spec: &NamedMessageSpec,
) -> Result<MessageDescriptor, SynthError> {
    let mut members = Vec::new();
    if !spec.skip_id {
        members.push(SchemaFieldRef::Id);
    }
    if let Some(group) = &spec.group {
        members.extend(
            resolve_group(entity, groups, group, &spec.name)?
                .into_iter()
                // The id is placed first above; a group listing it adds nothing.
                .filter(|m| !matches!(m, SchemaFieldRef::Id))
                .filter(|m| !(spec.skip_edges && m.is_edge())),
        );
    }

    let mut message = MessageDescriptor::new(&spec.name);
    let mut by_number: HashMap<i32, String> = HashMap::new();

    for member in members {
        let (field, _) = member.descriptor(entity)?;
        check_unique(entity, &spec.name, &by_number, &message.fields, &field)?;
        by_number.insert(field.number, field.name.clone());
        message.fields.push(field);
    }
    for def in &spec.extra_fields {
        let field = pb_field_descriptor(entity, def)?;
        check_unique(entity, &spec.name, &by_number, &message.fields, &field)?;
        by_number.insert(field.number, field.name.clone());
        message.fields.push(field);
    }

    tracing::debug!(entity = %entity.name, message = %spec.name, "composed named message");
    Ok(message)
}

/// Every named message declared in the entity's `Message` annotation.
pub fn named_messages(entity: &Entity) -> Result<Vec<MessageDescriptor>, SynthError> {
    let Some(config) = &entity.message else {
        return Ok(Vec::new());
    };
    config
        .named_messages
        .iter()
        .map(|spec| compose_named_message(entity, &config.field_groups, spec))
        .collect()
}
