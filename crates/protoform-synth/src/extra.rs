//! User-declared RPCs: `<Name>Request` / `<Name>Response` built verbatim from
//! configured field definitions.

use crate::descriptor::{FieldDescriptor, MessageDescriptor, MethodDescriptor};
use crate::error::SynthError;
use crate::methods::MethodResources;
use protoform_schema::{Entity, ExtraMethodSpec, PbField, ProtoType};
use std::collections::HashMap;

/// Descriptor for a configured field.
///
/// A `type_name` makes the field a MESSAGE reference even when a scalar type
/// is also given; the one exception is an explicit ENUM.
pub fn pb_field_descriptor(
    entity: &Entity,
    def: &PbField,
) -> Result<FieldDescriptor, SynthError> {
    let type_error = |reason: &str| SynthError::TypeMapping {
        entity: entity.name.clone(),
        field: def.name.clone(),
        reason: reason.to_string(),
    };

    if def.number < 1 {
        return Err(type_error("field numbers must be positive"));
    }

    let (proto_type, type_name) = match (def.proto_type, &def.type_name) {
        (Some(ProtoType::Enum), Some(name)) => (ProtoType::Enum, Some(name.clone())),
        (_, Some(name)) => (ProtoType::Message, Some(name.clone())),
        (Some(ty), None) if ty.requires_type_name() => {
            return Err(type_error("message and enum fields need a type_name"))
        }
        (Some(ty), None) => (ty, None),
        (None, None) => return Err(type_error("field declares neither a type nor a type_name")),
    };

    Ok(FieldDescriptor {
        name: def.name.clone(),
        number: def.number,
        repeated: def.repeated,
        proto_type,
        type_name,
    })
}

/// Build one side of an extra method, rejecting repeated numbers and names.
fn direction(
    entity: &Entity,
    message: String,
    defs: &[PbField],
) -> Result<MessageDescriptor, SynthError> {
    let mut seen: HashMap<i32, &str> = HashMap::new();
    let mut out = MessageDescriptor::new(message);
    for def in defs {
        if let Some(first) = seen.insert(def.number, &def.name) {
            return Err(SynthError::DuplicateFieldNumber {
                entity: entity.name.clone(),
                message: out.name,
                number: def.number,
                first: first.to_string(),
                second: def.name.clone(),
            });
        }
        if out.field(&def.name).is_some() {
            return Err(SynthError::DuplicateFieldName {
                entity: entity.name.clone(),
                message: out.name,
                field: def.name.clone(),
            });
        }
        out.fields.push(pb_field_descriptor(entity, def)?);
    }
    Ok(out)
}

pub fn synthesize_extra_method(
    entity: &Entity,
    spec: &ExtraMethodSpec,
) -> Result<MethodResources, SynthError> {
    let request = direction(entity, format!("{}Request", spec.name), &spec.input)?;
    let response = direction(entity, format!("{}Response", spec.name), &spec.output)?;

    tracing::debug!(entity = %entity.name, method = %spec.name, "synthesized extra method");
    Ok(MethodResources {
        method: MethodDescriptor::new(&spec.name, &request.name, &response.name),
        messages: vec![request, response],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoform_schema::IdField;

    fn user() -> Entity {
        Entity::new("User", IdField::default())
    }

    #[test]
    fn fields_are_copied_verbatim() {
        let spec = ExtraMethodSpec::new(
            "FindUser",
            vec![PbField::scalar(1, "id", ProtoType::Int32)],
            vec![PbField::message(1, "user", "User")],
        );
        let res = synthesize_extra_method(&user(), &spec).unwrap();
        assert_eq!(res.method.name, "FindUser");
        assert_eq!(res.method.input_message, "FindUserRequest");
        assert_eq!(res.method.output_message, "FindUserResponse");

        let id = &res.messages[0].fields[0];
        assert_eq!((id.name.as_str(), id.number, id.proto_type), ("id", 1, ProtoType::Int32));
        assert!(id.type_name.is_none());

        let user = &res.messages[1].fields[0];
        assert_eq!((user.name.as_str(), user.number), ("user", 1));
        assert_eq!(user.proto_type, ProtoType::Message);
        assert_eq!(user.type_name.as_deref(), Some("User"));
    }

    #[test]
    fn type_name_wins_over_scalar_hint() {
        let def = PbField::scalar(2, "owner", ProtoType::String).with_type_name("User");
        let field = pb_field_descriptor(&user(), &def).unwrap();
        assert_eq!(field.proto_type, ProtoType::Message);

        let status = PbField::scalar(3, "status", ProtoType::Enum).with_type_name("User.Status");
        assert_eq!(pb_field_descriptor(&user(), &status).unwrap().proto_type, ProtoType::Enum);
    }

    #[test]
    fn repeated_flag_sets_label() {
        let def = PbField::message(1, "users", "User").repeated();
        assert!(pb_field_descriptor(&user(), &def).unwrap().repeated);
    }

    #[test]
    fn untyped_fields_fail() {
        let bare = PbField {
            number: 1,
            name: "x".into(),
            proto_type: None,
            type_name: None,
            repeated: false,
        };
        assert!(pb_field_descriptor(&user(), &bare).is_err());

        let msg = bare.clone().with_type(ProtoType::Message);
        assert!(pb_field_descriptor(&user(), &msg).is_err());
    }

    #[test]
    fn duplicate_numbers_in_one_direction_fail() {
        let spec = ExtraMethodSpec::new(
            "Search",
            vec![
                PbField::scalar(1, "query", ProtoType::String),
                PbField::scalar(1, "limit", ProtoType::Int32),
            ],
            vec![],
        );
        let err = synthesize_extra_method(&user(), &spec).unwrap_err();
        assert_eq!(
            err,
            SynthError::DuplicateFieldNumber {
                entity: "User".into(),
                message: "SearchRequest".into(),
                number: 1,
                first: "query".into(),
                second: "limit".into(),
            }
        );
    }

    #[test]
    fn same_number_across_directions_is_fine() {
        let spec = ExtraMethodSpec::new(
            "Ping",
            vec![PbField::scalar(1, "nonce", ProtoType::Uint64)],
            vec![PbField::scalar(1, "nonce", ProtoType::Uint64)],
        );
        assert!(synthesize_extra_method(&user(), &spec).is_ok());
    }

    #[test]
    fn duplicate_names_fail() {
        let spec = ExtraMethodSpec::new(
            "Ping",
            vec![],
            vec![
                PbField::scalar(1, "ok", ProtoType::Bool),
                PbField::scalar(2, "ok", ProtoType::Bool),
            ],
        );
        let err = synthesize_extra_method(&user(), &spec).unwrap_err();
        assert!(matches!(err, SynthError::DuplicateFieldName { ref message, .. } if message == "PingResponse"));
    }
}
