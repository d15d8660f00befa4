//! Standard method synthesis.
//!
//! Each built-in operation yields a method descriptor plus the messages it
//! introduces. Field numbers inside request/response messages are fixed per
//! operation and never derived from the entity's own numbering.
//!
//! | kind        | input                         | output                         |
//! |-------------|-------------------------------|--------------------------------|
//! | Create      | `Create<E>Request`            | `<E>`                          |
//! | Get         | `Get<E>Request`               | `<E>`                          |
//! | Update      | `Update<E>Request`            | `<E>`                          |
//! | Delete      | `Delete<E>Request`            | `google.protobuf.Empty`        |
//! | List        | `List<E>Request`              | `List<E>Response`              |
//! | BatchCreate | `BatchCreate<Es>Request`      | `BatchCreate<Es>Response`      |

use crate::descriptor::{EnumDescriptor, FieldDescriptor, MessageDescriptor, MethodDescriptor};
use crate::error::SynthError;
use crate::naming::{plural, snake};
use crate::types::id_field;
use protoform_schema::{Entity, FieldKind, MethodKind, ProtoType};

/// Response type of Delete.
pub const EMPTY_TYPE: &str = "google.protobuf.Empty";

/// Nested enum on Get/List requests selecting how much edge data to load.
pub const VIEW_ENUM: &str = "View";

/// A method plus the messages it introduced, in generation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodResources {
    pub method: MethodDescriptor,
    pub messages: Vec<MessageDescriptor>,
}

pub fn synthesize_method(entity: &Entity, kind: MethodKind) -> Result<MethodResources, SynthError> {
    let resources = match kind {
        MethodKind::Create => create(entity),
        MethodKind::Get => get(entity)?,
        MethodKind::Update => update(entity),
        MethodKind::Delete => delete(entity)?,
        MethodKind::List => list(entity)?,
        MethodKind::BatchCreate => batch_create(entity),
    };
    tracing::debug!(
        entity = %entity.name,
        method = %resources.method.name,
        messages = resources.messages.len(),
        "synthesized method"
    );
    Ok(resources)
}

/// Method name: `<Kind><Entity>`, pluralized for BatchCreate.
pub fn method_name(entity: &Entity, kind: MethodKind) -> String {
    match kind {
        MethodKind::BatchCreate => format!("{}{}", kind.prefix(), plural(&entity.name)),
        _ => format!("{}{}", kind.prefix(), entity.name),
    }
}

pub fn view_enum() -> EnumDescriptor {
    EnumDescriptor::new(VIEW_ENUM)
        .with_value("VIEW_UNSPECIFIED", 0)
        .with_value("BASIC", 1)
        .with_value("WITH_EDGE_IDS", 2)
}

/// `Create<E>Request { <e> = 1 }`. Shared by Create and BatchCreate.
pub fn create_request(entity: &Entity) -> MessageDescriptor {
    payload_request(entity, MethodKind::Create)
}

fn payload_request(entity: &Entity, kind: MethodKind) -> MessageDescriptor {
    MessageDescriptor::new(format!("{}Request", method_name(entity, kind))).with_field(
        FieldDescriptor::message(snake(&entity.name), 1, &entity.name),
    )
}

fn create(entity: &Entity) -> MethodResources {
    let request = create_request(entity);
    MethodResources {
        method: MethodDescriptor::new(
            method_name(entity, MethodKind::Create),
            &request.name,
            &entity.name,
        ),
        messages: vec![request],
    }
}

fn update(entity: &Entity) -> MethodResources {
    let request = payload_request(entity, MethodKind::Update);
    MethodResources {
        method: MethodDescriptor::new(
            method_name(entity, MethodKind::Update),
            &request.name,
            &entity.name,
        ),
        messages: vec![request],
    }
}

fn get(entity: &Entity) -> Result<MethodResources, SynthError> {
    let name = method_name(entity, MethodKind::Get);
    let request = MessageDescriptor::new(format!("{name}Request"))
        .with_field(id_field(entity)?)
        .with_field(FieldDescriptor::enumeration("view", 2, VIEW_ENUM))
        .with_enum(view_enum());
    Ok(MethodResources {
        method: MethodDescriptor::new(name, &request.name, &entity.name),
        messages: vec![request],
    })
}

fn delete(entity: &Entity) -> Result<MethodResources, SynthError> {
    let name = method_name(entity, MethodKind::Delete);
    let request = MessageDescriptor::new(format!("{name}Request")).with_field(id_field(entity)?);
    Ok(MethodResources {
        method: MethodDescriptor::new(name, &request.name, EMPTY_TYPE),
        messages: vec![request],
    })
}

/// ID kinds a page token can encode a cursor for.
fn paginable(kind: FieldKind) -> bool {
    kind.is_integer() || matches!(kind, FieldKind::Uuid | FieldKind::String)
}

fn list(entity: &Entity) -> Result<MethodResources, SynthError> {
    if !paginable(entity.id.kind) {
        return Err(SynthError::UnsupportedIdType {
            entity: entity.name.clone(),
            id_type: entity.id.kind,
        });
    }

    let name = method_name(entity, MethodKind::List);
    let request = MessageDescriptor::new(format!("{name}Request"))
        .with_field(FieldDescriptor::scalar("page_size", 1, ProtoType::Int32))
        .with_field(FieldDescriptor::scalar("page_token", 2, ProtoType::String))
        .with_field(FieldDescriptor::enumeration("view", 3, VIEW_ENUM))
        .with_enum(view_enum());
    let response = MessageDescriptor::new(format!("{name}Response"))
        .with_field(
            FieldDescriptor::message(format!("{}_list", snake(&entity.name)), 1, &entity.name)
                .repeated(),
        )
        .with_field(FieldDescriptor::scalar("next_page_token", 2, ProtoType::String));

    Ok(MethodResources {
        method: MethodDescriptor::new(name, &request.name, &response.name),
        messages: vec![request, response],
    })
}

fn batch_create(entity: &Entity) -> MethodResources {
    // Requests embed Create<E>Request, so it is emitted here whether or not
    // Create itself is enabled. Dedup collapses the copy when it is.
    let create = create_request(entity);
    let name = method_name(entity, MethodKind::BatchCreate);
    let request = MessageDescriptor::new(format!("{name}Request"))
        .with_field(FieldDescriptor::message("requests", 1, &create.name).repeated());
    let response = MessageDescriptor::new(format!("{name}Response")).with_field(
        FieldDescriptor::message(format!("{}_list", snake(&plural(&entity.name))), 1, &entity.name)
            .repeated(),
    );

    MethodResources {
        method: MethodDescriptor::new(name, &request.name, &response.name),
        messages: vec![create, request, response],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoform_schema::IdField;

    fn user() -> Entity {
        Entity::new("User", IdField::default())
    }

    fn layout(msg: &MessageDescriptor) -> Vec<(&str, i32, ProtoType, bool)> {
        msg.fields
            .iter()
            .map(|f| (f.name.as_str(), f.number, f.proto_type, f.repeated))
            .collect()
    }

    #[test]
    fn names_follow_kind_and_entity() {
        let names: Vec<_> = MethodKind::ALL.iter().map(|k| method_name(&user(), *k)).collect();
        assert_eq!(
            names,
            ["CreateUser", "GetUser", "UpdateUser", "DeleteUser", "ListUser", "BatchCreateUsers"]
        );
    }

    #[test]
    fn get_carries_id_and_view() {
        let res = synthesize_method(&user(), MethodKind::Get).unwrap();
        assert_eq!(res.method.input_message, "GetUserRequest");
        assert_eq!(res.method.output_message, "User");
        let req = &res.messages[0];
        assert_eq!(
            layout(req),
            [("id", 1, ProtoType::Int64, false), ("view", 2, ProtoType::Enum, false)]
        );
        assert_eq!(req.field("view").unwrap().type_name.as_deref(), Some("View"));
        let view = req.nested_enum("View").unwrap();
        assert_eq!(view.value("VIEW_UNSPECIFIED"), Some(0));
        assert_eq!(view.value("BASIC"), Some(1));
        assert_eq!(view.value("WITH_EDGE_IDS"), Some(2));
    }

    #[test]
    fn create_and_update_wrap_the_entity() {
        for (kind, request) in [
            (MethodKind::Create, "CreateUserRequest"),
            (MethodKind::Update, "UpdateUserRequest"),
        ] {
            let res = synthesize_method(&user(), kind).unwrap();
            assert_eq!(res.messages.len(), 1);
            assert_eq!(res.messages[0].name, request);
            let field = &res.messages[0].fields[0];
            assert_eq!((field.name.as_str(), field.number), ("user", 1));
            assert_eq!(field.type_name.as_deref(), Some("User"));
            assert_eq!(res.method.output_message, "User");
        }
    }

    #[test]
    fn delete_returns_empty() {
        let entity = Entity::new("Pet", IdField::new(FieldKind::Uuid));
        let res = synthesize_method(&entity, MethodKind::Delete).unwrap();
        assert_eq!(res.method.output_message, EMPTY_TYPE);
        assert_eq!(layout(&res.messages[0]), [("id", 1, ProtoType::Bytes, false)]);
    }

    #[test]
    fn list_request_and_response_shapes() {
        let res = synthesize_method(&user(), MethodKind::List).unwrap();
        let [req, resp] = res.messages.as_slice() else {
            panic!("expected request and response");
        };
        assert_eq!(req.name, "ListUserRequest");
        assert_eq!(
            layout(req),
            [
                ("page_size", 1, ProtoType::Int32, false),
                ("page_token", 2, ProtoType::String, false),
                ("view", 3, ProtoType::Enum, false),
            ]
        );
        assert!(req.field("id").is_none());
        assert_eq!(resp.name, "ListUserResponse");
        assert_eq!(
            layout(resp),
            [
                ("user_list", 1, ProtoType::Message, true),
                ("next_page_token", 2, ProtoType::String, false),
            ]
        );
        assert_eq!(resp.fields[0].type_name.as_deref(), Some("User"));
    }

    #[test]
    fn list_rejects_float_ids_without_messages() {
        let entity = Entity::new("Reading", IdField::new(FieldKind::Float64));
        let err = synthesize_method(&entity, MethodKind::List).unwrap_err();
        assert_eq!(
            err,
            SynthError::UnsupportedIdType {
                entity: "Reading".into(),
                id_type: FieldKind::Float64,
            }
        );
    }

    #[test]
    fn list_accepts_string_and_uuid_ids() {
        for kind in [FieldKind::String, FieldKind::Uuid, FieldKind::Uint32] {
            let entity = Entity::new("Tag", IdField::new(kind));
            assert!(synthesize_method(&entity, MethodKind::List).is_ok(), "{kind}");
        }
    }

    #[test]
    fn batch_create_brings_its_create_request() {
        let res = synthesize_method(&user(), MethodKind::BatchCreate).unwrap();
        let names: Vec<_> = res.messages.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            ["CreateUserRequest", "BatchCreateUsersRequest", "BatchCreateUsersResponse"]
        );
        let requests = &res.messages[1].fields[0];
        assert_eq!(requests.name, "requests");
        assert!(requests.repeated);
        assert_eq!(requests.type_name.as_deref(), Some("CreateUserRequest"));
        let list = &res.messages[2].fields[0];
        assert_eq!((list.name.as_str(), list.repeated), ("users_list", true));
        assert_eq!(res.method.name, "BatchCreateUsers");
    }
}
