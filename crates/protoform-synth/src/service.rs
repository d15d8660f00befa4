//! Per-entity service assembly.

use crate::config::SynthConfig;
use crate::dedupe::dedupe;
use crate::descriptor::{MessageDescriptor, ServiceDescriptor};
use crate::error::SynthError;
use crate::extra::synthesize_extra_method;
use crate::methods::synthesize_method;
use crate::named::named_messages;
use protoform_schema::Entity;
use serde::Serialize;

/// Runtime caps handed to the serving layer. Not part of any descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceLimits {
    pub max_page_size: u32,
    pub max_batch_create_size: u32,
}

impl From<&SynthConfig> for ServiceLimits {
    fn from(config: &SynthConfig) -> Self {
        Self {
            max_page_size: config.max_page_size,
            max_batch_create_size: config.max_batch_create_size,
        }
    }
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self::from(&SynthConfig::default())
    }
}

/// One entity's service and every message it needs, deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResources {
    pub service: ServiceDescriptor,
    pub messages: Vec<MessageDescriptor>,
    pub limits: ServiceLimits,
}

/// Default service name when no block name override is set.
pub fn service_name(entity: &Entity) -> String {
    format!("{}Service", entity.name)
}

/// Assemble the service for `entity`.
///
/// Methods are the enabled standard kinds in declaration order followed by
/// extra methods in declared order. Messages follow the same order, then the
/// entity's named messages, and are deduplicated by name.
pub fn assemble_service(
    entity: &Entity,
    config: &SynthConfig,
) -> Result<ServiceResources, SynthError> {
    let service_config = entity
        .service
        .as_ref()
        .ok_or_else(|| SynthError::MissingServiceAnnotation {
            entity: entity.name.clone(),
        })?;

    let mut methods = Vec::new();
    let mut messages = Vec::new();

    for kind in service_config.enabled_methods().iter() {
        let res = synthesize_method(entity, kind)?;
        methods.push(res.method);
        messages.extend(res.messages);
    }
    for spec in &service_config.extra_methods {
        let res = synthesize_extra_method(entity, spec)?;
        methods.push(res.method);
        messages.extend(res.messages);
    }
    messages.extend(named_messages(entity)?);

    let service = ServiceDescriptor {
        name: service_config
            .block_name
            .clone()
            .unwrap_or_else(|| service_name(entity)),
        methods,
    };
    tracing::debug!(
        entity = %entity.name,
        service = %service.name,
        methods = service.methods.len(),
        "assembled service"
    );

    Ok(ServiceResources {
        service,
        messages: dedupe(messages),
        limits: ServiceLimits::from(config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoform_schema::{
        ExtraMethodSpec, Field, FieldGroup, FieldGroups, FieldKind, IdField, MessageConfig,
        MethodKind, MethodSet, NamedMessageSpec, PbField, ProtoType, ServiceConfig,
    };

    fn user() -> Entity {
        Entity::new("User", IdField::default())
            .with_field(Field::new("name", FieldKind::String).with_number(2))
    }

    fn method_names(res: &ServiceResources) -> Vec<&str> {
        res.service.methods.iter().map(|m| m.name.as_str()).collect()
    }

    fn message_names(res: &ServiceResources) -> Vec<&str> {
        res.messages.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn all_methods_in_declaration_order() {
        let entity = user().with_service(ServiceConfig::default());
        let res = assemble_service(&entity, &SynthConfig::default()).unwrap();
        assert_eq!(res.service.name, "UserService");
        assert_eq!(
            method_names(&res),
            ["CreateUser", "GetUser", "UpdateUser", "DeleteUser", "ListUser", "BatchCreateUsers"]
        );
        assert_eq!(
            message_names(&res),
            [
                "CreateUserRequest",
                "GetUserRequest",
                "UpdateUserRequest",
                "DeleteUserRequest",
                "ListUserRequest",
                "ListUserResponse",
                "BatchCreateUsersRequest",
                "BatchCreateUsersResponse",
            ]
        );
    }

    #[test]
    fn missing_service_annotation() {
        let err = assemble_service(&user(), &SynthConfig::default()).unwrap_err();
        assert_eq!(err, SynthError::MissingServiceAnnotation { entity: "User".into() });
    }

    #[test]
    fn batch_create_alone_still_defines_create_request() {
        let entity = user()
            .with_service(ServiceConfig::default().with_methods(MethodKind::BatchCreate));
        let res = assemble_service(&entity, &SynthConfig::default()).unwrap();
        assert_eq!(method_names(&res), ["BatchCreateUsers"]);
        assert!(message_names(&res).contains(&"CreateUserRequest"));
    }

    #[test]
    fn block_name_and_extra_methods() {
        let entity = user().with_service(
            ServiceConfig::default()
                .with_methods(MethodKind::Get | MethodKind::Delete)
                .with_block_name("Accounts")
                .with_extra_method(ExtraMethodSpec::new(
                    "Ban",
                    vec![PbField::scalar(1, "id", ProtoType::Int64)],
                    vec![],
                )),
        );
        let res = assemble_service(&entity, &SynthConfig::default()).unwrap();
        assert_eq!(res.service.name, "Accounts");
        assert_eq!(method_names(&res), ["GetUser", "DeleteUser", "Ban"]);
        assert_eq!(
            message_names(&res),
            ["GetUserRequest", "DeleteUserRequest", "BanRequest", "BanResponse"]
        );
    }

    #[test]
    fn named_messages_join_and_first_wins() {
        let groups = FieldGroups::try_from(vec![FieldGroup::new("basic", ["name"])]).unwrap();
        let entity = user()
            .with_service(ServiceConfig::default().with_methods(MethodSet::only(MethodKind::Get)))
            .with_message(
                MessageConfig::default()
                    .with_field_groups(groups)
                    .with_named_message(NamedMessageSpec::new("UserSummary").with_group("basic"))
                    .with_named_message(NamedMessageSpec::new("UserSummary").with_skip_id(true)),
            );
        let res = assemble_service(&entity, &SynthConfig::default()).unwrap();
        assert_eq!(message_names(&res), ["GetUserRequest", "UserSummary"]);
        let summary = &res.messages[1];
        assert_eq!(summary.fields.len(), 2);
        assert_eq!(summary.fields[0].name, "id");
    }

    #[test]
    fn limits_come_from_config() {
        let entity = user().with_service(ServiceConfig::default());
        let config = SynthConfig {
            max_page_size: 50,
            ..SynthConfig::default()
        };
        let res = assemble_service(&entity, &config).unwrap();
        assert_eq!(res.limits.max_page_size, 50);
        assert_eq!(res.limits.max_batch_create_size, 1000);
    }

    #[test]
    fn list_failure_aborts_the_entity() {
        let entity = Entity::new("Reading", IdField::new(FieldKind::Float64))
            .with_service(ServiceConfig::default());
        let err = assemble_service(&entity, &SynthConfig::default()).unwrap_err();
        assert!(matches!(err, SynthError::UnsupportedIdType { .. }));
    }
}
