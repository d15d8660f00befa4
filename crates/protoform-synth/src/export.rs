//! Descriptor-set export.
//!
//! `prost-types` descriptors carry fully-qualified type names (`.pkg.User`);
//! the descriptor tree keeps them relative to the package, so references are
//! qualified here.

use crate::descriptor::{
    EnumDescriptor, FieldDescriptor, FileDescriptor, MessageDescriptor, ServiceDescriptor,
};
use prost::Message;
use prost_types::field_descriptor_proto::Label;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, MethodDescriptorProto, ServiceDescriptorProto,
};
use serde::Serialize;

/// Buf-style descriptor-set JSON: `{"file": [...]}`.
#[derive(Debug, Serialize)]
pub struct DescriptorSetJson<'a> {
    pub file: &'a [FileDescriptor],
}

impl<'a> From<&'a [FileDescriptor]> for DescriptorSetJson<'a> {
    fn from(file: &'a [FileDescriptor]) -> Self {
        Self { file }
    }
}

/// Absolute name for a type referenced from `scope` (the enclosing message,
/// if any) in `package`.
fn qualify(package: &str, scope: Option<&MessageDescriptor>, type_name: &str) -> String {
    if type_name.starts_with('.') {
        return type_name.to_string();
    }
    if type_name.starts_with("google.protobuf.")
        || type_name
            .strip_prefix(package)
            .is_some_and(|rest| rest.starts_with('.'))
    {
        return format!(".{type_name}");
    }
    match scope {
        Some(m) if m.nested_enum(type_name).is_some() => {
            format!(".{package}.{}.{type_name}", m.name)
        }
        _ => format!(".{package}.{type_name}"),
    }
}

fn field_proto(
    package: &str,
    scope: &MessageDescriptor,
    field: &FieldDescriptor,
) -> FieldDescriptorProto {
    let mut proto = FieldDescriptorProto {
        name: Some(field.name.clone()),
        number: Some(field.number),
        type_name: field
            .type_name
            .as_deref()
            .map(|t| qualify(package, Some(scope), t)),
        ..Default::default()
    };
    proto.set_label(if field.repeated {
        Label::Repeated
    } else {
        Label::Optional
    });
    proto.r#type = Some(field.proto_type.descriptor_code());
    proto
}

fn enum_proto(descriptor: &EnumDescriptor) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(descriptor.name.clone()),
        value: descriptor
            .values
            .iter()
            .map(|v| EnumValueDescriptorProto {
                name: Some(v.name.clone()),
                number: Some(v.number),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn message_proto(package: &str, message: &MessageDescriptor) -> DescriptorProto {
    DescriptorProto {
        name: Some(message.name.clone()),
        field: message
            .fields
            .iter()
            .map(|f| field_proto(package, message, f))
            .collect(),
        enum_type: message.nested_enums.iter().map(enum_proto).collect(),
        ..Default::default()
    }
}

fn service_proto(package: &str, service: &ServiceDescriptor) -> ServiceDescriptorProto {
    ServiceDescriptorProto {
        name: Some(service.name.clone()),
        method: service
            .methods
            .iter()
            .map(|m| MethodDescriptorProto {
                name: Some(m.name.clone()),
                input_type: Some(qualify(package, None, &m.input_message)),
                output_type: Some(qualify(package, None, &m.output_message)),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub fn to_file_descriptor_proto(file: &FileDescriptor) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(file.name.clone()),
        package: Some(file.package.clone()),
        dependency: file.dependencies.clone(),
        message_type: file
            .messages
            .iter()
            .map(|m| message_proto(&file.package, m))
            .collect(),
        service: file
            .services
            .iter()
            .map(|s| service_proto(&file.package, s))
            .collect(),
        syntax: Some(file.syntax.to_string()),
        ..Default::default()
    }
}

pub fn to_file_descriptor_set(files: &[FileDescriptor]) -> FileDescriptorSet {
    FileDescriptorSet {
        file: files.iter().map(to_file_descriptor_proto).collect(),
    }
}

/// Binary `FileDescriptorSet`, as `protoc --descriptor_set_out` writes it.
pub fn encode_descriptor_set(files: &[FileDescriptor]) -> Vec<u8> {
    to_file_descriptor_set(files).encode_to_vec()
}
