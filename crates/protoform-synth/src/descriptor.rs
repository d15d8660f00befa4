//! Descriptor tree.
//!
//! A structural mirror of `google/protobuf/descriptor.proto`, restricted to
//! what synthesis produces. Serializes to the same JSON shape Buf uses for
//! descriptor sets (`messageType`, `typeName`, `TYPE_INT32`, ...).
//!
//! Descriptors are value objects: built once per generation pass and never
//! mutated afterwards.

use protoform_schema::ProtoType;
use serde::{Serialize, Serializer};

// =============================================================================
// Fields
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub number: i32,
    #[serde(rename = "label", serialize_with = "serialize_label")]
    pub repeated: bool,
    #[serde(rename = "type")]
    pub proto_type: ProtoType,
    /// Present exactly when `proto_type` is ENUM or MESSAGE.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

fn serialize_label<S: Serializer>(repeated: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *repeated {
        "LABEL_REPEATED"
    } else {
        "LABEL_OPTIONAL"
    })
}

impl FieldDescriptor {
    /// A scalar field. Scalars never carry a type name.
    pub fn scalar(name: impl Into<String>, number: i32, proto_type: ProtoType) -> Self {
        debug_assert!(!proto_type.requires_type_name());
        Self {
            name: name.into(),
            number,
            repeated: false,
            proto_type,
            type_name: None,
        }
    }

    pub fn message(name: impl Into<String>, number: i32, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number,
            repeated: false,
            proto_type: ProtoType::Message,
            type_name: Some(type_name.into()),
        }
    }

    pub fn enumeration(name: impl Into<String>, number: i32, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number,
            repeated: false,
            proto_type: ProtoType::Enum,
            type_name: Some(type_name.into()),
        }
    }

    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }
}

// =============================================================================
// Enums
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValueDescriptor {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDescriptor {
    pub name: String,
    #[serde(rename = "value")]
    pub values: Vec<EnumValueDescriptor>,
}

impl EnumDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push(EnumValueDescriptor {
            name: name.into(),
            number,
        });
        self
    }

    pub fn value(&self, name: &str) -> Option<i32> {
        self.values.iter().find(|v| v.name == name).map(|v| v.number)
    }
}

// =============================================================================
// Messages
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageDescriptor {
    pub name: String,
    #[serde(rename = "field")]
    pub fields: Vec<FieldDescriptor>,
    #[serde(rename = "enumType", skip_serializing_if = "Vec::is_empty")]
    pub nested_enums: Vec<EnumDescriptor>,
}

impl MessageDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            nested_enums: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_enum(mut self, nested: EnumDescriptor) -> Self {
        self.nested_enums.push(nested);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn nested_enum(&self, name: &str) -> Option<&EnumDescriptor> {
        self.nested_enums.iter().find(|e| e.name == name)
    }
}

// =============================================================================
// Services
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(rename = "inputType")]
    pub input_message: String,
    #[serde(rename = "outputType")]
    pub output_message: String,
}

impl MethodDescriptor {
    pub fn new(
        name: impl Into<String>,
        input_message: impl Into<String>,
        output_message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            input_message: input_message.into(),
            output_message: output_message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub name: String,
    #[serde(rename = "method")]
    pub methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

// =============================================================================
// Files
// =============================================================================

/// One `.proto` file: every message and service of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    pub name: String,
    pub package: String,
    #[serde(rename = "dependency", skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(rename = "messageType")]
    pub messages: Vec<MessageDescriptor>,
    #[serde(rename = "service", skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceDescriptor>,
    pub syntax: &'static str,
}

impl FileDescriptor {
    pub fn message(&self, name: &str) -> Option<&MessageDescriptor> {
        self.messages.iter().find(|m| m.name == name)
    }

    pub fn service(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_like_buf_descriptor_json() {
        let msg = MessageDescriptor::new("ListUserResponse")
            .with_field(FieldDescriptor::message("user_list", 1, "User").repeated())
            .with_field(FieldDescriptor::scalar("next_page_token", 2, ProtoType::String));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["name"], "ListUserResponse");
        assert_eq!(json["field"][0]["label"], "LABEL_REPEATED");
        assert_eq!(json["field"][0]["type"], "TYPE_MESSAGE");
        assert_eq!(json["field"][0]["typeName"], "User");
        assert_eq!(json["field"][1]["label"], "LABEL_OPTIONAL");
        assert!(json["field"][1].get("typeName").is_none());
        assert!(json.get("enumType").is_none());

        let method = MethodDescriptor::new("GetUser", "GetUserRequest", "User");
        let json = serde_json::to_value(&method).unwrap();
        assert_eq!(json["inputType"], "GetUserRequest");
        assert_eq!(json["outputType"], "User");
    }
}
