//! JSON schema loader.
//!
//! The schema exporter writes entities with their annotations left as opaque
//! JSON payloads keyed by annotation name:
//!
//! ```json
//! {
//!   "entities": [{
//!     "name": "User",
//!     "id": { "type": "int" },
//!     "fields": [{
//!       "name": "status", "type": "enum", "values": ["pending", "active"],
//!       "annotations": { "ProtoField": 6, "ProtoEnum": { "pending": 1, "active": 2 } }
//!     }],
//!     "edges": [{ "name": "pet", "target": "Pet", "unique": true,
//!                 "annotations": { "ProtoField": 7 } }],
//!     "annotations": {
//!       "ProtoMessage": { "package": "zero" },
//!       "ProtoService": { "block_name": "Zero" }
//!     }
//!   }]
//! }
//! ```
//!
//! Payloads are decoded here, once, into the typed configuration structs.
//! Annotations under other keys belong to other generators and are ignored.

use crate::annotations::{MessageConfig, ServiceConfig};
use crate::entity::{
    Edge, Entity, EnumTable, Field, FieldAnnotation, FieldKind, IdField, SchemaGraph,
};
use crate::error::SchemaError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

pub const SERVICE_ANNOTATION: &str = "ProtoService";
pub const MESSAGE_ANNOTATION: &str = "ProtoMessage";
pub const FIELD_ANNOTATION: &str = "ProtoField";
pub const ENUM_ANNOTATION: &str = "ProtoEnum";

type Annotations = BTreeMap<String, Value>;

#[derive(Debug, Deserialize)]
struct RawSchema {
    #[serde(default)]
    entities: Vec<RawEntity>,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    name: String,
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    fields: Vec<RawField>,
    #[serde(default)]
    edges: Vec<RawEdge>,
    #[serde(default)]
    annotations: Annotations,
}

#[derive(Debug, Deserialize)]
struct RawId {
    #[serde(rename = "type")]
    kind: FieldKind,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    kind: FieldKind,
    #[serde(default)]
    values: Vec<String>,
    #[serde(default)]
    annotations: Annotations,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    name: String,
    #[serde(alias = "type")]
    target: String,
    #[serde(default)]
    unique: bool,
    #[serde(default)]
    annotations: Annotations,
}

/// `ProtoField` accepts a bare number as shorthand for `{ "number": n }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldAnnotation {
    Number(i32),
    Full(FieldAnnotation),
}

impl From<RawFieldAnnotation> for FieldAnnotation {
    fn from(raw: RawFieldAnnotation) -> Self {
        match raw {
            RawFieldAnnotation::Number(n) => FieldAnnotation::number(n),
            RawFieldAnnotation::Full(a) => a,
        }
    }
}

/// Parse a schema JSON document into a [`SchemaGraph`].
pub fn load_schema_json(text: &str) -> Result<SchemaGraph, SchemaError> {
    let raw: RawSchema = serde_json::from_str(text).map_err(SchemaError::Parse)?;

    let mut seen = HashSet::new();
    let mut entities = Vec::with_capacity(raw.entities.len());
    for entity in raw.entities {
        if !seen.insert(entity.name.clone()) {
            return Err(SchemaError::DuplicateEntity(entity.name));
        }
        entities.push(decode_entity(entity)?);
    }

    Ok(SchemaGraph { entities })
}

fn decode_entity(raw: RawEntity) -> Result<Entity, SchemaError> {
    let name = raw.name;

    let service = decode_opt::<ServiceConfig>(&name, None, SERVICE_ANNOTATION, &raw.annotations)?;
    let message = decode_opt::<MessageConfig>(&name, None, MESSAGE_ANNOTATION, &raw.annotations)?;

    let mut fields = Vec::with_capacity(raw.fields.len());
    for f in raw.fields {
        let annotation = decode_opt::<RawFieldAnnotation>(
            &name,
            Some(&f.name),
            FIELD_ANNOTATION,
            &f.annotations,
        )?
        .map(FieldAnnotation::from);
        let enum_table =
            decode_opt::<EnumTable>(&name, Some(&f.name), ENUM_ANNOTATION, &f.annotations)?;
        fields.push(Field {
            name: f.name,
            kind: f.kind,
            enum_values: f.values,
            annotation,
            enum_table,
        });
    }

    let mut edges = Vec::with_capacity(raw.edges.len());
    for e in raw.edges {
        let annotation = decode_opt::<RawFieldAnnotation>(
            &name,
            Some(&e.name),
            FIELD_ANNOTATION,
            &e.annotations,
        )?
        .map(FieldAnnotation::from);
        edges.push(Edge {
            name: e.name,
            target: e.target,
            unique: e.unique,
            annotation,
        });
    }

    Ok(Entity {
        id: raw.id.map(|id| IdField::new(id.kind)).unwrap_or_default(),
        name,
        fields,
        edges,
        service,
        message,
    })
}

fn decode_opt<T: DeserializeOwned>(
    entity: &str,
    field: Option<&str>,
    key: &str,
    annotations: &Annotations,
) -> Result<Option<T>, SchemaError> {
    let Some(value) = annotations.get(key) else {
        return Ok(None);
    };
    serde_json::from_value(value.clone())
        .map(Some)
        .map_err(|source| SchemaError::AnnotationDecode {
            entity: entity.to_string(),
            field: field.map(str::to_string),
            annotation: key.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{MethodKind, MethodSet};
    use crate::proto_type::ProtoType;

    const ZERO: &str = r#"{
      "entities": [
        {
          "name": "User",
          "fields": [
            { "name": "user_name", "type": "string", "unique": true,
              "annotations": { "ProtoField": 2 } },
            { "name": "joined", "type": "time", "immutable": true,
              "annotations": { "ProtoField": { "number": 3 } } },
            { "name": "status", "type": "enum", "values": ["pending", "active"],
              "annotations": { "ProtoField": 6, "ProtoEnum": { "pending": 1, "active": 2 } } }
          ],
          "edges": [
            { "name": "pet", "target": "Pet", "unique": true, "annotations": { "ProtoField": 7 } }
          ],
          "annotations": {
            "ProtoMessage": { "package": "zero" },
            "ProtoService": { "block_name": "Zero", "methods": ["get", "list"] },
            "SqlTable": { "name": "users" }
          }
        },
        {
          "name": "Pet",
          "id": { "type": "uuid" },
          "annotations": { "ProtoMessage": { "package": "zero" } }
        }
      ]
    }"#;

    #[test]
    fn loads_entities_and_typed_annotations() {
        let graph = load_schema_json(ZERO).expect("load");
        assert_eq!(graph.entities.len(), 2);

        let user = graph.entity("User").expect("user");
        assert_eq!(user.id.kind, FieldKind::Int);
        assert_eq!(user.field("user_name").and_then(Field::number), Some(2));
        assert_eq!(user.field("joined").and_then(Field::number), Some(3));
        assert_eq!(user.edge("pet").and_then(Edge::number), Some(7));

        let table = user.field("status").and_then(|f| f.enum_table.clone()).expect("table");
        assert_eq!(
            table.iter().map(|(k, v)| (k.as_str(), *v)).collect::<Vec<_>>(),
            vec![("pending", 1), ("active", 2)]
        );

        let service = user.service.as_ref().expect("service");
        assert_eq!(service.block_name.as_deref(), Some("Zero"));
        assert_eq!(service.methods, MethodKind::Get | MethodKind::List);
        assert_eq!(
            user.message.as_ref().and_then(|m| m.package.as_deref()),
            Some("zero")
        );

        let pet = graph.entity("Pet").expect("pet");
        assert_eq!(pet.id.kind, FieldKind::Uuid);
        assert!(pet.service.is_none());
    }

    #[test]
    fn decodes_extra_methods_and_named_messages() {
        let text = r#"{"entities": [{
            "name": "User",
            "annotations": {
              "ProtoService": {
                "methods": "all",
                "extra_methods": [{
                  "name": "Promote",
                  "input": [{ "number": 1, "name": "id", "type": "TYPE_INT32" }],
                  "output": [{ "number": 1, "name": "user", "type_name": "User" }]
                }]
              },
              "ProtoMessage": {
                "field_groups": [{ "name": "summary", "fields": ["user_name"] }],
                "named_messages": [{
                  "name": "UserSummary", "group": "summary", "skip_id": true,
                  "extra_fields": [{ "number": 10, "name": "rank", "type": "int64" }]
                }]
              }
            }
        }]}"#;
        let graph = load_schema_json(text).expect("load");
        let user = &graph.entities[0];
        let service = user.service.as_ref().expect("service");
        assert_eq!(service.methods, MethodSet::ALL);
        assert_eq!(service.extra_methods[0].input[0].proto_type, Some(ProtoType::Int32));
        assert_eq!(service.extra_methods[0].output[0].type_name.as_deref(), Some("User"));

        let message = user.message.as_ref().expect("message");
        assert!(message.field_groups.get("summary").is_some());
        let named = &message.named_messages[0];
        assert!(named.skip_id);
        assert_eq!(named.extra_fields[0].proto_type, Some(ProtoType::Int64));
    }

    #[test]
    fn malformed_annotation_reports_entity_and_key() {
        let text = r#"{"entities": [{
            "name": "User",
            "annotations": { "ProtoService": { "methods": 42 } }
        }]}"#;
        let err = load_schema_json(text).unwrap_err();
        match &err {
            SchemaError::AnnotationDecode {
                entity, annotation, field, ..
            } => {
                assert_eq!(entity, "User");
                assert_eq!(annotation, SERVICE_ANNOTATION);
                assert!(field.is_none());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("ProtoService"));
    }

    #[test]
    fn malformed_field_annotation_names_the_field() {
        let text = r#"{"entities": [{
            "name": "User",
            "fields": [{ "name": "age", "type": "int", "annotations": { "ProtoField": "two" } }]
        }]}"#;
        let err = load_schema_json(text).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::AnnotationDecode { ref field, .. } if field.as_deref() == Some("age")
        ));
    }

    #[test]
    fn duplicate_entities_are_rejected() {
        let text = r#"{"entities": [{"name": "User"}, {"name": "User"}]}"#;
        assert!(matches!(
            load_schema_json(text),
            Err(SchemaError::DuplicateEntity(name)) if name == "User"
        ));
    }
}
