//! Package assembly: one `.proto` file per package across a whole schema.

use crate::config::SynthConfig;
use crate::dedupe::dedupe;
use crate::descriptor::{FileDescriptor, MessageDescriptor, ServiceDescriptor};
use crate::error::SynthError;
use crate::message::synthesize_entity_message;
use crate::named::named_messages;
use crate::service::{assemble_service, ServiceLimits, ServiceResources};
use protoform_schema::{Entity, SchemaGraph};
use std::collections::BTreeSet;

/// An entity left out of generation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityFailure {
    pub entity: String,
    pub error: SynthError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Files in order of each package's first entity.
    pub files: Vec<FileDescriptor>,
    pub failures: Vec<EntityFailure>,
    pub limits: ServiceLimits,
}

impl GenerationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn file(&self, package: &str) -> Option<&FileDescriptor> {
        self.files.iter().find(|f| f.package == package)
    }
}

/// Package an entity is generated into, or `None` when it carries neither a
/// `Service` nor a `Message` annotation.
pub fn package_of(entity: &Entity, config: &SynthConfig) -> Option<String> {
    match (&entity.message, &entity.service) {
        (Some(message), _) => Some(
            message
                .package
                .clone()
                .unwrap_or_else(|| config.default_package.clone()),
        ),
        (None, Some(_)) => Some(config.default_package.clone()),
        (None, None) => None,
    }
}

/// `acme.users.v1` → `acme/users/v1/v1.proto`.
pub fn file_name(package: &str) -> String {
    let last = package.rsplit('.').next().unwrap_or(package);
    format!("{}/{last}.proto", package.replace('.', "/"))
}

/// Import path for a well-known type reference.
pub fn well_known_import(type_name: &str) -> Option<&'static str> {
    let short = type_name.strip_prefix("google.protobuf.")?;
    let file = match short {
        "Empty" => "google/protobuf/empty.proto",
        "Timestamp" => "google/protobuf/timestamp.proto",
        "Duration" => "google/protobuf/duration.proto",
        "Any" => "google/protobuf/any.proto",
        "FieldMask" => "google/protobuf/field_mask.proto",
        "Struct" | "Value" | "ListValue" => "google/protobuf/struct.proto",
        "BoolValue" | "StringValue" | "BytesValue" | "Int32Value" | "Int64Value"
        | "UInt32Value" | "UInt64Value" | "FloatValue" | "DoubleValue" => {
            "google/protobuf/wrappers.proto"
        }
        _ => return None,
    };
    Some(file)
}

struct Unit<'a> {
    entity: &'a Entity,
    package: String,
    message: MessageDescriptor,
    service: Option<ServiceResources>,
    /// Named messages of an entity without a service; a service carries its own.
    named: Vec<MessageDescriptor>,
}

fn synthesize_unit<'a>(
    entity: &'a Entity,
    package: String,
    config: &SynthConfig,
) -> Result<Unit<'a>, SynthError> {
    let message = synthesize_entity_message(entity)?;
    let (service, named) = if entity.service.is_some() {
        (Some(assemble_service(entity, config)?), Vec::new())
    } else {
        (None, named_messages(entity)?)
    };
    Ok(Unit {
        entity,
        package,
        message,
        service,
        named,
    })
}

/// Edge targets must be generated, and generated into the same package.
fn check_edges(unit: &Unit<'_>, units: &[Unit<'_>]) -> Result<(), SynthError> {
    for edge in &unit.entity.edges {
        let target = units
            .iter()
            .find(|u| u.entity.name == edge.target)
            .ok_or_else(|| SynthError::UnknownEdgeTarget {
                entity: unit.entity.name.clone(),
                edge: edge.name.clone(),
                target: edge.target.clone(),
            })?;
        if target.package != unit.package {
            return Err(SynthError::CrossPackageEdge {
                entity: unit.entity.name.clone(),
                edge: edge.name.clone(),
                target: edge.target.clone(),
                target_package: target.package.clone(),
            });
        }
    }
    Ok(())
}

fn record(failures: &mut Vec<EntityFailure>, error: SynthError) {
    tracing::warn!(entity = %error.entity(), error = %error, "skipping entity");
    failures.push(EntityFailure {
        entity: error.entity().to_string(),
        error,
    });
}

/// Generate every package in `graph`.
///
/// Failing entities are excluded and reported; the rest are unaffected,
/// except entities whose edges point at an excluded one.
pub fn generate(graph: &SchemaGraph, config: &SynthConfig) -> GenerationReport {
    let mut failures = Vec::new();
    let mut units = Vec::new();

    for entity in &graph.entities {
        let Some(package) = package_of(entity, config) else {
            tracing::debug!(entity = %entity.name, "no protobuf annotations, skipping");
            continue;
        };
        match synthesize_unit(entity, package, config) {
            Ok(unit) => units.push(unit),
            Err(err) => record(&mut failures, err),
        }
    }

    // Dropping one entity can strand edges that pointed at it.
    loop {
        let stranded = units
            .iter()
            .enumerate()
            .find_map(|(i, u)| check_edges(u, &units).err().map(|e| (i, e)));
        let Some((idx, err)) = stranded else { break };
        units.remove(idx);
        record(&mut failures, err);
    }

    let mut packages: Vec<&str> = Vec::new();
    for unit in &units {
        if !packages.contains(&unit.package.as_str()) {
            packages.push(&unit.package);
        }
    }

    let files = packages
        .into_iter()
        .map(|package| assemble_file(package, units.iter().filter(|u| u.package == package)))
        .collect();

    GenerationReport {
        files,
        failures,
        limits: ServiceLimits::from(config),
    }
}

fn assemble_file<'u, 'a: 'u>(
    package: &str,
    units: impl Iterator<Item = &'u Unit<'a>> + Clone,
) -> FileDescriptor {
    let entity_messages = units.clone().map(|u| u.message.clone());
    let unit_messages = units.clone().flat_map(|u| {
        let service = u.service.iter().flat_map(|s| s.messages.iter());
        service.chain(u.named.iter()).cloned()
    });
    let messages = dedupe(entity_messages.chain(unit_messages));

    let services: Vec<ServiceDescriptor> = units
        .filter_map(|u| u.service.as_ref())
        .map(|s| s.service.clone())
        .collect();

    let dependencies = imports(&messages, &services);
    tracing::debug!(
        package,
        messages = messages.len(),
        services = services.len(),
        "assembled package"
    );

    FileDescriptor {
        name: file_name(package),
        package: package.to_string(),
        dependencies,
        messages,
        services,
        syntax: "proto3",
    }
}

fn imports(messages: &[MessageDescriptor], services: &[ServiceDescriptor]) -> Vec<String> {
    let field_types = messages
        .iter()
        .flat_map(|m| m.fields.iter())
        .filter_map(|f| f.type_name.as_deref());
    let method_types = services
        .iter()
        .flat_map(|s| s.methods.iter())
        .flat_map(|m| [m.input_message.as_str(), m.output_message.as_str()]);

    field_types
        .chain(method_types)
        .filter_map(well_known_import)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
