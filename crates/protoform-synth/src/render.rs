//! proto3 source rendering.

use crate::descriptor::{
    EnumDescriptor, FieldDescriptor, FileDescriptor, MessageDescriptor, MethodDescriptor,
    ServiceDescriptor,
};
use crate::service::ServiceLimits;

const INDENT: &str = "  ";

/// Render `file` as `.proto` source.
///
/// List and BatchCreate methods carry the configured caps as comments; the
/// caps are enforced by the serving layer, not by the schema.
pub fn render_file(file: &FileDescriptor, limits: &ServiceLimits) -> String {
    let mut out = String::new();
    out.push_str("// Code generated by protoform. DO NOT EDIT.\n");
    out.push_str(&format!("// source: {}\n\n", file.name));
    out.push_str(&format!("syntax = \"{}\";\n\n", file.syntax));
    out.push_str(&format!("package {};\n", file.package));

    if !file.dependencies.is_empty() {
        out.push('\n');
        for dep in &file.dependencies {
            out.push_str(&format!("import \"{dep}\";\n"));
        }
    }

    for message in &file.messages {
        out.push('\n');
        render_message(&mut out, message);
    }
    for service in &file.services {
        out.push('\n');
        render_service(&mut out, file, service, limits);
    }
    out
}

fn render_message(out: &mut String, message: &MessageDescriptor) {
    out.push_str(&format!("message {} {{\n", message.name));
    for nested in &message.nested_enums {
        render_enum(out, nested, INDENT);
        out.push('\n');
    }
    for field in &message.fields {
        out.push_str(INDENT);
        out.push_str(&field_line(field));
        out.push('\n');
    }
    out.push_str("}\n");
}

fn render_enum(out: &mut String, descriptor: &EnumDescriptor, indent: &str) {
    out.push_str(&format!("{indent}enum {} {{\n", descriptor.name));
    for value in &descriptor.values {
        out.push_str(&format!("{indent}{INDENT}{} = {};\n", value.name, value.number));
    }
    out.push_str(&format!("{indent}}}\n"));
}

fn field_line(field: &FieldDescriptor) -> String {
    let ty = match (field.proto_type.keyword(), &field.type_name) {
        (Some(kw), _) => kw.to_string(),
        (None, Some(name)) => name.clone(),
        // Unreachable for descriptors built by this crate.
        (None, None) => field.proto_type.to_string(),
    };
    let label = if field.repeated { "repeated " } else { "" };
    format!("{label}{ty} {} = {};", field.name, field.number)
}

fn render_service(
    out: &mut String,
    file: &FileDescriptor,
    service: &ServiceDescriptor,
    limits: &ServiceLimits,
) {
    out.push_str(&format!("service {} {{\n", service.name));
    for method in &service.methods {
        if let Some(note) = limit_note(file, method, limits) {
            out.push_str(&format!("{INDENT}// {note}\n"));
        }
        out.push_str(&format!(
            "{INDENT}rpc {}({}) returns ({});\n",
            method.name, method.input_message, method.output_message
        ));
    }
    out.push_str("}\n");
}

fn limit_note(
    file: &FileDescriptor,
    method: &MethodDescriptor,
    limits: &ServiceLimits,
) -> Option<String> {
    let input = file.message(&method.input_message)?;
    if method.name.starts_with("BatchCreate") && input.field("requests").is_some() {
        return Some(format!(
            "Accepts at most {} requests per call.",
            limits.max_batch_create_size
        ));
    }
    if method.name.starts_with("List") && input.field("page_size").is_some() {
        return Some(format!(
            "page_size is capped at {}.",
            limits.max_page_size
        ));
    }
    None
}
