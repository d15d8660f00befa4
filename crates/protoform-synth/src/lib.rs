//! Protobuf descriptor synthesis.
//!
//! Turns a resolved entity schema (`protoform-schema`) into protobuf
//! descriptors: one message per entity, request/response messages and a
//! service per entity with a `Service` annotation, plus user-declared extra
//! methods and named messages.
//!
//! ```text
//!   Entity + annotations
//!          │
//!          ▼
//!   ┌──────────────────┐   ┌─────────────────────┐
//!   │ ServiceAssembler │──►│ standard methods    │──┐
//!   │   (service.rs)   │──►│ extra methods       │──┤
//!   │                  │──►│ named messages      │──┤
//!   └──────────────────┘   └─────────────────────┘  │
//!                                                    ▼
//!                                         dedupe (first name wins)
//!                                                    │
//!                                                    ▼
//!                        ServiceDescriptor + MessageDescriptor set
//! ```
//!
//! Generation is pure and deterministic: no I/O, no shared state. Rendering
//! (`render`) and descriptor-set export (`export`) sit on top of the same
//! descriptor tree.

pub mod config;
pub mod dedupe;
pub mod descriptor;
pub mod error;
pub mod export;
pub mod extra;
pub mod groups;
pub mod message;
pub mod methods;
pub mod named;
pub mod naming;
pub mod package;
pub mod render;
pub mod service;
pub mod types;

pub use config::SynthConfig;
pub use dedupe::dedupe;
pub use descriptor::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FileDescriptor, MessageDescriptor,
    MethodDescriptor, ServiceDescriptor,
};
pub use error::SynthError;
pub use package::{generate, EntityFailure, GenerationReport};
pub use service::{assemble_service, ServiceLimits, ServiceResources};

pub use protoform_schema::ProtoType;
