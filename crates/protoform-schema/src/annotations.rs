//! Typed protobuf annotations: `Service`, `Message`, named messages, extra
//! methods and field groups.

use crate::error::DuplicateGroupError;
use crate::proto_type::ProtoType;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

// ============================================================================
// Methods
// ============================================================================

/// The built-in service operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Create,
    Get,
    Update,
    Delete,
    List,
    BatchCreate,
}

impl MethodKind {
    /// Every kind, in service declaration order.
    pub const ALL: [MethodKind; 6] = [
        Self::Create,
        Self::Get,
        Self::Update,
        Self::Delete,
        Self::List,
        Self::BatchCreate,
    ];

    /// Prefix used for method and request names (`Create`, `BatchCreate`, ...).
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Get => "Get",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::List => "List",
            Self::BatchCreate => "BatchCreate",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Create => 1 << 0,
            Self::Get => 1 << 1,
            Self::Update => 1 << 2,
            Self::Delete => 1 << 3,
            Self::List => 1 << 4,
            Self::BatchCreate => 1 << 5,
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A set of enabled [`MethodKind`]s.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MethodSet(u8);

impl MethodSet {
    pub const EMPTY: MethodSet = MethodSet(0);
    pub const ALL: MethodSet = MethodSet(0b11_1111);

    pub const fn only(kind: MethodKind) -> Self {
        Self(kind.bit())
    }

    pub const fn contains(self, kind: MethodKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn union(self, other: MethodSet) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn with(self, kind: MethodKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Enabled kinds in declaration order (Create, Get, Update, Delete,
    /// List, BatchCreate).
    pub fn iter(self) -> impl Iterator<Item = MethodKind> {
        MethodKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl From<MethodKind> for MethodSet {
    fn from(kind: MethodKind) -> Self {
        Self::only(kind)
    }
}

impl FromIterator<MethodKind> for MethodSet {
    fn from_iter<T: IntoIterator<Item = MethodKind>>(iter: T) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl BitOr for MethodSet {
    type Output = MethodSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOr<MethodKind> for MethodSet {
    type Output = MethodSet;

    fn bitor(self, rhs: MethodKind) -> Self::Output {
        self.with(rhs)
    }
}

impl BitOr for MethodKind {
    type Output = MethodSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        MethodSet::only(self).with(rhs)
    }
}

impl BitOrAssign<MethodKind> for MethodSet {
    fn bitor_assign(&mut self, rhs: MethodKind) {
        *self = self.with(rhs);
    }
}

impl fmt::Debug for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for MethodSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for MethodSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Keyword(String),
            Kinds(Vec<MethodKind>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Keyword(k) if k.eq_ignore_ascii_case("all") => Ok(Self::ALL),
            Repr::Keyword(k) => Err(serde::de::Error::custom(format!(
                "unknown method set `{k}` (expected \"all\" or a list of methods)"
            ))),
            Repr::Kinds(kinds) => Ok(kinds.into_iter().collect()),
        }
    }
}

// ============================================================================
// Field definitions for synthetic fields
// ============================================================================

/// A synthetic protobuf field declared directly in configuration.
///
/// When `type_name` is set the field is a MESSAGE reference regardless of
/// `proto_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PbField {
    pub number: i32,
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub proto_type: Option<ProtoType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub repeated: bool,
}

/// Extra fields appended to named messages share the extra-method shape.
pub type ExtraField = PbField;

impl PbField {
    pub fn scalar(number: i32, name: impl Into<String>, proto_type: ProtoType) -> Self {
        Self {
            number,
            name: name.into(),
            proto_type: Some(proto_type),
            type_name: None,
            repeated: false,
        }
    }

    pub fn message(number: i32, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            proto_type: None,
            type_name: Some(type_name.into()),
            repeated: false,
        }
    }

    pub fn with_type(mut self, proto_type: ProtoType) -> Self {
        self.proto_type = Some(proto_type);
        self
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }
}

/// A user-declared RPC beyond the standard six.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraMethodSpec {
    pub name: String,
    #[serde(default, alias = "input_fields")]
    pub input: Vec<PbField>,
    #[serde(default, alias = "output_fields")]
    pub output: Vec<PbField>,
}

impl ExtraMethodSpec {
    pub fn new(name: impl Into<String>, input: Vec<PbField>, output: Vec<PbField>) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }
}

// ============================================================================
// Service annotation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Unset or empty means every standard method.
    #[serde(default = "all_methods")]
    pub methods: MethodSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_name: Option<String>,
    #[serde(default)]
    pub extra_methods: Vec<ExtraMethodSpec>,
}

fn all_methods() -> MethodSet {
    MethodSet::ALL
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            methods: MethodSet::ALL,
            block_name: None,
            extra_methods: Vec::new(),
        }
    }
}

impl ServiceConfig {
    pub fn with_methods(mut self, methods: impl Into<MethodSet>) -> Self {
        self.methods = methods.into();
        self
    }

    pub fn with_block_name(mut self, name: impl Into<String>) -> Self {
        self.block_name = Some(name.into());
        self
    }

    pub fn with_extra_method(mut self, method: ExtraMethodSpec) -> Self {
        self.extra_methods.push(method);
        self
    }

    pub fn enabled_methods(&self) -> MethodSet {
        if self.methods.is_empty() {
            MethodSet::ALL
        } else {
            self.methods
        }
    }
}

// ============================================================================
// Message annotation
// ============================================================================

/// A named, ordered subset of an entity's fields and edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGroup {
    pub name: String,
    pub fields: Vec<String>,
}

impl FieldGroup {
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Field groups keyed by name, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldGroup>", into = "Vec<FieldGroup>")]
pub struct FieldGroups(IndexMap<String, FieldGroup>);

impl FieldGroups {
    pub fn get(&self, name: &str) -> Option<&FieldGroup> {
        self.0.get(name)
    }
}

impl TryFrom<Vec<FieldGroup>> for FieldGroups {
    type Error = DuplicateGroupError;

    fn try_from(groups: Vec<FieldGroup>) -> Result<Self, Self::Error> {
        let mut out = IndexMap::with_capacity(groups.len());
        for group in groups {
            if out.contains_key(&group.name) {
                return Err(DuplicateGroupError(group.name));
            }
            out.insert(group.name.clone(), group);
        }
        Ok(Self(out))
    }
}

impl From<FieldGroups> for Vec<FieldGroup> {
    fn from(groups: FieldGroups) -> Self {
        groups.0.into_values().collect()
    }
}

/// A derived message built from a field group plus extra fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedMessageSpec {
    pub name: String,
    #[serde(default, alias = "source_group", skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub extra_fields: Vec<ExtraField>,
    #[serde(default)]
    pub skip_id: bool,
    #[serde(default)]
    pub skip_edges: bool,
}

impl NamedMessageSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: None,
            extra_fields: Vec::new(),
            skip_id: false,
            skip_edges: false,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_extra_field(mut self, field: ExtraField) -> Self {
        self.extra_fields.push(field);
        self
    }

    pub fn with_skip_id(mut self, skip: bool) -> Self {
        self.skip_id = skip;
        self
    }

    pub fn with_skip_edges(mut self, skip: bool) -> Self {
        self.skip_edges = skip;
        self
    }
}

/// Per-entity message generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageConfig {
    #[serde(default, alias = "package_name", skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default)]
    pub field_groups: FieldGroups,
    #[serde(default)]
    pub named_messages: Vec<NamedMessageSpec>,
}

impl MessageConfig {
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_field_groups(mut self, groups: FieldGroups) -> Self {
        self.field_groups = groups;
        self
    }

    pub fn with_named_message(mut self, spec: NamedMessageSpec) -> Self {
        self.named_messages.push(spec);
        self
    }
}
