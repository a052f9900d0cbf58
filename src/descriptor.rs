//! The descriptor model: an externally-owned, immutable schema tree.
//!
//! The core only ever reads this tree. Each named node carries its dotted
//! `full_name` and its file's `package`, so naming functions need no parent
//! pointers. A descriptor set can be deserialized from JSON via
//! [`parse_file_set`].

use crate::error::CodeGenError;
use heck::ToLowerCamelCase;
use serde::Deserialize;

/// One parsed schema file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileDescriptor {
    /// Source path of the file, e.g. `"foo/bar.proto"`.
    pub name: String,

    /// Dotted package the file declares; empty if none.
    #[serde(default)]
    pub package: String,

    /// Top-level message types, in declaration order.
    #[serde(default)]
    pub message_types: Vec<MessageDescriptor>,

    /// Top-level enum types, in declaration order.
    #[serde(default)]
    pub enum_types: Vec<EnumDescriptor>,
}

/// A message type, possibly nested inside another message.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageDescriptor {
    /// Simple declared name.
    pub name: String,

    /// Full dotted path including the package, e.g. `"ns.Outer.Inner"`.
    pub full_name: String,

    /// Package of the enclosing file; empty if none.
    #[serde(default)]
    pub package: String,

    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,

    #[serde(default)]
    pub nested_types: Vec<MessageDescriptor>,

    #[serde(default)]
    pub enum_types: Vec<EnumDescriptor>,
}

impl MessageDescriptor {
    /// Returns true if `field`'s lowerCamelCase spelling is unique among the
    /// sibling fields of this message.
    #[must_use]
    pub fn is_camelcase_unique(&self, field: &FieldDescriptor) -> bool {
        let camel: String = field.camelcase_name();
        self.fields
            .iter()
            .filter(|sibling| sibling.camelcase_name() == camel)
            .count()
            <= 1
    }
}

/// An enum type, possibly nested inside a message.
#[derive(Debug, Clone, Deserialize)]
pub struct EnumDescriptor {
    /// Simple declared name.
    pub name: String,

    /// Full dotted path including the package, e.g. `"ns.Outer.Color"`.
    pub full_name: String,

    /// Package of the enclosing file; empty if none.
    #[serde(default)]
    pub package: String,

    #[serde(default)]
    pub values: Vec<EnumValueDescriptor>,
}

/// A single named value of an enum type.
#[derive(Debug, Clone, Deserialize)]
pub struct EnumValueDescriptor {
    pub name: String,
    pub number: i32,
}

/// Just enough of a message type to derive its class name.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeRef {
    /// Full dotted path including the package.
    pub full_name: String,

    /// Package of the declaring file; empty if none.
    #[serde(default)]
    pub package: String,
}

/// A field declared inside a message (or as an extension).
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDescriptor {
    /// Declared name, e.g. `"foo_bar"`.
    pub name: String,

    /// Declared field number.
    pub number: i32,

    pub field_type: FieldType,

    #[serde(default)]
    pub is_extension: bool,

    /// Declared default value; `None` means the scalar kind's zero default.
    #[serde(default)]
    pub default: Option<DefaultValue>,

    /// For enum-typed fields, the enum type.
    #[serde(default)]
    pub enum_type: Option<EnumDescriptor>,

    /// For message/group-typed fields, the message type.
    #[serde(default)]
    pub message_type: Option<TypeRef>,
}

impl FieldDescriptor {
    /// The lowerCamelCase spelling of the declared name, used for the
    /// sibling-uniqueness query.
    #[must_use]
    pub fn camelcase_name(&self) -> String {
        self.name.to_lower_camel_case()
    }
}

/// The closed set of declared (wire-level) field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Float,
    Double,
    Bool,
    Enum,
    String,
    Bytes,
    Group,
    Message,
}

impl FieldType {
    /// Maps the declared type onto its value category.
    ///
    /// Exhaustive on purpose: adding a `FieldType` variant must fail to
    /// compile until this mapping is extended.
    #[must_use]
    pub fn scalar_kind(self) -> ScalarKind {
        match self {
            Self::Int32 | Self::Sint32 | Self::Sfixed32 => ScalarKind::Int32,
            Self::Int64 | Self::Sint64 | Self::Sfixed64 => ScalarKind::Int64,
            Self::Uint32 | Self::Fixed32 => ScalarKind::Uint32,
            Self::Uint64 | Self::Fixed64 => ScalarKind::Uint64,
            Self::Float => ScalarKind::Float,
            Self::Double => ScalarKind::Double,
            Self::Bool => ScalarKind::Bool,
            Self::Enum => ScalarKind::Enum,
            Self::String | Self::Bytes => ScalarKind::String,
            Self::Group | Self::Message => ScalarKind::Message,
        }
    }
}

/// The closed set of value categories a field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Double,
    Float,
    Bool,
    Enum,
    String,
    Message,
}

/// A declared default value, tagged by value category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    Double(f64),
    Float(f32),
    Bool(bool),
    /// The number of the default enum value.
    Enum(i32),
    String(String),
    Bytes(Vec<u8>),
}

/// Parses a descriptor set (a JSON array of files) into the in-memory tree.
///
/// # Errors
///
/// Returns `CodeGenError::JsonError` if the JSON is malformed or does not
/// match the descriptor model.
pub fn parse_file_set(json: &str) -> Result<Vec<FileDescriptor>, CodeGenError> {
    let files: Vec<FileDescriptor> = serde_json::from_str(json)?;
    Ok(files)
}
