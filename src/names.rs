//! Identifier derivation: collision-free, C++-legal names for schema elements.
//!
//! All functions here are pure; the only shared state is an immutable
//! [`Keywords`] set constructed once by the caller and passed by reference.

use crate::descriptor::{FieldDescriptor, FieldType, MessageDescriptor, ScalarKind};
use heck::ToUpperCamelCase;
use std::collections::BTreeSet;

/// Comment banner used between major sections of a generated file.
pub const THICK_SEPARATOR: &str =
    "// ===================================================================\n";
/// Comment banner used between minor sections of a generated file.
pub const THIN_SEPARATOR: &str =
    "// -------------------------------------------------------------------\n";

const CPP_KEYWORDS: &[&str] = &[
    "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break", "case", "catch", "char",
    "class", "compl", "const", "const_cast", "continue", "default", "delete", "do", "double",
    "dynamic_cast", "else", "enum", "explicit", "extern", "false", "float", "for", "friend",
    "goto", "if", "inline", "int", "long", "mutable", "namespace", "new", "not", "not_eq",
    "operator", "or", "or_eq", "private", "protected", "public", "register", "reinterpret_cast",
    "return", "short", "signed", "sizeof", "static", "static_cast", "struct", "switch",
    "template", "this", "throw", "true", "try", "typedef", "typeid", "typename", "union",
    "unsigned", "using", "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// The reserved-word set of the target language.
///
/// Construct once and pass by reference into every naming call.
#[derive(Debug)]
pub struct Keywords(BTreeSet<&'static str>);

impl Keywords {
    /// The C++ keyword set.
    #[must_use]
    pub fn cpp() -> Self {
        Self(CPP_KEYWORDS.iter().copied().collect())
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }
}

impl Default for Keywords {
    fn default() -> Self {
        Self::cpp()
    }
}

fn dots_to_colons(name: &str) -> String {
    name.replace('.', "::")
}

fn dots_to_underscores(name: &str) -> String {
    name.replace('.', "_")
}

/// Strips the package prefix (and its trailing dot) from a full dotted path.
fn strip_package<'a>(full_name: &'a str, package: &str) -> &'a str {
    if package.is_empty() {
        return full_name;
    }
    full_name
        .strip_prefix(package)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(full_name)
}

/// Derives the C++ class name of a message from its full dotted path.
///
/// The path suffix below the outermost message is flattened with underscores,
/// so the result never contains a dot and nested types stay flat. When
/// `qualified`, the outermost message's path is rewritten with `::` and a
/// leading `::` is prepended.
#[must_use]
pub fn message_class_name(full_name: &str, package: &str, qualified: bool) -> String {
    // "outer" is the top-level message in which the node is embedded.
    let relative: &str = strip_package(full_name, package);
    let outer_simple: &str = relative.split('.').next().unwrap_or(relative);
    let outer_len: usize = full_name.len() - relative.len() + outer_simple.len();
    let outer_full: &str = &full_name[..outer_len];
    let inner: &str = &full_name[outer_len..];

    if qualified {
        format!("::{}{}", dots_to_colons(outer_full), dots_to_underscores(inner))
    } else {
        format!("{outer_simple}{}", dots_to_underscores(inner))
    }
}

/// Derives the C++ class name of a message descriptor.
#[must_use]
pub fn class_name(message: &MessageDescriptor, qualified: bool) -> String {
    message_class_name(&message.full_name, &message.package, qualified)
}

/// Derives the C++ class name of an enum from its full dotted path.
///
/// A top-level enum maps directly to its (scoped or simple) name; a nested
/// enum is its containing message's class name + `_` + its simple name.
#[must_use]
pub fn enum_class_name(full_name: &str, package: &str, qualified: bool) -> String {
    let relative: &str = strip_package(full_name, package);
    match relative.rsplit_once('.') {
        None => {
            if qualified {
                dots_to_colons(full_name)
            } else {
                relative.to_string()
            }
        }
        Some((_, simple)) => {
            let containing_len: usize = full_name.len() - simple.len() - 1;
            let containing: &str = &full_name[..containing_len];
            let mut result: String = message_class_name(containing, package, qualified);
            result.push('_');
            result.push_str(simple);
            result
        }
    }
}

/// Derives the accessor/member name of a field: lowercased, with a trailing
/// underscore if the result is a reserved keyword.
#[must_use]
pub fn field_name(field: &FieldDescriptor, keywords: &Keywords) -> String {
    let mut result: String = field.name.to_ascii_lowercase();
    if keywords.contains(&result) {
        result.push('_');
    }
    result
}

/// Derives the `k<Name>FieldNumber` constant name of a field.
///
/// If the field is not an extension and its camelCase spelling collides with
/// a sibling's, the field number is appended. This makes the constant rather
/// useless, but it is guaranteed unique and compilable.
#[must_use]
pub fn field_constant_name(field: &FieldDescriptor, containing: &MessageDescriptor) -> String {
    let mut result: String = format!("k{}FieldNumber", field.name.to_upper_camel_case());
    if !field.is_extension && !containing.is_camelcase_unique(field) {
        result.push('_');
        result.push_str(&field.number.to_string());
    }
    result
}

/// The C++ primitive type for a scalar kind.
///
/// `Message` yields `None`: substitute the message's derived class name.
/// Exhaustive on purpose, so a new kind cannot compile without a rule here.
#[must_use]
pub fn primitive_type_name(kind: ScalarKind) -> Option<&'static str> {
    match kind {
        ScalarKind::Int32 => Some("::schemagen::int32"),
        ScalarKind::Int64 => Some("::schemagen::int64"),
        ScalarKind::Uint32 => Some("::schemagen::uint32"),
        ScalarKind::Uint64 => Some("::schemagen::uint64"),
        ScalarKind::Double => Some("double"),
        ScalarKind::Float => Some("float"),
        ScalarKind::Bool => Some("bool"),
        ScalarKind::Enum => Some("int"),
        ScalarKind::String => Some("::std::string"),
        ScalarKind::Message => None,
    }
}

/// The accessor-name fragment for a declared field type, e.g. `"SInt32"`.
#[must_use]
pub fn declared_type_method_name(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Int32 => "Int32",
        FieldType::Int64 => "Int64",
        FieldType::Uint32 => "UInt32",
        FieldType::Uint64 => "UInt64",
        FieldType::Sint32 => "SInt32",
        FieldType::Sint64 => "SInt64",
        FieldType::Fixed32 => "Fixed32",
        FieldType::Fixed64 => "Fixed64",
        FieldType::Sfixed32 => "SFixed32",
        FieldType::Sfixed64 => "SFixed64",
        FieldType::Float => "Float",
        FieldType::Double => "Double",
        FieldType::Bool => "Bool",
        FieldType::Enum => "Enum",
        FieldType::String => "String",
        FieldType::Bytes => "Bytes",
        FieldType::Group => "Group",
        FieldType::Message => "Message",
    }
}

/// Strips the schema-source suffix (`.proto` or `.protodevel`) from a file name.
#[must_use]
pub fn strip_proto(filename: &str) -> &str {
    filename
        .strip_suffix(".protodevel")
        .or_else(|| filename.strip_suffix(".proto"))
        .unwrap_or(filename)
}

/// Converts a file name into a valid identifier: alphanumeric bytes are
/// copied verbatim; every other byte becomes `_` plus its two-digit hex code.
///
/// Deterministic and always legal; collisions are astronomically unlikely
/// rather than structurally prevented.
#[must_use]
pub fn filename_identifier(filename: &str) -> String {
    let mut result: String = String::with_capacity(filename.len());
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() {
            result.push(char::from(byte));
        } else {
            result.push('_');
            result.push_str(&format!("{byte:02x}"));
        }
    }
    result
}

/// Name of the per-file global function that registers descriptors.
#[must_use]
pub fn global_add_descriptors_name(filename: &str) -> String {
    format!("schemagen_AddDescriptors_{}", filename_identifier(filename))
}

/// Name of the per-file global function that assigns descriptors.
#[must_use]
pub fn global_assign_descriptors_name(filename: &str) -> String {
    format!("schemagen_AssignDescriptors_{}", filename_identifier(filename))
}

/// Name of the per-file global shutdown hook.
#[must_use]
pub fn global_shutdown_file_name(filename: &str) -> String {
    format!("schemagen_ShutdownFile_{}", filename_identifier(filename))
}
