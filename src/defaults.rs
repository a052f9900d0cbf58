//! Default value rendering: (scalar kind, declared default) to C++ literal text.

use crate::descriptor::{DefaultValue, FieldDescriptor, ScalarKind};
use crate::error::CodeGenError;
use crate::names;

fn wrong_kind(field: &FieldDescriptor) -> CodeGenError {
    CodeGenError::GenericError(format!(
        "field \"{}\" declares a default value of the wrong kind for its type",
        field.name
    ))
}

/// Escapes a byte string for a C++ double-quoted literal.
///
/// Printable ASCII passes through; the usual short escapes are used where
/// they exist and everything else becomes a three-digit octal escape.
fn c_escape(bytes: &[u8]) -> String {
    let mut result: String = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            b'\n' => result.push_str("\\n"),
            b'\r' => result.push_str("\\r"),
            b'\t' => result.push_str("\\t"),
            b'"' => result.push_str("\\\""),
            b'\'' => result.push_str("\\'"),
            b'\\' => result.push_str("\\\\"),
            0x20..=0x7e => result.push(char::from(byte)),
            _ => result.push_str(&format!("\\{byte:03o}")),
        }
    }
    result
}

/// Escapes every `?` as `\?` so a trigraph-processing front end cannot
/// reinterpret sequences inside the already-escaped text.
fn escape_trigraphs(escaped: &str) -> String {
    escaped.replace('?', "\\?")
}

fn render_double(value: f64) -> String {
    if value == f64::INFINITY {
        "::schemagen::internal::Infinity()".to_string()
    } else if value == f64::NEG_INFINITY {
        "-::schemagen::internal::Infinity()".to_string()
    } else if value.is_nan() {
        "::schemagen::internal::NaN()".to_string()
    } else {
        format!("{value}")
    }
}

fn render_float(value: f32) -> String {
    if value == f32::INFINITY {
        "static_cast<float>(::schemagen::internal::Infinity())".to_string()
    } else if value == f32::NEG_INFINITY {
        "static_cast<float>(-::schemagen::internal::Infinity())".to_string()
    } else if value.is_nan() {
        "static_cast<float>(::schemagen::internal::NaN())".to_string()
    } else {
        let mut text: String = format!("{value}");
        // A fractional or exponent form would otherwise be read at double
        // precision, so it gets the float-literal suffix.
        if text.contains(['.', 'e', 'E']) {
            text.push('f');
        }
        text
    }
}

/// Renders the field's default value as C++ literal text.
///
/// An absent declared default renders the scalar kind's zero default. The
/// match over [`ScalarKind`] is exhaustive with no wildcard arm, so a new
/// kind cannot compile without a rendering rule.
///
/// # Errors
///
/// Returns `CodeGenError::GenericError` when the declared default's variant
/// does not match the field's scalar kind, or when an enum/message field is
/// missing its type descriptor. These are contract violations of the
/// descriptor model, not recoverable runtime conditions.
pub fn default_value(field: &FieldDescriptor) -> Result<String, CodeGenError> {
    match field.field_type.scalar_kind() {
        ScalarKind::Int32 => {
            let value: i32 = match field.default {
                None => 0,
                Some(DefaultValue::Int32(n)) => n,
                Some(_) => return Err(wrong_kind(field)),
            };
            Ok(value.to_string())
        }
        ScalarKind::Uint32 => {
            let value: u32 = match field.default {
                None => 0,
                Some(DefaultValue::Uint32(n)) => n,
                Some(_) => return Err(wrong_kind(field)),
            };
            Ok(format!("{value}u"))
        }
        ScalarKind::Int64 => {
            let value: i64 = match field.default {
                None => 0,
                Some(DefaultValue::Int64(n)) => n,
                Some(_) => return Err(wrong_kind(field)),
            };
            Ok(format!("SCHEMAGEN_LONGLONG({value})"))
        }
        ScalarKind::Uint64 => {
            let value: u64 = match field.default {
                None => 0,
                Some(DefaultValue::Uint64(n)) => n,
                Some(_) => return Err(wrong_kind(field)),
            };
            Ok(format!("SCHEMAGEN_ULONGLONG({value})"))
        }
        ScalarKind::Double => {
            let value: f64 = match field.default {
                None => 0.0,
                Some(DefaultValue::Double(v)) => v,
                Some(_) => return Err(wrong_kind(field)),
            };
            Ok(render_double(value))
        }
        ScalarKind::Float => {
            let value: f32 = match field.default {
                None => 0.0,
                Some(DefaultValue::Float(v)) => v,
                Some(_) => return Err(wrong_kind(field)),
            };
            Ok(render_float(value))
        }
        ScalarKind::Bool => {
            let value: bool = match field.default {
                None => false,
                Some(DefaultValue::Bool(b)) => b,
                Some(_) => return Err(wrong_kind(field)),
            };
            Ok(if value { "true" } else { "false" }.to_string())
        }
        ScalarKind::Enum => {
            let Some(ref enum_type) = field.enum_type else {
                return Err(CodeGenError::GenericError(format!(
                    "enum field \"{}\" has no enum type descriptor",
                    field.name
                )));
            };
            let number: i32 = match field.default {
                Some(DefaultValue::Enum(n)) => n,
                None => match enum_type.values.first() {
                    Some(value) => value.number,
                    None => {
                        return Err(CodeGenError::GenericError(format!(
                            "enum type \"{}\" declares no values",
                            enum_type.full_name
                        )));
                    }
                },
                Some(_) => return Err(wrong_kind(field)),
            };
            // A checked numeric cast rather than a named-constant reference,
            // which would require the enum's constants to be declared first.
            let class: String = names::enum_class_name(&enum_type.full_name, &enum_type.package, true);
            Ok(format!("static_cast< {class} >({number})"))
        }
        ScalarKind::String => {
            let escaped: String = match field.default {
                None => String::new(),
                Some(DefaultValue::String(ref s)) => c_escape(s.as_bytes()),
                Some(DefaultValue::Bytes(ref b)) => c_escape(b),
                Some(_) => return Err(wrong_kind(field)),
            };
            Ok(format!("\"{}\"", escape_trigraphs(&escaped)))
        }
        ScalarKind::Message => {
            if field.default.is_some() {
                return Err(wrong_kind(field));
            }
            let Some(ref message_type) = field.message_type else {
                return Err(CodeGenError::GenericError(format!(
                    "message field \"{}\" has no message type descriptor",
                    field.name
                )));
            };
            let class: String =
                names::message_class_name(&message_type.full_name, &message_type.package, true);
            Ok(format!("{class}::default_instance()"))
        }
    }
}
