//! Default redaction values and Go type names per protobuf kind.

use crate::schema::ProtoKind;

/// Placeholder written into redacted `string` fields.
pub const REDACTED_STRING: &str = "\"REDACTED\"";

/// Returned for singular message fields, which have no scalar default: the
/// caller decides between nil, an empty instance, or recursing.
pub const NO_SCALAR_DEFAULT: &str = "-";

/// Default redaction literal for a value of `kind`.
///
/// When `is_collection` is set the whole repeated/map field is nulled rather
/// than each element.
///
/// | Kind | Singular | Collection |
/// |------|----------|------------|
/// | numeric, enum | `0` | `nil` |
/// | `bool` | `false` | `nil` |
/// | `string` | `"REDACTED"` | `nil` |
/// | `bytes` | `nil` | `nil` |
/// | message | `-` | `nil` |
pub fn default_for(kind: ProtoKind, is_collection: bool) -> &'static str {
    if is_collection {
        return "nil";
    }
    match kind {
        ProtoKind::Bool => "false",
        ProtoKind::String => REDACTED_STRING,
        ProtoKind::Bytes => "nil",
        ProtoKind::Message => NO_SCALAR_DEFAULT,
        _ => "0",
    }
}

/// Go type used by protoc-gen-go for scalar kinds.
///
/// Returns `None` for enums and messages, whose type name comes from the
/// schema.
pub fn go_type_name(kind: ProtoKind) -> Option<&'static str> {
    let name = match kind {
        ProtoKind::Int32 | ProtoKind::Sint32 | ProtoKind::Sfixed32 => "int32",
        ProtoKind::Int64 | ProtoKind::Sint64 | ProtoKind::Sfixed64 => "int64",
        ProtoKind::Uint32 | ProtoKind::Fixed32 => "uint32",
        ProtoKind::Uint64 | ProtoKind::Fixed64 => "uint64",
        ProtoKind::Float => "float32",
        ProtoKind::Double => "float64",
        ProtoKind::Bool => "bool",
        ProtoKind::String => "string",
        ProtoKind::Bytes => "[]byte",
        ProtoKind::Enum | ProtoKind::Message => return None,
    };
    Some(name)
}
