//! Go source literals for redaction values.
//!
//! Strings are emitted as raw (backquoted) literals whenever the content allows
//! it, so the value in the schema is the value in the generated code. Content
//! that a raw literal cannot carry falls back to an interpreted literal: a
//! backquote, a carriage return (Go strips it from raw literals), and NUL or a
//! byte order mark (Go source may contain neither).

use std::fmt::Write as _;

pub(crate) const NIL: &str = "nil";

const BOM: char = '\u{feff}';

fn raw_compatible(value: &str) -> bool {
    !value.contains(['`', '\r', '\0', BOM])
}

fn push_escaped_byte(out: &mut String, byte: u8) {
    match byte {
        b'\\' => out.push_str("\\\\"),
        b'"' => out.push_str("\\\""),
        b'\n' => out.push_str("\\n"),
        b'\r' => out.push_str("\\r"),
        b'\t' => out.push_str("\\t"),
        0x20..=0x7e => out.push(char::from(byte)),
        _ => {
            let _ = write!(out, "\\x{byte:02x}");
        }
    }
}

fn interpreted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match u8::try_from(ch) {
            Ok(byte) if byte.is_ascii() => push_escaped_byte(&mut out, byte),
            _ if ch == BOM => out.push_str("\\ufeff"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// A Go string literal holding `value`.
pub fn string_literal(value: &str) -> String {
    if raw_compatible(value) {
        format!("`{value}`")
    } else {
        interpreted(value)
    }
}

/// A Go `[]byte` conversion holding `value`.
pub fn bytes_literal(value: &[u8]) -> String {
    match std::str::from_utf8(value) {
        Ok(text) => format!("[]byte({})", string_literal(text)),
        Err(_) => {
            let mut out = String::from("[]byte(\"");
            for &byte in value {
                push_escaped_byte(&mut out, byte);
            }
            out.push_str("\")");
            out
        }
    }
}

/// Wraps a scalar literal so it can be assigned to a pointer field
/// (`*T`) generated for proto3 `optional` scalars.
pub fn pointer_to(go_type: &str, literal: &str) -> String {
    format!("func() *{go_type} {{ v := {go_type}({literal}); return &v }}()")
}
