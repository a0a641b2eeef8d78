//! Encoding of Strata values to text

use super::{BINARY_MARKER, MARKER_LEAD};
use strata_core::{Value, ValueMap};

/// Encode a Value to its stored text form
pub fn encode_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, *n),
        Value::String(s) => write_marked_string(out, s),
        Value::Bytes(b) => write_bytes(out, b),
        Value::Array(arr) => write_array(out, arr),
        Value::Object(obj) => write_object(out, obj),
    }
}

/// Finite numbers use the shortest round-trip decimal form
fn write_number(out: &mut String, n: f64) {
    if n.is_finite() {
        out.push_str(&n.to_string());
    } else {
        out.push_str("null");
    }
}

fn write_quoted(out: &mut String, prefix: Option<&str>, body: impl Iterator<Item = char>) {
    out.push('"');
    if let Some(prefix) = prefix {
        out.push_str(prefix);
    }
    for c in body {
        if c == '"' {
            out.push_str("\\\"");
        } else {
            out.push(c);
        }
    }
    out.push('"');
}

/// Strings that could be confused with the binary marker get one more `:`
fn write_marked_string(out: &mut String, s: &str) {
    let prefix = s.starts_with(MARKER_LEAD).then_some(":");
    write_quoted(out, prefix, s.chars());
}

/// Bytes map one-to-one onto U+0000..U+00FF after the marker
fn write_bytes(out: &mut String, bytes: &[u8]) {
    write_quoted(out, Some(BINARY_MARKER), bytes.iter().map(|&b| char::from(b)));
}

fn write_array(out: &mut String, arr: &[Value]) {
    out.push('[');
    for (i, item) in arr.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(out, item);
    }
    out.push(']');
}

fn write_object(out: &mut String, obj: &ValueMap) {
    out.push('{');
    for (i, (key, value)) in obj.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        // Keys are quoted but never marked
        write_quoted(out, None, key.chars());
        out.push(':');
        write_value(out, value);
    }
    out.push('}');
}
