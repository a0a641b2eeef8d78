//! Textual encoding for Strata values
//!
//! String values pass through a marking step on both sides:
//!
//! - encode: bytes become `:binary:` + latin-1 text, strings starting with
//!   `:` gain one more `:`
//! - decode: a `:binary:` prefix restores bytes, otherwise one leading `:`
//!   is stripped
//!
//! Map keys are never marked.

mod decode;
mod encode;

pub use decode::{decode_value, DecodeError};
pub use encode::encode_value;

/// Prefix identifying a binary blob inside a string value
pub const BINARY_MARKER: &str = ":binary:";

/// Leading character that triggers escaping of ordinary strings
pub(crate) const MARKER_LEAD: char = ':';
