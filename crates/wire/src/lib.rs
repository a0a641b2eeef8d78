//! Wire encoding for Strata documents
//!
//! This crate turns a [`Value`](strata_core::Value) into the text stored
//! under a key and back again. The format is JSON-shaped with two
//! conventions layered on top of string values:
//!
//! - Binary blobs are written as a string carrying the `:binary:` marker
//!   followed by one character per byte (U+0000..U+00FF).
//! - Ordinary strings that begin with `:` get one extra leading `:` so
//!   they can never be mistaken for the marker.
//!
//! ## Encoding Rules
//!
//! | Value Type | Encoding |
//! |------------|----------|
//! | Null | `null` |
//! | Bool | `true`/`false` |
//! | Number (finite) | shortest decimal form |
//! | Number (non-finite) | `null` |
//! | String | `"..."`, only `"` escaped |
//! | Bytes | `":binary:..."` |
//! | Array | `[...]` |
//! | Object | `{...}` in insertion order |
//!
//! ## Limitation
//!
//! Only the quote character is escaped. A string or blob whose last
//! character is a backslash produces text that does not decode.
//!
//! ## Examples
//!
//! ```
//! use strata_wire::{encode_value, decode_value};
//! use strata_core::Value;
//!
//! let value = Value::bytes(vec![0u8, 159, 255]);
//! let text = encode_value(&value);
//! assert!(text.starts_with("\":binary:"));
//! assert_eq!(decode_value(&text).unwrap(), value);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod json;

// Re-export main types
pub use json::{decode_value, encode_value, DecodeError, BINARY_MARKER};
