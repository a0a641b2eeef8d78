//! Core types for the Strata document store
//!
//! This crate defines the value model shared by every layer:
//! - [`Value`]: the tagged document value (null, bool, number, string, array, map, bytes)
//! - [`DocPath`]: dot-delimited path expressions addressing nested fields
//! - [`get_at_path`] / [`set_at_path`]: nested read and write helpers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod path;
pub mod value;

pub use path::{
    get_at_path, get_at_path_mut, set_at_path, DocPath, PathError, PathSegment, MAX_INDEX_GAP,
};
pub use value::{Value, ValueMap};
