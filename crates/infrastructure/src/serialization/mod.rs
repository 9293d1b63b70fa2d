//! Stable JSON encoding for the token file.

mod json;

pub(crate) use json::{from_json_bytes, to_json_stable_bytes};
