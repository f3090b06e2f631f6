//! Transcoders from parsed UP documents to third-party formats.

pub mod cbor;
pub mod toml;
pub mod yaml;
