//! Error types surfaced by the store.
//!
//! Unknown marker ids and out-of-range moves are not errors; those operations
//! are documented no-ops. Only malformed imports and model decode failures
//! reach the caller as `Err`.

use thiserror::Error;

/// Failure to turn import text into a scene patch. State is never modified
/// when one of these is returned.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import text is empty")]
    Empty,
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected a JSON object at the top level, found {found}")]
    NotAnObject { found: &'static str },
    #[error("invalid value for `{key}`: {reason}")]
    Field { key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize scene: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("`{key}` is not a finite number and cannot be written as JSON")]
    NonFinite { key: String },
}

/// Failure to decode a dropped model file.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file is empty")]
    Empty,
    #[error("not a binary glTF file (missing `glTF` magic)")]
    NotBinaryGltf,
    #[error("glTF decoder rejected the file: {0}")]
    Decode(#[from] gltf::Error),
    #[error("model requires unsupported extension `{0}`")]
    UnsupportedExtension(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Model(#[from] ModelError),
}
