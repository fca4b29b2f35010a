use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by every layer of the store.
///
/// Corruption kinds (`MalformedEnvelope`, `DecryptionFailed`,
/// `DecompressionFailed`, `Parse`) are distinct from `Io` so callers can
/// tell a damaged or wrongly-keyed file apart from a missing one.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Unsupported {kind} algorithm: {name}")]
    UnsupportedAlgorithm { kind: &'static str, name: String },

    #[error("Decryption failed — wrong password or corrupted data")]
    DecryptionFailed,

    #[error("Decompression failed — corrupted compressed stream")]
    DecompressionFailed,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: String },

    #[error("Unknown boolean state: {0:?}")]
    InvalidBooleanState(String),

    #[error("Nested arrays are not supported")]
    UnsupportedNesting,

    #[error("Unsupported data type: {0:?}")]
    UnsupportedType(String),

    #[error("A value is already assigned to key {0:?}")]
    KeyAlreadyExists(String),

    #[error("Key not found: {0:?}")]
    KeyNotFound(String),

    #[error("The configuration file is not yet loaded")]
    NotLoaded,

    #[error("The configuration file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("The file is encrypted but no password was supplied")]
    MissingPassword,

    #[error("Invalid metadata: {0}")]
    Validation(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;
