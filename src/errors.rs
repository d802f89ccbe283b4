//! Error types for the crate.
//!
//! Low-level [`BackendError`]s are produced by the concrete curve backends
//! (arkworks BLS12-381 / BN254); the high-level [`Error`] type is what the
//! scheme API returns. Cryptographic failures such as an out-of-range
//! discrete log or a rejected proof are ordinary error values, never panics.

use thiserror::Error;

/// Errors bubbled up from backend implementations.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("unsupported curve: {0}")]
    UnsupportedCurve(&'static str),
    #[error("unsupported backend feature: {0}")]
    UnsupportedFeature(&'static str),
    #[error("serialization failure: {0}")]
    Serialization(&'static str),
    #[error("point is not on the curve or not in the prime-order subgroup")]
    InvalidPoint,
    #[error("math error: {0}")]
    Math(&'static str),
}

/// High-level errors returned by the homomorphic encryption API.
#[derive(Debug, Error)]
pub enum Error {
    /// An operation was invoked before the state it depends on was set up
    /// (e.g. decryption before `set_decode_range`).
    #[error("initialization order violated: {0}")]
    InitOrder(&'static str),
    /// The requested decode range is empty.
    #[error("decode range must be non-zero")]
    RangeZero,
    /// Attempt to combine ciphertexts of different levels or representation
    /// states.
    #[error("ciphertext level mismatch: {0}")]
    LevelMismatch(&'static str),
    /// The decryption target lies outside the decodable range
    /// `±hash_size · (try_num + 1)`.
    #[error("discrete log outside the decodable range")]
    DlpOutOfRange,
    /// Length or content mismatch while decoding an exported object.
    #[error("malformed encoding: {0}")]
    Serialization(&'static str),
    /// DLP table file failed magic/version/length validation.
    #[error("malformed DLP table: {0}")]
    TableFormat(&'static str),
    /// Plaintext outside the supported domain for the requested operation.
    #[error("plaintext out of range: {0}")]
    OutOfRange(&'static str),
    /// A deserialized point failed curve or subgroup validation.
    #[error("invalid group element")]
    InvalidPoint,
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}
