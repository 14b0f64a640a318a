//! Error types for `gizli` operations.

/// Main error type for `gizli` operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or missing configuration (key list, hash secret, pair wiring)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Stored value is structurally broken and cannot be decrypted
    #[error("data is corrupted")]
    CorruptData,

    /// No candidate key verified the authentication tag
    #[error("key incorrect or data is corrupted")]
    Decryption,

    /// Encryption operation failed
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Plaintext failed type or format validation before encryption
    #[error("validation error: {0}")]
    Validation(String),

    /// A comparison was requested that the attribute kind does not permit
    #[error("{attribute} does not support '{operation}' lookups")]
    UnsupportedLookup {
        /// Name of the attribute the query targeted
        attribute: String,
        /// The rejected comparison operation
        operation: String,
    },
}
