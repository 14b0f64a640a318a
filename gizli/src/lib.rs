//! # `gizli`
//!
//! Searchable field-level encryption: values are stored under authenticated
//! AES-256-GCM encryption, with deterministic keyed search tokens alongside
//! for exact-match lookup.
//!
//! ## Features
//!
//! - AES-256-GCM authenticated encryption with a self-describing blob format
//! - Rotating key ring: one active encryption key, every key a decryption
//!   candidate, atomic reload mid-rotation
//! - Keyed SHA-256 search tokens with double-hash detection
//! - Canonical serialization for text, email, integer, date, and datetime
//!   values, shared by the encrypt and hash paths
//! - Dual-field write coordination keeping an encrypted value and its
//!   search token consistent
//!
//! ## Example
//!
//! ```rust,ignore
//! use gizli::prelude::*;
//!
//! let vault = FieldVault::new(config)?;
//! let blob = vault.encrypt_for_storage("alice@example.com")?;
//! let token = vault.derive_search_token("alice@example.com");
//!
//! assert_eq!(vault.decrypt_from_storage(&blob)?, "alice@example.com");
//! ```

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod field;
pub mod keyring;
pub mod lookup;
pub mod token;
pub mod value;
pub mod vault;

pub mod prelude {
    //! Convenience re-exports for common use.
    pub use crate::error::Error;
    pub use crate::field::{AttributePair, SearchableField, WriteSet};
    pub use crate::keyring::{generate_key, Key, KeyRing, SharedKeyRing};
    pub use crate::lookup::{check_comparison, AttributeKind, Comparison};
    pub use crate::token::{derive_search_token, is_search_token};
    pub use crate::value::{FieldKind, FieldValue};
    pub use crate::vault::{FieldVault, VaultConfig};
}
