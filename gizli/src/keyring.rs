//! Key material and the rotating key ring.
//!
//! Keys are supplied by configuration as an ordered list of hex strings,
//! newest first. The first key encrypts all new data; every key in the list
//! is a decryption candidate, which is what makes zero-downtime rotation
//! possible: prepend a new key, re-encrypt opportunistically, drop retired
//! keys once nothing stored depends on them.

use crate::error::Error;
use aes_gcm::aead::{rand_core::RngCore, OsRng};
use arc_swap::ArcSwap;
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;
use zeroize::Zeroizing;

/// Key size in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Length of a hex-encoded key.
pub const KEY_HEX_LEN: usize = KEY_SIZE * 2;

/// A single 256-bit symmetric key.
pub struct Key {
    material: Secret<[u8; KEY_SIZE]>,
}

impl Key {
    /// Decodes a key from its canonical 64-character hex form.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the string does not decode to
    /// exactly 32 bytes.
    pub fn from_hex(encoded: &str) -> Result<Self, Error> {
        if encoded.len() != KEY_HEX_LEN {
            return Err(Error::Configuration(format!(
                "key must be {KEY_HEX_LEN} hex characters, got {}",
                encoded.len()
            )));
        }
        let decoded = Zeroizing::new(
            hex::decode(encoded)
                .map_err(|e| Error::Configuration(format!("key is not valid hex: {e}")))?,
        );
        let mut material = [0u8; KEY_SIZE];
        material.copy_from_slice(&decoded);
        Ok(Self { material: Secret::new(material) })
    }

    /// Returns the raw key bytes for cipher construction.
    pub(crate) fn expose(&self) -> &[u8; KEY_SIZE] {
        self.material.expose_secret()
    }
}

impl Clone for Key {
    fn clone(&self) -> Self {
        Self { material: Secret::new(*self.material.expose_secret()) }
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Key([REDACTED])")
    }
}

/// Ordered collection of keys: position 0 is active, all are decryption
/// candidates.
#[derive(Clone, Debug)]
pub struct KeyRing {
    keys: Vec<Key>,
}

impl KeyRing {
    /// Builds a ring from an ordered list of hex-encoded keys.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the list is empty or any entry
    /// fails to decode to exactly 32 bytes. The error names the offending
    /// position.
    pub fn from_hex_keys<S: AsRef<str>>(encoded: &[S]) -> Result<Self, Error> {
        if encoded.is_empty() {
            return Err(Error::Configuration(
                "key list must contain at least one key".to_string(),
            ));
        }
        let keys = encoded
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                Key::from_hex(entry.as_ref()).map_err(|e| match e {
                    Error::Configuration(msg) => {
                        Error::Configuration(format!("key at position {position}: {msg}"))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { keys })
    }

    /// Returns the active key used for all new encryptions.
    #[must_use]
    pub fn active(&self) -> &Key {
        &self.keys[0]
    }

    /// Returns every key in ring order, for trial decryption.
    pub fn candidates(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    /// Returns the number of keys in the ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the ring holds no keys. Never true for a ring
    /// built through `from_hex_keys`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Process-wide cached key ring with atomic replacement.
///
/// Readers take a complete snapshot of the ring; `reload` swaps in a new
/// ring in one step, so a concurrent decrypt observes either the old or the
/// new list in full, never a partially-updated one. Replacing the ring is an
/// explicit administrative action (a key-rotation step), not an implicit
/// cache invalidation.
#[derive(Debug)]
pub struct SharedKeyRing {
    inner: ArcSwap<KeyRing>,
}

impl SharedKeyRing {
    /// Wraps a ring for shared use.
    #[must_use]
    pub fn new(ring: KeyRing) -> Self {
        Self { inner: ArcSwap::from_pointee(ring) }
    }

    /// Returns a snapshot of the current ring.
    ///
    /// The snapshot stays valid for the whole operation even if the ring is
    /// reloaded concurrently.
    #[must_use]
    pub fn current(&self) -> Arc<KeyRing> {
        self.inner.load_full()
    }

    /// Atomically replaces the cached ring.
    pub fn reload(&self, ring: KeyRing) {
        self.inner.store(Arc::new(ring));
    }
}

/// Generates a fresh 256-bit key, hex-encoded.
///
/// Suitable for prepending to the configured key list when rotating keys.
#[must_use]
pub fn generate_key() -> String {
    let mut material = Zeroizing::new([0u8; KEY_SIZE]);
    OsRng.fill_bytes(&mut *material);
    hex::encode(&*material)
}
