//! Field encryption vault: the authenticated-encryption codec and the API
//! surface consumed by the storage layer.
//!
//! Stored blobs have a fixed-offset layout: `nonce (16 bytes) || tag (16
//! bytes) || ciphertext`. The 16-byte nonce is an inherited wire-format
//! decision kept for compatibility with existing stored data; it is not a
//! general GCM recommendation (12 bytes is the usual choice elsewhere).
//!
//! Nonces are drawn fresh from the OS CSPRNG for every encryption. The
//! random-nonce design assumes a low enough per-key encryption volume that
//! collision probability stays negligible; a nonce must never repeat under
//! the same key. Rotate keys well before that volume is reached.

use crate::error::Error;
use crate::keyring::{KeyRing, SharedKeyRing};
use crate::token;
use crate::value::{FieldKind, FieldValue};
use aes_gcm::{
    aead::{consts::U16, rand_core::RngCore, Aead, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Nonce,
};
use secrecy::{ExposeSecret, SecretString};

/// Nonce size in bytes, fixed by the stored-blob format.
pub const NONCE_SIZE: usize = 16;

/// Authentication tag size in bytes (128 bits).
pub const TAG_SIZE: usize = 16;

/// Minimum length of a well-formed blob: nonce plus tag, empty ciphertext.
pub const MIN_BLOB_LEN: usize = NONCE_SIZE + TAG_SIZE;

/// AES-256-GCM instantiated with the wire format's 16-byte nonce.
type FieldAead = AesGcm<Aes256, U16>;

/// Configuration for a [`FieldVault`].
///
/// `keys` is the ordered hex-encoded key list, newest (active) first.
/// `hash_secret` keys the search-token derivation; it should be long and
/// random, and must stay stable for the lifetime of the stored tokens.
#[derive(Clone, serde::Deserialize)]
pub struct VaultConfig {
    /// Ordered hex-encoded 256-bit keys, active key first
    pub keys: Vec<String>,
    /// Secret mixed into every search-token digest
    pub hash_secret: SecretString,
}

/// Vault for field encryption, decryption, and search-token derivation.
///
/// One vault serves any number of attributes. It is `Send + Sync`; every
/// operation takes a complete snapshot of the key ring, so encryption and
/// decryption may run on any thread concurrently with an administrative
/// [`reload_keys`](Self::reload_keys).
///
/// # Example
///
/// ```
/// use gizli::keyring::generate_key;
/// use gizli::vault::{FieldVault, VaultConfig};
/// use secrecy::SecretString;
///
/// # fn main() -> Result<(), gizli::error::Error> {
/// let config = VaultConfig {
///     keys: vec![generate_key()],
///     hash_secret: SecretString::new("a long random secret".into()),
/// };
/// let vault = FieldVault::new(config)?;
///
/// let blob = vault.encrypt_for_storage("alice@example.com")?;
/// assert_eq!(vault.decrypt_from_storage(&blob)?, "alice@example.com");
/// # Ok(())
/// # }
/// ```
pub struct FieldVault {
    ring: SharedKeyRing,
    hash_secret: SecretString,
}

impl FieldVault {
    /// Creates a vault from configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the key list is empty or contains
    /// an entry that does not decode to 32 bytes, or if the hash secret is
    /// empty.
    pub fn new(config: VaultConfig) -> Result<Self, Error> {
        if config.hash_secret.expose_secret().is_empty() {
            return Err(Error::Configuration("hash secret must not be empty".to_string()));
        }
        let ring = KeyRing::from_hex_keys(&config.keys)?;
        Ok(Self { ring: SharedKeyRing::new(ring), hash_secret: config.hash_secret })
    }

    /// Encrypts a canonical plaintext with the active key.
    ///
    /// Returns the stored-blob form `nonce || tag || ciphertext`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encryption` if the AEAD operation fails.
    pub fn encrypt_for_storage(&self, plaintext: &str) -> Result<Vec<u8>, Error> {
        let ring = self.ring.current();
        let cipher = FieldAead::new_from_slice(ring.active().expose())
            .map_err(|e| Error::Encryption(format!("invalid key: {e}")))?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from(nonce_bytes);

        // The aead crate appends the tag to the ciphertext; the stored
        // format carries it between nonce and ciphertext instead.
        let sealed = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| Error::Encryption(format!("AES-GCM encryption failed: {e}")))?;
        let boundary = sealed.len() - TAG_SIZE;

        let mut blob = Vec::with_capacity(MIN_BLOB_LEN + boundary);
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&sealed[boundary..]);
        blob.extend_from_slice(&sealed[..boundary]);
        Ok(blob)
    }

    /// Decrypts a stored blob, trying every key in the ring in order.
    ///
    /// The first key that verifies the authentication tag wins. Trying every
    /// candidate (rather than storing a key identifier in the blob) keeps
    /// the stored format minimal and lets old data stay readable through a
    /// rotation, as long as its encrypting key remains anywhere in the ring.
    ///
    /// # Errors
    ///
    /// Returns `Error::CorruptData` if the blob is shorter than the 32-byte
    /// header, and `Error::Decryption` if no candidate key verifies the tag
    /// — either the data is corrupted or a required historical key was
    /// dropped from the ring.
    pub fn decrypt_from_storage(&self, blob: &[u8]) -> Result<String, Error> {
        if blob.len() < MIN_BLOB_LEN {
            return Err(Error::CorruptData);
        }
        let nonce = Nonce::from_slice(&blob[..NONCE_SIZE]);
        let tag = &blob[NONCE_SIZE..MIN_BLOB_LEN];
        let ciphertext = &blob[MIN_BLOB_LEN..];

        let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_SIZE);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(tag);

        let ring = self.ring.current();
        for key in ring.candidates() {
            let Ok(cipher) = FieldAead::new_from_slice(key.expose()) else {
                continue;
            };
            if let Ok(plaintext) = cipher.decrypt(nonce, sealed.as_slice()) {
                // The tag verified, so the bytes are authentic; if they are
                // not UTF-8 the stored value itself is bad.
                return String::from_utf8(plaintext).map_err(|_| Error::CorruptData);
            }
        }
        Err(Error::Decryption)
    }

    /// Encrypts a typed value via its canonical string form.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encryption` if the AEAD operation fails.
    pub fn encrypt_value(&self, value: &FieldValue) -> Result<Vec<u8>, Error> {
        self.encrypt_for_storage(&value.canonical())
    }

    /// Decrypts a stored blob and parses it back to a typed value.
    ///
    /// # Errors
    ///
    /// Propagates decryption errors; returns `Error::Validation` if the
    /// decrypted string is not a valid rendering of `kind`.
    pub fn decrypt_value(&self, blob: &[u8], kind: FieldKind) -> Result<FieldValue, Error> {
        let plaintext = self.decrypt_from_storage(blob)?;
        FieldValue::parse(kind, &plaintext)
    }

    /// Derives the deterministic search token for `value`.
    ///
    /// Idempotent: a value that is already a token is returned unchanged.
    #[must_use]
    pub fn derive_search_token(&self, value: &str) -> String {
        token::derive_search_token(value, self.hash_secret.expose_secret())
    }

    /// Returns `true` if `candidate` is structurally a search token.
    #[must_use]
    pub fn is_probably_token(&self, candidate: &str) -> bool {
        token::is_search_token(candidate)
    }

    /// Atomically replaces the cached key ring from a new configured list.
    ///
    /// Concurrent operations observe either the old or the new ring in
    /// full. Called by the administrative key-rotation procedure after the
    /// configuration changes.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the new list is invalid; the
    /// current ring stays in place.
    pub fn reload_keys<S: AsRef<str>>(&self, keys: &[S]) -> Result<(), Error> {
        self.ring.reload(KeyRing::from_hex_keys(keys)?);
        Ok(())
    }
}
