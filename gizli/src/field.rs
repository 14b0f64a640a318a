//! Dual-field write coordination: one encrypted attribute, one companion
//! search token, always written together.
//!
//! The encrypted attribute is authoritative: it holds the real value and
//! owns the default and the validation rules. The search attribute is
//! derived and query-only; its token can never reconstruct the plaintext.
//! The coordinator owns both pending artifacts for one record so that a
//! single commit produces them from the same canonical plaintext.

use crate::error::Error;
use crate::value::{FieldKind, FieldValue};
use crate::vault::FieldVault;
use std::sync::Arc;

/// Declarative description of an encrypted attribute and its companion
/// search attribute.
///
/// A default can only be declared here, on the encrypted side; the search
/// attribute inherits it. This keeps form pre-fill, bulk backfills, and
/// save-time defaulting on one single default definition.
///
/// # Example
///
/// ```
/// use gizli::field::AttributePair;
/// use gizli::value::{FieldKind, FieldValue};
///
/// let pair = AttributePair::new("email", "email_token", FieldKind::Email)
///     .with_default(FieldValue::Email("unknown@example.com".into()));
/// ```
#[derive(Debug, Clone)]
pub struct AttributePair {
    encrypted_name: String,
    search_name: String,
    kind: FieldKind,
    default: Option<FieldValue>,
}

impl AttributePair {
    /// Declares a pair: the encrypted attribute, its search companion, and
    /// the value type both observe.
    #[must_use]
    pub fn new(
        encrypted_name: impl Into<String>,
        search_name: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        Self {
            encrypted_name: encrypted_name.into(),
            search_name: search_name.into(),
            kind,
            default: None,
        }
    }

    /// Declares the encrypted attribute's default value. The search
    /// attribute always inherits this default.
    #[must_use]
    pub fn with_default(mut self, default: FieldValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns the encrypted attribute's name.
    #[must_use]
    pub fn encrypted_name(&self) -> &str {
        &self.encrypted_name
    }

    /// Returns the search attribute's name.
    #[must_use]
    pub fn search_name(&self) -> &str {
        &self.search_name
    }

    /// Returns the value kind of the pair.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the inherited default, if declared.
    #[must_use]
    pub fn default(&self) -> Option<&FieldValue> {
        self.default.as_ref()
    }
}

/// The two artifacts of one logical write.
///
/// Both members must be persisted in the same transaction. Updating only one
/// of the pair through an independent operation (a bulk update touching one
/// column, say) desynchronizes the encrypted value from its token; that is a
/// contract violation the library cannot detect at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSet {
    /// New blob for the encrypted attribute; `None` means leave it untouched
    pub ciphertext: Option<Vec<u8>>,
    /// New value for the search attribute
    pub token: Option<String>,
}

/// Per-record coordinator for one attribute pair.
///
/// Owns the resident companion plaintext and the pending search token, and
/// guarantees that both stored artifacts derive from the same canonical
/// plaintext. Replaces implicit attribute-access interception with explicit
/// operations: [`set_plain`](Self::set_plain), [`get_plain`](Self::get_plain),
/// [`get_token`](Self::get_token), [`commit`](Self::commit).
#[derive(Debug, Clone)]
pub struct SearchableField {
    pair: Arc<AttributePair>,
    plaintext: Option<String>,
    token: Option<String>,
}

impl SearchableField {
    /// Creates the coordinator state for one record of `pair`.
    #[must_use]
    pub fn new(pair: Arc<AttributePair>) -> Self {
        Self { pair, plaintext: None, token: None }
    }

    /// Returns the pair this field coordinates.
    #[must_use]
    pub fn pair(&self) -> &AttributePair {
        &self.pair
    }

    /// Sets the search-facing value.
    ///
    /// If `raw` is already a search token — a previously-hashed value
    /// flowing back in from a partial read — it becomes the pending token
    /// and the companion plaintext is left untouched: overwriting real data
    /// with a hash is exactly the corruption this check exists to prevent.
    ///
    /// Otherwise `raw` is validated and canonicalized as the pair's kind,
    /// stored as the pending companion plaintext, and its token is derived
    /// from that same canonical string.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if `raw` is not a valid rendering of the
    /// pair's kind — surfaced exactly as if the encrypted attribute itself
    /// had been written directly.
    pub fn set_plain(&mut self, vault: &FieldVault, raw: &str) -> Result<(), Error> {
        if vault.is_probably_token(raw) {
            self.token = Some(raw.to_owned());
            return Ok(());
        }
        let canonical = FieldValue::parse(self.pair.kind, raw)?.canonical();
        self.token = Some(vault.derive_search_token(&canonical));
        self.plaintext = Some(canonical);
        Ok(())
    }

    /// Sets the search-facing value from a typed value.
    ///
    /// Same coordination as [`set_plain`](Self::set_plain); the canonical
    /// string of `value` feeds both artifacts. A `Text` value that happens
    /// to look like a token gets the same already-hashed treatment.
    pub fn set_value(&mut self, vault: &FieldVault, value: &FieldValue) {
        let canonical = value.canonical();
        if vault.is_probably_token(&canonical) {
            self.token = Some(canonical);
            return;
        }
        self.token = Some(vault.derive_search_token(&canonical));
        self.plaintext = Some(canonical);
    }

    /// Returns the resident companion plaintext, if any.
    ///
    /// `None` means the plaintext must be reloaded from storage via
    /// [`load_from_storage`](Self::load_from_storage) — the token alone
    /// cannot reconstruct it.
    #[must_use]
    pub fn get_plain(&self) -> Option<&str> {
        self.plaintext.as_deref()
    }

    /// Returns the pending search token, if any. Tokens read back from
    /// storage are used verbatim; they are never decrypted.
    #[must_use]
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Decrypts the companion's stored blob and makes the plaintext
    /// resident.
    ///
    /// # Errors
    ///
    /// Propagates `Error::CorruptData` and `Error::Decryption` from the
    /// codec.
    pub fn load_from_storage(&mut self, vault: &FieldVault, blob: &[u8]) -> Result<&str, Error> {
        let plaintext = vault.decrypt_from_storage(blob)?;
        Ok(self.plaintext.insert(plaintext))
    }

    /// Produces both artifacts of this logical write.
    ///
    /// If nothing is resident and the pair declares a default, the default
    /// is applied first (save-time defaulting, through the inherited
    /// definition). With a resident plaintext, the blob and the token are
    /// both derived from that one canonical string. With only a pending
    /// token (a re-saved already-hashed value), the companion is left
    /// untouched: `ciphertext` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encryption` if encrypting the plaintext fails.
    pub fn commit(&mut self, vault: &FieldVault) -> Result<WriteSet, Error> {
        if self.plaintext.is_none() && self.token.is_none() {
            if let Some(default) = self.pair.default.clone() {
                self.set_value(vault, &default);
            }
        }
        match &self.plaintext {
            Some(plaintext) => {
                let token = self
                    .token
                    .get_or_insert_with(|| vault.derive_search_token(plaintext))
                    .clone();
                Ok(WriteSet {
                    ciphertext: Some(vault.encrypt_for_storage(plaintext)?),
                    token: Some(token),
                })
            }
            None => Ok(WriteSet { ciphertext: None, token: self.token.clone() }),
        }
    }
}
