//! Deterministic keyed search tokens for exact-match lookup.
//!
//! A search token is a one-way stand-in for a plaintext value: the SHA-256
//! digest of the value concatenated with a caller-supplied secret, hex
//! encoded behind a short prefix. Equal `(value, secret)` pairs always yield
//! the same token, so equality queries work without storing the plaintext.
//!
//! Tokens flow back through write paths when previously-saved records are
//! re-saved, so [`derive_search_token`] recognizes its own output and
//! returns it unchanged instead of hashing a hash.

use sha2::{Digest, Sha256};

/// Prefix carried by every search token.
///
/// Without it, a legitimate plaintext that happens to be 64 hex characters
/// (a transaction id, say) would be mistaken for an existing token and the
/// companion value would silently never be written. The prefix is a
/// low-collision guard, not a cryptographic property.
pub const SEARCH_TOKEN_PREFIX: &str = "xx";

/// Hex length of the SHA-256 digest portion.
const DIGEST_HEX_LEN: usize = 64;

/// Total length of a search token.
pub const SEARCH_TOKEN_LEN: usize = SEARCH_TOKEN_PREFIX.len() + DIGEST_HEX_LEN;

/// Returns `true` if `candidate` is structurally a search token: the prefix
/// followed by exactly 64 hex digits.
///
/// Purely structural, no secret involved. Used defensively anywhere a value
/// might already have been hashed upstream.
#[must_use]
pub fn is_search_token(candidate: &str) -> bool {
    let Some(digest) = candidate.strip_prefix(SEARCH_TOKEN_PREFIX) else {
        return false;
    };
    digest.len() == DIGEST_HEX_LEN && digest.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Derives the search token for `value` under `secret`.
///
/// If `value` is already a token it is returned unchanged; double-hashing
/// would silently corrupt the companion encrypted value by storing a hash
/// of a hash.
///
/// # Example
///
/// ```
/// use gizli::token::{derive_search_token, is_search_token};
///
/// let token = derive_search_token("alice@example.com", "pepper");
/// assert!(is_search_token(&token));
/// assert_eq!(derive_search_token(&token, "pepper"), token);
/// ```
#[must_use]
pub fn derive_search_token(value: &str, secret: &str) -> String {
    if is_search_token(value) {
        return value.to_owned();
    }
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hasher.update(secret.as_bytes());
    format!("{SEARCH_TOKEN_PREFIX}{}", hex::encode(hasher.finalize()))
}
