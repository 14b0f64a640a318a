//! Basic usage example for `gizli`.

use gizli::field::{AttributePair, SearchableField};
use gizli::keyring::generate_key;
use gizli::prelude::*;
use secrecy::SecretString;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("gizli Basic Usage Example");
    println!("=========================\n");

    // Setup: in production these come from configuration, not from fresh
    // generation on every run.
    let active_key = generate_key();
    let vault = FieldVault::new(VaultConfig {
        keys: vec![active_key.clone()],
        hash_secret: SecretString::new("a long random hash secret".to_string()),
    })?;
    println!("✓ Vault created with 1 key\n");

    // Encrypt a value and read it back.
    let plaintext = "alice@example.com";
    println!("Plaintext: {plaintext}");

    let blob = vault.encrypt_for_storage(plaintext)?;
    println!("✓ Encrypted ({} bytes: 16 nonce + 16 tag + ciphertext)", blob.len());

    let decrypted = vault.decrypt_from_storage(&blob)?;
    assert_eq!(decrypted, plaintext);
    println!("✓ Decrypted: {decrypted}\n");

    // Derive the search token used for exact-match lookup.
    let token = vault.derive_search_token(plaintext);
    println!("Search token: {token}");
    assert!(vault.is_probably_token(&token));
    println!("✓ Token recognized; deriving again is a no-op\n");

    // Coordinate a dual-field write.
    let pair = Arc::new(AttributePair::new("email", "email_token", FieldKind::Email));
    let mut field = SearchableField::new(pair);
    field.set_plain(&vault, plaintext)?;
    let write = field.commit(&vault)?;
    println!(
        "✓ WriteSet ready: {} ciphertext bytes + token {}",
        write.ciphertext.as_ref().map_or(0, Vec::len),
        write.token.as_deref().unwrap_or("-"),
    );

    // Rotate keys: prepend a new active key, keep the old as candidate.
    let new_key = generate_key();
    vault.reload_keys(&[new_key, active_key])?;
    let still_readable = vault.decrypt_from_storage(&blob)?;
    assert_eq!(still_readable, plaintext);
    println!("✓ After rotation the old blob still decrypts\n");

    println!("Done.");
    Ok(())
}
