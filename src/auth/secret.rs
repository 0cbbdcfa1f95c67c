//! Encrypted passwords in the config file
//!
//! A stored password starting with `enc:` holds base64 of a magic tag, a
//! random nonce and the XChaCha20-Poly1305 ciphertext. The cipher key is the
//! SHA-256 digest of the secret key passed with `--secret-key` or
//! `ADC_SECRET_KEY`; with neither, the empty secret key is used. Any other
//! stored value is taken as plaintext.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::constants::secret::{ENCRYPTED_PREFIX, MAGIC, NONCE_LEN};
use crate::errors::{AuthError, AuthResult};

/// Whether a stored password is in encrypted form
pub fn is_encrypted(stored: &str) -> bool {
    stored.starts_with(ENCRYPTED_PREFIX)
}

/// Encrypt `password` for storage in the config file
///
/// # Errors
///
/// `PasswordEncryption` if the cipher rejects the input.
pub fn encrypt_password(password: &str, secret_key: &str) -> AuthResult<String> {
    let mut nonce = [0_u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);

    let ciphertext = cipher(secret_key)
        .encrypt(XNonce::from_slice(&nonce), password.as_bytes())
        .map_err(|_| AuthError::PasswordEncryption)?;

    let mut payload = Vec::with_capacity(MAGIC.len() + NONCE_LEN + ciphertext.len());
    payload.extend_from_slice(MAGIC);
    payload.extend_from_slice(&nonce);
    payload.extend_from_slice(&ciphertext);
    Ok(format!("{}{}", ENCRYPTED_PREFIX, STANDARD.encode(payload)))
}

/// Recover the password from its stored form
///
/// Plaintext values are returned unchanged.
///
/// # Errors
///
/// `InvalidEncryptedPassword` for a malformed encrypted value,
/// `PasswordDecryption` when `secret_key` is not the key it was encrypted with.
pub fn decrypt_password(stored: &str, secret_key: &str) -> AuthResult<String> {
    let Some(encoded) = stored.strip_prefix(ENCRYPTED_PREFIX) else {
        return Ok(stored.to_string());
    };

    let payload = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthError::InvalidEncryptedPassword)?;
    if payload.len() < MAGIC.len() + NONCE_LEN || &payload[..MAGIC.len()] != MAGIC {
        return Err(AuthError::InvalidEncryptedPassword);
    }

    let (nonce, ciphertext) = payload[MAGIC.len()..].split_at(NONCE_LEN);
    let plaintext = cipher(secret_key)
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|_| AuthError::PasswordDecryption)?;
    String::from_utf8(plaintext).map_err(|_| AuthError::InvalidEncryptedPassword)
}

fn cipher(secret_key: &str) -> XChaCha20Poly1305 {
    let digest = Sha256::digest(secret_key.as_bytes());
    XChaCha20Poly1305::new(Key::from_slice(digest.as_slice()))
}
