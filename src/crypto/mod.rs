//! AES-256-CBC encryption and SHA-256 key derivation for dictionary blobs.
//!
//! Key derivation: SHA-256(password bytes) → 32-byte key
//! Encryption:     AES-256-CBC, PKCS#7 padding, fresh random IV per call
//!
//! Encrypted payload layout (before base64): `[ IV (16 B) | ciphertext ]`.
//! The padding scheme always appends at least one pad byte, so an
//! already-aligned plaintext still grows by a full block.
//!
//! Every decryption failure (malformed base64, truncated input, wrong key,
//! bad padding, non-UTF-8 plaintext) surfaces as
//! [`Error::DecryptionFailed`]; a wrong key never yields silent garbage.

use aes::Aes256;
use base64::{engine::general_purpose, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block length; also the length of the IV prepended to every ciphertext.
pub const BLOCK_LEN: usize = 16;

/// Derive a 256-bit key from a password.
///
/// The key is the SHA-256 digest of the password's bytes, so it has a fixed
/// length regardless of password length.
pub fn derive_key(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

/// Encrypt `plaintext` under `key` with a fresh random IV.
///
/// Returns `base64(IV || ciphertext)`, printable text safe to embed in a
/// single envelope line.
pub fn encrypt(key: &[u8; 32], plaintext: &str) -> String {
    let mut iv = [0u8; BLOCK_LEN];
    rand::thread_rng().fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new(key.into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mut payload = Vec::with_capacity(BLOCK_LEN + ciphertext.len());
    payload.extend_from_slice(&iv);
    payload.extend_from_slice(&ciphertext);
    general_purpose::STANDARD.encode(payload)
}

/// Decrypt a payload produced by [`encrypt`].
pub fn decrypt(key: &[u8; 32], ciphertext: &str) -> Result<String> {
    let payload = general_purpose::STANDARD
        .decode(ciphertext.trim())
        .map_err(|_| Error::DecryptionFailed)?;

    // The payload must hold the IV plus at least one full padded block.
    if payload.len() < 2 * BLOCK_LEN || payload.len() % BLOCK_LEN != 0 {
        return Err(Error::DecryptionFailed);
    }
    let (iv, body) = payload.split_at(BLOCK_LEN);

    let plaintext = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|_| Error::DecryptionFailed)?
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map_err(|_| Error::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| Error::DecryptionFailed)
}
