//! Encryption/decryption using PBKDF2 + AES-256-GCM
//!
//! This module implements passphrase-based encryption using:
//! - PBKDF2-HMAC-SHA256 for key derivation from passphrase
//! - AES-256-GCM for authenticated encryption
//!
//! The binary format is:
//! - salt: 16 bytes
//! - nonce: 12 bytes
//! - filename length: 1 byte (0-255)
//! - filename: variable length (UTF-8)
//! - ciphertext: variable length (includes 16-byte GCM tag)
//!
//! The filename travels unencrypted and is not covered by the GCM tag;
//! only the ciphertext is authenticated.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{ErrorCategory, ErrorKind, Result, SealboxError};
use crate::kdf::{self, KdfParams, SALT_LEN};

/// Length of nonce in bytes
pub const NONCE_LEN: usize = 12;

/// Fixed header size: salt, nonce, and the filename length byte
const HEADER_LEN: usize = SALT_LEN + NONCE_LEN + 1;

/// Maximum length of the embedded filename in UTF-8 bytes
pub const MAX_FILENAME_LEN: usize = 255;

/// Minimum passphrase length in characters
pub const MIN_PASSPHRASE_CHARS: usize = 8;

/// Plaintext and original filename recovered from a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedFile {
    pub filename: String,
    pub plaintext: Vec<u8>,
}

/// Encrypt plaintext with a passphrase using random salt and nonce
///
/// The original filename is embedded in the container and recovered on
/// decryption. Returns the binary format: salt(16) + nonce(12) +
/// filename length(1) + filename(variable) + ciphertext(variable).
pub fn encrypt(plaintext: &[u8], filename: &str, passphrase: &str) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    encrypt_deterministic(plaintext, filename, passphrase, &salt, &nonce)
}

/// Encrypt plaintext with a passphrase using provided salt and nonce
///
/// This function is ONLY for testing purposes to generate deterministic output.
/// NEVER use this in production - always use `encrypt()` which generates random salt/nonce.
pub fn encrypt_deterministic(
    plaintext: &[u8],
    filename: &str,
    passphrase: &str,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>> {
    // Both validations run before any key derivation or cipher work.
    if passphrase.chars().count() < MIN_PASSPHRASE_CHARS {
        return Err(SealboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::WeakPassphrase,
            format!(
                "passphrase must be at least {} characters",
                MIN_PASSPHRASE_CHARS
            ),
        ));
    }

    let filename_bytes = filename.as_bytes();
    if filename_bytes.len() > MAX_FILENAME_LEN {
        return Err(SealboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::FilenameTooLong,
            format!(
                "filename is {} bytes as UTF-8; the limit is {}",
                filename_bytes.len(),
                MAX_FILENAME_LEN
            ),
        ));
    }

    let key = kdf::derive_key(passphrase.as_bytes(), salt, &KdfParams::default());
    let cipher = Aes256Gcm::new(&key.into());

    let sealed = cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| {
            SealboxError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::CipherFailure,
                format!("encryption failed: {}", e),
            )
        })?;

    let mut container = Vec::with_capacity(HEADER_LEN + filename_bytes.len() + sealed.len());
    container.extend_from_slice(salt);
    container.extend_from_slice(nonce);
    container.push(filename_bytes.len() as u8);
    container.extend_from_slice(filename_bytes);
    container.extend_from_slice(&sealed);

    Ok(container)
}

/// Decrypt a container with a passphrase
///
/// All-or-nothing: a container that fails authentication anywhere yields
/// no plaintext at all. Wrong passphrase, tampered bytes, and truncated
/// ciphertext are reported as one undifferentiated `DecryptionFailed`.
pub fn decrypt(container: &[u8], passphrase: &str) -> Result<DecryptedFile> {
    if container.len() < HEADER_LEN {
        return Err(malformed("input shorter than the fixed header; likely truncated"));
    }

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&container[..SALT_LEN]);

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&container[SALT_LEN..SALT_LEN + NONCE_LEN]);

    let filename_len = container[HEADER_LEN - 1] as usize;
    if container.len() < HEADER_LEN + filename_len {
        return Err(malformed(
            "input too short to hold the embedded filename; likely truncated",
        ));
    }
    let filename_bytes = &container[HEADER_LEN..HEADER_LEN + filename_len];
    let sealed = &container[HEADER_LEN + filename_len..];

    let key = kdf::derive_key(passphrase.as_bytes(), &salt, &KdfParams::default());
    let cipher = Aes256Gcm::new(&key.into());

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce), sealed)
        .map_err(|_| {
            SealboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::DecryptionFailed,
                "corrupt input, tampered-with data, or wrong passphrase",
            )
        })?;

    // The filename is only surfaced once authentication has succeeded.
    let filename = String::from_utf8(filename_bytes.to_vec()).map_err(|e| {
        SealboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::InvalidFilenameEncoding,
            "embedded filename is not valid UTF-8",
            e,
        )
    })?;

    Ok(DecryptedFile {
        filename,
        plaintext,
    })
}

fn malformed(msg: &str) -> SealboxError {
    SealboxError::with_kind(ErrorCategory::User, ErrorKind::MalformedContainer, msg)
}
