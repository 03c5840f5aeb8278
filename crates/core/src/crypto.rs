//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! Cryptographic primitives: Ed25519 signing, XChaCha20-Poly1305 payload
//! encryption, and manifest-derived AEAD key derivation.

use aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand_core::{OsRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

use crate::error::PxlError;
use crate::format::{NONCE_LEN, SIGNATURE_LEN};

/// Ed25519 private seed length.
pub const SEED_LEN: usize = 32;
/// Ed25519 public key length.
pub const PUBLIC_KEY_LEN: usize = 32;
/// XChaCha20-Poly1305 key length.
pub const AEAD_KEY_LEN: usize = 32;

/// Domain suffix appended to the canonical manifest when deriving the AEAD key.
const KEY_DERIVATION_SUFFIX: &[u8] = b"pxl-aead-key";

/// Ed25519 signing keypair.
///
/// The private seed is zeroized when the keypair is dropped.
pub struct Keypair {
    public: [u8; PUBLIC_KEY_LEN],
    seed: [u8; SEED_LEN],
}

impl Drop for Keypair {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

impl Keypair {
    /// Generate a fresh random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let public = signing_key.verifying_key().to_bytes();
        let seed = signing_key.to_bytes();
        Self { public, seed }
    }

    /// Build a keypair from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self, PxlError> {
        let seed: [u8; SEED_LEN] = seed.try_into().map_err(|_| {
            PxlError::KeyFormat(format!("signing seed must be {SEED_LEN} bytes"))
        })?;

        let signing_key = SigningKey::from_bytes(&seed);
        let public = signing_key.verifying_key().to_bytes();
        Ok(Self { public, seed })
    }

    /// The raw 32-byte public key.
    pub fn public(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.public
    }

    /// The raw 32-byte private seed. Callers persisting this are responsible
    /// for wiping their own copies.
    pub fn seed(&self) -> &[u8; SEED_LEN] {
        &self.seed
    }

    /// Sign a message with this keypair.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LEN] {
        let signing_key = SigningKey::from_bytes(&self.seed);
        signing_key.sign(message).to_bytes()
    }
}

/// Generate a fresh random signing keypair.
pub fn generate_keypair() -> Keypair {
    Keypair::generate()
}

/// Sign canonical manifest bytes with a raw 32-byte seed.
pub fn sign_manifest(
    manifest_bytes: &[u8],
    signing_seed: &[u8],
) -> Result<[u8; SIGNATURE_LEN], PxlError> {
    let keypair = Keypair::from_seed(signing_seed)?;
    Ok(keypair.sign(manifest_bytes))
}

/// Verify a manifest signature with a raw 32-byte public key.
///
/// Malformed keys or signatures are verification failures, never errors.
pub fn verify_manifest(manifest_bytes: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    let public_key: [u8; PUBLIC_KEY_LEN] = match public_key.try_into() {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let verifying_key = match VerifyingKey::from_bytes(&public_key) {
        Ok(key) => key,
        Err(_) => return false,
    };
    let signature: [u8; SIGNATURE_LEN] = match signature.try_into() {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    verifying_key
        .verify(manifest_bytes, &Signature::from_bytes(&signature))
        .is_ok()
}

/// Generate a 24-byte nonce for XChaCha20-Poly1305.
pub fn generate_nonce24() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Derive the 32-byte AEAD key from the canonical manifest bytes.
///
/// `key = BLAKE3-XOF(manifest_bytes || "pxl-aead-key")[0..32]`. The key is a
/// deterministic function of the manifest: any manifest mutation yields a
/// different key and therefore an authentication failure at decrypt,
/// independent of the Ed25519 signature. Since the manifest travels in
/// cleartext inside the file, possession of the file implies the ability to
/// derive this key; see the crate docs for the confidentiality model.
pub fn derive_aead_key(manifest_bytes: &[u8]) -> Zeroizing<[u8; AEAD_KEY_LEN]> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(manifest_bytes);
    hasher.update(KEY_DERIVATION_SUFFIX);

    let mut key = Zeroizing::new([0u8; AEAD_KEY_LEN]);
    hasher.finalize_xof().fill(&mut key[..]);
    key
}

/// Encrypt the payload with XChaCha20-Poly1305 (empty associated data).
///
/// The 16-byte authentication tag is appended to the ciphertext.
pub fn encrypt_image(
    key: &[u8; AEAD_KEY_LEN],
    nonce24: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, PxlError> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    let nonce = XNonce::from_slice(nonce24);

    cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| PxlError::structural("XChaCha20-Poly1305 encryption failed"))
}

/// Decrypt the payload, failing on any tag mismatch.
pub fn decrypt_image(
    key: &[u8; AEAD_KEY_LEN],
    nonce24: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, PxlError> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    let nonce = XNonce::from_slice(nonce24);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| PxlError::AeadAuthFailed)
}
