//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! Reading and verifying `.pxl` files.
//!
//! Two entry points share the tail-anchored parse:
//!
//! - [`read_pxl`] decrypts and returns the payload. It relies on the AEAD tag
//!   alone and does NOT verify the Ed25519 signature; binding the manifest to
//!   a specific signer is [`verify_pxl`]'s job.
//! - [`verify_pxl`] performs full verification and returns a bare boolean. It
//!   never raises: every internal failure, of any kind, collapses to `false`
//!   so callers cannot distinguish failure causes.

use std::fs;
use std::path::Path;

use crate::chunk::chunk_bytes;
use crate::crypto::{decrypt_image, derive_aead_key, verify_manifest};
use crate::error::PxlError;
use crate::format::split_pxl;
use crate::manifest::Manifest;
use crate::merkle::build_merkle_tree;

/// Parse and decrypt a `.pxl` byte stream.
pub fn read_pxl_bytes(data: &[u8]) -> Result<(Vec<u8>, Manifest), PxlError> {
    let (encrypted_image, trailer) = split_pxl(data)?;
    let manifest = Manifest::from_slice(&trailer.manifest_bytes)?;

    let key = derive_aead_key(&trailer.manifest_bytes);
    let image_bytes = decrypt_image(&key, &trailer.nonce, encrypted_image)?;

    // The tag authenticates the ciphertext against the manifest-derived key,
    // so a length disagreement means the manifest lies about the payload.
    if image_bytes.len() as u64 != manifest.total_size {
        return Err(PxlError::SizeMismatch {
            expected: manifest.total_size,
            found: image_bytes.len() as u64,
        });
    }

    Ok((image_bytes, manifest))
}

/// Read and decrypt a `.pxl` file.
pub fn read_pxl<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, Manifest), PxlError> {
    let data = fs::read(path)?;
    read_pxl_bytes(&data)
}

/// Fully verify a `.pxl` byte stream against a 32-byte Ed25519 public key.
pub fn verify_pxl_bytes(data: &[u8], public_key: &[u8]) -> bool {
    match verify_pxl_inner(data, public_key) {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(error = %err, "pxl verification failed");
            false
        }
    }
}

/// Fully verify a `.pxl` file against a 32-byte Ed25519 public key.
///
/// Never raises; any failure (IO included) is `false`.
pub fn verify_pxl<P: AsRef<Path>>(path: P, public_key: &[u8]) -> bool {
    match fs::read(path) {
        Ok(data) => verify_pxl_bytes(&data, public_key),
        Err(err) => {
            tracing::debug!(error = %err, "pxl verification failed to read file");
            false
        }
    }
}

fn verify_pxl_inner(data: &[u8], public_key: &[u8]) -> Result<(), PxlError> {
    // Structural parse; magic, footer, and version are enforced here.
    let (encrypted_image, trailer) = split_pxl(data)?;
    let manifest = Manifest::from_slice(&trailer.manifest_bytes)?;

    // Signature over the stored manifest bytes, before touching the payload.
    if !verify_manifest(&trailer.manifest_bytes, &trailer.signature, public_key) {
        return Err(PxlError::SignatureInvalid);
    }

    let key = derive_aead_key(&trailer.manifest_bytes);
    let image_bytes = decrypt_image(&key, &trailer.nonce, encrypted_image)?;

    // Re-chunk the plaintext with the manifest's declared chunk size and
    // rebuild the Merkle tree.
    let chunk_size = usize::try_from(manifest.chunk_size)
        .map_err(|_| PxlError::structural("chunk_size exceeds addressable memory"))?;
    let chunks = chunk_bytes(&image_bytes, chunk_size)?;
    let (merkle_root, chunk_hashes) = build_merkle_tree(&chunks)?;

    if chunk_hashes != manifest.chunk_hashes {
        return Err(PxlError::MerkleMismatch(
            "chunk hash list does not match manifest".to_string(),
        ));
    }
    if merkle_root != manifest.merkle_root {
        return Err(PxlError::MerkleMismatch(
            "merkle root does not match manifest".to_string(),
        ));
    }

    // Declared sizes against observed plaintext.
    if manifest.num_chunks != chunk_hashes.len() as u64 {
        return Err(PxlError::SizeMismatch {
            expected: manifest.num_chunks,
            found: chunk_hashes.len() as u64,
        });
    }
    if manifest.total_size != image_bytes.len() as u64 {
        return Err(PxlError::SizeMismatch {
            expected: manifest.total_size,
            found: image_bytes.len() as u64,
        });
    }

    Ok(())
}
