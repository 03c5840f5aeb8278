//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! # Pixelseal Core
//!
//! Primitives for the `.pxl` container format: a tamper-evident,
//! authenticated, encrypted container for a single image payload and its
//! descriptive metadata.
//!
//! A `.pxl` file lets a verifier confirm that the payload originated from the
//! holder of a specific Ed25519 signing key, detect any modification of the
//! payload or metadata at 256 KiB chunk granularity via a BLAKE3 Merkle tree,
//! and decrypt the payload with a key derived from the signed manifest.
//!
//! ## Quick start
//!
//! ```rust
//! use pixelseal_core::{generate_keypair, pack_bytes, read_pxl_bytes, verify_pxl_bytes};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), pixelseal_core::PxlError> {
//! let keypair = generate_keypair();
//! let image = b"raw image bytes";
//!
//! let packed = pack_bytes(image, json!({"format": "PNG"}), keypair.seed())?;
//!
//! assert!(verify_pxl_bytes(&packed, keypair.public()));
//! let (decrypted, manifest) = read_pxl_bytes(&packed)?;
//! assert_eq!(decrypted, image);
//! assert_eq!(manifest.num_chunks, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Confidentiality model
//!
//! The AEAD key is derived deterministically from the canonical manifest,
//! and the manifest is stored in cleartext inside the file. Anyone holding
//! the complete file can therefore derive the key and decrypt the payload.
//! Encryption here exists chiefly to bind the ciphertext to the manifest:
//! any manifest mutation changes the derived key and breaks decryption,
//! independently of the Ed25519 signature. The encrypted blob WITHOUT its
//! trailer is useless, which is what the format promises — not secrecy
//! against a file-possessor.
//!
//! ## Modules
//!
//! - [`canonical`] - deterministic JSON rendering of the manifest
//! - [`chunk`] - fixed-size payload splitting
//! - [`merkle`] - chunk hashing and Merkle root construction
//! - [`crypto`] - Ed25519 signing, XChaCha20-Poly1305, key derivation
//! - [`manifest`] - the signed manifest model
//! - [`format`] - the `.pxl` byte layout and tail-anchored parser
//! - [`pack`] - assembling `.pxl` streams
//! - [`reader`] - reading and verifying `.pxl` streams

pub mod canonical;
pub mod chunk;
pub mod crypto;
pub mod error;
pub mod format;
pub mod manifest;
pub mod merkle;
pub mod pack;
pub mod reader;

pub use canonical::{canonical_json, canonical_json_bytes};
pub use chunk::chunk_bytes;
pub use crypto::{
    decrypt_image, derive_aead_key, encrypt_image, generate_keypair, generate_nonce24,
    sign_manifest, verify_manifest, Keypair, AEAD_KEY_LEN, PUBLIC_KEY_LEN, SEED_LEN,
};
pub use error::PxlError;
pub use format::{
    encode_trailer, split_pxl, Trailer, CHUNK_SIZE, FOOTER, MAGIC, NONCE_LEN, SIGNATURE_LEN,
    TAG_LEN, VERSION,
};
pub use manifest::Manifest;
pub use merkle::{build_merkle_tree, hash_chunk, root_from_hashes, verify_chunk};
pub use pack::{pack_bytes, pack_image};
pub use reader::{read_pxl, read_pxl_bytes, verify_pxl, verify_pxl_bytes};
