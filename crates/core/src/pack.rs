//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! Packing: assemble a `.pxl` byte stream from an image payload.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::chunk::chunk_bytes;
use crate::crypto::{derive_aead_key, encrypt_image, generate_nonce24, sign_manifest};
use crate::error::PxlError;
use crate::format::{encode_trailer, CHUNK_SIZE};
use crate::manifest::Manifest;
use crate::merkle::build_merkle_tree;

/// Pack an image payload into a `.pxl` byte stream.
///
/// The AEAD key is derived from the canonical manifest, which is stored in
/// cleartext inside the output: encryption binds the ciphertext to the
/// manifest rather than hiding the payload from whoever holds the file. See
/// the crate docs for the confidentiality model.
///
/// The nonce is freshly drawn from the OS random source on every call, so
/// packing the same inputs twice yields different files that both verify.
pub fn pack_bytes(
    image_bytes: &[u8],
    metadata: Value,
    signing_seed: &[u8],
) -> Result<Vec<u8>, PxlError> {
    let chunks = chunk_bytes(image_bytes, CHUNK_SIZE)?;
    let (merkle_root, chunk_hashes) = build_merkle_tree(&chunks)?;

    let manifest = Manifest::new(
        metadata,
        chunk_hashes,
        merkle_root,
        CHUNK_SIZE as u64,
        image_bytes.len() as u64,
    )?;
    let manifest_bytes = manifest.to_canonical_bytes()?;

    let key = derive_aead_key(&manifest_bytes);
    let nonce = generate_nonce24();
    let encrypted_image = encrypt_image(&key, &nonce, image_bytes)?;

    let signature = sign_manifest(&manifest_bytes, signing_seed)?;

    let mut out = encrypted_image;
    out.extend_from_slice(&encode_trailer(&manifest_bytes, &signature, &nonce)?);
    Ok(out)
}

/// Pack an image file into a `.pxl` file.
///
/// The metadata mapping comes from the caller; the core does not extract or
/// interpret image metadata itself.
pub fn pack_image<P: AsRef<Path>>(
    input: P,
    output: P,
    metadata: Value,
    signing_seed: &[u8],
) -> Result<(), PxlError> {
    let image_bytes = fs::read(input)?;
    let packed = pack_bytes(&image_bytes, metadata, signing_seed)?;
    fs::write(output, packed)?;
    Ok(())
}
