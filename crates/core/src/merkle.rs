//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! Merkle tree construction over payload chunks.
//!
//! Leaves are BLAKE3 hashes of the chunks, hex-encoded. Parent nodes hash the
//! concatenated HEX STRINGS of their children, not the raw 32-byte digests;
//! the wire format is committed to that encoding, and changing it would
//! require a new VERSION byte. Odd levels duplicate their last node.

use crate::error::PxlError;

/// Hex-encoded BLAKE3 hash of one chunk (64 lowercase characters).
pub fn hash_chunk(data: &[u8]) -> String {
    hex::encode(blake3::hash(data).as_bytes())
}

/// Check one chunk against its recorded hash.
pub fn verify_chunk(chunk: &[u8], expected_hash: &str) -> bool {
    hash_chunk(chunk) == expected_hash
}

/// Hash all chunks and reduce to the Merkle root.
///
/// Returns `(merkle_root, chunk_hashes)` with `chunk_hashes` in chunk order.
/// For a single chunk the root equals that chunk's hash.
pub fn build_merkle_tree(chunks: &[&[u8]]) -> Result<(String, Vec<String>), PxlError> {
    let chunk_hashes: Vec<String> = chunks.iter().map(|chunk| hash_chunk(chunk)).collect();
    let root = root_from_hashes(&chunk_hashes)?;
    Ok((root, chunk_hashes))
}

/// Reduce an existing chunk-hash list to its Merkle root.
///
/// Used by the verifier to rebuild the root from the manifest's recorded
/// hashes without touching the payload again.
pub fn root_from_hashes(chunk_hashes: &[String]) -> Result<String, PxlError> {
    if chunk_hashes.is_empty() {
        return Err(PxlError::EmptyPayload);
    }

    let mut level: Vec<String> = chunk_hashes.to_vec();

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));

        for pair in level.chunks(2) {
            let left = &pair[0];
            // Odd node count: duplicate the last node.
            let right = pair.get(1).unwrap_or(left);

            let mut hasher = blake3::Hasher::new();
            hasher.update(left.as_bytes());
            hasher.update(right.as_bytes());
            next.push(hex::encode(hasher.finalize().as_bytes()));
        }

        level = next;
    }

    Ok(level.swap_remove(0))
}
