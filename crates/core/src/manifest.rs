//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! The `.pxl` manifest: the signed description of one image payload.

use serde::Serialize;
use serde_json::Value;

use crate::canonical::canonical_json_bytes;
use crate::error::PxlError;

const MANIFEST_KEYS: [&str; 6] = [
    "metadata",
    "chunk_hashes",
    "merkle_root",
    "chunk_size",
    "total_size",
    "num_chunks",
];

/// Manifest describing one packed image.
///
/// Exactly six keys; the metadata mapping is carried opaquely and never
/// interpreted by the core.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub metadata: Value,
    pub chunk_hashes: Vec<String>,
    pub merkle_root: String,
    pub chunk_size: u64,
    pub total_size: u64,
    pub num_chunks: u64,
}

impl Manifest {
    /// Build a manifest from freshly computed chunk data.
    ///
    /// `metadata` must be a JSON object (a mapping); the core does not look
    /// inside it.
    pub fn new(
        metadata: Value,
        chunk_hashes: Vec<String>,
        merkle_root: String,
        chunk_size: u64,
        total_size: u64,
    ) -> Result<Self, PxlError> {
        if !metadata.is_object() {
            return Err(PxlError::MetadataNotSerializable(
                "metadata must be a JSON object".to_string(),
            ));
        }

        let num_chunks = chunk_hashes.len() as u64;
        let manifest = Self {
            metadata,
            chunk_hashes,
            merkle_root,
            chunk_size,
            total_size,
            num_chunks,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    /// Canonical manifest bytes: the signing and key-derivation input.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, PxlError> {
        let value = serde_json::to_value(self)
            .map_err(|e| PxlError::MetadataNotSerializable(e.to_string()))?;
        Ok(canonical_json_bytes(&value))
    }

    /// Parse and structurally validate manifest bytes from a file trailer.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PxlError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(&value)
    }

    /// Build a manifest from a parsed JSON value, checking the schema.
    pub fn from_value(value: &Value) -> Result<Self, PxlError> {
        let object = value
            .as_object()
            .ok_or_else(|| PxlError::structural("manifest is not a JSON object"))?;

        for key in object.keys() {
            if !MANIFEST_KEYS.contains(&key.as_str()) {
                return Err(PxlError::structural(format!(
                    "unexpected manifest key: {key}"
                )));
            }
        }

        let metadata = require(object, "metadata")?;
        if !metadata.is_object() {
            return Err(PxlError::structural("manifest metadata is not an object"));
        }

        let chunk_hashes = require(object, "chunk_hashes")?
            .as_array()
            .ok_or_else(|| PxlError::structural("chunk_hashes is not an array"))?
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| PxlError::structural("chunk_hashes entry is not a string"))
            })
            .collect::<Result<Vec<String>, PxlError>>()?;

        let merkle_root = require(object, "merkle_root")?
            .as_str()
            .ok_or_else(|| PxlError::structural("merkle_root is not a string"))?
            .to_owned();

        let manifest = Self {
            metadata: metadata.clone(),
            chunk_hashes,
            merkle_root,
            chunk_size: require_u64(object, "chunk_size")?,
            total_size: require_u64(object, "total_size")?,
            num_chunks: require_u64(object, "num_chunks")?,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    /// Internal consistency checks on the declared fields.
    ///
    /// These are purely structural; comparing the recorded hashes against a
    /// decrypted payload is the verifier's job.
    fn validate(&self) -> Result<(), PxlError> {
        if self.chunk_size == 0 {
            return Err(PxlError::structural("chunk_size must be non-zero"));
        }
        if self.total_size == 0 {
            return Err(PxlError::structural("total_size must be non-zero"));
        }
        if self.num_chunks != self.chunk_hashes.len() as u64 {
            return Err(PxlError::structural(format!(
                "num_chunks is {} but {} chunk hashes are recorded",
                self.num_chunks,
                self.chunk_hashes.len()
            )));
        }

        let expected_chunks = self.total_size.div_ceil(self.chunk_size);
        if self.num_chunks != expected_chunks {
            return Err(PxlError::structural(format!(
                "num_chunks is {} but total_size/chunk_size implies {expected_chunks}",
                self.num_chunks
            )));
        }

        for hash in self.chunk_hashes.iter().chain([&self.merkle_root]) {
            if !is_hex_digest(hash) {
                return Err(PxlError::structural(format!(
                    "malformed hash in manifest: {hash}"
                )));
            }
        }

        Ok(())
    }
}

fn require<'a>(
    object: &'a serde_json::Map<String, Value>,
    key: &str,
) -> Result<&'a Value, PxlError> {
    object
        .get(key)
        .ok_or_else(|| PxlError::structural(format!("missing manifest key: {key}")))
}

fn require_u64(object: &serde_json::Map<String, Value>, key: &str) -> Result<u64, PxlError> {
    require(object, key)?
        .as_u64()
        .ok_or_else(|| PxlError::structural(format!("{key} is not an unsigned integer")))
}

fn is_hex_digest(s: &str) -> bool {
    s.len() == 64
        && s.chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}
