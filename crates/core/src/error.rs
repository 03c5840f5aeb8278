//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! Error types for the `.pxl` core pipeline.

use thiserror::Error;

/// Errors surfaced by pack and read operations.
///
/// `verify_pxl` never returns this type: it traps every failure and collapses
/// it to a single boolean so callers cannot distinguish failure kinds.
#[derive(Error, Debug)]
pub enum PxlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Structural error: {0}")]
    Structural(String),

    #[error("Image payload is empty")]
    EmptyPayload,

    #[error("Ed25519 signature verification failed")]
    SignatureInvalid,

    #[error("AEAD authentication failed")]
    AeadAuthFailed,

    #[error("Merkle mismatch: {0}")]
    MerkleMismatch(String),

    #[error("Size mismatch: expected {expected}, found {found}")]
    SizeMismatch { expected: u64, found: u64 },

    #[error("Invalid key format: {0}")]
    KeyFormat(String),

    #[error("Metadata not serializable: {0}")]
    MetadataNotSerializable(String),
}

impl PxlError {
    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        PxlError::Structural(msg.into())
    }
}
