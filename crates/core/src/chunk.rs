//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! Fixed-size payload chunking.

use crate::error::PxlError;

/// Split a payload into fixed-size chunks.
///
/// Every chunk is exactly `chunk_size` bytes except the last, which may be
/// shorter but never empty. An empty payload is rejected; `chunk_size` comes
/// from an untrusted manifest on the verify path, so zero is rejected as a
/// structural error rather than panicking.
pub fn chunk_bytes(data: &[u8], chunk_size: usize) -> Result<Vec<&[u8]>, PxlError> {
    if data.is_empty() {
        return Err(PxlError::EmptyPayload);
    }
    if chunk_size == 0 {
        return Err(PxlError::structural("chunk size must be non-zero"));
    }

    Ok(data.chunks(chunk_size).collect())
}
