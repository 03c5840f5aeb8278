//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! The `.pxl` byte layout.
//!
//! ```text
//! [ ENCRYPTED_IMAGE : L+16 bytes                       ]
//! [ MAGIC           : 4 bytes  = "PXL!"                ]
//! [ VERSION         : 1 byte   = 0x01                  ]
//! [ MANIFEST_LEN    : 4 bytes  unsigned little-endian  ]
//! [ MANIFEST        : MANIFEST_LEN bytes (canonical JSON) ]
//! [ SIGNATURE       : 64 bytes (Ed25519)               ]
//! [ NONCE_LEN       : 1 byte   = 24                    ]
//! [ NONCE           : NONCE_LEN bytes                  ]
//! [ FOOTER          : 4 bytes  = "END!"                ]
//! ```
//!
//! The prefix length is unknown until the manifest length is known, so
//! parsing is tail-anchored: the trailer starts at the LAST occurrence of
//! MAGIC in the file (the encrypted image may coincidentally contain the
//! pattern).

use crate::error::PxlError;

pub const MAGIC: &[u8; 4] = b"PXL!";
pub const FOOTER: &[u8; 4] = b"END!";
pub const VERSION: u8 = 0x01;

/// Fixed chunk size for packing (256 KiB).
pub const CHUNK_SIZE: usize = 256 * 1024;
/// XChaCha20-Poly1305 nonce length.
pub const NONCE_LEN: usize = 24;
/// Ed25519 signature length.
pub const SIGNATURE_LEN: usize = 64;
/// Poly1305 authentication tag length.
pub const TAG_LEN: usize = 16;

/// Parsed trailer of a `.pxl` file.
#[derive(Debug, Clone)]
pub struct Trailer {
    /// Canonical manifest bytes exactly as stored in the file. Signature
    /// verification and key derivation operate on these bytes, never on a
    /// re-serialization.
    pub manifest_bytes: Vec<u8>,
    pub signature: [u8; SIGNATURE_LEN],
    pub nonce: [u8; NONCE_LEN],
}

/// Encode the trailer that follows the encrypted image.
pub fn encode_trailer(
    manifest_bytes: &[u8],
    signature: &[u8; SIGNATURE_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>, PxlError> {
    let manifest_len = u32::try_from(manifest_bytes.len())
        .map_err(|_| PxlError::structural("manifest exceeds u32 length field"))?;

    let mut out = Vec::with_capacity(
        MAGIC.len() + 1 + 4 + manifest_bytes.len() + SIGNATURE_LEN + 1 + NONCE_LEN + FOOTER.len(),
    );
    out.extend_from_slice(MAGIC);
    out.push(VERSION);
    out.extend_from_slice(&manifest_len.to_le_bytes());
    out.extend_from_slice(manifest_bytes);
    out.extend_from_slice(signature);
    out.push(NONCE_LEN as u8);
    out.extend_from_slice(nonce);
    out.extend_from_slice(FOOTER);
    Ok(out)
}

/// Split a `.pxl` byte stream into the encrypted image and its trailer.
///
/// Rejects any layout inconsistency: missing magic or footer, unsupported
/// version, length fields that do not match the file size, or bytes trailing
/// the footer.
pub fn split_pxl(data: &[u8]) -> Result<(&[u8], Trailer), PxlError> {
    let magic_pos = rfind(data, MAGIC)
        .ok_or_else(|| PxlError::structural("magic bytes not found"))?;

    let (encrypted_image, trailer_bytes) = data.split_at(magic_pos);
    let mut reader = TrailerReader::new(trailer_bytes);

    // MAGIC is guaranteed by the anchor; consume it.
    reader.take(MAGIC.len())?;

    let version = reader.take(1)?[0];
    if version != VERSION {
        return Err(PxlError::structural(format!(
            "unsupported version: {version}"
        )));
    }

    let manifest_len = u32::from_le_bytes(
        reader
            .take(4)?
            .try_into()
            .expect("4-byte read yields 4-byte array"),
    ) as usize;
    let manifest_bytes = reader.take(manifest_len)?.to_vec();

    let signature: [u8; SIGNATURE_LEN] = reader
        .take(SIGNATURE_LEN)?
        .try_into()
        .expect("fixed-size read");

    let nonce_len = reader.take(1)?[0] as usize;
    if nonce_len != NONCE_LEN {
        return Err(PxlError::structural(format!(
            "nonce length must be {NONCE_LEN}, found {nonce_len}"
        )));
    }
    let nonce: [u8; NONCE_LEN] = reader.take(NONCE_LEN)?.try_into().expect("fixed-size read");

    let footer = reader.take(FOOTER.len())?;
    if footer != FOOTER {
        return Err(PxlError::structural("missing footer"));
    }
    if !reader.is_empty() {
        return Err(PxlError::structural("trailing bytes after footer"));
    }

    Ok((
        encrypted_image,
        Trailer {
            manifest_bytes,
            signature,
            nonce,
        },
    ))
}

/// Byte offset of the last occurrence of `needle` in `haystack`.
fn rfind(haystack: &[u8], needle: &[u8; 4]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// Bounds-checked sequential reader over the trailer region.
struct TrailerReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> TrailerReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], PxlError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| PxlError::structural("truncated trailer"))?;

        let slice = &self.buf[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn is_empty(&self) -> bool {
        self.offset == self.buf.len()
    }
}
