//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! Human and JSON reports for verify and inspect.

use anyhow::Result;
use pixelseal_core::Manifest;
use serde::Serialize;
use serde_json::Value;

/// Outcome of `pxl verify`.
///
/// The core collapses every failure cause to a single boolean, so the report
/// carries no failure kind either.
#[derive(Serialize)]
pub struct VerifyReport {
    pub file: String,
    pub verified: bool,
    pub verify_time_ms: u64,
}

impl VerifyReport {
    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string(self)?);
        } else if self.verified {
            println!("Verification: PASS");
        } else {
            println!("Verification: FAIL");
        }
        Ok(())
    }
}

/// Structural facts of a `.pxl` file for `pxl inspect`. Nothing here is
/// authenticated; inspect does not decrypt or check the signature.
#[derive(Serialize)]
pub struct InspectReport {
    pub file: String,
    pub total_size: u64,
    pub chunk_size: u64,
    pub num_chunks: u64,
    pub merkle_root: String,
    pub metadata: Value,
}

impl InspectReport {
    pub fn from_manifest(file: String, manifest: &Manifest) -> Self {
        Self {
            file,
            total_size: manifest.total_size,
            chunk_size: manifest.chunk_size,
            num_chunks: manifest.num_chunks,
            merkle_root: manifest.merkle_root.clone(),
            metadata: manifest.metadata.clone(),
        }
    }

    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
        } else {
            println!("File: {}", self.file);
            println!(
                "Payload: {} bytes in {} chunk(s) of {}",
                self.total_size, self.num_chunks, self.chunk_size
            );
            println!("Merkle root: {}", self.merkle_root);
            println!("Metadata: {}", serde_json::to_string(&self.metadata)?);
        }
        Ok(())
    }
}
