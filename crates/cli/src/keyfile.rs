//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! Raw key file I/O.
//!
//! Keys live on disk as exact 32-byte files, no encoding: `signing_key.bin`
//! holds the Ed25519 seed, `public_key.bin` the public key.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pixelseal_core::Keypair;

pub const SIGNING_KEY_FILE: &str = "signing_key.bin";
pub const PUBLIC_KEY_FILE: &str = "public_key.bin";

/// Load a raw 32-byte key file (seed or public key).
pub fn load_key32(path: &Path) -> Result<[u8; 32]> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read key file '{}'", path.display()))?;

    bytes.as_slice().try_into().map_err(|_| {
        anyhow::anyhow!(
            "key file '{}' must hold exactly 32 bytes, found {}",
            path.display(),
            bytes.len()
        )
    })
}

/// Write a keypair into `dir` as `signing_key.bin` and `public_key.bin`.
///
/// Returns the two paths. The signing key file is created with owner-only
/// permissions where the platform supports it.
pub fn save_keypair(dir: &Path, keypair: &Keypair) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create key directory '{}'", dir.display()))?;

    let signing_path = dir.join(SIGNING_KEY_FILE);
    let public_path = dir.join(PUBLIC_KEY_FILE);

    fs::write(&signing_path, keypair.seed())
        .with_context(|| format!("failed to write '{}'", signing_path.display()))?;
    restrict_permissions(&signing_path)?;

    fs::write(&public_path, keypair.public())
        .with_context(|| format!("failed to write '{}'", public_path.display()))?;

    Ok((signing_path, public_path))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("failed to restrict permissions on '{}'", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
