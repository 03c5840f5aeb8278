//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! Metadata mapping construction for packing.
//!
//! The core consumes an opaque mapping; this module supplies one built from
//! basic file facts. Image-format introspection (EXIF and friends) is a
//! separate concern and deliberately absent here.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

/// Build a metadata mapping from file facts: name, byte length, and
/// modification time (RFC 3339, UTC) when the filesystem provides one.
pub fn file_metadata(path: &Path) -> Result<Value> {
    let stat = fs::metadata(path)
        .with_context(|| format!("failed to stat input file '{}'", path.display()))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut metadata = json!({
        "file_name": file_name,
        "byte_length": stat.len(),
        "source": "file",
    });

    if let Ok(modified) = stat.modified() {
        let modified: DateTime<Utc> = modified.into();
        metadata["modified_at"] =
            Value::String(modified.to_rfc3339_opts(SecondsFormat::Secs, true));
    }

    Ok(metadata)
}
