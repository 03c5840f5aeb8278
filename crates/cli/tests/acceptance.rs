//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

// Allow deprecated cargo_bin usage - the replacement cargo_bin_cmd! macro
// is not yet stable across all assert_cmd versions
#![allow(deprecated)]

use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn write_sample_image(dir: &Path) -> PathBuf {
    let input_path = dir.join("photo.png");
    let data: Vec<u8> = (0..8192).map(|i| (i % 253) as u8).collect();
    fs::write(&input_path, data).unwrap();
    input_path
}

fn pack_sample(tempdir: &TempDir) -> (PathBuf, PathBuf) {
    let input = write_sample_image(tempdir.path());
    let output = tempdir.path().join("photo.pxl");

    Command::cargo_bin("pxl")
        .unwrap()
        .current_dir(tempdir.path())
        .args([
            "pack",
            "--in",
            input.to_str().unwrap(),
            "--out",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("Packed:"));

    let public_key = tempdir.path().join("public_key.bin");
    assert!(public_key.exists());
    (output, public_key)
}

fn run_verify(archive: &Path, public_key: &Path) -> assert_cmd::assert::Assert {
    Command::cargo_bin("pxl")
        .unwrap()
        .args([
            "verify",
            archive.to_str().unwrap(),
            "--public-key",
            public_key.to_str().unwrap(),
        ])
        .assert()
}

#[test]
fn acceptance_keygen_writes_raw_key_files() {
    let tempdir = TempDir::new().unwrap();

    Command::cargo_bin("pxl")
        .unwrap()
        .args(["keygen", "--out", tempdir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Signing key:"));

    let signing = fs::read(tempdir.path().join("signing_key.bin")).unwrap();
    let public = fs::read(tempdir.path().join("public_key.bin")).unwrap();
    assert_eq!(signing.len(), 32);
    assert_eq!(public.len(), 32);
}

#[test]
fn acceptance_pack_verify_happy_path() {
    let tempdir = TempDir::new().unwrap();
    let (archive, public_key) = pack_sample(&tempdir);

    run_verify(&archive, &public_key)
        .success()
        .stdout(contains("Verification: PASS"));
}

#[test]
fn acceptance_pack_with_existing_key() {
    let tempdir = TempDir::new().unwrap();
    let keydir = tempdir.path().join("keys");

    Command::cargo_bin("pxl")
        .unwrap()
        .args(["keygen", "--out", keydir.to_str().unwrap()])
        .assert()
        .success();

    let input = write_sample_image(tempdir.path());
    let output = tempdir.path().join("photo.pxl");

    Command::cargo_bin("pxl")
        .unwrap()
        .args([
            "pack",
            "--in",
            input.to_str().unwrap(),
            "--out",
            output.to_str().unwrap(),
            "--key",
            keydir.join("signing_key.bin").to_str().unwrap(),
        ])
        .assert()
        .success();

    run_verify(&output, &keydir.join("public_key.bin")).success();
}

#[test]
fn acceptance_unpack_round_trip() {
    let tempdir = TempDir::new().unwrap();
    let (archive, _) = pack_sample(&tempdir);
    let restored = tempdir.path().join("restored.png");

    Command::cargo_bin("pxl")
        .unwrap()
        .args([
            "unpack",
            "--in",
            archive.to_str().unwrap(),
            "--out",
            restored.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("Unpacked:"));

    let original = fs::read(tempdir.path().join("photo.png")).unwrap();
    assert_eq!(fs::read(&restored).unwrap(), original);
}

#[test]
fn acceptance_tampered_file_fails_with_exit_10() {
    let tempdir = TempDir::new().unwrap();
    let (archive, public_key) = pack_sample(&tempdir);

    let mut bytes = fs::read(&archive).unwrap();
    bytes[0] ^= 0x01;
    fs::write(&archive, bytes).unwrap();

    run_verify(&archive, &public_key)
        .failure()
        .code(10)
        .stdout(contains("Verification: FAIL"));
}

#[test]
fn acceptance_wrong_public_key_fails() {
    let tempdir = TempDir::new().unwrap();
    let (archive, _) = pack_sample(&tempdir);

    let other_keys = tempdir.path().join("other");
    Command::cargo_bin("pxl")
        .unwrap()
        .args(["keygen", "--out", other_keys.to_str().unwrap()])
        .assert()
        .success();

    run_verify(&archive, &other_keys.join("public_key.bin"))
        .failure()
        .code(10);
}

#[test]
fn acceptance_verify_json_report() {
    let tempdir = TempDir::new().unwrap();
    let (archive, public_key) = pack_sample(&tempdir);

    Command::cargo_bin("pxl")
        .unwrap()
        .args([
            "verify",
            archive.to_str().unwrap(),
            "--public-key",
            public_key.to_str().unwrap(),
            "--json",
        ])
        .assert()
        .success()
        .stdout(contains("\"verified\":true"));
}

#[test]
fn acceptance_inspect_shows_manifest_facts() {
    let tempdir = TempDir::new().unwrap();
    let (archive, _) = pack_sample(&tempdir);

    Command::cargo_bin("pxl")
        .unwrap()
        .args(["inspect", archive.to_str().unwrap(), "--json"])
        .assert()
        .success()
        .stdout(contains("\"num_chunks\": 1"))
        .stdout(contains("\"file_name\": \"photo.png\""));
}

#[test]
fn acceptance_truncated_file_fails_verify_and_unpack() {
    let tempdir = TempDir::new().unwrap();
    let (archive, public_key) = pack_sample(&tempdir);

    let bytes = fs::read(&archive).unwrap();
    fs::write(&archive, &bytes[..bytes.len() - 4]).unwrap();

    run_verify(&archive, &public_key).failure().code(10);

    Command::cargo_bin("pxl")
        .unwrap()
        .args([
            "unpack",
            "--in",
            archive.to_str().unwrap(),
            "--out",
            tempdir.path().join("out.png").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("error:"));
}
