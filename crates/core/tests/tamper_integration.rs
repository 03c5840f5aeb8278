//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! Tamper-detection integration tests: any mutation of a packed file must
//! fail verification.

use pixelseal_core::{
    pack_bytes, read_pxl_bytes, split_pxl, verify_pxl_bytes, Keypair, PxlError, MAGIC,
};
use serde_json::json;

fn packed_sample(keypair: &Keypair) -> Vec<u8> {
    pack_bytes(
        b"sample image payload for tamper tests",
        json!({"format": "PNG", "width": 64}),
        keypair.seed(),
    )
    .unwrap()
}

#[test]
fn test_ciphertext_flip_fails_verification() {
    let keypair = Keypair::generate();
    let mut packed = packed_sample(&keypair);

    // Byte 0 sits in the encrypted region; the AEAD tag catches it.
    packed[0] ^= 0x01;
    assert!(!verify_pxl_bytes(&packed, keypair.public()));
    assert!(matches!(
        read_pxl_bytes(&packed),
        Err(PxlError::AeadAuthFailed)
    ));
}

#[test]
fn test_manifest_flip_fails_verification() {
    let keypair = Keypair::generate();
    let mut packed = packed_sample(&keypair);

    // Locate the manifest region behind the trailer anchor and flip one byte
    // inside it (the signature check trips before anything else can).
    let magic_pos = packed
        .windows(MAGIC.len())
        .rposition(|w| w == MAGIC)
        .unwrap();
    let manifest_start = magic_pos + 4 + 1 + 4;
    packed[manifest_start + 1] ^= 0x01;

    assert!(!verify_pxl_bytes(&packed, keypair.public()));
}

#[test]
fn test_signature_flip_fails_verification() {
    let keypair = Keypair::generate();
    let mut packed = packed_sample(&keypair);

    let (_, trailer) = split_pxl(&packed).unwrap();
    let magic_pos = packed
        .windows(MAGIC.len())
        .rposition(|w| w == MAGIC)
        .unwrap();
    let signature_start = magic_pos + 4 + 1 + 4 + trailer.manifest_bytes.len();
    packed[signature_start] ^= 0x01;

    assert!(!verify_pxl_bytes(&packed, keypair.public()));
}

#[test]
fn test_nonce_flip_fails_verification() {
    let keypair = Keypair::generate();
    let mut packed = packed_sample(&keypair);

    // The nonce sits 28 bytes before the footer.
    let nonce_start = packed.len() - 4 - 24;
    packed[nonce_start] ^= 0x01;

    assert!(!verify_pxl_bytes(&packed, keypair.public()));
    assert!(matches!(
        read_pxl_bytes(&packed),
        Err(PxlError::AeadAuthFailed)
    ));
}

#[test]
fn test_wrong_public_key_fails_verification() {
    let signer = Keypair::generate();
    let other = Keypair::generate();
    let packed = packed_sample(&signer);

    assert!(verify_pxl_bytes(&packed, signer.public()));
    assert!(!verify_pxl_bytes(&packed, other.public()));
}

#[test]
fn test_truncated_footer_fails() {
    let keypair = Keypair::generate();
    let packed = packed_sample(&keypair);
    let truncated = &packed[..packed.len() - 4];

    assert!(!verify_pxl_bytes(truncated, keypair.public()));
    assert!(matches!(
        read_pxl_bytes(truncated),
        Err(PxlError::Structural(_))
    ));
}

#[test]
fn test_every_single_byte_flip_fails_verification() {
    let keypair = Keypair::generate();
    let packed = packed_sample(&keypair);
    assert!(verify_pxl_bytes(&packed, keypair.public()));

    for offset in 0..packed.len() {
        let mut mutated = packed.clone();
        mutated[offset] ^= 0x01;
        assert!(
            !verify_pxl_bytes(&mutated, keypair.public()),
            "flip at offset {offset} must fail verification"
        );
    }
}

#[test]
fn test_every_truncation_of_trailer_fails() {
    let keypair = Keypair::generate();
    let packed = packed_sample(&keypair);
    let (encrypted, _) = split_pxl(&packed).unwrap();

    for cut in 1..packed.len() - encrypted.len() {
        let truncated = &packed[..packed.len() - cut];
        assert!(
            !verify_pxl_bytes(truncated, keypair.public()),
            "truncation by {cut} bytes must fail verification"
        );
    }
}

#[test]
fn test_appended_bytes_fail() {
    let keypair = Keypair::generate();
    let mut packed = packed_sample(&keypair);
    packed.extend_from_slice(b"extra");

    assert!(!verify_pxl_bytes(&packed, keypair.public()));
}

#[test]
fn test_swapped_trailers_fail() {
    // Splicing the trailer of one file onto the ciphertext of another must
    // fail: the AEAD key derived from manifest A cannot open ciphertext B.
    let keypair = Keypair::generate();
    let packed_a = pack_bytes(b"payload A", json!({}), keypair.seed()).unwrap();
    let packed_b = pack_bytes(b"payload B", json!({}), keypair.seed()).unwrap();

    let (encrypted_a, _) = split_pxl(&packed_a).unwrap();
    let (encrypted_b, _) = split_pxl(&packed_b).unwrap();

    let mut spliced = encrypted_b.to_vec();
    spliced.extend_from_slice(&packed_a[encrypted_a.len()..]);

    assert!(!verify_pxl_bytes(&spliced, keypair.public()));
}
