// Copyright (C) Microsoft Corporation. All rights reserved.

use super::*;
use crate::ctx::{mac_oneshot, mac_oneshot_vec, MacCtx};
use testvectors::CMAC_AES_TEST_VECTORS;


#[test]
fn test_cmac_aes_vectors_oneshot() {
    for vector in CMAC_AES_TEST_VECTORS {
        let algo = CmacAlgo::new();
        let tag = mac_oneshot_vec(&algo, vector.key, vector.msg).expect("cmac oneshot");
        assert_eq!(
            tag,
            vector.mac,
            "CMAC-AES{} example {} mismatch",
            vector.key.len() * 8,
            vector.case_id
        );
    }
}

#[test]
fn test_cmac_aes_vectors_streaming() {
    for vector in CMAC_AES_TEST_VECTORS {
        let algo = CmacAlgo::new();
        let mut ctx = MacCtx::new(&algo).expect("create cmac");
        ctx.init().expect("init cmac");
        ctx.ctrl(MacControl::SetKey(vector.key)).expect("set key");
        // Uneven chunking across block boundaries.
        for chunk in vector.msg.chunks(7) {
            ctx.update(chunk).expect("update cmac");
        }
        let mut tag = [0u8; 16];
        let len = ctx.finalize(Some(&mut tag)).expect("final cmac");
        assert_eq!(len, 16);
        assert_eq!(
            tag.as_slice(),
            vector.mac,
            "CMAC-AES{} example {} streaming mismatch",
            vector.key.len() * 8,
            vector.case_id
        );
    }
}

#[test]
fn test_cmac_rejects_bad_key_lengths() {
    let algo = CmacAlgo::new();
    for len in [0usize, 5, 15, 17, 31, 33] {
        let key = vec![0u8; len];
        assert_eq!(
            mac_oneshot(&algo, &key, b"abc", None),
            Err(MacError::InvalidKeySize),
            "key length {len} must be rejected"
        );
    }
}

#[test]
fn test_cmac_rejected_rekey_preserves_computation() {
    let vector = &CMAC_AES_TEST_VECTORS[2];
    let algo = CmacAlgo::new();
    let mut ctx = MacCtx::new(&algo).expect("create cmac");
    ctx.init().expect("init cmac");
    ctx.ctrl(MacControl::SetKey(vector.key)).expect("set key");
    ctx.update(&vector.msg[..11]).expect("update part1");

    // A rejected key is a recoverable failure; the installed key and the
    // running computation stay intact.
    assert_eq!(
        ctx.ctrl(MacControl::SetKey(b"wrong size")),
        Err(MacError::InvalidKeySize)
    );

    ctx.update(&vector.msg[11..]).expect("update part2");
    let tag = ctx.finalize_vec().expect("final cmac");
    assert_eq!(tag, vector.mac);
}

#[test]
fn test_cmac_hexkey_string_control() {
    let vector = &CMAC_AES_TEST_VECTORS[0];
    let algo = CmacAlgo::new();
    let mut ctx = MacCtx::new(&algo).expect("create cmac");
    ctx.init().expect("init cmac");
    ctx.ctrl_str("hexkey", "2b7e151628aed2a6abf7158809cf4f3c")
        .expect("hexkey control");
    let tag = ctx.finalize_vec().expect("final cmac");
    assert_eq!(tag, vector.mac);

    assert_eq!(
        ctx.ctrl_str("hexkey", "2b7e"),
        Err(MacError::InvalidKeySize)
    );
    assert_eq!(ctx.ctrl_str("cipher", "aes"), Err(MacError::NotSupported));
}

#[test]
fn test_cmac_rejects_flags_control() {
    let algo = CmacAlgo::new();
    let mut ctx = MacCtx::new(&algo).expect("create cmac");
    assert_eq!(ctx.ctrl(MacControl::SetFlags(1)), Err(MacError::NotSupported));
}
