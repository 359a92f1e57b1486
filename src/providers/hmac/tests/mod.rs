// Copyright (C) Microsoft Corporation. All rights reserved.

use super::*;
use crate::ctx::{mac_oneshot_vec, MacCtx};
use testvectors::HMAC_RFC4231_TEST_VECTORS;


#[test]
fn test_hmac_sha256_rfc4231_oneshot() {
    for vector in HMAC_RFC4231_TEST_VECTORS {
        let algo = HmacAlgo::sha256();
        let tag = mac_oneshot_vec(&algo, vector.key, vector.msg).expect("hmac sha256 oneshot");
        assert_eq!(
            tag, vector.mac_sha256,
            "HMAC-SHA256 RFC 4231 case {} mismatch",
            vector.case_id
        );
    }
}

#[test]
fn test_hmac_sha512_rfc4231_oneshot() {
    for vector in HMAC_RFC4231_TEST_VECTORS {
        let algo = HmacAlgo::sha512();
        let tag = mac_oneshot_vec(&algo, vector.key, vector.msg).expect("hmac sha512 oneshot");
        assert_eq!(
            tag, vector.mac_sha512,
            "HMAC-SHA512 RFC 4231 case {} mismatch",
            vector.case_id
        );
    }
}

#[test]
fn test_hmac_sha256_rfc4231_streaming() {
    for vector in HMAC_RFC4231_TEST_VECTORS {
        let algo = HmacAlgo::sha256();
        let mut ctx = MacCtx::new(&algo).expect("create hmac sha256");
        ctx.init().expect("init hmac sha256");
        ctx.ctrl(MacControl::SetKey(vector.key)).expect("set key");
        let mid = vector.msg.len() / 2;
        ctx.update(&vector.msg[..mid]).expect("update part1");
        ctx.update(&vector.msg[mid..]).expect("update part2");
        let mut tag = [0u8; 32];
        let len = ctx.finalize(Some(&mut tag)).expect("final hmac sha256");
        assert_eq!(len, 32);
        assert_eq!(
            tag.as_slice(),
            vector.mac_sha256,
            "HMAC-SHA256 RFC 4231 case {} streaming mismatch",
            vector.case_id
        );
    }
}

#[test]
fn test_hmac_sha384_matches_backing_impl() {
    let key = b"sha384 consistency key";
    let msg = b"The quick brown fox jumps over the lazy dog";

    let mut reference = Hmac::<Sha384>::new_from_slice(key).expect("reference key");
    reference.update(msg);
    let expected = reference.finalize().into_bytes();

    let algo = HmacAlgo::sha384();
    let tag = mac_oneshot_vec(&algo, key, msg).expect("hmac sha384 oneshot");
    assert_eq!(tag, expected.to_vec());
}

#[test]
fn test_hmac_accepts_long_keys() {
    // Keys longer than the hash block are hashed down per RFC 2104; the
    // set-key command must not reject them.
    let key = [0xAAu8; 131];
    let algo = HmacAlgo::sha256();
    let streamed = mac_oneshot_vec(&algo, &key, b"long key message").expect("long key oneshot");
    assert_eq!(streamed.len(), 32);
}

#[test]
fn test_hmac_hexkey_string_control() {
    let algo = HmacAlgo::sha256();
    let mut ctx = MacCtx::new(&algo).expect("create hmac sha256");
    ctx.init().expect("init");
    ctx.ctrl_str("hexkey", "0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b")
        .expect("hexkey control");
    ctx.update(b"Hi There").expect("update");
    let tag = ctx.finalize_vec().expect("final");
    assert_eq!(tag, HMAC_RFC4231_TEST_VECTORS[0].mac_sha256);

    assert_eq!(ctx.ctrl_str("hexkey", "zz"), Err(MacError::HexDecode));
    assert_eq!(ctx.ctrl_str("cipher", "aes"), Err(MacError::NotSupported));
}

#[test]
fn test_hmac_rekey_restarts_computation() {
    let algo = HmacAlgo::sha256();
    let mut ctx = MacCtx::new(&algo).expect("create hmac sha256");
    ctx.init().expect("init");
    ctx.ctrl(MacControl::SetKey(b"first key")).expect("set first key");
    ctx.update(b"bytes fed under the first key").expect("update");

    // Re-keying discards the running computation entirely.
    ctx.ctrl(MacControl::SetKey(b"second key")).expect("set second key");
    ctx.update(b"abc").expect("update after rekey");
    let tag = ctx.finalize_vec().expect("final");
    assert_eq!(
        tag,
        mac_oneshot_vec(&algo, b"second key", b"abc").expect("oneshot")
    );
}

#[test]
fn test_hmac_rejects_iv_control() {
    let algo = HmacAlgo::sha512();
    let mut ctx = MacCtx::new(&algo).expect("create hmac sha512");
    assert_eq!(ctx.ctrl(MacControl::SetIv(b"nonce")), Err(MacError::NotSupported));
}
