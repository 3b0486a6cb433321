// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! HmacBinding component (spec §4.4): generates and verifies the HMAC
//! tags carried in KEY_EXCHANGE_RSP, FINISH/FINISH_RSP, and their PSK
//! counterparts. Every function takes the already-derived handshake
//! secret; key derivation from the shared DHE/PSK secret is a
//! `CryptoProvider`/session-establishment concern outside this
//! component's scope (spec §4.4 Non-goals).

use crate::crypto::CryptoProvider;
use crate::error::SpdmResult;
use crate::protocol::common_struct::SpdmDigestStruct;
use crate::protocol::SpdmBaseHashAlgo;

fn log_verify_outcome(tag: &str, result: &SpdmResult<()>) {
    match result {
        Ok(()) => log::trace!("{tag} HMAC verified"),
        Err(e) => log::warn!("{tag} HMAC verification failed: {e}"),
    }
}

pub fn generate_key_exchange_rsp_hmac(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    handshake_secret: &[u8],
    th1: &SpdmDigestStruct,
) -> SpdmResult<SpdmDigestStruct> {
    crypto.hmac(hash_algo, handshake_secret, th1.as_ref())
}

pub fn verify_key_exchange_rsp_hmac(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    handshake_secret: &[u8],
    th1: &SpdmDigestStruct,
    tag: &SpdmDigestStruct,
) -> SpdmResult<()> {
    let result = crypto.hmac_verify(hash_algo, handshake_secret, th1.as_ref(), tag.as_ref());
    log_verify_outcome("KEY_EXCHANGE_RSP", &result);
    result
}

pub fn generate_finish_req_hmac(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    requester_handshake_secret: &[u8],
    th1: &SpdmDigestStruct,
) -> SpdmResult<SpdmDigestStruct> {
    crypto.hmac(hash_algo, requester_handshake_secret, th1.as_ref())
}

pub fn verify_finish_req_hmac(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    requester_handshake_secret: &[u8],
    th1: &SpdmDigestStruct,
    tag: &SpdmDigestStruct,
) -> SpdmResult<()> {
    let result = crypto.hmac_verify(hash_algo, requester_handshake_secret, th1.as_ref(), tag.as_ref());
    log_verify_outcome("FINISH req", &result);
    result
}

pub fn generate_finish_rsp_hmac(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    responder_handshake_secret: &[u8],
    th2: &SpdmDigestStruct,
) -> SpdmResult<SpdmDigestStruct> {
    crypto.hmac(hash_algo, responder_handshake_secret, th2.as_ref())
}

pub fn verify_finish_rsp_hmac(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    responder_handshake_secret: &[u8],
    th2: &SpdmDigestStruct,
    tag: &SpdmDigestStruct,
) -> SpdmResult<()> {
    let result = crypto.hmac_verify(hash_algo, responder_handshake_secret, th2.as_ref(), tag.as_ref());
    log_verify_outcome("FINISH_RSP", &result);
    result
}

/// PSK_EXCHANGE_RSP's `responder_verify_data` is computed exactly like
/// `key_exchange_rsp_hmac`, just keyed off the PSK-derived handshake
/// secret instead of the DHE-derived one -- spec §4.4 calls out this as
/// the same function, not a separate PSK code path.
pub use generate_key_exchange_rsp_hmac as generate_psk_exchange_rsp_hmac;
pub use verify_key_exchange_rsp_hmac as verify_psk_exchange_rsp_hmac;
pub use generate_finish_req_hmac as generate_psk_finish_req_hmac;
pub use verify_finish_req_hmac as verify_psk_finish_req_hmac;
pub use generate_finish_rsp_hmac as generate_psk_finish_rsp_hmac;
pub use verify_finish_rsp_hmac as verify_psk_finish_rsp_hmac;
