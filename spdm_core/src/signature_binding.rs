// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! SignatureBinding component (spec §4.3): the only place that calls
//! `DataSigner::*_data_sign` or `CryptoProvider::verify_leaf_signature`.
//! Every function here takes the same certificate chain for both
//! directions of a given exchange -- generation and verification never
//! see different chains, per spec §4.3's single invariant.

use crate::crypto::{AsymAlgKind, CryptoProvider, DataSigner};
use crate::error::{SpdmError, SpdmResult};
use crate::protocol::cert::SpdmCertChainBuffer;
use crate::protocol::common_struct::{SpdmDigestStruct, SpdmSignatureStruct};
use crate::protocol::{SpdmBaseAsymAlgo, SpdmBaseHashAlgo, SpdmReqAsymAlgo};

fn log_verify_outcome(exchange: &str, result: &SpdmResult<()>) {
    match result {
        Ok(()) => log::trace!("{exchange} signature verified"),
        Err(e) => log::warn!("{exchange} signature verification failed: {e}"),
    }
}

/// Generates a CHALLENGE_AUTH signature over `m1m2`. The responder signs
/// in the ordinary direction; in the mutual-auth "inverse direction" case
/// (an embedded responder challenging its requester peer) the requester's
/// own key and algorithm sign instead, per spec §4.3.
pub fn generate_challenge_signature(
    is_requester: bool,
    signer: &dyn DataSigner,
    base_asym_alg: SpdmBaseAsymAlgo,
    req_asym_alg: SpdmReqAsymAlgo,
    m1m2: &SpdmDigestStruct,
) -> SpdmResult<SpdmSignatureStruct> {
    if is_requester {
        signer.requester_data_sign(req_asym_alg, m1m2.as_ref())
    } else {
        signer.responder_data_sign(base_asym_alg, m1m2.as_ref())
    }
}

/// Verifies a CHALLENGE_AUTH signature against `chain`'s leaf key. Selects
/// the requester asym alg for the mutual-auth inverse direction, the base
/// asym alg otherwise, mirroring `generate_challenge_signature`.
pub fn verify_challenge_signature(
    is_requester: bool,
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    base_asym_alg: SpdmBaseAsymAlgo,
    req_asym_alg: SpdmReqAsymAlgo,
    chain: &SpdmCertChainBuffer,
    m1m2: &SpdmDigestStruct,
    signature: &SpdmSignatureStruct,
) -> SpdmResult<()> {
    let leaf = chain.leaf(hash_algo.get_size() as usize)?;
    let asym_alg = if is_requester {
        AsymAlgKind::Req(req_asym_alg)
    } else {
        AsymAlgKind::Base(base_asym_alg)
    };
    let result = crypto.verify_leaf_signature(asym_alg, leaf, m1m2.as_ref(), signature.as_ref());
    log_verify_outcome("CHALLENGE_AUTH", &result);
    result
}

/// Responder generates a signed MEASUREMENTS response over `l1l2`.
pub fn generate_measurement_signature(
    signer: &dyn DataSigner,
    asym_alg: SpdmBaseAsymAlgo,
    l1l2: &SpdmDigestStruct,
) -> SpdmResult<SpdmSignatureStruct> {
    signer.responder_data_sign(asym_alg, l1l2.as_ref())
}

pub fn verify_measurement_signature(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    asym_alg: SpdmBaseAsymAlgo,
    chain: &SpdmCertChainBuffer,
    l1l2: &SpdmDigestStruct,
    signature: &SpdmSignatureStruct,
) -> SpdmResult<()> {
    let leaf = chain.leaf(hash_algo.get_size() as usize)?;
    let result = crypto.verify_leaf_signature(AsymAlgKind::Base(asym_alg), leaf, l1l2.as_ref(), signature.as_ref());
    log_verify_outcome("MEASUREMENTS", &result);
    result
}

/// Responder generates a KEY_EXCHANGE_RSP signature over `TH1`.
pub fn generate_key_exchange_signature(
    signer: &dyn DataSigner,
    asym_alg: SpdmBaseAsymAlgo,
    th1: &SpdmDigestStruct,
) -> SpdmResult<SpdmSignatureStruct> {
    signer.responder_data_sign(asym_alg, th1.as_ref())
}

pub fn verify_key_exchange_signature(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    asym_alg: SpdmBaseAsymAlgo,
    chain: &SpdmCertChainBuffer,
    th1: &SpdmDigestStruct,
    signature: &SpdmSignatureStruct,
) -> SpdmResult<()> {
    let leaf = chain.leaf(hash_algo.get_size() as usize)?;
    let result = crypto.verify_leaf_signature(AsymAlgKind::Base(asym_alg), leaf, th1.as_ref(), signature.as_ref());
    log_verify_outcome("KEY_EXCHANGE_RSP", &result);
    result
}

/// Requester generates a mutual-auth FINISH request signature over `TH2`.
pub fn generate_finish_req_signature(
    signer: &dyn DataSigner,
    asym_alg: SpdmReqAsymAlgo,
    th2: &SpdmDigestStruct,
) -> SpdmResult<SpdmSignatureStruct> {
    signer.requester_data_sign(asym_alg, th2.as_ref())
}

pub fn verify_finish_req_signature(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    asym_alg: SpdmReqAsymAlgo,
    chain: &SpdmCertChainBuffer,
    th2: &SpdmDigestStruct,
    signature: &SpdmSignatureStruct,
) -> SpdmResult<()> {
    let leaf = chain.leaf(hash_algo.get_size() as usize)?;
    let result = crypto.verify_leaf_signature(AsymAlgKind::Req(asym_alg), leaf, th2.as_ref(), signature.as_ref());
    log_verify_outcome("FINISH req", &result);
    result
}

/// spec §4.3's chain invariant as a standalone check: the chain a
/// signature verifies against must be the same object the engine used
/// when the signature was generated on the other side of the wire. The
/// engine enforces this structurally by only ever reading
/// `ConnectionInfo::peer_cert_chain`, but callers composing their own
/// flows (e.g. test harnesses holding two chains) can assert it here.
pub fn assert_same_chain(a: &SpdmCertChainBuffer, b: &SpdmCertChainBuffer) -> SpdmResult<()> {
    if a.data() != b.data() {
        return Err(SpdmError::InvalidState);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto_software::{SoftwareCryptoProvider, SoftwareSigner};

    fn chain_with_leaf(leaf_pubkey: &[u8]) -> SpdmCertChainBuffer {
        let mut full = vec![0u8; 4 + 32];
        let mut cert = vec![0x30, 0x82];
        cert.push((leaf_pubkey.len() >> 8) as u8);
        cert.push((leaf_pubkey.len() & 0xff) as u8);
        cert.extend_from_slice(leaf_pubkey);
        full.extend(cert);
        SpdmCertChainBuffer::from_full_chain_bytes(&full).unwrap()
    }

    #[test]
    fn test_challenge_signature_roundtrip() {
        let crypto = SoftwareCryptoProvider;
        let signer = SoftwareSigner::generate();
        let chain = chain_with_leaf(&signer.public_key_sec1_bytes());
        let m1m2 = crypto
            .hash(SpdmBaseHashAlgo::TPM_ALG_SHA_256, b"m1m2 transcript")
            .unwrap();

        let sig = generate_challenge_signature(
            false,
            &signer,
            SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256,
            SpdmReqAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256,
            &m1m2,
        )
        .unwrap();

        assert!(verify_challenge_signature(
            false,
            &crypto,
            SpdmBaseHashAlgo::TPM_ALG_SHA_256,
            SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256,
            SpdmReqAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256,
            &chain,
            &m1m2,
            &sig,
        )
        .is_ok());
    }

    #[test]
    fn test_challenge_signature_mutual_auth_inverse_direction() {
        let crypto = SoftwareCryptoProvider;
        let requester_signer = SoftwareSigner::generate();
        let chain = chain_with_leaf(&requester_signer.public_key_sec1_bytes());
        let m1m2 = crypto
            .hash(SpdmBaseHashAlgo::TPM_ALG_SHA_256, b"m1m2 transcript")
            .unwrap();

        let sig = generate_challenge_signature(
            true,
            &requester_signer,
            SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256,
            SpdmReqAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256,
            &m1m2,
        )
        .unwrap();

        assert!(verify_challenge_signature(
            true,
            &crypto,
            SpdmBaseHashAlgo::TPM_ALG_SHA_256,
            SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256,
            SpdmReqAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256,
            &chain,
            &m1m2,
            &sig,
        )
        .is_ok());
    }

    #[test]
    fn test_wrong_chain_rejected() {
        let crypto = SoftwareCryptoProvider;
        let signer = SoftwareSigner::generate();
        let other_signer = SoftwareSigner::generate();
        let wrong_chain = chain_with_leaf(&other_signer.public_key_sec1_bytes());
        let m1m2 = crypto
            .hash(SpdmBaseHashAlgo::TPM_ALG_SHA_256, b"m1m2 transcript")
            .unwrap();

        let sig = generate_challenge_signature(
            false,
            &signer,
            SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256,
            SpdmReqAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256,
            &m1m2,
        )
        .unwrap();

        assert!(verify_challenge_signature(
            false,
            &crypto,
            SpdmBaseHashAlgo::TPM_ALG_SHA_256,
            SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256,
            SpdmReqAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256,
            &wrong_chain,
            &m1m2,
            &sig,
        )
        .is_err());
    }
}
