// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! Reference `CryptoProvider`/`DataSigner` built on RustCrypto crates
//! (`sha2`, `hmac`, `p256`). This is the engine's own test fixture and a
//! starting point for demos -- it is never required in production, and
//! production builds should disable the `software-crypto` feature and
//! supply a `CryptoProvider` backed by their HSM/TPM/ROM crypto block.
//!
//! Grounded on the teacher's `crypto::spdm_ring` module shape
//! (`cert_operation_impl.rs`'s `get_cert_from_cert_chain`/
//! `verify_cert_chain` pair providing one concrete, swappable crypto
//! backend), reimplemented with plain RustCrypto crates instead of the
//! teacher's pinned `ring`/`webpki` git forks. Unlike the teacher's
//! backend, this one does not parse X.509 -- it treats the "leaf
//! certificate" bytes as a raw SEC1-encoded P-256 public key, since full
//! ASN.1 SubjectPublicKeyInfo extraction is exactly the kind of
//! cryptographic-primitive work spec §1 puts out of scope; a production
//! `CryptoProvider` does that parsing itself.
#![cfg(feature = "software-crypto")]

use hmac::{Hmac, Mac};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand_core::OsRng;
use sha2::{Digest, Sha256, Sha384, Sha512};
use signature::hazmat::{PrehashSigner, PrehashVerifier};
use std::convert::TryFrom;

use crate::context::{SecuredMessageContext, SessionType};
use crate::crypto::{AsymAlgKind, CryptoProvider, DataSigner};
use crate::error::{SpdmError, SpdmResult};
use crate::protocol::{
    SpdmAeadAlgo, SpdmBaseAsymAlgo, SpdmBaseHashAlgo, SpdmDigestStruct, SpdmReqAsymAlgo,
    SpdmSignatureStruct,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareCryptoProvider;

fn hash_bytes(alg: SpdmBaseHashAlgo, data: &[u8]) -> SpdmResult<SpdmDigestStruct> {
    let digest: heapless_digest = match alg {
        SpdmBaseHashAlgo::TPM_ALG_SHA_256 => heapless_digest::from_slice(&Sha256::digest(data)),
        SpdmBaseHashAlgo::TPM_ALG_SHA_384 => heapless_digest::from_slice(&Sha384::digest(data)),
        SpdmBaseHashAlgo::TPM_ALG_SHA_512 => heapless_digest::from_slice(&Sha512::digest(data)),
        SpdmBaseHashAlgo::Unknown(_) => return Err(SpdmError::Unsupported),
    };
    Ok(SpdmDigestStruct::from_slice(digest.as_slice()))
}

/// Tiny helper so the three `Sha*::digest` output types (each a distinct
/// fixed-size `GenericArray`) can be handled uniformly above without
/// pulling in `generic-array` as a direct dependency of this module.
struct heapless_digest {
    len: usize,
    buf: [u8; 64],
}

impl heapless_digest {
    fn from_slice(s: &[u8]) -> Self {
        let mut buf = [0u8; 64];
        buf[..s.len()].copy_from_slice(s);
        heapless_digest { len: s.len(), buf }
    }

    fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

macro_rules! hmac_with {
    ($HashTy:ty, $key:expr, $data:expr) => {{
        let mut mac = <Hmac<$HashTy> as Mac>::new_from_slice($key)
            .map_err(|_| SpdmError::SignatureFailure)?;
        mac.update($data);
        mac.finalize().into_bytes()
    }};
}

impl CryptoProvider for SoftwareCryptoProvider {
    fn hash(&self, alg: SpdmBaseHashAlgo, data: &[u8]) -> SpdmResult<SpdmDigestStruct> {
        hash_bytes(alg, data)
    }

    fn hmac(&self, alg: SpdmBaseHashAlgo, key: &[u8], data: &[u8]) -> SpdmResult<SpdmDigestStruct> {
        match alg {
            SpdmBaseHashAlgo::TPM_ALG_SHA_256 => {
                Ok(SpdmDigestStruct::from_slice(&hmac_with!(Sha256, key, data)))
            }
            SpdmBaseHashAlgo::TPM_ALG_SHA_384 => {
                Ok(SpdmDigestStruct::from_slice(&hmac_with!(Sha384, key, data)))
            }
            SpdmBaseHashAlgo::TPM_ALG_SHA_512 => {
                Ok(SpdmDigestStruct::from_slice(&hmac_with!(Sha512, key, data)))
            }
            SpdmBaseHashAlgo::Unknown(_) => Err(SpdmError::Unsupported),
        }
    }

    fn hmac_verify(
        &self,
        alg: SpdmBaseHashAlgo,
        key: &[u8],
        data: &[u8],
        tag: &[u8],
    ) -> SpdmResult<()> {
        let expected = self.hmac(alg, key, data)?;
        // constant-time compare
        use subtle::ConstantTimeEq;
        if expected.as_ref().len() != tag.len() || expected.as_ref().ct_eq(tag).unwrap_u8() != 1 {
            return Err(SpdmError::SecurityViolation);
        }
        Ok(())
    }

    fn verify_leaf_signature(
        &self,
        asym_alg: AsymAlgKind,
        leaf_cert_der: &[u8],
        hash: &[u8],
        signature: &[u8],
    ) -> SpdmResult<()> {
        match asym_alg {
            AsymAlgKind::Base(SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256)
            | AsymAlgKind::Req(SpdmReqAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256) => {
                let verifying_key = VerifyingKey::from_sec1_bytes(leaf_cert_der)
                    .map_err(|_| SpdmError::SecurityViolation)?;
                let sig = Signature::try_from(signature).map_err(|_| SpdmError::SecurityViolation)?;
                verifying_key
                    .verify_prehash(hash, &sig)
                    .map_err(|_| SpdmError::SecurityViolation)
            }
            _ => Err(SpdmError::Unsupported),
        }
    }

    fn random(&self, out: &mut [u8]) -> SpdmResult<()> {
        use rand_core::RngCore;
        OsRng.fill_bytes(out);
        Ok(())
    }
}

/// A software ECDSA P-256 signer, standing in for the host's
/// `requester_data_sign`/`responder_data_sign` policy callbacks in tests.
/// Each side of a test scenario owns one, generated fresh per test.
pub struct SoftwareSigner {
    key: SigningKey,
}

impl SoftwareSigner {
    pub fn generate() -> Self {
        SoftwareSigner {
            key: SigningKey::random(&mut OsRng),
        }
    }

    /// The SEC1-encoded public key bytes this signer's counterpart
    /// `CryptoProvider::verify_leaf_signature` expects as "leaf cert"
    /// bytes.
    pub fn public_key_sec1_bytes(&self) -> Vec<u8> {
        VerifyingKey::from(&self.key)
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }
}

impl DataSigner for SoftwareSigner {
    fn requester_data_sign(
        &self,
        _alg: SpdmReqAsymAlgo,
        hash: &[u8],
    ) -> SpdmResult<SpdmSignatureStruct> {
        let sig: Signature = self
            .key
            .sign_prehash(hash)
            .map_err(|_| SpdmError::SignatureFailure)?;
        Ok(SpdmSignatureStruct::from_slice(&sig.to_bytes()))
    }

    fn responder_data_sign(
        &self,
        _alg: SpdmBaseAsymAlgo,
        hash: &[u8],
    ) -> SpdmResult<SpdmSignatureStruct> {
        let sig: Signature = self
            .key
            .sign_prehash(hash)
            .map_err(|_| SpdmError::SignatureFailure)?;
        Ok(SpdmSignatureStruct::from_slice(&sig.to_bytes()))
    }
}

/// Reference `SecuredMessageContext` fixture. NOT an AEAD implementation
/// -- `encode`/`decode` XOR the payload against a SHA-256 keystream with
/// no nonce, no authentication tag, and no replay protection. It exists
/// only so tests can drive a `SessionInfo` through the full
/// handshake-to-established-session path; a production
/// `SecuredMessageContext` must supply real authenticated encryption
/// (e.g. the AEAD cipher suite `set_algorithms` negotiated).
pub struct SoftwareSecuredMessageContext {
    session_type: SessionType,
    data_key: Vec<u8>,
    finished_key_req: Vec<u8>,
    finished_key_rsp: Vec<u8>,
}

impl SoftwareSecuredMessageContext {
    pub fn new() -> Self {
        SoftwareSecuredMessageContext {
            session_type: SessionType::None,
            data_key: Vec::new(),
            finished_key_req: Vec::new(),
            finished_key_rsp: Vec::new(),
        }
    }

    pub fn set_finished_keys(&mut self, requester: &[u8], responder: &[u8]) {
        self.finished_key_req = requester.to_vec();
        self.finished_key_rsp = responder.to_vec();
    }

    fn keystream_xor(&self, data: &[u8], out: &mut [u8]) -> SpdmResult<()> {
        if out.len() < data.len() {
            return Err(SpdmError::BufferTooSmall);
        }
        let mut counter = 0u32;
        let mut produced = 0usize;
        while produced < data.len() {
            let mut block = self.data_key.clone();
            block.extend_from_slice(&counter.to_le_bytes());
            let digest = Sha256::digest(&block);
            let take = (data.len() - produced).min(digest.len());
            for i in 0..take {
                out[produced + i] = data[produced + i] ^ digest[i];
            }
            produced += take;
            counter += 1;
        }
        Ok(())
    }
}

impl Default for SoftwareSecuredMessageContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SecuredMessageContext for SoftwareSecuredMessageContext {
    fn init_context(&mut self) -> SpdmResult<()> {
        self.data_key.clear();
        Ok(())
    }

    fn set_algorithms(&mut self, _aead_cipher_suite: SpdmAeadAlgo) -> SpdmResult<()> {
        Ok(())
    }

    fn set_psk_hint(&mut self, hint: &[u8]) -> SpdmResult<()> {
        self.data_key = Sha256::digest(hint).to_vec();
        Ok(())
    }

    fn set_session_type(&mut self, session_type: SessionType) {
        self.session_type = session_type;
    }

    fn hmac_with_request_finished_key(&self, data: &[u8]) -> SpdmResult<SpdmDigestStruct> {
        Ok(SpdmDigestStruct::from_slice(&hmac_with!(Sha256, &self.finished_key_req, data)))
    }

    fn hmac_with_response_finished_key(&self, data: &[u8]) -> SpdmResult<SpdmDigestStruct> {
        Ok(SpdmDigestStruct::from_slice(&hmac_with!(Sha256, &self.finished_key_rsp, data)))
    }

    fn generate_data_key(&mut self) -> SpdmResult<()> {
        if self.data_key.is_empty() {
            let mut seed = self.finished_key_req.clone();
            seed.extend_from_slice(&self.finished_key_rsp);
            self.data_key = Sha256::digest(&seed).to_vec();
        }
        Ok(())
    }

    fn encode(&self, app_data: &[u8], transport_buf: &mut [u8]) -> SpdmResult<usize> {
        if self.session_type == SessionType::None {
            return Err(SpdmError::InvalidState);
        }
        self.keystream_xor(app_data, transport_buf)?;
        Ok(app_data.len())
    }

    fn decode(&self, transport_msg: &[u8], app_buf: &mut [u8]) -> SpdmResult<usize> {
        if self.session_type == SessionType::None {
            return Err(SpdmError::InvalidState);
        }
        self.keystream_xor(transport_msg, app_buf)?;
        Ok(transport_msg.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_sizes() {
        let p = SoftwareCryptoProvider;
        assert_eq!(
            p.hash(SpdmBaseHashAlgo::TPM_ALG_SHA_256, b"abc").unwrap().data_size,
            32
        );
        assert_eq!(
            p.hash(SpdmBaseHashAlgo::TPM_ALG_SHA_384, b"abc").unwrap().data_size,
            48
        );
    }

    #[test]
    fn test_hmac_roundtrip() {
        let p = SoftwareCryptoProvider;
        let key = b"sixteen byte key";
        let tag = p.hmac(SpdmBaseHashAlgo::TPM_ALG_SHA_256, key, b"payload").unwrap();
        assert!(p
            .hmac_verify(SpdmBaseHashAlgo::TPM_ALG_SHA_256, key, b"payload", tag.as_ref())
            .is_ok());
        assert!(p
            .hmac_verify(SpdmBaseHashAlgo::TPM_ALG_SHA_256, key, b"tampered", tag.as_ref())
            .is_err());
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let signer = SoftwareSigner::generate();
        let provider = SoftwareCryptoProvider;
        let hash = Sha256::digest(b"transcript bytes");
        let sig = signer
            .responder_data_sign(SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256, &hash)
            .unwrap();
        let pubkey = signer.public_key_sec1_bytes();
        assert!(provider
            .verify_leaf_signature(
                AsymAlgKind::Base(SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256),
                &pubkey,
                &hash,
                sig.as_ref(),
            )
            .is_ok());
    }

    #[test]
    fn test_tamper_rejected() {
        let signer = SoftwareSigner::generate();
        let provider = SoftwareCryptoProvider;
        let hash = Sha256::digest(b"transcript bytes");
        let mut sig = signer
            .responder_data_sign(SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256, &hash)
            .unwrap();
        sig.data[0] ^= 0xff;
        let pubkey = signer.public_key_sec1_bytes();
        assert!(provider
            .verify_leaf_signature(
                AsymAlgKind::Base(SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256),
                &pubkey,
                &hash,
                sig.as_ref(),
            )
            .is_err());
    }

    #[test]
    fn test_secured_message_context_encode_decode_roundtrip() {
        let mut ctx = SoftwareSecuredMessageContext::new();
        ctx.init_context().unwrap();
        ctx.set_finished_keys(b"req-finished-key", b"rsp-finished-key");
        ctx.generate_data_key().unwrap();
        ctx.set_session_type(SessionType::AeadWithMac);

        let app_data = b"application payload after FINISH";
        let mut transport_buf = [0u8; 64];
        let used = ctx.encode(app_data, &mut transport_buf).unwrap();

        let mut decoded = [0u8; 64];
        let decoded_len = ctx.decode(&transport_buf[..used], &mut decoded).unwrap();
        assert_eq!(&decoded[..decoded_len], app_data);
    }

    #[test]
    fn test_secured_message_context_rejects_encode_before_session_type_set() {
        let ctx = SoftwareSecuredMessageContext::new();
        let mut out = [0u8; 16];
        assert_eq!(ctx.encode(b"data", &mut out), Err(SpdmError::InvalidState));
    }
}
