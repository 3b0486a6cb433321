// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! Collaborator traits for the cryptographic primitive provider (spec §1
//! "out of scope (external collaborators)", §6 callback set). The engine
//! never implements hash/HMAC/asymmetric sign-verify/X.509 leaf key
//! import itself; it calls through these traits and maps any failure to
//! `SpdmError::SecurityViolation` (verify) or `SpdmError::SignatureFailure`
//! / `SpdmError::DeviceError` (sign), per spec §7's propagation policy.

use crate::protocol::{SpdmBaseAsymAlgo, SpdmBaseHashAlgo, SpdmDigestStruct, SpdmReqAsymAlgo, SpdmSignatureStruct};
use crate::error::SpdmResult;

/// Which of the two negotiated asymmetric algorithm slots a signature
/// operation is keyed to. KEY_EXCHANGE/FINISH/CHALLENGE responder
/// signatures use `Base`; mutual-auth CHALLENGE/FINISH_REQ requester
/// signatures use `Req` (spec §4.3 "requester base asym alg").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsymAlgKind {
    Base(SpdmBaseAsymAlgo),
    Req(SpdmReqAsymAlgo),
}

/// Hash, HMAC, asymmetric verify, and RNG: the primitives the engine
/// leans on everywhere in the binding layer. One implementation per
/// host integration (HSM, TPM, ROM crypto block, or -- for tests and
/// demos -- [`crate::crypto_software::SoftwareCryptoProvider`]).
pub trait CryptoProvider {
    fn hash(&self, alg: SpdmBaseHashAlgo, data: &[u8]) -> SpdmResult<SpdmDigestStruct>;

    fn hmac(&self, alg: SpdmBaseHashAlgo, key: &[u8], data: &[u8]) -> SpdmResult<SpdmDigestStruct>;

    /// Constant-time HMAC verification. Implementations must not return
    /// early on the first mismatched byte.
    fn hmac_verify(
        &self,
        alg: SpdmBaseHashAlgo,
        key: &[u8],
        data: &[u8],
        tag: &[u8],
    ) -> SpdmResult<()>;

    /// Imports the public key from `leaf_cert_der` and verifies
    /// `signature` over `hash` (already hashed by the caller with `alg`'s
    /// matching `SpdmBaseHashAlgo`). The engine supplies the correct leaf
    /// slice via `SpdmCertChainBuffer::leaf` -- see spec §4.3's single
    /// invariant tying signature generation and verification to the same
    /// chain.
    fn verify_leaf_signature(
        &self,
        asym_alg: AsymAlgKind,
        leaf_cert_der: &[u8],
        hash: &[u8],
        signature: &[u8],
    ) -> SpdmResult<()>;

    fn random(&self, out: &mut [u8]) -> SpdmResult<()>;
}

/// Local policy callbacks that hold private keys (spec §1, §6). Kept
/// separate from `CryptoProvider` because a host may route these through
/// an attestation service while using a plain software/HSM
/// `CryptoProvider` for hashing and verification.
pub trait DataSigner {
    fn requester_data_sign(
        &self,
        alg: SpdmReqAsymAlgo,
        hash: &[u8],
    ) -> SpdmResult<SpdmSignatureStruct>;

    fn responder_data_sign(
        &self,
        alg: SpdmBaseAsymAlgo,
        hash: &[u8],
    ) -> SpdmResult<SpdmSignatureStruct>;
}

/// The local measurement-collector policy callback (spec §6
/// `measurement_collect`).
pub trait MeasurementCollector {
    fn measurement_collect(
        &self,
        spec: crate::protocol::SpdmMeasurementSpecification,
        hash_algo: crate::protocol::SpdmMeasurementHashAlgo,
    ) -> SpdmResult<crate::protocol::SpdmMeasurementRecordStructure>;
}
