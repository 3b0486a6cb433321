// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! CHALLENGE / CHALLENGE_AUTH payloads (spec §4.2, §4.3 M1/M2 path).

use bitflags::bitflags;
use codec::{Codec, Reader, Writer};

use super::common_struct::{SpdmDigestStruct, SpdmNonceStruct, SpdmOpaqueStruct, SpdmSignatureStruct};

bitflags! {
    #[derive(Default)]
    pub struct SpdmChallengeAuthAttributes: u8 {
        const BASIC_MUT_AUTH_REQ = 0b1000_0000;
    }
}

impl SpdmChallengeAuthAttributes {
    pub fn slot_id(&self) -> u8 {
        self.bits() & 0b0000_1111
    }

    pub fn with_slot_id(mut self, slot: u8) -> Self {
        let bits = (self.bits() & !0b0000_1111) | (slot & 0b0000_1111);
        self = SpdmChallengeAuthAttributes::from_bits_truncate(bits);
        self
    }
}

impl Codec for SpdmChallengeAuthAttributes {
    fn encode(&self, bytes: &mut Writer) {
        self.bits().encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<SpdmChallengeAuthAttributes> {
        let bits = u8::read(r)?;
        Some(SpdmChallengeAuthAttributes::from_bits_truncate(bits))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpdmChallengeRequestPayload {
    pub slot_id: u8,
    pub measurement_summary_hash_type: u8,
    pub nonce: SpdmNonceStruct,
}

impl Codec for SpdmChallengeRequestPayload {
    fn encode(&self, bytes: &mut Writer) {
        self.slot_id.encode(bytes); // param1
        self.measurement_summary_hash_type.encode(bytes); // param2
        self.nonce.encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<SpdmChallengeRequestPayload> {
        let slot_id = u8::read(r)?;
        let measurement_summary_hash_type = u8::read(r)?;
        let nonce = SpdmNonceStruct::read(r)?;
        Some(SpdmChallengeRequestPayload {
            slot_id,
            measurement_summary_hash_type,
            nonce,
        })
    }
}

/// The fixed-width prefix of CHALLENGE_AUTH, up to and including the
/// opaque field. The trailing `signature` is appended separately by
/// `SignatureBinding` once M1M2 has been assembled and hashed -- that
/// ordering is why this type does not carry the signature as a plain
/// struct field encoded unconditionally.
#[derive(Debug, Clone, Default)]
pub struct SpdmChallengeAuthResponsePrefix {
    pub slot_id: u8,
    pub attributes: SpdmChallengeAuthAttributes,
    pub cert_chain_hash: SpdmDigestStruct,
    pub nonce: SpdmNonceStruct,
    pub measurement_summary_hash: SpdmDigestStruct,
    pub opaque: SpdmOpaqueStruct,
}

impl SpdmChallengeAuthResponsePrefix {
    pub fn encode(&self, bytes: &mut Writer) {
        self.slot_id.encode(bytes); // param1: slot id (bits 3:0)
        self.attributes.encode(bytes); // param2
        self.cert_chain_hash.encode(bytes);
        self.nonce.encode(bytes);
        if self.measurement_summary_hash.data_size > 0 {
            self.measurement_summary_hash.encode(bytes);
        }
        self.opaque.encode(bytes);
    }
}

/// Full CHALLENGE_AUTH with its trailing signature, used once the
/// signature has been generated or once a received response has been
/// fully parsed (after `SignatureBinding::verify_challenge_signature`
/// consumed the prefix to rebuild M1M2).
#[derive(Debug, Clone, Default)]
pub struct SpdmChallengeAuthResponsePayload {
    pub prefix: SpdmChallengeAuthResponsePrefix,
    pub signature: SpdmSignatureStruct,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_slot_id_roundtrip() {
        let attrs = SpdmChallengeAuthAttributes::BASIC_MUT_AUTH_REQ.with_slot_id(5);
        assert_eq!(attrs.slot_id(), 5);
        assert!(attrs.contains(SpdmChallengeAuthAttributes::BASIC_MUT_AUTH_REQ));
    }

    #[test]
    fn test_challenge_request_roundtrip() {
        let mut buf = [0u8; 64];
        let mut w = Writer::init(&mut buf);
        let req = SpdmChallengeRequestPayload {
            slot_id: 2,
            measurement_summary_hash_type: 1,
            nonce: SpdmNonceStruct { data: [9u8; 32] },
        };
        req.encode(&mut w);
        let mut r = Reader::init(&buf);
        let parsed = SpdmChallengeRequestPayload::read(&mut r).unwrap();
        assert_eq!(parsed.slot_id, 2);
        assert_eq!(parsed.nonce.data, [9u8; 32]);
    }
}
