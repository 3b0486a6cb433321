// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! FINISH / FINISH_RSP payloads (spec §4.2 TH_curr_AKF, §4.3/§4.4 FINISH
//! signature and HMAC).

use bitflags::bitflags;
use codec::{Codec, Reader, Writer};

use super::common_struct::{SpdmDigestStruct, SpdmSignatureStruct};

bitflags! {
    #[derive(Default)]
    pub struct SpdmFinishRequestAttributes: u8 {
        /// Set when the request carries a mutual-auth signature ahead of
        /// `verify_data`.
        const SIGNATURE_INCLUDED = 0b0000_0001;
    }
}

impl Codec for SpdmFinishRequestAttributes {
    fn encode(&self, bytes: &mut Writer) {
        self.bits().encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<SpdmFinishRequestAttributes> {
        let bits = u8::read(r)?;
        Some(SpdmFinishRequestAttributes::from_bits_truncate(bits))
    }
}

/// `signature` and `verify_data` are appended to `MessageF` in two
/// separate steps by [`crate::transcript_binding::TranscriptBinding`]:
/// the prefix (everything up to and including `signature` when present)
/// first, then the HMAC once computed, matching spec §4.2's
/// "response\Signature+VerifyData" vs "response\VerifyData" distinction.
#[derive(Debug, Clone, Default)]
pub struct SpdmFinishRequestPayload {
    pub finish_request_attributes: SpdmFinishRequestAttributes,
    pub req_slot_id: u8,
    pub signature: SpdmSignatureStruct,
    pub verify_data: SpdmDigestStruct,
}

impl SpdmFinishRequestPayload {
    pub fn mutual_auth(&self) -> bool {
        self.finish_request_attributes
            .contains(SpdmFinishRequestAttributes::SIGNATURE_INCLUDED)
    }

    pub fn encode(&self, bytes: &mut Writer) {
        self.finish_request_attributes.encode(bytes); // param1
        self.req_slot_id.encode(bytes); // param2
        if self.mutual_auth() {
            self.signature.encode(bytes);
        }
        self.verify_data.encode(bytes);
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpdmFinishResponsePayload {
    /// Absent when HANDSHAKE_IN_THE_CLEAR is negotiated by both peers.
    pub verify_data: SpdmDigestStruct,
}

impl SpdmFinishResponsePayload {
    pub fn encode(&self, bytes: &mut Writer, in_clear_text: bool) {
        0u8.encode(bytes); // param1
        0u8.encode(bytes); // param2
        if !in_clear_text {
            self.verify_data.encode(bytes);
        }
    }
}
