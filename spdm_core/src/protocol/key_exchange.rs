// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! KEY_EXCHANGE / KEY_EXCHANGE_RSP payloads (spec §4.2 TH_curr_AK path).
//! DHE exchange-data bytes and measurement-summary-hash requests flow
//! through unchanged; this module only types the fields the transcript
//! and binding layers need to reason about.

use crate::config::SPDM_MAX_DHE_KEY_SIZE;
use codec::{Codec, Reader, Writer};

use super::common_struct::{SpdmDigestStruct, SpdmNonceStruct, SpdmOpaqueStruct, SpdmSignatureStruct};

#[derive(Debug, Clone)]
pub struct SpdmDheExchangeStruct {
    pub data_size: u16,
    pub data: [u8; SPDM_MAX_DHE_KEY_SIZE],
}

impl Default for SpdmDheExchangeStruct {
    fn default() -> Self {
        SpdmDheExchangeStruct {
            data_size: 0,
            data: [0u8; SPDM_MAX_DHE_KEY_SIZE],
        }
    }
}

impl SpdmDheExchangeStruct {
    pub fn as_ref(&self) -> &[u8] {
        &self.data[..self.data_size as usize]
    }

    pub fn encode(&self, bytes: &mut Writer) {
        let _ = bytes.extend_from_slice(self.as_ref());
    }

    pub fn read_with_size(r: &mut Reader, size: u16) -> Option<SpdmDheExchangeStruct> {
        let raw = r.take(size as usize)?;
        let mut s = SpdmDheExchangeStruct {
            data_size: size,
            data: [0u8; SPDM_MAX_DHE_KEY_SIZE],
        };
        s.data[..raw.len()].copy_from_slice(raw);
        Some(s)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpdmKeyExchangeRequestPayload {
    pub measurement_summary_hash_type: u8,
    pub slot_id: u8,
    pub random: SpdmNonceStruct,
    pub exchange: SpdmDheExchangeStruct,
    pub opaque: SpdmOpaqueStruct,
}

impl SpdmKeyExchangeRequestPayload {
    pub fn encode(&self, bytes: &mut Writer) {
        self.measurement_summary_hash_type.encode(bytes); // param1
        self.slot_id.encode(bytes); // param2
        self.random.encode(bytes);
        self.exchange.encode(bytes);
        self.opaque.encode(bytes);
    }
}

/// `signature` and `responder_verify_data` are appended to `MessageK` in
/// two steps, same pattern as FINISH (spec §4.2).
#[derive(Debug, Clone, Default)]
pub struct SpdmKeyExchangeResponsePayload {
    pub heartbeat_period: u8,
    pub rsp_session_id: u16,
    pub mut_auth_requested: u8,
    pub req_slot_id: u8,
    pub random: SpdmNonceStruct,
    pub exchange: SpdmDheExchangeStruct,
    pub measurement_summary_hash: SpdmDigestStruct,
    pub opaque: SpdmOpaqueStruct,
    pub signature: SpdmSignatureStruct,
    pub responder_verify_data: SpdmDigestStruct,
}

impl SpdmKeyExchangeResponsePayload {
    pub fn encode(&self, bytes: &mut Writer) {
        self.heartbeat_period.encode(bytes); // param1
        0u8.encode(bytes); // param2 reserved
        self.rsp_session_id.encode(bytes);
        self.mut_auth_requested.encode(bytes);
        self.req_slot_id.encode(bytes);
        self.random.encode(bytes);
        self.exchange.encode(bytes);
        if self.measurement_summary_hash.data_size > 0 {
            self.measurement_summary_hash.encode(bytes);
        }
        self.opaque.encode(bytes);
        if self.signature.data_size > 0 {
            self.signature.encode(bytes);
        }
        self.responder_verify_data.encode(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dhe_exchange_roundtrip() {
        let mut buf = [0u8; 64];
        let mut w = Writer::init(&mut buf);
        let value = SpdmDheExchangeStruct::read_with_size(
            &mut Reader::init(&[7u8; 64]),
            64,
        )
        .unwrap();
        value.encode(&mut w);
        assert_eq!(&buf[..64], &[7u8; 64]);
    }
}
