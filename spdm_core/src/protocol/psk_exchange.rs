// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! PSK_EXCHANGE / PSK_EXCHANGE_RSP payloads (spec §4.2 PSK `TH_curr_AK`:
//! no `H(Ct)` term, keyed off the PSK hint instead of a certificate
//! chain).

use crate::config::MAX_PSK_HINT_LENGTH;
use codec::{Codec, Reader, Writer};

use super::common_struct::{SpdmDigestStruct, SpdmNonceStruct, SpdmOpaqueStruct};

#[derive(Debug, Clone)]
pub struct SpdmPskHintStruct {
    pub data_size: u16,
    pub data: [u8; MAX_PSK_HINT_LENGTH],
}

impl Default for SpdmPskHintStruct {
    fn default() -> Self {
        SpdmPskHintStruct {
            data_size: 0,
            data: [0u8; MAX_PSK_HINT_LENGTH],
        }
    }
}

impl SpdmPskHintStruct {
    pub fn as_ref(&self) -> &[u8] {
        &self.data[..self.data_size as usize]
    }

    pub fn encode(&self, bytes: &mut Writer) {
        self.data_size.encode(bytes);
        let _ = bytes.extend_from_slice(self.as_ref());
    }

    pub fn read(r: &mut Reader) -> Option<SpdmPskHintStruct> {
        let data_size = u16::read(r)?;
        if data_size as usize > MAX_PSK_HINT_LENGTH {
            return None;
        }
        let raw = r.take(data_size as usize)?;
        let mut s = SpdmPskHintStruct {
            data_size,
            data: [0u8; MAX_PSK_HINT_LENGTH],
        };
        s.data[..raw.len()].copy_from_slice(raw);
        Some(s)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpdmPskExchangeRequestPayload {
    pub measurement_summary_hash_type: u8,
    pub req_session_id: u16,
    pub psk_hint: SpdmPskHintStruct,
    pub context: SpdmNonceStruct,
    pub opaque: SpdmOpaqueStruct,
}

impl SpdmPskExchangeRequestPayload {
    pub fn encode(&self, bytes: &mut Writer) {
        self.measurement_summary_hash_type.encode(bytes); // param1
        0u8.encode(bytes); // param2 reserved
        self.req_session_id.encode(bytes);
        self.psk_hint.encode(bytes);
        self.context.encode(bytes);
        self.opaque.encode(bytes);
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpdmPskExchangeResponsePayload {
    pub heartbeat_period: u8,
    pub rsp_session_id: u16,
    pub measurement_summary_hash: SpdmDigestStruct,
    pub context: SpdmNonceStruct,
    pub opaque: SpdmOpaqueStruct,
    pub responder_verify_data: SpdmDigestStruct,
}

impl SpdmPskExchangeResponsePayload {
    pub fn encode(&self, bytes: &mut Writer) {
        self.heartbeat_period.encode(bytes); // param1
        0u8.encode(bytes); // param2 reserved
        self.rsp_session_id.encode(bytes);
        if self.measurement_summary_hash.data_size > 0 {
            self.measurement_summary_hash.encode(bytes);
        }
        self.context.encode(bytes);
        self.opaque.encode(bytes);
        self.responder_verify_data.encode(bytes);
    }
}
