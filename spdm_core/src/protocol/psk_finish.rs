// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! PSK_FINISH / PSK_FINISH_RSP payloads (spec §4.2 PSK `TH_curr_AKF`: no
//! `H(Ct)`/`H(CM)` terms). Grounded directly on the teacher's
//! `spdmlib/src/message/psk_finish.rs`, generalized from its
//! version-agnostic encode to this crate's `SpdmDigestStruct` shape.

use codec::{Codec, Writer};

use super::common_struct::SpdmDigestStruct;

#[derive(Debug, Clone, Default)]
pub struct SpdmPskFinishRequestPayload {
    pub verify_data: SpdmDigestStruct,
}

impl SpdmPskFinishRequestPayload {
    pub fn encode(&self, bytes: &mut Writer) {
        0u8.encode(bytes); // param1
        0u8.encode(bytes); // param2
        self.verify_data.encode(bytes);
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpdmPskFinishResponsePayload {}

impl SpdmPskFinishResponsePayload {
    pub fn encode(&self, bytes: &mut Writer) {
        0u8.encode(bytes); // param1
        0u8.encode(bytes); // param2
    }
}
