// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! MCTP transport encapsulation for `spdm_core`'s `SpdmTransportEncap`
//! collaborator. Adapted from the one-byte MCTP message-type header
//! used by the teacher's own MCTP transport crate: SPDM and
//! secured-MCTP messages get distinguished by that leading byte, every
//! other MCTP message type is out of scope here and rejected.

mod header;

pub use header::{MctpMessageHeader, MctpMessageType};

use codec::{Codec, Reader, Writer};
use spdm_core::error::{SpdmError, SpdmResult};
use spdm_core::context::SpdmTransportEncap;

#[derive(Debug, Copy, Clone, Default)]
pub struct MctpTransportEncap {
    secured: bool,
}

impl MctpTransportEncap {
    pub fn new() -> Self {
        MctpTransportEncap { secured: false }
    }

    /// Selects whether the next `encap()` call wraps the payload as a
    /// secured-MCTP message (post-handshake, within a session) or a
    /// plain SPDM message (pre-handshake).
    pub fn set_secured(&mut self, secured: bool) {
        self.secured = secured;
    }
}

impl SpdmTransportEncap for MctpTransportEncap {
    fn encap(&self, spdm_msg: &[u8], transport_buf: &mut [u8]) -> SpdmResult<usize> {
        let mut writer = Writer::init(transport_buf);
        let header = MctpMessageHeader {
            r#type: if self.secured {
                MctpMessageType::MctpMessageTypeSecuredMctp
            } else {
                MctpMessageType::MctpMessageTypeSpdm
            },
        };
        header.encode(&mut writer);
        let header_size = writer.used();
        if !writer.extend_from_slice(spdm_msg) {
            return Err(SpdmError::BufferTooSmall);
        }
        Ok(header_size + spdm_msg.len())
    }

    fn decap(&self, transport_msg: &[u8], spdm_buf: &mut [u8]) -> SpdmResult<usize> {
        let mut reader = Reader::init(transport_msg);
        let header = MctpMessageHeader::read(&mut reader).ok_or(SpdmError::DeviceError)?;
        match header.r#type {
            MctpMessageType::MctpMessageTypeSpdm | MctpMessageType::MctpMessageTypeSecuredMctp => {}
            _ => return Err(SpdmError::Unsupported),
        }
        let payload = reader.rest();
        if spdm_buf.len() < payload.len() {
            return Err(SpdmError::BufferTooSmall);
        }
        spdm_buf[..payload.len()].copy_from_slice(payload);
        Ok(payload.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encap_decap_roundtrip_unsecured() {
        let encap = MctpTransportEncap::new();
        let mut transport_buf = [0u8; 64];
        let spdm_msg = b"hello responder";
        let used = encap.encap(spdm_msg, &mut transport_buf).unwrap();

        let mut spdm_buf = [0u8; 64];
        let decoded_len = encap.decap(&transport_buf[..used], &mut spdm_buf).unwrap();
        assert_eq!(&spdm_buf[..decoded_len], spdm_msg);
    }

    #[test]
    fn test_encap_decap_roundtrip_secured() {
        let mut encap = MctpTransportEncap::new();
        encap.set_secured(true);
        let mut transport_buf = [0u8; 64];
        let spdm_msg = b"encrypted application data";
        let used = encap.encap(spdm_msg, &mut transport_buf).unwrap();

        let mut spdm_buf = [0u8; 64];
        let decoded_len = encap.decap(&transport_buf[..used], &mut spdm_buf).unwrap();
        assert_eq!(&spdm_buf[..decoded_len], spdm_msg);
    }

    #[test]
    fn test_encap_buffer_too_small_rejected() {
        let encap = MctpTransportEncap::new();
        let mut transport_buf = [0u8; 2];
        assert_eq!(
            encap.encap(b"too long for this buffer", &mut transport_buf),
            Err(SpdmError::BufferTooSmall)
        );
    }

    #[test]
    fn test_decap_rejects_other_mctp_message_types() {
        let encap = MctpTransportEncap::new();
        let mut transport_buf = [0u8; 8];
        let mut writer = Writer::init(&mut transport_buf);
        MctpMessageHeader {
            r#type: MctpMessageType::MctpMessageTypePldm,
        }
        .encode(&mut writer);
        let used = writer.used();

        let mut spdm_buf = [0u8; 8];
        assert_eq!(
            encap.decap(&transport_buf[..used], &mut spdm_buf),
            Err(SpdmError::Unsupported)
        );
    }
}
