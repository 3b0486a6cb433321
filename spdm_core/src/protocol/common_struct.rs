// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! Small fixed-size wire structures shared across several message types:
//! digests, signatures, nonces, and opaque-data blobs. Each carries a
//! `data_size` so it can be encoded/decoded at its negotiated width
//! (hash size, signature size) without the caller threading that width
//! through by hand everywhere.

use crate::config::{
    MAX_SPDM_OPAQUE_SIZE, SPDM_MAX_ASYM_KEY_SIZE, SPDM_MAX_HASH_SIZE, SPDM_NONCE_SIZE,
};
use codec::{Codec, Reader, Writer};

#[derive(Debug, Clone)]
pub struct SpdmDigestStruct {
    pub data_size: u16,
    pub data: [u8; SPDM_MAX_HASH_SIZE],
}

impl Default for SpdmDigestStruct {
    fn default() -> Self {
        SpdmDigestStruct {
            data_size: 0,
            data: [0u8; SPDM_MAX_HASH_SIZE],
        }
    }
}

impl SpdmDigestStruct {
    pub fn as_ref(&self) -> &[u8] {
        &self.data[..self.data_size as usize]
    }

    pub fn from_slice(src: &[u8]) -> Self {
        let mut s = Self::default();
        s.data_size = src.len() as u16;
        s.data[..src.len()].copy_from_slice(src);
        s
    }
}

impl SpdmDigestStruct {
    /// Digests are width-dependent (sized to the negotiated base hash
    /// algorithm), so unlike most wire types there is no context-free
    /// `Codec::read` -- callers pass the negotiated size explicitly.
    pub fn encode(&self, bytes: &mut Writer) {
        let _ = bytes.extend_from_slice(self.as_ref());
    }

    pub fn read_with_size(r: &mut Reader, size: u16) -> Option<SpdmDigestStruct> {
        let raw = r.take(size as usize)?;
        Some(SpdmDigestStruct::from_slice(raw))
    }
}

#[derive(Debug, Clone)]
pub struct SpdmSignatureStruct {
    pub data_size: u16,
    pub data: [u8; SPDM_MAX_ASYM_KEY_SIZE],
}

impl Default for SpdmSignatureStruct {
    fn default() -> Self {
        SpdmSignatureStruct {
            data_size: 0,
            data: [0u8; SPDM_MAX_ASYM_KEY_SIZE],
        }
    }
}

impl SpdmSignatureStruct {
    pub fn as_ref(&self) -> &[u8] {
        &self.data[..self.data_size as usize]
    }

    pub fn encode(&self, bytes: &mut Writer) {
        let _ = bytes.extend_from_slice(self.as_ref());
    }

    pub fn from_slice(src: &[u8]) -> Self {
        let mut s = Self::default();
        s.data_size = src.len() as u16;
        s.data[..src.len()].copy_from_slice(src);
        s
    }

    pub fn read_with_size(r: &mut Reader, size: u16) -> Option<SpdmSignatureStruct> {
        let raw = r.take(size as usize)?;
        Some(SpdmSignatureStruct::from_slice(raw))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpdmNonceStruct {
    pub data: [u8; SPDM_NONCE_SIZE],
}

impl Default for SpdmNonceStruct {
    fn default() -> Self {
        SpdmNonceStruct {
            data: [0u8; SPDM_NONCE_SIZE],
        }
    }
}

impl Codec for SpdmNonceStruct {
    fn encode(&self, bytes: &mut Writer) {
        let _ = bytes.extend_from_slice(&self.data);
    }

    fn read(r: &mut Reader) -> Option<SpdmNonceStruct> {
        let raw = r.take(SPDM_NONCE_SIZE)?;
        let mut data = [0u8; SPDM_NONCE_SIZE];
        data.copy_from_slice(raw);
        Some(SpdmNonceStruct { data })
    }
}

#[derive(Debug, Clone)]
pub struct SpdmOpaqueStruct {
    pub data_size: u16,
    pub data: [u8; MAX_SPDM_OPAQUE_SIZE],
}

impl Default for SpdmOpaqueStruct {
    fn default() -> Self {
        SpdmOpaqueStruct {
            data_size: 0,
            data: [0u8; MAX_SPDM_OPAQUE_SIZE],
        }
    }
}

impl SpdmOpaqueStruct {
    pub fn as_ref(&self) -> &[u8] {
        &self.data[..self.data_size as usize]
    }
}

impl Codec for SpdmOpaqueStruct {
    fn encode(&self, bytes: &mut Writer) {
        self.data_size.encode(bytes);
        let _ = bytes.extend_from_slice(self.as_ref());
    }

    fn read(r: &mut Reader) -> Option<SpdmOpaqueStruct> {
        let data_size = u16::read(r)?;
        let raw = r.take(data_size as usize)?;
        let mut s = SpdmOpaqueStruct {
            data_size,
            data: [0u8; MAX_SPDM_OPAQUE_SIZE],
        };
        s.data[..raw.len()].copy_from_slice(raw);
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_roundtrip() {
        let mut buf = [0u8; 64];
        let mut w = Writer::init(&mut buf);
        let mut value = SpdmOpaqueStruct::default();
        value.data_size = 4;
        value.data[..4].copy_from_slice(&[1, 2, 3, 4]);
        value.encode(&mut w);
        let mut r = Reader::init(&buf);
        let parsed = SpdmOpaqueStruct::read(&mut r).unwrap();
        assert_eq!(parsed.as_ref(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_digest_width_dependent_roundtrip() {
        let mut buf = [0u8; 48];
        let mut w = Writer::init(&mut buf);
        let value = SpdmDigestStruct::from_slice(&[7u8; 48]);
        value.encode(&mut w);
        let mut r = Reader::init(&buf);
        let parsed = SpdmDigestStruct::read_with_size(&mut r, 48).unwrap();
        assert_eq!(parsed.as_ref(), &[7u8; 48]);
    }
}
