// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! Negotiated-algorithm and capability types. These are the connection
//! parameters spec §3 says become valid only after NEGOTIATE_ALGORITHMS;
//! [`crate::connection::ConnectionInfo`] stores one of each.

use bitflags::bitflags;
use codec::{enum_builder, Codec, Reader, Writer};
use crate::protocol::SpdmVersion;

bitflags! {
    #[derive(Default)]
    pub struct SpdmRequestCapabilityFlags: u32 {
        const CERT_CAP = 0b0000_0010;
        const CHAL_CAP = 0b0000_0100;
        const ENCRYPT_CAP = 0b0100_0000;
        const MAC_CAP = 0b1000_0000;
        const MUT_AUTH_CAP = 0b0001_0000_0000;
        const KEY_EX_CAP = 0b0010_0000_0000;
        const PSK_CAP = 0b0100_0000_0000;
        const ENCAP_CAP = 0b0000_0001_0000_0000_0000;
        const HBEAT_CAP = 0b0000_0010_0000_0000_0000;
        const KEY_UPD_CAP = 0b0000_0100_0000_0000_0000;
        const HANDSHAKE_IN_THE_CLEAR_CAP = 0b0000_1000_0000_0000_0000;
        const PUB_KEY_ID_CAP = 0b0001_0000_0000_0000_0000;
    }
}

bitflags! {
    #[derive(Default)]
    pub struct SpdmResponseCapabilityFlags: u32 {
        const CERT_CAP = 0b0000_0010;
        const CHAL_CAP = 0b0000_0100;
        const MEAS_CAP_NO_SIG = 0b0000_1000;
        const MEAS_CAP_SIG = 0b0001_0000;
        const MEAS_FRESH_CAP = 0b0010_0000;
        const ENCRYPT_CAP = 0b0100_0000;
        const MAC_CAP = 0b1000_0000;
        const MUT_AUTH_CAP = 0b0001_0000_0000;
        const KEY_EX_CAP = 0b0010_0000_0000;
        const PSK_CAP = 0b0100_0000_0000;
        const PSK_RSP_SESSION_ID_CAP = 0b1000_0000_0000;
        const ENCAP_CAP = 0b0000_0001_0000_0000_0000;
        const HBEAT_CAP = 0b0000_0010_0000_0000_0000;
        const KEY_UPD_CAP = 0b0000_0100_0000_0000_0000;
        const HANDSHAKE_IN_THE_CLEAR_CAP = 0b0000_1000_0000_0000_0000;
        const PUB_KEY_ID_CAP = 0b0001_0000_0000_0000_0000;
    }
}

macro_rules! impl_codec_for_flags_u32 {
    ($ty:ty) => {
        impl Codec for $ty {
            fn encode(&self, bytes: &mut Writer) {
                self.bits().encode(bytes);
            }

            fn read(r: &mut Reader) -> Option<$ty> {
                let bits = u32::read(r)?;
                <$ty>::from_bits(bits)
            }
        }
    };
}

impl_codec_for_flags_u32!(SpdmRequestCapabilityFlags);
impl_codec_for_flags_u32!(SpdmResponseCapabilityFlags);

enum_builder! {
    @U8
    EnumName: SpdmMeasurementSpecification;
    EnumVal{
        DMTF => 0x1
    }
}

enum_builder! {
    @U32
    EnumName: SpdmMeasurementHashAlgo;
    EnumVal{
        RAW_BIT_STREAM => 0x1,
        TPM_ALG_SHA_256 => 0x2,
        TPM_ALG_SHA_384 => 0x4,
        TPM_ALG_SHA_512 => 0x8
    }
}

enum_builder! {
    @U32
    EnumName: SpdmBaseAsymAlgo;
    EnumVal{
        TPM_ALG_RSASSA_2048 => 0x1,
        TPM_ALG_RSASSA_3072 => 0x4,
        TPM_ALG_RSASSA_4096 => 0x10,
        TPM_ALG_ECDSA_ECC_NIST_P256 => 0x20,
        TPM_ALG_ECDSA_ECC_NIST_P384 => 0x40,
        TPM_ALG_ECDSA_ECC_NIST_P521 => 0x80
    }
}

enum_builder! {
    @U32
    EnumName: SpdmBaseHashAlgo;
    EnumVal{
        TPM_ALG_SHA_256 => 0x1,
        TPM_ALG_SHA_384 => 0x2,
        TPM_ALG_SHA_512 => 0x4
    }
}

enum_builder! {
    @U16
    EnumName: SpdmDheAlgo;
    EnumVal{
        SECP_256_R1 => 0x8,
        SECP_384_R1 => 0x10,
        SECP_521_R1 => 0x20
    }
}

enum_builder! {
    @U16
    EnumName: SpdmAeadAlgo;
    EnumVal{
        AES_128_GCM => 0x1,
        AES_256_GCM => 0x2,
        CHACHA20_POLY1305 => 0x4
    }
}

enum_builder! {
    @U16
    EnumName: SpdmReqAsymAlgo;
    EnumVal{
        TPM_ALG_RSASSA_2048 => 0x1,
        TPM_ALG_RSAPSS_2048 => 0x8,
        TPM_ALG_ECDSA_ECC_NIST_P256 => 0x40,
        TPM_ALG_ECDSA_ECC_NIST_P384 => 0x80
    }
}

enum_builder! {
    @U16
    EnumName: SpdmKeyScheduleAlgo;
    EnumVal{
        SPDM_KEY_SCHEDULE => 0x1
    }
}

impl SpdmBaseHashAlgo {
    /// Output size in bytes of the selected hash, used to size
    /// `SpdmDigestStruct` buffers and to assert the caller's HMAC output
    /// matches the connection hash size (spec §4.4).
    pub fn get_size(&self) -> u16 {
        match self {
            SpdmBaseHashAlgo::TPM_ALG_SHA_256 => 32,
            SpdmBaseHashAlgo::TPM_ALG_SHA_384 => 48,
            SpdmBaseHashAlgo::TPM_ALG_SHA_512 => 64,
            SpdmBaseHashAlgo::Unknown(_) => 0,
        }
    }
}

impl SpdmMeasurementHashAlgo {
    pub fn get_size(&self) -> u16 {
        match self {
            SpdmMeasurementHashAlgo::RAW_BIT_STREAM => 0,
            SpdmMeasurementHashAlgo::TPM_ALG_SHA_256 => 32,
            SpdmMeasurementHashAlgo::TPM_ALG_SHA_384 => 48,
            SpdmMeasurementHashAlgo::TPM_ALG_SHA_512 => 64,
            SpdmMeasurementHashAlgo::Unknown(_) => 0,
        }
    }
}

impl SpdmBaseAsymAlgo {
    pub fn get_size(&self) -> u16 {
        match self {
            SpdmBaseAsymAlgo::TPM_ALG_RSASSA_2048 => 256,
            SpdmBaseAsymAlgo::TPM_ALG_RSASSA_3072 => 384,
            SpdmBaseAsymAlgo::TPM_ALG_RSASSA_4096 => 512,
            SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256 => 64,
            SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P384 => 96,
            SpdmBaseAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P521 => 132,
            SpdmBaseAsymAlgo::Unknown(_) => 0,
        }
    }
}

impl SpdmReqAsymAlgo {
    pub fn get_size(&self) -> u16 {
        match self {
            SpdmReqAsymAlgo::TPM_ALG_RSASSA_2048 => 256,
            SpdmReqAsymAlgo::TPM_ALG_RSAPSS_2048 => 256,
            SpdmReqAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P256 => 64,
            SpdmReqAsymAlgo::TPM_ALG_ECDSA_ECC_NIST_P384 => 96,
            SpdmReqAsymAlgo::Unknown(_) => 0,
        }
    }
}

/// The negotiated parameters of a connection (spec §3 ConnectionInfo).
/// Fields are only meaningful once `ConnectionState` has advanced past
/// the corresponding exchange.
#[derive(Debug, Clone, Default)]
pub struct SpdmNegotiateInfo {
    pub spdm_version_sel: SpdmVersion,
    pub req_ct_exponent_sel: u8,
    pub req_capabilities_sel: SpdmRequestCapabilityFlags,
    pub rsp_ct_exponent_sel: u8,
    pub rsp_capabilities_sel: SpdmResponseCapabilityFlags,
    pub measurement_specification_sel: SpdmMeasurementSpecification,
    pub measurement_hash_sel: SpdmMeasurementHashAlgo,
    pub base_hash_sel: SpdmBaseHashAlgo,
    pub base_asym_sel: SpdmBaseAsymAlgo,
    pub dhe_sel: SpdmDheAlgo,
    pub aead_sel: SpdmAeadAlgo,
    pub req_asym_sel: SpdmReqAsymAlgo,
    pub key_schedule_sel: SpdmKeyScheduleAlgo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_flags_roundtrip() {
        let mut buf = [0u8; 4];
        let mut w = Writer::init(&mut buf);
        let flags = SpdmRequestCapabilityFlags::CERT_CAP | SpdmRequestCapabilityFlags::KEY_EX_CAP;
        flags.encode(&mut w);
        let mut r = Reader::init(&buf);
        assert_eq!(SpdmRequestCapabilityFlags::read(&mut r), Some(flags));
    }

    #[test]
    fn test_hash_sizes() {
        assert_eq!(SpdmBaseHashAlgo::TPM_ALG_SHA_256.get_size(), 32);
        assert_eq!(SpdmBaseHashAlgo::TPM_ALG_SHA_384.get_size(), 48);
        assert_eq!(SpdmBaseHashAlgo::TPM_ALG_SHA_512.get_size(), 64);
    }
}
