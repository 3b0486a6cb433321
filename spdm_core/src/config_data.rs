// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! Configuration Data API (spec §4.7): the `set_data`/`get_data` surface
//! a host integration uses to provision local certificate chains, the
//! PSK hint, and the mutual-auth request policy before/during a
//! connection.

use crate::config::{MAX_PSK_HINT_LENGTH, MAX_SLOT_COUNT};
use crate::error::{SpdmError, SpdmResult};
use crate::protocol::cert::SpdmCertChainBuffer;
use crate::protocol::common_struct::SpdmDigestStruct;
use crate::protocol::psk_exchange::SpdmPskHintStruct;
use std::convert::TryInto;

/// Which data kind a `set_data`/`get_data` call addresses (spec §4.7's
/// table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpdmDataKind {
    /// Local capability bits (requester or responder register, caller's
    /// role decides which; stored as one raw register).
    CapabilityFlags,
    /// Local `CTExponent` (RTT hint for `ResponseNotReady` backoff).
    CapabilityCTExponent,
    /// Local measurement-hash algorithm preference.
    MeasurementHashAlgo,
    /// Local base asymmetric algorithm preference.
    BaseAsymAlgo,
    /// Local base hash algorithm preference.
    BaseHashAlgo,
    /// Local DHE named-group preference.
    DHENamedGroup,
    /// Local AEAD cipher-suite preference.
    AEADCipherSuite,
    /// Local requester-side asymmetric algorithm preference.
    ReqBaseAsymAlg,
    /// Local key-schedule preference.
    KeySchedule,
    /// Current responder `ResponseState` (handled above this store, at
    /// [`crate::context::DeviceContext`], since that is where the live
    /// `ResponseState` field lives).
    ResponseState,
    /// Local certificate chain for slot `Parameter::slot_id`.
    PublicCertChains,
    /// The peer's certificate chain, provisioned out of band instead of
    /// retrieved via GET_CERTIFICATE.
    PeerPublicCertChains,
    /// The peer's certificate chain root hash, used instead of a full
    /// chain when only pinning is needed.
    PeerPublicRootCertHash,
    /// Number of populated local certificate-chain slots.
    SlotCount,
    /// PSK hint bytes used to select a provisioned key in PSK_EXCHANGE.
    PskHint,
    /// Whether the responder should request mutual authentication on
    /// its own initiative during CHALLENGE.
    BasicMutAuthRequested,
    /// Whether the responder should request mutual authentication via
    /// the encapsulated-request flow during KEY_EXCHANGE/FINISH.
    MutAuthRequested,
}

/// Which side of the connection a `get_data` call reads (spec §4.7
/// `Parameter.location`): the locally configured preference, or the
/// value NEGOTIATE_ALGORITHMS actually selected for the live
/// connection. `set_data` always writes the local side -- there is no
/// way to poke the negotiated value directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataLocation {
    Local,
    Connection,
}

impl Default for DataLocation {
    fn default() -> Self {
        DataLocation::Local
    }
}

/// Addresses a slot-scoped value and/or a read location (spec §4.7
/// `Parameter`). Non-slotted kinds carry `slot_id: 0` and it is ignored;
/// `set_data` ignores `location` since writes only ever touch the local
/// side.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataParameter {
    pub slot_id: u8,
    pub location: DataLocation,
}

/// spec §9 Open Question: no data kind in this engine needs
/// session-scoped storage (everything here is connection- or
/// device-lifetime), so this hook is retained for interface parity with
/// the wire `set_data`/`get_data` commands but always answers `false`.
pub fn need_session_info_for_data(_kind: SpdmDataKind) -> bool {
    false
}

/// spec §9 Open Question: the high bit of the wire data-kind byte marks
/// a vendor/debug-only extension this engine does not implement; any
/// such request is always rejected as unsupported rather than silently
/// accepted or routed anywhere.
pub fn is_debug_only_data(wire_kind: u8) -> bool {
    wire_kind & 0x80 != 0
}

#[derive(Default)]
pub struct ConfigDataStore {
    local_capability_flags: u32,
    local_ct_exponent: u8,
    local_measurement_hash_algo: u32,
    local_base_asym_algo: u32,
    local_base_hash_algo: u32,
    local_dhe_named_group: u16,
    local_aead_cipher_suite: u16,
    local_req_base_asym_alg: u16,
    local_key_schedule: u16,
    local_cert_chains: [Option<SpdmCertChainBuffer>; MAX_SLOT_COUNT],
    slot_count: u8,
    peer_public_cert_chain: Option<SpdmCertChainBuffer>,
    peer_public_root_cert_hash: Option<SpdmDigestStruct>,
    psk_hint: SpdmPskHintStruct,
    basic_mut_auth_requested: bool,
    mut_auth_requested: bool,
}

impl ConfigDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, kind: SpdmDataKind, parameter: DataParameter, value: &[u8]) -> SpdmResult<()> {
        match kind {
            SpdmDataKind::CapabilityFlags => {
                self.local_capability_flags = read_u32(value)?;
                Ok(())
            }
            SpdmDataKind::CapabilityCTExponent => {
                self.local_ct_exponent = *value.first().ok_or(SpdmError::InvalidParameter)?;
                Ok(())
            }
            SpdmDataKind::MeasurementHashAlgo => {
                self.local_measurement_hash_algo = read_u32(value)?;
                Ok(())
            }
            SpdmDataKind::BaseAsymAlgo => {
                self.local_base_asym_algo = read_u32(value)?;
                Ok(())
            }
            SpdmDataKind::BaseHashAlgo => {
                self.local_base_hash_algo = read_u32(value)?;
                Ok(())
            }
            SpdmDataKind::DHENamedGroup => {
                self.local_dhe_named_group = read_u16(value)?;
                Ok(())
            }
            SpdmDataKind::AEADCipherSuite => {
                self.local_aead_cipher_suite = read_u16(value)?;
                Ok(())
            }
            SpdmDataKind::ReqBaseAsymAlg => {
                self.local_req_base_asym_alg = read_u16(value)?;
                Ok(())
            }
            SpdmDataKind::KeySchedule => {
                self.local_key_schedule = read_u16(value)?;
                Ok(())
            }
            // Handled at the DeviceContext level, which owns the live
            // `ResponseState` field; this store has nowhere to put it.
            SpdmDataKind::ResponseState => Err(SpdmError::InvalidParameter),
            SpdmDataKind::PublicCertChains => {
                let slot = self
                    .local_cert_chains
                    .get_mut(parameter.slot_id as usize)
                    .ok_or(SpdmError::InvalidParameter)?;
                *slot = Some(SpdmCertChainBuffer::from_full_chain_bytes(value)?);
                Ok(())
            }
            SpdmDataKind::PeerPublicCertChains => {
                self.peer_public_cert_chain = Some(SpdmCertChainBuffer::from_full_chain_bytes(value)?);
                Ok(())
            }
            SpdmDataKind::PeerPublicRootCertHash => {
                self.peer_public_root_cert_hash = Some(SpdmDigestStruct::from_slice(value));
                Ok(())
            }
            SpdmDataKind::SlotCount => {
                let count = *value.first().ok_or(SpdmError::InvalidParameter)?;
                if count as usize > MAX_SLOT_COUNT {
                    return Err(SpdmError::InvalidParameter);
                }
                self.slot_count = count;
                Ok(())
            }
            SpdmDataKind::PskHint => {
                if value.len() > MAX_PSK_HINT_LENGTH {
                    return Err(SpdmError::BufferTooSmall);
                }
                let mut hint = SpdmPskHintStruct::default();
                hint.data_size = value.len() as u16;
                hint.data[..value.len()].copy_from_slice(value);
                self.psk_hint = hint;
                Ok(())
            }
            // spec §9 Open Question: the wire carries these as a single
            // byte; 0 is canonically false, any nonzero value is true.
            SpdmDataKind::BasicMutAuthRequested => {
                self.basic_mut_auth_requested = *value.first().ok_or(SpdmError::InvalidParameter)? != 0;
                Ok(())
            }
            SpdmDataKind::MutAuthRequested => {
                self.mut_auth_requested = *value.first().ok_or(SpdmError::InvalidParameter)? != 0;
                Ok(())
            }
        }
    }

    pub fn local_chain(&self, slot_id: u8) -> SpdmResult<&SpdmCertChainBuffer> {
        self.local_cert_chains
            .get(slot_id as usize)
            .and_then(|s| s.as_ref())
            .ok_or(SpdmError::MissingChain)
    }

    pub fn peer_chain(&self) -> Option<&SpdmCertChainBuffer> {
        self.peer_public_cert_chain.as_ref()
    }

    pub fn peer_root_hash(&self) -> Option<&SpdmDigestStruct> {
        self.peer_public_root_cert_hash.as_ref()
    }

    pub fn slot_count(&self) -> u8 {
        self.slot_count
    }

    pub fn psk_hint(&self) -> &SpdmPskHintStruct {
        &self.psk_hint
    }

    pub fn basic_mut_auth_requested(&self) -> bool {
        self.basic_mut_auth_requested
    }

    pub fn mut_auth_requested(&self) -> bool {
        self.mut_auth_requested
    }

    /// spec §4.7 `get_data`'s local-side half: every kind this store
    /// owns, read back out. `Parameter.location == Connection` is always
    /// rejected here -- this store only ever holds the locally
    /// configured preference, never what NEGOTIATE_ALGORITHMS actually
    /// selected. [`crate::context::DeviceContext::get_data`] is the
    /// entry point that also serves the connection side and
    /// `ResponseState`, which live outside this store. Returns the
    /// number of bytes written to `out_buf`.
    pub fn get_data(&self, kind: SpdmDataKind, parameter: DataParameter, out_buf: &mut [u8]) -> SpdmResult<usize> {
        if parameter.location == DataLocation::Connection {
            return Err(SpdmError::InvalidParameter);
        }
        match kind {
            SpdmDataKind::CapabilityFlags => write_u32(out_buf, self.local_capability_flags),
            SpdmDataKind::CapabilityCTExponent => write_u8(out_buf, self.local_ct_exponent),
            SpdmDataKind::MeasurementHashAlgo => write_u32(out_buf, self.local_measurement_hash_algo),
            SpdmDataKind::BaseAsymAlgo => write_u32(out_buf, self.local_base_asym_algo),
            SpdmDataKind::BaseHashAlgo => write_u32(out_buf, self.local_base_hash_algo),
            SpdmDataKind::DHENamedGroup => write_u16(out_buf, self.local_dhe_named_group),
            SpdmDataKind::AEADCipherSuite => write_u16(out_buf, self.local_aead_cipher_suite),
            SpdmDataKind::ReqBaseAsymAlg => write_u16(out_buf, self.local_req_base_asym_alg),
            SpdmDataKind::KeySchedule => write_u16(out_buf, self.local_key_schedule),
            SpdmDataKind::ResponseState => Err(SpdmError::InvalidParameter),
            SpdmDataKind::PublicCertChains => {
                let chain = self.local_chain(parameter.slot_id)?;
                write_bytes(out_buf, chain.data())
            }
            SpdmDataKind::PeerPublicCertChains => {
                let chain = self.peer_chain().ok_or(SpdmError::MissingChain)?;
                write_bytes(out_buf, chain.data())
            }
            SpdmDataKind::PeerPublicRootCertHash => {
                let hash = self.peer_root_hash().ok_or(SpdmError::MissingChain)?;
                write_bytes(out_buf, hash.as_ref())
            }
            SpdmDataKind::SlotCount => write_u8(out_buf, self.slot_count),
            SpdmDataKind::PskHint => write_bytes(out_buf, self.psk_hint.as_ref()),
            SpdmDataKind::BasicMutAuthRequested => write_u8(out_buf, self.basic_mut_auth_requested as u8),
            SpdmDataKind::MutAuthRequested => write_u8(out_buf, self.mut_auth_requested as u8),
        }
    }
}

fn read_u16(value: &[u8]) -> SpdmResult<u16> {
    value
        .get(..2)
        .and_then(|b| b.try_into().ok())
        .map(u16::from_le_bytes)
        .ok_or(SpdmError::InvalidParameter)
}

fn read_u32(value: &[u8]) -> SpdmResult<u32> {
    value
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or(SpdmError::InvalidParameter)
}

fn write_bytes(out_buf: &mut [u8], data: &[u8]) -> SpdmResult<usize> {
    if out_buf.len() < data.len() {
        return Err(SpdmError::BufferTooSmall);
    }
    out_buf[..data.len()].copy_from_slice(data);
    Ok(data.len())
}

fn write_u8(out_buf: &mut [u8], v: u8) -> SpdmResult<usize> {
    write_bytes(out_buf, &[v])
}

fn write_u16(out_buf: &mut [u8], v: u16) -> SpdmResult<usize> {
    write_bytes(out_buf, &v.to_le_bytes())
}

fn write_u32(out_buf: &mut [u8], v: u32) -> SpdmResult<usize> {
    write_bytes(out_buf, &v.to_le_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_chain() -> Vec<u8> {
        let mut v = vec![0u8; 4 + 32];
        v.extend([0x30, 0x82, 0x00, 0x04, 0xAA, 0xAA, 0xAA, 0xAA]);
        v
    }

    #[test]
    fn test_set_and_get_local_chain() {
        let mut store = ConfigDataStore::new();
        store
            .set_data(SpdmDataKind::PublicCertChains, DataParameter { slot_id: 0, ..Default::default() }, &fake_chain())
            .unwrap();
        assert!(store.local_chain(0).is_ok());
        assert_eq!(store.local_chain(1), Err(SpdmError::MissingChain));
    }

    #[test]
    fn test_slot_id_out_of_range_rejected() {
        let mut store = ConfigDataStore::new();
        let result = store.set_data(
            SpdmDataKind::PublicCertChains,
            DataParameter { slot_id: MAX_SLOT_COUNT as u8, ..Default::default() },
            &fake_chain(),
        );
        assert_eq!(result, Err(SpdmError::InvalidParameter));
    }

    #[test]
    fn test_basic_mut_auth_requested_canonicalizes_nonzero() {
        let mut store = ConfigDataStore::new();
        store
            .set_data(SpdmDataKind::BasicMutAuthRequested, DataParameter::default(), &[0])
            .unwrap();
        assert!(!store.basic_mut_auth_requested());
        store
            .set_data(SpdmDataKind::BasicMutAuthRequested, DataParameter::default(), &[7])
            .unwrap();
        assert!(store.basic_mut_auth_requested());
    }

    #[test]
    fn test_algorithm_preference_roundtrip() {
        let mut store = ConfigDataStore::new();
        store
            .set_data(SpdmDataKind::BaseHashAlgo, DataParameter::default(), &2u32.to_le_bytes())
            .unwrap();
        let mut out = [0u8; 4];
        let n = store.get_data(SpdmDataKind::BaseHashAlgo, DataParameter::default(), &mut out).unwrap();
        assert_eq!(&out[..n], &2u32.to_le_bytes());
    }

    #[test]
    fn test_get_data_rejects_connection_location() {
        let store = ConfigDataStore::new();
        let mut out = [0u8; 4];
        let parameter = DataParameter { slot_id: 0, location: DataLocation::Connection };
        assert_eq!(
            store.get_data(SpdmDataKind::BaseHashAlgo, parameter, &mut out),
            Err(SpdmError::InvalidParameter)
        );
    }

    #[test]
    fn test_debug_only_data_always_rejected() {
        assert!(is_debug_only_data(0x80));
        assert!(!is_debug_only_data(0x01));
    }

    #[test]
    fn test_need_session_info_for_data_always_false() {
        assert!(!need_session_info_for_data(SpdmDataKind::PskHint));
        assert!(!need_session_info_for_data(SpdmDataKind::MutAuthRequested));
    }
}
