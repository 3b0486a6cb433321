// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! MeasurementSummary component (spec §4.5). Folds a measurement record
//! into the single digest that CHALLENGE_AUTH/KEY_EXCHANGE_RSP carry as
//! `measurement_summary_hash`, per the three summary kinds a requester
//! can ask for.

use crate::crypto::CryptoProvider;
use crate::error::{SpdmError, SpdmResult};
use crate::protocol::common_struct::SpdmDigestStruct;
use crate::protocol::measurement_block::{SpdmMeasurementRecordStructure, IMMUTABLE_ROM};
use crate::protocol::SpdmBaseHashAlgo;

/// `measurement_summary_hash_type` on the wire (DSP0274 Table "Summary
/// hash type"): 0 = none, 1 = TCB, 0xFF = all measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementSummaryKind {
    No,
    Tcb,
    All,
}

impl MeasurementSummaryKind {
    pub fn from_wire(v: u8) -> SpdmResult<Self> {
        match v {
            0 => Ok(MeasurementSummaryKind::No),
            1 => Ok(MeasurementSummaryKind::Tcb),
            0xFF => Ok(MeasurementSummaryKind::All),
            _ => Err(SpdmError::InvalidParameter),
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            MeasurementSummaryKind::No => 0,
            MeasurementSummaryKind::Tcb => 1,
            MeasurementSummaryKind::All => 0xFF,
        }
    }
}

/// Hashes the blocks a `MeasurementSummaryKind` selects out of `record`,
/// concatenating each block's DMTF sub-structure value bytes in index
/// order before the final hash (spec §4.5). Returns a zero-filled digest
/// sized to `hash_algo` for `No`, not an empty one -- the field is still
/// present at its negotiated width on the wire, just meaningless.
pub fn summarize(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    record: &SpdmMeasurementRecordStructure,
    kind: MeasurementSummaryKind,
) -> SpdmResult<SpdmDigestStruct> {
    if kind == MeasurementSummaryKind::No {
        let zeros = vec![0u8; hash_algo.get_size() as usize];
        return Ok(SpdmDigestStruct::from_slice(&zeros));
    }

    let mut concatenated = alloc_scratch();
    for block in record.blocks() {
        let include = match kind {
            MeasurementSummaryKind::All => true,
            MeasurementSummaryKind::Tcb => block.measurement.r#type == IMMUTABLE_ROM,
            MeasurementSummaryKind::No => false,
        };
        if include {
            concatenated.extend_from_slice(&block.measurement.value[..block.measurement.value_size as usize]);
        }
    }
    crypto.hash(hash_algo, &concatenated)
}

fn alloc_scratch() -> Vec<u8> {
    Vec::with_capacity(crate::config::MAX_SPDM_MEASUREMENT_VALUE_LEN * 8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto_software::SoftwareCryptoProvider;
    use crate::protocol::measurement_block::{
        SpdmDmtfMeasurementStructure, SpdmDmtfMeasurementType, SpdmMeasurementBlockStructure,
    };
    use crate::protocol::SpdmMeasurementSpecification;

    fn block(idx: u8, ty: SpdmDmtfMeasurementType, value: &[u8]) -> SpdmMeasurementBlockStructure {
        let mut measurement = SpdmDmtfMeasurementStructure {
            r#type: ty,
            value_size: value.len() as u16,
            ..Default::default()
        };
        measurement.value[..value.len()].copy_from_slice(value);
        SpdmMeasurementBlockStructure {
            index: idx,
            measurement_specification: SpdmMeasurementSpecification::DMTF,
            measurement_size: 3 + value.len() as u16,
            measurement,
        }
    }

    #[test]
    fn test_no_summary_is_zero_filled_and_hash_sized() {
        let crypto = SoftwareCryptoProvider;
        let record = SpdmMeasurementRecordStructure::default();
        let digest = summarize(&crypto, SpdmBaseHashAlgo::TPM_ALG_SHA_256, &record, MeasurementSummaryKind::No)
            .unwrap();
        assert_eq!(digest.data_size, 32);
        assert_eq!(digest.as_ref(), &[0u8; 32]);
    }

    #[test]
    fn test_tcb_selects_only_rom_blocks() {
        let crypto = SoftwareCryptoProvider;
        let mut record = SpdmMeasurementRecordStructure::default();
        record.record[0] = block(1, SpdmDmtfMeasurementType::SpdmDmtfMeasurementRom, b"romcode");
        record.record[1] = block(
            2,
            SpdmDmtfMeasurementType::SpdmDmtfMeasurementUpdatableFirmware,
            b"fwblob",
        );
        record.number_of_blocks = 2;

        let tcb = summarize(&crypto, SpdmBaseHashAlgo::TPM_ALG_SHA_256, &record, MeasurementSummaryKind::Tcb)
            .unwrap();
        let expected = crypto.hash(SpdmBaseHashAlgo::TPM_ALG_SHA_256, b"romcode").unwrap();
        assert_eq!(tcb.as_ref(), expected.as_ref());
    }

    #[test]
    fn test_all_concatenates_every_block() {
        let crypto = SoftwareCryptoProvider;
        let mut record = SpdmMeasurementRecordStructure::default();
        record.record[0] = block(1, SpdmDmtfMeasurementType::SpdmDmtfMeasurementRom, b"a");
        record.record[1] = block(
            2,
            SpdmDmtfMeasurementType::SpdmDmtfMeasurementUpdatableFirmware,
            b"b",
        );
        record.number_of_blocks = 2;

        let all = summarize(&crypto, SpdmBaseHashAlgo::TPM_ALG_SHA_256, &record, MeasurementSummaryKind::All)
            .unwrap();
        let expected = crypto.hash(SpdmBaseHashAlgo::TPM_ALG_SHA_256, b"ab").unwrap();
        assert_eq!(all.as_ref(), expected.as_ref());
    }
}
