// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! DMTF measurement block wire layout (spec §4.5, §6). Each block is a
//! common header (`index`, `measurement_specification`, `measurement_size`)
//! followed by a DMTF sub-header (`value_type`, `value_size`) and the
//! value itself. `measurement_size` must equal
//! `sizeof(DMTF header) + value_size`; on the responder side a mismatch
//! is the fatal "internal consistency" failure spec §4.5 names.

use crate::config::{MAX_SPDM_MEASUREMENT_BLOCK_COUNT, MAX_SPDM_MEASUREMENT_VALUE_LEN};
use crate::error::{SpdmError, SpdmResult};
use codec::{enum_builder, Codec, Reader, Writer};

use super::algo::SpdmMeasurementSpecification;

/// Lower 7 bits of the DMTF value-type byte.
enum_builder! {
    @U8
    EnumName: SpdmDmtfMeasurementType;
    EnumVal{
        SpdmDmtfMeasurementRom => 0x0,
        SpdmDmtfMeasurementUpdatableFirmware => 0x1,
        SpdmDmtfMeasurementHardwareConfig => 0x2,
        SpdmDmtfMeasurementFirmwareConfig => 0x3,
        SpdmDmtfMeasurementFreeform => 0x4,
        SpdmDmtfMeasurementStructuredDebugDeviceMode => 0x5,
        SpdmDmtfMeasurementMutFirmwareVersion => 0x6
    }
}

/// The lower-bits value that spec §4.5's TCB summary selects blocks on.
pub const IMMUTABLE_ROM: SpdmDmtfMeasurementType = SpdmDmtfMeasurementType::SpdmDmtfMeasurementRom;

enum_builder! {
    @U8
    EnumName: SpdmDmtfMeasurementRepresentation;
    EnumVal{
        SpdmDmtfMeasurementDigest => 0x0,
        SpdmDmtfMeasurementRawBitStream => 0x1
    }
}

const DMTF_HEADER_SIZE: u16 = 3; // value_type (1) + value_size (2)
const DMTF_TYPE_REPRESENTATION_BIT: u8 = 0b1000_0000;

#[derive(Debug, Clone, Copy)]
pub struct SpdmDmtfMeasurementStructure {
    pub r#type: SpdmDmtfMeasurementType,
    pub representation: SpdmDmtfMeasurementRepresentation,
    pub value_size: u16,
    pub value: [u8; MAX_SPDM_MEASUREMENT_VALUE_LEN],
}

impl Default for SpdmDmtfMeasurementStructure {
    fn default() -> Self {
        SpdmDmtfMeasurementStructure {
            r#type: SpdmDmtfMeasurementType::default(),
            representation: SpdmDmtfMeasurementRepresentation::default(),
            value_size: 0,
            value: [0u8; MAX_SPDM_MEASUREMENT_VALUE_LEN],
        }
    }
}

impl Codec for SpdmDmtfMeasurementStructure {
    fn encode(&self, bytes: &mut Writer) {
        let type_byte = self.r#type.get_u8()
            | if self.representation == SpdmDmtfMeasurementRepresentation::SpdmDmtfMeasurementRawBitStream
            {
                DMTF_TYPE_REPRESENTATION_BIT
            } else {
                0
            };
        type_byte.encode(bytes);
        self.value_size.encode(bytes);
        let _ = bytes.extend_from_slice(&self.value[..self.value_size as usize]);
    }

    fn read(r: &mut Reader) -> Option<SpdmDmtfMeasurementStructure> {
        let type_byte = u8::read(r)?;
        let representation = if type_byte & DMTF_TYPE_REPRESENTATION_BIT != 0 {
            SpdmDmtfMeasurementRepresentation::SpdmDmtfMeasurementRawBitStream
        } else {
            SpdmDmtfMeasurementRepresentation::SpdmDmtfMeasurementDigest
        };
        let type_reader_buf = [type_byte & !DMTF_TYPE_REPRESENTATION_BIT];
        let mut type_reader = Reader::init(&type_reader_buf);
        let r#type = SpdmDmtfMeasurementType::read(&mut type_reader)?;
        let value_size = u16::read(r)?;
        if value_size as usize > MAX_SPDM_MEASUREMENT_VALUE_LEN {
            return None;
        }
        let raw = r.take(value_size as usize)?;
        let mut value = [0u8; MAX_SPDM_MEASUREMENT_VALUE_LEN];
        value[..raw.len()].copy_from_slice(raw);
        Some(SpdmDmtfMeasurementStructure {
            r#type,
            representation,
            value_size,
            value,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpdmMeasurementBlockStructure {
    pub index: u8,
    pub measurement_specification: SpdmMeasurementSpecification,
    pub measurement_size: u16,
    pub measurement: SpdmDmtfMeasurementStructure,
}

impl SpdmMeasurementBlockStructure {
    /// spec §4.5: `measurement_size` must equal
    /// `sizeof(DMTF header) + dmtf_value_size`.
    pub fn validate_internal_consistency(&self) -> SpdmResult {
        if self.measurement_size != DMTF_HEADER_SIZE + self.measurement.value_size {
            return Err(SpdmError::SecurityViolation);
        }
        Ok(())
    }
}

impl Codec for SpdmMeasurementBlockStructure {
    fn encode(&self, bytes: &mut Writer) {
        self.index.encode(bytes);
        self.measurement_specification.encode(bytes);
        self.measurement_size.encode(bytes);
        self.measurement.encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<SpdmMeasurementBlockStructure> {
        let index = u8::read(r)?;
        let measurement_specification = SpdmMeasurementSpecification::read(r)?;
        let measurement_size = u16::read(r)?;
        let measurement = SpdmDmtfMeasurementStructure::read(r)?;
        let block = SpdmMeasurementBlockStructure {
            index,
            measurement_specification,
            measurement_size,
            measurement,
        };
        block.validate_internal_consistency().ok()?;
        Some(block)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpdmMeasurementRecordStructure {
    pub number_of_blocks: u8,
    pub record: [SpdmMeasurementBlockStructure; MAX_SPDM_MEASUREMENT_BLOCK_COUNT],
}

impl Default for SpdmMeasurementRecordStructure {
    fn default() -> Self {
        SpdmMeasurementRecordStructure {
            number_of_blocks: 0,
            record: [SpdmMeasurementBlockStructure::default(); MAX_SPDM_MEASUREMENT_BLOCK_COUNT],
        }
    }
}

impl SpdmMeasurementRecordStructure {
    pub fn blocks(&self) -> &[SpdmMeasurementBlockStructure] {
        &self.record[..self.number_of_blocks as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen_array_clone<T: Copy, const N: usize>(v: T, n: usize) -> [T; N] {
        let mut arr = [v; N];
        for i in 0..n.min(N) {
            arr[i] = v;
        }
        arr
    }

    #[test]
    fn test_consistency_check_rejects_mismatch() {
        let block = SpdmMeasurementBlockStructure {
            index: 1,
            measurement_specification: SpdmMeasurementSpecification::DMTF,
            measurement_size: 99, // wrong on purpose
            measurement: SpdmDmtfMeasurementStructure {
                value_size: 32,
                ..Default::default()
            },
        };
        assert_eq!(
            block.validate_internal_consistency(),
            Err(SpdmError::SecurityViolation)
        );
    }

    #[test]
    fn test_block_roundtrip() {
        let mut buf = [0u8; 64];
        let mut w = Writer::init(&mut buf);
        let block = SpdmMeasurementBlockStructure {
            index: 3,
            measurement_specification: SpdmMeasurementSpecification::DMTF,
            measurement_size: 3 + 16,
            measurement: SpdmDmtfMeasurementStructure {
                r#type: SpdmDmtfMeasurementType::SpdmDmtfMeasurementRom,
                representation: SpdmDmtfMeasurementRepresentation::SpdmDmtfMeasurementDigest,
                value_size: 16,
                value: gen_array_clone(0xABu8, 16),
            },
        };
        block.encode(&mut w);
        let mut r = Reader::init(&buf);
        let parsed = SpdmMeasurementBlockStructure::read(&mut r).unwrap();
        assert_eq!(parsed.index, 3);
        assert_eq!(parsed.measurement.r#type, SpdmDmtfMeasurementType::SpdmDmtfMeasurementRom);
        assert_eq!(&parsed.measurement.value[..16], &[0xABu8; 16]);
    }
}
