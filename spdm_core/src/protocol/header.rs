// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

use codec::{enum_builder, Codec, Reader, Writer};

enum_builder! {
    @U8
    EnumName: SpdmVersion;
    EnumVal{
        SpdmVersion10 => 0x10,
        SpdmVersion11 => 0x11,
        SpdmVersion12 => 0x12
    }
}

enum_builder! {
    @U8
    EnumName: SpdmRequestResponseCode;
    EnumVal{
        SpdmRequestGetVersion => 0x84,
        SpdmRequestGetCapabilities => 0xE1,
        SpdmRequestNegotiateAlgorithms => 0xE3,
        SpdmRequestGetDigests => 0x81,
        SpdmRequestGetCertificate => 0x82,
        SpdmRequestChallenge => 0x83,
        SpdmRequestGetMeasurements => 0xE0,
        SpdmRequestKeyExchange => 0xE4,
        SpdmRequestFinish => 0xE5,
        SpdmRequestPskExchange => 0xE6,
        SpdmRequestPskFinish => 0xE7,
        SpdmRequestKeyUpdate => 0xE9,
        SpdmResponseVersion => 0x04,
        SpdmResponseCapabilities => 0x61,
        SpdmResponseAlgorithms => 0x63,
        SpdmResponseDigests => 0x01,
        SpdmResponseCertificate => 0x02,
        SpdmResponseChallengeAuth => 0x03,
        SpdmResponseMeasurements => 0x60,
        SpdmResponseKeyExchangeRsp => 0x64,
        SpdmResponseFinishRsp => 0x65,
        SpdmResponsePskExchangeRsp => 0x66,
        SpdmResponsePskFinishRsp => 0x67,
        SpdmResponseKeyUpdateAck => 0x69,
        SpdmResponseError => 0x7F
    }
}

enum_builder! {
    @U8
    EnumName: SpdmErrorCode;
    EnumVal{
        SpdmErrorInvalidRequest => 0x01,
        SpdmErrorBusy => 0x03,
        SpdmErrorUnexpectedRequest => 0x04,
        SpdmErrorUnspecified => 0x05,
        SpdmErrorDecryptError => 0x06,
        SpdmErrorRequestResynch => 0x07,
        SpdmErrorResponseNotReady => 0x42,
        SpdmErrorRequestInFlight => 0x08
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpdmMessageHeader {
    pub version: SpdmVersion,
    pub request_response_code: SpdmRequestResponseCode,
}

impl Codec for SpdmMessageHeader {
    fn encode(&self, bytes: &mut Writer) {
        self.version.encode(bytes);
        self.request_response_code.encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<SpdmMessageHeader> {
        let version = SpdmVersion::read(r)?;
        let request_response_code = SpdmRequestResponseCode::read(r)?;
        Some(SpdmMessageHeader {
            version,
            request_response_code,
        })
    }
}

/// The responder's `ResponseNotReady` extended error data (spec §7
/// `NoResponse`): the code the caller should retry against, and the
/// exponential backoff exponent it should sleep `2 << rdt_exponent`
/// microseconds for.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpdmErrorResponseNotReadyExtData {
    pub request_code: u8,
    pub token: u8,
    pub rdt_exponent: u8,
    pub rdtm: u8,
}

impl Codec for SpdmErrorResponseNotReadyExtData {
    fn encode(&self, bytes: &mut Writer) {
        self.request_code.encode(bytes);
        self.token.encode(bytes);
        self.rdt_exponent.encode(bytes);
        self.rdtm.encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<SpdmErrorResponseNotReadyExtData> {
        Some(SpdmErrorResponseNotReadyExtData {
            request_code: u8::read(r)?,
            token: u8::read(r)?,
            rdt_exponent: u8::read(r)?,
            rdtm: u8::read(r)?,
        })
    }
}
