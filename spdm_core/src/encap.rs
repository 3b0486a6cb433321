// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! EncapContext (spec §3): state for the embedded "encapsulated
//! requester" role a responder takes on mid-session to run mutual
//! authentication (spec §4.2's `MessageMutB`/`MessageMutC` terms). Only
//! meaningful once a session has `mutual_auth` set; tracks which encap
//! request is outstanding and the slot the peer should sign with.

use crate::error::{SpdmError, SpdmResult};
use crate::measurement_summary::MeasurementSummaryKind;
use crate::protocol::cert::SpdmCertChainBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncapState {
    Idle,
    /// GET_ENCAPSULATED_REQUEST/ENCAPSULATED_REQUEST issued; awaiting
    /// the peer's DELIVER_ENCAPSULATED_RESPONSE.
    RequestInFlight { request_id: u8 },
    /// The peer's mutual-auth CHALLENGE_AUTH has been delivered and
    /// verified; nothing further to encapsulate this session.
    Complete,
}

/// Caps consecutive encap-flow errors (spec §7's error-counter
/// terminology) before the encapsulated exchange is abandoned rather
/// than retried indefinitely.
const MAX_ENCAP_ERRORS: u8 = 3;

#[derive(Default)]
pub struct EncapContext {
    pub state: Option<EncapState>,
    pub req_slot_id: u8,
    error_count: u8,
    /// Summary hash type the peer's encapsulated GET_MEASUREMENTS should
    /// use, set once and read back when building that request.
    pub measurement_hash_type: Option<MeasurementSummaryKind>,
    /// Scratch space for the certificate chain this engine stages while
    /// acting as the embedded responder handing its own chain to the
    /// peer mid mutual-auth (spec §3's encap cert-chain scratch buffer).
    pub cert_chain_scratch: SpdmCertChainBuffer,
}

impl EncapContext {
    pub fn start(&mut self, req_slot_id: u8) {
        self.req_slot_id = req_slot_id;
        self.error_count = 0;
        self.state = Some(EncapState::RequestInFlight { request_id: 0 });
    }

    /// Advances to the next encapsulated request id, or fails if no
    /// exchange is in flight (spec §7: "operate on a nonexistent
    /// session"-style nonexistent-encap-flow case maps to
    /// `InvalidState`).
    pub fn next_request(&mut self) -> SpdmResult<u8> {
        match self.state {
            Some(EncapState::RequestInFlight { request_id }) => {
                let next_id = request_id.wrapping_add(1);
                self.state = Some(EncapState::RequestInFlight { request_id: next_id });
                Ok(next_id)
            }
            _ => Err(SpdmError::InvalidState),
        }
    }

    /// Records an encap-flow error. Once `MAX_ENCAP_ERRORS` consecutive
    /// errors accumulate, the exchange is abandoned rather than retried.
    pub fn record_error(&mut self) -> SpdmResult<()> {
        if self.state.is_none() {
            return Err(SpdmError::InvalidState);
        }
        self.error_count += 1;
        if self.error_count >= MAX_ENCAP_ERRORS {
            self.state = None;
            return Err(SpdmError::NoResponse);
        }
        Ok(())
    }

    pub fn complete(&mut self) -> SpdmResult<()> {
        match self.state {
            Some(EncapState::RequestInFlight { .. }) => {
                self.state = Some(EncapState::Complete);
                Ok(())
            }
            _ => Err(SpdmError::InvalidState),
        }
    }

    pub fn reset(&mut self) {
        self.state = None;
        self.req_slot_id = 0;
        self.error_count = 0;
        self.measurement_hash_type = None;
        self.cert_chain_scratch = SpdmCertChainBuffer::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encap_lifecycle() {
        let mut ctx = EncapContext::default();
        assert_eq!(ctx.next_request(), Err(SpdmError::InvalidState));
        ctx.start(2);
        assert_eq!(ctx.next_request().unwrap(), 1);
        assert!(ctx.complete().is_ok());
        assert_eq!(ctx.state, Some(EncapState::Complete));
    }

    #[test]
    fn test_reset_clears_state() {
        let mut ctx = EncapContext::default();
        ctx.start(1);
        ctx.measurement_hash_type = Some(MeasurementSummaryKind::Tcb);
        ctx.cert_chain_scratch = SpdmCertChainBuffer::from_full_chain_bytes(&[0u8; 8]).unwrap();
        ctx.reset();
        assert!(ctx.state.is_none());
        assert!(ctx.measurement_hash_type.is_none());
        assert!(ctx.cert_chain_scratch.is_empty());
    }

    #[test]
    fn test_record_error_abandons_after_max_errors() {
        let mut ctx = EncapContext::default();
        assert_eq!(ctx.record_error(), Err(SpdmError::InvalidState));
        ctx.start(1);
        ctx.record_error().unwrap();
        ctx.record_error().unwrap();
        assert_eq!(ctx.record_error(), Err(SpdmError::NoResponse));
        assert!(ctx.state.is_none());
    }
}
