// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! ConnectionInfo and ConnectionState (spec §3). One connection per
//! `DeviceContext`; a connection's negotiated parameters and peer
//! certificate chain only become trustworthy once the state machine has
//! advanced past the exchange that establishes them.

use crate::error::{SpdmError, SpdmResult};
use crate::protocol::cert::SpdmCertChainBuffer;
use crate::protocol::SpdmNegotiateInfo;

/// spec §3's connection state machine. Each variant names the last
/// exchange completed; `Authenticated` is reached after a verified
/// CHALLENGE_AUTH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConnectionState {
    NotStarted,
    AfterVersion,
    AfterCapabilities,
    AfterNegotiateAlgorithms,
    AfterDigests,
    AfterCertificate,
    Authenticated,
}

impl Default for ConnectionState {
    fn default() -> Self {
        ConnectionState::NotStarted
    }
}

#[derive(Default)]
pub struct ConnectionInfo {
    pub state: ConnectionState,
    pub negotiate_info: SpdmNegotiateInfo,
    pub peer_cert_chain: Option<SpdmCertChainBuffer>,
}

impl ConnectionInfo {
    /// Fails with `InvalidState` when the connection has not reached
    /// `required` yet -- the same guard every operation handler in spec
    /// §4's component list applies before touching negotiated
    /// parameters.
    pub fn require_state(&self, required: ConnectionState) -> SpdmResult<()> {
        if self.state < required {
            return Err(SpdmError::InvalidState);
        }
        Ok(())
    }

    pub fn advance_to(&mut self, next: ConnectionState) -> SpdmResult<()> {
        if next <= self.state && next != ConnectionState::NotStarted {
            log::warn!("rejected non-forward connection state move {:?} -> {:?}", self.state, next);
            return Err(SpdmError::InvalidState);
        }
        log::debug!("connection state {:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(())
    }

    pub fn peer_chain(&self) -> SpdmResult<&SpdmCertChainBuffer> {
        self.peer_cert_chain.as_ref().ok_or(SpdmError::MissingChain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_ordering_gates_operations() {
        let info = ConnectionInfo::default();
        assert!(info.require_state(ConnectionState::NotStarted).is_ok());
        assert_eq!(
            info.require_state(ConnectionState::Authenticated),
            Err(SpdmError::InvalidState)
        );
    }

    #[test]
    fn test_advance_rejects_non_forward_moves() {
        let mut info = ConnectionInfo::default();
        info.advance_to(ConnectionState::AfterVersion).unwrap();
        info.advance_to(ConnectionState::AfterCapabilities).unwrap();
        assert_eq!(
            info.advance_to(ConnectionState::AfterVersion),
            Err(SpdmError::InvalidState)
        );
    }

    #[test]
    fn test_missing_chain_reported() {
        let info = ConnectionInfo::default();
        assert_eq!(info.peer_chain(), Err(SpdmError::MissingChain));
    }
}
