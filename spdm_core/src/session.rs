// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! SessionInfo and SessionTable (spec §3, §4.6). A session's 32-bit ID
//! is always the concatenation of a requester half-ID (high 16 bits)
//! and a responder half-ID (low 16 bits); the engine, acting as
//! responder, owns the low half and accepts whatever high half the
//! requester proposed.

use crate::config::{INVALID_SESSION_ID, MAX_SPDM_SESSION_COUNT, SPDM_MAX_HASH_SIZE};
use crate::context::SecuredMessageContext;
use crate::error::{SpdmError, SpdmResult};
use crate::transcript::SessionTranscript;
use zeroize::ZeroizeOnDrop;

/// The two handshake secrets HmacBinding keys its FINISH-path HMACs
/// with (spec §4.4). Kept alongside the session instead of passed in
/// from outside so they are scrubbed the moment a session is freed or
/// the table is torn down, rather than lingering in whatever stack
/// frame derived them.
#[derive(ZeroizeOnDrop)]
pub struct SessionSecrets {
    requester_handshake_secret: [u8; SPDM_MAX_HASH_SIZE],
    responder_handshake_secret: [u8; SPDM_MAX_HASH_SIZE],
    #[zeroize(skip)]
    len: usize,
}

impl Default for SessionSecrets {
    fn default() -> Self {
        SessionSecrets {
            requester_handshake_secret: [0u8; SPDM_MAX_HASH_SIZE],
            responder_handshake_secret: [0u8; SPDM_MAX_HASH_SIZE],
            len: 0,
        }
    }
}

impl SessionSecrets {
    pub fn set(&mut self, requester: &[u8], responder: &[u8]) -> SpdmResult<()> {
        if requester.len() != responder.len() || requester.len() > SPDM_MAX_HASH_SIZE {
            return Err(SpdmError::InvalidParameter);
        }
        self.requester_handshake_secret[..requester.len()].copy_from_slice(requester);
        self.responder_handshake_secret[..responder.len()].copy_from_slice(responder);
        self.len = requester.len();
        Ok(())
    }

    pub fn requester(&self) -> &[u8] {
        &self.requester_handshake_secret[..self.len]
    }

    pub fn responder(&self) -> &[u8] {
        &self.responder_handshake_secret[..self.len]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    /// KEY_EXCHANGE/PSK_EXCHANGE accepted; handshake keys derived, no
    /// FINISH/PSK_FINISH yet.
    Handshaking,
    /// FINISH/PSK_FINISH verified; application data keys are live.
    Established,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    CertBased,
    Psk,
}

pub struct SessionInfo {
    pub session_id: u32,
    pub state: SessionState,
    pub kind: SessionKind,
    pub mutual_auth: bool,
    pub transcript: SessionTranscript,
    pub secrets: SessionSecrets,
    /// Opaque handle to the secured-message (AEAD) collaborator context
    /// for this session (spec §3 "SessionInfo owns the secured-message
    /// context handle"). `None` until `attach_secured_message` is called
    /// during session setup; dropped (and with it, whatever key material
    /// the collaborator holds) when the row is freed.
    secured_message: Option<Box<dyn SecuredMessageContext>>,
}

impl SessionInfo {
    fn new(session_id: u32, kind: SessionKind) -> Self {
        SessionInfo {
            session_id,
            state: SessionState::NotStarted,
            kind,
            mutual_auth: false,
            transcript: SessionTranscript::default(),
            secrets: SessionSecrets::default(),
            secured_message: None,
        }
    }

    pub fn requester_half(&self) -> u16 {
        (self.session_id >> 16) as u16
    }

    pub fn responder_half(&self) -> u16 {
        (self.session_id & 0xFFFF) as u16
    }

    /// Wires the secured-message collaborator into this row (spec §3
    /// "init secured-message context" during session setup).
    pub fn attach_secured_message(&mut self, ctx: Box<dyn SecuredMessageContext>) {
        self.secured_message = Some(ctx);
    }

    pub fn secured_message(&self) -> SpdmResult<&dyn SecuredMessageContext> {
        self.secured_message.as_deref().ok_or(SpdmError::InvalidState)
    }

    pub fn secured_message_mut(&mut self) -> SpdmResult<&mut (dyn SecuredMessageContext + 'static)> {
        self.secured_message.as_deref_mut().ok_or(SpdmError::InvalidState)
    }
}

/// Fixed-capacity session table (spec §4.6): at most
/// `MAX_SPDM_SESSION_COUNT` concurrent sessions, each keyed by its full
/// 32-bit session ID.
#[derive(Default)]
pub struct SessionTable {
    slots: [Option<SessionInfo>; MAX_SPDM_SESSION_COUNT],
    next_responder_half: u16,
    next_requester_half: u16,
}

impl Default for SessionInfo {
    fn default() -> Self {
        SessionInfo::new(INVALID_SESSION_ID, SessionKind::CertBased)
    }
}

impl SessionTable {
    pub fn new() -> Self {
        SessionTable {
            slots: Default::default(),
            next_responder_half: 1,
            next_requester_half: 1,
        }
    }

    fn alloc_responder_half(&mut self) -> SpdmResult<u16> {
        let start = self.next_responder_half;
        loop {
            let candidate = self.next_responder_half;
            self.next_responder_half = self.next_responder_half.wrapping_add(1);
            if self.next_responder_half == 0 {
                self.next_responder_half = 1;
            }
            if !self.slots.iter().flatten().any(|s| s.responder_half() == candidate) {
                return Ok(candidate);
            }
            if self.next_responder_half == start {
                return Err(SpdmError::ResourceExhausted);
            }
        }
    }

    /// Allocates a fresh requester half-ID, unique among the requester
    /// halves of currently live sessions (spec §8 P6). Used by this
    /// engine's own embedded-requester role when it initiates a session
    /// rather than accepting one proposed by a peer.
    pub fn alloc_req_session_id(&mut self) -> SpdmResult<u16> {
        let start = self.next_requester_half;
        loop {
            let candidate = self.next_requester_half;
            self.next_requester_half = self.next_requester_half.wrapping_add(1);
            if self.next_requester_half == 0 {
                self.next_requester_half = 1;
            }
            if !self.slots.iter().flatten().any(|s| s.requester_half() == candidate) {
                return Ok(candidate);
            }
            if self.next_requester_half == start {
                return Err(SpdmError::ResourceExhausted);
            }
        }
    }

    /// Assigns a session row for a full session ID the caller already
    /// determined (spec §4.6). Rejects `INVALID_SESSION_ID` and any ID
    /// already live; fails with `ResourceExhausted` once
    /// `MAX_SPDM_SESSION_COUNT` sessions are live ("fixed capacity, no
    /// eviction").
    pub fn assign(&mut self, session_id: u32, kind: SessionKind) -> SpdmResult<u32> {
        if session_id == INVALID_SESSION_ID {
            return Err(SpdmError::InvalidParameter);
        }
        if self.lookup(session_id).is_some() {
            return Err(SpdmError::InvalidParameter);
        }
        let free_slot = self
            .slots
            .iter_mut()
            .find(|s| s.is_none())
            .ok_or(SpdmError::ResourceExhausted)?;
        *free_slot = Some(SessionInfo::new(session_id, kind));
        log::info!("session 0x{:08x} established ({} active)", session_id, self.active_count());
        Ok(session_id)
    }

    /// Responder-role convenience: allocates this engine's responder
    /// half, combines it with the requester-proposed half from an
    /// incoming KEY_EXCHANGE/PSK_EXCHANGE, and assigns the session.
    pub fn assign_responder(&mut self, requester_half: u16, kind: SessionKind) -> SpdmResult<u32> {
        let responder_half = self.alloc_responder_half()?;
        let session_id = ((requester_half as u32) << 16) | responder_half as u32;
        self.assign(session_id, kind)
    }

    pub fn lookup(&self, session_id: u32) -> Option<&SessionInfo> {
        self.slots
            .iter()
            .flatten()
            .find(|s| s.session_id == session_id)
    }

    pub fn lookup_mut(&mut self, session_id: u32) -> Option<&mut SessionInfo> {
        self.slots
            .iter_mut()
            .flatten()
            .find(|s| s.session_id == session_id)
    }

    /// Frees a session's slot (spec §4.6: END_SESSION or a fatal
    /// transport/decrypt error). Returns `InvalidState` if no such
    /// session exists, matching spec §7's "operate on a nonexistent
    /// session" error mapping.
    pub fn free(&mut self, session_id: u32) -> SpdmResult<()> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| matches!(s, Some(info) if info.session_id == session_id))
            .ok_or(SpdmError::InvalidState)?;
        *slot = None;
        log::info!("session 0x{:08x} freed", session_id);
        Ok(())
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}
