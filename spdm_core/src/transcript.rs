// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! Named transcript buffers (spec §3 TranscriptSet, §3 SessionInfo
//! per-session transcript). Appends happen here and only here; every
//! other component reads these buffers but never mutates them directly
//! (spec §4.2).

use crate::buffer::{LargeManagedBuffer, SmallManagedBuffer};

/// One connection's authentication-dialog transcripts. All cleared by
/// `init_context`; `message_a`/`message_b` are never reset during a
/// connection; `message_c`/`message_mut_c`/`m1m2` reset after each
/// successful CHALLENGE signature; `l1l2` grows across successive
/// GET_MEASUREMENTS and resets when a measurement signature is produced.
#[derive(Default)]
pub struct TranscriptSet {
    pub message_a: SmallManagedBuffer,
    pub message_b: LargeManagedBuffer,
    pub message_c: SmallManagedBuffer,
    pub message_mut_b: LargeManagedBuffer,
    pub message_mut_c: SmallManagedBuffer,
    pub m1m2: LargeManagedBuffer,
    pub l1l2: LargeManagedBuffer,
}

impl TranscriptSet {
    pub fn reset_all(&mut self) {
        log::debug!("resetting full transcript set");
        self.message_a.reset();
        self.message_b.reset();
        self.message_c.reset();
        self.message_mut_b.reset();
        self.message_mut_c.reset();
        self.m1m2.reset();
        self.l1l2.reset();
    }

    /// Reset after a successful CHALLENGE-path verification: C, MutC and
    /// the M1M2 scratch buffer are single-use per spec §3.
    pub fn reset_after_challenge(&mut self) {
        log::trace!("resetting challenge-path transcripts (C, MutC, M1M2)");
        self.message_c.reset();
        self.message_mut_c.reset();
        self.m1m2.reset();
    }

    /// Reset after a successful measurement signature per spec §4.2.
    pub fn reset_after_measurement_signature(&mut self) {
        log::trace!("resetting L1L2 after measurement signature");
        self.l1l2.reset();
    }
}

/// One session's handshake transcripts (spec §3 SessionInfo). Unlike
/// `TranscriptSet`, these never reset during the session's life --
/// `MessageK`/`MessageF` each accumulate exactly once, across
/// KEY_EXCHANGE/FINISH (or PSK_EXCHANGE/PSK_FINISH).
#[derive(Default, Clone)]
pub struct SessionTranscript {
    pub message_k: LargeManagedBuffer,
    pub message_f: LargeManagedBuffer,
}

impl SessionTranscript {
    pub fn reset(&mut self) {
        self.message_k.reset();
        self.message_f.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_after_challenge_leaves_ab_intact() {
        let mut t = TranscriptSet::default();
        t.message_a.append(b"version-caps-algos").unwrap();
        t.message_b.append(b"digests-cert").unwrap();
        t.message_c.append(b"challenge-auth").unwrap();
        t.m1m2.append(b"scratch").unwrap();

        t.reset_after_challenge();

        assert_eq!(t.message_a.data(), b"version-caps-algos");
        assert_eq!(t.message_b.data(), b"digests-cert");
        assert!(t.message_c.is_empty());
        assert!(t.m1m2.is_empty());
    }

    #[test]
    fn test_l1l2_persists_across_measurement_rounds() {
        let mut t = TranscriptSet::default();
        t.l1l2.append(b"round1").unwrap();
        t.l1l2.append(b"round2").unwrap();
        assert_eq!(t.l1l2.data(), b"round1round2");
        t.reset_after_measurement_signature();
        assert!(t.l1l2.is_empty());
    }
}
