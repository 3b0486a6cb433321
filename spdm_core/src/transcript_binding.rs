// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! TranscriptBinding component (spec §4.2): folds the raw transcript
//! buffers into the digests SignatureBinding and HmacBinding actually
//! sign/HMAC over. Nothing here mutates a transcript buffer -- that is
//! `TranscriptSet`/`SessionTranscript`'s job alone.

use crate::crypto::CryptoProvider;
use crate::error::SpdmResult;
use crate::protocol::cert::SpdmCertChainBuffer;
use crate::protocol::common_struct::SpdmDigestStruct;
use crate::protocol::SpdmBaseHashAlgo;
use crate::transcript::{SessionTranscript, TranscriptSet};

/// Which certificate-chain hash terms a transcript-hash derivation
/// includes, per spec §4.2's "`TH_curr_AK`/`TH_curr_AKF`" distinction
/// between the plain, cert-based, and mutual-auth cases.
pub enum ChainBinding<'a> {
    /// PSK-keyed session: no `H(Ct)` term at all.
    Psk,
    /// Responder authenticates with a certificate chain; requester does
    /// not perform mutual authentication.
    Responder { chain: &'a SpdmCertChainBuffer },
    /// Both sides authenticate with certificate chains (`MUT_AUTH_CAP`
    /// negotiated and exercised).
    Mutual {
        responder: &'a SpdmCertChainBuffer,
        requester: &'a SpdmCertChainBuffer,
    },
}

/// `M1M2` (spec §4.2): the digest CHALLENGE_AUTH's signature covers.
/// `MessageA || MessageB || MessageC`, plus the mutual-auth extension
/// buffers when the caller is building the requester's own signature
/// input during mutual authentication.
pub fn m1m2(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    transcripts: &TranscriptSet,
    include_mutual: bool,
) -> SpdmResult<SpdmDigestStruct> {
    let mut buf = Vec::with_capacity(
        transcripts.message_a.len()
            + transcripts.message_b.len()
            + transcripts.message_c.len()
            + transcripts.message_mut_b.len()
            + transcripts.message_mut_c.len(),
    );
    buf.extend_from_slice(transcripts.message_a.data());
    buf.extend_from_slice(transcripts.message_b.data());
    buf.extend_from_slice(transcripts.message_c.data());
    if include_mutual {
        buf.extend_from_slice(transcripts.message_mut_b.data());
        buf.extend_from_slice(transcripts.message_mut_c.data());
    }
    crypto.hash(hash_algo, &buf)
}

/// `L1L2` (spec §4.2): the digest a signed MEASUREMENTS response covers.
/// `MessageA || L1L2` where the `l1l2` buffer already holds every
/// GET_MEASUREMENTS request/response pair appended since the last
/// signature (or connection start).
pub fn l1l2(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    transcripts: &TranscriptSet,
) -> SpdmResult<SpdmDigestStruct> {
    let mut buf = Vec::with_capacity(transcripts.message_a.len() + transcripts.l1l2.len());
    buf.extend_from_slice(transcripts.message_a.data());
    buf.extend_from_slice(transcripts.l1l2.data());
    crypto.hash(hash_algo, &buf)
}

fn chain_hash(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    chain: &SpdmCertChainBuffer,
) -> SpdmResult<SpdmDigestStruct> {
    let hash_size = hash_algo.get_size() as usize;
    crypto.hash(hash_algo, chain.leafless(hash_size)?)
}

/// `TH1` (spec §4.2 `TH_curr_AK`): the digest `KEY_EXCHANGE_RSP`'s
/// (or `PSK_EXCHANGE_RSP`'s) responder signature/HMAC covers.
/// `MessageA || H(Ct) || MessageK`, with `H(Ct)` dropped entirely for
/// PSK sessions.
pub fn th1(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    transcripts: &TranscriptSet,
    session: &SessionTranscript,
    chains: &ChainBinding,
) -> SpdmResult<SpdmDigestStruct> {
    let mut buf = Vec::with_capacity(
        transcripts.message_a.len() + hash_algo.get_size() as usize * 2 + session.message_k.len(),
    );
    buf.extend_from_slice(transcripts.message_a.data());
    if let ChainBinding::Responder { chain } | ChainBinding::Mutual { responder: chain, .. } = chains {
        buf.extend_from_slice(chain_hash(crypto, hash_algo, chain)?.as_ref());
    }
    buf.extend_from_slice(session.message_k.data());
    crypto.hash(hash_algo, &buf)
}

/// `TH2` (spec §4.2 `TH_curr_AKF`): the digest `FINISH`/`FINISH_RSP` (or
/// their PSK counterparts) sign or HMAC. `TH1`'s input extended with
/// `H(Cm)` (the requester's mutual-auth chain, when present) and
/// `MessageF`.
pub fn th2(
    crypto: &dyn CryptoProvider,
    hash_algo: SpdmBaseHashAlgo,
    transcripts: &TranscriptSet,
    session: &SessionTranscript,
    chains: &ChainBinding,
) -> SpdmResult<SpdmDigestStruct> {
    let mut buf = Vec::with_capacity(
        transcripts.message_a.len()
            + hash_algo.get_size() as usize * 2
            + session.message_k.len()
            + session.message_f.len(),
    );
    buf.extend_from_slice(transcripts.message_a.data());
    match chains {
        ChainBinding::Psk => {}
        ChainBinding::Responder { chain } => {
            buf.extend_from_slice(chain_hash(crypto, hash_algo, chain)?.as_ref());
        }
        ChainBinding::Mutual { responder, requester } => {
            buf.extend_from_slice(chain_hash(crypto, hash_algo, responder)?.as_ref());
            buf.extend_from_slice(chain_hash(crypto, hash_algo, requester)?.as_ref());
        }
    }
    buf.extend_from_slice(session.message_k.data());
    buf.extend_from_slice(session.message_f.data());
    crypto.hash(hash_algo, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto_software::SoftwareCryptoProvider;

    #[test]
    fn test_m1m2_excludes_mutual_by_default() {
        let crypto = SoftwareCryptoProvider;
        let mut transcripts = TranscriptSet::default();
        transcripts.message_a.append(b"A").unwrap();
        transcripts.message_b.append(b"B").unwrap();
        transcripts.message_c.append(b"C").unwrap();
        transcripts.message_mut_b.append(b"MB").unwrap();
        transcripts.message_mut_c.append(b"MC").unwrap();

        let without_mutual = m1m2(&crypto, SpdmBaseHashAlgo::TPM_ALG_SHA_256, &transcripts, false).unwrap();
        let expected = crypto.hash(SpdmBaseHashAlgo::TPM_ALG_SHA_256, b"ABC").unwrap();
        assert_eq!(without_mutual.as_ref(), expected.as_ref());

        let with_mutual = m1m2(&crypto, SpdmBaseHashAlgo::TPM_ALG_SHA_256, &transcripts, true).unwrap();
        let expected_mutual = crypto.hash(SpdmBaseHashAlgo::TPM_ALG_SHA_256, b"ABCMBMC").unwrap();
        assert_eq!(with_mutual.as_ref(), expected_mutual.as_ref());
    }

    #[test]
    fn test_th1_psk_has_no_chain_term() {
        let crypto = SoftwareCryptoProvider;
        let mut transcripts = TranscriptSet::default();
        transcripts.message_a.append(b"A").unwrap();
        let mut session = SessionTranscript::default();
        session.message_k.append(b"K").unwrap();

        let th1_digest = th1(
            &crypto,
            SpdmBaseHashAlgo::TPM_ALG_SHA_256,
            &transcripts,
            &session,
            &ChainBinding::Psk,
        )
        .unwrap();
        let expected = crypto.hash(SpdmBaseHashAlgo::TPM_ALG_SHA_256, b"AK").unwrap();
        assert_eq!(th1_digest.as_ref(), expected.as_ref());
    }

    #[test]
    fn test_th2_extends_th1_with_message_f() {
        let crypto = SoftwareCryptoProvider;
        let mut transcripts = TranscriptSet::default();
        transcripts.message_a.append(b"A").unwrap();
        let mut session = SessionTranscript::default();
        session.message_k.append(b"K").unwrap();
        session.message_f.append(b"F").unwrap();

        let th2_digest = th2(
            &crypto,
            SpdmBaseHashAlgo::TPM_ALG_SHA_256,
            &transcripts,
            &session,
            &ChainBinding::Psk,
        )
        .unwrap();
        let expected = crypto.hash(SpdmBaseHashAlgo::TPM_ALG_SHA_256, b"AKF").unwrap();
        assert_eq!(th2_digest.as_ref(), expected.as_ref());
    }
}
