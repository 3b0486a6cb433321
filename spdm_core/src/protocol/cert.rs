// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! Certificate-chain wire structure (spec §6, §9 "raw byte cursor
//! arithmetic" re-architecture note). A chain is the DSP0274
//! `SPDM_CERT_CHAIN` header (`length`, `reserved`) followed by the root
//! hash sized to the connection's base hash algorithm, followed by a
//! concatenation of DER certificates. This module parses that shape once
//! and hands out accessors -- `root_hash()`, `certs()`, `leafless()`,
//! `leaf()` -- instead of letting callers recompute offsets by hand.

use crate::config::MAX_SPDM_CERT_CHAIN_DATA_SIZE;
use crate::error::{SpdmError, SpdmResult};
use codec::{Codec, Reader, Writer};

#[derive(Debug, Clone, Copy, Default)]
pub struct SpdmCertChainHeader {
    pub length: u16,
    pub reserved: u16,
}

impl Codec for SpdmCertChainHeader {
    fn encode(&self, bytes: &mut Writer) {
        self.length.encode(bytes);
        self.reserved.encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<SpdmCertChainHeader> {
        Some(SpdmCertChainHeader {
            length: u16::read(r)?,
            reserved: u16::read(r)?,
        })
    }
}

/// An owned, bounded certificate chain: the DSP0274 header, the root
/// hash, and the concatenated DER leaf/intermediate/root certificates.
/// Received chains (via GET_CERTIFICATE) are copied in; provisioned
/// chains are copied in from the host-borrowed slice set via
/// `set_data(PublicCertChains, ...)` / `PeerPublicCertChains`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpdmCertChainBuffer {
    len: usize,
    data: [u8; MAX_SPDM_CERT_CHAIN_DATA_SIZE],
}

impl Default for SpdmCertChainBuffer {
    fn default() -> Self {
        SpdmCertChainBuffer {
            len: 0,
            data: [0u8; MAX_SPDM_CERT_CHAIN_DATA_SIZE],
        }
    }
}

impl SpdmCertChainBuffer {
    pub fn from_full_chain_bytes(full: &[u8]) -> SpdmResult<Self> {
        if full.len() > MAX_SPDM_CERT_CHAIN_DATA_SIZE {
            return Err(SpdmError::BufferTooSmall);
        }
        let mut buf = Self::default();
        buf.data[..full.len()].copy_from_slice(full);
        buf.len = full.len();
        Ok(buf)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.len]
    }

    const HEADER_SIZE: usize = 4;

    pub fn root_hash(&self, hash_size: usize) -> SpdmResult<&[u8]> {
        if self.len < Self::HEADER_SIZE + hash_size {
            return Err(SpdmError::InvalidParameter);
        }
        Ok(&self.data[Self::HEADER_SIZE..Self::HEADER_SIZE + hash_size])
    }

    /// The DER certificate sequence, excluding the DSP0274 header and
    /// root hash.
    pub fn certs(&self, hash_size: usize) -> SpdmResult<&[u8]> {
        let start = Self::HEADER_SIZE + hash_size;
        if self.len < start {
            return Err(SpdmError::InvalidParameter);
        }
        Ok(&self.data[start..self.len])
    }

    /// `H(Ct)`'s input: the whole chain minus the trailing leaf
    /// certificate (spec §4.2 TH_curr_AK). Keeping the header and root
    /// hash in this slice matches the SPDM spec's definition of `Ct` as
    /// "the certificate chain used in this session, without the leaf
    /// certificate".
    pub fn leafless(&self, hash_size: usize) -> SpdmResult<&[u8]> {
        let certs = self.certs(hash_size)?;
        let (leaf_start, _) = last_der_cert_offsets(certs)?;
        let header_and_intermediates = Self::HEADER_SIZE + hash_size + leaf_start;
        Ok(&self.data[..header_and_intermediates])
    }

    /// The leaf (end-entity) certificate's raw DER bytes -- the one
    /// whose public key signatures in this chain are verified against.
    pub fn leaf(&self, hash_size: usize) -> SpdmResult<&[u8]> {
        let certs = self.certs(hash_size)?;
        let (start, end) = last_der_cert_offsets(certs)?;
        Ok(&certs[start..end])
    }
}

/// Walks a concatenation of DER `SEQUENCE`-tagged certificates and
/// returns the `(start, end)` offsets of the last one. Grounded on the
/// teacher's `get_cert_from_cert_chain` cursor walk
/// (`crypto/spdm_ring/cert_operation_impl.rs`), generalized here to a
/// safe accessor instead of raw index arithmetic at call sites.
fn last_der_cert_offsets(der: &[u8]) -> SpdmResult<(usize, usize)> {
    let mut offset = 0usize;
    let mut last = None;
    while offset < der.len() {
        if der.len() - offset < 4 {
            return Err(SpdmError::InvalidParameter);
        }
        if der[offset] != 0x30 || der[offset + 1] != 0x82 {
            return Err(SpdmError::InvalidParameter);
        }
        let cert_len = ((der[offset + 2] as usize) << 8) + (der[offset + 3] as usize) + 4;
        if offset + cert_len > der.len() {
            return Err(SpdmError::InvalidParameter);
        }
        last = Some((offset, offset + cert_len));
        offset += cert_len;
    }
    last.ok_or(SpdmError::InvalidParameter)
}
