// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! Compile-time size ceilings. The engine embeds all buffers in the
//! context (spec §5 "resource policy"); these constants are the knobs
//! a host integration tunes to its transport MTU and cert sizes.

/// Largest single transport frame the engine will build or accept.
pub const MAX_SPDM_TRANSPORT_SIZE: usize = 0x1200;

/// Capacity of the "small" transcript buffers: MessageA and MessageC.
pub const MAX_SPDM_MESSAGE_SMALL_BUFFER_SIZE: usize = 0x200;

/// Capacity of the "large" transcript buffers: MessageB, MutB, MessageK,
/// MessageF, M1M2, L1L2.
pub const MAX_SPDM_MESSAGE_BUFFER_SIZE: usize = 0x2000;

/// Largest certificate chain (header + root hash + DER certs) the engine
/// will buffer for a peer.
pub const MAX_SPDM_CERT_CHAIN_DATA_SIZE: usize = 0x1200;

/// Hash / HMAC digest ceiling (SHA-512).
pub const SPDM_MAX_HASH_SIZE: usize = 64;

/// Asymmetric signature ceiling (RSA-4096).
pub const SPDM_MAX_ASYM_KEY_SIZE: usize = 512;

/// DHE exchange-data ceiling.
pub const SPDM_MAX_DHE_KEY_SIZE: usize = 132;

pub const SPDM_NONCE_SIZE: usize = 32;

pub const MAX_SPDM_OPAQUE_SIZE: usize = 1024;

pub const MAX_SPDM_MEASUREMENT_VALUE_LEN: usize = 64;

pub const MAX_SPDM_MEASUREMENT_BLOCK_COUNT: usize = 16;

/// Number of local certificate-chain slots (spec §4.7 `SlotCount`).
pub const MAX_SLOT_COUNT: usize = 8;

/// Fixed session-table capacity (spec §4.6).
pub const MAX_SPDM_SESSION_COUNT: usize = 4;

/// Longest PSK hint the engine will buffer.
pub const MAX_PSK_HINT_LENGTH: usize = 64;

pub const INVALID_SESSION_ID: u32 = 0;
