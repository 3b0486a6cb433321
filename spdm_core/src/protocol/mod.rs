// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! Wire types the engine needs to build and parse the subset of SPDM
//! messages that feed directly into transcript/signature/HMAC bookkeeping
//! (spec §4.2 "Wire payload layer" expansion). Messages whose only role
//! here is "gets appended verbatim to a transcript buffer" (GET_VERSION
//! through ALGORITHMS, GET_DIGESTS/CERTIFICATE) are handled as opaque
//! already-encoded slices by the caller and never get typed structs in
//! this crate.

pub mod algo;
pub mod cert;
pub mod challenge;
pub mod common_struct;
pub mod finish;
pub mod header;
pub mod key_exchange;
pub mod measurement_block;
pub mod psk_exchange;
pub mod psk_finish;

pub use algo::*;
pub use cert::*;
pub use challenge::*;
pub use common_struct::*;
pub use finish::*;
pub use header::*;
pub use key_exchange::*;
pub use measurement_block::*;
pub use psk_exchange::*;
pub use psk_finish::*;
