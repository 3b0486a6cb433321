// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! SPDM protocol engine: the transcript, signature, HMAC, and
//! configuration-data bookkeeping an SPDM responder needs, independent
//! of any one transport. See the module list below for the component
//! boundaries.

pub mod buffer;
pub mod config;
pub mod config_data;
pub mod connection;
pub mod context;
pub mod crypto;
pub mod encap;
pub mod error;
pub mod hmac_binding;
pub mod measurement_summary;
pub mod protocol;
pub mod session;
pub mod signature_binding;
pub mod transcript;
pub mod transcript_binding;

#[cfg(feature = "software-crypto")]
pub mod crypto_software;

pub use buffer::{LargeManagedBuffer, ManagedBuffer, SmallManagedBuffer};
pub use config_data::{ConfigDataStore, DataParameter, SpdmDataKind};
pub use connection::{ConnectionInfo, ConnectionState};
pub use context::{
    DeviceContext, ResponseState, RetryBudget, SecuredMessageContext, SessionType, SpdmDeviceIo,
    SpdmTransportEncap,
};
pub use crypto::{AsymAlgKind, CryptoProvider, DataSigner, MeasurementCollector};
pub use encap::{EncapContext, EncapState};
pub use error::{SpdmError, SpdmResult};
pub use measurement_summary::{summarize, MeasurementSummaryKind};
pub use session::{SessionInfo, SessionKind, SessionSecrets, SessionState, SessionTable};
pub use transcript::{SessionTranscript, TranscriptSet};
pub use transcript_binding::ChainBinding;
