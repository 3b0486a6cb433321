// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! DeviceContext / ContextRoot (spec §3, §6): the root object a host
//! integration builds once per device, registers its collaborators
//! into, and then drives through the connection and session state
//! machines. Every other component in this crate operates on borrows
//! taken from here -- nothing elsewhere owns a `TranscriptSet` or
//! `SessionTable` of its own.

use crate::config_data::{ConfigDataStore, DataLocation, DataParameter, SpdmDataKind};
use crate::connection::ConnectionInfo;
use crate::crypto::{CryptoProvider, DataSigner, MeasurementCollector};
use crate::encap::EncapContext;
use crate::error::{SpdmError, SpdmResult};
use crate::session::SessionTable;
use crate::transcript::TranscriptSet;

/// Local transport collaborator (spec §6): moves already-encapsulated
/// bytes across the wire. Framing/encapsulation is a separate
/// collaborator, [`SpdmTransportEncap`], so a device context can mix and
/// match transports (PCIe DOE, MCTP, ...) with the same engine core.
pub trait SpdmDeviceIo {
    fn send(&mut self, data: &[u8]) -> SpdmResult<()>;
    fn receive(&mut self, buf: &mut [u8]) -> SpdmResult<usize>;
}

/// Wraps/unwraps an SPDM message in its transport-specific envelope
/// (spec §6; demoed for MCTP in `demos/mctp_transport`).
pub trait SpdmTransportEncap {
    fn encap(&self, spdm_msg: &[u8], transport_buf: &mut [u8]) -> SpdmResult<usize>;
    fn decap(&self, transport_msg: &[u8], spdm_buf: &mut [u8]) -> SpdmResult<usize>;
}

/// What protection, if any, an established session applies to
/// application data (spec §3 "set session type per capabilities").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionType {
    None,
    MacOnly,
    AeadWithMac,
}

/// The secured-message AEAD layer (spec §1's second out-of-scope
/// collaborator). `SessionInfo` holds an opaque handle to one of these
/// per established session; this engine never implements AEAD itself --
/// it drives the handle through key-schedule setup at session
/// establishment and hands it application payloads to encode/decode
/// once the session is `Established`.
pub trait SecuredMessageContext {
    fn init_context(&mut self) -> SpdmResult<()>;
    fn set_algorithms(&mut self, aead_cipher_suite: crate::protocol::SpdmAeadAlgo) -> SpdmResult<()>;
    fn set_psk_hint(&mut self, hint: &[u8]) -> SpdmResult<()>;
    fn set_session_type(&mut self, session_type: SessionType);
    fn hmac_with_request_finished_key(&self, data: &[u8]) -> SpdmResult<crate::protocol::SpdmDigestStruct>;
    fn hmac_with_response_finished_key(&self, data: &[u8]) -> SpdmResult<crate::protocol::SpdmDigestStruct>;
    fn generate_data_key(&mut self) -> SpdmResult<()>;
    fn encode(&self, app_data: &[u8], transport_buf: &mut [u8]) -> SpdmResult<usize>;
    fn decode(&self, transport_msg: &[u8], app_buf: &mut [u8]) -> SpdmResult<usize>;
}

/// Tracks a ResponseNotReady retry sequence (spec §7 `NoResponse`): a
/// bounded number of retries, each waiting the responder-advertised
/// backoff before trying again.
#[derive(Debug, Clone, Copy)]
pub struct RetryBudget {
    pub max_retries: u8,
    pub remaining: u8,
}

impl RetryBudget {
    pub fn new(max_retries: u8) -> Self {
        RetryBudget { max_retries, remaining: max_retries }
    }

    pub fn consume(&mut self) -> SpdmResult<()> {
        if self.remaining == 0 {
            return Err(SpdmError::NoResponse);
        }
        self.remaining -= 1;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.remaining = self.max_retries;
    }
}

/// Whether the responder side of this context is free to process a new
/// request (spec §5 "concurrency model": one request in flight at a
/// time; a pending ResponseNotReady retry occupies this state until
/// resolved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    Normal,
    Busy,
    NotReady { token: u8 },
}

impl Default for ResponseState {
    fn default() -> Self {
        ResponseState::Normal
    }
}

/// The root object: one per physical/logical device under test. Owns
/// every piece of state spec §3's data model names and the collaborator
/// trait objects spec §6 lists.
pub struct DeviceContext {
    pub connection_info: ConnectionInfo,
    pub transcripts: TranscriptSet,
    pub sessions: SessionTable,
    pub config_data: ConfigDataStore,
    pub encap: EncapContext,
    pub response_state: ResponseState,
    pub retry_budget: RetryBudget,
    crypto_provider: Box<dyn CryptoProvider>,
    measurement_collector: Box<dyn MeasurementCollector>,
    data_signer: Option<Box<dyn DataSigner>>,
    device_io: Option<Box<dyn SpdmDeviceIo>>,
    transport_encap: Option<Box<dyn SpdmTransportEncap>>,
}

impl DeviceContext {
    /// spec §3 `init_context`: builds a fresh context bound to the two
    /// collaborators every connection needs regardless of transport --
    /// the crypto provider and the measurement collector. Transport and
    /// signer are registered separately since a context can be built
    /// before either is available.
    pub fn init_context(
        crypto_provider: Box<dyn CryptoProvider>,
        measurement_collector: Box<dyn MeasurementCollector>,
    ) -> Self {
        DeviceContext {
            connection_info: ConnectionInfo::default(),
            transcripts: TranscriptSet::default(),
            sessions: SessionTable::new(),
            config_data: ConfigDataStore::new(),
            encap: EncapContext::default(),
            response_state: ResponseState::default(),
            retry_budget: RetryBudget::new(3),
            crypto_provider,
            measurement_collector,
            data_signer: None,
            device_io: None,
            transport_encap: None,
        }
    }

    pub fn register_io(&mut self, io: Box<dyn SpdmDeviceIo>) {
        self.device_io = Some(io);
    }

    pub fn register_transport(&mut self, encap: Box<dyn SpdmTransportEncap>) {
        self.transport_encap = Some(encap);
    }

    pub fn register_signer(&mut self, signer: Box<dyn DataSigner>) {
        self.data_signer = Some(signer);
    }

    pub fn crypto(&self) -> &dyn CryptoProvider {
        self.crypto_provider.as_ref()
    }

    pub fn measurement_collector(&self) -> &dyn MeasurementCollector {
        self.measurement_collector.as_ref()
    }

    pub fn signer(&self) -> SpdmResult<&dyn DataSigner> {
        self.data_signer.as_deref().ok_or(SpdmError::DeviceError)
    }

    pub fn io_mut(&mut self) -> SpdmResult<&mut (dyn SpdmDeviceIo + 'static)> {
        self.device_io.as_deref_mut().ok_or(SpdmError::DeviceError)
    }

    pub fn transport(&self) -> SpdmResult<&dyn SpdmTransportEncap> {
        self.transport_encap.as_deref().ok_or(SpdmError::DeviceError)
    }

    /// spec §4.7's single `set_data` entry point. `ResponseState` is the
    /// only kind this context serves directly instead of delegating to
    /// `config_data`, since that is the only piece of addressable state
    /// living outside `ConfigDataStore`. Writes only ever touch the
    /// local side -- `parameter.location` is meaningless here and
    /// ignored, matching `ConfigDataStore::set_data`.
    pub fn set_data(&mut self, kind: SpdmDataKind, parameter: DataParameter, value: &[u8]) -> SpdmResult<()> {
        match kind {
            SpdmDataKind::ResponseState => {
                self.response_state = decode_response_state(value)?;
                Ok(())
            }
            _ => self.config_data.set_data(kind, parameter, value),
        }
    }

    /// spec §4.7's single `get_data` entry point, enforcing
    /// `Parameter.location`: `Connection` reads back what
    /// NEGOTIATE_ALGORITHMS actually selected for the live connection
    /// (from `connection_info.negotiate_info`), `Local` reads back the
    /// configured preference (from `config_data`). `ResponseState` has
    /// no connection-side form and is always local. Returns the number
    /// of bytes written to `out_buf`.
    pub fn get_data(&self, kind: SpdmDataKind, parameter: DataParameter, out_buf: &mut [u8]) -> SpdmResult<usize> {
        if kind == SpdmDataKind::ResponseState {
            if parameter.location == DataLocation::Connection {
                return Err(SpdmError::InvalidParameter);
            }
            return encode_response_state(self.response_state, out_buf);
        }
        if parameter.location == DataLocation::Connection {
            let info = &self.connection_info.negotiate_info;
            let bytes: Vec<u8> = match kind {
                // The responder-role register, matching this engine's
                // primary role; `Local` location still exposes whatever
                // the caller configured for its own side regardless of
                // role.
                SpdmDataKind::CapabilityFlags => info.rsp_capabilities_sel.bits().to_le_bytes().to_vec(),
                SpdmDataKind::CapabilityCTExponent => vec![info.rsp_ct_exponent_sel],
                SpdmDataKind::MeasurementHashAlgo => info.measurement_hash_sel.repr().to_le_bytes().to_vec(),
                SpdmDataKind::BaseAsymAlgo => info.base_asym_sel.repr().to_le_bytes().to_vec(),
                SpdmDataKind::BaseHashAlgo => info.base_hash_sel.repr().to_le_bytes().to_vec(),
                SpdmDataKind::DHENamedGroup => info.dhe_sel.repr().to_le_bytes().to_vec(),
                SpdmDataKind::AEADCipherSuite => info.aead_sel.repr().to_le_bytes().to_vec(),
                SpdmDataKind::ReqBaseAsymAlg => info.req_asym_sel.repr().to_le_bytes().to_vec(),
                SpdmDataKind::KeySchedule => info.key_schedule_sel.repr().to_le_bytes().to_vec(),
                // Cert/PSK/mut-auth/slot-count kinds have no
                // connection-side representation distinct from the
                // local one the host provisioned.
                _ => return Err(SpdmError::InvalidParameter),
            };
            if out_buf.len() < bytes.len() {
                return Err(SpdmError::BufferTooSmall);
            }
            out_buf[..bytes.len()].copy_from_slice(&bytes);
            return Ok(bytes.len());
        }
        self.config_data.get_data(kind, parameter, out_buf)
    }

    /// Tears the connection (and every live session) down to its
    /// initial state, matching spec §3's "reinit clears TranscriptSet
    /// and ConnectionInfo, leaves registered collaborators in place".
    pub fn reset_connection(&mut self) {
        self.connection_info = ConnectionInfo::default();
        self.transcripts.reset_all();
        self.sessions = SessionTable::new();
        self.encap.reset();
        self.response_state = ResponseState::Normal;
        self.retry_budget.reset();
    }
}

/// Wire form of `ResponseState` for the `get_data`/`set_data` API:
/// `[discriminant, token]`, token meaningful only for `NotReady`.
fn encode_response_state(state: ResponseState, out_buf: &mut [u8]) -> SpdmResult<usize> {
    if out_buf.len() < 2 {
        return Err(SpdmError::BufferTooSmall);
    }
    let (discriminant, token) = match state {
        ResponseState::Normal => (0u8, 0u8),
        ResponseState::Busy => (1u8, 0u8),
        ResponseState::NotReady { token } => (2u8, token),
    };
    out_buf[0] = discriminant;
    out_buf[1] = token;
    Ok(2)
}

fn decode_response_state(value: &[u8]) -> SpdmResult<ResponseState> {
    match value.first() {
        Some(0) => Ok(ResponseState::Normal),
        Some(1) => Ok(ResponseState::Busy),
        Some(2) => Ok(ResponseState::NotReady {
            token: *value.get(1).ok_or(SpdmError::InvalidParameter)?,
        }),
        _ => Err(SpdmError::InvalidParameter),
    }
}
