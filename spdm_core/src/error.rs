// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! Error kinds surfaced by the engine to its caller (spec §7).
//!
//! Primitive-provider failures never degrade silently: a failed verify
//! always becomes [`SpdmError::SecurityViolation`], a failed sign always
//! becomes [`SpdmError::DeviceError`]. Transcripts are not auto-rolled-back
//! here -- the caller resets the scratch buffers it owns on the failure
//! paths spec §5 documents, or re-inits the whole context.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpdmError {
    /// Malformed argument, duplicate session id, out-of-range slot.
    InvalidParameter,
    /// Unknown data kind, version not in the negotiated set.
    Unsupported,
    /// Managed buffer or output buffer size insufficient.
    BufferTooSmall,
    /// Transport send/receive failed, or peer returned an unexpected code.
    DeviceError,
    /// Any signature/HMAC/certificate-hash verification failed, or a
    /// length mismatch was found during verification.
    SecurityViolation,
    /// Peer returned ResponseNotReady; caller should retry per RetryTimes.
    NoResponse,
    /// Peer returned an SPDM ERROR with some other code.
    ErrorPeer(u8),
    /// Requested operation needs a transcript or chain that is not valid
    /// yet for the connection's current state.
    InvalidState,
    /// No certificate chain is available to satisfy the request.
    MissingChain,
    /// The primitive provider returned an error while signing or hashing.
    SignatureFailure,
    /// A fixed-capacity table (session table, slot table) has no free
    /// entries left.
    ResourceExhausted,
}

impl fmt::Display for SpdmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpdmError::InvalidParameter => write!(f, "invalid parameter"),
            SpdmError::Unsupported => write!(f, "unsupported"),
            SpdmError::BufferTooSmall => write!(f, "buffer too small"),
            SpdmError::DeviceError => write!(f, "device error"),
            SpdmError::SecurityViolation => write!(f, "security violation"),
            SpdmError::NoResponse => write!(f, "no response (retry)"),
            SpdmError::ErrorPeer(code) => write!(f, "peer returned error 0x{:02x}", code),
            SpdmError::InvalidState => write!(f, "invalid state"),
            SpdmError::MissingChain => write!(f, "missing certificate chain"),
            SpdmError::SignatureFailure => write!(f, "signature operation failed"),
            SpdmError::ResourceExhausted => write!(f, "resource exhausted"),
        }
    }
}

pub type SpdmResult<T = ()> = Result<T, SpdmError>;

/// Builds an `SpdmError` value. Mirrors the teacher's `spdm_err!(EFAULT)`
/// shorthand but names the engine's own error kinds instead of errno-style
/// codes.
#[macro_export]
macro_rules! spdm_err {
    ($kind:ident) => {
        $crate::error::SpdmError::$kind
    };
}

/// Builds an `Err(SpdmError::...)` directly, for use as a function's tail
/// expression.
#[macro_export]
macro_rules! spdm_result_err {
    ($kind:ident) => {
        Err($crate::error::SpdmError::$kind)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_non_empty() {
        let kinds = [
            SpdmError::InvalidParameter,
            SpdmError::Unsupported,
            SpdmError::BufferTooSmall,
            SpdmError::DeviceError,
            SpdmError::SecurityViolation,
            SpdmError::NoResponse,
            SpdmError::ErrorPeer(0x42),
            SpdmError::InvalidState,
            SpdmError::MissingChain,
            SpdmError::SignatureFailure,
            SpdmError::ResourceExhausted,
        ];
        for k in kinds {
            assert!(!format!("{}", k).is_empty());
        }
    }

    #[test]
    fn test_macros() {
        let e: SpdmError = spdm_err!(InvalidState);
        assert_eq!(e, SpdmError::InvalidState);
        let r: SpdmResult<()> = spdm_result_err!(MissingChain);
        assert_eq!(r, Err(SpdmError::MissingChain));
    }
}
