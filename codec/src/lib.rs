// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: BSD-2-Clause-Patent

//! Little-endian binary reader/writer plus the `Codec` trait every SPDM
//! wire type implements. Kept tiny and `no_std` so it can sit under both
//! the engine and any transport collaborator without pulling in `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

/// A type that can be serialized to and parsed from an SPDM byte stream.
///
/// `read` returns `None` (rather than an error) on malformed or truncated
/// input; callers map that to `SpdmError::DeviceError` or
/// `SpdmError::SecurityViolation` depending on context.
pub trait Codec: Sized {
    fn encode(&self, bytes: &mut Writer);
    fn read(r: &mut Reader) -> Option<Self>;
}

/// A forward-only cursor over an immutable byte slice.
pub struct Reader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn init(buf: &'a [u8]) -> Self {
        Reader { buf, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn used(&self) -> usize {
        self.offset
    }

    /// Bytes remaining.
    pub fn left(&self) -> usize {
        self.buf.len() - self.offset
    }

    pub fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.left() < len {
            return None;
        }
        let start = self.offset;
        self.offset += len;
        Some(&self.buf[start..self.offset])
    }

    pub fn byte(&mut self) -> Option<u8> {
        self.take(1).map(|s| s[0])
    }

    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.offset..]
    }
}

/// A forward-only cursor over a mutable byte slice.
pub struct Writer<'a> {
    buf: &'a mut [u8],
    offset: usize,
}

impl<'a> Writer<'a> {
    pub fn init(buf: &'a mut [u8]) -> Self {
        Writer { buf, offset: 0 }
    }

    pub fn used(&self) -> usize {
        self.offset
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn extend_from_slice(&mut self, src: &[u8]) -> bool {
        if self.buf.len() - self.offset < src.len() {
            return false;
        }
        let end = self.offset + src.len();
        self.buf[self.offset..end].copy_from_slice(src);
        self.offset = end;
        true
    }

    pub fn push_byte(&mut self, b: u8) -> bool {
        self.extend_from_slice(&[b])
    }
}

macro_rules! impl_codec_for_uint {
    ($ty:ty) => {
        impl Codec for $ty {
            fn encode(&self, bytes: &mut Writer) {
                let _ = bytes.extend_from_slice(&self.to_le_bytes());
            }

            fn read(r: &mut Reader) -> Option<$ty> {
                let size = core::mem::size_of::<$ty>();
                let raw = r.take(size)?;
                let mut buf = [0u8; core::mem::size_of::<$ty>()];
                buf.copy_from_slice(raw);
                Some(<$ty>::from_le_bytes(buf))
            }
        }
    };
}

impl_codec_for_uint!(u8);
impl_codec_for_uint!(u16);
impl_codec_for_uint!(u32);
impl_codec_for_uint!(u64);

impl Codec for bool {
    fn encode(&self, bytes: &mut Writer) {
        (*self as u8).encode(bytes);
    }

    fn read(r: &mut Reader) -> Option<bool> {
        Some(u8::read(r)? != 0)
    }
}

/// Defines a fieldless, wire-coded enum backed by a fixed-width integer.
///
/// Unknown on-the-wire values round-trip through the `Unknown(repr)`
/// variant instead of failing to parse -- an SPDM peer must be able to
/// echo back a code it does not recognize (e.g. in an ERROR response)
/// without the codec rejecting the message outright.
#[macro_export]
macro_rules! enum_builder {
    (@U8
        EnumName: $name:ident;
        EnumVal{ $first:ident => $firstval:expr $(, $variant:ident => $value:expr)* $(,)? }
    ) => {
        $crate::enum_builder!(@IMPL u8, $name, $first => $firstval $(, $variant => $value)*);
    };
    (@U16
        EnumName: $name:ident;
        EnumVal{ $first:ident => $firstval:expr $(, $variant:ident => $value:expr)* $(,)? }
    ) => {
        $crate::enum_builder!(@IMPL u16, $name, $first => $firstval $(, $variant => $value)*);
    };
    (@U32
        EnumName: $name:ident;
        EnumVal{ $first:ident => $firstval:expr $(, $variant:ident => $value:expr)* $(,)? }
    ) => {
        $crate::enum_builder!(@IMPL u32, $name, $first => $firstval $(, $variant => $value)*);
    };
    (@IMPL $repr:ty, $name:ident, $first:ident => $firstval:expr $(, $variant:ident => $value:expr)*) => {
        #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
        pub enum $name {
            $first,
            $($variant,)*
            Unknown($repr),
        }

        impl $name {
            #[allow(dead_code)]
            pub fn get_u8(&self) -> u8 {
                self.repr() as u8
            }

            pub fn repr(&self) -> $repr {
                match self {
                    $name::$first => $firstval,
                    $($name::$variant => $value,)*
                    $name::Unknown(v) => *v,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$first
            }
        }

        impl $crate::Codec for $name {
            fn encode(&self, bytes: &mut $crate::Writer) {
                self.repr().encode(bytes);
            }

            fn read(r: &mut $crate::Reader) -> Option<$name> {
                let v = <$repr as $crate::Codec>::read(r)?;
                Some(match v {
                    $firstval => $name::$first,
                    $($value => $name::$variant,)*
                    _ => $name::Unknown(v),
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_u32() {
        let mut buf = [0u8; 4];
        let mut w = Writer::init(&mut buf);
        0x0102_0304u32.encode(&mut w);
        assert_eq!(w.used(), 4);
        let mut r = Reader::init(&buf);
        assert_eq!(u32::read(&mut r), Some(0x0102_0304));
        assert_eq!(r.left(), 0);
    }

    #[test]
    fn test_reader_truncated() {
        let buf = [0u8; 2];
        let mut r = Reader::init(&buf);
        assert_eq!(u32::read(&mut r), None);
    }

    #[test]
    fn test_writer_overflow_rejected() {
        let mut buf = [0u8; 1];
        let mut w = Writer::init(&mut buf);
        assert!(!w.extend_from_slice(&[1, 2]));
    }
}
