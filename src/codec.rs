//! Glue between [`WireValue`] and the rs-matter TLV codec.
//!
//! Decoding and encoding are delegated to `rs_matter::tlv`; this module only
//! picks the right primitive for a declared [`WireType`].

use rs_matter::error::Error;
use rs_matter::tlv::{TLVElement, TLVTag, TLVWrite};
use rs_matter::utils::storage::WriteBuf;

use crate::clusters::{WireType, WireValue};
use crate::error::ClusterError;

/// Scratch buffer size for encoding a single scalar attribute.
pub const DEFAULT_BUFFER_SIZE: usize = 64;

impl WireValue {
    /// Decode `element` as a value of `wire_type`.
    ///
    /// A TLV element of a different type fails with the host's
    /// `TLVTypeMismatch`/`InvalidData` error.
    pub fn from_tlv(wire_type: WireType, element: &TLVElement<'_>) -> Result<Self, Error> {
        let value = match wire_type {
            WireType::Float32 => WireValue::Float32(element.f32()?),
            WireType::UInt => WireValue::UInt(element.u64()?),
            WireType::Int => WireValue::Int(element.i64()?),
            WireType::Bool => WireValue::Bool(element.bool()?),
        };

        Ok(value)
    }

    /// Write this value under `tag`.
    ///
    /// Integers are written in their shortest TLV width, as the host codec does.
    pub fn to_tlv<W: TLVWrite>(&self, tag: &TLVTag, mut tw: W) -> Result<(), Error> {
        match *self {
            WireValue::Float32(v) => tw.f32(tag, v),
            WireValue::UInt(v) => tw.u64(tag, v),
            WireValue::Int(v) => tw.i64(tag, v),
            WireValue::Bool(v) => tw.bool(tag, v),
        }
    }
}

/// Decode an attribute value that may be reported as TLV null (not yet known).
pub fn decode_nullable(
    wire_type: WireType,
    element: &TLVElement<'_>,
) -> Result<Option<WireValue>, Error> {
    if element.null().is_ok() {
        return Ok(None);
    }

    WireValue::from_tlv(wire_type, element).map(Some)
}

/// Encode `value` with an anonymous tag into a fresh byte vector.
pub fn encode_value(value: &WireValue, buf_size: usize) -> Result<Vec<u8>, ClusterError> {
    encode_nullable(Some(value), buf_size)
}

/// Encode `value`, writing TLV null for `None`.
pub fn encode_nullable(
    value: Option<&WireValue>,
    buf_size: usize,
) -> Result<Vec<u8>, ClusterError> {
    let mut buf = vec![0u8; buf_size];
    let mut wb = WriteBuf::new(&mut buf);

    match value {
        Some(value) => value.to_tlv(&TLVTag::Anonymous, &mut wb)?,
        None => wb.null(&TLVTag::Anonymous)?,
    }

    let encoded = wb.as_slice().to_vec();
    log::trace!("Encoded {:?} as {}", value, hex::encode(&encoded));

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: WireValue) -> WireValue {
        let encoded = encode_value(&value, DEFAULT_BUFFER_SIZE).unwrap();
        WireValue::from_tlv(value.wire_type(), &TLVElement::new(&encoded)).unwrap()
    }

    #[test]
    fn test_float32_roundtrip_is_exact() {
        for v in [12.5f32, 0.0, -0.0, 230.0, f32::MIN_POSITIVE, f32::MAX, 1.0e-3] {
            match roundtrip(WireValue::Float32(v)) {
                WireValue::Float32(decoded) => assert_eq!(decoded.to_bits(), v.to_bits()),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_float32_encoding_bytes() {
        // Anonymous tag, F32 value type (0x0A), then little-endian IEEE 754
        let encoded = encode_value(&WireValue::Float32(230.0), DEFAULT_BUFFER_SIZE).unwrap();
        assert_eq!(encoded[0], 0x0A);
        assert_eq!(&encoded[1..], &230.0f32.to_le_bytes());
    }

    #[test]
    fn test_integer_roundtrip() {
        assert_eq!(roundtrip(WireValue::UInt(7)), WireValue::UInt(7));
        assert_eq!(roundtrip(WireValue::UInt(u64::MAX)), WireValue::UInt(u64::MAX));
        assert_eq!(roundtrip(WireValue::Int(-300)), WireValue::Int(-300));
        assert_eq!(roundtrip(WireValue::Bool(true)), WireValue::Bool(true));
    }

    #[test]
    fn test_null_decodes_to_absent() {
        let encoded = encode_nullable(None, DEFAULT_BUFFER_SIZE).unwrap();
        let decoded = decode_nullable(WireType::Float32, &TLVElement::new(&encoded)).unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_zero_is_not_absent() {
        let encoded = encode_value(&WireValue::Float32(0.0), DEFAULT_BUFFER_SIZE).unwrap();
        let decoded = decode_nullable(WireType::Float32, &TLVElement::new(&encoded)).unwrap();
        assert_eq!(decoded, Some(WireValue::Float32(0.0)));
    }

    #[test]
    fn test_type_mismatch_is_error() {
        let encoded = encode_value(&WireValue::UInt(5), DEFAULT_BUFFER_SIZE).unwrap();
        assert!(WireValue::from_tlv(WireType::Float32, &TLVElement::new(&encoded)).is_err());
    }

    #[test]
    fn test_buffer_too_small() {
        assert!(encode_value(&WireValue::Float32(1.0), 2).is_err());
    }
}
