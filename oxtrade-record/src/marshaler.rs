/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Record marshaler.
//!
//! Converts between [`FieldMap`] values and the packed byte records of each
//! [`RecordKind`].

use crate::decoder::decode_record;
use crate::encoder::{encode_items, encode_record};
use crate::layout::RecordLayout;
use crate::records::RecordKind;
use bytes::{Bytes, BytesMut};
use oxtrade_core::{DecodeError, EncodeError, FieldCodec, FieldMap};

/// Table-driven encoder and decoder for native records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordMarshaler {
    codec: FieldCodec,
}

impl RecordMarshaler {
    /// Creates a marshaler using the given scalar codec.
    #[must_use]
    pub const fn new(codec: FieldCodec) -> Self {
        Self { codec }
    }

    /// Returns the scalar codec.
    #[inline]
    #[must_use]
    pub const fn codec(&self) -> &FieldCodec {
        &self.codec
    }

    /// Encodes a record of the given kind.
    ///
    /// The result is exactly `kind.size()` bytes. Absent fields are zero and
    /// unknown keys are ignored.
    ///
    /// # Arguments
    /// * `kind` - Record kind to build
    /// * `fields` - Field values keyed by declared field name
    ///
    /// # Errors
    /// Returns `EncodeError` if a value cannot be coerced to its declared type
    /// or an array exceeds its capacity.
    pub fn encode(&self, kind: RecordKind, fields: &FieldMap) -> Result<Bytes, EncodeError> {
        let layout = kind.layout();
        let mut buf = BytesMut::zeroed(layout.size);
        encode_record(&self.codec, layout, fields, &mut buf)?;
        Ok(buf.freeze())
    }

    /// Encodes items into a fixed array region of `capacity` slots.
    ///
    /// Unused slots are zero. The result is `item.size * capacity` bytes.
    ///
    /// # Errors
    /// Returns `EncodeError::CapacityExceeded` if there are more items than
    /// slots.
    pub fn encode_array(
        &self,
        item: &'static RecordLayout,
        items: &[FieldMap],
        capacity: usize,
    ) -> Result<Bytes, EncodeError> {
        let mut buf = BytesMut::zeroed(item.size * capacity);
        encode_items(&self.codec, item.name, item, items, capacity, &mut buf)?;
        Ok(buf.freeze())
    }

    /// Decodes a record of the given kind.
    ///
    /// Returns one entry per declared field. Extra trailing bytes are ignored.
    ///
    /// # Errors
    /// Returns `DecodeError::Truncated` if `bytes` is shorter than the record.
    pub fn decode(&self, kind: RecordKind, bytes: &[u8]) -> Result<FieldMap, DecodeError> {
        let layout = kind.layout();
        if bytes.len() < layout.size {
            return Err(DecodeError::Truncated {
                record: layout.name,
                expected: layout.size,
                actual: bytes.len(),
            });
        }
        Ok(decode_record(&self.codec, layout, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FieldType;
    use crate::records::ORDER_ITEM;
    use oxtrade_core::{FieldValue, TextEncoding};
    use rust_decimal::Decimal;

    /// Builds a mapping that sets every field to its smallest or largest value.
    fn sample(layout: &RecordLayout, maximal: bool) -> FieldMap {
        let mut fields = FieldMap::new();
        for spec in layout.fields {
            let value = match spec.ty {
                FieldType::Char => FieldValue::Char(if maximal { 'Z' } else { '\0' }),
                FieldType::Text(w) if maximal => FieldValue::Text("X".repeat(w)),
                FieldType::Text(_) | FieldType::Reserved(_) => FieldValue::Text(String::new()),
                FieldType::DecimalText(_) => FieldValue::Decimal(if maximal {
                    Decimal::new(9_999_999_999, 2)
                } else {
                    Decimal::ZERO
                }),
                FieldType::U16 => FieldValue::UInt(0),
                FieldType::I32 => FieldValue::Int(if maximal { i64::from(i32::MIN) } else { 0 }),
                FieldType::U32 => FieldValue::UInt(if maximal { u64::from(u32::MAX) } else { 0 }),
                FieldType::I64 => FieldValue::Int(if maximal { i64::MAX } else { 0 }),
                FieldType::Array { item, capacity, .. } => {
                    let count = if maximal { capacity } else { 0 };
                    FieldValue::Array(vec![sample(item, maximal); count])
                }
            };
            fields.insert(spec.name, value);
        }
        let array = layout.fields.iter().find_map(|f| match f.ty {
            FieldType::Array { count_field, .. } => Some((f.name, count_field)),
            _ => None,
        });
        if let Some((name, count_field)) = array {
            let count = fields.get_array(name).map_or(0, <[FieldMap]>::len);
            fields.insert(count_field, FieldValue::UInt(count as u64));
        }
        fields
    }

    /// Deterministic byte noise.
    fn noise(len: usize, seed: u64) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6_364_136_223_846_793_005)
                    .wrapping_add(1_442_695_040_888_963_407);
                (state >> 56) as u8
            })
            .collect()
    }

    #[test]
    fn test_encode_size_matches_layout() {
        let marshaler = RecordMarshaler::default();
        for kind in RecordKind::ALL {
            let bytes = marshaler.encode(kind, &FieldMap::new()).unwrap();
            assert_eq!(bytes.len(), kind.size(), "{kind}");
        }
    }

    #[test]
    fn test_round_trip_minimal() {
        let marshaler = RecordMarshaler::default();
        for kind in RecordKind::ALL {
            let fields = sample(kind.layout(), false);
            let bytes = marshaler.encode(kind, &fields).unwrap();
            let decoded = marshaler.decode(kind, &bytes).unwrap();
            assert_eq!(decoded, fields, "{kind}");
        }
    }

    #[test]
    fn test_round_trip_maximal() {
        let marshaler = RecordMarshaler::default();
        for kind in RecordKind::ALL {
            let fields = sample(kind.layout(), true);
            let bytes = marshaler.encode(kind, &fields).unwrap();
            let decoded = marshaler.decode(kind, &bytes).unwrap();
            assert_eq!(decoded, fields, "{kind}");
        }
    }

    #[test]
    fn test_round_trip_order_request() {
        let marshaler = RecordMarshaler::default();
        let fields = FieldMap::new()
            .with("AcctType", '0')
            .with("Account", "110000001")
            .with("Trdacct", "A123456789")
            .with("BoardId", "10")
            .with("StkBiz", 100i32)
            .with("StkBizAction", 100i32)
            .with("Symbol", "600000")
            .with("OrderQty", 100u32)
            .with("OrderPrice", Decimal::new(1050, 2))
            .with("OrderRef", "tag-1")
            .with("TrdCodeCls", '\0')
            .with("TrdExInfo", "");
        let bytes = marshaler.encode(RecordKind::OrderRequest, &fields).unwrap();
        let decoded = marshaler.decode(RecordKind::OrderRequest, &bytes).unwrap();
        assert_eq!(decoded, fields);
        assert_eq!(decoded.get_decimal("OrderPrice"), Some(Decimal::new(105, 1)));
    }

    #[test]
    fn test_multibyte_text_truncation_in_record() {
        let marshaler = RecordMarshaler::default();
        // 13 two-byte characters do not fit in the 24-byte account field.
        let account = "账".repeat(13);
        let fields = FieldMap::new().with("Account", account.as_str());
        let bytes = marshaler.encode(RecordKind::LogonRequest, &fields).unwrap();
        let decoded = marshaler.decode(RecordKind::LogonRequest, &bytes).unwrap();
        assert_eq!(decoded.get_str("Account"), Some("账".repeat(12).as_str()));

        // A leading ASCII byte leaves an odd 23 bytes: eleven characters and a zero pad.
        let odd = format!("A{}", "账".repeat(12));
        let fields = FieldMap::new().with("Account", odd.as_str());
        let bytes = marshaler.encode(RecordKind::LogonRequest, &fields).unwrap();
        let decoded = marshaler.decode(RecordKind::LogonRequest, &bytes).unwrap();
        assert_eq!(
            decoded.get_str("Account"),
            Some(format!("A{}", "账".repeat(11)).as_str())
        );
        assert_eq!(bytes[24], 0);
    }

    #[test]
    fn test_decode_is_total() {
        for encoding in [TextEncoding::Gbk, TextEncoding::Utf8, TextEncoding::Latin1] {
            let marshaler = RecordMarshaler::new(FieldCodec::new(encoding));
            for (seed, kind) in RecordKind::ALL.into_iter().enumerate() {
                let bytes = noise(kind.size(), seed as u64 + 1);
                let decoded = marshaler.decode(kind, &bytes).unwrap();
                assert_eq!(decoded.len(), kind.layout().fields.len());
            }
        }
    }

    #[test]
    fn test_decode_rejects_short_buffer() {
        let marshaler = RecordMarshaler::default();
        let err = marshaler.decode(RecordKind::CancelResponse, &[0u8; 10]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                record: "CancelResponse",
                expected: 213,
                actual: 10,
            }
        );
    }

    #[test]
    fn test_batch_count_written_from_items() {
        let marshaler = RecordMarshaler::default();
        let items = vec![FieldMap::new().with("Symbol", "600000"); 3];
        let fields = FieldMap::new()
            .with("TotalCount", 99u16)
            .with("OrderArray", items);
        let bytes = marshaler.encode(RecordKind::BatchOrderRequest, &fields).unwrap();
        assert_eq!(&bytes[33..35], &3u16.to_le_bytes());
        let decoded = marshaler.decode(RecordKind::BatchOrderResponse, &bytes).unwrap();
        assert_eq!(decoded.get_u64("TotalCount"), Some(3));
        let decoded_items = decoded.get_array("OrderArray").unwrap();
        assert_eq!(decoded_items.len(), 3);
        assert_eq!(decoded_items[2].get_str("Symbol"), Some("600000"));
    }

    #[test]
    fn test_batch_capacity_boundary() {
        let marshaler = RecordMarshaler::default();
        let item = FieldMap::new().with("Symbol", "000001");
        let full = FieldMap::new().with("OrderArray", vec![item.clone(); 500]);
        assert!(marshaler.encode(RecordKind::BatchOrderRequest, &full).is_ok());

        let over = FieldMap::new().with("OrderArray", vec![item; 501]);
        let err = marshaler.encode(RecordKind::BatchOrderRequest, &over).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::CapacityExceeded {
                count: 501,
                capacity: 500,
                ..
            }
        ));
    }

    #[test]
    fn test_encode_array_region() {
        let marshaler = RecordMarshaler::default();
        let items = vec![FieldMap::new().with("OrderQty", 100u32)];
        let bytes = marshaler.encode_array(&ORDER_ITEM, &items, 4).unwrap();
        assert_eq!(bytes.len(), 4 * 125);
        assert_eq!(&bytes[72..76], &100u32.to_le_bytes());
        assert!(bytes[125..].iter().all(|&b| b == 0));
        assert!(marshaler.encode_array(&ORDER_ITEM, &items, 0).is_err());
    }
}
