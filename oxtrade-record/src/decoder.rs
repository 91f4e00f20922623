/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Record decoder.
//!
//! Reads every declared field of a [`RecordLayout`] into a [`FieldMap`].
//! Decoding is total: any byte content yields a mapping.

use crate::layout::{FieldSpec, FieldType, RecordLayout};
use bytes::Buf;
use oxtrade_core::codec::parse_decimal;
use oxtrade_core::{FieldCodec, FieldMap, FieldValue};

/// Decodes a record. `src` must hold at least `layout.size` bytes.
pub(crate) fn decode_record(codec: &FieldCodec, layout: &RecordLayout, src: &[u8]) -> FieldMap {
    let mut fields = FieldMap::new();
    for spec in layout.fields {
        let slot = &src[spec.range()];
        let value = match spec.ty {
            // Bytes outside ASCII stay numeric so they encode back unchanged.
            FieldType::Char if slot[0].is_ascii() => FieldValue::Char(char::from(slot[0])),
            FieldType::Char => FieldValue::UInt(u64::from(slot[0])),
            FieldType::Text(_) | FieldType::Reserved(_) => FieldValue::Text(codec.decode_text(slot)),
            FieldType::DecimalText(_) => {
                FieldValue::Decimal(parse_decimal(&codec.decode_text(slot)))
            }
            FieldType::U16 | FieldType::I32 | FieldType::U32 | FieldType::I64 => {
                read_integer(spec, slot)
            }
            FieldType::Array {
                count_field,
                item,
                capacity,
            } => {
                let count = layout
                    .field(count_field)
                    .and_then(|c| read_integer(c, &src[c.range()]).as_u64())
                    .map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX))
                    .min(capacity);
                FieldValue::Array(
                    slot.chunks_exact(item.size)
                        .take(count)
                        .map(|chunk| decode_record(codec, item, chunk))
                        .collect(),
                )
            }
        };
        fields.insert(spec.name, value);
    }
    fields
}

fn read_integer(spec: &FieldSpec, mut slot: &[u8]) -> FieldValue {
    match spec.ty {
        FieldType::U16 => FieldValue::UInt(u64::from(slot.get_u16_le())),
        FieldType::I32 => FieldValue::Int(i64::from(slot.get_i32_le())),
        FieldType::U32 => FieldValue::UInt(u64::from(slot.get_u32_le())),
        FieldType::I64 => FieldValue::Int(slot.get_i64_le()),
        _ => FieldValue::Int(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_record;
    use crate::records::{BATCH_ORDER_REQUEST, CANCEL_RESPONSE, LOGON_RESPONSE};
    use oxtrade_core::OrderState;

    #[test]
    fn test_decode_logon_response() {
        let mut buf = vec![0u8; LOGON_RESPONSE.size];
        buf[0..4].copy_from_slice(&7i32.to_le_bytes());
        buf[4..10].copy_from_slice(b"C00001");
        buf[28] = b'0';
        buf[29..38].copy_from_slice(b"110000001");
        let fields = decode_record(&FieldCodec::default(), &LOGON_RESPONSE, &buf);
        assert_eq!(fields.len(), 4);
        assert_eq!(fields.get_i64("IntOrg"), Some(7));
        assert_eq!(fields.get_str("CustCode"), Some("C00001"));
        assert_eq!(fields.get_char("AcctType"), Some('0'));
        assert_eq!(fields.get_str("Account"), Some("110000001"));
    }

    #[test]
    fn test_non_ascii_char_byte_encodes_back() {
        let codec = FieldCodec::default();
        let mut buf = vec![0u8; LOGON_RESPONSE.size];
        buf[28] = 0xC8;
        let fields = decode_record(&codec, &LOGON_RESPONSE, &buf);
        assert_eq!(fields.get_char("AcctType"), None);
        assert_eq!(fields.get_u64("AcctType"), Some(0xC8));

        let mut encoded = vec![0u8; LOGON_RESPONSE.size];
        encode_record(&codec, &LOGON_RESPONSE, &fields, &mut encoded).unwrap();
        assert_eq!(encoded, buf);
    }

    #[test]
    fn test_decode_cancel_state() {
        let mut buf = vec![0u8; CANCEL_RESPONSE.size];
        buf[32..40].copy_from_slice(&123i64.to_le_bytes());
        buf[40] = b'0';
        let fields = decode_record(&FieldCodec::default(), &CANCEL_RESPONSE, &buf);
        assert_eq!(fields.get_i64("OrderNo"), Some(123));
        let state = fields.get_char("OrderState").and_then(OrderState::from_char);
        assert_eq!(state, Some(OrderState::NotReported));
    }

    #[test]
    fn test_decode_reads_only_counted_items() {
        let mut buf = vec![0u8; BATCH_ORDER_REQUEST.size];
        buf[33..35].copy_from_slice(&2u16.to_le_bytes());
        // Garbage in the third slot must not surface.
        let third = 35 + 2 * 125;
        buf[third..third + 4].copy_from_slice(b"JUNK");
        let fields = decode_record(&FieldCodec::default(), &BATCH_ORDER_REQUEST, &buf);
        assert_eq!(fields.get_u64("TotalCount"), Some(2));
        assert_eq!(fields.get_array("OrderArray").map(<[FieldMap]>::len), Some(2));
    }

    #[test]
    fn test_decode_clamps_count_to_capacity() {
        let mut buf = vec![0u8; BATCH_ORDER_REQUEST.size];
        buf[33..35].copy_from_slice(&u16::MAX.to_le_bytes());
        let fields = decode_record(&FieldCodec::default(), &BATCH_ORDER_REQUEST, &buf);
        assert_eq!(fields.get_array("OrderArray").map(<[FieldMap]>::len), Some(500));
    }
}
