/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Record encoder.
//!
//! Writes a [`FieldMap`] into a zero-filled buffer following a
//! [`RecordLayout`]. Absent fields keep their zero bytes; unknown keys are
//! ignored.

use crate::layout::{FieldSpec, FieldType, RecordLayout};
use bytes::BufMut;
use oxtrade_core::codec::format_integer;
use oxtrade_core::{EncodeError, FieldCodec, FieldMap, FieldValue};
use rust_decimal::Decimal;
use std::num::TryFromIntError;
use std::str::FromStr;

/// Encodes `fields` into `dst`, which must be exactly `layout.size` zeroed bytes.
///
/// # Errors
/// Returns `EncodeError` if a value cannot be coerced to its declared type or
/// an array holds more items than its capacity.
pub(crate) fn encode_record(
    codec: &FieldCodec,
    layout: &RecordLayout,
    fields: &FieldMap,
    dst: &mut [u8],
) -> Result<(), EncodeError> {
    let count_field = layout.fields.iter().find_map(|spec| match spec.ty {
        FieldType::Array { count_field, .. } => Some(count_field),
        _ => None,
    });

    for spec in layout.fields {
        if Some(spec.name) == count_field {
            continue;
        }
        let Some(value) = fields.get(spec.name) else {
            continue;
        };
        let slot = &mut dst[spec.range()];
        match spec.ty {
            FieldType::Reserved(_) => {}
            FieldType::Char => slot[0] = char_byte(spec, value)?,
            FieldType::Text(_) => codec.write_text(&text_value(spec, value)?, slot),
            FieldType::DecimalText(_) => {
                codec.write_text(&decimal_text(codec, spec, value)?, slot);
            }
            FieldType::U16 | FieldType::I32 | FieldType::U32 | FieldType::I64 => {
                write_integer(spec, value, slot)?;
            }
            FieldType::Array {
                count_field,
                item,
                capacity,
            } => {
                let items = value.as_array().ok_or(EncodeError::TypeMismatch {
                    field: spec.name,
                    expected: spec.ty.name(),
                    found: value.kind(),
                })?;
                let count = encode_items(codec, spec.name, item, items, capacity, slot)?;
                if let Some(count_spec) = layout.field(count_field) {
                    write_integer(
                        count_spec,
                        &FieldValue::UInt(count as u64),
                        &mut dst[count_spec.range()],
                    )?;
                }
            }
        }
    }
    Ok(())
}

/// Encodes array items back to back into `dst`.
///
/// Returns the number of items written.
///
/// # Errors
/// Returns `EncodeError::CapacityExceeded` if `items` is longer than
/// `capacity`, or any error raised while encoding an item.
pub(crate) fn encode_items(
    codec: &FieldCodec,
    field: &'static str,
    item: &RecordLayout,
    items: &[FieldMap],
    capacity: usize,
    dst: &mut [u8],
) -> Result<usize, EncodeError> {
    if items.len() > capacity {
        return Err(EncodeError::CapacityExceeded {
            field,
            count: items.len(),
            capacity,
        });
    }
    for (slot, fields) in dst.chunks_exact_mut(item.size).zip(items) {
        encode_record(codec, item, fields, slot)?;
    }
    Ok(items.len())
}

fn mismatch(spec: &FieldSpec, value: &FieldValue) -> EncodeError {
    EncodeError::TypeMismatch {
        field: spec.name,
        expected: spec.ty.name(),
        found: value.kind(),
    }
}

fn out_of_range(spec: &FieldSpec, value: impl ToString) -> EncodeError {
    EncodeError::OutOfRange {
        field: spec.name,
        value: value.to_string(),
    }
}

fn char_byte(spec: &FieldSpec, value: &FieldValue) -> Result<u8, EncodeError> {
    match value {
        FieldValue::Char(c) => u8::try_from(*c)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| out_of_range(spec, c)),
        FieldValue::Text(s) if s.is_empty() => Ok(0),
        FieldValue::Text(s) if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        FieldValue::Text(s) => Err(out_of_range(spec, s)),
        FieldValue::Int(v) => u8::try_from(*v).map_err(|_| out_of_range(spec, v)),
        FieldValue::UInt(v) => u8::try_from(*v).map_err(|_| out_of_range(spec, v)),
        other => Err(mismatch(spec, other)),
    }
}

fn text_value(spec: &FieldSpec, value: &FieldValue) -> Result<String, EncodeError> {
    match value {
        FieldValue::Text(s) => Ok(s.clone()),
        FieldValue::Char(c) => Ok(c.to_string()),
        FieldValue::Int(v) => Ok(format_integer(*v)),
        FieldValue::UInt(v) => Ok(v.to_string()),
        FieldValue::Decimal(d) => Ok(d.to_string()),
        other => Err(mismatch(spec, other)),
    }
}

fn decimal_text(
    codec: &FieldCodec,
    spec: &FieldSpec,
    value: &FieldValue,
) -> Result<String, EncodeError> {
    match value {
        FieldValue::Decimal(d) => Ok(codec.format_decimal(*d)),
        FieldValue::Int(v) => Ok(codec.format_decimal(Decimal::from(*v))),
        FieldValue::UInt(v) => Ok(codec.format_decimal(Decimal::from(*v))),
        // Unparsable text is passed through untouched.
        FieldValue::Text(s) => Ok(Decimal::from_str(s.trim())
            .map(|d| codec.format_decimal(d))
            .unwrap_or_else(|_| s.clone())),
        other => Err(mismatch(spec, other)),
    }
}

fn write_integer(
    spec: &FieldSpec,
    value: &FieldValue,
    mut slot: &mut [u8],
) -> Result<(), EncodeError> {
    let wide = match value {
        FieldValue::Int(v) => i128::from(*v),
        FieldValue::UInt(v) => i128::from(*v),
        other => return Err(mismatch(spec, other)),
    };
    let range = |_: TryFromIntError| out_of_range(spec, wide);
    match spec.ty {
        FieldType::U16 => slot.put_u16_le(u16::try_from(wide).map_err(range)?),
        FieldType::I32 => slot.put_i32_le(i32::try_from(wide).map_err(range)?),
        FieldType::U32 => slot.put_u32_le(u32::try_from(wide).map_err(range)?),
        FieldType::I64 => slot.put_i64_le(i64::try_from(wide).map_err(range)?),
        _ => return Err(mismatch(spec, value)),
    }
    Ok(())
}
