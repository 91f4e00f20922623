/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Fixed-width scalar coercions.
//!
//! [`FieldCodec`] converts between semantic scalars and the byte and text
//! forms stored in native records:
//! - Text is encoded with a legacy code page (GBK by default), truncated on a
//!   code point boundary and null-padded to the field width.
//! - Decoding never fails: the configured encoding is tried first, then UTF-8,
//!   then Latin-1.
//! - Prices and amounts travel as fixed-precision decimal text.

use crate::constants::DEFAULT_PRICE_PRECISION;
use encoding_rs::{EncoderResult, GBK};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

/// Characters stripped from the end of decoded text.
const TRAILING_PADDING: &[char] = &['\0', '\r', '\n'];

/// Text encoding used for native text fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// GBK (Simplified Chinese code page).
    #[default]
    Gbk,
    /// UTF-8.
    Utf8,
    /// ISO-8859-1.
    Latin1,
}

impl TextEncoding {
    /// Returns the maximum byte length of a single code point.
    #[inline]
    #[must_use]
    pub const fn max_char_width(self) -> usize {
        match self {
            Self::Gbk => 2,
            Self::Utf8 => 4,
            Self::Latin1 => 1,
        }
    }

    /// Encodes text. Unmappable characters become `?`, never an error.
    #[must_use]
    pub fn encode(self, value: &str) -> Cow<'_, [u8]> {
        match self {
            Self::Gbk => Cow::Owned(encode_gbk(value)),
            Self::Utf8 => Cow::Borrowed(value.as_bytes()),
            Self::Latin1 => Cow::Owned(
                value
                    .chars()
                    .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                    .collect(),
            ),
        }
    }

    /// Decodes bytes strictly, returning `None` on any malformed sequence.
    #[must_use]
    pub fn decode_strict(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Gbk => GBK
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Cow::into_owned),
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            Self::Latin1 => Some(decode_latin1(bytes)),
        }
    }

    /// Returns true if `bytes` ends on a complete code point.
    fn is_boundary(self, bytes: &[u8]) -> bool {
        match self {
            Self::Gbk => GBK
                .decode_without_bom_handling_and_without_replacement(bytes)
                .is_some(),
            Self::Utf8 => std::str::from_utf8(bytes).is_ok(),
            Self::Latin1 => true,
        }
    }
}

/// Encodes to GBK, writing `?` for each character GBK cannot represent.
fn encode_gbk(value: &str) -> Vec<u8> {
    let mut encoder = GBK.new_encoder();
    let mut out = Vec::new();
    let mut rest = value;
    loop {
        let needed = encoder
            .max_buffer_length_from_utf8_without_replacement(rest.len())
            .unwrap_or(rest.len() * 4);
        out.reserve(needed);
        let (result, read) =
            encoder.encode_from_utf8_to_vec_without_replacement(rest, &mut out, true);
        rest = &rest[read..];
        match result {
            EncoderResult::InputEmpty => return out,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => out.push(b'?'),
        }
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Scalar codec for fixed-width native fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCodec {
    encoding: TextEncoding,
    precision: u32,
}

impl FieldCodec {
    /// Creates a codec with the given encoding and default price precision.
    #[must_use]
    pub const fn new(encoding: TextEncoding) -> Self {
        Self {
            encoding,
            precision: DEFAULT_PRICE_PRECISION,
        }
    }

    /// Sets the number of fractional digits used for decimal text.
    #[must_use]
    pub const fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Returns the text encoding.
    #[inline]
    #[must_use]
    pub const fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Returns the decimal precision.
    #[inline]
    #[must_use]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Encodes text into exactly `width` bytes.
    ///
    /// Overlong input is cut at the last complete code point that fits; the
    /// remainder is zero-filled.
    ///
    /// # Arguments
    /// * `value` - Text to encode
    /// * `width` - Field width in bytes
    #[must_use]
    pub fn encode_text(&self, value: &str, width: usize) -> Vec<u8> {
        let mut out = vec![0u8; width];
        self.write_text(value, &mut out);
        out
    }

    /// Encodes text into `dst`, which is zero-filled past the text.
    pub fn write_text(&self, value: &str, dst: &mut [u8]) {
        let encoded = self.encoding.encode(value);
        let len = self.truncation_point(&encoded, dst.len());
        dst[..len].copy_from_slice(&encoded[..len]);
        dst[len..].fill(0);
    }

    fn truncation_point(&self, encoded: &[u8], width: usize) -> usize {
        if encoded.len() <= width {
            return encoded.len();
        }
        let floor = width.saturating_sub(self.encoding.max_char_width() - 1);
        (floor..=width)
            .rev()
            .find(|&end| self.encoding.is_boundary(&encoded[..end]))
            .unwrap_or(0)
    }

    /// Decodes a text field. Never fails.
    ///
    /// Trailing NUL, CR and LF are removed after decoding.
    #[must_use]
    pub fn decode_text(&self, bytes: &[u8]) -> String {
        let text = self
            .encoding
            .decode_strict(bytes)
            .or_else(|| TextEncoding::Utf8.decode_strict(bytes))
            .unwrap_or_else(|| decode_latin1(bytes));
        let trimmed = text.trim_end_matches(TRAILING_PADDING);
        if trimmed.len() == text.len() {
            text
        } else {
            trimmed.to_string()
        }
    }

    /// Formats a decimal with the codec precision.
    #[must_use]
    pub fn format_decimal(&self, value: Decimal) -> String {
        format_decimal(value, self.precision)
    }

    /// Formats an integer.
    #[must_use]
    pub fn format_integer(&self, value: i64) -> String {
        format_integer(value)
    }
}

impl Default for FieldCodec {
    fn default() -> Self {
        Self::new(TextEncoding::default())
    }
}

/// Formats a decimal with a fixed number of fractional digits.
///
/// Midpoints round away from zero.
#[must_use]
pub fn format_decimal(value: Decimal, precision: u32) -> String {
    let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", precision as usize, rounded)
}

/// Parses decimal text, returning zero when the text is not a number.
///
/// Scientific notation is accepted.
#[must_use]
pub fn parse_decimal(text: &str) -> Decimal {
    let text = text.trim();
    if text.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .unwrap_or(Decimal::ZERO)
}

/// Formats an integer.
#[must_use]
pub fn format_integer(value: i64) -> String {
    let mut buf = itoa::Buffer::new();
    buf.format(value).to_string()
}

/// Parses integer text, returning zero when the text is not a number.
///
/// Decimal text is accepted and truncated toward zero.
#[must_use]
pub fn parse_integer(text: &str) -> i64 {
    let text = text.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| parse_decimal(text).trunc().to_i64())
        .unwrap_or(0)
}
