/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Record layout descriptors.
//!
//! A record is a packed sequence of fixed-width fields. Each layout is a plain
//! table of [`FieldSpec`] entries consumed by one generic encoder and decoder.

use std::fmt;

/// Storage type of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// One-byte code such as `AcctType` or `OrderState`.
    Char,
    /// Null-padded text of the given width.
    Text(usize),
    /// Region written as zeros regardless of the supplied value.
    Reserved(usize),
    /// Decimal rendered as null-padded text of the given width.
    DecimalText(usize),
    /// Little-endian unsigned 16-bit integer.
    U16,
    /// Little-endian signed 32-bit integer.
    I32,
    /// Little-endian unsigned 32-bit integer.
    U32,
    /// Little-endian signed 64-bit integer.
    I64,
    /// Fixed-capacity array of nested records.
    Array {
        /// Field that carries the number of used items.
        count_field: &'static str,
        /// Layout of a single item.
        item: &'static RecordLayout,
        /// Number of item slots.
        capacity: usize,
    },
}

impl FieldType {
    /// Returns the width of the field in bytes.
    #[must_use]
    pub const fn width(&self) -> usize {
        match self {
            Self::Char => 1,
            Self::Text(w) | Self::Reserved(w) | Self::DecimalText(w) => *w,
            Self::U16 => 2,
            Self::I32 | Self::U32 => 4,
            Self::I64 => 8,
            Self::Array { item, capacity, .. } => item.size * *capacity,
        }
    }

    /// Returns a short name of the type, used in error reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Text(_) => "text",
            Self::Reserved(_) => "reserved",
            Self::DecimalText(_) => "decimal",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::Array { .. } => "array",
        }
    }
}

/// A named field at a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, used as the mapping key.
    pub name: &'static str,
    /// Byte offset from the start of the record.
    pub offset: usize,
    /// Storage type.
    pub ty: FieldType,
}

impl FieldSpec {
    /// Creates a field descriptor.
    #[must_use]
    pub const fn new(name: &'static str, offset: usize, ty: FieldType) -> Self {
        Self { name, offset, ty }
    }

    /// Returns the field width in bytes.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.ty.width()
    }

    /// Returns the byte range occupied by the field.
    #[inline]
    #[must_use]
    pub const fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.ty.width()
    }
}

/// Layout of one record kind.
#[derive(Debug, PartialEq, Eq)]
pub struct RecordLayout {
    /// Record name.
    pub name: &'static str,
    /// Total record size in bytes.
    pub size: usize,
    /// Fields in declaration order.
    pub fields: &'static [FieldSpec],
}

impl RecordLayout {
    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.name, self.size)
    }
}
