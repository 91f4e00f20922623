/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # OxTrade Record
//!
//! Binary record marshaling for the OxTrade native trading interface.
//!
//! Every native structure is a packed, 1-byte aligned record. This crate
//! describes each one as a static field table and converts between those
//! records and [`FieldMap`] values with a single generic encoder and decoder.
//!
//! ## Features
//!
//! - **Table-driven**: Layouts are data, checked by tests for contiguity
//! - **Exact sizing**: Encoded buffers always match the native structure size
//! - **Total decoding**: Any byte content decodes without error

pub mod decoder;
pub mod encoder;
pub mod layout;
pub mod marshaler;
pub mod records;

pub use layout::{FieldSpec, FieldType, RecordLayout};
pub use marshaler::RecordMarshaler;
pub use oxtrade_core::FieldMap;
pub use records::RecordKind;
