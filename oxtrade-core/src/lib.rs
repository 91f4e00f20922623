/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # OxTrade Core
//!
//! Core types, scalar codec, and error definitions shared by all OxTrade crates.
//!
//! This crate provides the fundamental building blocks:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Field types**: `FieldValue` and `FieldMap`, the semantic side of a record
//! - **Field codec**: GBK text, decimal and integer coercions for fixed-width fields
//! - **Domain types**: `RequestId`, `AccountType`, `OrderState`, business codes
//! - **Constants**: The field widths that define the native binary contract

pub mod codec;
pub mod constants;
pub mod error;
pub mod field;
pub mod types;

pub use codec::{FieldCodec, TextEncoding};
pub use error::{
    ConnectionError, DecodeError, EncodeError, LoginError, NativeLibraryError, OrderError,
    Result, TradeError,
};
pub use field::{FieldMap, FieldValue};
pub use types::{
    AccountType, BOARD_SH, BOARD_SZ, BusinessCode, ExchangeId, OrderState, OrderType, RequestId,
    RspError,
};
