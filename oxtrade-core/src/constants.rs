/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Fixed field widths of the native record layouts.
//!
//! These values are part of the binary contract with the native library and
//! must match its packed structure definitions byte for byte.

/// Width of `ErrorInfo` in the error record.
pub const ERROR_INFO_LEN: usize = 128;
/// Width of the fund account.
pub const ACCOUNT_LEN: usize = 24;
/// Width of the logon password.
pub const PASSWORD_LEN: usize = 16;
/// Width of the zero-filled reserved region in the logon request.
pub const RESERVED_LEN: usize = 256;
/// Width of the trading board code.
pub const BOARD_ID_LEN: usize = 4;
/// Width of the security symbol.
pub const SYMBOL_LEN: usize = 36;
/// Width of the exchange sub-account.
pub const TRD_ACCT_LEN: usize = 24;
/// Width of a decimal price rendered as text.
pub const ORDER_PRICE_LEN: usize = 16;
/// Width of the customer code.
pub const CUST_CODE_LEN: usize = 24;
/// Width of the client order tag.
pub const ORDER_REF_LEN: usize = 33;
/// Width of the extended trading info.
pub const TRD_EX_INFO_LEN: usize = 512;
/// Width of the order insertion time.
pub const ORDER_TIME_LEN: usize = 36;
/// Width of the execution info message.
pub const EXE_INFO_LEN: usize = 128;
/// Width of a filled amount rendered as text.
pub const FILLED_AMT_LEN: usize = 24;
/// Width of the trade serial number.
pub const TRADE_SN_LEN: usize = 36;
/// Width of a filled price rendered as text.
pub const FILLED_PRICE_LEN: usize = 16;
/// Width of the fill time.
pub const FILLED_TIME_LEN: usize = 36;
/// Width of the fill return message.
pub const RET_MESSAGE_LEN: usize = 128;

/// Maximum number of items in a batch order.
pub const MAX_ORDERS_COUNT: usize = 500;

/// Default number of fractional digits used for prices and amounts.
pub const DEFAULT_PRICE_PRECISION: u32 = 2;
