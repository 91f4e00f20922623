/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Core domain types for the native trading interface.
//!
//! This module provides the coded enumerations and identifiers exchanged with
//! the native library:
//! - [`RequestId`]: Correlation number attached to every outbound request
//! - [`AccountType`]: Account class carried in `AcctType`
//! - [`OrderState`]: Order lifecycle code carried in `OrderState`
//! - [`ExchangeId`]: Exchange code carried in `ExchangeId`
//! - [`BusinessCode`] and [`OrderType`]: Values for `StkBiz` / `StkBizAction`
//! - [`RspError`]: Typed view over the native error record

use crate::field::FieldMap;
use chrono::{Datelike, Local, NaiveDate};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board code of the Shanghai main board.
pub const BOARD_SH: &str = "10";
/// Board code of the Shenzhen main board.
pub const BOARD_SZ: &str = "00";

/// Request correlation number.
///
/// Every outbound request is tagged with a fresh id; the native library echoes
/// it on the matching response callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct RequestId(i32);

impl RequestId {
    /// Creates a new request id.
    ///
    /// # Arguments
    /// * `value` - The raw id value
    #[inline]
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw id value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl From<i32> for RequestId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<RequestId> for i32 {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account class (`AcctType`).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromPrimitive,
    ToPrimitive,
)]
#[repr(u8)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// Cash equities.
    #[default]
    Stock = b'0',
    /// Listed options.
    Options = b'1',
    /// Futures.
    Futures = b'2',
    /// Margin and securities lending.
    Credit = b'3',
}

impl AccountType {
    /// Creates an account type from its wire code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_u8(code)
    }

    /// Returns the wire code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the character representation of this account type.
    #[inline]
    #[must_use]
    pub const fn as_char(self) -> char {
        self as u8 as char
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<u8> for AccountType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code(value).ok_or(())
    }
}

/// Order lifecycle state (`OrderState`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    /// Accepted locally, not yet sent to the exchange.
    NotReported = b'0',
    /// Being sent to the exchange.
    Reporting = b'1',
    /// Acknowledged by the exchange.
    Reported = b'2',
    /// Cancel requested on a reported order.
    Canceling = b'3',
    /// Cancel requested on a partially filled order.
    PartialCanceling = b'4',
    /// Partially filled, remainder canceled.
    PartialCanceled = b'5',
    /// Fully canceled.
    Canceled = b'6',
    /// Partially filled.
    PartialFilled = b'7',
    /// Fully filled.
    Filled = b'8',
    /// Rejected.
    Rejected = b'9',
    /// Waiting to be reported.
    ReportWaiting = b'A',
    /// Report confirmed.
    ReportAck = b'B',
    /// Needs to be sent.
    NeedSend = b'N',
    /// Terminated by dividend processing.
    DividendCanceled = b'D',
    /// Expired.
    Expired = b'E',
    /// Triggered again.
    TriggerAgain = b'T',
}

impl OrderState {
    /// Creates an order state from its wire code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_u8(code)
    }

    /// Creates an order state from a single character.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        u8::try_from(c).ok().and_then(Self::from_code)
    }

    /// Returns the character representation of this state.
    #[inline]
    #[must_use]
    pub const fn as_char(self) -> char {
        self as u8 as char
    }

    /// Returns true if the order can no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::PartialCanceled
                | Self::Canceled
                | Self::Filled
                | Self::Rejected
                | Self::DividendCanceled
                | Self::Expired
        )
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Exchange identifier (`ExchangeId`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExchangeId {
    /// Shenzhen Stock Exchange.
    Sz = b'0',
    /// Shanghai Stock Exchange.
    Sh = b'1',
}

impl ExchangeId {
    /// Creates an exchange id from its wire code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_u8(code)
    }

    /// Returns the character representation of this exchange.
    #[inline]
    #[must_use]
    pub const fn as_char(self) -> char {
        self as u8 as char
    }

    /// Returns the main board code listed on this exchange.
    #[must_use]
    pub const fn main_board(self) -> &'static str {
        match self {
            Self::Sh => BOARD_SH,
            Self::Sz => BOARD_SZ,
        }
    }
}

/// Business code (`StkBiz`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(i32)]
pub enum BusinessCode {
    /// Buy.
    Buy = 100,
    /// Sell.
    Sell = 101,
    /// ETF creation.
    EtfCreation = 181,
    /// ETF redemption.
    EtfRedemption = 182,
    /// Collateral buy.
    GuardBuy = 700,
    /// Collateral sell.
    GuardSell = 701,
    /// Margin buy.
    CreditBuy = 702,
    /// Short sell.
    CreditSell = 703,
}

impl BusinessCode {
    /// Creates a business code from its wire value.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::from_i32(code)
    }

    /// Returns the wire value.
    #[inline]
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl From<BusinessCode> for i32 {
    fn from(code: BusinessCode) -> Self {
        code.code()
    }
}

/// Order type (`StkBizAction`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(i32)]
pub enum OrderType {
    /// Limit order.
    Limit = 100,
    /// Market order.
    Market = 121,
}

impl OrderType {
    /// Creates an order type from its wire value.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::from_i32(code)
    }

    /// Returns the wire value.
    #[inline]
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl From<OrderType> for i32 {
    fn from(order_type: OrderType) -> Self {
        order_type.code()
    }
}

/// Typed view over the native error record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RspError {
    /// Native error code, `0` on success.
    pub error_id: i32,
    /// Native error text.
    pub error_info: String,
}

impl RspError {
    /// Creates a new error value.
    #[must_use]
    pub fn new(error_id: i32, error_info: impl Into<String>) -> Self {
        Self {
            error_id,
            error_info: error_info.into(),
        }
    }

    /// Builds the typed view from a decoded error record.
    ///
    /// Missing or mistyped fields fall back to `0` and the empty string.
    #[must_use]
    pub fn from_fields(fields: &FieldMap) -> Self {
        Self {
            error_id: fields
                .get_i64("ErrorId")
                .and_then(|v| i32::try_from(v).ok())
                .unwrap_or(0),
            error_info: fields.get_str("ErrorInfo").unwrap_or_default().to_string(),
        }
    }

    /// Converts back to a field mapping for encoding.
    #[must_use]
    pub fn to_fields(&self) -> FieldMap {
        FieldMap::new()
            .with("ErrorId", self.error_id)
            .with("ErrorInfo", self.error_info.as_str())
    }

    /// Returns true if the record reports success.
    #[inline]
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error_id == 0
    }
}

impl fmt::Display for RspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_id, self.error_info)
    }
}

/// Packs a calendar date as the `YYYYMMDD` integer used by `OrderDate`.
#[must_use]
pub fn date_to_yyyymmdd(date: NaiveDate) -> u32 {
    let year = u32::try_from(date.year()).unwrap_or(0);
    year * 10_000 + date.month() * 100 + date.day()
}

/// Returns today's local date as `YYYYMMDD`.
#[must_use]
pub fn today_yyyymmdd() -> u32 {
    date_to_yyyymmdd(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id() {
        let id = RequestId::new(7);
        assert_eq!(id.value(), 7);
        assert_eq!(i32::from(id), 7);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn test_account_type_codes() {
        assert_eq!(AccountType::from_code(b'0'), Some(AccountType::Stock));
        assert_eq!(AccountType::from_code(b'3'), Some(AccountType::Credit));
        assert_eq!(AccountType::from_code(b'9'), None);
        assert_eq!(AccountType::Options.as_char(), '1');
        assert_eq!(AccountType::default(), AccountType::Stock);
        assert!(AccountType::try_from(b'x').is_err());
    }

    #[test]
    fn test_order_state_codes() {
        assert_eq!(OrderState::from_char('0'), Some(OrderState::NotReported));
        assert_eq!(OrderState::from_char('8'), Some(OrderState::Filled));
        assert_eq!(OrderState::from_char('T'), Some(OrderState::TriggerAgain));
        assert_eq!(OrderState::from_char('Z'), None);
        assert_eq!(OrderState::from_char('中'), None);
        assert!(OrderState::Canceled.is_terminal());
        assert!(!OrderState::Reported.is_terminal());
    }

    #[test]
    fn test_exchange_board() {
        assert_eq!(ExchangeId::from_code(b'1'), Some(ExchangeId::Sh));
        assert_eq!(ExchangeId::Sh.main_board(), "10");
        assert_eq!(ExchangeId::Sz.main_board(), "00");
    }

    #[test]
    fn test_business_codes() {
        assert_eq!(BusinessCode::Buy.code(), 100);
        assert_eq!(BusinessCode::from_code(703), Some(BusinessCode::CreditSell));
        assert_eq!(BusinessCode::from_code(1), None);
        assert_eq!(i32::from(OrderType::Market), 121);
        assert_eq!(OrderType::from_code(100), Some(OrderType::Limit));
    }

    #[test]
    fn test_rsp_error_fields() {
        let err = RspError::new(1001, "bad password");
        let back = RspError::from_fields(&err.to_fields());
        assert_eq!(back, err);
        assert!(!back.is_success());
        assert!(RspError::from_fields(&FieldMap::new()).is_success());
    }

    #[test]
    fn test_date_packing() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(date_to_yyyymmdd(date), 20_260_105);
        assert!(today_yyyymmdd() > 20_000_000);
    }
}
