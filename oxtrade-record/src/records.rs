/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Field tables of every native record kind.
//!
//! Offsets are written out explicitly so each table reads as the packed
//! structure it mirrors; the tests below check that they are contiguous.

use crate::layout::{FieldSpec, FieldType, RecordLayout};
use oxtrade_core::constants::{
    ACCOUNT_LEN, BOARD_ID_LEN, CUST_CODE_LEN, ERROR_INFO_LEN, EXE_INFO_LEN, FILLED_AMT_LEN,
    FILLED_PRICE_LEN, FILLED_TIME_LEN, MAX_ORDERS_COUNT, ORDER_PRICE_LEN, ORDER_REF_LEN,
    ORDER_TIME_LEN, PASSWORD_LEN, RESERVED_LEN, RET_MESSAGE_LEN, SYMBOL_LEN, TRADE_SN_LEN,
    TRD_ACCT_LEN, TRD_EX_INFO_LEN,
};
use std::fmt;

use crate::layout::FieldType::{Char, DecimalText, I32, I64, Reserved, Text, U16, U32};

/// Error details attached to responses.
pub static RSP_ERROR: RecordLayout = RecordLayout {
    name: "RspError",
    size: 132,
    fields: &[
        FieldSpec::new("ErrorId", 0, I32),
        FieldSpec::new("ErrorInfo", 4, Text(ERROR_INFO_LEN)),
    ],
};

/// Logon request.
pub static LOGON_REQUEST: RecordLayout = RecordLayout {
    name: "LogonRequest",
    size: 297,
    fields: &[
        FieldSpec::new("AcctType", 0, Char),
        FieldSpec::new("Account", 1, Text(ACCOUNT_LEN)),
        FieldSpec::new("Password", 25, Text(PASSWORD_LEN)),
        FieldSpec::new("Reserved", 41, Reserved(RESERVED_LEN)),
    ],
};

/// Logon response.
pub static LOGON_RESPONSE: RecordLayout = RecordLayout {
    name: "LogonResponse",
    size: 53,
    fields: &[
        FieldSpec::new("IntOrg", 0, I32),
        FieldSpec::new("CustCode", 4, Text(CUST_CODE_LEN)),
        FieldSpec::new("AcctType", 28, Char),
        FieldSpec::new("Account", 29, Text(ACCOUNT_LEN)),
    ],
};

/// Trade sub-account query.
pub static TRADE_ACCOUNTS_REQUEST: RecordLayout = RecordLayout {
    name: "TradeAccountsRequest",
    size: 25,
    fields: &[
        FieldSpec::new("AcctType", 0, Char),
        FieldSpec::new("Account", 1, Text(ACCOUNT_LEN)),
    ],
};

/// One trade sub-account.
pub static TRADE_ACCOUNTS_RESPONSE: RecordLayout = RecordLayout {
    name: "TradeAccountsResponse",
    size: 79,
    fields: &[
        FieldSpec::new("CustCode", 0, Text(CUST_CODE_LEN)),
        FieldSpec::new("Account", 24, Text(ACCOUNT_LEN)),
        FieldSpec::new("ExchangeId", 48, Char),
        FieldSpec::new("BoardId", 49, Text(BOARD_ID_LEN)),
        FieldSpec::new("TrdAcctStatus", 53, Char),
        FieldSpec::new("TrdAcct", 54, Text(TRD_ACCT_LEN)),
        FieldSpec::new("TrdAcctType", 78, Char),
    ],
};

/// Single order placement.
pub static ORDER_REQUEST: RecordLayout = RecordLayout {
    name: "OrderRequest",
    size: 663,
    fields: &[
        FieldSpec::new("AcctType", 0, Char),
        FieldSpec::new("Account", 1, Text(ACCOUNT_LEN)),
        FieldSpec::new("Trdacct", 25, Text(TRD_ACCT_LEN)),
        FieldSpec::new("BoardId", 49, Text(BOARD_ID_LEN)),
        FieldSpec::new("StkBiz", 53, I32),
        FieldSpec::new("StkBizAction", 57, I32),
        FieldSpec::new("Symbol", 61, Text(SYMBOL_LEN)),
        FieldSpec::new("OrderQty", 97, U32),
        FieldSpec::new("OrderPrice", 101, DecimalText(ORDER_PRICE_LEN)),
        FieldSpec::new("OrderRef", 117, Text(ORDER_REF_LEN)),
        FieldSpec::new("TrdCodeCls", 150, Char),
        FieldSpec::new("TrdExInfo", 151, Text(TRD_EX_INFO_LEN)),
    ],
};

/// Order status report.
pub static ORDER_TICKET: RecordLayout = RecordLayout {
    name: "OrderTicket",
    size: 371,
    fields: &[
        FieldSpec::new("AcctType", 0, Char),
        FieldSpec::new("Account", 1, Text(ACCOUNT_LEN)),
        FieldSpec::new("Trdacct", 25, Text(TRD_ACCT_LEN)),
        FieldSpec::new("BoardId", 49, Text(BOARD_ID_LEN)),
        FieldSpec::new("StkBiz", 53, I32),
        FieldSpec::new("StkBizAction", 57, I32),
        FieldSpec::new("Symbol", 61, Text(SYMBOL_LEN)),
        FieldSpec::new("OrderRef", 97, Text(ORDER_REF_LEN)),
        FieldSpec::new("OrderQty", 130, U32),
        FieldSpec::new("OrderPrice", 134, DecimalText(ORDER_PRICE_LEN)),
        FieldSpec::new("InsertDate", 150, I32),
        FieldSpec::new("InsertTime", 154, Text(ORDER_TIME_LEN)),
        FieldSpec::new("OrderNo", 190, I64),
        FieldSpec::new("OrderState", 198, Char),
        FieldSpec::new("ErrorId", 199, I32),
        FieldSpec::new("ExeInfo", 203, Text(EXE_INFO_LEN)),
        FieldSpec::new("FilledQty", 331, I64),
        FieldSpec::new("CanceledQty", 339, I64),
        FieldSpec::new("FilledAmt", 347, DecimalText(FILLED_AMT_LEN)),
    ],
};

/// Trade (fill) report.
pub static ORDER_FILLED: RecordLayout = RecordLayout {
    name: "OrderFilled",
    size: 394,
    fields: &[
        FieldSpec::new("Account", 0, Text(ACCOUNT_LEN)),
        FieldSpec::new("Trdacct", 24, Text(TRD_ACCT_LEN)),
        FieldSpec::new("Symbol", 48, Text(SYMBOL_LEN)),
        FieldSpec::new("ExchangeId", 84, Char),
        FieldSpec::new("BoardId", 85, Text(BOARD_ID_LEN)),
        FieldSpec::new("StkBiz", 89, I32),
        FieldSpec::new("StkBizAction", 93, I32),
        FieldSpec::new("TradeSn", 97, Text(TRADE_SN_LEN)),
        FieldSpec::new("OrderNo", 133, I64),
        FieldSpec::new("OrderRef", 141, Text(ORDER_REF_LEN)),
        FieldSpec::new("FilledQty", 174, I64),
        FieldSpec::new("FilledPrice", 182, DecimalText(FILLED_PRICE_LEN)),
        FieldSpec::new("FilledAmt", 198, DecimalText(FILLED_AMT_LEN)),
        FieldSpec::new("FilledDate", 222, I32),
        FieldSpec::new("FilledTime", 226, Text(FILLED_TIME_LEN)),
        FieldSpec::new("ErrorId", 262, I32),
        FieldSpec::new("RetMessage", 266, Text(RET_MESSAGE_LEN)),
    ],
};

/// Cancel request.
pub static CANCEL_REQUEST: RecordLayout = RecordLayout {
    name: "CancelRequest",
    size: 41,
    fields: &[
        FieldSpec::new("AcctType", 0, Char),
        FieldSpec::new("Account", 1, Text(ACCOUNT_LEN)),
        FieldSpec::new("BoardId", 25, Text(BOARD_ID_LEN)),
        FieldSpec::new("OrderDate", 29, U32),
        FieldSpec::new("OrderNo", 33, I64),
    ],
};

/// Cancel response.
pub static CANCEL_RESPONSE: RecordLayout = RecordLayout {
    name: "CancelResponse",
    size: 213,
    fields: &[
        FieldSpec::new("Account", 0, Text(ACCOUNT_LEN)),
        FieldSpec::new("BoardId", 24, Text(BOARD_ID_LEN)),
        FieldSpec::new("OrderDate", 28, U32),
        FieldSpec::new("OrderNo", 32, I64),
        FieldSpec::new("OrderState", 40, Char),
        FieldSpec::new("ExeInfo", 41, Text(EXE_INFO_LEN)),
        FieldSpec::new("StkBiz", 169, I32),
        FieldSpec::new("StkBizAction", 173, I32),
        FieldSpec::new("Symbol", 177, Text(SYMBOL_LEN)),
    ],
};

/// One item of a batch order.
pub static ORDER_ITEM: RecordLayout = RecordLayout {
    name: "OrderItem",
    size: 125,
    fields: &[
        FieldSpec::new("Trdacct", 0, Text(TRD_ACCT_LEN)),
        FieldSpec::new("BoardId", 24, Text(BOARD_ID_LEN)),
        FieldSpec::new("StkBiz", 28, I32),
        FieldSpec::new("StkBizAction", 32, I32),
        FieldSpec::new("Symbol", 36, Text(SYMBOL_LEN)),
        FieldSpec::new("OrderQty", 72, U32),
        FieldSpec::new("OrderPrice", 76, DecimalText(ORDER_PRICE_LEN)),
        FieldSpec::new("OrderRef", 92, Text(ORDER_REF_LEN)),
    ],
};

/// Batch order request. The native library echoes it as the batch response.
pub static BATCH_ORDER_REQUEST: RecordLayout = RecordLayout {
    name: "BatchOrderRequest",
    size: 35 + 125 * MAX_ORDERS_COUNT,
    fields: &[
        FieldSpec::new("AcctType", 0, Char),
        FieldSpec::new("Account", 1, Text(ACCOUNT_LEN)),
        FieldSpec::new("StkBiz", 25, I32),
        FieldSpec::new("StkBizAction", 29, I32),
        FieldSpec::new("TotalCount", 33, U16),
        FieldSpec::new(
            "OrderArray",
            35,
            FieldType::Array {
                count_field: "TotalCount",
                item: &ORDER_ITEM,
                capacity: MAX_ORDERS_COUNT,
            },
        ),
    ],
};

/// Every record kind exchanged with the native library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Error details attached to responses.
    RspError,
    /// Logon request.
    LogonRequest,
    /// Logon response.
    LogonResponse,
    /// Trade sub-account query.
    TradeAccountsRequest,
    /// Trade sub-account response.
    TradeAccountsResponse,
    /// Single order placement.
    OrderRequest,
    /// Order status report.
    OrderTicket,
    /// Trade report.
    OrderFilled,
    /// Cancel request.
    CancelRequest,
    /// Cancel response.
    CancelResponse,
    /// Batch order request.
    BatchOrderRequest,
    /// Batch order response.
    BatchOrderResponse,
}

impl RecordKind {
    /// All record kinds.
    pub const ALL: [Self; 12] = [
        Self::RspError,
        Self::LogonRequest,
        Self::LogonResponse,
        Self::TradeAccountsRequest,
        Self::TradeAccountsResponse,
        Self::OrderRequest,
        Self::OrderTicket,
        Self::OrderFilled,
        Self::CancelRequest,
        Self::CancelResponse,
        Self::BatchOrderRequest,
        Self::BatchOrderResponse,
    ];

    /// Returns the field table of this kind.
    #[must_use]
    pub fn layout(self) -> &'static RecordLayout {
        match self {
            Self::RspError => &RSP_ERROR,
            Self::LogonRequest => &LOGON_REQUEST,
            Self::LogonResponse => &LOGON_RESPONSE,
            Self::TradeAccountsRequest => &TRADE_ACCOUNTS_REQUEST,
            Self::TradeAccountsResponse => &TRADE_ACCOUNTS_RESPONSE,
            Self::OrderRequest => &ORDER_REQUEST,
            Self::OrderTicket => &ORDER_TICKET,
            Self::OrderFilled => &ORDER_FILLED,
            Self::CancelRequest => &CANCEL_REQUEST,
            Self::CancelResponse => &CANCEL_RESPONSE,
            Self::BatchOrderRequest | Self::BatchOrderResponse => &BATCH_ORDER_REQUEST,
        }
    }

    /// Returns the record size in bytes.
    #[inline]
    #[must_use]
    pub fn size(self) -> usize {
        self.layout().size
    }

    /// Returns true for kinds sent to the native library.
    #[must_use]
    pub const fn is_request(self) -> bool {
        matches!(
            self,
            Self::LogonRequest
                | Self::TradeAccountsRequest
                | Self::OrderRequest
                | Self::CancelRequest
                | Self::BatchOrderRequest
        )
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
