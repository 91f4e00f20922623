/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Order parameters.

use oxtrade_core::{BusinessCode, FieldMap, OrderType};
use oxtrade_session::AccountIdentity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameters of a single order or one item of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Exchange trade sub-account.
    pub trade_account: String,
    /// Trading board.
    pub board_id: String,
    /// Security code.
    pub symbol: String,
    /// Limit price.
    pub price: Decimal,
    /// Quantity.
    pub quantity: u32,
    /// Business code; defaults to buy, or to the batch code for batch items.
    pub business_code: Option<i32>,
    /// Action code; defaults to limit, or to the batch code for batch items.
    pub action_code: Option<i32>,
    /// Caller reference echoed in reports.
    pub client_tag: String,
}

impl NewOrder {
    /// Creates an order with default codes and no client tag.
    #[must_use]
    pub fn new(
        trade_account: impl Into<String>,
        board_id: impl Into<String>,
        symbol: impl Into<String>,
        price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            trade_account: trade_account.into(),
            board_id: board_id.into(),
            symbol: symbol.into(),
            price,
            quantity,
            business_code: None,
            action_code: None,
            client_tag: String::new(),
        }
    }

    /// Sets the business code.
    #[must_use]
    pub fn with_business_code(mut self, code: impl Into<i32>) -> Self {
        self.business_code = Some(code.into());
        self
    }

    /// Sets the action code.
    #[must_use]
    pub fn with_action_code(mut self, code: impl Into<i32>) -> Self {
        self.action_code = Some(code.into());
        self
    }

    /// Sets the client tag.
    #[must_use]
    pub fn with_client_tag(mut self, tag: impl Into<String>) -> Self {
        self.client_tag = tag.into();
        self
    }

    /// Builds the `OrderRequest` fields for the given account.
    pub(crate) fn request_fields(&self, identity: &AccountIdentity) -> FieldMap {
        FieldMap::new()
            .with("AcctType", identity.account_type.as_char())
            .with("Account", identity.account.as_str())
            .with("Trdacct", self.trade_account.as_str())
            .with("BoardId", self.board_id.as_str())
            .with(
                "StkBiz",
                self.business_code.unwrap_or(BusinessCode::Buy.code()),
            )
            .with(
                "StkBizAction",
                self.action_code.unwrap_or(OrderType::Limit.code()),
            )
            .with("Symbol", self.symbol.as_str())
            .with("OrderQty", self.quantity)
            .with("OrderPrice", self.price)
            .with("OrderRef", self.client_tag.as_str())
    }

    /// Builds the `OrderItem` fields of a batch entry.
    pub(crate) fn item_fields(&self, business_code: i32, action_code: i32) -> FieldMap {
        FieldMap::new()
            .with("Trdacct", self.trade_account.as_str())
            .with("BoardId", self.board_id.as_str())
            .with("StkBiz", self.business_code.unwrap_or(business_code))
            .with("StkBizAction", self.action_code.unwrap_or(action_code))
            .with("Symbol", self.symbol.as_str())
            .with("OrderQty", self.quantity)
            .with("OrderPrice", self.price)
            .with("OrderRef", self.client_tag.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxtrade_core::{AccountType, BOARD_SH};

    fn order() -> NewOrder {
        NewOrder::new("A123456789", BOARD_SH, "600000", Decimal::new(1050, 2), 100)
    }

    #[test]
    fn test_request_fields_defaults() {
        let identity = AccountIdentity::new("110000001", AccountType::Stock);
        let fields = order().request_fields(&identity);
        assert_eq!(fields.get_char("AcctType"), Some('0'));
        assert_eq!(fields.get_str("Account"), Some("110000001"));
        assert_eq!(fields.get_i64("StkBiz"), Some(100));
        assert_eq!(fields.get_i64("StkBizAction"), Some(100));
        assert_eq!(fields.get_u64("OrderQty"), Some(100));
        assert_eq!(fields.get_decimal("OrderPrice"), Some(Decimal::new(1050, 2)));
        assert_eq!(fields.get_str("OrderRef"), Some(""));
    }

    #[test]
    fn test_explicit_codes() {
        let identity = AccountIdentity::new("110000001", AccountType::Credit);
        let fields = order()
            .with_business_code(BusinessCode::CreditSell)
            .with_action_code(OrderType::Market)
            .with_client_tag("t-1")
            .request_fields(&identity);
        assert_eq!(fields.get_char("AcctType"), Some('3'));
        assert_eq!(fields.get_i64("StkBiz"), Some(703));
        assert_eq!(fields.get_i64("StkBizAction"), Some(121));
        assert_eq!(fields.get_str("OrderRef"), Some("t-1"));
    }

    #[test]
    fn test_item_inherits_batch_codes() {
        let item = order().item_fields(101, 121);
        assert_eq!(item.get_i64("StkBiz"), Some(101));
        assert_eq!(item.get_i64("StkBizAction"), Some(121));
        assert!(!item.contains("Account"));

        let item = order().with_business_code(100).item_fields(101, 121);
        assert_eq!(item.get_i64("StkBiz"), Some(100));
    }
}
