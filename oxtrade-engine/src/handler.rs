/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Trading callback interface.
//!
//! This module defines the callbacks a caller implements to receive
//! responses and unsolicited reports from the native library. Callbacks run
//! on a thread owned by the native side.

use oxtrade_core::{FieldMap, RequestId, RspError};
use std::sync::Arc;

/// Callback interface for native trading events.
///
/// Every method has an empty default body; implement only what you need.
/// Payloads are `None` when the native side delivered a null record or the
/// record could not be decoded.
pub trait TradeHandler: Send + Sync {
    /// Called when the native library connects. The return value is passed
    /// back to the native side.
    fn on_connected(&self) -> i32 {
        0
    }

    /// Called when the native library disconnects. The return value is passed
    /// back to the native side.
    fn on_disconnected(&self) -> i32 {
        0
    }

    /// Called with the logon response.
    ///
    /// # Arguments
    /// * `request_id` - Id of the logon request
    /// * `error` - Error record, if any
    /// * `is_last` - True for the final record of the response
    /// * `response` - Decoded `LogonResponse`
    fn on_logon_response(
        &self,
        _request_id: RequestId,
        _error: Option<&RspError>,
        _is_last: bool,
        _response: Option<&FieldMap>,
    ) {
    }

    /// Called once per trade sub-account returned by a query.
    ///
    /// # Arguments
    /// * `request_id` - Id of the query request
    /// * `error` - Error record, if any
    /// * `is_last` - True for the final record of the response
    /// * `response` - Decoded `TradeAccountsResponse`
    fn on_trade_accounts_response(
        &self,
        _request_id: RequestId,
        _error: Option<&RspError>,
        _is_last: bool,
        _response: Option<&FieldMap>,
    ) {
    }

    /// Called with an order status report (`OrderTicket`).
    fn on_order_report(&self, _report: Option<&FieldMap>) {}

    /// Called with a trade report (`OrderFilled`).
    fn on_trade_report(&self, _report: Option<&FieldMap>) {}

    /// Called with the cancel response.
    fn on_cancel_response(
        &self,
        _request_id: RequestId,
        _error: Option<&RspError>,
        _response: Option<&FieldMap>,
    ) {
    }

    /// Called with the batch order response, which echoes the batch request.
    fn on_batch_order_response(
        &self,
        _request_id: RequestId,
        _error: Option<&RspError>,
        _response: Option<&FieldMap>,
    ) {
    }

    /// Called when the venue rejects a cancel after accepting it.
    ///
    /// # Arguments
    /// * `error` - Rejection details
    /// * `ticket` - Decoded `OrderTicket` of the order that stays live
    fn on_cancel_rejected(&self, _error: Option<&RspError>, _ticket: Option<&FieldMap>) {}
}

/// Default no-op handler implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl TradeHandler for NoOpHandler {}

impl<T: TradeHandler + ?Sized> TradeHandler for Arc<T> {
    fn on_connected(&self) -> i32 {
        (**self).on_connected()
    }

    fn on_disconnected(&self) -> i32 {
        (**self).on_disconnected()
    }

    fn on_logon_response(
        &self,
        request_id: RequestId,
        error: Option<&RspError>,
        is_last: bool,
        response: Option<&FieldMap>,
    ) {
        (**self).on_logon_response(request_id, error, is_last, response);
    }

    fn on_trade_accounts_response(
        &self,
        request_id: RequestId,
        error: Option<&RspError>,
        is_last: bool,
        response: Option<&FieldMap>,
    ) {
        (**self).on_trade_accounts_response(request_id, error, is_last, response);
    }

    fn on_order_report(&self, report: Option<&FieldMap>) {
        (**self).on_order_report(report);
    }

    fn on_trade_report(&self, report: Option<&FieldMap>) {
        (**self).on_trade_report(report);
    }

    fn on_cancel_response(
        &self,
        request_id: RequestId,
        error: Option<&RspError>,
        response: Option<&FieldMap>,
    ) {
        (**self).on_cancel_response(request_id, error, response);
    }

    fn on_batch_order_response(
        &self,
        request_id: RequestId,
        error: Option<&RspError>,
        response: Option<&FieldMap>,
    ) {
        (**self).on_batch_order_response(request_id, error, response);
    }

    fn on_cancel_rejected(&self, error: Option<&RspError>, ticket: Option<&FieldMap>) {
        (**self).on_cancel_rejected(error, ticket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct OrderCounter {
        reports: Mutex<usize>,
    }

    impl TradeHandler for OrderCounter {
        fn on_order_report(&self, _report: Option<&FieldMap>) {
            *self.reports.lock() += 1;
        }
    }

    #[test]
    fn test_noop_handler() {
        let handler = NoOpHandler;
        assert_eq!(handler.on_connected(), 0);
        assert_eq!(handler.on_disconnected(), 0);
        handler.on_logon_response(RequestId::new(1), None, true, None);
        handler.on_trade_report(None);
        handler.on_cancel_rejected(None, None);
    }

    #[test]
    fn test_partial_handler_and_arc_forwarding() {
        let counter = Arc::new(OrderCounter::default());
        let shared: Arc<dyn TradeHandler> = Arc::new(Arc::clone(&counter));
        shared.on_order_report(None);
        shared.on_order_report(Some(&FieldMap::new()));
        shared.on_trade_report(None);
        assert_eq!(*counter.reports.lock(), 2);
        assert_eq!(shared.on_connected(), 0);
    }
}
