/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Native library boundary.
//!
//! The trading library is reached through three traits:
//! - [`NativeLibrary`] creates instances.
//! - [`NativeApi`] is one live instance that accepts packed request records.
//! - [`NativeCallbacks`] receives packed response records from the instance.
//!
//! [`RecordDispatcher`] turns the raw callbacks into decoded [`TradeHandler`]
//! calls.

use crate::handler::TradeHandler;
use oxtrade_core::{FieldMap, NativeLibraryError, RequestId, RspError};
use oxtrade_record::{RecordKind, RecordMarshaler};
use std::sync::Arc;
use tracing::warn;

/// Raw callbacks invoked by a native instance.
///
/// Record arguments are `None` when the native side passes a null pointer.
pub trait NativeCallbacks: Send + Sync {
    /// Connection established.
    fn on_connected(&self) -> i32;

    /// Connection lost.
    fn on_disconnected(&self) -> i32;

    /// Logon response.
    fn on_rsp_logon(
        &self,
        request_id: RequestId,
        error: Option<&[u8]>,
        is_last: bool,
        field: Option<&[u8]>,
    );

    /// Trade sub-account response.
    fn on_rsp_trade_accounts(
        &self,
        request_id: RequestId,
        error: Option<&[u8]>,
        is_last: bool,
        field: Option<&[u8]>,
    );

    /// Cancel response.
    fn on_rsp_cancel(&self, request_id: RequestId, error: Option<&[u8]>, field: Option<&[u8]>);

    /// Batch order response.
    fn on_rsp_batch_order(
        &self,
        request_id: RequestId,
        error: Option<&[u8]>,
        field: Option<&[u8]>,
    );

    /// Order status report.
    fn on_rtn_order(&self, field: Option<&[u8]>);

    /// Trade report.
    fn on_rtn_filled(&self, field: Option<&[u8]>);

    /// Cancel rejected by the venue.
    fn on_rtn_cancel_rejected(&self, error: Option<&[u8]>, ticket: Option<&[u8]>);
}

/// A live native trading instance.
pub trait NativeApi: Send + Sync {
    /// Binds the callback sink. Replaces any previous sink.
    fn register_callbacks(&self, callbacks: Arc<dyn NativeCallbacks>);

    /// Starts the instance. Returns `0` on success.
    fn init(&self) -> i32;

    /// Returns the native error text after a failed call.
    fn last_error(&self) -> Option<String> {
        None
    }

    /// Stops the instance.
    fn stop(&self);

    /// Sends a packed request record. Returns `0` when the record was accepted.
    ///
    /// # Arguments
    /// * `kind` - Request kind of `record`
    /// * `request_id` - Correlation id echoed in the response
    /// * `record` - Packed record of exactly `kind.size()` bytes
    fn send(&self, kind: RecordKind, request_id: RequestId, record: &[u8]) -> i32;
}

/// Factory for native instances.
pub trait NativeLibrary: Send + Sync {
    /// Creates a new instance.
    ///
    /// Returns `Ok(None)` when the library loaded but handed back no instance.
    ///
    /// # Errors
    /// Returns `NativeLibraryError` if the library or one of its entry points
    /// cannot be loaded.
    fn create(&self) -> Result<Option<Box<dyn NativeApi>>, NativeLibraryError>;
}

/// Decodes raw native records and forwards them to a [`TradeHandler`].
pub struct RecordDispatcher {
    marshaler: RecordMarshaler,
    handler: Arc<dyn TradeHandler>,
}

impl RecordDispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(marshaler: RecordMarshaler, handler: Arc<dyn TradeHandler>) -> Self {
        Self { marshaler, handler }
    }

    fn record(&self, kind: RecordKind, bytes: Option<&[u8]>) -> Option<FieldMap> {
        let bytes = bytes?;
        match self.marshaler.decode(kind, bytes) {
            Ok(fields) => Some(fields),
            Err(e) => {
                warn!(%kind, error = %e, "dropping undecodable native record");
                None
            }
        }
    }

    fn error(&self, bytes: Option<&[u8]>) -> Option<RspError> {
        self.record(RecordKind::RspError, bytes)
            .map(|fields| RspError::from_fields(&fields))
    }
}

impl std::fmt::Debug for RecordDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordDispatcher")
            .field("marshaler", &self.marshaler)
            .finish_non_exhaustive()
    }
}

impl NativeCallbacks for RecordDispatcher {
    fn on_connected(&self) -> i32 {
        self.handler.on_connected()
    }

    fn on_disconnected(&self) -> i32 {
        self.handler.on_disconnected()
    }

    fn on_rsp_logon(
        &self,
        request_id: RequestId,
        error: Option<&[u8]>,
        is_last: bool,
        field: Option<&[u8]>,
    ) {
        let error = self.error(error);
        let response = self.record(RecordKind::LogonResponse, field);
        self.handler
            .on_logon_response(request_id, error.as_ref(), is_last, response.as_ref());
    }

    fn on_rsp_trade_accounts(
        &self,
        request_id: RequestId,
        error: Option<&[u8]>,
        is_last: bool,
        field: Option<&[u8]>,
    ) {
        let error = self.error(error);
        let response = self.record(RecordKind::TradeAccountsResponse, field);
        self.handler.on_trade_accounts_response(
            request_id,
            error.as_ref(),
            is_last,
            response.as_ref(),
        );
    }

    fn on_rsp_cancel(&self, request_id: RequestId, error: Option<&[u8]>, field: Option<&[u8]>) {
        let error = self.error(error);
        let response = self.record(RecordKind::CancelResponse, field);
        self.handler
            .on_cancel_response(request_id, error.as_ref(), response.as_ref());
    }

    fn on_rsp_batch_order(
        &self,
        request_id: RequestId,
        error: Option<&[u8]>,
        field: Option<&[u8]>,
    ) {
        let error = self.error(error);
        let response = self.record(RecordKind::BatchOrderResponse, field);
        self.handler
            .on_batch_order_response(request_id, error.as_ref(), response.as_ref());
    }

    fn on_rtn_order(&self, field: Option<&[u8]>) {
        let report = self.record(RecordKind::OrderTicket, field);
        self.handler.on_order_report(report.as_ref());
    }

    fn on_rtn_filled(&self, field: Option<&[u8]>) {
        let report = self.record(RecordKind::OrderFilled, field);
        self.handler.on_trade_report(report.as_ref());
    }

    fn on_rtn_cancel_rejected(&self, error: Option<&[u8]>, ticket: Option<&[u8]>) {
        let error = self.error(error);
        let ticket = self.record(RecordKind::OrderTicket, ticket);
        self.handler
            .on_cancel_rejected(error.as_ref(), ticket.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Capture {
        reports: Mutex<Vec<Option<FieldMap>>>,
        errors: Mutex<Vec<Option<RspError>>>,
    }

    impl TradeHandler for Capture {
        fn on_order_report(&self, report: Option<&FieldMap>) {
            self.reports.lock().push(report.cloned());
        }

        fn on_cancel_response(
            &self,
            _request_id: RequestId,
            error: Option<&RspError>,
            _response: Option<&FieldMap>,
        ) {
            self.errors.lock().push(error.cloned());
        }
    }

    fn dispatcher() -> (Arc<Capture>, RecordDispatcher) {
        let capture = Arc::new(Capture::default());
        let dispatcher = RecordDispatcher::new(RecordMarshaler::default(), capture.clone());
        (capture, dispatcher)
    }

    #[test]
    fn test_decodes_order_report() {
        let (capture, dispatcher) = dispatcher();
        let marshaler = RecordMarshaler::default();
        let ticket = FieldMap::new()
            .with("OrderNo", 123i64)
            .with("OrderState", '0')
            .with("Symbol", "600000");
        let bytes = marshaler.encode(RecordKind::OrderTicket, &ticket).unwrap();
        dispatcher.on_rtn_order(Some(&bytes[..]));

        let reports = capture.reports.lock();
        let report = reports[0].as_ref().unwrap();
        assert_eq!(report.get_i64("OrderNo"), Some(123));
        assert_eq!(report.get_char("OrderState"), Some('0'));
        assert_eq!(report.get_str("Symbol"), Some("600000"));
    }

    #[test]
    fn test_null_and_short_records_become_none() {
        let (capture, dispatcher) = dispatcher();
        dispatcher.on_rtn_order(None);
        dispatcher.on_rtn_order(Some(&[1u8, 2, 3][..]));
        assert_eq!(*capture.reports.lock(), vec![None, None]);
    }

    #[test]
    fn test_decodes_error_record() {
        let (capture, dispatcher) = dispatcher();
        let marshaler = RecordMarshaler::default();
        let error = RspError::new(2001, "order not found");
        let bytes = marshaler
            .encode(RecordKind::RspError, &error.to_fields())
            .unwrap();
        dispatcher.on_rsp_cancel(RequestId::new(4), Some(&bytes[..]), None);
        dispatcher.on_rsp_cancel(RequestId::new(5), None, None);
        assert_eq!(*capture.errors.lock(), vec![Some(error), None]);
    }
}
