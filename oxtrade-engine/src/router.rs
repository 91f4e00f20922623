/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Callback router.
//!
//! Wraps the caller's [`TradeHandler`] and records logon outcomes in the
//! shared [`SessionStatus`] before the blocked login call is released.

use crate::handler::TradeHandler;
use oxtrade_core::{AccountType, FieldMap, RequestId, RspError};
use oxtrade_session::{AccountIdentity, SessionStatus};
use std::sync::Arc;
use tracing::{info, warn};

/// Handler decorator that tracks logon state.
pub struct CallbackRouter {
    inner: Arc<dyn TradeHandler>,
    status: Arc<SessionStatus>,
}

impl CallbackRouter {
    /// Creates a router around the caller's handler.
    #[must_use]
    pub fn new(inner: Arc<dyn TradeHandler>, status: Arc<SessionStatus>) -> Self {
        Self { inner, status }
    }

    /// Returns the wrapped handler.
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn TradeHandler> {
        &self.inner
    }
}

impl std::fmt::Debug for CallbackRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRouter")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Reads the identity reported in a logon response.
///
/// Returns `None` unless both the account and a known account class are present.
fn reported_identity(response: Option<&FieldMap>) -> Option<AccountIdentity> {
    let fields = response?;
    let account = fields.get_str("Account").filter(|a| !a.is_empty())?;
    let account_type = fields
        .get_char("AcctType")
        .and_then(|c| u8::try_from(c).ok())
        .and_then(AccountType::from_code)?;
    let cust_code = fields.get_str("CustCode").unwrap_or_default();
    Some(AccountIdentity::new(account, account_type).with_cust_code(cust_code))
}

impl TradeHandler for CallbackRouter {
    fn on_connected(&self) -> i32 {
        self.inner.on_connected()
    }

    fn on_disconnected(&self) -> i32 {
        self.inner.on_disconnected()
    }

    fn on_logon_response(
        &self,
        request_id: RequestId,
        error: Option<&RspError>,
        is_last: bool,
        response: Option<&FieldMap>,
    ) {
        self.inner
            .on_logon_response(request_id, error, is_last, response);

        if error.is_none_or(RspError::is_success) {
            info!(%request_id, "logon accepted");
            self.status
                .on_logon_ack(request_id, reported_identity(response));
        } else {
            warn!(
                %request_id,
                error_id = error.map_or(0, |e| e.error_id),
                error_info = error.map_or("", |e| e.error_info.as_str()),
                "logon rejected"
            );
            self.status.on_logon_reject(request_id);
        }
    }

    fn on_trade_accounts_response(
        &self,
        request_id: RequestId,
        error: Option<&RspError>,
        is_last: bool,
        response: Option<&FieldMap>,
    ) {
        self.inner
            .on_trade_accounts_response(request_id, error, is_last, response);
    }

    fn on_order_report(&self, report: Option<&FieldMap>) {
        self.inner.on_order_report(report);
    }

    fn on_trade_report(&self, report: Option<&FieldMap>) {
        self.inner.on_trade_report(report);
    }

    fn on_cancel_response(
        &self,
        request_id: RequestId,
        error: Option<&RspError>,
        response: Option<&FieldMap>,
    ) {
        self.inner.on_cancel_response(request_id, error, response);
    }

    fn on_batch_order_response(
        &self,
        request_id: RequestId,
        error: Option<&RspError>,
        response: Option<&FieldMap>,
    ) {
        self.inner
            .on_batch_order_response(request_id, error, response);
    }

    fn on_cancel_rejected(&self, error: Option<&RspError>, ticket: Option<&FieldMap>) {
        self.inner.on_cancel_rejected(error, ticket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxtrade_session::SessionState;
    use parking_lot::Mutex;
    use std::time::Duration;

    /// Records whether the status was already updated when the handler ran.
    struct SpyHandler {
        status: Arc<SessionStatus>,
        saw_logged_in: Mutex<Option<bool>>,
        cancels: Mutex<usize>,
    }

    impl TradeHandler for SpyHandler {
        fn on_logon_response(
            &self,
            _request_id: RequestId,
            _error: Option<&RspError>,
            _is_last: bool,
            _response: Option<&FieldMap>,
        ) {
            *self.saw_logged_in.lock() = Some(self.status.is_logged_in());
        }

        fn on_cancel_rejected(&self, _error: Option<&RspError>, _ticket: Option<&FieldMap>) {
            *self.cancels.lock() += 1;
        }
    }

    fn setup() -> (Arc<SessionStatus>, Arc<SpyHandler>, CallbackRouter) {
        let status = Arc::new(SessionStatus::new());
        status.on_initialized();
        status.begin_logon(
            RequestId::new(1),
            AccountIdentity::new("110000001", AccountType::Stock),
        );
        let spy = Arc::new(SpyHandler {
            status: Arc::clone(&status),
            saw_logged_in: Mutex::new(None),
            cancels: Mutex::new(0),
        });
        let router = CallbackRouter::new(spy.clone(), Arc::clone(&status));
        (status, spy, router)
    }

    #[test]
    fn test_user_handler_runs_before_status_update() {
        let (status, spy, router) = setup();
        router.on_logon_response(RequestId::new(1), None, true, None);
        assert_eq!(*spy.saw_logged_in.lock(), Some(false));
        assert!(status.is_logged_in());
        assert_eq!(status.wait_logon(Duration::ZERO), Some(true));
    }

    #[test]
    fn test_zero_error_id_is_success() {
        let (status, _, router) = setup();
        let error = RspError::new(0, "");
        router.on_logon_response(RequestId::new(1), Some(&error), true, None);
        assert!(status.is_logged_in());
        assert_eq!(status.identity().unwrap().account, "110000001");
    }

    #[test]
    fn test_reported_identity_wins() {
        let (status, _, router) = setup();
        let response = FieldMap::new()
            .with("CustCode", "C0001")
            .with("AcctType", '3')
            .with("Account", "220000002");
        router.on_logon_response(RequestId::new(1), None, true, Some(&response));
        let identity = status.identity().unwrap();
        assert_eq!(identity.account, "220000002");
        assert_eq!(identity.account_type, AccountType::Credit);
        assert_eq!(identity.cust_code, "C0001");
    }

    #[test]
    fn test_empty_reported_account_falls_back() {
        let response = FieldMap::new().with("Account", "").with("AcctType", '0');
        assert!(reported_identity(Some(&response)).is_none());
        let response = FieldMap::new().with("Account", "1").with("AcctType", 'x');
        assert!(reported_identity(Some(&response)).is_none());
        assert!(reported_identity(None).is_none());
    }

    #[test]
    fn test_rejection() {
        let (status, _, router) = setup();
        let error = RspError::new(1001, "invalid password");
        router.on_logon_response(RequestId::new(1), Some(&error), true, None);
        assert_eq!(status.wait_logon(Duration::ZERO), Some(false));
        assert!(!status.is_logged_in());
        assert_eq!(status.state(), SessionState::Initialized);
    }

    #[test]
    fn test_response_to_other_request_keeps_waiter_blocked() {
        let (status, spy, router) = setup();
        let error = RspError::new(1001, "invalid password");
        router.on_logon_response(RequestId::new(7), Some(&error), true, None);
        assert_eq!(*spy.saw_logged_in.lock(), Some(false));
        assert_eq!(status.wait_logon(Duration::from_millis(10)), None);
    }

    #[test]
    fn test_pass_through() {
        let (status, spy, router) = setup();
        router.on_cancel_rejected(None, None);
        router.on_order_report(None);
        assert_eq!(*spy.cancels.lock(), 1);
        assert_eq!(status.state(), SessionState::LoggingIn);
        assert_eq!(router.on_connected(), 0);
    }
}
