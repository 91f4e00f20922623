/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Trading session controller.
//!
//! [`TradeSession`] owns one native instance and drives its lifecycle:
//! `init`, `login`, order entry and `stop`. Request records are built with
//! the session's [`RecordMarshaler`] and correlated through its
//! [`RequestRegistry`]. Responses arrive on native threads and reach the
//! registered [`TradeHandler`].

use crate::handler::TradeHandler;
use crate::native::{NativeApi, NativeLibrary, RecordDispatcher};
use crate::order::NewOrder;
use crate::router::CallbackRouter;
use oxtrade_core::constants::MAX_ORDERS_COUNT;
use oxtrade_core::types::today_yyyymmdd;
use oxtrade_core::{
    AccountType, ConnectionError, FieldMap, LoginError, OrderError, RequestId, Result,
};
use oxtrade_record::{RecordKind, RecordMarshaler};
use oxtrade_session::{
    AccountIdentity, RequestRegistry, SessionConfig, SessionState, SessionStatus,
};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A trading session bound to a native library.
pub struct TradeSession {
    config: SessionConfig,
    library: Arc<dyn NativeLibrary>,
    marshaler: RecordMarshaler,
    registry: RequestRegistry,
    status: Arc<SessionStatus>,
    native: RwLock<Option<Arc<dyn NativeApi>>>,
    dispatcher: RwLock<Option<Arc<RecordDispatcher>>>,
}

impl TradeSession {
    /// Creates a session. No native instance exists until [`init`](Self::init).
    ///
    /// # Arguments
    /// * `library` - Native library used to create instances
    /// * `config` - Session configuration
    #[must_use]
    pub fn new(library: Arc<dyn NativeLibrary>, config: SessionConfig) -> Self {
        let marshaler = RecordMarshaler::new(config.field_codec());
        Self {
            config,
            library,
            marshaler,
            registry: RequestRegistry::new(),
            status: Arc::new(SessionStatus::new()),
            native: RwLock::new(None),
            dispatcher: RwLock::new(None),
        }
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the record marshaler.
    #[must_use]
    pub fn marshaler(&self) -> &RecordMarshaler {
        &self.marshaler
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.status.state()
    }

    /// Returns true if a native instance is live.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.status.is_initialized()
    }

    /// Returns true if the last logon was accepted.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.status.is_logged_in()
    }

    /// Returns the account identity of the last accepted logon.
    #[must_use]
    pub fn account(&self) -> Option<AccountIdentity> {
        self.status.identity()
    }

    /// Creates and starts the native instance.
    ///
    /// Binds the registered handler, if any, before starting. Does nothing if
    /// the session is already initialized.
    ///
    /// # Errors
    /// Returns `NativeLibraryError` if the library cannot be loaded,
    /// `ConnectionError::InstanceUnavailable` if it hands back no instance, and
    /// `ConnectionError::InitFailed` if the instance fails to start.
    pub fn init(&self) -> Result<()> {
        let mut native = self.native.write();
        if native.is_some() {
            debug!(session = %self.config.name, "init called on live session");
            return Ok(());
        }

        let api: Arc<dyn NativeApi> = self
            .library
            .create()?
            .ok_or(ConnectionError::InstanceUnavailable)?
            .into();

        if let Some(dispatcher) = self.dispatcher.read().as_ref() {
            api.register_callbacks(dispatcher.clone());
        }

        let code = api.init();
        if code != 0 {
            let message = api.last_error();
            api.stop();
            warn!(session = %self.config.name, code, ?message, "native init failed");
            return Err(ConnectionError::InitFailed { code, message }.into());
        }

        *native = Some(api);
        self.status.on_initialized();
        info!(session = %self.config.name, "session initialized");
        Ok(())
    }

    /// Registers the caller's handler.
    ///
    /// Valid before or after [`init`](Self::init); a live instance is rebound
    /// immediately. Replaces any previous handler.
    pub fn register_handlers(&self, handler: impl TradeHandler + 'static) {
        let router = CallbackRouter::new(Arc::new(handler), Arc::clone(&self.status));
        let dispatcher = Arc::new(RecordDispatcher::new(self.marshaler, Arc::new(router)));

        let native = self.native.read();
        *self.dispatcher.write() = Some(Arc::clone(&dispatcher));
        if let Some(api) = native.as_ref() {
            api.register_callbacks(dispatcher);
        }
    }

    /// Logs on and blocks until the venue answers.
    ///
    /// Returns `Ok(false)` when the venue rejects the logon; the rejection
    /// details reach `on_logon_response` first.
    ///
    /// # Arguments
    /// * `account` - Fund account
    /// * `password` - Account password
    /// * `account_type` - Account class
    /// * `timeout` - Wait limit, or `None` for the configured default
    ///
    /// # Errors
    /// Returns `ConnectionError::NotInitialized` before `init`,
    /// `LoginError::HandlerNotRegistered` without a handler,
    /// `LoginError::RequestRejected` if the native send fails and
    /// `LoginError::Timeout` if no response arrives in time.
    pub fn login(
        &self,
        account: &str,
        password: &str,
        account_type: AccountType,
        timeout: impl Into<Option<Duration>>,
    ) -> Result<bool> {
        let api = self.api()?;
        if self.dispatcher.read().is_none() {
            return Err(LoginError::HandlerNotRegistered.into());
        }
        let timeout = timeout.into().unwrap_or(self.config.logon_timeout);

        let request = FieldMap::new()
            .with("AcctType", account_type.as_char())
            .with("Account", account)
            .with("Password", password);
        let record = self.marshaler.encode(RecordKind::LogonRequest, &request)?;

        let request_id = self.registry.next_id()?;
        self.status
            .begin_logon(request_id, AccountIdentity::new(account, account_type));
        info!(session = %self.config.name, %request_id, account, "sending logon request");

        let code = api.send(RecordKind::LogonRequest, request_id, &record);
        if code != 0 {
            self.status.abort_logon();
            warn!(session = %self.config.name, %request_id, code, "logon request rejected");
            return Err(LoginError::RequestRejected { code }.into());
        }

        match self.status.wait_logon(timeout) {
            Some(logged_in) => Ok(logged_in),
            None => {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(session = %self.config.name, %request_id, timeout_ms, "logon timed out");
                Err(LoginError::Timeout { timeout_ms }.into())
            }
        }
    }

    /// Places a single order for the logged-in account.
    ///
    /// Missing business and action codes default to a limit buy.
    ///
    /// # Errors
    /// Returns `ConnectionError` unless logged in, `EncodeError` if a value
    /// does not fit its field and `OrderError::SendRejected` if the native
    /// send fails.
    pub fn order(&self, order: &NewOrder) -> Result<RequestId> {
        let (api, identity) = self.require_logged_in()?;
        let record = self
            .marshaler
            .encode(RecordKind::OrderRequest, &order.request_fields(&identity))?;
        let request_id = self.registry.next_id()?;
        self.submit(api.as_ref(), RecordKind::OrderRequest, request_id, &record)?;
        debug!(
            session = %self.config.name,
            %request_id,
            symbol = %order.symbol,
            quantity = order.quantity,
            "order sent"
        );
        Ok(request_id)
    }

    /// Cancels an order.
    ///
    /// # Arguments
    /// * `board_id` - Board of the order
    /// * `order_no` - Venue order number from the order report
    /// * `order_date` - Order date as `YYYYMMDD`, or `None` for today
    ///
    /// # Errors
    /// Returns `ConnectionError` unless logged in and
    /// `OrderError::SendRejected` if the native send fails.
    pub fn cancel(
        &self,
        board_id: &str,
        order_no: i64,
        order_date: Option<u32>,
    ) -> Result<RequestId> {
        let (api, identity) = self.require_logged_in()?;
        let request = FieldMap::new()
            .with("AcctType", identity.account_type.as_char())
            .with("Account", identity.account.as_str())
            .with("BoardId", board_id)
            .with("OrderDate", order_date.unwrap_or_else(today_yyyymmdd))
            .with("OrderNo", order_no);
        let record = self.marshaler.encode(RecordKind::CancelRequest, &request)?;
        let request_id = self.registry.next_id()?;
        self.submit(api.as_ref(), RecordKind::CancelRequest, request_id, &record)?;
        debug!(session = %self.config.name, %request_id, order_no, "cancel sent");
        Ok(request_id)
    }

    /// Places up to 500 orders in one request.
    ///
    /// Items without their own codes inherit `business_code` and
    /// `action_code`.
    ///
    /// # Errors
    /// Returns `ConnectionError` unless logged in,
    /// `OrderError::EmptyBatch` or `OrderError::BatchTooLarge` for an invalid
    /// item count and `OrderError::SendRejected` if the native send fails.
    pub fn batch_order(
        &self,
        orders: &[NewOrder],
        business_code: i32,
        action_code: i32,
    ) -> Result<RequestId> {
        let (api, identity) = self.require_logged_in()?;
        if orders.is_empty() {
            return Err(OrderError::EmptyBatch.into());
        }
        if orders.len() > MAX_ORDERS_COUNT {
            return Err(OrderError::BatchTooLarge {
                count: orders.len(),
                max: MAX_ORDERS_COUNT,
            }
            .into());
        }

        let items: Vec<FieldMap> = orders
            .iter()
            .map(|o| o.item_fields(business_code, action_code))
            .collect();
        let request = FieldMap::new()
            .with("AcctType", identity.account_type.as_char())
            .with("Account", identity.account.as_str())
            .with("StkBiz", business_code)
            .with("StkBizAction", action_code)
            .with("OrderArray", items);
        let record = self
            .marshaler
            .encode(RecordKind::BatchOrderRequest, &request)?;
        let request_id = self.registry.next_id()?;
        self.submit(api.as_ref(), RecordKind::BatchOrderRequest, request_id, &record)?;
        debug!(session = %self.config.name, %request_id, count = orders.len(), "batch sent");
        Ok(request_id)
    }

    /// Queries the trade sub-accounts of the logged-in account.
    ///
    /// Results arrive through `on_trade_accounts_response`.
    ///
    /// # Errors
    /// Returns `ConnectionError` unless logged in and
    /// `OrderError::SendRejected` if the native send fails.
    pub fn query_trade_accounts(&self) -> Result<RequestId> {
        let (api, identity) = self.require_logged_in()?;
        let request = FieldMap::new()
            .with("AcctType", identity.account_type.as_char())
            .with("Account", identity.account.as_str());
        let record = self
            .marshaler
            .encode(RecordKind::TradeAccountsRequest, &request)?;
        let request_id = self.registry.next_id()?;
        self.submit(
            api.as_ref(),
            RecordKind::TradeAccountsRequest,
            request_id,
            &record,
        )?;
        Ok(request_id)
    }

    /// Stops and releases the native instance.
    ///
    /// Clears the logged-in flag and the account identity. Calling it again
    /// has no effect. The request counter keeps counting across restarts.
    pub fn stop(&self) {
        let api = self.native.write().take();
        if let Some(api) = api {
            api.stop();
            self.status.on_stopped();
            info!(session = %self.config.name, "session stopped");
        }
    }

    fn api(&self) -> Result<Arc<dyn NativeApi>> {
        self.native
            .read()
            .clone()
            .ok_or_else(|| ConnectionError::NotInitialized.into())
    }

    fn require_logged_in(&self) -> Result<(Arc<dyn NativeApi>, AccountIdentity)> {
        let api = self.api()?;
        if !self.status.is_logged_in() {
            return Err(ConnectionError::NotLoggedIn.into());
        }
        let identity = self.status.identity().ok_or(OrderError::MissingAccount)?;
        Ok((api, identity))
    }

    fn submit(
        &self,
        api: &dyn NativeApi,
        kind: RecordKind,
        request_id: RequestId,
        record: &[u8],
    ) -> Result<()> {
        let code = api.send(kind, request_id, record);
        if code != 0 {
            warn!(session = %self.config.name, %kind, %request_id, code, "send rejected");
            return Err(OrderError::SendRejected {
                request: kind.layout().name,
                code,
            }
            .into());
        }
        Ok(())
    }
}

impl std::fmt::Debug for TradeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeSession")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Drop for TradeSession {
    fn drop(&mut self) {
        self.stop();
    }
}
