/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! In-process simulated native library.
//!
//! [`SimulatedLibrary`] implements the native boundary without a vendor
//! library. Requests are decoded and journaled, and canned responses are
//! delivered on a dedicated worker thread, the way a native library calls
//! back from its own threads. [`SimulatorHandle`] inspects the journal and
//! pushes synthetic records synchronously.

use crate::native::{NativeApi, NativeCallbacks, NativeLibrary};
use bytes::Bytes;
use chrono::Local;
use crossbeam_channel::{Sender, unbounded};
use oxtrade_core::types::today_yyyymmdd;
use oxtrade_core::{
    BOARD_SH, EncodeError, ExchangeId, FieldMap, NativeLibraryError, OrderState, RequestId,
    RspError,
};
use oxtrade_record::{RecordKind, RecordMarshaler};
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// `ErrorId` of a rejected simulated logon.
pub const LOGON_REJECTED: i32 = 1001;

/// Return code of `send` on an instance that is not started.
pub const NOT_STARTED: i32 = -1;

/// Return code of `send` for a record that does not decode.
pub const MALFORMED_RECORD: i32 = -2;

/// Fields copied from an order request into its tickets.
const TICKET_ECHO_FIELDS: [&str; 10] = [
    "AcctType",
    "Account",
    "Trdacct",
    "BoardId",
    "StkBiz",
    "StkBizAction",
    "Symbol",
    "OrderRef",
    "OrderQty",
    "OrderPrice",
];

/// Result of `NativeLibrary::create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreateOutcome {
    /// A working instance.
    #[default]
    Instance,
    /// The library hands back no instance.
    Null,
    /// The library fails to load.
    LoadFailure(String),
}

/// Behavior of the simulated library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Outcome of instance creation.
    pub create: CreateOutcome,
    /// Return code of `init`.
    pub init_result: i32,
    /// Return code of `send`; non-zero rejects every request.
    pub send_result: i32,
    /// Whether requests get canned responses.
    pub auto_respond: bool,
    /// Delay before each callback.
    pub response_delay: Duration,
    /// Whether orders fill immediately after acknowledgement.
    pub fill_orders: bool,
    /// Rejection returned for every logon, if set.
    pub reject_logon: Option<RspError>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            create: CreateOutcome::Instance,
            init_result: 0,
            send_result: 0,
            auto_respond: true,
            response_delay: Duration::ZERO,
            fill_orders: false,
            reject_logon: None,
        }
    }
}

impl SimulatorConfig {
    /// Sets the creation outcome.
    #[must_use]
    pub fn with_create(mut self, create: CreateOutcome) -> Self {
        self.create = create;
        self
    }

    /// Sets the `init` return code.
    #[must_use]
    pub const fn with_init_result(mut self, code: i32) -> Self {
        self.init_result = code;
        self
    }

    /// Sets the `send` return code.
    #[must_use]
    pub const fn with_send_result(mut self, code: i32) -> Self {
        self.send_result = code;
        self
    }

    /// Enables or disables canned responses.
    #[must_use]
    pub const fn with_auto_respond(mut self, enabled: bool) -> Self {
        self.auto_respond = enabled;
        self
    }

    /// Sets the per-callback delay.
    #[must_use]
    pub const fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = delay;
        self
    }

    /// Enables or disables immediate fills.
    #[must_use]
    pub const fn with_fill_orders(mut self, enabled: bool) -> Self {
        self.fill_orders = enabled;
        self
    }

    /// Rejects every logon with the given error.
    #[must_use]
    pub fn with_reject_logon(mut self, error: RspError) -> Self {
        self.reject_logon = Some(error);
        self
    }
}

/// A request record received by the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    /// Request kind.
    pub kind: RecordKind,
    /// Correlation id.
    pub request_id: RequestId,
    /// Decoded request fields.
    pub fields: FieldMap,
}

type Job = Box<dyn FnOnce(&dyn NativeCallbacks) + Send>;

fn job<F>(f: F) -> Job
where
    F: FnOnce(&dyn NativeCallbacks) + Send + 'static,
{
    Box::new(f)
}

struct Shared {
    config: Mutex<SimulatorConfig>,
    callbacks: RwLock<Option<Arc<dyn NativeCallbacks>>>,
    marshaler: RecordMarshaler,
    journal: Mutex<Vec<SentRequest>>,
    next_order_no: AtomicI64,
}

impl Shared {
    fn new(config: SimulatorConfig) -> Self {
        Self {
            config: Mutex::new(config),
            callbacks: RwLock::new(None),
            marshaler: RecordMarshaler::default(),
            journal: Mutex::new(Vec::new()),
            next_order_no: AtomicI64::new(1),
        }
    }

    fn callbacks(&self) -> Option<Arc<dyn NativeCallbacks>> {
        self.callbacks.read().clone()
    }

    /// Runs `f` against the bound callbacks. Returns false if none are bound.
    fn with_callbacks(&self, f: impl FnOnce(&dyn NativeCallbacks)) -> bool {
        match self.callbacks() {
            Some(callbacks) => {
                f(callbacks.as_ref());
                true
            }
            None => false,
        }
    }

    fn encode(
        &self,
        kind: RecordKind,
        fields: Option<&FieldMap>,
    ) -> Result<Option<Bytes>, EncodeError> {
        fields.map(|f| self.marshaler.encode(kind, f)).transpose()
    }

    fn encode_error(&self, error: Option<&RspError>) -> Result<Option<Bytes>, EncodeError> {
        self.encode(RecordKind::RspError, error.map(RspError::to_fields).as_ref())
    }
}

impl std::fmt::Debug for Shared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shared")
            .field("config", &*self.config.lock())
            .field("sent", &self.journal.lock().len())
            .finish_non_exhaustive()
    }
}

/// Simulated native library.
#[derive(Debug, Clone)]
pub struct SimulatedLibrary {
    shared: Arc<Shared>,
}

impl SimulatedLibrary {
    /// Creates a simulated library.
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            shared: Arc::new(Shared::new(config)),
        }
    }

    /// Returns a handle for inspecting and driving the simulator.
    #[must_use]
    pub fn handle(&self) -> SimulatorHandle {
        SimulatorHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Default for SimulatedLibrary {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

impl NativeLibrary for SimulatedLibrary {
    fn create(&self) -> Result<Option<Box<dyn NativeApi>>, NativeLibraryError> {
        let create = self.shared.config.lock().create.clone();
        match create {
            CreateOutcome::Instance => Ok(Some(Box::new(SimulatedApi::new(Arc::clone(
                &self.shared,
            ))))),
            CreateOutcome::Null => Ok(None),
            CreateOutcome::LoadFailure(reason) => Err(NativeLibraryError::Load(reason)),
        }
    }
}

struct Worker {
    sender: Sender<Job>,
    thread: JoinHandle<()>,
}

/// One simulated native instance.
pub struct SimulatedApi {
    shared: Arc<Shared>,
    worker: Mutex<Option<Worker>>,
    last_error: Mutex<Option<String>>,
}

impl SimulatedApi {
    fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            worker: Mutex::new(None),
            last_error: Mutex::new(None),
        }
    }

    fn enqueue(&self, job: Job) -> bool {
        self.worker
            .lock()
            .as_ref()
            .is_some_and(|w| w.sender.send(job).is_ok())
    }

    fn is_started(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Builds the canned responses to a request.
    fn respond(
        &self,
        config: &SimulatorConfig,
        kind: RecordKind,
        request_id: RequestId,
        request: &FieldMap,
        record: &[u8],
    ) -> Result<Vec<Job>, EncodeError> {
        let marshaler = &self.shared.marshaler;
        let account = request.get_str("Account").unwrap_or_default();
        let mut jobs = Vec::new();

        match kind {
            RecordKind::LogonRequest => {
                let password = request.get_str("Password").unwrap_or_default();
                let rejection = config.reject_logon.clone().or_else(|| {
                    password
                        .is_empty()
                        .then(|| RspError::new(LOGON_REJECTED, "invalid account or password"))
                });
                match rejection {
                    Some(error) => {
                        let error = marshaler.encode(RecordKind::RspError, &error.to_fields())?;
                        jobs.push(job(move |cb| {
                            cb.on_rsp_logon(request_id, Some(&error[..]), true, None);
                        }));
                    }
                    None => {
                        let response = FieldMap::new()
                            .with("IntOrg", 1i32)
                            .with("CustCode", account)
                            .with("AcctType", request.get_char("AcctType").unwrap_or('0'))
                            .with("Account", account);
                        let response = marshaler.encode(RecordKind::LogonResponse, &response)?;
                        jobs.push(job(move |cb| {
                            cb.on_rsp_logon(request_id, None, true, Some(&response[..]));
                        }));
                    }
                }
            }
            RecordKind::TradeAccountsRequest => {
                let exchanges = [ExchangeId::Sh, ExchangeId::Sz];
                for (i, exchange) in exchanges.into_iter().enumerate() {
                    let response = FieldMap::new()
                        .with("CustCode", account)
                        .with("Account", account)
                        .with("ExchangeId", exchange.as_char())
                        .with("BoardId", exchange.main_board())
                        .with("TrdAcctStatus", '0')
                        .with("TrdAcct", format!("{}{account}", exchange.main_board()))
                        .with("TrdAcctType", '0');
                    let response =
                        marshaler.encode(RecordKind::TradeAccountsResponse, &response)?;
                    let is_last = i + 1 == exchanges.len();
                    jobs.push(job(move |cb| {
                        cb.on_rsp_trade_accounts(request_id, None, is_last, Some(&response[..]));
                    }));
                }
            }
            RecordKind::OrderRequest => {
                let order_no = self.shared.next_order_no.fetch_add(1, Ordering::SeqCst);
                let ticket = ticket(request, order_no);
                let ack = ticket
                    .clone()
                    .with("OrderState", OrderState::Reported.as_char());
                let ack = marshaler.encode(RecordKind::OrderTicket, &ack)?;
                jobs.push(job(move |cb| cb.on_rtn_order(Some(&ack[..]))));

                if config.fill_orders {
                    let quantity = request.get_u64("OrderQty").unwrap_or(0);
                    let price = request.get_decimal("OrderPrice").unwrap_or_default();
                    let amount = price * Decimal::from(quantity);
                    let fill = fill(request, order_no, quantity, price, amount);
                    let fill = marshaler.encode(RecordKind::OrderFilled, &fill)?;
                    jobs.push(job(move |cb| cb.on_rtn_filled(Some(&fill[..]))));

                    let done = ticket
                        .with("OrderState", OrderState::Filled.as_char())
                        .with("FilledQty", quantity)
                        .with("FilledAmt", amount);
                    let done = marshaler.encode(RecordKind::OrderTicket, &done)?;
                    jobs.push(job(move |cb| cb.on_rtn_order(Some(&done[..]))));
                }
            }
            RecordKind::CancelRequest => {
                let response = FieldMap::new()
                    .with("Account", account)
                    .with("BoardId", request.get_str("BoardId").unwrap_or_default())
                    .with("OrderDate", request.get_u64("OrderDate").unwrap_or(0))
                    .with("OrderNo", request.get_i64("OrderNo").unwrap_or(0))
                    .with("OrderState", OrderState::NotReported.as_char());
                let response = marshaler.encode(RecordKind::CancelResponse, &response)?;
                jobs.push(job(move |cb| {
                    cb.on_rsp_cancel(request_id, None, Some(&response[..]));
                }));
            }
            RecordKind::BatchOrderRequest => {
                let echo = Bytes::copy_from_slice(record);
                jobs.push(job(move |cb| {
                    cb.on_rsp_batch_order(request_id, None, Some(&echo[..]));
                }));
            }
            _ => {}
        }
        Ok(jobs)
    }
}

fn ticket(request: &FieldMap, order_no: i64) -> FieldMap {
    let mut ticket: FieldMap = TICKET_ECHO_FIELDS
        .iter()
        .filter_map(|&name| request.get(name).map(|v| (name.to_string(), v.clone())))
        .collect();
    ticket.insert("InsertDate", today_yyyymmdd());
    ticket.insert("InsertTime", Local::now().format("%H:%M:%S%.3f").to_string());
    ticket.insert("OrderNo", order_no);
    ticket.insert("ErrorId", 0i32);
    ticket.insert("FilledQty", 0i64);
    ticket.insert("CanceledQty", 0i64);
    ticket.insert("FilledAmt", Decimal::ZERO);
    ticket
}

fn fill(
    request: &FieldMap,
    order_no: i64,
    quantity: u64,
    price: Decimal,
    amount: Decimal,
) -> FieldMap {
    let board = request.get_str("BoardId").unwrap_or_default();
    let exchange = if board == BOARD_SH {
        ExchangeId::Sh
    } else {
        ExchangeId::Sz
    };
    FieldMap::new()
        .with("Account", request.get_str("Account").unwrap_or_default())
        .with("Trdacct", request.get_str("Trdacct").unwrap_or_default())
        .with("Symbol", request.get_str("Symbol").unwrap_or_default())
        .with("ExchangeId", exchange.as_char())
        .with("BoardId", board)
        .with("StkBiz", request.get_i64("StkBiz").unwrap_or(0))
        .with("StkBizAction", request.get_i64("StkBizAction").unwrap_or(0))
        .with("TradeSn", format!("T{order_no:08}"))
        .with("OrderNo", order_no)
        .with("OrderRef", request.get_str("OrderRef").unwrap_or_default())
        .with("FilledQty", quantity)
        .with("FilledPrice", price)
        .with("FilledAmt", amount)
        .with("FilledDate", today_yyyymmdd())
        .with("FilledTime", Local::now().format("%H:%M:%S").to_string())
        .with("ErrorId", 0i32)
        .with("RetMessage", "")
}

impl std::fmt::Debug for SimulatedApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedApi")
            .field("started", &self.is_started())
            .finish_non_exhaustive()
    }
}

impl NativeApi for SimulatedApi {
    fn register_callbacks(&self, callbacks: Arc<dyn NativeCallbacks>) {
        *self.shared.callbacks.write() = Some(callbacks);
    }

    fn init(&self) -> i32 {
        let code = self.shared.config.lock().init_result;
        if code != 0 {
            *self.last_error.lock() = Some(format!("simulated init failure ({code})"));
            return code;
        }

        let mut worker = self.worker.lock();
        if worker.is_some() {
            return 0;
        }

        let (sender, receiver) = unbounded::<Job>();
        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("oxtrade-sim".to_string())
            .spawn(move || {
                for job in receiver {
                    let delay = shared.config.lock().response_delay;
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    shared.with_callbacks(job);
                }
            });

        match spawned {
            Ok(handle) => {
                let _ = sender.send(job(|cb| {
                    cb.on_connected();
                }));
                *worker = Some(Worker {
                    sender,
                    thread: handle,
                });
                info!("simulator started");
                0
            }
            Err(e) => {
                *self.last_error.lock() = Some(e.to_string());
                NOT_STARTED
            }
        }
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    fn stop(&self) {
        let Some(Worker { sender, thread: handle }) = self.worker.lock().take() else {
            return;
        };
        let _ = sender.send(job(|cb| {
            cb.on_disconnected();
        }));
        drop(sender);

        // A callback may stop the session from the worker itself.
        if handle.thread().id() != thread::current().id() && handle.join().is_err() {
            warn!("simulator worker panicked");
        }
        self.shared.callbacks.write().take();
        info!("simulator stopped");
    }

    fn send(&self, kind: RecordKind, request_id: RequestId, record: &[u8]) -> i32 {
        if !self.is_started() {
            return NOT_STARTED;
        }
        let fields = match self.shared.marshaler.decode(kind, record) {
            Ok(fields) => fields,
            Err(e) => {
                warn!(%kind, error = %e, "simulator received malformed record");
                return MALFORMED_RECORD;
            }
        };
        self.shared.journal.lock().push(SentRequest {
            kind,
            request_id,
            fields: fields.clone(),
        });

        let config = self.shared.config.lock().clone();
        if config.send_result != 0 {
            return config.send_result;
        }
        debug!(%kind, %request_id, "simulator accepted request");
        if !config.auto_respond {
            return 0;
        }

        match self.respond(&config, kind, request_id, &fields, record) {
            Ok(jobs) => {
                for job in jobs {
                    self.enqueue(job);
                }
                0
            }
            Err(e) => {
                warn!(%kind, error = %e, "simulator failed to build response");
                MALFORMED_RECORD
            }
        }
    }
}

impl Drop for SimulatedApi {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Inspection and control handle of a [`SimulatedLibrary`].
#[derive(Debug, Clone)]
pub struct SimulatorHandle {
    shared: Arc<Shared>,
}

impl SimulatorHandle {
    /// Returns every request received so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentRequest> {
        self.shared.journal.lock().clone()
    }

    /// Returns the most recent request of a kind.
    #[must_use]
    pub fn last_sent(&self, kind: RecordKind) -> Option<SentRequest> {
        self.shared
            .journal
            .lock()
            .iter()
            .rev()
            .find(|r| r.kind == kind)
            .cloned()
    }

    /// Returns a copy of the current configuration.
    #[must_use]
    pub fn config(&self) -> SimulatorConfig {
        self.shared.config.lock().clone()
    }

    /// Enables or disables canned responses.
    pub fn set_auto_respond(&self, enabled: bool) {
        self.shared.config.lock().auto_respond = enabled;
    }

    /// Sets the `send` return code.
    pub fn set_send_result(&self, code: i32) {
        self.shared.config.lock().send_result = code;
    }

    /// Sets the per-callback delay.
    pub fn set_response_delay(&self, delay: Duration) {
        self.shared.config.lock().response_delay = delay;
    }

    /// Sets or clears the forced logon rejection.
    pub fn set_reject_logon(&self, error: Option<RspError>) {
        self.shared.config.lock().reject_logon = error;
    }

    /// Delivers a logon response on the calling thread.
    ///
    /// Returns false if no callbacks are bound.
    ///
    /// # Errors
    /// Returns `EncodeError` if a record cannot be encoded.
    pub fn deliver_logon_response(
        &self,
        request_id: RequestId,
        error: Option<&RspError>,
        response: Option<&FieldMap>,
    ) -> Result<bool, EncodeError> {
        let error = self.shared.encode_error(error)?;
        let response = self.shared.encode(RecordKind::LogonResponse, response)?;
        Ok(self.shared.with_callbacks(|cb| {
            cb.on_rsp_logon(request_id, error.as_deref(), true, response.as_deref());
        }))
    }

    /// Delivers an order report on the calling thread.
    ///
    /// # Errors
    /// Returns `EncodeError` if the record cannot be encoded.
    pub fn deliver_order_report(&self, report: &FieldMap) -> Result<bool, EncodeError> {
        let report = self.shared.marshaler.encode(RecordKind::OrderTicket, report)?;
        Ok(self
            .shared
            .with_callbacks(|cb| cb.on_rtn_order(Some(&report[..]))))
    }

    /// Delivers a trade report on the calling thread.
    ///
    /// # Errors
    /// Returns `EncodeError` if the record cannot be encoded.
    pub fn deliver_trade_report(&self, report: &FieldMap) -> Result<bool, EncodeError> {
        let report = self.shared.marshaler.encode(RecordKind::OrderFilled, report)?;
        Ok(self
            .shared
            .with_callbacks(|cb| cb.on_rtn_filled(Some(&report[..]))))
    }

    /// Delivers a cancel response on the calling thread.
    ///
    /// # Errors
    /// Returns `EncodeError` if a record cannot be encoded.
    pub fn deliver_cancel_response(
        &self,
        request_id: RequestId,
        error: Option<&RspError>,
        response: Option<&FieldMap>,
    ) -> Result<bool, EncodeError> {
        let error = self.shared.encode_error(error)?;
        let response = self.shared.encode(RecordKind::CancelResponse, response)?;
        Ok(self.shared.with_callbacks(|cb| {
            cb.on_rsp_cancel(request_id, error.as_deref(), response.as_deref());
        }))
    }

    /// Delivers a cancel rejection on the calling thread.
    ///
    /// # Errors
    /// Returns `EncodeError` if a record cannot be encoded.
    pub fn deliver_cancel_rejected(
        &self,
        error: &RspError,
        ticket: &FieldMap,
    ) -> Result<bool, EncodeError> {
        let error = self.shared.encode_error(Some(error))?;
        let ticket = self.shared.marshaler.encode(RecordKind::OrderTicket, ticket)?;
        Ok(self.shared.with_callbacks(|cb| {
            cb.on_rtn_cancel_rejected(error.as_deref(), Some(&ticket[..]));
        }))
    }
}
