/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Session state shared between callers and callback threads.
//!
//! [`SessionStatus`] holds the lifecycle state, the logged-in flag and the
//! account identity behind one mutex. A condition variable on the same mutex
//! releases a caller blocked in login once the logon outcome is recorded, so
//! the waiter always observes the updated state.

use oxtrade_core::{AccountType, RequestId};
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// Lifecycle state of a trading session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// No native instance.
    #[default]
    Uninitialized,
    /// Native instance created and started.
    Initialized,
    /// Logon request sent, awaiting the response.
    LoggingIn,
    /// Logon accepted.
    LoggedIn,
    /// Session stopped; may be initialized again.
    Stopped,
}

impl SessionState {
    /// Returns true if a native instance is live.
    #[must_use]
    pub const fn is_initialized(self) -> bool {
        matches!(self, Self::Initialized | Self::LoggingIn | Self::LoggedIn)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::LoggingIn => "logging-in",
            Self::LoggedIn => "logged-in",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Account identity established by a successful logon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    /// Fund account.
    pub account: String,
    /// Account class.
    pub account_type: AccountType,
    /// Customer code reported by the venue, empty until known.
    pub cust_code: String,
}

impl AccountIdentity {
    /// Creates an identity without a customer code.
    #[must_use]
    pub fn new(account: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            account: account.into(),
            account_type,
            cust_code: String::new(),
        }
    }

    /// Sets the customer code.
    #[must_use]
    pub fn with_cust_code(mut self, cust_code: impl Into<String>) -> Self {
        self.cust_code = cust_code.into();
        self
    }
}

#[derive(Debug, Default)]
struct StatusInner {
    state: SessionState,
    logged_in: bool,
    identity: Option<AccountIdentity>,
    /// Credentials of the login attempt in flight.
    pending: Option<AccountIdentity>,
    /// Request id of the login attempt in flight.
    pending_request: Option<RequestId>,
    /// Set once the current attempt has its own outcome.
    logon_signaled: bool,
}

/// Thread-safe session status.
#[derive(Debug, Default)]
pub struct SessionStatus {
    inner: Mutex<StatusInner>,
    logon_done: Condvar,
}

impl SessionStatus {
    /// Creates an uninitialized status.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// Returns true if a native instance is live.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner.lock().state.is_initialized()
    }

    /// Returns true if the last logon was accepted.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner.lock().logged_in
    }

    /// Returns the account identity of the last accepted logon.
    #[must_use]
    pub fn identity(&self) -> Option<AccountIdentity> {
        self.inner.lock().identity.clone()
    }

    /// Records that the native instance is up.
    pub fn on_initialized(&self) {
        let mut inner = self.inner.lock();
        inner.state = SessionState::Initialized;
        debug!(state = %inner.state, "session status changed");
    }

    /// Starts a login attempt.
    ///
    /// Clears the logged-in flag and arms the waiter for the outcome of
    /// `request_id`. Responses to earlier attempts no longer release it.
    pub fn begin_logon(&self, request_id: RequestId, pending: AccountIdentity) {
        let mut inner = self.inner.lock();
        inner.state = SessionState::LoggingIn;
        inner.logged_in = false;
        inner.pending = Some(pending);
        inner.pending_request = Some(request_id);
        inner.logon_signaled = false;
    }

    /// Abandons a login attempt whose request never left.
    pub fn abort_logon(&self) {
        let mut inner = self.inner.lock();
        if inner.state == SessionState::LoggingIn {
            inner.state = SessionState::Initialized;
        }
        inner.pending = None;
        inner.pending_request = None;
    }

    /// Returns true and completes the attempt if `request_id` is the one in
    /// flight.
    fn complete(inner: &mut StatusInner, request_id: RequestId) -> bool {
        if inner.pending_request != Some(request_id) {
            return false;
        }
        inner.pending = None;
        inner.pending_request = None;
        inner.logon_signaled = true;
        true
    }

    /// Records an accepted logon and releases the waiter.
    ///
    /// `identity` overrides the attempt's requested credentials when the venue
    /// reports one. A response to an earlier attempt still updates the state
    /// but leaves the current waiter blocked. Ignored once the session is
    /// stopped.
    pub fn on_logon_ack(&self, request_id: RequestId, identity: Option<AccountIdentity>) {
        let mut inner = self.inner.lock();
        if !inner.state.is_initialized() {
            debug!(state = %inner.state, "ignoring logon response on inactive session");
            return;
        }
        let current = inner.pending_request == Some(request_id);
        let identity = match identity {
            Some(identity) => Some(identity),
            None if current => inner.pending.clone(),
            None => None,
        };
        inner.state = SessionState::LoggedIn;
        inner.logged_in = true;
        if identity.is_some() {
            inner.identity = identity;
        }
        if Self::complete(&mut inner, request_id) {
            self.logon_done.notify_all();
        } else {
            debug!(%request_id, "stale logon acceptance");
        }
    }

    /// Records a rejected logon and releases the waiter.
    ///
    /// A rejection of an earlier attempt clears the logged-in flag but leaves
    /// the current waiter blocked.
    pub fn on_logon_reject(&self, request_id: RequestId) {
        let mut inner = self.inner.lock();
        if !inner.state.is_initialized() {
            debug!(state = %inner.state, "ignoring logon response on inactive session");
            return;
        }
        inner.logged_in = false;
        if Self::complete(&mut inner, request_id) {
            inner.state = SessionState::Initialized;
            self.logon_done.notify_all();
        } else {
            if inner.state == SessionState::LoggedIn {
                inner.state = SessionState::Initialized;
            }
            debug!(%request_id, "stale logon rejection");
        }
    }

    /// Blocks until the current login attempt has an outcome.
    ///
    /// Returns `Some(logged_in)` once signaled, or `None` on timeout. A timed
    /// out attempt returns the state to `Initialized`; a response arriving
    /// later still updates it.
    #[must_use]
    pub fn wait_logon(&self, timeout: Duration) -> Option<bool> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock();
        while !inner.logon_signaled {
            if self.logon_done.wait_until(&mut inner, deadline).timed_out() {
                if inner.logon_signaled {
                    break;
                }
                if inner.state == SessionState::LoggingIn {
                    inner.state = SessionState::Initialized;
                }
                return None;
            }
        }
        Some(inner.logged_in)
    }

    /// Records that the session stopped and forgets the identity.
    pub fn on_stopped(&self) {
        let mut inner = self.inner.lock();
        inner.state = SessionState::Stopped;
        inner.logged_in = false;
        inner.identity = None;
        inner.pending = None;
        inner.pending_request = None;
        // Release any waiter; it observes `logged_in == false`.
        inner.logon_signaled = true;
        self.logon_done.notify_all();
        debug!(state = %inner.state, "session status changed");
    }
}
