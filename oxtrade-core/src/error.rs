/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Error types for the OxTrade native trading wrapper.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across session, order, and marshaling operations.

use thiserror::Error;

/// Result type alias using [`TradeError`] as the error type.
pub type Result<T> = std::result::Result<T, TradeError>;

/// Top-level error type for all OxTrade operations.
#[derive(Debug, Error)]
pub enum TradeError {
    /// The session is not in a state that allows the operation.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// The login attempt could not complete.
    #[error("login error: {0}")]
    Login(#[from] LoginError),

    /// An order, cancel, or batch request was refused before reaching the venue.
    #[error("order error: {0}")]
    Order(#[from] OrderError),

    /// The native library could not be loaded or instantiated.
    #[error("native library error: {0}")]
    NativeLibrary(#[from] NativeLibraryError),

    /// A request record could not be built.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// A response record could not be read.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Errors raised when the session lifecycle does not permit an operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// `init()` has not been called or the session was stopped.
    #[error("API not initialized")]
    NotInitialized,

    /// An order operation was issued without a successful login.
    #[error("Not logged in")]
    NotLoggedIn,

    /// The native factory returned no instance.
    #[error("Failed to create API instance")]
    InstanceUnavailable,

    /// The native `Init` call returned a non-zero code.
    #[error("Init failed with return code: {code}{}", message_suffix(.message))]
    InitFailed {
        /// Native return code.
        code: i32,
        /// Message reported by the native library, if any.
        message: Option<String>,
    },

    /// Every positive request id has been handed out.
    #[error("Request ids exhausted; recreate the session")]
    RequestIdsExhausted,
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({m})"))
        .unwrap_or_default()
}

/// Errors raised by `login()`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// No handler set has been registered.
    #[error("SPI not registered")]
    HandlerNotRegistered,

    /// The native send call rejected the logon request synchronously.
    #[error("Login request failed with return code: {code}")]
    RequestRejected {
        /// Native return code.
        code: i32,
    },

    /// No logon response arrived within the timeout.
    #[error("Login timeout after {timeout_ms} ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },
}

/// Errors raised by order, cancel, and batch operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// No account identity is known for the session.
    #[error("no account identity available, login first")]
    MissingAccount,

    /// A batch was submitted without items.
    #[error("batch order requires at least one item")]
    EmptyBatch,

    /// A batch exceeded the native array capacity.
    #[error("batch order holds {count} items, maximum is {max}")]
    BatchTooLarge {
        /// Number of submitted items.
        count: usize,
        /// Maximum accepted items.
        max: usize,
    },

    /// The native send call rejected the request synchronously.
    #[error("{request} request failed with return code: {code}")]
    SendRejected {
        /// Name of the rejected request record.
        request: &'static str,
        /// Native return code.
        code: i32,
    },
}

/// Errors raised while loading or instantiating the native library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NativeLibraryError {
    /// The shared library could not be located or loaded.
    #[error("failed to load native library: {0}")]
    Load(String),

    /// A required exported symbol is missing.
    #[error("missing native symbol: {0}")]
    MissingSymbol(String),
}

/// Errors that occur while encoding a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The supplied value cannot be coerced to the declared field type.
    #[error("field {field}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Field name.
        field: &'static str,
        /// Declared field type.
        expected: &'static str,
        /// Supplied value kind.
        found: &'static str,
    },

    /// The supplied numeric value does not fit the declared width.
    #[error("field {field}: value {value} out of range")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: String,
    },

    /// An array field received more items than its capacity.
    #[error("field {field}: {count} items exceed capacity {capacity}")]
    CapacityExceeded {
        /// Field name.
        field: &'static str,
        /// Supplied item count.
        count: usize,
        /// Declared capacity.
        capacity: usize,
    },
}

/// Errors that occur while decoding a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer is shorter than the record layout.
    #[error("{record} record needs {expected} bytes, got {actual}")]
    Truncated {
        /// Record name.
        record: &'static str,
        /// Layout size in bytes.
        expected: usize,
        /// Supplied buffer length.
        actual: usize,
    },
}
