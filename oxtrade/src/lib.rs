/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # OxTrade
//!
//! Record marshaling and session control for the OxTrade native trading
//! library.
//!
//! The native library exchanges packed, fixed-width records and answers
//! asynchronously on its own threads. OxTrade converts those records to and
//! from named field mappings, correlates requests with responses, and offers
//! a blocking login on top of the callback interface.
//!
//! ## Features
//!
//! - **Table-driven records**: One generic encoder and decoder for every kind
//! - **GBK text**: Truncation never splits a multi-byte character
//! - **Blocking login**: Waits on the logon response with a timeout
//! - **Simulator**: Exercise the whole flow without the vendor library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use oxtrade::prelude::*;
//!
//! let session = SessionBuilder::new()
//!     .with_handler(MyHandler)
//!     .with_library(SimulatedLibrary::default())
//!     .start()?;
//! session.login("110000001", "secret", AccountType::Stock, None)?;
//! let order = NewOrder::new("A123456789", BOARD_SH, "600000", price, 100);
//! let request_id = session.order(&order)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Field values, scalar codec, domain codes and errors
//! - [`record`]: Record layouts and the record marshaler
//! - [`session`]: Request ids, session state and configuration
//! - [`engine`]: Session controller, callbacks and the native boundary

pub mod core {
    //! Field values, scalar codec, domain codes and errors.
    pub use oxtrade_core::*;
}

pub mod record {
    //! Record layouts and the record marshaler.
    pub use oxtrade_record::*;
}

pub mod session {
    //! Request ids, session state and configuration.
    pub use oxtrade_session::*;
}

pub mod engine {
    //! Session controller, callbacks and the native boundary.
    pub use oxtrade_engine::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use oxtrade_core::{
        AccountType, BOARD_SH, BOARD_SZ, BusinessCode, ConnectionError, DecodeError, EncodeError,
        ExchangeId, FieldCodec, FieldMap, FieldValue, LoginError, NativeLibraryError, OrderError,
        OrderState, OrderType, RequestId, Result, RspError, TextEncoding, TradeError,
    };

    // Records
    pub use oxtrade_record::{RecordKind, RecordMarshaler};

    // Session
    pub use oxtrade_session::{AccountIdentity, SessionConfig, SessionState};

    // Engine
    pub use oxtrade_engine::{
        NativeApi, NativeCallbacks, NativeLibrary, NewOrder, SessionBuilder, SimulatedLibrary,
        SimulatorConfig, TradeHandler, TradeSession,
    };
}
