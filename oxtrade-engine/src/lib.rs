/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # OxTrade Engine
//!
//! Session control for the OxTrade native trading library.
//!
//! This crate provides:
//! - **TradeSession**: Lifecycle, blocking login and order entry
//! - **TradeHandler trait**: Callback interface for responses and reports
//! - **Native boundary**: Traits implemented by a native library binding
//! - **Simulator**: In-process native library for tests and dry runs
//! - **Builder API**: Fluent configuration for session setup

pub mod builder;
pub mod controller;
pub mod handler;
pub mod native;
pub mod order;
pub mod router;
pub mod simulated;

pub use builder::SessionBuilder;
pub use controller::TradeSession;
pub use handler::{NoOpHandler, TradeHandler};
pub use native::{NativeApi, NativeCallbacks, NativeLibrary, RecordDispatcher};
pub use order::NewOrder;
pub use router::CallbackRouter;
pub use simulated::{
    CreateOutcome, SentRequest, SimulatedApi, SimulatedLibrary, SimulatorConfig, SimulatorHandle,
};
