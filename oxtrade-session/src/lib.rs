/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # OxTrade Session
//!
//! Session bookkeeping for the OxTrade native trading wrapper.
//!
//! This crate provides:
//! - **Request registry**: Atomic, monotonically increasing request ids
//! - **Session status**: Lifecycle state, logged-in flag and account identity
//!   shared with callback threads, plus the login rendezvous
//! - **Configuration**: Session configuration options

pub mod config;
pub mod registry;
pub mod state;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use registry::RequestRegistry;
pub use state::{AccountIdentity, SessionState, SessionStatus};
