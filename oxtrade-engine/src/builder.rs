/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Session builder for fluent configuration.
//!
//! This module provides a builder API for assembling trading sessions.

use crate::controller::TradeSession;
use crate::handler::{NoOpHandler, TradeHandler};
use crate::native::NativeLibrary;
use crate::simulated::SimulatedLibrary;
use oxtrade_core::{Result, TextEncoding};
use oxtrade_session::SessionConfig;
use std::sync::Arc;
use std::time::Duration;

/// Builder for configuring a trading session.
pub struct SessionBuilder<H: TradeHandler = NoOpHandler> {
    /// Callback handler.
    handler: Option<Arc<H>>,
    /// Session configuration.
    config: SessionConfig,
    /// Native library; defaults to the simulator.
    library: Option<Arc<dyn NativeLibrary>>,
}

impl Default for SessionBuilder<NoOpHandler> {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder<NoOpHandler> {
    /// Creates a new session builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handler: None,
            config: SessionConfig::default(),
            library: None,
        }
    }
}

impl<H: TradeHandler + 'static> SessionBuilder<H> {
    /// Sets the callback handler.
    #[must_use]
    pub fn with_handler<B: TradeHandler + 'static>(self, handler: B) -> SessionBuilder<B> {
        SessionBuilder {
            handler: Some(Arc::new(handler)),
            config: self.config,
            library: self.library,
        }
    }

    /// Sets the native library.
    #[must_use]
    pub fn with_library(mut self, library: impl NativeLibrary + 'static) -> Self {
        self.library = Some(Arc::new(library));
        self
    }

    /// Sets the whole session configuration.
    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the session name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Sets the text encoding.
    #[must_use]
    pub fn with_text_encoding(mut self, encoding: TextEncoding) -> Self {
        self.config.text_encoding = encoding;
        self
    }

    /// Sets the default logon timeout.
    #[must_use]
    pub fn with_logon_timeout(mut self, timeout: Duration) -> Self {
        self.config.logon_timeout = timeout;
        self
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the callback handler, if set.
    #[must_use]
    pub fn handler(&self) -> Option<&Arc<H>> {
        self.handler.as_ref()
    }

    /// Builds the session and registers the handler, if any.
    #[must_use]
    pub fn build(self) -> TradeSession {
        let library: Arc<dyn NativeLibrary> = match self.library {
            Some(library) => library,
            None => Arc::new(SimulatedLibrary::default()),
        };
        let session = TradeSession::new(library, self.config);
        if let Some(handler) = self.handler {
            session.register_handlers(handler);
        }
        session
    }

    /// Builds the session and initializes it.
    ///
    /// # Errors
    /// Returns the error of [`TradeSession::init`].
    pub fn start(self) -> Result<TradeSession> {
        let session = self.build();
        session.init()?;
        Ok(session)
    }
}

impl<H: TradeHandler> std::fmt::Debug for SessionBuilder<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("config", &self.config)
            .field("has_handler", &self.handler.is_some())
            .field("has_library", &self.library.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::{CreateOutcome, SimulatorConfig};
    use oxtrade_core::{AccountType, ConnectionError, TradeError};
    use oxtrade_session::SessionState;

    struct TestHandler;

    impl TradeHandler for TestHandler {}

    #[test]
    fn test_builder_default() {
        let builder = SessionBuilder::new();
        assert_eq!(builder.config().name, "oxtrade");
        assert!(builder.handler().is_none());
    }

    #[test]
    fn test_builder_with_handler() {
        let builder = SessionBuilder::new()
            .with_handler(TestHandler)
            .with_name("desk-7")
            .with_text_encoding(TextEncoding::Utf8)
            .with_logon_timeout(Duration::from_secs(2));
        assert!(builder.handler().is_some());
        assert_eq!(builder.config().name, "desk-7");
        assert_eq!(builder.config().text_encoding, TextEncoding::Utf8);
        assert_eq!(builder.config().logon_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_start_and_login() {
        let session = SessionBuilder::new()
            .with_handler(TestHandler)
            .with_library(SimulatedLibrary::default())
            .start()
            .unwrap();
        assert_eq!(session.state(), SessionState::Initialized);
        assert!(session.login("110000001", "pw", AccountType::Stock, None).unwrap());
        assert!(session.is_logged_in());
    }

    #[test]
    fn test_start_propagates_init_error() {
        let library =
            SimulatedLibrary::new(SimulatorConfig::default().with_create(CreateOutcome::Null));
        let err = SessionBuilder::new()
            .with_library(library)
            .start()
            .unwrap_err();
        assert!(matches!(
            err,
            TradeError::Connection(ConnectionError::InstanceUnavailable)
        ));
    }

    #[test]
    fn test_build_with_config() {
        let config = SessionConfig::new("cfg").with_price_precision(3);
        let session = SessionBuilder::new().with_config(config).build();
        assert_eq!(session.config().name, "cfg");
        assert_eq!(session.marshaler().codec().precision(), 3);
        assert!(!session.is_initialized());
    }
}
