/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Session configuration.
//!
//! This module provides configuration options for trading sessions.

use oxtrade_core::constants::DEFAULT_PRICE_PRECISION;
use oxtrade_core::{FieldCodec, TextEncoding};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a trading session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name used to tag log records of this session.
    pub name: String,
    /// Encoding of native text fields.
    pub text_encoding: TextEncoding,
    /// Fractional digits used when rendering prices.
    pub price_precision: u32,
    /// Default logon timeout.
    pub logon_timeout: Duration,
}

impl SessionConfig {
    /// Creates a configuration with default values.
    ///
    /// # Arguments
    /// * `name` - Session name for log records
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text_encoding: TextEncoding::Gbk,
            price_precision: DEFAULT_PRICE_PRECISION,
            logon_timeout: Duration::from_secs(10),
        }
    }

    /// Sets the text encoding.
    #[must_use]
    pub const fn with_text_encoding(mut self, encoding: TextEncoding) -> Self {
        self.text_encoding = encoding;
        self
    }

    /// Sets the price precision.
    #[must_use]
    pub const fn with_price_precision(mut self, precision: u32) -> Self {
        self.price_precision = precision;
        self
    }

    /// Sets the default logon timeout.
    #[must_use]
    pub const fn with_logon_timeout(mut self, timeout: Duration) -> Self {
        self.logon_timeout = timeout;
        self
    }

    /// Returns the field codec described by this configuration.
    #[must_use]
    pub const fn field_codec(&self) -> FieldCodec {
        FieldCodec::new(self.text_encoding).with_precision(self.price_precision)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new("oxtrade")
    }
}

/// Builder for session configuration.
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    name: Option<String>,
    text_encoding: Option<TextEncoding>,
    price_precision: Option<u32>,
    logon_timeout: Option<Duration>,
}

impl SessionConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the session name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the text encoding.
    #[must_use]
    pub const fn text_encoding(mut self, encoding: TextEncoding) -> Self {
        self.text_encoding = Some(encoding);
        self
    }

    /// Sets the price precision.
    #[must_use]
    pub const fn price_precision(mut self, precision: u32) -> Self {
        self.price_precision = Some(precision);
        self
    }

    /// Sets the default logon timeout.
    #[must_use]
    pub const fn logon_timeout(mut self, timeout: Duration) -> Self {
        self.logon_timeout = Some(timeout);
        self
    }

    /// Builds the configuration, filling unset options with defaults.
    #[must_use]
    pub fn build(self) -> SessionConfig {
        let mut config = self.name.map_or_else(SessionConfig::default, SessionConfig::new);
        if let Some(encoding) = self.text_encoding {
            config.text_encoding = encoding;
        }
        if let Some(precision) = self.price_precision {
            config.price_precision = precision;
        }
        if let Some(timeout) = self.logon_timeout {
            config.logon_timeout = timeout;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.name, "oxtrade");
        assert_eq!(config.text_encoding, TextEncoding::Gbk);
        assert_eq!(config.price_precision, 2);
        assert_eq!(config.logon_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfigBuilder::new()
            .name("desk-1")
            .text_encoding(TextEncoding::Utf8)
            .price_precision(3)
            .logon_timeout(Duration::from_millis(250))
            .build();

        assert_eq!(config.name, "desk-1");
        assert_eq!(config.text_encoding, TextEncoding::Utf8);
        assert_eq!(config.field_codec().precision(), 3);
        assert_eq!(config.field_codec().encoding(), TextEncoding::Utf8);
        assert_eq!(config.logon_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_with_methods() {
        let config = SessionConfig::new("x")
            .with_text_encoding(TextEncoding::Latin1)
            .with_price_precision(4)
            .with_logon_timeout(Duration::from_secs(1));
        assert_eq!(config.text_encoding, TextEncoding::Latin1);
        assert_eq!(config.price_precision, 4);
        assert_eq!(config.logon_timeout, Duration::from_secs(1));
    }
}
