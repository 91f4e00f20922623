//! Simulated Session Example
//!
//! Logs on, places an order, cancels it and queries trade accounts against the
//! in-process simulator. Set `RUST_LOG=debug` for the session's own logging.
use oxtrade::prelude::*;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::info;

struct LoggingHandler;

impl TradeHandler for LoggingHandler {
    fn on_connected(&self) -> i32 {
        info!("Connected");
        0
    }

    fn on_logon_response(
        &self,
        request_id: RequestId,
        error: Option<&RspError>,
        _is_last: bool,
        response: Option<&FieldMap>,
    ) {
        match error.filter(|e| !e.is_success()) {
            Some(e) => info!("Logon {} rejected: {}", request_id, e),
            None => info!(
                "Logon {} accepted: {}",
                request_id,
                response.map(ToString::to_string).unwrap_or_default()
            ),
        }
    }

    fn on_trade_accounts_response(
        &self,
        _request_id: RequestId,
        _error: Option<&RspError>,
        is_last: bool,
        response: Option<&FieldMap>,
    ) {
        if let Some(account) = response {
            info!(
                "Trade account {} on board {} (last: {})",
                account.get_str("TrdAcct").unwrap_or_default(),
                account.get_str("BoardId").unwrap_or_default(),
                is_last
            );
        }
    }

    fn on_order_report(&self, report: Option<&FieldMap>) {
        if let Some(report) = report {
            info!(
                "Order {} state {}",
                report.get_i64("OrderNo").unwrap_or_default(),
                report.get_char("OrderState").unwrap_or('?')
            );
        }
    }

    fn on_trade_report(&self, report: Option<&FieldMap>) {
        if let Some(report) = report {
            info!(
                "Filled {} @ {}",
                report.get_i64("FilledQty").unwrap_or_default(),
                report.get_decimal("FilledPrice").unwrap_or_default()
            );
        }
    }

    fn on_cancel_response(
        &self,
        request_id: RequestId,
        _error: Option<&RspError>,
        response: Option<&FieldMap>,
    ) {
        info!(
            "Cancel {} answered with state {}",
            request_id,
            response
                .and_then(|r| r.get_char("OrderState"))
                .unwrap_or('?')
        );
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let library = SimulatedLibrary::new(
        SimulatorConfig::default()
            .with_fill_orders(true)
            .with_response_delay(Duration::from_millis(20)),
    );
    let session = SessionBuilder::new()
        .with_name("demo")
        .with_handler(LoggingHandler)
        .with_library(library)
        .start()?;

    if !session.login("110000001", "secret", AccountType::Stock, Duration::from_secs(5))? {
        info!("Logon refused, exiting");
        return Ok(());
    }

    session.query_trade_accounts()?;
    let order = NewOrder::new("A123456789", BOARD_SH, "600000", Decimal::new(1050, 2), 100)
        .with_client_tag("demo-1");
    let request_id = session.order(&order)?;
    info!("Order sent as request {}", request_id);
    session.cancel(BOARD_SH, 1, None)?;

    std::thread::sleep(Duration::from_millis(500));
    session.stop();
    Ok(())
}
