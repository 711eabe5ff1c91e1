/*
    Stress test results:
    Run with `cargo run --release --bin scopes`.
    Each iteration enters two nested scopes, logs once inside them and
    releases both.
*/

use logbridge::{
    BridgeLogger, EventId, HostLevel, HostLogger, Level, Log, LogRecord, NativeLoggerProvider,
    ProviderSettings, State,
};
use std::sync::{Arc, OnceLock};

mod throughput;

#[derive(Debug)]
struct NoopLog;

impl Log for NoopLog {
    fn log(&self, record: &LogRecord) {
        std::hint::black_box(record);
    }

    fn is_enabled_for(&self, _level: Level) -> bool {
        true
    }

    fn for_context(self: Arc<Self>, _context: &str) -> Arc<dyn Log> {
        self
    }
}

static LOGGER: OnceLock<BridgeLogger> = OnceLock::new();

fn main() {
    let provider = NativeLoggerProvider::builder()
        .with_log(Arc::new(NoopLog))
        .with_settings(ProviderSettings::default().with_ignored_scope_prefixes(["Internal."]))
        .build()
        .expect("provider has a destination");
    let _ = LOGGER.set(provider.create_logger("Stress.Scopes"));

    throughput::test_throughput(test_scopes);
}

fn test_scopes() {
    let Some(logger) = LOGGER.get() else {
        return;
    };
    let _request = logger.begin_scope(&State::properties([("request_id", 42), ("tenant", 7)]));
    let _operation = logger.begin_scope(&State::value("checkout"));
    let _ = logger.log(
        HostLevel::Information,
        &EventId::NONE,
        &State::template("order {order} placed", [("order", 1234)]),
        None,
        None,
    );
}
