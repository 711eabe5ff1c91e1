/*
    Stress test results:
    Run with `cargo run --release --bin log_appender`.
    Measures `log::info!` with key-values routed through the appender into
    a destination that drops every record.
*/

use logbridge::{Level, Log, LogRecord, NativeLoggerProvider};
use logbridge_appender_log::LogBridge;
use std::sync::Arc;

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

fn main() {
    let provider = NativeLoggerProvider::new(Arc::new(NoopLog));
    log::set_boxed_logger(Box::new(LogBridge::new(&provider)))
        .expect("no other logger installed");
    log::set_max_level(log::LevelFilter::Info);

    throughput::test_throughput(test_log);
}

fn test_log() {
    log::info!(target: "stress", user = "alice", attempt = 3; "login succeeded");
}
