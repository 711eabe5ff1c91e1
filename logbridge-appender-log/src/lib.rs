//! Routes records of the [`log`] crate through logbridge.
//!
//! [`LogBridge`] implements [`log::Log`] on top of a
//! [`NativeLoggerProvider`]: the record target becomes the logger category,
//! `key_values` become call-site properties, and the records pick up the
//! properties of the scopes active on the logging thread.
//!
//! ```
//! use logbridge::testing::MemoryLog;
//! use logbridge::NativeLoggerProvider;
//! use logbridge_appender_log::LogBridge;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryLog::new());
//! let provider = NativeLoggerProvider::new(memory.clone());
//!
//! log::set_boxed_logger(Box::new(LogBridge::new(&provider))).unwrap();
//! log::set_max_level(log::LevelFilter::Info);
//!
//! log::warn!(target: "billing", "invoice overdue");
//! assert_eq!(memory.records()[0].message_template(), "invoice overdue");
//! ```
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]

use log::kv::{self, VisitSource};
use log::{Metadata, Record};
use logbridge::{BridgeLogger, EventId, HostLevel, HostLogger, Key, NativeLoggerProvider, State, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// A [`log::Log`] that writes through a [`NativeLoggerProvider`].
#[derive(Debug)]
pub struct LogBridge {
    provider: NativeLoggerProvider,
    // One logger per target, created on first use.
    loggers: RwLock<HashMap<String, BridgeLogger>>,
}

impl LogBridge {
    /// Creates a bridge writing to `provider`.
    pub fn new(provider: &NativeLoggerProvider) -> Self {
        LogBridge {
            provider: provider.clone(),
            loggers: RwLock::new(HashMap::new()),
        }
    }

    fn logger(&self, target: &str) -> BridgeLogger {
        if let Some(logger) = self
            .loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(target)
        {
            return logger.clone();
        }
        self.loggers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(target.to_owned())
            .or_insert_with(|| self.provider.create_logger(target.to_owned()))
            .clone()
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.logger(metadata.target())
            .is_enabled(map_level(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        let level = map_level(record.level());
        let logger = self.logger(record.target());
        if !logger.is_enabled(level) {
            return;
        }

        let template: Cow<'static, str> = match record.args().as_str() {
            Some(literal) => Cow::Borrowed(literal),
            None => Cow::Owned(record.args().to_string()),
        };
        let mut visitor = PropertyVisitor::with_capacity(record.key_values().count());
        // Collecting into memory cannot fail.
        let _ = record.key_values().visit(&mut visitor);
        let state = State::template(template, visitor.properties);

        if let Err(err) = logger.log(level, &EventId::NONE, &state, None, None) {
            logbridge::bridge_error!(
                name: "LogBridge.WriteFailed",
                log_target = record.target(),
                error = format!("{err}")
            );
        }
    }

    fn flush(&self) {}
}

fn map_level(level: log::Level) -> HostLevel {
    match level {
        log::Level::Error => HostLevel::Error,
        log::Level::Warn => HostLevel::Warning,
        log::Level::Info => HostLevel::Information,
        log::Level::Debug => HostLevel::Debug,
        log::Level::Trace => HostLevel::Trace,
    }
}

struct PropertyVisitor {
    properties: Vec<(Key, Value)>,
}

impl PropertyVisitor {
    fn with_capacity(capacity: usize) -> Self {
        PropertyVisitor {
            properties: Vec::with_capacity(capacity),
        }
    }
}

impl<'kvs> VisitSource<'kvs> for PropertyVisitor {
    fn visit_pair(&mut self, key: kv::Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
        self.properties
            .push((Key::from(key.as_str().to_owned()), to_value(&value)));
        Ok(())
    }
}

fn to_value(value: &kv::Value<'_>) -> Value {
    if let Some(v) = value.to_i64() {
        Value::Int(v)
    } else if let Some(v) = value.to_u64() {
        // Only reached above i64::MAX.
        Value::from(v.to_string())
    } else if let Some(v) = value.to_f64() {
        Value::Double(v)
    } else if let Some(v) = value.to_bool() {
        Value::Boolean(v)
    } else if let Some(v) = value.to_borrowed_str() {
        Value::from(v.to_owned())
    } else {
        Value::from(value.to_string())
    }
}
