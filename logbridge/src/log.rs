//! The native, record-oriented logging interface and its stock wrappers.
use crate::level::Level;
use crate::record::LogRecord;
use crate::value::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// Property key added by [`SourceContextLog`].
pub const SOURCE_CONTEXT_PROPERTY: &str = "sourceContext";

/// A destination for [`LogRecord`]s.
///
/// Implementations decide themselves what happens to a record; the bridge
/// neither waits for nor inspects the outcome of [`log`](Log::log).
pub trait Log: Send + Sync + Debug {
    /// Writes a finished record.
    fn log(&self, record: &LogRecord);

    /// Returns `true` if records of `level` would be written.
    fn is_enabled_for(&self, level: Level) -> bool;

    /// Returns a destination tagged with a named source context.
    ///
    /// Implementations usually wrap themselves in a [`SourceContextLog`].
    fn for_context(self: Arc<Self>, context: &str) -> Arc<dyn Log>;
}

/// Adds a [`SOURCE_CONTEXT_PROPERTY`] to every record.
///
/// A single context is a string; nesting [`for_context`](Log::for_context)
/// calls produces the list of contexts, outermost first. An existing property
/// of the same name set at the call site is kept.
#[derive(Debug)]
pub struct SourceContextLog {
    inner: Arc<dyn Log>,
    contexts: Vec<String>,
}

impl SourceContextLog {
    /// Wraps `inner`, tagging records with `context`.
    pub fn new(inner: Arc<dyn Log>, context: impl Into<String>) -> Self {
        SourceContextLog {
            inner,
            contexts: vec![context.into()],
        }
    }

    /// The contexts this log tags records with, outermost first.
    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    fn context_value(&self) -> Value {
        match self.contexts.as_slice() {
            [single] => Value::from(single.clone()),
            many => many.iter().cloned().collect(),
        }
    }
}

impl Log for SourceContextLog {
    fn log(&self, record: &LogRecord) {
        let record = record.with_property_if_absent(SOURCE_CONTEXT_PROPERTY, self.context_value());
        self.inner.log(&record);
    }

    fn is_enabled_for(&self, level: Level) -> bool {
        self.inner.is_enabled_for(level)
    }

    fn for_context(self: Arc<Self>, context: &str) -> Arc<dyn Log> {
        if self.contexts.last().map(String::as_str) == Some(context) {
            return self;
        }
        let mut contexts = self.contexts.clone();
        contexts.push(context.to_owned());
        Arc::new(SourceContextLog {
            inner: self.inner.clone(),
            contexts,
        })
    }
}

/// Drops records below a minimum level.
#[derive(Debug)]
pub struct MinimumLevelLog {
    inner: Arc<dyn Log>,
    minimum: Level,
}

impl MinimumLevelLog {
    /// Wraps `inner`, letting through records of `minimum` and above.
    pub fn new(inner: Arc<dyn Log>, minimum: Level) -> Self {
        MinimumLevelLog { inner, minimum }
    }
}

impl Log for MinimumLevelLog {
    fn log(&self, record: &LogRecord) {
        if self.is_enabled_for(record.level()) {
            self.inner.log(record);
        }
    }

    fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.minimum && self.inner.is_enabled_for(level)
    }

    fn for_context(self: Arc<Self>, context: &str) -> Arc<dyn Log> {
        Arc::new(MinimumLevelLog {
            inner: Arc::clone(&self.inner).for_context(context),
            minimum: self.minimum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryLog;

    #[test]
    fn single_context_is_a_string() {
        let memory = Arc::new(MemoryLog::new());
        let log = Arc::clone(&memory).for_context("Worker");
        log.log(&LogRecord::new(Level::Info, "m"));

        let records = memory.records();
        assert_eq!(
            records[0].properties().get(SOURCE_CONTEXT_PROPERTY),
            Some(&Value::from("Worker"))
        );
    }

    #[test]
    fn nested_contexts_are_a_list() {
        let memory = Arc::new(MemoryLog::new());
        let log = Arc::clone(&memory)
            .for_context("Outer")
            .for_context("Inner")
            .for_context("Inner");
        log.log(&LogRecord::new(Level::Info, "m"));

        assert_eq!(
            memory.records()[0].properties().get(SOURCE_CONTEXT_PROPERTY),
            Some(&Value::from_iter(["Outer", "Inner"]))
        );
    }

    #[test]
    fn call_site_source_context_is_kept() {
        let memory = Arc::new(MemoryLog::new());
        let log = Arc::clone(&memory).for_context("Worker");
        log.log(&LogRecord::new(Level::Info, "m").with_property(SOURCE_CONTEXT_PROPERTY, "mine"));

        assert_eq!(
            memory.records()[0].properties().get(SOURCE_CONTEXT_PROPERTY),
            Some(&Value::from("mine"))
        );
    }

    #[test]
    fn minimum_level_drops_and_survives_for_context() {
        let memory = Arc::new(MemoryLog::new());
        let log: Arc<dyn Log> = Arc::new(MinimumLevelLog::new(memory.clone(), Level::Warn));
        assert!(!log.is_enabled_for(Level::Info));
        assert!(log.is_enabled_for(Level::Error));

        let log = log.for_context("ctx");
        log.log(&LogRecord::new(Level::Info, "dropped"));
        log.log(&LogRecord::new(Level::Error, "kept"));

        let records = memory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message_template(), "kept");
        assert_eq!(
            records[0].properties().get(SOURCE_CONTEXT_PROPERTY),
            Some(&Value::from("ctx"))
        );
    }
}
