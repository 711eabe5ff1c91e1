use crate::error::{BridgeError, BridgeResult};
use crate::host::HostLogger;
use crate::level::{HostLevel, Level};
use crate::log::{Log, SourceContextLog};
use crate::properties::PropertyBag;
use crate::record::LogRecord;
use crate::scope::{ScopeContext, ScopeGuard};
use crate::state::{EventId, Exception, Formatter, State};
use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A native destination that keeps records in memory.
///
/// Clones share storage, so a test can hand one clone to a provider and
/// inspect another.
///
/// ```
/// use logbridge::testing::MemoryLog;
/// use logbridge::{Level, Log, LogRecord};
///
/// let log = MemoryLog::new().with_minimum_level(Level::Info);
/// log.log(&LogRecord::new(Level::Warn, "disk almost full"));
/// assert_eq!(log.write_count(), 1);
/// assert!(!log.is_enabled_for(Level::Debug));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryLog {
    records: Arc<Mutex<Vec<LogRecord>>>,
    writes: Arc<AtomicUsize>,
    minimum_level: Option<Level>,
}

impl MemoryLog {
    /// Creates a log accepting every level.
    pub fn new() -> Self {
        MemoryLog::default()
    }

    /// Accepts only `level` and above.
    pub fn with_minimum_level(self, level: Level) -> Self {
        MemoryLog {
            minimum_level: Some(level),
            ..self
        }
    }

    /// Returns a copy of the records written so far.
    pub fn records(&self) -> Vec<LogRecord> {
        lock(&self.records).clone()
    }

    /// Number of times [`Log::log`] was called, disabled levels included.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Clears records and the write counter.
    pub fn reset(&self) {
        lock(&self.records).clear();
        self.writes.store(0, Ordering::SeqCst);
    }
}

impl Log for MemoryLog {
    fn log(&self, record: &LogRecord) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.is_enabled_for(record.level()) {
            lock(&self.records).push(record.clone());
        }
    }

    fn is_enabled_for(&self, level: Level) -> bool {
        self.minimum_level.map_or(true, |min| level >= min)
    }

    fn for_context(self: Arc<Self>, context: &str) -> Arc<dyn Log> {
        Arc::new(SourceContextLog::new(self, context))
    }
}

/// One call captured by [`MemoryHostLogger`].
#[derive(Clone, Debug)]
pub struct HostEntry {
    /// Category of the logger that received the call.
    pub category: Cow<'static, str>,
    /// Host level of the call.
    pub level: HostLevel,
    /// Event identifier of the call.
    pub event_id: EventId,
    /// The payload as passed.
    pub state: State,
    /// The exception as passed.
    pub exception: Option<Exception>,
    /// Output of the formatter, or the payload's display form without one.
    pub message: String,
}

/// A host logger that keeps calls in memory.
///
/// Scopes it begins are real [`ScopeContext`] scopes labelled with the
/// payload's display form.
#[derive(Clone, Debug)]
pub struct MemoryHostLogger {
    entries: Arc<Mutex<Vec<HostEntry>>>,
    category: Cow<'static, str>,
    minimum_level: HostLevel,
}

impl Default for MemoryHostLogger {
    fn default() -> Self {
        MemoryHostLogger {
            entries: Arc::default(),
            category: Cow::Borrowed(""),
            minimum_level: HostLevel::Trace,
        }
    }
}

impl MemoryHostLogger {
    /// Creates a logger accepting every level but [`HostLevel::None`].
    pub fn new() -> Self {
        MemoryHostLogger::default()
    }

    /// Accepts only `level` and above.
    pub fn with_minimum_level(self, level: HostLevel) -> Self {
        MemoryHostLogger {
            minimum_level: level,
            ..self
        }
    }

    /// Returns a logger for another category sharing this logger's storage.
    pub fn with_category(&self, category: impl Into<Cow<'static, str>>) -> Self {
        MemoryHostLogger {
            category: category.into(),
            ..self.clone()
        }
    }

    /// Returns a copy of the calls captured so far.
    pub fn entries(&self) -> Vec<HostEntry> {
        lock(&self.entries).clone()
    }
}

impl HostLogger for MemoryHostLogger {
    fn log(
        &self,
        level: HostLevel,
        event_id: &EventId,
        state: &State,
        exception: Option<&Exception>,
        formatter: Option<&Formatter>,
    ) -> BridgeResult<()> {
        if !self.is_enabled(level) {
            return Ok(());
        }
        let message = match formatter {
            Some(formatter) => formatter(state, exception).map_err(BridgeError::Formatter)?,
            None => state.to_string(),
        };
        lock(&self.entries).push(HostEntry {
            category: self.category.clone(),
            level,
            event_id: event_id.clone(),
            state: state.clone(),
            exception: exception.cloned(),
            message,
        });
        Ok(())
    }

    fn is_enabled(&self, level: HostLevel) -> bool {
        level != HostLevel::None && level >= self.minimum_level
    }

    fn begin_scope(&self, state: &State) -> ScopeGuard {
        let properties: PropertyBag = state
            .properties_iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        ScopeContext::current()
            .with_scope(state.to_string(), properties)
            .attach()
    }
}
