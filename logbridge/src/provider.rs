use crate::error::{BridgeError, BridgeResult};
use crate::extract::{self, DefaultLabel};
use crate::filter::ScopeFilter;
use crate::host::HostLogger;
use crate::level::{HostLevel, Level};
use crate::log::Log;
use crate::properties::PropertyBag;
use crate::record::RecordBuilder;
use crate::scope::{ScopeContext, ScopeGuard};
use crate::settings::{ProviderSettings, SCOPE_PROPERTY};
use crate::state::{EventId, Exception, Formatter, State};
use crate::value::Value;
use crate::{bridge_debug, bridge_info};
use std::borrow::Cow;
use std::sync::Arc;

/// Creates host loggers that write to a native [`Log`].
///
/// This is a cheap, clonable handle; every logger created from it shares the
/// destination and settings.
///
/// # Examples
///
/// ```
/// use logbridge::testing::MemoryLog;
/// use logbridge::{EventId, HostLevel, HostLogger, NativeLoggerProvider, State};
/// use std::sync::Arc;
///
/// let log = Arc::new(MemoryLog::new());
/// let provider = NativeLoggerProvider::new(log.clone());
/// let logger = provider.create_logger("Orders");
///
/// let state = State::template("order {id} placed", [("id", 42)]);
/// logger.log(HostLevel::Information, &EventId::NONE, &state, None, None).unwrap();
///
/// assert_eq!(log.records()[0].message_template(), "order {id} placed");
/// ```
#[derive(Debug, Clone)]
pub struct NativeLoggerProvider {
    inner: Arc<ProviderInner>,
}

#[derive(Debug)]
struct ProviderInner {
    log: Arc<dyn Log>,
    settings: ProviderSettings,
    filter: ScopeFilter,
    default_label: DefaultLabel,
}

impl NativeLoggerProvider {
    /// Creates a provider writing to `log` with default settings.
    pub fn new(log: Arc<dyn Log>) -> Self {
        NativeLoggerProvider::from_parts(log, ProviderSettings::default(), DefaultLabel::default())
    }

    /// Create a new provider builder.
    pub fn builder() -> NativeLoggerProviderBuilder {
        NativeLoggerProviderBuilder::default()
    }

    fn from_parts(log: Arc<dyn Log>, settings: ProviderSettings, default_label: DefaultLabel) -> Self {
        NativeLoggerProvider {
            inner: Arc::new(ProviderInner {
                log,
                filter: settings.scope_filter(),
                settings,
                default_label,
            }),
        }
    }

    /// The settings this provider was built with.
    pub fn settings(&self) -> &ProviderSettings {
        &self.inner.settings
    }

    /// Creates a logger for `category`.
    ///
    /// An empty category writes to the root destination; any other category
    /// writes to the destination returned by [`Log::for_context`].
    pub fn create_logger(&self, category: impl Into<Cow<'static, str>>) -> BridgeLogger {
        let category = category.into();
        let log = if category.is_empty() {
            bridge_info!(
                name: "LoggerProvider.CategoryEmpty",
                message = "Logger category is empty; records go to the root destination."
            );
            Arc::clone(&self.inner.log)
        } else {
            Arc::clone(&self.inner.log).for_context(&category)
        };
        bridge_debug!(
            name: "LoggerProvider.NewLoggerReturned",
            category = &*category
        );
        BridgeLogger {
            provider: self.clone(),
            category,
            log,
        }
    }

    /// Returns `true` if the root destination accepts `level`.
    ///
    /// Builds no record.
    pub fn is_enabled(&self, level: HostLevel) -> bool {
        level
            .to_native()
            .is_some_and(|level| self.inner.is_enabled(&self.inner.log, level))
    }
}

impl ProviderInner {
    fn is_enabled(&self, log: &Arc<dyn Log>, level: Level) -> bool {
        self.settings.minimum_level.map_or(true, |min| level >= min) && log.is_enabled_for(level)
    }
}

/// Builder for [`NativeLoggerProvider`].
#[derive(Debug, Default)]
pub struct NativeLoggerProviderBuilder {
    log: Option<Arc<dyn Log>>,
    settings: ProviderSettings,
    default_label: DefaultLabel,
}

impl NativeLoggerProviderBuilder {
    /// Sets the destination.
    pub fn with_log(self, log: Arc<dyn Log>) -> Self {
        NativeLoggerProviderBuilder {
            log: Some(log),
            ..self
        }
    }

    /// Replaces the settings.
    pub fn with_settings(self, settings: ProviderSettings) -> Self {
        NativeLoggerProviderBuilder { settings, ..self }
    }

    /// Replaces the label used for scopes whose payload is absent.
    pub fn with_default_label(self, default_label: DefaultLabel) -> Self {
        NativeLoggerProviderBuilder {
            default_label,
            ..self
        }
    }

    /// Builds the provider.
    ///
    /// Fails with [`BridgeError::MissingDestination`] if no destination was set.
    pub fn build(self) -> BridgeResult<NativeLoggerProvider> {
        let log = self.log.ok_or(BridgeError::MissingDestination)?;
        Ok(NativeLoggerProvider::from_parts(
            log,
            self.settings,
            self.default_label,
        ))
    }
}

/// A host logger writing native records for one category.
///
/// Scopes entered through [`begin_scope`](HostLogger::begin_scope) live on the
/// calling thread; [`scope`](BridgeLogger::scope) returns the same scope as a
/// value for hand-off to tasks and threads.
#[derive(Debug, Clone)]
pub struct BridgeLogger {
    provider: NativeLoggerProvider,
    category: Cow<'static, str>,
    log: Arc<dyn Log>,
}

impl BridgeLogger {
    /// The category this logger was created for.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the current context with the scope described by `state`
    /// entered, without attaching it.
    ///
    /// Suppressed shapes return the current context unchanged.
    pub fn scope(&self, state: &State) -> ScopeContext {
        let inner = &self.provider.inner;
        if inner.filter.should_suppress(state.shape()) {
            bridge_debug!(name: "Scope.Suppressed", shape = state.shape());
            return ScopeContext::current();
        }

        let label = extract::label(state, &inner.default_label);
        let mut properties: PropertyBag = state
            .properties_iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        ScopeContext::map_current(|cx| {
            if inner.settings.include_scope_labels {
                let labels = match cx.scope() {
                    None => Value::String(label.clone()),
                    Some(parent) => parent
                        .labels()
                        .into_iter()
                        .map(|l| Value::from(l.to_owned()))
                        .chain(std::iter::once(Value::String(label.clone())))
                        .collect(),
                };
                properties.overwrite(SCOPE_PROPERTY, labels);
            }
            cx.with_scope(label, properties)
        })
    }
}

impl HostLogger for BridgeLogger {
    fn log(
        &self,
        level: HostLevel,
        event_id: &EventId,
        state: &State,
        exception: Option<&Exception>,
        formatter: Option<&Formatter>,
    ) -> BridgeResult<()> {
        let Some(level) = level.to_native() else {
            return Ok(());
        };
        let inner = &self.provider.inner;
        if !inner.is_enabled(&self.log, level) {
            return Ok(());
        }

        let template =
            extract::message_template(state, exception, formatter, &inner.default_label)?;
        let record = ScopeContext::map_current(|cx| {
            let builder = RecordBuilder::new(level, template)
                .with_scope(cx.scope())
                .with_properties(state.properties_iter());
            let builder = if inner.settings.add_event_id_properties {
                builder.with_event_id(event_id)
            } else {
                builder
            };
            builder.with_exception(exception).build()
        });

        self.log.log(&record);
        Ok(())
    }

    fn is_enabled(&self, level: HostLevel) -> bool {
        level
            .to_native()
            .is_some_and(|level| self.provider.inner.is_enabled(&self.log, level))
    }

    fn begin_scope(&self, state: &State) -> ScopeGuard {
        if self.provider.inner.filter.should_suppress(state.shape()) {
            bridge_debug!(name: "Scope.Suppressed", shape = state.shape());
            return ScopeGuard::noop();
        }
        self.scope(state).attach()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryLog;

    fn setup(settings: ProviderSettings) -> (Arc<MemoryLog>, BridgeLogger) {
        let memory = Arc::new(MemoryLog::new());
        let provider = NativeLoggerProvider::builder()
            .with_log(memory.clone())
            .with_settings(settings)
            .build()
            .unwrap();
        (memory, provider.create_logger(""))
    }

    #[test]
    fn builder_requires_a_destination() {
        let err = NativeLoggerProvider::builder().build().unwrap_err();
        assert!(matches!(err, BridgeError::MissingDestination));
    }

    #[test]
    fn none_level_writes_nothing() {
        let (memory, logger) = setup(ProviderSettings::default());
        assert!(!logger.is_enabled(HostLevel::None));
        logger
            .log(HostLevel::None, &EventId::NONE, &State::message("m"), None, None)
            .unwrap();
        assert_eq!(memory.write_count(), 0);
    }

    #[test]
    fn minimum_level_is_a_floor() {
        let (memory, logger) =
            setup(ProviderSettings::default().with_minimum_level(Level::Warn));
        assert!(!logger.is_enabled(HostLevel::Information));
        assert!(logger.is_enabled(HostLevel::Warning));

        logger
            .log(HostLevel::Information, &EventId::NONE, &State::message("dropped"), None, None)
            .unwrap();
        logger
            .log(HostLevel::Error, &EventId::NONE, &State::message("kept"), None, None)
            .unwrap();

        let records = memory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level(), Level::Error);
    }

    #[test]
    fn scope_labels_property() {
        let (memory, logger) = setup(ProviderSettings::default().with_scope_labels(true));
        {
            let _outer = logger.begin_scope(&State::value("outer"));
            let _inner = logger.begin_scope(&State::message("inner {x}"));
            logger
                .log(HostLevel::Information, &EventId::NONE, &State::message("m"), None, None)
                .unwrap();
        }
        let _only = logger.begin_scope(&State::value("only"));
        logger
            .log(HostLevel::Information, &EventId::NONE, &State::message("m"), None, None)
            .unwrap();

        let records = memory.records();
        assert_eq!(
            records[0].properties().get(SCOPE_PROPERTY),
            Some(&Value::from_iter(["outer", "inner {x}"]))
        );
        assert_eq!(
            records[1].properties().get(SCOPE_PROPERTY),
            Some(&Value::from("only"))
        );
    }

    #[test]
    fn absent_scope_uses_default_label() {
        let memory = Arc::new(MemoryLog::new());
        let provider = NativeLoggerProvider::builder()
            .with_log(memory)
            .with_default_label(DefaultLabel::new(|s| format!("<{}>", s.shape()).into()))
            .build()
            .unwrap();
        let logger = provider.create_logger("c");

        let cx = logger.scope(&State::absent().with_shape("Startup"));
        assert_eq!(cx.scope().map(|s| s.label()), Some("<Startup>"));
        // not attached
        assert!(ScopeContext::current().scope().is_none());
    }

    #[test]
    fn suppressed_scope_returns_current_context() {
        let (_, logger) =
            setup(ProviderSettings::default().with_ignored_scopes(["HealthCheck"]));
        let _outer = logger.begin_scope(&State::value("outer"));

        let guard = logger.begin_scope(&State::value("x").with_shape("HealthCheck"));
        assert!(guard.is_noop());

        let cx = logger.scope(&State::absent().with_shape("HealthCheck"));
        assert_eq!(cx.scope().map(|s| s.labels()), Some(vec!["outer"]));
    }
}
