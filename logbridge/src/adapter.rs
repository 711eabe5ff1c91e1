use crate::bridge_error;
use crate::error::BoxError;
use crate::host::HostLogger;
use crate::level::Level;
use crate::log::{Log, SourceContextLog};
use crate::record::LogRecord;
use crate::state::{EventId, Exception, State, ORIGINAL_FORMAT_KEY};
use crate::value::{Key, Value};
use std::fmt;
use std::sync::Arc;

/// Shape identifier of payloads produced by [`HostLog`].
pub const LOG_RECORD_SHAPE: &str = "log_record";

/// A native [`Log`] that writes to a host logger.
///
/// Each record becomes a pair payload holding [`ORIGINAL_FORMAT_KEY`] with the
/// unrendered template, followed by the record's properties. The formatter
/// handed to the host returns the template as is, the event identifier is
/// [`EventId::NONE`] and the record's exception is passed through.
///
/// Host failures cannot be returned from [`Log::log`]; they are reported as
/// internal diagnostics.
pub struct HostLog<L> {
    logger: L,
}

impl<L: HostLogger> HostLog<L> {
    /// Wraps a host logger.
    pub fn new(logger: L) -> Self {
        HostLog { logger }
    }

    /// The wrapped logger.
    pub fn logger(&self) -> &L {
        &self.logger
    }
}

fn template_formatter(state: &State, _: Option<&Exception>) -> Result<String, BoxError> {
    Ok(state
        .original_format()
        .map(|template| template.to_string())
        .unwrap_or_default())
}

impl<L: HostLogger + 'static> Log for HostLog<L> {
    fn log(&self, record: &LogRecord) {
        if !self.is_enabled_for(record.level()) {
            return;
        }

        let pairs = std::iter::once((
            Key::from_static_str(ORIGINAL_FORMAT_KEY),
            Value::from(record.message_template().to_owned()),
        ))
        .chain(record.properties().iter().map(|(k, v)| (k.clone(), v.clone())));
        let state = State::properties(pairs).with_shape(LOG_RECORD_SHAPE);

        if let Err(err) = self.logger.log(
            record.level().to_host(),
            &EventId::NONE,
            &state,
            record.exception(),
            Some(&template_formatter),
        ) {
            bridge_error!(
                name: "HostLog.WriteFailed",
                level = record.level().name(),
                error = format!("{err}")
            );
        }
    }

    fn is_enabled_for(&self, level: Level) -> bool {
        self.logger.is_enabled(level.to_host())
    }

    fn for_context(self: Arc<Self>, context: &str) -> Arc<dyn Log> {
        Arc::new(SourceContextLog::new(self, context))
    }
}

impl<L> fmt::Debug for HostLog<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostLog")
            .field("logger", &std::any::type_name::<L>())
            .finish()
    }
}
