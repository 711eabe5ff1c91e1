use crate::level::Level;
use crate::properties::PropertyBag;
use crate::scope::Scope;
use crate::state::{EventId, Exception};
use crate::value::{Key, Value};
use chrono::{DateTime, FixedOffset, Local};
use std::borrow::Cow;
use std::fmt;

/// Property key holding the numeric event code.
pub const EVENT_ID_PROPERTY: &str = "EventId";
/// Property key holding the event name.
pub const EVENT_NAME_PROPERTY: &str = "EventName";

/// The normalized unit written to a native [`Log`](crate::Log).
///
/// Records are immutable: the `with_*` helpers return a new record and leave
/// the original, and any storage it shares, untouched.
#[derive(Clone)]
pub struct LogRecord {
    level: Level,
    timestamp: DateTime<FixedOffset>,
    message_template: Cow<'static, str>,
    properties: PropertyBag,
    exception: Option<Exception>,
}

impl LogRecord {
    /// Creates a record timestamped now, with no properties.
    pub fn new(level: Level, message_template: impl Into<Cow<'static, str>>) -> Self {
        RecordBuilder::new(level, message_template).build()
    }

    /// Severity.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Creation time, in the local offset.
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// The unrendered message template.
    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    /// Properties of the record.
    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    /// The attached error, if any.
    pub fn exception(&self) -> Option<&Exception> {
        self.exception.as_ref()
    }

    /// Returns a copy with `key` set to `value`, replacing any existing value.
    pub fn with_property(&self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        let mut record = self.clone();
        record.properties.overwrite(key, value);
        record
    }

    /// Returns a copy with `key` set to `value` unless it is already present.
    pub fn with_property_if_absent(&self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        let mut record = self.clone();
        record.properties.set_if_absent(key, value);
        record
    }

    /// Returns a copy with the given exception.
    pub fn with_exception(&self, exception: Exception) -> Self {
        let mut record = self.clone();
        record.exception = Some(exception);
        record
    }

    /// Returns a copy with the given timestamp.
    pub fn with_timestamp(&self, timestamp: DateTime<FixedOffset>) -> Self {
        let mut record = self.clone();
        record.timestamp = timestamp;
        record
    }
}

impl fmt::Debug for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogRecord")
            .field("level", &self.level)
            .field("timestamp", &self.timestamp)
            .field("message_template", &self.message_template)
            .field("properties", &self.properties)
            .field("exception", &self.exception.as_ref().map(|e| e.to_string()))
            .finish()
    }
}

/// Composes a [`LogRecord`] from the pieces of a log call.
///
/// Properties are layered from lowest to highest precedence: the active scope's
/// properties ([`with_scope`]), then call-site properties which overwrite them
/// ([`with_properties`]), then event identifiers which never overwrite
/// ([`with_event_id`]). Call the methods in that order.
///
/// [`with_scope`]: RecordBuilder::with_scope
/// [`with_properties`]: RecordBuilder::with_properties
/// [`with_event_id`]: RecordBuilder::with_event_id
#[derive(Debug)]
pub struct RecordBuilder {
    record: LogRecord,
}

impl RecordBuilder {
    /// Starts a record; the timestamp is taken here.
    pub fn new(level: Level, message_template: impl Into<Cow<'static, str>>) -> Self {
        RecordBuilder {
            record: LogRecord {
                level,
                timestamp: Local::now().fixed_offset(),
                message_template: message_template.into(),
                properties: PropertyBag::new(),
                exception: None,
            },
        }
    }

    /// Inherits the properties of `scope`, if any. Shares the scope's storage
    /// until a later step writes.
    pub fn with_scope(mut self, scope: Option<&Scope>) -> Self {
        if let Some(scope) = scope {
            self.record.properties = scope.properties().clone();
        }
        self
    }

    /// Adds call-site properties, overwriting inherited ones on collision.
    pub fn with_properties<'a>(
        mut self,
        properties: impl IntoIterator<Item = (&'a Key, &'a Value)>,
    ) -> Self {
        let properties = properties.into_iter();
        self.record.properties.reserve(properties.size_hint().0);
        for (key, value) in properties {
            self.record.properties.overwrite(key.clone(), value.clone());
        }
        self
    }

    /// Adds [`EVENT_ID_PROPERTY`] when the code is non-zero and
    /// [`EVENT_NAME_PROPERTY`] when the name is non-empty, never replacing
    /// existing properties of the same name.
    pub fn with_event_id(mut self, event_id: &EventId) -> Self {
        if event_id.id() != 0 {
            self.record
                .properties
                .set_if_absent(EVENT_ID_PROPERTY, event_id.id());
        }
        if let Some(name) = event_id.name().filter(|n| !n.is_empty()) {
            self.record
                .properties
                .set_if_absent(EVENT_NAME_PROPERTY, name.to_owned());
        }
        self
    }

    /// Attaches an exception.
    pub fn with_exception(mut self, exception: Option<&Exception>) -> Self {
        self.record.exception = exception.cloned();
        self
    }

    /// Finishes the record.
    pub fn build(self) -> LogRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeContext;
    use crate::State;

    #[test]
    fn call_site_properties_overwrite_scope_properties() {
        let cx = ScopeContext::new().with_scope("s", [("k", 1), ("scoped", 1)].into_iter().collect());
        let call = State::template("m", [("k", 2)]);

        let record = RecordBuilder::new(Level::Info, "m")
            .with_scope(cx.scope())
            .with_properties(call.properties_iter())
            .build();

        assert_eq!(record.properties().get("k"), Some(&Value::Int(2)));
        assert_eq!(record.properties().get("scoped"), Some(&Value::Int(1)));
        // the scope itself is unaffected
        assert_eq!(
            cx.scope().unwrap().properties().get("k"),
            Some(&Value::Int(1))
        );
    }

    #[test]
    fn event_id_never_overwrites() {
        let call = State::template("m", [(EVENT_ID_PROPERTY, "user value")]);
        let record = RecordBuilder::new(Level::Warn, "m")
            .with_properties(call.properties_iter())
            .with_event_id(&EventId::new(42, "name"))
            .build();

        assert_eq!(
            record.properties().get(EVENT_ID_PROPERTY),
            Some(&Value::from("user value"))
        );
        assert_eq!(
            record.properties().get(EVENT_NAME_PROPERTY),
            Some(&Value::from("name"))
        );
    }

    #[test]
    fn event_id_conditions_are_independent() {
        let only_id = RecordBuilder::new(Level::Info, "m")
            .with_event_id(&EventId::from(3))
            .build();
        assert_eq!(only_id.properties().get(EVENT_ID_PROPERTY), Some(&Value::Int(3)));
        assert_eq!(only_id.properties().get(EVENT_NAME_PROPERTY), None);

        let only_name = RecordBuilder::new(Level::Info, "m")
            .with_event_id(&EventId::new(0, "named"))
            .build();
        assert_eq!(only_name.properties().get(EVENT_ID_PROPERTY), None);
        assert_eq!(
            only_name.properties().get(EVENT_NAME_PROPERTY),
            Some(&Value::from("named"))
        );

        let none = RecordBuilder::new(Level::Info, "m")
            .with_event_id(&EventId::new(0, ""))
            .build();
        assert!(!none.properties().is_allocated());
    }

    #[test]
    fn record_without_properties_does_not_allocate() {
        let record = RecordBuilder::new(Level::Debug, "plain")
            .with_scope(None)
            .with_properties(State::message("plain").properties_iter())
            .build();
        assert!(!record.properties().is_allocated());
        assert_eq!(record.message_template(), "plain");
    }

    #[test]
    fn with_property_leaves_original_untouched() {
        let record = LogRecord::new(Level::Info, "m").with_property("a", 1);
        let extended = record.with_property("b", 2);
        assert_eq!(record.properties().len(), 1);
        assert_eq!(extended.properties().len(), 2);
        let kept = extended.with_property_if_absent("a", 5);
        assert_eq!(kept.properties().get("a"), Some(&Value::Int(1)));
    }

    #[test]
    fn timestamp_is_taken_at_creation() {
        let before = Local::now().fixed_offset();
        let record = LogRecord::new(Level::Info, "m");
        let after = Local::now().fixed_offset();
        assert!(before <= record.timestamp() && record.timestamp() <= after);
    }
}
