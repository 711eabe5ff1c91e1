//! Call-site payloads of log and scope calls.
use crate::error::BoxError;
use crate::value::{fmt_pairs, Key, Value};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// The reserved property key carrying the unformatted message template.
///
/// It is extracted into the record's template and never copied into properties.
pub const ORIGINAL_FORMAT_KEY: &str = "{OriginalFormat}";

/// An opaque error attached to a log call.
pub type Exception = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// A caller-supplied function turning a payload into a message template.
///
/// Errors are returned to the caller of the log call, never swallowed.
pub type Formatter = dyn Fn(&State, Option<&Exception>) -> Result<String, BoxError> + Send + Sync;

/// Shape identifier of payloads created with [`State::absent`].
pub const ABSENT_SHAPE: &str = "absent";
/// Shape identifier of payloads created with [`State::value`].
pub const VALUE_SHAPE: &str = "value";
/// Shape identifier of payloads created with [`State::properties`] and friends.
pub const PROPERTIES_SHAPE: &str = "properties";

/// The content of a payload, decided once at the API boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No payload at all.
    Absent,
    /// A plain value, rendered with its display form.
    Value(Value),
    /// A sequence of key/value pairs, possibly carrying [`ORIGINAL_FORMAT_KEY`].
    Properties(Vec<(Key, Value)>),
}

/// The payload of a log or scope call together with its shape identifier.
///
/// The shape stands in for the payload's declared type: scope filters match on
/// it, and it is the default label of absent payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    shape: Cow<'static, str>,
    payload: Payload,
}

impl State {
    /// A payload with no content.
    pub fn absent() -> Self {
        State {
            shape: Cow::Borrowed(ABSENT_SHAPE),
            payload: Payload::Absent,
        }
    }

    /// A plain value payload.
    pub fn value(value: impl Into<Value>) -> Self {
        State {
            shape: Cow::Borrowed(VALUE_SHAPE),
            payload: Payload::Value(value.into()),
        }
    }

    /// A key/value sequence payload.
    pub fn properties<K, V>(properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
    {
        State {
            shape: Cow::Borrowed(PROPERTIES_SHAPE),
            payload: Payload::Properties(
                properties
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// A template with no arguments.
    pub fn message(template: impl Into<Cow<'static, str>>) -> Self {
        State::template(template, std::iter::empty::<(Key, Value)>())
    }

    /// A template followed by its named or positional arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use logbridge::{State, ORIGINAL_FORMAT_KEY};
    ///
    /// let state = State::template("user {user} signed in", [("user", "alice")]);
    /// assert_eq!(state.get(ORIGINAL_FORMAT_KEY).and_then(|v| v.as_str()), Some("user {user} signed in"));
    /// ```
    pub fn template<K, V>(
        template: impl Into<Cow<'static, str>>,
        args: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
    {
        let args = args.into_iter();
        let mut pairs = Vec::with_capacity(1 + args.size_hint().0);
        pairs.push((
            Key::from_static_str(ORIGINAL_FORMAT_KEY),
            Value::String(template.into()),
        ));
        pairs.extend(args.map(|(k, v)| (k.into(), v.into())));
        State {
            shape: Cow::Borrowed(PROPERTIES_SHAPE),
            payload: Payload::Properties(pairs),
        }
    }

    /// Replaces the shape identifier.
    pub fn with_shape(mut self, shape: impl Into<Cow<'static, str>>) -> Self {
        self.shape = shape.into();
        self
    }

    /// The shape identifier.
    pub fn shape(&self) -> &str {
        &self.shape
    }

    /// The payload content.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns `true` for [`Payload::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self.payload, Payload::Absent)
    }

    /// Looks up a pair of a [`Payload::Properties`] payload, marker key included.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match &self.payload {
            Payload::Properties(pairs) => pairs
                .iter()
                .find(|(k, _)| k.as_str() == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// The unformatted template, if the payload carries the marker key.
    pub fn original_format(&self) -> Option<&Value> {
        self.get(ORIGINAL_FORMAT_KEY)
    }

    /// Iterates over the pairs of the payload except the marker key.
    pub fn properties_iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        let pairs: &[(Key, Value)] = match &self.payload {
            Payload::Properties(pairs) => pairs.as_slice(),
            _ => &[],
        };
        pairs
            .iter()
            .filter(|(k, _)| k.as_str() != ORIGINAL_FORMAT_KEY)
            .map(|(k, v)| (k, v))
    }
}

/// Renders the payload the way it reads as a scope label: a plain value with its
/// display form, a template payload as its unformatted template, and any other
/// pair sequence as `{ k = v }`. Absent payloads render as their shape.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Absent => f.write_str(&self.shape),
            Payload::Value(value) => value.fmt(f),
            Payload::Properties(pairs) => match self.original_format() {
                Some(template) => template.fmt(f),
                None => fmt_pairs(f, pairs.iter().map(|(k, v)| (k, v))),
            },
        }
    }
}

/// An optional numeric code and name identifying a single log call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventId {
    id: i32,
    name: Option<Cow<'static, str>>,
}

impl EventId {
    /// The "no event" identifier: id zero and no name.
    pub const NONE: EventId = EventId { id: 0, name: None };

    /// Create an identifier with a code and a name.
    pub fn new(id: i32, name: impl Into<Cow<'static, str>>) -> Self {
        EventId {
            id,
            name: Some(name.into()),
        }
    }

    /// The numeric code.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// The name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl From<i32> for EventId {
    fn from(id: i32) -> Self {
        EventId { id, name: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_puts_marker_first_and_skips_it_in_properties() {
        let state = State::template("m {p1}", [("p1", "v")]);
        assert_eq!(state.shape(), PROPERTIES_SHAPE);
        assert_eq!(state.original_format(), Some(&Value::from("m {p1}")));
        let props: Vec<_> = state.properties_iter().collect();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].0.as_str(), "p1");
        assert_eq!(state.properties_iter().count(), 1);
    }

    #[test]
    fn display_follows_payload_variant() {
        assert_eq!(State::value("s1").to_string(), "s1");
        assert_eq!(
            State::properties([("id", 1), ("name", 2)]).to_string(),
            "{ id = 1, name = 2 }"
        );
        assert_eq!(State::message("hello {who}").to_string(), "hello {who}");
        assert_eq!(State::absent().with_shape("RequestScope").to_string(), "RequestScope");
    }

    #[test]
    fn event_id_defaults_to_none() {
        assert_eq!(EventId::default(), EventId::NONE);
        assert_eq!(EventId::from(5).name(), None);
        assert_eq!(EventId::new(7, "started").name(), Some("started"));
    }
}
