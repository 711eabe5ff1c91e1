//! Derives message templates and labels from call-site payloads.
use crate::error::{BridgeError, BridgeResult};
use crate::state::{Exception, Formatter, Payload, State};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Produces the label of a payload that has nothing to render.
///
/// The default returns the payload's shape identifier. Replace it with
/// [`NativeLoggerProviderBuilder::with_default_label`] when shapes are not
/// meaningful to readers.
///
/// [`NativeLoggerProviderBuilder::with_default_label`]: crate::NativeLoggerProviderBuilder::with_default_label
#[derive(Clone)]
pub struct DefaultLabel(Arc<dyn Fn(&State) -> Cow<'static, str> + Send + Sync>);

impl DefaultLabel {
    /// Wraps a labelling function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&State) -> Cow<'static, str> + Send + Sync + 'static,
    {
        DefaultLabel(Arc::new(f))
    }

    /// Applies the function.
    pub fn label(&self, state: &State) -> Cow<'static, str> {
        (self.0)(state)
    }
}

impl Default for DefaultLabel {
    fn default() -> Self {
        DefaultLabel::new(|state| Cow::Owned(state.shape().to_owned()))
    }
}

impl fmt::Debug for DefaultLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultLabel")
    }
}

/// Extracts the message template of a log call.
///
/// In order: the marker key of a pair payload, then the formatter, then the
/// payload's own rendering (absent payloads use `default_label`).
pub fn message_template(
    state: &State,
    exception: Option<&Exception>,
    formatter: Option<&Formatter>,
    default_label: &DefaultLabel,
) -> BridgeResult<Cow<'static, str>> {
    if let Some(template) = state.original_format() {
        return Ok(template.clone().into_string());
    }
    if let Some(formatter) = formatter {
        return formatter(state, exception)
            .map(Cow::Owned)
            .map_err(BridgeError::Formatter);
    }
    Ok(label(state, default_label))
}

/// Derives the human-readable label of a scope payload.
pub fn label(state: &State, default_label: &DefaultLabel) -> Cow<'static, str> {
    match state.payload() {
        Payload::Absent => default_label.label(state),
        Payload::Value(value) => value.clone().into_string(),
        Payload::Properties(_) => Cow::Owned(state.to_string()),
    }
}
