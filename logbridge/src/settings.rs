use crate::filter::ScopeFilter;
use crate::level::Level;

/// Property key that carries scope labels when
/// [`ProviderSettings::include_scope_labels`] is set.
pub const SCOPE_PROPERTY: &str = "Scope";

/// Configuration of a [`NativeLoggerProvider`](crate::NativeLoggerProvider).
///
/// # Examples
///
/// ```
/// use logbridge::{Level, ProviderSettings};
///
/// let settings = ProviderSettings::default()
///     .with_ignored_scope_prefixes(["Internal."])
///     .with_minimum_level(Level::Info);
/// assert_eq!(settings.minimum_level, Some(Level::Info));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(default, rename_all = "snake_case"))]
pub struct ProviderSettings {
    /// Scope shapes that are never entered.
    pub ignored_scopes: Vec<String>,
    /// Case-insensitive prefixes of scope shapes that are never entered.
    pub ignored_scope_prefixes: Vec<String>,
    /// Adds `EventId` and `EventName` properties to records, never replacing
    /// properties of the same name.
    pub add_event_id_properties: bool,
    /// Levels below this are disabled regardless of the destination. `None`
    /// defers entirely to the destination.
    pub minimum_level: Option<Level>,
    /// Adds a [`SCOPE_PROPERTY`] to each entered scope: its label at the top
    /// level, the labels of the whole chain (outermost first) when nested.
    pub include_scope_labels: bool,
}

impl ProviderSettings {
    /// Sets the exact scope shapes to suppress.
    pub fn with_ignored_scopes<I>(mut self, scopes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.ignored_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the scope shape prefixes to suppress.
    pub fn with_ignored_scope_prefixes<I>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.ignored_scope_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables event identifier properties.
    pub fn with_event_id_properties(mut self, enabled: bool) -> Self {
        self.add_event_id_properties = enabled;
        self
    }

    /// Sets the minimum enabled level.
    pub fn with_minimum_level(mut self, level: impl Into<Option<Level>>) -> Self {
        self.minimum_level = level.into();
        self
    }

    /// Enables or disables the [`SCOPE_PROPERTY`] on entered scopes.
    pub fn with_scope_labels(mut self, enabled: bool) -> Self {
        self.include_scope_labels = enabled;
        self
    }

    pub(crate) fn scope_filter(&self) -> ScopeFilter {
        ScopeFilter::new(
            self.ignored_scopes.iter().cloned(),
            &self.ignored_scope_prefixes,
        )
    }
}

#[cfg(all(test, feature = "with-serde"))]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_settings() {
        let settings: ProviderSettings = serde_json::from_str(
            r#"{ "ignored_scope_prefixes": ["Internal."], "minimum_level": "Warn" }"#,
        )
        .unwrap();
        assert_eq!(settings.ignored_scope_prefixes, ["Internal."]);
        assert_eq!(settings.minimum_level, Some(Level::Warn));
        assert!(!settings.add_event_id_properties);
        assert!(!settings.include_scope_labels);
    }
}
