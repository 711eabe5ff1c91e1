use std::collections::HashSet;

/// Decides which scope payload shapes are never entered.
///
/// A shape is suppressed when it is one of the ignored identifiers, or when it
/// starts with one of the ignored prefixes ignoring case.
#[derive(Debug, Clone, Default)]
pub struct ScopeFilter {
    ignored: HashSet<String>,
    // Lowercased char by char, the same folding applied to shapes.
    prefixes: Vec<String>,
}

impl ScopeFilter {
    /// Creates a filter from exact identifiers and case-insensitive prefixes.
    pub fn new<I, P>(ignored: I, prefixes: P) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        ScopeFilter {
            ignored: ignored.into_iter().map(Into::into).collect(),
            prefixes: prefixes
                .into_iter()
                .map(|p| p.as_ref().chars().flat_map(char::to_lowercase).collect::<String>())
                .collect(),
        }
    }

    /// Returns `true` if nothing is ever suppressed.
    pub fn is_empty(&self) -> bool {
        self.ignored.is_empty() && self.prefixes.is_empty()
    }

    /// Returns `true` if scopes of the given shape must not be entered.
    pub fn should_suppress(&self, shape: &str) -> bool {
        self.ignored.contains(shape)
            || self
                .prefixes
                .iter()
                .any(|prefix| starts_with_ignore_case(shape, prefix))
    }
}

/// Compares without allocating; `lower_prefix` must already be lowercased.
fn starts_with_ignore_case(value: &str, lower_prefix: &str) -> bool {
    let mut value = value.chars().flat_map(char::to_lowercase);
    lower_prefix.chars().all(|p| value.next() == Some(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("RequestScope", true)]
    #[case("requestscope", false)]
    #[case("Internal.Hosting.Diagnostics", true)]
    #[case("internal.hosting", true)]
    #[case("INTERNAL.", true)]
    #[case("Internal", false)]
    #[case("Startup", false)]
    #[case("", false)]
    fn suppression(#[case] shape: &str, #[case] suppressed: bool) {
        let filter = ScopeFilter::new(["RequestScope"], ["Internal."]);
        assert_eq!(filter.should_suppress(shape), suppressed);
    }

    #[test]
    fn empty_filter_suppresses_nothing() {
        let filter = ScopeFilter::default();
        assert!(filter.is_empty());
        assert!(!filter.should_suppress("anything"));
    }

    #[test]
    fn prefix_comparison_is_unicode_aware() {
        let filter = ScopeFilter::new(Vec::<String>::new(), ["ÄRGER"]);
        assert!(filter.should_suppress("ärgerlich"));
        assert!(!filter.should_suppress("arger"));
    }

    #[test]
    fn final_sigma_folds_like_the_shape() {
        let filter = ScopeFilter::new(Vec::<String>::new(), ["ΟΔΟΣ"]);
        assert!(filter.should_suppress("ΟΔΟΣ.Scope"));
        assert!(filter.should_suppress("οδοσ.scope"));
    }

    #[test]
    fn empty_prefix_matches_everything() {
        let filter = ScopeFilter::new(Vec::<String>::new(), [""]);
        assert!(filter.should_suppress("x"));
    }
}
