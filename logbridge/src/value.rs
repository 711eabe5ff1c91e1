use std::borrow::{Borrow, Cow};
use std::fmt;
use std::sync::Arc;

/// The key part of a property, compared by exact bytes.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(Cow<'static, str>);

impl Key {
    /// Create a new `Key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use logbridge::Key;
    ///
    /// let key1 = Key::new("my_static_str");
    /// let key2 = Key::new(String::from("my_owned_string"));
    /// assert_ne!(key1, key2);
    /// ```
    pub fn new(value: impl Into<Key>) -> Self {
        value.into()
    }

    /// Create a new const `Key`.
    pub const fn from_static_str(value: &'static str) -> Self {
        Key(Cow::Borrowed(value))
    }

    /// Returns a reference to the underlying key name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Key {
    fn from(key_str: &'static str) -> Self {
        Key(Cow::Borrowed(key_str))
    }
}

impl From<String> for Key {
    fn from(string: String) -> Self {
        Key(Cow::Owned(string))
    }
}

impl From<Cow<'static, str>> for Key {
    fn from(string: Cow<'static, str>) -> Self {
        Key(string)
    }
}

impl From<Arc<str>> for Key {
    fn from(string: Arc<str>) -> Self {
        Key(Cow::Owned(string.to_string()))
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(fmt)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(fmt)
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Value types for representing arbitrary property values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integer value
    Int(i64),
    /// A double value
    Double(f64),
    /// A string value
    String(Cow<'static, str>),
    /// A boolean value
    Boolean(bool),
    /// An ordered list of values
    List(Vec<Value>),
    /// String keys to values, kept in insertion order.
    Map(Vec<(Key, Value)>),
}

impl Value {
    /// Returns the string slice if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts the value into a string without copying static or owned strings.
    pub fn into_string(self) -> Cow<'static, str> {
        match self {
            Value::String(s) => s,
            other => Cow::Owned(other.to_string()),
        }
    }
}

macro_rules! impl_trivial_from {
    ($t:ty, $variant:path) => {
        impl From<$t> for Value {
            fn from(val: $t) -> Value {
                $variant(val.into())
            }
        }
    };
}

impl_trivial_from!(i8, Value::Int);
impl_trivial_from!(i16, Value::Int);
impl_trivial_from!(i32, Value::Int);
impl_trivial_from!(i64, Value::Int);

impl_trivial_from!(u8, Value::Int);
impl_trivial_from!(u16, Value::Int);
impl_trivial_from!(u32, Value::Int);

impl_trivial_from!(f64, Value::Double);
impl_trivial_from!(f32, Value::Double);

impl_trivial_from!(String, Value::String);
impl_trivial_from!(Cow<'static, str>, Value::String);
impl_trivial_from!(&'static str, Value::String);

impl_trivial_from!(bool, Value::Boolean);

impl<T: Into<Value>> FromIterator<T> for Value {
    /// Creates a [`Value::List`] from a sequence of `Into<Value>` values.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => v.fmt(f),
            Value::Double(v) => v.fmt(f),
            Value::String(v) => f.write_str(v),
            Value::Boolean(v) => v.fmt(f),
            Value::List(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    v.fmt(f)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => fmt_pairs(f, entries.iter().map(|(k, v)| (k, v))),
        }
    }
}

/// Writes pairs as `{ k1 = v1, k2 = v2 }`.
pub(crate) fn fmt_pairs<'a>(
    f: &mut fmt::Formatter<'_>,
    pairs: impl Iterator<Item = (&'a Key, &'a Value)>,
) -> fmt::Result {
    f.write_str("{")?;
    let mut empty = true;
    for (i, (k, v)) in pairs.enumerate() {
        f.write_str(if i > 0 { ", " } else { " " })?;
        write!(f, "{k} = {v}")?;
        empty = false;
    }
    f.write_str(if empty { "}" } else { " }" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_nested_values() {
        let value = Value::Map(vec![
            (Key::new("id"), Value::from(1)),
            (Key::new("tags"), Value::from_iter(["a", "b"])),
        ]);
        assert_eq!(value.to_string(), "{ id = 1, tags = [a, b] }");
        assert_eq!(Value::Map(Vec::new()).to_string(), "{}");
    }

    #[test]
    fn into_string_keeps_strings_and_renders_the_rest() {
        assert_eq!(Value::from("static").into_string(), "static");
        assert_eq!(Value::from(true).into_string(), "true");
        assert_eq!(Value::from(2.5).into_string(), "2.5");
    }

    #[test]
    fn keys_compare_ordinally() {
        assert_ne!(Key::new("Name"), Key::new("name"));
        assert_eq!(Key::new("name"), Key::new(String::from("name")));
    }
}
