use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps a passenger-identifying value so that `Debug`/`Display` never print it.
///
/// Only the first character survives formatting, which keeps log lines
/// correlatable ("A*******") without leaking the full name. Serialization is
/// transparent because API responses must carry the real value.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> Masked<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn as_inner(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: fmt::Display> Masked<T> {
    fn redacted(&self) -> String {
        let shown = self.0.to_string();
        match shown.chars().next() {
            Some(first) => format!("{}*******", first),
            None => String::new(),
        }
    }
}

impl<T: fmt::Display> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Masked({})", self.redacted())
    }
}

impl<T: fmt::Display> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl From<String> for Masked<String> {
    fn from(value: String) -> Self {
        Self(value)
    }
}
