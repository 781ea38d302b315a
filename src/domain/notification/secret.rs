//! Credential wrapper that never prints its value

use std::fmt;

/// A credential value (bot token, chat id).
///
/// `Debug` and `Display` only reveal whether a value is present.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the raw value. Only transports may call this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display-safe indicator
    pub fn indicator(&self) -> &'static str {
        if self.0.is_empty() {
            "<not set>"
        } else {
            "<provided>"
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", self.indicator())
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.indicator())
    }
}
