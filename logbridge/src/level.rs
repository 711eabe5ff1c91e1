//! Severity levels of both logging abstractions and the mapping between them.
//!
//! The host side distinguishes `Trace` from `Debug`, the native side does not, so
//! translating host to native is many-to-one and no round trip is promised. The
//! mapping is monotonic in both directions: a more severe level always maps to a
//! level at least as severe.
use crate::error::BridgeError;
use std::fmt;
use std::str::FromStr;

/// Level of the native, record-oriented abstraction.
///
/// The native side has no "disabled" enumerant; where a level may be switched
/// off entirely (`minimum_level`, for example) an `Option<Level>` is used and
/// `None` plays that role.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "with-serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Level {
    /// DEBUG
    Debug = 0,
    /// INFO
    Info = 1,
    /// WARN
    Warn = 2,
    /// ERROR
    Error = 3,
    /// FATAL
    Fatal = 4,
}

impl Level {
    /// Return the short upper-case name of the level.
    pub const fn name(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// Translate to the host abstraction.
    pub const fn to_host(self) -> HostLevel {
        match self {
            Level::Debug => HostLevel::Debug,
            Level::Info => HostLevel::Information,
            Level::Warn => HostLevel::Warning,
            Level::Error => HostLevel::Error,
            Level::Fatal => HostLevel::Critical,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Level {
    type Error = BridgeError;

    fn try_from(value: u8) -> Result<Self, BridgeError> {
        match value {
            0 => Ok(Level::Debug),
            1 => Ok(Level::Info),
            2 => Ok(Level::Warn),
            3 => Ok(Level::Error),
            4 => Ok(Level::Fatal),
            _ => Err(BridgeError::UnrecognizedLevel { value }),
        }
    }
}

impl FromStr for Level {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Level::Debug,
            Level::Info,
            Level::Warn,
            Level::Error,
            Level::Fatal,
        ]
        .into_iter()
        .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| BridgeError::UnrecognizedLevelName(s.to_owned()))
    }
}

/// Level of the host, category-oriented abstraction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub enum HostLevel {
    /// Most verbose diagnostics.
    Trace = 0,
    /// Debugging diagnostics.
    Debug = 1,
    /// General flow of the application.
    Information = 2,
    /// Abnormal or unexpected events.
    Warning = 3,
    /// Failures of the current operation.
    Error = 4,
    /// Unrecoverable failures.
    Critical = 5,
    /// Suppresses everything. Never translated, never recorded.
    None = 6,
}

impl HostLevel {
    /// Translate to the native abstraction.
    ///
    /// Returns `None` for [`HostLevel::None`]; callers must short-circuit
    /// before building any record in that case.
    pub const fn to_native(self) -> Option<Level> {
        match self {
            HostLevel::Trace | HostLevel::Debug => Some(Level::Debug),
            HostLevel::Information => Some(Level::Info),
            HostLevel::Warning => Some(Level::Warn),
            HostLevel::Error => Some(Level::Error),
            HostLevel::Critical => Some(Level::Fatal),
            HostLevel::None => None,
        }
    }

    /// Return the name of the level.
    pub const fn name(&self) -> &'static str {
        match self {
            HostLevel::Trace => "Trace",
            HostLevel::Debug => "Debug",
            HostLevel::Information => "Information",
            HostLevel::Warning => "Warning",
            HostLevel::Error => "Error",
            HostLevel::Critical => "Critical",
            HostLevel::None => "None",
        }
    }
}

impl fmt::Display for HostLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for HostLevel {
    type Error = BridgeError;

    fn try_from(value: u8) -> Result<Self, BridgeError> {
        match value {
            0 => Ok(HostLevel::Trace),
            1 => Ok(HostLevel::Debug),
            2 => Ok(HostLevel::Information),
            3 => Ok(HostLevel::Warning),
            4 => Ok(HostLevel::Error),
            5 => Ok(HostLevel::Critical),
            6 => Ok(HostLevel::None),
            _ => Err(BridgeError::UnrecognizedLevel { value }),
        }
    }
}
