//! Errors raised by the bridge.
use thiserror::Error;

/// A boxed error produced by caller-supplied code such as message formatters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Describe the result of fallible bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Error, Debug)]
#[non_exhaustive]
/// Errors returned by the bridge.
pub enum BridgeError {
    /// A provider was built without a destination to write records to.
    #[error("no destination log was configured for the logger provider")]
    MissingDestination,

    /// A numeric level does not correspond to any known level.
    ///
    /// This indicates an out-of-range enumerant in the caller and is never
    /// coerced to a default level.
    #[error("unrecognized log level value {value}")]
    UnrecognizedLevel {
        /// The offending raw value.
        value: u8,
    },

    /// A level name does not correspond to any known level.
    #[error("unrecognized log level name {0:?}")]
    UnrecognizedLevelName(String),

    /// The formatter supplied with a log call failed. Nothing was written.
    #[error("message formatter failed")]
    Formatter(#[source] BoxError),
}
