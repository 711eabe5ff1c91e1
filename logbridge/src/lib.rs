//! A bridge between two structured-logging abstractions.
//!
//! The *host* side is category oriented: loggers created per category receive
//! a level, an [`EventId`], a [`State`] payload, an optional exception and an
//! optional formatter, and can enter scopes. The *native* side is record
//! oriented: a [`Log`] receives finished [`LogRecord`]s.
//!
//! [`NativeLoggerProvider`] lets code written against the host interface write
//! to any native [`Log`]; [`HostLog`] goes the other way. In between sit the
//! pieces that make the translation faithful:
//!
//! * level translation ([`HostLevel::to_native`], [`Level::to_host`]),
//! * template and property extraction from payloads ([`extract`]),
//! * ambient scopes that follow the logical call chain ([`ScopeContext`]),
//! * record assembly with a fixed property precedence ([`RecordBuilder`]),
//! * suppression of unwanted scopes ([`ScopeFilter`]).
//!
//! # Getting started
//!
//! ```
//! use logbridge::testing::MemoryLog;
//! use logbridge::{EventId, HostLevel, HostLogger, NativeLoggerProvider, State, Value};
//! use std::sync::Arc;
//!
//! let log = Arc::new(MemoryLog::new());
//! let provider = NativeLoggerProvider::new(log.clone());
//! let logger = provider.create_logger("");
//!
//! {
//!     let _scope = logger.begin_scope(&State::properties([("request_id", 17)]));
//!     let state = State::template("user {user} signed in", [("user", "alice")]);
//!     logger.log(HostLevel::Warning, &EventId::NONE, &state, None, None).unwrap();
//! }
//!
//! let record = &log.records()[0];
//! assert_eq!(record.message_template(), "user {user} signed in");
//! assert_eq!(record.properties().get("request_id"), Some(&Value::Int(17)));
//! assert_eq!(record.properties().get("user"), Some(&Value::from("alice")));
//! ```
//!
//! # Scopes across tasks and threads
//!
//! Scopes entered with [`HostLogger::begin_scope`] are current on the calling
//! thread only. To continue a logical call chain elsewhere, carry the context
//! along: wrap futures with [`FutureScopeExt::with_current_scope`], or capture
//! [`ScopeContext::current`] and [`run`](ScopeContext::run) it on the other
//! thread. Scopes entered after the hand-off are invisible to the sender.
//!
//! # Crate Feature Flags
//!
//! * `futures` (default): [`FutureScopeExt`] and the stream counterpart.
//! * `internal-logs` (default): diagnostics about the bridge itself are emitted
//!   as `tracing` events.
//! * `with-serde`: `serde::Deserialize` for [`ProviderSettings`].
//! * `testing`: in-memory doubles of both abstractions in [`testing`].
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(
    docsrs,
    feature(doc_cfg, doc_auto_cfg),
    deny(rustdoc::broken_intra_doc_links)
)]

mod internal_logging;

mod adapter;
mod error;
pub mod extract;
mod filter;
mod host;
mod level;
mod log;
mod properties;
mod provider;
mod record;
pub mod scope;
mod settings;
mod state;
mod value;

#[cfg(any(feature = "testing", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "testing")))]
pub mod testing;

pub use adapter::{HostLog, LOG_RECORD_SHAPE};
pub use error::{BoxError, BridgeError, BridgeResult};
pub use extract::DefaultLabel;
pub use filter::ScopeFilter;
pub use host::HostLogger;
pub use level::{HostLevel, Level};
pub use log::{Log, MinimumLevelLog, SourceContextLog, SOURCE_CONTEXT_PROPERTY};
pub use properties::{Precedence, PropertyBag};
pub use provider::{BridgeLogger, NativeLoggerProvider, NativeLoggerProviderBuilder};
pub use record::{LogRecord, RecordBuilder, EVENT_ID_PROPERTY, EVENT_NAME_PROPERTY};
#[cfg(feature = "futures")]
pub use scope::FutureScopeExt;
pub use scope::{Scope, ScopeContext, ScopeGuard};
pub use settings::{ProviderSettings, SCOPE_PROPERTY};
pub use state::{
    EventId, Exception, Formatter, Payload, State, ABSENT_SHAPE, ORIGINAL_FORMAT_KEY,
    PROPERTIES_SHAPE, VALUE_SHAPE,
};
pub use value::{Key, Value};

#[doc(hidden)]
#[cfg(feature = "internal-logs")]
pub mod _private {
    pub use tracing::{debug, error, info, warn};
}
