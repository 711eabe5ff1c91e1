//! The host, category-oriented logging interface.
use crate::error::BridgeResult;
use crate::level::HostLevel;
use crate::scope::ScopeGuard;
use crate::state::{EventId, Exception, Formatter, State};

/// A logger of the host abstraction.
///
/// Calls carry an event identifier, a [`State`] payload, an optional exception
/// and an optional formatter turning the payload into a message.
pub trait HostLogger: Send + Sync {
    /// Logs one event.
    ///
    /// Returns an error only when the formatter fails; nothing is written in
    /// that case.
    fn log(
        &self,
        level: HostLevel,
        event_id: &EventId,
        state: &State,
        exception: Option<&Exception>,
        formatter: Option<&Formatter>,
    ) -> BridgeResult<()>;

    /// Returns `true` if events of `level` would be written.
    fn is_enabled(&self, level: HostLevel) -> bool;

    /// Enters a scope described by `state` on the current thread.
    ///
    /// The scope lasts until the returned guard is dropped.
    fn begin_scope(&self, state: &State) -> ScopeGuard;
}
