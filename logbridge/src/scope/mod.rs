//! Ambient logging scopes.
//!
//! A [`ScopeContext`] is an immutable snapshot of the innermost active
//! [`Scope`]. Attaching a context makes it current on this thread until the
//! returned [`ScopeGuard`] is dropped. Work that continues elsewhere carries the
//! snapshot explicitly: futures and streams through [`FutureScopeExt`] and
//! [`StreamScopeExt`], threads by capturing [`ScopeContext::current`] and
//! attaching it in the child. Children see the scopes active at the fork point;
//! scopes they enter afterwards stay invisible to their siblings and to the
//! parent.
use crate::{bridge_debug, bridge_warn};
use crate::properties::{Precedence, PropertyBag};
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

#[cfg(feature = "futures")]
mod future_ext;

#[cfg(feature = "futures")]
pub use future_ext::{FutureScopeExt, StreamScopeExt, WithScope};

thread_local! {
    static CURRENT_SCOPE: RefCell<ScopeStack> = RefCell::new(ScopeStack::default());
}

/// One nesting level of ambient logging context.
///
/// A scope's properties are those of its parent extended with its own, so the
/// innermost scope always carries the full inherited set.
pub struct Scope {
    label: Cow<'static, str>,
    properties: PropertyBag,
    parent: Option<Arc<Scope>>,
}

impl Scope {
    /// The human-readable label of this scope alone.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Properties of this scope including those inherited from its ancestors.
    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    /// The enclosing scope, if any.
    pub fn parent(&self) -> Option<&Scope> {
        self.parent.as_deref()
    }

    /// Labels of the whole chain, outermost first.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels = Vec::with_capacity(self.depth());
        let mut scope = Some(self);
        while let Some(s) = scope {
            labels.push(s.label());
            scope = s.parent();
        }
        labels.reverse();
        labels
    }

    /// Number of scopes in the chain, this one included.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = Some(self);
        while let Some(s) = scope {
            depth += 1;
            scope = s.parent();
        }
        depth
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("labels", &self.labels())
            .field("properties", &self.properties)
            .finish()
    }
}

/// An immutable snapshot of the innermost active scope.
///
/// Cloning is cheap; entering a nested scope produces a new context and leaves
/// this one untouched.
///
/// # Examples
///
/// ```
/// use logbridge::ScopeContext;
///
/// let cx = ScopeContext::current().with_scope("request", [("id", 7)].into_iter().collect());
/// let _guard = cx.attach();
///
/// ScopeContext::map_current(|cx| {
///     assert_eq!(cx.scope().map(|s| s.label()), Some("request"));
/// });
/// ```
#[derive(Clone, Default)]
pub struct ScopeContext {
    scope: Option<Arc<Scope>>,
}

impl ScopeContext {
    /// A context with no active scope.
    pub fn new() -> Self {
        ScopeContext::default()
    }

    /// Returns an immutable snapshot of the current thread's context.
    pub fn current() -> Self {
        ScopeContext::map_current(|cx| cx.clone())
    }

    /// Applies a function to the current context without cloning it.
    ///
    /// The current context is borrowed for the duration of `f`; attaching or
    /// dropping guards inside `f` panics.
    pub fn map_current<T>(f: impl FnOnce(&ScopeContext) -> T) -> T {
        CURRENT_SCOPE.with(|stack| stack.borrow().map_current_cx(f))
    }

    /// The innermost scope, if any.
    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_deref()
    }

    /// Returns a copy of this context with a nested scope entered.
    ///
    /// The new scope starts from the properties of the current innermost scope;
    /// its own `properties` overwrite inherited ones on collision.
    pub fn with_scope(
        &self,
        label: impl Into<Cow<'static, str>>,
        properties: PropertyBag,
    ) -> Self {
        let mut merged = self
            .scope
            .as_ref()
            .map(|parent| parent.properties.clone())
            .unwrap_or_default();
        merged.merge(&properties, Precedence::Overwrite);

        ScopeContext {
            scope: Some(Arc::new(Scope {
                label: label.into(),
                properties: merged,
                parent: self.scope.clone(),
            })),
        }
    }

    /// Replaces the current thread's context with this one.
    ///
    /// Dropping the returned guard restores the context that was current
    /// before. Guards are meant to be dropped in reverse order of creation; a
    /// guard dropped out of order only takes effect once every guard created
    /// after it has been dropped too.
    pub fn attach(self) -> ScopeGuard {
        let id = CURRENT_SCOPE.with(|stack| stack.borrow_mut().attach(self));

        ScopeGuard {
            id,
            _marker: PhantomData,
        }
    }

    /// Runs `f` with this context attached, detaching it on every exit path,
    /// unwinding included.
    ///
    /// Scopes entered inside `f` and still open when it returns are left too.
    pub fn run<T>(self, f: impl FnOnce() -> T) -> T {
        let _frame = ScopeFrame::enter(self, Vec::new());
        f()
    }
}

impl fmt::Debug for ScopeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeContext")
            .field("scope", &self.scope)
            .finish()
    }
}

/// Restores the previous [`ScopeContext`] when dropped.
///
/// Guards rely on thread-local storage and are therefore `!Send`.
#[derive(Debug)]
#[must_use = "dropping the guard immediately leaves the scope"]
pub struct ScopeGuard {
    // Slot this guard pushed, `NO_SLOT` if nothing was attached.
    id: u64,
    _marker: PhantomData<*const ()>,
}

impl ScopeGuard {
    /// A guard that attached nothing. Dropping it has no effect.
    pub fn noop() -> Self {
        ScopeGuard {
            id: ScopeStack::NO_SLOT,
            _marker: PhantomData,
        }
    }

    /// Leaves the scope now. Equivalent to dropping the guard.
    pub fn release(self) {
        drop(self)
    }

    /// Returns `true` if dropping this guard changes nothing.
    pub fn is_noop(&self) -> bool {
        self.id == ScopeStack::NO_SLOT
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if !self.is_noop() {
            let id = self.id;
            // The stack is already gone when a thread-local destructor drops a guard.
            let _ = CURRENT_SCOPE.try_with(|stack| stack.borrow_mut().release(id));
        }
    }
}

/// A region of the stack owned by one unit of work, such as a single poll of
/// a `WithScope` future or a [`ScopeContext::run`] call.
///
/// Entering pushes a frame slot followed by the slots the work left open the
/// last time it ran. Exiting cuts the stack back to below the frame and hands
/// the cut-off slots and the work's current context back to the caller, so
/// scopes entered inside the frame never leak past it, whatever guards are
/// still alive.
struct ScopeFrame {
    id: u64,
    _marker: PhantomData<*const ()>,
}

impl ScopeFrame {
    fn enter(cx: ScopeContext, open_slots: Vec<Slot>) -> Self {
        let id = CURRENT_SCOPE.with(|stack| stack.borrow_mut().enter_frame(cx, open_slots));
        ScopeFrame {
            id,
            _marker: PhantomData,
        }
    }

    /// Leaves the frame, returning the context current inside it and the
    /// slots still open.
    #[cfg_attr(not(feature = "futures"), allow(dead_code))]
    fn exit(mut self) -> Option<(ScopeContext, Vec<Slot>)> {
        let id = std::mem::replace(&mut self.id, ScopeStack::NO_SLOT);
        CURRENT_SCOPE
            .try_with(|stack| stack.borrow_mut().exit_frame(id))
            .ok()
            .flatten()
    }
}

impl Drop for ScopeFrame {
    fn drop(&mut self) {
        if self.id != ScopeStack::NO_SLOT {
            let id = self.id;
            let _ = CURRENT_SCOPE.try_with(|stack| stack.borrow_mut().exit_frame(id));
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotState {
    /// Pushed by a live [`ScopeGuard`].
    Attached,
    /// Its guard is gone but slots above it are still open.
    Released,
    /// Bottom of a [`ScopeFrame`]; only the frame removes it.
    Frame,
}

/// One entry of a thread's scope stack.
#[derive(Clone, Debug)]
struct Slot {
    id: u64,
    state: SlotState,
    /// The context that was current when the slot was pushed.
    previous: ScopeContext,
}

/// The contexts attached to one thread.
///
/// Every slot carries a unique identifier, so guards and frames find their own
/// slot wherever it sits and slots can move between the stack and a suspended
/// task without invalidating them.
struct ScopeStack {
    /// The active context. The empty context when `slots` is empty.
    current_cx: ScopeContext,
    slots: Vec<Slot>,
    last_id: u64,
    _marker: PhantomData<*const ()>,
}

impl ScopeStack {
    const NO_SLOT: u64 = 0;
    const MAX_DEPTH: usize = u16::MAX as usize;
    const INITIAL_CAPACITY: usize = 8;

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn push(&mut self, cx: ScopeContext, state: SlotState) -> u64 {
        let id = self.next_id();
        let previous = std::mem::replace(&mut self.current_cx, cx);
        self.slots.push(Slot {
            id,
            state,
            previous,
        });
        id
    }

    fn attach(&mut self, cx: ScopeContext) -> u64 {
        if self.slots.len() >= ScopeStack::MAX_DEPTH {
            bridge_warn!(
                name: "Scope.AttachFailed",
                max_depth = ScopeStack::MAX_DEPTH,
                message = "Too many nested scopes. The current scope is unchanged \
                           and dropping the returned guard has no effect."
            );
            return ScopeStack::NO_SLOT;
        }
        self.push(cx, SlotState::Attached)
    }

    fn release(&mut self, id: u64) {
        let len = self.slots.len();
        match self.slots.iter().rposition(|slot| slot.id == id) {
            Some(index) => {
                if index + 1 < len {
                    bridge_warn!(
                        name: "Scope.OutOfOrderRelease",
                        depth = index,
                        stack_length = len,
                        message = "A scope was released before the scopes nested inside it"
                    );
                }
                self.slots[index].state = SlotState::Released;
                self.pop_released();
            }
            None => {
                // The slot belongs to a task that is not running right now,
                // typically one being dropped while suspended.
                bridge_debug!(name: "Scope.ReleaseDetached", slot = id);
            }
        }
    }

    /// Pops released slots off the top, restoring what preceded each.
    fn pop_released(&mut self) {
        while self
            .slots
            .last()
            .is_some_and(|slot| slot.state == SlotState::Released)
        {
            if let Some(slot) = self.slots.pop() {
                self.current_cx = slot.previous;
            }
        }
    }

    fn enter_frame(&mut self, cx: ScopeContext, open_slots: Vec<Slot>) -> u64 {
        let id = self.push(cx, SlotState::Frame);
        self.slots.extend(open_slots);
        id
    }

    fn exit_frame(&mut self, id: u64) -> Option<(ScopeContext, Vec<Slot>)> {
        let Some(index) = self.slots.iter().rposition(|slot| slot.id == id) else {
            bridge_warn!(
                name: "Scope.FrameLost",
                slot = id,
                message = "A scope frame was exited on a thread that does not hold it"
            );
            return None;
        };
        let open_slots = self.slots.split_off(index + 1);
        let frame = self.slots.pop()?;
        let inner_cx = std::mem::replace(&mut self.current_cx, frame.previous);
        // Guards dropped out of order inside the frame may have been waiting on it.
        self.pop_released();
        Some((inner_cx, open_slots))
    }

    fn map_current_cx<T>(&self, f: impl FnOnce(&ScopeContext) -> T) -> T {
        f(&self.current_cx)
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        ScopeStack {
            current_cx: ScopeContext::default(),
            slots: Vec::with_capacity(ScopeStack::INITIAL_CAPACITY),
            last_id: ScopeStack::NO_SLOT,
            _marker: PhantomData,
        }
    }
}
