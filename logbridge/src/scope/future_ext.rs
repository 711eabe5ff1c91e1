use super::{ScopeContext, ScopeFrame, Slot};
use futures_core::Stream;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::Context as TaskContext;
use std::task::Poll;

pin_project! {
    /// A future or stream that runs with a captured [`ScopeContext`].
    ///
    /// The context is attached for the duration of each poll only, so tasks
    /// sharing a worker thread never observe each other's scopes. Scopes the
    /// wrapped work enters and keeps open across a suspension point are
    /// detached when the poll returns and attached again on the next poll.
    #[derive(Clone, Debug)]
    pub struct WithScope<T> {
        #[pin]
        inner: T,
        scope_cx: ScopeContext,
        // Slots pushed by the wrapped work and still open at the last suspension.
        open_slots: Vec<Slot>,
    }
}

impl<T: Future> Future for WithScope<T> {
    type Output = T::Output;

    fn poll(self: Pin<&mut Self>, task_cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let frame = ScopeFrame::enter(
            std::mem::take(this.scope_cx),
            std::mem::take(this.open_slots),
        );
        let poll = this.inner.poll(task_cx);
        if let Some((scope_cx, open_slots)) = frame.exit() {
            *this.scope_cx = scope_cx;
            *this.open_slots = open_slots;
        }
        poll
    }
}

impl<T: Stream> Stream for WithScope<T> {
    type Item = T::Item;

    fn poll_next(self: Pin<&mut Self>, task_cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let frame = ScopeFrame::enter(
            std::mem::take(this.scope_cx),
            std::mem::take(this.open_slots),
        );
        let poll = T::poll_next(this.inner, task_cx);
        if let Some((scope_cx, open_slots)) = frame.exit() {
            *this.scope_cx = scope_cx;
            *this.open_slots = open_slots;
        }
        poll
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

// The two traits are identical but must stay separate to avoid overlapping
// blanket implementations.

impl<F: Future> FutureScopeExt for F {}
/// Extension trait carrying logging scopes into futures.
pub trait FutureScopeExt: Sized {
    /// Runs this future with `scope_cx` as the current scope context.
    fn with_scope_context(self, scope_cx: ScopeContext) -> WithScope<Self> {
        WithScope {
            inner: self,
            scope_cx,
            open_slots: Vec::new(),
        }
    }

    /// Runs this future with the scope context current at the time of the
    /// call, wherever the future is eventually polled.
    fn with_current_scope(self) -> WithScope<Self> {
        let scope_cx = ScopeContext::current();
        self.with_scope_context(scope_cx)
    }
}

impl<S: Stream> StreamScopeExt for S {}
/// Extension trait carrying logging scopes into streams.
pub trait StreamScopeExt: Sized {
    /// Polls this stream with `scope_cx` as the current scope context.
    fn with_scope_context(self, scope_cx: ScopeContext) -> WithScope<Self> {
        WithScope {
            inner: self,
            scope_cx,
            open_slots: Vec::new(),
        }
    }

    /// Polls this stream with the scope context current at the time of the
    /// call.
    fn with_current_scope(self) -> WithScope<Self> {
        let scope_cx = ScopeContext::current();
        self.with_scope_context(scope_cx)
    }
}
