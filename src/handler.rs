//! Route targets: immediate or suspending handlers.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::executor::block_on;
use futures::future::LocalBoxFuture;

use crate::match_result::MatchResult;

type ImmediateFn<A, R> = dyn Fn(&MatchResult, A) -> R + Send + Sync;
type SuspendingFn<A, R> = dyn Fn(MatchResult, A) -> LocalBoxFuture<'static, R> + Send + Sync;

/// A route target. The execution model is chosen at registration time.
///
/// Clones share one target identity, so registering a clone under a second
/// grammar binds both grammars to the same target.
pub enum Handler<A = (), R = ()> {
    Immediate(Arc<ImmediateFn<A, R>>),
    Suspending(Arc<SuspendingFn<A, R>>),
}

impl<A: 'static, R: 'static> Handler<A, R> {
    pub fn immediate<F>(f: F) -> Self
    where
        F: Fn(&MatchResult, A) -> R + Send + Sync + 'static,
    {
        Handler::Immediate(Arc::new(f))
    }

    pub fn suspending<F, Fut>(f: F) -> Self
    where
        F: Fn(MatchResult, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + 'static,
    {
        Handler::Suspending(Arc::new(
            move |m: MatchResult, args: A| -> LocalBoxFuture<'static, R> { Box::pin(f(m, args)) },
        ))
    }
}

impl<A, R> Handler<A, R> {
    /// Run the handler to completion on the calling thread.
    ///
    /// A suspending handler gets its own single-use executor for this call.
    pub fn invoke(&self, m: MatchResult, args: A) -> R {
        match self {
            Handler::Immediate(f) => f(&m, args),
            Handler::Suspending(f) => block_on(f(m, args)),
        }
    }

    /// True when both handlers are clones of one registration.
    pub fn same_target(&self, other: &Self) -> bool {
        match (self, other) {
            (Handler::Immediate(a), Handler::Immediate(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Handler::Suspending(a), Handler::Suspending(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }

    pub fn is_suspending(&self) -> bool {
        matches!(self, Handler::Suspending(_))
    }
}

impl<A, R> Clone for Handler<A, R> {
    fn clone(&self) -> Self {
        match self {
            Handler::Immediate(f) => Handler::Immediate(Arc::clone(f)),
            Handler::Suspending(f) => Handler::Suspending(Arc::clone(f)),
        }
    }
}

impl<A, R> fmt::Debug for Handler<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Immediate(_) => f.write_str("Handler::Immediate"),
            Handler::Suspending(_) => f.write_str("Handler::Suspending"),
        }
    }
}
