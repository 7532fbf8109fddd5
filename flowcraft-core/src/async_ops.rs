//! Helpers for moving between synchronous and asynchronous operations.

use crate::action::Async;
use crate::FlowError;
use anyhow::Result;
use futures::future::{self, Ready};
use futures::FutureExt;
use tokio::runtime::Handle;
use tracing::warn;

/// Convert a synchronous function into an asynchronous one.
///
/// An `Err` returned by `f` resolves the future as failed; the lifted
/// function itself never fails at call time. Panics are not captured: `f`
/// runs when the lifted function is called, so a panic unwinds from there.
pub fn lift<I, O, F>(f: F) -> impl Fn(I) -> Ready<Result<O>> + Send + Sync + 'static
where
    F: Fn(I) -> Result<O> + Send + Sync + 'static,
{
    move |input| future::ready(f(input))
}

/// Convert a synchronous two-argument function into an asynchronous one.
pub fn lift2<A, B, O, F>(f: F) -> impl Fn(A, B) -> Ready<Result<O>> + Send + Sync + 'static
where
    F: Fn(A, B) -> Result<O> + Send + Sync + 'static,
{
    move |a, b| future::ready(f(a, b))
}

/// Convert a synchronous predicate into the asynchronous form taken by
/// [`Condition::new`](crate::Condition::new).
pub fn lift_predicate<T, F>(f: F) -> impl Fn(&T) -> Ready<Result<bool>> + Send + Sync + 'static
where
    T: ?Sized,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    move |input: &T| future::ready(Ok(f(input)))
}

/// Join futures into one future of their results, in input order.
///
/// Every future is spawned onto the current Tokio runtime straight away.
/// Outside a runtime nothing is spawned and the joined future fails with
/// [`FlowError::NoRuntime`]. The joined future fails with the first failure
/// observed; the remaining futures keep running and their outcomes are
/// discarded.
pub fn join_all<T, I>(futures: I) -> Async<Vec<T>>
where
    I: IntoIterator<Item = Async<T>>,
    T: Send + 'static,
{
    let runtime = match Handle::try_current() {
        Ok(runtime) => runtime,
        Err(err) => {
            warn!(error = %err, "join_all called outside a Tokio runtime");
            return future::ready(Err(FlowError::NoRuntime.into())).boxed();
        }
    };

    let handles: Vec<_> = futures
        .into_iter()
        .map(|pending| runtime.spawn(pending))
        .collect();
    let pending = handles.len();

    future::try_join_all(handles.into_iter().map(|handle| async move {
        match handle.await {
            Ok(result) => result,
            Err(err) => Err(FlowError::JoinFailed(err.to_string()).into()),
        }
    }))
    .inspect(move |joined| {
        if let Err(err) = joined {
            warn!(pending, error = %err, "joined future failed, remaining futures left running");
        }
    })
    .boxed()
}
