use crate::action::{Action, AnyAction, AnyCondition, Async};
use crate::payload::Payload;
use futures::{FutureExt, TryFutureExt};
use std::fmt;
use std::sync::Arc;

/// Receives the messages emitted by a [`LoggingFlowVisitor`].
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// A visitor which determines an execution strategy for a flow.
///
/// Every method has a default implementation: actions and conditions pass
/// through unchanged, sequences chain futures and branches pick a side once
/// their condition resolves. Decorating visitors override `action` and
/// `condition` and delegate the rest.
pub trait FlowVisitor: Send + Sync {
    fn action(&self, action: AnyAction) -> AnyAction {
        action
    }

    fn condition(&self, condition: AnyCondition) -> AnyCondition {
        condition
    }

    /// Run `first`, then feed its output to `next`. `next` is never invoked
    /// if `first` fails.
    fn sequence(&self, first: AnyAction, next: AnyAction) -> AnyAction {
        Action::new("sequence", move |input| {
            let next = next.clone();
            first.invoke(input).and_then(move |output| next.invoke(output))
        })
    }

    /// Test `condition`, then run `if_true` or `if_false` with the same
    /// input. Neither side is invoked if the condition fails.
    fn branch(&self, condition: AnyCondition, if_true: AnyAction, if_false: AnyAction) -> AnyAction {
        Action::new("branch", move |input: Payload| {
            let outcome = condition.test(&input);
            let (if_true, if_false) = (if_true.clone(), if_false.clone());
            async move {
                if outcome.await? {
                    if_true.invoke(input).await
                } else {
                    if_false.invoke(input).await
                }
            }
        })
    }
}

/// The default execution strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFlowVisitor;

impl FlowVisitor for DefaultFlowVisitor {}

/// A visitor which logs the execution of actions and conditions, delegating
/// everything else to the visitor it wraps.
pub struct LoggingFlowVisitor<V> {
    inner: V,
    sink: LogSink,
}

impl<V: FlowVisitor> LoggingFlowVisitor<V> {
    pub fn new<S>(inner: V, sink: S) -> Self
    where
        S: Fn(&str) + Send + Sync + 'static,
    {
        Self::with_sink(inner, Arc::new(sink))
    }

    pub fn with_sink(inner: V, sink: LogSink) -> Self {
        Self { inner, sink }
    }

    pub fn inner(&self) -> &V {
        &self.inner
    }
}

impl<V: FlowVisitor> FlowVisitor for LoggingFlowVisitor<V> {
    fn action(&self, action: AnyAction) -> AnyAction {
        let label: Arc<str> = format!("Action '{}'", action.name()).into();
        let sink = self.sink.clone();

        self.inner.action(action).decorate(move |operation| {
            Arc::new(move |input: Payload| -> Async<Payload> {
                sink(&format!("Invoking {label} with <{input:?}>"));
                logged(label.clone(), sink.clone(), operation(input))
            })
        })
    }

    fn condition(&self, condition: AnyCondition) -> AnyCondition {
        let label: Arc<str> = format!("Condition '{}'", condition.name()).into();
        let sink = self.sink.clone();

        self.inner.condition(condition).decorate(move |predicate| {
            Arc::new(move |input: &Payload| -> Async<bool> {
                sink(&format!("Invoking {label} with <{input:?}>"));
                logged(label.clone(), sink.clone(), predicate(input))
            })
        })
    }

    fn sequence(&self, first: AnyAction, next: AnyAction) -> AnyAction {
        self.inner.sequence(first, next)
    }

    fn branch(&self, condition: AnyCondition, if_true: AnyAction, if_false: AnyAction) -> AnyAction {
        self.inner.branch(condition, if_true, if_false)
    }
}

impl<V: fmt::Debug> fmt::Debug for LoggingFlowVisitor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingFlowVisitor")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

fn logged<T>(label: Arc<str>, sink: LogSink, pending: Async<T>) -> Async<T>
where
    T: fmt::Debug + Send + 'static,
{
    pending
        .inspect(move |outcome| match outcome {
            Ok(value) => sink(&format!("{label} completed with <{value:?}>")),
            Err(err) => sink(&format!("{label} failed with <{err}>")),
        })
        .boxed()
}

/// Decoration helpers available on every visitor.
pub trait FlowVisitorExt: FlowVisitor + Sized {
    /// Decorate this visitor with logging behaviour.
    fn logging<S>(self, sink: S) -> LoggingFlowVisitor<Self>
    where
        S: Fn(&str) + Send + Sync + 'static,
    {
        LoggingFlowVisitor::new(self, sink)
    }
}

impl<V: FlowVisitor> FlowVisitorExt for V {}
