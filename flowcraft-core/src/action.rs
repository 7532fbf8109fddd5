use crate::payload::{FlowValue, Payload};
use anyhow::Result;
use futures::future::{self, BoxFuture};
use futures::{FutureExt, TryFutureExt};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// An asynchronously-returned result.
pub type Async<O> = BoxFuture<'static, Result<O>>;

/// The operation behind an [`Action`].
pub type Operation<I, O> = Arc<dyn Fn(I) -> Async<O> + Send + Sync>;

/// The operation behind a [`Condition`]. It borrows its input so the same
/// value can be handed on to whichever flow the condition selects.
pub type Predicate<T> = Arc<dyn Fn(&T) -> Async<bool> + Send + Sync>;

/// An action over type-erased payloads, as seen by visitors.
pub type AnyAction = Action<Payload, Payload>;

/// A condition over type-erased payloads, as seen by visitors.
pub type AnyCondition = Condition<Payload>;

/// A named action, which accepts an input and returns an asynchronous result.
pub struct Action<I, O> {
    name: String,
    operation: Operation<I, O>,
}

impl<I, O> Action<I, O> {
    pub fn new<F, Fut>(name: impl Into<String>, operation: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O>> + Send + 'static,
    {
        Self::from_operation(name, Arc::new(move |input| operation(input).boxed()))
    }

    pub fn from_operation(name: impl Into<String>, operation: Operation<I, O>) -> Self {
        Self {
            name: name.into(),
            operation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operation(&self) -> &Operation<I, O> {
        &self.operation
    }

    /// Run the action against `input`.
    pub fn invoke(&self, input: I) -> Async<O> {
        (self.operation)(input)
    }

    /// Wrap the operation, keeping the name.
    pub fn decorate<W>(self, wrapper: W) -> Self
    where
        W: FnOnce(Operation<I, O>) -> Operation<I, O>,
    {
        Self {
            operation: wrapper(self.operation),
            name: self.name,
        }
    }
}

impl<I: Any + Send, O: FlowValue> Action<I, O> {
    /// Erase the action's types so it can sit in a flow tree.
    pub fn erase(self) -> AnyAction {
        let operation = self.operation;
        Action::from_operation(
            self.name,
            Arc::new(move |input: Payload| -> Async<Payload> {
                match input.downcast::<I>() {
                    Ok(input) => operation(input).map_ok(Payload::new).boxed(),
                    Err(err) => future::ready(Err(err.into())).boxed(),
                }
            }),
        )
    }
}

impl AnyAction {
    /// Recover a typed action from an erased one.
    pub fn typed<I: FlowValue, O: Any + Send>(self) -> Action<I, O> {
        let operation = self.operation;
        Action::from_operation(
            self.name,
            Arc::new(move |input: I| -> Async<O> {
                operation(Payload::new(input))
                    .and_then(|output| future::ready(output.downcast::<O>().map_err(Into::into)))
                    .boxed()
            }),
        )
    }
}

impl<I, O> Clone for Action<I, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            operation: self.operation.clone(),
        }
    }
}

impl<I, O> fmt::Debug for Action<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

/// A named condition, which inspects an input and asynchronously returns
/// either `true` or `false`.
pub struct Condition<T> {
    name: String,
    predicate: Predicate<T>,
}

impl<T> Condition<T> {
    pub fn new<F, Fut>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        Self::from_predicate(name, Arc::new(move |input: &T| predicate(input).boxed()))
    }

    pub fn from_predicate(name: impl Into<String>, predicate: Predicate<T>) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predicate(&self) -> &Predicate<T> {
        &self.predicate
    }

    /// Evaluate the condition against `input`.
    pub fn test(&self, input: &T) -> Async<bool> {
        (self.predicate)(input)
    }

    /// Wrap the predicate, keeping the name.
    pub fn decorate<W>(self, wrapper: W) -> Self
    where
        W: FnOnce(Predicate<T>) -> Predicate<T>,
    {
        Self {
            predicate: wrapper(self.predicate),
            name: self.name,
        }
    }
}

impl<T: Any> Condition<T> {
    pub fn erase(self) -> AnyCondition {
        let predicate = self.predicate;
        Condition::from_predicate(
            self.name,
            Arc::new(move |input: &Payload| -> Async<bool> {
                match input.downcast_ref::<T>() {
                    Ok(input) => predicate(input),
                    Err(err) => future::ready(Err(err.into())).boxed(),
                }
            }),
        )
    }
}

impl<T> Clone for Condition<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            predicate: self.predicate.clone(),
        }
    }
}

impl<T> fmt::Debug for Condition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition").field("name", &self.name).finish()
    }
}
