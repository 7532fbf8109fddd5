use crate::flow::{ContextFlow, FluentContextFlow};
use anyhow::Result;
use flowcraft_core::{Action, Async, Condition, FlowValue};
use futures::future::{self, FutureExt, TryFutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Failures raised while threading a context through a flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("Source {key} not found")]
    SourceNotFound { key: String },
}

impl ContextError {
    pub fn source_not_found(key: &impl fmt::Display) -> Self {
        Self::SourceNotFound {
            key: key.to_string(),
        }
    }
}

/// Builds flows over a context by reading and writing keyed documents.
///
/// Implementors say how to `get` a document out of a context, how to `put`
/// one back, and how to `make` their own flow type; every other operation is
/// provided. Updates are asynchronous; wrap synchronous functions with
/// [`lift`](flowcraft_core::lift) or [`lift2`](flowcraft_core::lift2).
pub trait ContextFlowBuilder: Clone + Send + Sync + 'static {
    type Key: Clone + fmt::Display + Send + Sync + 'static;
    type Document: FlowValue;
    type Context: FlowValue + Clone;
    type Flow: FluentContextFlow<Self::Context>;

    fn get(&self, context: &Self::Context, key: &Self::Key) -> Option<Self::Document>;

    fn put(&self, context: Self::Context, key: Self::Key, document: Self::Document) -> Self::Context;

    fn make(&self, flow: ContextFlow<Self::Context>) -> Self::Flow;

    fn with_action(&self, action: Action<Self::Context, Self::Context>) -> Self::Flow {
        self.make(ContextFlow::with_action(action))
    }

    /// A step which updates the whole context.
    fn flow<F, Fut>(&self, name: impl Into<String>, update: F) -> Self::Flow
    where
        F: Fn(Self::Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Self::Context>> + Send + 'static,
    {
        self.with_action(Action::new(name, update))
    }

    /// A step which derives a document from the whole context and stores it
    /// under `target`.
    fn flow_into<F, Fut>(
        &self,
        name: impl Into<String>,
        target: impl Into<Self::Key>,
        update: F,
    ) -> Self::Flow
    where
        F: Fn(Self::Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Self::Document>> + Send + 'static,
    {
        let builder = self.clone();
        let target = target.into();

        self.flow(name, move |context: Self::Context| {
            let (builder, target) = (builder.clone(), target.clone());
            update(context.clone()).map_ok(move |document| builder.put(context, target, document))
        })
    }

    /// A step which transforms the document under `source` and stores the
    /// result under `target`. Fails with [`ContextError::SourceNotFound`]
    /// when `source` is absent.
    fn flow_from<F, Fut>(
        &self,
        name: impl Into<String>,
        source: impl Into<Self::Key>,
        target: impl Into<Self::Key>,
        update: F,
    ) -> Self::Flow
    where
        F: Fn(Self::Document) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Self::Document>> + Send + 'static,
    {
        let name = name.into();
        let step = name.clone();
        let builder = self.clone();
        let (source, target) = (source.into(), target.into());

        self.flow(name, move |context: Self::Context| -> Async<Self::Context> {
            let Some(document) = builder.get(&context, &source) else {
                debug!(flow = %step, key = %source, "context source missing");
                return future::ready(Err(ContextError::source_not_found(&source).into())).boxed();
            };

            let (builder, target) = (builder.clone(), target.clone());
            update(document)
                .map_ok(move |document| builder.put(context, target, document))
                .boxed()
        })
    }

    /// A step which combines the documents under `source_a` and `source_b`
    /// and stores the result under `target`. `source_a` is checked first.
    fn flow_from_pair<F, Fut>(
        &self,
        name: impl Into<String>,
        source_a: impl Into<Self::Key>,
        source_b: impl Into<Self::Key>,
        target: impl Into<Self::Key>,
        update: F,
    ) -> Self::Flow
    where
        F: Fn(Self::Document, Self::Document) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Self::Document>> + Send + 'static,
    {
        let name = name.into();
        let step = name.clone();
        let builder = self.clone();
        let (source_a, source_b, target) = (source_a.into(), source_b.into(), target.into());

        self.flow(name, move |context: Self::Context| -> Async<Self::Context> {
            let lookup = builder
                .get(&context, &source_a)
                .ok_or_else(|| ContextError::source_not_found(&source_a))
                .and_then(|a| {
                    builder
                        .get(&context, &source_b)
                        .map(|b| (a, b))
                        .ok_or_else(|| ContextError::source_not_found(&source_b))
                });

            match lookup {
                Ok((a, b)) => {
                    let (builder, target) = (builder.clone(), target.clone());
                    update(a, b)
                        .map_ok(move |document| builder.put(context, target, document))
                        .boxed()
                }
                Err(err) => {
                    debug!(flow = %step, error = %err, "context source missing");
                    future::ready(Err(err.into())).boxed()
                }
            }
        })
    }

    /// A condition over the document under `source`; `false` when the
    /// document is absent.
    fn condition_on<F, Fut>(
        &self,
        name: impl Into<String>,
        source: impl Into<Self::Key>,
        predicate: F,
    ) -> Condition<Self::Context>
    where
        F: Fn(&Self::Document) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        let builder = self.clone();
        let source = source.into();

        Condition::from_predicate(
            name,
            Arc::new(move |context: &Self::Context| -> Async<bool> {
                match builder.get(context, &source) {
                    Some(document) => predicate(&document).boxed(),
                    None => future::ready(Ok(false)).boxed(),
                }
            }),
        )
    }
}
