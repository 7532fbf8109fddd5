use crate::builder::ContextFlowBuilder;
use crate::flow::ContextFlow;
use flowcraft_core::FlowValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// An immutable collection of named documents, threaded through a flow as
/// its context. Writing a document produces a new portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio<D> {
    documents: BTreeMap<String, D>,
}

impl<D> Portfolio<D> {
    pub fn new() -> Self {
        Self {
            documents: BTreeMap::new(),
        }
    }

    /// A portfolio holding a single document.
    pub fn with(key: impl Into<String>, document: D) -> Self {
        Self::new().insert(key, document)
    }

    /// Returns a portfolio with `document` stored under `key`, replacing any
    /// document already there.
    pub fn insert(mut self, key: impl Into<String>, document: D) -> Self {
        self.documents.insert(key.into(), document);
        self
    }

    pub fn get(&self, key: &str) -> Option<&D> {
        self.documents.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.documents.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &D)> {
        self.documents.iter().map(|(key, document)| (key.as_str(), document))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl<D> Default for Portfolio<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, D> FromIterator<(K, D)> for Portfolio<D> {
    fn from_iter<T: IntoIterator<Item = (K, D)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |portfolio, (key, document)| {
                portfolio.insert(key, document)
            })
    }
}

/// Builds [`ContextFlow`]s over a [`Portfolio`] of `D` documents.
pub struct PortfolioFlows<D>(PhantomData<fn() -> D>);

impl<D> PortfolioFlows<D> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<D> Default for PortfolioFlows<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for PortfolioFlows<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for PortfolioFlows<D> {}

impl<D> fmt::Debug for PortfolioFlows<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PortfolioFlows")
    }
}

impl<D: FlowValue + Clone> ContextFlowBuilder for PortfolioFlows<D> {
    type Key = String;
    type Document = D;
    type Context = Portfolio<D>;
    type Flow = ContextFlow<Portfolio<D>>;

    fn get(&self, context: &Portfolio<D>, key: &String) -> Option<D> {
        context.get(key).cloned()
    }

    fn put(&self, context: Portfolio<D>, key: String, document: D) -> Portfolio<D> {
        context.insert(key, document)
    }

    fn make(&self, flow: ContextFlow<Portfolio<D>>) -> Self::Flow {
        flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ContextError;
    use crate::flow::FluentContextFlow;
    use flowcraft_core::{lift, lift2, lift_predicate, Condition, Describable, Visitable};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    type Numbers = PortfolioFlows<i64>;

    const FLOWS: Numbers = PortfolioFlows::new();

    #[test]
    fn test_portfolio_is_immutable() {
        let original = Portfolio::with("a", 1);
        let updated = original.clone().insert("b", 2);

        assert_eq!(original.len(), 1);
        assert_eq!(updated.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(updated.get("b"), Some(&2));
        assert!(!original.contains_key("b"));
    }

    #[tokio::test]
    async fn test_flow_from_copies_document() {
        let copy = FLOWS.flow_from("copy", "a", "b", lift(Ok));

        let result = copy.run(Portfolio::with("a", 1)).await.unwrap();
        assert_eq!(result, Portfolio::from_iter([("a", 1), ("b", 1)]));
    }

    #[tokio::test]
    async fn test_flow_from_missing_source() {
        let copy = FLOWS.flow_from("copy", "a", "b", lift(Ok));

        let err = copy.run(Portfolio::new()).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ContextError>(),
            Some(&ContextError::SourceNotFound { key: "a".into() })
        );
        assert_eq!(err.to_string(), "Source a not found");
    }

    #[tokio::test]
    async fn test_flow_from_pair_checks_first_source_first() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let add = FLOWS.flow_from_pair(
            "add",
            "a",
            "b",
            "sum",
            lift2(move |a: i64, b: i64| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(a + b)
            }),
        );

        let err = add.run(Portfolio::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Source a not found");

        let err = add.run(Portfolio::with("a", 1)).await.unwrap_err();
        assert_eq!(err.to_string(), "Source b not found");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let context = Portfolio::from_iter([("a", 2), ("b", 3), ("other", 9)]);
        let result = add.run(context).await.unwrap();
        assert_eq!(result, Portfolio::from_iter([("a", 2), ("b", 3), ("other", 9), ("sum", 5)]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_flow_into_and_whole_context_flow() {
        let count = FLOWS.flow_into(
            "count documents",
            "count",
            lift(|context: Portfolio<i64>| Ok(context.len() as i64)),
        );
        let clear = FLOWS.flow("clear", lift(|_: Portfolio<i64>| Ok(Portfolio::new())));

        let result = count.clone().run(Portfolio::from_iter([("x", 0), ("y", 0)])).await.unwrap();
        assert_eq!(result.get("count"), Some(&2));

        let result = count.then(clear).run(Portfolio::with("x", 0)).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_condition_on_missing_document_is_false() {
        let positive = FLOWS.condition_on("positive", "n", lift_predicate(|n: &i64| *n > 0));

        assert!(!positive.test(&Portfolio::new()).await.unwrap());
        assert!(!positive.test(&Portfolio::with("n", -1)).await.unwrap());
        assert!(positive.test(&Portfolio::with("n", 4)).await.unwrap());
    }

    #[tokio::test]
    async fn test_then_if_over_context() {
        let double = FLOWS.flow_from("double", "n", "n", lift(|n: i64| Ok(n * 2)));
        let negate = FLOWS.flow_from("negate", "n", "n", lift(|n: i64| Ok(-n)));
        let keep = FLOWS.flow("keep", lift(Ok));
        let is_big: Condition<Portfolio<i64>> =
            FLOWS.condition_on("is big", "n", lift_predicate(|n: &i64| *n > 10));

        let flow = double.then_if(is_big, negate).otherwise(keep);

        assert_eq!(flow.run(Portfolio::with("n", 3)).await.unwrap().get("n"), Some(&6));
        assert_eq!(flow.run(Portfolio::with("n", 8)).await.unwrap().get("n"), Some(&-16));
        assert_eq!(
            flow.describe(),
            "Sequence\n\t1: double\n\t2: Branch\n\t\tIf is big: negate\n\t\tOtherwise: keep"
        );
    }
}
