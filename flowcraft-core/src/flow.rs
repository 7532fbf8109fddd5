use crate::action::{Action, AnyAction, AnyCondition, Async, Condition};
use crate::describer::Describable;
use crate::payload::FlowValue;
use crate::visitor::{DefaultFlowVisitor, FlowVisitor, FlowVisitorExt};
use anyhow::Result;
use indexmap::IndexMap;
use std::fmt;
use std::future::Future;
use std::iter;
use std::marker::PhantomData;
use tracing::trace;

/// A condition together with the flow to follow when it is met.
#[derive(Debug, Clone)]
pub struct ConditionalFlow {
    pub condition: AnyCondition,
    pub flow: FlowNode,
}

/// The untyped shape of a flow.
#[derive(Debug, Clone)]
pub enum FlowNode {
    /// Executes a single action.
    Only(AnyAction),
    /// Tests its conditions and follows the flow of the first one that
    /// holds, falling through to `default` otherwise. No order is defined
    /// on the conditions; they may be tested in any order.
    Branch {
        default: Box<FlowNode>,
        branches: IndexMap<String, ConditionalFlow>,
    },
    /// Executes at least two flows, `first` to `last`, each feeding the next.
    Sequence {
        first: Box<FlowNode>,
        middle: Vec<FlowNode>,
        last: Box<FlowNode>,
    },
}

impl FlowNode {
    /// Sequence `next` after this node. Sequences on either side are
    /// flattened into the result, so chains never nest.
    pub fn then(self, next: FlowNode) -> FlowNode {
        let (first, mut middle) = match self {
            FlowNode::Sequence {
                first,
                mut middle,
                last,
            } => {
                middle.push(*last);
                (first, middle)
            }
            other => (Box::new(other), Vec::new()),
        };

        let last = match next {
            FlowNode::Sequence {
                first: next_first,
                middle: next_middle,
                last,
            } => {
                middle.push(*next_first);
                middle.extend(next_middle);
                last
            }
            other => Box::new(other),
        };

        FlowNode::Sequence {
            first,
            middle,
            last,
        }
    }

    /// Branch to `flow` when `condition` holds. An existing branch keeps its
    /// default and gains one more entry; a re-used condition name replaces
    /// the earlier entry.
    pub fn or_if(self, condition: AnyCondition, flow: FlowNode) -> FlowNode {
        let name = condition.name().to_string();
        let conditional = ConditionalFlow { condition, flow };

        match self {
            FlowNode::Branch {
                default,
                mut branches,
            } => {
                branches.insert(name, conditional);
                FlowNode::Branch { default, branches }
            }
            other => FlowNode::Branch {
                default: Box::new(other),
                branches: IndexMap::from([(name, conditional)]),
            },
        }
    }

    /// Use `visitor` to convert the node into a single executable action.
    pub fn visit(&self, visitor: &dyn FlowVisitor) -> AnyAction {
        match self {
            FlowNode::Only(action) => visitor.action(action.clone()),
            FlowNode::Branch { default, branches } => {
                trace!(branches = branches.len(), "folding branch");
                branches
                    .values()
                    .fold(default.visit(visitor), |otherwise, branch| {
                        visitor.branch(
                            visitor.condition(branch.condition.clone()),
                            branch.flow.visit(visitor),
                            otherwise,
                        )
                    })
            }
            FlowNode::Sequence {
                first,
                middle,
                last,
            } => {
                trace!(steps = middle.len() + 2, "folding sequence");
                middle
                    .iter()
                    .chain(iter::once(&**last))
                    .fold(first.visit(visitor), |previous, step| {
                        visitor.sequence(previous, step.visit(visitor))
                    })
            }
        }
    }
}

/// Something a [`FlowVisitor`] can turn into an action and run.
pub trait Visitable<I: FlowValue, O: FlowValue> {
    /// Use `visitor` to convert the flow into a single executable action.
    fn visit(&self, visitor: &dyn FlowVisitor) -> Action<I, O>;

    /// Run the flow with the default execution strategy.
    fn run(&self, input: I) -> Async<O> {
        self.run_with(input, &DefaultFlowVisitor)
    }

    /// Run the flow, using `visitor` to define the execution strategy.
    fn run_with(&self, input: I, visitor: &dyn FlowVisitor) -> Async<O> {
        self.visit(visitor).invoke(input)
    }

    /// Run the flow with the default strategy, reporting every action and
    /// condition to `sink`.
    fn run_logging<S>(&self, input: I, sink: S) -> Async<O>
    where
        S: Fn(&str) + Send + Sync + 'static,
    {
        self.run_with(input, &DefaultFlowVisitor.logging(sink))
    }
}

/// A typed flow of execution from `I` to `O`.
pub struct Flow<I, O> {
    node: FlowNode,
    _types: PhantomData<fn(I) -> O>,
}

impl<I: FlowValue, O: FlowValue> Flow<I, O> {
    pub fn from_action(action: Action<I, O>) -> Self {
        Self::from_node(FlowNode::Only(action.erase()))
    }

    fn from_node(node: FlowNode) -> Self {
        Self {
            node,
            _types: PhantomData,
        }
    }

    /// Sequence this flow with another, creating a flow that performs this
    /// one and passes its output to `next`.
    pub fn then<O2: FlowValue>(self, next: Flow<O, O2>) -> Flow<I, O2> {
        Flow::from_node(self.node.then(next.node))
    }

    /// Create a branching flow which tests `condition` and follows `if_true`
    /// when it holds, otherwise continuing with this flow.
    pub fn or_if(self, condition: Condition<I>, if_true: Flow<I, O>) -> Self {
        Self::from_node(self.node.or_if(condition.erase(), if_true.node))
    }

    /// Start a branch to run after this flow. Nothing is built until
    /// [`BranchBuilder::otherwise`] supplies the default.
    pub fn then_if<O2: FlowValue>(
        self,
        condition: Condition<O>,
        if_true: Flow<O, O2>,
    ) -> BranchBuilder<I, O, O2> {
        BranchBuilder {
            previous: self,
            branches: vec![(condition, if_true)],
        }
    }
}

impl<I: FlowValue, O: FlowValue> Visitable<I, O> for Flow<I, O> {
    fn visit(&self, visitor: &dyn FlowVisitor) -> Action<I, O> {
        self.node.visit(visitor).typed()
    }
}

impl<I, O> Flow<I, O> {
    pub fn node(&self) -> &FlowNode {
        &self.node
    }

    pub fn into_node(self) -> FlowNode {
        self.node
    }
}

impl<I, O> Clone for Flow<I, O> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            _types: PhantomData,
        }
    }
}

impl<I, O> fmt::Debug for Flow<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Flow").field(&self.node).finish()
    }
}

impl<I, O> fmt::Display for Flow<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.node.describe())
    }
}

/// Accumulates the branches of a [`Flow::then_if`] until a default is given.
pub struct BranchBuilder<I, O, O2> {
    previous: Flow<I, O>,
    branches: Vec<(Condition<O>, Flow<O, O2>)>,
}

impl<I: FlowValue, O: FlowValue, O2: FlowValue> BranchBuilder<I, O, O2> {
    pub fn or_if(mut self, condition: Condition<O>, if_true: Flow<O, O2>) -> Self {
        self.branches.push((condition, if_true));
        self
    }

    /// Complete the branch with its default flow and sequence it after the
    /// flow `then_if` was called on.
    pub fn otherwise(self, default: Flow<O, O2>) -> Flow<I, O2> {
        let branch = self
            .branches
            .into_iter()
            .fold(default, |branch, (condition, if_true)| {
                branch.or_if(condition, if_true)
            });
        self.previous.then(branch)
    }
}

/// Create a flow from an operation name and an asynchronous operation.
pub fn flow<I, O, F, Fut>(name: impl Into<String>, operation: F) -> Flow<I, O>
where
    I: FlowValue,
    O: FlowValue,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O>> + Send + 'static,
{
    Flow::from_action(Action::new(name, operation))
}
