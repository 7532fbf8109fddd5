use flowcraft_core::{
    Action, Condition, Describable, Flow, FlowDescriber, FlowValue, FlowVisitor, Visitable,
};
use std::fmt;

/// A flow which threads a single context value from step to step.
pub struct ContextFlow<C> {
    flow: Flow<C, C>,
}

impl<C: FlowValue> ContextFlow<C> {
    pub fn new(flow: Flow<C, C>) -> Self {
        Self { flow }
    }

    pub fn with_action(action: Action<C, C>) -> Self {
        Self::new(Flow::from_action(action))
    }

    pub fn flow(&self) -> &Flow<C, C> {
        &self.flow
    }

    pub fn into_flow(self) -> Flow<C, C> {
        self.flow
    }
}

/// Composition shared by every context flow type, so that specialised
/// wrappers chain into themselves rather than back into [`ContextFlow`].
pub trait FluentContextFlow<C: FlowValue>: Sized {
    fn then(self, next: Self) -> Self;

    fn or_if(self, condition: Condition<C>, if_true: Self) -> Self;

    /// Start a branch to run after this flow; see [`BranchBuilder`].
    fn then_if(self, condition: Condition<C>, if_true: Self) -> BranchBuilder<C, Self> {
        BranchBuilder::new(self).or_if(condition, if_true)
    }
}

impl<C: FlowValue> FluentContextFlow<C> for ContextFlow<C> {
    fn then(self, next: Self) -> Self {
        Self::new(self.flow.then(next.flow))
    }

    fn or_if(self, condition: Condition<C>, if_true: Self) -> Self {
        Self::new(self.flow.or_if(condition, if_true.flow))
    }
}

impl<C: FlowValue> Visitable<C, C> for ContextFlow<C> {
    fn visit(&self, visitor: &dyn FlowVisitor) -> Action<C, C> {
        self.flow.visit(visitor)
    }
}

impl<C> Describable for ContextFlow<C> {
    fn describe_with(&self, describer: FlowDescriber) -> FlowDescriber {
        self.flow.describe_with(describer)
    }
}

impl<C> Clone for ContextFlow<C> {
    fn clone(&self) -> Self {
        Self {
            flow: self.flow.clone(),
        }
    }
}

impl<C> fmt::Debug for ContextFlow<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextFlow").field("flow", &self.flow).finish()
    }
}

impl<C> fmt::Display for ContextFlow<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.flow, f)
    }
}

/// Accumulates conditional branches until [`BranchBuilder::otherwise`]
/// supplies the default, then sequences the branch after the flow it
/// started from.
pub struct BranchBuilder<C, F> {
    previous: F,
    branches: Vec<(Condition<C>, F)>,
}

impl<C: FlowValue, F: FluentContextFlow<C>> BranchBuilder<C, F> {
    pub fn new(previous: F) -> Self {
        Self {
            previous,
            branches: Vec::new(),
        }
    }

    pub fn or_if(mut self, condition: Condition<C>, if_true: F) -> Self {
        self.branches.push((condition, if_true));
        self
    }

    pub fn otherwise(self, default: F) -> F {
        let branch = self
            .branches
            .into_iter()
            .fold(default, |branch, (condition, if_true)| {
                branch.or_if(condition, if_true)
            });
        self.previous.then(branch)
    }
}
