//! # FlowCraft Core
//!
//! Flows of named asynchronous actions, composed as immutable values and
//! executed through pluggable visitors.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod action;
pub mod async_ops;
mod describer;
mod error;
mod flow;
mod payload;
mod visitor;


pub use action::{
    Action, AnyAction, AnyCondition, Async, Condition, Operation, Predicate,
};
pub use async_ops::{join_all, lift, lift2, lift_predicate};
pub use describer::{Describable, FlowDescriber};
pub use error::FlowError;
pub use flow::{flow, BranchBuilder, ConditionalFlow, Flow, FlowNode, Visitable};
pub use payload::{FlowValue, Payload};
pub use visitor::{
    DefaultFlowVisitor, FlowVisitor, FlowVisitorExt, LogSink, LoggingFlowVisitor,
};

/// Prelude module for core functionality
pub mod prelude {
    pub use crate::{
        flow, lift, lift2, lift_predicate, Action, Async, Condition,
        DefaultFlowVisitor, Describable, Flow, FlowVisitor, FlowVisitorExt,
        Visitable,
    };
}
