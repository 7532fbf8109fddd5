//! # FlowCraft Context
//!
//! Flows which thread one evolving context value from step to step, reading
//! and writing named documents in it.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod flow;
mod portfolio;

#[cfg(feature = "json")]
#[cfg_attr(docsrs, doc(cfg(feature = "json")))]
pub mod json;

pub use builder::{ContextError, ContextFlowBuilder};
pub use flow::{BranchBuilder, ContextFlow, FluentContextFlow};
pub use portfolio::{Portfolio, PortfolioFlows};

/// Prelude module for context flows
pub mod prelude {
    pub use crate::{
        ContextError, ContextFlow, ContextFlowBuilder, FluentContextFlow,
        Portfolio, PortfolioFlows,
    };

    #[cfg(feature = "json")]
    #[cfg_attr(docsrs, doc(cfg(feature = "json")))]
    pub use crate::json::{JsonContext, JsonFlow, JsonFlows};
}
