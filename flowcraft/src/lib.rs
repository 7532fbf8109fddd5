//! # FlowCraft - Declarative Async Flows
//!
//! FlowCraft builds flows of named asynchronous actions as immutable values:
//! sequences with [`Flow::then`] and conditional branches with
//! [`Flow::or_if`]. A flow is run through a [`FlowVisitor`], which decides the
//! execution strategy and can decorate every action (for example with
//! logging) without touching the flow itself. [`Describable::describe`]
//! renders the structure of a flow as an indented tree.
//!
//! ## Features
//!
//! - `json` (default): flows over portfolios of JSON documents
//! - `logger` (default): tracing-backed logging visitor
//!
//! ## Quick Start
//!
//! ```rust
//! use flowcraft::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let greet = flow("Say hello", lift(|name: String| Ok(format!("Hello {name}"))))
//!         .or_if(
//!             Condition::new("is king", lift_predicate(|name: &String| name.contains("King"))),
//!             flow("Greet the king", lift(|_: String| Ok("Greetings, sire".to_string()))),
//!         )
//!         .then(flow("Add exclamation mark", lift(|s: String| Ok(format!("{s}!")))));
//!
//!     println!("{}", greet.describe());
//!     assert_eq!(greet.run("King Rollo".to_string()).await?, "Greetings, sire!");
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export core functionality
pub use flowcraft_context as context;
pub use flowcraft_core::*;

#[cfg(feature = "logger")]
#[cfg_attr(docsrs, doc(cfg(feature = "logger")))]
pub use flowcraft_logger as logger;

/// Prelude module for easy imports
pub mod prelude {
    pub use flowcraft_context::prelude::*;
    pub use flowcraft_core::prelude::*;

    #[cfg(feature = "logger")]
    #[cfg_attr(docsrs, doc(cfg(feature = "logger")))]
    pub use flowcraft_logger::{LogLevel, Logger, LoggerConfig};
}
