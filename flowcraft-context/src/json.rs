//! Flows over portfolios of JSON documents.

use crate::flow::ContextFlow;
use crate::portfolio::{Portfolio, PortfolioFlows};
use anyhow::{Context as _, Result};
use serde_json::Value;

/// A context of named JSON documents.
pub type JsonContext = Portfolio<Value>;

/// A flow threading a [`JsonContext`].
pub type JsonFlow = ContextFlow<JsonContext>;

/// Builder for [`JsonFlow`]s.
pub type JsonFlows = PortfolioFlows<Value>;

impl JsonContext {
    /// Read a context from a JSON object, one document per member.
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).context("JSON context must be an object")
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(key, document)| (key.to_string(), document.clone()))
                .collect(),
        )
    }
}
