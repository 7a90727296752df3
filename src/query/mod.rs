//! Feature queries: what to ask a layer for and the trait that answers.

mod error;
mod filter;
mod record;

pub use error::QueryError;
pub use filter::{Extent, Filter};
pub use record::AttributeRecord;

use async_trait::async_trait;

/// A single attribute query against one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureQuery {
    pub filter: Filter,
    pub out_fields: Vec<String>,
    /// Only features intersecting this envelope are returned.
    pub extent: Option<Extent>,
}

impl FeatureQuery {
    pub fn new<I, F>(filter: Filter, out_fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            filter,
            out_fields: out_fields.into_iter().map(Into::into).collect(),
            extent: None,
        }
    }

    pub fn intersecting(mut self, extent: Option<Extent>) -> Self {
        self.extent = extent;
        self
    }
}

/// Anything that can answer a [`FeatureQuery`] with attribute rows: a remote
/// feature layer in production, a fixed record set in tests.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// Human-readable layer name for logs.
    fn name(&self) -> &str;

    async fn query_features(&self, query: &FeatureQuery) -> Result<Vec<AttributeRecord>, QueryError>;
}
