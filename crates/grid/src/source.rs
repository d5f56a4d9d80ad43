//! Data-fetch collaborator boundary. The grid treats every fetch as
//! replace-the-whole-dataset; there is no incremental update contract.

use async_trait::async_trait;
use trafficdesk_core::types::FactRecord;
use trafficdesk_core::GridResult;

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_facts(&self) -> GridResult<Vec<FactRecord>>;
}

/// Serves a fixed dataset. Useful for tests and for driving the grid from
/// data loaded elsewhere.
pub struct StaticDataSource {
    facts: Vec<FactRecord>,
}

impl StaticDataSource {
    pub fn new(facts: Vec<FactRecord>) -> Self {
        Self { facts }
    }
}

#[async_trait]
impl DataSource for StaticDataSource {
    async fn fetch_facts(&self) -> GridResult<Vec<FactRecord>> {
        Ok(self.facts.clone())
    }
}
