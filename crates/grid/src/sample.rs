//! Placeholder data source: generates a plausible campaign dataset with a
//! simulated fetch delay. Stands in for the real campaign-data API during
//! development and demos.

use crate::source::DataSource;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use trafficdesk_core::config::SampleConfig;
use trafficdesk_core::types::{Counters, FactRecord, Platform};
use trafficdesk_core::GridResult;
use uuid::Uuid;

const TITLE_POOL: [&str; 12] = [
    "Summer Sale",
    "Welcome Series",
    "Re-engagement",
    "Holiday Promo",
    "Loyalty Rewards",
    "Flash Sale",
    "New Product",
    "Abandoned Cart",
    "Anniversary",
    "Win-Back",
    "Spring Launch",
    "Clearance Blast",
];

const TAG_POOL: [&str; 6] = [
    "evergreen",
    "seasonal",
    "retargeting",
    "prospecting",
    "broad",
    "lookalike",
];

pub struct SampleDataSource {
    config: SampleConfig,
    rng: Mutex<StdRng>,
}

impl SampleDataSource {
    pub fn new(config: SampleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    fn generate(&self) -> Vec<FactRecord> {
        let mut rng = self.rng.lock().expect("sample rng poisoned");
        (0..self.config.campaign_count)
            .map(|i| {
                let platform = Platform::ALL[rng.gen_range(0..Platform::ALL.len())];
                let title = format!(
                    "{} #{}",
                    TITLE_POOL[rng.gen_range(0..TITLE_POOL.len())],
                    i + 1
                );
                let tag = TAG_POOL[rng.gen_range(0..TAG_POOL.len())];

                let clicks = rng.gen_range(200..20_000);
                let lp_views = (clicks as f64 * rng.gen_range(0.6..0.95)) as u64;
                let lp_clicks = (lp_views as f64 * rng.gen_range(0.1..0.5)) as u64;
                let purchases = (clicks as f64 * rng.gen_range(0.005..0.08)) as u64;
                let cost = rng.gen_range(50.0..5_000.0);
                let revenue = cost * rng.gen_range(0.3..2.5);

                FactRecord::new(
                    Uuid::new_v4().to_string(),
                    title,
                    platform,
                    tag,
                    Counters::new(clicks, lp_views, lp_clicks, purchases, cost, revenue),
                )
            })
            .collect()
    }
}

#[async_trait]
impl DataSource for SampleDataSource {
    async fn fetch_facts(&self) -> GridResult<Vec<FactRecord>> {
        if self.config.fetch_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.fetch_delay_ms)).await;
        }
        let facts = self.generate();
        tracing::debug!(count = facts.len(), "Sample dataset generated");
        Ok(facts)
    }
}
