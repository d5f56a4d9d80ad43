//! Three-level drill-down under each campaign row: hour-of-day, offer,
//! landing page. Child rows are generated by a proportional random split of
//! the parent's raw counters and cached per composite key; collapsing a
//! node cascades, evicting every descendant expansion entry and cache row.
//!
//! The generator is a stand-in for a real aggregation query against the
//! data source; the state machine around it is the part that matters.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use trafficdesk_core::config::GridConfig;
use trafficdesk_core::types::{Counters, FactRecord};

/// Composite key for an hour node: `campaign_id::hour`.
pub fn hour_key(campaign_id: &str, hour: u8) -> String {
    format!("{campaign_id}::{hour:02}")
}

/// Composite key for an offer node: `campaign_id::hour::offer`.
pub fn offer_key(campaign_id: &str, hour: u8, offer: usize) -> String {
    format!("{campaign_id}::{hour:02}::{offer}")
}

/// A generated child row at any drill-down level.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub key: String,
    pub label: String,
    pub counters: Counters,
}

/// Expansion sets and generated-row caches for all three levels.
pub struct DrilldownState {
    config: GridConfig,
    rng: StdRng,
    expanded_campaigns: HashSet<String>,
    expanded_hours: HashSet<String>,
    expanded_offers: HashSet<String>,
    hour_rows: HashMap<String, Vec<BreakdownRow>>,
    offer_rows: HashMap<String, Vec<BreakdownRow>>,
    landing_rows: HashMap<String, Vec<BreakdownRow>>,
}

impl DrilldownState {
    pub fn new(config: GridConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            expanded_campaigns: HashSet::new(),
            expanded_hours: HashSet::new(),
            expanded_offers: HashSet::new(),
            hour_rows: HashMap::new(),
            offer_rows: HashMap::new(),
            landing_rows: HashMap::new(),
        }
    }

    pub fn is_campaign_expanded(&self, campaign_id: &str) -> bool {
        self.expanded_campaigns.contains(campaign_id)
    }

    pub fn is_hour_expanded(&self, key: &str) -> bool {
        self.expanded_hours.contains(key)
    }

    pub fn is_offer_expanded(&self, key: &str) -> bool {
        self.expanded_offers.contains(key)
    }

    pub fn hour_rows(&self, campaign_id: &str) -> Option<&[BreakdownRow]> {
        self.hour_rows.get(campaign_id).map(|v| v.as_slice())
    }

    pub fn offer_rows(&self, hour_key: &str) -> Option<&[BreakdownRow]> {
        self.offer_rows.get(hour_key).map(|v| v.as_slice())
    }

    pub fn landing_rows(&self, offer_key: &str) -> Option<&[BreakdownRow]> {
        self.landing_rows.get(offer_key).map(|v| v.as_slice())
    }

    /// Expand or collapse a campaign. Returns whether it is expanded after
    /// the call. Expanding generates and caches the hourly breakdown if
    /// none is cached; collapsing cascades through hours and offers.
    pub fn toggle_campaign(&mut self, record: &FactRecord) -> bool {
        let id = record.id.as_str();
        if self.expanded_campaigns.remove(id) {
            self.evict_campaign(id);
            tracing::debug!(campaign = id, "Collapsed campaign");
            return false;
        }

        if !self.hour_rows.contains_key(id) {
            let hours = self.generate_hours(record);
            self.hour_rows.insert(id.to_string(), hours);
        }
        self.expanded_campaigns.insert(id.to_string());
        tracing::debug!(campaign = id, "Expanded campaign");
        true
    }

    /// Expand or collapse an hour node. No-op unless the parent campaign
    /// is expanded and its hour rows are cached.
    pub fn toggle_hour(&mut self, campaign_id: &str, hour: u8) -> bool {
        let key = hour_key(campaign_id, hour);
        if self.expanded_hours.remove(&key) {
            self.evict_hour(&key);
            return false;
        }

        if !self.expanded_campaigns.contains(campaign_id) {
            tracing::warn!(campaign = campaign_id, hour, "Hour toggle on collapsed campaign");
            return false;
        }
        let Some(parent) = self
            .hour_rows
            .get(campaign_id)
            .and_then(|rows| rows.iter().find(|r| r.key == key))
            .map(|r| r.counters)
        else {
            tracing::warn!(campaign = campaign_id, hour, "Hour toggle without cached hour row");
            return false;
        };

        if !self.offer_rows.contains_key(&key) {
            let count = self.fanout(
                self.config.min_offers_per_hour,
                self.config.max_offers_per_hour,
            );
            let offers = self.generate_children(&parent, count, &key, "Offer");
            self.offer_rows.insert(key.clone(), offers);
        }
        self.expanded_hours.insert(key);
        true
    }

    /// Expand or collapse an offer node. No-op unless the parent hour is
    /// expanded and the offer row is cached.
    pub fn toggle_offer(&mut self, campaign_id: &str, hour: u8, offer: usize) -> bool {
        let parent_key = hour_key(campaign_id, hour);
        let key = offer_key(campaign_id, hour, offer);
        if self.expanded_offers.remove(&key) {
            self.landing_rows.remove(&key);
            return false;
        }

        if !self.expanded_hours.contains(&parent_key) {
            tracing::warn!(campaign = campaign_id, hour, offer, "Offer toggle on collapsed hour");
            return false;
        }
        let Some(parent) = self
            .offer_rows
            .get(&parent_key)
            .and_then(|rows| rows.iter().find(|r| r.key == key))
            .map(|r| r.counters)
        else {
            tracing::warn!(campaign = campaign_id, hour, offer, "Offer toggle without cached row");
            return false;
        };

        if !self.landing_rows.contains_key(&key) {
            let count = self.fanout(
                self.config.min_landings_per_offer,
                self.config.max_landings_per_offer,
            );
            let landings = self.generate_children(&parent, count, &key, "Lander");
            self.landing_rows.insert(key.clone(), landings);
        }
        self.expanded_offers.insert(key);
        true
    }

    /// Drop all expansion state and cached rows (refresh / reset).
    pub fn clear(&mut self) {
        self.expanded_campaigns.clear();
        self.expanded_hours.clear();
        self.expanded_offers.clear();
        self.hour_rows.clear();
        self.offer_rows.clear();
        self.landing_rows.clear();
    }

    fn evict_campaign(&mut self, campaign_id: &str) {
        let prefix = format!("{campaign_id}::");
        self.hour_rows.remove(campaign_id);
        self.expanded_hours.retain(|k| !k.starts_with(&prefix));
        self.expanded_offers.retain(|k| !k.starts_with(&prefix));
        self.offer_rows.retain(|k, _| !k.starts_with(&prefix));
        self.landing_rows.retain(|k, _| !k.starts_with(&prefix));
    }

    fn evict_hour(&mut self, hour_key: &str) {
        let prefix = format!("{hour_key}::");
        self.offer_rows.remove(hour_key);
        self.expanded_offers.retain(|k| !k.starts_with(&prefix));
        self.landing_rows.retain(|k, _| !k.starts_with(&prefix));
    }

    fn fanout(&mut self, min: usize, max: usize) -> usize {
        if min >= max {
            min.max(1)
        } else {
            self.rng.gen_range(min..=max)
        }
    }

    fn generate_hours(&mut self, record: &FactRecord) -> Vec<BreakdownRow> {
        let buckets = self.config.hour_buckets.max(1) as usize;
        let splits = split_counters(&record.counters, buckets, &mut self.rng);
        splits
            .into_iter()
            .enumerate()
            .map(|(h, counters)| BreakdownRow {
                key: hour_key(&record.id, h as u8),
                label: format!("{h:02}:00"),
                counters,
            })
            .collect()
    }

    fn generate_children(
        &mut self,
        parent: &Counters,
        count: usize,
        parent_key: &str,
        label_prefix: &str,
    ) -> Vec<BreakdownRow> {
        let splits = split_counters(parent, count, &mut self.rng);
        splits
            .into_iter()
            .enumerate()
            .map(|(i, counters)| BreakdownRow {
                key: format!("{parent_key}::{i}"),
                label: format!("{label_prefix} {}", i + 1),
                counters,
            })
            .collect()
    }
}

/// Split a parent's raw counters across `n` siblings. One random weight per
/// sibling, normalized so the children's counters sum back to the parent
/// (integer remainders land on the last sibling). Derived metrics are then
/// recomputed per child from its own counters by `Counters::new`.
fn split_counters(parent: &Counters, n: usize, rng: &mut StdRng) -> Vec<Counters> {
    let weights: Vec<f64> = (0..n).map(|_| rng.gen_range(0.5..1.5)).collect();
    let total: f64 = weights.iter().sum();
    let shares: Vec<f64> = weights.iter().map(|w| w / total).collect();

    let clicks = split_u64(parent.clicks, &shares);
    let lp_views = split_u64(parent.lp_views, &shares);
    let lp_clicks = split_u64(parent.lp_clicks, &shares);
    let purchases = split_u64(parent.purchases, &shares);
    let cost = split_f64(parent.cost, &shares);
    let revenue = split_f64(parent.revenue, &shares);

    (0..n)
        .map(|i| {
            Counters::new(
                clicks[i],
                lp_views[i],
                lp_clicks[i],
                purchases[i],
                cost[i],
                revenue[i],
            )
        })
        .collect()
}

fn split_u64(parent: u64, shares: &[f64]) -> Vec<u64> {
    let mut out = Vec::with_capacity(shares.len());
    let mut used = 0u64;
    for (i, share) in shares.iter().enumerate() {
        let value = if i == shares.len() - 1 {
            parent - used
        } else {
            (parent as f64 * share).floor() as u64
        };
        used += value;
        out.push(value);
    }
    out
}

fn split_f64(parent: f64, shares: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(shares.len());
    let mut used = 0.0;
    for (i, share) in shares.iter().enumerate() {
        let value = if i == shares.len() - 1 {
            parent - used
        } else {
            parent * share
        };
        used += value;
        out.push(value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use trafficdesk_core::types::Platform;

    fn record() -> FactRecord {
        FactRecord::new(
            "c1",
            "Summer Sale",
            Platform::Google,
            "evergreen",
            Counters::new(4800, 3600, 1200, 240, 2400.0, 3600.0),
        )
    }

    fn state() -> DrilldownState {
        DrilldownState::new(GridConfig::default(), Some(42))
    }

    #[test]
    fn test_expand_generates_24_hours() {
        let mut drill = state();
        assert!(drill.toggle_campaign(&record()));
        let hours = drill.hour_rows("c1").unwrap();
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[0].key, "c1::00");
        assert_eq!(hours[23].label, "23:00");
    }

    #[test]
    fn test_split_preserves_integer_sums() {
        let mut drill = state();
        drill.toggle_campaign(&record());
        let hours = drill.hour_rows("c1").unwrap();
        let clicks: u64 = hours.iter().map(|h| h.counters.clicks).sum();
        let purchases: u64 = hours.iter().map(|h| h.counters.purchases).sum();
        let cost: f64 = hours.iter().map(|h| h.counters.cost).sum();
        assert_eq!(clicks, 4800);
        assert_eq!(purchases, 240);
        assert!((cost - 2400.0).abs() < 1e-6);
    }

    #[test]
    fn test_children_recompute_derived_metrics_from_own_counters() {
        let mut drill = state();
        drill.toggle_campaign(&record());
        for hour in drill.hour_rows("c1").unwrap() {
            let c = hour.counters;
            assert_eq!(c.profit, c.revenue - c.cost);
            if c.purchases > 0 {
                assert!((c.cpa() - c.cost / c.purchases as f64).abs() < 1e-9);
            } else {
                assert_eq!(c.cpa(), 0.0);
            }
            assert!(c.roi().is_finite());
        }
    }

    #[test]
    fn test_cached_rows_are_stable_while_expanded() {
        let mut drill = state();
        drill.toggle_campaign(&record());
        let first = drill.hour_rows("c1").unwrap().to_vec();
        let second = drill.hour_rows("c1").unwrap().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_offer_fanout_within_bounds() {
        let mut drill = state();
        drill.toggle_campaign(&record());
        assert!(drill.toggle_hour("c1", 3));
        let offers = drill.offer_rows(&hour_key("c1", 3)).unwrap();
        assert!((3..=4).contains(&offers.len()));
        assert_eq!(offers[0].label, "Offer 1");
    }

    #[test]
    fn test_hour_toggle_requires_expanded_campaign() {
        let mut drill = state();
        assert!(!drill.toggle_hour("c1", 3));
        assert!(drill.offer_rows(&hour_key("c1", 3)).is_none());
    }

    #[test]
    fn test_offer_toggle_requires_expanded_hour() {
        let mut drill = state();
        drill.toggle_campaign(&record());
        assert!(!drill.toggle_offer("c1", 3, 0));
    }

    #[test]
    fn test_collapse_cascades_and_evicts() {
        let mut drill = state();
        let rec = record();
        drill.toggle_campaign(&rec);
        drill.toggle_hour("c1", 3);
        drill.toggle_offer("c1", 3, 0);

        let hk = hour_key("c1", 3);
        let ok = offer_key("c1", 3, 0);
        assert!(drill.is_hour_expanded(&hk));
        assert!(drill.is_offer_expanded(&ok));
        assert!(drill.landing_rows(&ok).is_some());

        // collapse the campaign: every descendant entry and cache must go
        assert!(!drill.toggle_campaign(&rec));
        assert!(!drill.is_campaign_expanded("c1"));
        assert!(!drill.is_hour_expanded(&hk));
        assert!(!drill.is_offer_expanded(&ok));
        assert!(drill.hour_rows("c1").is_none());
        assert!(drill.offer_rows(&hk).is_none());
        assert!(drill.landing_rows(&ok).is_none());
    }

    #[test]
    fn test_reexpand_regenerates_rows() {
        let mut drill = state();
        let rec = record();
        drill.toggle_campaign(&rec);
        let first = drill.hour_rows("c1").unwrap().to_vec();
        drill.toggle_campaign(&rec);
        drill.toggle_campaign(&rec);
        let second = drill.hour_rows("c1").unwrap().to_vec();
        // regenerated with fresh randomness; raw sums still match the parent
        assert_eq!(second.len(), 24);
        let sum: u64 = second.iter().map(|h| h.counters.clicks).sum();
        assert_eq!(sum, 4800);
        assert_ne!(first, second);
    }

    #[test]
    fn test_hour_collapse_evicts_only_that_subtree() {
        let mut drill = state();
        let rec = record();
        drill.toggle_campaign(&rec);
        drill.toggle_hour("c1", 3);
        drill.toggle_hour("c1", 7);
        drill.toggle_offer("c1", 3, 0);

        assert!(!drill.toggle_hour("c1", 3));
        assert!(drill.offer_rows(&hour_key("c1", 3)).is_none());
        assert!(!drill.is_offer_expanded(&offer_key("c1", 3, 0)));
        assert!(drill.landing_rows(&offer_key("c1", 3, 0)).is_none());
        // sibling subtree untouched
        assert!(drill.is_hour_expanded(&hour_key("c1", 7)));
        assert!(drill.offer_rows(&hour_key("c1", 7)).is_some());
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut drill = state();
        let rec = record();
        drill.toggle_campaign(&rec);
        drill.toggle_hour("c1", 0);
        drill.clear();
        assert!(!drill.is_campaign_expanded("c1"));
        assert!(drill.hour_rows("c1").is_none());
        assert!(drill.offer_rows(&hour_key("c1", 0)).is_none());
    }
}
