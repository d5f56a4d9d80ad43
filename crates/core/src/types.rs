//! Domain types for campaign performance rows: raw counters plus the
//! derived-metric math shared by every drill-down level.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Google,
    Facebook,
    Tiktok,
    Snap,
    Newsbreak,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Google,
        Platform::Facebook,
        Platform::Tiktok,
        Platform::Snap,
        Platform::Newsbreak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Google => "google",
            Platform::Facebook => "facebook",
            Platform::Tiktok => "tiktok",
            Platform::Snap => "snap",
            Platform::Newsbreak => "newsbreak",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(Platform::Google),
            "facebook" | "meta" => Ok(Platform::Facebook),
            "tiktok" => Ok(Platform::Tiktok),
            "snap" | "snapchat" => Ok(Platform::Snap),
            "newsbreak" => Ok(Platform::Newsbreak),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Raw performance counters for one row at any drill-down level.
///
/// `profit` is fixed at construction; every ratio metric is computed on
/// demand from these counters and is never stored. A zero denominator
/// yields 0.0, never NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Counters {
    pub clicks: u64,
    pub lp_views: u64,
    pub lp_clicks: u64,
    pub purchases: u64,
    pub cost: f64,
    pub revenue: f64,
    pub profit: f64,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

impl Counters {
    pub fn new(
        clicks: u64,
        lp_views: u64,
        lp_clicks: u64,
        purchases: u64,
        cost: f64,
        revenue: f64,
    ) -> Self {
        Self {
            clicks,
            lp_views,
            lp_clicks,
            purchases,
            cost,
            revenue,
            profit: revenue - cost,
        }
    }

    /// Landing page click-through rate, percent.
    pub fn lp_ctr(&self) -> f64 {
        ratio(self.lp_clicks as f64, self.lp_views as f64) * 100.0
    }

    /// Return on investment, percent.
    pub fn roi(&self) -> f64 {
        ratio(self.profit, self.cost) * 100.0
    }

    /// Cost per acquisition.
    pub fn cpa(&self) -> f64 {
        ratio(self.cost, self.purchases as f64)
    }

    /// Average order value.
    pub fn aov(&self) -> f64 {
        ratio(self.revenue, self.purchases as f64)
    }

    /// Conversion rate, percent.
    pub fn cr(&self) -> f64 {
        ratio(self.purchases as f64, self.clicks as f64) * 100.0
    }

    /// Cost per landing page click.
    pub fn lpcpc(&self) -> f64 {
        ratio(self.cost, self.lp_clicks as f64)
    }

    /// Revenue per landing page click.
    pub fn lpepc(&self) -> f64 {
        ratio(self.revenue, self.lp_clicks as f64)
    }

    /// Accumulate another row's counters (used for the totals row).
    pub fn accumulate(&mut self, other: &Counters) {
        self.clicks += other.clicks;
        self.lp_views += other.lp_views;
        self.lp_clicks += other.lp_clicks;
        self.purchases += other.purchases;
        self.cost += other.cost;
        self.revenue += other.revenue;
        self.profit += other.profit;
    }
}

/// A top-level campaign performance row as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRecord {
    pub id: String,
    pub title: String,
    pub platform: Platform,
    pub tag: String,
    pub counters: Counters,
}

impl FactRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        platform: Platform,
        tag: impl Into<String>,
        counters: Counters,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            platform,
            tag: tag.into(),
            counters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit_fixed_at_construction() {
        let c = Counters::new(50, 40, 10, 5, 100.0, 150.0);
        assert_eq!(c.profit, 50.0);

        let negative = Counters::new(10, 10, 10, 1, 200.0, 80.0);
        assert_eq!(negative.profit, -120.0);
    }

    #[test]
    fn test_derived_metrics_worked_example() {
        let c = Counters::new(50, 40, 10, 5, 100.0, 150.0);
        assert_eq!(c.roi(), 50.0);
        assert_eq!(c.cpa(), 20.0);
        assert_eq!(c.aov(), 30.0);
        assert_eq!(c.cr(), 10.0);
        assert_eq!(c.lpcpc(), 10.0);
        assert_eq!(c.lpepc(), 15.0);
        assert_eq!(c.lp_ctr(), 25.0);
    }

    #[test]
    fn test_zero_denominators_yield_zero() {
        let c = Counters::new(0, 0, 0, 0, 0.0, 0.0);
        for value in [
            c.lp_ctr(),
            c.roi(),
            c.cpa(),
            c.aov(),
            c.cr(),
            c.lpcpc(),
            c.lpepc(),
        ] {
            assert_eq!(value, 0.0);
            assert!(value.is_finite());
        }
    }

    #[test]
    fn test_accumulate_sums_counters() {
        let mut total = Counters::default();
        total.accumulate(&Counters::new(10, 20, 5, 2, 50.0, 75.0));
        total.accumulate(&Counters::new(30, 40, 15, 4, 150.0, 125.0));
        assert_eq!(total.clicks, 40);
        assert_eq!(total.lp_views, 60);
        assert_eq!(total.lp_clicks, 20);
        assert_eq!(total.purchases, 6);
        assert_eq!(total.cost, 200.0);
        assert_eq!(total.revenue, 200.0);
        assert_eq!(total.profit, 0.0);
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!("google".parse::<Platform>().unwrap(), Platform::Google);
        assert_eq!("META".parse::<Platform>().unwrap(), Platform::Facebook);
        assert_eq!("snapchat".parse::<Platform>().unwrap(), Platform::Snap);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_serde_snake_case() {
        let json = serde_json::to_string(&Platform::Newsbreak).unwrap();
        assert_eq!(json, "\"newsbreak\"");
    }
}
