use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `TRAFFICDESK__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub sample: SampleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    /// Default rows per page. Must be one of 25/50/100/200.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_hour_buckets")]
    pub hour_buckets: u8,
    #[serde(default = "default_min_offers")]
    pub min_offers_per_hour: usize,
    #[serde(default = "default_max_offers")]
    pub max_offers_per_hour: usize,
    #[serde(default = "default_min_landings")]
    pub min_landings_per_offer: usize,
    #[serde(default = "default_max_landings")]
    pub max_landings_per_offer: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Path of the JSON file backing the durable layout store.
    #[serde(default = "default_layout_path")]
    pub path: String,
    /// Fixed key the grid saves its column layout under.
    #[serde(default = "default_layout_key")]
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleConfig {
    #[serde(default = "default_campaign_count")]
    pub campaign_count: usize,
    /// Simulated fetch latency for the placeholder data source.
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,
    /// Fixed RNG seed for reproducible demo data. Unset means random.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_page_size() -> usize {
    100
}
fn default_hour_buckets() -> u8 {
    24
}
fn default_min_offers() -> usize {
    3
}
fn default_max_offers() -> usize {
    4
}
fn default_min_landings() -> usize {
    2
}
fn default_max_landings() -> usize {
    4
}
fn default_layout_path() -> String {
    "trafficdesk-layout.json".to_string()
}
fn default_layout_key() -> String {
    "campaign_grid_layout".to_string()
}
fn default_campaign_count() -> usize {
    250
}
fn default_fetch_delay_ms() -> u64 {
    400
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            hour_buckets: default_hour_buckets(),
            min_offers_per_hour: default_min_offers(),
            max_offers_per_hour: default_max_offers(),
            min_landings_per_offer: default_min_landings(),
            max_landings_per_offer: default_max_landings(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            path: default_layout_path(),
            key: default_layout_key(),
        }
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            campaign_count: default_campaign_count(),
            fetch_delay_ms: default_fetch_delay_ms(),
            seed: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            layout: LayoutConfig::default(),
            sample: SampleConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("TRAFFICDESK")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
