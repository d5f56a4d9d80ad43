//! trafficdesk — campaign performance grid over sample ad-platform data.
//!
//! Non-interactive demo harness: fetches a dataset, applies filters and
//! sort, drills into the first campaigns, and renders the flattened grid.

mod table;

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use trafficdesk_core::types::Platform;
use trafficdesk_core::{AppConfig, GridFilters};
use trafficdesk_grid::{CampaignGrid, ColumnId, FileLayoutStore, RowLevel, SampleDataSource};

#[derive(Parser, Debug)]
#[command(name = "trafficdesk")]
#[command(about = "Campaign performance grid with hierarchical drill-down")]
#[command(version)]
struct Cli {
    /// Number of sample campaigns to generate (overrides config)
    #[arg(long, env = "TRAFFICDESK__SAMPLE__CAMPAIGN_COUNT")]
    campaigns: Option<usize>,

    /// Rows per page: 25, 50, 100, or 200
    #[arg(long)]
    page_size: Option<usize>,

    /// Page to display (1-based)
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Sort column id (e.g. cost, roi, title)
    #[arg(long)]
    sort: Option<ColumnId>,

    /// Sort descending instead of ascending
    #[arg(long, default_value_t = false)]
    descending: bool,

    /// Restrict to platforms (comma separated: google,facebook,tiktok,snap,newsbreak)
    #[arg(long, value_delimiter = ',')]
    platforms: Vec<Platform>,

    /// Case-insensitive substring filter on campaign title
    #[arg(long, default_value = "")]
    title: String,

    /// Case-insensitive substring filter on tag
    #[arg(long, default_value = "")]
    tag: String,

    /// Expand the first N campaigns of the current page
    #[arg(long, default_value_t = 0)]
    expand: usize,

    /// Also drill into the first expanded campaign (hour 12, offer 1)
    #[arg(long, default_value_t = false)]
    drill: bool,

    /// RNG seed for reproducible sample data and breakdowns
    #[arg(long, env = "TRAFFICDESK__SAMPLE__SEED")]
    seed: Option<u64>,

    /// Layout file path (overrides config)
    #[arg(long, env = "TRAFFICDESK__LAYOUT__PATH")]
    layout_path: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trafficdesk=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(campaigns) = cli.campaigns {
        config.sample.campaign_count = campaigns;
    }
    if let Some(seed) = cli.seed {
        config.sample.seed = Some(seed);
    }
    if let Some(path) = cli.layout_path {
        config.layout.path = path;
    }

    info!(
        campaigns = config.sample.campaign_count,
        layout = %config.layout.path,
        "trafficdesk starting"
    );

    let store = Arc::new(FileLayoutStore::open(&config.layout.path));
    let source = Box::new(SampleDataSource::new(config.sample.clone()));
    let mut grid = match config.sample.seed {
        Some(seed) => CampaignGrid::seeded(
            config.grid.clone(),
            source,
            store,
            config.layout.key.clone(),
            seed,
        ),
        None => CampaignGrid::new(config.grid.clone(), source, store, config.layout.key.clone()),
    };

    grid.refresh().await.context("initial data fetch failed")?;

    grid.set_filters(GridFilters {
        platforms: cli.platforms,
        title: cli.title,
        tag: cli.tag,
    });
    if let Some(column) = cli.sort {
        grid.toggle_sort(column);
        if cli.descending {
            grid.toggle_sort(column);
        }
    }
    if let Some(size) = cli.page_size {
        if !grid.set_page_size(size) {
            anyhow::bail!("unsupported page size {size}, pick one of 25/50/100/200");
        }
    }
    grid.set_page(cli.page);

    let top_keys: Vec<String> = grid
        .visible_rows()
        .into_iter()
        .filter(|r| r.level == RowLevel::Campaign)
        .take(cli.expand)
        .map(|r| r.key)
        .collect();
    for key in &top_keys {
        grid.toggle_campaign(key);
    }
    if cli.drill {
        if let Some(first) = top_keys.first() {
            grid.toggle_hour(first, 12);
            grid.toggle_offer(first, 12, 1);
        } else {
            warn!("--drill requires --expand of at least 1");
        }
    }

    print!("{}", table::render(&grid));
    println!("{}", table::page_summary(&grid));

    Ok(())
}
