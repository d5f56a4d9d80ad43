//! End-to-end flow: fetch a sample dataset, filter, sort, paginate, drill
//! down three levels, then refresh and verify session state is rebuilt.

use std::sync::Arc;
use trafficdesk_core::config::{GridConfig, SampleConfig};
use trafficdesk_core::types::Platform;
use trafficdesk_core::GridFilters;
use trafficdesk_grid::{
    CampaignGrid, ColumnId, LoadState, MemoryLayoutStore, RowLevel, SampleDataSource,
};

fn sample_source(campaigns: usize) -> Box<SampleDataSource> {
    Box::new(SampleDataSource::new(SampleConfig {
        campaign_count: campaigns,
        fetch_delay_ms: 0,
        seed: Some(1234),
    }))
}

#[tokio::test]
async fn full_grid_session() {
    let store = Arc::new(MemoryLayoutStore::new());
    let mut grid = CampaignGrid::seeded(
        GridConfig::default(),
        sample_source(150),
        store.clone(),
        "campaign_grid_layout",
        99,
    );
    assert_eq!(*grid.load_state(), LoadState::Idle);

    grid.refresh().await.unwrap();
    assert_eq!(*grid.load_state(), LoadState::Ready);
    assert_eq!(grid.facts().len(), 150);

    // page math on the unfiltered set
    grid.set_page_size(50);
    assert_eq!(grid.total_pages(), 3);
    grid.set_page(2);
    assert_eq!(grid.visible_rows().len(), 50);

    // filter narrows the set and clamps the page
    grid.set_filters(GridFilters {
        platforms: vec![Platform::Snap, Platform::Tiktok],
        ..Default::default()
    });
    let filtered = grid.filtered_count();
    assert!(filtered < 150);
    assert!(grid.page() <= grid.total_pages().max(1));
    let rows = grid.visible_rows();
    assert!(rows
        .iter()
        .all(|r| matches!(r.platform, Some(Platform::Snap) | Some(Platform::Tiktok))));

    // totals aggregate the whole filtered set, not the page
    let totals = grid.totals();
    assert_eq!(
        totals.clicks,
        grid.facts()
            .iter()
            .filter(|f| grid.filters().matches(f))
            .map(|f| f.counters.clicks)
            .sum::<u64>()
    );

    // sort descending by profit
    grid.toggle_sort(ColumnId::Profit);
    grid.toggle_sort(ColumnId::Profit);
    grid.set_page(1);
    let rows = grid.visible_rows();
    let profits: Vec<f64> = rows.iter().map(|r| r.counters.profit).collect();
    let mut expected = profits.clone();
    expected.sort_by(|a, b| b.total_cmp(a));
    assert_eq!(profits, expected);

    // drill down three levels under the top row
    let top = rows[0].key.clone();
    assert!(grid.toggle_campaign(&top));
    assert!(grid.toggle_hour(&top, 12));
    assert!(grid.toggle_offer(&top, 12, 1));

    let rows = grid.visible_rows();
    let levels: Vec<RowLevel> = rows.iter().take(3).map(|r| r.level).collect();
    assert_eq!(
        levels,
        [RowLevel::Campaign, RowLevel::Hour, RowLevel::Hour]
    );
    assert!(rows.iter().any(|r| r.level == RowLevel::Offer));
    assert!(rows.iter().any(|r| r.level == RowLevel::Landing));

    // hour rows split the campaign's counters exactly
    let campaign_clicks = rows[0].counters.clicks;
    let hour_clicks: u64 = rows
        .iter()
        .filter(|r| r.level == RowLevel::Hour)
        .map(|r| r.counters.clicks)
        .sum();
    assert_eq!(hour_clicks, campaign_clicks);

    // layout survives a refresh; expansion does not
    grid.begin_resize(ColumnId::Title).drag(40);
    grid.save_layout().unwrap();
    grid.refresh().await.unwrap();
    assert!(!grid.drilldown().is_campaign_expanded(&top));
    assert!(grid.drilldown().hour_rows(&top).is_none());
    assert!(!grid.sort().is_active());
    assert_eq!(grid.page(), 1);
    assert_eq!(grid.layout().width(ColumnId::Title), 340);

    // a fresh grid over the same store picks the saved layout up
    let grid2 = CampaignGrid::new(
        GridConfig::default(),
        sample_source(10),
        store,
        "campaign_grid_layout",
    );
    assert_eq!(grid2.layout().width(ColumnId::Title), 340);
}
