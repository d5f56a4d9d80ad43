//! The campaign grid engine. Owns every piece of table state: dataset,
//! filters, sort, pagination, column layout, drill-down expansion and
//! caches, overlay slot, and the load lifecycle. All transitions are
//! synchronous reducers over this state; the only async edge is the
//! data-source fetch.

use crate::columns::{ColumnId, ColumnLayout, LayoutSnapshot, MIN_COLUMN_WIDTH};
use crate::drilldown::{BreakdownRow, DrilldownState};
use crate::overlay::OverlayState;
use crate::pipeline::{
    apply_filters, apply_sort, clamp_page, page_range, total_pages, totals, SortState,
    DEFAULT_PAGE_SIZE, PAGE_SIZES,
};
use crate::source::DataSource;
use crate::store::LayoutStore;
use crate::theme::profit_band;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use trafficdesk_core::config::GridConfig;
use trafficdesk_core::types::{Counters, FactRecord, Platform};
use trafficdesk_core::{GridFilters, GridResult};

/// Load lifecycle of the dataset. `Failed` is distinguishable from an
/// empty `Ready` result; a fetch error never renders as a silent empty
/// table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLevel {
    Campaign,
    Hour,
    Offer,
    Landing,
}

impl RowLevel {
    /// Indentation depth for rendering.
    pub fn depth(&self) -> usize {
        match self {
            RowLevel::Campaign => 0,
            RowLevel::Hour => 1,
            RowLevel::Offer => 2,
            RowLevel::Landing => 3,
        }
    }
}

/// One entry of the flattened render list.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub key: String,
    pub level: RowLevel,
    pub label: String,
    pub platform: Option<Platform>,
    pub tag: Option<String>,
    pub counters: Counters,
    pub expanded: bool,
    pub expandable: bool,
    /// Signed profit band, see [`crate::theme::profit_band`].
    pub band: i8,
}

impl GridRow {
    fn campaign(fact: &FactRecord, expanded: bool) -> Self {
        Self {
            key: fact.id.clone(),
            level: RowLevel::Campaign,
            label: fact.title.clone(),
            platform: Some(fact.platform),
            tag: Some(fact.tag.clone()),
            counters: fact.counters,
            expanded,
            expandable: true,
            band: profit_band(fact.counters.profit),
        }
    }

    fn breakdown(level: RowLevel, row: &BreakdownRow, expanded: bool) -> Self {
        Self {
            key: row.key.clone(),
            level,
            label: row.label.clone(),
            platform: None,
            tag: None,
            counters: row.counters,
            expanded,
            expandable: level != RowLevel::Landing,
            band: profit_band(row.counters.profit),
        }
    }
}

/// Scoped column-resize drag. Deltas are relative to the width at drag
/// start; dropping the gesture is the release, on every exit path.
pub struct ResizeGesture<'a> {
    layout: &'a mut ColumnLayout,
    column: ColumnId,
    start_width: u32,
}

impl ResizeGesture<'_> {
    pub fn drag(&mut self, delta_px: i32) -> u32 {
        let target = (self.start_width as i64 + delta_px as i64).max(MIN_COLUMN_WIDTH as i64);
        self.layout.set_width(self.column, target as u32)
    }
}

impl Drop for ResizeGesture<'_> {
    fn drop(&mut self) {
        debug!(
            column = self.column.as_str(),
            width = self.layout.width(self.column),
            "Resize gesture released"
        );
    }
}

pub struct CampaignGrid {
    facts: Vec<FactRecord>,
    filters: GridFilters,
    sort: SortState,
    page: usize,
    page_size: usize,
    layout: ColumnLayout,
    layout_key: String,
    drill: DrilldownState,
    overlay: OverlayState,
    load_state: LoadState,
    last_refreshed: Option<DateTime<Utc>>,
    source: Box<dyn DataSource>,
    store: Arc<dyn LayoutStore>,
}

impl CampaignGrid {
    pub fn new(
        config: GridConfig,
        source: Box<dyn DataSource>,
        store: Arc<dyn LayoutStore>,
        layout_key: impl Into<String>,
    ) -> Self {
        Self::build(config, source, store, layout_key.into(), None)
    }

    /// Like [`CampaignGrid::new`] but with a fixed drill-down RNG seed, for
    /// reproducible generated breakdowns.
    pub fn seeded(
        config: GridConfig,
        source: Box<dyn DataSource>,
        store: Arc<dyn LayoutStore>,
        layout_key: impl Into<String>,
        seed: u64,
    ) -> Self {
        Self::build(config, source, store, layout_key.into(), Some(seed))
    }

    fn build(
        config: GridConfig,
        source: Box<dyn DataSource>,
        store: Arc<dyn LayoutStore>,
        layout_key: String,
        seed: Option<u64>,
    ) -> Self {
        let page_size = if PAGE_SIZES.contains(&config.page_size) {
            config.page_size
        } else {
            warn!(
                page_size = config.page_size,
                "Configured page size not in {PAGE_SIZES:?}, using default"
            );
            DEFAULT_PAGE_SIZE
        };
        let mut grid = Self {
            facts: Vec::new(),
            filters: GridFilters::default(),
            sort: SortState::default(),
            page: 1,
            page_size,
            layout: ColumnLayout::default(),
            layout_key,
            drill: DrilldownState::new(config, seed),
            overlay: OverlayState::default(),
            load_state: LoadState::Idle,
            last_refreshed: None,
            source,
            store,
        };
        grid.load_layout();
        grid
    }

    // ─── Load lifecycle ─────────────────────────────────────────────────

    /// Replace the whole dataset from the data source. Clears drill-down
    /// caches, expansion, sort, and page; column layout and filters stay.
    /// A refresh requested while one is pending is ignored.
    pub async fn refresh(&mut self) -> GridResult<()> {
        if self.load_state == LoadState::Loading {
            debug!("Refresh ignored: fetch already in flight");
            return Ok(());
        }
        self.load_state = LoadState::Loading;
        match self.source.fetch_facts().await {
            Ok(facts) => {
                info!(count = facts.len(), "Dataset refreshed");
                self.facts = facts;
                self.drill.clear();
                self.sort.clear();
                self.page = 1;
                self.last_refreshed = Some(Utc::now());
                self.load_state = LoadState::Ready;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Dataset refresh failed");
                self.load_state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    pub fn facts(&self) -> &[FactRecord] {
        &self.facts
    }

    // ─── Filters, sort, pagination ──────────────────────────────────────

    pub fn filters(&self) -> &GridFilters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: GridFilters) {
        self.filters = filters;
        self.page = clamp_page(self.page, self.filtered_count(), self.page_size);
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Header click: cycle the sort state on `column`.
    pub fn toggle_sort(&mut self, column: ColumnId) {
        self.sort.cycle(column);
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.filtered_count(), self.page_size);
    }

    /// Returns false when `size` is not one of the supported page sizes.
    pub fn set_page_size(&mut self, size: usize) -> bool {
        if !PAGE_SIZES.contains(&size) {
            warn!(size, "Rejected page size not in {PAGE_SIZES:?}");
            return false;
        }
        self.page_size = size;
        self.page = clamp_page(self.page, self.filtered_count(), self.page_size);
        true
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_count(), self.page_size)
    }

    pub fn filtered_count(&self) -> usize {
        apply_filters(&self.facts, &self.filters).len()
    }

    /// Totals row over the filtered set (all pages), with ratio metrics
    /// recomputable from the aggregate sums.
    pub fn totals(&self) -> Counters {
        totals(apply_filters(&self.facts, &self.filters).into_iter())
    }

    // ─── Drill-down ─────────────────────────────────────────────────────

    /// Expand or collapse a campaign by id. Returns whether it is expanded
    /// after the call; unknown ids are a no-op.
    pub fn toggle_campaign(&mut self, campaign_id: &str) -> bool {
        let Some(record) = self.facts.iter().find(|f| f.id == campaign_id) else {
            warn!(campaign = campaign_id, "Toggle for unknown campaign id");
            return false;
        };
        self.drill.toggle_campaign(record)
    }

    pub fn toggle_hour(&mut self, campaign_id: &str, hour: u8) -> bool {
        self.drill.toggle_hour(campaign_id, hour)
    }

    pub fn toggle_offer(&mut self, campaign_id: &str, hour: u8, offer: usize) -> bool {
        self.drill.toggle_offer(campaign_id, hour, offer)
    }

    pub fn drilldown(&self) -> &DrilldownState {
        &self.drill
    }

    /// The flattened render list: the current page of filtered/sorted
    /// campaigns with cached child rows spliced in pre-order under every
    /// expanded node.
    pub fn visible_rows(&self) -> Vec<GridRow> {
        let mut filtered = apply_filters(&self.facts, &self.filters);
        apply_sort(&mut filtered, &self.sort);
        let range = page_range(filtered.len(), self.page, self.page_size);

        let mut rows = Vec::new();
        for fact in &filtered[range] {
            let expanded = self.drill.is_campaign_expanded(&fact.id);
            rows.push(GridRow::campaign(fact, expanded));
            if !expanded {
                continue;
            }
            let Some(hours) = self.drill.hour_rows(&fact.id) else {
                continue;
            };
            for hour in hours {
                let hour_expanded = self.drill.is_hour_expanded(&hour.key);
                rows.push(GridRow::breakdown(RowLevel::Hour, hour, hour_expanded));
                if !hour_expanded {
                    continue;
                }
                let Some(offers) = self.drill.offer_rows(&hour.key) else {
                    continue;
                };
                for offer in offers {
                    let offer_expanded = self.drill.is_offer_expanded(&offer.key);
                    rows.push(GridRow::breakdown(RowLevel::Offer, offer, offer_expanded));
                    if !offer_expanded {
                        continue;
                    }
                    let Some(landings) = self.drill.landing_rows(&offer.key) else {
                        continue;
                    };
                    for landing in landings {
                        rows.push(GridRow::breakdown(RowLevel::Landing, landing, false));
                    }
                }
            }
        }
        rows
    }

    // ─── Column layout ──────────────────────────────────────────────────

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn toggle_column(&mut self, index: usize) {
        self.layout.toggle_hidden(index);
    }

    pub fn reorder_columns(&mut self, dragged: usize, target: usize) {
        self.layout.reorder(dragged, target);
    }

    /// Start a resize drag on `column`. The returned gesture applies
    /// deltas while it lives and releases on drop.
    pub fn begin_resize(&mut self, column: ColumnId) -> ResizeGesture<'_> {
        let start_width = self.layout.width(column);
        debug!(column = column.as_str(), start_width, "Resize gesture started");
        ResizeGesture {
            layout: &mut self.layout,
            column,
            start_width,
        }
    }

    /// Persist the current column layout under the configured key.
    pub fn save_layout(&self) -> GridResult<()> {
        let raw = serde_json::to_string(&self.layout.snapshot())?;
        self.store.set(&self.layout_key, &raw)?;
        debug!(key = %self.layout_key, "Column layout saved");
        Ok(())
    }

    /// Best-effort load of a persisted layout; missing or malformed data
    /// leaves the defaults in place.
    fn load_layout(&mut self) {
        let Some(raw) = self.store.get(&self.layout_key) else {
            return;
        };
        match serde_json::from_str::<LayoutSnapshot>(&raw) {
            Ok(snapshot) => {
                if self.layout.restore(snapshot) {
                    debug!(key = %self.layout_key, "Column layout restored");
                } else {
                    warn!(key = %self.layout_key, "Persisted layout failed validation, using defaults");
                }
            }
            Err(e) => {
                warn!(key = %self.layout_key, error = %e, "Persisted layout unreadable, using defaults");
            }
        }
    }

    /// Restore default layout, clear sort, page, page size, expansion
    /// state, and caches. Filters are external input and stay.
    pub fn reset_all(&mut self) {
        self.layout.reset();
        self.sort.clear();
        self.page = 1;
        self.page_size = DEFAULT_PAGE_SIZE;
        self.drill.clear();
        self.overlay.dismiss();
        info!("Grid state reset to defaults");
    }

    // ─── Overlays ───────────────────────────────────────────────────────

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayState {
        &mut self.overlay
    }
}
