//! Campaign performance grid engine: hierarchical drill-down over campaign
//! fact records with a filter/sort/paginate pipeline, cached generated
//! breakdowns, persisted column layout, and an explicit load lifecycle.

pub mod columns;
pub mod drilldown;
pub mod grid;
pub mod overlay;
pub mod pipeline;
pub mod sample;
pub mod source;
pub mod store;
pub mod theme;

pub use columns::{ColumnId, ColumnKind, ColumnLayout, LayoutSnapshot};
pub use drilldown::{BreakdownRow, DrilldownState};
pub use grid::{CampaignGrid, GridRow, LoadState, ResizeGesture, RowLevel};
pub use overlay::{Overlay, OverlayState};
pub use pipeline::{SortDirection, SortState, DEFAULT_PAGE_SIZE, PAGE_SIZES};
pub use sample::SampleDataSource;
pub use source::{DataSource, StaticDataSource};
pub use store::{FileLayoutStore, LayoutStore, MemoryLayoutStore};
pub use theme::{profit_band, Theme};
