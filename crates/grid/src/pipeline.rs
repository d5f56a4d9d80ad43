//! Filter, sort, and pagination stages. Each stage runs to completion over
//! the full input before the next: filter, then a single stable sort, then
//! the page slice. Totals come from the filtered set, never the page.

use crate::columns::ColumnId;
use serde::{Deserialize, Serialize};
use trafficdesk_core::types::{Counters, FactRecord};
use trafficdesk_core::GridFilters;

pub const PAGE_SIZES: [usize; 4] = [25, 50, 100, 200];
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Single active sort column. Header clicks cycle
/// unsorted -> ascending -> descending -> unsorted; a different column
/// starts over at ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SortState {
    pub column: Option<ColumnId>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    pub fn cycle(&mut self, column: ColumnId) {
        if !column.sortable() {
            return;
        }
        if self.column == Some(column) {
            match self.direction {
                Some(SortDirection::Ascending) => self.direction = Some(SortDirection::Descending),
                Some(SortDirection::Descending) | None => self.clear(),
            }
        } else {
            self.column = Some(column);
            self.direction = Some(SortDirection::Ascending);
        }
    }

    pub fn clear(&mut self) {
        self.column = None;
        self.direction = None;
    }

    pub fn is_active(&self) -> bool {
        self.column.is_some() && self.direction.is_some()
    }
}

/// A sortable cell value. Columns are homogeneous, so cross-kind
/// comparisons only arise from programming errors and order as equal.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    fn compare(&self, other: &CellValue) -> std::cmp::Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

/// Value of one column for a top-level fact record.
pub fn fact_cell(record: &FactRecord, column: ColumnId) -> CellValue {
    counters_cell(&record.counters, column).unwrap_or_else(|| match column {
        ColumnId::Expand => CellValue::Empty,
        ColumnId::Title => CellValue::Text(record.title.clone()),
        ColumnId::Platform => CellValue::Text(record.platform.as_str().to_string()),
        ColumnId::Tag => CellValue::Text(record.tag.clone()),
        _ => CellValue::Empty,
    })
}

/// Value of a metric column from raw counters; `None` for identity columns.
pub fn counters_cell(counters: &Counters, column: ColumnId) -> Option<CellValue> {
    let value = match column {
        ColumnId::Clicks => counters.clicks as f64,
        ColumnId::LpViews => counters.lp_views as f64,
        ColumnId::LpClicks => counters.lp_clicks as f64,
        ColumnId::Purchases => counters.purchases as f64,
        ColumnId::LpCtr => counters.lp_ctr(),
        ColumnId::Cr => counters.cr(),
        ColumnId::Cost => counters.cost,
        ColumnId::Cpa => counters.cpa(),
        ColumnId::Aov => counters.aov(),
        ColumnId::Revenue => counters.revenue,
        ColumnId::Lpcpc => counters.lpcpc(),
        ColumnId::Lpepc => counters.lpepc(),
        ColumnId::Profit => counters.profit,
        ColumnId::Roi => counters.roi(),
        _ => return None,
    };
    Some(CellValue::Number(value))
}

/// Stage 1: platform membership, then title substring, then tag substring.
pub fn apply_filters<'a>(facts: &'a [FactRecord], filters: &GridFilters) -> Vec<&'a FactRecord> {
    facts.iter().filter(|f| filters.matches(f)).collect()
}

/// Stage 2: stable sort by the active column. No active sort keeps the
/// filtered order.
pub fn apply_sort(rows: &mut [&FactRecord], sort: &SortState) {
    let (Some(column), Some(direction)) = (sort.column, sort.direction) else {
        return;
    };
    rows.sort_by(|a, b| {
        let ord = fact_cell(a, column).compare(&fact_cell(b, column));
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size)
}

/// Clamp a 1-based page number into `[1, total_pages]` (page 1 when the
/// filtered set is empty).
pub fn clamp_page(page: usize, count: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(count, page_size).max(1))
}

/// Stage 3: the index range of the current page within the sorted set.
pub fn page_range(count: usize, page: usize, page_size: usize) -> std::ops::Range<usize> {
    let page = clamp_page(page, count, page_size);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(count);
    start..end.max(start)
}

/// Totals row: aggregate sums over the filtered set. Ratio metrics are
/// recomputed from these sums by the caller, never averaged per row.
pub fn totals<'a>(rows: impl IntoIterator<Item = &'a FactRecord>) -> Counters {
    let mut acc = Counters::default();
    for row in rows {
        acc.accumulate(&row.counters);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use trafficdesk_core::types::Platform;

    fn fact(id: &str, title: &str, platform: Platform, cost: f64, revenue: f64) -> FactRecord {
        FactRecord::new(
            id,
            title,
            platform,
            "tag",
            Counters::new(100, 80, 40, 10, cost, revenue),
        )
    }

    fn sample() -> Vec<FactRecord> {
        vec![
            fact("a", "Summer Sale", Platform::Google, 100.0, 150.0),
            fact("b", "Winter Promo", Platform::Tiktok, 50.0, 40.0),
            fact("c", "Spring Launch", Platform::Snap, 75.0, 200.0),
            fact("d", "Summer Clearance", Platform::Google, 30.0, 30.0),
        ]
    }

    #[test]
    fn test_filter_by_platform_set() {
        let facts = sample();
        let filters = GridFilters {
            platforms: vec![Platform::Google],
            ..Default::default()
        };
        let rows = apply_filters(&facts, &filters);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.platform == Platform::Google));

        let unfiltered = apply_filters(&facts, &GridFilters::default());
        assert_eq!(unfiltered.len(), 4);
    }

    #[test]
    fn test_sort_cycle_three_states() {
        let mut sort = SortState::default();
        sort.cycle(ColumnId::Cost);
        assert_eq!(sort.direction, Some(SortDirection::Ascending));
        sort.cycle(ColumnId::Cost);
        assert_eq!(sort.direction, Some(SortDirection::Descending));
        sort.cycle(ColumnId::Cost);
        assert!(!sort.is_active());
    }

    #[test]
    fn test_sort_switch_column_resets_to_ascending() {
        let mut sort = SortState::default();
        sort.cycle(ColumnId::Cost);
        sort.cycle(ColumnId::Cost);
        sort.cycle(ColumnId::Revenue);
        assert_eq!(sort.column, Some(ColumnId::Revenue));
        assert_eq!(sort.direction, Some(SortDirection::Ascending));
    }

    #[test]
    fn test_expander_column_not_sortable() {
        let mut sort = SortState::default();
        sort.cycle(ColumnId::Expand);
        assert!(!sort.is_active());
    }

    #[test]
    fn test_sort_ascending_descending_are_reverses() {
        let facts = sample();
        let mut sort = SortState::default();
        sort.cycle(ColumnId::Cost);

        let mut asc = apply_filters(&facts, &GridFilters::default());
        apply_sort(&mut asc, &sort);
        let asc_ids: Vec<_> = asc.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(asc_ids, ["d", "b", "c", "a"]);

        sort.cycle(ColumnId::Cost);
        let mut desc = apply_filters(&facts, &GridFilters::default());
        apply_sort(&mut desc, &sort);
        let desc_ids: Vec<_> = desc.iter().map(|r| r.id.as_str()).collect();
        let mut reversed = asc_ids.clone();
        reversed.reverse();
        assert_eq!(desc_ids, reversed);

        // third click: back to filtered order
        sort.cycle(ColumnId::Cost);
        let mut cleared = apply_filters(&facts, &GridFilters::default());
        apply_sort(&mut cleared, &sort);
        let ids: Vec<_> = cleared.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_sort_text_column() {
        let facts = sample();
        let mut sort = SortState::default();
        sort.cycle(ColumnId::Title);
        let mut rows = apply_filters(&facts, &GridFilters::default());
        apply_sort(&mut rows, &sort);
        let titles: Vec<_> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Spring Launch",
                "Summer Clearance",
                "Summer Sale",
                "Winter Promo"
            ]
        );
    }

    #[test]
    fn test_page_math() {
        assert_eq!(total_pages(0, 100), 0);
        assert_eq!(total_pages(100, 100), 1);
        assert_eq!(total_pages(101, 100), 2);
        assert_eq!(total_pages(250, 25), 10);

        assert_eq!(clamp_page(7, 101, 100), 2);
        assert_eq!(clamp_page(0, 101, 100), 1);
        assert_eq!(clamp_page(1, 0, 100), 1);

        assert_eq!(page_range(250, 2, 100), 100..200);
        assert_eq!(page_range(250, 3, 100), 200..250);
        assert_eq!(page_range(0, 1, 100), 0..0);
    }

    #[test]
    fn test_totals_from_filtered_set() {
        let facts = sample();
        let filters = GridFilters {
            platforms: vec![Platform::Google],
            ..Default::default()
        };
        let rows = apply_filters(&facts, &filters);
        let totals = totals(rows.into_iter());
        assert_eq!(totals.cost, 130.0);
        assert_eq!(totals.revenue, 180.0);
        assert_eq!(totals.profit, 50.0);
        assert_eq!(totals.clicks, 200);
        // ratio recomputed from sums
        assert!((totals.roi() - 50.0 / 130.0 * 100.0).abs() < 1e-9);
    }
}
