//! Column definitions and the persisted layout state: order, pixel widths,
//! and hidden set, plus the serialized snapshot written to the layout store.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Narrowest a column can be dragged to.
pub const MIN_COLUMN_WIDTH: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnId {
    Expand,
    Title,
    Platform,
    Tag,
    Clicks,
    LpViews,
    LpClicks,
    LpCtr,
    Purchases,
    Cr,
    Cost,
    Cpa,
    Aov,
    Revenue,
    Lpcpc,
    Lpepc,
    Profit,
    Roi,
}

/// How a column's cells are formatted and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Expander,
    Text,
    Integer,
    Currency,
    Percent,
}

impl ColumnId {
    pub const ALL: [ColumnId; 18] = [
        ColumnId::Expand,
        ColumnId::Title,
        ColumnId::Platform,
        ColumnId::Tag,
        ColumnId::Clicks,
        ColumnId::LpViews,
        ColumnId::LpClicks,
        ColumnId::LpCtr,
        ColumnId::Purchases,
        ColumnId::Cr,
        ColumnId::Cost,
        ColumnId::Cpa,
        ColumnId::Aov,
        ColumnId::Revenue,
        ColumnId::Lpcpc,
        ColumnId::Lpepc,
        ColumnId::Profit,
        ColumnId::Roi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnId::Expand => "expand",
            ColumnId::Title => "title",
            ColumnId::Platform => "platform",
            ColumnId::Tag => "tag",
            ColumnId::Clicks => "clicks",
            ColumnId::LpViews => "lp_views",
            ColumnId::LpClicks => "lp_clicks",
            ColumnId::LpCtr => "lp_ctr",
            ColumnId::Purchases => "purchases",
            ColumnId::Cr => "cr",
            ColumnId::Cost => "cost",
            ColumnId::Cpa => "cpa",
            ColumnId::Aov => "aov",
            ColumnId::Revenue => "revenue",
            ColumnId::Lpcpc => "lp_cpc",
            ColumnId::Lpepc => "lp_epc",
            ColumnId::Profit => "profit",
            ColumnId::Roi => "roi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColumnId::Expand => "",
            ColumnId::Title => "Campaign",
            ColumnId::Platform => "Platform",
            ColumnId::Tag => "Tag",
            ColumnId::Clicks => "Clicks",
            ColumnId::LpViews => "LP Views",
            ColumnId::LpClicks => "LP Clicks",
            ColumnId::LpCtr => "LP CTR",
            ColumnId::Purchases => "Purchases",
            ColumnId::Cr => "CR",
            ColumnId::Cost => "Cost",
            ColumnId::Cpa => "CPA",
            ColumnId::Aov => "AOV",
            ColumnId::Revenue => "Revenue",
            ColumnId::Lpcpc => "LP CPC",
            ColumnId::Lpepc => "LP EPC",
            ColumnId::Profit => "Profit",
            ColumnId::Roi => "ROI",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnId::Expand => ColumnKind::Expander,
            ColumnId::Title | ColumnId::Platform | ColumnId::Tag => ColumnKind::Text,
            ColumnId::Clicks | ColumnId::LpViews | ColumnId::LpClicks | ColumnId::Purchases => {
                ColumnKind::Integer
            }
            ColumnId::Cost
            | ColumnId::Cpa
            | ColumnId::Aov
            | ColumnId::Revenue
            | ColumnId::Lpcpc
            | ColumnId::Lpepc
            | ColumnId::Profit => ColumnKind::Currency,
            ColumnId::LpCtr | ColumnId::Cr | ColumnId::Roi => ColumnKind::Percent,
        }
    }

    pub fn default_width(&self) -> u32 {
        match self {
            ColumnId::Expand => 60,
            ColumnId::Title => 300,
            _ => 120,
        }
    }

    /// Whether clicking the header can change the active sort.
    pub fn sortable(&self) -> bool {
        !matches!(self, ColumnId::Expand)
    }
}

impl std::str::FromStr for ColumnId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnId::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown column: {s}"))
    }
}

/// JSON shape written to the durable layout store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub order: Vec<usize>,
    pub widths: HashMap<String, u32>,
    pub hidden: Vec<usize>,
}

/// Mutable column layout: order permutation, per-column widths, hidden set.
///
/// The order list always contains every column index exactly once; the
/// hidden set is a subset of those indices. Restoring a snapshot that
/// violates either invariant is rejected and defaults are retained.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    order: Vec<usize>,
    widths: HashMap<String, u32>,
    hidden: HashSet<usize>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            order: (0..ColumnId::ALL.len()).collect(),
            widths: ColumnId::ALL
                .iter()
                .map(|c| (c.as_str().to_string(), c.default_width()))
                .collect(),
            hidden: HashSet::new(),
        }
    }
}

impl ColumnLayout {
    /// Column indices in configured order, hidden columns skipped.
    pub fn visible_order(&self) -> Vec<usize> {
        self.order
            .iter()
            .copied()
            .filter(|i| !self.hidden.contains(i))
            .collect()
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn is_hidden(&self, index: usize) -> bool {
        self.hidden.contains(&index)
    }

    pub fn width(&self, column: ColumnId) -> u32 {
        self.widths
            .get(column.as_str())
            .copied()
            .unwrap_or_else(|| column.default_width())
    }

    /// Flip a column in or out of the hidden set. Re-shown columns keep
    /// their configured position; the original UI's recency reordering is
    /// intentionally not reproduced.
    pub fn toggle_hidden(&mut self, index: usize) {
        if index >= ColumnId::ALL.len() {
            return;
        }
        if !self.hidden.remove(&index) {
            self.hidden.insert(index);
        }
    }

    /// Move the entry at `dragged` (a position in the order list) so it
    /// lands at position `target`.
    pub fn reorder(&mut self, dragged: usize, target: usize) {
        if dragged >= self.order.len() || target >= self.order.len() || dragged == target {
            return;
        }
        let id = self.order.remove(dragged);
        self.order.insert(target, id);
    }

    /// Apply a pixel delta to a column width, clamped at the floor.
    pub fn resize(&mut self, column: ColumnId, delta_px: i32) -> u32 {
        let current = self.width(column) as i64;
        let next = (current + delta_px as i64).max(MIN_COLUMN_WIDTH as i64) as u32;
        self.widths.insert(column.as_str().to_string(), next);
        next
    }

    pub fn set_width(&mut self, column: ColumnId, width_px: u32) -> u32 {
        let clamped = width_px.max(MIN_COLUMN_WIDTH);
        self.widths.insert(column.as_str().to_string(), clamped);
        clamped
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        let mut hidden: Vec<usize> = self.hidden.iter().copied().collect();
        hidden.sort_unstable();
        LayoutSnapshot {
            order: self.order.clone(),
            widths: self.widths.clone(),
            hidden,
        }
    }

    /// Adopt a persisted snapshot if it passes validation; returns whether
    /// it was applied. Rejection keeps the current state untouched.
    pub fn restore(&mut self, snapshot: LayoutSnapshot) -> bool {
        let n = ColumnId::ALL.len();
        if snapshot.order.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &i in &snapshot.order {
            if i >= n || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        if snapshot.hidden.iter().any(|&i| i >= n) {
            return false;
        }
        self.order = snapshot.order;
        self.hidden = snapshot.hidden.into_iter().collect();
        for (key, width) in snapshot.widths {
            self.widths.insert(key, width.max(MIN_COLUMN_WIDTH));
        }
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
