//! Fixed-width text rendering of the flattened row list. Honors the grid's
//! column order, visibility, and pixel widths (scaled down to characters).

use trafficdesk_core::types::Counters;
use trafficdesk_grid::columns::{ColumnId, ColumnKind};
use trafficdesk_grid::pipeline::{counters_cell, CellValue};
use trafficdesk_grid::{CampaignGrid, GridRow};

/// Pixels per character when mapping column widths onto a terminal.
const PX_PER_CHAR: u32 = 10;
const MIN_CHARS: usize = 4;

fn char_width(px: u32) -> usize {
    ((px / PX_PER_CHAR) as usize).max(MIN_CHARS)
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{truncated}…")
    } else {
        format!("{text:width$}")
    }
}

fn metric_text(counters: &Counters, column: ColumnId) -> String {
    let Some(CellValue::Number(value)) = counters_cell(counters, column) else {
        return String::new();
    };
    match column.kind() {
        ColumnKind::Integer => format!("{}", value as u64),
        ColumnKind::Currency => format!("${value:.2}"),
        ColumnKind::Percent => format!("{value:.2}%"),
        _ => String::new(),
    }
}

fn cell_text(row: &GridRow, column: ColumnId) -> String {
    match column {
        ColumnId::Expand => match (row.expandable, row.expanded) {
            (true, true) => "[-]".to_string(),
            (true, false) => "[+]".to_string(),
            _ => String::new(),
        },
        ColumnId::Title => {
            let indent = "  ".repeat(row.level.depth());
            format!("{indent}{}", row.label)
        }
        ColumnId::Platform => row
            .platform
            .map(|p| p.as_str().to_string())
            .unwrap_or_default(),
        ColumnId::Tag => row.tag.clone().unwrap_or_default(),
        _ => metric_text(&row.counters, column),
    }
}

pub fn render(grid: &CampaignGrid) -> String {
    let columns: Vec<ColumnId> = grid
        .layout()
        .visible_order()
        .into_iter()
        .map(|i| ColumnId::ALL[i])
        .collect();
    let widths: Vec<usize> = columns
        .iter()
        .map(|c| char_width(grid.layout().width(*c)))
        .collect();

    let mut out = String::new();
    for (column, width) in columns.iter().zip(&widths) {
        out.push_str(&clip(column.label(), *width));
        out.push(' ');
    }
    out.push('\n');
    for width in &widths {
        out.push_str(&"-".repeat(*width));
        out.push(' ');
    }
    out.push('\n');

    for row in grid.visible_rows() {
        for (column, width) in columns.iter().zip(&widths) {
            out.push_str(&clip(&cell_text(&row, *column), *width));
            out.push(' ');
        }
        out.push('\n');
    }

    let totals = grid.totals();
    for width in &widths {
        out.push_str(&"-".repeat(*width));
        out.push(' ');
    }
    out.push('\n');
    for (column, width) in columns.iter().zip(&widths) {
        let text = match column {
            ColumnId::Title => "TOTALS".to_string(),
            ColumnId::Expand | ColumnId::Platform | ColumnId::Tag => String::new(),
            _ => metric_text(&totals, *column),
        };
        out.push_str(&clip(&text, *width));
        out.push(' ');
    }
    out.push('\n');
    out
}

pub fn page_summary(grid: &CampaignGrid) -> String {
    format!(
        "page {}/{} · {} rows per page · {} campaigns after filters",
        grid.page(),
        grid.total_pages().max(1),
        grid.page_size(),
        grid.filtered_count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_pads_and_truncates() {
        assert_eq!(clip("ab", 4), "ab  ");
        assert_eq!(clip("abcdef", 4), "abc…");
    }

    #[test]
    fn test_metric_formatting() {
        let c = Counters::new(50, 40, 10, 5, 100.0, 150.0);
        assert_eq!(metric_text(&c, ColumnId::Clicks), "50");
        assert_eq!(metric_text(&c, ColumnId::Cost), "$100.00");
        assert_eq!(metric_text(&c, ColumnId::Roi), "50.00%");
    }
}
