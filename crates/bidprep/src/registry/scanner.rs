use super::grid::{CellGrid, CellValue};

/// Coordinates of a cell carrying the company-name marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub row: u32,
    pub col: u32,
}

/// Row-major scan for every cell whose text contains `marker`.
pub fn scan_anchors(grid: &CellGrid<'_>, marker: &str) -> Vec<Anchor> {
    let mut anchors = Vec::new();

    for row in 1..=grid.max_row() {
        for col in 1..=grid.max_col() {
            let Some(value) = grid.value(row, col) else {
                continue;
            };
            if contains_marker(value, marker) {
                anchors.push(Anchor { row, col });
            }
        }
    }

    anchors
}

fn contains_marker(value: &CellValue, marker: &str) -> bool {
    match value {
        CellValue::Text(text) => text.contains(marker),
        other => other.to_string().contains(marker),
    }
}
