use std::collections::HashMap;
use std::fmt;

/// Raw value stored in a worksheet cell. Empty cells are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            CellValue::Number(value) => write!(f, "{value}"),
            CellValue::Bool(value) => write!(f, "{}", if *value { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// Inclusive, 1-based rectangle of merged cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRange {
    pub min_row: u32,
    pub min_col: u32,
    pub max_row: u32,
    pub max_col: u32,
}

impl MergeRange {
    pub fn new(min_row: u32, min_col: u32, max_row: u32, max_col: u32) -> Self {
        Self {
            min_row,
            min_col,
            max_row,
            max_col,
        }
    }

    pub fn anchor(&self) -> (u32, u32) {
        (self.min_row, self.min_col)
    }

    fn coordinates(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.min_row..=self.max_row)
            .flat_map(move |row| (self.min_col..=self.max_col).map(move |col| (row, col)))
    }
}

/// Read-only snapshot of one worksheet: extent, sparse cell values and merges.
///
/// Rows and columns are 1-based. The extent covers every populated cell and
/// every merge range, mirroring what spreadsheet readers report as the used
/// range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    name: String,
    max_row: u32,
    max_col: u32,
    cells: HashMap<(u32, u32), CellValue>,
    merges: Vec<MergeRange>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_cell(mut self, row: u32, col: u32, value: impl Into<CellValue>) -> Self {
        self.set_cell(row, col, value);
        self
    }

    pub fn with_merge(mut self, range: MergeRange) -> Self {
        self.add_merge(range);
        self
    }

    pub fn set_cell(&mut self, row: u32, col: u32, value: impl Into<CellValue>) {
        if row == 0 || col == 0 {
            return;
        }
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
        self.cells.insert((row, col), value.into());
    }

    pub fn add_merge(&mut self, range: MergeRange) {
        if range.min_row == 0 || range.min_col == 0 {
            return;
        }
        self.max_row = self.max_row.max(range.max_row);
        self.max_col = self.max_col.max(range.max_col);
        self.merges.push(range);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    pub fn max_col(&self) -> u32 {
        self.max_col
    }

    pub fn raw(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    pub fn merges(&self) -> &[MergeRange] {
        &self.merges
    }
}

/// Merge-aware view over a worksheet.
///
/// Covered coordinates map to their range's top-left value in a sparse table
/// built once, so lookups never rescan the merge list.
#[derive(Debug)]
pub struct CellGrid<'a> {
    sheet: &'a Worksheet,
    merged: HashMap<(u32, u32), &'a CellValue>,
}

impl<'a> CellGrid<'a> {
    pub fn resolve(sheet: &'a Worksheet) -> Self {
        let mut merged = HashMap::new();
        for range in sheet.merges() {
            let (row, col) = range.anchor();
            let Some(anchor) = sheet.raw(row, col) else {
                continue;
            };
            for coordinate in range.coordinates() {
                merged.insert(coordinate, anchor);
            }
        }

        Self { sheet, merged }
    }

    pub fn value(&self, row: u32, col: u32) -> Option<&'a CellValue> {
        self.sheet
            .raw(row, col)
            .or_else(|| self.merged.get(&(row, col)).copied())
    }

    pub fn max_row(&self) -> u32 {
        self.sheet.max_row()
    }

    pub fn max_col(&self) -> u32 {
        self.sheet.max_col()
    }

    pub fn sheet_name(&self) -> &'a str {
        self.sheet.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_cells_resolve_to_anchor_value() {
        let sheet = Worksheet::new("Seoul")
            .with_cell(2, 2, "merged")
            .with_merge(MergeRange::new(2, 2, 4, 3));
        let grid = CellGrid::resolve(&sheet);

        assert_eq!(grid.value(3, 3), Some(&CellValue::from("merged")));
        assert_eq!(grid.value(4, 2), Some(&CellValue::from("merged")));
        assert_eq!(grid.value(5, 2), None);
        assert_eq!(grid.max_row(), 4);
        assert_eq!(grid.max_col(), 3);
    }

    #[test]
    fn raw_value_wins_over_merge_propagation() {
        let sheet = Worksheet::new("Seoul")
            .with_cell(1, 1, "anchor")
            .with_cell(1, 2, "own")
            .with_merge(MergeRange::new(1, 1, 1, 2));
        let grid = CellGrid::resolve(&sheet);

        assert_eq!(grid.value(1, 2), Some(&CellValue::from("own")));
    }

    #[test]
    fn empty_sheet_resolves_to_nothing() {
        let sheet = Worksheet::new("Empty");
        let grid = CellGrid::resolve(&sheet);

        assert_eq!(grid.max_row(), 0);
        assert_eq!(grid.max_col(), 0);
        assert_eq!(grid.value(1, 1), None);
    }

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(CellValue::Number(1234567890.0).to_string(), "1234567890");
        assert_eq!(CellValue::Number(0.5).to_string(), "0.5");
    }
}
