use std::collections::HashSet;

use super::domain::CompanyEntry;
use super::grid::{CellGrid, CellValue, Worksheet};
use super::scanner::{scan_anchors, Anchor};

/// Label that marks the header row of a company block.
pub const COMPANY_NAME_MARKER: &str = "회사명";

/// Attribute read from a fixed row offset below the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Representative,
    BusinessRegistrationNumber,
    ValuationAmount,
    Performance3y,
    Performance5y,
    DebtRatio,
    CurrentRatio,
    BusinessYears,
    CreditGrade,
    QualityEvaluation,
    Notes,
}

impl Attribute {
    /// Ratio cells hold fractions that downstream rules expect in percent.
    fn is_ratio(self) -> bool {
        matches!(self, Attribute::DebtRatio | Attribute::CurrentRatio)
    }

    fn apply(self, entry: &mut CompanyEntry, value: Option<&CellValue>) {
        let number = || {
            if self.is_ratio() {
                match value {
                    Some(CellValue::Number(ratio)) => finite(ratio * 100.0),
                    other => to_number(other),
                }
            } else {
                to_number(value)
            }
        };

        match self {
            Attribute::Representative => entry.representative = to_text(value),
            Attribute::BusinessRegistrationNumber => {
                entry.business_registration_number = to_text(value)
            }
            Attribute::ValuationAmount => entry.valuation_amount = number(),
            Attribute::Performance3y => entry.performance3y = number(),
            Attribute::Performance5y => entry.performance5y = number(),
            Attribute::DebtRatio => entry.debt_ratio = number(),
            Attribute::CurrentRatio => entry.current_ratio = number(),
            Attribute::BusinessYears => entry.business_years = number(),
            Attribute::CreditGrade => entry.credit_grade = to_text(value),
            Attribute::QualityEvaluation => entry.quality_evaluation = number(),
            Attribute::Notes => entry.notes = to_text(value),
        }
    }
}

/// Marker text plus the attribute → row-offset table of a registry block.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub marker: String,
    pub offsets: Vec<(Attribute, u32)>,
}

impl SheetLayout {
    /// Layout of the company registry workbooks: fifteen rows under the
    /// `회사명` header. Rows 3 and 11-13 (region text and certification
    /// flags) are not read.
    pub fn standard() -> Self {
        Self {
            marker: COMPANY_NAME_MARKER.to_string(),
            offsets: vec![
                (Attribute::Representative, 1),
                (Attribute::BusinessRegistrationNumber, 2),
                (Attribute::ValuationAmount, 4),
                (Attribute::Performance3y, 5),
                (Attribute::Performance5y, 6),
                (Attribute::DebtRatio, 7),
                (Attribute::CurrentRatio, 8),
                (Attribute::BusinessYears, 9),
                (Attribute::CreditGrade, 10),
                (Attribute::QualityEvaluation, 14),
                (Attribute::Notes, 15),
            ],
        }
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::standard()
    }
}

/// Tolerant numeric coercion: thousands separators and padding are ignored,
/// anything unparseable becomes `None`.
pub fn to_number(value: Option<&CellValue>) -> Option<f64> {
    match value? {
        CellValue::Number(number) => finite(*number),
        CellValue::Text(text) => {
            let cleaned = text.replace(',', "");
            let cleaned = cleaned.trim();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok().and_then(finite)
        }
        CellValue::Bool(_) => None,
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn to_text(value: Option<&CellValue>) -> String {
    value
        .map(|value| value.to_string().trim().to_string())
        .unwrap_or_default()
}

fn candidate_name(value: &CellValue) -> Option<String> {
    let text = value.to_string();
    let first = text.trim().split(['\n', '\r']).next()?.trim();
    (!first.is_empty()).then(|| first.to_string())
}

/// Materializes every company column of one worksheet.
pub fn extract_sheet(sheet: &Worksheet, layout: &SheetLayout) -> Vec<CompanyEntry> {
    let grid = CellGrid::resolve(sheet);
    let anchors = scan_anchors(&grid, &layout.marker);
    if anchors.is_empty() {
        return Vec::new();
    }

    let region = sheet.name().trim();
    let mut seen: HashSet<(u32, u32, String)> = HashSet::new();
    let mut entries = Vec::new();

    for Anchor { row: header_row, col: header_col } in anchors {
        for col in header_col + 1..=grid.max_col() {
            let Some(name) = grid.value(header_row, col).and_then(candidate_name) else {
                continue;
            };
            if !seen.insert((header_row, col, name.clone())) {
                continue;
            }

            let mut entry = CompanyEntry::blank(name, region);
            for (attribute, offset) in &layout.offsets {
                let Some(row) = header_row
                    .checked_add(*offset)
                    .filter(|row| *row <= grid.max_row())
                else {
                    continue;
                };
                attribute.apply(&mut entry, grid.value(row, col));
            }
            entries.push(entry.finish());
        }
    }

    entries
}

/// Concatenates per-sheet records in workbook order.
pub fn extract_workbook(sheets: &[Worksheet], layout: &SheetLayout) -> Vec<CompanyEntry> {
    sheets
        .iter()
        .flat_map(|sheet| extract_sheet(sheet, layout))
        .collect()
}
