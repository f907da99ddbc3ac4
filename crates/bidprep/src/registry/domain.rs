use serde::{Deserialize, Serialize};

use super::normalizer::{extract_manager_name, normalize_name};

/// One company column materialized from a registry worksheet.
///
/// Entries are built once by the extractor and shared read-only through
/// registry snapshots; a reload replaces the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyEntry {
    pub name: String,
    pub normalized_name: String,
    pub region: String,
    pub business_registration_number: String,
    pub representative: String,
    /// Percent form, e.g. `85.0` for a stored ratio of `0.85`.
    pub debt_ratio: Option<f64>,
    /// Percent form, same convention as `debt_ratio`.
    pub current_ratio: Option<f64>,
    pub business_years: Option<f64>,
    pub performance3y: Option<f64>,
    pub performance5y: Option<f64>,
    pub valuation_amount: Option<f64>,
    pub quality_evaluation: Option<f64>,
    pub credit_grade: String,
    pub notes: String,
    pub manager_name: Option<String>,
}

impl CompanyEntry {
    /// Starts an entry with every attribute empty; derived keys are filled
    /// in by [`CompanyEntry::finish`].
    pub fn blank(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            normalized_name: String::new(),
            region: region.into(),
            business_registration_number: String::new(),
            representative: String::new(),
            debt_ratio: None,
            current_ratio: None,
            business_years: None,
            performance3y: None,
            performance5y: None,
            valuation_amount: None,
            quality_evaluation: None,
            credit_grade: String::new(),
            notes: String::new(),
            manager_name: None,
        }
    }

    /// Derives the search key and manager name from the stored fields.
    pub fn finish(mut self) -> Self {
        self.normalized_name = normalize_name(&self.name);
        self.manager_name = extract_manager_name(&self.notes);
        self
    }
}

/// Record counts produced by a diagnostic scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total: usize,
    /// Sheets that produced at least one record, in workbook order.
    pub per_sheet: Vec<SheetCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetCount {
    pub sheet: String,
    pub count: usize,
}
