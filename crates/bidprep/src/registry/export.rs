use serde::Serialize;
use std::io::Write;

use super::domain::CompanyEntry;
use super::RegistryError;

const EXPORT_HEADERS: [&str; 13] = [
    "Name",
    "Region",
    "Business Number",
    "Representative",
    "Debt Ratio",
    "Current Ratio",
    "Business Years",
    "Performance 3Y",
    "Performance 5Y",
    "Valuation",
    "Credit Grade",
    "Manager",
    "Notes",
];

/// Field order must follow `EXPORT_HEADERS`.
#[derive(Serialize)]
struct ExportRow<'a> {
    name: &'a str,
    region: &'a str,
    business_registration_number: &'a str,
    representative: &'a str,
    debt_ratio: Option<f64>,
    current_ratio: Option<f64>,
    business_years: Option<f64>,
    performance3y: Option<f64>,
    performance5y: Option<f64>,
    valuation_amount: Option<f64>,
    credit_grade: &'a str,
    manager_name: &'a str,
    notes: &'a str,
}

impl<'a> From<&'a CompanyEntry> for ExportRow<'a> {
    fn from(entry: &'a CompanyEntry) -> Self {
        Self {
            name: &entry.name,
            region: &entry.region,
            business_registration_number: &entry.business_registration_number,
            representative: &entry.representative,
            debt_ratio: entry.debt_ratio,
            current_ratio: entry.current_ratio,
            business_years: entry.business_years,
            performance3y: entry.performance3y,
            performance5y: entry.performance5y,
            valuation_amount: entry.valuation_amount,
            credit_grade: &entry.credit_grade,
            manager_name: entry.manager_name.as_deref().unwrap_or_default(),
            notes: &entry.notes,
        }
    }
}

/// Writes one CSV row per entry, with a header row.
pub fn write_csv<W: Write>(entries: &[CompanyEntry], writer: W) -> Result<(), RegistryError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(EXPORT_HEADERS)?;
    for entry in entries {
        csv_writer.serialize(ExportRow::from(entry))?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
