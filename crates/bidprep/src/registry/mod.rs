//! Company registry extraction from irregularly laid-out workbooks.

mod cache;
mod domain;
mod export;
mod extractor;
mod grid;
mod normalizer;
mod scanner;
mod search;
mod workbook;

pub use cache::{RegistryCache, RegistrySnapshot};
pub use domain::{CompanyEntry, RegistryStats, SheetCount};
pub use export::write_csv;
pub use extractor::{
    extract_sheet, extract_workbook, to_number, Attribute, SheetLayout, COMPANY_NAME_MARKER,
};
pub use grid::{CellGrid, CellValue, MergeRange, Worksheet};
pub use normalizer::{
    clean_display_name, extract_manager_name, extract_manager_name_with_strategy,
    normalize_name, ManagerNameStrategy, MANAGER_NAME_CASCADE,
};
pub use scanner::{scan_anchors, Anchor};
pub use search::{display_label, find_entry, search};
pub use workbook::{FileSystemProbe, ModifiedTimeProbe, WorkbookSource, XlsxWorkbookSource};

use std::path::PathBuf;

/// Failures that require the caller to pick or repair a registry source.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry source unavailable at {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read registry workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },
    #[error("failed to write registry export: {0}")]
    Export(#[from] csv::Error),
}
