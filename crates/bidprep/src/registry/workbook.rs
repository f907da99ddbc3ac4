use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::Path;
use std::time::SystemTime;

use super::grid::{CellValue, MergeRange, Worksheet};
use super::RegistryError;

/// Supplies the worksheets of a registry workbook.
pub trait WorkbookSource {
    fn read_sheets(&self, path: &Path) -> Result<Vec<Worksheet>, RegistryError>;
}

/// Reports when a registry source was last modified.
pub trait ModifiedTimeProbe {
    fn modified(&self, path: &Path) -> Result<SystemTime, RegistryError>;
}

/// `.xlsx` reader backed by calamine.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxWorkbookSource;

impl WorkbookSource for XlsxWorkbookSource {
    fn read_sheets(&self, path: &Path) -> Result<Vec<Worksheet>, RegistryError> {
        let workbook_error = |source| RegistryError::Workbook {
            path: path.to_path_buf(),
            source,
        };

        let mut workbook: Xlsx<_> = open_workbook(path).map_err(workbook_error)?;
        let mut sheets = Vec::new();

        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name).map_err(workbook_error)?;
            let mut sheet = Worksheet::new(name.clone());
            copy_cells(&range, &mut sheet);

            if let Some(merges) = workbook.worksheet_merge_cells(&name) {
                for dimensions in merges.map_err(workbook_error)? {
                    sheet.add_merge(MergeRange::new(
                        dimensions.start.0 + 1,
                        dimensions.start.1 + 1,
                        dimensions.end.0 + 1,
                        dimensions.end.1 + 1,
                    ));
                }
            }

            sheets.push(sheet);
        }

        Ok(sheets)
    }
}

fn copy_cells(range: &Range<Data>, sheet: &mut Worksheet) {
    let (start_row, start_col) = range.start().unwrap_or_default();

    for (row, col, data) in range.used_cells() {
        let Some(value) = convert(data) else {
            continue;
        };
        sheet.set_cell(start_row + row as u32 + 1, start_col + col as u32 + 1, value);
    }
}

fn convert(data: &Data) -> Option<CellValue> {
    match data {
        Data::Empty | Data::Error(_) => None,
        Data::String(text) if text.is_empty() => None,
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            Some(CellValue::Text(text.clone()))
        }
        Data::Float(value) => Some(CellValue::Number(*value)),
        Data::Int(value) => Some(CellValue::Number(*value as f64)),
        Data::Bool(value) => Some(CellValue::Bool(*value)),
        Data::DateTime(value) => Some(CellValue::Number(value.as_f64())),
    }
}

/// Stats the file system for the source's modification time.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemProbe;

impl ModifiedTimeProbe for FileSystemProbe {
    fn modified(&self, path: &Path) -> Result<SystemTime, RegistryError> {
        std::fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .map_err(|source| RegistryError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })
    }
}
