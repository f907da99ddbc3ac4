use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

use super::domain::{CompanyEntry, RegistryStats, SheetCount};
use super::extractor::{extract_sheet, SheetLayout};
use super::workbook::{FileSystemProbe, ModifiedTimeProbe, WorkbookSource, XlsxWorkbookSource};
use super::RegistryError;

/// Shared, immutable view of every record loaded from one workbook.
pub type RegistrySnapshot = Arc<Vec<CompanyEntry>>;

#[derive(Debug)]
struct CacheSlot {
    path: PathBuf,
    modified: SystemTime,
    entries: RegistrySnapshot,
}

/// Memoizes workbook extraction per source path, keyed by modification time.
///
/// A reload swaps in a fresh snapshot; callers holding an earlier snapshot
/// keep seeing it unchanged. The cache does no locking of its own.
#[derive(Debug)]
pub struct RegistryCache<S = XlsxWorkbookSource, P = FileSystemProbe> {
    source: S,
    probe: P,
    layout: SheetLayout,
    slot: Option<CacheSlot>,
}

impl RegistryCache {
    pub fn new() -> Self {
        Self::with_parts(XlsxWorkbookSource, FileSystemProbe)
    }
}

impl Default for RegistryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, P> RegistryCache<S, P>
where
    S: WorkbookSource,
    P: ModifiedTimeProbe,
{
    pub fn with_parts(source: S, probe: P) -> Self {
        Self {
            source,
            probe,
            layout: SheetLayout::standard(),
            slot: None,
        }
    }

    pub fn with_layout(mut self, layout: SheetLayout) -> Self {
        self.layout = layout;
        self.slot = None;
        self
    }

    /// Returns the cached snapshot when `path` and its modification time are
    /// unchanged, otherwise rescans the workbook and replaces the cache.
    pub fn load(&mut self, path: &Path, force: bool) -> Result<RegistrySnapshot, RegistryError> {
        let modified = self.probe.modified(path)?;

        if !force {
            if let Some(slot) = self.matching_slot(path, modified) {
                debug!(path = %path.display(), entries = slot.entries.len(), "registry cache hit");
                return Ok(Arc::clone(&slot.entries));
            }
        }

        let sheets = self.source.read_sheets(path)?;
        let mut entries = Vec::new();
        for sheet in &sheets {
            let extracted = extract_sheet(sheet, &self.layout);
            debug!(sheet = sheet.name(), entries = extracted.len(), "sheet extracted");
            entries.extend(extracted);
        }

        info!(path = %path.display(), entries = entries.len(), force, "registry workbook scanned");

        let entries: RegistrySnapshot = Arc::new(entries);
        self.slot = Some(CacheSlot {
            path: path.to_path_buf(),
            modified,
            entries: Arc::clone(&entries),
        });

        Ok(entries)
    }

    /// True when a `load` of `path` would rescan. Costs one stat.
    pub fn is_stale(&self, path: &Path) -> Result<bool, RegistryError> {
        let modified = self.probe.modified(path)?;
        Ok(self.matching_slot(path, modified).is_none())
    }

    /// Modification time recorded for `path` at its last scan.
    pub fn cached_at(&self, path: &Path) -> Option<SystemTime> {
        self.slot
            .as_ref()
            .filter(|slot| slot.path == path)
            .map(|slot| slot.modified)
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Rescans `path` and reports record counts without touching the cache.
    pub fn stats(&self, path: &Path) -> Result<RegistryStats, RegistryError> {
        self.probe.modified(path)?;

        let mut stats = RegistryStats::default();
        for sheet in self.source.read_sheets(path)? {
            let count = extract_sheet(&sheet, &self.layout).len();
            stats.total += count;
            if count > 0 {
                stats.per_sheet.push(SheetCount {
                    sheet: sheet.name().to_string(),
                    count,
                });
            }
        }

        Ok(stats)
    }

    fn matching_slot(&self, path: &Path, modified: SystemTime) -> Option<&CacheSlot> {
        self.slot
            .as_ref()
            .filter(|slot| slot.path == path && slot.modified == modified)
    }
}
