use crate::cli::{ExportArgs, RegistryArgs, ScoreArgs, SearchArgs};
use crate::report;
use crate::workspace::Workspace;
use bidprep::error::AppError;
use bidprep::registry::{self, FileSystemProbe, ModifiedTimeProbe, RegistryCache};
use bidprep::scoring::{coerce_amount, ManagementScorer};
use std::fs::File;
use std::io::BufWriter;

pub(crate) fn stats(args: RegistryArgs) -> Result<(), AppError> {
    let workspace = Workspace::open(&args)?;
    let path = workspace.db_path()?;

    let stats = RegistryCache::new().stats(&path)?;
    report::render_stats(&path, &stats);
    Ok(())
}

pub(crate) fn check(args: RegistryArgs) -> Result<(), AppError> {
    let workspace = Workspace::open(&args)?;
    let path = workspace.db_path()?;

    if !path.exists() {
        report::render_missing(&path);
        return Err(AppError::NotFound(format!(
            "company workbook {}",
            path.display()
        )));
    }

    let modified = FileSystemProbe.modified(&path)?;
    let entries = RegistryCache::new().load(&path, true)?;
    report::render_check(&path, modified, entries.len());
    Ok(())
}

pub(crate) fn search(args: SearchArgs) -> Result<(), AppError> {
    let SearchArgs {
        query,
        limit,
        registry: registry_args,
    } = args;

    let workspace = Workspace::open(&registry_args)?;
    let path = workspace.db_path()?;
    let entries = RegistryCache::new().load(&path, false)?;

    let hits = registry::search(&entries, &query);
    report::render_search(&query, &hits, limit);
    Ok(())
}

pub(crate) fn score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        company,
        agency,
        amount,
        industry,
        rules,
        json,
        registry: registry_args,
    } = args;

    let workspace = Workspace::open(&registry_args)?;
    let scorer = ManagementScorer::new(workspace.rule_book(rules)?);
    let path = workspace.db_path()?;
    let entries = RegistryCache::new().load(&path, false)?;

    let entry = registry::search(&entries, &company)
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("company matching '{company}'")))?;

    let amount = coerce_amount(&amount);
    let assessment = scorer.assess(
        entry,
        &agency,
        amount,
        &workspace.settings.industry_averages,
        industry.file_type(),
    );

    let view = report::ScoreView::new(entry, industry, amount, &assessment);
    if json {
        report::render_score_json(&view);
    } else {
        report::render_score(&view);
    }
    Ok(())
}

pub(crate) fn export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        out,
        registry: registry_args,
    } = args;

    let workspace = Workspace::open(&registry_args)?;
    let path = workspace.db_path()?;
    let entries = RegistryCache::new().load(&path, false)?;

    let file = File::create(&out)?;
    registry::write_csv(&entries, BufWriter::new(file))?;
    println!("Exported {} companies to {}", entries.len(), out.display());
    Ok(())
}
