use bidprep::registry::{display_label, CompanyEntry, RegistryStats};
use bidprep::scoring::{IndustryKind, ManagementAssessment};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;
use std::time::SystemTime;

pub(crate) fn render_stats(path: &Path, stats: &RegistryStats) {
    println!("Company registry: {}", path.display());
    println!("Total companies: {}", stats.total);
    if stats.per_sheet.is_empty() {
        println!("No sheet contains a company block");
        return;
    }
    for sheet in &stats.per_sheet {
        println!("  {:<16} {:>6}", sheet.sheet.trim(), sheet.count);
    }
}

pub(crate) fn render_missing(path: &Path) {
    println!("Company registry: {}", path.display());
    println!("  exists: no");
}

pub(crate) fn render_check(path: &Path, modified: SystemTime, loaded: usize) {
    let modified: DateTime<Local> = modified.into();
    println!("Company registry: {}", path.display());
    println!("  exists: yes");
    println!("  modified: {}", modified.format("%Y-%m-%d %H:%M:%S"));
    println!("  companies loaded: {}", loaded);
}

pub(crate) fn render_search(query: &str, hits: &[&CompanyEntry], limit: usize) {
    println!("{} match(es) for '{}'", hits.len(), query.trim());
    for entry in hits.iter().take(limit) {
        println!(
            "  {} [{}] {} manager: {}",
            entry.name,
            entry.region,
            or_dash(&entry.business_registration_number),
            entry.manager_name.as_deref().unwrap_or("-"),
        );
    }
    if hits.len() > limit {
        println!("  ... {} more", hits.len() - limit);
    }
}

/// Everything the bid sheet needs for one selected company.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScoreView<'a> {
    company: &'a str,
    region: &'a str,
    label: String,
    industry: IndustryKind,
    amount: f64,
    management_score: Option<f64>,
    performance5y: Option<f64>,
    valuation_amount: Option<f64>,
    assessment: &'a ManagementAssessment,
}

impl<'a> ScoreView<'a> {
    pub(crate) fn new(
        entry: &'a CompanyEntry,
        industry: IndustryKind,
        amount: f64,
        assessment: &'a ManagementAssessment,
    ) -> Self {
        Self {
            company: &entry.name,
            region: &entry.region,
            label: display_label(entry),
            industry,
            amount,
            management_score: assessment.score,
            performance5y: entry.performance5y,
            valuation_amount: entry.valuation_amount,
            assessment,
        }
    }
}

pub(crate) fn render_score(view: &ScoreView<'_>) {
    println!("{}", view.label);
    println!("Region: {}", view.region);
    println!(
        "Agency: {} / {} ({}) / amount {:.0}",
        view.assessment.agency_id,
        view.industry.label(),
        view.industry,
        view.amount
    );

    match &view.assessment.tier {
        Some(tier) => println!(
            "Tier: {:.0} .. {}{}",
            tier.min_amount,
            tier.max_amount
                .map(|max| format!("{max:.0}"))
                .unwrap_or_else(|| "open".to_string()),
            if view.assessment.tier_fallback {
                " (fallback)"
            } else {
                ""
            }
        ),
        None => println!("Tier: none (agency not in rule document)"),
    }

    if let Some(composite) = &view.assessment.composite {
        println!("Composite: {}", composite.total);
        for component in &composite.components {
            println!(
                "  {:<14} base {:<10} score {}",
                component.field,
                optional(component.base),
                optional(component.score)
            );
        }
    }
    if let Some(credit) = &view.assessment.credit {
        println!("Credit: {} -> {}", credit.grade, credit.score);
    }

    println!("Management score: {}", optional(view.management_score));
    println!("Performance (5y): {}", optional(view.performance5y));
    println!("Valuation: {}", optional(view.valuation_amount));
}

pub(crate) fn render_score_json(view: &ScoreView<'_>) {
    match serde_json::to_string_pretty(view) {
        Ok(json) => println!("{}", json),
        Err(err) => println!("Score payload unavailable: {}", err),
    }
}

fn optional(value: Option<f64>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| "n/a".to_string())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
