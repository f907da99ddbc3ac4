use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::warn;

use super::document::{ComponentRule, GradeScore, Threshold};
use super::industry::IndustryAverage;
use crate::registry::CompanyEntry;

/// Entry attribute a composite component can be keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeField {
    DebtRatio,
    CurrentRatio,
    BusinessYears,
    QualityEvaluation,
}

impl CompositeField {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "debtRatio" => Some(Self::DebtRatio),
            "currentRatio" => Some(Self::CurrentRatio),
            "bizYears" => Some(Self::BusinessYears),
            "qualityEval" => Some(Self::QualityEvaluation),
            _ => None,
        }
    }

    /// Value the thresholds are compared against. Ratio fields are divided
    /// by the industry average and need a non-zero average to exist.
    pub fn base_value(self, entry: &CompanyEntry, average: Option<&IndustryAverage>) -> Option<f64> {
        let ratio = |value: Option<f64>, baseline: Option<f64>| match (value, baseline) {
            (Some(value), Some(baseline)) if baseline != 0.0 => Some(value / baseline),
            _ => None,
        };

        match self {
            CompositeField::DebtRatio => {
                ratio(entry.debt_ratio, average.and_then(|average| average.debt_ratio))
            }
            CompositeField::CurrentRatio => {
                ratio(entry.current_ratio, average.and_then(|average| average.current_ratio))
            }
            CompositeField::BusinessYears => entry.business_years,
            CompositeField::QualityEvaluation => entry.quality_evaluation,
        }
    }
}

/// Score of the first threshold whose comparator holds.
pub fn first_matching_score(value: f64, thresholds: &[Threshold]) -> Option<f64> {
    thresholds
        .iter()
        .find(|threshold| threshold.comparator.holds(value))
        .map(|threshold| threshold.score)
}

/// Per-field detail of a composite evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScore {
    pub field: String,
    pub base: Option<f64>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeScore {
    pub total: f64,
    pub components: Vec<ComponentScore>,
}

/// Sums the bucket scores of every field that matched a threshold.
///
/// Returns `None` when no field contributed, so a missing composite is
/// distinguishable from a composite of zero.
pub fn score_composite(
    entry: &CompanyEntry,
    components: &BTreeMap<String, ComponentRule>,
    average: Option<&IndustryAverage>,
) -> Option<CompositeScore> {
    let mut total = 0.0;
    let mut contributed = false;
    let mut details = Vec::with_capacity(components.len());

    for (key, rule) in components {
        let Some(field) = CompositeField::from_key(key) else {
            warn!(field = %key, "ignoring composite component with unknown field");
            continue;
        };

        let base = field.base_value(entry, average);
        let score = base
            .and_then(|value| first_matching_score(value, &rule.thresholds))
            .map(|score| score * rule.scale);

        if let Some(score) = score {
            total += score;
            contributed = true;
        }
        details.push(ComponentScore {
            field: key.clone(),
            base,
            score,
        });
    }

    contributed.then_some(CompositeScore {
        total,
        components: details,
    })
}

static CREDIT_GRADE: OnceLock<Regex> = OnceLock::new();

fn credit_grade_pattern() -> &'static Regex {
    CREDIT_GRADE.get_or_init(|| Regex::new(r"^[A-Z]+[0-9]?[+\-]?").expect("credit grade pattern compiles"))
}

/// Canonical grade token: uppercase letter stem, optional digit, optional sign.
/// `"bbb+ (2024.05)"` becomes `"BBB+"`.
pub fn normalize_credit_grade(raw: &str) -> Option<String> {
    let upper = raw.trim().to_uppercase().replace(['−', '–'], "-");
    credit_grade_pattern()
        .find(&upper)
        .map(|stem| stem.as_str().to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditScore {
    pub grade: String,
    pub score: f64,
}

/// Exact lookup of the entry's normalized credit grade in the grade table.
pub fn score_credit(entry: &CompanyEntry, grade_table: &[GradeScore]) -> Option<CreditScore> {
    let grade = normalize_credit_grade(&entry.credit_grade)?;
    grade_table
        .iter()
        .find(|row| normalize_credit_grade(&row.grade).as_deref() == Some(grade.as_str()))
        .map(|row| CreditScore {
            grade: grade.clone(),
            score: row.score,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::document::Comparator;

    fn thresholds(raw: &str) -> Vec<Threshold> {
        serde_json::from_str(raw).expect("thresholds parse")
    }

    fn entry() -> CompanyEntry {
        let mut entry = CompanyEntry::blank("대한건설", "서울");
        entry.debt_ratio = Some(50.0);
        entry.current_ratio = Some(180.0);
        entry.business_years = Some(7.0);
        entry.credit_grade = "bbb+ (2024.05)".to_string();
        entry.finish()
    }

    fn average() -> IndustryAverage {
        IndustryAverage {
            debt_ratio: Some(100.0),
            current_ratio: Some(120.0),
        }
    }

    #[test]
    fn first_matching_threshold_wins_in_declaration_order() {
        let rules = thresholds(r#"[{"lt": 1.0, "score": 3}, {"lt": 0.5, "score": 9}]"#);
        assert_eq!(first_matching_score(0.2, &rules), Some(3.0));
        assert_eq!(first_matching_score(1.0, &rules), None);
    }

    #[test]
    fn comparators_respect_boundaries() {
        assert!(Comparator::Lte(1.0).holds(1.0));
        assert!(!Comparator::Lt(1.0).holds(1.0));
        assert!(Comparator::Gt(1.0).holds(1.01));
        assert!(Comparator::GteYears(5.0).holds(5.0));
        assert!(!Comparator::LtYears(5.0).holds(5.0));
    }

    #[test]
    fn composite_sums_only_matching_fields() {
        let components: BTreeMap<String, ComponentRule> = serde_json::from_str(
            r#"{
                "debtRatio": {"thresholds": [{"lt": 0.5, "score": 8}, {"lt": 0.75, "score": 7.2}]},
                "currentRatio": {"thresholds": [{"gte": 1.5, "score": 7}]},
                "bizYears": {"thresholds": [{"gteYears": 10, "score": 2}]},
                "qualityEval": {"thresholds": [{"gte": 90, "score": 1}]}
            }"#,
        )
        .expect("components parse");

        let composite =
            score_composite(&entry(), &components, Some(&average())).expect("composite present");
        assert!((composite.total - 14.2).abs() < 1e-9);

        let debt = composite
            .components
            .iter()
            .find(|component| component.field == "debtRatio")
            .expect("debt component");
        assert_eq!(debt.base, Some(0.5));
        assert_eq!(debt.score, Some(7.2));

        let quality = composite
            .components
            .iter()
            .find(|component| component.field == "qualityEval")
            .expect("quality component");
        assert_eq!(quality.base, None);
        assert_eq!(quality.score, None);
    }

    #[test]
    fn composite_is_absent_when_nothing_matches() {
        let components: BTreeMap<String, ComponentRule> = serde_json::from_str(
            r#"{"debtRatio": {"thresholds": [{"lt": 0.5, "score": 8}]}, "unknown": {"thresholds": []}}"#,
        )
        .expect("components parse");

        assert!(score_composite(&entry(), &components, None).is_none());
        assert!(score_composite(&entry(), &components, Some(&average())).is_none());
    }

    #[test]
    fn scale_multiplies_bucket_score() {
        let components: BTreeMap<String, ComponentRule> = serde_json::from_str(
            r#"{"bizYears": {"thresholds": [{"gteYears": 5, "score": 4}], "scale": 0.5}}"#,
        )
        .expect("components parse");

        let composite = score_composite(&entry(), &components, None).expect("composite present");
        assert_eq!(composite.total, 2.0);
    }

    #[test]
    fn zero_average_leaves_ratio_absent() {
        let zero = IndustryAverage {
            debt_ratio: Some(0.0),
            current_ratio: None,
        };
        assert_eq!(CompositeField::DebtRatio.base_value(&entry(), Some(&zero)), None);
        assert_eq!(CompositeField::CurrentRatio.base_value(&entry(), Some(&zero)), None);
        assert_eq!(CompositeField::BusinessYears.base_value(&entry(), None), Some(7.0));
    }

    #[test]
    fn credit_grade_normalization() {
        assert_eq!(normalize_credit_grade(" bbb+ (2024.05)").as_deref(), Some("BBB+"));
        assert_eq!(normalize_credit_grade("A0").as_deref(), Some("A0"));
        assert_eq!(normalize_credit_grade("AA−").as_deref(), Some("AA-"));
        assert_eq!(normalize_credit_grade("B0-").as_deref(), Some("B0-"));
        assert_eq!(normalize_credit_grade(""), None);
        assert_eq!(normalize_credit_grade("없음"), None);
    }

    #[test]
    fn credit_requires_exact_table_match() {
        let table = vec![
            GradeScore {
                grade: "BBB".to_string(),
                score: 13.0,
            },
            GradeScore {
                grade: "bbb+".to_string(),
                score: 15.0,
            },
        ];

        let credit = score_credit(&entry(), &table).expect("credit hit");
        assert_eq!(credit.grade, "BBB+");
        assert_eq!(credit.score, 15.0);

        let mut unrated = CompanyEntry::blank("미등급", "서울");
        unrated.credit_grade = "CCC".to_string();
        assert!(score_credit(&unrated, &table).is_none());
    }
}
