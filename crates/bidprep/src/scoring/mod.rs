//! Management-capability scoring against agency rule documents.

mod document;
mod industry;
mod policy;
mod rules;
mod tiers;

pub use document::{
    AgencyRuleSet, Comparator, ComponentRule, GradeScore, ManagementMethod, ManagementRules,
    MethodSelection, Rounding, RoundingMethod, RuleBook, RuleDocument, RuleDocumentError,
    Threshold, Tier, TierRules,
};
pub use industry::{IndustryAverage, IndustryAverages, IndustryKind};
pub use policy::{apply_rounding, clamp_score, combine, ChosenMethod, MAX_MANAGEMENT_SCORE};
pub use rules::{
    first_matching_score, normalize_credit_grade, score_composite, score_credit, ComponentScore,
    CompositeField, CompositeScore, CreditScore,
};
pub use tiers::{coerce_amount, select_tier, TierSelection};

use crate::registry::CompanyEntry;
use serde::Serialize;
use tracing::warn;

/// Stateless evaluator over a loaded rule book.
#[derive(Debug, Clone, Default)]
pub struct ManagementScorer {
    book: RuleBook,
}

impl ManagementScorer {
    pub fn new(book: RuleBook) -> Self {
        Self { book }
    }

    pub fn rule_book(&self) -> &RuleBook {
        &self.book
    }

    pub fn select_tier(&self, agency_id: &str, amount: f64) -> Option<TierSelection<'_>> {
        select_tier(&self.book, agency_id, amount)
    }

    /// Final management sub-score in `[0, 15]`, or `None` when the rules or
    /// the entry's data give nothing to score.
    pub fn score_management(
        &self,
        entry: &CompanyEntry,
        agency_id: &str,
        amount: f64,
        averages: &IndustryAverages,
        file_type: &str,
    ) -> Option<f64> {
        self.assess(entry, agency_id, amount, averages, file_type)
            .score
    }

    /// Full evaluation trail behind [`ManagementScorer::score_management`].
    pub fn assess(
        &self,
        entry: &CompanyEntry,
        agency_id: &str,
        amount: f64,
        averages: &IndustryAverages,
        file_type: &str,
    ) -> ManagementAssessment {
        let mut assessment = ManagementAssessment {
            agency_id: agency_id.trim().to_string(),
            tier: None,
            tier_fallback: false,
            composite: None,
            credit: None,
            chosen: None,
            score: None,
        };

        let Some(selection) = self.select_tier(agency_id, amount) else {
            return assessment;
        };
        assessment.tier = Some(TierBounds {
            min_amount: selection.tier.lower_bound(),
            max_amount: selection.tier.max_amount,
        });
        assessment.tier_fallback = selection.fallback;

        let Some(rules) = selection.tier.rules.management.as_ref() else {
            return assessment;
        };

        let unsupported = rules
            .methods
            .iter()
            .filter(|method| matches!(method, ManagementMethod::Unsupported))
            .count();
        if unsupported > 0 {
            warn!(
                agency = %assessment.agency_id,
                unsupported,
                "skipping management methods with unsupported ids"
            );
        }

        assessment.composite = rules
            .composite()
            .and_then(|components| score_composite(entry, components, averages.get(file_type)));
        assessment.credit = rules
            .grade_table()
            .and_then(|table| score_credit(entry, table));

        let combined = combine(
            rules.method_selection,
            assessment.composite.as_ref().map(|composite| composite.total),
            assessment.credit.as_ref().map(|credit| credit.score),
        );

        if let Some((chosen, value)) = combined.filter(|(_, value)| value.is_finite()) {
            assessment.chosen = Some(chosen);
            assessment.score = Some(apply_rounding(clamp_score(value), rules.rounding.as_ref()));
        }

        assessment
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierBounds {
    pub min_amount: f64,
    pub max_amount: Option<f64>,
}

/// Evaluation trail for one company against one agency tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementAssessment {
    pub agency_id: String,
    pub tier: Option<TierBounds>,
    pub tier_fallback: bool,
    pub composite: Option<CompositeScore>,
    pub credit: Option<CreditScore>,
    pub chosen: Option<ChosenMethod>,
    pub score: Option<f64>,
}
