use tracing::warn;

use super::document::{RuleBook, Tier};

/// Tier chosen for a contract amount.
#[derive(Debug, Clone, Copy)]
pub struct TierSelection<'a> {
    pub tier: &'a Tier,
    /// No tier range covered the amount and the first declared tier was used.
    pub fallback: bool,
}

/// Parses a user-supplied amount; anything non-numeric counts as zero.
pub fn coerce_amount(raw: &str) -> f64 {
    let cleaned = raw.replace(',', "");
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .unwrap_or(0.0)
}

/// First tier (in declaration order) whose range holds `amount`.
///
/// When no range matches, the agency's first tier applies and a warning is
/// logged, since that usually means the rule document leaves a gap.
pub fn select_tier<'a>(book: &'a RuleBook, agency_id: &str, amount: f64) -> Option<TierSelection<'a>> {
    let agency = book.agency(agency_id)?;
    let first = agency.tiers.first()?;
    let amount = if amount.is_finite() { amount } else { 0.0 };

    if let Some(tier) = agency.tiers.iter().find(|tier| tier.contains(amount)) {
        return Some(TierSelection {
            tier,
            fallback: false,
        });
    }

    warn!(
        agency = %agency.id,
        amount,
        "no tier covers amount; falling back to first declared tier"
    );
    Some(TierSelection {
        tier: first,
        fallback: true,
    })
}
