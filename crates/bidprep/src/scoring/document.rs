use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Failure to load an agency rule document.
#[derive(Debug, thiserror::Error)]
pub enum RuleDocumentError {
    #[error("failed to read rule document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid rule document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Root of a rule document: one rule set per procuring agency.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuleDocument {
    #[serde(default)]
    pub agencies: Vec<AgencyRuleSet>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgencyRuleSet {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tiers: Vec<Tier>,
}

/// Amount-scoped rule bundle. `max_amount` of `None` is open-ended.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    #[serde(default)]
    pub min_amount: Option<f64>,
    #[serde(default)]
    pub max_amount: Option<f64>,
    #[serde(default)]
    pub rules: TierRules,
}

impl Tier {
    pub fn lower_bound(&self) -> f64 {
        self.min_amount.unwrap_or(0.0)
    }

    /// Inclusive lower bound, exclusive upper bound.
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.lower_bound() && self.max_amount.map_or(true, |max| amount < max)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TierRules {
    #[serde(default)]
    pub management: Option<ManagementRules>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementRules {
    #[serde(default)]
    pub method_selection: MethodSelection,
    #[serde(default)]
    pub rounding: Option<Rounding>,
    #[serde(default)]
    pub methods: Vec<ManagementMethod>,
}

impl ManagementRules {
    pub fn composite(&self) -> Option<&BTreeMap<String, ComponentRule>> {
        self.methods.iter().find_map(|method| match method {
            ManagementMethod::Composite { components } => Some(components),
            _ => None,
        })
    }

    pub fn grade_table(&self) -> Option<&[GradeScore]> {
        self.methods.iter().find_map(|method| match method {
            ManagementMethod::Credit { grade_table } => Some(grade_table.as_slice()),
            _ => None,
        })
    }
}

/// How composite and credit candidates combine. Anything but `"sum"` is `Max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum MethodSelection {
    #[default]
    Max,
    Sum,
}

impl From<String> for MethodSelection {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "sum" => Self::Sum,
            _ => Self::Max,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Rounding {
    #[serde(default)]
    pub method: RoundingMethod,
    #[serde(default)]
    pub digits: u32,
}

/// Anything but `"truncate"` rounds to nearest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RoundingMethod {
    Truncate,
    #[default]
    Round,
}

impl From<String> for RoundingMethod {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "truncate" => Self::Truncate,
            _ => Self::Round,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "id", rename_all = "lowercase")]
pub enum ManagementMethod {
    Composite {
        #[serde(default)]
        components: BTreeMap<String, ComponentRule>,
    },
    Credit {
        #[serde(default, rename = "gradeTable")]
        grade_table: Vec<GradeScore>,
    },
    #[serde(other)]
    Unsupported,
}

/// Ordered thresholds for one composite field; the first match wins.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentRule {
    #[serde(default)]
    pub thresholds: Vec<Threshold>,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparator {
    Lt(f64),
    Lte(f64),
    Gt(f64),
    Gte(f64),
    LtYears(f64),
    GteYears(f64),
    /// `gte` and `lt` together: `lower <= value < upper`.
    Band { lower: f64, upper: f64 },
    /// No usable comparator was declared; never matches.
    Unusable,
}

impl Comparator {
    pub fn holds(self, value: f64) -> bool {
        match self {
            Comparator::Lt(bound) | Comparator::LtYears(bound) => value < bound,
            Comparator::Lte(bound) => value <= bound,
            Comparator::Gt(bound) => value > bound,
            Comparator::Gte(bound) | Comparator::GteYears(bound) => value >= bound,
            Comparator::Band { lower, upper } => value >= lower && value < upper,
            Comparator::Unusable => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "RawThreshold")]
pub struct Threshold {
    pub comparator: Comparator,
    pub score: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawThreshold {
    lt: Option<f64>,
    lte: Option<f64>,
    gt: Option<f64>,
    gte: Option<f64>,
    lt_years: Option<f64>,
    gte_years: Option<f64>,
    score: f64,
}

impl From<RawThreshold> for Threshold {
    fn from(raw: RawThreshold) -> Self {
        let comparator = match raw {
            RawThreshold {
                gte: Some(lower),
                lt: Some(upper),
                lte: None,
                gt: None,
                lt_years: None,
                gte_years: None,
                ..
            } => Comparator::Band { lower, upper },
            _ => {
                let declared: Vec<Comparator> = [
                    raw.lt.map(Comparator::Lt),
                    raw.lte.map(Comparator::Lte),
                    raw.gt.map(Comparator::Gt),
                    raw.gte.map(Comparator::Gte),
                    raw.lt_years.map(Comparator::LtYears),
                    raw.gte_years.map(Comparator::GteYears),
                ]
                .into_iter()
                .flatten()
                .collect();

                match declared.as_slice() {
                    [comparator] => *comparator,
                    _ => {
                        warn!(
                            comparators = declared.len(),
                            score = raw.score,
                            "threshold needs one comparator (or a gte/lt band); it will never match"
                        );
                        Comparator::Unusable
                    }
                }
            }
        };

        Threshold {
            comparator,
            score: raw.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GradeScore {
    pub grade: String,
    pub score: f64,
}

/// Parsed rule document with agencies indexed by case-insensitive id.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    agencies: Vec<AgencyRuleSet>,
    index: HashMap<String, usize>,
}

impl RuleBook {
    pub fn from_document(document: RuleDocument) -> Self {
        let mut index = HashMap::new();
        for (position, agency) in document.agencies.iter().enumerate() {
            index.entry(agency_key(&agency.id)).or_insert(position);
        }

        Self {
            agencies: document.agencies,
            index,
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RuleDocumentError> {
        let document: RuleDocument = serde_json::from_str(raw)?;
        Ok(Self::from_document(document))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RuleDocumentError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RuleDocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn agency(&self, id: &str) -> Option<&AgencyRuleSet> {
        self.index
            .get(&agency_key(id))
            .and_then(|position| self.agencies.get(*position))
    }

    pub fn agencies(&self) -> &[AgencyRuleSet] {
        &self.agencies
    }
}

fn agency_key(id: &str) -> String {
    id.trim().to_lowercase()
}
