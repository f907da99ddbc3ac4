use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Baseline ratios (percent) published per industry category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryAverage {
    #[serde(default)]
    pub debt_ratio: Option<f64>,
    #[serde(default)]
    pub current_ratio: Option<f64>,
}

/// Industry averages keyed by file type (`eung`, `tongsin`, `sobang`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndustryAverages(BTreeMap<String, IndustryAverage>);

impl IndustryAverages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file_type: impl Into<String>, average: IndustryAverage) -> Self {
        self.0.insert(file_type.into(), average);
        self
    }

    pub fn get(&self, file_type: &str) -> Option<&IndustryAverage> {
        self.0.get(file_type)
    }

    pub fn file_types(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Work categories a bid sheet can be prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndustryKind {
    /// 전기
    Eung,
    /// 통신
    Tongsin,
    /// 소방
    Sobang,
}

impl IndustryKind {
    /// Key used in `industryAverages`.
    pub fn file_type(self) -> &'static str {
        match self {
            IndustryKind::Eung => "eung",
            IndustryKind::Tongsin => "tongsin",
            IndustryKind::Sobang => "sobang",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IndustryKind::Eung => "전기",
            IndustryKind::Tongsin => "통신",
            IndustryKind::Sobang => "소방",
        }
    }
}

impl fmt::Display for IndustryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_type())
    }
}

impl FromStr for IndustryKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "eung" | "전기" => Ok(IndustryKind::Eung),
            "tongsin" | "통신" => Ok(IndustryKind::Tongsin),
            "sobang" | "소방" => Ok(IndustryKind::Sobang),
            other => Err(format!(
                "unknown industry '{other}' (expected eung/전기, tongsin/통신 or sobang/소방)"
            )),
        }
    }
}
