use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(alias = "male", alias = "MALE")]
    Male,
    #[serde(alias = "female", alias = "FEMALE")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(ProviderError::InvalidField {
                field: "gender_preference",
                value: other.to_string(),
            }),
        }
    }
}

/// Length of a requested care plan. Serialized as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PlanDuration {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl PlanDuration {
    pub fn label(&self) -> &'static str {
        match self {
            PlanDuration::OneMonth => "1 month",
            PlanDuration::ThreeMonths => "3 months",
            PlanDuration::SixMonths => "6 months",
            PlanDuration::OneYear => "1 year",
        }
    }

    /// Month-based plans count four weeks per month; a year is 52 weeks.
    pub fn weeks(&self) -> u32 {
        match self {
            PlanDuration::OneMonth => 4,
            PlanDuration::ThreeMonths => 12,
            PlanDuration::SixMonths => 24,
            PlanDuration::OneYear => 52,
        }
    }
}

impl fmt::Display for PlanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlanDuration {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "1 month" | "1 months" => Ok(PlanDuration::OneMonth),
            "3 months" | "3 month" => Ok(PlanDuration::ThreeMonths),
            "6 months" | "6 month" => Ok(PlanDuration::SixMonths),
            "1 year" | "12 months" => Ok(PlanDuration::OneYear),
            _ => Err(ProviderError::InvalidField {
                field: "duration",
                value: s.to_string(),
            }),
        }
    }
}

impl From<PlanDuration> for String {
    fn from(duration: PlanDuration) -> Self {
        duration.label().to_string()
    }
}

impl TryFrom<String> for PlanDuration {
    type Error = ProviderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Budget bucket offered by the quote form, in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum BudgetRange {
    UpTo5k,
    From5kTo10k,
    From10kTo20k,
    Above20k,
}

impl BudgetRange {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetRange::UpTo5k => "₹1,000 - ₹5,000",
            BudgetRange::From5kTo10k => "₹5,000 - ₹10,000",
            BudgetRange::From10kTo20k => "₹10,000 - ₹20,000",
            BudgetRange::Above20k => "₹20,000+",
        }
    }

    /// Price the budget rule aims for within the bucket.
    pub fn target_price(&self) -> u64 {
        match self {
            BudgetRange::UpTo5k => 3000,
            BudgetRange::From5kTo10k => 7500,
            BudgetRange::From10kTo20k => 15000,
            BudgetRange::Above20k => 25000,
        }
    }
}

impl FromStr for BudgetRange {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '+')
            .collect();
        match compact.as_str() {
            "1000-5000" => Ok(BudgetRange::UpTo5k),
            "5000-10000" => Ok(BudgetRange::From5kTo10k),
            "10000-20000" => Ok(BudgetRange::From10kTo20k),
            "20000+" => Ok(BudgetRange::Above20k),
            _ => Err(ProviderError::InvalidField {
                field: "budget_range",
                value: s.to_string(),
            }),
        }
    }
}

impl From<BudgetRange> for String {
    fn from(range: BudgetRange) -> Self {
        range.label().to_string()
    }
}

impl TryFrom<String> for BudgetRange {
    type Error = ProviderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Weekly session bounds accepted for a structured plan.
pub const SESSIONS_PER_WEEK: std::ops::RangeInclusive<u32> = 1..=7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredRequirements {
    pub duration: PlanDuration,
    pub sessions_per_week: u32,
    #[serde(default)]
    pub preferred_days: Vec<Weekday>,
    #[serde(default)]
    pub gender_preference: Option<Gender>,
    #[serde(default)]
    pub budget_range: Option<BudgetRange>,
    #[serde(default)]
    pub health_goals: String,
    #[serde(default)]
    pub specific_requirements: String,
}

impl Default for StructuredRequirements {
    /// Plan used when nothing was captured: the "see all packages" shortcut
    /// and free-text requests.
    fn default() -> Self {
        Self {
            duration: PlanDuration::ThreeMonths,
            sessions_per_week: 2,
            preferred_days: Vec::new(),
            gender_preference: None,
            budget_range: None,
            health_goals: String::new(),
            specific_requirements: String::new(),
        }
    }
}

impl StructuredRequirements {
    pub fn validate(&self) -> Result<(), ProviderError> {
        if !SESSIONS_PER_WEEK.contains(&self.sessions_per_week) {
            return Err(ProviderError::InvalidField {
                field: "sessions_per_week",
                value: self.sessions_per_week.to_string(),
            });
        }
        Ok(())
    }
}

/// Captured user intent. Exactly one shape per wizard run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RequirementsRecord {
    Structured(StructuredRequirements),
    FreeText { raw_text: String },
}

impl Default for RequirementsRecord {
    fn default() -> Self {
        RequirementsRecord::Structured(StructuredRequirements::default())
    }
}

impl RequirementsRecord {
    pub fn structured(&self) -> Option<&StructuredRequirements> {
        match self {
            RequirementsRecord::Structured(fields) => Some(fields),
            RequirementsRecord::FreeText { .. } => None,
        }
    }

    /// Lower-cased text the ranking heuristics scan for keywords.
    pub fn search_text(&self) -> String {
        match self {
            RequirementsRecord::Structured(fields) => {
                format!("{} {}", fields.health_goals, fields.specific_requirements).to_lowercase()
            }
            RequirementsRecord::FreeText { raw_text } => raw_text.to_lowercase(),
        }
    }

    /// Free text always validates; structured fields are range-checked.
    pub fn validate(&self) -> Result<(), ProviderError> {
        match self {
            RequirementsRecord::Structured(fields) => fields.validate(),
            RequirementsRecord::FreeText { .. } => Ok(()),
        }
    }

    /// Duration and weekly sessions to price against.
    pub fn plan(&self) -> (PlanDuration, u32) {
        match self {
            RequirementsRecord::Structured(fields) => (fields.duration, fields.sessions_per_week),
            RequirementsRecord::FreeText { .. } => {
                let defaults = StructuredRequirements::default();
                (defaults.duration, defaults.sessions_per_week)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub rating: f32,
    pub review_count: u32,
    pub experience_years: u32,
    pub location: String,
    pub gender: Gender,
    pub qualifications: Vec<String>,
    pub languages: Vec<String>,
    pub specialties: Vec<String>,
    pub negotiation_enabled: bool,
}

impl Candidate {
    pub fn has_specialty_matching(&self, keyword: &str) -> Option<&str> {
        let keyword = keyword.to_lowercase();
        self.specialties
            .iter()
            .find(|s| s.to_lowercase().contains(&keyword))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub duration: PlanDuration,
    pub session_count: u32,
    pub price: u64,
    pub original_price: u64,
    pub savings: u64,
    pub schedule: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateWithPackage {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub package: Package,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommended_candidate_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedCandidate {
    #[serde(flatten)]
    pub entry: CandidateWithPackage,
    pub recommended: bool,
    pub recommendation_reason: Option<String>,
}

/// Everything the candidate review screen shows, in generator order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateList {
    pub service: String,
    pub requirements: RequirementsRecord,
    pub candidates: Vec<ListedCandidate>,
    pub recommendation: Option<Recommendation>,
}

impl CandidateList {
    pub fn new(
        service: String,
        requirements: RequirementsRecord,
        generated: Vec<CandidateWithPackage>,
        recommendation: Option<Recommendation>,
    ) -> Self {
        let candidates = generated
            .into_iter()
            .map(|entry| {
                let reason = recommendation
                    .as_ref()
                    .filter(|r| r.recommended_candidate_id == entry.candidate.id)
                    .map(|r| r.reason.clone());
                ListedCandidate {
                    recommended: reason.is_some(),
                    recommendation_reason: reason,
                    entry,
                }
            })
            .collect();

        Self {
            service,
            requirements,
            candidates,
            recommendation,
        }
    }

    pub fn find(&self, candidate_id: &str) -> Option<&CandidateWithPackage> {
        self.candidates
            .iter()
            .map(|listed| &listed.entry)
            .find(|entry| entry.candidate.id == candidate_id)
    }
}

// Error types specific to provider operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Candidate not found: {0}")]
    CandidateNotFound(String),

    #[error("Invalid value {value:?} for {field}")]
    InvalidField { field: &'static str, value: String },
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UnknownService(_) | ProviderError::CandidateNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            ProviderError::InvalidField { .. } => AppError::ValidationError(err.to_string()),
        }
    }
}
