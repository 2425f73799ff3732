use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::context::RequestContext;
use shared_models::error::AppError;
use shared_utils::simulated::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }

    fn antigens(&self) -> (bool, bool, bool) {
        // (A, B, Rh)
        match self {
            BloodType::APositive => (true, false, true),
            BloodType::ANegative => (true, false, false),
            BloodType::BPositive => (false, true, true),
            BloodType::BNegative => (false, true, false),
            BloodType::AbPositive => (true, true, true),
            BloodType::AbNegative => (true, true, false),
            BloodType::OPositive => (false, false, true),
            BloodType::ONegative => (false, false, false),
        }
    }

    /// Red cell compatibility: the donor may not carry an antigen the
    /// recipient lacks.
    pub fn can_donate_to(&self, recipient: &BloodType) -> bool {
        let (da, db, drh) = self.antigens();
        let (ra, rb, rrh) = recipient.antigens();
        (!da || ra) && (!db || rb) && (!drh || rrh)
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = BloodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        BloodType::ALL
            .iter()
            .find(|t| t.as_str() == normalized)
            .copied()
            .ok_or_else(|| BloodError::Validation(format!("Unknown blood type: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyTarget {
    NgosHospitals,
    IndividualDonors,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestLocation {
    #[default]
    Current,
    Named(String),
}

impl RequestLocation {
    /// Blank input or the literal "current" means the device location.
    pub fn from_input(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => RequestLocation::Current,
            Some(value) if value.eq_ignore_ascii_case("current") => RequestLocation::Current,
            Some(value) => RequestLocation::Named(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acceptor {
    pub id: String,
    pub name: String,
    pub blood_type: BloodType,
    pub kind: NotifyTarget,
    pub distance_km: f32,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodRequest {
    pub id: Uuid,
    pub blood_types: BTreeSet<BloodType>,
    pub units_required: u32,
    pub location: RequestLocation,
    pub notify_targets: BTreeSet<NotifyTarget>,
    pub status: RequestStatus,
    pub acceptors: Vec<Acceptor>,
    pub context: RequestContext,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBloodRequest {
    pub blood_types: Vec<BloodType>,
    pub units_required: u32,
    #[serde(default)]
    pub location: Option<String>,
    pub notify_targets: Vec<NotifyTarget>,
    #[serde(default)]
    pub context: RequestContext,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteBloodRequest {
    pub hospital: String,
    #[serde(default)]
    pub donation_type: Option<String>,
}

/// One line of the persisted donation log. Fields are stored as given;
/// nothing is validated on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationHistoryEntry {
    pub id: String,
    pub blood_type: String,
    pub units: u32,
    pub donation_type: String,
    pub status: String,
    pub date: String,
    pub hospital: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDonation {
    pub blood_type: String,
    pub units: u32,
    #[serde(default)]
    pub donation_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    pub hospital: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DonationSummary {
    pub units_donated: u64,
    pub donations_made: usize,
}

impl DonationSummary {
    pub fn from_entries(entries: &[DonationHistoryEntry]) -> Self {
        Self {
            units_donated: entries.iter().map(|e| e.units as u64).sum(),
            donations_made: entries.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySnapshot {
    pub entries: Vec<DonationHistoryEntry>,
    pub summary: DonationSummary,
}

impl HistorySnapshot {
    pub fn new(entries: Vec<DonationHistoryEntry>) -> Self {
        let summary = DonationSummary::from_entries(&entries);
        Self { entries, summary }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionReceipt {
    pub request: BloodRequest,
    pub recorded: DonationHistoryEntry,
    pub history: HistorySnapshot,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub medicine: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub text: String,
    pub medicines: Vec<String>,
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Donation history storage failed: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        AppError::Storage(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum BloodError {
    #[error("Blood request not found: {0}")]
    NotFound(Uuid),

    #[error("Blood request {0} is already being completed")]
    Completing(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("Simulated operation failed: {0}")]
    Simulation(#[from] SimulationError),
}

impl From<BloodError> for AppError {
    fn from(err: BloodError) -> Self {
        match err {
            BloodError::NotFound(_) => AppError::NotFound(err.to_string()),
            BloodError::Completing(_) => AppError::Conflict(err.to_string()),
            BloodError::Validation(msg) => AppError::ValidationError(msg),
            BloodError::History(inner) => inner.into(),
            BloodError::Simulation(_) => AppError::Timeout(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compatibility() {
        assert!(BloodType::ONegative.can_donate_to(&BloodType::AbPositive));
        assert!(BloodType::APositive.can_donate_to(&BloodType::AbPositive));
        assert!(!BloodType::APositive.can_donate_to(&BloodType::ANegative));
        assert!(!BloodType::BNegative.can_donate_to(&BloodType::ANegative));

        let universal: Vec<_> = BloodType::ALL
            .iter()
            .filter(|donor| BloodType::ALL.iter().all(|r| donor.can_donate_to(r)))
            .collect();
        assert_eq!(universal, vec![&BloodType::ONegative]);
    }

    #[test]
    fn test_blood_type_labels() {
        assert_eq!("ab+".parse::<BloodType>().unwrap(), BloodType::AbPositive);
        assert!("C+".parse::<BloodType>().is_err());
        assert_eq!(serde_json::to_string(&BloodType::ONegative).unwrap(), "\"O-\"");
    }

    #[test]
    fn test_location_input() {
        assert_eq!(RequestLocation::from_input(None), RequestLocation::Current);
        assert_eq!(RequestLocation::from_input(Some(" Current ")), RequestLocation::Current);
        assert_eq!(
            RequestLocation::from_input(Some("Andheri West")),
            RequestLocation::Named("Andheri West".to_string())
        );
    }
}
