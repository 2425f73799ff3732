use tracing::info;

use shared_models::navigation::NavigationTarget;
use shared_utils::simulated::{SimulatedLatency, SimulationError};

use crate::models::{BloodError, ScanResult, SearchQuery};

pub const DONATE_PATH: &str = "/medicines/donate";
pub const RESULTS_PATH: &str = "/medicines/results";

const SCANNED_PRESCRIPTION: &str =
    "Rx: Paracetamol 500mg, 1 tablet twice daily for 5 days. Amoxicillin 250mg, 1 capsule three times daily.";
const SCANNED_MEDICINES: [&str; 2] = ["Paracetamol", "Amoxicillin"];

/// A named medicine goes to its donation page; anything else is a search.
pub fn search_target(query: &SearchQuery) -> Result<NavigationTarget, BloodError> {
    let non_blank = |v: &Option<String>| v.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);

    if let Some(medicine) = non_blank(&query.medicine) {
        return Ok(NavigationTarget::new(DONATE_PATH).with_param("medicine", medicine));
    }
    if let Some(q) = non_blank(&query.q) {
        return Ok(NavigationTarget::new(RESULTS_PATH).with_param("q", q));
    }

    Err(BloodError::Validation("Enter a medicine name or search text".to_string()))
}

/// Simulated prescription capture. Always returns the same text.
pub async fn simulate_scan(latency: &SimulatedLatency) -> Result<ScanResult, SimulationError> {
    let result = latency
        .run(async {
            ScanResult {
                text: SCANNED_PRESCRIPTION.to_string(),
                medicines: SCANNED_MEDICINES.iter().map(|m| m.to_string()).collect(),
            }
        })
        .await?;

    info!("Prescription scan produced {} medicines", result.medicines.len());
    Ok(result)
}
