pub mod history;
pub mod request;
pub mod search;

use std::sync::Arc;

use shared_config::AppConfig;
use shared_utils::notifier::Notifier;
use shared_utils::simulated::SimulatedLatency;

pub use history::{DonationHistory, HistoryStorage, InMemoryHistory, JsonFileHistory};
pub use request::BloodRequestStore;
pub use search::{search_target, simulate_scan};

/// Everything the blood routes share.
pub struct BloodState {
    pub requests: BloodRequestStore,
    pub history: DonationHistory,
    pub scan_latency: SimulatedLatency,
}

impl BloodState {
    pub fn new(config: &AppConfig, history: DonationHistory, notifier: Arc<dyn Notifier>) -> Self {
        let arrival_latency = SimulatedLatency::new(config.acceptor_delay, config.simulation_timeout);

        Self {
            requests: BloodRequestStore::new(history.clone(), arrival_latency, config.session_idle_timeout, notifier),
            history,
            scan_latency: SimulatedLatency::new(config.scan_delay, config.simulation_timeout),
        }
    }

    /// State backed by the JSON history file named in the config.
    pub fn from_config(config: &AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        let storage = JsonFileHistory::new(config.donation_history_path.clone());
        Self::new(config, DonationHistory::new(Arc::new(storage)), notifier)
    }
}
