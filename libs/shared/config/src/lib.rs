use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub donation_history_path: PathBuf,
    pub session_rate: u64,
    pub voice_fill_delay: Duration,
    pub acceptor_delay: Duration,
    pub scan_delay: Duration,
    pub simulation_timeout: Duration,
    /// Wizard sessions and blood requests untouched for this long are dropped.
    pub session_idle_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            donation_history_path: PathBuf::from("data/blood_donation_history.json"),
            session_rate: 500,
            voice_fill_delay: Duration::from_millis(3000),
            acceptor_delay: Duration::from_millis(2000),
            scan_delay: Duration::from_millis(1500),
            simulation_timeout: Duration::from_millis(10_000),
            session_idle_timeout: Duration::from_millis(30 * 60 * 1000),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| {
                    warn!("BIND_ADDRESS not set, using default");
                    defaults.bind_address.clone()
                }),
            donation_history_path: env::var("DONATION_HISTORY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("DONATION_HISTORY_PATH not set, using default");
                    defaults.donation_history_path.clone()
                }),
            session_rate: parse_var("SESSION_RATE", defaults.session_rate),
            voice_fill_delay: Duration::from_millis(
                parse_var("VOICE_FILL_DELAY_MS", millis(defaults.voice_fill_delay)),
            ),
            acceptor_delay: Duration::from_millis(
                parse_var("ACCEPTOR_DELAY_MS", millis(defaults.acceptor_delay)),
            ),
            scan_delay: Duration::from_millis(
                parse_var("SCAN_DELAY_MS", millis(defaults.scan_delay)),
            ),
            simulation_timeout: Duration::from_millis(
                parse_var("SIMULATION_TIMEOUT_MS", millis(defaults.simulation_timeout)),
            ),
            session_idle_timeout: Duration::from_millis(
                parse_var("SESSION_IDLE_TIMEOUT_MS", millis(defaults.session_idle_timeout)),
            ),
        };

        if !config.is_consistent() {
            warn!("Inconsistent timing config: a simulated delay exceeds the timeout or the idle timeout is zero");
        }

        config
    }

    /// Every simulated delay must fit inside the timeout, otherwise the
    /// operation can never complete.
    pub fn is_consistent(&self) -> bool {
        self.session_rate > 0
            && self.voice_fill_delay < self.simulation_timeout
            && self.acceptor_delay < self.simulation_timeout
            && self.scan_delay < self.simulation_timeout
            && !self.session_idle_timeout.is_zero()
    }
}

fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {}", name, raw, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, using default {}", name, default);
            default
        }
    }
}
