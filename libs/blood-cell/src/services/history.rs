use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{DonationHistoryEntry, HistoryError, HistorySnapshot, NewDonation};

pub const DEFAULT_DONATION_TYPE: &str = "Whole Blood";
pub const COMPLETED_STATUS: &str = "Completed";

/// Durable home of the donation log. Implementations read and write the list
/// whole; there are no partial updates.
#[async_trait]
pub trait HistoryStorage: Send + Sync {
    async fn load(&self) -> Result<Vec<DonationHistoryEntry>, HistoryError>;
    async fn save(&self, entries: &[DonationHistoryEntry]) -> Result<(), HistoryError>;
}

/// JSON array on disk. A missing or empty file is an empty log.
#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryStorage for JsonFileHistory {
    async fn load(&self) -> Result<Vec<DonationHistoryEntry>, HistoryError> {
        if !fs::try_exists(&self.path)
            .await
            .with_context(|| format!("checking history file {}", self.path.display()))?
        {
            return Ok(Vec::new());
        }

        let text = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading history file {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries = serde_json::from_str(&text)
            .with_context(|| format!("parsing history file {}", self.path.display()))?;
        Ok(entries)
    }

    async fn save(&self, entries: &[DonationHistoryEntry]) -> Result<(), HistoryError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating history directory {}", parent.display()))?;

        let bytes = serde_json::to_vec_pretty(entries).context("serializing donation history")?;
        let temp_path = parent.join(format!(".{}.tmp", Uuid::new_v4()));

        let mut file = fs::File::create(&temp_path)
            .await
            .with_context(|| format!("opening temp history file {}", temp_path.display()))?;
        file.write_all(&bytes)
            .await
            .with_context(|| format!("writing temp history file {}", temp_path.display()))?;
        file.flush()
            .await
            .with_context(|| format!("flushing temp history file {}", temp_path.display()))?;
        drop(file);

        if let Err(err) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(anyhow::Error::new(err)
                .context(format!(
                    "renaming {} -> {}",
                    temp_path.display(),
                    self.path.display()
                ))
                .into());
        }

        debug!("Wrote {} history entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryHistory {
    entries: Mutex<Vec<DonationHistoryEntry>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStorage for InMemoryHistory {
    async fn load(&self) -> Result<Vec<DonationHistoryEntry>, HistoryError> {
        Ok(self.entries.lock().await.clone())
    }

    async fn save(&self, entries: &[DonationHistoryEntry]) -> Result<(), HistoryError> {
        *self.entries.lock().await = entries.to_vec();
        Ok(())
    }
}

/// Append-only donation log. The summary is always recomputed from what the
/// storage returns, never cached.
#[derive(Clone)]
pub struct DonationHistory {
    storage: Arc<dyn HistoryStorage>,
    // Serializes read-modify-write within this process only.
    write_lock: Arc<Mutex<()>>,
}

impl DonationHistory {
    pub fn new(storage: Arc<dyn HistoryStorage>) -> Self {
        Self {
            storage,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryHistory::new()))
    }

    pub async fn snapshot(&self) -> Result<HistorySnapshot, HistoryError> {
        Ok(HistorySnapshot::new(self.storage.load().await?))
    }

    pub async fn append(&self, new_entries: Vec<DonationHistoryEntry>) -> Result<HistorySnapshot, HistoryError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.storage.load().await?;
        let added = new_entries.len();
        entries.extend(new_entries);
        self.storage.save(&entries).await?;

        info!("Appended {} donation history entries ({} total)", added, entries.len());
        Ok(HistorySnapshot::new(entries))
    }

    pub async fn record(&self, donation: NewDonation) -> Result<HistorySnapshot, HistoryError> {
        self.append(vec![entry_from(donation)]).await
    }
}

pub fn entry_from(donation: NewDonation) -> DonationHistoryEntry {
    DonationHistoryEntry {
        id: Uuid::new_v4().to_string(),
        blood_type: donation.blood_type,
        units: donation.units,
        donation_type: donation
            .donation_type
            .unwrap_or_else(|| DEFAULT_DONATION_TYPE.to_string()),
        status: donation.status.unwrap_or_else(|| COMPLETED_STATUS.to_string()),
        date: donation.date.unwrap_or_else(today),
        hospital: donation.hospital,
    }
}

pub fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
