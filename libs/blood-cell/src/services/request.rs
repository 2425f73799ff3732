use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_models::notification::Notification;
use shared_utils::notifier::Notifier;
use shared_utils::simulated::{PendingTask, SimulatedLatency};

use crate::models::{
    Acceptor, BloodError, BloodRequest, BloodType, CompleteBloodRequest, CompletionReceipt, CreateBloodRequest,
    DonationHistoryEntry, NotifyTarget, RequestLocation, RequestStatus,
};
use crate::services::history::{today, DonationHistory, COMPLETED_STATUS, DEFAULT_DONATION_TYPE};

type Requests = HashMap<Uuid, RequestEntry>;

struct RequestEntry {
    request: BloodRequest,
    // Dropping the entry aborts a pending acceptor arrival.
    arrival: Option<PendingTask>,
    // Set while the donation is being written to the history log.
    completing: bool,
    last_touched: Instant,
}

/// Active blood requests. Completed, dismissed and idle requests are removed.
pub struct BloodRequestStore {
    requests: Arc<RwLock<Requests>>,
    history: DonationHistory,
    arrival_latency: SimulatedLatency,
    idle_timeout: Duration,
    notifier: Arc<dyn Notifier>,
}

impl BloodRequestStore {
    pub fn new(
        history: DonationHistory,
        arrival_latency: SimulatedLatency,
        idle_timeout: Duration,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            history,
            arrival_latency,
            idle_timeout,
            notifier,
        }
    }

    #[instrument(skip(self, form))]
    pub async fn create(&self, form: CreateBloodRequest) -> Result<BloodRequest, BloodError> {
        let request = validate(form)?;
        let id = request.id;

        // The arrival task blocks on this lock, so the entry is always in
        // place before it looks for it.
        let mut requests = self.requests.write().await;
        self.drop_idle(&mut requests);

        let shared = self.requests.clone();
        let latency = self.arrival_latency;
        let notifier = self.notifier.clone();
        let arrival = PendingTask::spawn(async move {
            let outcome = latency.run(async {}).await;

            let mut requests = shared.write().await;
            let Some(entry) = requests.get_mut(&id) else {
                debug!("Blood request {} gone before acceptors arrived", id);
                return;
            };

            match outcome {
                Ok(()) => {
                    entry.request.acceptors = matching_acceptors(&entry.request);
                    info!("{} acceptors responded to blood request {}", entry.request.acceptors.len(), id);
                    notifier.notify(Notification::success(format!(
                        "{} donors accepted your request",
                        entry.request.acceptors.len()
                    )));
                }
                Err(e) => {
                    warn!("Acceptor search for {} failed: {}", id, e);
                    notifier.notify(Notification::error("Could not reach donors, please try again"));
                }
            }
        });

        requests.insert(
            id,
            RequestEntry {
                request: request.clone(),
                arrival: Some(arrival),
                completing: false,
                last_touched: Instant::now(),
            },
        );
        info!("Blood request {} created for {:?}", id, request.blood_types);
        Ok(request)
    }

    pub async fn get(&self, id: Uuid) -> Result<BloodRequest, BloodError> {
        let mut requests = self.requests.write().await;
        self.live_entry(&mut requests, id).map(|entry| entry.request.clone())
    }

    pub async fn len(&self) -> usize {
        self.requests.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.requests.read().await.is_empty()
    }

    /// Mark the request completed, log a single history entry covering every
    /// requested blood type and drop the request. The request stays active if
    /// the log write fails.
    #[instrument(skip(self, completion))]
    pub async fn complete(&self, id: Uuid, completion: CompleteBloodRequest) -> Result<CompletionReceipt, BloodError> {
        let hospital = completion.hospital.trim().to_string();
        if hospital.is_empty() {
            return Err(BloodError::Validation("Hospital is required".to_string()));
        }

        let request = {
            let mut requests = self.requests.write().await;
            let entry = self.live_entry(&mut requests, id)?;
            if entry.completing {
                return Err(BloodError::Completing(id));
            }
            entry.completing = true;
            entry.request.clone()
        };

        let recorded = history_entry(&request, &hospital, completion.donation_type.as_deref());
        let history = match self.history.append(vec![recorded.clone()]).await {
            Ok(history) => history,
            Err(e) => {
                if let Some(entry) = self.requests.write().await.get_mut(&id) {
                    entry.completing = false;
                }
                return Err(e.into());
            }
        };

        let mut request = match self.requests.write().await.remove(&id) {
            Some(entry) => entry.request,
            None => {
                warn!("Blood request {} was dropped while its donation was recorded", id);
                request
            }
        };
        request.status = RequestStatus::Completed;

        info!("Blood request {} completed at {}", id, hospital);
        self.notifier.notify(Notification::success("Donation recorded. Thank you!"));
        Ok(CompletionReceipt {
            request,
            recorded,
            history,
        })
    }

    pub async fn dismiss(&self, id: Uuid) -> Result<(), BloodError> {
        let mut requests = self.requests.write().await;
        self.drop_idle(&mut requests);
        let mut entry = requests.remove(&id).ok_or(BloodError::NotFound(id))?;
        if let Some(task) = entry.arrival.take() {
            task.cancel();
        }
        info!("Blood request {} dismissed", id);
        Ok(())
    }

    /// Requests nobody has looked at within the idle timeout are forgotten,
    /// along with any acceptor arrival still pending for them.
    fn drop_idle(&self, requests: &mut Requests) {
        let before = requests.len();
        requests.retain(|_, entry| entry.completing || entry.last_touched.elapsed() < self.idle_timeout);

        let dropped = before - requests.len();
        if dropped > 0 {
            info!("Dropped {} idle blood requests", dropped);
        }
    }

    fn live_entry<'a>(&self, requests: &'a mut Requests, id: Uuid) -> Result<&'a mut RequestEntry, BloodError> {
        self.drop_idle(requests);
        let entry = requests.get_mut(&id).ok_or(BloodError::NotFound(id))?;
        entry.last_touched = Instant::now();
        Ok(entry)
    }
}

fn validate(form: CreateBloodRequest) -> Result<BloodRequest, BloodError> {
    let blood_types: BTreeSet<BloodType> = form.blood_types.into_iter().collect();
    if blood_types.is_empty() {
        return Err(BloodError::Validation("Select at least one blood type".to_string()));
    }
    if form.units_required == 0 {
        return Err(BloodError::Validation("Units required must be at least 1".to_string()));
    }
    let notify_targets: BTreeSet<NotifyTarget> = form.notify_targets.into_iter().collect();
    if notify_targets.is_empty() {
        return Err(BloodError::Validation("Choose who should be notified".to_string()));
    }

    Ok(BloodRequest {
        id: Uuid::new_v4(),
        blood_types,
        units_required: form.units_required,
        location: RequestLocation::from_input(form.location.as_deref()),
        notify_targets,
        status: RequestStatus::Active,
        acceptors: Vec::new(),
        context: form.context,
        created_at: Utc::now(),
    })
}

/// One log line per completed request. Multiple requested types share the
/// entry, listed in blood type order.
fn history_entry(request: &BloodRequest, hospital: &str, donation_type: Option<&str>) -> DonationHistoryEntry {
    let donation_type = donation_type
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_DONATION_TYPE);
    let blood_type = request
        .blood_types
        .iter()
        .map(BloodType::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    DonationHistoryEntry {
        id: Uuid::new_v4().to_string(),
        blood_type,
        units: request.units_required,
        donation_type: donation_type.to_string(),
        status: COMPLETED_STATUS.to_string(),
        date: today(),
        hospital: hospital.to_string(),
    }
}

/// Mock responders. Nobody is actually contacted.
pub fn acceptor_roster() -> Vec<Acceptor> {
    let acceptor = |id: &str, name: &str, blood_type, kind, distance_km, contact: &str| Acceptor {
        id: id.to_string(),
        name: name.to_string(),
        blood_type,
        kind,
        distance_km,
        contact: contact.to_string(),
    };

    vec![
        acceptor("acc-1", "Red Cross Blood Bank", BloodType::ONegative, NotifyTarget::NgosHospitals, 2.1, "+91 22 2266 3560"),
        acceptor("acc-2", "Lilavati Hospital", BloodType::APositive, NotifyTarget::NgosHospitals, 3.4, "+91 22 2675 1000"),
        acceptor("acc-3", "Rahul Mehta", BloodType::BPositive, NotifyTarget::IndividualDonors, 1.2, "+91 98200 11223"),
        acceptor("acc-4", "Sneha Iyer", BloodType::OPositive, NotifyTarget::IndividualDonors, 4.8, "+91 98190 44556"),
        acceptor("acc-5", "Sankalp Foundation", BloodType::AbPositive, NotifyTarget::NgosHospitals, 5.5, "+91 22 2412 7788"),
        acceptor("acc-6", "Arjun Nair", BloodType::ANegative, NotifyTarget::IndividualDonors, 2.7, "+91 99870 66778"),
    ]
}

/// Roster members who were notified and can donate to any requested type.
pub fn matching_acceptors(request: &BloodRequest) -> Vec<Acceptor> {
    acceptor_roster()
        .into_iter()
        .filter(|a| request.notify_targets.contains(&a.kind))
        .filter(|a| request.blood_types.iter().any(|t| a.blood_type.can_donate_to(t)))
        .collect()
}
