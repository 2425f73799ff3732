use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use provider_cell::{QuoteService, ServiceKind};
use shared_config::AppConfig;
use shared_models::context::RequestContext;
use shared_models::notification::Notification;
use shared_utils::notifier::Notifier;
use shared_utils::simulated::{PendingTask, SimulatedLatency};

use crate::error::WizardError;
use crate::models::{Handoff, StructuredForm, Urgency, WizardSnapshot};
use crate::services::session::WizardSession;

type Sessions = HashMap<Uuid, SessionEntry>;

struct SessionEntry {
    session: WizardSession,
    // Dropping the entry aborts an in-flight voice fill.
    voice_fill: Option<PendingTask>,
    last_touched: Instant,
}

/// Live wizard sessions, keyed by id. Terminal, closed and idle sessions are
/// removed; nothing survives a hand-off.
pub struct WizardStore {
    sessions: Arc<RwLock<Sessions>>,
    quotes: QuoteService,
    voice_latency: SimulatedLatency,
    idle_timeout: Duration,
    notifier: Arc<dyn Notifier>,
}

impl WizardStore {
    pub fn new(config: &AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            quotes: QuoteService::new(config),
            voice_latency: SimulatedLatency::new(config.voice_fill_delay, config.simulation_timeout),
            idle_timeout: config.session_idle_timeout,
            notifier,
        }
    }

    #[instrument(skip(self))]
    pub async fn open(&self, service: &str, context: RequestContext) -> Result<WizardSnapshot, WizardError> {
        let mut session = self.new_session(service, context)?;
        session.open()?;
        Ok(self.insert(session).await)
    }

    /// "See all packages": a new session that skips requirements capture.
    #[instrument(skip(self))]
    pub async fn open_all_packages(
        &self,
        service: &str,
        context: RequestContext,
    ) -> Result<WizardSnapshot, WizardError> {
        let mut session = self.new_session(service, context)?;
        session.see_all_packages()?;
        Ok(self.insert(session).await)
    }

    pub async fn get(&self, id: Uuid) -> Result<WizardSnapshot, WizardError> {
        let mut sessions = self.sessions.write().await;
        self.live_entry(&mut sessions, id).map(|entry| entry.session.snapshot())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub async fn update_draft(&self, id: Uuid, text: &str) -> Result<WizardSnapshot, WizardError> {
        self.with_session(id, |session| session.update_draft(text)).await
    }

    /// Start the simulated voice input. The sentence lands in the draft after
    /// the configured delay, unless the wizard moved on first.
    #[instrument(skip(self))]
    pub async fn request_voice_fill(&self, id: Uuid) -> Result<WizardSnapshot, WizardError> {
        let mut sessions = self.sessions.write().await;
        let entry = self.live_entry(&mut sessions, id)?;
        let generation = entry.session.begin_voice_fill()?;

        let shared = self.sessions.clone();
        let latency = self.voice_latency;
        let notifier = self.notifier.clone();

        entry.voice_fill = Some(PendingTask::spawn(async move {
            let outcome = latency.run(async {}).await;

            let mut sessions = shared.write().await;
            let Some(entry) = sessions.get_mut(&id) else {
                debug!("Wizard {} closed before voice fill finished", id);
                return;
            };

            match outcome {
                Ok(()) => {
                    if entry.session.apply_voice_fill(generation) {
                        info!("Voice fill applied to wizard {}", id);
                    }
                }
                Err(e) => {
                    warn!("Voice fill for wizard {} failed: {}", id, e);
                    entry.session.cancel_voice_fill(generation);
                    notifier.notify(Notification::error("Voice input failed, please type your request"));
                }
            }
        }));

        Ok(entry.session.snapshot())
    }

    pub async fn submit_structured(&self, id: Uuid, form: &StructuredForm) -> Result<WizardSnapshot, WizardError> {
        self.with_session(id, |session| session.submit_structured(form).map(|_| ())).await
    }

    pub async fn submit_free_text(&self, id: Uuid, text: &str) -> Result<WizardSnapshot, WizardError> {
        self.with_session(id, |session| session.submit_free_text(text).map(|_| ())).await
    }

    pub async fn select(&self, id: Uuid, candidate_id: &str) -> Result<WizardSnapshot, WizardError> {
        self.with_session(id, |session| session.select(candidate_id).map(|_| ())).await
    }

    pub async fn back(&self, id: Uuid) -> Result<WizardSnapshot, WizardError> {
        self.with_session(id, |session| session.back().map(|_| ())).await
    }

    pub async fn negotiate(&self, id: Uuid, message: &str, urgency: Urgency) -> Result<Handoff, WizardError> {
        let handoff = self.finish(id, |session| session.negotiate(message, urgency)).await?;
        self.notifier.notify(Notification::success("Your request has been sent to the specialist"));
        Ok(handoff)
    }

    pub async fn book_directly(&self, id: Uuid) -> Result<Handoff, WizardError> {
        let handoff = self.finish(id, |session| session.book_directly()).await?;
        self.notifier.notify(Notification::info("Redirecting to booking"));
        Ok(handoff)
    }

    /// Close and forget the session, cancelling any pending voice fill.
    pub async fn close(&self, id: Uuid) -> Result<(), WizardError> {
        let mut sessions = self.sessions.write().await;
        self.drop_idle(&mut sessions);
        let mut entry = sessions.remove(&id).ok_or(WizardError::NotFound(id))?;
        if let Err(e) = entry.session.close() {
            // already terminal; removal is all that is left to do
            debug!("Closing wizard {}: {}", id, e);
        }
        if let Some(task) = entry.voice_fill.take() {
            task.cancel();
        }
        info!("Wizard {} closed", id);
        Ok(())
    }

    fn new_session(&self, service: &str, context: RequestContext) -> Result<WizardSession, WizardError> {
        let service: ServiceKind = service.parse()?;
        Ok(WizardSession::new(service, context, self.quotes.clone()))
    }

    async fn insert(&self, session: WizardSession) -> WizardSnapshot {
        let snapshot = session.snapshot();
        info!("Wizard {} opened for {} at {:?}", snapshot.id, snapshot.service, snapshot.stage);

        let mut sessions = self.sessions.write().await;
        self.drop_idle(&mut sessions);
        sessions.insert(
            session.id(),
            SessionEntry {
                session,
                voice_fill: None,
                last_touched: Instant::now(),
            },
        );
        snapshot
    }

    async fn with_session<F>(&self, id: Uuid, apply: F) -> Result<WizardSnapshot, WizardError>
    where
        F: FnOnce(&mut WizardSession) -> Result<(), WizardError>,
    {
        let mut sessions = self.sessions.write().await;
        let entry = self.live_entry(&mut sessions, id)?;
        apply(&mut entry.session)?;
        Ok(entry.session.snapshot())
    }

    /// Run a terminal transition and drop the session once it succeeds.
    async fn finish<F>(&self, id: Uuid, apply: F) -> Result<Handoff, WizardError>
    where
        F: FnOnce(&mut WizardSession) -> Result<Handoff, WizardError>,
    {
        let mut sessions = self.sessions.write().await;
        let entry = self.live_entry(&mut sessions, id)?;
        let handoff = apply(&mut entry.session)?;
        sessions.remove(&id);
        info!("Wizard {} finished with {:?}", id, handoff.completion);
        Ok(handoff)
    }

    /// Abandoned wizards are dropped once idle past the timeout; dropping the
    /// entry also aborts a pending voice fill.
    fn drop_idle(&self, sessions: &mut Sessions) {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_touched.elapsed() < self.idle_timeout);

        let dropped = before - sessions.len();
        if dropped > 0 {
            info!("Dropped {} idle wizard sessions", dropped);
        }
    }

    fn live_entry<'a>(&self, sessions: &'a mut Sessions, id: Uuid) -> Result<&'a mut SessionEntry, WizardError> {
        self.drop_idle(sessions);
        let entry = sessions.get_mut(&id).ok_or(WizardError::NotFound(id))?;
        entry.last_touched = Instant::now();
        Ok(entry)
    }
}
