use tracing::{debug, info};
use uuid::Uuid;

use provider_cell::{CandidateList, QuoteService, RequirementsRecord, ServiceKind};
use shared_models::context::RequestContext;

use crate::error::WizardError;
use crate::models::{
    BookingPayload, ConnectionOptions, Handoff, NegotiationPayload, StructuredForm, Urgency,
    WizardSnapshot, WizardStage,
};
use crate::services::capture;

#[derive(Debug, Clone)]
enum WizardState {
    Idle,
    RequirementsCapture { draft: String },
    CandidateReview { list: CandidateList },
    ConnectionChoice { list: CandidateList, options: ConnectionOptions },
    Terminal(Handoff),
}

impl WizardState {
    fn stage(&self) -> WizardStage {
        match self {
            WizardState::Idle => WizardStage::Idle,
            WizardState::RequirementsCapture { .. } => WizardStage::RequirementsCapture,
            WizardState::CandidateReview { .. } => WizardStage::CandidateReview,
            WizardState::ConnectionChoice { .. } => WizardStage::ConnectionChoice,
            WizardState::Terminal(_) => WizardStage::Terminal,
        }
    }
}

/// One run of the request wizard for a single service.
///
/// Every transition is synchronous. The only asynchronous step, voice fill, is
/// driven from outside and applied through [`WizardSession::apply_voice_fill`],
/// which refuses the write if the session moved on since the fill was requested.
#[derive(Debug, Clone)]
pub struct WizardSession {
    id: Uuid,
    service: ServiceKind,
    context: RequestContext,
    quotes: QuoteService,
    state: WizardState,
    generation: u64,
    voice_fill_pending: bool,
}

impl WizardSession {
    pub fn new(service: ServiceKind, context: RequestContext, quotes: QuoteService) -> Self {
        Self {
            id: Uuid::new_v4(),
            service,
            context,
            quotes,
            state: WizardState::Idle,
            generation: 0,
            voice_fill_pending: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn service(&self) -> ServiceKind {
        self.service
    }

    pub fn stage(&self) -> WizardStage {
        self.state.stage()
    }

    pub fn candidates(&self) -> Option<&CandidateList> {
        match &self.state {
            WizardState::CandidateReview { list } | WizardState::ConnectionChoice { list, .. } => Some(list),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            WizardState::RequirementsCapture { draft } => Some(draft),
            _ => None,
        }
    }

    /// Open the requirements form. Also used to revise requirements from the
    /// candidate list; the previous list is discarded on the next submit.
    pub fn open(&mut self) -> Result<(), WizardError> {
        self.guard(WizardStage::RequirementsCapture, "open the requirements form")?;
        self.advance(WizardState::RequirementsCapture { draft: String::new() });
        Ok(())
    }

    /// Shortcut straight to the candidate list with the default plan.
    pub fn see_all_packages(&mut self) -> Result<&CandidateList, WizardError> {
        self.guard(WizardStage::CandidateReview, "see all packages")?;
        self.review(RequirementsRecord::default())
    }

    pub fn update_draft(&mut self, text: &str) -> Result<(), WizardError> {
        match &mut self.state {
            WizardState::RequirementsCapture { draft } => {
                *draft = text.to_string();
                Ok(())
            }
            other => Err(WizardError::InvalidTransition {
                from: other.stage(),
                action: "edit the request text",
            }),
        }
    }

    /// Mark a voice fill as started and return the generation it belongs to.
    pub fn begin_voice_fill(&mut self) -> Result<u64, WizardError> {
        if self.stage() != WizardStage::RequirementsCapture {
            return Err(WizardError::InvalidTransition {
                from: self.stage(),
                action: "start voice input",
            });
        }
        self.voice_fill_pending = true;
        Ok(self.generation)
    }

    /// Apply a finished voice fill. Returns false, leaving the session
    /// untouched, if the wizard moved on or was reset in the meantime.
    pub fn apply_voice_fill(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            debug!("Dropping stale voice fill for wizard {}", self.id);
            return false;
        }
        self.voice_fill_pending = false;
        match &mut self.state {
            WizardState::RequirementsCapture { draft } => {
                *draft = capture::append_voice_text(draft);
                true
            }
            _ => false,
        }
    }

    pub fn cancel_voice_fill(&mut self, generation: u64) {
        if generation == self.generation {
            self.voice_fill_pending = false;
        }
    }

    pub fn submit_structured(&mut self, form: &StructuredForm) -> Result<&CandidateList, WizardError> {
        self.require_capture("submit requirements")?;
        let requirements = capture::submit_structured(form)?;
        self.review(requirements)
    }

    /// Submit free text. An empty `text` falls back to the current draft.
    pub fn submit_free_text(&mut self, text: &str) -> Result<&CandidateList, WizardError> {
        self.require_capture("submit requirements")?;
        let text = if text.trim().is_empty() {
            self.draft().unwrap_or_default().to_string()
        } else {
            text.to_string()
        };
        let requirements = capture::submit_free_text(&text)?;
        self.review(requirements)
    }

    pub fn select(&mut self, candidate_id: &str) -> Result<&ConnectionOptions, WizardError> {
        let list = match &self.state {
            WizardState::CandidateReview { list } => list.clone(),
            other => {
                return Err(WizardError::InvalidTransition {
                    from: other.stage(),
                    action: "select a candidate",
                })
            }
        };

        let candidate = list
            .find(candidate_id)
            .cloned()
            .ok_or_else(|| provider_cell::ProviderError::CandidateNotFound(candidate_id.to_string()))?;

        info!("Wizard {} selected candidate {}", self.id, candidate_id);
        let options = ConnectionOptions::for_candidate(candidate);
        self.advance(WizardState::ConnectionChoice { list, options });
        self.connection("select a candidate")
    }

    pub fn back(&mut self) -> Result<&CandidateList, WizardError> {
        let list = match &self.state {
            WizardState::ConnectionChoice { list, .. } => list.clone(),
            other => {
                return Err(WizardError::InvalidTransition {
                    from: other.stage(),
                    action: "go back to the candidate list",
                })
            }
        };
        self.advance(WizardState::CandidateReview { list });
        self.candidates().ok_or(WizardError::InvalidTransition {
            from: WizardStage::CandidateReview,
            action: "go back to the candidate list",
        })
    }

    pub fn negotiate(&mut self, message: &str, urgency: Urgency) -> Result<Handoff, WizardError> {
        let options = self.connection("negotiate")?;
        if options.negotiation.is_none() {
            return Err(WizardError::NegotiationDisabled(options.candidate.candidate.name.clone()));
        }
        if message.trim().is_empty() {
            return Err(WizardError::EmptyMessage);
        }

        let payload = NegotiationPayload {
            candidate_id: options.candidate.candidate.id.clone(),
            service: self.service.slug().to_string(),
            message: message.trim().to_string(),
            urgency,
        };
        let handoff = Handoff::negotiation(&payload);
        info!("Wizard {} handed off to negotiation ({:?})", self.id, urgency);
        self.advance(WizardState::Terminal(handoff.clone()));
        Ok(handoff)
    }

    pub fn book_directly(&mut self) -> Result<Handoff, WizardError> {
        let options = self.connection("book")?;
        let payload = BookingPayload {
            candidate_id: options.candidate.candidate.id.clone(),
            service: self.service.slug().to_string(),
        };
        let handoff = Handoff::direct_booking(&payload);
        info!("Wizard {} handed off to direct booking", self.id);
        self.advance(WizardState::Terminal(handoff.clone()));
        Ok(handoff)
    }

    /// Reset to idle, discarding requirements and candidates.
    pub fn close(&mut self) -> Result<(), WizardError> {
        self.guard(WizardStage::Idle, "close the wizard")?;
        self.advance(WizardState::Idle);
        Ok(())
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        let (connection, handoff) = match &self.state {
            WizardState::ConnectionChoice { options, .. } => (Some(options.clone()), None),
            WizardState::Terminal(handoff) => (None, Some(handoff.clone())),
            _ => (None, None),
        };

        WizardSnapshot {
            id: self.id,
            service: self.service.slug().to_string(),
            stage: self.stage(),
            context: self.context.clone(),
            draft_text: self.draft().map(str::to_string),
            can_submit_draft: self.draft().is_some_and(capture::can_submit_free_text),
            voice_fill_pending: self.voice_fill_pending,
            candidates: self.candidates().cloned(),
            connection,
            handoff,
        }
    }

    fn review(&mut self, requirements: RequirementsRecord) -> Result<&CandidateList, WizardError> {
        let list = self.quotes.quote(self.service, requirements);
        self.advance(WizardState::CandidateReview { list });
        self.candidates().ok_or(WizardError::InvalidTransition {
            from: WizardStage::CandidateReview,
            action: "review candidates",
        })
    }

    fn connection(&self, action: &'static str) -> Result<&ConnectionOptions, WizardError> {
        match &self.state {
            WizardState::ConnectionChoice { options, .. } => Ok(options),
            other => Err(WizardError::InvalidTransition { from: other.stage(), action }),
        }
    }

    fn require_capture(&self, action: &'static str) -> Result<(), WizardError> {
        match self.stage() {
            WizardStage::RequirementsCapture => Ok(()),
            from => Err(WizardError::InvalidTransition { from, action }),
        }
    }

    fn guard(&self, target: WizardStage, action: &'static str) -> Result<(), WizardError> {
        let from = self.stage();
        if from.can_transition_to(&target) {
            Ok(())
        } else {
            Err(WizardError::InvalidTransition { from, action })
        }
    }

    /// Every state change bumps the generation, invalidating pending fills.
    fn advance(&mut self, next: WizardState) {
        debug!("Wizard {}: {:?} -> {:?}", self.id, self.stage(), next.stage());
        self.generation += 1;
        self.voice_fill_pending = false;
        self.state = next;
    }
}
