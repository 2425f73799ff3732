use serde::{Deserialize, Serialize};
use uuid::Uuid;

use provider_cell::{CandidateList, CandidateWithPackage};
use shared_models::context::RequestContext;
use shared_models::navigation::NavigationTarget;

pub const NEGOTIATION_PATH: &str = "/services/negotiation";
pub const BOOKING_PATH: &str = "/services/booking";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStage {
    Idle,
    RequirementsCapture,
    CandidateReview,
    ConnectionChoice,
    Terminal,
}

impl WizardStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WizardStage::Terminal)
    }

    pub fn can_transition_to(&self, target: &WizardStage) -> bool {
        use WizardStage::*;
        match (self, target) {
            (Idle, RequirementsCapture) => true,
            (CandidateReview, RequirementsCapture) => true,
            (Idle, CandidateReview) => true,
            (RequirementsCapture, CandidateReview) => true,
            (CandidateReview, ConnectionChoice) => true,
            (ConnectionChoice, CandidateReview) => true,
            (ConnectionChoice, Terminal) => true,
            (_, Idle) => !self.is_terminal(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UrgencyStyle {
    pub label: &'static str,
    pub tone: Tone,
}

impl Urgency {
    pub const ALL: [Urgency; 4] = [Urgency::Low, Urgency::Normal, Urgency::High, Urgency::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::High => "high",
            Urgency::Urgent => "urgent",
        }
    }

    pub fn style(&self) -> UrgencyStyle {
        let (label, tone) = match self {
            Urgency::Low => ("Low", Tone::Neutral),
            Urgency::Normal => ("Normal", Tone::Info),
            Urgency::High => ("High", Tone::Warning),
            Urgency::Urgent => ("Urgent", Tone::Critical),
        };
        UrgencyStyle { label, tone }
    }
}

/// Raw structured form fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredForm {
    pub duration: String,
    pub sessions_per_week: String,
    pub preferred_days: Vec<String>,
    pub gender_preference: Option<String>,
    pub budget_range: Option<String>,
    pub health_goals: String,
    pub specific_requirements: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrgencyOption {
    pub level: Urgency,
    pub style: UrgencyStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NegotiationOption {
    pub default_urgency: Urgency,
    pub urgency_levels: Vec<UrgencyOption>,
}

impl NegotiationOption {
    pub fn standard() -> Self {
        Self {
            default_urgency: Urgency::default(),
            urgency_levels: Urgency::ALL
                .iter()
                .map(|level| UrgencyOption { level: *level, style: level.style() })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectBookingOption {
    pub price: u64,
    pub session_count: u32,
}

/// What the connection step offers for the selected candidate. Negotiation is
/// absent when the candidate does not accept it; direct booking is always there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionOptions {
    pub candidate: CandidateWithPackage,
    pub negotiation: Option<NegotiationOption>,
    pub direct_booking: DirectBookingOption,
}

impl ConnectionOptions {
    pub fn for_candidate(candidate: CandidateWithPackage) -> Self {
        let negotiation = candidate
            .candidate
            .negotiation_enabled
            .then(NegotiationOption::standard);
        let direct_booking = DirectBookingOption {
            price: candidate.package.price,
            session_count: candidate.package.session_count,
        };

        Self {
            candidate,
            negotiation,
            direct_booking,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    Negotiation,
    DirectBooking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationPayload {
    pub candidate_id: String,
    pub service: String,
    pub message: String,
    pub urgency: Urgency,
}

impl NegotiationPayload {
    pub fn target(&self) -> NavigationTarget {
        NavigationTarget::new(NEGOTIATION_PATH)
            .with_param("specialist", &self.candidate_id)
            .with_param("service", &self.service)
            .with_param("message", &self.message)
            .with_param("urgency", self.urgency.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPayload {
    pub candidate_id: String,
    pub service: String,
}

impl BookingPayload {
    pub fn target(&self) -> NavigationTarget {
        NavigationTarget::new(BOOKING_PATH)
            .with_param("specialist", &self.candidate_id)
            .with_param("service", &self.service)
    }
}

/// Where control goes once the wizard finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handoff {
    pub completion: Completion,
    pub target: NavigationTarget,
    pub url: String,
}

impl Handoff {
    pub fn negotiation(payload: &NegotiationPayload) -> Self {
        let target = payload.target();
        Self {
            completion: Completion::Negotiation,
            url: target.to_url(),
            target,
        }
    }

    pub fn direct_booking(payload: &BookingPayload) -> Self {
        let target = payload.target();
        Self {
            completion: Completion::DirectBooking,
            url: target.to_url(),
            target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardSnapshot {
    pub id: Uuid,
    pub service: String,
    pub stage: WizardStage,
    pub context: RequestContext,
    pub draft_text: Option<String>,
    /// Whether the free-text submit action is enabled for the current draft.
    pub can_submit_draft: bool,
    pub voice_fill_pending: bool,
    pub candidates: Option<CandidateList>,
    pub connection: Option<ConnectionOptions>,
    pub handoff: Option<Handoff>,
}

// Request bodies

#[derive(Debug, Clone, Deserialize)]
pub struct OpenWizardRequest {
    pub service: String,
    #[serde(default)]
    pub context: RequestContext,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FreeTextRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectCandidateRequest {
    pub candidate_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NegotiateRequest {
    pub message: String,
    #[serde(default)]
    pub urgency: Urgency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_transitions() {
        use WizardStage::*;
        assert!(Idle.can_transition_to(&RequirementsCapture));
        assert!(Idle.can_transition_to(&CandidateReview));
        assert!(ConnectionChoice.can_transition_to(&Terminal));
        assert!(!RequirementsCapture.can_transition_to(&ConnectionChoice));
        assert!(!CandidateReview.can_transition_to(&Terminal));
        assert!(!Terminal.can_transition_to(&Idle));
        assert!(CandidateReview.can_transition_to(&Idle));
    }

    #[test]
    fn test_every_urgency_has_a_distinct_style() {
        let tones: Vec<Tone> = Urgency::ALL.iter().map(|u| u.style().tone).collect();
        assert_eq!(tones, vec![Tone::Neutral, Tone::Info, Tone::Warning, Tone::Critical]);
        assert_eq!(Urgency::Urgent.style().label, "Urgent");

        let labels: Vec<&str> = Urgency::ALL.iter().map(|u| u.style().label).collect();
        assert_eq!(labels, vec!["Low", "Normal", "High", "Urgent"]);
    }

    #[test]
    fn test_negotiation_url() {
        let payload = NegotiationPayload {
            candidate_id: "dt-1".to_string(),
            service: "dietician".to_string(),
            message: "Lower price?".to_string(),
            urgency: Urgency::High,
        };
        assert_eq!(
            Handoff::negotiation(&payload).url,
            "/services/negotiation?specialist=dt-1&service=dietician&message=Lower%20price%3F&urgency=high"
        );
    }
}
