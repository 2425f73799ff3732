use thiserror::Error;
use uuid::Uuid;

use provider_cell::ProviderError;
use shared_models::error::AppError;

use crate::models::WizardStage;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Required field is empty: {0}")]
    MissingField(&'static str),

    #[error("Invalid value {value:?} for {field}")]
    InvalidField { field: &'static str, value: String },

    #[error("Request text is empty")]
    EmptyText,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Wizard not found: {0}")]
    NotFound(Uuid),

    #[error("Cannot {action} while in {from:?}")]
    InvalidTransition { from: WizardStage, action: &'static str },

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Negotiation is not offered by {0}")]
    NegotiationDisabled(String),

    #[error("Negotiation message is empty")]
    EmptyMessage,
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::NotFound(_) => AppError::NotFound(err.to_string()),
            WizardError::InvalidTransition { .. } | WizardError::NegotiationDisabled(_) => {
                AppError::Conflict(err.to_string())
            }
            WizardError::Capture(_) | WizardError::EmptyMessage => AppError::ValidationError(err.to_string()),
            WizardError::Provider(inner) => inner.into(),
        }
    }
}
