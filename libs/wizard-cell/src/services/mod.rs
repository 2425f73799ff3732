pub mod capture;
pub mod session;
pub mod store;

pub use capture::{submit_free_text, submit_structured, VOICE_FILL_SENTENCE};
pub use session::WizardSession;
pub use store::WizardStore;
