pub mod catalog;
pub mod generator;
pub mod ranking;
pub mod quote;

pub use catalog::{ProviderCatalog, ServiceKind};
pub use generator::generate_candidates;
pub use ranking::rank;
pub use quote::QuoteService;
