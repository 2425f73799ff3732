pub mod context;
pub mod error;
pub mod navigation;
pub mod notification;
