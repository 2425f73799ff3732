pub mod notifier;
pub mod simulated;
pub mod test_utils;
