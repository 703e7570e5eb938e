pub mod api;
pub mod export;
pub mod logging;
pub mod notifier;
pub mod store;
pub mod xlsx;
