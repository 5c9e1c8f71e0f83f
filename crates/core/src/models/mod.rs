pub mod account;
pub mod allocation;
pub mod analytics;
pub mod chart;
pub mod holding;
pub mod linked_item;
pub mod settings;
pub mod snapshot;
