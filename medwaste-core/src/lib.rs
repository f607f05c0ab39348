//! Core types and service wiring for the medical waste emission engine.

/// Reference data set and run configuration.
pub mod config;
/// Emission factor tables.
pub mod factors;
/// Supporting-activity emissions.
pub mod indirect;
/// Inventory exchanges and impact normalization.
pub mod inventory;
/// Domain models shared by all processes.
pub mod model;
/// Registry for plugging treatment processes into the service.
pub mod plugin;
/// Traits describing the process interface.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;
/// Waste composition and waste streams.
pub mod waste;

pub use config::*;
pub use factors::*;
pub use indirect::*;
pub use inventory::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use service::*;
pub use waste::*;
