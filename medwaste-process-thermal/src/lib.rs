//! Thermal treatment processes: incineration and pyrolysis.

/// Combustion with optional flue-gas cleaning.
pub mod incineration;
/// Thermal decomposition in the absence of oxygen.
pub mod pyrolysis;

pub use incineration::IncinerationProcess;
pub use pyrolysis::PyrolysisProcess;
