//! Non-burn treatment processes: chemical disinfection, autoclave, and microwave.

/// Steam sterilisation.
pub mod autoclave;
/// Chlorine-based chemical disinfection.
pub mod chemical;
/// Microwave irradiation with optional emission limits.
pub mod microwave;

pub use autoclave::AutoclaveProcess;
pub use chemical::ChemicalDisinfectionProcess;
pub use microwave::MicrowaveProcess;
