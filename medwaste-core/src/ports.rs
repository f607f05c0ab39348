//! Trait describing treatment-process capabilities and the shared error type.

use serde_json::Error as JsonError;

use crate::model::{EmissionResult, ProcessKind, ProcessMeta, ScenarioParameters, Unit};
use crate::waste::WasteStream;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while computing emissions.
///
/// All of them are local to one calculation; a batch caller records the
/// failed cell and moves on.
pub enum EngineError {
    /// A factor used by a formula is absent from the process table.
    #[error("Missing required factor `{key}` for {process}")]
    MissingFactor {
        /// Process whose table is incomplete.
        process: ProcessKind,
        /// Absent key.
        key: String,
    },
    /// A factor has the wrong shape, e.g. a table where a number is expected.
    #[error("Factor `{key}` for {process} must be {expected}")]
    InvalidFactor {
        /// Process whose table is malformed.
        process: ProcessKind,
        /// Offending key.
        key: String,
        /// Expected value shape.
        expected: &'static str,
    },
    /// Two quantities could not be converted into each other.
    #[error("Incompatible units: cannot convert {from} to {to}")]
    IncompatibleUnits {
        /// Source unit.
        from: Unit,
        /// Target unit.
        to: Unit,
    },
    /// Waste mass is unusable.
    #[error("Invalid waste mass: {0}")]
    InvalidMass(String),
    /// No process is registered for the requested technology.
    #[error("Unsupported process: {0}")]
    UnsupportedProcess(ProcessKind),
    /// Configuration document could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] JsonError),
}

/// A treatment technology that turns a waste stream into direct emissions.
///
/// Implementations are pure: the result depends only on the waste stream, the
/// scenario, and the process's own immutable factor table.
pub trait TreatmentProcess: Send + Sync {
    /// Metadata describing the technology.
    fn meta(&self) -> &ProcessMeta;

    /// Compute direct emissions for a waste stream.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the factor table lacks a required key
    /// or holds a malformed value.
    fn calculate(
        &self,
        waste: &WasteStream,
        scenario: Option<&ScenarioParameters>,
    ) -> Result<EmissionResult, EngineError>;
}
