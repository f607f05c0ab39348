//! High-level service facade combining process plugins and indirect factors.

use std::sync::Arc;

use serde::Serialize;

use crate::config::RunConfig;
use crate::indirect::IndirectEmissionsCalculator;
use crate::model::{EmissionResult, Facility, ProcessKind, ProcessMeta, ScenarioParameters};
use crate::plugin::ProcessRegistry;
use crate::ports::EngineError;
use crate::waste::{Composition, WasteStream};

#[derive(Debug, Clone)]
/// One (scenario, facility, process) combination of a batch.
pub struct Cell {
    /// Scenario applied to the cell.
    pub scenario: ScenarioParameters,
    /// Facility producing the waste.
    pub facility: Facility,
    /// Treatment technology.
    pub process: ProcessKind,
}

#[derive(Debug, Clone, Serialize)]
/// Result of evaluating one cell.
pub struct CellOutcome {
    /// Scenario name.
    pub scenario: String,
    /// Facility name.
    pub facility: String,
    /// Treatment technology.
    pub process: ProcessKind,
    /// Merged direct and indirect emissions, absent when the cell failed.
    pub emissions: Option<EmissionResult>,
    /// Error text for a failed cell.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// All cell outcomes of a batch, in plan order.
pub struct BatchReport {
    /// Evaluated cells.
    pub cells: Vec<CellOutcome>,
}

impl BatchReport {
    /// Cells that produced emissions.
    pub fn succeeded(&self) -> impl Iterator<Item = &CellOutcome> {
        self.cells.iter().filter(|cell| cell.emissions.is_some())
    }

    /// Number of failed cells.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.cells.iter().filter(|cell| cell.error.is_some()).count()
    }
}

/// Public entry point for emission calculations.
pub struct EmissionService {
    registry: Arc<ProcessRegistry>,
}

impl EmissionService {
    /// Create a new service bound to the provided registry.
    #[must_use]
    pub fn new(registry: Arc<ProcessRegistry>) -> Self {
        Self { registry }
    }

    /// List all registered processes.
    #[must_use]
    pub fn processes(&self) -> Vec<ProcessMeta> {
        self.registry.processes()
    }

    /// Direct emissions of one process for a waste stream.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the process is not registered or its
    /// factor table is incomplete.
    pub fn direct_emissions(
        &self,
        kind: ProcessKind,
        waste: &WasteStream,
        scenario: Option<&ScenarioParameters>,
    ) -> Result<EmissionResult, EngineError> {
        let plugin = self.registry.plugin(kind)?;
        plugin.process.calculate(waste, scenario)
    }

    /// Direct plus indirect emissions for a facility under a scenario.
    ///
    /// The facility's waste starts from `composition`, is adjusted by the
    /// scenario's segregation efficiency when one is set, and receives the
    /// facility's indirect emissions when it has indirect factors.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the waste mass is invalid, the process is
    /// not registered, or its factor table is incomplete.
    pub fn evaluate(
        &self,
        facility: &Facility,
        composition: &Composition,
        scenario: &ScenarioParameters,
        kind: ProcessKind,
    ) -> Result<EmissionResult, EngineError> {
        let waste = WasteStream::new(facility.waste_mass, composition.clone())?;
        let waste = match scenario.segregation_efficiency {
            Some(efficiency) => waste.adjust_for_segregation(efficiency),
            None => waste,
        };

        let mut emissions = self.direct_emissions(kind, &waste, Some(scenario))?;
        if let Some(factors) = facility.indirect {
            let indirect = IndirectEmissionsCalculator::new(factors).calculate(&waste);
            emissions.merge(&indirect)?;
        }
        Ok(emissions)
    }

    /// Every cell of a batch: scenarios × facilities × registered processes.
    #[must_use]
    pub fn plan(&self, config: &RunConfig) -> Vec<Cell> {
        let mut cells = Vec::new();
        for scenario in &config.scenarios {
            for facility in &config.facilities {
                for process in self.registry.kinds() {
                    cells.push(Cell {
                        scenario: scenario.clone(),
                        facility: facility.clone(),
                        process,
                    });
                }
            }
        }
        cells
    }

    /// Evaluate one cell, recording a failure instead of returning it.
    #[must_use]
    pub fn evaluate_cell(&self, cell: &Cell, composition: &Composition) -> CellOutcome {
        let result = self.evaluate(&cell.facility, composition, &cell.scenario, cell.process);
        let (emissions, error) = match result {
            Ok(emissions) => {
                tracing::debug!(
                    scenario = %cell.scenario.name,
                    facility = %cell.facility.name,
                    process = %cell.process,
                    pollutants = emissions.len(),
                    "cell evaluated"
                );
                (Some(emissions), None)
            }
            Err(err) => {
                tracing::warn!(
                    scenario = %cell.scenario.name,
                    facility = %cell.facility.name,
                    process = %cell.process,
                    "cell failed: {err}"
                );
                (None, Some(err.to_string()))
            }
        };
        CellOutcome {
            scenario: cell.scenario.name.clone(),
            facility: cell.facility.name.clone(),
            process: cell.process,
            emissions,
            error,
        }
    }

    /// Evaluate the whole plan sequentially, one span per scenario.
    #[must_use]
    pub fn run_batch(&self, config: &RunConfig) -> BatchReport {
        let cells = self.plan(config);
        let mut report = BatchReport::default();
        for group in cells.chunk_by(|left, right| left.scenario.name == right.scenario.name) {
            let Some(first) = group.first() else {
                continue;
            };
            let _span = tracing::info_span!("scenario", name = %first.scenario.name).entered();
            tracing::info!("{}", first.scenario.description);
            report
                .cells
                .extend(group.iter().map(|cell| self.evaluate_cell(cell, &config.composition)));
        }
        report
    }
}
