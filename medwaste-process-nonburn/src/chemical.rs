use std::sync::Arc;

use medwaste_core::{
    factors::FactorTable,
    model::{EmissionResult, Pollutant, ProcessKind, ProcessMeta, Quantity, ScenarioParameters},
    plugin::ProcessPlugin,
    ports::{EngineError, TreatmentProcess},
    waste::{MaterialGroup, WasteStream},
};

/// Chemical disinfection of the organic fraction.
///
/// The scenario's `chemical_disinfection_fraction` sets how much of the
/// organic mass is treated; without a scenario all of it is.
pub struct ChemicalDisinfectionProcess {
    meta: ProcessMeta,
    factors: FactorTable,
}

impl ChemicalDisinfectionProcess {
    /// Create the process from its factor table.
    #[must_use]
    pub fn new(factors: FactorTable) -> Self {
        Self {
            meta: ProcessMeta::from(ProcessKind::ChemicalDisinfection),
            factors,
        }
    }
}

impl TreatmentProcess for ChemicalDisinfectionProcess {
    fn meta(&self) -> &ProcessMeta {
        &self.meta
    }

    fn calculate(
        &self,
        waste: &WasteStream,
        scenario: Option<&ScenarioParameters>,
    ) -> Result<EmissionResult, EngineError> {
        let factors = &self.factors;
        let chem_fraction = scenario
            .and_then(|scenario| scenario.chemical_disinfection_fraction)
            .unwrap_or(1.0);

        let treatable_organic = waste.composition().group_sum(MaterialGroup::OrganicMaterials)
            * waste.mass_kg()
            * chem_fraction;

        let disinfectant_used = treatable_organic * factors.required("disinfectant_ratio")?;
        let chlorine_air = disinfectant_used
            * factors.required("chlorine_loss")?
            * (1.0 - factors.required("chlorine_to_hcl_split")?);
        let nitrogen = treatable_organic * factors.required("nitrogen_content")?;
        let nh3 = nitrogen * factors.required("nitrogen_to_nh3")?;

        Ok([
            (Pollutant::ChlorineAir, chlorine_air),
            (
                Pollutant::Nmvoc,
                treatable_organic * factors.required("nmvoc_per_organic")?,
            ),
            (Pollutant::Nh3, nh3),
            (
                Pollutant::Pm10,
                treatable_organic * factors.required("pm10_per_organic")?,
            ),
        ]
        .into_iter()
        .map(|(pollutant, kg)| (pollutant, Quantity::kilograms(kg)))
        .collect())
    }
}

/// Build the plugin bundle for chemical disinfection.
#[must_use]
pub fn plugin(factors: FactorTable) -> ProcessPlugin {
    ProcessPlugin::new(Arc::new(ChemicalDisinfectionProcess::new(factors)))
}
