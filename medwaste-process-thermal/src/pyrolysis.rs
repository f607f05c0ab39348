use std::sync::Arc;

use medwaste_core::{
    factors::FactorTable,
    model::{EmissionResult, Pollutant, ProcessKind, ProcessMeta, Quantity, ScenarioParameters},
    plugin::ProcessPlugin,
    ports::{EngineError, TreatmentProcess},
    waste::{MaterialGroup, WasteStream, materials},
};

/// Pyrolysis of organic and chlorinated fractions. No scenario parameter
/// changes its coefficients.
pub struct PyrolysisProcess {
    meta: ProcessMeta,
    factors: FactorTable,
}

impl PyrolysisProcess {
    /// Create the process from its factor table.
    #[must_use]
    pub fn new(factors: FactorTable) -> Self {
        Self {
            meta: ProcessMeta::from(ProcessKind::Pyrolysis),
            factors,
        }
    }
}

impl TreatmentProcess for PyrolysisProcess {
    fn meta(&self) -> &ProcessMeta {
        &self.meta
    }

    fn calculate(
        &self,
        waste: &WasteStream,
        _scenario: Option<&ScenarioParameters>,
    ) -> Result<EmissionResult, EngineError> {
        let factors = &self.factors;
        let composition = waste.composition();
        let mass = waste.mass_kg();

        let organic_mass = mass * composition.group_sum(MaterialGroup::OrganicMaterials);
        let chlorinated_mass = mass * composition.group_sum(MaterialGroup::ChlorinatedMaterials);
        let mercury = composition.fraction(MaterialGroup::MetallicMaterials, materials::MERCURY_WASTE);
        let heavy_metals =
            composition.fraction(MaterialGroup::MetallicMaterials, materials::OTHER_HEAVY_METALS);

        Ok([
            (
                Pollutant::Co2Fossil,
                organic_mass * factors.required("co2_fossil_per_organic")?,
            ),
            (
                Pollutant::Ch4Fossil,
                organic_mass * factors.required("ch4_fossil_per_organic")?,
            ),
            (
                Pollutant::Nmvoc,
                organic_mass * factors.required("nmvoc_per_organic")?,
            ),
            (
                Pollutant::Pahs,
                organic_mass * factors.required("pahs_per_organic")?,
            ),
            (
                Pollutant::Dioxin,
                chlorinated_mass * factors.required("dioxin_per_chlorinated")?,
            ),
            (
                Pollutant::Hg,
                mass * mercury * factors.required("hg_per_mercury")?,
            ),
            (
                Pollutant::Pb,
                mass * heavy_metals * factors.required("pb_per_heavy_metal")?,
            ),
        ]
        .into_iter()
        .map(|(pollutant, kg)| (pollutant, Quantity::kilograms(kg)))
        .collect())
    }
}

/// Build the plugin bundle for pyrolysis.
#[must_use]
pub fn plugin(factors: FactorTable) -> ProcessPlugin {
    ProcessPlugin::new(Arc::new(PyrolysisProcess::new(factors)))
}
