use std::sync::Arc;

use medwaste_core::{
    factors::FactorTable,
    model::{EmissionResult, Pollutant, ProcessKind, ProcessMeta, Quantity, ScenarioParameters},
    plugin::ProcessPlugin,
    ports::{EngineError, TreatmentProcess},
    waste::{MaterialGroup, WasteStream, materials},
};

/// kg CO2 per kg C.
const CO2_PER_CARBON: f64 = 44.0 / 12.0;
/// kg SO2 per kg S.
const SO2_PER_SULFUR: f64 = 64.0 / 32.0;
/// Below this combustion efficiency particulate output is penalised.
const COMBUSTION_EFFICIENCY_THRESHOLD: f64 = 0.95;

/// Working coefficients for one calculation, after scenario adjustment.
#[derive(Debug, Clone, Copy)]
struct Coefficients {
    carbon_content_fossil: f64,
    carbon_content_biogenic: f64,
    so2_conversion: f64,
    pm10_per_organic: f64,
    pm25_per_organic: f64,
    nox_per_waste: f64,
    hg_volatilization: f64,
    pb_volatilization: f64,
    combustion_efficiency: f64,
}

impl Coefficients {
    fn resolve(
        factors: &FactorTable,
        scenario: Option<&ScenarioParameters>,
    ) -> Result<Self, EngineError> {
        // Flue-gas cleaning removes particulates and NOx before release.
        let passthrough = scenario
            .and_then(|scenario| scenario.incineration_flue_gas_efficiency)
            .map_or(1.0, |efficiency| 1.0 - efficiency);

        Ok(Self {
            carbon_content_fossil: factors.required("carbon_content_fossil")?,
            carbon_content_biogenic: factors.required("carbon_content_biogenic")?,
            so2_conversion: factors.required("so2_conversion")?,
            pm10_per_organic: factors.required("pm10_per_organic")? * passthrough,
            pm25_per_organic: factors.required("pm25_per_organic")? * passthrough,
            nox_per_waste: factors.required("nox_per_waste")? * passthrough,
            hg_volatilization: factors.required("hg_volatilization")?,
            pb_volatilization: factors.required("pb_volatilization")?,
            combustion_efficiency: factors.optional_or("combustion_efficiency", 1.0)?,
        })
    }

    fn particulate_penalty(&self) -> f64 {
        if self.combustion_efficiency < COMBUSTION_EFFICIENCY_THRESHOLD {
            1.0 + 2.0 * (COMBUSTION_EFFICIENCY_THRESHOLD - self.combustion_efficiency)
        } else {
            1.0
        }
    }
}

/// Incineration of the organic fraction with stoichiometric CO2 and SO2.
///
/// Needles/sharps plastic counts as fossil carbon; the rest of the organic
/// group is biogenic.
pub struct IncinerationProcess {
    meta: ProcessMeta,
    factors: FactorTable,
}

impl IncinerationProcess {
    /// Create the process from its factor table.
    #[must_use]
    pub fn new(factors: FactorTable) -> Self {
        Self {
            meta: ProcessMeta::from(ProcessKind::Incineration),
            factors,
        }
    }
}

impl TreatmentProcess for IncinerationProcess {
    fn meta(&self) -> &ProcessMeta {
        &self.meta
    }

    fn calculate(
        &self,
        waste: &WasteStream,
        scenario: Option<&ScenarioParameters>,
    ) -> Result<EmissionResult, EngineError> {
        let coeff = Coefficients::resolve(&self.factors, scenario)?;
        let composition = waste.composition();
        let mass = waste.mass_kg();

        let total_organic = composition.group_sum(MaterialGroup::OrganicMaterials);
        let fossil_organic =
            composition.fraction(MaterialGroup::OrganicMaterials, materials::NEEDLES_SHARPS_PLASTIC);
        let biogenic_organic = total_organic - fossil_organic;
        let mercury = composition.fraction(MaterialGroup::MetallicMaterials, materials::MERCURY_WASTE);
        let heavy_metals =
            composition.fraction(MaterialGroup::MetallicMaterials, materials::OTHER_HEAVY_METALS);

        let penalty = coeff.particulate_penalty();

        Ok([
            (
                Pollutant::Co2Fossil,
                fossil_organic * mass * coeff.carbon_content_fossil * CO2_PER_CARBON,
            ),
            (
                Pollutant::Co2Biogenic,
                biogenic_organic * mass * coeff.carbon_content_biogenic * CO2_PER_CARBON,
            ),
            (
                Pollutant::So2,
                total_organic * mass * coeff.so2_conversion * SO2_PER_SULFUR,
            ),
            (Pollutant::Nox, mass * coeff.nox_per_waste),
            (
                Pollutant::Pm10,
                mass * total_organic * coeff.pm10_per_organic * penalty,
            ),
            (
                Pollutant::Pm25,
                mass * total_organic * coeff.pm25_per_organic * penalty,
            ),
            (Pollutant::Hg, mass * mercury * coeff.hg_volatilization),
            (Pollutant::Pb, mass * heavy_metals * coeff.pb_volatilization),
        ]
        .into_iter()
        .map(|(pollutant, kg)| (pollutant, Quantity::kilograms(kg)))
        .collect())
    }
}

/// Build the plugin bundle for incineration.
#[must_use]
pub fn plugin(factors: FactorTable) -> ProcessPlugin {
    ProcessPlugin::new(Arc::new(IncinerationProcess::new(factors)))
}
