use std::sync::Arc;

use medwaste_core::{
    factors::FactorTable,
    model::{EmissionResult, Pollutant, ProcessKind, ProcessMeta, Quantity, ScenarioParameters},
    plugin::ProcessPlugin,
    ports::{EngineError, TreatmentProcess},
    waste::{MaterialGroup, WasteStream, materials},
};

/// NMVOC multiplier for operating above the baseline temperature.
///
/// Grows by `coefficient` per 10 °C above baseline and never drops below 1.
#[must_use]
pub fn temperature_factor(operating_temp: f64, baseline_temp: f64, coefficient: f64) -> f64 {
    (1.0 + (operating_temp - baseline_temp) / 10.0 * coefficient).max(1.0)
}

/// Steam sterilisation: grid electricity plus minor organic off-gassing.
pub struct AutoclaveProcess {
    meta: ProcessMeta,
    factors: FactorTable,
}

impl AutoclaveProcess {
    /// Create the process from its factor table.
    #[must_use]
    pub fn new(factors: FactorTable) -> Self {
        Self {
            meta: ProcessMeta::from(ProcessKind::Autoclave),
            factors,
        }
    }
}

impl TreatmentProcess for AutoclaveProcess {
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

        let nmvoc_factor = temperature_factor(
            factors.required("operating_temp")?,
            factors.required("baseline_temp")?,
            factors.required("nmvoc_temp_coeff")?,
        );
        let energy_co2 =
            mass * factors.required("elec_per_waste")? * factors.required("grid_co2_factor")?;
        let mercury = composition.fraction(MaterialGroup::MetallicMaterials, materials::MERCURY_WASTE);

        Ok([
            (
                Pollutant::Nmvoc,
                organic_mass * factors.required("nmvoc_per_organic")? * nmvoc_factor,
            ),
            (
                Pollutant::Pm10,
                organic_mass * factors.required("pm10_per_organic")?,
            ),
            (
                Pollutant::Pm25,
                organic_mass * factors.required("pm25_per_organic")?,
            ),
            (Pollutant::Co2Fossil, energy_co2),
            (
                Pollutant::Hg,
                mass * mercury * factors.required("hg_leach_factor")?,
            ),
        ]
        .into_iter()
        .map(|(pollutant, kg)| (pollutant, Quantity::kilograms(kg)))
        .collect())
    }
}

/// Build the plugin bundle for autoclave.
#[must_use]
pub fn plugin(factors: FactorTable) -> ProcessPlugin {
    ProcessPlugin::new(Arc::new(AutoclaveProcess::new(factors)))
}

#[cfg(test)]
mod tests {
    use medwaste_core::config::{default_composition, reference_factor_table};

    use super::*;

    fn waste() -> WasteStream {
        WasteStream::new(Quantity::kilograms(100.0), default_composition()).expect("valid mass")
    }

    #[test]
    fn temperature_factor_is_floored_at_one() {
        assert!((temperature_factor(134.0, 121.0, 0.2) - 1.26).abs() < 1e-12);
        assert_eq!(temperature_factor(110.0, 121.0, 0.2), 1.0);
        assert_eq!(temperature_factor(121.0, 121.0, 0.2), 1.0);
    }

    #[test]
    fn reference_emissions() {
        let process = AutoclaveProcess::new(reference_factor_table(ProcessKind::Autoclave));
        let result = process.calculate(&waste(), None).expect("complete table");

        assert_eq!(result.len(), 5);
        assert!((result.magnitude(Pollutant::Co2Fossil) - 24.0).abs() < 1e-9);
        assert!((result.magnitude(Pollutant::Nmvoc) - 39.0 * 1e-5 * 1.26).abs() < 1e-12);
        // particulates ignore temperature
        assert!((result.magnitude(Pollutant::Pm10) - 39.0 * 5e-5).abs() < 1e-12);
        assert!((result.magnitude(Pollutant::Hg) - 100.0 * 0.025 * 0.001).abs() < 1e-12);
    }

    #[test]
    fn cooler_than_baseline_keeps_base_nmvoc() {
        let factors = reference_factor_table(ProcessKind::Autoclave).with("operating_temp", 100.0);
        let result = AutoclaveProcess::new(factors)
            .calculate(&waste(), None)
            .expect("complete table");
        assert!((result.magnitude(Pollutant::Nmvoc) - 39.0 * 1e-5).abs() < 1e-12);
    }
}
