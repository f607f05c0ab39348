use std::{collections::BTreeMap, sync::Arc};

use medwaste_core::{
    factors::FactorTable,
    model::{EmissionResult, Pollutant, ProcessKind, ProcessMeta, Quantity, ScenarioParameters},
    plugin::ProcessPlugin,
    ports::{EngineError, TreatmentProcess},
    waste::{MaterialGroup, WasteStream, materials},
};

/// Pollutants subject to `emission_limits`.
pub const LIMITED_POLLUTANTS: [Pollutant; 3] = [Pollutant::Nmvoc, Pollutant::Pm10, Pollutant::Pm25];

#[derive(Debug, Clone)]
struct Coefficients {
    nmvoc_per_organic: f64,
    pm10_per_organic: f64,
    pm25_per_organic: f64,
    freq_multiplier: f64,
    plastic_nmvoc_boost: f64,
    elec_per_waste: f64,
    grid_co2_factor: f64,
    metal_aerosol_factor: f64,
    /// Per-kg caps, present only when enforcement is on.
    limits: Option<BTreeMap<String, f64>>,
}

impl Coefficients {
    fn resolve(factors: &FactorTable) -> Result<Self, EngineError> {
        let freq_gap = factors.required("base_frequency")? - factors.required("operating_frequency")?;
        let limits = if factors.flag("enforce_emission_limits")? {
            Some(factors.table("emission_limits")?)
        } else {
            None
        };

        Ok(Self {
            nmvoc_per_organic: factors.required("nmvoc_per_organic")?,
            pm10_per_organic: factors.required("pm10_per_organic")?,
            pm25_per_organic: factors.required("pm25_per_organic")?,
            freq_multiplier: 1.0 + freq_gap.max(0.0) * factors.required("freq_impact_per_mhz")?,
            plastic_nmvoc_boost: factors.required("plastic_nmvoc_boost")?,
            elec_per_waste: factors.required("elec_per_waste")?,
            grid_co2_factor: factors.required("grid_co2_factor")?,
            metal_aerosol_factor: factors.required("metal_aerosol_factor")?,
            limits,
        })
    }
}

/// Microwave irradiation.
///
/// Running below the base frequency raises organic emissions; plastics add
/// to NMVOC. With `enforce_emission_limits` set, NMVOC and particulates are
/// clamped to `mass · emission_limits[key]`.
pub struct MicrowaveProcess {
    meta: ProcessMeta,
    factors: FactorTable,
}

impl MicrowaveProcess {
    /// Create the process from its factor table.
    #[must_use]
    pub fn new(factors: FactorTable) -> Self {
        Self {
            meta: ProcessMeta::from(ProcessKind::Microwave),
            factors,
        }
    }
}

impl TreatmentProcess for MicrowaveProcess {
    fn meta(&self) -> &ProcessMeta {
        &self.meta
    }

    fn calculate(
        &self,
        waste: &WasteStream,
        _scenario: Option<&ScenarioParameters>,
    ) -> Result<EmissionResult, EngineError> {
        let coeff = Coefficients::resolve(&self.factors)?;
        let composition = waste.composition();
        let mass = waste.mass_kg();

        let total_organic = composition.group_sum(MaterialGroup::OrganicMaterials);
        let plastic_frac = if total_organic > 0.0 {
            composition.fraction(MaterialGroup::OrganicMaterials, materials::NEEDLES_SHARPS_PLASTIC)
                / total_organic
        } else {
            0.0
        };
        let plastic_boost = 1.0 + plastic_frac * coeff.plastic_nmvoc_boost;
        let organic_mass = mass * total_organic * coeff.freq_multiplier;

        let mut result: EmissionResult = [
            (
                Pollutant::Nmvoc,
                organic_mass * coeff.nmvoc_per_organic * plastic_boost,
            ),
            (Pollutant::Pm10, organic_mass * coeff.pm10_per_organic),
            (Pollutant::Pm25, organic_mass * coeff.pm25_per_organic),
            (
                Pollutant::Co2Fossil,
                mass * coeff.elec_per_waste * coeff.grid_co2_factor,
            ),
            (
                Pollutant::Pb,
                mass * composition.fraction(MaterialGroup::MetallicMaterials, materials::OTHER_HEAVY_METALS)
                    * coeff.metal_aerosol_factor,
            ),
        ]
        .into_iter()
        .map(|(pollutant, kg)| (pollutant, Quantity::kilograms(kg)))
        .collect();

        if let Some(limits) = &coeff.limits {
            for pollutant in LIMITED_POLLUTANTS {
                let Some(limit) = limits.get(pollutant.key()) else {
                    continue;
                };
                let cap = mass * limit;
                let raw = result.magnitude(pollutant);
                if raw > cap {
                    result.insert(pollutant, Quantity::kilograms(cap));
                }
            }
        }

        Ok(result)
    }
}

/// Build the plugin bundle for microwave.
#[must_use]
pub fn plugin(factors: FactorTable) -> ProcessPlugin {
    ProcessPlugin::new(Arc::new(MicrowaveProcess::new(factors)))
}

#[cfg(test)]
mod tests {
    use medwaste_core::{
        config::{default_composition, reference_factor_table},
        waste::Composition,
    };

    use super::*;

    fn waste() -> WasteStream {
        WasteStream::new(Quantity::kilograms(100.0), default_composition()).expect("valid mass")
    }

    fn unenforced() -> FactorTable {
        reference_factor_table(ProcessKind::Microwave).with("enforce_emission_limits", false)
    }

    #[test]
    fn frequency_and_plastic_raise_nmvoc() {
        let result = MicrowaveProcess::new(unenforced())
            .calculate(&waste(), None)
            .expect("complete table");

        let freq_multiplier: f64 = 1.0 + (2450.0 - 915.0) * 0.0002;
        let plastic_boost: f64 = 1.0 + 0.03 / 0.39 * 0.8;
        let expected = 100.0 * 0.39 * 0.002 * freq_multiplier * plastic_boost;
        assert!((freq_multiplier - 1.307).abs() < 1e-12);
        assert!((result.magnitude(Pollutant::Nmvoc) - expected).abs() < 1e-9);
        assert!((result.magnitude(Pollutant::Co2Fossil) - 28.0).abs() < 1e-9);
        assert!((result.magnitude(Pollutant::Pb) - 100.0 * 0.025 * 0.005).abs() < 1e-12);
    }

    #[test]
    fn operating_above_base_frequency_has_no_penalty() {
        let factors = unenforced().with("operating_frequency", 5800.0);
        let result = MicrowaveProcess::new(factors)
            .calculate(&waste(), None)
            .expect("complete table");
        assert!((result.magnitude(Pollutant::Pm10) - 100.0 * 0.39 * 0.0006).abs() < 1e-12);
    }

    #[test]
    fn reference_limits_are_not_binding() {
        let enforced = MicrowaveProcess::new(reference_factor_table(ProcessKind::Microwave))
            .calculate(&waste(), None)
            .expect("complete table");
        let raw = MicrowaveProcess::new(unenforced())
            .calculate(&waste(), None)
            .expect("complete table");
        assert_eq!(enforced, raw);
    }

    #[test]
    fn oversized_factors_are_clamped_to_the_limit() {
        let factors = reference_factor_table(ProcessKind::Microwave)
            .with("nmvoc_per_organic", 1.0)
            .with("pm10_per_organic", 1.0);
        let result = MicrowaveProcess::new(factors)
            .calculate(&waste(), None)
            .expect("complete table");

        assert!((result.magnitude(Pollutant::Nmvoc) - 0.3).abs() < 1e-12);
        assert!((result.magnitude(Pollutant::Pm10) - 0.2).abs() < 1e-12);
        assert!((result.magnitude(Pollutant::Pm25) - 100.0 * 0.39 * 0.0004 * 1.307).abs() < 1e-9);
    }

    #[test]
    fn limits_never_raise_values() {
        let factors = reference_factor_table(ProcessKind::Microwave).with(
            "emission_limits",
            BTreeMap::from([("pm25".to_owned(), 10.0)]),
        );
        let result = MicrowaveProcess::new(factors)
            .calculate(&waste(), None)
            .expect("complete table");
        assert!((result.magnitude(Pollutant::Pm25) - 100.0 * 0.39 * 0.0004 * 1.307).abs() < 1e-9);
    }

    #[test]
    fn limits_leave_co2_and_lead_alone() {
        let factors = reference_factor_table(ProcessKind::Microwave).with(
            "emission_limits",
            BTreeMap::from([("co2_fossil".to_owned(), 0.0), ("pb".to_owned(), 0.0)]),
        );
        let result = MicrowaveProcess::new(factors)
            .calculate(&waste(), None)
            .expect("complete table");
        assert!(result.magnitude(Pollutant::Co2Fossil) > 0.0);
        assert!(result.magnitude(Pollutant::Pb) > 0.0);
    }

    #[test]
    fn no_organics_means_no_plastic_boost() {
        let composition = Composition::new().with_fraction(
            MaterialGroup::MetallicMaterials,
            materials::OTHER_HEAVY_METALS,
            1.0,
        );
        let waste = WasteStream::new(Quantity::kilograms(50.0), composition).expect("valid mass");
        let result = MicrowaveProcess::new(unenforced())
            .calculate(&waste, None)
            .expect("complete table");

        for (pollutant, quantity) in &result {
            assert!(quantity.magnitude.is_finite(), "{pollutant} is not finite");
        }
        assert_eq!(result.magnitude(Pollutant::Nmvoc), 0.0);
    }
}
