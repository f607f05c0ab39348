//! Indirect emissions from energy, transport, infrastructure, and residues.

use serde::{Deserialize, Serialize};

use crate::model::{EmissionResult, Pollutant, Quantity};
use crate::waste::WasteStream;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Electricity consumed by treatment and its grid emission factors.
pub struct EnergyInputs {
    /// kWh per kg of waste.
    #[serde(rename = "energy_use_kWh_per_kg")]
    pub energy_use_kwh_per_kg: f64,
    /// kg CO2 (fossil) per kWh.
    #[serde(rename = "co2_fossil_per_kWh")]
    pub co2_fossil_per_kwh: f64,
    /// kg SO2 per kWh.
    #[serde(rename = "so2_per_kWh")]
    pub so2_per_kwh: f64,
    /// kg PM2.5 per kWh.
    #[serde(rename = "pm25_per_kWh")]
    pub pm25_per_kwh: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Haulage from the facility to the treatment site.
pub struct Transportation {
    /// One-way distance in km.
    pub distance_km: f64,
    /// kg CO2 (fossil) per tonne-km.
    pub co2_fossil_per_tkm: f64,
    /// kg NOx per tonne-km.
    pub nox_per_tkm: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Construction burden allocated per kg treated.
pub struct Infrastructure {
    /// kg CO2 (fossil) per kg of waste.
    pub construction_co2_per_kg: f64,
    /// m2·a of land per kg of waste.
    pub land_use_factor: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Disposal of treatment residues.
pub struct Downstream {
    /// kg residue per kg of waste.
    pub residue_ratio: f64,
    /// kg CO2 (fossil) per kg residue.
    pub residue_co2_per_kg: f64,
    /// kg SO2 per kg residue.
    pub residue_so2_per_kg: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Facility-specific indirect factor set. Missing sections or keys are zero.
pub struct IndirectFactors {
    /// Energy section.
    pub energy_inputs: EnergyInputs,
    /// Transport section.
    pub transportation: Transportation,
    /// Infrastructure section.
    pub infrastructure: Infrastructure,
    /// Residue section.
    pub downstream: Downstream,
}

/// Stateless calculator for supporting-activity emissions.
#[derive(Debug, Clone, Copy)]
pub struct IndirectEmissionsCalculator {
    factors: IndirectFactors,
}

impl IndirectEmissionsCalculator {
    /// Create a calculator bound to a facility's factors.
    #[must_use]
    pub fn new(factors: IndirectFactors) -> Self {
        Self { factors }
    }

    /// Compute indirect emissions for a waste stream.
    #[must_use]
    pub fn calculate(&self, waste: &WasteStream) -> EmissionResult {
        let IndirectFactors {
            energy_inputs: energy,
            transportation: transport,
            infrastructure: infra,
            downstream,
        } = self.factors;
        let mass = waste.mass_kg();

        let energy_use = mass * energy.energy_use_kwh_per_kg;
        let mut co2_fossil = energy_use * energy.co2_fossil_per_kwh;
        let mut so2 = energy_use * energy.so2_per_kwh;
        let pm25 = energy_use * energy.pm25_per_kwh;

        let tkm = mass / 1000.0 * transport.distance_km;
        co2_fossil += tkm * transport.co2_fossil_per_tkm;
        let nox = tkm * transport.nox_per_tkm;

        co2_fossil += mass * infra.construction_co2_per_kg;
        let land_occupation = mass * infra.land_use_factor;

        let residue_mass = mass * downstream.residue_ratio;
        co2_fossil += residue_mass * downstream.residue_co2_per_kg;
        so2 += residue_mass * downstream.residue_so2_per_kg;

        [
            (Pollutant::Co2Fossil, Quantity::kilograms(co2_fossil)),
            (Pollutant::So2, Quantity::kilograms(so2)),
            (Pollutant::Pm25, Quantity::kilograms(pm25)),
            (Pollutant::Nox, Quantity::kilograms(nox)),
            (
                Pollutant::LandOccupation,
                Quantity::square_meter_years(land_occupation),
            ),
        ]
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Unit;
    use crate::waste::Composition;

    fn waste(mass_kg: f64) -> WasteStream {
        WasteStream::new(Quantity::kilograms(mass_kg), Composition::new()).expect("valid mass")
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    fn kbth() -> IndirectFactors {
        IndirectFactors {
            energy_inputs: EnergyInputs {
                energy_use_kwh_per_kg: 0.12,
                co2_fossil_per_kwh: 0.50,
                so2_per_kwh: 0.000_25,
                pm25_per_kwh: 0.000_12,
            },
            transportation: Transportation {
                distance_km: 0.5,
                co2_fossil_per_tkm: 0.09,
                nox_per_tkm: 0.0012,
            },
            infrastructure: Infrastructure {
                construction_co2_per_kg: 0.02,
                land_use_factor: 0.001,
            },
            downstream: Downstream {
                residue_ratio: 0.06 * 0.44,
                residue_co2_per_kg: 0.20,
                residue_so2_per_kg: 0.001,
            },
        }
    }

    #[test]
    fn sums_all_four_sections() {
        let result = IndirectEmissionsCalculator::new(kbth()).calculate(&waste(100.0));

        // 12 kWh, 0.05 tkm, 2.64 kg residue
        assert_close(result.magnitude(Pollutant::Co2Fossil), 6.0 + 0.0045 + 2.0 + 0.528);
        assert_close(result.magnitude(Pollutant::So2), 0.003 + 0.002_64);
        assert_close(result.magnitude(Pollutant::Pm25), 0.001_44);
        assert_close(result.magnitude(Pollutant::Nox), 0.000_06);
        assert_close(result.magnitude(Pollutant::LandOccupation), 0.1);
    }

    #[test]
    fn land_occupation_is_area_time() {
        let result = IndirectEmissionsCalculator::new(kbth()).calculate(&waste(10.0));
        let land = result.get(Pollutant::LandOccupation).expect("present");
        assert_eq!(land.unit, Unit::SquareMeterYear);
    }

    #[test]
    fn zero_factors_give_zero_emissions() {
        let result = IndirectEmissionsCalculator::new(IndirectFactors::default()).calculate(&waste(500.0));
        assert_eq!(result.len(), 5);
        for (_, quantity) in &result {
            assert_eq!(quantity.magnitude, 0.0);
        }
    }

    #[test]
    fn sparse_sections_deserialize_as_zero() {
        let factors: IndirectFactors = serde_json::from_str(
            r#"{"energy_inputs": {"energy_use_kWh_per_kg": 0.2, "co2_fossil_per_kWh": 0.5}}"#,
        )
        .expect("deserialize");
        assert_eq!(factors.transportation, Transportation::default());

        let result = IndirectEmissionsCalculator::new(factors).calculate(&waste(10.0));
        assert_close(result.magnitude(Pollutant::Co2Fossil), 1.0);
        assert_eq!(result.magnitude(Pollutant::Nox), 0.0);
    }
}
