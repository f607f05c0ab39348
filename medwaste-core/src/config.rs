//! Reference data set and the JSON run configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::factors::{FactorTable, FactorValue};
use crate::indirect::{Downstream, EnergyInputs, IndirectFactors, Infrastructure, Transportation};
use crate::model::{Facility, ProcessKind, Quantity, ScenarioParameters};
use crate::ports::EngineError;
use crate::waste::{Composition, MaterialGroup, materials};

/// Default medical-waste composition template.
///
/// Every call returns a fresh copy, so adjustments never reach the template.
#[must_use]
pub fn default_composition() -> Composition {
    use MaterialGroup::{ChlorinatedMaterials, MetallicMaterials, OrganicMaterials, RadioactiveMaterials};

    Composition::new()
        .with_fraction(OrganicMaterials, materials::NEEDLES_SHARPS_PLASTIC, 0.03)
        .with_fraction(OrganicMaterials, materials::BODY_FLUIDS, 0.135)
        .with_fraction(OrganicMaterials, materials::LAB_CULTURES, 0.095)
        .with_fraction(OrganicMaterials, materials::PHARMACEUTICALS, 0.09)
        .with_fraction(OrganicMaterials, materials::CYTOTOXIC_ORGANIC, 0.04)
        .with_fraction(ChlorinatedMaterials, materials::LAB_REAGENTS, 0.075)
        .with_fraction(ChlorinatedMaterials, materials::LAB_CULTURES_DISINFECTANTS, 0.005)
        .with_fraction(ChlorinatedMaterials, materials::PHARMACEUTICALS_HALOGENATED, 0.01)
        .with_fraction(ChlorinatedMaterials, materials::CYTOTOXIC_HALOGENATED, 0.01)
        .with_fraction(MetallicMaterials, materials::NEEDLES_SHARPS_METAL, 0.27)
        .with_fraction(MetallicMaterials, materials::BODY_FLUIDS_METALS, 0.015)
        .with_fraction(MetallicMaterials, materials::GAS_CYLINDERS, 0.0475)
        .with_fraction(MetallicMaterials, materials::MERCURY_WASTE, 0.025)
        .with_fraction(MetallicMaterials, materials::OTHER_HEAVY_METALS, 0.025)
        .with_fraction(RadioactiveMaterials, materials::RADIOACTIVE_METALS, 0.045)
        .with_fraction(RadioactiveMaterials, materials::RADIOACTIVE_ORGANIC, 0.005)
}

/// Reference emission factors for a process.
#[must_use]
pub fn reference_factor_table(kind: ProcessKind) -> FactorTable {
    let table = FactorTable::new(kind);
    match kind {
        ProcessKind::Incineration => table
            .with("carbon_content_fossil", 0.87)
            .with("carbon_content_biogenic", 0.47)
            .with("nitrogen_frac_organic", 0.025)
            .with("sulfur_frac_organic", 0.006)
            .with("so2_conversion", 0.85)
            .with("pm10_per_organic", 0.04)
            .with("pm25_per_organic", 0.03)
            .with("nox_per_waste", 0.08)
            .with("hg_volatilization", 0.90)
            .with("pb_volatilization", 0.35)
            .with("combustion_efficiency", 0.97)
            .with("excess_air_ratio", 1.4),
        ProcessKind::Landfill => table
            .with("time_period", 100.0)
            .with("fast_decay_rate", 0.18)
            .with("slow_decay_rate", 0.02)
            .with("ch4_split", 0.50)
            .with("co2_split", 0.50)
            .with("nh3_split", 0.01)
            .with("nmvoc_split", 0.02)
            .with("hg_factor", 0.8)
            .with("pb_factor", 0.5),
        ProcessKind::Pyrolysis => table
            .with("co2_fossil_per_organic", 0.75)
            .with("ch4_fossil_per_organic", 0.06)
            .with("nmvoc_per_organic", 0.03)
            .with("pahs_per_organic", 0.001)
            .with("dioxin_per_chlorinated", 1e-14)
            .with("hg_per_mercury", 0.7)
            .with("pb_per_heavy_metal", 0.3),
        ProcessKind::ChemicalDisinfection => table
            .with("disinfectant_ratio", 0.1)
            .with("chlorine_loss", 0.05)
            .with("chlorine_to_hcl_split", 0.6)
            .with("nitrogen_content", 0.03)
            .with("nitrogen_to_nh3", 0.2)
            .with("nmvoc_per_organic", 1e-15)
            .with("pm10_per_organic", 2e-7),
        ProcessKind::Autoclave => table
            .with("nmvoc_per_organic", 1e-5)
            .with("pm10_per_organic", 5e-5)
            .with("pm25_per_organic", 3e-5)
            .with("elec_per_waste", 0.6)
            .with("grid_co2_factor", 0.4)
            .with("baseline_temp", 121.0)
            .with("operating_temp", 134.0)
            .with("nmvoc_temp_coeff", 0.2)
            .with("hg_leach_factor", 0.001),
        ProcessKind::Microwave => table
            .with("nmvoc_per_organic", 0.002)
            .with("pm10_per_organic", 0.0006)
            .with("pm25_per_organic", 0.0004)
            .with("base_frequency", 2450.0)
            .with("operating_frequency", 915.0)
            .with("freq_impact_per_mhz", 0.0002)
            .with("plastic_nmvoc_boost", 0.8)
            .with("elec_per_waste", 0.7)
            .with("grid_co2_factor", 0.4)
            .with("metal_aerosol_factor", 0.005)
            .with(
                "emission_limits",
                BTreeMap::from([
                    ("nmvoc".to_owned(), 0.003),
                    ("pm10".to_owned(), 0.002),
                    ("pm25".to_owned(), 0.001),
                ]),
            )
            .with("enforce_emission_limits", true),
    }
}

// (energy kWh/kg, co2/kWh, so2/kWh, pm25/kWh, km, co2/tkm, nox/tkm,
//  construction co2/kg, land m2a/kg, residue ratio, residue co2/kg, residue so2/kg)
type IndirectRow = (f64, f64, f64, f64, f64, f64, f64, f64, f64, f64, f64, f64);

fn indirect(row: IndirectRow) -> IndirectFactors {
    let (energy, co2_kwh, so2_kwh, pm25_kwh, km, co2_tkm, nox_tkm, build_co2, land, residue, residue_co2, residue_so2) =
        row;
    IndirectFactors {
        energy_inputs: EnergyInputs {
            energy_use_kwh_per_kg: energy,
            co2_fossil_per_kwh: co2_kwh,
            so2_per_kwh: so2_kwh,
            pm25_per_kwh: pm25_kwh,
        },
        transportation: Transportation {
            distance_km: km,
            co2_fossil_per_tkm: co2_tkm,
            nox_per_tkm: nox_tkm,
        },
        infrastructure: Infrastructure {
            construction_co2_per_kg: build_co2,
            land_use_factor: land,
        },
        downstream: Downstream {
            residue_ratio: residue,
            residue_co2_per_kg: residue_co2,
            residue_so2_per_kg: residue_so2,
        },
    }
}

/// Reference facilities with their annual waste mass and indirect factors.
#[must_use]
pub fn reference_facilities() -> Vec<Facility> {
    let rows: [(&str, f64, IndirectRow); 5] = [
        (
            "KBTH",
            2174.0,
            (0.12, 0.50, 0.000_25, 0.000_12, 0.5, 0.09, 0.0012, 0.02, 0.001, 0.06 * 0.44, 0.20, 0.001),
        ),
        (
            "KATH",
            1535.0,
            (0.15, 0.50, 0.000_20, 0.000_15, 9.0, 0.08, 0.0010, 0.025, 0.0012, 0.06 * 0.310, 0.22, 0.001),
        ),
        (
            "CCTH",
            600.0,
            (0.13, 0.48, 0.000_18, 0.000_10, 9.2, 0.07, 0.0009, 0.03, 0.0015, 0.06 * 0.122, 0.18, 0.0011),
        ),
        (
            "BRH",
            495.0,
            (0.14, 0.52, 0.000_20, 0.000_12, 1.4, 0.08, 0.0010, 0.022, 0.0010, 0.06 * 0.100, 0.21, 0.0010),
        ),
        (
            "UCCH",
            113.0,
            (0.13, 0.49, 0.000_22, 0.000_11, 4.7, 0.08, 0.0012, 0.018, 0.0009, 0.06 * 0.023, 0.21, 0.000_95),
        ),
    ];

    rows.into_iter()
        .map(|(name, mass, row)| Facility {
            name: name.to_owned(),
            waste_mass: Quantity::kilograms(mass),
            indirect: Some(indirect(row)),
        })
        .collect()
}

/// The six standard policy scenarios.
#[must_use]
pub fn standard_scenarios() -> Vec<ScenarioParameters> {
    let rows: [(&str, &str, f64, f64, bool, f64); 6] = [
        (
            "BASELINE",
            "Current practice: moderate segregation, older incineration, minimal enforcement.",
            0.5,
            0.0,
            false,
            0.5,
        ),
        (
            "ENHANCED_INCINERATION",
            "Better segregation, partial flue-gas cleaning, moderate compliance.",
            0.8,
            0.5,
            false,
            0.2,
        ),
        (
            "COMPREHENSIVE_ALTS",
            "High segregation, autoclave and chemical disinfection mix, improved compliance.",
            0.9,
            0.7,
            true,
            0.1,
        ),
        (
            "HIGH_TECH",
            "Advanced incinerator controls, near-optimal segregation, strict enforcement.",
            0.95,
            0.9,
            true,
            0.05,
        ),
        (
            "POLICY_NETZERO",
            "Circular economy, material and energy recovery, near-optimal segregation.",
            0.95,
            0.95,
            true,
            0.05,
        ),
        (
            "CATASTROPHIC",
            "Very poor segregation, uncontrolled burning, minimal regulation.",
            0.2,
            0.0,
            false,
            0.8,
        ),
    ];

    rows.into_iter()
        .map(|(name, description, segregation, flue_gas, best_practices, chemical)| {
            ScenarioParameters::new(name)
                .with_description(description)
                .with_segregation_efficiency(segregation)
                .with_flue_gas_efficiency(flue_gas)
                .with_landfill_best_practices(best_practices)
                .with_chemical_disinfection_fraction(chemical)
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Everything a batch run needs: template, facilities, scenarios, factors.
pub struct RunConfig {
    /// Composition template every facility's waste starts from.
    #[serde(default = "default_composition")]
    pub composition: Composition,
    /// Facilities to assess.
    pub facilities: Vec<Facility>,
    /// Scenarios to assess.
    pub scenarios: Vec<ScenarioParameters>,
    /// Factor overrides per process; absent processes use the reference table.
    #[serde(default)]
    pub factors: BTreeMap<ProcessKind, BTreeMap<String, FactorValue>>,
}

impl RunConfig {
    /// The reference data set.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            composition: default_composition(),
            facilities: reference_facilities(),
            scenarios: standard_scenarios(),
            factors: BTreeMap::new(),
        }
    }

    /// Parse a JSON run configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] when the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Factor table to use for a process: the override if present, else the
    /// reference table.
    #[must_use]
    pub fn factor_table(&self, kind: ProcessKind) -> FactorTable {
        self.factors.get(&kind).map_or_else(
            || reference_factor_table(kind),
            |entries| FactorTable::from_entries(kind, entries.clone()),
        )
    }
}
