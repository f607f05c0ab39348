//! Domain data structures for quantities, pollutants, scenarios, and facilities.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::indirect::IndirectFactors;
use crate::ports::EngineError;

/// Magnitude at or below which an emission is treated as negligible by consumers.
pub const NEGLIGIBLE_MAGNITUDE: f64 = 1e-15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Physical dimension a [`Unit`] belongs to.
pub enum Dimension {
    /// Mass.
    Mass,
    /// Area occupied over time.
    AreaTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Units understood by the engine.
pub enum Unit {
    /// Kilogram, the base mass unit.
    #[serde(rename = "kg")]
    Kilogram,
    /// Gram.
    #[serde(rename = "g")]
    Gram,
    /// Metric tonne.
    #[serde(rename = "t")]
    Tonne,
    /// Avoirdupois pound.
    #[serde(rename = "lb")]
    Pound,
    /// Square metre occupied for one year.
    #[serde(rename = "m2a")]
    SquareMeterYear,
}

impl Unit {
    /// Dimension of the unit.
    #[must_use]
    pub const fn dimension(self) -> Dimension {
        match self {
            Unit::Kilogram | Unit::Gram | Unit::Tonne | Unit::Pound => Dimension::Mass,
            Unit::SquareMeterYear => Dimension::AreaTime,
        }
    }

    /// Short symbol used in reports and inventory exchanges.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Unit::Kilogram => "kg",
            Unit::Gram => "g",
            Unit::Tonne => "t",
            Unit::Pound => "lb",
            Unit::SquareMeterYear => "m2a",
        }
    }

    // Multiplier into the base unit of the dimension (kg, m2a).
    const fn base_factor(self) -> f64 {
        match self {
            Unit::Kilogram | Unit::SquareMeterYear => 1.0,
            Unit::Gram => 1e-3,
            Unit::Tonne => 1000.0,
            Unit::Pound => 0.453_592_37,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// A magnitude tagged with its unit.
pub struct Quantity {
    /// Numeric value expressed in `unit`.
    pub magnitude: f64,
    /// Unit of the magnitude.
    pub unit: Unit,
}

impl Quantity {
    /// Build a quantity from a magnitude and unit.
    #[must_use]
    pub const fn new(magnitude: f64, unit: Unit) -> Self {
        Self { magnitude, unit }
    }

    /// Shorthand for a mass in kilograms.
    #[must_use]
    pub const fn kilograms(magnitude: f64) -> Self {
        Self::new(magnitude, Unit::Kilogram)
    }

    /// Shorthand for an area-time occupation in square-metre-years.
    #[must_use]
    pub const fn square_meter_years(magnitude: f64) -> Self {
        Self::new(magnitude, Unit::SquareMeterYear)
    }

    /// Convert to another unit of the same dimension.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IncompatibleUnits`] when the dimensions differ.
    pub fn to(self, unit: Unit) -> Result<Self, EngineError> {
        if self.unit.dimension() != unit.dimension() {
            return Err(EngineError::IncompatibleUnits {
                from: self.unit,
                to: unit,
            });
        }
        if self.unit == unit {
            return Ok(self);
        }
        let magnitude = self.magnitude * self.unit.base_factor() / unit.base_factor();
        Ok(Self::new(magnitude, unit))
    }

    /// Add `other`, converted into this quantity's unit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IncompatibleUnits`] when the dimensions differ.
    pub fn checked_add(self, other: Self) -> Result<Self, EngineError> {
        let other = other.to(self.unit)?;
        Ok(Self::new(self.magnitude + other.magnitude, self.unit))
    }

    /// Whether downstream consumers should ignore this quantity.
    #[must_use]
    pub fn is_negligible(self) -> bool {
        self.magnitude.abs() <= NEGLIGIBLE_MAGNITUDE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}", self.magnitude, self.unit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Canonical pollutant keys produced by the engine.
pub enum Pollutant {
    /// Carbon dioxide of fossil origin.
    Co2Fossil,
    /// Carbon dioxide of biogenic origin.
    Co2Biogenic,
    /// Methane of fossil origin.
    Ch4Fossil,
    /// Methane of biogenic origin.
    Ch4Biogenic,
    /// Nitrogen oxides.
    Nox,
    /// Sulfur dioxide.
    So2,
    /// Particulate matter below 10 µm.
    Pm10,
    /// Particulate matter below 2.5 µm.
    Pm25,
    /// Mercury.
    Hg,
    /// Lead.
    Pb,
    /// Dioxins and furans.
    Dioxin,
    /// Polycyclic aromatic hydrocarbons.
    Pahs,
    /// Non-methane volatile organic compounds.
    Nmvoc,
    /// Ammonia.
    Nh3,
    /// Chlorine released to air.
    ChlorineAir,
    /// Land occupation, an area-time quantity.
    LandOccupation,
}

impl Pollutant {
    /// Every canonical pollutant, in key order.
    pub const ALL: [Pollutant; 16] = [
        Pollutant::Co2Fossil,
        Pollutant::Co2Biogenic,
        Pollutant::Ch4Fossil,
        Pollutant::Ch4Biogenic,
        Pollutant::Nox,
        Pollutant::So2,
        Pollutant::Pm10,
        Pollutant::Pm25,
        Pollutant::Hg,
        Pollutant::Pb,
        Pollutant::Dioxin,
        Pollutant::Pahs,
        Pollutant::Nmvoc,
        Pollutant::Nh3,
        Pollutant::ChlorineAir,
        Pollutant::LandOccupation,
    ];

    /// Stable string key, e.g. `co2_fossil`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Pollutant::Co2Fossil => "co2_fossil",
            Pollutant::Co2Biogenic => "co2_biogenic",
            Pollutant::Ch4Fossil => "ch4_fossil",
            Pollutant::Ch4Biogenic => "ch4_biogenic",
            Pollutant::Nox => "nox",
            Pollutant::So2 => "so2",
            Pollutant::Pm10 => "pm10",
            Pollutant::Pm25 => "pm25",
            Pollutant::Hg => "hg",
            Pollutant::Pb => "pb",
            Pollutant::Dioxin => "dioxin",
            Pollutant::Pahs => "pahs",
            Pollutant::Nmvoc => "nmvoc",
            Pollutant::Nh3 => "nh3",
            Pollutant::ChlorineAir => "chlorine_air",
            Pollutant::LandOccupation => "land_occupation",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Pollutant quantities produced by one calculation.
///
/// Values may carry different units; land occupation is area-time while every
/// other entry is a mass.
pub struct EmissionResult(BTreeMap<Pollutant, Quantity>);

impl EmissionResult {
    /// Empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quantity for a pollutant, returning the previous one.
    pub fn insert(&mut self, pollutant: Pollutant, quantity: Quantity) -> Option<Quantity> {
        self.0.insert(pollutant, quantity)
    }

    /// Quantity recorded for a pollutant.
    #[must_use]
    pub fn get(&self, pollutant: Pollutant) -> Option<&Quantity> {
        self.0.get(&pollutant)
    }

    /// Magnitude recorded for a pollutant, or 0 when absent.
    #[must_use]
    pub fn magnitude(&self, pollutant: Pollutant) -> f64 {
        self.0.get(&pollutant).map_or(0.0, |quantity| quantity.magnitude)
    }

    /// Whether a pollutant has an entry.
    #[must_use]
    pub fn contains(&self, pollutant: Pollutant) -> bool {
        self.0.contains_key(&pollutant)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the result has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in pollutant order.
    pub fn iter(&self) -> btree_map::Iter<'_, Pollutant, Quantity> {
        self.0.iter()
    }

    /// Add every entry of `other` into this result, summing shared keys.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IncompatibleUnits`] when a shared key carries
    /// quantities of different dimensions.
    pub fn merge(&mut self, other: &EmissionResult) -> Result<(), EngineError> {
        for (pollutant, quantity) in &other.0 {
            let merged = match self.0.get(pollutant) {
                Some(existing) => existing.checked_add(*quantity)?,
                None => *quantity,
            };
            self.0.insert(*pollutant, merged);
        }
        Ok(())
    }
}

impl FromIterator<(Pollutant, Quantity)> for EmissionResult {
    fn from_iter<I: IntoIterator<Item = (Pollutant, Quantity)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for EmissionResult {
    type Item = (Pollutant, Quantity);
    type IntoIter = btree_map::IntoIter<Pollutant, Quantity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'result> IntoIterator for &'result EmissionResult {
    type Item = (&'result Pollutant, &'result Quantity);
    type IntoIter = btree_map::Iter<'result, Pollutant, Quantity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Treatment technologies known to the engine.
pub enum ProcessKind {
    /// Combustion with flue-gas cleaning.
    Incineration,
    /// Sanitary landfill with first-order decay.
    Landfill,
    /// Thermal decomposition without oxygen.
    Pyrolysis,
    /// Chlorine-based chemical disinfection.
    #[serde(rename = "CHEM_DISINFECTION")]
    ChemicalDisinfection,
    /// Steam sterilisation.
    Autoclave,
    /// Microwave irradiation.
    Microwave,
}

impl ProcessKind {
    /// Every process kind, in reporting order.
    pub const ALL: [ProcessKind; 6] = [
        ProcessKind::Incineration,
        ProcessKind::Landfill,
        ProcessKind::Pyrolysis,
        ProcessKind::ChemicalDisinfection,
        ProcessKind::Autoclave,
        ProcessKind::Microwave,
    ];

    /// Human-friendly name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            ProcessKind::Incineration => "Incineration",
            ProcessKind::Landfill => "Landfill",
            ProcessKind::Pyrolysis => "Pyrolysis",
            ProcessKind::ChemicalDisinfection => "Chemical Disinfection",
            ProcessKind::Autoclave => "Autoclave",
            ProcessKind::Microwave => "Microwave",
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            ProcessKind::Incineration => "INCINERATION",
            ProcessKind::Landfill => "LANDFILL",
            ProcessKind::Pyrolysis => "PYROLYSIS",
            ProcessKind::ChemicalDisinfection => "CHEM_DISINFECTION",
            ProcessKind::Autoclave => "AUTOCLAVE",
            ProcessKind::Microwave => "MICROWAVE",
        };
        write!(formatter, "{slug}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a registered treatment process.
pub struct ProcessMeta {
    /// Technology identifier.
    pub kind: ProcessKind,
    /// Display name.
    pub name: String,
}

impl From<ProcessKind> for ProcessMeta {
    fn from(kind: ProcessKind) -> Self {
        Self {
            kind,
            name: kind.display_name().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Named set of policy and operational multipliers.
///
/// Every parameter is optional; a process ignores parameters it does not
/// recognise and treats absent ones as neutral.
pub struct ScenarioParameters {
    /// Scenario identifier, e.g. `BASELINE`.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Fraction of hazardous material retained after segregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segregation_efficiency: Option<f64>,
    /// Removal efficiency of incinerator flue-gas cleaning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incineration_flue_gas_efficiency: Option<f64>,
    /// Whether landfills follow best practice (gas capture, lining).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landfill_best_practices: Option<bool>,
    /// Share of organic mass routed through chemical disinfection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chemical_disinfection_fraction: Option<f64>,
}

impl ScenarioParameters {
    /// Scenario with the given name and no parameters set.
    #[must_use]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    /// Set the segregation efficiency.
    #[must_use]
    pub fn with_segregation_efficiency(mut self, efficiency: f64) -> Self {
        self.segregation_efficiency = Some(efficiency);
        self
    }

    /// Set the flue-gas cleaning efficiency.
    #[must_use]
    pub fn with_flue_gas_efficiency(mut self, efficiency: f64) -> Self {
        self.incineration_flue_gas_efficiency = Some(efficiency);
        self
    }

    /// Set the landfill best-practice flag.
    #[must_use]
    pub fn with_landfill_best_practices(mut self, enabled: bool) -> Self {
        self.landfill_best_practices = Some(enabled);
        self
    }

    /// Set the chemical disinfection fraction.
    #[must_use]
    pub fn with_chemical_disinfection_fraction(mut self, fraction: f64) -> Self {
        self.chemical_disinfection_fraction = Some(fraction);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A waste-producing facility and its supporting-activity factors.
pub struct Facility {
    /// Facility identifier, e.g. `KBTH`.
    pub name: String,
    /// Mass of waste generated over the assessed period.
    pub waste_mass: Quantity,
    /// Indirect factors; facilities without them get direct emissions only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indirect: Option<IndirectFactors>,
}
