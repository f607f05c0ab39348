//! Waste composition tables and the waste stream entity.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Dimension, Quantity, Unit};
use crate::ports::EngineError;

/// Material identifiers used by the treatment formulas.
pub mod materials {
    /// Plastic parts of needles and sharps; the fossil organic share.
    pub const NEEDLES_SHARPS_PLASTIC: &str = "needles_sharps_plastic";
    /// Blood and other body fluids.
    pub const BODY_FLUIDS: &str = "body_fluids";
    /// Microbiological cultures.
    pub const LAB_CULTURES: &str = "lab_cultures";
    /// Expired or unused pharmaceuticals.
    pub const PHARMACEUTICALS: &str = "pharmaceuticals";
    /// Organic cytotoxic residues.
    pub const CYTOTOXIC_ORGANIC: &str = "cytotoxic_organic";
    /// Laboratory reagents.
    pub const LAB_REAGENTS: &str = "lab_reagents";
    /// Disinfectants used on lab cultures.
    pub const LAB_CULTURES_DISINFECTANTS: &str = "lab_cultures_disinfectants";
    /// Halogenated pharmaceuticals.
    pub const PHARMACEUTICALS_HALOGENATED: &str = "pharmaceuticals_halogenated";
    /// Halogenated cytotoxic residues.
    pub const CYTOTOXIC_HALOGENATED: &str = "cytotoxic_halogenated";
    /// Metal parts of needles and sharps.
    pub const NEEDLES_SHARPS_METAL: &str = "needles_sharps_metal";
    /// Metals carried in body fluids.
    pub const BODY_FLUIDS_METALS: &str = "body_fluids_metals";
    /// Pressurised gas cylinders.
    pub const GAS_CYLINDERS: &str = "gas_cylinders";
    /// Mercury-bearing waste such as thermometers.
    pub const MERCURY_WASTE: &str = "mercury_waste";
    /// Lead and other heavy metals.
    pub const OTHER_HEAVY_METALS: &str = "other_heavy_metals";
    /// Radioactive metals.
    pub const RADIOACTIVE_METALS: &str = "radioactive_metals";
    /// Radioactive organic material.
    pub const RADIOACTIVE_ORGANIC: &str = "radioactive_organic";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Top-level material groups of a composition.
pub enum MaterialGroup {
    /// Organic materials.
    OrganicMaterials,
    /// Chlorinated materials.
    ChlorinatedMaterials,
    /// Metallic materials.
    MetallicMaterials,
    /// Radioactive materials; carried but not read by any process yet.
    RadioactiveMaterials,
}

impl fmt::Display for MaterialGroup {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            MaterialGroup::OrganicMaterials => "organic_materials",
            MaterialGroup::ChlorinatedMaterials => "chlorinated_materials",
            MaterialGroup::MetallicMaterials => "metallic_materials",
            MaterialGroup::RadioactiveMaterials => "radioactive_materials",
        };
        write!(formatter, "{key}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Nested fraction table: group → material id → fraction.
///
/// Fractions are summed per group by consumers and are not required to total
/// 1.0 across groups.
pub struct Composition(BTreeMap<MaterialGroup, BTreeMap<String, f64>>);

impl Composition {
    /// Empty composition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for one fraction.
    #[must_use]
    pub fn with_fraction<S: Into<String>>(
        mut self,
        group: MaterialGroup,
        material: S,
        fraction: f64,
    ) -> Self {
        self.set_fraction(group, material, fraction);
        self
    }

    /// Set one fraction, creating the group if needed.
    pub fn set_fraction<S: Into<String>>(&mut self, group: MaterialGroup, material: S, fraction: f64) {
        self.0.entry(group).or_default().insert(material.into(), fraction);
    }

    /// Fractions of a group, if the group exists.
    #[must_use]
    pub fn group(&self, group: MaterialGroup) -> Option<&BTreeMap<String, f64>> {
        self.0.get(&group)
    }

    /// Fraction of one material, 0 when the group or material is absent.
    #[must_use]
    pub fn fraction(&self, group: MaterialGroup, material: &str) -> f64 {
        self.0
            .get(&group)
            .and_then(|fractions| fractions.get(material))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum of all fractions in a group, 0 when the group is absent.
    #[must_use]
    pub fn group_sum(&self, group: MaterialGroup) -> f64 {
        self.0
            .get(&group)
            .map_or(0.0, |fractions| fractions.values().sum())
    }

    // Missing materials are left alone.
    fn scale_fraction(&mut self, group: MaterialGroup, material: &str, factor: f64) {
        if let Some(fraction) = self
            .0
            .get_mut(&group)
            .and_then(|fractions| fractions.get_mut(material))
        {
            *fraction *= factor;
        }
    }
}

/// Materials reduced by source segregation.
const SEGREGATED_MATERIALS: [(MaterialGroup, &str); 3] = [
    (MaterialGroup::OrganicMaterials, materials::NEEDLES_SHARPS_PLASTIC),
    (MaterialGroup::OrganicMaterials, materials::CYTOTOXIC_ORGANIC),
    (MaterialGroup::ChlorinatedMaterials, materials::LAB_REAGENTS),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A mass of categorised waste.
///
/// Transforms return new streams; the receiver is never modified.
pub struct WasteStream {
    mass: Quantity,
    composition: Composition,
}

impl WasteStream {
    /// Build a waste stream.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidMass`] when the mass is negative, not
    /// finite, or not expressed in a mass unit.
    pub fn new(mass: Quantity, composition: Composition) -> Result<Self, EngineError> {
        if mass.unit.dimension() != Dimension::Mass {
            return Err(EngineError::InvalidMass(format!(
                "{mass} is not a mass"
            )));
        }
        if !mass.magnitude.is_finite() || mass.magnitude < 0.0 {
            return Err(EngineError::InvalidMass(format!(
                "{mass} must be finite and non-negative"
            )));
        }
        Ok(Self { mass, composition })
    }

    /// Mass as supplied.
    #[must_use]
    pub fn mass(&self) -> Quantity {
        self.mass
    }

    /// Mass in kilograms.
    #[must_use]
    pub fn mass_kg(&self) -> f64 {
        self.mass.magnitude * kilogram_factor(self.mass.unit)
    }

    /// Material composition.
    #[must_use]
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Copy of this stream with the segregated hazardous fractions scaled by
    /// `efficiency`. All other fractions pass through unchanged.
    #[must_use]
    pub fn adjust_for_segregation(&self, efficiency: f64) -> Self {
        let mut composition = self.composition.clone();
        for (group, material) in SEGREGATED_MATERIALS {
            composition.scale_fraction(group, material, efficiency);
        }
        Self {
            mass: self.mass,
            composition,
        }
    }
}

// The constructor guarantees a mass unit, so conversion cannot fail.
fn kilogram_factor(unit: Unit) -> f64 {
    Quantity::new(1.0, unit)
        .to(Unit::Kilogram)
        .map_or(1.0, |quantity| quantity.magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_composition;

    fn stream() -> WasteStream {
        WasteStream::new(Quantity::kilograms(100.0), default_composition()).expect("valid mass")
    }

    #[test]
    fn segregation_scales_hazardous_fractions() {
        let original = stream();
        let adjusted = original.adjust_for_segregation(0.5);

        for (group, material) in SEGREGATED_MATERIALS {
            let before = original.composition().fraction(group, material);
            let after = adjusted.composition().fraction(group, material);
            assert!((after - before * 0.5).abs() < 1e-12, "{material} not halved");
        }
    }

    #[test]
    fn full_segregation_removes_hazardous_fractions() {
        let original = stream();
        let adjusted = original.adjust_for_segregation(0.0);

        for (group, material) in SEGREGATED_MATERIALS {
            assert!(original.composition().fraction(group, material) > 0.0);
            assert_eq!(adjusted.composition().fraction(group, material), 0.0, "{material} left over");
        }
        assert_eq!(adjusted.mass_kg(), original.mass_kg());
    }

    #[test]
    fn unit_efficiency_is_bit_identical() {
        let original = stream();
        let adjusted = original.adjust_for_segregation(1.0);

        assert_eq!(adjusted, original);
        for group in [
            MaterialGroup::OrganicMaterials,
            MaterialGroup::ChlorinatedMaterials,
            MaterialGroup::MetallicMaterials,
            MaterialGroup::RadioactiveMaterials,
        ] {
            let before = original.composition().group(group).expect("group present");
            let after = adjusted.composition().group(group).expect("group present");
            assert_eq!(before.len(), after.len());
            for (material, value) in before {
                let kept = after.get(material).expect("material kept");
                assert_eq!(kept.to_bits(), value.to_bits(), "{material} changed");
            }
        }
    }

    #[test]
    fn segregation_passes_other_fractions_through() {
        let original = stream();
        let adjusted = original.adjust_for_segregation(0.3);

        for group in [
            MaterialGroup::OrganicMaterials,
            MaterialGroup::ChlorinatedMaterials,
            MaterialGroup::MetallicMaterials,
            MaterialGroup::RadioactiveMaterials,
        ] {
            let fractions = original.composition().group(group).expect("group present");
            for (material, value) in fractions {
                if SEGREGATED_MATERIALS.contains(&(group, material.as_str())) {
                    continue;
                }
                let after = adjusted.composition().fraction(group, material);
                assert_eq!(after.to_bits(), value.to_bits(), "{material} changed");
            }
        }
        assert_eq!(adjusted.mass(), original.mass());
    }

    #[test]
    fn segregation_leaves_receiver_untouched() {
        let original = stream();
        let snapshot = original.clone();
        let _adjusted = original.adjust_for_segregation(0.3);
        assert_eq!(original, snapshot);
        assert_eq!(original.composition(), &default_composition());
    }

    #[test]
    fn segregation_composes_multiplicatively() {
        let original = stream();
        let twice = original.adjust_for_segregation(0.8).adjust_for_segregation(0.5);
        let once = original.adjust_for_segregation(0.8 * 0.5);

        for (group, material) in SEGREGATED_MATERIALS {
            let lhs = twice.composition().fraction(group, material);
            let rhs = once.composition().fraction(group, material);
            assert!((lhs - rhs).abs() < 1e-15, "{material}: {lhs} != {rhs}");
        }
    }

    #[test]
    fn segregation_skips_missing_materials() {
        let sparse = Composition::new().with_fraction(MaterialGroup::OrganicMaterials, "body_fluids", 0.2);
        let waste = WasteStream::new(Quantity::kilograms(10.0), sparse.clone()).expect("valid mass");
        let adjusted = waste.adjust_for_segregation(0.1);
        assert_eq!(adjusted.composition(), &sparse);
    }

    #[test]
    fn missing_fractions_default_to_zero() {
        let composition = Composition::new();
        assert_eq!(composition.fraction(MaterialGroup::MetallicMaterials, materials::MERCURY_WASTE), 0.0);
        assert_eq!(composition.group_sum(MaterialGroup::OrganicMaterials), 0.0);
    }

    #[test]
    fn mass_is_reported_in_kilograms() {
        let waste = WasteStream::new(Quantity::new(2.0, Unit::Tonne), Composition::new()).expect("valid mass");
        assert!((waste.mass_kg() - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_invalid_masses() {
        let negative = WasteStream::new(Quantity::kilograms(-1.0), Composition::new());
        assert!(matches!(negative, Err(EngineError::InvalidMass(_))));

        let area = WasteStream::new(Quantity::square_meter_years(1.0), Composition::new());
        assert!(matches!(area, Err(EngineError::InvalidMass(_))));

        let nan = WasteStream::new(Quantity::kilograms(f64::NAN), Composition::new());
        assert!(matches!(nan, Err(EngineError::InvalidMass(_))));
    }
}
