//! Conversion of emission results into inventory exchanges.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{EmissionResult, Pollutant, Unit};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of an elementary flow in a biosphere database.
pub struct FlowRef(pub String);

impl fmt::Display for FlowRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
/// Pollutant → flow lookup. May be sparse.
pub struct FlowCatalog(BTreeMap<Pollutant, FlowRef>);

impl FlowCatalog {
    /// Catalog built from explicit entries.
    #[must_use]
    pub fn new(entries: BTreeMap<Pollutant, FlowRef>) -> Self {
        Self(entries)
    }

    /// Flow codes of the biosphere3 database.
    #[must_use]
    pub fn biosphere3() -> Self {
        let codes = [
            (Pollutant::Co2Fossil, "aa7cac3a-3625-41d4-bc54-33e2cf11ec46"),
            (Pollutant::Co2Biogenic, "d6235194-e4e6-4548-bfa3-ac095131aef4"),
            (Pollutant::Ch4Fossil, "70ef743b-3ed5-4a6d-b192-fb6d62378555"),
            (Pollutant::Ch4Biogenic, "da1157e2-7593-4dfd-80dd-a3449b37a4d8"),
            (Pollutant::Nox, "77357947-ccc5-438e-9996-95e65e1e1bce"),
            (Pollutant::So2, "78c3efe4-421c-4d30-82e4-b97ac5124993"),
            (Pollutant::Pm25, "66f50b33-fd62-4fdd-a373-c5b0de7de00d"),
            (Pollutant::Hg, "5ec9c16a-959d-44cd-be7d-a935727d2151"),
            (Pollutant::Pb, "2718482b-8399-442e-b89a-52fbcc22d2e6"),
            (Pollutant::Dioxin, "f77c5e36-ee47-4437-b757-03139bb1d6d6"),
            (Pollutant::Pahs, "13d898ac-b9be-4723-a153-565e2a9144ac"),
            (Pollutant::Nmvoc, "33b38ccb-593b-4b11-b965-10d747ba3556"),
            (Pollutant::Nh3, "0f440cc0-0f74-446d-99d6-8ff0e97a2444"),
            (Pollutant::Pm10, "7678cec7-b8e1-439d-8242-99cd452834b1"),
            (Pollutant::ChlorineAir, "247ac273-60fa-4e21-9408-793f75fa1d37"),
            (Pollutant::LandOccupation, "1eaa9ea4-40b8-414a-b198-5626400372e1"),
        ];
        Self(
            codes
                .into_iter()
                .map(|(pollutant, code)| (pollutant, FlowRef(code.to_owned())))
                .collect(),
        )
    }

    /// Flow for a pollutant.
    #[must_use]
    pub fn flow(&self, pollutant: Pollutant) -> Option<&FlowRef> {
        self.0.get(&pollutant)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One biosphere exchange of an inventory activity.
pub struct Exchange {
    /// Pollutant the exchange was built from.
    pub pollutant: Pollutant,
    /// Elementary flow receiving the amount.
    pub flow: FlowRef,
    /// Amount in `unit`.
    pub amount: f64,
    /// Unit of the amount.
    pub unit: Unit,
}

/// Build biosphere exchanges for an emission result.
///
/// Negligible entries are skipped silently; entries without a flow are logged
/// and skipped so the rest of the activity is still recorded.
#[must_use]
pub fn build_exchanges(result: &EmissionResult, catalog: &FlowCatalog) -> Vec<Exchange> {
    let mut exchanges = Vec::with_capacity(result.len());
    for (pollutant, quantity) in result {
        let Some(flow) = catalog.flow(*pollutant) else {
            tracing::error!(pollutant = %pollutant, "missing flow, skipping exchange");
            continue;
        };
        if quantity.is_negligible() {
            continue;
        }
        exchanges.push(Exchange {
            pollutant: *pollutant,
            flow: flow.clone(),
            amount: quantity.magnitude,
            unit: quantity.unit,
        });
    }
    exchanges
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// CML 2016 impact categories reported for each cell.
pub enum ImpactCategory {
    /// Human toxicity (HTP inf).
    HumanToxicity,
    /// Climate change (GWP100).
    ClimateChange,
    /// Eutrophication (fate not incl.).
    Eutrophication,
    /// Acidification (average Europe, A&B).
    Acidification,
    /// Marine aquatic ecotoxicity (MAETP inf).
    MarineAquaticEcotoxicity,
    /// Terrestrial ecotoxicity (TETP inf).
    TerrestrialEcotoxicity,
    /// Freshwater aquatic ecotoxicity (FAETP inf).
    FreshwaterEcotoxicity,
    /// Photochemical oxidation (high NOx).
    PhotochemicalOxidation,
}

impl ImpactCategory {
    /// Every category, in reporting order.
    pub const ALL: [ImpactCategory; 8] = [
        ImpactCategory::HumanToxicity,
        ImpactCategory::ClimateChange,
        ImpactCategory::Eutrophication,
        ImpactCategory::Acidification,
        ImpactCategory::MarineAquaticEcotoxicity,
        ImpactCategory::TerrestrialEcotoxicity,
        ImpactCategory::FreshwaterEcotoxicity,
        ImpactCategory::PhotochemicalOxidation,
    ];

    /// Method identifier tuple understood by the external scorer.
    #[must_use]
    pub const fn method(self) -> [&'static str; 3] {
        const CML: &str = "CML v4.8 2016";
        match self {
            ImpactCategory::HumanToxicity => [CML, "human toxicity", "human toxicity (HTP inf)"],
            ImpactCategory::ClimateChange => {
                [CML, "climate change", "global warming potential (GWP100)"]
            }
            ImpactCategory::Eutrophication => {
                [CML, "eutrophication", "eutrophication (fate not incl.)"]
            }
            ImpactCategory::Acidification => [
                CML,
                "acidification",
                "acidification (incl. fate, average Europe total, A&B)",
            ],
            ImpactCategory::MarineAquaticEcotoxicity => [
                CML,
                "ecotoxicity: marine",
                "marine aquatic ecotoxicity (MAETP inf)",
            ],
            ImpactCategory::TerrestrialEcotoxicity => [
                CML,
                "ecotoxicity: terrestrial",
                "terrestrial ecotoxicity (TETP inf)",
            ],
            ImpactCategory::FreshwaterEcotoxicity => [
                CML,
                "ecotoxicity: freshwater",
                "freshwater aquatic ecotoxicity (FAETP inf)",
            ],
            ImpactCategory::PhotochemicalOxidation => [
                CML,
                "photochemical oxidant formation",
                "photochemical oxidation (high NOx)",
            ],
        }
    }

    /// World normalization reference for the category.
    #[must_use]
    pub const fn normalization_factor(self) -> f64 {
        match self {
            ImpactCategory::HumanToxicity => 8.86e12,
            ImpactCategory::ClimateChange => 4.18e12,
            ImpactCategory::Eutrophication => 3.77e9,
            ImpactCategory::Acidification => 3.36e11,
            ImpactCategory::MarineAquaticEcotoxicity => 6.24e12,
            ImpactCategory::TerrestrialEcotoxicity => 5.09e10,
            ImpactCategory::FreshwaterEcotoxicity => 3.07e10,
            ImpactCategory::PhotochemicalOxidation => 3.51e11,
        }
    }

    /// Normalize a raw score against this category's reference.
    #[must_use]
    pub fn normalize(self, score: f64) -> Option<f64> {
        normalize(score, self.normalization_factor())
    }
}

/// Divide a score by a normalization factor.
///
/// Returns `None` for a zero or non-finite divisor instead of an infinite or
/// NaN score.
#[must_use]
pub fn normalize(score: f64, factor: f64) -> Option<f64> {
    if factor == 0.0 || !factor.is_finite() {
        return None;
    }
    Some(score / factor)
}
