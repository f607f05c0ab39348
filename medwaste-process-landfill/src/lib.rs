//! Landfill treatment process with two-pool first-order decay.

use std::sync::Arc;

use medwaste_core::{
    factors::FactorTable,
    model::{EmissionResult, Pollutant, ProcessKind, ProcessMeta, Quantity, ScenarioParameters},
    plugin::ProcessPlugin,
    ports::{EngineError, TreatmentProcess},
    waste::{MaterialGroup, WasteStream, materials},
};

/// Share of decayed slow-pool carbon released as CO2.
const SLOW_POOL_CO2_SHARE: f64 = 0.1;
/// NMVOC from the slow pool relative to the fast pool split.
const SLOW_POOL_NMVOC_SHARE: f64 = 0.5;
/// Methane split multiplier under best practice (gas capture).
const BEST_PRACTICE_CH4_SCALE: f64 = 0.8;
/// Mercury factor multiplier under best practice (lining).
const BEST_PRACTICE_HG_SCALE: f64 = 0.5;

/// Fraction of a first-order pool decayed after `years`.
///
/// Lies in `[0, 1)` for a non-negative rate and finite horizon, up to the
/// point where `e^(-rate·years)` underflows double precision.
#[must_use]
pub fn decayed_fraction(rate: f64, years: f64) -> f64 {
    -(-rate * years).exp_m1()
}

#[derive(Debug, Clone, Copy)]
struct Coefficients {
    time_period: f64,
    fast_decay_rate: f64,
    slow_decay_rate: f64,
    ch4_split: f64,
    co2_split: f64,
    nh3_split: f64,
    nmvoc_split: f64,
    hg_factor: f64,
    pb_factor: f64,
}

impl Coefficients {
    fn resolve(
        factors: &FactorTable,
        scenario: Option<&ScenarioParameters>,
    ) -> Result<Self, EngineError> {
        let best_practices = scenario
            .and_then(|scenario| scenario.landfill_best_practices)
            .unwrap_or(false);
        let (ch4_scale, hg_scale) = if best_practices {
            (BEST_PRACTICE_CH4_SCALE, BEST_PRACTICE_HG_SCALE)
        } else {
            (1.0, 1.0)
        };

        Ok(Self {
            time_period: factors.required("time_period")?,
            fast_decay_rate: factors.required("fast_decay_rate")?,
            slow_decay_rate: factors.required("slow_decay_rate")?,
            ch4_split: factors.required("ch4_split")? * ch4_scale,
            co2_split: factors.required("co2_split")?,
            nh3_split: factors.required("nh3_split")?,
            nmvoc_split: factors.required("nmvoc_split")?,
            hg_factor: factors.required("hg_factor")? * hg_scale,
            pb_factor: factors.required("pb_factor")?,
        })
    }
}

/// Landfill emissions over a fixed horizon.
///
/// Body fluids and lab cultures decay in the fast pool; plastics and
/// pharmaceuticals in the slow pool. Metals leach linearly with time.
pub struct LandfillProcess {
    meta: ProcessMeta,
    factors: FactorTable,
}

impl LandfillProcess {
    /// Create the process from its factor table.
    #[must_use]
    pub fn new(factors: FactorTable) -> Self {
        Self {
            meta: ProcessMeta::from(ProcessKind::Landfill),
            factors,
        }
    }
}

impl TreatmentProcess for LandfillProcess {
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
        let organic = |material| composition.fraction(MaterialGroup::OrganicMaterials, material);

        let fast_pool = organic(materials::BODY_FLUIDS) + organic(materials::LAB_CULTURES);
        let slow_pool =
            organic(materials::NEEDLES_SHARPS_PLASTIC) + organic(materials::PHARMACEUTICALS);

        let fast = fast_pool * decayed_fraction(coeff.fast_decay_rate, coeff.time_period);
        let slow = slow_pool * decayed_fraction(coeff.slow_decay_rate, coeff.time_period);

        let mercury = composition.fraction(MaterialGroup::MetallicMaterials, materials::MERCURY_WASTE);
        let heavy_metals =
            composition.fraction(MaterialGroup::MetallicMaterials, materials::OTHER_HEAVY_METALS);

        Ok([
            (Pollutant::Ch4Biogenic, mass * fast * coeff.ch4_split),
            (
                Pollutant::Co2Biogenic,
                mass * (fast * coeff.co2_split + slow * SLOW_POOL_CO2_SHARE),
            ),
            (Pollutant::Nh3, mass * fast * coeff.nh3_split),
            (
                Pollutant::Nmvoc,
                mass * (fast * coeff.nmvoc_split + slow * coeff.nmvoc_split * SLOW_POOL_NMVOC_SHARE),
            ),
            (
                Pollutant::Hg,
                mass * mercury * coeff.hg_factor * coeff.time_period,
            ),
            (
                Pollutant::Pb,
                mass * heavy_metals * coeff.pb_factor * coeff.time_period,
            ),
        ]
        .into_iter()
        .map(|(pollutant, kg)| (pollutant, Quantity::kilograms(kg)))
        .collect())
    }
}

/// Build the plugin bundle for landfill.
#[must_use]
pub fn plugin(factors: FactorTable) -> ProcessPlugin {
    ProcessPlugin::new(Arc::new(LandfillProcess::new(factors)))
}
