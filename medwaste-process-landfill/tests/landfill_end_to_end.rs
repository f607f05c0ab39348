//! Reference-table checks for landfill on 100 kg of default waste.

use medwaste_core::{
    Pollutant, ProcessKind, Quantity, TreatmentProcess, WasteStream, default_composition,
    reference_factor_table,
};
use medwaste_process_landfill::{LandfillProcess, decayed_fraction};

#[test]
fn century_horizon_releases_almost_all_fast_pool_methane() {
    let waste = WasteStream::new(Quantity::kilograms(100.0), default_composition()).expect("valid mass");
    let result = LandfillProcess::new(reference_factor_table(ProcessKind::Landfill))
        .calculate(&waste, None)
        .expect("reference table is complete");

    // fast pool 0.135 + 0.095, e^-18 is negligible
    let ch4 = result.magnitude(Pollutant::Ch4Biogenic);
    assert!((ch4 - 11.5).abs() < 1e-6, "ch4_biogenic = {ch4}");
}

#[test]
fn slow_pool_feeds_biogenic_co2() {
    let waste = WasteStream::new(Quantity::kilograms(100.0), default_composition()).expect("valid mass");
    let result = LandfillProcess::new(reference_factor_table(ProcessKind::Landfill))
        .calculate(&waste, None)
        .expect("reference table is complete");

    let fast = 0.23 * decayed_fraction(0.18, 100.0);
    let slow = 0.12 * decayed_fraction(0.02, 100.0);
    let expected = 100.0 * (fast * 0.5 + slow * 0.1);
    assert!((result.magnitude(Pollutant::Co2Biogenic) - expected).abs() < 1e-9);
}
