//! Emission-limit enforcement for microwave treatment across factor sweeps.

use std::collections::BTreeMap;

use medwaste_core::{
    Composition, MaterialGroup, Pollutant, ProcessKind, Quantity, TreatmentProcess, WasteStream,
    default_composition, materials, reference_factor_table,
};
use medwaste_process_nonburn::{MicrowaveProcess, microwave::LIMITED_POLLUTANTS};

#[test]
fn enforced_limits_hold_for_any_factor_scale() {
    let limits = BTreeMap::from([
        ("nmvoc".to_owned(), 0.003),
        ("pm10".to_owned(), 0.002),
        ("pm25".to_owned(), 0.001),
    ]);

    for mass in [0.0, 1.0, 250.0, 2174.0] {
        let waste = WasteStream::new(Quantity::kilograms(mass), default_composition()).expect("valid mass");
        for scale in [1e-6, 1.0, 1e3, 1e9] {
            let factors = reference_factor_table(ProcessKind::Microwave)
                .with("nmvoc_per_organic", 0.002 * scale)
                .with("pm10_per_organic", 0.0006 * scale)
                .with("pm25_per_organic", 0.0004 * scale)
                .with("operating_frequency", 0.0)
                .with("emission_limits", limits.clone());
            let result = MicrowaveProcess::new(factors)
                .calculate(&waste, None)
                .expect("complete table");

            for pollutant in LIMITED_POLLUTANTS {
                let cap = mass * limits[pollutant.key()];
                let value = result.magnitude(pollutant);
                assert!(value <= cap, "{pollutant} = {value} above {cap} (mass {mass}, scale {scale})");
            }
        }
    }
}

#[test]
fn metal_only_waste_stays_finite() {
    let composition =
        Composition::new().with_fraction(MaterialGroup::MetallicMaterials, materials::MERCURY_WASTE, 1.0);
    let waste = WasteStream::new(Quantity::kilograms(10.0), composition).expect("valid mass");
    let result = MicrowaveProcess::new(reference_factor_table(ProcessKind::Microwave))
        .calculate(&waste, None)
        .expect("complete table");

    assert!(result.iter().all(|(_, quantity)| quantity.magnitude.is_finite()));
    assert_eq!(result.magnitude(Pollutant::Nmvoc), 0.0);
    assert_eq!(result.magnitude(Pollutant::Pb), 0.0);
}
