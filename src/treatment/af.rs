//! Atrial fibrillation onset, per spec.md §4.3.
//!
//! Grounded on `src/assumptions/lapse.rs`'s age-banded base rate + compounding
//! multiplier assembly, same shape reused across the `treatment` module.

use crate::patient::enums::Treatment;
use crate::risk::conversions::monthly_from_annual;

fn base_annual_by_age(age: f64) -> f64 {
    if age < 40.0 {
        0.002
    } else if age < 50.0 {
        0.004
    } else if age < 60.0 {
        0.010
    } else if age < 70.0 {
        0.025
    } else {
        0.050
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AfOnsetInputs {
    pub age: f64,
    pub sbp: f64,
    pub primary_aldosteronism: bool,
    pub heart_failure: bool,
    pub diabetes: bool,
    pub bmi: f64,
    pub treatment: Treatment,
    pub is_adherent: bool,
}

/// Monthly AF onset probability for a patient not yet in AF.
pub fn monthly_onset_probability(inputs: &AfOnsetInputs) -> f64 {
    let mut annual = base_annual_by_age(inputs.age);

    if inputs.primary_aldosteronism {
        let mut factor = 12.0;
        if inputs.is_adherent {
            match inputs.treatment {
                Treatment::Intervention => factor *= 0.40,
                Treatment::Mra => factor *= 0.60,
                Treatment::StandardCare => {}
            }
        }
        annual *= factor;
    }
    if inputs.heart_failure {
        annual *= 4.0;
    }
    let excess = (inputs.sbp - 140.0).max(0.0);
    annual *= 1.0 + 0.15 * excess / 10.0;
    if inputs.diabetes {
        annual *= 1.4;
    }
    if inputs.bmi >= 30.0 {
        annual *= 1.5;
    }

    annual = annual.min(0.25);
    monthly_from_annual(annual)
}
