//! Treatment discontinuation: monthly check for Intervention/MRA patients, excluded
//! for StandardCare. On a hit, the caller re-assigns the patient to StandardCare and
//! clears the MRA-dose-reduced flag.
//!
//! Grounded on `src/assumptions/lapse.rs`'s banded multiplicative rate assembly,
//! same shape as `treatment::adherence`.

use crate::patient::enums::Treatment;
use crate::risk::conversions::monthly_from_annual;
use rand::Rng;

/// PSA-supplied base annual discontinuation rate per arm.
#[derive(Debug, Clone, Copy)]
pub struct DiscontinuationRates {
    pub intervention: f64,
    pub mra: f64,
}

fn response_adjustment(sbp_reduction: f64) -> f64 {
    if sbp_reduction >= 15.0 {
        0.6
    } else if sbp_reduction >= 10.0 {
        0.8
    } else if sbp_reduction < 5.0 {
        1.3
    } else {
        1.0
    }
}

fn time_on_treatment_adjustment(months_on_treatment: f64) -> f64 {
    if months_on_treatment <= 3.0 {
        1.5
    } else if months_on_treatment <= 6.0 {
        1.2
    } else if months_on_treatment >= 24.0 {
        0.8
    } else {
        1.0
    }
}

/// Compute the discontinuation monthly probability for one cycle. `male_mra_roll`
/// is the caller's fresh Bernoulli(0.30) draw for the "MRA-on-male ×1.5" branch,
/// sampled once per cycle per spec.md's Open Question #3 (preserved as per-cycle).
#[allow(clippy::too_many_arguments)]
pub fn monthly_probability(
    treatment: Treatment,
    rates: &DiscontinuationRates,
    sbp_reduction: f64,
    months_on_treatment: f64,
    is_male: bool,
    male_mra_roll_hit: bool,
    has_current_hyperkalemia: bool,
    sdi_score: f64,
) -> f64 {
    let base = match treatment {
        Treatment::Intervention => rates.intervention,
        Treatment::Mra => rates.mra,
        Treatment::StandardCare => return 0.0,
    };

    let mut annual = base * response_adjustment(sbp_reduction) * time_on_treatment_adjustment(months_on_treatment);

    match treatment {
        Treatment::Mra => {
            if is_male && male_mra_roll_hit {
                annual *= 1.5;
            }
            if has_current_hyperkalemia {
                annual *= 2.0;
            }
        }
        Treatment::Intervention => {
            if sdi_score > 75.0 {
                annual *= 1.3;
            }
        }
        Treatment::StandardCare => unreachable!(),
    }

    annual = annual.min(0.40);
    monthly_from_annual(annual)
}

/// Draws the per-cycle male-MRA roll (Bernoulli(0.30)) used by `monthly_probability`.
pub fn sample_male_mra_roll<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen::<f64>() < 0.30
}
