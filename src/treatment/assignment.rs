//! Treatment response assignment: sampled once per patient on first assignment to
//! a non-StandardCare arm, cached in `base_treatment_effect`.
//!
//! Grounded on `src/projection/engine.rs::calculate_credited_rate`'s "match over a
//! small enum of approach variants feeding one numeric knob" shape, generalized from
//! crediting-rate lookup to a sampled (not table-looked-up) per-patient response.

use crate::patient::enums::Treatment;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// StandardCare has no PSA-supplied drug effect; it is fixed at zero SBP reduction.
pub const STANDARD_CARE_MEAN: f64 = 0.0;
pub const STANDARD_CARE_SD: f64 = 0.0;

/// PSA-supplied mean/sd pair for a treatment's SBP response distribution.
#[derive(Debug, Clone, Copy)]
pub struct TreatmentResponseParams {
    pub intervention_mean: f64,
    pub intervention_sd: f64,
    pub mra_mean: f64,
    pub mra_sd: f64,
}

fn mean_sd(treatment: Treatment, params: &TreatmentResponseParams) -> (f64, f64) {
    match treatment {
        Treatment::Intervention => (params.intervention_mean, params.intervention_sd),
        Treatment::Mra => (params.mra_mean, params.mra_sd),
        Treatment::StandardCare => (STANDARD_CARE_MEAN, STANDARD_CARE_SD),
    }
}

/// Sample `max(0, mean + sd*Z) * treatment_response_mult` as the patient's base
/// treatment effect (mmHg reduction), per spec.md §4.3 "Assignment".
pub fn sample_base_treatment_effect<R: Rng + ?Sized>(
    treatment: Treatment,
    params: &TreatmentResponseParams,
    treatment_response_mult: f64,
    rng: &mut R,
) -> f64 {
    let (mean, sd) = mean_sd(treatment, params);
    let z = if sd > 0.0 {
        Normal::new(0.0, 1.0).unwrap().sample(rng)
    } else {
        0.0
    };
    (mean + sd * z).max(0.0) * treatment_response_mult
}

/// Active treatment effect: base scaled down for non-adherent patients.
pub fn active_effect(base_effect: f64, is_adherent: bool) -> f64 {
    if is_adherent {
        base_effect
    } else {
        base_effect * 0.3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn params() -> TreatmentResponseParams {
        TreatmentResponseParams {
            intervention_mean: 20.0,
            intervention_sd: 3.0,
            mra_mean: 12.0,
            mra_sd: 2.0,
        }
    }

    #[test]
    fn standard_care_always_zero_effect() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let effect = sample_base_treatment_effect(Treatment::StandardCare, &params(), 1.0, &mut rng);
        assert_eq!(effect, 0.0);
    }

    #[test]
    fn effect_never_negative() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for _ in 0..1000 {
            let effect = sample_base_treatment_effect(Treatment::Mra, &params(), 1.0, &mut rng);
            assert!(effect >= 0.0);
        }
    }

    #[test]
    fn non_adherent_active_effect_is_30_percent_of_base() {
        assert!((active_effect(20.0, false) - 6.0).abs() < 1e-9);
        assert_eq!(active_effect(20.0, true), 20.0);
    }
}
