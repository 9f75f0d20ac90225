//! Cognitive progression: Normal -> MCI -> Dementia, with a direct Normal ->
//! Dementia path, per spec.md §4.3.
//!
//! Grounded on the same banded-multiplier shape as `treatment::af`, with the age
//! and BP multipliers expressed as continuous functions rather than bands, matching
//! spec.md's exact formulas.

use crate::patient::enums::NeuroState;
use crate::risk::conversions::monthly_from_annual;
use rand::Rng;

fn age_multiplier(age: f64) -> f64 {
    2f64.powf((age - 65.0) / 5.0).max(1.0)
}

fn bp_multiplier(true_mean_sbp: f64) -> f64 {
    (1.0 + 0.15 * (true_mean_sbp - 120.0) / 10.0).max(1.0)
}

/// Advance one month of cognitive state. Returns the new state; the caller detects
/// a new-dementia case by comparing against the prior state.
pub fn step<R: Rng + ?Sized>(state: NeuroState, age: f64, true_mean_sbp: f64, rng: &mut R) -> NeuroState {
    let age_mult = age_multiplier(age);
    let bp_mult = bp_multiplier(true_mean_sbp);

    match state {
        NeuroState::Normal => {
            let dementia_monthly = monthly_from_annual(0.005 * age_mult * bp_mult);
            if rng.gen::<f64>() < dementia_monthly {
                return NeuroState::Dementia;
            }
            let mci_monthly = monthly_from_annual(0.02 * age_mult * bp_mult);
            if rng.gen::<f64>() < mci_monthly {
                return NeuroState::Mci;
            }
            NeuroState::Normal
        }
        NeuroState::Mci => {
            let dementia_monthly = monthly_from_annual(0.10 * age_mult * bp_mult);
            if rng.gen::<f64>() < dementia_monthly {
                NeuroState::Dementia
            } else {
                NeuroState::Mci
            }
        }
        NeuroState::Dementia => NeuroState::Dementia,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn dementia_is_terminal() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        assert_eq!(step(NeuroState::Dementia, 80.0, 160.0, &mut rng), NeuroState::Dementia);
    }

    #[test]
    fn age_multiplier_floors_at_one() {
        assert_eq!(age_multiplier(40.0), 1.0);
        assert!(age_multiplier(90.0) > 1.0);
    }

    #[test]
    fn bp_multiplier_floors_at_one() {
        assert_eq!(bp_multiplier(100.0), 1.0);
        assert!(bp_multiplier(180.0) > 1.0);
    }

    #[test]
    fn older_higher_bp_progresses_more_often_over_many_seeds() {
        let mut young_normal = 0;
        let mut old_normal = 0;
        for seed in 0..200u64 {
            let mut rng_y = Xoshiro256PlusPlus::seed_from_u64(seed);
            let mut rng_o = Xoshiro256PlusPlus::seed_from_u64(seed);
            if step(NeuroState::Normal, 50.0, 120.0, &mut rng_y) == NeuroState::Normal {
                young_normal += 1;
            }
            if step(NeuroState::Normal, 90.0, 190.0, &mut rng_o) == NeuroState::Normal {
                old_normal += 1;
            }
        }
        assert!(old_normal <= young_normal);
    }
}
