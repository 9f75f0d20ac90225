//! Monthly SBP dynamics: background drift plus active treatment effect.
//!
//! Grounded on `src/assumptions/mortality.rs`'s pattern of a deterministic drift
//! term plus a sampled noise term (there: improvement-rate projection; here:
//! `rand_distr::Normal` noise), matching the `rins` example manifest's `rand` +
//! `rand_distr` pairing for Monte Carlo noise.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// One month of SBP update: `current += 0.05 + 2*Z - active_treatment_effect`, then
/// derives true-mean SBP and current DBP. Returns (new_current_sbp, new_true_mean_sbp,
/// new_current_dbp).
pub fn step<R: Rng + ?Sized>(
    current_sbp: f64,
    white_coat_offset: f64,
    active_treatment_effect: f64,
    rng: &mut R,
) -> (f64, f64, f64) {
    let z: f64 = Normal::new(0.0, 1.0).unwrap().sample(rng);
    let mut current = current_sbp + 0.05 + 2.0 * z - active_treatment_effect;
    current = current.clamp(90.0, 220.0);

    let mut true_mean = current - white_coat_offset;
    true_mean = true_mean.clamp(80.0, 210.0);

    let dbp = 0.6 * current;

    (current, true_mean, dbp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn stays_within_clamp_bounds() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let mut sbp = 150.0;
        for _ in 0..500 {
            let (new_sbp, true_mean, dbp) = step(sbp, 5.0, 10.0, &mut rng);
            assert!(new_sbp >= 90.0 && new_sbp <= 220.0);
            assert!(true_mean >= 80.0 && true_mean <= 210.0);
            assert!(dbp > 0.0);
            sbp = new_sbp;
        }
    }

    #[test]
    fn higher_treatment_effect_lowers_expected_sbp() {
        let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(99);
        let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(99);
        let (low_effect_sbp, _, _) = step(150.0, 0.0, 0.0, &mut rng1);
        let (high_effect_sbp, _, _) = step(150.0, 0.0, 20.0, &mut rng2);
        assert!(high_effect_sbp < low_effect_sbp);
    }
}
