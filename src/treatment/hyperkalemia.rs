//! Quarterly hyperkalemia management for MRA patients.
//!
//! Grounded on `src/assumptions/lapse.rs`'s banded-threshold match shape, applied
//! here to potassium bands instead of lapse multipliers.

use rand::Rng;

/// Action the kernel must apply after a quarterly hyperkalemia check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// No action beyond the lab cost, which always accrues on a due quarter.
    None,
    /// Potassium binder started: binder cost accrues, K drops 0.3, history increments.
    StartBinder,
    /// MRA dose halved: base and active treatment effects both halve.
    ReduceDose,
    /// MRA stopped: history increments, patient reassigned to StandardCare.
    Stop,
}

/// True when the quarterly check is due this cycle, per spec.md §4.3 / Open
/// Question #2: fires when `round(time_in_simulation) mod 3 == 0`, which includes
/// month 0 (preserved as-is).
pub fn is_due(time_in_simulation: f64) -> bool {
    (time_in_simulation.round() as i64).rem_euclid(3) == 0
}

/// Determine the management action for this quarter. Only called when `is_due`
/// and the patient is currently on MRA.
pub fn check<R: Rng + ?Sized>(
    serum_k: f64,
    on_binder: bool,
    mra_dose_reduced: bool,
    rng: &mut R,
) -> Action {
    if serum_k <= 5.0 {
        return Action::None;
    }
    if serum_k > 6.0 {
        return Action::Stop;
    }
    if serum_k > 5.5 {
        if !on_binder {
            return Action::StartBinder;
        }
        if !mra_dose_reduced {
            return Action::ReduceDose;
        }
        return Action::Stop;
    }
    // 5.0 < k <= 5.5
    if !mra_dose_reduced && rng.gen::<f64>() < 0.3 {
        return Action::ReduceDose;
    }
    Action::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn due_fires_at_month_zero_and_every_third_month() {
        assert!(is_due(0.0));
        assert!(!is_due(1.0));
        assert!(!is_due(2.0));
        assert!(is_due(3.0));
        assert!(is_due(6.0));
    }

    #[test]
    fn severe_hyperkalemia_always_stops() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert_eq!(check(6.5, true, true, &mut rng), Action::Stop);
    }

    #[test]
    fn moderate_band_starts_binder_then_reduces_then_stops() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert_eq!(check(5.8, false, false, &mut rng), Action::StartBinder);
        assert_eq!(check(5.8, true, false, &mut rng), Action::ReduceDose);
        assert_eq!(check(5.8, true, true, &mut rng), Action::Stop);
    }

    #[test]
    fn mild_band_never_stops() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        for _ in 0..100 {
            let action = check(5.2, false, false, &mut rng);
            assert!(action == Action::None || action == Action::ReduceDose);
        }
    }

    #[test]
    fn normal_k_never_triggers_action() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert_eq!(check(4.5, false, false, &mut rng), Action::None);
    }
}
