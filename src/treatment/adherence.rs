//! Adherence transitions: a two-state Markov chain (adherent / non-adherent) with
//! age-, SDI-, treatment-, and event-history-dependent monthly rates.
//!
//! Grounded on `src/assumptions/lapse.rs`'s multi-factor multiplicative rate
//! assembly (banded age/duration multipliers compounding onto a base annual rate),
//! generalized from lapse to adherence loss/regain.

use crate::patient::enums::Treatment;
use crate::risk::conversions::monthly_from_annual;
use rand::Rng;

/// Annual adherent -> non-adherent rate, per spec.md §4.3.
#[allow(clippy::too_many_arguments)]
pub fn loss_annual_rate(
    months_on_treatment: f64,
    age: f64,
    sdi_score: f64,
    treatment: Treatment,
    any_prior_hyperkalemia: bool,
    is_male: bool,
    months_since_last_cv_event: Option<f64>,
) -> f64 {
    let mut rate = if months_on_treatment <= 6.0 {
        0.20
    } else if months_on_treatment <= 12.0 {
        0.12
    } else {
        0.08
    };

    if age < 40.0 {
        rate *= 1.5;
    } else if age < 50.0 {
        rate *= 1.3;
    } else if age > 75.0 {
        rate *= 1.2;
    }

    if sdi_score > 75.0 {
        rate *= 1.4;
    } else if sdi_score > 50.0 {
        rate *= 1.2;
    }
    if age < 50.0 && sdi_score > 75.0 {
        rate *= 1.2;
    }

    match treatment {
        Treatment::Intervention => rate *= 0.48,
        Treatment::Mra => {
            rate *= if is_male { 1.4 } else { 1.2 };
            if any_prior_hyperkalemia {
                rate *= 1.3;
            }
        }
        Treatment::StandardCare => {}
    }

    if let Some(months) = months_since_last_cv_event {
        if months <= 12.0 {
            rate *= 0.7;
        }
    }

    rate.min(0.50)
}

/// Annual non-adherent -> adherent rate, per spec.md §4.3.
pub fn regain_annual_rate(months_since_last_cv_event: Option<f64>, current_sbp: f64) -> f64 {
    let mut rate = 0.05;
    if let Some(months) = months_since_last_cv_event {
        if months <= 6.0 {
            rate = 0.30;
        }
    }
    if current_sbp >= 180.0 {
        rate += 0.10;
    }
    rate
}

/// Draw whether the patient's adherence state flips this cycle. Returns the new
/// adherence flag; callers compare against the prior flag to detect a flip and
/// reset `time_since_adherence_change` / recompute active effect.
#[allow(clippy::too_many_arguments)]
pub fn step<R: Rng + ?Sized>(
    is_adherent: bool,
    months_on_treatment: f64,
    age: f64,
    sdi_score: f64,
    treatment: Treatment,
    any_prior_hyperkalemia: bool,
    is_male: bool,
    months_since_last_cv_event: Option<f64>,
    current_sbp: f64,
    rng: &mut R,
) -> bool {
    let annual_rate = if is_adherent {
        loss_annual_rate(
            months_on_treatment,
            age,
            sdi_score,
            treatment,
            any_prior_hyperkalemia,
            is_male,
            months_since_last_cv_event,
        )
    } else {
        regain_annual_rate(months_since_last_cv_event, current_sbp)
    };
    let monthly_rate = monthly_from_annual(annual_rate);
    let flips = rng.gen::<f64>() < monthly_rate;
    if flips {
        !is_adherent
    } else {
        is_adherent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn intervention_has_lower_loss_rate_than_mra_male() {
        let ixa = loss_annual_rate(3.0, 55.0, 40.0, Treatment::Intervention, false, true, None);
        let mra = loss_annual_rate(3.0, 55.0, 40.0, Treatment::Mra, false, true, None);
        assert!(ixa < mra);
    }

    #[test]
    fn loss_rate_capped_at_50_percent() {
        let rate = loss_annual_rate(1.0, 30.0, 90.0, Treatment::Mra, true, true, None);
        assert!(rate <= 0.50);
    }

    #[test]
    fn recent_cv_event_boosts_regain_rate() {
        let with_event = regain_annual_rate(Some(3.0), 150.0);
        let without = regain_annual_rate(None, 150.0);
        assert!(with_event > without);
    }

    #[test]
    fn step_is_deterministic_given_seed() {
        let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(42);
        let a = step(true, 2.0, 55.0, 30.0, Treatment::Intervention, false, true, None, 140.0, &mut rng1);
        let b = step(true, 2.0, 55.0, 30.0, Treatment::Intervention, false, true, None, 140.0, &mut rng2);
        assert_eq!(a, b);
    }
}
