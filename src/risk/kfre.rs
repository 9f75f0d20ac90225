//! KFRE (Tangri 4-variable) kidney failure risk equation, 2-yr and 5-yr horizons.
//!
//! Grounded on the same constants-table + pure-function shape as `risk::prevent`,
//! mirroring the teacher's `monthly_rate`/`baseline_annual_rate` pairing: one
//! "raw" horizon-specific accessor (`risk_at_horizon`), one pair of convenience
//! wrappers for the two horizons spec.md names explicitly.

use crate::patient::enums::Sex;

/// The two horizons the KFRE equation is tabulated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    TwoYear,
    FiveYear,
}

struct KfreCoefficients {
    intercept: f64,
    age: f64,
    egfr: f64,
    ln_uacr: f64,
    female: f64,
    s0: f64,
}

const TWO_YEAR: KfreCoefficients = KfreCoefficients {
    intercept: -0.35,
    age: -0.2201,
    egfr: -0.2032,
    ln_uacr: 0.2771,
    female: -0.2068,
    s0: 0.9878,
};

const FIVE_YEAR: KfreCoefficients = KfreCoefficients {
    intercept: -0.10,
    age: -0.1992,
    egfr: -0.1990,
    ln_uacr: 0.3094,
    female: -0.2196,
    s0: 0.9586,
};

#[derive(Debug, Clone, Copy)]
pub struct KfreInputs {
    pub sex: Sex,
    pub age: f64,
    pub egfr: f64,
    pub uacr: f64,
}

/// KFRE risk at the given horizon, clamped to `[1e-4, 1 - 1e-4]` per spec.md §4.1.
pub fn risk_at_horizon(inputs: &KfreInputs, horizon: Horizon) -> f64 {
    let c = match horizon {
        Horizon::TwoYear => &TWO_YEAR,
        Horizon::FiveYear => &FIVE_YEAR,
    };

    let age_centered = inputs.age - 60.0;
    let egfr_centered = inputs.egfr - 40.0;
    let uacr = inputs.uacr.max(1e-6);
    let ln_uacr_centered = uacr.ln() - 100.0_f64.ln();
    let female = if matches!(inputs.sex, Sex::Female) { 1.0 } else { 0.0 };

    let lp = c.intercept
        + c.age * age_centered
        + c.egfr * egfr_centered
        + c.ln_uacr * ln_uacr_centered
        + c.female * female;

    let risk = 1.0 - c.s0.powf(lp.exp());
    risk.clamp(1e-4, 1.0 - 1e-4)
}

pub fn two_year_risk(inputs: &KfreInputs) -> f64 {
    risk_at_horizon(inputs, Horizon::TwoYear)
}

pub fn five_year_risk(inputs: &KfreInputs) -> f64 {
    risk_at_horizon(inputs, Horizon::FiveYear)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> KfreInputs {
        KfreInputs {
            sex: Sex::Male,
            age: 65.0,
            egfr: 35.0,
            uacr: 150.0,
        }
    }

    #[test]
    fn five_year_risk_at_least_two_year_risk() {
        let inputs = baseline();
        assert!(five_year_risk(&inputs) >= two_year_risk(&inputs));
    }

    #[test]
    fn risk_bounds_respected() {
        let inputs = baseline();
        let r2 = two_year_risk(&inputs);
        let r5 = five_year_risk(&inputs);
        assert!(r2 >= 1e-4 && r2 <= 1.0 - 1e-4);
        assert!(r5 >= 1e-4 && r5 <= 1.0 - 1e-4);
    }

    #[test]
    fn lower_egfr_increases_risk() {
        let mut low = baseline();
        let mut high = baseline();
        low.egfr = 20.0;
        high.egfr = 55.0;
        assert!(two_year_risk(&low) > two_year_risk(&high));
    }

    #[test]
    fn higher_uacr_increases_risk() {
        let mut low = baseline();
        let mut high = baseline();
        low.uacr = 10.0;
        high.uacr = 1000.0;
        assert!(two_year_risk(&high) > two_year_risk(&low));
    }
}
