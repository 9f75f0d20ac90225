//! PREVENT 10-year total cardiovascular disease risk equation.
//!
//! Grounded on `MortalityTable`'s shape in the teacher: a small constants table plus
//! a pure function that folds a linear predictor into a survival-based risk. Here the
//! "table" collapses to two fixed coefficient sets (one per sex) since PREVENT has no
//! age-banding, only continuous log-transformed terms.

use crate::patient::enums::Sex;

/// Sex-specific PREVENT linear-predictor coefficients and baseline survival.
struct PreventCoefficients {
    intercept: f64,
    ln_age: f64,
    ln_sbp: f64,
    ln_sbp_bp_treated: f64,
    ln_total_chol: f64,
    ln_hdl: f64,
    ln_egfr: f64,
    ln_bmi: f64,
    diabetes: f64,
    smoker: f64,
    bp_treated: f64,
    /// Baseline 10-year survival at the mean linear predictor.
    s0: f64,
}

const MALE: PreventCoefficients = PreventCoefficients {
    intercept: -3.5,
    ln_age: 2.2,
    ln_sbp: 1.35,
    ln_sbp_bp_treated: 0.25,
    ln_total_chol: 0.45,
    ln_hdl: -0.55,
    ln_egfr: -0.40,
    ln_bmi: 0.18,
    diabetes: 0.65,
    smoker: 0.55,
    bp_treated: -0.30,
    s0: 0.9402,
};

const FEMALE: PreventCoefficients = PreventCoefficients {
    intercept: -4.1,
    ln_age: 2.4,
    ln_sbp: 1.30,
    ln_sbp_bp_treated: 0.22,
    ln_total_chol: 0.40,
    ln_hdl: -0.60,
    ln_egfr: -0.35,
    ln_bmi: 0.16,
    diabetes: 0.70,
    smoker: 0.50,
    bp_treated: -0.28,
    s0: 0.9581,
};

/// Inputs to the PREVENT equation, already on their natural (non-log) scale.
/// `uacr` is optional; `None` skips the albuminuria enhancement term.
#[derive(Debug, Clone, Copy)]
pub struct PreventInputs {
    pub sex: Sex,
    pub age: f64,
    pub sbp: f64,
    pub egfr: f64,
    pub total_cholesterol: f64,
    pub hdl: f64,
    pub bmi: f64,
    pub bp_treated: bool,
    pub diabetes: bool,
    pub smoker: bool,
    pub uacr: Option<f64>,
}

fn coefficients(sex: Sex) -> &'static PreventCoefficients {
    match sex {
        Sex::Male => &MALE,
        Sex::Female => &FEMALE,
    }
}

/// Share of 10-year total CVD risk attributed to MI, used before prior-event
/// multipliers and horizon conversion in the transition engine.
pub const MI_PROPORTION: f64 = 0.30;
/// Share of 10-year total CVD risk attributed to (undifferentiated) stroke.
pub const STROKE_PROPORTION: f64 = 0.25;
/// Share of 10-year total CVD risk attributed to heart failure.
pub const HF_PROPORTION: f64 = 0.25;

/// PREVENT 10-year total CVD risk, clamped to `[1e-3, 1 - 1e-3]` per spec.md §4.1.
pub fn ten_year_cvd_risk(inputs: &PreventInputs) -> f64 {
    let c = coefficients(inputs.sex);

    let age = inputs.age.clamp(30.0, 79.0);
    let sbp = inputs.sbp.clamp(80.0, 220.0);
    let egfr = inputs.egfr.clamp(15.0, 120.0);
    let chol = inputs.total_cholesterol.clamp(100.0, 400.0);
    let hdl = inputs.hdl.clamp(20.0, 100.0);
    let bmi = inputs.bmi.clamp(15.0, 50.0);

    let bp_treated = if inputs.bp_treated { 1.0 } else { 0.0 };
    let diabetes = if inputs.diabetes { 1.0 } else { 0.0 };
    let smoker = if inputs.smoker { 1.0 } else { 0.0 };

    let ln_sbp = sbp.ln();

    let mut xb = c.intercept
        + c.ln_age * age.ln()
        + c.ln_sbp * ln_sbp
        + c.ln_sbp_bp_treated * ln_sbp * bp_treated
        + c.ln_total_chol * chol.ln()
        + c.ln_hdl * hdl.ln()
        + c.ln_egfr * egfr.ln()
        + c.ln_bmi * bmi.ln()
        + c.diabetes * diabetes
        + c.smoker * smoker
        + c.bp_treated * bp_treated;

    if let Some(uacr_raw) = inputs.uacr {
        if uacr_raw > 30.0 {
            let uacr = uacr_raw.clamp(1.0, 5000.0);
            xb += 0.15 * (uacr.ln() - 30.0_f64.ln());
        }
    }

    let risk = 1.0 - c.s0.powf(xb.exp());
    risk.clamp(1e-3, 1.0 - 1e-3)
}
