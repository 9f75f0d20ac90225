//! Annual eGFR decline rate, per spec.md §4.1.
//!
//! Grounded on the teacher's `assumptions/pwd.rs` banded-rate-table idiom: a decline
//! rate selected by matching clamped numeric bands rather than a continuous formula.

use crate::risk::kfre::{risk_at_horizon, Horizon, KfreInputs};

/// Inputs needed to compute one patient's annual eGFR decline this cycle.
#[derive(Debug, Clone, Copy)]
pub struct EgfrDeclineInputs {
    pub age: f64,
    pub egfr: f64,
    pub uacr: f64,
    pub sbp: f64,
    pub diabetes: bool,
    pub on_sglt2i: bool,
    pub use_kfre_model: bool,
    pub kfre: KfreInputs,
}

/// Annual eGFR decline in mL/min/1.73m^2/yr, capped at 15.0.
pub fn annual_decline(inputs: &EgfrDeclineInputs) -> f64 {
    let base = if inputs.egfr < 60.0 && inputs.use_kfre_model {
        let kfre_2yr = risk_at_horizon(&inputs.kfre, Horizon::TwoYear);
        if kfre_2yr > 0.30 {
            5.0
        } else if kfre_2yr > 0.15 {
            3.5
        } else if kfre_2yr > 0.05 {
            2.0
        } else {
            1.0
        }
    } else {
        let age_band = if inputs.age < 40.0 {
            0.0
        } else if inputs.age < 65.0 {
            1.0
        } else {
            1.5
        };
        let albuminuria_addon = if inputs.uacr >= 300.0 {
            2.0
        } else if inputs.uacr >= 30.0 {
            0.8
        } else {
            0.0
        };
        age_band + albuminuria_addon
    };

    let diabetes_factor = if inputs.diabetes { 1.5 } else { 1.0 };
    let sglt2_factor = if inputs.on_sglt2i { 0.61 } else { 1.0 };
    let sbp_excess = 0.08 * (inputs.sbp - 130.0).max(0.0) / 10.0;

    let total = base * diabetes_factor * sglt2_factor + sbp_excess;
    total.min(15.0)
}
