//! TIA-to-stroke conversion check, per spec.md §4.3. Unlike the other treatment
//! rates this one is specified directly as a monthly probability (no annual-to-
//! monthly conversion), since it only fires in the first three months after a TIA.

#[derive(Debug, Clone, Copy)]
pub struct TiaConversionInputs {
    pub months_since_tia: f64,
    pub sbp: f64,
    pub diabetes: bool,
    pub has_af: bool,
}

/// Monthly probability of converting a recent TIA into a fresh ischemic stroke.
/// Returns 0.0 when the patient is outside the 3-month window or has no prior TIA
/// (callers should only call this when `months_since_tia` is not the "never"
/// sentinel).
pub fn monthly_probability(inputs: &TiaConversionInputs) -> f64 {
    if inputs.months_since_tia > 3.0 {
        return 0.0;
    }
    let mut p = if inputs.months_since_tia <= 1.0 {
        0.05
    } else if inputs.months_since_tia <= 2.0 {
        0.03
    } else {
        0.02
    };
    if inputs.sbp >= 140.0 {
        p *= 1.5;
    }
    if inputs.diabetes {
        p *= 1.3;
    }
    if inputs.has_af {
        p *= 1.4;
    }
    p.min(0.15)
}
