//! Additive-disutility utility model and monthly QALY accrual, per spec.md §4.4.

use crate::costs::constants::UtilityConstants;
use crate::patient::enums::{CardiacState, NeuroState, RenalState};
use crate::psa::params::PsaParams;

fn baseline_by_age(age: f64) -> f64 {
    if age < 40.0 {
        0.90
    } else if age < 50.0 {
        0.87
    } else if age < 60.0 {
        0.84
    } else if age < 70.0 {
        0.81
    } else if age < 80.0 {
        0.77
    } else if age < 90.0 {
        0.72
    } else {
        0.67
    }
}

/// Piecewise-linear SBP disutility for patients in `NoAcuteEvent`: 0 below 130,
/// growing to a cap of 0.08 at or above 200.
fn sbp_gradient_disutility(sbp: f64) -> f64 {
    if sbp <= 130.0 {
        0.0
    } else if sbp >= 200.0 {
        0.08
    } else {
        0.08 * (sbp - 130.0) / 70.0
    }
}

fn cardiac_disutility(cardiac: CardiacState, sbp: f64, constants: &UtilityConstants, psa: &PsaParams) -> f64 {
    match cardiac {
        CardiacState::NoAcuteEvent => sbp_gradient_disutility(sbp),
        CardiacState::AcuteMI => constants.acute_mi,
        CardiacState::AcuteIschemicStroke => constants.acute_ischemic_stroke,
        CardiacState::AcuteHemorrhagicStroke => constants.acute_hemorrhagic_stroke,
        CardiacState::PostMI => psa.disutility_post_mi,
        CardiacState::PostStroke => psa.disutility_post_stroke,
        CardiacState::TIA => constants.tia,
        CardiacState::AcuteHF => constants.acute_hf,
        CardiacState::ChronicHF => psa.disutility_chronic_hf,
        CardiacState::CVDeath | CardiacState::NonCVDeath => 0.0,
    }
}

fn renal_disutility(renal: RenalState, constants: &UtilityConstants, psa: &PsaParams) -> f64 {
    match renal {
        RenalState::Ckd3a => constants.ckd3a,
        RenalState::Ckd3b => constants.ckd3b,
        RenalState::Ckd4 => constants.ckd4,
        RenalState::Esrd => psa.disutility_esrd,
        _ => 0.0,
    }
}

fn neuro_disutility(neuro: NeuroState, constants: &UtilityConstants, psa: &PsaParams) -> f64 {
    match neuro {
        NeuroState::Mci => constants.mci,
        NeuroState::Dementia => psa.disutility_dementia,
        NeuroState::Normal => 0.0,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UtilityInputs {
    pub age: f64,
    pub cardiac: CardiacState,
    pub renal: RenalState,
    pub neuro: NeuroState,
    pub current_sbp: f64,
    pub diabetes: bool,
    pub has_af: bool,
    pub hyperkalemia_flag: bool,
    pub num_antihypertensives: u32,
}

/// Monthly utility (0-floored), before discounting.
pub fn monthly_utility(inputs: &UtilityInputs, constants: &UtilityConstants, psa: &PsaParams) -> f64 {
    let mut utility = baseline_by_age(inputs.age);
    utility -= cardiac_disutility(inputs.cardiac, inputs.current_sbp, constants, psa);
    utility -= renal_disutility(inputs.renal, constants, psa);
    utility -= neuro_disutility(inputs.neuro, constants, psa);
    if inputs.diabetes {
        utility -= constants.diabetes;
    }
    if inputs.has_af {
        utility -= constants.af;
    }
    if inputs.hyperkalemia_flag {
        utility -= constants.hyperkalemia;
    }
    if inputs.num_antihypertensives >= 3 && inputs.current_sbp >= 140.0 {
        utility -= 0.01 + 0.01 * ((inputs.current_sbp - 140.0) / 40.0).min(1.0);
    }
    utility.max(0.0)
}

/// Monthly QALY = utility/12 * discount_factor.
pub fn monthly_qaly(utility: f64, discount_factor: f64) -> f64 {
    utility / 12.0 * discount_factor
}
