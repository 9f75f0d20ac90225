//! Monthly state-management cost, per spec.md §4.4.

use crate::costs::constants::CostConstants;
use crate::patient::enums::{CardiacState, RenalState};
use crate::psa::params::PsaParams;

fn htn_default(sbp: f64, constants: &CostConstants) -> f64 {
    if sbp < 140.0 {
        constants.controlled_htn_annual
    } else {
        constants.uncontrolled_htn_annual
    }
}

fn cardiac_annual(cardiac: CardiacState, sbp: f64, constants: &CostConstants, psa: &PsaParams) -> f64 {
    match cardiac {
        CardiacState::NoAcuteEvent => htn_default(sbp, constants),
        CardiacState::PostMI => constants.post_mi_annual,
        CardiacState::PostStroke => psa.cost_post_stroke_annual,
        CardiacState::ChronicHF => psa.cost_hf_annual,
        _ => htn_default(sbp, constants),
    }
}

fn renal_annual(renal: RenalState, constants: &CostConstants, psa: &PsaParams) -> f64 {
    match renal {
        RenalState::Ckd3a => constants.ckd3a_annual,
        RenalState::Ckd3b => constants.ckd3b_annual,
        RenalState::Ckd4 => constants.ckd4_annual,
        RenalState::Esrd => psa.cost_esrd_annual,
        _ => 0.0,
    }
}

pub fn monthly_state_management_cost(
    cardiac: CardiacState,
    renal: RenalState,
    current_sbp: f64,
    has_af: bool,
    constants: &CostConstants,
    psa: &PsaParams,
) -> f64 {
    let mut annual = cardiac_annual(cardiac, current_sbp, constants, psa);
    if has_af {
        annual += constants.af_annual;
    }
    annual += renal_annual(renal, constants, psa);
    annual / 12.0
}
