//! One-time acute event costs, per spec.md §4.4.

use crate::costs::constants::CostConstants;
use crate::patient::enums::EventOutcome;
use crate::psa::params::PsaParams;

/// One-time cost for the acute event just sampled; zero for deaths and "no event".
pub fn acute_event_cost(event: EventOutcome, constants: &CostConstants, psa: &PsaParams) -> f64 {
    match event {
        EventOutcome::Mi => psa.cost_mi_acute,
        EventOutcome::IschemicStroke => psa.cost_ischemic_stroke_acute,
        EventOutcome::HemorrhagicStroke => psa.cost_hemorrhagic_stroke_acute,
        EventOutcome::Hf => psa.cost_hf_acute,
        EventOutcome::Tia => constants.tia_one_time,
        EventOutcome::CvDeath | EventOutcome::NonCvDeath | EventOutcome::NoEvent => 0.0,
    }
}

/// AF onset has its own separate one-time cost, accrued alongside (not instead of)
/// any event-driven cost in the same cycle.
pub fn af_onset_cost(constants: &CostConstants) -> f64 {
    constants.af_onset_one_time
}
