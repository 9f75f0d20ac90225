//! Indirect (productivity) costs, societal perspective only, per spec.md §4.4.

use crate::costs::constants::{AbsenteeismDays, CostConstants};
use crate::patient::enums::{CardiacState, EventOutcome};

/// One-time absenteeism cost for an acute event, working-age patients only.
pub fn acute_absenteeism_cost(event: EventOutcome, age: f64, constants: &CostConstants, days: &AbsenteeismDays) -> f64 {
    if age >= 65.0 {
        return 0.0;
    }
    let event_days = match event {
        EventOutcome::Mi => days.mi,
        EventOutcome::IschemicStroke | EventOutcome::HemorrhagicStroke => days.stroke,
        EventOutcome::Tia => days.tia,
        EventOutcome::Hf => days.hf,
        _ => return 0.0,
    };
    event_days * constants.daily_wage
}

/// Monthly productivity loss for working-age patients in a chronic disability
/// state (post-stroke, or heart failure, acute or chronic).
pub fn monthly_productivity_loss(cardiac: CardiacState, age: f64, constants: &CostConstants) -> f64 {
    if age >= 65.0 {
        return 0.0;
    }
    let annual_wage = constants.daily_wage * 250.0;
    let multiplier = match cardiac {
        CardiacState::PostStroke => constants.disability_fraction_post_stroke,
        CardiacState::AcuteHF | CardiacState::ChronicHF => constants.disability_fraction_hf,
        _ => return 0.0,
    };
    annual_wage * multiplier / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_absenteeism_for_patients_over_65() {
        let c = CostConstants::default();
        let d = AbsenteeismDays::default();
        assert_eq!(acute_absenteeism_cost(EventOutcome::Mi, 70.0, &c, &d), 0.0);
    }

    #[test]
    fn absenteeism_scales_with_configured_days() {
        let c = CostConstants::default();
        let d = AbsenteeismDays::default();
        let mi = acute_absenteeism_cost(EventOutcome::Mi, 50.0, &c, &d);
        let tia = acute_absenteeism_cost(EventOutcome::Tia, 50.0, &c, &d);
        assert_eq!(tia, 3.0 * c.daily_wage);
        assert!(mi > tia);
    }

    #[test]
    fn no_productivity_loss_outside_disability_states() {
        let c = CostConstants::default();
        assert_eq!(monthly_productivity_loss(CardiacState::NoAcuteEvent, 40.0, &c), 0.0);
    }

    #[test]
    fn productivity_loss_applies_for_stroke_and_hf_states() {
        let c = CostConstants::default();
        assert!(monthly_productivity_loss(CardiacState::PostStroke, 40.0, &c) > 0.0);
        assert!(monthly_productivity_loss(CardiacState::ChronicHF, 40.0, &c) > 0.0);
        assert!(monthly_productivity_loss(CardiacState::AcuteHF, 40.0, &c) > 0.0);
    }
}
