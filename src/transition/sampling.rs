//! Multinomial event sampling over a fixed cause order, and the acute-to-chronic
//! rollover rule applied when no event is sampled.
//!
//! Grounded on `src/projection/engine.rs::apply_decrements`'s persistency
//! composition (a single cumulative walk over a small fixed set of decrements),
//! generalized from two causes to the seven-cause fixed order spec.md §4.2 names.

use crate::patient::enums::{CardiacState, EventOutcome};
use crate::transition::probs::TransProbs;

/// Draw `u` against the fixed cause order (CVDeath, NonCVDeath, MI,
/// HemorrhagicStroke, IschemicStroke, HF, TIA); the first cumulative bucket that
/// reaches `u` is the sampled cause. If none does, returns `EventOutcome::NoEvent`.
pub fn sample_event(probs: &TransProbs, u: f64) -> EventOutcome {
    let mut cumulative = 0.0;

    cumulative += probs.cv_death;
    if u < cumulative {
        return EventOutcome::CvDeath;
    }
    cumulative += probs.non_cv_death;
    if u < cumulative {
        return EventOutcome::NonCvDeath;
    }
    cumulative += probs.mi;
    if u < cumulative {
        return EventOutcome::Mi;
    }
    cumulative += probs.hemorrhagic_stroke;
    if u < cumulative {
        return EventOutcome::HemorrhagicStroke;
    }
    cumulative += probs.ischemic_stroke;
    if u < cumulative {
        return EventOutcome::IschemicStroke;
    }
    cumulative += probs.hf;
    if u < cumulative {
        return EventOutcome::Hf;
    }
    cumulative += probs.tia;
    if u < cumulative {
        return EventOutcome::Tia;
    }
    EventOutcome::NoEvent
}

/// Result of applying the "no event" rollover rule to an acute cardiac state.
/// `None` means "unchanged" (the cardiac state was not acute, or the rollover
/// target is itself, e.g. chronic states with no further rollover).
pub fn acute_rollover(state: CardiacState) -> Option<CardiacState> {
    match state {
        CardiacState::AcuteMI => Some(CardiacState::PostMI),
        CardiacState::AcuteIschemicStroke | CardiacState::AcuteHemorrhagicStroke => {
            Some(CardiacState::PostStroke)
        }
        CardiacState::AcuteHF => Some(CardiacState::ChronicHF),
        CardiacState::TIA => Some(CardiacState::NoAcuteEvent),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probs() -> TransProbs {
        TransProbs {
            cv_death: 0.01,
            non_cv_death: 0.02,
            mi: 0.03,
            hemorrhagic_stroke: 0.01,
            ischemic_stroke: 0.02,
            hf: 0.01,
            tia: 0.01,
        }
    }

    #[test]
    fn walks_fixed_order_correctly() {
        let p = probs();
        assert_eq!(sample_event(&p, 0.005), EventOutcome::CvDeath);
        assert_eq!(sample_event(&p, 0.02), EventOutcome::NonCvDeath);
        assert_eq!(sample_event(&p, 0.05), EventOutcome::Mi);
        assert_eq!(sample_event(&p, 0.999), EventOutcome::NoEvent);
    }

    #[test]
    fn zero_probabilities_always_no_event() {
        let p = TransProbs::default();
        assert_eq!(sample_event(&p, 0.0), EventOutcome::NoEvent);
        assert_eq!(sample_event(&p, 0.9999), EventOutcome::NoEvent);
    }

    #[test]
    fn acute_rollover_maps_each_acute_state() {
        assert_eq!(acute_rollover(CardiacState::AcuteMI), Some(CardiacState::PostMI));
        assert_eq!(
            acute_rollover(CardiacState::AcuteIschemicStroke),
            Some(CardiacState::PostStroke)
        );
        assert_eq!(
            acute_rollover(CardiacState::AcuteHemorrhagicStroke),
            Some(CardiacState::PostStroke)
        );
        assert_eq!(acute_rollover(CardiacState::AcuteHF), Some(CardiacState::ChronicHF));
        assert_eq!(acute_rollover(CardiacState::TIA), Some(CardiacState::NoAcuteEvent));
        assert_eq!(acute_rollover(CardiacState::PostMI), None);
        assert_eq!(acute_rollover(CardiacState::NoAcuteEvent), None);
    }
}
