//! State-machine and categorical enumerations for the patient store
//!
//! All enums are compact C-like tags, matching the teacher's `policy::data`
//! convention: plain `Copy` enums with no payload, switched on in the kernel via
//! `match`, never boxed or dynamically dispatched.

use serde::{Deserialize, Serialize};

/// Cardiac state machine, including acute and chronic post-event states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardiacState {
    NoAcuteEvent,
    AcuteMI,
    PostMI,
    AcuteIschemicStroke,
    AcuteHemorrhagicStroke,
    PostStroke,
    TIA,
    AcuteHF,
    ChronicHF,
    CVDeath,
    NonCVDeath,
}

impl CardiacState {
    /// True for the four "acute event this month" states that short-circuit the
    /// transition engine to only emit a case-fatality probability.
    pub fn is_acute(&self) -> bool {
        matches!(
            self,
            CardiacState::AcuteMI
                | CardiacState::AcuteIschemicStroke
                | CardiacState::AcuteHemorrhagicStroke
                | CardiacState::AcuteHF
        )
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, CardiacState::CVDeath | CardiacState::NonCVDeath)
    }
}

/// Renal (CKD staging) state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenalState {
    Ckd1_2,
    Ckd3a,
    Ckd3b,
    Ckd4,
    Esrd,
    RenalDeath,
}

impl RenalState {
    /// Renal staging from eGFR, per spec.md §4.3 "Time advance".
    /// Never moves a patient out of ESRD/RenalDeath based on eGFR alone; those two
    /// states are sticky and only RenalDeath is truly terminal.
    pub fn from_egfr(egfr: f64, current: RenalState) -> RenalState {
        if matches!(current, RenalState::RenalDeath) {
            return RenalState::RenalDeath;
        }
        let staged = if egfr >= 60.0 {
            RenalState::Ckd1_2
        } else if egfr >= 45.0 {
            RenalState::Ckd3a
        } else if egfr >= 30.0 {
            RenalState::Ckd3b
        } else if egfr >= 15.0 {
            RenalState::Ckd4
        } else {
            RenalState::Esrd
        };
        // Never un-stage out of ESRD once reached via eGFR decline.
        if matches!(current, RenalState::Esrd) {
            RenalState::Esrd
        } else {
            staged
        }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, RenalState::RenalDeath)
    }
}

/// Cognitive state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeuroState {
    Normal,
    Mci,
    Dementia,
}

/// Treatment arm assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Treatment {
    /// High-effect fixed-dose-combination intervention arm.
    Intervention,
    /// Mineralocorticoid receptor antagonist (spironolactone-class).
    Mra,
    StandardCare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

/// Overnight blood-pressure dipping pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DippingStatus {
    Normal,
    NonDipper,
    ReverseDipper,
}

impl DippingStatus {
    /// Multiplier applied to stroke/MI risk equations, per spec.md §4.2.
    pub fn risk_multiplier(&self) -> f64 {
        match self {
            DippingStatus::Normal => 1.0,
            DippingStatus::NonDipper => 1.4,
            DippingStatus::ReverseDipper => 1.8,
        }
    }
}

/// The cause emitted by the transition engine's multinomial draw for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    CvDeath,
    NonCvDeath,
    Mi,
    HemorrhagicStroke,
    IschemicStroke,
    Hf,
    Tia,
    /// No event sampled this cycle; acute states still roll over to their chronic
    /// follow-on state per spec.md §4.2.
    NoEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acute_states_flagged() {
        assert!(CardiacState::AcuteMI.is_acute());
        assert!(CardiacState::AcuteHF.is_acute());
        assert!(!CardiacState::PostMI.is_acute());
        assert!(!CardiacState::NoAcuteEvent.is_acute());
    }

    #[test]
    fn renal_staging_monotone_and_sticky() {
        assert_eq!(RenalState::from_egfr(70.0, RenalState::Ckd1_2), RenalState::Ckd1_2);
        assert_eq!(RenalState::from_egfr(50.0, RenalState::Ckd1_2), RenalState::Ckd3a);
        assert_eq!(RenalState::from_egfr(10.0, RenalState::Ckd4), RenalState::Esrd);
        // Once ESRD, a spuriously higher eGFR reading never un-stages the patient.
        assert_eq!(RenalState::from_egfr(70.0, RenalState::Esrd), RenalState::Esrd);
        assert_eq!(RenalState::from_egfr(5.0, RenalState::RenalDeath), RenalState::RenalDeath);
    }
}
