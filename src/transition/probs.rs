//! Per-cycle cause-specific monthly probability assembly and competing-risk
//! composition.
//!
//! Grounded on `src/projection/engine.rs::calculate_decrements` in the teacher (one
//! method mutating a per-period scratch row of named decrements) generalized from a
//! two-cause model (mortality, lapse) to the seven-cause competing-risk model
//! spec.md §4.2 describes. `TransProbs` plays the role of the teacher's per-period
//! row but is a stack scratch struct reused per patient, per spec.md §9's note on a
//! pre-allocated `TransProbs` struct.

use crate::patient::enums::{CardiacState, DippingStatus, RenalState, Sex};
use crate::risk::conversions::{monthly_from_annual, ten_year_to_monthly};
use crate::risk::life_table::LifeTable;
use crate::risk::prevent::{self, PreventInputs};

/// Base annual mortality assumed for ESRD (dialysis-dependent) patients absent any
/// adjustment. Used both as the CVDeath composition increment and as the base rate
/// for the kernel's dedicated ESRD non-CV mortality check (step 16).
pub const ESRD_MORTALITY_BASE: f64 = 0.15;

/// Stack-allocated scratch struct holding the seven cause-specific monthly
/// probabilities for one patient in one cycle. Reused across patients rather than
/// reallocated, per spec.md §9.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransProbs {
    pub cv_death: f64,
    pub non_cv_death: f64,
    pub mi: f64,
    pub hemorrhagic_stroke: f64,
    pub ischemic_stroke: f64,
    pub hf: f64,
    pub tia: f64,
}

impl TransProbs {
    pub fn sum(&self) -> f64 {
        self.cv_death + self.non_cv_death + self.mi + self.hemorrhagic_stroke + self.ischemic_stroke + self.hf + self.tia
    }

    /// Case-fatality-only probabilities for the acute short-circuit branch.
    pub fn acute_case_fatality(cv_death: f64) -> Self {
        TransProbs { cv_death, ..Default::default() }
    }
}

/// Case-fatality rates for the acute short-circuit, per spec.md §4.2.
pub fn case_fatality_rate(state: CardiacState) -> f64 {
    match state {
        CardiacState::AcuteMI => 0.08,
        CardiacState::AcuteIschemicStroke => 0.10,
        CardiacState::AcuteHemorrhagicStroke => 0.25,
        CardiacState::AcuteHF => 0.05,
        _ => 0.0,
    }
}

/// `clamp(1 - (m-1)*c, 0.5, 1.5)` — treatment risk factor per outcome, spec.md §4.2.
pub fn treatment_risk_factor(m: f64, c: f64) -> f64 {
    (1.0 - (m - 1.0) * c).clamp(0.5, 1.5)
}

pub const TRF_MI: f64 = 0.30;
pub const TRF_STROKE: f64 = 0.40;
pub const TRF_HF: f64 = 0.50;
pub const TRF_ESRD: f64 = 0.55;
pub const TRF_DEATH: f64 = 0.35;

/// Hemorrhagic-fraction split of total stroke risk.
pub fn hemorrhagic_fraction(
    dynamic: bool,
    age: f64,
    sbp: f64,
    has_af: bool,
    prior_tia: bool,
) -> f64 {
    if !dynamic {
        return 0.15;
    }
    let mut frac = 0.15;
    frac += if age >= 80.0 {
        0.05
    } else if age >= 70.0 {
        0.03
    } else if age >= 60.0 {
        0.01
    } else {
        0.0
    };
    frac += if sbp >= 180.0 {
        0.10
    } else if sbp >= 160.0 {
        0.05
    } else if sbp >= 140.0 {
        0.02
    } else {
        0.0
    };
    if has_af {
        frac -= 0.05;
    }
    if prior_tia {
        frac -= 0.03;
    }
    frac.clamp(0.05, 0.40)
}

/// All per-patient scalar inputs `compute` needs, pulled from the SoA store by the
/// kernel before the call (transition logic itself stays store-agnostic and
/// testable in isolation).
#[derive(Debug, Clone, Copy)]
pub struct TransitionInputs {
    pub cardiac: CardiacState,
    pub renal: RenalState,
    pub sex: Sex,
    pub age: f64,
    pub true_mean_sbp: f64,
    pub egfr: f64,
    pub total_cholesterol: f64,
    pub hdl: f64,
    pub bmi: f64,
    pub bp_treated: bool,
    pub diabetes: bool,
    pub smoker: bool,
    pub uacr: Option<f64>,
    pub has_af: bool,
    pub on_sglt2i: bool,
    pub dipping: DippingStatus,
    pub prior_mi_count: u32,
    pub prior_any_stroke_count: u32,
    pub prior_tia_count: u32,
    pub time_in_cardiac_state: f64,
    pub phenotype_mi_mult: f64,
    pub phenotype_stroke_mult: f64,
    pub phenotype_hf_mult: f64,
    pub treatment_response_mult: f64,
    pub use_dynamic_stroke_subtypes: bool,
    pub has_heart_failure_comorbidity: bool,
}

/// CVDeath chronic-state base annual rate, before increments, per spec.md §4.2.
fn cv_death_base_annual(cardiac: CardiacState, time_in_state: f64) -> f64 {
    let in_year_one = time_in_state < 12.0;
    match cardiac {
        CardiacState::PostMI => if in_year_one { 0.05 } else { 0.03 },
        CardiacState::PostStroke => if in_year_one { 0.10 } else { 0.05 },
        CardiacState::ChronicHF => 0.08,
        _ => 0.01,
    }
}

/// Assemble the seven cause-specific monthly probabilities for one non-acute
/// patient, then apply competing-risk composition.
pub fn compute(
    inputs: &TransitionInputs,
    life_table: &LifeTable,
    use_competing_risks: bool,
) -> TransProbs {
    if inputs.cardiac.is_acute() {
        return TransProbs::acute_case_fatality(case_fatality_rate(inputs.cardiac));
    }

    let prevent_inputs = PreventInputs {
        sex: inputs.sex,
        age: inputs.age,
        sbp: inputs.true_mean_sbp,
        egfr: inputs.egfr,
        total_cholesterol: inputs.total_cholesterol,
        hdl: inputs.hdl,
        bmi: inputs.bmi,
        bp_treated: inputs.bp_treated,
        diabetes: inputs.diabetes,
        smoker: inputs.smoker,
        uacr: inputs.uacr,
    };
    let ten_year_total = prevent::ten_year_cvd_risk(&prevent_inputs);

    let dipping_mult = inputs.dipping.risk_multiplier();
    let mi_prior_mult = if inputs.prior_mi_count > 0 { 2.5 } else { 1.0 };
    let stroke_prior_mult = {
        let mut m = if inputs.prior_any_stroke_count > 0 { 3.0 } else { 1.0 };
        if inputs.prior_tia_count > 0 {
            m *= 2.0;
        }
        m
    };

    let mi_trf = treatment_risk_factor(inputs.treatment_response_mult, TRF_MI);
    let stroke_trf = treatment_risk_factor(inputs.treatment_response_mult, TRF_STROKE);
    let hf_trf = treatment_risk_factor(inputs.treatment_response_mult, TRF_HF);

    let mi_ten_year = ten_year_total * prevent::MI_PROPORTION * mi_prior_mult;
    let mi = ten_year_to_monthly(mi_ten_year) * inputs.phenotype_mi_mult * dipping_mult * mi_trf;

    let stroke_dipping_mult = if dipping_mult > 1.0 { dipping_mult * 1.1 } else { 1.0 };
    let stroke_ten_year = ten_year_total * prevent::STROKE_PROPORTION * stroke_prior_mult;
    let stroke_total = ten_year_to_monthly(stroke_ten_year)
        * inputs.phenotype_stroke_mult
        * stroke_dipping_mult
        * stroke_trf;

    let hem_frac = hemorrhagic_fraction(
        inputs.use_dynamic_stroke_subtypes,
        inputs.age,
        inputs.true_mean_sbp,
        inputs.has_af,
        inputs.prior_tia_count > 0,
    );
    let hemorrhagic_stroke = stroke_total * hem_frac;
    let ischemic_stroke = stroke_total * (1.0 - hem_frac);

    let mut tia = 0.33 * ischemic_stroke;
    if inputs.has_af {
        tia *= 1.5;
    }

    let hf = if matches!(inputs.cardiac, CardiacState::ChronicHF) {
        0.0
    } else {
        let hf_ten_year = ten_year_total * prevent::HF_PROPORTION;
        let sglt2_mult = if inputs.on_sglt2i { 0.70 } else { 1.0 };
        ten_year_to_monthly(hf_ten_year) * inputs.phenotype_hf_mult * sglt2_mult * hf_trf
    };

    let mut cv_death_annual = cv_death_base_annual(inputs.cardiac, inputs.time_in_cardiac_state);
    if inputs.has_heart_failure_comorbidity && !matches!(inputs.cardiac, CardiacState::ChronicHF) {
        cv_death_annual += 0.03;
    }
    if inputs.renal == RenalState::Esrd {
        cv_death_annual += 0.6 * ESRD_MORTALITY_BASE;
    }
    cv_death_annual = cv_death_annual.min(0.20);
    let cv_death = monthly_from_annual(cv_death_annual);

    let non_cv_death = life_table.monthly_mortality(inputs.sex, inputs.age);

    let raw = TransProbs {
        cv_death,
        non_cv_death,
        mi,
        hemorrhagic_stroke,
        ischemic_stroke,
        hf,
        tia,
    };

    if use_competing_risks {
        compose_proper(raw)
    } else {
        compose_legacy_cap(raw)
    }
}

/// Legacy cap: if the sum exceeds 0.95, scale all seven uniformly to sum 0.95.
fn compose_legacy_cap(raw: TransProbs) -> TransProbs {
    let sum = raw.sum();
    if sum <= 0.95 {
        return raw;
    }
    let scale = 0.95 / sum;
    TransProbs {
        cv_death: raw.cv_death * scale,
        non_cv_death: raw.non_cv_death * scale,
        mi: raw.mi * scale,
        hemorrhagic_stroke: raw.hemorrhagic_stroke * scale,
        ischemic_stroke: raw.ischemic_stroke * scale,
        hf: raw.hf * scale,
        tia: raw.tia * scale,
    }
}

/// Proper competing-risk composition via cumulative hazards.
fn compose_proper(raw: TransProbs) -> TransProbs {
    let hazards = [
        raw.cv_death,
        raw.non_cv_death,
        raw.mi,
        raw.hemorrhagic_stroke,
        raw.ischemic_stroke,
        raw.hf,
        raw.tia,
    ]
    .map(|p| -(1.0 - p.clamp(0.0, 1.0 - 1e-12)).ln());

    let h_total: f64 = hazards.iter().sum();
    if h_total <= 0.0 {
        return TransProbs::default();
    }
    let p_any = 1.0 - (-h_total).exp();
    let shares = hazards.map(|h| (h / h_total) * p_any);
    TransProbs {
        cv_death: shares[0],
        non_cv_death: shares[1],
        mi: shares[2],
        hemorrhagic_stroke: shares[3],
        ischemic_stroke: shares[4],
        hf: shares[5],
        tia: shares[6],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::life_table::LifeTableSet;

    fn inputs() -> TransitionInputs {
        TransitionInputs {
            cardiac: CardiacState::NoAcuteEvent,
            renal: RenalState::Ckd1_2,
            sex: Sex::Male,
            age: 60.0,
            true_mean_sbp: 150.0,
            egfr: 70.0,
            total_cholesterol: 190.0,
            hdl: 45.0,
            bmi: 28.0,
            bp_treated: true,
            diabetes: false,
            smoker: false,
            uacr: None,
            has_af: false,
            on_sglt2i: false,
            dipping: DippingStatus::Normal,
            prior_mi_count: 0,
            prior_any_stroke_count: 0,
            prior_tia_count: 0,
            time_in_cardiac_state: 0.0,
            phenotype_mi_mult: 1.0,
            phenotype_stroke_mult: 1.0,
            phenotype_hf_mult: 1.0,
            treatment_response_mult: 1.0,
            use_dynamic_stroke_subtypes: true,
            has_heart_failure_comorbidity: false,
        }
    }

    #[test]
    fn acute_short_circuit_only_emits_cv_death() {
        let mut i = inputs();
        i.cardiac = CardiacState::AcuteMI;
        let set = LifeTableSet::with_builtin();
        let table = set.get("US").unwrap();
        let probs = compute(&i, table, true);
        assert_eq!(probs.cv_death, 0.08);
        assert_eq!(probs.mi, 0.0);
        assert_eq!(probs.hf, 0.0);
        assert_eq!(probs.tia, 0.0);
    }

    #[test]
    fn prior_mi_at_least_doubles_mi_risk() {
        let set = LifeTableSet::with_builtin();
        let table = set.get("US").unwrap();
        let base = compute(&inputs(), table, true);
        let mut with_prior = inputs();
        with_prior.prior_mi_count = 1;
        let boosted = compute(&with_prior, table, true);
        assert!(boosted.mi >= base.mi * 2.0);
    }

    #[test]
    fn composed_probabilities_sum_to_at_most_one() {
        let set = LifeTableSet::with_builtin();
        let table = set.get("US").unwrap();
        let mut extreme = inputs();
        extreme.age = 79.0;
        extreme.true_mean_sbp = 200.0;
        extreme.prior_mi_count = 3;
        extreme.prior_any_stroke_count = 2;
        extreme.prior_tia_count = 2;
        extreme.total_cholesterol = 350.0;
        extreme.hdl = 25.0;
        extreme.smoker = true;
        extreme.diabetes = true;
        let probs = compute(&extreme, table, true);
        assert!(probs.sum() <= 1.0 + 1e-9);
    }

    #[test]
    fn reverse_dipper_at_least_normal_dipper_stroke_risk() {
        let set = LifeTableSet::with_builtin();
        let table = set.get("US").unwrap();
        let mut normal = inputs();
        normal.dipping = DippingStatus::Normal;
        let mut non_dipper = inputs();
        non_dipper.dipping = DippingStatus::NonDipper;
        let mut reverse = inputs();
        reverse.dipping = DippingStatus::ReverseDipper;

        let n = compute(&normal, table, true);
        let nd = compute(&non_dipper, table, true);
        let rd = compute(&reverse, table, true);
        let stroke = |p: &TransProbs| p.hemorrhagic_stroke + p.ischemic_stroke;
        assert!(stroke(&rd) >= stroke(&nd));
        assert!(stroke(&nd) >= stroke(&n));
    }

    #[test]
    fn higher_sbp_increases_hemorrhagic_fraction() {
        let low = hemorrhagic_fraction(true, 60.0, 120.0, false, false);
        let high = hemorrhagic_fraction(true, 60.0, 190.0, false, false);
        assert!(high > low);
    }
}
