//! One patient's one-cycle step, executed in the fixed 17-step order spec.md
//! §4.5 mandates. Grounded on
//! `src/projection/engine.rs::ProjectionEngine::calculate_month`, which orchestrates
//! its own smaller per-concern calculators (decrements, cashflows, benefit base) in
//! a fixed method-call order; generalized here from a four-step cohort-cashflow
//! order to the seventeen-step individual-patient order spec.md names.

use crate::config::{EconomicPerspective, SimConfig};
use crate::costs::constants::{AbsenteeismDays, CostConstants, UtilityConstants};
use crate::costs::{discount, drug, events, indirect, state_management, utility};
use crate::patient::enums::{CardiacState, EventOutcome, NeuroState, RenalState, Sex, Treatment};
use crate::patient::store::{is_never, PatientStore};
use crate::psa::params::PsaParams;
use crate::risk::conversions::monthly_from_annual;
use crate::risk::egfr_decline::{self, EgfrDeclineInputs};
use crate::risk::kfre::KfreInputs;
use crate::risk::life_table::LifeTable;
use crate::transition::{self, TransitionInputs};
use crate::treatment::{adherence, af, assignment, discontinuation, hyperkalemia, neuro, sbp, tia_conversion};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::aggregate::Aggregate;

pub struct StepContext<'a> {
    pub config: &'a SimConfig,
    pub psa: &'a PsaParams,
    pub cost_constants: &'a CostConstants,
    pub utility_constants: &'a UtilityConstants,
    pub absenteeism_days: &'a AbsenteeismDays,
    pub life_table: &'a LifeTable,
    pub treatment_response_params: &'a assignment::TreatmentResponseParams,
    pub discontinuation_rates: &'a discontinuation::DiscontinuationRates,
}

/// Runs the fixed 17-step cycle for one patient already confirmed alive at cycle
/// start. `t_start` is `time_in_simulation` at the start of this cycle (used for
/// the discount factor and the quarterly hyperkalemia check).
pub fn run_patient_cycle<R: Rng + ?Sized>(
    ctx: &StepContext,
    store: &mut PatientStore,
    i: usize,
    t_start: f64,
    agg: &mut Aggregate,
    rng: &mut R,
) {
    let cycle_len = ctx.config.cycle_length_months;
    let discount_factor = discount::discount_factor(
        t_start,
        ctx.config.discount_rate,
        cycle_len,
        ctx.config.use_half_cycle_correction,
    );

    // Step 1: adherence transition.
    let months_on_treatment = store.time_in_treatment_state[i];
    let months_since_cv_event =
        if is_never(store.time_since_last_cv_event[i]) { None } else { Some(store.time_since_last_cv_event[i]) };
    let new_adherent = adherence::step(
        store.is_adherent[i],
        months_on_treatment,
        store.age[i],
        store.sdi_score[i],
        store.treatment[i],
        store.hyperkalemia_history_count[i] > 0,
        matches!(store.sex[i], Sex::Male),
        months_since_cv_event,
        store.current_sbp[i],
        rng,
    );
    if new_adherent != store.is_adherent[i] {
        store.is_adherent[i] = new_adherent;
        store.time_since_adherence_change[i] = 0.0;
        store.active_treatment_effect[i] = assignment::active_effect(store.base_treatment_effect[i], new_adherent);
    }

    // Step 2: quarterly MRA hyperkalemia check.
    if matches!(store.treatment[i], Treatment::Mra) && hyperkalemia::is_due(t_start) {
        agg.total_direct_cost += ctx.cost_constants.hyperkalemia_lab_cost_quarterly * discount_factor;
        let action = hyperkalemia::check(store.serum_k[i], store.on_k_binder[i], store.mra_dose_reduced[i], rng);
        match action {
            hyperkalemia::Action::None => {}
            hyperkalemia::Action::StartBinder => {
                store.on_k_binder[i] = true;
                store.serum_k[i] -= 0.3;
                store.hyperkalemia_history_count[i] += 1;
                agg.total_direct_cost += ctx.cost_constants.potassium_binder_monthly * discount_factor;
            }
            hyperkalemia::Action::ReduceDose => {
                store.mra_dose_reduced[i] = true;
                store.base_treatment_effect[i] *= 0.5;
                store.active_treatment_effect[i] *= 0.5;
            }
            hyperkalemia::Action::Stop => {
                store.hyperkalemia_history_count[i] += 1;
                reassign_to_standard_care(store, i);
            }
        }
    }

    // Step 3: neuro progression.
    let prior_neuro = store.neuro[i];
    store.neuro[i] = neuro::step(store.neuro[i], store.age[i], store.true_mean_sbp[i], rng);
    if prior_neuro != NeuroState::Dementia && store.neuro[i] == NeuroState::Dementia {
        agg.dementia_count += 1;
    }

    // Step 4: AF onset.
    if !store.atrial_fibrillation[i] {
        let af_inputs = af::AfOnsetInputs {
            age: store.age[i],
            sbp: store.true_mean_sbp[i],
            primary_aldosteronism: store.primary_aldosteronism[i],
            heart_failure: store.heart_failure[i],
            diabetes: store.diabetes[i],
            bmi: store.bmi[i],
            treatment: store.treatment[i],
            is_adherent: store.is_adherent[i],
        };
        let p = af::monthly_onset_probability(&af_inputs);
        if rng.gen::<f64>() < p {
            store.atrial_fibrillation[i] = true;
            agg.new_af_count += 1;
            agg.total_direct_cost += events::af_onset_cost(ctx.cost_constants) * discount_factor;
        }
    }

    // Step 5: transition probabilities and event sampling.
    let trans_inputs = TransitionInputs {
        cardiac: store.cardiac[i],
        renal: store.renal[i],
        sex: store.sex[i],
        age: store.age[i],
        true_mean_sbp: store.true_mean_sbp[i],
        egfr: store.egfr[i],
        total_cholesterol: store.total_cholesterol[i],
        hdl: store.hdl[i],
        bmi: store.bmi[i],
        bp_treated: !matches!(store.treatment[i], Treatment::StandardCare),
        diabetes: store.diabetes[i],
        smoker: store.smoker[i],
        uacr: Some(store.uacr[i]),
        has_af: store.atrial_fibrillation[i],
        on_sglt2i: store.on_sglt2i[i],
        dipping: store.dipping_status[i],
        prior_mi_count: store.prior_mi_count[i],
        prior_any_stroke_count: store.prior_any_stroke_count[i],
        prior_tia_count: store.prior_tia_count[i],
        time_in_cardiac_state: store.time_in_cardiac_state[i],
        phenotype_mi_mult: store.phenotype_mi_mult[i],
        phenotype_stroke_mult: store.phenotype_stroke_mult[i],
        phenotype_hf_mult: store.phenotype_hf_mult[i],
        treatment_response_mult: store.treatment_response_mult[i],
        use_dynamic_stroke_subtypes: ctx.config.use_dynamic_stroke_subtypes,
        has_heart_failure_comorbidity: store.heart_failure[i],
    };
    let probs = transition::compute(&trans_inputs, ctx.life_table, ctx.config.use_competing_risks);
    let u = rng.gen::<f64>();
    let event = transition::sample_event(&probs, u);

    let mut died = false;
    match event {
        EventOutcome::NonCvDeath => {
            store.cardiac[i] = CardiacState::NonCVDeath;
            agg.non_cv_deaths += 1;
            died = true;
        }
        EventOutcome::CvDeath => {
            store.cardiac[i] = CardiacState::CVDeath;
            agg.cv_deaths += 1;
            died = true;
        }
        EventOutcome::NoEvent => {
            if let Some(rolled) = transition::acute_rollover(store.cardiac[i]) {
                store.cardiac[i] = rolled;
                store.time_in_cardiac_state[i] = 0.0;
            }
        }
        nonfatal => apply_nonfatal_event(ctx, store, i, nonfatal, discount_factor, agg),
    }

    if died {
        return;
    }

    // Step 7: TIA -> stroke conversion.
    if store.prior_tia_count[i] > 0 && !is_never(store.time_since_last_tia[i]) {
        let tia_inputs = tia_conversion::TiaConversionInputs {
            months_since_tia: store.time_since_last_tia[i],
            sbp: store.current_sbp[i],
            diabetes: store.diabetes[i],
            has_af: store.atrial_fibrillation[i],
        };
        let p = tia_conversion::monthly_probability(&tia_inputs);
        if rng.gen::<f64>() < p {
            apply_nonfatal_event(ctx, store, i, EventOutcome::IschemicStroke, discount_factor, agg);
        }
    }

    if !store.is_alive(i) {
        return;
    }

    // Step 9: monthly state-management + drug cost.
    let mgmt_cost = state_management::monthly_state_management_cost(
        store.cardiac[i],
        store.renal[i],
        store.current_sbp[i],
        store.atrial_fibrillation[i],
        ctx.cost_constants,
        ctx.psa,
    );
    let drug_cost = drug::monthly_drug_cost(store.treatment[i], store.on_sglt2i[i], ctx.cost_constants, ctx.psa);
    agg.total_direct_cost += (mgmt_cost + drug_cost) * discount_factor;

    // Step 10: societal productivity loss.
    if ctx.config.economic_perspective == EconomicPerspective::Societal {
        let loss = indirect::monthly_productivity_loss(store.cardiac[i], store.age[i], ctx.cost_constants);
        agg.total_indirect_cost += loss * discount_factor;
    }

    // Step 11: utility and QALY.
    let utility_inputs = utility::UtilityInputs {
        age: store.age[i],
        cardiac: store.cardiac[i],
        renal: store.renal[i],
        neuro: store.neuro[i],
        current_sbp: store.current_sbp[i],
        diabetes: store.diabetes[i],
        has_af: store.atrial_fibrillation[i],
        hyperkalemia_flag: store.hyperkalemia_flag[i],
        num_antihypertensives: store.num_antihypertensives[i],
    };
    let u = utility::monthly_utility(&utility_inputs, ctx.utility_constants, ctx.psa);
    agg.total_qaly += utility::monthly_qaly(u, discount_factor);

    // Step 12: life-years.
    agg.total_life_years += 1.0 / 12.0;

    // Step 13: controlled / uncontrolled months.
    if store.current_sbp[i] < 140.0 {
        agg.months_controlled += 1.0 / 12.0;
    } else {
        agg.months_uncontrolled += 1.0 / 12.0;
    }

    // Step 14: SBP update.
    let (new_sbp, new_true_mean, new_dbp) =
        sbp::step(store.current_sbp[i], store.white_coat_offset[i], store.active_treatment_effect[i], rng);
    store.current_sbp[i] = new_sbp;
    store.true_mean_sbp[i] = new_true_mean;
    store.current_dbp[i] = new_dbp;

    // Step 15: time advance.
    let renal_before = store.renal[i];
    advance_time(ctx, store, i, cycle_len, rng);
    if renal_before != RenalState::Esrd && store.renal[i] == RenalState::Esrd {
        agg.esrd_count += 1;
    }
    if renal_before != RenalState::Ckd4 && store.renal[i] == RenalState::Ckd4 {
        agg.ckd4_count += 1;
    }

    // Step 16: ESRD non-CV mortality.
    if store.renal[i] == RenalState::Esrd {
        let mut annual = 0.4 * transition::ESRD_MORTALITY_BASE;
        if store.age[i] >= 75.0 {
            annual *= 1.5;
        } else if store.age[i] >= 65.0 {
            annual *= 1.2;
        }
        if store.diabetes[i] {
            annual *= 1.3;
        }
        let monthly = monthly_from_annual(annual);
        if rng.gen::<f64>() < monthly {
            store.renal[i] = RenalState::RenalDeath;
            agg.renal_deaths += 1;
            return;
        }
    }

    // Step 17: discontinuation check.
    if !matches!(store.treatment[i], Treatment::StandardCare) {
        let male_mra_roll_hit = discontinuation::sample_male_mra_roll(rng);
        let sbp_reduction = store.base_treatment_effect[i];
        let p = discontinuation::monthly_probability(
            store.treatment[i],
            ctx.discontinuation_rates,
            sbp_reduction,
            store.time_in_treatment_state[i],
            matches!(store.sex[i], Sex::Male),
            male_mra_roll_hit,
            store.hyperkalemia_flag[i],
            store.sdi_score[i],
        );
        if rng.gen::<f64>() < p {
            reassign_to_standard_care(store, i);
        }
    }
}

fn reassign_to_standard_care(store: &mut PatientStore, i: usize) {
    store.treatment[i] = Treatment::StandardCare;
    store.mra_dose_reduced[i] = false;
    store.base_treatment_effect[i] = 0.0;
    store.active_treatment_effect[i] = 0.0;
    store.time_in_treatment_state[i] = 0.0;
}

fn apply_nonfatal_event(
    ctx: &StepContext,
    store: &mut PatientStore,
    i: usize,
    event: EventOutcome,
    discount_factor: f64,
    agg: &mut Aggregate,
) {
    match event {
        EventOutcome::Mi => {
            store.cardiac[i] = CardiacState::AcuteMI;
            store.prior_mi_count[i] += 1;
            agg.mi_events += 1;
        }
        EventOutcome::IschemicStroke => {
            store.cardiac[i] = CardiacState::AcuteIschemicStroke;
            store.prior_any_stroke_count[i] += 1;
            store.prior_ischemic_stroke_count[i] += 1;
            agg.any_stroke_events += 1;
            agg.ischemic_stroke_events += 1;
        }
        EventOutcome::HemorrhagicStroke => {
            store.cardiac[i] = CardiacState::AcuteHemorrhagicStroke;
            store.prior_any_stroke_count[i] += 1;
            store.prior_hemorrhagic_stroke_count[i] += 1;
            agg.any_stroke_events += 1;
            agg.hemorrhagic_stroke_events += 1;
        }
        EventOutcome::Hf => {
            store.cardiac[i] = CardiacState::AcuteHF;
            agg.hf_events += 1;
        }
        EventOutcome::Tia => {
            store.cardiac[i] = CardiacState::TIA;
            store.prior_tia_count[i] += 1;
            store.time_since_last_tia[i] = 0.0;
            agg.tia_events += 1;
        }
        EventOutcome::CvDeath | EventOutcome::NonCvDeath | EventOutcome::NoEvent => return,
    }
    store.time_in_cardiac_state[i] = 0.0;
    store.time_since_last_cv_event[i] = 0.0;

    agg.total_direct_cost += events::acute_event_cost(event, ctx.cost_constants, ctx.psa) * discount_factor;
    if ctx.config.economic_perspective == EconomicPerspective::Societal {
        agg.total_indirect_cost +=
            indirect::acute_absenteeism_cost(event, store.age[i], ctx.cost_constants, ctx.absenteeism_days)
                * discount_factor;
    }
}

fn advance_time<R: Rng + ?Sized>(ctx: &StepContext, store: &mut PatientStore, i: usize, months: f64, rng: &mut R) {
    store.age[i] += months / 12.0;
    store.time_in_simulation[i] += months;
    store.time_in_cardiac_state[i] += months;
    store.time_in_renal_state[i] += months;
    store.time_in_neuro_state[i] += months;
    store.time_in_treatment_state[i] += months;
    if !is_never(store.time_since_last_cv_event[i]) {
        store.time_since_last_cv_event[i] += months;
    }
    if !is_never(store.time_since_last_tia[i]) {
        store.time_since_last_tia[i] += months;
    }
    store.time_since_adherence_change[i] += months;

    let kfre_inputs = KfreInputs { sex: store.sex[i], age: store.age[i], egfr: store.egfr[i], uacr: store.uacr[i] };
    let decline_inputs = EgfrDeclineInputs {
        age: store.age[i],
        egfr: store.egfr[i],
        uacr: store.uacr[i],
        sbp: store.true_mean_sbp[i],
        diabetes: store.diabetes[i],
        on_sglt2i: store.on_sglt2i[i],
        use_kfre_model: ctx.config.use_kfre_model,
        kfre: kfre_inputs,
    };
    let annual_decline = egfr_decline::annual_decline(&decline_inputs);
    store.egfr[i] = (store.egfr[i] - annual_decline * (months / 12.0)).max(5.0);

    let mut k_target = if store.egfr[i] < 15.0 {
        5.2
    } else if store.egfr[i] < 30.0 {
        4.8
    } else if store.egfr[i] < 60.0 {
        4.5
    } else {
        4.2
    };
    if matches!(store.treatment[i], Treatment::Mra) {
        k_target += 0.4;
    }
    let noise_sd = if store.egfr[i] > 60.0 { 0.1 } else { 0.2 };
    let noise: f64 = Normal::new(0.0, noise_sd).unwrap().sample(rng);
    store.serum_k[i] += 0.2 * (k_target - store.serum_k[i]) + noise;
    store.serum_k[i] = store.serum_k[i].clamp(2.5, 7.0);
    store.hyperkalemia_flag[i] = store.serum_k[i] > 5.5;

    let new_renal = RenalState::from_egfr(store.egfr[i], store.renal[i]);
    if new_renal != store.renal[i] {
        store.renal[i] = new_renal;
        store.time_in_renal_state[i] = 0.0;
    }
}
