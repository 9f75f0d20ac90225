//! Struct-of-arrays patient buffer: one contiguous column per field, N patients.
//!
//! Grounded on the teacher's `policy::data::Policy` field list, restructured from
//! one record per policy to one `Vec` per field — the layout spec.md §3 mandates for
//! cache/vectorization behavior across thousands of patients times thousands of PSA
//! replications. `PatientStore::reset_from` is the columnwise copy spec.md's
//! "Lifecycle" paragraph calls for between PSA replications; it reuses the `Vec`
//! allocations already sized (`clone_from`), matching the teacher's
//! `ScenarioRunner::run` note that cloning the (far smaller) `Assumptions` struct
//! costs "~0.3us" and is done freely per run.

use super::enums::{CardiacState, DippingStatus, NeuroState, RenalState, Sex, Treatment};

/// Sentinel for "never happened yet" time-since-event columns, per spec.md §9.
pub const NEVER: f64 = f64::NAN;

/// True if a time-since-event value is the "never" sentinel.
pub fn is_never(x: f64) -> bool {
    x.is_nan()
}

/// Struct-of-arrays patient population buffer.
///
/// Every column has length `n`. Index `i` refers to the same patient across all
/// columns. The kernel and treatment/transition modules index into these `Vec`s
/// directly rather than constructing a per-patient struct, to avoid an
/// allocate-and-copy on every cycle.
#[derive(Debug, Clone)]
pub struct PatientStore {
    n: usize,

    // Demographics
    pub age: Vec<f64>,
    pub sex: Vec<Sex>,

    // Blood pressure
    pub baseline_sbp: Vec<f64>,
    pub baseline_dbp: Vec<f64>,
    pub current_sbp: Vec<f64>,
    pub current_dbp: Vec<f64>,
    pub true_mean_sbp: Vec<f64>,
    pub white_coat_offset: Vec<f64>,

    // Renal biomarkers
    pub egfr: Vec<f64>,
    pub uacr: Vec<f64>,

    // Lipids
    pub total_cholesterol: Vec<f64>,
    pub hdl: Vec<f64>,

    // Comorbidities (boolean-as-bool; kept as bool columns, not bit-packed, to match
    // the teacher's preference for plain typed fields over bitset micro-optimization)
    pub diabetes: Vec<bool>,
    pub smoker: Vec<bool>,
    pub heart_failure: Vec<bool>,
    pub atrial_fibrillation: Vec<bool>,
    pub on_sglt2i: Vec<bool>,
    pub primary_aldosteronism: Vec<bool>,
    pub renal_artery_stenosis: Vec<bool>,
    pub pheochromocytoma: Vec<bool>,
    pub osa: Vec<bool>,

    // Anthropometrics
    pub bmi: Vec<f64>,

    // Potassium safety
    pub serum_k: Vec<f64>,
    pub hyperkalemia_flag: Vec<bool>,
    pub hyperkalemia_history_count: Vec<u32>,
    pub on_k_binder: Vec<bool>,
    pub mra_dose_reduced: Vec<bool>,

    // Adherence
    pub is_adherent: Vec<bool>,
    pub sdi_score: Vec<f64>,
    pub dipping_status: Vec<DippingStatus>,
    pub time_since_adherence_change: Vec<f64>,

    // State machines
    pub cardiac: Vec<CardiacState>,
    pub renal: Vec<RenalState>,
    pub neuro: Vec<NeuroState>,
    pub treatment: Vec<Treatment>,

    // Event history
    pub prior_mi_count: Vec<u32>,
    pub prior_any_stroke_count: Vec<u32>,
    pub prior_ischemic_stroke_count: Vec<u32>,
    pub prior_hemorrhagic_stroke_count: Vec<u32>,
    pub prior_tia_count: Vec<u32>,
    pub time_since_last_cv_event: Vec<f64>,
    pub time_since_last_tia: Vec<f64>,

    // Time
    pub time_in_simulation: Vec<f64>,
    pub time_in_cardiac_state: Vec<f64>,
    pub time_in_renal_state: Vec<f64>,
    pub time_in_neuro_state: Vec<f64>,
    pub time_in_treatment_state: Vec<f64>,

    // Outcome accumulators
    pub cum_discounted_direct_cost: Vec<f64>,
    pub cum_discounted_indirect_cost: Vec<f64>,
    pub cum_discounted_qaly: Vec<f64>,
    pub cum_life_years: Vec<f64>,
    pub cum_months_controlled: Vec<f64>,
    pub cum_months_uncontrolled: Vec<f64>,

    // Treatment caches
    pub base_treatment_effect: Vec<f64>,
    pub active_treatment_effect: Vec<f64>,
    /// Whether `base_treatment_effect` has been sampled yet for this patient's
    /// current treatment assignment (first-assignment sampling per spec.md §4.3).
    pub treatment_effect_sampled: Vec<bool>,

    // Phenotype modifiers (read-only during simulation, precomputed at baseline)
    pub phenotype_mi_mult: Vec<f64>,
    pub phenotype_stroke_mult: Vec<f64>,
    pub phenotype_hf_mult: Vec<f64>,
    pub phenotype_esrd_mult: Vec<f64>,
    pub phenotype_death_mult: Vec<f64>,
    pub treatment_response_mult: Vec<f64>,

    // Clinical flags
    pub num_antihypertensives: Vec<u32>,
    pub use_kfre_model: Vec<bool>,
}

impl PatientStore {
    /// Number of patients in the store.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// A patient is alive iff cardiac is not a death state and renal is not
    /// RenalDeath, per spec.md §3 invariants.
    pub fn is_alive(&self, i: usize) -> bool {
        !self.cardiac[i].is_dead() && !self.renal[i].is_dead()
    }

    /// Build an all-zero store of size `n`, used as the mutable working copy the
    /// kernel advances. Callers populate it via `reset_from` against a frozen
    /// baseline template, never by hand-filling this constructor's output.
    pub fn zeroed(n: usize) -> Self {
        macro_rules! col {
            ($val:expr) => {
                vec![$val; n]
            };
        }
        Self {
            n,
            age: col![0.0],
            sex: col![Sex::Male],
            baseline_sbp: col![0.0],
            baseline_dbp: col![0.0],
            current_sbp: col![0.0],
            current_dbp: col![0.0],
            true_mean_sbp: col![0.0],
            white_coat_offset: col![0.0],
            egfr: col![90.0],
            uacr: col![0.0],
            total_cholesterol: col![0.0],
            hdl: col![0.0],
            diabetes: col![false],
            smoker: col![false],
            heart_failure: col![false],
            atrial_fibrillation: col![false],
            on_sglt2i: col![false],
            primary_aldosteronism: col![false],
            renal_artery_stenosis: col![false],
            pheochromocytoma: col![false],
            osa: col![false],
            bmi: col![25.0],
            serum_k: col![4.2],
            hyperkalemia_flag: col![false],
            hyperkalemia_history_count: col![0],
            on_k_binder: col![false],
            mra_dose_reduced: col![false],
            is_adherent: col![true],
            sdi_score: col![0.0],
            dipping_status: col![DippingStatus::Normal],
            time_since_adherence_change: col![0.0],
            cardiac: col![CardiacState::NoAcuteEvent],
            renal: col![RenalState::Ckd1_2],
            neuro: col![NeuroState::Normal],
            treatment: col![Treatment::StandardCare],
            prior_mi_count: col![0],
            prior_any_stroke_count: col![0],
            prior_ischemic_stroke_count: col![0],
            prior_hemorrhagic_stroke_count: col![0],
            prior_tia_count: col![0],
            time_since_last_cv_event: col![NEVER],
            time_since_last_tia: col![NEVER],
            time_in_simulation: col![0.0],
            time_in_cardiac_state: col![0.0],
            time_in_renal_state: col![0.0],
            time_in_neuro_state: col![0.0],
            time_in_treatment_state: col![0.0],
            cum_discounted_direct_cost: col![0.0],
            cum_discounted_indirect_cost: col![0.0],
            cum_discounted_qaly: col![0.0],
            cum_life_years: col![0.0],
            cum_months_controlled: col![0.0],
            cum_months_uncontrolled: col![0.0],
            base_treatment_effect: col![0.0],
            active_treatment_effect: col![0.0],
            treatment_effect_sampled: col![false],
            phenotype_mi_mult: col![1.0],
            phenotype_stroke_mult: col![1.0],
            phenotype_hf_mult: col![1.0],
            phenotype_esrd_mult: col![1.0],
            phenotype_death_mult: col![1.0],
            treatment_response_mult: col![1.0],
            num_antihypertensives: col![1],
            use_kfre_model: col![true],
        }
    }

    /// Columnwise copy from a frozen template into `self`, reusing `self`'s
    /// existing allocations (`Vec::clone_from` drops no capacity when lengths
    /// match). This is the PSA driver's per-replication reset, called once per
    /// arm per replication instead of allocating a fresh store.
    pub fn reset_from(&mut self, template: &PatientStore) {
        debug_assert_eq!(self.n, template.n);
        self.age.clone_from(&template.age);
        self.sex.clone_from(&template.sex);
        self.baseline_sbp.clone_from(&template.baseline_sbp);
        self.baseline_dbp.clone_from(&template.baseline_dbp);
        self.current_sbp.clone_from(&template.current_sbp);
        self.current_dbp.clone_from(&template.current_dbp);
        self.true_mean_sbp.clone_from(&template.true_mean_sbp);
        self.white_coat_offset.clone_from(&template.white_coat_offset);
        self.egfr.clone_from(&template.egfr);
        self.uacr.clone_from(&template.uacr);
        self.total_cholesterol.clone_from(&template.total_cholesterol);
        self.hdl.clone_from(&template.hdl);
        self.diabetes.clone_from(&template.diabetes);
        self.smoker.clone_from(&template.smoker);
        self.heart_failure.clone_from(&template.heart_failure);
        self.atrial_fibrillation.clone_from(&template.atrial_fibrillation);
        self.on_sglt2i.clone_from(&template.on_sglt2i);
        self.primary_aldosteronism.clone_from(&template.primary_aldosteronism);
        self.renal_artery_stenosis.clone_from(&template.renal_artery_stenosis);
        self.pheochromocytoma.clone_from(&template.pheochromocytoma);
        self.osa.clone_from(&template.osa);
        self.bmi.clone_from(&template.bmi);
        self.serum_k.clone_from(&template.serum_k);
        self.hyperkalemia_flag.clone_from(&template.hyperkalemia_flag);
        self.hyperkalemia_history_count.clone_from(&template.hyperkalemia_history_count);
        self.on_k_binder.clone_from(&template.on_k_binder);
        self.mra_dose_reduced.clone_from(&template.mra_dose_reduced);
        self.is_adherent.clone_from(&template.is_adherent);
        self.sdi_score.clone_from(&template.sdi_score);
        self.dipping_status.clone_from(&template.dipping_status);
        self.time_since_adherence_change.clone_from(&template.time_since_adherence_change);
        self.cardiac.clone_from(&template.cardiac);
        self.renal.clone_from(&template.renal);
        self.neuro.clone_from(&template.neuro);
        self.treatment.clone_from(&template.treatment);
        self.prior_mi_count.clone_from(&template.prior_mi_count);
        self.prior_any_stroke_count.clone_from(&template.prior_any_stroke_count);
        self.prior_ischemic_stroke_count.clone_from(&template.prior_ischemic_stroke_count);
        self.prior_hemorrhagic_stroke_count.clone_from(&template.prior_hemorrhagic_stroke_count);
        self.prior_tia_count.clone_from(&template.prior_tia_count);
        self.time_since_last_cv_event.clone_from(&template.time_since_last_cv_event);
        self.time_since_last_tia.clone_from(&template.time_since_last_tia);
        self.time_in_simulation.clone_from(&template.time_in_simulation);
        self.time_in_cardiac_state.clone_from(&template.time_in_cardiac_state);
        self.time_in_renal_state.clone_from(&template.time_in_renal_state);
        self.time_in_neuro_state.clone_from(&template.time_in_neuro_state);
        self.time_in_treatment_state.clone_from(&template.time_in_treatment_state);
        self.cum_discounted_direct_cost.clone_from(&template.cum_discounted_direct_cost);
        self.cum_discounted_indirect_cost.clone_from(&template.cum_discounted_indirect_cost);
        self.cum_discounted_qaly.clone_from(&template.cum_discounted_qaly);
        self.cum_life_years.clone_from(&template.cum_life_years);
        self.cum_months_controlled.clone_from(&template.cum_months_controlled);
        self.cum_months_uncontrolled.clone_from(&template.cum_months_uncontrolled);
        self.base_treatment_effect.clone_from(&template.base_treatment_effect);
        self.active_treatment_effect.clone_from(&template.active_treatment_effect);
        self.treatment_effect_sampled.clone_from(&template.treatment_effect_sampled);
        self.phenotype_mi_mult.clone_from(&template.phenotype_mi_mult);
        self.phenotype_stroke_mult.clone_from(&template.phenotype_stroke_mult);
        self.phenotype_hf_mult.clone_from(&template.phenotype_hf_mult);
        self.phenotype_esrd_mult.clone_from(&template.phenotype_esrd_mult);
        self.phenotype_death_mult.clone_from(&template.phenotype_death_mult);
        self.treatment_response_mult.clone_from(&template.treatment_response_mult);
        self.num_antihypertensives.clone_from(&template.num_antihypertensives);
        self.use_kfre_model.clone_from(&template.use_kfre_model);
    }
}
