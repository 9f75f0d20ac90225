//! Fixed cost and utility constants not varied by the PSA parameter vector.
//!
//! spec.md §6 "PSA map keys" lists exactly which cost/disutility values are
//! PSA-varied; everything else named in §4.4 (background drug cost, renal-stage
//! management costs below ESRD, the AF/TIA one-time costs, indirect-cost wage
//! inputs, the fixed disutility values) is a constant of the model, analogous to
//! the teacher's `MortalityTable::default_age_factors()` baked-in tables.

#[derive(Debug, Clone, Copy)]
pub struct CostConstants {
    pub background_therapy_monthly: f64,
    pub mra_drug_monthly: f64,
    pub sglt2_drug_monthly: f64,
    pub hyperkalemia_lab_cost_quarterly: f64,
    pub potassium_binder_monthly: f64,
    pub af_onset_one_time: f64,
    pub tia_one_time: f64,
    pub controlled_htn_annual: f64,
    pub uncontrolled_htn_annual: f64,
    pub post_mi_annual: f64,
    pub af_annual: f64,
    pub ckd3a_annual: f64,
    pub ckd3b_annual: f64,
    pub ckd4_annual: f64,
    pub daily_wage: f64,
    pub disability_fraction_post_stroke: f64,
    pub disability_fraction_hf: f64,
}

impl Default for CostConstants {
    fn default() -> Self {
        CostConstants {
            background_therapy_monthly: 25.0,
            mra_drug_monthly: 15.0,
            sglt2_drug_monthly: 450.0,
            hyperkalemia_lab_cost_quarterly: 40.0,
            potassium_binder_monthly: 350.0,
            af_onset_one_time: 3200.0,
            tia_one_time: 4500.0,
            controlled_htn_annual: 600.0,
            uncontrolled_htn_annual: 900.0,
            post_mi_annual: 2800.0,
            af_annual: 2200.0,
            ckd3a_annual: 800.0,
            ckd3b_annual: 1600.0,
            ckd4_annual: 4200.0,
            daily_wage: 180.0,
            disability_fraction_post_stroke: 0.35,
            disability_fraction_hf: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UtilityConstants {
    pub acute_mi: f64,
    pub acute_ischemic_stroke: f64,
    pub acute_hemorrhagic_stroke: f64,
    pub tia: f64,
    pub acute_hf: f64,
    pub ckd3a: f64,
    pub ckd3b: f64,
    pub ckd4: f64,
    pub mci: f64,
    pub diabetes: f64,
    pub af: f64,
    pub hyperkalemia: f64,
}

impl Default for UtilityConstants {
    fn default() -> Self {
        UtilityConstants {
            acute_mi: 0.20,
            acute_ischemic_stroke: 0.35,
            acute_hemorrhagic_stroke: 0.50,
            tia: 0.10,
            acute_hf: 0.25,
            ckd3a: 0.01,
            ckd3b: 0.03,
            ckd4: 0.06,
            mci: 0.05,
            diabetes: 0.04,
            af: 0.05,
            hyperkalemia: 0.03,
        }
    }
}

/// Fixed absenteeism days per acute event type, societal perspective only.
#[derive(Debug, Clone, Copy)]
pub struct AbsenteeismDays {
    pub mi: f64,
    pub stroke: f64,
    pub tia: f64,
    pub hf: f64,
}

impl Default for AbsenteeismDays {
    fn default() -> Self {
        AbsenteeismDays { mi: 14.0, stroke: 21.0, tia: 3.0, hf: 7.0 }
    }
}
