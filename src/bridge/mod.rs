//! Bridge: marshals opaque JSON parameter maps into typed structs and back, per
//! spec.md §6 "External interfaces". The two entry points are the library's only
//! public surface; everything upstream (population generation, config loading,
//! PSA-draw orchestration) is an external collaborator.
//!
//! Grounded on `src/policy/loader.rs::CsvRow::to_policy` in the teacher: a flat
//! untyped row parsed field-by-field into a typed struct, with an unrecognized tag
//! returned as an error rather than silently defaulted. Generalized here from a
//! single CSV row to an N-patient struct-of-arrays column set, and from
//! `Box<dyn Error>` to the crate's structured `ContractError`.

use crate::config::SimConfig;
use crate::error::{ContractError, ReplicationError};
use crate::kernel::{Aggregate, Kernel};
use crate::patient::enums::{CardiacState, DippingStatus, NeuroState, RenalState, Sex, Treatment};
use crate::patient::store::{PatientStore, NEVER};
use crate::psa::params::PsaParams;
use crate::psa::{PsaDriver, PsaReplicationResult};
use crate::risk::life_table::LifeTable;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde_json::Value;
use std::collections::HashMap;

fn col<'a>(map: &'a HashMap<String, Value>, key: &str) -> Result<&'a Vec<Value>, ContractError> {
    map.get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| ContractError::MissingKey { key: key.to_string() })
}

fn check_len(key: &str, values: &[Value], n: usize) -> Result<(), ContractError> {
    if values.len() != n {
        return Err(ContractError::LengthMismatch { key: key.to_string(), expected: n, actual: values.len() });
    }
    Ok(())
}

fn f64_col(map: &HashMap<String, Value>, key: &str, n: usize) -> Result<Vec<f64>, ContractError> {
    let values = col(map, key)?;
    check_len(key, values, n)?;
    values.iter().map(|v| v.as_f64().ok_or_else(|| ContractError::NonFiniteValue { key: key.to_string() })).collect()
}

/// Like `f64_col` but treats JSON `null` as the "never" sentinel rather than an error.
fn f64_col_with_sentinel(map: &HashMap<String, Value>, key: &str, n: usize) -> Result<Vec<f64>, ContractError> {
    let values = col(map, key)?;
    check_len(key, values, n)?;
    values
        .iter()
        .map(|v| if v.is_null() { Ok(NEVER) } else { v.as_f64().ok_or_else(|| ContractError::NonFiniteValue { key: key.to_string() }) })
        .collect()
}

fn bool_col(map: &HashMap<String, Value>, key: &str, n: usize) -> Result<Vec<bool>, ContractError> {
    let values = col(map, key)?;
    check_len(key, values, n)?;
    values.iter().map(|v| v.as_bool().ok_or_else(|| ContractError::NonFiniteValue { key: key.to_string() })).collect()
}

fn u32_col(map: &HashMap<String, Value>, key: &str, n: usize) -> Result<Vec<u32>, ContractError> {
    let values = col(map, key)?;
    check_len(key, values, n)?;
    values
        .iter()
        .map(|v| v.as_u64().map(|x| x as u32).ok_or_else(|| ContractError::NonFiniteValue { key: key.to_string() }))
        .collect()
}

fn sex_col(map: &HashMap<String, Value>, key: &str, n: usize) -> Result<Vec<Sex>, ContractError> {
    let values = col(map, key)?;
    check_len(key, values, n)?;
    values
        .iter()
        .map(|v| match v.as_str() {
            Some("Male") => Ok(Sex::Male),
            Some("Female") => Ok(Sex::Female),
            other => Err(ContractError::UnknownEnumTag { field: key.to_string(), tag: format!("{other:?}") }),
        })
        .collect()
}

fn dipping_col(map: &HashMap<String, Value>, key: &str, n: usize) -> Result<Vec<DippingStatus>, ContractError> {
    let values = col(map, key)?;
    check_len(key, values, n)?;
    values
        .iter()
        .map(|v| match v.as_str() {
            Some("Normal") => Ok(DippingStatus::Normal),
            Some("NonDipper") => Ok(DippingStatus::NonDipper),
            Some("ReverseDipper") => Ok(DippingStatus::ReverseDipper),
            other => Err(ContractError::UnknownEnumTag { field: key.to_string(), tag: format!("{other:?}") }),
        })
        .collect()
}

fn treatment_tag(tag: &str) -> Result<Treatment, ContractError> {
    match tag {
        "Intervention" => Ok(Treatment::Intervention),
        "Mra" | "MRA" => Ok(Treatment::Mra),
        "StandardCare" => Ok(Treatment::StandardCare),
        other => Err(ContractError::UnknownEnumTag { field: "treatment".to_string(), tag: other.to_string() }),
    }
}

fn treatment_col(map: &HashMap<String, Value>, key: &str, n: usize) -> Result<Vec<Treatment>, ContractError> {
    let values = col(map, key)?;
    check_len(key, values, n)?;
    values.iter().map(|v| v.as_str().ok_or_else(|| ContractError::UnknownEnumTag { field: key.to_string(), tag: format!("{v:?}") }).and_then(treatment_tag)).collect()
}

fn cardiac_col(map: &HashMap<String, Value>, key: &str, n: usize) -> Result<Vec<CardiacState>, ContractError> {
    let values = col(map, key)?;
    check_len(key, values, n)?;
    values
        .iter()
        .map(|v| match v.as_str() {
            Some("NoAcuteEvent") => Ok(CardiacState::NoAcuteEvent),
            Some("AcuteMI") => Ok(CardiacState::AcuteMI),
            Some("PostMI") => Ok(CardiacState::PostMI),
            Some("AcuteIschemicStroke") => Ok(CardiacState::AcuteIschemicStroke),
            Some("AcuteHemorrhagicStroke") => Ok(CardiacState::AcuteHemorrhagicStroke),
            Some("PostStroke") => Ok(CardiacState::PostStroke),
            Some("TIA") => Ok(CardiacState::TIA),
            Some("AcuteHF") => Ok(CardiacState::AcuteHF),
            Some("ChronicHF") => Ok(CardiacState::ChronicHF),
            Some("CVDeath") => Ok(CardiacState::CVDeath),
            Some("NonCVDeath") => Ok(CardiacState::NonCVDeath),
            other => Err(ContractError::UnknownEnumTag { field: key.to_string(), tag: format!("{other:?}") }),
        })
        .collect()
}

fn renal_col(map: &HashMap<String, Value>, key: &str, n: usize) -> Result<Vec<RenalState>, ContractError> {
    let values = col(map, key)?;
    check_len(key, values, n)?;
    values
        .iter()
        .map(|v| match v.as_str() {
            Some("Ckd1_2") => Ok(RenalState::Ckd1_2),
            Some("Ckd3a") => Ok(RenalState::Ckd3a),
            Some("Ckd3b") => Ok(RenalState::Ckd3b),
            Some("Ckd4") => Ok(RenalState::Ckd4),
            Some("Esrd") => Ok(RenalState::Esrd),
            Some("RenalDeath") => Ok(RenalState::RenalDeath),
            other => Err(ContractError::UnknownEnumTag { field: key.to_string(), tag: format!("{other:?}") }),
        })
        .collect()
}

fn neuro_col(map: &HashMap<String, Value>, key: &str, n: usize) -> Result<Vec<NeuroState>, ContractError> {
    let values = col(map, key)?;
    check_len(key, values, n)?;
    values
        .iter()
        .map(|v| match v.as_str() {
            Some("Normal") => Ok(NeuroState::Normal),
            Some("Mci") => Ok(NeuroState::Mci),
            Some("Dementia") => Ok(NeuroState::Dementia),
            other => Err(ContractError::UnknownEnumTag { field: key.to_string(), tag: format!("{other:?}") }),
        })
        .collect()
}

/// Builds a `PatientStore` from the patient map, per spec.md §6 "Patient map
/// schema": one key per SoA column, all mandatory, all the same length.
pub fn patient_store_from_map(map: &HashMap<String, Value>) -> Result<PatientStore, ContractError> {
    let n = col(map, "age")?.len();

    let mut store = PatientStore::zeroed(n);
    store.age = f64_col(map, "age", n)?;
    store.sex = sex_col(map, "sex", n)?;
    store.baseline_sbp = f64_col(map, "baseline_sbp", n)?;
    store.baseline_dbp = f64_col(map, "baseline_dbp", n)?;
    store.current_sbp = f64_col(map, "current_sbp", n)?;
    store.current_dbp = f64_col(map, "current_dbp", n)?;
    store.true_mean_sbp = f64_col(map, "true_mean_sbp", n)?;
    store.white_coat_offset = f64_col(map, "white_coat_offset", n)?;
    store.egfr = f64_col(map, "egfr", n)?;
    store.uacr = f64_col(map, "uacr", n)?;
    store.total_cholesterol = f64_col(map, "total_cholesterol", n)?;
    store.hdl = f64_col(map, "hdl", n)?;
    store.diabetes = bool_col(map, "diabetes", n)?;
    store.smoker = bool_col(map, "smoker", n)?;
    store.heart_failure = bool_col(map, "heart_failure", n)?;
    store.atrial_fibrillation = bool_col(map, "atrial_fibrillation", n)?;
    store.on_sglt2i = bool_col(map, "on_sglt2i", n)?;
    store.primary_aldosteronism = bool_col(map, "primary_aldosteronism", n)?;
    store.renal_artery_stenosis = bool_col(map, "renal_artery_stenosis", n)?;
    store.pheochromocytoma = bool_col(map, "pheochromocytoma", n)?;
    store.osa = bool_col(map, "osa", n)?;
    store.bmi = f64_col(map, "bmi", n)?;
    store.serum_k = f64_col(map, "serum_k", n)?;
    store.hyperkalemia_flag = bool_col(map, "hyperkalemia_flag", n)?;
    store.hyperkalemia_history_count = u32_col(map, "hyperkalemia_history_count", n)?;
    store.on_k_binder = bool_col(map, "on_k_binder", n)?;
    store.mra_dose_reduced = bool_col(map, "mra_dose_reduced", n)?;
    store.is_adherent = bool_col(map, "is_adherent", n)?;
    store.sdi_score = f64_col(map, "sdi_score", n)?;
    store.dipping_status = dipping_col(map, "dipping_status", n)?;
    store.time_since_adherence_change = f64_col(map, "time_since_adherence_change", n)?;
    store.cardiac = cardiac_col(map, "cardiac", n)?;
    store.renal = renal_col(map, "renal", n)?;
    store.neuro = neuro_col(map, "neuro", n)?;
    store.treatment = treatment_col(map, "treatment", n)?;
    store.prior_mi_count = u32_col(map, "prior_mi_count", n)?;
    store.prior_any_stroke_count = u32_col(map, "prior_any_stroke_count", n)?;
    store.prior_ischemic_stroke_count = u32_col(map, "prior_ischemic_stroke_count", n)?;
    store.prior_hemorrhagic_stroke_count = u32_col(map, "prior_hemorrhagic_stroke_count", n)?;
    store.prior_tia_count = u32_col(map, "prior_tia_count", n)?;
    store.time_since_last_cv_event = f64_col_with_sentinel(map, "time_since_last_cv_event", n)?;
    store.time_since_last_tia = f64_col_with_sentinel(map, "time_since_last_tia", n)?;
    store.time_in_simulation = f64_col(map, "time_in_simulation", n)?;
    store.time_in_cardiac_state = f64_col(map, "time_in_cardiac_state", n)?;
    store.time_in_renal_state = f64_col(map, "time_in_renal_state", n)?;
    store.time_in_neuro_state = f64_col(map, "time_in_neuro_state", n)?;
    store.time_in_treatment_state = f64_col(map, "time_in_treatment_state", n)?;
    store.cum_discounted_direct_cost = f64_col(map, "cum_discounted_direct_cost", n)?;
    store.cum_discounted_indirect_cost = f64_col(map, "cum_discounted_indirect_cost", n)?;
    store.cum_discounted_qaly = f64_col(map, "cum_discounted_qaly", n)?;
    store.cum_life_years = f64_col(map, "cum_life_years", n)?;
    store.cum_months_controlled = f64_col(map, "cum_months_controlled", n)?;
    store.cum_months_uncontrolled = f64_col(map, "cum_months_uncontrolled", n)?;
    store.base_treatment_effect = f64_col(map, "base_treatment_effect", n)?;
    store.active_treatment_effect = f64_col(map, "active_treatment_effect", n)?;
    store.treatment_effect_sampled = bool_col(map, "treatment_effect_sampled", n)?;
    store.phenotype_mi_mult = f64_col(map, "phenotype_mi_mult", n)?;
    store.phenotype_stroke_mult = f64_col(map, "phenotype_stroke_mult", n)?;
    store.phenotype_hf_mult = f64_col(map, "phenotype_hf_mult", n)?;
    store.phenotype_esrd_mult = f64_col(map, "phenotype_esrd_mult", n)?;
    store.phenotype_death_mult = f64_col(map, "phenotype_death_mult", n)?;
    store.treatment_response_mult = f64_col(map, "treatment_response_mult", n)?;
    store.num_antihypertensives = u32_col(map, "num_antihypertensives", n)?;
    store.use_kfre_model = bool_col(map, "use_kfre_model", n)?;

    Ok(store)
}

fn life_table_for(config: &SimConfig) -> LifeTable {
    use crate::risk::life_table::LifeTableSet;
    let tables = LifeTableSet::with_builtin();
    tables
        .get(config.life_table_country.as_str())
        .cloned()
        .unwrap_or_else(|| tables.get("US").unwrap().clone())
}

fn aggregate_to_map(agg: &Aggregate) -> HashMap<String, Value> {
    let mut out = HashMap::new();
    out.insert("total_direct_cost".to_string(), Value::from(agg.total_direct_cost));
    out.insert("total_indirect_cost".to_string(), Value::from(agg.total_indirect_cost));
    out.insert("total_qaly".to_string(), Value::from(agg.total_qaly));
    out.insert("total_life_years".to_string(), Value::from(agg.total_life_years));
    out.insert("mi_events".to_string(), Value::from(agg.mi_events));
    out.insert("any_stroke_events".to_string(), Value::from(agg.any_stroke_events));
    out.insert("ischemic_stroke_events".to_string(), Value::from(agg.ischemic_stroke_events));
    out.insert("hemorrhagic_stroke_events".to_string(), Value::from(agg.hemorrhagic_stroke_events));
    out.insert("tia_events".to_string(), Value::from(agg.tia_events));
    out.insert("hf_events".to_string(), Value::from(agg.hf_events));
    out.insert("cv_deaths".to_string(), Value::from(agg.cv_deaths));
    out.insert("non_cv_deaths".to_string(), Value::from(agg.non_cv_deaths));
    out.insert("esrd_count".to_string(), Value::from(agg.esrd_count));
    out.insert("ckd4_count".to_string(), Value::from(agg.ckd4_count));
    out.insert("renal_deaths".to_string(), Value::from(agg.renal_deaths));
    out.insert("dementia_count".to_string(), Value::from(agg.dementia_count));
    out.insert("new_af_count".to_string(), Value::from(agg.new_af_count));
    out.insert("sglt2_users_at_end".to_string(), Value::from(agg.sglt2_users_at_end));
    out.insert("months_controlled".to_string(), Value::from(agg.months_controlled));
    out.insert("months_uncontrolled".to_string(), Value::from(agg.months_uncontrolled));
    out.insert("mean_costs".to_string(), Value::from(agg.mean_costs()));
    out.insert("mean_indirect_costs".to_string(), Value::from(agg.mean_indirect_costs()));
    out.insert("mean_total_costs".to_string(), Value::from(agg.mean_total_costs()));
    out.insert("mean_qalys".to_string(), Value::from(agg.mean_qalys()));
    out.insert("mean_life_years".to_string(), Value::from(agg.mean_life_years()));
    out
}

/// Entry point A: single-arm simulate. `treatment_tag` is one of "Intervention",
/// "Mra", "StandardCare"; every patient in the map is assigned to it regardless of
/// the map's own `treatment` column.
pub fn simulate_single_arm(
    patient_map: &HashMap<String, Value>,
    treatment: &str,
    config_map: &HashMap<String, Value>,
    psa_map: &HashMap<String, Value>,
    seed: u64,
) -> Result<HashMap<String, Value>, ContractError> {
    let config = SimConfig::try_from(config_map)?;
    let psa = PsaParams::try_from(psa_map)?;
    let mut store = patient_store_from_map(patient_map)?;
    let arm = treatment_tag(treatment)?;
    for t in store.treatment.iter_mut() {
        *t = arm;
    }

    let life_table = life_table_for(&config);
    let kernel = Kernel::new(
        config,
        psa,
        crate::costs::constants::CostConstants::default(),
        crate::costs::constants::UtilityConstants::default(),
        crate::costs::constants::AbsenteeismDays::default(),
        life_table,
    );

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let agg = kernel.run(&mut store, &mut rng);
    Ok(aggregate_to_map(&agg))
}

/// Entry point B: parallel PSA. Returns one slot per `psa_maps` entry, in order;
/// a failed replication keeps its position as `Err` rather than shifting later
/// slots, per spec.md §7's positional-correspondence note.
pub fn simulate_psa(
    patient_map: &HashMap<String, Value>,
    config_map: &HashMap<String, Value>,
    psa_maps: &[HashMap<String, Value>],
    base_seed: u64,
    use_crn: bool,
) -> Result<Vec<Result<HashMap<String, Value>, ReplicationError>>, ContractError> {
    let config = SimConfig::try_from(config_map)?;
    let template = patient_store_from_map(patient_map)?;
    let psa_list = psa_maps.iter().map(PsaParams::try_from).collect::<Result<Vec<_>, _>>()?;

    let life_table = life_table_for(&config);
    let cost_constants = crate::costs::constants::CostConstants::default();
    let utility_constants = crate::costs::constants::UtilityConstants::default();
    let absenteeism_days = crate::costs::constants::AbsenteeismDays::default();

    let driver = PsaDriver::new(config, cost_constants, utility_constants, absenteeism_days, life_table);
    let results = driver.run(&template, &psa_list, base_seed, use_crn);

    Ok(results.into_iter().map(|r| r.map(replication_result_to_map)).collect())
}

fn replication_result_to_map(result: PsaReplicationResult) -> HashMap<String, Value> {
    let mut out = HashMap::new();
    out.insert("ixa_mean_costs".to_string(), Value::from(result.intervention.mean_costs));
    out.insert("ixa_mean_qalys".to_string(), Value::from(result.intervention.mean_qalys));
    out.insert("ixa_mean_life_years".to_string(), Value::from(result.intervention.mean_life_years));
    out.insert("comp_mean_costs".to_string(), Value::from(result.comparator.mean_costs));
    out.insert("comp_mean_qalys".to_string(), Value::from(result.comparator.mean_qalys));
    out.insert("comp_mean_life_years".to_string(), Value::from(result.comparator.mean_life_years));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patient_map(n: usize) -> HashMap<String, Value> {
        let mut m = HashMap::new();
        m.insert("age".to_string(), json!(vec![60.0; n]));
        m.insert("sex".to_string(), json!(vec!["Male".to_string(); n]));
        m.insert("baseline_sbp".to_string(), json!(vec![150.0; n]));
        m.insert("baseline_dbp".to_string(), json!(vec![90.0; n]));
        m.insert("current_sbp".to_string(), json!(vec![150.0; n]));
        m.insert("current_dbp".to_string(), json!(vec![90.0; n]));
        m.insert("true_mean_sbp".to_string(), json!(vec![150.0; n]));
        m.insert("white_coat_offset".to_string(), json!(vec![0.0; n]));
        m.insert("egfr".to_string(), json!(vec![70.0; n]));
        m.insert("uacr".to_string(), json!(vec![10.0; n]));
        m.insert("total_cholesterol".to_string(), json!(vec![190.0; n]));
        m.insert("hdl".to_string(), json!(vec![45.0; n]));
        m.insert("diabetes".to_string(), json!(vec![false; n]));
        m.insert("smoker".to_string(), json!(vec![false; n]));
        m.insert("heart_failure".to_string(), json!(vec![false; n]));
        m.insert("atrial_fibrillation".to_string(), json!(vec![false; n]));
        m.insert("on_sglt2i".to_string(), json!(vec![false; n]));
        m.insert("primary_aldosteronism".to_string(), json!(vec![false; n]));
        m.insert("renal_artery_stenosis".to_string(), json!(vec![false; n]));
        m.insert("pheochromocytoma".to_string(), json!(vec![false; n]));
        m.insert("osa".to_string(), json!(vec![false; n]));
        m.insert("bmi".to_string(), json!(vec![27.0; n]));
        m.insert("serum_k".to_string(), json!(vec![4.2; n]));
        m.insert("hyperkalemia_flag".to_string(), json!(vec![false; n]));
        m.insert("hyperkalemia_history_count".to_string(), json!(vec![0; n]));
        m.insert("on_k_binder".to_string(), json!(vec![false; n]));
        m.insert("mra_dose_reduced".to_string(), json!(vec![false; n]));
        m.insert("is_adherent".to_string(), json!(vec![true; n]));
        m.insert("sdi_score".to_string(), json!(vec![40.0; n]));
        m.insert("dipping_status".to_string(), json!(vec!["Normal".to_string(); n]));
        m.insert("time_since_adherence_change".to_string(), json!(vec![0.0; n]));
        m.insert("cardiac".to_string(), json!(vec!["NoAcuteEvent".to_string(); n]));
        m.insert("renal".to_string(), json!(vec!["Ckd1_2".to_string(); n]));
        m.insert("neuro".to_string(), json!(vec!["Normal".to_string(); n]));
        m.insert("treatment".to_string(), json!(vec!["StandardCare".to_string(); n]));
        m.insert("prior_mi_count".to_string(), json!(vec![0; n]));
        m.insert("prior_any_stroke_count".to_string(), json!(vec![0; n]));
        m.insert("prior_ischemic_stroke_count".to_string(), json!(vec![0; n]));
        m.insert("prior_hemorrhagic_stroke_count".to_string(), json!(vec![0; n]));
        m.insert("prior_tia_count".to_string(), json!(vec![0; n]));
        m.insert("time_since_last_cv_event".to_string(), json!(vec![Value::Null; n]));
        m.insert("time_since_last_tia".to_string(), json!(vec![Value::Null; n]));
        m.insert("time_in_simulation".to_string(), json!(vec![0.0; n]));
        m.insert("time_in_cardiac_state".to_string(), json!(vec![0.0; n]));
        m.insert("time_in_renal_state".to_string(), json!(vec![0.0; n]));
        m.insert("time_in_neuro_state".to_string(), json!(vec![0.0; n]));
        m.insert("time_in_treatment_state".to_string(), json!(vec![0.0; n]));
        m.insert("cum_discounted_direct_cost".to_string(), json!(vec![0.0; n]));
        m.insert("cum_discounted_indirect_cost".to_string(), json!(vec![0.0; n]));
        m.insert("cum_discounted_qaly".to_string(), json!(vec![0.0; n]));
        m.insert("cum_life_years".to_string(), json!(vec![0.0; n]));
        m.insert("cum_months_controlled".to_string(), json!(vec![0.0; n]));
        m.insert("cum_months_uncontrolled".to_string(), json!(vec![0.0; n]));
        m.insert("base_treatment_effect".to_string(), json!(vec![0.0; n]));
        m.insert("active_treatment_effect".to_string(), json!(vec![0.0; n]));
        m.insert("treatment_effect_sampled".to_string(), json!(vec![false; n]));
        m.insert("phenotype_mi_mult".to_string(), json!(vec![1.0; n]));
        m.insert("phenotype_stroke_mult".to_string(), json!(vec![1.0; n]));
        m.insert("phenotype_hf_mult".to_string(), json!(vec![1.0; n]));
        m.insert("phenotype_esrd_mult".to_string(), json!(vec![1.0; n]));
        m.insert("phenotype_death_mult".to_string(), json!(vec![1.0; n]));
        m.insert("treatment_response_mult".to_string(), json!(vec![1.0; n]));
        m.insert("num_antihypertensives".to_string(), json!(vec![1; n]));
        m.insert("use_kfre_model".to_string(), json!(vec![true; n]));
        m
    }

    fn config_map() -> HashMap<String, Value> {
        let mut m = HashMap::new();
        m.insert("time_horizon_months".to_string(), json!(36));
        m.insert("cycle_length_months".to_string(), json!(1.0));
        m.insert("discount_rate".to_string(), json!(0.03));
        m.insert("cost_perspective".to_string(), json!("US"));
        m.insert("use_half_cycle_correction".to_string(), json!(true));
        m.insert("use_competing_risks".to_string(), json!(true));
        m.insert("use_dynamic_stroke_subtypes".to_string(), json!(true));
        m.insert("use_kfre_model".to_string(), json!(true));
        m.insert("life_table_country".to_string(), json!("US"));
        m.insert("economic_perspective".to_string(), json!(0));
        m
    }

    fn psa_map() -> HashMap<String, Value> {
        let mut m = HashMap::new();
        for (key, value) in [
            ("ixa_sbp_mean", 20.0),
            ("ixa_sbp_sd", 3.0),
            ("spiro_sbp_mean", 10.0),
            ("spiro_sbp_sd", 2.0),
            ("discontinuation_rate_ixa", 0.1),
            ("discontinuation_rate_spiro", 0.15),
            ("cost_mi_acute", 30000.0),
            ("cost_ischemic_stroke_acute", 20000.0),
            ("cost_hemorrhagic_stroke_acute", 35000.0),
            ("cost_hf_acute", 15000.0),
            ("cost_esrd_annual", 90000.0),
            ("cost_post_stroke_annual", 8000.0),
            ("cost_hf_annual", 6000.0),
            ("cost_ixa_monthly", 180.0),
            ("disutility_post_mi", 0.08),
            ("disutility_post_stroke", 0.10),
            ("disutility_chronic_hf", 0.12),
            ("disutility_esrd", 0.15),
            ("disutility_dementia", 0.30),
        ] {
            m.insert(key.to_string(), json!(value));
        }
        m
    }

    #[test]
    fn patient_store_from_map_round_trips_basic_columns() {
        let map = patient_map(5);
        let store = patient_store_from_map(&map).unwrap();
        assert_eq!(store.len(), 5);
        assert_eq!(store.age[0], 60.0);
        assert!(crate::patient::store::is_never(store.time_since_last_cv_event[0]));
    }

    #[test]
    fn missing_column_is_contract_error() {
        let mut map = patient_map(5);
        map.remove("egfr");
        let err = patient_store_from_map(&map).unwrap_err();
        assert!(matches!(err, ContractError::MissingKey { .. }));
    }

    #[test]
    fn mismatched_column_length_is_contract_error() {
        let mut map = patient_map(5);
        map.insert("egfr".to_string(), json!(vec![70.0; 4]));
        let err = patient_store_from_map(&map).unwrap_err();
        assert!(matches!(err, ContractError::LengthMismatch { .. }));
    }

    #[test]
    fn simulate_single_arm_returns_positive_cost_and_qaly() {
        let result = simulate_single_arm(&patient_map(10), "Intervention", &config_map(), &psa_map(), 42).unwrap();
        assert!(result["mean_costs"].as_f64().unwrap() > 0.0);
        assert!(result["mean_qalys"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn simulate_psa_returns_one_slot_per_input() {
        let psa_maps = vec![psa_map(), psa_map(), psa_map()];
        let results = simulate_psa(&patient_map(8), &config_map(), &psa_maps, 7, true).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_ok()));
    }
}
