//! PSA parameter vector: the subset of costs, disutilities, treatment response
//! distributions, and discontinuation rates that vary across PSA replications,
//! per spec.md §3 "PSA parameter vector" and §6 "PSA map keys".

use crate::error::ContractError;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct PsaParams {
    pub ixa_sbp_mean: f64,
    pub ixa_sbp_sd: f64,
    pub spiro_sbp_mean: f64,
    pub spiro_sbp_sd: f64,
    pub discontinuation_rate_ixa: f64,
    pub discontinuation_rate_spiro: f64,
    pub cost_mi_acute: f64,
    pub cost_ischemic_stroke_acute: f64,
    pub cost_hemorrhagic_stroke_acute: f64,
    pub cost_hf_acute: f64,
    pub cost_esrd_annual: f64,
    pub cost_post_stroke_annual: f64,
    pub cost_hf_annual: f64,
    pub cost_ixa_monthly: f64,
    pub disutility_post_mi: f64,
    pub disutility_post_stroke: f64,
    pub disutility_chronic_hf: f64,
    pub disutility_esrd: f64,
    pub disutility_dementia: f64,
}

const REQUIRED_KEYS: &[&str] = &[
    "ixa_sbp_mean",
    "ixa_sbp_sd",
    "spiro_sbp_mean",
    "spiro_sbp_sd",
    "discontinuation_rate_ixa",
    "discontinuation_rate_spiro",
    "cost_mi_acute",
    "cost_ischemic_stroke_acute",
    "cost_hemorrhagic_stroke_acute",
    "cost_hf_acute",
    "cost_esrd_annual",
    "cost_post_stroke_annual",
    "cost_hf_annual",
    "cost_ixa_monthly",
    "disutility_post_mi",
    "disutility_post_stroke",
    "disutility_chronic_hf",
    "disutility_esrd",
    "disutility_dementia",
];

fn get_f64(map: &HashMap<String, Value>, key: &str) -> Result<f64, ContractError> {
    let value = map.get(key).ok_or_else(|| ContractError::MissingKey { key: key.to_string() })?;
    value.as_f64().ok_or_else(|| ContractError::NonFiniteValue { key: key.to_string() })
}

impl TryFrom<&HashMap<String, Value>> for PsaParams {
    type Error = ContractError;

    fn try_from(map: &HashMap<String, Value>) -> Result<Self, Self::Error> {
        for key in REQUIRED_KEYS {
            if !map.contains_key(*key) {
                return Err(ContractError::MissingKey { key: key.to_string() });
            }
        }
        Ok(PsaParams {
            ixa_sbp_mean: get_f64(map, "ixa_sbp_mean")?,
            ixa_sbp_sd: get_f64(map, "ixa_sbp_sd")?,
            spiro_sbp_mean: get_f64(map, "spiro_sbp_mean")?,
            spiro_sbp_sd: get_f64(map, "spiro_sbp_sd")?,
            discontinuation_rate_ixa: get_f64(map, "discontinuation_rate_ixa")?,
            discontinuation_rate_spiro: get_f64(map, "discontinuation_rate_spiro")?,
            cost_mi_acute: get_f64(map, "cost_mi_acute")?,
            cost_ischemic_stroke_acute: get_f64(map, "cost_ischemic_stroke_acute")?,
            cost_hemorrhagic_stroke_acute: get_f64(map, "cost_hemorrhagic_stroke_acute")?,
            cost_hf_acute: get_f64(map, "cost_hf_acute")?,
            cost_esrd_annual: get_f64(map, "cost_esrd_annual")?,
            cost_post_stroke_annual: get_f64(map, "cost_post_stroke_annual")?,
            cost_hf_annual: get_f64(map, "cost_hf_annual")?,
            cost_ixa_monthly: get_f64(map, "cost_ixa_monthly")?,
            disutility_post_mi: get_f64(map, "disutility_post_mi")?,
            disutility_post_stroke: get_f64(map, "disutility_post_stroke")?,
            disutility_chronic_hf: get_f64(map, "disutility_chronic_hf")?,
            disutility_esrd: get_f64(map, "disutility_esrd")?,
            disutility_dementia: get_f64(map, "disutility_dementia")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_map() -> HashMap<String, Value> {
        let mut m = HashMap::new();
        for key in REQUIRED_KEYS {
            m.insert(key.to_string(), json!(1.0));
        }
        m
    }

    #[test]
    fn parses_complete_map() {
        let map = full_map();
        let params = PsaParams::try_from(&map).unwrap();
        assert_eq!(params.ixa_sbp_mean, 1.0);
    }

    #[test]
    fn missing_key_is_contract_error() {
        let mut map = full_map();
        map.remove("cost_mi_acute");
        let err = PsaParams::try_from(&map).unwrap_err();
        assert!(matches!(err, ContractError::MissingKey { .. }));
    }
}
