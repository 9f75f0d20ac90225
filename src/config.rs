//! Simulation configuration, per spec.md §3 "Configuration" and §6 "Config map
//! keys".
//!
//! Grounded on `src/projection/engine.rs::ProjectionConfig` in the teacher: a flat
//! plain struct plus `Default`. Jurisdiction and economic-perspective fields are
//! typed enums rather than raw strings/ints so an unrecognized tag is caught as
//! `ContractError::UnknownEnumTag` at the bridge boundary instead of silently
//! falling through to a default table.

use crate::error::ContractError;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EconomicPerspective {
    HealthcareOnly,
    Societal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JurisdictionTag(pub String);

impl JurisdictionTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub time_horizon_months: i64,
    pub cycle_length_months: f64,
    pub discount_rate: f64,
    pub cost_perspective: JurisdictionTag,
    pub use_half_cycle_correction: bool,
    pub use_competing_risks: bool,
    pub use_dynamic_stroke_subtypes: bool,
    pub use_kfre_model: bool,
    pub life_table_country: JurisdictionTag,
    pub economic_perspective: EconomicPerspective,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            time_horizon_months: 120,
            cycle_length_months: 1.0,
            discount_rate: 0.03,
            cost_perspective: JurisdictionTag("US".to_string()),
            use_half_cycle_correction: true,
            use_competing_risks: true,
            use_dynamic_stroke_subtypes: true,
            use_kfre_model: true,
            life_table_country: JurisdictionTag("US".to_string()),
            economic_perspective: EconomicPerspective::HealthcareOnly,
        }
    }
}

fn get_i64(map: &HashMap<String, Value>, key: &str) -> Result<i64, ContractError> {
    map.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| ContractError::MissingKey { key: key.to_string() })
}

fn get_f64(map: &HashMap<String, Value>, key: &str) -> Result<f64, ContractError> {
    map.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| ContractError::MissingKey { key: key.to_string() })
}

fn get_bool(map: &HashMap<String, Value>, key: &str) -> Result<bool, ContractError> {
    map.get(key)
        .and_then(Value::as_bool)
        .ok_or_else(|| ContractError::MissingKey { key: key.to_string() })
}

fn get_string(map: &HashMap<String, Value>, key: &str) -> Result<String, ContractError> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ContractError::MissingKey { key: key.to_string() })
}

impl TryFrom<&HashMap<String, Value>> for SimConfig {
    type Error = ContractError;

    fn try_from(map: &HashMap<String, Value>) -> Result<Self, Self::Error> {
        let time_horizon_months = get_i64(map, "time_horizon_months")?;
        if time_horizon_months <= 0 {
            return Err(ContractError::InvalidHorizon { months: time_horizon_months });
        }

        let discount_rate = get_f64(map, "discount_rate")?;
        if !(0.0..1.0).contains(&discount_rate) {
            return Err(ContractError::InvalidDiscountRate { rate: discount_rate });
        }

        let economic_perspective_raw = get_i64(map, "economic_perspective")?;
        let economic_perspective = match economic_perspective_raw {
            0 => EconomicPerspective::HealthcareOnly,
            1 => EconomicPerspective::Societal,
            other => {
                return Err(ContractError::UnknownEnumTag {
                    field: "economic_perspective".to_string(),
                    tag: other.to_string(),
                })
            }
        };

        Ok(SimConfig {
            time_horizon_months,
            cycle_length_months: get_f64(map, "cycle_length_months")?,
            discount_rate,
            cost_perspective: JurisdictionTag(get_string(map, "cost_perspective")?),
            use_half_cycle_correction: get_bool(map, "use_half_cycle_correction")?,
            use_competing_risks: get_bool(map, "use_competing_risks")?,
            use_dynamic_stroke_subtypes: get_bool(map, "use_dynamic_stroke_subtypes")?,
            use_kfre_model: get_bool(map, "use_kfre_model")?,
            life_table_country: JurisdictionTag(get_string(map, "life_table_country")?),
            economic_perspective,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_map() -> HashMap<String, Value> {
        let mut m = HashMap::new();
        m.insert("time_horizon_months".to_string(), json!(120));
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

    #[test]
    fn parses_valid_map() {
        let map = valid_map();
        let config = SimConfig::try_from(&map).unwrap();
        assert_eq!(config.time_horizon_months, 120);
        assert_eq!(config.economic_perspective, EconomicPerspective::HealthcareOnly);
    }

    #[test]
    fn negative_horizon_is_contract_error() {
        let mut map = valid_map();
        map.insert("time_horizon_months".to_string(), json!(-5));
        let err = SimConfig::try_from(&map).unwrap_err();
        assert!(matches!(err, ContractError::InvalidHorizon { .. }));
    }

    #[test]
    fn out_of_range_discount_rate_is_contract_error() {
        let mut map = valid_map();
        map.insert("discount_rate".to_string(), json!(1.5));
        let err = SimConfig::try_from(&map).unwrap_err();
        assert!(matches!(err, ContractError::InvalidDiscountRate { .. }));
    }

    #[test]
    fn unknown_economic_perspective_tag_errors() {
        let mut map = valid_map();
        map.insert("economic_perspective".to_string(), json!(7));
        let err = SimConfig::try_from(&map).unwrap_err();
        assert!(matches!(err, ContractError::UnknownEnumTag { .. }));
    }
}
