//! Monthly drug cost, per spec.md §4.4.

use crate::costs::constants::CostConstants;
use crate::patient::enums::Treatment;
use crate::psa::params::PsaParams;

pub fn monthly_drug_cost(
    treatment: Treatment,
    on_sglt2i: bool,
    constants: &CostConstants,
    psa: &PsaParams,
) -> f64 {
    let treatment_cost = match treatment {
        Treatment::Intervention => psa.cost_ixa_monthly,
        Treatment::Mra => constants.mra_drug_monthly,
        Treatment::StandardCare => 0.0,
    };
    let sglt2_cost = if on_sglt2i { constants.sglt2_drug_monthly } else { 0.0 };
    constants.background_therapy_monthly + treatment_cost + sglt2_cost
}

#[cfg(test)]
mod tests {
    use super::*;

    fn psa() -> PsaParams {
        PsaParams {
            ixa_sbp_mean: 20.0,
            ixa_sbp_sd: 3.0,
            spiro_sbp_mean: 10.0,
            spiro_sbp_sd: 2.0,
            discontinuation_rate_ixa: 0.1,
            discontinuation_rate_spiro: 0.1,
            cost_mi_acute: 30000.0,
            cost_ischemic_stroke_acute: 20000.0,
            cost_hemorrhagic_stroke_acute: 35000.0,
            cost_hf_acute: 15000.0,
            cost_esrd_annual: 90000.0,
            cost_post_stroke_annual: 8000.0,
            cost_hf_annual: 6000.0,
            cost_ixa_monthly: 180.0,
            disutility_post_mi: 0.08,
            disutility_post_stroke: 0.10,
            disutility_chronic_hf: 0.12,
            disutility_esrd: 0.15,
            disutility_dementia: 0.30,
        }
    }

    #[test]
    fn standard_care_has_no_treatment_drug_cost() {
        let c = CostConstants::default();
        let cost = monthly_drug_cost(Treatment::StandardCare, false, &c, &psa());
        assert_eq!(cost, c.background_therapy_monthly);
    }

    #[test]
    fn sglt2i_adds_cost_regardless_of_treatment() {
        let c = CostConstants::default();
        let without = monthly_drug_cost(Treatment::Mra, false, &c, &psa());
        let with = monthly_drug_cost(Treatment::Mra, true, &c, &psa());
        assert!((with - without - c.sglt2_drug_monthly).abs() < 1e-9);
    }
}
