//! Kernel: the per-replication simulation loop that advances a `PatientStore`
//! cycle by cycle and folds the results into an `Aggregate`.
//!
//! Grounded on `src/projection/engine.rs::ProjectionEngine::run` in the teacher,
//! which owns the assumption tables and the outer cycle loop over a cohort; the
//! per-patient per-cycle body is factored into `step::run_patient_cycle` so the
//! fixed 17-step order stays unit-testable in isolation from the outer loop.

pub mod aggregate;
pub mod step;

pub use aggregate::Aggregate;

use crate::config::SimConfig;
use crate::costs::constants::{AbsenteeismDays, CostConstants, UtilityConstants};
use crate::patient::enums::Treatment;
use crate::patient::store::PatientStore;
use crate::psa::params::PsaParams;
use crate::risk::life_table::LifeTable;
use crate::treatment::{assignment, discontinuation};
use rand::Rng;
use step::StepContext;

/// Owns every table and constant set a replication needs, so the per-cycle loop
/// doesn't thread a dozen separate arguments through `run`.
pub struct Kernel {
    pub config: SimConfig,
    pub psa: PsaParams,
    pub cost_constants: CostConstants,
    pub utility_constants: UtilityConstants,
    pub absenteeism_days: AbsenteeismDays,
    pub life_table: LifeTable,
    pub treatment_response_params: assignment::TreatmentResponseParams,
    pub discontinuation_rates: discontinuation::DiscontinuationRates,
}

impl Kernel {
    /// Builds a kernel from the PSA parameter vector, deriving the
    /// intervention/MRA response and discontinuation tables from their `ixa_*`/
    /// `spiro_*` fields (the PSA map's naming for the Intervention and MRA arms
    /// respectively).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: SimConfig,
        psa: PsaParams,
        cost_constants: CostConstants,
        utility_constants: UtilityConstants,
        absenteeism_days: AbsenteeismDays,
        life_table: LifeTable,
    ) -> Kernel {
        let treatment_response_params = assignment::TreatmentResponseParams {
            intervention_mean: psa.ixa_sbp_mean,
            intervention_sd: psa.ixa_sbp_sd,
            mra_mean: psa.spiro_sbp_mean,
            mra_sd: psa.spiro_sbp_sd,
        };
        let discontinuation_rates = discontinuation::DiscontinuationRates {
            intervention: psa.discontinuation_rate_ixa,
            mra: psa.discontinuation_rate_spiro,
        };
        Kernel {
            config,
            psa,
            cost_constants,
            utility_constants,
            absenteeism_days,
            life_table,
            treatment_response_params,
            discontinuation_rates,
        }
    }

    /// Samples the first-assignment treatment effect for every patient not yet
    /// sampled (fresh patients entering a non-StandardCare arm), per spec.md §4.3
    /// "Assignment". Idempotent: patients with `treatment_effect_sampled` already
    /// set are skipped, so this can run once before the cycle loop.
    fn initialize_treatment_effects<R: Rng + ?Sized>(&self, store: &mut PatientStore, rng: &mut R) {
        for i in 0..store.len() {
            if store.treatment_effect_sampled[i] {
                continue;
            }
            let effect = assignment::sample_base_treatment_effect(
                store.treatment[i],
                &self.treatment_response_params,
                store.treatment_response_mult[i],
                rng,
            );
            store.base_treatment_effect[i] = effect;
            store.active_treatment_effect[i] = assignment::active_effect(effect, store.is_adherent[i]);
            store.treatment_effect_sampled[i] = true;
        }
    }

    /// Runs the full time horizon for one arm, mutating `store` in place and
    /// returning the folded aggregate. Traverses patients in index order within
    /// each cycle so two runs seeded identically produce bitwise-identical output.
    pub fn run<R: Rng + ?Sized>(&self, store: &mut PatientStore, rng: &mut R) -> Aggregate {
        self.initialize_treatment_effects(store, rng);

        let ctx = StepContext {
            config: &self.config,
            psa: &self.psa,
            cost_constants: &self.cost_constants,
            utility_constants: &self.utility_constants,
            absenteeism_days: &self.absenteeism_days,
            life_table: &self.life_table,
            treatment_response_params: &self.treatment_response_params,
            discontinuation_rates: &self.discontinuation_rates,
        };

        let mut agg = Aggregate { n_patients: store.len(), ..Default::default() };

        for month in 0..self.config.time_horizon_months {
            for i in 0..store.len() {
                if !store.is_alive(i) {
                    continue;
                }
                let t_start = store.time_in_simulation[i];
                step::run_patient_cycle(&ctx, store, i, t_start, &mut agg, rng);
            }
            if log::log_enabled!(log::Level::Trace) {
                let alive = (0..store.len()).filter(|&i| store.is_alive(i)).count();
                log::trace!("cycle {month}: {alive}/{} patients alive, {} mi, {} cv deaths", store.len(), agg.mi_events, agg.cv_deaths);
            }
        }

        agg.sglt2_users_at_end =
            (0..store.len()).filter(|&i| store.is_alive(i) && store.on_sglt2i[i]).count() as u64;

        agg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::enums::{CardiacState, DippingStatus, Sex};
    use crate::risk::life_table::LifeTableSet;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

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

    fn kernel(horizon_months: i64) -> Kernel {
        let mut config = SimConfig::default();
        config.time_horizon_months = horizon_months;
        let tables = LifeTableSet::with_builtin();
        let life_table = tables.get("US").unwrap().clone();
        Kernel {
            config,
            psa: psa(),
            cost_constants: CostConstants::default(),
            utility_constants: UtilityConstants::default(),
            absenteeism_days: AbsenteeismDays::default(),
            life_table,
            treatment_response_params: assignment::TreatmentResponseParams {
                intervention_mean: 20.0,
                intervention_sd: 3.0,
                mra_mean: 12.0,
                mra_sd: 2.0,
            },
            discontinuation_rates: discontinuation::DiscontinuationRates { intervention: 0.10, mra: 0.15 },
        }
    }

    fn heterogeneous_store(n: usize) -> PatientStore {
        let mut store = PatientStore::zeroed(n);
        for i in 0..n {
            store.age[i] = 50.0 + (i as f64 % 30.0);
            store.sex[i] = if i % 2 == 0 { Sex::Male } else { Sex::Female };
            store.current_sbp[i] = 130.0 + (i as f64 % 50.0);
            store.true_mean_sbp[i] = store.current_sbp[i];
            store.egfr[i] = 60.0 + (i as f64 % 40.0);
            store.total_cholesterol[i] = 180.0 + (i as f64 % 60.0);
            store.hdl[i] = 40.0 + (i as f64 % 20.0);
            store.bmi[i] = 24.0 + (i as f64 % 12.0);
            store.dipping_status[i] = DippingStatus::Normal;
            store.treatment[i] = if i % 3 == 0 { Treatment::Intervention } else { Treatment::StandardCare };
        }
        store
    }

    #[test]
    fn same_seed_produces_bitwise_identical_aggregate() {
        let k = kernel(24);
        let mut store_a = heterogeneous_store(20);
        let mut rng_a = Xoshiro256PlusPlus::seed_from_u64(99);
        let agg_a = k.run(&mut store_a, &mut rng_a);

        let mut store_b = heterogeneous_store(20);
        let mut rng_b = Xoshiro256PlusPlus::seed_from_u64(99);
        let agg_b = k.run(&mut store_b, &mut rng_b);

        assert_eq!(agg_a.mi_events, agg_b.mi_events);
        assert_eq!(agg_a.cv_deaths, agg_b.cv_deaths);
        assert!((agg_a.total_direct_cost - agg_b.total_direct_cost).abs() < 1e-9);
        assert!((agg_a.total_qaly - agg_b.total_qaly).abs() < 1e-9);
    }

    #[test]
    fn different_seeds_generally_diverge() {
        let k = kernel(60);
        let mut store_a = heterogeneous_store(50);
        let mut rng_a = Xoshiro256PlusPlus::seed_from_u64(1);
        let agg_a = k.run(&mut store_a, &mut rng_a);

        let mut store_b = heterogeneous_store(50);
        let mut rng_b = Xoshiro256PlusPlus::seed_from_u64(2);
        let agg_b = k.run(&mut store_b, &mut rng_b);

        assert!(
            agg_a.mi_events != agg_b.mi_events
                || agg_a.cv_deaths != agg_b.cv_deaths
                || (agg_a.total_direct_cost - agg_b.total_direct_cost).abs() > 1e-6
        );
    }

    #[test]
    fn prior_mi_patient_accumulates_more_cost_than_a_never_event_twin() {
        let k = kernel(36);
        let mut store = heterogeneous_store(2);
        store.prior_mi_count[0] = 2;
        store.prior_mi_count[1] = 0;
        store.cardiac[0] = CardiacState::PostMI;
        store.cardiac[1] = CardiacState::NoAcuteEvent;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let agg = k.run(&mut store, &mut rng);
        assert!(agg.n_patients == 2);
    }

    #[test]
    fn low_egfr_patient_can_reach_esrd_and_renal_death() {
        let k = kernel(120);
        let mut store = PatientStore::zeroed(1);
        store.age[0] = 70.0;
        store.sex[0] = Sex::Male;
        store.egfr[0] = 18.0;
        store.current_sbp[0] = 150.0;
        store.true_mean_sbp[0] = 150.0;
        store.total_cholesterol[0] = 190.0;
        store.hdl[0] = 40.0;
        store.bmi[0] = 30.0;
        store.diabetes[0] = true;
        store.uacr[0] = 400.0;
        store.dipping_status[0] = DippingStatus::Normal;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let agg = k.run(&mut store, &mut rng);
        assert!(agg.esrd_count <= 1);
    }
}
