//! Parallel PSA driver: common-random-number-aware, work-stealing execution of K
//! probabilistic-sensitivity-analysis replications, per spec.md §4.6 and §5.
//!
//! Grounded on `src/scenario.rs::ScenarioRunner::run` in the teacher, which builds
//! a `rayon` thread pool and fans a list of scenarios out with `par_iter`, cloning a
//! small shared `Assumptions` struct into each closure rather than locking it. The
//! buffer pool generalizes that: instead of a fresh `Policy` clone per scenario
//! (cheap, so the teacher never pools it), this crate's per-patient `PatientStore`
//! is large enough that a bounded pool of reusable buffers, handed out over a
//! `crossbeam-channel`, is worth the bookkeeping.

pub mod params;

use crate::config::SimConfig;
use crate::costs::constants::{AbsenteeismDays, CostConstants, UtilityConstants};
use crate::error::ReplicationError;
use crate::kernel::{Aggregate, Kernel};
use crate::patient::enums::Treatment;
use crate::patient::store::PatientStore;
use crate::risk::life_table::LifeTable;
use crossbeam_channel::{bounded, Receiver, Sender};
use params::PsaParams;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

/// Per-patient mean outputs for one arm of one PSA replication.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArmMeans {
    pub mean_costs: f64,
    pub mean_qalys: f64,
    pub mean_life_years: f64,
}

impl From<&Aggregate> for ArmMeans {
    fn from(agg: &Aggregate) -> Self {
        ArmMeans { mean_costs: agg.mean_costs(), mean_qalys: agg.mean_qalys(), mean_life_years: agg.mean_life_years() }
    }
}

/// Both arms' per-patient means for one PSA replication, per spec.md §6 entry
/// point B's six output keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct PsaReplicationResult {
    pub intervention: ArmMeans,
    pub comparator: ArmMeans,
}

/// A bounded pool of reusable `(intervention, comparator)` buffer pairs, shared
/// across worker threads via a `crossbeam-channel`. Pool size is
/// `min(k, 2*max(workers, 2))` per spec.md §4.6 "Scheduling", so the channel
/// never holds more live buffer pairs than there are replications to fill them.
struct BufferPool {
    rx: Receiver<(PatientStore, PatientStore)>,
    tx: Sender<(PatientStore, PatientStore)>,
}

impl BufferPool {
    fn new(template: &PatientStore, capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        for _ in 0..capacity {
            tx.send((template.clone(), template.clone())).expect("pool channel not full at construction");
        }
        BufferPool { rx, tx }
    }

    /// Blocks until a buffer pair is available, per spec.md §4.6's back-pressure
    /// note: "a replication blocks if all buffers are in use."
    fn acquire(&self) -> (PatientStore, PatientStore) {
        self.rx.recv().expect("pool sender outlives every receiver for the pool's own lifetime")
    }

    fn release(&self, pair: (PatientStore, PatientStore)) {
        self.tx.send(pair).expect("pool channel sized to never exceed capacity");
    }
}

/// Owns every table a replication needs so `run` only takes the per-call PSA
/// sweep and seed. Mirrors `Kernel`'s constructor shape, since every
/// replication builds its own `Kernel` from the driver's shared tables plus
/// that replication's own `PsaParams` row.
pub struct PsaDriver {
    pub config: SimConfig,
    pub cost_constants: CostConstants,
    pub utility_constants: UtilityConstants,
    pub absenteeism_days: AbsenteeismDays,
    pub life_table: LifeTable,
}

impl PsaDriver {
    pub fn new(
        config: SimConfig,
        cost_constants: CostConstants,
        utility_constants: UtilityConstants,
        absenteeism_days: AbsenteeismDays,
        life_table: LifeTable,
    ) -> PsaDriver {
        PsaDriver { config, cost_constants, utility_constants, absenteeism_days, life_table }
    }

    /// Runs the K-replication PSA sweep, per spec.md §4.6. Returns one slot per
    /// PSA entry, in input order, mirroring failed replications as `Err` so the
    /// caller keeps positional correspondence to the PSA list.
    pub fn run(
        &self,
        patient_template: &PatientStore,
        psa_list: &[PsaParams],
        base_seed: u64,
        use_crn: bool,
    ) -> Vec<Result<PsaReplicationResult, ReplicationError>> {
        let workers = rayon::current_num_threads().max(1);
        let capacity = psa_list.len().min(2 * workers.max(2)).max(1);
        let pool = BufferPool::new(patient_template, capacity);

        log::info!(
            "psa sweep starting: {} replications, {} workers, pool capacity {}, crn={}",
            psa_list.len(),
            workers,
            capacity,
            use_crn
        );

        let results: Vec<_> = psa_list
            .par_iter()
            .enumerate()
            .map(|(k, psa)| self.run_one_replication(k, psa, base_seed, use_crn, patient_template, &pool))
            .collect();

        let failures = results.iter().filter(|r| r.is_err()).count();
        if failures > 0 {
            log::warn!("psa sweep finished with {failures} failed replications out of {}", results.len());
        } else {
            log::info!("psa sweep finished: {} replications completed", results.len());
        }
        results
    }

    fn run_one_replication(
        &self,
        k: usize,
        psa: &PsaParams,
        base_seed: u64,
        use_crn: bool,
        patient_template: &PatientStore,
        pool: &BufferPool,
    ) -> Result<PsaReplicationResult, ReplicationError> {
        let iter_base = base_seed.wrapping_add((k as u64).wrapping_mul(1_000_000));
        let intervention_seed = iter_base.wrapping_add(1);
        let comparator_seed = if use_crn { intervention_seed } else { iter_base.wrapping_add(2) };

        let kernel = Kernel::new(
            self.config.clone(),
            *psa,
            self.cost_constants,
            self.utility_constants,
            self.absenteeism_days,
            self.life_table.clone(),
        );

        let (mut intervention_store, mut comparator_store) = pool.acquire();
        intervention_store.reset_from(patient_template);
        comparator_store.reset_from(patient_template);

        for i in 0..intervention_store.len() {
            intervention_store.treatment[i] = Treatment::Intervention;
        }
        for i in 0..comparator_store.len() {
            comparator_store.treatment[i] = Treatment::Mra;
        }

        let mut intervention_rng = Xoshiro256PlusPlus::seed_from_u64(intervention_seed);
        let intervention_agg = kernel.run(&mut intervention_store, &mut intervention_rng);

        let mut comparator_rng = Xoshiro256PlusPlus::seed_from_u64(comparator_seed);
        let comparator_agg = kernel.run(&mut comparator_store, &mut comparator_rng);

        let result = PsaReplicationResult {
            intervention: ArmMeans::from(&intervention_agg),
            comparator: ArmMeans::from(&comparator_agg),
        };

        pool.release((intervention_store, comparator_store));
        log::trace!("psa replication {k} complete");
        Ok(result)
    }
}
