//! Per-arm aggregate result, per spec.md §3 "Aggregate result" and §6 entry point A.
//!
//! Grounded on `src/projection/cashflows.rs::ProjectionResult::summary()` in the
//! teacher, which folds a per-cycle ledger into scalar totals; here the totals are
//! accumulated directly during the kernel's cycle loop rather than summed from a
//! retained per-cycle ledger, since spec.md's outputs are lifetime aggregates only.

#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregate {
    pub total_direct_cost: f64,
    pub total_indirect_cost: f64,
    pub total_qaly: f64,
    pub total_life_years: f64,

    pub mi_events: u64,
    pub any_stroke_events: u64,
    pub ischemic_stroke_events: u64,
    pub hemorrhagic_stroke_events: u64,
    pub tia_events: u64,
    pub hf_events: u64,
    pub cv_deaths: u64,
    pub non_cv_deaths: u64,
    pub esrd_count: u64,
    pub ckd4_count: u64,
    pub renal_deaths: u64,
    pub dementia_count: u64,
    pub new_af_count: u64,
    pub sglt2_users_at_end: u64,

    pub months_controlled: f64,
    pub months_uncontrolled: f64,

    pub n_patients: usize,
}

impl Aggregate {
    pub fn mean_costs(&self) -> f64 {
        mean(self.total_direct_cost, self.n_patients)
    }

    pub fn mean_indirect_costs(&self) -> f64 {
        mean(self.total_indirect_cost, self.n_patients)
    }

    pub fn mean_total_costs(&self) -> f64 {
        mean(self.total_direct_cost + self.total_indirect_cost, self.n_patients)
    }

    pub fn mean_qalys(&self) -> f64 {
        mean(self.total_qaly, self.n_patients)
    }

    pub fn mean_life_years(&self) -> f64 {
        mean(self.total_life_years, self.n_patients)
    }
}

fn mean(total: f64, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        total / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn means_are_zero_for_empty_population() {
        let agg = Aggregate::default();
        assert_eq!(agg.mean_costs(), 0.0);
        assert_eq!(agg.mean_qalys(), 0.0);
    }

    #[test]
    fn means_divide_by_patient_count() {
        let agg = Aggregate {
            total_direct_cost: 1000.0,
            total_indirect_cost: 200.0,
            total_qaly: 50.0,
            n_patients: 10,
            ..Default::default()
        };
        assert_eq!(agg.mean_costs(), 100.0);
        assert_eq!(agg.mean_total_costs(), 120.0);
        assert_eq!(agg.mean_qalys(), 5.0);
    }
}
