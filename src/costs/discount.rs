//! Discount factor, per spec.md §4.4.
//!
//! Grounded on `src/reserves/discount.rs` in the teacher: a pure function mapping
//! (time, rate) to a present-value weight, reimplemented directly here since the
//! rest of `reserves/` (CARVM/AG33/AG35/VM-22) has no spec.md counterpart.

/// `1 / (1+r)^((t + 0.5*cycle if half_cycle else t) / 12)`.
pub fn discount_factor(t_months: f64, annual_rate: f64, cycle_length_months: f64, half_cycle_correction: bool) -> f64 {
    let effective_t = if half_cycle_correction {
        t_months + 0.5 * cycle_length_months
    } else {
        t_months
    };
    1.0 / (1.0 + annual_rate).powf(effective_t / 12.0)
}
