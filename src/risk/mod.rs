//! Risk equations: PREVENT, KFRE, eGFR decline, life-table mortality, and the
//! probability-horizon conversions shared across all of them.

pub mod conversions;
pub mod egfr_decline;
pub mod kfre;
pub mod life_table;
pub mod prevent;
