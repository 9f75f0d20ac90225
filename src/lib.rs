//! Individual-level microsimulation engine for hypertension treatment strategies.
//!
//! This library provides:
//! - A monthly per-patient simulation kernel over cardiovascular, renal, cognitive,
//!   and treatment state machines
//! - Risk equations (PREVENT, KFRE, eGFR decline, life-table mortality)
//! - Treatment assignment, adherence, discontinuation, and hyperkalemia machinery
//! - Cost and utility accrual under healthcare-only or societal perspectives
//! - A parallel, common-random-number-aware PSA driver
//! - Two marshalling entry points for opaque JSON parameter maps

pub mod bridge;
pub mod config;
pub mod costs;
pub mod error;
pub mod kernel;
pub mod patient;
pub mod psa;
pub mod risk;
pub mod transition;
pub mod treatment;

pub use bridge::{simulate_psa, simulate_single_arm};
pub use config::SimConfig;
pub use error::{ContractError, ReplicationError};
pub use kernel::{Aggregate, Kernel};
pub use patient::store::PatientStore;
pub use psa::{params::PsaParams, PsaDriver};
