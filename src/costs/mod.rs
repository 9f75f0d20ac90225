//! Costs and utilities: drug cost, state-management cost, one-time event costs,
//! indirect (societal) costs, discounting, and the utility/QALY model.

pub mod constants;
pub mod discount;
pub mod drug;
pub mod events;
pub mod indirect;
pub mod state_management;
pub mod utility;
