//! Transition engine: cause-specific monthly probability assembly, competing-risk
//! composition, and multinomial event sampling.

pub mod probs;
pub mod sampling;

pub use probs::{compute, TransProbs, TransitionInputs, ESRD_MORTALITY_BASE};
pub use sampling::{acute_rollover, sample_event};
