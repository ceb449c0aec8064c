//! Satgym exposes a SAT solving engine as a stateful training environment for tree
//! search learners. On every reset it picks a problem instance from an on-disk corpus
//! according to a configurable schedule, starts a fresh engine session for it, and
//! exchanges fixed shape observation tensors and decoded search statuses with the
//! training loop until the next reset.
//!
//! The solving and search work itself happens inside an external engine reached
//! through the narrow contract of the [`engine`] module. One environment drives one
//! engine session at a time; parallel data collection uses one environment per
//! worker.

pub mod config;
pub mod corpus;
pub mod env;
pub mod select;
pub mod tensor;

#[cfg(test)]
mod test;

pub use crate::config::{EnvOptions, ModeSpec};
pub use crate::env::{EnvError, SatEnv};
pub use crate::tensor::{Observation, TensorDims};

pub mod engine {
    //! Call contract for the external solving/search engine.
    pub use satgym_engine::*;
}
