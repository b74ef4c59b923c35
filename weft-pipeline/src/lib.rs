//! The weft generation pipeline.
//!
//! [`Orchestrator`] runs one [`GenerationRequest`] through
//! validate → synthesize → compile → execute → clean up, owning the
//! temporary workspace for the duration of the run.
//!
//! # Module Organization
//!
//! - [`Orchestrator`], [`GenerationReport`] - Sequencing and its outcome
//! - [`Stage`] - Pipeline states
//! - [`testing`] - Scripted toolchain and executable fakes (feature-gated)
//!
//! [`GenerationRequest`]: weft_core::GenerationRequest

mod orchestrator;
mod stage;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use orchestrator::{GenerationReport, Orchestrator};
pub use stage::Stage;
