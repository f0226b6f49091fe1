//! Dispatch engine and integration adapter for neurite.
//!
//! Drives the registered mechanism types over their instance stores once per
//! integration step: a current pass that sums into shared per-compartment
//! accumulators, and a state pass that advances every state variable by its
//! declared kinetics. A reference [`Solver`] exercises the outer-solver
//! protocol (zero accumulators → currents → coupled voltage update → states)
//! end to end.

/// Per-compartment current and conductance accumulators.
pub mod accumulator;
/// Configuration for the reference solver.
pub mod config;
/// The dispatch engine: per-type evaluation in registration order.
pub mod dispatch;
/// Error types for the engine crate.
pub mod error;
/// State-update rules applied by the dispatch engine.
pub mod integrate;
/// Divergence records and per-step reports.
pub mod report;
/// Reference outer-solver step driver.
pub mod solver;

/// Re-export of [`accumulator::Accumulators`].
pub use accumulator::Accumulators;
/// Re-exports of [`config::DivergencePolicy`] and [`config::SolverConfig`].
pub use config::{DivergencePolicy, SolverConfig};
/// Re-export of [`dispatch::DispatchEngine`].
pub use dispatch::DispatchEngine;
/// Re-exports of [`error::EngineError`] and [`error::EngineResult`].
pub use error::{EngineError, EngineResult};
/// Re-exports of [`report::Divergence`] and [`report::StepReport`].
pub use report::{Divergence, StepReport};
/// Re-export of [`solver::Solver`].
pub use solver::Solver;
