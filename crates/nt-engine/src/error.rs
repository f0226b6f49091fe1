use nt_core::ModelError;

/// Alias for `Result<T, EngineError>`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the engine and the reference solver.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A model-layer error (registration, storage, lookup).
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The solver's divergence policy is halt and a step diverged.
    ///
    /// Divergence itself is reported as data in a
    /// [`StepReport`](crate::report::StepReport); this variant only exists
    /// for callers that opted into halting.
    #[error("numerical divergence at step {step}: {count} non-finite evaluation(s)")]
    Diverged {
        /// The zero-based step at which the divergence was detected.
        step: u64,
        /// How many non-finite evaluations the step produced.
        count: usize,
    },
}
