use nt_core::{CompartmentId, CompartmentTable};

use crate::accumulator::Accumulators;
use crate::config::{DivergencePolicy, SolverConfig};
use crate::dispatch::DispatchEngine;
use crate::error::{EngineError, EngineResult};
use crate::report::StepReport;

/// Reference outer-solver driver.
///
/// Owns the compartment table and the shared accumulators, and drives the
/// step protocol over the dispatch engine: zero accumulators →
/// `compute_currents` → linearized voltage update → `advance_states`. The
/// voltage update folds each compartment's conductance (Jacobian) sum into
/// an implicit step, `v' = v + dt·(i_inj - Σi)/(C + dt·Σg)`, so stiff ionic
/// currents do not destabilize it.
#[derive(Debug)]
pub struct Solver {
    engine: DispatchEngine,
    table: CompartmentTable,
    accumulators: Accumulators,
    stimuli: Vec<f64>,
    config: SolverConfig,
    steps: u64,
}

impl Solver {
    /// Build a solver around a populated engine and compartment table.
    pub fn new(engine: DispatchEngine, table: CompartmentTable, config: SolverConfig) -> Self {
        let n = table.len();
        Self {
            engine,
            table,
            accumulators: Accumulators::new(n),
            stimuli: vec![0.0; n],
            config,
            steps: 0,
        }
    }

    /// Initialize every mechanism instance at its compartment's voltage.
    /// Call once after model build, before the first step.
    pub fn init(&mut self) {
        self.engine.init_states(&self.table);
    }

    /// Set the injected current (µA/cm²) for one compartment. The value
    /// persists until changed.
    pub fn set_stimulus(&mut self, id: CompartmentId, current: f64) {
        self.stimuli[id.0] = current;
    }

    /// Advance the model by one step of `config.dt`.
    pub fn step(&mut self) -> EngineResult<StepReport> {
        self.accumulators.zero();
        let dt = self.config.dt;

        let mut report = self.engine.compute_currents(&self.table, &mut self.accumulators);

        for (idx, stim) in self.stimuli.iter().enumerate() {
            let id = CompartmentId(idx);
            let v = self.table.voltage(id);
            let c = self.table.compartment(id).capacitance;
            let i = self.accumulators.current(id);
            let g = self.accumulators.conductance(id);
            let next = v + dt * (stim - i) / (c + dt * g);
            self.table.set_voltage(id, next);
        }

        report.merge(self.engine.advance_states(&self.table, dt));
        let step = self.steps;
        self.steps += 1;

        if self.config.policy == DivergencePolicy::Halt && !report.is_empty() {
            return Err(EngineError::Diverged {
                step,
                count: report.len(),
            });
        }
        Ok(report)
    }

    /// Advance the model by `n` steps, merging the per-step reports.
    pub fn run(&mut self, n: u64) -> EngineResult<StepReport> {
        let mut merged = StepReport::default();
        for _ in 0..n {
            merged.merge(self.step()?);
        }
        Ok(merged)
    }

    /// Membrane voltage of one compartment in mV.
    pub fn voltage(&self, id: CompartmentId) -> f64 {
        self.table.voltage(id)
    }

    /// The compartment table.
    pub fn table(&self) -> &CompartmentTable {
        &self.table
    }

    /// The dispatch engine, for diagnostics.
    pub fn engine(&self) -> &DispatchEngine {
        &self.engine
    }

    /// Mutable engine access, for diagnostics between steps.
    pub fn engine_mut(&mut self) -> &mut DispatchEngine {
        &mut self.engine
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Elapsed simulated time in ms.
    pub fn time(&self) -> f64 {
        self.steps as f64 * self.config.dt
    }

    /// The configuration this solver runs with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}
