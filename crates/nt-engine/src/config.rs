/// What the reference solver does when a step reports divergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DivergencePolicy {
    /// Keep stepping; divergences stay visible in each step's report.
    #[default]
    Report,
    /// Return [`EngineError::Diverged`](crate::error::EngineError::Diverged)
    /// from the offending step.
    Halt,
}

/// Configuration for the reference solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Integration step in ms.
    pub dt: f64,
    /// Divergence handling policy.
    pub policy: DivergencePolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            dt: 0.025,
            policy: DivergencePolicy::Report,
        }
    }
}

impl SolverConfig {
    /// Set the integration step in ms.
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Set the divergence handling policy.
    pub fn with_policy(mut self, policy: DivergencePolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = SolverConfig::default();
        assert!((config.dt - 0.025).abs() < f64::EPSILON);
        assert_eq!(config.policy, DivergencePolicy::Report);
    }

    #[test]
    fn config_builder_chain() {
        let config = SolverConfig::default()
            .with_dt(0.01)
            .with_policy(DivergencePolicy::Halt);
        assert!((config.dt - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.policy, DivergencePolicy::Halt);
    }
}
