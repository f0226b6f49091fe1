use nt_core::{Instance, Mechanism, MechanismSpec};

/// Passive leak conductance: `i = g·(v - e)`.
///
/// No state; the current couples to voltage, so the conductance enters the
/// outer solve as a Jacobian contribution.
#[derive(Debug, Default)]
pub struct Leak;

impl Mechanism for Leak {
    fn spec(&self) -> MechanismSpec {
        MechanismSpec::new("leak")
            .with_param("g", 0.3)
            .with_param("e", -54.4)
            .with_assigned("i")
    }

    fn provides_jacobian(&self) -> bool {
        true
    }

    fn init(&self, _v: f64, _inst: &Instance<'_>, _state: &mut [f64]) {}

    fn current(&self, v: f64, inst: &Instance<'_>, assigned: &mut [f64]) -> f64 {
        let i = inst.param(0) * (v - inst.param(1));
        assigned[0] = i;
        i
    }

    fn conductance(&self, _v: f64, inst: &Instance<'_>) -> f64 {
        inst.param(0)
    }
}
