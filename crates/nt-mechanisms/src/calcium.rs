use nt_core::{Instance, Kinetics, Mechanism, MechanismSpec, UpdateKind};

/// Intracellular calcium pool with first-order extrusion.
///
/// `d[ca]/dt = -k·ica - ([ca] - carest)/tau`, explicit kind. The driving
/// calcium current `ica` (µA/cm², negative inward) is a parameter supplied
/// by the model builder; the pool contributes no membrane current itself.
#[derive(Debug, Default)]
pub struct CalciumPool;

impl Mechanism for CalciumPool {
    fn spec(&self) -> MechanismSpec {
        MechanismSpec::new("cad")
            .with_param("ica", 0.0)
            .with_param("tau", 80.0)
            .with_param("carest", 5e-5)
            .with_param("k", 0.005)
            .with_state("ca", UpdateKind::Explicit)
    }

    fn init(&self, _v: f64, inst: &Instance<'_>, state: &mut [f64]) {
        state[0] = inst.param(2);
    }

    fn current(&self, _v: f64, _inst: &Instance<'_>, _assigned: &mut [f64]) -> f64 {
        0.0
    }

    fn kinetics(&self, _state_index: usize, _v: f64, inst: &Instance<'_>) -> Kinetics {
        let influx = -inst.param(3) * inst.param(0);
        let extrusion = (inst.state(0) - inst.param(2)) / inst.param(1);
        Kinetics::Explicit {
            dxdt: influx - extrusion,
        }
    }
}
