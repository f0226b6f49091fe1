use nt_core::{Instance, Kinetics, Mechanism, MechanismSpec, UpdateKind};

use crate::gate::{boltzmann, steady_tau, vtrap};

/// Delayed rectifier potassium current, `i = gbar·n⁴·(v - ek)`.
#[derive(Debug, Default)]
pub struct KRectifier;

impl KRectifier {
    fn n_rates(v: f64) -> (f64, f64) {
        let alpha = 0.01 * vtrap(-(v + 55.0), 10.0);
        let beta = 0.125 * (-(v + 65.0) / 80.0).exp();
        (alpha, beta)
    }
}

impl Mechanism for KRectifier {
    fn spec(&self) -> MechanismSpec {
        MechanismSpec::new("kdr")
            .with_param("gbar", 36.0)
            .with_param("ek", -77.0)
            .with_state("n", UpdateKind::Exponential)
            .with_assigned("g")
            .with_assigned("i")
    }

    fn provides_jacobian(&self) -> bool {
        true
    }

    fn init(&self, v: f64, _inst: &Instance<'_>, state: &mut [f64]) {
        let (alpha, beta) = Self::n_rates(v);
        state[0] = steady_tau(alpha, beta).0;
    }

    fn current(&self, v: f64, inst: &Instance<'_>, assigned: &mut [f64]) -> f64 {
        let n = inst.state(0);
        let g = inst.param(0) * n * n * n * n;
        let i = g * (v - inst.param(1));
        assigned[0] = g;
        assigned[1] = i;
        i
    }

    fn conductance(&self, _v: f64, inst: &Instance<'_>) -> f64 {
        let n = inst.state(0);
        inst.param(0) * n * n * n * n
    }

    fn kinetics(&self, _state_index: usize, v: f64, _inst: &Instance<'_>) -> Kinetics {
        let (alpha, beta) = Self::n_rates(v);
        let (target, tau) = steady_tau(alpha, beta);
        Kinetics::Exponential { target, tau }
    }
}

/// Muscarinic (M-type) potassium current: slow, non-inactivating,
/// `i = gbar·m·(v - ek)`.
#[derive(Debug, Default)]
pub struct KMuscarinic;

impl KMuscarinic {
    fn m_tau(v: f64) -> f64 {
        1000.0 / (3.3 * (((v + 35.0) / 20.0).exp() + (-(v + 35.0) / 20.0).exp()))
    }
}

impl Mechanism for KMuscarinic {
    fn spec(&self) -> MechanismSpec {
        MechanismSpec::new("km")
            .with_param("gbar", 0.1)
            .with_param("ek", -77.0)
            .with_state("m", UpdateKind::Exponential)
            .with_assigned("i")
    }

    fn provides_jacobian(&self) -> bool {
        true
    }

    fn init(&self, v: f64, _inst: &Instance<'_>, state: &mut [f64]) {
        state[0] = boltzmann(v, -35.0, 10.0);
    }

    fn current(&self, v: f64, inst: &Instance<'_>, assigned: &mut [f64]) -> f64 {
        let i = inst.param(0) * inst.state(0) * (v - inst.param(1));
        assigned[0] = i;
        i
    }

    fn conductance(&self, _v: f64, inst: &Instance<'_>) -> f64 {
        inst.param(0) * inst.state(0)
    }

    fn kinetics(&self, _state_index: usize, v: f64, _inst: &Instance<'_>) -> Kinetics {
        Kinetics::Exponential {
            target: boltzmann(v, -35.0, 10.0),
            tau: Self::m_tau(v),
        }
    }
}

/// Afterhyperpolarization potassium current gated by intracellular calcium,
/// `i = gbar·w·(v - ek)`.
///
/// The activation `w` relaxes toward `ca/(ca + kd)` and is declared with the
/// implicit update kind: its drive is supplied through the linearized step
/// rather than a closed-form relaxation, and the current's voltage coupling
/// enters the outer solve as a Jacobian term. The sensed calcium level is
/// the `ca` parameter (mM), set at build time or between steps.
#[derive(Debug, Default)]
pub struct KAhp;

impl KAhp {
    fn w_inf(ca: f64, kd: f64) -> f64 {
        ca / (ca + kd)
    }
}

impl Mechanism for KAhp {
    fn spec(&self) -> MechanismSpec {
        MechanismSpec::new("kahp")
            .with_param("gbar", 0.05)
            .with_param("ek", -77.0)
            .with_param("ca", 0.0)
            .with_param("kd", 0.001)
            .with_param("wtau", 40.0)
            .with_state("w", UpdateKind::Implicit)
            .with_assigned("i")
    }

    fn provides_jacobian(&self) -> bool {
        true
    }

    fn init(&self, _v: f64, inst: &Instance<'_>, state: &mut [f64]) {
        state[0] = Self::w_inf(inst.param(2), inst.param(3));
    }

    fn current(&self, v: f64, inst: &Instance<'_>, assigned: &mut [f64]) -> f64 {
        let i = inst.param(0) * inst.state(0) * (v - inst.param(1));
        assigned[0] = i;
        i
    }

    fn conductance(&self, _v: f64, inst: &Instance<'_>) -> f64 {
        inst.param(0) * inst.state(0)
    }

    fn kinetics(&self, _state_index: usize, _v: f64, inst: &Instance<'_>) -> Kinetics {
        let w_inf = Self::w_inf(inst.param(2), inst.param(3));
        let wtau = inst.param(4);
        Kinetics::Linearized {
            dxdt: (w_inf - inst.state(0)) / wtau,
            dfdx: -1.0 / wtau,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nt_core::{CompartmentId, FieldClass, InstanceStore};

    #[test]
    fn rectifier_opens_with_depolarization() {
        let (a_rest, b_rest) = KRectifier::n_rates(-65.0);
        let (a_depol, b_depol) = KRectifier::n_rates(-10.0);
        assert!(steady_tau(a_depol, b_depol).0 > steady_tau(a_rest, b_rest).0);
    }

    #[test]
    fn rectifier_current_uses_fourth_power() {
        let mut store = InstanceStore::new(&KRectifier.spec());
        store.insert(CompartmentId(0)).unwrap();
        store.write_state_row(0, &[0.5]);
        let mut assigned = [0.0; 2];
        let i = KRectifier.current(-27.0, &store.instance(0), &mut assigned);
        let g = 36.0 * 0.5_f64.powi(4);
        assert!((assigned[0] - g).abs() < 1e-12);
        assert!((i - g * 50.0).abs() < 1e-9);
    }

    #[test]
    fn muscarinic_tau_is_slow_near_rest() {
        assert!(KMuscarinic::m_tau(-35.0) > 100.0);
        assert!(KMuscarinic::m_tau(-35.0) < 200.0);
    }

    #[test]
    fn ahp_tracks_calcium() {
        let mut store = InstanceStore::new(&KAhp.spec());
        store.insert(CompartmentId(0)).unwrap();

        // No calcium: gate stays shut.
        match KAhp.kinetics(0, -65.0, &store.instance(0)) {
            Kinetics::Linearized { dxdt, .. } => assert!(dxdt.abs() < 1e-12),
            _ => panic!("expected linearized kinetics"),
        }

        // Calcium at kd: half activation.
        store
            .set_value(0, FieldClass::Parameter, "ca", 0.001)
            .unwrap();
        let mut state = [0.0];
        KAhp.init(-65.0, &store.instance(0), &mut state);
        assert!((state[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ahp_declares_implicit_and_jacobian() {
        let spec = KAhp.spec();
        assert!(spec.has_state_kind(UpdateKind::Implicit));
        assert!(KAhp.provides_jacobian());
        assert!(spec.validate(KAhp.provides_jacobian()).is_ok());
    }
}
