use nt_core::{Instance, Kinetics, Mechanism, MechanismSpec, UpdateKind};

use crate::gate::{boltzmann, steady_tau, vtrap};

/// Fast transient sodium current, `i = gbar·m³h·(v - ena)`.
///
/// Both gates relax toward voltage-dependent steady states and use the
/// exponential update, which stays stable however fast the activation gets.
#[derive(Debug, Default)]
pub struct NaTransient;

impl NaTransient {
    fn m_rates(v: f64) -> (f64, f64) {
        let alpha = 0.1 * vtrap(-(v + 40.0), 10.0);
        let beta = 4.0 * (-(v + 65.0) / 18.0).exp();
        (alpha, beta)
    }

    fn h_rates(v: f64) -> (f64, f64) {
        let alpha = 0.07 * (-(v + 65.0) / 20.0).exp();
        let beta = 1.0 / (1.0 + (-(v + 35.0) / 10.0).exp());
        (alpha, beta)
    }
}

impl Mechanism for NaTransient {
    fn spec(&self) -> MechanismSpec {
        MechanismSpec::new("naf")
            .with_param("gbar", 120.0)
            .with_param("ena", 50.0)
            .with_state("m", UpdateKind::Exponential)
            .with_state("h", UpdateKind::Exponential)
            .with_assigned("g")
            .with_assigned("i")
    }

    fn provides_jacobian(&self) -> bool {
        true
    }

    fn init(&self, v: f64, _inst: &Instance<'_>, state: &mut [f64]) {
        let (am, bm) = Self::m_rates(v);
        let (ah, bh) = Self::h_rates(v);
        state[0] = steady_tau(am, bm).0;
        state[1] = steady_tau(ah, bh).0;
    }

    fn current(&self, v: f64, inst: &Instance<'_>, assigned: &mut [f64]) -> f64 {
        let m = inst.state(0);
        let h = inst.state(1);
        let g = inst.param(0) * m * m * m * h;
        let i = g * (v - inst.param(1));
        assigned[0] = g;
        assigned[1] = i;
        i
    }

    fn conductance(&self, _v: f64, inst: &Instance<'_>) -> f64 {
        let m = inst.state(0);
        inst.param(0) * m * m * m * inst.state(1)
    }

    fn kinetics(&self, state_index: usize, v: f64, _inst: &Instance<'_>) -> Kinetics {
        let (alpha, beta) = match state_index {
            0 => Self::m_rates(v),
            _ => Self::h_rates(v),
        };
        let (target, tau) = steady_tau(alpha, beta);
        Kinetics::Exponential { target, tau }
    }
}

/// Persistent (non-inactivating) sodium current, `i = gbar·m·(v - ena)`.
#[derive(Debug, Default)]
pub struct NaPersistent;

impl Mechanism for NaPersistent {
    fn spec(&self) -> MechanismSpec {
        MechanismSpec::new("nap")
            .with_param("gbar", 0.02)
            .with_param("ena", 50.0)
            .with_param("mtau", 0.8)
            .with_state("m", UpdateKind::Exponential)
            .with_assigned("i")
    }

    fn provides_jacobian(&self) -> bool {
        true
    }

    fn init(&self, v: f64, _inst: &Instance<'_>, state: &mut [f64]) {
        state[0] = boltzmann(v, -48.0, 10.0);
    }

    fn current(&self, v: f64, inst: &Instance<'_>, assigned: &mut [f64]) -> f64 {
        let i = inst.param(0) * inst.state(0) * (v - inst.param(1));
        assigned[0] = i;
        i
    }

    fn conductance(&self, _v: f64, inst: &Instance<'_>) -> f64 {
        inst.param(0) * inst.state(0)
    }

    fn kinetics(&self, _state_index: usize, v: f64, inst: &Instance<'_>) -> Kinetics {
        Kinetics::Exponential {
            target: boltzmann(v, -48.0, 10.0),
            tau: inst.param(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nt_core::{CompartmentId, InstanceStore};

    #[test]
    fn activation_increases_with_depolarization() {
        let (inf_rest, _) = {
            let (a, b) = NaTransient::m_rates(-65.0);
            steady_tau(a, b)
        };
        let (inf_depol, _) = {
            let (a, b) = NaTransient::m_rates(-20.0);
            steady_tau(a, b)
        };
        assert!(inf_depol > inf_rest);
        assert!(inf_rest < 0.1);
        assert!(inf_depol > 0.8);
    }

    #[test]
    fn inactivation_closes_with_depolarization() {
        let (inf_rest, _) = {
            let (a, b) = NaTransient::h_rates(-65.0);
            steady_tau(a, b)
        };
        let (inf_depol, _) = {
            let (a, b) = NaTransient::h_rates(-20.0);
            steady_tau(a, b)
        };
        assert!(inf_rest > 0.5);
        assert!(inf_depol < 0.1);
    }

    #[test]
    fn init_sets_gates_to_steady_state() {
        let mut store = InstanceStore::new(&NaTransient.spec());
        store.insert(CompartmentId(0)).unwrap();
        let mut state = [0.0; 2];
        NaTransient.init(-65.0, &store.instance(0), &mut state);
        let k = NaTransient.kinetics(0, -65.0, &store.instance(0));
        match k {
            Kinetics::Exponential { target, .. } => {
                assert!((state[0] - target).abs() < 1e-12);
            }
            _ => panic!("expected exponential kinetics"),
        }
    }

    #[test]
    fn current_follows_gates() {
        let mut store = InstanceStore::new(&NaTransient.spec());
        store.insert(CompartmentId(0)).unwrap();
        store.write_state_row(0, &[1.0, 1.0]);
        let mut assigned = [0.0; 2];
        let i = NaTransient.current(0.0, &store.instance(0), &mut assigned);
        // Fully open at v = 0: i = 120·(0 - 50) = -6000 µA/cm² (inward).
        assert!((i - -6000.0).abs() < 1e-9);
        assert!((assigned[0] - 120.0).abs() < 1e-9);
    }

    #[test]
    fn persistent_gate_tracks_boltzmann() {
        let mut store = InstanceStore::new(&NaPersistent.spec());
        store.insert(CompartmentId(0)).unwrap();
        match NaPersistent.kinetics(0, -48.0, &store.instance(0)) {
            Kinetics::Exponential { target, tau } => {
                assert!((target - 0.5).abs() < 1e-12);
                assert!((tau - 0.8).abs() < 1e-12);
            }
            _ => panic!("expected exponential kinetics"),
        }
    }
}
