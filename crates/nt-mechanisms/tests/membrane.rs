//! End-to-end membrane tests: the standard roster driven by the reference
//! solver.

use nt_core::{Compartment, CompartmentId, CompartmentTable, Registry};
use nt_engine::{DispatchEngine, Solver, SolverConfig};
use nt_mechanisms::standard;

fn patch(n_compartments: usize) -> Solver {
    let mut registry = Registry::new();
    standard(&mut registry).unwrap();
    let mut engine = DispatchEngine::new(registry);

    let mut table = CompartmentTable::new();
    let ids: Vec<CompartmentId> = (0..n_compartments)
        .map(|_| table.add(-65.0, Compartment::default()))
        .collect();
    let mechanism_ids: Vec<_> = engine.registry().iter().map(|d| d.id()).collect();
    for compartment in ids {
        for mech in &mechanism_ids {
            engine.insert(*mech, compartment).unwrap();
        }
    }

    let mut solver = Solver::new(engine, table, SolverConfig::default());
    solver.init();
    solver
}

#[test]
fn resting_membrane_is_stable() {
    let mut solver = patch(1);
    let report = solver.run(4000).unwrap(); // 100 ms
    assert!(report.is_empty());
    let v = solver.voltage(CompartmentId(0));
    assert!((-75.0..=-55.0).contains(&v), "resting v drifted to {v}");
}

#[test]
fn current_injection_elicits_spikes() {
    let mut solver = patch(1);
    solver.set_stimulus(CompartmentId(0), 10.0);

    let mut spikes = 0;
    let mut above = false;
    let mut v_max = f64::MIN;
    for _ in 0..4000 {
        solver.step().unwrap();
        let v = solver.voltage(CompartmentId(0));
        v_max = v_max.max(v);
        if v > 0.0 && !above {
            spikes += 1;
        }
        above = v > 0.0;
    }

    assert!(v_max > 10.0, "no overshoot, v_max = {v_max}");
    assert!(spikes >= 2, "expected repetitive firing, got {spikes} spike(s)");
}

#[test]
fn unstimulated_neighbor_stays_at_rest() {
    let mut solver = patch(2);
    solver.set_stimulus(CompartmentId(0), 10.0);
    solver.run(4000).unwrap();

    // Compartments are uncoupled in this model: the neighbor must sit at
    // its own resting state while compartment 0 fires.
    let v1 = solver.voltage(CompartmentId(1));
    assert!((-75.0..=-55.0).contains(&v1), "neighbor drifted to {v1}");
}

#[test]
fn instance_bookkeeping_matches_roster() {
    let solver = patch(3);
    let engine = solver.engine();
    assert_eq!(engine.instance_count(), 3 * engine.registry().len());
    for desc in engine.registry().iter() {
        let store = engine.store(desc.id()).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.index_for(CompartmentId(2)), Some(2));
    }
}
