use nt_core::{
    CompartmentId, CompartmentTable, InstanceStore, Kinetics, MechanismId, ModelError,
    ModelResult, Registry,
};

use crate::accumulator::Accumulators;
use crate::integrate;
use crate::report::{Divergence, StepReport};

/// Evaluates every registered mechanism type over its instance store.
///
/// The engine owns one [`InstanceStore`] per registered type and walks them
/// in registration order, the ordering contract that makes shared
/// accumulator sums reproducible. During a step the stores are exclusively
/// owned here; nothing else may mutate them concurrently with a dispatch
/// call.
#[derive(Debug)]
pub struct DispatchEngine {
    registry: Registry,
    stores: Vec<InstanceStore>,
}

impl DispatchEngine {
    /// Build an engine with one empty store per registered type.
    ///
    /// The registry is consumed: registration is closed once evaluation
    /// begins, matching its process-lifetime contract.
    pub fn new(registry: Registry) -> Self {
        let stores = registry.iter().map(|d| InstanceStore::new(d.spec())).collect();
        Self { registry, stores }
    }

    /// The registry this engine dispatches over.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The instance store of one mechanism type.
    pub fn store(&self, id: MechanismId) -> Option<&InstanceStore> {
        self.stores.get(id.0)
    }

    /// Mutable access to one type's store, for model build and diagnostics.
    pub fn store_mut(&mut self, id: MechanismId) -> Option<&mut InstanceStore> {
        self.stores.get_mut(id.0)
    }

    /// Grow one type's store for `n` more instances.
    pub fn reserve(&mut self, id: MechanismId, n: usize) -> ModelResult<()> {
        self.try_store_mut(id)?.reserve(n)
    }

    /// Attach an instance of mechanism `id` to `compartment`.
    pub fn insert(&mut self, id: MechanismId, compartment: CompartmentId) -> ModelResult<usize> {
        self.try_store_mut(id)?.insert(compartment)
    }

    /// Attach an instance by mechanism name.
    pub fn insert_by_name(
        &mut self,
        name: &str,
        compartment: CompartmentId,
    ) -> ModelResult<usize> {
        let id = self.registry.lookup(name)?;
        self.insert(id, compartment)
    }

    /// Total instances across all mechanism types.
    pub fn instance_count(&self) -> usize {
        self.stores.iter().map(InstanceStore::len).sum()
    }

    /// Initialize every instance's state row at its compartment's voltage.
    ///
    /// Called once after model build, before the first step.
    pub fn init_states(&mut self, table: &CompartmentTable) {
        for desc in self.registry.iter() {
            let store = &mut self.stores[desc.id().0];
            let mech = desc.mechanism();
            let n_states = store.spec().states.len();
            let mut row = vec![0.0; n_states];
            for i in 0..store.len() {
                let v = table.voltage(store.compartment(i));
                store.read_state_row(i, &mut row);
                {
                    let inst = store.instance(i);
                    mech.init(v, &inst, &mut row);
                }
                store.write_state_row(i, &row);
            }
        }
    }

    /// Evaluate every type's membrane current and sum the contributions into
    /// the shared accumulators, in registration order.
    ///
    /// A non-finite current or conductance is recorded as a divergence and
    /// excluded from the sums (one poisoned instance must not corrupt its
    /// compartment's total); evaluation of everything else continues.
    /// The caller zeroes the accumulators once per step beforehand; this
    /// pass only ever adds.
    pub fn compute_currents(
        &mut self,
        table: &CompartmentTable,
        acc: &mut Accumulators,
    ) -> StepReport {
        let mut report = StepReport::default();
        for desc in self.registry.iter() {
            let store = &mut self.stores[desc.id().0];
            let mech = desc.mechanism();
            let n_assigned = store.spec().assigned.len();
            let mut row = vec![0.0; n_assigned];
            for i in 0..store.len() {
                let compartment = store.compartment(i);
                let v = table.voltage(compartment);
                store.read_assigned_row(i, &mut row);
                let current = {
                    let inst = store.instance(i);
                    mech.current(v, &inst, &mut row)
                };
                store.write_assigned_row(i, &row);

                if !current.is_finite() {
                    report.push(Divergence {
                        mechanism: desc.id(),
                        instance: i,
                        compartment,
                        field: String::from("current"),
                        value: current,
                    });
                    continue;
                }
                acc.add_current(compartment, current);

                if mech.provides_jacobian() {
                    let g = {
                        let inst = store.instance(i);
                        mech.conductance(v, &inst)
                    };
                    if g.is_finite() {
                        acc.add_conductance(compartment, g);
                    } else {
                        report.push(Divergence {
                            mechanism: desc.id(),
                            instance: i,
                            compartment,
                            field: String::from("conductance"),
                            value: g,
                        });
                    }
                }
            }
        }
        report
    }

    /// Advance every state variable in place by its kinetics.
    ///
    /// Valid only after [`compute_currents`](Self::compute_currents) within
    /// the same step: derivatives may read assigned values produced there.
    /// A non-finite update is recorded as a divergence but still written;
    /// whether to abort, sub-step, or continue is the caller's decision.
    pub fn advance_states(&mut self, table: &CompartmentTable, dt: f64) -> StepReport {
        let mut report = StepReport::default();
        for desc in self.registry.iter() {
            let store = &mut self.stores[desc.id().0];
            let mech = desc.mechanism();
            let n_states = store.spec().states.len();
            if n_states == 0 {
                continue;
            }
            let mut kinetics = vec![Kinetics::Explicit { dxdt: 0.0 }; n_states];
            let mut row = vec![0.0; n_states];
            for i in 0..store.len() {
                let compartment = store.compartment(i);
                let v = table.voltage(compartment);
                {
                    let inst = store.instance(i);
                    for (s, slot) in kinetics.iter_mut().enumerate() {
                        *slot = mech.kinetics(s, v, &inst);
                    }
                }
                store.read_state_row(i, &mut row);
                for (s, x) in row.iter_mut().enumerate() {
                    let next = integrate::advance(kinetics[s], *x, dt);
                    if !next.is_finite() {
                        report.push(Divergence {
                            mechanism: desc.id(),
                            instance: i,
                            compartment,
                            field: store.spec().states[s].name.clone(),
                            value: next,
                        });
                    }
                    *x = next;
                }
                store.write_state_row(i, &row);
            }
        }
        report
    }

    fn try_store_mut(&mut self, id: MechanismId) -> ModelResult<&mut InstanceStore> {
        self.stores
            .get_mut(id.0)
            .ok_or_else(|| ModelError::NotFound(id.to_string()))
    }
}
