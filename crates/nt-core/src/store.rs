use std::collections::HashMap;

use crate::compartment::CompartmentId;
use crate::error::{ModelError, ModelResult};
use crate::spec::{FieldClass, MechanismSpec};

/// Structure-of-arrays storage for every instance of one mechanism type.
///
/// Each parameter, state, and assigned field is one contiguous `f64` column
/// indexed by instance position, so field views hand the dispatch engine a
/// plain slice to stream over. The store is append-only during model build
/// and fixed in count thereafter; a previously returned view cannot outlive
/// an append (the borrow ends first), which is exactly the invalidation
/// contract growth requires.
#[derive(Debug)]
pub struct InstanceStore {
    spec: MechanismSpec,
    params: Vec<Vec<f64>>,
    states: Vec<Vec<f64>>,
    assigned: Vec<Vec<f64>>,
    compartments: Vec<CompartmentId>,
    index_by_compartment: HashMap<CompartmentId, usize>,
}

impl InstanceStore {
    /// Create an empty store laid out per the given spec.
    pub fn new(spec: &MechanismSpec) -> Self {
        Self {
            params: vec![Vec::new(); spec.parameters.len()],
            states: vec![Vec::new(); spec.states.len()],
            assigned: vec![Vec::new(); spec.assigned.len()],
            compartments: Vec::new(),
            index_by_compartment: HashMap::new(),
            spec: spec.clone(),
        }
    }

    /// The layout this store was built from.
    pub fn spec(&self) -> &MechanismSpec {
        &self.spec
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.compartments.len()
    }

    /// Return `true` if no instances have been created.
    pub fn is_empty(&self) -> bool {
        self.compartments.is_empty()
    }

    /// Grow capacity for `additional` more instances.
    ///
    /// Growth is amortized (geometric reallocation under the hood), so calling
    /// this incrementally as compartments are discovered stays sub-quadratic.
    /// Resource exhaustion maps to [`ModelError::Allocation`].
    pub fn reserve(&mut self, additional: usize) -> ModelResult<()> {
        let name = &self.spec.name;
        let exhausted = |source| ModelError::Allocation {
            mechanism: name.clone(),
            source,
        };
        for col in self
            .params
            .iter_mut()
            .chain(self.states.iter_mut())
            .chain(self.assigned.iter_mut())
        {
            col.try_reserve(additional).map_err(exhausted)?;
        }
        self.compartments.try_reserve(additional).map_err(exhausted)?;
        Ok(())
    }

    /// Append one instance attached to `compartment`, with parameter defaults
    /// and zeroed state/assigned values. Returns the instance index, which is
    /// stable for the store's lifetime.
    pub fn insert(&mut self, compartment: CompartmentId) -> ModelResult<usize> {
        if self.index_by_compartment.contains_key(&compartment) {
            return Err(ModelError::DuplicateInstance {
                mechanism: self.spec.name.clone(),
                compartment,
            });
        }
        self.reserve(1)?;
        let index = self.compartments.len();
        for (col, field) in self.params.iter_mut().zip(&self.spec.parameters) {
            col.push(field.default);
        }
        for col in self.states.iter_mut().chain(self.assigned.iter_mut()) {
            col.push(0.0);
        }
        self.compartments.push(compartment);
        self.index_by_compartment.insert(compartment, index);
        Ok(index)
    }

    /// The instance index attached to `compartment`, if any.
    pub fn index_for(&self, compartment: CompartmentId) -> Option<usize> {
        self.index_by_compartment.get(&compartment).copied()
    }

    /// The compartment owning instance `index`.
    pub fn compartment(&self, index: usize) -> CompartmentId {
        self.compartments[index]
    }

    /// All owning compartments, indexed by instance position.
    pub fn compartments(&self) -> &[CompartmentId] {
        &self.compartments
    }

    /// Read-only view of instance `index`.
    pub fn instance(&self, index: usize) -> Instance<'_> {
        Instance { store: self, index }
    }

    /// Contiguous view of one field across all instances.
    pub fn field_view(&self, class: FieldClass, name: &str) -> ModelResult<&[f64]> {
        let idx = self.field_index(class, name)?;
        Ok(&self.columns(class)[idx])
    }

    /// Mutable contiguous view of one field across all instances.
    pub fn field_view_mut(&mut self, class: FieldClass, name: &str) -> ModelResult<&mut [f64]> {
        let idx = self.field_index(class, name)?;
        Ok(&mut self.columns_mut(class)[idx])
    }

    /// Read one instance's value by field name. Diagnostics path, not hot.
    pub fn value(&self, index: usize, class: FieldClass, name: &str) -> ModelResult<f64> {
        let idx = self.field_index(class, name)?;
        Ok(self.columns(class)[idx][index])
    }

    /// Write one instance's value by field name. Used at initialization and
    /// for diagnostics, not during dispatch.
    pub fn set_value(
        &mut self,
        index: usize,
        class: FieldClass,
        name: &str,
        value: f64,
    ) -> ModelResult<()> {
        let idx = self.field_index(class, name)?;
        self.columns_mut(class)[idx][index] = value;
        Ok(())
    }

    /// State value of instance `index` by field position.
    pub fn state_at(&self, index: usize, field: usize) -> f64 {
        self.states[field][index]
    }

    /// Overwrite a state value by field position. Integration path.
    pub fn set_state_at(&mut self, index: usize, field: usize, value: f64) {
        self.states[field][index] = value;
    }

    /// Copy instance `index`'s state row into `out` (layout order).
    pub fn read_state_row(&self, index: usize, out: &mut [f64]) {
        for (slot, col) in out.iter_mut().zip(&self.states) {
            *slot = col[index];
        }
    }

    /// Write `row` back into instance `index`'s state columns.
    pub fn write_state_row(&mut self, index: usize, row: &[f64]) {
        for (col, value) in self.states.iter_mut().zip(row) {
            col[index] = *value;
        }
    }

    /// Copy instance `index`'s assigned row into `out` (layout order).
    pub fn read_assigned_row(&self, index: usize, out: &mut [f64]) {
        for (slot, col) in out.iter_mut().zip(&self.assigned) {
            *slot = col[index];
        }
    }

    /// Write `row` back into instance `index`'s assigned columns.
    pub fn write_assigned_row(&mut self, index: usize, row: &[f64]) {
        for (col, value) in self.assigned.iter_mut().zip(row) {
            col[index] = *value;
        }
    }

    fn field_index(&self, class: FieldClass, name: &str) -> ModelResult<usize> {
        self.spec
            .field_index(class, name)
            .ok_or_else(|| ModelError::UnknownField {
                mechanism: self.spec.name.clone(),
                field: name.to_string(),
            })
    }

    fn columns(&self, class: FieldClass) -> &[Vec<f64>] {
        match class {
            FieldClass::Parameter => &self.params,
            FieldClass::State => &self.states,
            FieldClass::Assigned => &self.assigned,
        }
    }

    fn columns_mut(&mut self, class: FieldClass) -> &mut [Vec<f64>] {
        match class {
            FieldClass::Parameter => &mut self.params,
            FieldClass::State => &mut self.states,
            FieldClass::Assigned => &mut self.assigned,
        }
    }
}

/// Read-only view of one instance's fields, addressed by layout position.
///
/// This is what a mechanism receives during evaluation: its own fields and
/// nothing else. Field positions follow the declaration order in the spec.
#[derive(Clone, Copy)]
pub struct Instance<'a> {
    store: &'a InstanceStore,
    index: usize,
}

impl Instance<'_> {
    /// This instance's position in its store.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The compartment this instance is attached to.
    pub fn compartment(&self) -> CompartmentId {
        self.store.compartments[self.index]
    }

    /// Parameter value by layout position.
    pub fn param(&self, field: usize) -> f64 {
        self.store.params[field][self.index]
    }

    /// State value by layout position.
    pub fn state(&self, field: usize) -> f64 {
        self.store.states[field][self.index]
    }

    /// Assigned value by layout position (as of the last evaluation).
    pub fn assigned(&self, field: usize) -> f64 {
        self.store.assigned[field][self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::UpdateKind;

    fn spec() -> MechanismSpec {
        MechanismSpec::new("naf")
            .with_param("gbar", 120.0)
            .with_param("ena", 50.0)
            .with_state("m", UpdateKind::Exponential)
            .with_state("h", UpdateKind::Exponential)
            .with_assigned("g")
            .with_assigned("i")
    }

    #[test]
    fn insert_applies_parameter_defaults() {
        let mut store = InstanceStore::new(&spec());
        let idx = store.insert(CompartmentId(0)).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(
            store.value(0, FieldClass::Parameter, "gbar").unwrap(),
            120.0
        );
        assert_eq!(store.value(0, FieldClass::State, "m").unwrap(), 0.0);
    }

    #[test]
    fn duplicate_compartment_rejected() {
        let mut store = InstanceStore::new(&spec());
        store.insert(CompartmentId(3)).unwrap();
        let err = store.insert(CompartmentId(3)).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateInstance { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn index_for_is_stable() {
        let mut store = InstanceStore::new(&spec());
        for c in 0..100 {
            store.insert(CompartmentId(c)).unwrap();
        }
        let before = store.index_for(CompartmentId(7)).unwrap();
        store.reserve(1000).unwrap();
        for c in 100..200 {
            store.insert(CompartmentId(c)).unwrap();
        }
        assert_eq!(store.index_for(CompartmentId(7)).unwrap(), before);
    }

    #[test]
    fn every_field_round_trips() {
        let mut store = InstanceStore::new(&spec());
        let n = 16;
        store.reserve(n).unwrap();
        for c in 0..n {
            store.insert(CompartmentId(c)).unwrap();
        }
        let s = spec();
        for class in [FieldClass::Parameter, FieldClass::State, FieldClass::Assigned] {
            for name in s.field_names(class) {
                for i in 0..n {
                    let v = (i as f64) * 1.5 - 3.0;
                    store.set_value(i, class, &name, v).unwrap();
                    assert_eq!(store.value(i, class, &name).unwrap(), v);
                }
            }
        }
    }

    #[test]
    fn field_view_is_contiguous_over_instances() {
        let mut store = InstanceStore::new(&spec());
        for c in 0..4 {
            let i = store.insert(CompartmentId(c)).unwrap();
            store
                .set_value(i, FieldClass::State, "m", c as f64)
                .unwrap();
        }
        let view = store.field_view(FieldClass::State, "m").unwrap();
        assert_eq!(view, &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn unknown_field_errors() {
        let store = InstanceStore::new(&spec());
        assert!(matches!(
            store.field_view(FieldClass::Parameter, "nope"),
            Err(ModelError::UnknownField { .. })
        ));
    }

    #[test]
    fn instance_view_reads_by_position() {
        let mut store = InstanceStore::new(&spec());
        store.insert(CompartmentId(9)).unwrap();
        store.set_value(0, FieldClass::State, "h", 0.6).unwrap();
        let inst = store.instance(0);
        assert_eq!(inst.param(0), 120.0);
        assert_eq!(inst.state(1), 0.6);
        assert_eq!(inst.compartment(), CompartmentId(9));
    }

    #[test]
    fn state_rows_round_trip() {
        let mut store = InstanceStore::new(&spec());
        store.insert(CompartmentId(0)).unwrap();
        store.write_state_row(0, &[0.1, 0.9]);
        let mut row = [0.0; 2];
        store.read_state_row(0, &mut row);
        assert_eq!(row, [0.1, 0.9]);
        assert_eq!(store.state_at(0, 1), 0.9);
    }
}
