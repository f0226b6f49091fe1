use std::fmt;

/// Dense index of a compartment in the solver-owned table.
///
/// Compartments are array slots, not heap objects: ids are assigned in
/// insertion order and never reused. Mechanism instances hold these ids as
/// non-owning back-references into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompartmentId(pub usize);

impl fmt::Display for CompartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmp{}", self.0)
    }
}

/// Passive electrical properties of one compartment.
#[derive(Debug, Clone)]
pub struct Compartment {
    /// Membrane capacitance in µF/cm².
    pub capacitance: f64,
    /// Membrane area in cm² (informational; densities already fold it in).
    pub area: f64,
}

impl Default for Compartment {
    fn default() -> Self {
        Self {
            capacitance: 1.0,
            area: 1.0,
        }
    }
}

/// The compartment table owned by the outer solver.
///
/// Mechanisms read voltages from it during evaluation; only the solver writes
/// them back after the coupled voltage solve. Structurally append-only, like
/// the instance stores that reference it.
#[derive(Debug, Clone, Default)]
pub struct CompartmentTable {
    voltages: Vec<f64>,
    compartments: Vec<Compartment>,
}

impl CompartmentTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a compartment with the given initial voltage (mV). Returns its id.
    pub fn add(&mut self, v_init: f64, compartment: Compartment) -> CompartmentId {
        let id = CompartmentId(self.voltages.len());
        self.voltages.push(v_init);
        self.compartments.push(compartment);
        id
    }

    /// Membrane voltage of a compartment in mV.
    pub fn voltage(&self, id: CompartmentId) -> f64 {
        self.voltages[id.0]
    }

    /// Set a compartment's membrane voltage. Solver-only.
    pub fn set_voltage(&mut self, id: CompartmentId, v: f64) {
        self.voltages[id.0] = v;
    }

    /// Passive properties of a compartment.
    pub fn compartment(&self, id: CompartmentId) -> &Compartment {
        &self.compartments[id.0]
    }

    /// All voltages, indexed by compartment id.
    pub fn voltages(&self) -> &[f64] {
        &self.voltages
    }

    /// Iterate over all compartment ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = CompartmentId> {
        (0..self.voltages.len()).map(CompartmentId)
    }

    /// Number of compartments.
    pub fn len(&self) -> usize {
        self.voltages.len()
    }

    /// Return `true` if the table holds no compartments.
    pub fn is_empty(&self) -> bool {
        self.voltages.is_empty()
    }
}
