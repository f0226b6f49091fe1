use std::collections::HashMap;
use std::fmt;

use crate::error::{ModelError, ModelResult};
use crate::mechanism::Mechanism;
use crate::spec::MechanismSpec;

/// Dense type id of a registered mechanism, equal to its registration
/// position. Ids are never reused; unregistration is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MechanismId(pub usize);

impl fmt::Display for MechanismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mech{}", self.0)
    }
}

/// One registered mechanism type: its id, validated spec, and behavior.
pub struct MechanismDescriptor {
    id: MechanismId,
    spec: MechanismSpec,
    mechanism: Box<dyn Mechanism>,
}

impl MechanismDescriptor {
    /// The dense type id assigned at registration.
    pub fn id(&self) -> MechanismId {
        self.id
    }

    /// The mechanism's unique name.
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// The validated layout metadata.
    pub fn spec(&self) -> &MechanismSpec {
        &self.spec
    }

    /// The behavior object evaluated by the dispatch engine.
    pub fn mechanism(&self) -> &dyn Mechanism {
        self.mechanism.as_ref()
    }
}

impl fmt::Debug for MechanismDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MechanismDescriptor")
            .field("id", &self.id)
            .field("name", &self.spec.name)
            .finish()
    }
}

/// Insertion-ordered table of registered mechanism types.
///
/// Registration order is a contract, not an accident: mechanisms that write
/// the same shared accumulator must produce deterministic results, so the
/// order is fixed by the explicit registration list at the composition root
/// (never by unordered module discovery), and iteration replays it exactly.
///
/// There is no hidden process-global registry; construct one and pass it
/// where it is needed.
#[derive(Debug, Default)]
pub struct Registry {
    descriptors: Vec<MechanismDescriptor>,
    by_name: HashMap<String, MechanismId>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mechanism type. Returns its dense id.
    ///
    /// Fails with [`ModelError::DuplicateName`] if the name is taken and
    /// [`ModelError::InvalidDescriptor`] if the spec is malformed; a failed
    /// call leaves the registry unchanged.
    pub fn register<M: Mechanism + 'static>(&mut self, mechanism: M) -> ModelResult<MechanismId> {
        let spec = mechanism.spec();
        spec.validate(mechanism.provides_jacobian())?;
        if self.by_name.contains_key(&spec.name) {
            return Err(ModelError::DuplicateName(spec.name));
        }

        let id = MechanismId(self.descriptors.len());
        self.by_name.insert(spec.name.clone(), id);
        self.descriptors.push(MechanismDescriptor {
            id,
            spec,
            mechanism: Box::new(mechanism),
        });
        Ok(id)
    }

    /// Resolve a mechanism name to its id.
    pub fn lookup(&self, name: &str) -> ModelResult<MechanismId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::NotFound(name.to_string()))
    }

    /// The descriptor for `id`, if registered.
    pub fn get(&self, id: MechanismId) -> Option<&MechanismDescriptor> {
        self.descriptors.get(id.0)
    }

    /// Iterate descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &MechanismDescriptor> {
        self.descriptors.iter()
    }

    /// Number of registered mechanism types.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Return `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
