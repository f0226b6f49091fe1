use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// How a state variable is advanced by the integration adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    /// `state' = f(state, params, assigned)`, advanced with an explicit step.
    Explicit,
    /// `dx/dt = (x_inf - x)/tau`, advanced with the exact exponential update.
    /// Unconditionally stable for any `dt`; preferred for gating variables.
    Exponential,
    /// Linearized implicit update; the mechanism must also contribute a
    /// Jacobian (conductance) term to the outer solver.
    Implicit,
}

impl std::fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit"),
            Self::Exponential => write!(f, "exponential"),
            Self::Implicit => write!(f, "implicit"),
        }
    }
}

/// Which column family a field lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldClass {
    /// Per-instance constants, set at build time.
    Parameter,
    /// Integrated variables, advanced each step.
    State,
    /// Derived values recomputed each step from parameters and state.
    Assigned,
}

impl std::fmt::Display for FieldClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parameter => write!(f, "parameter"),
            Self::State => write!(f, "state"),
            Self::Assigned => write!(f, "assigned"),
        }
    }
}

/// A parameter field and its default value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamField {
    /// Field name, unique within the mechanism's parameter list.
    pub name: String,
    /// Value new instances start with.
    pub default: f64,
}

/// A state field and its declared update kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateField {
    /// Field name, unique within the mechanism's state list.
    pub name: String,
    /// The update rule the integration adapter applies to this state.
    pub kind: UpdateKind,
}

/// Immutable layout metadata for one mechanism type.
///
/// Field order is the column layout order: mechanisms address their own
/// fields by position, so the order declared here is a contract for the
/// lifetime of the registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MechanismSpec {
    /// Unique mechanism name.
    pub name: String,
    /// Ordered parameter fields.
    pub parameters: Vec<ParamField>,
    /// Ordered state fields.
    pub states: Vec<StateField>,
    /// Ordered assigned (derived) field names.
    pub assigned: Vec<String>,
}

impl MechanismSpec {
    /// Start a spec with the given mechanism name and no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            states: Vec::new(),
            assigned: Vec::new(),
        }
    }

    /// Append a parameter field with its default value.
    pub fn with_param(mut self, name: impl Into<String>, default: f64) -> Self {
        self.parameters.push(ParamField {
            name: name.into(),
            default,
        });
        self
    }

    /// Append a state field with its update kind.
    pub fn with_state(mut self, name: impl Into<String>, kind: UpdateKind) -> Self {
        self.states.push(StateField {
            name: name.into(),
            kind,
        });
        self
    }

    /// Append an assigned field.
    pub fn with_assigned(mut self, name: impl Into<String>) -> Self {
        self.assigned.push(name.into());
        self
    }

    /// Number of fields in the given class.
    pub fn field_count(&self, class: FieldClass) -> usize {
        match class {
            FieldClass::Parameter => self.parameters.len(),
            FieldClass::State => self.states.len(),
            FieldClass::Assigned => self.assigned.len(),
        }
    }

    /// Position of a field name within its class, if present.
    pub fn field_index(&self, class: FieldClass, name: &str) -> Option<usize> {
        match class {
            FieldClass::Parameter => self.parameters.iter().position(|p| p.name == name),
            FieldClass::State => self.states.iter().position(|s| s.name == name),
            FieldClass::Assigned => self.assigned.iter().position(|a| a == name),
        }
    }

    /// Return `true` if any state declares the given update kind.
    pub fn has_state_kind(&self, kind: UpdateKind) -> bool {
        self.states.iter().any(|s| s.kind == kind)
    }

    /// Validate the layout once, at registration.
    ///
    /// `provides_jacobian` is the mechanism's declared capability; a state
    /// declared [`UpdateKind::Implicit`] without it is inconsistent.
    pub fn validate(&self, provides_jacobian: bool) -> ModelResult<()> {
        if self.name.is_empty() {
            return Err(ModelError::InvalidDescriptor {
                mechanism: String::from("<unnamed>"),
                reason: String::from("mechanism name is empty"),
            });
        }
        for (class, names) in [
            (FieldClass::Parameter, self.field_names(FieldClass::Parameter)),
            (FieldClass::State, self.field_names(FieldClass::State)),
            (FieldClass::Assigned, self.field_names(FieldClass::Assigned)),
        ] {
            for (i, name) in names.iter().enumerate() {
                if name.is_empty() {
                    return Err(ModelError::InvalidDescriptor {
                        mechanism: self.name.clone(),
                        reason: format!("{class} field {i} has an empty name"),
                    });
                }
                if names[..i].contains(name) {
                    return Err(ModelError::InvalidDescriptor {
                        mechanism: self.name.clone(),
                        reason: format!("duplicate {class} field \"{name}\""),
                    });
                }
            }
        }
        if self.has_state_kind(UpdateKind::Implicit) && !provides_jacobian {
            return Err(ModelError::InvalidDescriptor {
                mechanism: self.name.clone(),
                reason: String::from(
                    "a state declares the implicit update kind but the mechanism \
                     provides no Jacobian contribution",
                ),
            });
        }
        Ok(())
    }

    /// Field names of one class, in layout order.
    pub fn field_names(&self, class: FieldClass) -> Vec<String> {
        match class {
            FieldClass::Parameter => self.parameters.iter().map(|p| p.name.clone()).collect(),
            FieldClass::State => self.states.iter().map(|s| s.name.clone()).collect(),
            FieldClass::Assigned => self.assigned.clone(),
        }
    }
}
