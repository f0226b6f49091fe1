//! Core types for neurite: mechanism specs, the registry, and instance storage.
//!
//! This crate defines the data model that mechanism libraries plug into. It is
//! independent of any particular solver: you can construct a [`Registry`]
//! programmatically, populate per-type [`InstanceStore`]s, and evaluate them
//! with whatever step driver you like (nt-engine ships a reference one).

/// Compartment identifiers and the solver-owned compartment table.
pub mod compartment;
/// Error types used throughout the crate.
pub mod error;
/// The capability trait all mechanisms implement, and per-state kinetics.
pub mod mechanism;
/// The insertion-ordered mechanism registry.
pub mod registry;
/// Mechanism layout metadata: field lists and update kinds.
pub mod spec;
/// Structure-of-arrays per-instance storage, one store per mechanism type.
pub mod store;

/// Re-export compartment types.
pub use compartment::{Compartment, CompartmentId, CompartmentTable};
/// Re-export error types.
pub use error::{ModelError, ModelResult};
/// Re-export the mechanism capability trait and kinetics.
pub use mechanism::{Kinetics, Mechanism};
/// Re-export registry types.
pub use registry::{MechanismDescriptor, MechanismId, Registry};
/// Re-export spec types.
pub use spec::{FieldClass, MechanismSpec, ParamField, StateField, UpdateKind};
/// Re-export storage types.
pub use store::{Instance, InstanceStore};
