use std::collections::TryReserveError;

use crate::compartment::CompartmentId;

/// Alias for `Result<T, ModelError>`.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while building a model.
///
/// Registration-time errors ([`DuplicateName`](ModelError::DuplicateName),
/// [`InvalidDescriptor`](ModelError::InvalidDescriptor)) are fatal to startup:
/// there is no well-defined partial-registration state to recover into.
/// Numerical divergence during evaluation is not an error; it is reported as
/// data by the dispatch engine.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A mechanism with the same name is already registered.
    #[error("mechanism already registered: \"{0}\"")]
    DuplicateName(String),

    /// A mechanism's declared layout or capabilities are inconsistent.
    #[error("invalid mechanism \"{mechanism}\": {reason}")]
    InvalidDescriptor {
        /// The offending mechanism's name.
        mechanism: String,
        /// What the validation check found.
        reason: String,
    },

    /// Lookup of a mechanism name that was never registered.
    #[error("mechanism not found: \"{0}\"")]
    NotFound(String),

    /// A field name that is not part of the mechanism's layout.
    #[error("unknown field \"{field}\" on mechanism \"{mechanism}\"")]
    UnknownField {
        /// The mechanism whose layout was consulted.
        mechanism: String,
        /// The unresolved field name.
        field: String,
    },

    /// Instance storage could not grow to the requested capacity.
    #[error("instance storage exhausted for \"{mechanism}\"")]
    Allocation {
        /// The mechanism whose store failed to grow.
        mechanism: String,
        /// The underlying reservation failure.
        #[source]
        source: TryReserveError,
    },

    /// A compartment already holds an instance of this mechanism type.
    #[error("compartment {compartment} already has an instance of \"{mechanism}\"")]
    DuplicateInstance {
        /// The mechanism being inserted.
        mechanism: String,
        /// The compartment that already has one.
        compartment: CompartmentId,
    },
}
