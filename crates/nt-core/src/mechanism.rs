use crate::spec::MechanismSpec;
use crate::store::Instance;

/// Kinetic quantities for one state variable at the current operating point.
///
/// The integration adapter advances the state by the variant returned here;
/// the declared [`UpdateKind`](crate::spec::UpdateKind) in the spec is the
/// registration-time contract the variant is expected to honor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kinetics {
    /// `dx/dt`, advanced with a first-order explicit step.
    Explicit {
        /// Time derivative of the state.
        dxdt: f64,
    },
    /// Relaxation `dx/dt = (target - x)/tau`, advanced with the exact
    /// exponential update `x' = target + (x - target)·exp(-dt/tau)`.
    Exponential {
        /// The steady-state value the state relaxes toward.
        target: f64,
        /// Relaxation time constant, in ms. Must be positive.
        tau: f64,
    },
    /// `dx/dt` with its own-state partial `∂f/∂x`, advanced with a
    /// linearized implicit-Euler step `x' = x + dt·dxdt/(1 - dt·dfdx)`.
    Linearized {
        /// Time derivative of the state at the current point.
        dxdt: f64,
        /// Partial of the derivative with respect to the state itself.
        dfdx: f64,
    },
}

/// The capability set every mechanism implements.
///
/// A mechanism is registered once per process and evaluated over its entire
/// instance store each step. Evaluation receives a read-only view of the
/// instance's own fields plus the owning compartment's voltage; a mechanism
/// writes back only its returned current, its assigned row, and (through
/// [`Kinetics`]) its own states.
///
/// Implementations must be `Send + Sync`: descriptors are immutable after
/// registration and readable from any thread.
pub trait Mechanism: Send + Sync {
    /// Layout and kinetic declaration for this mechanism type.
    ///
    /// Called once at registration; the result is immutable for the process
    /// lifetime.
    fn spec(&self) -> MechanismSpec;

    /// Whether this mechanism supplies a Jacobian (dI/dV) contribution.
    ///
    /// Declaring a state with the implicit update kind without this
    /// capability fails registration.
    fn provides_jacobian(&self) -> bool {
        false
    }

    /// Initialize one instance's state row at the given voltage (mV).
    ///
    /// `state` is seeded with the current values (zeros for a fresh store)
    /// and written back afterwards, in layout order.
    fn init(&self, v: f64, inst: &Instance<'_>, state: &mut [f64]);

    /// Membrane current density for one instance at voltage `v`, in µA/cm²
    /// (positive outward). `assigned` is the instance's assigned row, seeded
    /// with the previous values and written back after the call.
    fn current(&self, v: f64, inst: &Instance<'_>, assigned: &mut [f64]) -> f64;

    /// Jacobian contribution dI/dV in mS/cm². Only consulted when
    /// [`provides_jacobian`](Mechanism::provides_jacobian) is `true`.
    fn conductance(&self, _v: f64, _inst: &Instance<'_>) -> f64 {
        0.0
    }

    /// Kinetic quantities for the state at `state_index`, at voltage `v`.
    ///
    /// Never called for mechanisms without states.
    fn kinetics(&self, state_index: usize, v: f64, inst: &Instance<'_>) -> Kinetics {
        let _ = (state_index, v, inst);
        Kinetics::Explicit { dxdt: 0.0 }
    }
}
