//! Reference membrane mechanisms for neurite.
//!
//! A small library of classic conductances exercising every update kind the
//! engine supports: exponential gating (sodium and potassium channels), an
//! explicit calcium pool, and a linearized calcium-gated potassium current.
//! [`standard`] registers the full roster in its canonical order.
//!
//! Units follow the usual density conventions: voltages in mV, time in ms,
//! conductance densities in mS/cm², current densities in µA/cm², and
//! concentrations in mM.

/// Intracellular calcium pool.
pub mod calcium;
/// Voltage-dependent rate helpers shared by the gated channels.
pub mod gate;
/// Passive leak conductance.
pub mod leak;
/// Potassium currents: delayed rectifier, M-current, AHP current.
pub mod potassium;
/// Sodium currents: fast transient and persistent.
pub mod sodium;
/// The canonical registration roster.
pub mod standard;

/// Re-export of [`calcium::CalciumPool`].
pub use calcium::CalciumPool;
/// Re-export of [`leak::Leak`].
pub use leak::Leak;
/// Re-exports of the potassium mechanisms.
pub use potassium::{KAhp, KMuscarinic, KRectifier};
/// Re-exports of the sodium mechanisms.
pub use sodium::{NaPersistent, NaTransient};
/// Re-export of [`standard::standard`].
pub use standard::standard;
