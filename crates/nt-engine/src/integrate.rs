//! The integration adapter: one update rule per kinetics variant.
//!
//! The exponential rule is exact for relaxation kinetics and unconditionally
//! stable for arbitrary `dt`; mechanisms whose states fit the form
//! `dx/dt = (x_inf - x)/tau` should prefer it over an explicit step, which
//! is a known stability risk for fast gating variables.

use nt_core::Kinetics;

/// Advance one state value by `dt` (ms) according to its kinetics.
pub fn advance(kinetics: Kinetics, x: f64, dt: f64) -> f64 {
    match kinetics {
        Kinetics::Explicit { dxdt } => x + dt * dxdt,
        Kinetics::Exponential { target, tau } => target + (x - target) * (-dt / tau).exp(),
        Kinetics::Linearized { dxdt, dfdx } => x + dt * dxdt / (1.0 - dt * dfdx),
    }
}
