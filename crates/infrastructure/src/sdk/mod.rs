//! Identity SDK adapters.
//!
//! The production identity SDK is a native mobile library; hosts bridge it
//! to the [`IdentitySdk`](parley_application::IdentitySdk) port. This module
//! ships an in-process stand-in for local runs and tests.

mod simulated;

pub use simulated::SimulatedIdentitySdk;
