/*
 * Responsibility
 * - 認証まわりの middleware (access gate)
 */
pub mod gate;

pub use gate::{AccessGate, ExemptionSet};
