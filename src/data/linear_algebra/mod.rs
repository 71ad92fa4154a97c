//! # Linear algebra primitives
//!
//! Containers used to hand solver state to a consumer: dense feature matrices and sparse
//! coordinate matrices.

pub mod matrix;

/// Relative tolerance for comparing values read from the solver.
pub const EPSILON: f64 = 1e-9;
/// Distance to the nearest integer below which a value is considered integral.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;
