//! # Algorithms
//!
//! Numerical routines shared by the observation functions.

pub mod statistics;
pub mod utilities;
