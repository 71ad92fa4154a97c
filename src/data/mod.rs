//! # Solver state and the containers it is extracted into
//!
//! This module provides the read-only view on a solver that observation functions work with, and the
//! data structures that observations are made of.

pub mod linear_algebra;
pub mod model;
