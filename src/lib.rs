//! # Observations of a branch-and-bound solver
//!
//! Converts the state of a mixed integer programming solver into numbers for learning algorithms:
//! dense feature matrices, sparse bipartite graphs and per variable score vectors. The solver is
//! accessed through the read-only `data::model::Model` trait; every observation function implements
//! `observation::ObservationFunction` and is driven by a control loop that resets it once per
//! episode and extracts once per decision point.
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;
pub mod observation;

#[cfg(test)]
mod tests;
