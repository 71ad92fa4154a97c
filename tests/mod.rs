//! # Integration tests
//!
//! Integration tests completely external from the crate. All code written in this module could be
//! written by an external user of the crate: the solver is replaced by recorded states behind the
//! `Model` trait.
mod configuration;
mod episode;
mod serialization;
