//! # Scenario tests that require a look inside the crate.
//!
//! Each module describes a small problem at a single decision point, as an `InMemoryModel` built by
//! `fn model()`. Variables and rows are handed out of order, so that the tests also exercise the
//! entity index.
