//! Common test utilities for conceptmap integration tests
//!
//! `Fixture` builds small hand-written graphs addressed by concept name;
//! `random` generates seeded stores for property-style checks.

#![allow(dead_code)]

pub mod fixture;
pub mod random;

pub use fixture::Fixture;
pub use random::{random_graph, RandomGraph, RandomGraphConfig};
