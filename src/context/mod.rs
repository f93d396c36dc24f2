//! Article context graphs: bounded construction and cached, overlaid reads

mod builder;
mod gateway;

pub use builder::{BuildLimits, GraphCacheBuilder};
pub use gateway::GraphCacheGateway;
