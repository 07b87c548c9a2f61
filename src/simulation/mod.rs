//! Standalone traffic simulation module
//!
//! This module contains all the core road-network traffic flow logic: the
//! weighted road graph and its routing, per-intersection queueing and
//! signal state, vehicle records, wait-time statistics, and the tick-driven
//! engine that ties them together. It runs independently of any renderer
//! and can be exercised from the console or from tests.

mod engine;
mod intersection;
mod road_graph;
mod stats;
mod types;
mod vehicle;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use engine::{TrafficEngine, TrafficEvent, EMERGENCY_PROBABILITY, SPAWN_PROBABILITY};
#[allow(unused_imports)]
pub use intersection::Intersection;
#[allow(unused_imports)]
pub use road_graph::{RoadEdge, RoadGraph, RouteError};
#[allow(unused_imports)]
pub use stats::{StatsCollector, IDLE_EFFICIENCY_SCORE};
#[allow(unused_imports)]
pub use types::{CongestionLevel, IntersectionId, VehicleId, CONGESTION_THRESHOLD};
#[allow(unused_imports)]
pub use vehicle::{Vehicle, VehicleClass};
