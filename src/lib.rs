//! Road-Network Traffic Flow Simulation Library
//!
//! A queue-based traffic flow simulation that runs independently of any
//! renderer or UI.

pub mod simulation;
