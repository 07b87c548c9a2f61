//! Vehicle records for the traffic simulation

use super::types::VehicleId;

/// Classification of a vehicle, used for queue placement at intersections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleClass {
    /// Regular traffic, served in FIFO order per direction
    Normal,
    /// Emergency traffic, served before any direction queue
    Emergency,
}

/// A vehicle traveling through the network
///
/// Created when injected into the simulation and queued at exactly one
/// intersection. Immutable after creation except for the completion tick,
/// which is stamped once when the vehicle is served.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub class: VehicleClass,
    /// Tick at which the vehicle entered its queue
    pub arrival_tick: u64,
    completed_tick: Option<u64>,
}

impl Vehicle {
    pub fn new(id: VehicleId, class: VehicleClass, arrival_tick: u64) -> Self {
        Self {
            id,
            class,
            arrival_tick,
            completed_tick: None,
        }
    }

    /// Stamp the completion tick. Later calls keep the first stamp.
    pub fn complete(&mut self, tick: u64) {
        if self.completed_tick.is_none() {
            self.completed_tick = Some(tick);
        }
    }

    #[allow(dead_code)]
    pub fn completed_tick(&self) -> Option<u64> {
        self.completed_tick
    }

    /// Ticks spent waiting in a queue, zero until the vehicle is served
    pub fn wait_time(&self) -> u64 {
        match self.completed_tick {
            Some(completed) if completed > self.arrival_tick => completed - self.arrival_tick,
            _ => 0,
        }
    }

    #[allow(dead_code)]
    pub fn is_emergency(&self) -> bool {
        self.class == VehicleClass::Emergency
    }
}
