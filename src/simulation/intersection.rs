//! Intersection queueing and signal state
//!
//! Each intersection keeps a FIFO queue of normal vehicles per outbound
//! direction and a single emergency queue shared across all directions.
//! At most one direction is green at any time.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use super::types::{CongestionLevel, IntersectionId};
use super::vehicle::{Vehicle, VehicleClass};

/// Heap entry for the shared emergency queue
///
/// `BinaryHeap` is a max-heap; the ordering is inverted so the earliest
/// arrival (then the lowest id) pops first.
#[derive(Debug)]
struct EmergencyEntry(Vehicle);

impl PartialEq for EmergencyEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EmergencyEntry {}

impl PartialOrd for EmergencyEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EmergencyEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .arrival_tick
            .cmp(&self.0.arrival_tick)
            .then_with(|| other.0.id.cmp(&self.0.id))
    }
}

/// An intersection node in the road network
#[derive(Debug)]
#[allow(dead_code)]
pub struct Intersection {
    pub id: IntersectionId,
    /// FIFO queue of normal vehicles per outbound direction
    queues: HashMap<IntersectionId, VecDeque<Vehicle>>,
    /// Directions in registration order, for deterministic iteration
    lane_order: Vec<IntersectionId>,
    /// Emergency vehicles, shared across all directions at this node
    emergency_queue: BinaryHeap<EmergencyEntry>,
    /// The currently green direction, if any
    green: Option<IntersectionId>,
}

impl Intersection {
    pub fn new(id: IntersectionId) -> Self {
        Self {
            id,
            queues: HashMap::new(),
            lane_order: Vec::new(),
            emergency_queue: BinaryHeap::new(),
            green: None,
        }
    }

    /// Register a direction with an empty queue and a red signal. Idempotent.
    pub fn add_lane(&mut self, direction: &IntersectionId) {
        if !self.queues.contains_key(direction) {
            self.queues.insert(direction.clone(), VecDeque::new());
            self.lane_order.push(direction.clone());
        }
    }

    /// Queue a vehicle toward the given direction, registering the lane if
    /// missing. Emergency vehicles go to the shared queue regardless of
    /// direction.
    pub fn enqueue_vehicle(&mut self, direction: &IntersectionId, vehicle: Vehicle) {
        self.add_lane(direction);
        match vehicle.class {
            VehicleClass::Emergency => self.emergency_queue.push(EmergencyEntry(vehicle)),
            VehicleClass::Normal => {
                if let Some(queue) = self.queues.get_mut(direction) {
                    queue.push_back(vehicle);
                }
            }
        }
    }

    /// Serve one vehicle. A queued emergency vehicle preempts every
    /// direction's release slot; otherwise the named direction's FIFO is
    /// popped. Unknown or empty directions serve nothing.
    pub fn dequeue_vehicle(&mut self, direction: &IntersectionId) -> Option<Vehicle> {
        if let Some(entry) = self.emergency_queue.pop() {
            return Some(entry.0);
        }
        self.queues.get_mut(direction)?.pop_front()
    }

    /// Make exactly this direction green, clearing all others
    pub fn set_green(&mut self, direction: &IntersectionId) {
        self.green = Some(direction.clone());
    }

    #[allow(dead_code)]
    pub fn is_green(&self, direction: &IntersectionId) -> bool {
        self.green.as_ref() == Some(direction)
    }

    pub fn green_direction(&self) -> Option<&IntersectionId> {
        self.green.as_ref()
    }

    /// Normal vehicles queued toward a direction, zero if unknown
    pub fn queue_size(&self, direction: &IntersectionId) -> usize {
        self.queues.get(direction).map_or(0, VecDeque::len)
    }

    /// All queued vehicles at this node, including the emergency queue
    pub fn total_queue_size(&self) -> usize {
        let normal: usize = self.queues.values().map(VecDeque::len).sum();
        normal + self.emergency_queue.len()
    }

    #[allow(dead_code)]
    pub fn emergency_queue_size(&self) -> usize {
        self.emergency_queue.len()
    }

    /// Registered directions in registration order
    pub fn lanes(&self) -> impl Iterator<Item = &IntersectionId> {
        self.lane_order.iter()
    }

    #[allow(dead_code)]
    pub fn lane_count(&self) -> usize {
        self.lane_order.len()
    }

    /// Congestion bucket for renderer coloring
    pub fn congestion_level(&self) -> CongestionLevel {
        CongestionLevel::from_queue_depth(self.total_queue_size())
    }
}
