//! Tick-driven simulation engine
//!
//! Drives the discrete simulation loop over a road graph: one vehicle
//! release per intersection per tick, random signal rotation, and
//! stochastic vehicle injection with congestion-aware rerouting.

use std::collections::HashSet;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;

use super::road_graph::{RoadGraph, RouteError};
use super::stats::StatsCollector;
use super::types::{IntersectionId, VehicleId, CONGESTION_THRESHOLD};
use super::vehicle::{Vehicle, VehicleClass};

/// Probability that a tick injects one additional random vehicle
pub const SPAWN_PROBABILITY: f64 = 0.3;

/// Probability that an injected vehicle is classified emergency
pub const EMERGENCY_PROBABILITY: f64 = 0.1;

/// Observer feed entry, one per vehicle release or injection
///
/// Emitted fire-and-forget: the engine logs each event and returns the
/// tick's batch to the caller, and never depends on who consumes them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum TrafficEvent {
    /// A vehicle was served at an intersection
    Released {
        tick: u64,
        vehicle: VehicleId,
        class: VehicleClass,
        intersection: IntersectionId,
        direction: IntersectionId,
    },
    /// A vehicle entered the network
    Injected {
        tick: u64,
        vehicle: VehicleId,
        class: VehicleClass,
        source: IntersectionId,
        first_hop: IntersectionId,
        rerouted: bool,
    },
}

/// The main simulation engine
///
/// Owns the road graph and the statistics, advances a logical clock one
/// tick at a time, and issues vehicle ids so no global counter exists.
pub struct TrafficEngine {
    graph: RoadGraph,
    stats: StatsCollector,
    /// Logical clock, advanced once per tick
    clock: u64,
    next_id: u64,
    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl TrafficEngine {
    pub fn new(graph: RoadGraph) -> Self {
        Self::new_internal(graph, None)
    }

    /// Create an engine with a seeded RNG for reproducible runs
    pub fn with_seed(graph: RoadGraph, seed: u64) -> Self {
        Self::new_internal(graph, Some(StdRng::seed_from_u64(seed)))
    }

    fn new_internal(graph: RoadGraph, rng: Option<StdRng>) -> Self {
        Self {
            graph,
            stats: StatsCollector::new(),
            clock: 0,
            next_id: 1,
            rng,
        }
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    #[allow(dead_code)]
    pub fn graph_mut(&mut self) -> &mut RoadGraph {
        &mut self.graph
    }

    pub fn stats(&self) -> &StatsCollector {
        &self.stats
    }

    /// Get a random value in [0, 1), using the seeded RNG if available
    fn random_f64(&mut self) -> f64 {
        match &mut self.rng {
            Some(rng) => rng.random(),
            None => rand::rng().random(),
        }
    }

    /// Choose a random element from a slice, using the seeded RNG if available
    fn choose_random<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        match &mut self.rng {
            Some(rng) => slice.choose(rng),
            None => slice.choose(&mut rand::rng()),
        }
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Advance the simulation by one tick.
    ///
    /// Releases at most one vehicle per intersection from its green
    /// direction, rotates every signal to a random registered lane, then
    /// injects one random vehicle with probability `SPAWN_PROBABILITY`.
    /// Returns the tick's observer events.
    pub fn tick(&mut self) -> Vec<TrafficEvent> {
        self.clock += 1;
        let mut events = Vec::new();

        let ids: Vec<IntersectionId> = self.graph.intersection_ids().cloned().collect();

        for id in &ids {
            if let Some(event) = self.release_one(id) {
                events.push(event);
            }
        }

        for id in &ids {
            self.rotate_signal(id);
        }

        if self.random_f64() < SPAWN_PROBABILITY {
            if let Some(event) = self.add_random_vehicle() {
                events.push(event);
            }
        }

        events
    }

    /// Serve one vehicle at the intersection's green direction, if any
    fn release_one(&mut self, id: &IntersectionId) -> Option<TrafficEvent> {
        let node = self.graph.intersection_mut(id)?;
        let direction = node.green_direction()?.clone();
        let mut vehicle = node.dequeue_vehicle(&direction)?;
        vehicle.complete(self.clock);
        self.stats.record(&vehicle);
        debug!(
            "[tick {}] cleared {} ({:?}) at {} -> {}",
            self.clock, vehicle.id, vehicle.class, id, direction
        );
        Some(TrafficEvent::Released {
            tick: self.clock,
            vehicle: vehicle.id,
            class: vehicle.class,
            intersection: id.clone(),
            direction,
        })
    }

    /// Make a uniformly chosen registered lane green.
    ///
    /// The previous choice is discarded; there is no fairness or starvation
    /// guarantee.
    fn rotate_signal(&mut self, id: &IntersectionId) {
        let lanes: Vec<IntersectionId> = match self.graph.intersection(id) {
            Some(node) => node.lanes().cloned().collect(),
            None => return,
        };
        let Some(direction) = self.choose_random(&lanes).cloned() else {
            return;
        };
        if let Some(node) = self.graph.intersection_mut(id) {
            node.set_green(&direction);
        }
    }

    /// Inject one vehicle between two distinct random intersections.
    ///
    /// A routing failure is an expected outcome and only skips this
    /// injection.
    pub fn add_random_vehicle(&mut self) -> Option<TrafficEvent> {
        let ids: Vec<IntersectionId> = self.graph.intersection_ids().cloned().collect();
        if ids.len() < 2 {
            return None;
        }

        let start = self.choose_random(&ids)?.clone();
        let end = loop {
            let candidate = self.choose_random(&ids)?.clone();
            if candidate != start {
                break candidate;
            }
        };

        let class = if self.random_f64() < EMERGENCY_PROBABILITY {
            VehicleClass::Emergency
        } else {
            VehicleClass::Normal
        };

        match self.spawn_vehicle(&start, &end, class) {
            Ok(event) => Some(event),
            Err(err) => {
                info!("[tick {}] injection skipped: {}", self.clock, err);
                None
            }
        }
    }

    /// Route a vehicle from `start` to `end` and queue it at its first hop.
    ///
    /// If the cheapest first hop is congested, a path avoiding it is tried;
    /// when no viable alternate exists the congested route is kept.
    pub fn spawn_vehicle(
        &mut self,
        start: &IntersectionId,
        end: &IntersectionId,
        class: VehicleClass,
    ) -> Result<TrafficEvent, RouteError> {
        let path = self.graph.shortest_path(start, end)?;
        if path.len() < 2 {
            return Err(RouteError::NoPath {
                from: start.clone(),
                to: end.clone(),
            });
        }

        let mut first_hop = path[1].clone();
        let mut rerouted = false;

        let congested = self
            .graph
            .intersection(start)
            .is_some_and(|node| node.queue_size(&first_hop) >= CONGESTION_THRESHOLD);

        if congested {
            let excluded = HashSet::from([first_hop.clone()]);
            if let Ok(alternate) = self.graph.shortest_path_avoiding(start, end, &excluded) {
                if alternate.len() >= 2 {
                    first_hop = alternate[1].clone();
                    rerouted = true;
                }
            }
        }

        let vehicle = Vehicle::new(self.next_vehicle_id(), class, self.clock);
        let event = TrafficEvent::Injected {
            tick: self.clock,
            vehicle: vehicle.id,
            class,
            source: start.clone(),
            first_hop: first_hop.clone(),
            rerouted,
        };

        let node = self
            .graph
            .intersection_mut(start)
            .ok_or_else(|| RouteError::UnknownIntersection(start.clone()))?;
        node.enqueue_vehicle(&first_hop, vehicle);

        debug!(
            "[tick {}] added {:?} at {} -> {}{}",
            self.clock,
            class,
            start,
            first_hop,
            if rerouted { " (rerouted)" } else { "" }
        );
        Ok(event)
    }
}
