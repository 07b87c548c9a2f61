//! Road network graph and routing
//!
//! Standalone graph of intersections connected by weighted directed roads.
//! Shortest paths run A* with a null heuristic (Dijkstra) over the petgraph
//! adjacency; the congestion-avoiding variant searches a filtered edge view
//! instead of mutating shared state.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::warn;
use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{EdgeFiltered, EdgeRef};

use super::intersection::Intersection;
use super::types::IntersectionId;

/// Routing failures, distinguishable so callers can log and skip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// An endpoint was never registered with the graph
    UnknownIntersection(IntersectionId),
    /// Both endpoints exist but no road sequence connects them
    NoPath {
        from: IntersectionId,
        to: IntersectionId,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::UnknownIntersection(id) => write!(f, "unknown intersection {id}"),
            RouteError::NoPath { from, to } => write!(f, "no path from {from} to {to}"),
        }
    }
}

impl std::error::Error for RouteError {}

/// Edge data for a directed road
#[derive(Debug, Clone, Copy)]
pub struct RoadEdge {
    /// Travel cost, always at least 1
    pub weight: u32,
}

impl RoadEdge {
    fn new(weight: u32) -> Self {
        Self {
            weight: weight.max(1),
        }
    }
}

/// The road network: intersection nodes plus weighted directed adjacency
///
/// A bidirectional street is represented as two edges. Parallel edges are
/// kept as-is; the path search simply never picks the costlier one.
#[derive(Default)]
pub struct RoadGraph {
    /// The underlying petgraph directed graph
    graph: DiGraph<IntersectionId, RoadEdge>,

    /// Maps intersection ids to their node indices in the graph
    id_to_node: HashMap<IntersectionId, NodeIndex>,

    /// Intersection state, owned by the graph
    intersections: HashMap<IntersectionId, Intersection>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an intersection. Calling again with the same id is a no-op.
    pub fn add_intersection(&mut self, id: impl Into<IntersectionId>) {
        let id = id.into();
        if self.id_to_node.contains_key(&id) {
            return;
        }
        let node = self.graph.add_node(id.clone());
        self.id_to_node.insert(id.clone(), node);
        self.intersections.insert(id.clone(), Intersection::new(id));
    }

    /// Append a directed road from `from` to `to`.
    ///
    /// Roads referencing an unregistered endpoint are rejected and logged;
    /// the graph is left untouched.
    pub fn add_road(
        &mut self,
        from: &IntersectionId,
        to: &IntersectionId,
        weight: u32,
    ) -> Result<(), RouteError> {
        let (from_node, to_node) = match (self.id_to_node.get(from), self.id_to_node.get(to)) {
            (Some(from_node), Some(to_node)) => (*from_node, *to_node),
            (None, _) => {
                warn!("cannot add road {from} -> {to}: unknown intersection {from}");
                return Err(RouteError::UnknownIntersection(from.clone()));
            }
            (_, None) => {
                warn!("cannot add road {from} -> {to}: unknown intersection {to}");
                return Err(RouteError::UnknownIntersection(to.clone()));
            }
        };
        self.graph.add_edge(from_node, to_node, RoadEdge::new(weight));
        Ok(())
    }

    /// Cheapest path from `start` to `end`, inclusive of both endpoints.
    ///
    /// A trip from a node to itself has no hops and yields an empty path.
    pub fn shortest_path(
        &self,
        start: &IntersectionId,
        end: &IntersectionId,
    ) -> Result<Vec<IntersectionId>, RouteError> {
        self.shortest_path_avoiding(start, end, &HashSet::new())
    }

    /// Cheapest path whose first hop out of `start` avoids every id in
    /// `excluded_first_hops`.
    ///
    /// The search runs over a filtered view of the adjacency; the graph
    /// itself is never mutated, so plain and avoiding queries interleave
    /// freely.
    pub fn shortest_path_avoiding(
        &self,
        start: &IntersectionId,
        end: &IntersectionId,
        excluded_first_hops: &HashSet<IntersectionId>,
    ) -> Result<Vec<IntersectionId>, RouteError> {
        let start_node = self.node_index(start)?;
        let end_node = self.node_index(end)?;
        if start_node == end_node {
            return Ok(Vec::new());
        }

        let filtered = EdgeFiltered::from_fn(&self.graph, |edge| {
            edge.source() != start_node || !excluded_first_hops.contains(&self.graph[edge.target()])
        });

        let (_, node_path) = astar(
            &filtered,
            start_node,
            |node| node == end_node,
            |edge| edge.weight().weight,
            |_| 0, // Null heuristic = Dijkstra
        )
        .ok_or_else(|| RouteError::NoPath {
            from: start.clone(),
            to: end.clone(),
        })?;

        Ok(node_path
            .iter()
            .map(|node| self.graph[*node].clone())
            .collect())
    }

    fn node_index(&self, id: &IntersectionId) -> Result<NodeIndex, RouteError> {
        self.id_to_node
            .get(id)
            .copied()
            .ok_or_else(|| RouteError::UnknownIntersection(id.clone()))
    }

    pub fn intersection(&self, id: &IntersectionId) -> Option<&Intersection> {
        self.intersections.get(id)
    }

    pub fn intersection_mut(&mut self, id: &IntersectionId) -> Option<&mut Intersection> {
        self.intersections.get_mut(id)
    }

    #[allow(dead_code)]
    pub fn contains(&self, id: &IntersectionId) -> bool {
        self.id_to_node.contains_key(id)
    }

    /// Intersection ids in registration order
    pub fn intersection_ids(&self) -> impl Iterator<Item = &IntersectionId> {
        self.graph.node_indices().map(move |node| &self.graph[node])
    }

    #[allow(dead_code)]
    pub fn intersection_count(&self) -> usize {
        self.id_to_node.len()
    }

    #[allow(dead_code)]
    pub fn road_count(&self) -> usize {
        self.graph.edge_count()
    }
}
