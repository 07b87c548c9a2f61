//! Routing validation tests
//!
//! These tests drive the road graph API directly: registration rules,
//! shortest-path selection, and the non-mutating congestion-avoidance query.

use std::collections::HashSet;

use city_flow::simulation::{IntersectionId, RoadGraph, RouteError};

fn id(name: &str) -> IntersectionId {
    IntersectionId::new(name)
}

/// Build a graph from node names and weighted directed edges
fn graph_from(nodes: &[&str], edges: &[(&str, &str, u32)]) -> RoadGraph {
    let mut graph = RoadGraph::new();
    for node in nodes {
        graph.add_intersection(*node);
    }
    for (from, to, weight) in edges {
        graph
            .add_road(&id(from), &id(to), *weight)
            .expect("edge endpoints should be registered");
    }
    graph
}

#[test]
fn test_direct_edge_path() {
    let graph = graph_from(&["A", "B"], &[("A", "B", 3)]);

    let path = graph
        .shortest_path(&id("A"), &id("B"))
        .expect("path should exist");
    assert_eq!(path, vec![id("A"), id("B")]);
}

#[test]
fn test_directed_edges_are_one_way() {
    let graph = graph_from(&["A", "B"], &[("A", "B", 1)]);

    assert_eq!(
        graph.shortest_path(&id("B"), &id("A")),
        Err(RouteError::NoPath {
            from: id("B"),
            to: id("A"),
        })
    );
}

#[test]
fn test_same_start_and_end_has_no_hops() {
    let graph = graph_from(&["A", "B"], &[("A", "B", 1)]);

    let path = graph
        .shortest_path(&id("A"), &id("A"))
        .expect("degenerate query should not error");
    assert!(path.is_empty());
}

#[test]
fn test_unknown_endpoints_are_reported() {
    let graph = graph_from(&["A"], &[]);

    assert_eq!(
        graph.shortest_path(&id("A"), &id("Z")),
        Err(RouteError::UnknownIntersection(id("Z")))
    );
    assert_eq!(
        graph.shortest_path(&id("Z"), &id("A")),
        Err(RouteError::UnknownIntersection(id("Z")))
    );
}

#[test]
fn test_prefers_cheaper_indirect_path() {
    let graph = graph_from(
        &["A", "B", "C"],
        &[("A", "B", 1), ("B", "C", 1), ("A", "C", 5)],
    );

    let path = graph
        .shortest_path(&id("A"), &id("C"))
        .expect("path should exist");
    assert_eq!(path, vec![id("A"), id("B"), id("C")]);
}

#[test]
fn test_road_with_unknown_endpoint_is_a_no_op() {
    let mut graph = graph_from(&["A", "B"], &[]);

    assert_eq!(
        graph.add_road(&id("A"), &id("Z"), 1),
        Err(RouteError::UnknownIntersection(id("Z")))
    );
    assert_eq!(
        graph.add_road(&id("Z"), &id("B"), 1),
        Err(RouteError::UnknownIntersection(id("Z")))
    );
    assert_eq!(graph.road_count(), 0);
    assert!(graph.shortest_path(&id("A"), &id("B")).is_err());
}

#[test]
fn test_add_intersection_is_idempotent() {
    let mut graph = RoadGraph::new();
    graph.add_intersection("A");
    graph.add_intersection("A");
    graph.add_intersection("B");
    graph
        .add_road(&id("A"), &id("B"), 2)
        .expect("both endpoints are registered");
    graph.add_intersection("A");

    assert_eq!(graph.intersection_count(), 2);
    assert_eq!(graph.road_count(), 1);
    let path = graph
        .shortest_path(&id("A"), &id("B"))
        .expect("path should exist");
    assert_eq!(path, vec![id("A"), id("B")]);
}

#[test]
fn test_parallel_edges_are_kept() {
    let graph = graph_from(&["A", "B"], &[("A", "B", 4), ("A", "B", 2)]);

    assert_eq!(graph.road_count(), 2);
    let path = graph
        .shortest_path(&id("A"), &id("B"))
        .expect("path should exist");
    assert_eq!(path, vec![id("A"), id("B")]);
}

#[test]
fn test_avoiding_query_takes_detour() {
    let graph = graph_from(
        &["S", "H", "T", "E"],
        &[("S", "H", 1), ("H", "E", 1), ("S", "T", 3), ("T", "E", 3)],
    );

    let excluded = HashSet::from([id("H")]);
    let path = graph
        .shortest_path_avoiding(&id("S"), &id("E"), &excluded)
        .expect("detour should exist");
    assert_eq!(path, vec![id("S"), id("T"), id("E")]);
}

#[test]
fn test_avoiding_query_only_filters_first_hops() {
    // H is excluded as a first hop out of S, not as a later node.
    let graph = graph_from(
        &["S", "T", "H", "E"],
        &[("S", "H", 1), ("S", "T", 1), ("T", "H", 1), ("H", "E", 1)],
    );

    let excluded = HashSet::from([id("H")]);
    let path = graph
        .shortest_path_avoiding(&id("S"), &id("E"), &excluded)
        .expect("path through T should exist");
    assert_eq!(path, vec![id("S"), id("T"), id("H"), id("E")]);
}

#[test]
fn test_avoiding_query_does_not_mutate_the_graph() {
    let graph = graph_from(
        &["S", "H", "T", "E"],
        &[("S", "H", 1), ("H", "E", 1), ("S", "T", 3), ("T", "E", 3)],
    );

    let excluded = HashSet::from([id("H")]);
    let _ = graph.shortest_path_avoiding(&id("S"), &id("E"), &excluded);

    let path = graph
        .shortest_path(&id("S"), &id("E"))
        .expect("original route should still exist");
    assert_eq!(path, vec![id("S"), id("H"), id("E")]);
}

#[test]
fn test_avoiding_all_first_hops_reports_no_path() {
    let graph = graph_from(&["S", "H", "E"], &[("S", "H", 1), ("H", "E", 1)]);

    let excluded = HashSet::from([id("H")]);
    assert_eq!(
        graph.shortest_path_avoiding(&id("S"), &id("E"), &excluded),
        Err(RouteError::NoPath {
            from: id("S"),
            to: id("E"),
        })
    );
}
