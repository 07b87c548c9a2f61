mod simulation;

use anyhow::{bail, Result};
use clap::Parser;
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simulation::{CongestionLevel, IntersectionId, RoadGraph, TrafficEngine};

#[derive(Parser)]
#[command(name = "city_flow")]
#[command(about = "Road-network traffic flow simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "500")]
    ticks: u64,

    /// Number of intersections in the generated topology
    #[arg(long, default_value = "50")]
    intersections: usize,

    /// Vehicles injected per tick in addition to the engine's own spawning
    #[arg(long, default_value = "20")]
    vehicles_per_tick: usize,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.intersections < 2 {
        bail!(
            "at least 2 intersections are required, got {}",
            cli.intersections
        );
    }

    let mut topology_rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let graph = build_ring_topology(cli.intersections, &mut topology_rng);

    println!("Running traffic simulation...");
    println!(
        "Intersections: {}, Ticks: {}, Vehicles per tick: {}",
        cli.intersections, cli.ticks, cli.vehicles_per_tick
    );
    println!();

    let mut engine = match cli.seed {
        Some(seed) => TrafficEngine::with_seed(graph, seed),
        None => TrafficEngine::new(graph),
    };

    for _ in 0..cli.ticks {
        for _ in 0..cli.vehicles_per_tick {
            let _ = engine.add_random_vehicle();
        }
        engine.tick();
    }

    print_summary(&engine);
    Ok(())
}

/// Build the reference topology: each intersection connects to its next 1-3
/// successors with random weights in [1, 5], mirrored in both directions,
/// with lanes registered on both endpoints.
fn build_ring_topology(count: usize, rng: &mut StdRng) -> RoadGraph {
    let mut graph = RoadGraph::new();

    let ids: Vec<IntersectionId> = (1..=count)
        .map(|i| IntersectionId::new(format!("I{i}")))
        .collect();
    for id in &ids {
        graph.add_intersection(id.clone());
    }

    for i in 0..count {
        for j in (i + 1)..count.min(i + 4) {
            let weight: u32 = rng.random_range(1..=5);
            for (from, to) in [(&ids[i], &ids[j]), (&ids[j], &ids[i])] {
                if let Err(err) = graph.add_road(from, to, weight) {
                    warn!("skipping road {from} -> {to}: {err}");
                    continue;
                }
                if let Some(node) = graph.intersection_mut(from) {
                    node.add_lane(to);
                }
            }
        }
    }

    graph
}

/// Print the end-of-run summary, using only the read accessors a renderer
/// would use
fn print_summary(engine: &TrafficEngine) {
    let stats = engine.stats();

    let mut clear = 0usize;
    let mut moderate = 0usize;
    let mut heavy = 0usize;
    let graph = engine.graph();
    for id in graph.intersection_ids() {
        if let Some(node) = graph.intersection(id) {
            match node.congestion_level() {
                CongestionLevel::Clear => clear += 1,
                CongestionLevel::Moderate => moderate += 1,
                CongestionLevel::Heavy => heavy += 1,
            }
        }
    }

    println!("--- Simulation Complete ---");
    println!("Ticks run: {}", engine.clock());
    println!("Vehicles cleared: {}", stats.recorded_count());
    println!("Average wait time: {:.2}", stats.average_wait_time());
    println!("Traffic flow efficiency: {:.2}", stats.efficiency_score());
    println!("Congestion at end of run: {clear} clear, {moderate} moderate, {heavy} heavy");
}
