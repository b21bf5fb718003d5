use anyhow::{Context, Result};
use clap::Parser;
use routegraph::{GraphStore, ShortestPathEngine};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "bench")]
#[command(about = "Load a graph file and time repeated Dijkstra queries.", long_about = None)]
struct Cli {
    /// Path to the graph file
    #[arg(short, long)]
    graph: PathBuf,

    /// Number of runs. Picks a new (deterministic) source id per run (0, 1, 2, 3, ...num_runs).
    #[arg(short, long)]
    num_runs: usize,

    /// Stop each search at this node instead of settling the whole graph
    #[arg(short, long)]
    target: Option<usize>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let cli = Cli::parse();

    let graph = GraphStore::load(&cli.graph)
        .with_context(|| format!("loading {}", cli.graph.display()))?;
    info!(nodes = graph.node_count(), edges = graph.edge_count(), "graph loaded");

    let runs = cli.num_runs.min(graph.node_count());
    if runs < cli.num_runs {
        warn!(requested = cli.num_runs, runs, "graph has fewer nodes than runs");
    }

    let engine = ShortestPathEngine::new(&graph);
    let mut duration_millis = Vec::with_capacity(runs);
    let mut reachable = 0usize;
    for src_idx in 0..runs {
        let now = Instant::now();
        let result = engine.query(src_idx, cli.target)?;
        duration_millis.push(now.elapsed().as_secs_f64() * 1000.0);
        reachable += result.reachable_count();
    }
    println!("{:?}", duration_millis);

    if !duration_millis.is_empty() {
        let total: f64 = duration_millis.iter().sum();
        info!(
            runs,
            mean_ms = total / runs as f64,
            mean_reached = reachable / runs,
            "benchmark finished"
        );
    }

    Ok(())
}
