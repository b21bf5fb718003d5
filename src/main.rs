use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use csv::Writer;
use routegraph::{
    run_challenge_files, ChallengeMode, GraphStore, NearestNodeIndex, Node, NodeId, Position,
    SearchLimits, ShortestPathEngine, UNREACHABLE,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "route")]
#[command(about = "Load a road graph once and answer shortest-path and nearest-node queries.", long_about = None)]
struct Cli {
    /// Path to the graph file
    #[arg(short, long)]
    graph: PathBuf,

    /// Worker threads for nearest-node search (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print node and edge counts
    Info,
    /// Inspect a single node
    Node {
        #[arg(long)]
        id: NodeId,
    },
    /// Find the node closest to a coordinate
    Nearest {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Distances from one node to every node
    OneToAll {
        #[arg(short, long)]
        source: NodeId,

        /// Output CSV (node_id, distance). If omitted, prints a summary to stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Include unreachable nodes in output with infinite distance
        #[arg(long, default_value_t = false)]
        include_unreachable: bool,
    },
    /// Shortest route between two node ids
    Route {
        #[arg(long)]
        from: NodeId,
        #[arg(long)]
        to: NodeId,

        /// Give up after this many milliseconds
        #[arg(long)]
        deadline_ms: Option<u64>,
    },
    /// Shortest route between the nodes nearest to two coordinates (lat,lon)
    RouteCoords {
        #[arg(long, allow_hyphen_values = true)]
        from: String,
        #[arg(long, allow_hyphen_values = true)]
        to: String,
    },
    /// Answer a file of `<source> <target>` lines, appending one distance per line
    Challenge {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,

        /// One early-exit search per line instead of reusing one-to-all results
        #[arg(long, default_value_t = false)]
        point_to_point: bool,
    },
}

fn parse_coord(s: &str) -> Result<Position> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        bail!("Coordinate must be in format 'lat,lon', got {:?}", s);
    }
    let lat = parts[0].trim().parse::<f64>().with_context(|| format!("latitude in {:?}", s))?;
    let lon = parts[1].trim().parse::<f64>().with_context(|| format!("longitude in {:?}", s))?;
    Ok(Position::new(lat, lon))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn describe(node: &Node) -> String {
    match node.adjacency_offset() {
        Some(offset) => format!(
            "#{} ({:.6}, {:.6}) edges from {}",
            node.id, node.position.latitude, node.position.longitude, offset
        ),
        None => format!(
            "#{} ({:.6}, {:.6}) no outgoing edges",
            node.id, node.position.latitude, node.position.longitude
        ),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring worker threads")?;
    }

    info!(path = %cli.graph.display(), "loading graph");
    let now = Instant::now();
    let graph = GraphStore::load(&cli.graph)
        .with_context(|| format!("loading {}", cli.graph.display()))?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        seconds = now.elapsed().as_secs_f64(),
        "graph loaded"
    );

    let engine = ShortestPathEngine::new(&graph);
    let nearest = NearestNodeIndex::new(&graph);

    match cli.command {
        Command::Info => {
            println!("Nodes: {}", graph.node_count());
            println!("Edges: {}", graph.edge_count());
            let isolated = graph
                .nodes()
                .iter()
                .filter(|n| n.adjacency_offset().is_none())
                .count();
            println!("Nodes without outgoing edges: {}", isolated);
        }
        Command::Node { id } => {
            println!("{}", describe(graph.node(id)?));
            for edge in graph.edges_from(id) {
                println!("  -> {} (weight {})", edge.target, edge.weight);
            }
        }
        Command::Nearest { lat, lon } => {
            let now = Instant::now();
            let node = nearest.find_nearest(Position::new(lat, lon))?;
            info!(seconds = now.elapsed().as_secs_f64(), "nearest node found");
            println!("{}", describe(node));
        }
        Command::OneToAll {
            source,
            out,
            include_unreachable,
        } => {
            let now = Instant::now();
            let result = engine.one_to_all(source)?;
            info!(seconds = now.elapsed().as_secs_f64(), "one-to-all finished");

            if let Some(out_path) = out {
                let mut wtr = Writer::from_path(&out_path)
                    .with_context(|| format!("creating CSV {}", out_path.display()))?;
                wtr.write_record(["node_id", "distance"])?;
                let mut dist_with_idx: Vec<(usize, u64)> =
                    result.distances().iter().copied().enumerate().collect();
                dist_with_idx.sort_by_key(|&(idx, d)| (d, idx));
                let mut written = 0usize;
                for (idx, d) in dist_with_idx {
                    let val = if d != UNREACHABLE {
                        d.to_string()
                    } else if include_unreachable {
                        String::from("inf")
                    } else {
                        continue;
                    };
                    wtr.write_record([idx.to_string(), val])?;
                    written += 1;
                }
                wtr.flush()?;
                println!("Wrote distances for {} nodes to {}", written, out_path.display());
            } else {
                println!("Nodes: {}", graph.node_count());
                println!("Reachable from {}: {}", source, result.reachable_count());
                if let Some(maxd) = result
                    .distances()
                    .iter()
                    .copied()
                    .filter(|&d| d != UNREACHABLE)
                    .max()
                {
                    println!("Max finite distance: {}", maxd);
                }
            }
        }
        Command::Route {
            from,
            to,
            deadline_ms,
        } => {
            let mut limits = SearchLimits::default();
            if let Some(ms) = deadline_ms {
                limits = limits.with_deadline(Instant::now() + Duration::from_millis(ms));
            }
            let now = Instant::now();
            let result = engine.query_with_limits(from, Some(to), limits)?;
            info!(seconds = now.elapsed().as_secs_f64(), "route finished");
            match result.distance_to(to)? {
                Some(d) => {
                    let path: Vec<String> = result
                        .path_forwards(to)?
                        .iter()
                        .map(|n| n.id.to_string())
                        .collect();
                    println!("Distance: {}", d);
                    println!("Path: {}", path.join(" -> "));
                }
                None => println!("No route from {} to {}", from, to),
            }
        }
        Command::RouteCoords { from, to } => {
            let origin = parse_coord(&from)?;
            let destination = parse_coord(&to)?;
            let start = nearest.find_nearest(origin)?.id;
            let target = nearest.find_nearest(destination)?.id;
            info!(start, target, "snapped coordinates to nodes");

            let result = engine.point_to_point(start, target)?;
            match result.distance_to(target)? {
                Some(d) => {
                    println!("Distance: {}", d);
                    for (lat, lon) in result.path_as_coordinates_backwards(target)? {
                        println!("{:.6},{:.6}", lat, lon);
                    }
                }
                None => println!("No route from #{} to #{}", start, target),
            }
        }
        Command::Challenge {
            input,
            output,
            point_to_point,
        } => {
            let mode = if point_to_point {
                ChallengeMode::PointToPoint
            } else {
                ChallengeMode::OneToAll
            };
            info!(input = %input.display(), ?mode, "processing challenge");
            let now = Instant::now();
            let summary = run_challenge_files(&engine, &input, &output, mode)
                .with_context(|| format!("processing {}", input.display()))?;
            let seconds = now.elapsed().as_secs_f64();
            info!(
                queries = summary.queries,
                searches = summary.searches,
                unreachable = summary.unreachable,
                seconds,
                "challenge finished"
            );
            if summary.queries > 0 {
                println!(
                    "Average time per query: {:.3}s",
                    seconds / summary.queries as f64
                );
            }
        }
    }

    Ok(())
}
