use anyhow::Result;
use clap::Parser;

mod cluster;
mod config;
mod data;
mod error;
mod graph;
mod recognition;
mod storage;
mod viz;

use cluster::PropagationOptions;
use config::ClusterConfig;
use recognition::{match_descriptor, MatchDecision, ProfileStore};

#[derive(Parser, Debug)]
#[clap(
    name = "face-cluster-analyzer",
    about = "Face clustering via label propagation over descriptor similarity graphs"
)]
struct Cli {
    /// Path to input descriptor manifest (JSON)
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "cluster_results")]
    output_dir: String,

    /// Cosine distance threshold for connecting two faces
    #[clap(long, default_value = "0.5")]
    threshold: f64,

    /// Propagation iterations per node
    #[clap(long, default_value = "50")]
    iterations_per_node: usize,

    /// Total propagation iterations, overriding the per-node factor
    #[clap(long)]
    iterations: Option<i64>,

    /// Distance floor applied before inverse-square edge weighting
    #[clap(long, default_value = "1e-6")]
    min_distance: f64,

    /// RNG seed for reproducible clustering and layout
    #[clap(long)]
    seed: Option<u64>,

    /// Stop propagation once labels survive a full pass unchanged
    #[clap(long)]
    stop_when_stable: bool,

    /// Path to a profile store for naming clusters
    #[clap(long)]
    profiles: Option<String>,

    /// Cosine distance bound for profile matching
    #[clap(long, default_value = "0.4")]
    match_threshold: f64,

    /// Skip visualizations
    #[clap(long)]
    skip_viz: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting face cluster analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // Create output directory
    std::fs::create_dir_all(&args.output_dir)?;

    let config = ClusterConfig::new(
        args.threshold,
        args.iterations_per_node,
        args.min_distance,
        args.seed,
        args.stop_when_stable,
    );

    // 1. Load descriptors
    let records = data::manifest::load_descriptors(&args.input)?;

    // 2. Build the similarity graph
    let builder = graph::GraphBuilder::from_config(&config);
    let mut face_graph = builder.build(records)?;

    log::info!(
        "Built similarity graph with {} nodes and {} edges",
        face_graph.node_count(),
        face_graph.edge_count()
    );

    // 3. Propagate labels
    let mut options = PropagationOptions::from_config(&config, face_graph.node_count());
    if let Some(total) = args.iterations {
        options.iterations = total;
    }
    let stats = cluster::run_whispers_with(&mut face_graph.nodes, &face_graph.adjacency, &options)?;

    log::info!(
        "Propagation finished after {} iterations with {} label updates",
        stats.iterations_run,
        stats.label_updates
    );

    // 4. Extract clusters and compute metrics
    let mut clusters = cluster::extract_clusters(&face_graph.nodes);
    for c in clusters.iter_mut() {
        cluster::metrics::calculate_cluster_metrics(c, &face_graph.adjacency);
    }

    log::info!("Found {} clusters", clusters.len());

    let purity = cluster::metrics::truth_purity(&clusters, &face_graph.nodes);
    if let Some(purity) = purity {
        log::info!("Truth purity: {:.4}", purity);
    }

    // 5. Name clusters from the profile store if one was given
    if let Some(ref profiles_path) = args.profiles {
        name_clusters(&mut clusters, &face_graph, profiles_path, args.match_threshold)?;
    }

    // 6. Save results
    storage::save_results(&clusters, &face_graph, &stats, purity, &args.output_dir)?;

    // 7. Generate visualizations if requested
    if !args.skip_viz {
        viz::generate_visualizations(&clusters, &face_graph, args.seed, &args.output_dir)?;
    }

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}

/// Match each cluster's exemplar descriptor against the profile store
fn name_clusters(
    clusters: &mut [cluster::Cluster],
    face_graph: &graph::FaceGraph,
    profiles_path: &str,
    match_threshold: f64,
) -> Result<()> {
    let store = ProfileStore::open(profiles_path)?;
    if store.is_empty() {
        log::warn!("Profile store {} is empty, skipping naming", profiles_path);
        return Ok(());
    }
    log::debug!("Matching exemplars with threshold {}", match_threshold);

    for c in clusters.iter_mut() {
        let exemplar = match c.exemplar {
            Some(id) => id,
            None => continue,
        };
        let probe = &face_graph.nodes[exemplar as usize].descriptor;
        match match_descriptor(&store, probe, match_threshold)? {
            MatchDecision::Match { name, distance } => {
                log::info!(
                    "Cluster {} identified as '{}' (distance {:.4})",
                    c.label,
                    name,
                    distance
                );
                c.identity = Some(name);
            }
            MatchDecision::NoMatch { nearest } => match nearest {
                Some((name, distance)) => log::info!(
                    "Cluster {} unmatched; nearest profile '{}' at distance {:.4}",
                    c.label,
                    name,
                    distance
                ),
                None => log::info!("Cluster {} unmatched", c.label),
            },
        }
    }

    Ok(())
}
