//! Visualization generation module

use anyhow::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::cluster::Cluster;
use crate::graph::{AdjacencyMatrix, FaceGraph};

/// Distinct colors for cluster rendering; labels beyond 20 reuse colors
pub const PALETTE: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Spring layout pass count used for the exported coordinates
const LAYOUT_ITERATIONS: usize = 50;

/// Assign one palette color per cluster, in label order
pub fn label_colors(clusters: &[Cluster]) -> HashMap<u32, &'static str> {
    let mut labels: Vec<u32> = clusters.iter().map(|c| c.label).collect();
    labels.sort_unstable();
    labels
        .into_iter()
        .enumerate()
        .map(|(rank, label)| (label, PALETTE[rank % PALETTE.len()]))
        .collect()
}

/// Force-directed 2D embedding of the graph, normalized to the unit square.
///
/// Fruchterman-Reingold style: every pair repels, edges attract, node moves
/// are capped by a temperature that cools linearly. Initial positions come
/// from a seeded RNG so a fixed seed reproduces the layout exactly.
pub fn spring_layout(
    adjacency: &AdjacencyMatrix,
    iterations: usize,
    seed: Option<u64>,
) -> Vec<(f32, f32)> {
    let n = adjacency.node_count();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![(0.5, 0.5)];
    }

    let mut rng = match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    };
    let mut positions: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();

    let k = (1.0 / n as f64).sqrt();
    let mut temperature = 0.1_f64;
    let cooling = temperature / (iterations.max(1) as f64);

    for _ in 0..iterations {
        let mut displacement = vec![(0.0_f64, 0.0_f64); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let dx = positions[i].0 - positions[j].0;
                let dy = positions[i].1 - positions[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(1e-9);
                let (ux, uy) = (dx / dist, dy / dist);

                // Repulsion between every pair
                let repulsion = k * k / dist;
                displacement[i].0 += ux * repulsion;
                displacement[i].1 += uy * repulsion;
                displacement[j].0 -= ux * repulsion;
                displacement[j].1 -= uy * repulsion;

                // Attraction along edges
                if adjacency.weight(i, j) > 0.0 {
                    let attraction = dist * dist / k;
                    displacement[i].0 -= ux * attraction;
                    displacement[i].1 -= uy * attraction;
                    displacement[j].0 += ux * attraction;
                    displacement[j].1 += uy * attraction;
                }
            }
        }

        for i in 0..n {
            let (dx, dy) = displacement[i];
            let len = (dx * dx + dy * dy).sqrt().max(1e-9);
            let step = len.min(temperature);
            positions[i].0 += dx / len * step;
            positions[i].1 += dy / len * step;
        }

        temperature = (temperature - cooling).max(1e-4);
    }

    // Rescale into [0, 1] x [0, 1] for direct use in SVG and GraphML
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in &positions {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    let span_x = max_x - min_x;
    let span_y = max_y - min_y;

    positions
        .into_iter()
        .map(|(x, y)| {
            let nx = if span_x > 0.0 { (x - min_x) / span_x } else { 0.5 };
            let ny = if span_y > 0.0 { (y - min_y) / span_y } else { 0.5 };
            (nx as f32, ny as f32)
        })
        .collect()
}

/// Generate visualization files from analysis results
pub fn generate_visualizations(
    clusters: &[Cluster],
    graph: &FaceGraph,
    seed: Option<u64>,
    output_dir: &str,
) -> Result<()> {
    log::info!("Generating visualizations for {} clusters", clusters.len());

    // Create visualizations directory
    let viz_dir = Path::new(output_dir).join("visualizations");
    fs::create_dir_all(&viz_dir)?;

    let layout = spring_layout(&graph.adjacency, LAYOUT_ITERATIONS, seed);
    let colors = label_colors(clusters);

    generate_network_data(graph, &layout, &colors, &viz_dir)?;
    generate_html_visualizations(clusters, graph, &layout, &colors, &viz_dir)?;
    generate_stats_visualizations(clusters, &viz_dir)?;

    log::info!("Visualizations generated successfully");

    Ok(())
}

/// Generate network data files for visualization tools
fn generate_network_data(
    graph: &FaceGraph,
    layout: &[(f32, f32)],
    colors: &HashMap<u32, &'static str>,
    viz_dir: &Path,
) -> Result<()> {
    log::info!("Generating network data files");

    // Create data directory
    let data_dir = viz_dir.join("data");
    fs::create_dir_all(&data_dir)?;

    let file_path = data_dir.join("graph.graphml");
    let mut file = File::create(file_path)?;

    // Write GraphML header
    writeln!(file, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(
        file,
        "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">"
    )?;
    writeln!(file, "  <graph id=\"G\" edgedefault=\"undirected\">")?;

    // Write nodes
    for node in &graph.nodes {
        let (x, y) = layout[node.id as usize];
        let color = colors.get(&node.label).copied().unwrap_or("#000000");
        writeln!(file, "    <node id=\"n{}\">", node.id)?;
        writeln!(file, "      <data key=\"label\">{}</data>", node.label)?;
        writeln!(file, "      <data key=\"color\">{}</data>", color)?;
        writeln!(file, "      <data key=\"x\">{:.6}</data>", x)?;
        writeln!(file, "      <data key=\"y\">{:.6}</data>", y)?;
        writeln!(file, "    </node>")?;
    }

    // Write each undirected edge once, from the upper triangle
    let n = graph.node_count();
    let mut edge_id = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            let weight = graph.adjacency.weight(i, j);
            if weight > 0.0 {
                writeln!(
                    file,
                    "    <edge id=\"e{}\" source=\"n{}\" target=\"n{}\">",
                    edge_id, i, j
                )?;
                writeln!(file, "      <data key=\"weight\">{:.6}</data>", weight)?;
                writeln!(file, "    </edge>")?;
                edge_id += 1;
            }
        }
    }

    // Write GraphML footer
    writeln!(file, "  </graph>")?;
    writeln!(file, "</graphml>")?;

    // Create a CSV file with node data
    let nodes_file_path = data_dir.join("nodes.csv");
    let mut nodes_file = File::create(nodes_file_path)?;

    writeln!(nodes_file, "id,label,color,x,y,file_path")?;
    for node in &graph.nodes {
        let (x, y) = layout[node.id as usize];
        let color = colors.get(&node.label).copied().unwrap_or("#000000");
        writeln!(
            nodes_file,
            "{},{},{},{:.6},{:.6},{}",
            node.id,
            node.label,
            color,
            x,
            y,
            node.file_path.as_deref().unwrap_or("")
        )?;
    }

    Ok(())
}

/// Generate HTML files for interactive visualization
fn generate_html_visualizations(
    clusters: &[Cluster],
    graph: &FaceGraph,
    layout: &[(f32, f32)],
    colors: &HashMap<u32, &'static str>,
    viz_dir: &Path,
) -> Result<()> {
    log::info!("Generating HTML visualizations");

    // Create HTML directory
    let html_dir = viz_dir.join("html");
    fs::create_dir_all(&html_dir)?;

    // Create an index.html file
    let index_path = html_dir.join("index.html");
    let mut index_file = File::create(index_path)?;

    writeln!(index_file, "<!DOCTYPE html>")?;
    writeln!(index_file, "<html lang=\"en\">")?;
    writeln!(index_file, "<head>")?;
    writeln!(index_file, "  <meta charset=\"UTF-8\">")?;
    writeln!(
        index_file,
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    )?;
    writeln!(index_file, "  <title>Face Cluster Analysis</title>")?;
    writeln!(index_file, "  <style>")?;
    writeln!(
        index_file,
        "    body {{ font-family: Arial, sans-serif; margin: 20px; }}"
    )?;
    writeln!(index_file, "    h1, h2 {{ color: #333; }}")?;
    writeln!(
        index_file,
        "    .cluster-list {{ display: flex; flex-wrap: wrap; }}"
    )?;
    writeln!(index_file, "    .cluster-card {{ border: 1px solid #ddd; margin: 10px; padding: 15px; border-radius: 5px; width: 300px; }}")?;
    writeln!(index_file, "    .cluster-card h3 {{ margin-top: 0; }}")?;
    writeln!(index_file, "    .stats {{ margin-top: 20px; background-color: #f9f9f9; padding: 15px; border-radius: 5px; }}")?;
    writeln!(index_file, "  </style>")?;
    writeln!(index_file, "</head>")?;
    writeln!(index_file, "<body>")?;
    writeln!(index_file, "  <h1>Face Cluster Analysis</h1>")?;

    // Write cluster statistics
    writeln!(index_file, "  <div class=\"stats\">")?;
    writeln!(index_file, "    <h2>Summary Statistics</h2>")?;
    writeln!(index_file, "    <p>Total Clusters: {}</p>", clusters.len())?;

    if !clusters.is_empty() {
        let total_nodes: usize = clusters.iter().map(|c| c.size).sum();
        let largest = clusters.iter().map(|c| c.size).max().unwrap_or(0);
        let avg_size = total_nodes as f64 / clusters.len() as f64;
        let avg_density =
            clusters.iter().map(|c| c.density as f64).sum::<f64>() / clusters.len() as f64;

        writeln!(index_file, "    <p>Total Faces: {}</p>", total_nodes)?;
        writeln!(index_file, "    <p>Largest Cluster: {} faces</p>", largest)?;
        writeln!(
            index_file,
            "    <p>Average Cluster Size: {:.2} faces</p>",
            avg_size
        )?;
        writeln!(index_file, "    <p>Average Density: {:.4}</p>", avg_density)?;
    }

    writeln!(index_file, "  </div>")?;

    // Inline scatter of the spring layout, one dot per face
    writeln!(index_file, "  <h2>Graph Layout</h2>")?;
    writeln!(
        index_file,
        "  <svg width=\"800\" height=\"600\" style=\"border: 1px solid #ddd;\">"
    )?;
    for node in &graph.nodes {
        let (x, y) = layout[node.id as usize];
        let color = colors.get(&node.label).copied().unwrap_or("#000000");
        writeln!(
            index_file,
            "    <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"{}\"/>",
            20.0 + x * 760.0,
            20.0 + y * 560.0,
            color
        )?;
    }
    writeln!(index_file, "  </svg>")?;

    // Write cluster list
    writeln!(index_file, "  <h2>Clusters</h2>")?;
    writeln!(index_file, "  <div class=\"cluster-list\">")?;

    for cluster in clusters.iter().take(50) {
        let color = colors.get(&cluster.label).copied().unwrap_or("#000000");
        writeln!(index_file, "    <div class=\"cluster-card\">")?;
        writeln!(
            index_file,
            "      <h3 style=\"color: {}\">Cluster {}</h3>",
            color, cluster.label
        )?;
        if let Some(ref identity) = cluster.identity {
            writeln!(index_file, "      <p>Identity: {}</p>", identity)?;
        }
        writeln!(index_file, "      <p>Size: {} faces</p>", cluster.size)?;
        writeln!(index_file, "      <p>Density: {:.4}</p>", cluster.density)?;
        if let Some(exemplar) = cluster.exemplar {
            writeln!(index_file, "      <p>Exemplar: face {}</p>", exemplar)?;
        }
        writeln!(index_file, "    </div>")?;
    }

    writeln!(index_file, "  </div>")?;
    writeln!(index_file, "</body>")?;
    writeln!(index_file, "</html>")?;

    Ok(())
}

/// Generate statistical visualizations
fn generate_stats_visualizations(clusters: &[Cluster], viz_dir: &Path) -> Result<()> {
    log::info!("Generating statistical visualizations");

    // Create a CSV file with cluster statistics for external visualization
    let stats_path = viz_dir.join("cluster_stats.csv");
    let mut stats_file = File::create(stats_path)?;

    writeln!(stats_file, "label,size,density,exemplar,identity")?;
    for cluster in clusters {
        writeln!(
            stats_file,
            "{},{},{:.6},{},{}",
            cluster.label,
            cluster.size,
            cluster.density,
            cluster
                .exemplar
                .map(|id| id.to_string())
                .unwrap_or_default(),
            cluster.identity.as_deref().unwrap_or("")
        )?;
    }

    // Create a data file for size distribution
    let size_dist_path = viz_dir.join("size_distribution.csv");
    let mut size_dist_file = File::create(size_dist_path)?;

    // Buckets 0: 1-9, 1: 10-19, ..., 9: 90-99, 10: 100+
    let mut size_dist = vec![0; 11];
    for cluster in clusters {
        let bucket = if cluster.size >= 100 {
            10
        } else {
            (cluster.size - 1) / 10
        };
        size_dist[bucket] += 1;
    }

    writeln!(size_dist_file, "size_range,count")?;
    writeln!(size_dist_file, "1-9,{}", size_dist[0])?;
    for i in 1..10 {
        let range_start = i * 10;
        let range_end = range_start + 9;
        writeln!(size_dist_file, "{}-{},{}", range_start, range_end, size_dist[i])?;
    }
    writeln!(size_dist_file, "100+,{}", size_dist[10])?;

    Ok(())
}
