//! Results persistence module

use anyhow::Result;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::cluster::{Cluster, PropagationStats};
use crate::graph::FaceGraph;

/// Save analysis results to the specified directory
pub fn save_results(
    clusters: &[Cluster],
    graph: &FaceGraph,
    stats: &PropagationStats,
    purity: Option<f64>,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving {} clusters to {}", clusters.len(), output_dir);

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    save_summary(clusters, graph, stats, purity, output_dir)?;
    save_clusters(clusters, graph, output_dir)?;
    save_graph_stats(graph, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save summary information
fn save_summary(
    clusters: &[Cluster],
    graph: &FaceGraph,
    stats: &PropagationStats,
    purity: Option<f64>,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let node_count = graph.node_count();
    let edge_count = graph.edge_count();
    let singleton_count = clusters.iter().filter(|c| c.size == 1).count();

    let summary = json!({
        "graph_stats": {
            "node_count": node_count,
            "edge_count": edge_count,
            "avg_degree": 2.0 * edge_count as f64 /
                          if node_count == 0 { 1.0 } else { node_count as f64 },
        },
        "propagation": {
            "iterations_run": stats.iterations_run,
            "label_updates": stats.label_updates,
            "stabilized_early": stats.stabilized_early,
        },
        "cluster_stats": {
            "cluster_count": clusters.len(),
            "total_clustered_nodes": clusters.iter().map(|c| c.size).sum::<usize>(),
            "largest_cluster_size": clusters.iter().map(|c| c.size).max().unwrap_or(0),
            "smallest_cluster_size": clusters.iter().map(|c| c.size).min().unwrap_or(0),
            "singleton_count": singleton_count,
            "avg_cluster_size": clusters.iter().map(|c| c.size).sum::<usize>() as f64 /
                                if clusters.is_empty() { 1.0 } else { clusters.len() as f64 },
            "avg_density": clusters.iter().map(|c| c.density as f64).sum::<f64>() /
                           if clusters.is_empty() { 1.0 } else { clusters.len() as f64 },
        },
        "truth_purity": purity,
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save individual cluster information
fn save_clusters(clusters: &[Cluster], graph: &FaceGraph, output_dir: &str) -> Result<()> {
    log::info!("Saving individual cluster information");

    // Create clusters directory
    let clusters_dir = Path::new(output_dir).join("clusters");
    fs::create_dir_all(&clusters_dir)?;

    // Create a JSON file for each cluster
    for cluster in clusters {
        let path = clusters_dir.join(format!("cluster_{}.json", cluster.label));
        let mut file = File::create(path)?;

        let members = cluster
            .members
            .iter()
            .map(|&id| {
                let node = &graph.nodes[id as usize];
                json!({
                    "id": node.id,
                    "file_path": node.file_path,
                    "truth": node.truth,
                })
            })
            .collect::<Vec<_>>();

        let exemplar = cluster.exemplar.map(|id| {
            json!({
                "id": id,
                "file_path": graph.nodes[id as usize].file_path,
            })
        });

        let cluster_json = json!({
            "label": cluster.label,
            "size": cluster.size,
            "density": cluster.density,
            "exemplar": exemplar,
            "identity": cluster.identity,
            "members": members,
        });

        file.write_all(to_string_pretty(&cluster_json)?.as_bytes())?;
    }

    // Create a JSON file with all clusters
    let all_clusters_path = Path::new(output_dir).join("all_clusters.json");
    let mut all_clusters_file = File::create(all_clusters_path)?;

    let clusters_json = json!({
        "clusters": clusters.iter().map(|c| {
            json!({
                "label": c.label,
                "size": c.size,
                "density": c.density,
                "exemplar": c.exemplar,
                "identity": c.identity,
            })
        }).collect::<Vec<_>>()
    });

    all_clusters_file.write_all(to_string_pretty(&clusters_json)?.as_bytes())?;

    Ok(())
}

/// Save graph statistics
fn save_graph_stats(graph: &FaceGraph, output_dir: &str) -> Result<()> {
    log::info!("Saving graph statistics");

    let path = Path::new(output_dir).join("graph_stats.json");
    let mut file = File::create(path)?;

    // Degree distribution over 0-100+ buckets
    let mut degree_dist = vec![0; 101];
    for node in &graph.nodes {
        let bucket = std::cmp::min(node.neighbors.len(), 100);
        degree_dist[bucket] += 1;
    }

    // Edge weight spread over the upper triangle
    let n = graph.node_count();
    let mut weight_min = f64::INFINITY;
    let mut weight_max = f64::NEG_INFINITY;
    let mut weight_sum = 0.0;
    let mut weight_count = 0_usize;
    for i in 0..n {
        for j in (i + 1)..n {
            let weight = graph.adjacency.weight(i, j);
            if weight > 0.0 {
                weight_min = weight_min.min(weight);
                weight_max = weight_max.max(weight);
                weight_sum += weight;
                weight_count += 1;
            }
        }
    }

    let node_count = graph.node_count();
    let edge_count = graph.edge_count();
    let stats = json!({
        "node_count": node_count,
        "edge_count": edge_count,
        "avg_degree": 2.0 * edge_count as f64 /
                      if node_count == 0 { 1.0 } else { node_count as f64 },
        "degree_distribution": degree_dist,
        "edge_weights": {
            "min": if weight_count == 0 { json!(null) } else { json!(weight_min) },
            "mean": if weight_count == 0 { json!(null) } else { json!(weight_sum / weight_count as f64) },
            "max": if weight_count == 0 { json!(null) } else { json!(weight_max) },
        },
    });

    file.write_all(to_string_pretty(&stats)?.as_bytes())?;

    Ok(())
}
