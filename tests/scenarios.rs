use face_cluster_analyzer::cluster::metrics::{calculate_cluster_metrics, truth_purity};
use face_cluster_analyzer::cluster::{extract_clusters, run_whispers};
use face_cluster_analyzer::graph::{build_graph, FaceRecord};

fn labeled_unit(angle_deg: f32, truth: &str) -> FaceRecord {
    let rad = angle_deg.to_radians();
    FaceRecord {
        descriptor: vec![rad.cos(), rad.sin()],
        truth: Some(truth.to_string()),
        file_path: Some(format!("faces/{}_{}.jpg", truth, angle_deg)),
    }
}

/// Two tight bundles of three descriptors, 90 degrees apart. Intra-bundle
/// distances stay near 0.06, inter-bundle distances start at 0.65, so a 0.5
/// threshold yields two disjoint triangles.
fn two_bundles() -> Vec<FaceRecord> {
    vec![
        labeled_unit(0.0, "alice"),
        labeled_unit(10.0, "alice"),
        labeled_unit(20.0, "alice"),
        labeled_unit(90.0, "bob"),
        labeled_unit(100.0, "bob"),
        labeled_unit(110.0, "bob"),
    ]
}

#[test]
fn two_bundles_become_two_clusters_of_three() {
    let mut graph = build_graph(two_bundles(), 0.5).unwrap();
    run_whispers(&mut graph.nodes, &graph.adjacency, 300, Some(42)).unwrap();

    let clusters = extract_clusters(&graph.nodes);
    assert_eq!(clusters.len(), 2);

    let mut memberships: Vec<Vec<u32>> = clusters.iter().map(|c| c.members.clone()).collect();
    memberships.sort();
    assert_eq!(memberships, vec![vec![0, 1, 2], vec![3, 4, 5]]);
}

#[test]
fn two_bundles_score_perfect_purity_and_full_density() {
    let mut graph = build_graph(two_bundles(), 0.5).unwrap();
    run_whispers(&mut graph.nodes, &graph.adjacency, 300, Some(42)).unwrap();

    let mut clusters = extract_clusters(&graph.nodes);
    for cluster in clusters.iter_mut() {
        calculate_cluster_metrics(cluster, &graph.adjacency);
    }

    // Both triangles are complete, so density is 1 and every member is wired
    // to the exemplar
    for cluster in &clusters {
        assert!((cluster.density - 1.0).abs() < 1e-6);
        let exemplar = cluster.exemplar.expect("non-empty cluster has an exemplar");
        assert!(cluster.members.contains(&exemplar));
    }

    assert_eq!(truth_purity(&clusters, &graph.nodes), Some(1.0));
}

#[test]
fn a_single_face_stays_a_singleton() {
    let mut graph = build_graph(vec![labeled_unit(0.0, "alice")], 0.5).unwrap();
    run_whispers(&mut graph.nodes, &graph.adjacency, 100, Some(1)).unwrap();

    assert_eq!(graph.nodes[0].label, 0);
    let clusters = extract_clusters(&graph.nodes);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].members, vec![0]);
}

#[test]
fn labels_decide_membership_even_across_missing_edges() {
    // A chain: 0-1 and 1-2 are connected, 0-2 is not. Propagation can hand
    // all three one label; extraction then keeps them together despite the
    // missing 0-2 edge.
    let records = vec![
        labeled_unit(0.0, "alice"),
        labeled_unit(40.0, "alice"),
        labeled_unit(80.0, "alice"),
    ];
    // 1 - cos(40) = 0.234, 1 - cos(80) = 0.826
    let mut graph = build_graph(records, 0.5).unwrap();
    assert_eq!(graph.adjacency.weight(0, 2), 0.0);
    assert!(graph.adjacency.weight(0, 1) > 0.0);
    assert!(graph.adjacency.weight(1, 2) > 0.0);

    run_whispers(&mut graph.nodes, &graph.adjacency, 300, Some(8)).unwrap();
    let clusters = extract_clusters(&graph.nodes);

    // The whole chain settles on one label, so 0 and 2 share a cluster
    // without sharing an edge
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].members, vec![0, 1, 2]);
}
