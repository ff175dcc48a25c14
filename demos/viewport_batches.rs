//! Example of clustering a city-scale gym list while panning.
//!
//! Run with: cargo run --example viewport_batches --features parallel

use marker_cluster::{
    diff_markers, marker_batches, ClusterCache, ClusterConfig, GpsPoint, LinearProjection,
    MapPoint, PointIndex, Span, Viewport, recompute_indexed,
};
use std::time::Instant;

fn main() {
    println!("Viewport Batching Example\n");

    // 20k gyms scattered over a 2° x 2° area
    let gyms: Vec<MapPoint> = (0..20_000)
        .map(|i| {
            let lat = 51.0 + pseudo_random(i * 2) * 2.0;
            let lng = -1.0 + pseudo_random(i * 2 + 1) * 2.0;
            MapPoint::new(format!("gym-{}", i), lat, lng)
        })
        .collect();

    let config = ClusterConfig::default();
    let screen = LinearProjection::new(390.0, 844.0);

    // Linear scan with memoised recomputes
    let mut cache = ClusterCache::new(config.clone());
    let mut previous = Vec::new();

    for step in 0..5 {
        let viewport = Viewport::new(
            GpsPoint::new(51.5 + step as f64 * 0.05, -0.1),
            Span::new(0.3, 0.3),
        );

        let start = Instant::now();
        let markers = cache.recompute(&gyms, &viewport, Some("gym-42"), &screen).to_vec();
        let elapsed = start.elapsed();

        let diff = diff_markers(&previous, &markers);
        let batches = marker_batches(&diff.added, config.marker_batch_size as usize).count();

        println!(
            "Pan {}: {} markers in {:?} (+{} -{} ={}, {} insert batches)",
            step,
            markers.len(),
            elapsed,
            diff.added.len(),
            diff.removed.len(),
            diff.retained,
            batches
        );
        previous = markers;
    }

    // Same pans answered from an R-tree
    let start = Instant::now();
    let index = PointIndex::new(gyms);
    println!("\nIndexed {} gyms in {:?}", index.located_len(), start.elapsed());

    for step in 0..5 {
        let viewport = Viewport::new(
            GpsPoint::new(51.5 + step as f64 * 0.05, -0.1),
            Span::new(0.3, 0.3),
        );
        let start = Instant::now();
        let markers = recompute_indexed(&index, &viewport, Some("gym-42"), &screen, &config);
        println!("Pan {}: {} markers in {:?}", step, markers.len(), start.elapsed());
    }

    println!("\nCache stats: {:?}", cache.stats());
}

/// Deterministic value in [0, 1)
fn pseudo_random(n: u64) -> f64 {
    let mut x = n.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(0x632B_E59B_D9B4_E019);
    x ^= x >> 31;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 29;
    (x >> 11) as f64 / (1u64 << 53) as f64
}
