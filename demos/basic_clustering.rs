//! Basic example of clustering gyms for a map viewport.
//!
//! Run with: cargo run --example basic_clustering

use marker_cluster::{
    recompute, region_for_cluster, zoom_in_region, ClusterConfig, GpsPoint, LinearProjection,
    MapPoint, Span, Viewport,
};

fn main() {
    // A handful of gyms around central London
    let gyms = vec![
        MapPoint::new("101", 51.5074, -0.1278).with_attribute("name", "Trafalgar Strength"),
        MapPoint::new("102", 51.5079, -0.1283).with_attribute("name", "Charing Cross Fitness"),
        MapPoint::new("103", 51.5081, -0.1270).with_attribute("name", "Strand Boxing Club"),
        MapPoint::new("104", 51.5155, -0.1419).with_attribute("name", "Oxford Circus Climbing"),
        MapPoint::new("105", 51.5033, -0.1196).with_attribute("name", "South Bank Yoga"),
        // Missing coordinates: never shown
        MapPoint { id: "106".into(), ..Default::default() },
    ];

    let config = ClusterConfig::default();
    let screen = LinearProjection::new(390.0, 844.0);

    println!("Marker Clustering Examples\n");

    for (label, span) in [("Street level", 0.01), ("Neighbourhood", 0.2), ("City", 1.0)] {
        let viewport = Viewport::new(GpsPoint::new(51.508, -0.128), Span::new(span, span));
        let markers = recompute(&gyms, &viewport, Some("104"), &screen, &config);

        println!("{} (span {}°): {} markers", label, span, markers.len());
        for marker in &markers {
            match &marker.representative_point {
                Some(gym) => println!(
                    "   {} {}",
                    if marker.is_pinned { "[pinned]" } else { "[gym]   " },
                    gym.attributes.get("name").map(String::as_str).unwrap_or(&gym.id)
                ),
                None => println!("   [{} gyms] at {:.4}, {:.4}", marker.count, marker.coordinate.latitude, marker.coordinate.longitude),
            }
        }
        println!();
    }

    // Tap the first cluster at neighbourhood zoom
    let viewport = Viewport::new(GpsPoint::new(51.508, -0.128), Span::new(0.2, 0.2));
    let markers = recompute(&gyms, &viewport, None, &screen, &config);
    if let Some(cluster) = markers.iter().find(|m| m.is_cluster()) {
        let region = match region_for_cluster(cluster, &gyms, &config) {
            Ok(region) => region,
            Err(e) => {
                println!("Zoom-to-fit unavailable ({}), zooming in instead", e);
                zoom_in_region(cluster.coordinate, &viewport, &config)
            }
        };
        println!(
            "Tapping the {}-gym cluster zooms to {:.4}, {:.4} with span {:.4}° x {:.4}°",
            cluster.count,
            region.center.latitude,
            region.center.longitude,
            region.span.latitude_delta,
            region.span.longitude_delta
        );
    }
}
