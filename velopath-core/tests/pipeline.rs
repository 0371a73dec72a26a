//! End-to-end pipeline test: load a small network, derive grades from a
//! terrain grid, link a crash incident, then route under both policies.

use geo::{Point, line_string};
use velopath_core::prelude::*;

/// A-B-C chain: A-B is 100 m and flat, B-C is 200 m at 5% uphill,
/// class priority 1.0 on both.
fn build_model() -> RoutingModel<MemoryStore> {
    // 0.0009 degrees of longitude ~ 100 m at the equator
    let nodes = vec![
        Node {
            id: 1,
            geometry: Point::new(0.0, 0.0),
            degree: 1,
        },
        Node {
            id: 2,
            geometry: Point::new(0.0009, 0.0),
            degree: 2,
        },
        Node {
            id: 3,
            geometry: Point::new(0.0027, 0.0),
            degree: 1,
        },
    ];
    let edges = vec![
        Edge {
            id: 10,
            source: 1,
            target: 2,
            geometry: line_string![(x: 0.0, y: 0.0), (x: 0.0009, y: 0.0)],
            length_m: 100.0,
            road_class: "residential".to_owned(),
            class_priority: 1.0,
            name: Some("Flat St".to_owned()),
        },
        Edge {
            id: 11,
            source: 2,
            target: 3,
            geometry: line_string![(x: 0.0009, y: 0.0), (x: 0.0027, y: 0.0)],
            length_m: 200.0,
            road_class: "residential".to_owned(),
            class_priority: 1.0,
            name: Some("Hill Rd".to_owned()),
        },
    ];
    let incident = Incident {
        id: 500,
        // On Flat St, ~67 m from the nearest end of Hill Rd
        location: Point::new(0.0003, 0.0),
        date: None,
        time: None,
        severity: Severity::SeriousInjury,
        on_street: Some("Flat St".to_owned()),
        at_street: None,
        light_condition: None,
        injured: 1,
        killed: 0,
    };
    RoutingModel::new(MemoryStore::new(nodes, edges, vec![incident]))
}

/// Flat up to node 2, then rising east at 5% so B-C climbs 10 m over 200 m.
struct Ramp;

impl TerrainSampler for Ramp {
    fn elevation_at(&self, lon: f64, _lat: f64) -> Option<f64> {
        // ~111,195 m per degree at the equator; 5% of that per degree east
        let meters_east = (lon - 0.0009).max(0.0) * 111_194.9266;
        Some(120.0 + meters_east * 0.05)
    }
}

#[test]
fn derived_costs_match_reference_scenario() {
    let model = build_model();
    let summary = derive_elevation_grades(model.store(), &Ramp, "test-dem").unwrap();
    assert_eq!(summary.derived, 2);

    let flat = model.store().get_elevation_grade(10).unwrap();
    assert!(flat.grade_percent.abs() < 1e-9);

    let hill = model.store().get_elevation_grade(11).unwrap();
    assert!((hill.elevation_change_m - 10.0).abs() < 0.05);
    assert!((hill.grade_percent - 5.0).abs() < 0.05);

    // safest: A-B = 100, B-C = 200 * 1 * (1 + 5 * 0.3) = 500, total 600
    let safest = find_route(&model, 1, 3, Policy::Safest).unwrap().unwrap();
    assert!((safest.total_cost - 600.0).abs() < 0.5);
    assert_eq!(safest.total_length_m, 300.0);

    // fastest ignores grade entirely: total 300
    let fastest = find_route(&model, 1, 3, Policy::Fastest).unwrap().unwrap();
    assert!((fastest.total_cost - 300.0).abs() < 1e-9);
}

#[test]
fn full_pipeline_annotates_route_segments() {
    let model = build_model();
    derive_elevation_grades(model.store(), &Ramp, "test-dem").unwrap();
    let links = link_crash_incidents(model.store(), &CrashLinkParams::default()).unwrap();
    assert_eq!(links.incidents_linked, 1);

    let route = find_route(&model, 1, 3, Policy::Safest).unwrap().unwrap();
    assert_eq!(route.segments.len(), 2);

    // Connected walk with non-decreasing cumulative distance
    assert_eq!(route.segments[0].end_node, route.segments[1].start_node);
    assert_eq!(route.segments[0].cumulative_distance_m, 100.0);
    assert_eq!(route.segments[1].cumulative_distance_m, 300.0);

    // The incident sits on Flat St only
    assert_eq!(route.segments[0].exposure.count, 1);
    assert_eq!(route.segments[0].exposure.score, Severity::SeriousInjury.weight());
    assert_eq!(route.segments[1].exposure.count, 0);

    // Oriented grade annotations
    assert!((route.segments[1].grade_percent() - 5.0).abs() < 0.05);

    // Profile joins the same records in path order
    let profile = elevation_profile(&route);
    assert_eq!(profile.len(), 2);
    assert_eq!(profile[0].elevation_start_m, Some(120.0));
    assert_eq!(profile[1].cumulative_distance_m, 300.0);

    // And the GeoJSON render carries the display properties
    let collection = route.to_geojson().unwrap();
    let props = collection.features[1].properties.as_ref().unwrap();
    assert_eq!(props["road_type"], "residential");
    assert_eq!(props["seq"], 2);
    assert_eq!(props["crash_count"], 0);
}

#[test]
fn reruns_are_idempotent_end_to_end() {
    let model = build_model();
    derive_elevation_grades(model.store(), &Ramp, "test-dem").unwrap();
    link_crash_incidents(model.store(), &CrashLinkParams::default()).unwrap();
    let first = find_route(&model, 1, 3, Policy::Safest).unwrap().unwrap();

    derive_elevation_grades(model.store(), &Ramp, "test-dem").unwrap();
    link_crash_incidents(model.store(), &CrashLinkParams::default()).unwrap();
    let second = find_route(&model, 1, 3, Policy::Safest).unwrap().unwrap();

    assert_eq!(first.total_cost, second.total_cost);
    assert_eq!(
        first.segments[0].exposure.count,
        second.segments[0].exposure.count
    );
    assert_eq!(
        first.segments.iter().map(|s| s.edge_id).collect::<Vec<_>>(),
        second.segments.iter().map(|s| s.edge_id).collect::<Vec<_>>()
    );
}
