//! Network loading from an exported GeoJSON edge file.
//!
//! The expected file is a `FeatureCollection` of `LineString` features, one
//! per edge, with `id`, `source` and `target` integer properties and
//! optional `length_m`, `road_class`, `priority` and `name`. Node positions
//! and degrees are reconstructed from the edge endpoints; a separate node
//! file is not needed because the ingestion export writes edge endpoints
//! verbatim.

use std::fs;
use std::path::Path;

use geo::{Coord, LineString, Point};
use geojson::{FeatureCollection, GeoJson, Value};
use hashbrown::HashMap;
use itertools::Itertools;
use log::{debug, info};

use crate::geometry::polyline_length_m;
use crate::model::{Edge, Node};
use crate::{Error, NodeId};

pub fn load_network(path: &Path) -> Result<(Vec<Node>, Vec<Edge>), Error> {
    info!("loading network from {}", path.display());
    let contents = fs::read_to_string(path)?;
    let geojson: GeoJson = contents.parse()?;
    let collection = FeatureCollection::try_from(geojson)?;

    let mut edges: Vec<Edge> = Vec::with_capacity(collection.features.len());
    let mut skipped = 0usize;

    for feature in &collection.features {
        match parse_edge(feature) {
            Some(edge) => edges.push(edge),
            None => {
                skipped += 1;
                debug!("skipping feature without edge metadata or line geometry");
            }
        }
    }

    let nodes = nodes_from_edges(&edges);
    if skipped > 0 {
        info!("skipped {skipped} features without usable edge data");
    }
    if edges.is_empty() {
        return Err(Error::InvalidData(format!(
            "no routable edges found in {}",
            path.display()
        )));
    }
    Ok((nodes, edges))
}

fn parse_edge(feature: &geojson::Feature) -> Option<Edge> {
    let geometry = feature.geometry.as_ref()?;
    let Value::LineString(ref positions) = geometry.value else {
        return None;
    };
    if positions.len() < 2 {
        return None;
    }
    let line = LineString::from(
        positions
            .iter()
            .map(|pos| Coord {
                x: pos[0],
                y: pos[1],
            })
            .collect::<Vec<_>>(),
    );

    let id = int_property(feature, "id")?;
    let source = int_property(feature, "source")?;
    let target = int_property(feature, "target")?;

    let length_m = feature
        .property("length_m")
        .and_then(serde_json::Value::as_f64)
        .unwrap_or_else(|| polyline_length_m(&line));
    let road_class = feature
        .property("road_class")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("unclassified")
        .to_owned();
    let class_priority = feature
        .property("priority")
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(1.0);
    let name = feature
        .property("name")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned);

    Some(Edge {
        id,
        source,
        target,
        geometry: line,
        length_m,
        road_class,
        class_priority,
        name,
    })
}

fn int_property(feature: &geojson::Feature, key: &str) -> Option<i64> {
    feature.property(key).and_then(serde_json::Value::as_i64)
}

/// Reconstruct the node table: position from the edge endpoint vertices,
/// degree from the number of incident edges.
fn nodes_from_edges(edges: &[Edge]) -> Vec<Node> {
    let mut positions: HashMap<NodeId, Point<f64>> = HashMap::new();
    let mut degrees: HashMap<NodeId, u32> = HashMap::new();

    for edge in edges {
        let first = edge.geometry.0.first();
        let last = edge.geometry.0.last();
        if let (Some(&start), Some(&end)) = (first, last) {
            positions.entry(edge.source).or_insert_with(|| start.into());
            positions.entry(edge.target).or_insert_with(|| end.into());
        }
        *degrees.entry(edge.source).or_default() += 1;
        *degrees.entry(edge.target).or_default() += 1;
    }

    edges
        .iter()
        .flat_map(|edge| [edge.source, edge.target])
        .unique()
        .filter_map(|id| {
            Some(Node {
                id,
                geometry: positions.get(&id).copied()?,
                degree: degrees.get(&id).copied().unwrap_or(0),
            })
        })
        .collect()
}
