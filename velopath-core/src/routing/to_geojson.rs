//! GeoJSON rendering of a computed route.

use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::json;

use crate::Error;
use crate::routing::{Route, RouteSegment};

impl Route {
    /// Converts the route to a `GeoJSON` `FeatureCollection`, one `LineString`
    /// feature per segment with the display properties clients render:
    /// name, length, oriented grade, road class, crash exposure, sequence
    /// number and cumulative distance. Segments chain head to tail, so the
    /// collection draws as a single connected line.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let features = self
            .segments
            .iter()
            .map(segment_feature)
            .collect::<Result<Vec<Feature>, Error>>()?;

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        Ok(geojson::GeoJson::from(self.to_geojson()?).to_string())
    }
}

fn segment_feature(segment: &RouteSegment) -> Result<Feature, Error> {
    let value = json!({
        "type": "Feature",
        "geometry": Geometry::new((&segment.geometry).into()),
        "properties": {
            "name": segment.name,
            "length_m": round2(segment.length_m),
            "grade_percent": round2(segment.grade_percent()),
            "elevation_change_m": round2(segment.elevation_change_m()),
            "road_type": segment.road_class,
            "seq": segment.seq,
            "cumulative_distance_m": round2(segment.cumulative_distance_m),
            "crash_count": segment.exposure.count,
            "crash_score": round2(segment.exposure.score),
        }
    });

    Ok(Feature::from_json_value(value)?)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
