//! Geodesic distance helpers.
//!
//! All positions are (lon, lat) in WGS84 degrees. Distances are great-circle
//! meters via the haversine formula; point-to-segment projection happens in a
//! local east/north frame, which is accurate well below a meter at the
//! sub-kilometer ranges used for crash linking.

use geo::{LineString, Point};

/// Mean radius of Earth, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two points, in meters.
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    let phi1 = a.y().to_radians();
    let phi2 = b.y().to_radians();
    let dphi = (b.y() - a.y()).to_radians();
    let dlambda = (b.x() - a.x()).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Meters per degree of latitude at a given latitude (WGS84 series expansion).
pub fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat).cos() + 1.175 * (4.0 * lat).cos()
}

/// Meters per degree of longitude at a given latitude.
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat = lat_deg.to_radians();
    111_412.84 * lat.cos() - 93.5 * (3.0 * lat).cos()
}

/// Length of a polyline in meters, summed over its segments.
pub fn polyline_length_m(line: &LineString<f64>) -> f64 {
    line.lines()
        .map(|segment| haversine_distance(segment.start.into(), segment.end.into()))
        .sum()
}

/// Great-circle distance from a point to the closest position on a polyline,
/// in meters. An empty polyline has no closest position and yields infinity.
pub fn point_to_polyline_distance(point: Point<f64>, line: &LineString<f64>) -> f64 {
    if line.0.len() == 1 {
        return haversine_distance(point, line.0[0].into());
    }
    line.lines()
        .map(|segment| point_to_segment_distance(point, segment.start.into(), segment.end.into()))
        .fold(f64::INFINITY, f64::min)
}

/// Distance from `point` to the segment `a`-`b`: project into a local
/// east/north meter frame anchored at `a`, clamp the projection parameter to
/// the segment, then measure the great-circle distance to the closest
/// geographic position.
fn point_to_segment_distance(point: Point<f64>, a: Point<f64>, b: Point<f64>) -> f64 {
    let m_lat = meters_per_deg_lat(a.y());
    let m_lon = meters_per_deg_lon(a.y());

    let px = (point.x() - a.x()) * m_lon;
    let py = (point.y() - a.y()) * m_lat;
    let bx = (b.x() - a.x()) * m_lon;
    let by = (b.y() - a.y()) * m_lat;

    let seg_len2 = bx * bx + by * by;
    let t = if seg_len2 > 0.0 {
        ((px * bx + py * by) / seg_len2).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let closest = Point::new(a.x() + t * (b.x() - a.x()), a.y() + t * (b.y() - a.y()));
    haversine_distance(point, closest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    #[test]
    fn haversine_one_degree_latitude() {
        let d = haversine_distance(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn haversine_zero_for_identical_points() {
        let p = Point::new(-90.1994, 38.627);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn point_on_polyline_has_zero_distance() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 0.01, y: 0.0)];
        let d = point_to_polyline_distance(Point::new(0.005, 0.0), &line);
        assert!(d < 0.5, "got {d}");
    }

    #[test]
    fn point_beyond_segment_end_measures_to_endpoint() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 0.01, y: 0.0)];
        let d = point_to_polyline_distance(Point::new(0.02, 0.0), &line);
        let expected = haversine_distance(Point::new(0.02, 0.0), Point::new(0.01, 0.0));
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn point_offset_perpendicular_from_segment() {
        // ~111 m north of the segment midpoint
        let line = line_string![(x: 0.0, y: 0.0), (x: 0.01, y: 0.0)];
        let d = point_to_polyline_distance(Point::new(0.005, 0.001), &line);
        assert!((d - 111.2).abs() < 1.0, "got {d}");
    }

    #[test]
    fn polyline_length_sums_segments() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 0.01), (x: 0.0, y: 0.02)];
        let len = polyline_length_m(&line);
        assert!((len - 2_223.9).abs() < 5.0, "got {len}");
    }
}
