//! Geographic primitives and great-circle distance

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

const METERS_PER_MILE: f64 = 1_609.344;

/// A WGS84 coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a validated point
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::invalid_param(
                "lat",
                format!("Invalid latitude: {lat} (must be between -90 and 90)"),
            ));
        }

        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::invalid_param(
                "lng",
                format!("Invalid longitude: {lng} (must be between -180 and 180)"),
            ));
        }

        Ok(Self { lat, lng })
    }

    /// Haversine distance to `other` in meters
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self, other)
    }

    /// Returns a point shifted by the given offsets in meters
    ///
    /// Uses a local equirectangular approximation, accurate enough for the
    /// few-kilometre offsets used when jittering synthetic results.
    pub fn offset_by_meters(&self, north_m: f64, east_m: f64) -> GeoPoint {
        let dlat = (north_m / EARTH_RADIUS_METERS).to_degrees();
        let cos_lat = self.lat.to_radians().cos().max(1e-6);
        let dlng = (east_m / (EARTH_RADIUS_METERS * cos_lat)).to_degrees();

        GeoPoint {
            lat: (self.lat + dlat).clamp(-90.0, 90.0),
            lng: wrap_longitude(self.lng + dlng),
        }
    }
}

fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 540.0).rem_euclid(360.0) - 180.0
    }
}

/// Great-circle distance between two points in meters
pub fn haversine_distance(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let delta_phi = (to.lat - from.lat).to_radians();
    let delta_lambda = (to.lng - from.lng).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());

    EARTH_RADIUS_METERS * c
}

/// A distance expressed in the three units clients render
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub meters: f64,
    pub kilometers: f64,
    pub miles: f64,
}

impl Distance {
    pub fn from_meters(meters: f64) -> Self {
        Self {
            meters: round_to(meters, 1),
            kilometers: round_to(meters / 1_000.0, 2),
            miles: round_to(meters / METERS_PER_MILE, 2),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let a = GeoPoint::new(0.0, 0.0).unwrap();
        let b = GeoPoint::new(0.0, 1.0).unwrap();

        let distance = haversine_distance(&a, &b);
        let expected = 111_195.0;

        assert!(
            (distance - expected).abs() / expected < 0.005,
            "got {distance}"
        );
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let nyc = GeoPoint::new(40.7128, -74.0060).unwrap();
        assert_eq!(nyc.distance_to(&nyc), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let nyc = GeoPoint::new(40.7128, -74.0060).unwrap();
        let london = GeoPoint::new(51.5074, -0.1278).unwrap();

        let there = nyc.distance_to(&london);
        let back = london.distance_to(&nyc);

        assert!((there - back).abs() < 1e-6);
        // ~5570 km
        assert!((there / 1000.0 - 5570.0).abs() < 20.0);
    }

    #[test]
    fn test_antipodal_points() {
        let a = GeoPoint::new(0.0, 0.0).unwrap();
        let b = GeoPoint::new(0.0, 180.0).unwrap();

        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert!((a.distance_to(&b) - half_circumference).abs() < 1.0);
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_offset_by_meters_round_trips_distance() {
        let origin = GeoPoint::new(40.7128, -74.0060).unwrap();
        let moved = origin.offset_by_meters(300.0, 400.0);

        let distance = origin.distance_to(&moved);
        assert!((distance - 500.0).abs() < 2.0, "got {distance}");
    }

    #[test]
    fn test_offset_wraps_longitude() {
        let origin = GeoPoint::new(0.0, 179.99).unwrap();
        let moved = origin.offset_by_meters(0.0, 5_000.0);

        assert!(moved.lng < 0.0);
        assert!(moved.lng >= -180.0);
    }

    #[test]
    fn test_distance_triple() {
        let distance = Distance::from_meters(1_609.344);

        assert_eq!(distance.meters, 1_609.3);
        assert_eq!(distance.kilometers, 1.61);
        assert_eq!(distance.miles, 1.0);
    }
}
