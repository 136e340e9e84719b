//! Great-circle distance between pins

use crate::explore::Coordinate;
use geo::{Distance, HaversineMeasure};

/// Earth radius used for pin distances, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters on a sphere of [`EARTH_RADIUS_M`]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    HaversineMeasure::new(EARTH_RADIUS_M).distance(a.to_point(), b.to_point())
}

/// Notification text for a distance given in meters
pub fn distance_message(meters: f64) -> String {
    format!("Distance is {:.2} km", meters / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_along_equator() {
        let meters = distance_meters(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!((meters - 111_194.93).abs() < 0.01, "got {meters}");
        assert_eq!(distance_message(meters), "Distance is 111.19 km");
    }

    #[test]
    fn test_zero_distance() {
        let c = Coordinate::new(49.263570, -123.138570);
        assert_eq!(distance_meters(c, c), 0.0);
        assert_eq!(distance_message(0.0), "Distance is 0.00 km");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let vancouver = Coordinate::new(49.2827, -123.1207);
        let seattle = Coordinate::new(47.6062, -122.3321);
        let there = distance_meters(vancouver, seattle);
        let back = distance_meters(seattle, vancouver);
        assert!((there - back).abs() < 1e-6);
        // ~195 km
        assert!((there / 1000.0 - 195.0).abs() < 5.0, "got {there}");
    }

    #[test]
    fn test_message_rounds_to_two_decimals() {
        assert_eq!(distance_message(1234.0), "Distance is 1.23 km");
        assert_eq!(distance_message(1235.1), "Distance is 1.24 km");
    }
}
