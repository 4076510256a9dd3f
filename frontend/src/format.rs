use std::fmt;

use shared::GeoPoint;

/// `"lat, lon"` at 5 decimals, as shown in the endpoint inputs.
pub fn format_coord(point: GeoPoint) -> String {
    format!("{:.5}, {:.5}", point.lat(), point.lon())
}

/// Kilometers at 2 decimals, halves rounded up.
pub fn format_distance_km(meters: f64) -> String {
    format!("{:.2}", (meters / 10.0).round() / 100.0)
}

pub fn format_elevation_gain(meters: f64) -> String {
    format!("{}", meters.round().max(0.0) as u64)
}

/// Whole minutes, with hours dropped when zero: `45 min`, `2h 5m`.
pub fn format_duration(seconds: f64) -> String {
    let total_minutes = (seconds.max(0.0) / 60.0).round() as u64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes} min")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub distance_km: String,
    pub elevation_gain_m: String,
    pub duration: String,
}

impl RouteSummary {
    pub fn new(distance_m: f64, elevation_gain_m: f64, total_time_s: f64) -> Self {
        Self {
            distance_km: format_distance_km(distance_m),
            elevation_gain_m: format_elevation_gain(elevation_gain_m),
            duration: format_duration(total_time_s),
        }
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Distance: {} km | Elevation: +{} m | Est. time: {}",
            self.distance_km, self.elevation_gain_m, self.duration
        )
    }
}
