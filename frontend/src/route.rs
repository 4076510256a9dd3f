use shared::{GeoPoint, RouteResponse};

const FALLBACK_ERROR: &str = "Route calculation failed";

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    pub points: Vec<GeoPoint>,
    pub surface_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilePoint {
    pub distance_km: f64,
    pub elevation_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The service answered with `success: false`.
    Application,
    /// No usable answer: network failure, bad status or undecodable body.
    Transport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl RouteFailure {
    pub fn status_message(&self) -> String {
        match self.kind {
            FailureKind::Application => format!("Error: {}", self.message),
            FailureKind::Transport => format!("Network error: {}", self.message),
        }
    }
}

/// One route answer, normalized. `error` is set exactly when `success` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub success: bool,
    pub path: Vec<GeoPoint>,
    pub segments: Vec<RouteSegment>,
    pub distance_meters: f64,
    pub elevation_gain_meters: f64,
    pub total_time_seconds: f64,
    pub breakdown_by_type: Vec<(String, f64)>,
    pub elevation_profile: Vec<ProfilePoint>,
    pub error: Option<RouteFailure>,
}

impl RouteResult {
    fn failed(kind: FailureKind, message: String) -> Self {
        Self {
            success: false,
            path: Vec::new(),
            segments: Vec::new(),
            distance_meters: 0.0,
            elevation_gain_meters: 0.0,
            total_time_seconds: 0.0,
            breakdown_by_type: Vec::new(),
            elevation_profile: Vec::new(),
            error: Some(RouteFailure { kind, message }),
        }
    }

    pub fn transport_failure(detail: impl Into<String>) -> Self {
        Self::failed(FailureKind::Transport, detail.into())
    }
}

impl From<RouteResponse> for RouteResult {
    fn from(response: RouteResponse) -> Self {
        if !response.success {
            let message = response
                .error
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_ERROR.to_string());
            return Self::failed(FailureKind::Application, message);
        }

        let segments = response
            .segments
            .into_iter()
            .filter(|segment| segment.coords.len() >= 2)
            .map(|segment| RouteSegment {
                points: segment.coords,
                surface_type: segment.kind,
            })
            .collect();

        Self {
            success: true,
            path: response.path,
            segments,
            distance_meters: response.distance_m,
            elevation_gain_meters: response.elevation_gain.unwrap_or(0.0),
            total_time_seconds: response.total_time_s.unwrap_or(0.0),
            breakdown_by_type: response.breakdown.0,
            elevation_profile: response
                .elevation_profile
                .into_iter()
                .map(|sample| ProfilePoint {
                    distance_km: sample.distance_km,
                    elevation_m: sample.elevation_m,
                })
                .collect(),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::SegmentDto;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_application_error_is_verbatim() {
        let response = RouteResponse {
            success: false,
            error: Some("Points too far from road network".into()),
            ..Default::default()
        };
        let result = RouteResult::from(response);
        assert!(!result.success);
        let failure = result.error.unwrap();
        assert_eq!(failure.kind, FailureKind::Application);
        assert_eq!(
            failure.status_message(),
            "Error: Points too far from road network"
        );
    }

    #[test]
    fn test_missing_error_gets_fallback() {
        let result = RouteResult::from(RouteResponse {
            success: false,
            error: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(result.error.unwrap().message, FALLBACK_ERROR);
    }

    #[test]
    fn test_degenerate_segments_dropped() {
        let response = RouteResponse {
            success: true,
            path: vec![point(50.7, -3.5), point(50.71, -3.51)],
            segments: vec![
                SegmentDto {
                    coords: vec![point(50.7, -3.5)],
                    kind: "footway".into(),
                },
                SegmentDto {
                    coords: vec![point(50.7, -3.5), point(50.71, -3.51)],
                    kind: "primary".into(),
                },
            ],
            distance_m: 1500.0,
            ..Default::default()
        };
        let result = RouteResult::from(response);
        assert!(result.success);
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].surface_type, "primary");
        assert_eq!(result.elevation_gain_meters, 0.0);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_transport_failure_message() {
        let result = RouteResult::transport_failure("connection refused");
        assert!(!result.success);
        assert_eq!(
            result.error.unwrap().status_message(),
            "Network error: connection refused"
        );
    }
}
