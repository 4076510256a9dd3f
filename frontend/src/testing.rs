//! In-memory stand-ins for the map, the address bar and the routing service.

use std::cell::Cell;

use shared::{Breakdown, ElevationSample, GeoPoint, RouteRequest, RouteResponse, SegmentDto};

use crate::api::{RouteApi, TransportError};
use crate::render::{Bounds, ChartPoint, MapSurface, MarkerRole, OverlayPlan};
use crate::route::RouteResult;
use crate::selection::SelectionState;
use crate::session::AddressBar;

pub fn point(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon).unwrap()
}

pub fn both_set() -> SelectionState {
    SelectionState::BothSet {
        start: point(50.70, -3.50),
        end: point(50.71, -3.52),
    }
}

pub fn success_response() -> RouteResponse {
    let (a, b, c) = (point(50.70, -3.50), point(50.705, -3.51), point(50.71, -3.52));
    RouteResponse {
        success: true,
        path: vec![a, b, c],
        segments: vec![
            SegmentDto {
                coords: vec![a, b],
                kind: "primary".into(),
            },
            SegmentDto {
                coords: vec![b, c],
                kind: "residential".into(),
            },
        ],
        distance_m: 4000.0,
        elevation_gain: Some(87.6),
        total_time_s: Some(125.0 * 60.0),
        num_nodes: Some(3),
        breakdown: Breakdown(vec![
            ("primary".into(), 3000.0),
            ("residential".into(), 1000.0),
        ]),
        elevation_profile: vec![
            ElevationSample {
                distance_km: 0.0,
                elevation_m: 20.0,
            },
            ElevationSample {
                distance_km: 3.0,
                elevation_m: 90.0,
            },
            ElevationSample {
                distance_km: 4.0,
                elevation_m: 60.0,
            },
        ],
        error: None,
    }
}

pub fn success_result() -> RouteResult {
    RouteResult::from(success_response())
}

#[derive(Default)]
pub struct FakeSurface {
    next_handle: u32,
    pub markers: Vec<(MarkerRole, GeoPoint)>,
    pub live_overlays: Vec<u32>,
    pub live_charts: Vec<u32>,
    pub charts_drawn: usize,
    pub fits: Vec<(Bounds, u32)>,
}

impl FakeSurface {
    fn handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl MapSurface for FakeSurface {
    type Overlay = u32;
    type Chart = u32;

    fn place_marker(&mut self, role: MarkerRole, point: GeoPoint) {
        self.markers.retain(|(r, _)| *r != role);
        self.markers.push((role, point));
    }

    fn remove_marker(&mut self, role: MarkerRole) {
        self.markers.retain(|(r, _)| *r != role);
    }

    fn draw_overlay(&mut self, _overlay: &OverlayPlan) -> u32 {
        let handle = self.handle();
        self.live_overlays.push(handle);
        handle
    }

    fn remove_overlay(&mut self, overlay: u32) {
        self.live_overlays.retain(|h| *h != overlay);
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32) {
        self.fits.push((bounds, padding_px));
    }

    fn draw_chart(&mut self, _points: &[ChartPoint]) -> u32 {
        let handle = self.handle();
        self.charts_drawn += 1;
        self.live_charts.push(handle);
        handle
    }

    fn dispose_chart(&mut self, chart: u32) {
        self.live_charts.retain(|h| *h != chart);
    }
}

pub struct FakeAddress {
    pub query: String,
}

impl FakeAddress {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
        }
    }
}

impl AddressBar for FakeAddress {
    fn query(&self) -> String {
        self.query.clone()
    }

    fn replace_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    fn href(&self) -> String {
        format!("http://localhost:8080/{}", self.query)
    }
}

pub struct FakeApi {
    route: Result<RouteResponse, TransportError>,
    gpx: Result<Vec<u8>, TransportError>,
    route_calls: Cell<usize>,
    last_request: Cell<Option<RouteRequest>>,
    last_gpx_request: Cell<Option<RouteRequest>>,
}

impl FakeApi {
    fn new(
        route: Result<RouteResponse, TransportError>,
        gpx: Result<Vec<u8>, TransportError>,
    ) -> Self {
        Self {
            route,
            gpx,
            route_calls: Cell::new(0),
            last_request: Cell::new(None),
            last_gpx_request: Cell::new(None),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(Ok(success_response()), Ok(b"<gpx></gpx>".to_vec()))
    }

    pub fn responding(response: RouteResponse) -> Self {
        Self::new(Ok(response), Ok(b"<gpx></gpx>".to_vec()))
    }

    pub fn failing(err: TransportError) -> Self {
        Self::new(Err(err.clone()), Err(err))
    }

    pub fn route_calls(&self) -> usize {
        self.route_calls.get()
    }

    pub fn last_request(&self) -> Option<RouteRequest> {
        self.last_request.get()
    }

    pub fn last_gpx_request(&self) -> Option<RouteRequest> {
        self.last_gpx_request.get()
    }
}

impl RouteApi for FakeApi {
    async fn fetch_route(&self, request: &RouteRequest) -> Result<RouteResponse, TransportError> {
        self.route_calls.set(self.route_calls.get() + 1);
        self.last_request.set(Some(*request));
        self.route.clone()
    }

    async fn fetch_gpx(&self, request: &RouteRequest) -> Result<Vec<u8>, TransportError> {
        self.last_gpx_request.set(Some(*request));
        self.gpx.clone()
    }
}
