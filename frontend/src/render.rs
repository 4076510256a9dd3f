//! Turns a [`RouteResult`] into what the map and sidebar show.
//!
//! Planning is pure; [`RenderPipeline`] applies a plan to a [`MapSurface`]
//! and owns the handles of the single overlay and elevation chart.

use std::cmp::Ordering;

use serde::Serialize;
use shared::GeoPoint;

use crate::format::RouteSummary;
use crate::route::{ProfilePoint, RouteResult};
use crate::surface::{surface_color, SurfaceCategory, DEFAULT_ROUTE_COLOR};

pub const FIT_PADDING_PX: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRole {
    Start,
    End,
}

impl MarkerRole {
    pub fn key(self) -> &'static str {
        match self {
            MarkerRole::Start => "start",
            MarkerRole::End => "end",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarkerRole::Start => "Start Point",
            MarkerRole::End => "End Point",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            MarkerRole::Start => "green",
            MarkerRole::End => "red",
        }
    }
}

/// The map engine as seen by the client. Handles returned by `draw_*`
/// are given back exactly once to the matching remove/dispose call.
pub trait MapSurface {
    type Overlay;
    type Chart;

    fn place_marker(&mut self, role: MarkerRole, point: GeoPoint);
    fn remove_marker(&mut self, role: MarkerRole);
    fn draw_overlay(&mut self, overlay: &OverlayPlan) -> Self::Overlay;
    fn remove_overlay(&mut self, overlay: Self::Overlay);
    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32);
    fn draw_chart(&mut self, points: &[ChartPoint]) -> Self::Chart;
    fn dispose_chart(&mut self, chart: Self::Chart);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<Self> {
        points.into_iter().fold(None, |bounds, point| {
            let (lat, lon) = (point.lat(), point.lon());
            Some(match bounds {
                None => Bounds {
                    south: lat,
                    west: lon,
                    north: lat,
                    east: lon,
                },
                Some(b) => Bounds {
                    south: b.south.min(lat),
                    west: b.west.min(lon),
                    north: b.north.max(lat),
                    east: b.east.max(lon),
                },
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub points: Vec<GeoPoint>,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPlan {
    pub polylines: Vec<Polyline>,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownBar {
    pub category: SurfaceCategory,
    pub label: &'static str,
    pub color: &'static str,
    pub distance_m: f64,
    /// Share of the route's total distance, 0..=100.
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub distance_km: f64,
    pub elevation_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElevationChart {
    pub points: Vec<ChartPoint>,
    pub min_m: f64,
    pub max_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub overlay: Option<OverlayPlan>,
    pub breakdown: Vec<BreakdownBar>,
    pub elevation: Option<ElevationChart>,
    pub summary: RouteSummary,
}

/// `None` for a failed result: nothing but the error message is shown.
pub fn plan_route(result: &RouteResult) -> Option<RenderPlan> {
    if !result.success {
        return None;
    }
    Some(RenderPlan {
        overlay: plan_overlay(result),
        breakdown: aggregate_breakdown(&result.breakdown_by_type, result.distance_meters),
        elevation: elevation_chart(&result.elevation_profile),
        summary: RouteSummary::new(
            result.distance_meters,
            result.elevation_gain_meters,
            result.total_time_seconds,
        ),
    })
}

pub fn plan_overlay(result: &RouteResult) -> Option<OverlayPlan> {
    let polylines: Vec<Polyline> = if result.segments.is_empty() {
        if result.path.is_empty() {
            return None;
        }
        vec![Polyline {
            points: result.path.clone(),
            color: DEFAULT_ROUTE_COLOR,
        }]
    } else {
        result
            .segments
            .iter()
            .map(|segment| Polyline {
                points: segment.points.clone(),
                color: surface_color(&segment.surface_type),
            })
            .collect()
    };

    let bounds = Bounds::enclosing(polylines.iter().flat_map(|line| line.points.iter()))?;
    Some(OverlayPlan { polylines, bounds })
}

/// Groups raw surface types by display label, largest first. Labels with
/// equal distance keep the order in which they were first seen.
pub fn aggregate_breakdown(breakdown: &[(String, f64)], total_m: f64) -> Vec<BreakdownBar> {
    let mut bars: Vec<BreakdownBar> = Vec::new();
    for (kind, meters) in breakdown {
        let category = SurfaceCategory::of(kind);
        match bars.iter_mut().find(|bar| bar.category == category) {
            Some(bar) => bar.distance_m += meters,
            None => bars.push(BreakdownBar {
                category,
                label: category.label(),
                color: surface_color(kind),
                distance_m: *meters,
                percent: 0.0,
            }),
        }
    }

    for bar in &mut bars {
        bar.percent = if total_m > 0.0 {
            bar.distance_m / total_m * 100.0
        } else {
            0.0
        };
    }

    // sort_by is stable, which gives the first-seen tie-break
    bars.sort_by(|a, b| {
        b.distance_m
            .partial_cmp(&a.distance_m)
            .unwrap_or(Ordering::Equal)
    });
    bars
}

pub fn elevation_chart(profile: &[ProfilePoint]) -> Option<ElevationChart> {
    if profile.is_empty() {
        return None;
    }
    let points: Vec<ChartPoint> = profile
        .iter()
        .map(|sample| ChartPoint {
            distance_km: (sample.distance_km * 10.0).round() / 10.0,
            elevation_m: sample.elevation_m,
        })
        .collect();
    let min_m = points
        .iter()
        .map(|p| p.elevation_m)
        .fold(f64::INFINITY, f64::min);
    let max_m = points
        .iter()
        .map(|p| p.elevation_m)
        .fold(f64::NEG_INFINITY, f64::max);
    Some(ElevationChart {
        points,
        min_m,
        max_m,
    })
}

pub struct RenderPipeline<S: MapSurface> {
    overlay: Option<S::Overlay>,
    chart: Option<S::Chart>,
    plan: Option<RenderPlan>,
}

impl<S: MapSurface> Default for RenderPipeline<S> {
    fn default() -> Self {
        Self {
            overlay: None,
            chart: None,
            plan: None,
        }
    }
}

impl<S: MapSurface> RenderPipeline<S> {
    /// Removes the overlay and disposes the chart, if any.
    pub fn clear(&mut self, surface: &mut S) {
        if let Some(overlay) = self.overlay.take() {
            surface.remove_overlay(overlay);
        }
        if let Some(chart) = self.chart.take() {
            surface.dispose_chart(chart);
        }
        self.plan = None;
    }

    pub fn render(&mut self, surface: &mut S, result: &RouteResult) -> Option<&RenderPlan> {
        self.clear(surface);
        let plan = plan_route(result)?;

        if let Some(overlay) = &plan.overlay {
            self.overlay = Some(surface.draw_overlay(overlay));
            surface.fit_bounds(overlay.bounds, FIT_PADDING_PX);
        }
        if let Some(chart) = &plan.elevation {
            self.chart = Some(surface.draw_chart(&chart.points));
        }

        self.plan = Some(plan);
        self.plan.as_ref()
    }

    pub fn plan(&self) -> Option<&RenderPlan> {
        self.plan.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteSegment;
    use crate::testing::{point, success_result, FakeSurface};
    use proptest::prelude::*;

    #[test]
    fn test_breakdown_two_types() {
        let breakdown = vec![
            ("primary".to_string(), 3000.0),
            ("residential".to_string(), 1000.0),
        ];
        let bars = aggregate_breakdown(&breakdown, 4000.0);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label, "Main Road");
        assert_eq!(bars[0].percent, 75.0);
        assert_eq!(bars[1].label, "Residential");
        assert_eq!(bars[1].percent, 25.0);
        assert_eq!(bars[0].percent + bars[1].percent, 100.0);
    }

    #[test]
    fn test_breakdown_collapses_tags_into_label() {
        let breakdown = vec![
            ("footway".to_string(), 500.0),
            ("primary".to_string(), 800.0),
            ("track".to_string(), 700.0),
        ];
        let bars = aggregate_breakdown(&breakdown, 2000.0);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label, "Trail / Footpath");
        assert_eq!(bars[0].distance_m, 1200.0);
        // representative color is the first tag seen for that label
        assert_eq!(bars[0].color, surface_color("footway"));
        assert_eq!(bars[1].label, "Main Road");
    }

    #[test]
    fn test_breakdown_ties_keep_first_seen_order() {
        let breakdown = vec![
            ("cycleway".to_string(), 100.0),
            ("residential".to_string(), 100.0),
            ("primary".to_string(), 100.0),
        ];
        let labels: Vec<_> = aggregate_breakdown(&breakdown, 300.0)
            .into_iter()
            .map(|bar| bar.label)
            .collect();
        assert_eq!(labels, ["Cycleway", "Residential", "Main Road"]);
    }

    #[test]
    fn test_breakdown_zero_distance() {
        let bars = aggregate_breakdown(&[("path".to_string(), 0.0)], 0.0);
        assert_eq!(bars[0].percent, 0.0);
    }

    #[test]
    fn test_overlay_per_segment_in_order() {
        let mut result = success_result();
        result.segments = vec![
            RouteSegment {
                points: vec![point(50.70, -3.50), point(50.705, -3.51)],
                surface_type: "footway".into(),
            },
            RouteSegment {
                points: vec![point(50.705, -3.51), point(50.71, -3.52)],
                surface_type: "primary".into(),
            },
        ];
        let overlay = plan_overlay(&result).unwrap();
        assert_eq!(overlay.polylines.len(), 2);
        assert_eq!(overlay.polylines[0].color, surface_color("footway"));
        assert_eq!(overlay.polylines[1].color, surface_color("primary"));
        assert_eq!(
            overlay.bounds,
            Bounds {
                south: 50.70,
                west: -3.52,
                north: 50.71,
                east: -3.50,
            }
        );
    }

    #[test]
    fn test_overlay_falls_back_to_flat_path() {
        let mut result = success_result();
        result.segments.clear();
        let overlay = plan_overlay(&result).unwrap();
        assert_eq!(overlay.polylines.len(), 1);
        assert_eq!(overlay.polylines[0].color, DEFAULT_ROUTE_COLOR);
        assert_eq!(overlay.polylines[0].points, result.path);
    }

    #[test]
    fn test_elevation_rounds_distance() {
        let profile = [
            ProfilePoint {
                distance_km: 0.0,
                elevation_m: 12.5,
            },
            ProfilePoint {
                distance_km: 1.26,
                elevation_m: 40.0,
            },
        ];
        let chart = elevation_chart(&profile).unwrap();
        assert_eq!(chart.points[1].distance_km, 1.3);
        assert_eq!(chart.min_m, 12.5);
        assert_eq!(chart.max_m, 40.0);
    }

    #[test]
    fn test_empty_profile_hides_chart() {
        let mut result = success_result();
        result.elevation_profile.clear();
        let mut surface = FakeSurface::default();
        let mut pipeline = RenderPipeline::default();
        let plan = pipeline.render(&mut surface, &result).unwrap();
        assert!(plan.elevation.is_none());
        assert_eq!(surface.charts_drawn, 0);
    }

    #[test]
    fn test_rerender_disposes_previous_chart_and_overlay() {
        let result = success_result();
        let mut surface = FakeSurface::default();
        let mut pipeline = RenderPipeline::default();
        pipeline.render(&mut surface, &result);
        pipeline.render(&mut surface, &result);
        assert_eq!(surface.live_overlays.len(), 1);
        assert_eq!(surface.live_charts.len(), 1);
        assert_eq!(surface.charts_drawn, 2);
        assert_eq!(surface.fits.len(), 2);
        assert_eq!(surface.fits[0].1, FIT_PADDING_PX);
    }

    #[test]
    fn test_failed_result_draws_nothing() {
        let mut surface = FakeSurface::default();
        let mut pipeline = RenderPipeline::default();
        pipeline.render(&mut surface, &success_result());
        let failed = RouteResult::transport_failure("offline");
        assert!(pipeline.render(&mut surface, &failed).is_none());
        assert!(surface.live_overlays.is_empty());
        assert!(surface.live_charts.is_empty());
        assert!(!pipeline.has_overlay());
    }

    const TAGS: [&str; 8] = [
        "footway", "track", "cycleway", "tertiary", "residential", "service", "primary", "mystery",
    ];

    proptest! {
        #[test]
        fn prop_percentages_sum_to_hundred(
            entries in proptest::collection::vec((0usize..TAGS.len(), 1.0..5000.0f64), 1..12)
        ) {
            let breakdown: Vec<(String, f64)> = entries
                .iter()
                .map(|(idx, meters)| (TAGS[*idx].to_string(), *meters))
                .collect();
            let total: f64 = breakdown.iter().map(|(_, m)| m).sum();
            let bars = aggregate_breakdown(&breakdown, total);
            let sum: f64 = bars.iter().map(|bar| bar.percent).sum();
            prop_assert!((sum - 100.0).abs() < 1e-6);
            prop_assert!(bars.windows(2).all(|w| w[0].distance_m >= w[1].distance_m));
        }
    }
}
