//! Display grouping for the raw surface tags reported by the routing service.

pub const DEFAULT_ROUTE_COLOR: &str = "#3b82f6";
pub const UNKNOWN_COLOR: &str = "#6b7280";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceCategory {
    Trail,
    Cycleway,
    QuietRoad,
    Residential,
    MainRoad,
    Unknown,
}

impl SurfaceCategory {
    pub fn of(tag: &str) -> Self {
        match tag {
            "footway" | "path" | "bridleway" | "track" | "steps" | "pedestrian" => {
                SurfaceCategory::Trail
            }
            "cycleway" => SurfaceCategory::Cycleway,
            "unclassified" | "tertiary" | "tertiary_link" => SurfaceCategory::QuietRoad,
            "residential" | "living_street" | "service" => SurfaceCategory::Residential,
            "primary" | "primary_link" | "secondary" | "secondary_link" | "trunk"
            | "trunk_link" => SurfaceCategory::MainRoad,
            _ => SurfaceCategory::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SurfaceCategory::Trail => "Trail / Footpath",
            SurfaceCategory::Cycleway => "Cycleway",
            SurfaceCategory::QuietRoad => "Quiet Road",
            SurfaceCategory::Residential => "Residential",
            SurfaceCategory::MainRoad => "Main Road",
            SurfaceCategory::Unknown => "Unknown",
        }
    }
}

/// Color for one raw tag. Tags within a category may differ in shade.
pub fn surface_color(tag: &str) -> &'static str {
    match tag {
        "footway" | "path" | "pedestrian" | "steps" => "#16a34a",
        "bridleway" | "track" => "#65a30d",
        "cycleway" => "#0d9488",
        "unclassified" | "tertiary" | "tertiary_link" => "#eab308",
        "residential" | "living_street" => "#f97316",
        "service" => "#fb923c",
        "secondary" | "secondary_link" => "#ef4444",
        "primary" | "primary_link" => "#dc2626",
        "trunk" | "trunk_link" => "#991b1b",
        _ => UNKNOWN_COLOR,
    }
}
