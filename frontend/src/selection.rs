//! Point selection driven by map clicks.
//!
//! Each variant carries exactly the endpoints that are live, so a state
//! with an end point but no start point cannot be expressed.

use shared::GeoPoint;

pub const GUIDE_PLACE_START: &str =
    "Click on the map to place your starting point (green marker).";
pub const GUIDE_PLACE_END: &str = "Now click to place your destination (red marker).";
pub const GUIDE_READY: &str = "Ready! Click \"Calculate Route\" to find your path.";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Empty,
    StartSet {
        start: GeoPoint,
    },
    BothSet {
        start: GeoPoint,
        end: GeoPoint,
    },
}

/// What a map interaction did, for the caller to mirror on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    PlacedStart(GeoPoint),
    PlacedEnd(GeoPoint),
    Reset,
}

impl SelectionState {
    /// Every interaction is valid in every state: the third one resets.
    pub fn advance(self, point: GeoPoint) -> (Self, Transition) {
        match self {
            SelectionState::Empty => (
                SelectionState::StartSet { start: point },
                Transition::PlacedStart(point),
            ),
            SelectionState::StartSet { start } => (
                SelectionState::BothSet { start, end: point },
                Transition::PlacedEnd(point),
            ),
            SelectionState::BothSet { .. } => (SelectionState::Empty, Transition::Reset),
        }
    }

    pub fn start(&self) -> Option<GeoPoint> {
        match self {
            SelectionState::Empty => None,
            SelectionState::StartSet { start } | SelectionState::BothSet { start, .. } => {
                Some(*start)
            }
        }
    }

    pub fn end(&self) -> Option<GeoPoint> {
        match self {
            SelectionState::BothSet { end, .. } => Some(*end),
            _ => None,
        }
    }

    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        match self {
            SelectionState::BothSet { start, end } => Some((*start, *end)),
            _ => None,
        }
    }

    pub fn live_endpoints(&self) -> usize {
        match self {
            SelectionState::Empty => 0,
            SelectionState::StartSet { .. } => 1,
            SelectionState::BothSet { .. } => 2,
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            SelectionState::Empty => GUIDE_PLACE_START,
            SelectionState::StartSet { .. } => GUIDE_PLACE_END,
            SelectionState::BothSet { .. } => GUIDE_READY,
        }
    }
}
