//! The client controller. One [`ClientSession`] owns every piece of
//! mutable client state and is the only thing the UI layer talks to.

use shared::GeoPoint;

use crate::export::ExportError;
use crate::format::format_coord;
use crate::orchestrator::{Orchestrator, RequestError, RequestTicket, RouteCompletion};
use crate::render::{MapSurface, MarkerRole, RenderPipeline, RenderPlan};
use crate::selection::{SelectionState, Transition};
use crate::trip::{clear_trip, decode_trip, encode_trip, Trip};

pub const STATUS_SEARCHING: &str = "Finding the best walking route...";

/// The page address, reduced to what trip sharing needs.
pub trait AddressBar {
    /// Current query string, `?` included when non-empty.
    fn query(&self) -> String;
    /// Replaces the query string without navigating.
    fn replace_query(&mut self, query: &str);
    /// The full address, as it would be shared.
    fn href(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

impl StatusKind {
    pub fn class(self) -> &'static str {
        match self {
            StatusKind::Info => "info",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

pub struct ClientSession<S: MapSurface, B: AddressBar> {
    surface: S,
    address: B,
    selection: SelectionState,
    orchestrator: Orchestrator,
    pipeline: RenderPipeline<S>,
    status: Status,
    rendered_trip: Option<Trip>,
}

impl<S: MapSurface, B: AddressBar> ClientSession<S, B> {
    pub fn new(surface: S, address: B) -> Self {
        let selection = SelectionState::Empty;
        Self {
            surface,
            address,
            status: Status {
                message: selection.guidance().to_string(),
                kind: StatusKind::Info,
            },
            selection,
            orchestrator: Orchestrator::default(),
            pipeline: RenderPipeline::default(),
            rendered_trip: None,
        }
    }

    fn set_status(&mut self, message: impl Into<String>, kind: StatusKind) {
        self.status = Status {
            message: message.into(),
            kind,
        };
    }

    pub fn handle_map_interaction(&mut self, point: GeoPoint) {
        let (next, transition) = self.selection.advance(point);
        match transition {
            Transition::PlacedStart(point) => {
                self.surface.place_marker(MarkerRole::Start, point);
            }
            Transition::PlacedEnd(point) => {
                self.surface.place_marker(MarkerRole::End, point);
            }
            Transition::Reset => self.reset_view(),
        }
        self.selection = next;
        self.set_status(next.guidance(), StatusKind::Info);
    }

    fn reset_view(&mut self) {
        self.surface.remove_marker(MarkerRole::Start);
        self.surface.remove_marker(MarkerRole::End);
        self.pipeline.clear(&mut self.surface);
        self.orchestrator.abandon();
        self.rendered_trip = None;
        let query = clear_trip(&self.address.query());
        self.address.replace_query(&query);
    }

    /// Starts a route calculation. Returns the ticket to run, or `None`
    /// when nothing should be sent (the status says why, if anything).
    pub fn calculate(&mut self) -> Option<RequestTicket> {
        match self.orchestrator.begin(&self.selection) {
            Ok(ticket) => {
                self.pipeline.clear(&mut self.surface);
                self.set_status(STATUS_SEARCHING, StatusKind::Info);
                Some(ticket)
            }
            Err(err @ RequestError::MissingEndpoints) => {
                self.set_status(err.to_string(), StatusKind::Error);
                None
            }
            Err(RequestError::InFlight) => None,
        }
    }

    /// Applies a finished request. Returns `false` when the completion was
    /// stale and nothing changed.
    pub fn complete(&mut self, completion: RouteCompletion) -> bool {
        let Some((request, result)) = self.orchestrator.settle(completion) else {
            return false;
        };

        if let Some(plan) = self.pipeline.render(&mut self.surface, &result) {
            let message = format!("Route found! {}", plan.summary);
            let trip = Trip {
                start: request.start,
                end: request.end,
            };
            let query = encode_trip(&self.address.query(), &trip);
            self.address.replace_query(&query);
            self.rendered_trip = Some(trip);
            self.set_status(message, StatusKind::Success);
        } else if let Some(failure) = &result.error {
            self.set_status(failure.status_message(), StatusKind::Error);
        }
        true
    }

    /// Replays a trip found in the address: the same two placements a user
    /// would make, followed by a calculation.
    pub fn restore_trip(&mut self) -> Option<RequestTicket> {
        let trip = decode_trip(&self.address.query())?;
        if self.selection != SelectionState::Empty {
            return None;
        }
        self.handle_map_interaction(trip.start);
        self.handle_map_interaction(trip.end);
        self.calculate()
    }

    /// The endpoints for a GPX export.
    pub fn export_trip(&mut self) -> Option<Trip> {
        match self.selection.endpoints() {
            Some((start, end)) => Some(Trip { start, end }),
            None => {
                self.set_status(RequestError::MissingEndpoints.to_string(), StatusKind::Error);
                None
            }
        }
    }

    pub fn report_export_failure(&mut self, err: &ExportError) {
        self.set_status(err.to_string(), StatusKind::Error);
    }

    /// Address to share, once a route has been rendered.
    pub fn share_address(&self) -> Option<String> {
        self.rendered_trip.map(|_| self.address.href())
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        self.orchestrator.is_busy()
    }

    pub fn can_calculate(&self) -> bool {
        self.selection.endpoints().is_some() && !self.is_busy()
    }

    pub fn render_plan(&self) -> Option<&RenderPlan> {
        self.pipeline.plan()
    }

    pub fn has_overlay(&self) -> bool {
        self.pipeline.has_overlay()
    }

    pub fn start_input(&self) -> String {
        self.selection.start().map(format_coord).unwrap_or_default()
    }

    pub fn end_input(&self) -> String {
        self.selection.end().map(format_coord).unwrap_or_default()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn address(&self) -> &B {
        &self.address
    }
}
