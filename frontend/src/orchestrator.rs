//! Route request lifecycle: one request in flight at a time, and a
//! generation number on every request so a late answer to an abandoned
//! request is dropped instead of overwriting a newer one.

use shared::RouteRequest;
use thiserror::Error;

use crate::api::RouteApi;
use crate::route::RouteResult;
use crate::selection::SelectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Please set both start and end points first.")]
    MissingEndpoints,
    #[error("a route request is already in progress")]
    InFlight,
}

/// Permission to issue one request, handed out by [`Orchestrator::begin`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestTicket {
    generation: u64,
    request: RouteRequest,
}

impl RequestTicket {
    pub fn request(&self) -> &RouteRequest {
        &self.request
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteCompletion {
    generation: u64,
    request: RouteRequest,
    result: RouteResult,
}

impl RouteCompletion {
    pub fn request(&self) -> &RouteRequest {
        &self.request
    }

    pub fn result(&self) -> &RouteResult {
        &self.result
    }
}

#[derive(Debug, Default)]
pub struct Orchestrator {
    generation: u64,
    in_flight: Option<u64>,
}

impl Orchestrator {
    pub fn begin(&mut self, selection: &SelectionState) -> Result<RequestTicket, RequestError> {
        let (start, end) = selection
            .endpoints()
            .ok_or(RequestError::MissingEndpoints)?;
        if self.in_flight.is_some() {
            return Err(RequestError::InFlight);
        }
        self.generation += 1;
        self.in_flight = Some(self.generation);
        Ok(RequestTicket {
            generation: self.generation,
            request: RouteRequest { start, end },
        })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Forgets the outstanding request; its completion will be ignored.
    pub fn abandon(&mut self) {
        self.generation += 1;
        self.in_flight = None;
    }

    /// Releases the in-flight guard and hands back the completion if it
    /// answers the current request. Stale completions yield `None`.
    pub fn settle(&mut self, completion: RouteCompletion) -> Option<(RouteRequest, RouteResult)> {
        if self.in_flight != Some(completion.generation) {
            return None;
        }
        self.in_flight = None;
        Some((completion.request, completion.result))
    }
}

/// Runs the request for `ticket`. Every outcome, including transport
/// failure, comes back as a completion so the guard is always released.
pub async fn request_route<A: RouteApi>(api: &A, ticket: RequestTicket) -> RouteCompletion {
    let result = match api.fetch_route(&ticket.request).await {
        Ok(response) => RouteResult::from(response),
        Err(err) => RouteResult::transport_failure(err.to_string()),
    };
    RouteCompletion {
        generation: ticket.generation,
        request: ticket.request,
        result,
    }
}
