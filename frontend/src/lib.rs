pub mod api;
pub mod bridge;
pub mod export;
pub mod format;
pub mod orchestrator;
pub mod render;
pub mod route;
pub mod selection;
pub mod session;
pub mod surface;
pub mod trip;

#[cfg(test)]
mod testing;

use seed::{prelude::*, virtual_dom::AtValue, *};
use serde::Deserialize;
use shared::GeoPoint;
use wasm_bindgen::{prelude::wasm_bindgen, JsCast};

use crate::api::HttpRouteApi;
use crate::bridge::{init_map, save_file, BrowserAddress, LeafletSurface};
use crate::export::{download_gpx, share_qr_data_url, ExportError, GpxFile};
use crate::orchestrator::{request_route, RequestTicket, RouteCompletion};
use crate::render::{BreakdownBar, RenderPlan};
use crate::session::ClientSession;

pub struct Model {
    session: ClientSession<LeafletSurface, BrowserAddress>,
    api: HttpRouteApi,
    gpx_pending: bool,
    share: Option<ShareCard>,
}

struct ShareCard {
    address: String,
    qr: Result<String, ExportError>,
}

pub enum Msg {
    MapClicked { lat: f64, lon: f64 },
    Calculate,
    RouteFetched(RouteCompletion),
    DownloadGpx,
    GpxFetched(Result<GpxFile, ExportError>),
    ToggleShare,
}

#[derive(Deserialize)]
struct MapClickPayload {
    lat: f64,
    lon: f64,
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("map-click"), |event| {
        let payload = event
            .dyn_into::<web_sys::CustomEvent>()
            .ok()
            .and_then(|event| serde_wasm_bindgen::from_value::<MapClickPayload>(event.detail()).ok());
        payload.map(|payload| Msg::MapClicked {
            lat: payload.lat,
            lon: payload.lon,
        })
    }));

    let mut model = Model {
        session: ClientSession::new(LeafletSurface, BrowserAddress),
        api: HttpRouteApi::default(),
        gpx_pending: false,
        share: None,
    };

    if let Some(ticket) = model.session.restore_trip() {
        web_sys::console::debug_1(&"[frontend] replaying trip from address".into());
        orders.perform_cmd(send_route_request(model.api.clone(), ticket));
    }

    model
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::MapClicked { lat, lon } => match GeoPoint::new(lat, lon) {
            Ok(point) => {
                web_sys::console::debug_1(
                    &format!("[frontend] map click lat={lat:.5} lon={lon:.5}").into(),
                );
                model.session.handle_map_interaction(point);
                if model.session.render_plan().is_none() {
                    model.share = None;
                }
            }
            Err(err) => {
                web_sys::console::error_1(&format!("[frontend] ignoring click: {err}").into());
            }
        },
        Msg::Calculate => {
            if let Some(ticket) = model.session.calculate() {
                model.share = None;
                orders.perform_cmd(send_route_request(model.api.clone(), ticket));
            }
        }
        Msg::RouteFetched(completion) => {
            let failure = completion.result().error.clone();
            if !model.session.complete(completion) {
                web_sys::console::debug_1(&"[frontend] dropped stale route response".into());
                return;
            }
            if let Some(failure) = failure {
                web_sys::console::error_1(
                    &format!("[frontend] route failed: {}", failure.message).into(),
                );
            }
        }
        Msg::DownloadGpx => {
            if model.gpx_pending {
                return;
            }
            if let Some(trip) = model.session.export_trip() {
                model.gpx_pending = true;
                let api = model.api.clone();
                orders.perform_cmd(async move { Msg::GpxFetched(download_gpx(&api, trip).await) });
            }
        }
        Msg::GpxFetched(result) => {
            model.gpx_pending = false;
            let saved = result.and_then(|file| {
                save_file(&file).map_err(|err| ExportError::Save(format!("{err:?}")))
            });
            if let Err(err) = saved {
                web_sys::console::error_1(&format!("[frontend] {err}").into());
                model.session.report_export_failure(&err);
            }
        }
        Msg::ToggleShare => {
            model.share = match (&model.share, model.session.share_address()) {
                (None, Some(address)) => Some(ShareCard {
                    qr: share_qr_data_url(&address),
                    address,
                }),
                _ => None,
            };
        }
    }
}

async fn send_route_request(api: HttpRouteApi, ticket: RequestTicket) -> Msg {
    let request = ticket.request();
    web_sys::console::debug_1(
        &format!(
            "[frontend] sending route request start=({:.5},{:.5}) end=({:.5},{:.5})",
            request.start.lat(),
            request.start.lon(),
            request.end.lat(),
            request.end.lon()
        )
        .into(),
    );
    Msg::RouteFetched(request_route(&api, ticket).await)
}

pub fn view(model: &Model) -> Node<Msg> {
    let plan = model.session.render_plan();
    div![
        C!["app-container"],
        h1!["Walking Route Planner"],
        view_controls(model),
        view_status(model),
        plan.map(view_summary).unwrap_or_else(|| empty![]),
        plan.map(|plan| view_breakdown(&plan.breakdown))
            .unwrap_or_else(|| empty![]),
        view_elevation(plan),
        plan.map(|_| view_share(model)).unwrap_or_else(|| empty![]),
    ]
}

fn view_controls(model: &Model) -> Node<Msg> {
    let endpoint = |label: &str, id: &str, value: String| {
        div![
            C!["input-field"],
            label![label],
            input![attrs! {
                At::Id => id,
                At::Value => &value,
                At::ReadOnly => AtValue::None,
                At::Placeholder => "Click on the map",
            }],
        ]
    };

    div![
        C!["controls"],
        endpoint("Start", "start-input", model.session.start_input()),
        endpoint("End", "end-input", model.session.end_input()),
        button![
            attrs! {
                At::Id => "calculate-btn",
                At::Disabled => bool_attr(!model.session.can_calculate()),
            },
            if model.session.is_busy() {
                "Calculating..."
            } else {
                "Calculate Route"
            },
            ev(Ev::Click, |_| Msg::Calculate),
        ],
    ]
}

fn view_status(model: &Model) -> Node<Msg> {
    let status = model.session.status();
    p![
        id!["status-area"],
        C![status.kind.class()],
        &status.message,
    ]
}

fn view_summary(plan: &RenderPlan) -> Node<Msg> {
    let card = |label: &str, content: String| {
        div![
            C!["metadata-card"],
            span![C!["label"], label],
            strong![content],
        ]
    };

    div![
        C!["metadata-grid"],
        card("Distance", format!("{} km", plan.summary.distance_km)),
        card("Elevation", format!("+{} m", plan.summary.elevation_gain_m)),
        card("Est. time", plan.summary.duration.clone()),
    ]
}

fn view_breakdown(bars: &[BreakdownBar]) -> Node<Msg> {
    if bars.is_empty() {
        return empty![];
    }
    div![
        C!["breakdown"],
        h3!["Route surface"],
        bars.iter().map(|bar| {
            div![
                C!["breakdown-row"],
                span![C!["label"], bar.label],
                div![
                    C!["breakdown-track"],
                    div![
                        C!["breakdown-bar"],
                        style! {
                            St::Width => format!("{:.1}%", bar.percent),
                            St::BackgroundColor => bar.color,
                        },
                    ],
                ],
                small![format!(
                    "{:.2} km ({:.0}%)",
                    bar.distance_m / 1000.0,
                    bar.percent
                )],
            ]
        }),
    ]
}

/// The canvas stays in the DOM so the chart can be drawn into it from
/// `update`, before the next view pass.
fn view_elevation(plan: Option<&RenderPlan>) -> Node<Msg> {
    let chart = plan.and_then(|plan| plan.elevation.as_ref());
    div![
        C!["elevation-section"],
        style! { St::Display => if chart.is_some() { "block" } else { "none" } },
        h3!["Elevation profile"],
        canvas![id!["elevation-chart"]],
        chart
            .map(|chart| {
                small![format!(
                    "Min {:.0} m · Max {:.0} m",
                    chart.min_m, chart.max_m
                )]
            })
            .unwrap_or_else(|| empty![]),
    ]
}

fn view_share(model: &Model) -> Node<Msg> {
    let card = model.share.as_ref().map(|card| {
        div![
            C!["share-card"],
            match &card.qr {
                Ok(data_url) => img![attrs! {
                    At::Src => data_url,
                    At::Alt => "QR code for this route",
                }],
                Err(err) => p![C!["error"], err.to_string()],
            },
            input![attrs! {
                At::Value => &card.address,
                At::ReadOnly => AtValue::None,
            }],
        ]
    });

    div![
        C!["export"],
        button![
            attrs! { At::Disabled => bool_attr(model.gpx_pending) },
            if model.gpx_pending {
                "Downloading..."
            } else {
                "Download GPX"
            },
            ev(Ev::Click, |_| Msg::DownloadGpx),
        ],
        button![
            if model.share.is_some() {
                "Hide share"
            } else {
                "Share"
            },
            ev(Ev::Click, |_| Msg::ToggleShare),
        ],
        card.unwrap_or_else(|| empty![]),
    ]
}

#[wasm_bindgen(start)]
pub fn start() {
    init_map();
    App::start("app", init, update, view);
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}
