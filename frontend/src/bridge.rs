//! Browser-side implementations: the Leaflet/Chart.js module behind
//! [`MapSurface`], `window.location`/`history` behind [`AddressBar`], and
//! file downloads.

use serde_wasm_bindgen::to_value;
use shared::GeoPoint;
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};

use crate::export::GpxFile;
use crate::render::{Bounds, ChartPoint, MapSurface, MarkerRole, OverlayPlan};
use crate::session::AddressBar;

#[wasm_bindgen(module = "/route_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    pub fn init_map();
    #[wasm_bindgen(js_name = placeMarker)]
    fn place_marker_js(role: &str, lat: f64, lon: f64, label: &str, color: &str);
    #[wasm_bindgen(js_name = removeMarker)]
    fn remove_marker_js(role: &str);
    #[wasm_bindgen(js_name = drawRoute)]
    fn draw_route_js(polylines: JsValue) -> u32;
    #[wasm_bindgen(js_name = removeRoute)]
    fn remove_route_js(handle: u32);
    #[wasm_bindgen(js_name = fitBounds)]
    fn fit_bounds_js(south: f64, west: f64, north: f64, east: f64, padding: u32);
    #[wasm_bindgen(js_name = drawElevationChart)]
    fn draw_elevation_chart_js(points: JsValue) -> u32;
    #[wasm_bindgen(js_name = disposeChart)]
    fn dispose_chart_js(handle: u32);
}

#[derive(Default)]
pub struct LeafletSurface;

impl MapSurface for LeafletSurface {
    type Overlay = u32;
    type Chart = u32;

    fn place_marker(&mut self, role: MarkerRole, point: GeoPoint) {
        place_marker_js(role.key(), point.lat(), point.lon(), role.label(), role.color());
    }

    fn remove_marker(&mut self, role: MarkerRole) {
        remove_marker_js(role.key());
    }

    fn draw_overlay(&mut self, overlay: &OverlayPlan) -> u32 {
        match to_value(&overlay.polylines) {
            Ok(value) => draw_route_js(value),
            Err(err) => {
                web_sys::console::error_1(&format!("[frontend] route not drawn: {err}").into());
                0
            }
        }
    }

    fn remove_overlay(&mut self, overlay: u32) {
        remove_route_js(overlay);
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32) {
        fit_bounds_js(bounds.south, bounds.west, bounds.north, bounds.east, padding_px);
    }

    fn draw_chart(&mut self, points: &[ChartPoint]) -> u32 {
        match to_value(points) {
            Ok(value) => draw_elevation_chart_js(value),
            Err(err) => {
                web_sys::console::error_1(&format!("[frontend] chart not drawn: {err}").into());
                0
            }
        }
    }

    fn dispose_chart(&mut self, chart: u32) {
        dispose_chart_js(chart);
    }
}

#[derive(Default)]
pub struct BrowserAddress;

impl AddressBar for BrowserAddress {
    fn query(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().search().ok())
            .unwrap_or_default()
    }

    fn replace_query(&mut self, query: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let location = window.location();
        let path = location.pathname().unwrap_or_default();
        let hash = location.hash().unwrap_or_default();
        let url = format!("{path}{query}{hash}");
        if let Ok(history) = window.history() {
            if let Err(err) = history.replace_state_with_url(&JsValue::NULL, "", Some(&url)) {
                web_sys::console::error_1(&err);
            }
        }
    }

    fn href(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().href().ok())
            .unwrap_or_default()
    }
}

/// Hands `file` to the browser as a download.
pub fn save_file(file: &GpxFile) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(file.bytes.as_slice()));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(file.mime);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()?;
    anchor.set_href(&url);
    anchor.set_download(file.filename);
    anchor.click();

    web_sys::Url::revoke_object_url(&url)
}
