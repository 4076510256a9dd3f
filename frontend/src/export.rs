use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use qrcode::render::svg;
use qrcode::QrCode;
use shared::RouteRequest;
use thiserror::Error;

use crate::api::{RouteApi, TransportError};
use crate::trip::Trip;

pub const GPX_FILENAME: &str = "route.gpx";
pub const GPX_MIME: &str = "application/gpx+xml";
const QR_SIZE_PX: u32 = 200;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    #[error("GPX download failed: {0}")]
    Download(#[from] TransportError),
    #[error("GPX download failed: the service returned an empty file")]
    EmptyFile,
    #[error("could not save GPX file: {0}")]
    Save(String),
    #[error("could not encode share link: {0}")]
    Qr(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpxFile {
    pub filename: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Fetches the GPX for `trip`. Independent of the route request: it does
/// not touch the selection, the overlay or the in-flight guard.
pub async fn download_gpx<A: RouteApi>(api: &A, trip: Trip) -> Result<GpxFile, ExportError> {
    let request = RouteRequest {
        start: trip.start,
        end: trip.end,
    };
    let bytes = api.fetch_gpx(&request).await?;
    if bytes.is_empty() {
        return Err(ExportError::EmptyFile);
    }
    Ok(GpxFile {
        filename: GPX_FILENAME,
        mime: GPX_MIME,
        bytes,
    })
}

/// An `<img>`-ready SVG data URL of a QR code for `address`.
pub fn share_qr_data_url(address: &str) -> Result<String, ExportError> {
    let code = QrCode::new(address.as_bytes()).map_err(|err| ExportError::Qr(err.to_string()))?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(QR_SIZE_PX, QR_SIZE_PX)
        .build();
    Ok(format!(
        "data:image/svg+xml;base64,{}",
        BASE64.encode(image.as_bytes())
    ))
}
