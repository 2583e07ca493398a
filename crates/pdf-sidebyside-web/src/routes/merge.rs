//! Merge route - two PDF uploads in, one side-by-side PDF out.

use axum::{
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::Response,
};
use axum_extra::extract::{
    Multipart,
    multipart::{Field, MultipartError},
};
use bytes::{Bytes, BytesMut};
use pdf_sidebyside_core::{AppConfig, ErrorClass};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::helpers::{ApiError, NOT_A_PDF_MESSAGE, ResultExt, RouteResult};
use crate::state::AppState;

/// Form field holding the left-hand document.
pub const LEFT_FIELD: &str = "pdf1";
/// Form field holding the right-hand document.
pub const RIGHT_FIELD: &str = "pdf2";

const PDF_MIME: &str = "application/pdf";
const GENERIC_MIME: &str = "application/octet-stream";

/// Merge the `pdf1` and `pdf2` uploads side by side and return the result
/// as a download.
pub async fn merge_pdfs(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> RouteResult<Response> {
    let mut left = None;
    let mut right = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, &state.config))?
    {
        let slot = match field.name() {
            Some(LEFT_FIELD) => &mut left,
            Some(RIGHT_FIELD) => &mut right,
            other => {
                debug!("Ignoring form field {:?}", other);
                continue;
            }
        };
        *slot = read_upload(field, &state.config).await?;
    }

    let sizes = (
        left.as_ref().map_or(0, Bytes::len),
        right.as_ref().map_or(0, Bytes::len),
    );

    // Parsing and composing are CPU-bound
    let composer = state.composer.clone();
    let merged = tokio::task::spawn_blocking(move || {
        composer.compose_inputs(left.as_deref(), right.as_deref())
    })
    .await
    .map_err(|e| {
        error!("Merge task panicked: {}", e);
        ApiError::merge_failed()
    })?
    .map_err(|e| {
        match e.class() {
            ErrorClass::MissingInput => warn!("Rejected merge request: {}", e),
            ErrorClass::ProcessingFailure => error!("Failed to merge PDFs: {}", e),
        }
        ApiError::from(e)
    })?;

    info!(
        "Merged {} + {} byte uploads into {} bytes",
        sizes.0,
        sizes.1,
        merged.len()
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, PDF_MIME)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", state.config.output_filename),
        )
        .body(Body::from(merged))
        .or_internal_error()
}

/// Read one file field, enforcing the type check and the size cap.
///
/// An empty part without a file name is what browsers send for an
/// untouched file input; it counts as absent.
async fn read_upload(mut field: Field, config: &AppConfig) -> RouteResult<Option<Bytes>> {
    let filename = field.file_name().map(str::to_owned);
    if !is_pdf_upload(field.content_type(), filename.as_deref()) {
        warn!("Rejected non-PDF upload {:?}", filename);
        return Err(ApiError::bad_request(NOT_A_PDF_MESSAGE));
    }

    let mut data = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(&e, config))? {
        if data.len() + chunk.len() > config.max_upload_bytes {
            warn!("Rejected upload {:?}: over the size limit", filename);
            return Err(too_large(config));
        }
        data.extend_from_slice(&chunk);
    }

    if data.is_empty() && filename.as_deref().is_none_or(str::is_empty) {
        return Ok(None);
    }
    Ok(Some(data.freeze()))
}

/// Whether a part looks like a PDF.
///
/// The declared content type decides unless it is missing or generic, in
/// which case the type guessed from the file name does. Parts with nothing
/// to go on are let through; the parser has the final say.
fn is_pdf_upload(content_type: Option<&str>, filename: Option<&str>) -> bool {
    let declared = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty());

    match declared.as_deref() {
        Some(PDF_MIME) => true,
        Some(ct) if ct != GENERIC_MIME => false,
        _ => filename
            .and_then(|name| mime_guess::from_path(name).first_raw())
            .is_none_or(|guessed| guessed == PDF_MIME),
    }
}

fn too_large(config: &AppConfig) -> ApiError {
    ApiError::new(
        StatusCode::PAYLOAD_TOO_LARGE,
        format!("File exceeds the {} upload limit", config.upload_limit_label()),
    )
}

fn multipart_error(err: &MultipartError, config: &AppConfig) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large(config);
    }
    warn!("Malformed multipart request: {}", err);
    ApiError::new(err.status(), err.body_text())
}
