//! Handlers for the school intake form and school listing.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use schoolhub_core::browse::BrowseState;
use schoolhub_core::filter::{SchoolFilter, SchoolStats};
use schoolhub_core::intake::{ImageUpload, IntakeForm};
use schoolhub_core::school::{School, SchoolForm};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /api/v1/schools
// ---------------------------------------------------------------------------

/// Parsed multipart submission.
#[derive(Debug, Default)]
struct Submission {
    form: SchoolForm,
    form_id: Option<String>,
    image: Option<ImageUpload>,
}

/// Map a multipart read failure, reporting an over-limit body as 413.
fn multipart_error(err: MultipartError, max_upload_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!(
            "Upload exceeds the {max_upload_bytes} byte limit"
        ));
    }
    AppError::BadRequest(err.body_text())
}

async fn read_submission(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> AppResult<Submission> {
    let mut submission = Submission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_bytes))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "image" {
            let filename = field.file_name().unwrap_or("").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, max_upload_bytes))?;
            // Browsers send an empty part when no file was chosen.
            if !bytes.is_empty() {
                submission.image = Some(ImageUpload {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| multipart_error(e, max_upload_bytes))?;
        let form = &mut submission.form;
        match name.as_str() {
            "name" => form.name = text,
            "address" => form.address = text,
            "city" => form.city = text,
            "state" => form.state = text,
            "contact" => form.contact = text,
            "email_id" => form.email_id = text,
            "form_id" => {
                let id = text.trim();
                if !id.is_empty() {
                    submission.form_id = Some(id.to_string());
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok(submission)
}

/// Create a school from a multipart form.
///
/// An optional `form_id` field identifies the submitting form instance;
/// a second submission with the same id while the first is still running
/// is rejected with 409. A body over the upload limit is rejected with 413
/// before anything is validated or stored.
pub async fn create_school(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<School>>)> {
    let submission = read_submission(multipart, state.config.max_upload_bytes).await?;

    let _guard = match &submission.form_id {
        Some(id) => Some(state.in_flight.try_acquire(id)?),
        None => None,
    };

    let mut intake = IntakeForm::new();
    let result = intake
        .submit(
            state.records.as_ref(),
            state.objects.as_ref(),
            &submission.form,
            submission.image,
        )
        .await;
    tracing::debug!(
        form_id = submission.form_id.as_deref(),
        status = ?intake.status(),
        "Submission finished"
    );
    let school = result?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: school })))
}

// ---------------------------------------------------------------------------
// GET /api/v1/schools
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Free-text search over name, city and address.
    pub q: Option<String>,
    /// Exact city filter; empty means all cities.
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SchoolListing {
    /// Records passing the filter, newest first.
    pub schools: Vec<School>,
    pub showing: usize,
    pub total: usize,
    /// Distinct cities across all records, for the city selector.
    pub cities: Vec<String>,
    /// Aggregates over all records, regardless of filter.
    pub stats: SchoolStats,
    /// The record store could not be read; the listing is empty.
    pub fetch_failed: bool,
}

/// List schools, optionally filtered by `q` and `city`.
///
/// A record store failure still answers 200 with an empty listing and
/// `fetch_failed` set.
pub async fn list_schools(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<DataResponse<SchoolListing>> {
    let mut browse = BrowseState::load(state.records.as_ref()).await;
    browse.set_filter(SchoolFilter::new(params.q, params.city));

    let listing = SchoolListing {
        schools: browse.visible().into_iter().cloned().collect(),
        showing: browse.showing(),
        total: browse.total(),
        cities: browse.city_options(),
        stats: browse.stats(),
        fetch_failed: browse.fetch_failed(),
    };

    Json(DataResponse { data: listing })
}
