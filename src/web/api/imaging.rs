use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::imaging::{catalog, parse_start_time, ObservationRequest, RawRequest};
use crate::schedule;
use crate::sky::{Astrometry, Horizon};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: Vec<ErrorResponse>,
    /// Calibrator chosen for the opening scan.
    pub calibrator: Option<String>,
    pub n_beams: usize,
    pub n_subbands: usize,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalibratorsQuery {
    /// `YYYY-MM-DD-hh-mm-ss`, defaults to now.
    pub time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CalibratorElevation {
    pub name: String,
    pub ra: String,
    pub dec: String,
    pub selectable: bool,
    pub elevation_deg: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CalibratorsResponse {
    pub time: String,
    pub calibrators: Vec<CalibratorElevation>,
}

#[utoipa::path(
    post,
    path = "/api/imaging/validate",
    tag = "imaging",
    request_body = RawRequest,
    responses(
        (status = 200, description = "Validation result", body = ValidationResponse)
    )
)]
pub async fn validate_request(
    State(state): State<AppState>,
    Json(raw): Json<RawRequest>,
) -> Json<ValidationResponse> {
    let request = match ObservationRequest::from_raw(&raw, &Horizon) {
        Ok(r) => r,
        Err(e) => {
            return Json(ValidationResponse {
                valid: false,
                errors: vec![ErrorResponse::from_imaging(&e)],
                calibrator: None,
                n_beams: 0,
                n_subbands: 0,
            })
        }
    };

    let (calibrator, errors) = match schedule::plan(&request, &state.site, &Horizon) {
        Ok(plan) => (plan.calibrators().next().map(|c| c.name.to_string()), vec![]),
        Err(e) => (None, vec![ErrorResponse::from_imaging(&e)]),
    };

    Json(ValidationResponse {
        valid: errors.is_empty(),
        errors,
        calibrator,
        n_beams: request.n_beams(),
        n_subbands: request.subbands.count,
    })
}

#[utoipa::path(
    post,
    path = "/api/imaging",
    tag = "imaging",
    request_body = RawRequest,
    responses(
        (status = 200, description = "Schedule text", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn generate_schedule(
    State(state): State<AppState>,
    Json(raw): Json<RawRequest>,
) -> ApiResult<impl IntoResponse> {
    let request = ObservationRequest::from_raw(&raw, &Horizon)?;
    let mut out = Vec::new();
    schedule::generate(&request, &state.site, &Horizon, &mut out)?;
    let text = String::from_utf8(out).map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    ))
}

#[utoipa::path(
    get,
    path = "/api/calibrators",
    tag = "imaging",
    params(CalibratorsQuery),
    responses(
        (status = 200, description = "Calibrator elevations at the station", body = CalibratorsResponse),
        (status = 400, description = "Invalid time", body = ErrorResponse)
    )
)]
pub async fn list_calibrators(
    State(state): State<AppState>,
    Query(query): Query<CalibratorsQuery>,
) -> ApiResult<Json<CalibratorsResponse>> {
    let time = match query.time.as_deref() {
        Some(t) => parse_start_time(t)?,
        None => {
            let now = chrono::Utc::now().naive_utc();
            now.with_nanosecond(0).unwrap_or(now)
        }
    };

    let mut calibrators = Vec::with_capacity(catalog::CALIBRATORS.len());
    for cal in &catalog::CALIBRATORS {
        let coord = Horizon.parse_coordinate(cal.ra, cal.dec).map_err(|e| {
            ApiError::Internal(format!("catalog entry {} is malformed: {}", cal.name, e))
        })?;
        calibrators.push(CalibratorElevation {
            name: cal.name.to_string(),
            ra: cal.ra.to_string(),
            dec: cal.dec.to_string(),
            selectable: cal.selectable,
            elevation_deg: Horizon.elevation_of(&coord, time, &state.site),
        });
    }

    Ok(Json(CalibratorsResponse {
        time: time.to_string(),
        calibrators,
    }))
}
