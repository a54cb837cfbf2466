use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::imaging::{CalibratorElevation, CalibratorsResponse, ValidationResponse};
use crate::imaging::RawRequest;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::imaging::generate_schedule,
        super::api::imaging::validate_request,
        super::api::imaging::list_calibrators,
    ),
    components(
        schemas(
            RawRequest,
            ValidationResponse,
            CalibratorElevation,
            CalibratorsResponse,
            ErrorResponse,
        )
    ),
    info(
        title = "LOFAR Imaging Schedule API",
        description = "Validate imaging requests and generate observation schedules",
        version = "0.1.0"
    ),
    tags(
        (name = "imaging", description = "Imaging schedule generation")
    )
)]
pub struct ApiDoc;
