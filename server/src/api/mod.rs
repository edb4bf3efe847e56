//! # API

use rocket::{Request, http::Status, serde::json::Json};

pub mod health;

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ApiError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub status: u16,
}

impl ApiError {
    fn from_status(status: Status, request: &Request<'_>) -> Self {
        // Only include the path in the error details when debugging
        let details = if log::max_level() >= log::LevelFilter::Debug {
            Some(request.uri().to_string())
        } else {
            None
        };

        Self {
            message: status.reason_lossy().to_string(),
            details,
            status: status.code,
        }
    }
}

#[catch(404)]
pub fn not_found(request: &Request<'_>) -> Json<ApiError> {
    Json(ApiError::from_status(Status::NotFound, request))
}

#[catch(500)]
pub fn internal_error(request: &Request<'_>) -> Json<ApiError> {
    Json(ApiError::from_status(Status::InternalServerError, request))
}

pub fn catchers() -> Vec<rocket::Catcher> {
    catchers![not_found, internal_error]
}
