use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::{Display, From};
use serde_json::json;

use crate::attendance::gate::GateRejection;
use crate::backend::BackendError;

/// Everything a handler can fail with. Rendered as `{"message": ..}`.
#[derive(Debug, Display, From)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    Gate(GateRejection),
    #[display(fmt = "{}", _0)]
    Backend(BackendError),
}

impl ApiError {
    pub(crate) fn user_message(&self) -> String {
        match self {
            ApiError::Gate(rejection) => rejection.to_string(),
            ApiError::Backend(BackendError::Unauthorized) => {
                "Session expired, please log in again".to_string()
            }
            ApiError::Backend(BackendError::Rejected { message, .. }) => message.clone(),
            ApiError::Backend(BackendError::Unavailable(_)) => {
                "Attendance service is unavailable, try again later".to_string()
            }
            ApiError::Backend(BackendError::Decode(_)) => {
                "Unexpected response from attendance service".to_string()
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Gate(_) => StatusCode::BAD_REQUEST,
            ApiError::Backend(BackendError::Unauthorized) => StatusCode::UNAUTHORIZED,
            ApiError::Backend(BackendError::Rejected { .. } | BackendError::Decode(_)) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Backend(BackendError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Backend(e) = self {
            tracing::error!(error = %e, "Attendance backend call failed");
        }

        HttpResponse::build(self.status_code()).json(json!({
            "message": self.user_message()
        }))
    }
}
