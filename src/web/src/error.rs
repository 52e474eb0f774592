use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use core::shared::error::SimError;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP projection of the simulation error taxonomy. The stable machine
/// code travels next to the human-readable message; clients branch on the
/// code, never the text.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_argument",
            message: message.into(),
        }
    }
}

impl From<SimError> for ApiError {
    fn from(error: SimError) -> Self {
        let status = match &error {
            SimError::TeamNotFound(_)
            | SimError::PlayerNotFound(_)
            | SimError::ProspectNotFound(_) => StatusCode::NOT_FOUND,
            SimError::NotUserTeam(_) => StatusCode::FORBIDDEN,
            SimError::InvariantViolation(_)
            | SimError::ScheduleConflict(_)
            | SimError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SimError::VersionMismatch { .. } => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError {
            status,
            code: error.code(),
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.code,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let error: ApiError = SimError::TeamNotFound("Aurora".into()).into();
        assert_eq!(error.status, StatusCode::NOT_FOUND);
        assert_eq!(error.code, "team_not_found");
    }

    #[test]
    fn invariants_map_to_500() {
        let error: ApiError = SimError::InvariantViolation("gp drift".into()).into();
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn trade_rejections_map_to_400() {
        let error: ApiError = SimError::PartnerRejected("too lopsided".into()).into();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "partner_rejected");
    }
}
