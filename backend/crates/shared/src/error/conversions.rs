//! HTTP response shape of [`AppError`] (`axum` feature)

#[cfg(feature = "axum")]
use super::app_error::AppError;

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Clients get the status and a short message, nothing else
        let body = serde_json::json!({ "error": self.public_message() });

        (status, Json(body)).into_response()
    }
}
