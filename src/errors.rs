use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("no {0} selected")]
    MissingSelection(&'static str),

    #[error("no records for {0}")]
    EmptyExportSet(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("storage write failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<AttendanceError> for AppError {
    fn from(err: AttendanceError) -> Self {
        match err {
            AttendanceError::MissingSelection(_) | AttendanceError::InvalidInput(_) => {
                Self::bad_request(err.to_string())
            }
            AttendanceError::EmptyExportSet(_) => Self::not_found(err.to_string()),
            AttendanceError::Storage(_) | AttendanceError::Encode(_) => Self::internal(err),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err: AppError = AttendanceError::MissingSelection("course").into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "no course selected");

        let err: AppError = AttendanceError::InvalidInput("Enter name and ID".into()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn empty_export_maps_to_not_found() {
        let err: AppError = AttendanceError::EmptyExportSet("2024-01-10".into()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "no records for 2024-01-10");
    }
}
