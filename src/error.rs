use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything the finger log core can fail with.
///
/// Zero affected rows is reported as `InsertRejected` / `NotFound` without
/// telling "never existed" apart from "already gone".
#[derive(Debug, Display)]
pub enum FingerLogError {
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "unrecognized timestamp format: {:?}", _0)]
    UnrecognizedTimestampFormat(String),

    #[display(fmt = "insert rejected for nik {}: 0 rows affected", nik)]
    InsertRejected { nik: String },

    #[display(fmt = "data not found or already deleted")]
    NotFound,

    #[display(fmt = "query failed: {}", _0)]
    Query(BoxError),
}

impl std::error::Error for FingerLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FingerLogError::Query(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for FingerLogError {
    fn from(e: sqlx::Error) -> Self {
        FingerLogError::Query(Box::new(e))
    }
}

impl FingerLogError {
    pub fn validation(message: impl Into<String>) -> Self {
        FingerLogError::Validation(message.into())
    }
}

impl ResponseError for FingerLogError {
    fn status_code(&self) -> StatusCode {
        match self {
            FingerLogError::Validation(_)
            | FingerLogError::UnrecognizedTimestampFormat(_)
            | FingerLogError::InsertRejected { .. } => StatusCode::BAD_REQUEST,
            FingerLogError::NotFound => StatusCode::NOT_FOUND,
            FingerLogError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            FingerLogError::Validation(message) => json!({ "message": message }),
            FingerLogError::UnrecognizedTimestampFormat(raw) => json!({
                "message": "Invalid time format. Use: YYYY-MM-DD HH:mm:ss",
                "error": raw,
            }),
            FingerLogError::InsertRejected { .. } => json!({
                "message": "Failed to add finger log",
                "error": self.to_string(),
            }),
            FingerLogError::NotFound => json!({
                "message": "Data not found. Make sure the date and time match exactly."
            }),
            // driver details stay in the logs
            FingerLogError::Query(_) => json!({ "message": "Internal Server Error" }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
