use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::archive::{ARCHIVE_FILE_NAME, ARCHIVE_MEDIA_TYPE};
use crate::error::Error;
use crate::server::app::AppState;

/// A listing id as sent by clients: `"39509415"`, `39509415`, or a URL
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListingId {
    Text(String),
    Number(serde_json::Number),
}

impl ListingId {
    pub fn into_string(self) -> String {
        match self {
            ListingId::Text(s) => s,
            ListingId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MakePdfsRequest {
    pub ids: Vec<ListingId>,
}

/// Service error rendered as a JSON body
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Navigation { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(error = %self.0, "make-pdfs request failed");

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Scrape the given listings and return one PDF per brand in a ZIP
pub async fn make_pdfs_handler(
    State(state): State<AppState>,
    Json(payload): Json<MakePdfsRequest>,
) -> Result<Response, ApiError> {
    let ids: Vec<String> = payload
        .ids
        .into_iter()
        .map(ListingId::into_string)
        .collect();

    let bytes = state.service.handle(&ids).await?;

    let headers = [
        (header::CONTENT_TYPE, ARCHIVE_MEDIA_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", ARCHIVE_FILE_NAME),
        ),
    ];
    Ok((headers, bytes).into_response())
}
