use axum::{
	extract::{Extension, Json},
	http::StatusCode,
	response::IntoResponse,
};
use interfaces_github_trending::{FetchError, PageResult};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::SharedService;

#[derive(Debug, Error)]
pub enum HandlerError {
	#[error("FetchPage: {source}")]
	FetchPage {
		#[from]
		source: FetchError,
	},
}

impl IntoResponse for HandlerError {
	fn into_response(self) -> axum::response::Response {
		let status = match &self {
			HandlerError::FetchPage { .. } => StatusCode::BAD_GATEWAY,
		};
		(status, self.to_string()).into_response()
	}
}

/// JSON payload expected by the endpoint; no cursor means the first page.
#[derive(Debug, Default, Deserialize)]
pub struct FetchPageRequestBody {
	#[serde(default)]
	cursor: String,
}

/// Axum handler: POST /github/trending/fetch_page
pub async fn handler(
	Extension(service): Extension<SharedService>,
	Json(input): Json<FetchPageRequestBody>,
) -> Result<Json<PageResult>, HandlerError> {
	let page = service.fetch_page(&input.cursor).await.map_err(|source| {
		error!(cursor = %input.cursor, error = %source, "trending page fetch failed");
		HandlerError::FetchPage { source }
	})?;

	info!(
		cursor = %input.cursor,
		items = page.items.len(),
		has_next = page.next_cursor.is_some(),
		"trending page served"
	);

	Ok(Json(page))
}
