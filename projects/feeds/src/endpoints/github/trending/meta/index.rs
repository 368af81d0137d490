use axum::extract::{Extension, Json};
use interfaces_github_trending::ServiceMeta;

use crate::SharedService;

/// Axum handler: GET /github/trending/meta
pub async fn handler(Extension(service): Extension<SharedService>) -> Json<ServiceMeta> {
	Json(service.meta().clone())
}
