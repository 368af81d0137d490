use std::sync::Arc;

use axum::{
	extract::Extension,
	routing::{get, post},
	serve, Router,
};
use interfaces_github_trending::{
	GitHubService, HttpTransport, PageFetcher, QueryBuilder, TransportError,
};
use projects_feeds::config::{Config, ConfigError};
use projects_feeds::endpoints::github::trending::{
	fetch_page::index::handler as github_trending_fetch_page_handler,
	meta::index::handler as github_trending_meta_handler,
};
use projects_feeds::SharedService;
use thiserror::Error;
use tracing::info;
use utils_trace::tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
	#[error("Config: {source}")]
	Config {
		#[source]
		source: ConfigError,
	},
	#[error("TracingInit: {source}")]
	TracingInit {
		#[source]
		source: utils_trace::TracingInitError,
	},
	#[error("HttpTransport: {source}")]
	HttpTransport {
		#[source]
		source: TransportError,
	},
	#[error("TcpListenerBind: {source}")]
	TcpListenerBind {
		#[source]
		source: std::io::Error,
	},
	#[error("Serve: {source}")]
	Serve {
		#[source]
		source: std::io::Error,
	},
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
	let config = Config::from_env().map_err(|source| MainError::Config { source })?;

	tracing_init(&config.log_level, config.log_format)
		.map_err(|source| MainError::TracingInit { source })?;

	let transport = HttpTransport::new(&config.trending, config.github_token.clone())
		.map_err(|source| MainError::HttpTransport { source })?;
	let fetcher = PageFetcher::new(transport, QueryBuilder::from_config(&config.trending));
	let github: SharedService = Arc::new(GitHubService::new(fetcher));

	let app = Router::new()
		.route("/github/trending/fetch_page", post(github_trending_fetch_page_handler))
		.route("/github/trending/meta", get(github_trending_meta_handler))
		.layer(Extension(github));

	let listener = tokio::net::TcpListener::bind(config.bind_addr)
		.await
		.map_err(|source| MainError::TcpListenerBind { source })?;

	info!(
		addr = %config.bind_addr,
		endpoint = %config.trending.endpoint,
		authenticated = config.github_token.is_some(),
		"Server running"
	);

	serve(listener, app)
		.await
		.map_err(|source| MainError::Serve { source })?;

	Ok(())
}
