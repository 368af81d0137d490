use std::time::Duration;

use crate::graphql::PrinterConfig;
use crate::query::TrendingWindow;

pub const GITHUB_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";
pub const DEFAULT_MIN_STARS: u32 = 50;
pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for the trending source. Hosts build this from their own
/// configuration; nothing here reads the environment.
#[derive(Debug, Clone)]
pub struct TrendingConfig {
    pub endpoint: String,
    /// Sent as `first`; GitHub rejects a `search` connection without it.
    pub page_size: Option<u32>,
    pub min_stars: u32,
    pub window: TrendingWindow,
    pub printer: PrinterConfig,
    pub timeout: Duration,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            endpoint: GITHUB_GRAPHQL_ENDPOINT.to_owned(),
            page_size: Some(DEFAULT_PAGE_SIZE),
            min_stars: DEFAULT_MIN_STARS,
            window: TrendingWindow::Week,
            printer: PrinterConfig::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
