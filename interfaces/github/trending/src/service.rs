use async_trait::async_trait;
use serde::Serialize;

use crate::fetch::{FetchError, PageFetcher, PageResult};
use crate::transport::Transport;

pub const SERVICE_KEY: &str = "github";

/// How a host identifies a source and asks for its first page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMeta {
    pub key: &'static str,
    pub first_page_key: &'static str,
}

/// A paginated content source, as seen by a host aggregating several of them.
#[async_trait]
pub trait Service: Send + Sync {
    fn meta(&self) -> &ServiceMeta;

    async fn fetch_page(&self, page_id: &str) -> Result<PageResult, FetchError>;
}

pub struct GitHubService<T> {
    meta: ServiceMeta,
    fetcher: PageFetcher<T>,
}

impl<T: Transport> GitHubService<T> {
    pub fn new(fetcher: PageFetcher<T>) -> Self {
        Self {
            meta: ServiceMeta {
                key: SERVICE_KEY,
                first_page_key: "",
            },
            fetcher,
        }
    }
}

#[async_trait]
impl<T: Transport> Service for GitHubService<T> {
    fn meta(&self) -> &ServiceMeta {
        &self.meta
    }

    async fn fetch_page(&self, page_id: &str) -> Result<PageResult, FetchError> {
        self.fetcher.fetch_page(page_id).await
    }
}
