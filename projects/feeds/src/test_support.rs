use std::sync::Arc;

use async_trait::async_trait;
use interfaces_github_trending::{FetchError, PageResult, Service, ServiceMeta};

use crate::SharedService;

type Respond = Box<dyn Fn(&str) -> Result<PageResult, FetchError> + Send + Sync>;

/// A [`Service`] answering every page request through `respond`.
pub(crate) struct StubService {
    meta: ServiceMeta,
    respond: Respond,
}

pub(crate) fn stub_service(
    respond: impl Fn(&str) -> Result<PageResult, FetchError> + Send + Sync + 'static,
) -> SharedService {
    Arc::new(StubService {
        meta: ServiceMeta {
            key: "github",
            first_page_key: "",
        },
        respond: Box::new(respond),
    })
}

#[async_trait]
impl Service for StubService {
    fn meta(&self) -> &ServiceMeta {
        &self.meta
    }

    async fn fetch_page(&self, page_id: &str) -> Result<PageResult, FetchError> {
        (self.respond)(page_id)
    }
}
