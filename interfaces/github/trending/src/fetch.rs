//! One page fetch: build the query, execute it, decode the body and map the
//! nodes to feed items. Any stage failing ends the fetch with a [`FetchError`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::decode::{decode, DecodeError, PageInfo};
use crate::item::{to_item, CatchUpItem};
use crate::query::QueryBuilder;
use crate::transport::{Transport, TransportError};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport: {source}")]
    Transport {
        #[from]
        source: TransportError,
    },

    #[error("Decode: {source}")]
    Decode {
        #[from]
        source: DecodeError,
    },
}

/// Source of the current time for the trending window.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// One page of items; `next_cursor` is `None` once there is nothing left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub items: Vec<CatchUpItem>,
    pub next_cursor: Option<String>,
}

pub struct PageFetcher<T> {
    transport: T,
    builder: QueryBuilder,
    clock: Box<dyn Clock>,
}

impl<T: Transport> PageFetcher<T> {
    pub fn new(transport: T, builder: QueryBuilder) -> Self {
        Self {
            transport,
            builder,
            clock: Box::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches the page after `cursor`; an empty cursor is the first page.
    pub async fn fetch_page(&self, cursor: &str) -> Result<PageResult, FetchError> {
        let payload = self.builder.build(cursor, self.clock.now());
        debug!(cursor, "executing trending query");

        let body = self.transport.execute(&payload).await?;
        let (page_info, repositories) = decode(&body)?;

        let items: Vec<CatchUpItem> = repositories.into_iter().map(to_item).collect();
        let next_cursor = next_cursor(page_info);
        debug!(items = items.len(), next_cursor = ?next_cursor, "trending page mapped");

        Ok(PageResult { items, next_cursor })
    }
}

fn next_cursor(page_info: PageInfo) -> Option<String> {
    if !page_info.has_next_page {
        return None;
    }
    page_info.end_cursor.filter(|cursor| !cursor.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryPayload, ARG_AFTER};
    use crate::transport::MockTransport;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 8, 0, 0, 0).unwrap()
    }

    fn body(has_next_page: bool, end_cursor: &str) -> String {
        json!({
            "data": { "search": {
                "repositoryCount": 1,
                "pageInfo": { "hasNextPage": has_next_page, "endCursor": end_cursor },
                "nodes": [{
                    "id": "abc",
                    "url": "https://github.com/alice/foo",
                    "name": "foo",
                    "createdAt": "2021-01-01T00:00:00Z",
                    "description": "Does foo things",
                    "languages": { "nodes": [{ "name": "Go" }] },
                    "licenseInfo": { "name": "MIT" },
                    "owner": { "name": "alice" },
                    "stargazers": { "totalCount": "120" }
                }]
            }}
        })
        .to_string()
    }

    fn fetcher(transport: MockTransport) -> PageFetcher<MockTransport> {
        PageFetcher::new(transport, QueryBuilder::default()).with_clock(fixed_now)
    }

    #[tokio::test]
    async fn maps_page_and_cursor() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_| Ok(body(true, "xyz")));

        let page = fetcher(transport).fetch_page("").await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].author, "alice");
        assert_eq!(page.items[0].score.value, 120);
        assert_eq!(page.next_cursor.as_deref(), Some("xyz"));
    }

    #[tokio::test]
    async fn last_page_has_no_cursor() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .returning(|_| Ok(body(false, "xyz")));

        let page = fetcher(transport).fetch_page("abc").await.unwrap();
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn cursor_is_sent_as_after() {
        let expected = QueryBuilder::default().build("Y3Vyc29y", fixed_now());
        assert!(QueryBuilder::default()
            .arguments("Y3Vyc29y", fixed_now())
            .contains(ARG_AFTER));

        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(move |payload| *payload == expected)
            .times(1)
            .returning(|_| Ok(body(true, "next")));

        fetcher(transport).fetch_page("Y3Vyc29y").await.unwrap();
    }

    #[tokio::test]
    async fn transport_failure_is_propagated() {
        let mut transport = MockTransport::new();
        transport.expect_execute().returning(|_| {
            Err(TransportError::Status {
                status: 502,
                body: "Bad gateway".to_owned(),
            })
        });

        let err = fetcher(transport).fetch_page("").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Transport {
                source: TransportError::Status { status: 502, .. }
            }
        ));
    }

    #[tokio::test]
    async fn decode_failure_is_propagated() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .returning(|_| Ok("<html>rate limited</html>".to_owned()));

        let err = fetcher(transport).fetch_page("").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Decode {
                source: DecodeError::Malformed { .. }
            }
        ));
    }

    #[test]
    fn blank_end_cursor_stops_paging() {
        let page_info = PageInfo {
            has_next_page: true,
            end_cursor: Some(" ".to_owned()),
        };
        assert_eq!(next_cursor(page_info), None);
    }

    /// Flags the request as released when the in-flight `execute` is dropped.
    struct ReleaseOnDrop(Arc<AtomicBool>);

    impl Drop for ReleaseOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    struct NeverAnswers {
        released: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Transport for NeverAnswers {
        async fn execute(&self, _payload: &QueryPayload) -> Result<String, TransportError> {
            let _request = ReleaseOnDrop(self.released.clone());
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn caller_timeout_abandons_the_request() {
        let released = Arc::new(AtomicBool::new(false));
        let transport = NeverAnswers {
            released: released.clone(),
        };
        let fetcher = PageFetcher::new(transport, QueryBuilder::default()).with_clock(fixed_now);

        let outcome = tokio::time::timeout(Duration::from_millis(50), fetcher.fetch_page("")).await;

        assert!(outcome.is_err());
        assert!(released.load(Ordering::SeqCst));
    }
}
