//! GitHub trending repositories as a paginated feed source
//!
//! - `query`/`graphql`: builds the search document sent to GitHub's GraphQL API
//! - `decode`: defensive projection of the JSON response
//! - `item`: repository → feed item mapping
//! - `fetch`/`service`: one page per call, cursor in, cursor out
//! - `transport`: the HTTP seam, reqwest by default

pub mod config;
pub mod decode;
pub mod fetch;
pub mod graphql;
pub mod item;
pub mod query;
pub mod service;
pub mod transport;

pub use config::TrendingConfig;
pub use decode::{decode, DecodeError, FormatError, PageInfo, Repository};
pub use fetch::{Clock, FetchError, PageFetcher, PageResult};
pub use graphql::PrinterConfig;
pub use item::{stable_id, to_item, CatchUpItem, Score};
pub use query::{QueryArguments, QueryBuilder, QueryPayload, SearchQuery, TrendingWindow};
pub use service::{GitHubService, Service, ServiceMeta};
pub use transport::{HttpTransport, Transport, TransportError};
