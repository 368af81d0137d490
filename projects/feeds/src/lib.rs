//! HTTP host for the feed sources
//!
//! - Endpoints in `endpoints/`, one directory per route
//! - Settings from the environment, see `config`
//! - GITHUB_TOKEN is sent as a bearer token when set

use std::sync::Arc;

use interfaces_github_trending::Service;

pub mod config;

pub mod endpoints {
    pub mod github {
        pub mod trending {
            pub mod fetch_page {
                pub mod index;
            }
            pub mod meta {
                pub mod index;
            }
        }
    }
}

/// The source shared by every request handler.
pub type SharedService = Arc<dyn Service>;

#[cfg(test)]
pub(crate) mod test_support;
