use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::decode::Repository;

pub const STAR_LABEL: &str = "★";

/// A labelled number shown next to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub label: String,
    pub value: u64,
}

/// A feed entry in the shape every source hands to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchUpItem {
    pub id: i64,
    pub title: String,
    pub score: Score,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub tag: String,
    pub source: String,
    pub click_url: String,
    pub hide_comments: bool,
}

/// Derives a stable numeric id from GitHub's opaque node id: the first eight
/// bytes of its SHA-256 digest, big-endian.
pub fn stable_id(node_id: &str) -> i64 {
    let digest = Sha256::digest(node_id.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(bytes)
}

pub fn to_item(repo: Repository) -> CatchUpItem {
    CatchUpItem {
        id: stable_id(&repo.id),
        title: format!("{} - {}", repo.name, repo.description),
        score: Score {
            label: STAR_LABEL.to_owned(),
            value: repo.stargazers,
        },
        timestamp: repo.created_at,
        author: repo.owner,
        tag: repo.language,
        source: repo.license,
        click_url: repo.url,
        // Repositories have no comment thread to show.
        hide_comments: true,
    }
}

impl From<Repository> for CatchUpItem {
    fn from(repo: Repository) -> Self {
        to_item(repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn repository() -> Repository {
        Repository {
            id: "MDEwOlJlcG9zaXRvcnkx".to_owned(),
            url: "https://github.com/alice/foo".to_owned(),
            name: "foo".to_owned(),
            created_at: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            description: "Does foo things".to_owned(),
            language: "Go".to_owned(),
            license: "MIT".to_owned(),
            owner: "alice".to_owned(),
            stargazers: 120,
        }
    }

    #[test]
    fn maps_every_field() {
        let repo = repository();
        let item = to_item(repo.clone());

        assert_eq!(item.id, stable_id(&repo.id));
        assert_eq!(item.title, "foo - Does foo things");
        assert_eq!(
            item.score,
            Score {
                label: "★".to_owned(),
                value: 120
            }
        );
        assert_eq!(item.timestamp, repo.created_at);
        assert_eq!(item.author, "alice");
        assert_eq!(item.tag, "Go");
        assert_eq!(item.source, "MIT");
        assert_eq!(item.click_url, "https://github.com/alice/foo");
        assert!(item.hide_comments);
    }

    #[test]
    fn stable_id_is_deterministic_and_distinguishes_ids() {
        assert_eq!(stable_id("abc"), stable_id("abc"));
        assert_ne!(stable_id("abc"), stable_id("abd"));
        // SHA-256("abc") starts with ba7816bf8f01cfea.
        assert_eq!(stable_id("abc"), i64::from_be_bytes([0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea]));
    }

    #[test]
    fn serializes_in_camel_case() {
        let json = serde_json::to_value(to_item(repository())).unwrap();
        assert_eq!(json["clickUrl"], "https://github.com/alice/foo");
        assert_eq!(json["hideComments"], true);
        assert_eq!(json["score"]["label"], "★");
        assert_eq!(json["timestamp"], "2021-01-01T00:00:00Z");
    }
}
