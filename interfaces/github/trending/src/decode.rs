//! Projects GitHub's search response onto typed views.
//!
//! The body is parsed into a `serde_json::Value` first and every field is
//! looked up explicitly, so a node that lacks something the feed needs is
//! reported by name instead of failing somewhere inside a derive.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Timestamp: {value}: {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed: {source}")]
    Malformed {
        #[from]
        source: serde_json::Error,
    },

    #[error("GraphQl: {messages}")]
    GraphQl { messages: String },

    #[error("MissingField: {field} (node: {node:?})")]
    MissingField {
        field: &'static str,
        node: Option<usize>,
    },

    #[error("Format: node {node}: {source}")]
    Format { node: usize, source: FormatError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// One search result node with every field the feed item needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub id: String,
    pub url: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub language: String,
    pub license: String,
    pub owner: String,
    pub stargazers: u64,
}

/// Decodes a raw response body into its page info and repositories.
///
/// Any node missing a required field fails the whole page.
pub fn decode(raw_body: &str) -> Result<(PageInfo, Vec<Repository>), DecodeError> {
    let root: Value = serde_json::from_str(raw_body)?;
    let search = search_result(&root)?;

    let page_info = search
        .get("pageInfo")
        .ok_or(DecodeError::MissingField {
            field: "pageInfo",
            node: None,
        })
        .and_then(PageInfo::from_value)?;

    let repositories = search
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or(DecodeError::MissingField {
            field: "nodes",
            node: None,
        })?
        .iter()
        .enumerate()
        .map(|(index, node)| Repository::from_node(node, index))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        repositories = repositories.len(),
        has_next_page = page_info.has_next_page,
        "decoded search page"
    );

    Ok((page_info, repositories))
}

fn search_result(root: &Value) -> Result<&Value, DecodeError> {
    let search = root
        .get("data")
        .filter(|data| !data.is_null())
        .ok_or(DecodeError::MissingField {
            field: "data",
            node: None,
        })
        .and_then(|data| {
            data.get("search")
                .filter(|search| !search.is_null())
                .ok_or(DecodeError::MissingField {
                    field: "data.search",
                    node: None,
                })
        });

    match search {
        Ok(search) => Ok(search),
        Err(missing) => Err(graphql_errors(root).unwrap_or(missing)),
    }
}

fn graphql_errors(root: &Value) -> Option<DecodeError> {
    let errors = root.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    let messages = errors
        .iter()
        .map(|error| {
            error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| error.to_string())
        })
        .collect::<Vec<_>>()
        .join("; ");
    Some(DecodeError::GraphQl { messages })
}

impl PageInfo {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let has_next_page = value
            .get("hasNextPage")
            .and_then(Value::as_bool)
            .ok_or(DecodeError::MissingField {
                field: "pageInfo.hasNextPage",
                node: None,
            })?;

        let end_cursor = match value.get("endCursor") {
            Some(Value::Null) => None,
            Some(Value::String(cursor)) => Some(cursor.clone()),
            _ => {
                return Err(DecodeError::MissingField {
                    field: "pageInfo.endCursor",
                    node: None,
                })
            }
        };

        Ok(Self {
            has_next_page,
            end_cursor,
        })
    }
}

impl Repository {
    fn from_node(node: &Value, index: usize) -> Result<Self, DecodeError> {
        let reader = NodeReader { node, index };

        let created_at = reader.string("createdAt")?;
        let created_at = DateTime::parse_from_rfc3339(created_at)
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .map_err(|source| DecodeError::Format {
                node: index,
                source: FormatError::Timestamp {
                    value: created_at.to_owned(),
                    source,
                },
            })?;

        Ok(Self {
            id: reader.string("id")?.to_owned(),
            url: reader.string("url")?.to_owned(),
            name: reader.string("name")?.to_owned(),
            created_at,
            description: reader.string("description")?.to_owned(),
            language: reader.first_language()?.to_owned(),
            license: reader.string("licenseInfo.name")?.to_owned(),
            owner: reader.string("owner.name")?.to_owned(),
            stargazers: reader.star_count()?,
        })
    }
}

struct NodeReader<'a> {
    node: &'a Value,
    index: usize,
}

impl<'a> NodeReader<'a> {
    fn missing(&self, field: &'static str) -> DecodeError {
        DecodeError::MissingField {
            field,
            node: Some(self.index),
        }
    }

    /// Follows a dotted path; the error names the first segment that is absent or null.
    fn lookup(&self, path: &'static str) -> Result<&'a Value, DecodeError> {
        let mut current = self.node;
        let mut end = 0;
        for segment in path.split('.') {
            end += segment.len();
            current = current
                .get(segment)
                .filter(|value| !value.is_null())
                .ok_or_else(|| self.missing(&path[..end]))?;
            end += 1;
        }
        Ok(current)
    }

    fn string(&self, path: &'static str) -> Result<&'a str, DecodeError> {
        self.lookup(path)?
            .as_str()
            .ok_or_else(|| self.missing(path))
    }

    fn first_language(&self) -> Result<&'a str, DecodeError> {
        self.lookup("languages.nodes")?
            .as_array()
            .ok_or_else(|| self.missing("languages.nodes"))?
            .first()
            .and_then(|language| language.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing("languages.nodes.name"))
    }

    fn star_count(&self) -> Result<u64, DecodeError> {
        let value = self.lookup("stargazers.totalCount")?;
        Ok(parse_star_count(value).unwrap_or_else(|| {
            warn!(node = self.index, value = %value, "unparsable star count, using 0");
            0
        }))
    }
}

fn parse_star_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
