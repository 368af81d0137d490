//! Builds the trending search query sent to GitHub.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::config::TrendingConfig;
use crate::graphql::{Document, Field, Fragment, ObjectType, PrinterConfig, Selection, SelectionSet, Value};

/// Trailing period a repository must have been created in to count as trending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingWindow {
    Day,
    #[default]
    Week,
    Month,
}

impl TrendingWindow {
    pub fn days(self) -> i64 {
        match self {
            TrendingWindow::Day => 1,
            TrendingWindow::Week => 7,
            TrendingWindow::Month => 30,
        }
    }

    pub fn created_since(self, now: DateTime<Utc>) -> NaiveDate {
        (now - Duration::days(self.days())).date_naive()
    }
}

/// Search filter, rendered as `created:>=YYYY-MM-DD stars:>=N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchQuery {
    created_since: NaiveDate,
    min_stars: u32,
}

impl SearchQuery {
    pub fn new(created_since: NaiveDate, min_stars: u32) -> Self {
        Self {
            created_since,
            min_stars,
        }
    }

    pub fn created_since(&self) -> NaiveDate {
        self.created_since
    }

    pub fn min_stars(&self) -> u32 {
        self.min_stars
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created:>={} stars:>={}",
            self.created_since.format("%Y-%m-%d"),
            self.min_stars
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageOrderField {
    Size,
}

impl LanguageOrderField {
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageOrderField::Size => "SIZE",
        }
    }
}

/// Ordering applied to a repository's languages; the first one is its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOrder {
    pub direction: OrderDirection,
    pub field: LanguageOrderField,
}

impl Default for LanguageOrder {
    fn default() -> Self {
        Self {
            direction: OrderDirection::Desc,
            field: LanguageOrderField::Size,
        }
    }
}

impl From<LanguageOrder> for Value {
    fn from(order: LanguageOrder) -> Self {
        Value::Object(vec![
            ("direction".to_owned(), Value::Enum(order.direction.as_str().to_owned())),
            ("field".to_owned(), Value::Enum(order.field.as_str().to_owned())),
        ])
    }
}

pub const ARG_FIRST: &str = "first";
pub const ARG_AFTER: &str = "after";
pub const ARG_ORDER: &str = "order";
pub const ARG_TYPE: &str = "type";
pub const ARG_QUERY: &str = "query";

/// Arguments of the search, in a fixed order: `first`, `after`, `order`,
/// `type`, `query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryArguments(Vec<(String, Value)>);

impl QueryArguments {
    pub fn new(
        search: &SearchQuery,
        order: LanguageOrder,
        first: Option<u32>,
        cursor: &str,
    ) -> Self {
        let mut arguments: Vec<(String, Value)> = Vec::with_capacity(5);
        if let Some(first) = first {
            arguments.push((ARG_FIRST.to_owned(), Value::Int(i64::from(first))));
        }
        if !cursor.trim().is_empty() {
            arguments.push((ARG_AFTER.to_owned(), Value::String(cursor.to_owned())));
        }
        arguments.push((ARG_ORDER.to_owned(), order.into()));
        arguments.push((ARG_TYPE.to_owned(), Value::Enum("REPOSITORY".to_owned())));
        arguments.push((ARG_QUERY.to_owned(), Value::String(search.to_string())));
        Self(arguments)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    // `order` belongs to `languages(orderBy:)`; GitHub's `search` field rejects it.
    fn search_arguments(&self) -> Vec<(String, Value)> {
        self.0
            .iter()
            .filter(|(key, _)| key != ARG_ORDER)
            .cloned()
            .collect()
    }
}

/// Transport-ready request body: `{"query": "<document>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryPayload {
    query: String,
}

impl QueryPayload {
    pub const CONTENT_TYPE: &'static str = "application/json";

    pub fn new(query: String) -> Self {
        Self { query }
    }

    pub fn document(&self) -> &str {
        &self.query
    }
}

const REPOSITORY_FRAGMENT: &str = "Repository";

/// Builds the trending search payload for a cursor.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    page_size: Option<u32>,
    min_stars: u32,
    window: TrendingWindow,
    order: LanguageOrder,
    printer: PrinterConfig,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::from_config(&TrendingConfig::default())
    }
}

impl QueryBuilder {
    pub fn from_config(config: &TrendingConfig) -> Self {
        Self {
            page_size: config.page_size,
            min_stars: config.min_stars,
            window: config.window,
            order: LanguageOrder::default(),
            printer: config.printer,
        }
    }

    pub fn page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn order(mut self, order: LanguageOrder) -> Self {
        self.order = order;
        self
    }

    pub fn printer(mut self, printer: PrinterConfig) -> Self {
        self.printer = printer;
        self
    }

    pub fn search_query(&self, now: DateTime<Utc>) -> SearchQuery {
        SearchQuery::new(self.window.created_since(now), self.min_stars)
    }

    pub fn arguments(&self, cursor: &str, now: DateTime<Utc>) -> QueryArguments {
        QueryArguments::new(&self.search_query(now), self.order, self.page_size, cursor)
    }

    pub fn build(&self, cursor: &str, now: DateTime<Utc>) -> QueryPayload {
        let document = trending_document(&self.arguments(cursor, now), self.order);
        QueryPayload::new(document.print(&self.printer))
    }
}

fn trending_document(arguments: &QueryArguments, order: LanguageOrder) -> Document {
    let search = Field::object(
        "search",
        ObjectType::new("SearchResultItemConnection"),
        vec![
            Field::scalar("repositoryCount"),
            Field::object(
                "pageInfo",
                ObjectType::new("PageInfo"),
                vec![Field::scalar("hasNextPage"), Field::scalar("endCursor")],
            )
            .into(),
            Field::object(
                "nodes",
                ObjectType::new("SearchResultItem"),
                vec![Selection::FragmentSpread(REPOSITORY_FRAGMENT.to_owned())],
            )
            .into(),
        ],
    )
    .with_arguments(arguments.search_arguments());

    Document::query(vec![search.into()]).with_fragment(repository_fragment(order))
}

fn repository_fragment(order: LanguageOrder) -> Fragment {
    let languages = Field::object(
        "languages",
        ObjectType::new("LanguageConnection"),
        vec![Field::object("nodes", ObjectType::node("Language"), vec![Field::scalar("name")]).into()],
    )
    .with_arguments(vec![
        ("first".to_owned(), Value::Int(1)),
        ("orderBy".to_owned(), order.into()),
    ]);

    Fragment {
        name: REPOSITORY_FRAGMENT.to_owned(),
        selection_set: SelectionSet {
            on: ObjectType::node("Repository"),
            selections: vec![
                Field::scalar("name"),
                Field::scalar("createdAt"),
                Field::scalar("description"),
                Field::scalar("url"),
                languages.into(),
                Field::object("licenseInfo", ObjectType::node("License"), vec![Field::scalar("name")]).into(),
                owner().into(),
                Field::object(
                    "stargazers",
                    ObjectType::new("StargazerConnection"),
                    vec![Field::scalar("totalCount")],
                )
                .into(),
            ],
        },
    }
}

// `RepositoryOwner` is an interface without `name`; only its implementors have it.
fn owner() -> Field {
    let name_on = |on: ObjectType| {
        Selection::InlineFragment(SelectionSet {
            on,
            selections: vec![Field::scalar("name")],
        })
    };
    Field::object(
        "owner",
        ObjectType::new("RepositoryOwner"),
        vec![name_on(ObjectType::node("User")), name_on(ObjectType::node("Organization"))],
    )
}
