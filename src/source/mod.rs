pub mod executor;
pub mod http;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

pub use executor::{FetchCompletion, FetchExecutor};
pub use http::HttpMatchSource;

/// A suggestion record. Only `name` is read; other fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default, deserialize_with = "name_or_empty")]
    pub name: String,
}

impl Match {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

fn name_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(name)) => name,
        _ => String::new(),
    })
}

/// Parses a JSON array body. Elements that are not objects become
/// matches with an empty label.
pub fn parse_matches(body: &str) -> Result<Vec<Match>> {
    let items: Vec<serde_json::Value> = serde_json::from_str(body)?;
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

/// `url` followed by the percent-encoded query.
pub fn query_url(url: &str, query: &str) -> String {
    format!("{url}{}", urlencoding::encode(query))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub query: String,
}

pub trait MatchSource: Send + Sync {
    fn fetch(&self, query: &str) -> Result<Vec<Match>>;
}

/// Answers from a fixed list: case-insensitive prefix matches in list order.
#[derive(Debug, Clone, Default)]
pub struct StaticMatchSource {
    names: Vec<String>,
}

impl StaticMatchSource {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl MatchSource for StaticMatchSource {
    fn fetch(&self, query: &str) -> Result<Vec<Match>> {
        let needle = query.to_lowercase();
        Ok(self
            .names
            .iter()
            .filter(|name| name.to_lowercase().starts_with(&needle))
            .map(Match::new)
            .collect())
    }
}
