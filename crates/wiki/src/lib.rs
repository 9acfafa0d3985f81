//! Wikipedia knowledge source.
//!
//! Looks articles up through the MediaWiki Action API, which resolves
//! redirects and normalizes titles before returning the plain-text extract.

use deck_core::{Article, Error, KnowledgeSource, Result, WikiConfig};
use regex::Regex;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

/// Fixed query parameters; the title is appended per request.
const QUERY_PARAMS: [(&str, &str); 7] = [
    ("action", "query"),
    ("prop", "extracts"),
    ("explaintext", "1"),
    ("exsectionformat", "plain"),
    ("redirects", "1"),
    ("format", "json"),
    ("formatversion", "2"),
];

/// Section heading lines in the `wiki` section format, e.g. `== History ==`.
static HEADING_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^=+[ \t]*(.*?)[ \t]*=+[ \t]*$").unwrap());

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    extract: Option<String>,
}

/// Client for the Wikipedia Action API.
pub struct WikipediaClient {
    client: Client,
    api_url: String,
}

impl WikipediaClient {
    /// Build a client from the wiki settings.
    pub fn new(config: &WikiConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url(),
        })
    }

    /// The API URL requests are sent to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl KnowledgeSource for WikipediaClient {
    fn lookup(&self, title: &str) -> Result<Article> {
        log::debug!("GET {} titles={}", self.api_url, title);

        let body = self
            .client
            .get(&self.api_url)
            .query(&QUERY_PARAMS)
            .query(&[("titles", title)])
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| Error::FetchError(e.to_string()))?;

        parse_response(&body)
    }
}

/// Turn an Action API response body into an article.
///
/// Only the first page is considered. A page marked missing or invalid, or
/// with an empty extract, does not exist.
pub fn parse_response(body: &str) -> Result<Article> {
    let response: QueryResponse = serde_json::from_str(body)
        .map_err(|e| Error::SourceError(format!("Unexpected API response: {}", e)))?;

    let page = match response.query.and_then(|q| q.pages.into_iter().next()) {
        Some(page) => page,
        None => return Ok(Article::missing()),
    };

    if page.missing || page.invalid {
        log::debug!("Page '{}' does not exist", page.title);
        return Ok(Article::missing());
    }

    match page.extract {
        Some(extract) if !extract.trim().is_empty() => {
            Ok(Article::new(strip_heading_markers(&extract)))
        }
        _ => Ok(Article::missing()),
    }
}

/// Turn `== Heading ==` lines into plain `Heading` lines.
fn strip_heading_markers(extract: &str) -> String {
    HEADING_MARKER_REGEX.replace_all(extract, "$1").into_owned()
}
