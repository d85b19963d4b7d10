use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::error::{LookupError, LookupResponse};

#[derive(Debug, Clone, PartialEq)]
pub struct WikiSummary {
    pub title: String,
    pub description: Option<String>,
    pub extract: Option<String>,
    pub thumbnail: Option<String>,
}

/// Page summaries from the Wikipedia REST API.
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    http: Client,
    base_url: String,
}

impl WikipediaClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub async fn summary(&self, title: &str) -> LookupResponse<Option<WikiSummary>> {
        let url = summary_url(&self.base_url, title)?;
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupError::Upstream {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let page: SummaryPage = response.json().await?;
        Ok(Some(page.into()))
    }
}

/// OSM `wikipedia` tags look like `en:Mysore Palace`; the language prefix is
/// dropped when it is a short code.
pub fn title_from_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    let title = match tag.split_once(':') {
        Some((lang, rest)) if (2..=3).contains(&lang.len()) => rest,
        _ => tag,
    };
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn summary_url(base_url: &str, title: &str) -> LookupResponse<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|error| LookupError::malformed(format!("wikipedia base url: {error}")))?;
    url.path_segments_mut()
        .map_err(|_| LookupError::malformed("wikipedia base url cannot be a base"))?
        .pop_if_empty()
        .extend(["api", "rest_v1", "page", "summary"])
        .push(&title.replace(' ', "_"));
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct SummaryPage {
    title: String,
    description: Option<String>,
    extract: Option<String>,
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

impl From<SummaryPage> for WikiSummary {
    fn from(page: SummaryPage) -> Self {
        Self {
            title: page.title,
            description: page.description.filter(|value| !value.trim().is_empty()),
            extract: page.extract.filter(|value| !value.trim().is_empty()),
            thumbnail: page.thumbnail.map(|thumb| thumb.source),
        }
    }
}
