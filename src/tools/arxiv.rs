//! Arxiv search tool over the export API
//!
//! Queries `export.arxiv.org` and formats the top papers for the synthesis
//! prompt. The Atom payload is small and flat, so entries are pulled out
//! with string scanning rather than an XML parser dependency.

use crate::tools::SearchTool;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use std::time::Duration;

const ARXIV_API_BASE: &str = "https://export.arxiv.org/api/query";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Arxiv paper search tool.
pub struct ArxivSearch {
    client: reqwest::Client,
    api_base: String,
    max_results: usize,
}

/// One parsed Atom entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ArxivPaper {
    pub title: String,
    pub url: String,
    pub authors: Vec<String>,
    /// Publication date as `YYYY-MM-DD`.
    pub published: String,
    pub summary: String,
}

impl ArxivSearch {
    /// Creates the tool with a shared HTTP client.
    ///
    /// Fails only if the TLS backend cannot initialize.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(concat!("socratic-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: ARXIV_API_BASE.to_string(),
            max_results: 3,
        })
    }

    /// Replaces the default endpoint, e.g. for a mirror or a local stub.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn search_url(&self, query: &str) -> String {
        let encoded = urlencoding::encode(&format!("all:{}", query)).into_owned();
        format!(
            "{}?search_query={}&start=0&max_results={}&sortBy=relevance&sortOrder=descending",
            self.api_base, encoded, self.max_results
        )
    }

    async fn fetch_papers(&self, query: &str) -> std::result::Result<Vec<ArxivPaper>, String> {
        let url = self.search_url(query);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("unexpected status {}", status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read response body: {}", e))?;

        Ok(parse_feed(&body, self.max_results))
    }
}

#[async_trait]
impl SearchTool for ArxivSearch {
    fn name(&self) -> &str {
        "arxiv"
    }

    async fn search(&self, query: &str) -> String {
        match self.fetch_papers(query).await {
            Ok(papers) if papers.is_empty() => "No Arxiv papers found.".to_string(),
            Ok(papers) => format_papers(&papers),
            Err(e) => format!("Error performing Arxiv search: {}", e),
        }
    }
}

fn format_papers(papers: &[ArxivPaper]) -> String {
    let mut results = String::from("Arxiv Search Results:\n\n");
    for (i, paper) in papers.iter().enumerate() {
        results.push_str(&format!("{}. [{}]({})\n", i + 1, paper.title, paper.url));
        results.push_str(&format!("   Authors: {}\n", paper.authors.join(", ")));
        results.push_str(&format!("   Published: {}\n", paper.published));
        results.push_str(&format!("   Summary: {}\n\n", paper.summary));
    }
    results
}

fn parse_feed(xml: &str, limit: usize) -> Vec<ArxivPaper> {
    entry_blocks(xml)
        .into_iter()
        .take(limit)
        .filter_map(parse_entry)
        .collect()
}

fn entry_blocks(xml: &str) -> Vec<&str> {
    const CLOSE: &str = "</entry>";
    let mut blocks = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find("<entry") {
        let candidate = &rest[start..];
        match candidate.find(CLOSE) {
            Some(end) => {
                blocks.push(&candidate[..end + CLOSE.len()]);
                rest = &candidate[end + CLOSE.len()..];
            }
            None => break,
        }
    }

    blocks
}

fn parse_entry(entry: &str) -> Option<ArxivPaper> {
    let title = normalize_whitespace(&tag_text(entry, "title")?);
    let url = tag_text(entry, "id")?;
    let authors = author_names(entry);
    // Atom timestamps are RFC 3339; the date is the first ten bytes.
    let published = tag_text(entry, "published")
        .as_deref()
        .and_then(|ts| ts.get(..10))
        .unwrap_or("")
        .to_string();
    let summary = normalize_whitespace(&tag_text(entry, "summary").unwrap_or_default());

    Some(ArxivPaper {
        title,
        url,
        authors,
        published,
        summary,
    })
}

fn tag_text(entry: &str, tag: &str) -> Option<String> {
    let open = format!("<{}", tag);
    let start = entry.find(&open)?;
    let content_start = start + entry[start..].find('>')? + 1;
    let close = format!("</{}>", tag);
    let content_end = content_start + entry[content_start..].find(&close)?;
    Some(entry[content_start..content_end].trim().to_string())
}

fn author_names(entry: &str) -> Vec<String> {
    const CLOSE: &str = "</author>";
    let mut names = Vec::new();
    let mut rest = entry;

    while let Some(start) = rest.find("<author>") {
        let candidate = &rest[start..];
        match candidate.find(CLOSE) {
            Some(end) => {
                if let Some(name) = tag_text(&candidate[..end], "name") {
                    names.push(name);
                }
                rest = &candidate[end + CLOSE.len()..];
            }
            None => break,
        }
    }

    names
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:sparse autoencoders</title>
  <id>http://arxiv.org/api/example</id>
  <entry>
    <id>http://arxiv.org/abs/2309.08600v3</id>
    <updated>2023-10-04T17:59:10Z</updated>
    <published>2023-09-15T17:56:55Z</published>
    <title>Sparse Autoencoders Find Highly Interpretable
      Features in Language Models</title>
    <summary>  One of the roadblocks to a better understanding of neural networks is
the polysemanticity of neurons. We use sparse autoencoders to identify
more interpretable feature directions.
</summary>
    <author>
      <name>Hoagy Cunningham</name>
    </author>
    <author>
      <name>Aidan Ewart</name>
    </author>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <updated>2023-08-02T00:41:18Z</updated>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All You Need</title>
    <summary>The dominant sequence transduction models are based on complex
recurrent or convolutional neural networks.</summary>
    <author>
      <name>Ashish Vaswani</name>
    </author>
  </entry>
</feed>"#;

    const EMPTY_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:zzzz</title>
  <opensearch:totalResults>0</opensearch:totalResults>
</feed>"#;

    #[test]
    fn splits_feed_into_entry_blocks() {
        let blocks = entry_blocks(SAMPLE_FEED);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("Sparse Autoencoders"));
        assert!(blocks[1].contains("Attention Is All You Need"));
    }

    #[test]
    fn parses_entry_fields() {
        let papers = parse_feed(SAMPLE_FEED, 3);
        assert_eq!(papers.len(), 2);

        let first = &papers[0];
        assert_eq!(
            first.title,
            "Sparse Autoencoders Find Highly Interpretable Features in Language Models"
        );
        assert_eq!(first.url, "http://arxiv.org/abs/2309.08600v3");
        assert_eq!(first.authors, vec!["Hoagy Cunningham", "Aidan Ewart"]);
        assert_eq!(first.published, "2023-09-15");
        assert!(first.summary.starts_with("One of the roadblocks"));
        assert!(!first.summary.contains('\n'));
    }

    #[test]
    fn respects_result_limit() {
        let papers = parse_feed(SAMPLE_FEED, 1);
        assert_eq!(papers.len(), 1);
    }

    #[test]
    fn empty_feed_parses_to_no_papers() {
        assert!(parse_feed(EMPTY_FEED, 3).is_empty());
    }

    #[test]
    fn formats_papers_as_numbered_markdown() {
        let papers = parse_feed(SAMPLE_FEED, 3);
        let output = format_papers(&papers);

        assert!(output.starts_with("Arxiv Search Results:\n\n"));
        assert!(output.contains("1. [Sparse Autoencoders"));
        assert!(output.contains("](http://arxiv.org/abs/2309.08600v3)\n"));
        assert!(output.contains("   Authors: Hoagy Cunningham, Aidan Ewart\n"));
        assert!(output.contains("   Published: 2023-09-15\n"));
        assert!(output.contains("2. [Attention Is All You Need]"));
    }

    #[test]
    fn search_url_encodes_query() {
        let tool = ArxivSearch::new().unwrap();
        let url = tool.search_url("sparse autoencoders");

        assert!(url.starts_with("https://export.arxiv.org/api/query?search_query="));
        assert!(url.contains("all%3Asparse%20autoencoders"));
        assert!(url.contains("max_results=3"));
        assert!(url.contains("sortBy=relevance"));
        assert!(url.contains("sortOrder=descending"));
    }

    #[test]
    fn normalizes_internal_whitespace() {
        assert_eq!(
            normalize_whitespace("  a\n   multi line\n\ttitle "),
            "a multi line title"
        );
    }

    #[tokio::test]
    async fn search_renders_feed_from_server() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_FEED))
            .mount(&server)
            .await;

        let tool = ArxivSearch::new()
            .unwrap()
            .with_api_base(format!("{}/api/query", server.uri()));
        let output = tool.search("sparse autoencoders").await;

        assert!(output.starts_with("Arxiv Search Results:\n\n"));
        assert!(output.contains("Attention Is All You Need"));
    }

    #[tokio::test]
    async fn search_reports_no_papers_for_empty_feed() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_FEED))
            .mount(&server)
            .await;

        let tool = ArxivSearch::new()
            .unwrap()
            .with_api_base(format!("{}/api/query", server.uri()));
        let output = tool.search("zzzz").await;

        assert_eq!(output, "No Arxiv papers found.");
    }

    #[tokio::test]
    async fn search_reports_error_status_in_text() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let tool = ArxivSearch::new()
            .unwrap()
            .with_api_base(format!("{}/api/query", server.uri()));
        let output = tool.search("anything").await;

        assert!(output.starts_with("Error performing Arxiv search:"));
        assert!(output.contains("503"));
    }

    #[tokio::test]
    #[ignore = "requires network access to export.arxiv.org"]
    async fn live_search_returns_real_papers() {
        let tool = ArxivSearch::new().unwrap();
        let output = tool.search("attention is all you need").await;

        assert!(
            output.starts_with("Arxiv Search Results:"),
            "unexpected output: {}",
            output
        );
    }
}
