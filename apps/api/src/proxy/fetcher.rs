//! Page fetcher: server-side retrieval of external pages for the composer.
//!
//! The browser cannot read cross-origin HTML, so pages are fetched here and
//! root-relative asset references are made absolute before being returned.

use std::time::Duration;

use anyhow::Result;
use regex::{Captures, Regex};
use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::errors::AppError;

/// Desktop browser UA; some sites refuse obvious bots.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const ROOT_RELATIVE_ATTR: &str = r#"\b(?P<attr>src|href)=(?P<quote>["'])(?P<path>/[^"']+)"#;

#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    root_relative: Regex,
}

impl PageFetcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .user_agent(BROWSER_USER_AGENT)
                .timeout(Duration::from_secs(30))
                .build()?,
            root_relative: Regex::new(ROOT_RELATIVE_ATTR)?,
        })
    }

    /// Fetches `raw_url` and returns its HTML with absolute asset URLs.
    pub async fn fetch(&self, raw_url: &str) -> Result<String, AppError> {
        let url = parse_page_url(raw_url)?;
        info!("Proxying page {url}");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let html = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        debug!("Fetched {} bytes from {url}", html.len());
        Ok(self.absolutize(&html, &url))
    }

    /// Rewrites `src="/…"` and `href="/…"` (either quote style) against `page_url`.
    pub fn absolutize(&self, html: &str, page_url: &Url) -> String {
        self.root_relative
            .replace_all(html, |caps: &Captures| {
                let path = &caps["path"];
                match page_url.join(path) {
                    Ok(absolute) => format!("{}={}{}", &caps["attr"], &caps["quote"], absolute),
                    Err(_) => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Only absolute http(s) URLs are proxied.
pub fn parse_page_url(raw_url: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw_url.trim())
        .map_err(|e| AppError::Validation(format!("Invalid url '{raw_url}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::Validation(format!(
            "Unsupported url scheme '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://www.example.com/products/ap-automation?ref=ad").unwrap()
    }

    #[test]
    fn test_root_relative_src_and_href_become_absolute() {
        let fetcher = PageFetcher::new().unwrap();
        let html = r#"<link rel="stylesheet" href="/css/site.css"><img src='/img/logo.png'>"#;

        let rewritten = fetcher.absolutize(html, &page());

        assert_eq!(
            rewritten,
            r#"<link rel="stylesheet" href="https://www.example.com/css/site.css"><img src='https://www.example.com/img/logo.png'>"#
        );
    }

    #[test]
    fn test_protocol_relative_urls_take_page_scheme() {
        let fetcher = PageFetcher::new().unwrap();
        let html = r#"<script src="//cdn.example.net/app.js"></script>"#;

        assert_eq!(
            fetcher.absolutize(html, &page()),
            r#"<script src="https://cdn.example.net/app.js"></script>"#
        );
    }

    #[test]
    fn test_absolute_and_relative_urls_are_untouched() {
        let fetcher = PageFetcher::new().unwrap();
        let html = r#"<a href="https://other.org/x">x</a><img src="img/a.png"><a href="/">home</a>"#;

        assert_eq!(fetcher.absolutize(html, &page()), html);
    }

    #[test]
    fn test_data_src_attributes_are_rewritten_too() {
        let fetcher = PageFetcher::new().unwrap();
        let html = r#"<div data-src="/lazy.png"></div>"#;

        assert_eq!(
            fetcher.absolutize(html, &page()),
            r#"<div data-src="https://www.example.com/lazy.png"></div>"#
        );
    }

    #[test]
    fn test_parse_page_url_rejects_other_schemes() {
        assert!(matches!(
            parse_page_url("file:///etc/passwd"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_page_url("not a url"),
            Err(AppError::Validation(_))
        ));
        assert!(parse_page_url(" https://example.com ").is_ok());
    }
}
