//! Mercado Livre provider: destination resolution before tagging.
//!
//! Mercado Livre short links (`mercadolivre.com/sec/...`) do not reliably
//! redirect; the landing page often renders an app-install interstitial
//! instead. The provider resolves the real product URL itself, by
//! following redirects and, when needed, scanning the page for the product
//! link, before stripping tracking and appending the operator's
//! `pdp_source` parameter.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use super::AffiliateProvider;
use crate::utils::{set_query_param, BROWSER_ACCEPT, BROWSER_ACCEPT_LANGUAGE, BROWSER_USER_AGENT};

const RESOLVE_TIMEOUT: Duration = Duration::from_secs(15);

/// Paths that are never product pages: social showcases, stores, offer
/// listings. Declined so the pipeline keeps an untagged, cleaned link.
const NON_PRODUCT_SEGMENTS: &[&str] = &["/social/", "/stores/", "/ofertas/"];

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("BUG: hardcoded CSS selector 'a[href]' is invalid")
});

/// Canonical product URL as it appears verbatim in page markup.
static PRODUCT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https://www\.mercadolivre\.com\.br/[^"'\s]+/p/MLB\d+"#)
        .expect("BUG: hardcoded product URL regex is invalid")
});

/// Canonical product path shapes: `/p/MLB123...` catalog pages and
/// `/MLB-123...` listing pages.
static PRODUCT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/p/MLB\d+|/MLB-\d+").expect("BUG: hardcoded product path regex is invalid")
});

/// Rewrites Mercado Livre product URLs to carry the operator's source id.
pub struct MercadoLivreProvider {
    source_id: Option<String>,
    client: Client,
}

impl MercadoLivreProvider {
    #[must_use]
    pub fn new(source_id: Option<String>, client: Client) -> Self {
        Self {
            source_id: source_id.filter(|v| !v.is_empty()),
            client,
        }
    }

    /// Resolve the real product destination, total over failures: the input
    /// comes back unchanged when resolution goes nowhere.
    async fn resolve_destination(&self, url: &str) -> String {
        let response = match self
            .client
            .get(url)
            .timeout(RESOLVE_TIMEOUT)
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept", BROWSER_ACCEPT)
            .header("Accept-Language", BROWSER_ACCEPT_LANGUAGE)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("failed to resolve mercadolivre link {url}: {e}");
                return url.to_string();
            }
        };

        let resolved = response.url().to_string();
        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("text/html"));
        if !is_html {
            return resolved;
        }

        let body = response.text().await.unwrap_or_default();
        if body.is_empty() {
            return resolved;
        }

        extract_product_url(&body).unwrap_or(resolved)
    }
}

#[async_trait]
impl AffiliateProvider for MercadoLivreProvider {
    fn name(&self) -> &'static str {
        "mercadolivre"
    }

    fn can_handle(&self, url: &str) -> bool {
        let lower = url.to_ascii_lowercase();
        lower.contains("mercadolivre.com.br") || lower.contains("mercadolibre.")
    }

    async fn rewrite(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        if NON_PRODUCT_SEGMENTS
            .iter()
            .any(|segment| parsed.path().contains(segment))
        {
            log::debug!("skipping mercadolivre non-product link: {url}");
            return None;
        }

        // Already-canonical product URLs skip the network round trip.
        let resolved = if PRODUCT_PATH.is_match(parsed.path()) {
            url.to_string()
        } else {
            self.resolve_destination(url).await
        };

        let mut destination = Url::parse(&resolved).ok()?;
        destination.set_query(None);
        destination.set_fragment(None);
        if let Some(id) = self.source_id.as_deref() {
            set_query_param(&mut destination, "pdp_source", id);
        }

        Some(destination.to_string())
    }
}

/// Scan a landing page for the product URL: the "go to product" anchor
/// first, then a verbatim canonical URL anywhere in the markup, then the
/// last product anchor on the page.
fn extract_product_url(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for element in document.select(&ANCHOR_SELECTOR) {
        let text = element.text().collect::<String>().to_lowercase();
        if text.contains("ir para produto")
            && let Some(href) = element.value().attr("href")
            && is_mercadolivre_url(href)
        {
            return Some(href.to_string());
        }
    }

    if let Some(found) = PRODUCT_URL.find(html) {
        return Some(found.as_str().to_string());
    }

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| href.contains("/p/MLB") && is_mercadolivre_url(href))
        .last()
        .map(str::to_string)
}

fn is_mercadolivre_url(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .is_some_and(|host| host.contains("mercadolivre.com.br"))
}
