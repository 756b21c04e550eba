//! Shortened-URL expansion.
//!
//! [`UrlExpander::expand`] turns a shortened or wrapped URL into its real
//! destination. It is a total function: on any failure the input comes back
//! unchanged, and nothing here ever panics or returns an error to the
//! caller.

mod interstitial;

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use crate::error::RewriteResult;
use crate::utils::{
    matches_any_domain, AFFILIATE_NETWORK_DOMAINS, BROWSER_ACCEPT, BROWSER_ACCEPT_LANGUAGE,
    BROWSER_USER_AGENT, INTERSTITIAL_DOMAINS, STOREFRONT_DOMAINS,
};

/// Redirect budget for the primary expansion request.
const MAX_REDIRECTS: usize = 10;
/// Redirect budget for the secondary affiliate-network hop.
const NETWORK_HOP_REDIRECTS: usize = 5;
/// Timeout for the primary expansion request.
const EXPAND_TIMEOUT: Duration = Duration::from_secs(15);
/// Timeout for the secondary affiliate-network hop.
const NETWORK_HOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves shortened/tracking links to their real destination, with
/// affiliate-network and HTML-interstitial fallbacks.
pub struct UrlExpander {
    client: Client,
    hop_client: Client,
    network_domains: Vec<String>,
    interstitial_domains: Vec<String>,
    allowed_stores: Vec<String>,
}

impl Default for UrlExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlExpander {
    /// Expander with the built-in domain tables.
    #[must_use]
    pub fn new() -> Self {
        Self::with_domain_lists(
            AFFILIATE_NETWORK_DOMAINS.iter().map(|s| s.to_string()).collect(),
            INTERSTITIAL_DOMAINS.iter().map(|s| s.to_string()).collect(),
            STOREFRONT_DOMAINS.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Expander with custom domain tables. Used by contract tests that point
    /// the expander at fixture servers, and by deployments that add partner
    /// domains without a rebuild.
    #[must_use]
    pub fn with_domain_lists(
        network_domains: Vec<String>,
        interstitial_domains: Vec<String>,
        allowed_stores: Vec<String>,
    ) -> Self {
        Self {
            client: redirect_client(MAX_REDIRECTS),
            hop_client: redirect_client(NETWORK_HOP_REDIRECTS),
            network_domains,
            interstitial_domains,
            allowed_stores,
        }
    }

    /// Expand a shortened URL by following redirects.
    ///
    /// Total: on any failure the original input is returned unchanged.
    pub async fn expand(&self, short_url: &str) -> String {
        log::debug!("expanding URL: {short_url}");
        match self.try_expand(short_url).await {
            Ok(expanded) => {
                if expanded != short_url {
                    log::debug!("expanded {short_url} -> {expanded}");
                }
                expanded
            }
            Err(e) => {
                log::warn!("failed to expand {short_url}: {e}");
                short_url.to_string()
            }
        }
    }

    async fn try_expand(&self, short_url: &str) -> RewriteResult<String> {
        // All statuses are acceptable; the redirect chain is what matters.
        let response = self
            .client
            .get(short_url)
            .timeout(EXPAND_TIMEOUT)
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept", BROWSER_ACCEPT)
            .header("Accept-Language", BROWSER_ACCEPT_LANGUAGE)
            .send()
            .await?;

        let resolved = response.url().to_string();
        let status = response.status();
        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("text/html"));
        let body = if is_html {
            response.text().await.unwrap_or_default()
        } else {
            String::new()
        };
        log::debug!("initial response URL: {resolved}, status: {status}");

        // The chain may end on an affiliate-network wrapper that still hides
        // the merchant URL behind one more indirection.
        let mut final_url = resolved;
        if self.is_network_wrapper(&final_url)
            && let Some(destination) = self.follow_network_wrapper(&final_url).await
        {
            final_url = destination;
        }

        if final_url != short_url && !final_url.contains("/ap/signin") {
            return Ok(final_url);
        }

        // The redirect went nowhere: known interstitial shorteners render a
        // click-through page instead, so scrape it. Best effort only.
        if !body.is_empty() && matches_any_domain(short_url, &as_strs(&self.interstitial_domains)) {
            log::debug!("attempting HTML extraction for interstitial {short_url}");
            if let Some(candidate) = interstitial::extract_destination(&body, short_url)
                && interstitial::is_valid_product_link(&candidate, &self.allowed_stores)
            {
                return Ok(candidate);
            }
        }

        Ok(final_url)
    }

    fn is_network_wrapper(&self, url: &str) -> bool {
        matches_any_domain(url, &as_strs(&self.network_domains))
    }

    /// Resolve one more indirection behind an affiliate-network wrapper.
    ///
    /// Awin embeds the destination directly as a URL-encoded `ued` query
    /// parameter; other networks need one more bounded redirect-following
    /// request.
    async fn follow_network_wrapper(&self, wrapper_url: &str) -> Option<String> {
        if wrapper_url.contains("awin")
            && let Some(embedded) = embedded_destination(wrapper_url)
        {
            return Some(embedded);
        }

        let response = self
            .hop_client
            .get(wrapper_url)
            .timeout(NETWORK_HOP_TIMEOUT)
            .header("User-Agent", BROWSER_USER_AGENT)
            .send()
            .await
            .ok()?;

        let destination = response.url().to_string();
        (destination != wrapper_url).then_some(destination)
    }
}

/// Destination carried URL-encoded inside an Awin wrapper's `ued` parameter.
///
/// `Url::query_pairs` percent-decodes values, so the embedded URL comes out
/// ready to use without another network call.
fn embedded_destination(wrapper_url: &str) -> Option<String> {
    let parsed = Url::parse(wrapper_url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "ued")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn redirect_client(max_hops: usize) -> Client {
    Client::builder()
        .redirect(Policy::limited(max_hops))
        .build()
        .unwrap_or_default()
}

fn as_strs(domains: &[String]) -> Vec<&str> {
    domains.iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn awin_wrapper_carries_destination_in_ued() {
        let wrapper = "https://www.awin1.com/cread.php?awinmid=17729&awinaffid=123&ued=https%3A%2F%2Fwww.kabum.com.br%2Fproduto%2F99";
        assert_eq!(
            embedded_destination(wrapper).as_deref(),
            Some("https://www.kabum.com.br/produto/99")
        );
    }

    #[test]
    fn wrapper_without_ued_yields_nothing() {
        assert_eq!(
            embedded_destination("https://www.awin1.com/cread.php?awinmid=17729"),
            None
        );
        assert_eq!(embedded_destination("not a url"), None);
    }
}
