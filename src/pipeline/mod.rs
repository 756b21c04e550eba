//! End-to-end rewrite pipeline.
//!
//! [`LinkRewriter`] is the composition root and the sole entry point for
//! callers: it owns the expander and the provider registry, built exactly
//! once, and drives the per-link transform for whole batches.

pub mod message;

use futures::future::join_all;
use reqwest::Client;

use crate::config::AffiliateConfig;
use crate::expander::UrlExpander;
use crate::providers::{
    AliExpressProvider, AmazonProvider, AwinProvider, MagaluProvider, MercadoLivreProvider,
    NaturaProvider, ProviderRegistry, ShopeeProvider,
};
use crate::utils::{is_valid_url, matches_any_domain, strip_query_and_fragment, SHORTENER_DOMAINS};

/// Rewrites batches of links to carry the operator's affiliate identity.
pub struct LinkRewriter {
    registry: ProviderRegistry,
    expander: UrlExpander,
    shortener_domains: Vec<String>,
}

impl LinkRewriter {
    /// Build the full pipeline: one shared HTTP client, all storefront
    /// providers registered in priority order, the Awin network provider
    /// last so storefront-specific handling wins on overlapping domains.
    #[must_use]
    pub fn new(config: AffiliateConfig) -> Self {
        let client = Client::new();

        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(AmazonProvider::new(config.amazon)));
        registry.register(Box::new(ShopeeProvider::new(config.shopee, client.clone())));
        registry.register(Box::new(MercadoLivreProvider::new(
            config.mercadolivre,
            client.clone(),
        )));
        registry.register(Box::new(MagaluProvider::new(config.magalu)));
        registry.register(Box::new(NaturaProvider::new(config.natura)));
        registry.register(Box::new(AliExpressProvider::new(
            config.aliexpress,
            client.clone(),
        )));
        registry.register(Box::new(AwinProvider::new(config.awin, client)));

        log::info!(
            "affiliate providers initialized: {}",
            registry.provider_names().join(", ")
        );

        Self::from_parts(
            registry,
            UrlExpander::new(),
            SHORTENER_DOMAINS.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Assemble a pipeline from explicit parts. Used by contract tests and
    /// by callers that need a custom registry or expander.
    #[must_use]
    pub fn from_parts(
        registry: ProviderRegistry,
        expander: UrlExpander,
        shortener_domains: Vec<String>,
    ) -> Self {
        Self {
            registry,
            expander,
            shortener_domains,
        }
    }

    /// Rewrite a batch of links.
    ///
    /// The output has exactly the same length and order as the input; each
    /// link is processed independently and concurrently; no failure of any
    /// kind escapes, and the worst outcome for a link is coming back
    /// unchanged.
    pub async fn rewrite_links(&self, links: &[String]) -> Vec<String> {
        join_all(links.iter().map(|link| self.rewrite_single(link))).await
    }

    async fn rewrite_single(&self, url: &str) -> String {
        // Non-http(s) inputs pass through untouched.
        if !is_valid_url(url) {
            return url.to_string();
        }

        let shorteners: Vec<&str> = self.shortener_domains.iter().map(String::as_str).collect();

        // 1. Classify and expand.
        let resolved = if matches_any_domain(url, &shorteners) {
            self.expander.expand(url).await
        } else {
            url.to_string()
        };

        // 2-3. Dispatch to the owning provider, if any.
        let Some(provider) = self.registry.find_provider(&resolved) else {
            log::debug!("no provider found for URL: {resolved}");
            return fallback_url(&resolved, url);
        };

        // 4-5. Rewrite, falling back to the expanded (cleaned) URL so the
        // expansion work is not discarded when tagging fails.
        match provider.rewrite(&resolved).await {
            Some(rewritten) => rewritten,
            None => {
                log::debug!(
                    "provider {} declined to rewrite {resolved}",
                    provider.name()
                );
                fallback_url(&resolved, url)
            }
        }
    }
}

/// Best URL when no rewrite happened: the resolved destination with query
/// string and fragment stripped, so neither the raw shortener link nor
/// stale tracking parameters are emitted. Only when the resolved URL cannot
/// even be parsed does the original input come back verbatim.
fn fallback_url(resolved: &str, original: &str) -> String {
    strip_query_and_fragment(resolved).unwrap_or_else(|| original.to_string())
}
