//! Awin network provider: remote link generation for advertisers reached
//! through the Awin network rather than a storefront program.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::AffiliateProvider;
use crate::config::AwinConfig;
use crate::error::{RewriteError, RewriteResult};
use crate::utils::remove_query_params;

/// Production base URL of the Awin publisher API.
pub const AWIN_API_URL: &str = "https://api.awin.com/publishers";

const API_TIMEOUT: Duration = Duration::from_secs(10);

/// Advertisers reachable through Awin, keyed by merchant domain.
const ADVERTISER_IDS: &[(&str, u32)] = &[
    ("kabum.com.br", 17729),
    ("adidas.com.br", 79926),
    ("nike.com.br", 17652),
];

/// Tracking params stripped from the destination before link generation.
const AWIN_PARAMS: &[&str] = &[
    "aw_affid",
    "awc",
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_content",
    "utm_term",
];

/// Mints tracked short links through the Awin link-builder API.
pub struct AwinProvider {
    config: Option<AwinConfig>,
    client: Client,
    api_base: String,
}

impl AwinProvider {
    #[must_use]
    pub fn new(config: Option<AwinConfig>, client: Client) -> Self {
        Self::with_api_base(config, client, AWIN_API_URL)
    }

    /// Constructor with an explicit API base, for contract tests against a
    /// mock server.
    #[must_use]
    pub fn with_api_base(
        config: Option<AwinConfig>,
        client: Client,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            config,
            client,
            api_base: api_base.into(),
        }
    }

    async fn generate_link(&self, config: &AwinConfig, url: &str) -> RewriteResult<String> {
        let mut destination = Url::parse(url)?;
        let advertiser_id = advertiser_for(&destination).ok_or_else(|| {
            RewriteError::PartnerContract(format!(
                "no Awin advertiser id for {}",
                destination.host_str().unwrap_or("<no host>")
            ))
        })?;

        remove_query_params(&mut destination, AWIN_PARAMS);

        log::debug!(
            "generating Awin link for {destination} (advertiser {advertiser_id})"
        );
        let endpoint = format!(
            "{}/{}/linkbuilder/generate",
            self.api_base, config.publisher_id
        );
        let response = self
            .client
            .post(&endpoint)
            .timeout(API_TIMEOUT)
            .bearer_auth(&config.token)
            .json(&json!({
                "advertiserId": advertiser_id,
                "destinationUrl": destination.as_str(),
                "shorten": true,
            }))
            .send()
            .await?;

        let body: LinkBuilderResponse = response.json().await?;
        body.url
            .ok_or_else(|| RewriteError::PartnerContract("no url in response".to_string()))
    }
}

#[async_trait]
impl AffiliateProvider for AwinProvider {
    fn name(&self) -> &'static str {
        "awin"
    }

    fn can_handle(&self, url: &str) -> bool {
        let lower = url.to_ascii_lowercase();
        ADVERTISER_IDS.iter().any(|(domain, _)| lower.contains(domain))
    }

    async fn rewrite(&self, url: &str) -> Option<String> {
        let config = self.config.as_ref().filter(|c| c.is_configured())?;

        match self.generate_link(config, url).await {
            Ok(link) => {
                log::debug!("Awin link generated: {link}");
                Some(link)
            }
            Err(e) => {
                log::warn!("failed to generate Awin link for {url}: {e}");
                None
            }
        }
    }
}

fn advertiser_for(destination: &Url) -> Option<u32> {
    let host = destination.host_str()?.trim_start_matches("www.");
    ADVERTISER_IDS
        .iter()
        .find(|(domain, _)| host.contains(domain))
        .map(|(_, id)| *id)
}

#[derive(Debug, Deserialize)]
struct LinkBuilderResponse {
    url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advertiser_lookup_ignores_www_prefix() {
        let url = Url::parse("https://www.kabum.com.br/produto/1").expect("parse");
        assert_eq!(advertiser_for(&url), Some(17729));

        let unknown = Url::parse("https://example.com/x").expect("parse");
        assert_eq!(advertiser_for(&unknown), None);
    }

    #[tokio::test]
    async fn unconfigured_provider_declines_without_network() {
        let provider = AwinProvider::new(
            Some(AwinConfig {
                publisher_id: "123".to_string(),
                token: String::new(),
            }),
            Client::new(),
        );
        assert_eq!(
            provider.rewrite("https://www.kabum.com.br/produto/1").await,
            None
        );
    }
}
