//! Natura provider: pure parameter substitution.

use async_trait::async_trait;
use url::Url;

use super::AffiliateProvider;
use crate::utils::{remove_query_params, set_query_param};

const TRACKING_PARAMS: &[&str] = &[
    "consultoria",
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_content",
    "utm_term",
];

/// Rewrites Natura URLs to carry the operator's consultant id.
pub struct NaturaProvider {
    consultant_id: Option<String>,
}

impl NaturaProvider {
    #[must_use]
    pub fn new(consultant_id: Option<String>) -> Self {
        Self { consultant_id }
    }
}

#[async_trait]
impl AffiliateProvider for NaturaProvider {
    fn name(&self) -> &'static str {
        "natura"
    }

    fn can_handle(&self, url: &str) -> bool {
        url.to_ascii_lowercase().contains("natura.com.br")
    }

    async fn rewrite(&self, url: &str) -> Option<String> {
        let id = self.consultant_id.as_deref().filter(|v| !v.is_empty())?;
        let mut parsed = Url::parse(url).ok()?;

        remove_query_params(&mut parsed, TRACKING_PARAMS);
        set_query_param(&mut parsed, "consultoria", id);

        Some(parsed.to_string())
    }
}
