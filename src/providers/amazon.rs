//! Amazon provider: pure parameter substitution.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use url::Url;

use super::AffiliateProvider;
use crate::utils::{remove_query_params, set_query_param};

/// Prior affiliate tags and tracking parameters stripped before tagging.
const TRACKING_PARAMS: &[&str] = &[
    "tag",
    "linkCode",
    "ref_",
    "pf_rd_r",
    "pf_rd_p",
    "pf_rd_m",
    "pf_rd_s",
    "pf_rd_t",
    "pf_rd_i",
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_content",
    "utm_term",
];

static ASIN_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)/dp/([A-Z0-9]{10})(?:\b|/)").expect("BUG: hardcoded ASIN regex is invalid"),
        Regex::new(r"(?i)/gp/product/([A-Z0-9]{10})(?:\b|/)")
            .expect("BUG: hardcoded ASIN regex is invalid"),
    ]
});

/// Rewrites Amazon product URLs to carry the operator's associate tag.
pub struct AmazonProvider {
    tag: Option<String>,
}

impl AmazonProvider {
    #[must_use]
    pub fn new(tag: Option<String>) -> Self {
        Self { tag }
    }
}

#[async_trait]
impl AffiliateProvider for AmazonProvider {
    fn name(&self) -> &'static str {
        "amazon"
    }

    fn can_handle(&self, url: &str) -> bool {
        let lower = url.to_ascii_lowercase();
        lower.contains("amazon.com.br") || lower.contains("amzn.")
    }

    async fn rewrite(&self, url: &str) -> Option<String> {
        let tag = self.tag.as_deref().filter(|t| !t.is_empty())?;
        let mut parsed = Url::parse(url).ok()?;

        // Canonicalize product pages to the short /dp/<ASIN> form.
        if let Some(asin) = extract_asin(parsed.path()) {
            parsed.set_path(&format!("/dp/{asin}/ref=nosim"));
        }

        parsed.set_fragment(None);
        remove_query_params(&mut parsed, TRACKING_PARAMS);
        set_query_param(&mut parsed, "tag", tag);

        Some(parsed.to_string())
    }
}

fn extract_asin(path: &str) -> Option<String> {
    ASIN_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(path))
        .map(|captures| captures[1].to_uppercase())
}
