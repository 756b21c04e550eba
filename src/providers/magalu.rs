//! Magalu provider: path rewriting for profile-scoped affiliate domains.
//!
//! Two link shapes exist:
//! - `magazinevoce.com.br/<handle>/...`: the affiliate identity is the
//!   first path segment; swap it for the operator's handle.
//! - `magalu.divulgador.link/...?url=<encoded>`: a wrapper carrying the
//!   real target URL-encoded in a redirect query parameter; the promoter
//!   identity lives inside that embedded URL.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use url::Url;

use super::AffiliateProvider;
use crate::config::MagaluConfig;
use crate::utils::set_query_param;

const KNOWN_DOMAINS: &[&str] = &["magazineluiza.com.br", "magalu.", "magazinevoce.com.br"];

/// Query keys a divulgador.link wrapper may use for its redirect target.
const REDIRECT_PARAMS: &[&str] = &["url", "u", "r", "redirect"];

static FIRST_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/([^/]+)(/.*)").expect("BUG: hardcoded path segment regex is invalid")
});

/// Rewrites Magalu links to the operator's promoter identity.
pub struct MagaluProvider {
    username: Option<String>,
    promoter_id: Option<String>,
}

impl MagaluProvider {
    #[must_use]
    pub fn new(config: Option<MagaluConfig>) -> Self {
        let config = config.unwrap_or_default();
        Self {
            username: config.username.filter(|v| !v.is_empty()),
            promoter_id: config.promoter_id.filter(|v| !v.is_empty()),
        }
    }

    /// `magazinevoce.com.br/<handle>/rest` → `/<username>/rest`.
    fn rewrite_profile_path(&self, mut parsed: Url) -> Option<String> {
        let username = self.username.as_deref()?;
        let rest = FIRST_SEGMENT
            .captures(parsed.path())
            .map(|captures| captures[2].to_string())?;
        parsed.set_path(&format!("/{username}{rest}"));
        Some(parsed.to_string())
    }

    /// Wrapper variant: rewrite the promoter identity inside the embedded,
    /// URL-encoded redirect target, then re-encode it into the wrapper.
    fn rewrite_wrapper(&self, mut parsed: Url) -> Option<String> {
        let (param, embedded) = parsed.query_pairs().find_map(|(key, value)| {
            REDIRECT_PARAMS
                .contains(&key.as_ref())
                .then(|| (key.into_owned(), value.into_owned()))
        })?;

        let mut target = Url::parse(&embedded).ok()?;
        let mut changed = false;

        if target
            .host_str()
            .is_some_and(|host| host.contains("magazinevoce.com.br"))
            && let Some(username) = self.username.as_deref()
            && let Some(rest) = FIRST_SEGMENT
                .captures(target.path())
                .map(|captures| captures[2].to_string())
        {
            target.set_path(&format!("/{username}{rest}"));
            changed = true;
        }

        if let Some(promoter_id) = self.promoter_id.as_deref()
            && target.query_pairs().any(|(key, _)| key == "parceiro_id")
        {
            set_query_param(&mut target, "parceiro_id", promoter_id);
            changed = true;
        }

        if !changed {
            return None;
        }

        set_query_param(&mut parsed, &param, target.as_str());
        Some(parsed.to_string())
    }
}

#[async_trait]
impl AffiliateProvider for MagaluProvider {
    fn name(&self) -> &'static str {
        "magalu"
    }

    fn can_handle(&self, url: &str) -> bool {
        let lower = url.to_ascii_lowercase();
        KNOWN_DOMAINS.iter().any(|domain| lower.contains(domain))
    }

    async fn rewrite(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();

        if host.contains("divulgador.link") {
            self.rewrite_wrapper(parsed)
        } else {
            self.rewrite_profile_path(parsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> MagaluProvider {
        MagaluProvider::new(Some(MagaluConfig {
            username: Some("magazineminha".to_string()),
            promoter_id: Some("777".to_string()),
        }))
    }

    #[tokio::test]
    async fn replaces_first_path_segment_with_handle() {
        let rewritten = provider()
            .rewrite("https://www.magazinevoce.com.br/magazineadrmc/console/p/sku123/")
            .await
            .expect("rewrite");
        assert_eq!(
            rewritten,
            "https://www.magazinevoce.com.br/magazineminha/console/p/sku123/"
        );
    }

    #[tokio::test]
    async fn root_path_has_no_segment_to_replace() {
        assert_eq!(
            provider()
                .rewrite("https://www.magazineluiza.com.br/")
                .await,
            None
        );
    }

    #[tokio::test]
    async fn wrapper_rewrites_embedded_handle_and_reencodes() {
        let wrapper = "https://magalu.divulgador.link/go?url=https%3A%2F%2Fwww.magazinevoce.com.br%2Fmagazineadrmc%2Fconsole%2Fp%2Fsku123%2F";
        let rewritten = provider().rewrite(wrapper).await.expect("rewrite");
        let parsed = Url::parse(&rewritten).expect("parse");
        let embedded = parsed
            .query_pairs()
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.into_owned())
            .expect("embedded target");
        assert_eq!(
            embedded,
            "https://www.magazinevoce.com.br/magazineminha/console/p/sku123/"
        );
    }

    #[tokio::test]
    async fn wrapper_rewrites_embedded_promoter_id() {
        let wrapper = "https://magalu.divulgador.link/go?url=https%3A%2F%2Fwww.magazineluiza.com.br%2Fp%2F123%3Fparceiro_id%3D42";
        let rewritten = provider().rewrite(wrapper).await.expect("rewrite");
        assert!(rewritten.contains("parceiro_id%3D777"));
    }

    #[tokio::test]
    async fn unconfigured_declines() {
        let provider = MagaluProvider::new(None);
        assert_eq!(
            provider
                .rewrite("https://www.magazinevoce.com.br/magazineadrmc/p/1/")
                .await,
            None
        );
    }
}
