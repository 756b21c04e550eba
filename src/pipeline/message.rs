//! Message-boundary helpers: pulling links out of free-form promo text and
//! deciding which are worth rewriting.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://\S+").expect("BUG: hardcoded URL regex is invalid")
});

/// Links that appear in promo messages but are never products: channel
/// self-promotion, offer-listing hubs, social showcases.
const IRRELEVANT_FRAGMENTS: &[&str] = &[
    "t.me/",
    "bit.ly/canal",
    "adrena.click/ofertas",
    "linkmc.click/ofertas",
    "mercadolivre.com.br/social/",
];

/// Extract every URL from a block of text, deduplicated, in order of first
/// appearance. Trailing punctuation that message authors glue onto links is
/// trimmed off.
#[must_use]
pub fn extract_links(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    URL_PATTERN
        .find_iter(text)
        .map(|found| found.as_str().trim_end_matches([')', ']', '.', ',', '!', '?']))
        .filter(|link| seen.insert(link.to_string()))
        .map(str::to_string)
        .collect()
}

/// Drop links that are not product links worth rewriting.
#[must_use]
pub fn filter_relevant_links(links: Vec<String>) -> Vec<String> {
    links
        .into_iter()
        .filter(|link| {
            let lower = link.to_ascii_lowercase();
            !IRRELEVANT_FRAGMENTS
                .iter()
                .any(|fragment| lower.contains(fragment))
        })
        .collect()
}

/// Fallback links for coupon-only messages that carry no product URL at
/// all: point readers at the Mercado Livre coupons hub, tagged with the
/// operator's source id when configured.
#[must_use]
pub fn coupon_fallback_links(source_id: Option<&str>) -> Vec<String> {
    let base = "https://www.mercadolivre.com.br/cupons";
    match source_id {
        Some(id) if !id.is_empty() => vec![format!("{base}?pdp_source={id}")],
        _ => vec![base.to_string()],
    }
}
