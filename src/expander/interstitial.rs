//! Destination extraction from interstitial (click-through) pages.
//!
//! Some shorteners render an HTML page instead of answering with an HTTP
//! redirect. This is a best-effort scrape of that page, in priority order:
//! meta-refresh target, then the call-to-action anchor, then the first
//! absolute anchor pointing off-site. Candidates are validated against the
//! storefront allow-list by the caller.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::utils::{AUTH_PATH_FRAGMENTS, CLICK_THROUGH_PHRASES};

// Hardcoded selectors never fail to parse; a failure here is a bug, not a
// runtime condition.
static META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta[http-equiv]").expect("BUG: hardcoded CSS selector 'meta[http-equiv]' is invalid")
});

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("BUG: hardcoded CSS selector 'a[href]' is invalid")
});

static META_REFRESH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)url\s*=\s*(.+)").expect("BUG: hardcoded meta-refresh regex is invalid")
});

/// Scan an interstitial page for its real destination.
///
/// `origin` is the interstitial's own URL; anchors pointing back at it are
/// never a destination.
#[must_use]
pub(crate) fn extract_destination(html: &str, origin: &str) -> Option<String> {
    let document = Html::parse_document(html);

    // 1. <meta http-equiv="refresh" content="0; url=...">
    for element in document.select(&META_SELECTOR) {
        let is_refresh = element
            .value()
            .attr("http-equiv")
            .is_some_and(|v| v.eq_ignore_ascii_case("refresh"));
        if !is_refresh {
            continue;
        }
        if let Some(content) = element.value().attr("content")
            && let Some(captures) = META_REFRESH_URL.captures(content)
        {
            let target = captures[1].trim().trim_matches(['\'', '"']).to_string();
            if !target.is_empty() {
                return Some(target);
            }
        }
    }

    // 2. Anchor whose visible text is the click-through call to action.
    for element in document.select(&ANCHOR_SELECTOR) {
        let text = element.text().collect::<String>().to_lowercase();
        if CLICK_THROUGH_PHRASES.iter().any(|p| text.contains(p))
            && let Some(href) = element.value().attr("href")
        {
            return Some(href.to_string());
        }
    }

    // 3. First absolute anchor whose host is not the interstitial's own.
    let origin_host = Url::parse(origin)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string));
    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !href.starts_with("http") {
            continue;
        }
        match &origin_host {
            Some(host) if href.contains(host.as_str()) => continue,
            _ => return Some(href.to_string()),
        }
    }

    None
}

/// Validate an extracted candidate: must parse, must land on a known
/// storefront, must not be a login/auth page.
#[must_use]
pub(crate) fn is_valid_product_link(url: &str, allowed_stores: &[String]) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    if AUTH_PATH_FRAGMENTS.iter().any(|frag| url.contains(frag)) {
        return false;
    }

    let Some(host) = parsed.host_str() else {
        return false;
    };
    allowed_stores.iter().any(|store| host.contains(store.as_str()))
}
