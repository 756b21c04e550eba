//! Shared constants and URL helpers.

pub mod constants;
pub mod url_utils;

pub use constants::{
    AFFILIATE_NETWORK_DOMAINS, AUTH_PATH_FRAGMENTS, BROWSER_ACCEPT, BROWSER_ACCEPT_LANGUAGE,
    BROWSER_USER_AGENT, CLICK_THROUGH_PHRASES, INTERSTITIAL_DOMAINS, SHORTENER_DOMAINS,
    STOREFRONT_DOMAINS,
};
pub use url_utils::{
    is_valid_url, matches_any_domain, remove_query_params, set_query_param,
    strip_query_and_fragment,
};
