//! Test utilities and helper functions for the afflink test suite

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initializes env_logger once for the whole test binary
#[allow(dead_code)]
pub fn init_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a minimal HTML page with the given body content
#[allow(dead_code)]
pub fn create_test_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// Creates an interstitial page whose meta refresh points at `target`
#[allow(dead_code)]
pub fn create_meta_refresh_html(target: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta http-equiv="refresh" content="0; url={target}">
    <title>Redirecionando...</title>
</head>
<body>
    <p>Aguarde, redirecionando para a oferta...</p>
</body>
</html>"#
    )
}

/// Creates an interstitial page with a click-through button to `target`
#[allow(dead_code)]
pub fn create_click_through_html(target: &str) -> String {
    create_test_html(
        "Oferta",
        &format!(r#"<a class="btn" href="{target}">Clique aqui para ir à oferta</a>"#),
    )
}
