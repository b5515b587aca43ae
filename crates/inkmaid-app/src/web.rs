//! WebAssembly entry point and platform-specific code.

use inkmaid_core::Template;
use inkmaid_core::templates::by_name;
use wasm_bindgen::prelude::*;

/// URL parameters understood by the web build.
pub struct UrlParams {
    /// Template to start from (display name or slug, e.g. "pie-chart")
    pub template: Option<String>,
}

/// Parse URL query parameters.
/// Supports formats like `?template=gantt` and `#template=sequence`.
pub fn get_url_params() -> UrlParams {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return UrlParams { template: None },
    };
    let location = window.location();

    let mut template = None;

    // Try query string first (?template=gantt)
    if let Ok(search) = location.search() {
        template = parse_params(&search);
    }

    // Then the hash fragment (#template=gantt)
    if template.is_none() {
        if let Ok(hash) = location.hash() {
            template = parse_params(&hash);
        }
    }

    UrlParams { template }
}

/// Parse the template parameter from a query string or hash.
fn parse_params(s: &str) -> Option<String> {
    // Remove leading ? or #
    let s = s.trim_start_matches(['?', '#']);

    s.split('&').find_map(|pair| {
        let mut parts = pair.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some("template"), Some(value)) if !value.is_empty() => {
                Some(value.replace("%20", " ").replace('+', " "))
            }
            _ => None,
        }
    })
}

/// Template selected by the page URL, if it names a known one.
pub fn initial_template() -> Option<&'static Template> {
    let name = get_url_params().template?;
    let template = by_name(&name);
    if template.is_none() {
        log::warn!("Unknown template in URL: {}", name);
    }
    template
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(log::Level::Info).expect("Failed to initialize logger");

    log::info!("Starting Inkmaid (WASM)");

    // Run the app
    crate::App::run().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_params() {
        assert_eq!(parse_params("?template=gantt"), Some("gantt".to_string()));
        assert_eq!(parse_params("#foo=1&template=pie+chart"), Some("pie chart".to_string()));
        assert_eq!(parse_params("?template=Class%20Diagram"), Some("Class Diagram".to_string()));
        assert_eq!(parse_params("?template="), None);
        assert_eq!(parse_params(""), None);
    }
}
