//! Stylesheet and favicon compiled into the binary.

use std::{borrow::Cow, sync::OnceLock};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rust_embed::RustEmbed;
use tracing::error;

#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

const STYLESHEET: &str = "main.css";
const FAVICON: &str = "favicon.svg";

static STYLESHEET_TEXT: OnceLock<String> = OnceLock::new();
static FAVICON_URI: OnceLock<String> = OnceLock::new();

pub fn main_css() -> &'static str {
    STYLESHEET_TEXT.get_or_init(|| text_asset(STYLESHEET))
}

pub fn favicon_data_uri() -> &'static str {
    FAVICON_URI.get_or_init(|| svg_data_uri(FAVICON))
}

fn text_asset(name: &str) -> String {
    embedded(name)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn svg_data_uri(name: &str) -> String {
    let encoded = embedded(name)
        .map(|bytes| STANDARD.encode(bytes))
        .unwrap_or_default();
    format!("data:image/svg+xml;base64,{encoded}")
}

fn embedded(name: &str) -> Option<Cow<'static, [u8]>> {
    let file = EmbeddedAssets::get(name);
    if file.is_none() {
        error!(asset = name, "embedded asset missing");
    }
    file.map(|file| file.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_is_embedded() {
        assert!(main_css().contains(".app-header"));
        assert!(main_css().contains(".breakdown-total"));
    }

    #[test]
    fn favicon_round_trips_through_data_uri() {
        let uri = favicon_data_uri();
        let encoded = uri.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let svg = STANDARD.decode(encoded).unwrap();
        assert!(String::from_utf8(svg).unwrap().contains("<svg"));
    }

    #[test]
    fn missing_asset_degrades_to_empty() {
        assert_eq!(text_asset("missing.css"), "");
        assert_eq!(svg_data_uri("missing.svg"), "data:image/svg+xml;base64,");
    }
}
