//! Standalone export document: the rendered page wrapped for the storefront
//! CMS, followed by the asset tags and the client script the components rely
//! on at page-view time.

use serde::{Deserialize, Serialize};

use crate::error::{PageError, PageResult};
use crate::markup::BODY_WRAPPER_ID;
use crate::settings::{ExportSettings, SearchSettings};

const CLIENT_SCRIPT: &str = include_str!("client_script.js");

const APP_ID_PLACEHOLDER: &str = "__SEARCH_APP_ID__";
const API_KEY_PLACEHOLDER: &str = "__SEARCH_API_KEY__";
const INDEX_PLACEHOLDER: &str = "__SEARCH_INDEX__";

const CMS_BASE: &str = "https://decathlon-egypt.github.io/Decathlon-Egypt/CMS%20Scripts%20&%20Styles";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Css,
    Js,
}

/// An external stylesheet or script included in every export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub url: String,
}

impl Asset {
    pub fn css(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: AssetKind::Css,
            url: url.into(),
        }
    }

    pub fn js(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: AssetKind::Js,
            url: url.into(),
        }
    }

    /// The `<link>` or `<script>` tag for this asset. Alpine.js is deferred
    /// so it starts after the data providers are registered.
    pub fn tag(&self) -> String {
        match self.kind {
            AssetKind::Css => format!(r#"<link rel="stylesheet" href="{}" />"#, self.url),
            AssetKind::Js => {
                let defer = if self.url.contains("alpinejs") { " defer" } else { "" };
                format!(r#"<script src="{}"{}></script>"#, self.url, defer)
            }
        }
    }
}

/// Ordered list of assets, unique by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    assets: Vec<Asset>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        let cms = |file: &str| format!("{}/{}", CMS_BASE, file);
        Self {
            assets: vec![
                Asset::js(
                    "algolia-search-js",
                    "https://cdn.jsdelivr.net/npm/algoliasearch@4.5.1/dist/algoliasearch-lite.umd.js",
                ),
                Asset::js("alpine-intersect-js", "https://unpkg.com/@alpinejs/intersect@3.8.1/dist/cdn.min.js"),
                Asset::js("alpine-js", "https://unpkg.com/alpinejs@3.8.1/dist/cdn.min.js"),
                Asset::js("swiper-js", "https://unpkg.com/swiper/swiper-bundle.min.js"),
                Asset::js("banner-carousel-js", cms("Banner%20carousel.js")),
                Asset::js("categories-swiper-js", cms("categories_swiper.js")),
                Asset::css("banner-carousel-css", cms("Banner%20carousel.css")),
                Asset::css("vtmn-button-css", "https://unpkg.com/@vtmn/css-button"),
                Asset::css("swiper-css", "https://unpkg.com/swiper/swiper-bundle.min.css"),
                Asset::css("four-blocks-css", cms("4%20blocks.css")),
                Asset::css("eight-icons-css", cms("8%20icons.css")),
                Asset::css("showroom-css", cms("ShowroomFinal.css")),
                Asset::css("page-stretch-css", cms("Page%20stretch.css")),
                Asset::css("dual-section-css", cms("dual%20section.css")),
                Asset::css("hero-banner-css", cms("hero%20banner.css")),
                Asset::css("info-grid-section-css", cms("info%20grid%20section.css")),
                Asset::css("faqs-section-css", cms("faqs%20section.css")),
                Asset::css("homepage-css", cms("homepage.css")),
                Asset::css("horizontal-wrapper-css", cms("horizontal_wrapper.css")),
                Asset::css("categories-swiper-css", cms("categories_swiper.css")),
            ],
        }
    }
}

impl AssetManifest {
    pub fn empty() -> Self {
        Self { assets: Vec::new() }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Append an asset; ids must stay unique.
    pub fn add(&mut self, asset: Asset) -> PageResult<()> {
        if self.get(&asset.id).is_some() {
            return Err(PageError::DuplicateAsset { id: asset.id });
        }
        self.assets.push(asset);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> PageResult<Asset> {
        let index = self
            .assets
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| PageError::AssetNotFound { id: id.to_string() })?;
        Ok(self.assets.remove(index))
    }

    /// One tag per line, in manifest order.
    pub fn tags(&self) -> String {
        self.assets.iter().map(Asset::tag).collect::<Vec<_>>().join("\n")
    }
}

/// Escape a value for a single-quoted JS string literal.
fn js_literal(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace("</", "<\\/")
}

/// The client script with the search credentials filled in.
pub fn client_script(search: &SearchSettings) -> String {
    CLIENT_SCRIPT
        .trim_end()
        .replace(APP_ID_PLACEHOLDER, &js_literal(&search.app_id))
        .replace(API_KEY_PLACEHOLDER, &js_literal(&search.api_search_key))
        .replace(INDEX_PLACEHOLDER, &js_literal(&search.index_name))
}

/// Build the document pasted into the storefront CMS:
///
/// ```text
/// <div id="ZA_body_fix">
/// {body}
/// </div>
///
/// {asset tags}
///
/// {client script}{inline style}{inline script}
/// ```
pub fn export_document(body_html: &str, settings: &ExportSettings) -> String {
    let inline_style = if settings.inline_css.trim().is_empty() {
        String::new()
    } else {
        format!("\n<style>\n{}\n</style>", settings.inline_css)
    };
    let inline_script = if settings.inline_js.trim().is_empty() {
        String::new()
    } else {
        format!("\n<script>\n{}\n</script>", settings.inline_js)
    };

    format!(
        "<div id=\"{}\">\n{}\n</div>\n\n{}\n\n{}{}{}",
        BODY_WRAPPER_ID,
        body_html,
        settings.assets.tags(),
        client_script(&settings.search),
        inline_style,
        inline_script,
    )
}
