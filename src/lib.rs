//! # pagecraft-html
//!
//! Round-trip engine for a visual page builder: a page is an ordered list of
//! component records, each rendered from a built-in template (or kept as raw
//! markup), and any markup, whether rendered here or pasted from elsewhere,
//! can be split back into records with their configs recovered.
//!
//! ## Features
//! - Nine built-in templates (carousels, category tiles, icon grid, product
//!   showroom, hero banner, dual panel, info grid, FAQs)
//! - Sentinel-wrapped rendering with `data-component-id` on every root
//! - Segmentation of foreign markup by balanced top-level elements
//! - Campaign tracking (UTM) parameters on every outbound link
//! - Export document with storefront assets and client script
//!
//! ## Example
//! ```ignore
//! use pagecraft_html::{parse_page, ComponentKind, Page, TemplateCatalog};
//!
//! let catalog = TemplateCatalog::standard();
//! let mut page = Page::new();
//! page.add_component(ComponentKind::HeroBanner, &catalog)?;
//!
//! let html = page.render(&catalog);
//! let again = parse_page(&html, &catalog);
//! assert_eq!(again.components[0].config, page.components[0].config);
//! ```

pub mod catalog;
pub mod classifier;
pub mod component;
pub mod error;
pub mod export;
pub mod extractor;
pub mod markup;
pub mod page;
pub mod renderer;
pub mod segmenter;
pub mod settings;
pub mod utm;

// --- Core types ---
pub use catalog::{RenderOptions, Template, TemplateCatalog};
pub use component::{Component, ComponentConfig, ComponentKind};
pub use error::{PageError, PageResult};
pub use page::{Page, UtmWarning};
pub use segmenter::Segment;
pub use utm::UtmParams;

// --- Export ---
pub use export::{Asset, AssetKind, AssetManifest};
pub use settings::{ExportSettings, SearchSettings};

/// Render records to sentinel-wrapped markup
pub fn render_page(components: &[Component], catalog: &TemplateCatalog) -> String {
    renderer::render(components, catalog)
}

/// Parse any markup into records, in document order
pub fn parse_components(html: &str, catalog: &TemplateCatalog) -> Vec<Component> {
    page::parse_components(html, catalog)
}

/// Parse any markup into a new page
pub fn parse_page(html: &str, catalog: &TemplateCatalog) -> Page {
    Page {
        components: parse_components(html, catalog),
    }
}

/// Render `page` and wrap it in the full export document
pub fn export_page(page: &Page, settings: &ExportSettings) -> String {
    let catalog = TemplateCatalog::new(settings.render_options());
    export::export_document(&page.render(&catalog), settings)
}
