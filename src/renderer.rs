//! Page rendering: every record's markup, id-tagged and wrapped in sentinel
//! comments so the segmenter can find exact boundaries again.

use crate::catalog::TemplateCatalog;
use crate::component::Component;
use crate::markup::inject_component_id;

pub const START_SENTINEL: &str = "COMPONENT_START";
pub const END_SENTINEL: &str = "COMPONENT_END";

pub fn start_marker(id: &str) -> String {
    format!("<!-- {} {} -->", START_SENTINEL, id)
}

pub fn end_marker(id: &str) -> String {
    format!("<!-- {} {} -->", END_SENTINEL, id)
}

/// Markup of a single record with its id on the root element.
///
/// Templated records render from their config; `custom` records emit their
/// stored markup verbatim.
pub fn component_markup(component: &Component, catalog: &TemplateCatalog) -> String {
    let html = catalog
        .render(&component.config)
        .unwrap_or_else(|| component.html.clone());
    inject_component_id(&html, &component.id)
}

/// `markup` between the start and end sentinels for `id`.
pub fn wrap(id: &str, markup: &str) -> String {
    format!("{}\n{}\n{}", start_marker(id), markup, end_marker(id))
}

/// Render records in list order, separated by a blank line.
pub fn render(components: &[Component], catalog: &TemplateCatalog) -> String {
    components
        .iter()
        .map(|component| wrap(&component.id, &component_markup(component, catalog)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentConfig, HeroBannerConfig};

    #[test]
    fn wraps_each_record_in_sentinels() {
        let catalog = TemplateCatalog::standard();
        let components = vec![
            Component::new(
                "hero-1",
                ComponentConfig::HeroBanner(HeroBannerConfig::default()),
                "",
            ),
            Component::new("custom-1", ComponentConfig::Custom, "<p>hello</p>"),
        ];

        let html = render(&components, &catalog);
        assert!(html.starts_with("<!-- COMPONENT_START hero-1 -->\n<!--Hero Banner Start-->"));
        assert!(html.contains(r#"<div class="hero-banner-wrapper" data-component-id="hero-1">"#));
        assert!(html.contains(
            "<!-- COMPONENT_END hero-1 -->\n\n<!-- COMPONENT_START custom-1 -->\n<p data-component-id=\"custom-1\">hello</p>\n<!-- COMPONENT_END custom-1 -->"
        ));
        assert!(html.ends_with("<!-- COMPONENT_END custom-1 -->"));
    }

    #[test]
    fn empty_page_renders_nothing() {
        assert_eq!(render(&[], &TemplateCatalog::standard()), "");
    }
}
