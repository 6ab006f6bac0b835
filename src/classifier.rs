use crate::component::ComponentKind;
use crate::markup::root_element;

/// Root class token that identifies each built-in template
const SIGNATURES: &[(&str, ComponentKind)] = &[
    ("mySwiper", ComponentKind::Swiper),
    ("swiper-single-slide", ComponentKind::Swiper),
    ("new-banner-section", ComponentKind::NewBanner),
    ("four_categories_wrapper", ComponentKind::FourCategories),
    ("icons-section", ComponentKind::EightIcons),
    ("showroom-component", ComponentKind::ProductsShowroom),
    ("showroom-tabbed", ComponentKind::ProductsShowroom),
    ("hero-banner-wrapper", ComponentKind::HeroBanner),
    ("dual-panel-section", ComponentKind::DualPanelSection),
    ("info-grid-section", ComponentKind::InfoGridSection),
    ("faqs-section-wrapper", ComponentKind::FaqsSection),
];

/// Type of a segment, judged only by the class list of its root element.
///
/// Anything without a known root class is `custom`.
pub fn classify(raw: &str) -> ComponentKind {
    let Some(root) = root_element(raw) else {
        return ComponentKind::Custom;
    };
    let classes = root.classes();

    SIGNATURES
        .iter()
        .find(|(token, _)| classes.iter().any(|c| c == token))
        .map(|&(_, kind)| kind)
        .unwrap_or(ComponentKind::Custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TemplateCatalog;

    #[test]
    fn every_template_classifies_as_itself() {
        let catalog = TemplateCatalog::standard();
        for template in catalog.templates() {
            let html = template.render(&template.default_config(), catalog.options());
            assert_eq!(classify(&html), template.kind, "{}", template.name);
        }
    }

    #[test]
    fn nested_signature_does_not_count() {
        let html = r#"<section class="promo"><div class="hero-banner-wrapper">x</div></section>"#;
        assert_eq!(classify(html), ComponentKind::Custom);
    }

    #[test]
    fn class_tokens_match_whole_words() {
        assert_eq!(classify(r#"<div class="hero-banner-wrapper-old">x</div>"#), ComponentKind::Custom);
        assert_eq!(
            classify(r#"<div class="wide hero-banner-wrapper">x</div>"#),
            ComponentKind::HeroBanner
        );
    }

    #[test]
    fn text_only_is_custom() {
        assert_eq!(classify("just text"), ComponentKind::Custom);
        assert_eq!(classify(""), ComponentKind::Custom);
    }
}
