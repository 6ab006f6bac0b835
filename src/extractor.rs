use crate::catalog::TemplateCatalog;
use crate::classifier::classify;
use crate::component::{ComponentConfig, ComponentKind};
use crate::segmenter::Segment;

/// Recover a config of `kind` from raw markup. Never fails: anything that
/// cannot be found stays blank, and `custom` carries no config.
pub fn extract(raw: &str, kind: ComponentKind, catalog: &TemplateCatalog) -> ComponentConfig {
    catalog.extract(raw, kind)
}

/// Classify a segment and extract its config in one step.
pub fn extract_segment(segment: &Segment, catalog: &TemplateCatalog) -> ComponentConfig {
    extract(&segment.raw, classify(&segment.raw), catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::HeroBannerConfig;

    #[test]
    fn partial_markup_fills_blanks() {
        let catalog = TemplateCatalog::standard();
        let config = extract(
            r#"<div class="hero-banner-wrapper"><h1 class="hero-banner-title">Only a title</h1></div>"#,
            ComponentKind::HeroBanner,
            &catalog,
        );
        assert_eq!(
            config,
            ComponentConfig::HeroBanner(HeroBannerConfig {
                title: "Only a title".to_string(),
                ..Default::default()
            })
        );
    }

    #[test]
    fn unknown_markup_is_custom() {
        let catalog = TemplateCatalog::standard();
        let segment = Segment {
            raw: "<article>hi</article>".to_string(),
            start: 0,
            sentinel_id: None,
        };
        assert_eq!(extract_segment(&segment, &catalog), ComponentConfig::Custom);
    }
}
