//! The ordered list of records making up one page, with the edit
//! operations the builder UI performs on it.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::catalog::TemplateCatalog;
use crate::classifier::classify;
use crate::component::{Component, ComponentConfig, ComponentKind};
use crate::error::{PageError, PageResult};
use crate::extractor::extract;
use crate::markup::strip_component_id;
use crate::renderer;
use crate::segmenter::segment;

/// Fresh record id: `{type}-{uuid}`
pub fn new_component_id(kind: ComponentKind) -> String {
    format!("{}-{}", kind, Uuid::new_v4())
}

/// Split, classify and extract `html` into records, in document order.
///
/// Sentinel ids are reused as record ids; raw blocks, and any sentinel id
/// seen earlier in the same markup, get fresh ones. Templated records store
/// their canonical rendering; `custom` records keep the segment markup.
pub fn parse_components(html: &str, catalog: &TemplateCatalog) -> Vec<Component> {
    let mut taken = HashSet::new();

    segment(html)
        .into_iter()
        .map(|seg| {
            let kind = classify(&seg.raw);
            let config = extract(&seg.raw, kind, catalog);
            let id = match seg.sentinel_id {
                Some(id) if !taken.contains(&id) => id,
                Some(id) => {
                    let fresh = new_component_id(kind);
                    debug!("sentinel id '{}' repeated in markup, using '{}'", id, fresh);
                    fresh
                }
                None => new_component_id(kind),
            };
            taken.insert(id.clone());
            let html = catalog
                .render(&config)
                .unwrap_or_else(|| strip_component_id(&seg.raw));
            Component::new(id, config, html)
        })
        .collect()
}

/// A linked item whose UTM source and campaign are not both set or both blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtmWarning {
    pub component_id: String,
    pub kind: ComponentKind,
    /// Position of the link among the record's tracked links
    pub item: usize,
}

impl fmt::Display for UtmWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' link #{}: UTM source and campaign name must both be set or both be blank",
            self.kind,
            self.component_id,
            self.item + 1
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    fn position(&self, id: &str) -> PageResult<usize> {
        self.components
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| PageError::ComponentNotFound { id: id.to_string() })
    }

    /// Append a record of `kind` with its default config. Returns the new id.
    pub fn add_component(&mut self, kind: ComponentKind, catalog: &TemplateCatalog) -> PageResult<String> {
        let template = catalog
            .get(kind)
            .ok_or_else(|| PageError::UnknownComponentType { tag: kind.to_string() })?;

        let config = template.default_config();
        let html = template.render(&config, catalog.options());
        let id = new_component_id(kind);
        self.components.push(Component::new(id.clone(), config, html));
        Ok(id)
    }

    /// Append every component found in `html`. Returns how many were added.
    ///
    /// A sentinel id already present on the page is replaced with a fresh one.
    pub fn import_html(&mut self, html: &str, catalog: &TemplateCatalog) -> usize {
        let mut taken: HashSet<String> = self.components.iter().map(|c| c.id.clone()).collect();
        let mut added = 0;

        for mut component in parse_components(html, catalog) {
            if taken.contains(&component.id) {
                let fresh = new_component_id(component.kind());
                debug!("id '{}' already on page, importing as '{}'", component.id, fresh);
                component.id = fresh;
            }
            taken.insert(component.id.clone());
            self.components.push(component);
            added += 1;
        }

        debug!("imported {} components", added);
        added
    }

    /// Replace a record's config and re-render its markup. The config must be
    /// of the record's current type.
    pub fn update_config(&mut self, id: &str, config: ComponentConfig, catalog: &TemplateCatalog) -> PageResult<()> {
        let index = self.position(id)?;
        let component = &mut self.components[index];

        if config.kind() != component.kind() {
            return Err(PageError::InvalidConfig {
                kind: component.kind().to_string(),
                reason: format!("got a {} config", config.kind()),
            });
        }

        if let Some(html) = catalog.render(&config) {
            component.html = html;
        }
        component.config = config;
        Ok(())
    }

    /// Replace a record from hand-edited markup. The first component found
    /// supplies the new type, config and markup; the id is kept.
    pub fn update_code(&mut self, id: &str, html: &str, catalog: &TemplateCatalog) -> PageResult<()> {
        let index = self.position(id)?;

        let Some(parsed) = parse_components(html, catalog).into_iter().next() else {
            warn!("code edit of '{}' contained no components; keeping previous markup", id);
            return Err(PageError::NoComponentsFound);
        };

        let component = &mut self.components[index];
        component.config = parsed.config;
        component.html = parsed.html;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> PageResult<Component> {
        let index = self.position(id)?;
        Ok(self.components.remove(index))
    }

    /// Move the record at `from` so it ends up at index `to`.
    pub fn move_component(&mut self, from: usize, to: usize) -> PageResult<()> {
        let len = self.components.len();
        for index in [from, to] {
            if index >= len {
                return Err(PageError::IndexOutOfRange { index, len });
            }
        }

        let component = self.components.remove(from);
        self.components.insert(to, component);
        Ok(())
    }

    /// Sentinel-wrapped markup of the whole page
    pub fn render(&self, catalog: &TemplateCatalog) -> String {
        renderer::render(&self.components, catalog)
    }

    /// Every tracked link whose UTM pair is half filled in.
    pub fn utm_warnings(&self) -> Vec<UtmWarning> {
        self.components
            .iter()
            .flat_map(|component| {
                component
                    .config
                    .utm_fields()
                    .into_iter()
                    .enumerate()
                    .filter(|(_, utm)| !utm.is_coupled())
                    .map(|(item, _)| UtmWarning {
                        component_id: component.id.clone(),
                        kind: component.kind(),
                        item,
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn from_yaml_str(yaml: &str) -> PageResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml_string(&self) -> PageResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> PageResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{HeroBannerConfig, Slide, SlidesConfig};
    use crate::utm::UtmParams;
    use pretty_assertions::assert_eq;

    fn catalog() -> TemplateCatalog {
        TemplateCatalog::standard()
    }

    #[test]
    fn ids_carry_the_type() {
        let id = new_component_id(ComponentKind::FaqsSection);
        assert!(id.starts_with("faqs-section-"));
        assert_ne!(id, new_component_id(ComponentKind::FaqsSection));
    }

    #[test]
    fn add_component_uses_defaults() {
        let mut page = Page::new();
        let id = page.add_component(ComponentKind::FaqsSection, &catalog()).unwrap();
        let record = page.get(&id).unwrap();
        assert_eq!(record.kind(), ComponentKind::FaqsSection);
        assert!(record.html.contains("Frequently Asked Questions"));
    }

    #[test]
    fn custom_cannot_be_added_from_the_catalog() {
        let mut page = Page::new();
        assert_eq!(
            page.add_component(ComponentKind::Custom, &catalog()),
            Err(PageError::UnknownComponentType { tag: "custom".to_string() })
        );
    }

    #[test]
    fn update_config_rerenders() {
        let catalog = catalog();
        let mut page = Page::new();
        let id = page.add_component(ComponentKind::HeroBanner, &catalog).unwrap();

        let config = ComponentConfig::HeroBanner(HeroBannerConfig {
            title: "Winter".to_string(),
            ..Default::default()
        });
        page.update_config(&id, config.clone(), &catalog).unwrap();
        let record = page.get(&id).unwrap();
        assert_eq!(record.config, config);
        assert!(record.html.contains(r#"<h1 class="hero-banner-title">Winter</h1>"#));
    }

    #[test]
    fn update_config_rejects_other_kinds() {
        let catalog = catalog();
        let mut page = Page::new();
        let id = page.add_component(ComponentKind::HeroBanner, &catalog).unwrap();
        let result = page.update_config(&id, ComponentConfig::Swiper(SlidesConfig::default()), &catalog);
        assert!(matches!(result, Err(PageError::InvalidConfig { .. })));
    }

    #[test]
    fn update_code_can_change_type() {
        let catalog = catalog();
        let mut page = Page::new();
        let id = page.add_component(ComponentKind::HeroBanner, &catalog).unwrap();

        page.update_code(&id, "<div class=\"promo\">Free shipping</div>", &catalog)
            .unwrap();
        let record = page.get(&id).unwrap();
        assert_eq!(record.kind(), ComponentKind::Custom);
        assert_eq!(record.html, "<div class=\"promo\">Free shipping</div>");
    }

    #[test]
    fn update_code_without_components_keeps_record() {
        let catalog = catalog();
        let mut page = Page::new();
        let id = page.add_component(ComponentKind::HeroBanner, &catalog).unwrap();
        let before = page.clone();

        assert_eq!(
            page.update_code(&id, "<!-- nothing -->", &catalog),
            Err(PageError::NoComponentsFound)
        );
        assert_eq!(page, before);
    }

    #[test]
    fn remove_and_move() {
        let catalog = catalog();
        let mut page = Page::new();
        let a = page.add_component(ComponentKind::HeroBanner, &catalog).unwrap();
        let b = page.add_component(ComponentKind::FaqsSection, &catalog).unwrap();
        let c = page.add_component(ComponentKind::InfoGridSection, &catalog).unwrap();

        page.move_component(0, 2).unwrap();
        let ids: Vec<&str> = page.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![b.as_str(), c.as_str(), a.as_str()]);

        assert_eq!(
            page.move_component(0, 3),
            Err(PageError::IndexOutOfRange { index: 3, len: 3 })
        );

        assert_eq!(page.remove(&c).unwrap().kind(), ComponentKind::InfoGridSection);
        assert_eq!(
            page.remove(&c),
            Err(PageError::ComponentNotFound { id: c.clone() })
        );
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn import_renames_colliding_ids() {
        let catalog = catalog();
        let mut page = Page::new();
        page.add_component(ComponentKind::HeroBanner, &catalog).unwrap();
        let rendered = page.render(&catalog);

        assert_eq!(page.import_html(&rendered, &catalog), 1);
        assert_eq!(page.len(), 2);
        assert_ne!(page.components[0].id, page.components[1].id);
        assert_eq!(page.components[0].config, page.components[1].config);
    }

    #[test]
    fn repeated_sentinel_ids_get_fresh_ones() {
        let block = "<!-- COMPONENT_START a -->\n<div class=\"note\">x</div>\n<!-- COMPONENT_END a -->";
        let html = format!("{}\n\n{}", block, block);

        let ids: Vec<String> = parse_components(&html, &catalog()).into_iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], "a");
        assert!(ids[1].starts_with("custom-"), "{}", ids[1]);
    }

    #[test]
    fn utm_warnings_point_at_half_filled_links() {
        let mut page = Page::new();
        page.components.push(Component::new(
            "s1",
            ComponentConfig::Swiper(SlidesConfig {
                slides: vec![
                    Slide {
                        utm: UtmParams::new("src", "camp"),
                        ..Default::default()
                    },
                    Slide {
                        utm: UtmParams {
                            utm_source: Some("src".to_string()),
                            campaign_name: None,
                        },
                        ..Default::default()
                    },
                ],
            }),
            "",
        ));

        let warnings = page.utm_warnings();
        assert_eq!(
            warnings,
            vec![UtmWarning {
                component_id: "s1".to_string(),
                kind: ComponentKind::Swiper,
                item: 1,
            }]
        );
        assert!(warnings[0].to_string().contains("link #2"));
    }

    #[test]
    fn yaml_round_trip() {
        let catalog = catalog();
        let mut page = Page::new();
        page.add_component(ComponentKind::ProductsShowroom, &catalog).unwrap();
        page.add_component(ComponentKind::EightIcons, &catalog).unwrap();

        let yaml = page.to_yaml_string().unwrap();
        assert_eq!(Page::from_yaml_str(&yaml).unwrap(), page);
        assert_eq!(Page::from_yaml_str("").unwrap(), Page::new());
    }
}
