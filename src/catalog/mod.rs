//! Template catalog: one render/extract pair per built-in component type.
//!
//! Each template module owns both directions of its markup so the extractor
//! always reads back exactly what the renderer writes.

mod dual_panel;
mod eight_icons;
mod faqs;
mod four_categories;
mod hero_banner;
mod info_grid;
mod new_banner;
mod showroom;
mod swiper;

use crate::component::{ComponentConfig, ComponentKind};

/// Default price currency label in showroom product cards
pub const DEFAULT_CURRENCY: &str = "EGP";

/// Page-wide values templates interpolate into their markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub currency: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// A built-in component template
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub kind: ComponentKind,
    /// Display name for the "add component" picker
    pub name: &'static str,
    default_config: fn() -> ComponentConfig,
    render: fn(&ComponentConfig, &RenderOptions) -> String,
    extract: fn(&str) -> ComponentConfig,
}

impl Template {
    pub fn default_config(&self) -> ComponentConfig {
        (self.default_config)()
    }

    /// Render `config` to markup. A config of another kind renders this
    /// template's default.
    pub fn render(&self, config: &ComponentConfig, options: &RenderOptions) -> String {
        (self.render)(config, options)
    }

    /// Recover this template's config from markup. Never fails; whatever
    /// cannot be found is left blank.
    pub fn extract(&self, html: &str) -> ComponentConfig {
        (self.extract)(html)
    }
}

/// Immutable set of templates plus the options they render with
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
    options: RenderOptions,
}

impl TemplateCatalog {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            templates: vec![
                swiper::template(),
                new_banner::template(),
                four_categories::template(),
                eight_icons::template(),
                showroom::template(),
                hero_banner::template(),
                dual_panel::template(),
                info_grid::template(),
                faqs::template(),
            ],
            options,
        }
    }

    /// Catalog with the default options
    pub fn standard() -> Self {
        Self::new(RenderOptions::default())
    }

    /// The template for `kind`; `custom` has none.
    pub fn get(&self, kind: ComponentKind) -> Option<&Template> {
        self.templates.iter().find(|t| t.kind == kind)
    }

    /// Templates in registration order
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a config with its own template. `None` for `custom`.
    pub fn render(&self, config: &ComponentConfig) -> Option<String> {
        self.get(config.kind())
            .map(|template| template.render(config, &self.options))
    }

    /// Extract a config of `kind` from markup. `custom` yields
    /// [`ComponentConfig::Custom`].
    pub fn extract(&self, html: &str, kind: ComponentKind) -> ComponentConfig {
        match self.get(kind) {
            Some(template) => template.extract(html),
            None => ComponentConfig::Custom,
        }
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// `href` attribute value for a link carrying UTM parameters.
pub(crate) fn tracked_href(link_url: &str, utm: &crate::utm::UtmParams) -> String {
    crate::markup::escape_attr(&utm.apply(link_url))
}
