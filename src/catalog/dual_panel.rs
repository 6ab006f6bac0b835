use super::{RenderOptions, Template};
use crate::component::{ComponentConfig, ComponentKind, DualPanelConfig};
use crate::markup::{self, escape_attr};

pub(super) fn template() -> Template {
    Template {
        kind: ComponentKind::DualPanelSection,
        name: "Dual Panel Section",
        default_config: || ComponentConfig::DualPanelSection(DualPanelConfig::default()),
        render: |config, options| match config {
            ComponentConfig::DualPanelSection(c) => render(c, options),
            _ => render(&DualPanelConfig::default(), options),
        },
        extract: |html| ComponentConfig::DualPanelSection(extract(html)),
    }
}

pub(crate) fn render(config: &DualPanelConfig, _options: &RenderOptions) -> String {
    let image = if config.image_enabled {
        format!(
            r#"<div class="section-image dual-panel-content">
    <img src="{}" class="media-content" />
  </div>"#,
            escape_attr(&config.image)
        )
    } else {
        String::new()
    };

    format!(
        r#"<!--Dual Panel Section Start-->
<div class="dual-panel-section">
  <div class="section-text dual-panel-content">
    <h2 class="section-text-title">
      {title}
    </h2>
    <p class="section-text-description">{description}</p>
  </div>
  {image}
</div>
<!--Dual Panel Section End-->"#,
        title = config.title,
        description = config.description,
        image = image,
    )
}

pub(crate) fn extract(html: &str) -> DualPanelConfig {
    // The image column is optional; its presence is the toggle.
    let image_panel = markup::element_with_class(html, "div", "section-image");

    DualPanelConfig {
        title: markup::text_with_class(html, "h2", "section-text-title"),
        description: markup::text_with_class(html, "p", "section-text-description"),
        image_enabled: image_panel.is_some(),
        image: image_panel
            .and_then(|panel| markup::tag_with_class(panel.inner, "img", "media-content"))
            .and_then(|img| img.attribute("src"))
            .unwrap_or_default(),
    }
}
