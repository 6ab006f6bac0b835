use super::{RenderOptions, Template};
use crate::component::{ComponentConfig, ComponentKind, HeroBannerConfig};
use crate::markup::{self, escape_attr};

pub(super) fn template() -> Template {
    Template {
        kind: ComponentKind::HeroBanner,
        name: "Hero Banner",
        default_config: || ComponentConfig::HeroBanner(HeroBannerConfig::default()),
        render: |config, options| match config {
            ComponentConfig::HeroBanner(c) => render(c, options),
            _ => render(&HeroBannerConfig::default(), options),
        },
        extract: |html| ComponentConfig::HeroBanner(extract(html)),
    }
}

pub(crate) fn render(config: &HeroBannerConfig, _options: &RenderOptions) -> String {
    format!(
        r#"<!--Hero Banner Start-->
<div class="hero-banner-wrapper">
  <div class="hero-banner-padding">
    <div class="hero-banner-image-wrapper">
      <img src="{image}" class="hero-banner-image" />
    </div>
    <div class="hero-banner-overlay"></div>
    <div class="hero-banner-text-wrapper">
      <div class="hero-banner-text-container">
        <div class="hero-banner-text">
          <h1 class="hero-banner-title">{title}</h1>
          <p class="hero-banner-subtitle">{subtitle}</p>
        </div>
      </div>
    </div>
  </div>
</div>
<!--Hero Banner End-->"#,
        image = escape_attr(&config.image),
        title = config.title,
        subtitle = config.subtitle,
    )
}

pub(crate) fn extract(html: &str) -> HeroBannerConfig {
    HeroBannerConfig {
        image: markup::tag_with_class(html, "img", "hero-banner-image")
            .and_then(|img| img.attribute("src"))
            .unwrap_or_default(),
        title: markup::text_with_class(html, "h1", "hero-banner-title"),
        subtitle: markup::text_with_class(html, "p", "hero-banner-subtitle"),
    }
}
