use super::{tracked_href, RenderOptions, Template};
use crate::component::{ComponentConfig, ComponentKind, EightIconsConfig, IconTile, ICON_COUNT};
use crate::markup::{self, escape_attr};
use crate::utm;

pub(super) fn template() -> Template {
    Template {
        kind: ComponentKind::EightIcons,
        name: "Eight Icons",
        default_config: || ComponentConfig::EightIcons(default_config()),
        render: |config, options| match config {
            ComponentConfig::EightIcons(c) => render(c, options),
            _ => render(&default_config(), options),
        },
        extract: |html| ComponentConfig::EightIcons(extract(html)),
    }
}

fn default_config() -> EightIconsConfig {
    EightIconsConfig {
        title: String::new(),
        icons: vec![IconTile::default(); ICON_COUNT],
    }
}

pub(crate) fn render(config: &EightIconsConfig, _options: &RenderOptions) -> String {
    let icons: String = config
        .icons
        .iter()
        .map(|icon| {
            format!(
                r#"
      <a href="{href}" class="icon-wrapper">
        <div class="icon-container">
          <div class="picture-container">
            <picture aria-hidden="true" style="padding-top: 109.773%">
              <img deca-image="true" alt="{alt}" src="{image}" loading="lazy" />
            </picture>
          </div>
          <div class="icon-subtitle">
            <span>{subtitle}</span>
          </div>
        </div>
      </a>"#,
                href = tracked_href(&icon.link_url, &icon.utm),
                alt = escape_attr(&icon.alt_text),
                image = escape_attr(&icon.image_url),
                subtitle = icon.subtitle,
            )
        })
        .collect();

    format!(
        r#"<div id="page-content" class="icons-section">
  <h2 class="icons-title">{title}</h2>
  <div class="icons-container">
    <div class="icons-wrapper">{icons}
    </div>
  </div>
</div>"#,
        title = config.title,
        icons = icons,
    )
}

pub(crate) fn extract(html: &str) -> EightIconsConfig {
    let mut icons: Vec<IconTile> = markup::elements_with_class(html, "a", "icon-wrapper")
        .into_iter()
        .map(|link| {
            let (link_url, utm) = utm::split_link(&link.tag.attribute("href").unwrap_or_default());
            let img = markup::first_tag(link.inner, "img");
            let subtitle = markup::element_with_class(link.inner, "div", "icon-subtitle")
                .map(|caption| {
                    markup::elements_where(caption.inner, |t| t.name == "span")
                        .first()
                        .map(|span| span.text())
                        .unwrap_or_else(|| caption.text())
                })
                .unwrap_or_default();

            IconTile {
                link_url,
                image_url: img.as_ref().and_then(|i| i.attribute("src")).unwrap_or_default(),
                alt_text: img.as_ref().and_then(|i| i.attribute("alt")).unwrap_or_default(),
                subtitle,
                utm,
            }
        })
        .collect();

    if icons.len() < ICON_COUNT {
        icons.resize(ICON_COUNT, IconTile::default());
    }

    EightIconsConfig {
        title: markup::text_with_class(html, "h2", "icons-title"),
        icons,
    }
}
