use super::{RenderOptions, Template};
use crate::component::{ComponentConfig, ComponentKind, InfoGridConfig, InfoGridItem};
use crate::markup::{self, escape_attr};

pub(super) fn template() -> Template {
    Template {
        kind: ComponentKind::InfoGridSection,
        name: "Info Grid Section",
        default_config: || ComponentConfig::InfoGridSection(default_config()),
        render: |config, options| match config {
            ComponentConfig::InfoGridSection(c) => render(c, options),
            _ => render(&default_config(), options),
        },
        extract: |html| ComponentConfig::InfoGridSection(extract(html)),
    }
}

fn default_config() -> InfoGridConfig {
    InfoGridConfig {
        title: String::new(),
        items: vec![InfoGridItem {
            subtitles: vec![String::new()],
            ..Default::default()
        }],
    }
}

pub(crate) fn render(config: &InfoGridConfig, _options: &RenderOptions) -> String {
    let items: String = config.items.iter().map(render_item).collect();

    format!(
        r#"<!--Info Grid Section Start -->
<div class="info-grid-section">
  <h2 class="info-grid-section-title">{title}</h2>
  <ul class="info-grid-list">{items}
  </ul>
</div>
<!--Info Grid Section End-->"#,
        title = config.title,
        items = items,
    )
}

fn render_item(item: &InfoGridItem) -> String {
    let subtitles: String = item
        .subtitles
        .iter()
        .map(|sub| format!(r#"<div class="info-grid-list-item-subtitle">{}</div>"#, sub))
        .collect();

    format!(
        r#"
    <li class="info-grid-list-item">
      <div class="info-grid-list-item-icon">
        <img src="{icon}" class="info-grid-list-item-icon-image" />
      </div>
      <div class="info-grid-list-item-text">
        <div class="info-grid-list-item-title">
          {title}
        </div>
        {subtitles}
      </div>
    </li>"#,
        icon = escape_attr(&item.icon),
        title = item.title,
        subtitles = subtitles,
    )
}

pub(crate) fn extract(html: &str) -> InfoGridConfig {
    let items = markup::elements_with_class(html, "li", "info-grid-list-item")
        .into_iter()
        .map(|li| InfoGridItem {
            icon: markup::tag_with_class(li.inner, "img", "info-grid-list-item-icon-image")
                .and_then(|img| img.attribute("src"))
                .unwrap_or_default(),
            title: markup::text_with_class(li.inner, "div", "info-grid-list-item-title"),
            subtitles: markup::elements_with_class(li.inner, "div", "info-grid-list-item-subtitle")
                .iter()
                .map(|sub| sub.text())
                .collect(),
        })
        .collect();

    InfoGridConfig {
        title: markup::text_with_class(html, "h2", "info-grid-section-title"),
        items,
    }
}
