use regex::Regex;
use std::sync::OnceLock;

use super::{tracked_href, RenderOptions, Template};
use crate::component::{CategoryTile, ComponentConfig, ComponentKind, FourCategoriesConfig, CATEGORY_COUNT};
use crate::markup::{self, escape_attr};
use crate::utm;

pub(super) fn template() -> Template {
    Template {
        kind: ComponentKind::FourCategories,
        name: "Four Categories",
        default_config: || ComponentConfig::FourCategories(default_config()),
        render: |config, options| match config {
            ComponentConfig::FourCategories(c) => render(c, options),
            _ => render(&default_config(), options),
        },
        extract: |html| ComponentConfig::FourCategories(extract(html)),
    }
}

fn default_config() -> FourCategoriesConfig {
    FourCategoriesConfig {
        categories: vec![CategoryTile::default(); CATEGORY_COUNT],
        ..Default::default()
    }
}

pub(crate) fn render(config: &FourCategoriesConfig, _options: &RenderOptions) -> String {
    let tiles: String = config
        .categories
        .iter()
        .map(|tile| {
            format!(
                r#"
      <div class="four_categories_category_wrapper">
        <div style="max-width: 100%;">
          <a href="{href}">
            <div class="four_categories_image_wrapper">
              <img src="{image}" alt="{alt}" loading="lazy" width="432" height="467" />
            </div>
          </a>
        </div>
      </div>"#,
                href = tracked_href(&tile.link_url, &tile.utm),
                image = escape_attr(&tile.image_url),
                alt = escape_attr(&tile.alt_text),
            )
        })
        .collect();

    format!(
        r#"<div class="four_categories_wrapper" style="background-color: {background};">
  <div class="four_categories_title_wrapper">
    <div class="four_categories_title_container">
      <h2 class="four_categories_title">{title}</h2>
    </div>
  </div>
  <div class="four_categories_container">
    <div class="four_categories_box">{tiles}
    </div>
  </div>
</div>"#,
        background = escape_attr(&config.background_color),
        title = config.title,
        tiles = tiles,
    )
}

pub(crate) fn extract(html: &str) -> FourCategoriesConfig {
    static BACKGROUND_REGEX: OnceLock<Regex> = OnceLock::new();
    let background = BACKGROUND_REGEX.get_or_init(|| Regex::new(r"(?i)background-color\s*:\s*([^;]*)").unwrap());

    let background_color = markup::tag_with_class(html, "div", "four_categories_wrapper")
        .and_then(|root| root.attribute("style"))
        .map(|style| markup::capture_trimmed(background, &style))
        .unwrap_or_default();

    let mut categories: Vec<CategoryTile> = markup::elements_with_class(html, "div", "four_categories_category_wrapper")
        .into_iter()
        .map(|tile| {
            let href = markup::first_tag(tile.inner, "a")
                .and_then(|a| a.attribute("href"))
                .unwrap_or_default();
            let (link_url, utm) = utm::split_link(&href);
            let img = markup::first_tag(tile.inner, "img");
            CategoryTile {
                link_url,
                image_url: img.as_ref().and_then(|i| i.attribute("src")).unwrap_or_default(),
                alt_text: img.as_ref().and_then(|i| i.attribute("alt")).unwrap_or_default(),
                utm,
            }
        })
        .collect();

    if categories.len() < CATEGORY_COUNT {
        categories.resize(CATEGORY_COUNT, CategoryTile::default());
    }

    FourCategoriesConfig {
        title: markup::text_with_class(html, "h2", "four_categories_title"),
        background_color,
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utm::UtmParams;
    use pretty_assertions::assert_eq;

    fn tile(n: usize) -> CategoryTile {
        CategoryTile {
            link_url: format!("https://shop.example.com/c/{}", n),
            image_url: format!("cat{}.jpg", n),
            alt_text: format!("Category {}", n),
            utm: UtmParams::new("home", format!("cat{}", n)),
        }
    }

    #[test]
    fn round_trip() {
        let config = FourCategoriesConfig {
            title: "Shop by sport".to_string(),
            background_color: "rgb(240, 240, 240)".to_string(),
            categories: (1..=4).map(tile).collect(),
        };
        let html = render(&config, &RenderOptions::default());
        assert_eq!(extract(&html), config);
    }

    #[test]
    fn short_lists_pad_to_four() {
        let config = FourCategoriesConfig {
            title: "Two only".to_string(),
            background_color: "#fff".to_string(),
            categories: vec![tile(1), tile(2)],
        };
        let extracted = extract(&render(&config, &RenderOptions::default()));
        assert_eq!(extracted.categories.len(), 4);
        assert_eq!(&extracted.categories[..2], &config.categories[..]);
        assert_eq!(extracted.categories[2], CategoryTile::default());
        assert_eq!(extracted.categories[3], CategoryTile::default());
    }

    #[test]
    fn blank_utm_leaves_link_untouched() {
        let config = FourCategoriesConfig {
            categories: vec![CategoryTile {
                link_url: "https://shop.example.com/run?page=2".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let html = render(&config, &RenderOptions::default());
        assert!(html.contains(r#"<a href="https://shop.example.com/run?page=2">"#));
    }

    #[test]
    fn filtered_links_and_anchors_round_trip() {
        let mut config = FourCategoriesConfig {
            title: "Filters".to_string(),
            background_color: "#fff".to_string(),
            categories: (1..=4).map(tile).collect(),
        };
        config.categories[0].link_url = "https://x.com/c?sort=price,asc&f=size:42".to_string();
        config.categories[1].link_url = "https://x.com/c/shoes#new-in".to_string();

        let html = render(&config, &RenderOptions::default());
        assert_eq!(extract(&html), config);
    }
}
