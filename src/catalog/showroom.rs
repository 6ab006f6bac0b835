//! Products showroom: a horizontally scrolling product track whose items are
//! fetched client-side by an Alpine `x-init` call.
//!
//! Four layouts share one products block: {single, tabbed} x {title, image}.
//! The fetch call is the only place the product query lives in the markup:
//!
//! | query                   | call                                             |
//! |-------------------------|--------------------------------------------------|
//! | category + ids          | `getProductsFromCategory(10, 8512, ['a', 'b'])`  |
//! | category                | `getProductsFromCategory(10, 8512, [])`          |
//! | category, sale only     | `getDiscountedProductsFromCategory(10, 8512, [])`|
//! | ids                     | `getProductsManual(['a', 'b'])`                  |
//! | nothing                 | `products = []`, no call                         |

use regex::Regex;
use std::sync::OnceLock;

use super::{tracked_href, RenderOptions, Template};
use crate::component::{
    ComponentConfig, ComponentKind, Direction, ProductQuery, ShowroomBanner, ShowroomConfig, ShowroomMode,
    ShowroomTab,
};
use crate::markup::{self, escape_js, unescape_js};
use crate::utm;

/// Products requested per fetch
const PRODUCT_LIMIT: u32 = 10;

const CATEGORY_FETCH: &str = "getProductsFromCategory";
const SALE_FETCH: &str = "getDiscountedProductsFromCategory";
const MANUAL_FETCH: &str = "getProductsManual";

const CURRENCY_PLACEHOLDER: &str = "__CURRENCY__";

const PRODUCT_CARD: &str = r#"                                <div class="product--card">
                                    <a :href="product.url" style="text-decoration: none; color: black;">
                                        <div class="product-picture-wrapper">
                                            <span>
                                                <img class="product-picture" :alt="product.product_name" :src="updateImageUrl(product.image_url)" loading="lazy" />
                                            </span>
                                        </div>
                                        <div x-show="product.percentoff > 0" class="discount-percentage">
                                            <span x-text="product.percentoff.toFixed(0) + '% OFF'"></span>
                                        </div>
                                        <div class="product-details-wrapper">
                                            <div>
                                                <div class="product-price-wrapper">
                                                    <div class="product-price-container">
                                                        <div class="vp-price">
                                                            <span class="product-price" :class="{'discounted': product.percentoff > 0}" x-text="product.prix.toFixed(2) + ' __CURRENCY__'"></span>
                                                            <span x-show="product.percentoff > 0" class="product-original-price" x-text="product.regular.toFixed(2) + ' __CURRENCY__'"></span>
                                                        </div>
                                                    </div>
                                                </div>
                                                <div class="product-brand-wrapper">
                                                    <span class="product-brand" x-text="product.brand"></span>
                                                </div>
                                                <div class="product-name" x-text="product.product_name"></div>
                                            </div>
                                        </div>
                                    </a>
                                </div>"#;

pub(super) fn template() -> Template {
    Template {
        kind: ComponentKind::ProductsShowroom,
        name: "Products Showroom",
        default_config: || ComponentConfig::ProductsShowroom(ShowroomConfig::default()),
        render: |config, options| match config {
            ComponentConfig::ProductsShowroom(c) => render(c, options),
            _ => render(&ShowroomConfig::default(), options),
        },
        extract: |html| ComponentConfig::ProductsShowroom(extract(html)),
    }
}

// ─── Fetch calls ─────────────────────────────────────────────────────────────

fn fetch_call(query: &ProductQuery) -> Option<String> {
    let ids = query
        .object_ids
        .iter()
        .map(|id| format!("'{}'", escape_js(id)))
        .collect::<Vec<_>>()
        .join(", ");

    match query.category_number {
        Some(category) => {
            let function = if query.sale_only { SALE_FETCH } else { CATEGORY_FETCH };
            Some(format!("{}({}, {}, [{}])", function, PRODUCT_LIMIT, category, ids))
        }
        None if !query.object_ids.is_empty() => Some(format!("{}([{}])", MANUAL_FETCH, ids)),
        None => None,
    }
}

fn init_expression(query: &ProductQuery) -> String {
    match fetch_call(query) {
        Some(call) => format!("products = await {}", call),
        None => "products = []".to_string(),
    }
}

/// Recover the product query from entity-decoded markup holding a fetch call.
fn parse_fetch(expression: &str) -> ProductQuery {
    static CATEGORY_REGEX: OnceLock<Regex> = OnceLock::new();
    static MANUAL_REGEX: OnceLock<Regex> = OnceLock::new();

    let category = CATEGORY_REGEX.get_or_init(|| {
        Regex::new(
            r#"(getProductsFromCategory|getDiscountedProductsFromCategory)\(\s*\d+\s*,\s*['"]?(\d+)['"]?\s*(?:,\s*\[([^\]]*)\])?"#,
        )
        .unwrap()
    });
    let manual = MANUAL_REGEX.get_or_init(|| Regex::new(r"getProductsManual\(\s*\[([^\]]*)\]").unwrap());

    if let Some(caps) = category.captures(expression) {
        return ProductQuery {
            category_number: caps[2].parse().ok(),
            object_ids: caps.get(3).map(|m| id_list(m.as_str())).unwrap_or_default(),
            sale_only: &caps[1] == SALE_FETCH,
        };
    }
    if let Some(caps) = manual.captures(expression) {
        return ProductQuery {
            object_ids: id_list(&caps[1]),
            ..Default::default()
        };
    }
    ProductQuery::default()
}

/// Items of a JS array literal body: quoted strings or bare tokens.
fn id_list(items: &str) -> Vec<String> {
    static ITEM_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = ITEM_REGEX
        .get_or_init(|| Regex::new(r#"'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)"|([^,\s'"]+)"#).unwrap());

    re.captures_iter(items)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| unescape_js(m.as_str()))
        .filter(|id| !id.is_empty())
        .collect()
}

/// The first opening tag that calls a product fetch, entity-decoded.
///
/// The call usually sits in `x-init`, but hand-written markup also uses
/// `x-intersect` and its modifiers, so the whole tag is searched.
fn fetch_expression(html: &str) -> Option<String> {
    markup::open_tags(html)
        .into_iter()
        .find(|tag| [CATEGORY_FETCH, SALE_FETCH, MANUAL_FETCH].iter().any(|f| tag.raw.contains(f)))
        .map(|tag| markup::decode_attr(tag.raw))
}

// ─── Alpine state ────────────────────────────────────────────────────────────

/// Value of `key: '...'` inside an Alpine `x-data` object literal.
fn js_field(object: &str, key: &str) -> Option<String> {
    static FIELD_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = FIELD_REGEX.get_or_init(|| Regex::new(r"([A-Za-z_$][\w$]*)\s*:\s*'((?:[^'\\]|\\.)*)'").unwrap());

    re.captures_iter(object)
        .find(|caps| &caps[1] == key)
        .map(|caps| unescape_js(&caps[2]))
}

fn x_data(active_tab: Option<&str>, banner: Option<&ShowroomBanner>) -> Option<String> {
    let mut fields = Vec::new();
    if let Some(tab) = active_tab {
        fields.push(format!("activeTab: '{}'", escape_js(tab)));
    }
    if let Some(banner) = banner {
        fields.push(format!("desktopBannerImage: '{}'", escape_js(&banner.desktop_image)));
        fields.push(format!("mobileBannerImage: '{}'", escape_js(&banner.mobile_image)));
        fields.push(format!("bannerAlt: '{}'", escape_js(&banner.alt_text)));
    }

    if fields.is_empty() {
        None
    } else {
        Some(format!("{{ {} }}", fields.join(", ")))
    }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn container_class(direction: Direction) -> &'static str {
    match direction {
        Direction::Ltr => "showroom-container",
        Direction::Rtl => "showroom-container showroom-container-rtl",
    }
}

/// Banner state for image mode; title mode has none.
fn image_banner(config: &ShowroomConfig) -> Option<ShowroomBanner> {
    match config.mode {
        ShowroomMode::Image => Some(config.banner_config.clone().unwrap_or_default()),
        ShowroomMode::Title => None,
    }
}

fn banner_block(banner: &ShowroomBanner) -> String {
    if banner.desktop_image.is_empty() && banner.mobile_image.is_empty() {
        return String::new();
    }

    format!(
        r#"
                <template x-if="(desktopBannerImage && desktopBannerImage.trim() !== '') || (mobileBannerImage && mobileBannerImage.trim() !== '')">
                    <a style="text-decoration: none; display: block; position: relative" href="{href}">
                        <div class="showroom-banner-wrapper">
                            <!-- Desktop banner -->
                            <span class="showroom-desktop-banner">
                                <span>
                                    <img alt="" aria-hidden="true" src="data:image/svg+xml,%3csvg%20xmlns=%27http://www.w3.org/2000/svg%27%20version=%271.1%27%20width=%27268%27%20height=%27477%27/%3e">
                                </span>
                                <img :alt="bannerAlt" :src="desktopBannerImage" class="showroom-banner-image" />
                            </span>
                            <div style="box-sizing: border-box; margin: 0px; min-width: 0px; height: 100%; width: 100%; position: relative;">
                                <!-- Mobile banner -->
                                <span class="showroom-mobile-banner">
                                    <img :alt="bannerAlt" :src="mobileBannerImage" class="showroom-banner-image" />
                                </span>
                            </div>
                        </div>
                    </a>
                </template>"#,
        href = tracked_href(&banner.link_url, &banner.utm),
    )
}

fn products_block(query: &ProductQuery, mode: ShowroomMode, options: &RenderOptions) -> String {
    let (track, left, right) = match mode {
        ShowroomMode::Title => ("no-image-track", "left_no_image_arrow", "right_no_image_arrow"),
        ShowroomMode::Image => ("showroom-products-track", "left_showroom_arrow", "right_showroom_arrow"),
    };

    format!(
        r#"<div class="showroom-products-wrapper">
                <div class="swiper-button-prev {left} showroom_arrow"></div>
                <div class="swiper-button-next {right} showroom_arrow"></div>
                <div class="showroom-products-container">
                    <section x-data="{{ products: [] }}" x-init="{init}">
                        <div class="showroom-products-container {track}" style="display: flex;">
                            <template x-for="product in products">
{card}
                            </template>
                        </div>
                    </section>
                </div>
            </div>"#,
        left = left,
        right = right,
        init = init_expression(query),
        track = track,
        card = PRODUCT_CARD.replace(CURRENCY_PLACEHOLDER, &escape_js(&options.currency)),
    )
}

pub(crate) fn render(config: &ShowroomConfig, options: &RenderOptions) -> String {
    if config.is_tabbed() {
        render_tabbed(config, options)
    } else {
        render_single(config, options)
    }
}

fn render_single(config: &ShowroomConfig, options: &RenderOptions) -> String {
    let banner = image_banner(config);
    let x_data = x_data(None, banner.as_ref())
        .map(|data| format!(r#" x-data="{}""#, data))
        .unwrap_or_default();

    let (heading, margin) = match config.mode {
        ShowroomMode::Title => (
            format!(
                r#"
    <div class="showroom-heading">
        <h2 id="showroom-title">{}</h2>
    </div>"#,
                config.title
            ),
            r#" style="margin-left: 10px;""#,
        ),
        ShowroomMode::Image => (String::new(), ""),
    };

    format!(
        r#"<div class="showroom-component"{x_data}>{heading}
    <div class="component-container"{margin}>
        <div class="{container}">{banner}
            {products}
        </div>
    </div>
</div>"#,
        x_data = x_data,
        heading = heading,
        margin = margin,
        container = container_class(config.direction),
        banner = banner.as_ref().map(banner_block).unwrap_or_default(),
        products = products_block(&config.query, config.mode, options),
    )
}

fn render_tabbed(config: &ShowroomConfig, options: &RenderOptions) -> String {
    let banner = image_banner(config);
    let first_tab = config.tabs.first().map(|tab| tab.name.as_str()).unwrap_or("");
    let x_data = x_data(Some(first_tab), banner.as_ref()).unwrap_or_default();

    let buttons = config
        .tabs
        .iter()
        .map(|tab| {
            let key = escape_js(&tab.name);
            format!(
                r#"            <li><button :class="{{ 'active': activeTab === '{key}' }}" @click="activeTab = '{key}'" class="showroom-button">{label}</button></li>"#,
                key = key,
                label = tab.name,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let heading = match config.mode {
        ShowroomMode::Title => format!(
            r#"<div class="showroom-heading">
        <h2 id="showroom-title">{title}</h2>
        <ul class="showroom-buttons-list">
{buttons}
        </ul>
    </div>"#,
            title = config.title,
            buttons = buttons,
        ),
        ShowroomMode::Image => format!(
            r#"{banner}
    <div class="showroom-heading" style="margin-top: 20px;">
        <ul class="showroom-buttons-list">
{buttons}
        </ul>
    </div>"#,
            banner = banner.as_ref().map(banner_block).unwrap_or_default(),
            buttons = buttons,
        ),
    };

    let container = container_class(config.direction);
    let panels = config
        .tabs
        .iter()
        .enumerate()
        .map(|(n, tab)| {
            format!(
                r#"        <!-- Tab {n} -->
        <div class="{container}" x-show="activeTab === '{key}'">
            {products}
        </div>"#,
                n = n + 1,
                container = container,
                key = escape_js(&tab.name),
                products = products_block(&tab.query, config.mode, options),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"<!-- Tabbed Showroom Start -->
<div class="showroom-tabbed" x-data="{x_data}">
    {heading}
    <div class="component-container">
{panels}
    </div>
</div>
<!-- Tabbed Showroom End -->"#,
        x_data = x_data,
        heading = heading,
        panels = panels,
    )
}

// ─── Extraction ──────────────────────────────────────────────────────────────

fn tab_name(button: &markup::Element<'_>) -> String {
    static CLICK_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = CLICK_REGEX.get_or_init(|| Regex::new(r"activeTab\s*=\s*'((?:[^'\\]|\\.)*)'").unwrap());

    button
        .tag
        .attribute("@click")
        .and_then(|click| re.captures(&click).map(|caps| unescape_js(&caps[1])))
        .unwrap_or_else(|| button.text())
}

fn banner_link(html: &str) -> (String, utm::UtmParams) {
    let href = markup::elements_where(html, |t| t.name == "a")
        .into_iter()
        .find(|a| a.inner.contains("showroom-banner-wrapper"))
        .and_then(|a| a.tag.attribute("href"))
        .unwrap_or_default();
    utm::split_link(&href)
}

pub(crate) fn extract(html: &str) -> ShowroomConfig {
    let state = markup::open_tags(html)
        .into_iter()
        .filter_map(|tag| tag.attribute("x-data"))
        .find(|data| data.contains("activeTab") || data.contains("desktopBannerImage"))
        .unwrap_or_default();

    let mode = if js_field(&state, "desktopBannerImage").is_some() {
        ShowroomMode::Image
    } else {
        ShowroomMode::Title
    };

    let direction = if markup::open_tags(html)
        .iter()
        .any(|tag| tag.has_class("showroom-container-rtl"))
    {
        Direction::Rtl
    } else {
        Direction::Ltr
    };

    let (title, banner_config) = match mode {
        ShowroomMode::Title => (markup::text_with_id(html, "h2", "showroom-title"), None),
        ShowroomMode::Image => {
            let (link_url, utm) = banner_link(html);
            let banner = ShowroomBanner {
                desktop_image: js_field(&state, "desktopBannerImage").unwrap_or_default(),
                mobile_image: js_field(&state, "mobileBannerImage").unwrap_or_default(),
                alt_text: js_field(&state, "bannerAlt").unwrap_or_default(),
                link_url,
                utm,
            };
            (String::new(), Some(banner))
        }
    };

    let tabbed = markup::tag_with_class(html, "ul", "showroom-buttons-list").is_some();
    if !tabbed {
        return ShowroomConfig {
            mode,
            title,
            banner_config,
            query: fetch_expression(html).map(|e| parse_fetch(&e)).unwrap_or_default(),
            direction,
            tabbed_mode: false,
            tabs: Vec::new(),
        };
    }

    // Buttons and panels pair up by position.
    let panels: Vec<ProductQuery> = markup::elements_where(html, |t| {
        t.attribute("x-show").is_some_and(|show| show.contains("activeTab"))
    })
    .iter()
    .map(|panel| fetch_expression(panel.inner).map(|e| parse_fetch(&e)).unwrap_or_default())
    .collect();

    let tabs = markup::elements_with_class(html, "button", "showroom-button")
        .iter()
        .enumerate()
        .map(|(n, button)| ShowroomTab {
            name: tab_name(button),
            query: panels.get(n).cloned().unwrap_or_default(),
        })
        .collect();

    ShowroomConfig {
        mode,
        title,
        banner_config,
        query: ProductQuery::default(),
        direction,
        tabbed_mode: true,
        tabs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utm::UtmParams;
    use pretty_assertions::assert_eq;

    fn query(category: Option<u64>, ids: &[&str]) -> ProductQuery {
        ProductQuery {
            category_number: category,
            object_ids: ids.iter().map(|id| id.to_string()).collect(),
            sale_only: false,
        }
    }

    fn banner() -> ShowroomBanner {
        ShowroomBanner {
            desktop_image: "showroom-d.jpg".to_string(),
            mobile_image: "showroom-m.jpg".to_string(),
            alt_text: "Men's running".to_string(),
            link_url: "https://shop.example.com/running".to_string(),
            utm: UtmParams::new("hp", "running"),
        }
    }

    #[test]
    fn fetch_call_shapes() {
        assert_eq!(
            fetch_call(&query(Some(8512), &["a", "b"])).unwrap(),
            "getProductsFromCategory(10, 8512, ['a', 'b'])"
        );
        assert_eq!(
            fetch_call(&query(Some(8512), &[])).unwrap(),
            "getProductsFromCategory(10, 8512, [])"
        );
        assert_eq!(fetch_call(&query(None, &["a"])).unwrap(), "getProductsManual(['a'])");
        assert_eq!(fetch_call(&query(None, &[])), None);

        let sale = ProductQuery {
            sale_only: true,
            ..query(Some(7), &[])
        };
        assert_eq!(fetch_call(&sale).unwrap(), "getDiscountedProductsFromCategory(10, 7, [])");
    }

    #[test]
    fn parse_fetch_accepts_handwritten_calls() {
        assert_eq!(
            parse_fetch(r#"products = await getProductsFromCategory(12, "8512", ["x", 'y'])"#),
            query(Some(8512), &["x", "y"])
        );
        assert_eq!(
            parse_fetch("products = await getProductsFromCategory(10, 8512)"),
            query(Some(8512), &[])
        );
        assert_eq!(parse_fetch("products = await getProductsManual([101, 102])"), query(None, &["101", "102"]));
        assert_eq!(parse_fetch("products = []"), ProductQuery::default());
    }

    #[test]
    fn single_title_round_trip() {
        let config = ShowroomConfig {
            title: "Best sellers".to_string(),
            query: query(Some(8512), &["8600", "8601"]),
            ..Default::default()
        };
        let html = render(&config, &RenderOptions::default());
        assert!(markup::root_element(&html).unwrap().has_class("showroom-component"));
        assert_eq!(extract(&html), config);
    }

    #[test]
    fn single_image_round_trip() {
        let config = ShowroomConfig {
            mode: ShowroomMode::Image,
            banner_config: Some(banner()),
            query: query(None, &["O'Neill-1"]),
            direction: Direction::Rtl,
            ..Default::default()
        };
        let html = render(&config, &RenderOptions::default());
        assert_eq!(extract(&html), config);
    }

    #[test]
    fn tabbed_title_round_trip() {
        let config = ShowroomConfig {
            title: "Shop by sport".to_string(),
            tabbed_mode: true,
            tabs: vec![
                ShowroomTab {
                    name: "Running".to_string(),
                    query: query(Some(1), &[]),
                },
                ShowroomTab {
                    name: "Kids' Bikes".to_string(),
                    query: ProductQuery {
                        sale_only: true,
                        ..query(Some(2), &["b1"])
                    },
                },
                ShowroomTab {
                    name: "Picks".to_string(),
                    query: query(None, &["p1", "p2"]),
                },
            ],
            ..Default::default()
        };
        let html = render(&config, &RenderOptions::default());
        let root = markup::root_element(&html).unwrap();
        assert!(root.has_class("showroom-tabbed"));
        assert!(html.contains("showroom-buttons-list"));
        assert_eq!(extract(&html), config);
    }

    #[test]
    fn tabbed_image_round_trip() {
        let config = ShowroomConfig {
            mode: ShowroomMode::Image,
            banner_config: Some(banner()),
            tabbed_mode: true,
            tabs: vec![ShowroomTab {
                name: "Hiking".to_string(),
                query: query(Some(3), &[]),
            }],
            ..Default::default()
        };
        let html = render(&config, &RenderOptions::default());
        assert_eq!(extract(&html), config);
    }

    #[test]
    fn tabbed_flag_without_tabs_renders_single() {
        let config = ShowroomConfig {
            tabbed_mode: true,
            ..Default::default()
        };
        let html = render(&config, &RenderOptions::default());
        assert!(!html.contains("showroom-buttons-list"));
        assert!(html.contains(r#"x-init="products = []""#));
    }

    #[test]
    fn price_labels_use_configured_currency() {
        let options = RenderOptions {
            currency: "USD".to_string(),
        };
        let html = render(&ShowroomConfig::default(), &options);
        assert!(html.contains("product.prix.toFixed(2) + ' USD'"));
        assert!(!html.contains(CURRENCY_PLACEHOLDER));
    }
}
