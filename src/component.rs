use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PageError, PageResult};
use crate::utm::UtmParams;

/// Minimum number of tiles in a four-categories block
pub const CATEGORY_COUNT: usize = 4;
/// Minimum number of tiles in an eight-icons block
pub const ICON_COUNT: usize = 8;

/// The closed set of component type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Swiper,
    NewBanner,
    FourCategories,
    EightIcons,
    ProductsShowroom,
    HeroBanner,
    DualPanelSection,
    InfoGridSection,
    FaqsSection,
    Custom,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 10] = [
        ComponentKind::Swiper,
        ComponentKind::NewBanner,
        ComponentKind::FourCategories,
        ComponentKind::EightIcons,
        ComponentKind::ProductsShowroom,
        ComponentKind::HeroBanner,
        ComponentKind::DualPanelSection,
        ComponentKind::InfoGridSection,
        ComponentKind::FaqsSection,
        ComponentKind::Custom,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ComponentKind::Swiper => "swiper",
            ComponentKind::NewBanner => "new-banner",
            ComponentKind::FourCategories => "four-categories",
            ComponentKind::EightIcons => "eight-icons",
            ComponentKind::ProductsShowroom => "products-showroom",
            ComponentKind::HeroBanner => "hero-banner",
            ComponentKind::DualPanelSection => "dual-panel-section",
            ComponentKind::InfoGridSection => "info-grid-section",
            ComponentKind::FaqsSection => "faqs-section",
            ComponentKind::Custom => "custom",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ComponentKind {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| PageError::UnknownComponentType { tag: s.to_string() })
    }
}

// ─── Config variants ─────────────────────────────────────────────────────────

/// One carousel slide (swiper and new-banner)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Slide {
    pub link_url: String,
    pub desktop_image: String,
    pub mobile_image: String,
    pub alt_text: String,
    /// Caption shown on new-banner slides; swiper slides do not render it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(flatten)]
    pub utm: UtmParams,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidesConfig {
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryTile {
    pub link_url: String,
    pub image_url: String,
    pub alt_text: String,
    #[serde(flatten)]
    pub utm: UtmParams,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FourCategoriesConfig {
    pub title: String,
    pub background_color: String,
    pub categories: Vec<CategoryTile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IconTile {
    pub link_url: String,
    pub image_url: String,
    pub alt_text: String,
    pub subtitle: String,
    #[serde(flatten)]
    pub utm: UtmParams,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EightIconsConfig {
    pub title: String,
    pub icons: Vec<IconTile>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowroomMode {
    #[default]
    Title,
    Image,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Promotional banner shown above an image-mode showroom
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowroomBanner {
    pub desktop_image: String,
    pub mobile_image: String,
    pub alt_text: String,
    pub link_url: String,
    #[serde(flatten)]
    pub utm: UtmParams,
}

/// Which external products a showroom (or one of its tabs) lists.
///
/// Interpreted by the search backend at page-view time; the builder only
/// embeds it as a fetch-call string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductQuery {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "category_number_from_text_or_int"
    )]
    pub category_number: Option<u64>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "object_ids_from_text_or_list"
    )]
    pub object_ids: Vec<String>,
    /// Only list discounted products of the category
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sale_only: bool,
}

/// Editors store the category as text; accept both `8512` and `"8512"`.
fn category_number_from_text_or_int<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid category number '{}'", text))),
    }
}

/// Accept both a YAML list and the editor's comma-separated text.
fn object_ids_from_text_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Raw::List(ids)) => ids,
        Some(Raw::Text(text)) => parse_object_ids(&text),
    })
}

impl ProductQuery {
    pub fn is_empty(&self) -> bool {
        self.category_number.is_none() && self.object_ids.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowroomTab {
    pub name: String,
    #[serde(flatten)]
    pub query: ProductQuery,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowroomConfig {
    pub mode: ShowroomMode,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_config: Option<ShowroomBanner>,
    #[serde(flatten)]
    pub query: ProductQuery,
    pub direction: Direction,
    pub tabbed_mode: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tabs: Vec<ShowroomTab>,
}

impl ShowroomConfig {
    /// Tabbed rendering only applies when at least one tab exists.
    pub fn is_tabbed(&self) -> bool {
        self.tabbed_mode && !self.tabs.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroBannerConfig {
    pub image: String,
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DualPanelConfig {
    pub title: String,
    pub description: String,
    pub image_enabled: bool,
    pub image: String,
}

impl Default for DualPanelConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            image_enabled: true,
            image: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoGridItem {
    pub icon: String,
    pub title: String,
    pub subtitles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoGridConfig {
    pub title: String,
    pub items: Vec<InfoGridItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqsConfig {
    pub title: String,
    pub faqs: Vec<Faq>,
}

/// Structured configuration of a component, one variant per type.
///
/// `Custom` carries no structure: the record's markup is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ComponentConfig {
    Swiper(SlidesConfig),
    NewBanner(SlidesConfig),
    FourCategories(FourCategoriesConfig),
    EightIcons(EightIconsConfig),
    ProductsShowroom(ShowroomConfig),
    HeroBanner(HeroBannerConfig),
    DualPanelSection(DualPanelConfig),
    InfoGridSection(InfoGridConfig),
    FaqsSection(FaqsConfig),
    Custom,
}

impl ComponentConfig {
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentConfig::Swiper(_) => ComponentKind::Swiper,
            ComponentConfig::NewBanner(_) => ComponentKind::NewBanner,
            ComponentConfig::FourCategories(_) => ComponentKind::FourCategories,
            ComponentConfig::EightIcons(_) => ComponentKind::EightIcons,
            ComponentConfig::ProductsShowroom(_) => ComponentKind::ProductsShowroom,
            ComponentConfig::HeroBanner(_) => ComponentKind::HeroBanner,
            ComponentConfig::DualPanelSection(_) => ComponentKind::DualPanelSection,
            ComponentConfig::InfoGridSection(_) => ComponentKind::InfoGridSection,
            ComponentConfig::FaqsSection(_) => ComponentKind::FaqsSection,
            ComponentConfig::Custom => ComponentKind::Custom,
        }
    }

    /// Decode a loosely-typed config value for the given kind.
    pub fn from_value(kind: ComponentKind, value: serde_yaml::Value) -> PageResult<Self> {
        let value = match value {
            serde_yaml::Value::Null => serde_yaml::Value::Mapping(Default::default()),
            other => other,
        };
        let invalid = |err: serde_yaml::Error| PageError::InvalidConfig {
            kind: kind.to_string(),
            reason: err.to_string(),
        };

        let config = match kind {
            ComponentKind::Swiper => ComponentConfig::Swiper(serde_yaml::from_value(value).map_err(invalid)?),
            ComponentKind::NewBanner => ComponentConfig::NewBanner(serde_yaml::from_value(value).map_err(invalid)?),
            ComponentKind::FourCategories => {
                ComponentConfig::FourCategories(serde_yaml::from_value(value).map_err(invalid)?)
            }
            ComponentKind::EightIcons => ComponentConfig::EightIcons(serde_yaml::from_value(value).map_err(invalid)?),
            ComponentKind::ProductsShowroom => {
                ComponentConfig::ProductsShowroom(serde_yaml::from_value(value).map_err(invalid)?)
            }
            ComponentKind::HeroBanner => ComponentConfig::HeroBanner(serde_yaml::from_value(value).map_err(invalid)?),
            ComponentKind::DualPanelSection => {
                ComponentConfig::DualPanelSection(serde_yaml::from_value(value).map_err(invalid)?)
            }
            ComponentKind::InfoGridSection => {
                ComponentConfig::InfoGridSection(serde_yaml::from_value(value).map_err(invalid)?)
            }
            ComponentKind::FaqsSection => ComponentConfig::FaqsSection(serde_yaml::from_value(value).map_err(invalid)?),
            ComponentKind::Custom => ComponentConfig::Custom,
        };
        Ok(config)
    }

    /// Every tracked link in this config, in document order.
    pub fn utm_fields(&self) -> Vec<&UtmParams> {
        match self {
            ComponentConfig::Swiper(c) | ComponentConfig::NewBanner(c) => {
                c.slides.iter().map(|s| &s.utm).collect()
            }
            ComponentConfig::FourCategories(c) => c.categories.iter().map(|t| &t.utm).collect(),
            ComponentConfig::EightIcons(c) => c.icons.iter().map(|t| &t.utm).collect(),
            ComponentConfig::ProductsShowroom(c) => {
                c.banner_config.iter().map(|b| &b.utm).collect()
            }
            _ => Vec::new(),
        }
    }
}

// ─── Component record ────────────────────────────────────────────────────────

/// One component on the page: identity, structured config and markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ComponentRepr", into = "ComponentRepr")]
pub struct Component {
    pub id: String,
    pub config: ComponentConfig,
    /// Last rendered or imported markup; authoritative for `custom`
    pub html: String,
}

impl Component {
    pub fn new(id: impl Into<String>, config: ComponentConfig, html: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            config,
            html: html.into(),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.config.kind()
    }
}

/// Wire shape of a record: `{id, type, config, html}`
#[derive(Serialize, Deserialize)]
struct ComponentRepr {
    id: String,
    #[serde(rename = "type")]
    kind: ComponentKind,
    #[serde(default)]
    config: serde_yaml::Value,
    #[serde(default)]
    html: String,
}

impl TryFrom<ComponentRepr> for Component {
    type Error = PageError;

    fn try_from(repr: ComponentRepr) -> Result<Self, Self::Error> {
        Ok(Component {
            config: ComponentConfig::from_value(repr.kind, repr.config)?,
            id: repr.id,
            html: repr.html,
        })
    }
}

impl From<Component> for ComponentRepr {
    fn from(component: Component) -> Self {
        ComponentRepr {
            kind: component.kind(),
            config: serde_yaml::to_value(&component.config).unwrap_or(serde_yaml::Value::Null),
            id: component.id,
            html: component.html,
        }
    }
}

/// Split a comma-separated id list as typed in the editor.
pub fn parse_object_ids(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|id| id.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kind_tags_round_trip() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind.tag().parse::<ComponentKind>().unwrap(), kind);
        }
        assert!("carousel".parse::<ComponentKind>().is_err());
    }

    #[test]
    fn record_yaml_shape() {
        let component = Component::new(
            "hero-banner-1",
            ComponentConfig::HeroBanner(HeroBannerConfig {
                image: "h.jpg".to_string(),
                title: "Run".to_string(),
                subtitle: "Faster".to_string(),
            }),
            "<div></div>",
        );
        let yaml = serde_yaml::to_string(&component).unwrap();
        assert!(yaml.contains("type: hero-banner"));
        assert!(yaml.contains("title: Run"));

        let back: Component = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, component);
    }

    #[test]
    fn camel_case_keys_and_flattened_utm() {
        let yaml = r#"
id: s1
type: swiper
config:
  slides:
    - linkUrl: https://x.com
      desktopImage: d.jpg
      mobileImage: m.jpg
      altText: A
      utmSource: Src
      campaignName: camp
"#;
        let component: Component = serde_yaml::from_str(yaml).unwrap();
        let ComponentConfig::Swiper(config) = &component.config else {
            panic!("expected swiper config");
        };
        assert_eq!(config.slides[0].desktop_image, "d.jpg");
        assert_eq!(config.slides[0].utm, UtmParams::new("Src", "camp"));
        assert_eq!(component.html, "");
    }

    #[test]
    fn missing_config_uses_defaults() {
        let component: Component = serde_yaml::from_str("id: d1\ntype: dual-panel-section\n").unwrap();
        assert_eq!(
            component.config,
            ComponentConfig::DualPanelSection(DualPanelConfig::default())
        );
    }

    #[test]
    fn object_ids_from_editor_text() {
        assert_eq!(parse_object_ids(" 8512, '8600' ,,\"9001\""), vec!["8512", "8600", "9001"]);
        assert!(parse_object_ids("").is_empty());
    }
}
