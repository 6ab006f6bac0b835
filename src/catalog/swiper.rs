use super::{tracked_href, RenderOptions, Template};
use crate::component::{ComponentConfig, ComponentKind, Slide, SlidesConfig};
use crate::markup::{self, escape_attr, OpenTag};
use crate::utm;

const DEFAULT_SLIDES: usize = 3;

pub(super) fn template() -> Template {
    Template {
        kind: ComponentKind::Swiper,
        name: "Swiper Carousel",
        default_config: || ComponentConfig::Swiper(default_config()),
        render: |config, options| match config {
            ComponentConfig::Swiper(c) => render(c, options),
            _ => render(&default_config(), options),
        },
        extract: |html| ComponentConfig::Swiper(extract(html)),
    }
}

fn default_config() -> SlidesConfig {
    SlidesConfig {
        slides: vec![Slide::default(); DEFAULT_SLIDES],
    }
}

fn render_picture(slide: &Slide, indent: &str) -> String {
    let desktop = escape_attr(&slide.desktop_image);
    format!(
        r#"<a href="{href}">
{i}  <picture>
{i}    <source media="(min-width: 768px)" srcset="{desktop}" />
{i}    <!-- Mobile image -->
{i}    <source media="(max-width: 767px)" srcset="{mobile}" />
{i}    <!-- Fallback for older browsers -->
{i}    <img src="{desktop}" class="slider-picture" alt="{alt}" loading="lazy" />
{i}  </picture></a>"#,
        i = indent,
        href = tracked_href(&slide.link_url, &slide.utm),
        desktop = desktop,
        mobile = escape_attr(&slide.mobile_image),
        alt = escape_attr(&slide.alt_text),
    )
}

/// One slide renders as a static picture; zero or several as a carousel.
pub(crate) fn render(config: &SlidesConfig, _options: &RenderOptions) -> String {
    if let [slide] = config.slides.as_slice() {
        return format!(
            r#"<div class="swiper-single-slide">
  <div class="swiper-slide">
    {}
  </div>
</div>"#,
            render_picture(slide, "    ")
        );
    }

    let slides: String = config
        .slides
        .iter()
        .map(|slide| {
            format!(
                r#"
    <div class="swiper-slide">{}
    </div>"#,
                render_picture(slide, "    ")
            )
        })
        .collect();

    format!(
        r#"<!-- Swiper -->
<div class="swiper mySwiper">
  <div class="swiper-wrapper">{}
  </div>
  <div class="swiper-button-next"></div>
  <div class="swiper-button-prev"></div>
  <div class="swiper-pagination"></div>
</div>"#,
        slides
    )
}

pub(crate) fn extract(html: &str) -> SlidesConfig {
    let mut slides: Vec<Slide> = markup::elements_with_class(html, "div", "swiper-slide")
        .iter()
        .map(|slide| read_slide(slide.inner))
        .collect();

    // Hand-written single banners often skip the slide wrapper.
    if slides.is_empty() && markup::first_tag(html, "img").is_some() {
        slides.push(read_slide(html));
    }

    SlidesConfig { slides }
}

fn source_for<'a>(sources: &[OpenTag<'a>], media: &str) -> Option<String> {
    sources
        .iter()
        .find(|s| s.attribute("media").is_some_and(|m| m.contains(media)))
        .and_then(|s| s.attribute("srcset"))
}

fn read_slide(html: &str) -> Slide {
    let href = markup::first_tag(html, "a")
        .and_then(|a| a.attribute("href"))
        .unwrap_or_default();
    let (link_url, utm) = utm::split_link(&href);

    let sources: Vec<OpenTag<'_>> = markup::open_tags(html)
        .into_iter()
        .filter(|t| t.name == "source")
        .collect();
    let img = markup::first_tag(html, "img");

    let desktop_image = source_for(&sources, "min-width")
        .or_else(|| img.as_ref().and_then(|i| i.attribute("src")))
        .unwrap_or_default();
    let mobile_image = source_for(&sources, "max-width").unwrap_or_else(|| desktop_image.clone());

    Slide {
        link_url,
        desktop_image,
        mobile_image,
        alt_text: img.as_ref().and_then(|i| i.attribute("alt")).unwrap_or_default(),
        subtitle: None,
        utm,
    }
}
