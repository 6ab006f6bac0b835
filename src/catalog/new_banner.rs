use super::{tracked_href, RenderOptions, Template};
use crate::component::{ComponentConfig, ComponentKind, Slide, SlidesConfig};
use crate::markup::{self, escape_attr};
use crate::utm;

const DEFAULT_SLIDES: usize = 3;

const SWIPER_SCRIPTS: &str = r#"<script src="https://decathlon-egypt.github.io/Decathlon-Egypt/CMS%20Scripts%20&%20Styles/categories_swiper.js"></script>
      <script src="https://unpkg.com/swiper/swiper-bundle.min.js"></script>"#;

const SWIPER_INIT: &str = r#"<script>
        var mainBannerSwiper = new Swiper('#main-banner-swiper', {
          centeredSlides: true,
          loop: true,
          spaceBetween: 20,
          autoplay: {
            delay: 4000,
            disableOnInteraction: false,
          },
          navigation: {
            nextEl: '#main-banner-slider .swiper-button-next',
            prevEl: '#main-banner-slider .swiper-button-prev',
          },
          breakpoints: {
            1280: { slidesPerView: 3 },
            1024: { slidesPerView: 2.6 },
            992: { slidesPerView: 2.2 },
            720: { slidesPerView: 2 },
            599: { slidesPerView: 1.6 },
            500: { slidesPerView: 1.2 },
            0: { slidesPerView: 1 }
          }
        });
      </script>"#;

pub(super) fn template() -> Template {
    Template {
        kind: ComponentKind::NewBanner,
        name: "New Banner",
        default_config: || ComponentConfig::NewBanner(default_config()),
        render: |config, options| match config {
            ComponentConfig::NewBanner(c) => render(c, options),
            _ => render(&default_config(), options),
        },
        extract: |html| ComponentConfig::NewBanner(extract(html)),
    }
}

fn default_config() -> SlidesConfig {
    SlidesConfig {
        slides: vec![Slide::default(); DEFAULT_SLIDES],
    }
}

fn render_slide(slide: &Slide) -> String {
    let alt = escape_attr(&slide.alt_text);
    format!(
        r#"
                <a href="{href}" class="swiper-slide _revamp-slide" role="group" aria-label="{alt}">
                  <div class="slide-link-re">
                    <picture>
                      <source media="(max-width: 767px)" srcset="{mobile}" />
                      <img src="{desktop}" alt="{alt}" class="slide-image">
                    </picture>
                    <div class="image-gradient-overlay"></div>
                    <div class="slide-content">
                      <div class="slide-title">{subtitle}</div>
                      <button class="slide-button" aria-label="{alt}">
                        <span>Shop now</span>
                      </button>
                    </div>
                  </div>
                </a>"#,
        href = tracked_href(&slide.link_url, &slide.utm),
        alt = alt,
        mobile = escape_attr(&slide.mobile_image),
        desktop = escape_attr(&slide.desktop_image),
        subtitle = slide.subtitle.as_deref().unwrap_or(""),
    )
}

/// Full-width banner slider with its own Swiper bootstrap scripts.
pub(crate) fn render(config: &SlidesConfig, _options: &RenderOptions) -> String {
    let slides: String = config.slides.iter().map(render_slide).collect();

    format!(
        r#"<!-- new banner start -->
<main id="content" class="new-banner-section">
  <section id="wrapper">
    <div id="content-wrapper">
      {scripts}
      <!-- Banner sizes: desktop 2000x666, tablet 1000x666, mobile 600x750 -->
      <div id="main-banner-slider">
        <div class="_slider-container">
          <div class="_slider-inner">
            <div class="swiper _revamp" id="main-banner-swiper">
              <div class="swiper-wrapper">{slides}
              </div>
              <div class="swiper-button-next"></div>
              <div class="swiper-button-prev"></div>
              <span class="swiper-notification" aria-live="assertive" aria-atomic="true"></span>
            </div>
          </div>
        </div>
      </div>
      {init}
    </div>
  </section>
</main>
<!-- new banner end -->"#,
        scripts = SWIPER_SCRIPTS,
        slides = slides,
        init = SWIPER_INIT,
    )
}

pub(crate) fn extract(html: &str) -> SlidesConfig {
    let slides = markup::elements_with_class(html, "a", "swiper-slide")
        .into_iter()
        .map(|link| {
            let (link_url, utm) = utm::split_link(&link.tag.attribute("href").unwrap_or_default());
            let img = markup::tag_with_class(link.inner, "img", "slide-image")
                .or_else(|| markup::first_tag(link.inner, "img"));
            let desktop_image = img.as_ref().and_then(|i| i.attribute("src")).unwrap_or_default();
            let mobile_image = markup::first_tag(link.inner, "source")
                .and_then(|s| s.attribute("srcset"))
                .unwrap_or_else(|| desktop_image.clone());
            let subtitle = markup::text_with_class(link.inner, "div", "slide-title");

            Slide {
                link_url,
                desktop_image,
                mobile_image,
                alt_text: img
                    .as_ref()
                    .and_then(|i| i.attribute("alt"))
                    .or_else(|| link.tag.attribute("aria-label"))
                    .unwrap_or_default(),
                subtitle: Some(subtitle).filter(|s| !s.is_empty()),
                utm,
            }
        })
        .collect();

    SlidesConfig { slides }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utm::UtmParams;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trip() {
        let config = SlidesConfig {
            slides: vec![
                Slide {
                    link_url: "https://shop.example.com/new".to_string(),
                    desktop_image: "new-d.jpg".to_string(),
                    mobile_image: "new-m.jpg".to_string(),
                    alt_text: "New \"in\"".to_string(),
                    subtitle: Some("Just landed".to_string()),
                    utm: UtmParams::new("hp", "new-in"),
                },
                Slide {
                    link_url: "https://shop.example.com/sale".to_string(),
                    desktop_image: "sale-d.jpg".to_string(),
                    mobile_image: "sale-m.jpg".to_string(),
                    alt_text: "Sale".to_string(),
                    subtitle: None,
                    utm: UtmParams::default(),
                },
            ],
        };
        let html = render(&config, &RenderOptions::default());
        assert_eq!(extract(&html), config);
    }

    #[test]
    fn empty_banner_keeps_its_root() {
        let html = render(&SlidesConfig::default(), &RenderOptions::default());
        let root = markup::root_element(&html).unwrap();
        assert!(root.has_class("new-banner-section"));
        assert_eq!(extract(&html), SlidesConfig::default());
    }
}
