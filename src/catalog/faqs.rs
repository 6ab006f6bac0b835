use super::{RenderOptions, Template};
use crate::component::{ComponentConfig, ComponentKind, Faq, FaqsConfig};
use crate::markup;

const DEFAULT_TITLE: &str = "Frequently Asked Questions";

pub(super) fn template() -> Template {
    Template {
        kind: ComponentKind::FaqsSection,
        name: "FAQs Section",
        default_config: || ComponentConfig::FaqsSection(default_config()),
        render: |config, options| match config {
            ComponentConfig::FaqsSection(c) => render(c, options),
            _ => render(&default_config(), options),
        },
        extract: |html| ComponentConfig::FaqsSection(extract(html)),
    }
}

fn default_config() -> FaqsConfig {
    FaqsConfig {
        title: DEFAULT_TITLE.to_string(),
        faqs: vec![Faq::default()],
    }
}

pub(crate) fn render(config: &FaqsConfig, _options: &RenderOptions) -> String {
    let faqs: String = config
        .faqs
        .iter()
        .map(|faq| {
            format!(
                r#"
        <details class="question-wrapper">
          <summary class="question-text">
            {question}
          </summary>
          <div class="answer-wrapper">
            <p class="answer-text">
              {answer}
            </p>
          </div>
        </details>"#,
                question = faq.question,
                answer = faq.answer,
            )
        })
        .collect();

    format!(
        r#"<!--FAQs section Start-->
<div class="faqs-section-wrapper">
  <div class="faqs-section">
    <div class="faqs-header-wrapper">
      <h2 class="faqs-header">{title}</h2>
      <div class="questions-section">
        {faqs}
      </div>
    </div>
  </div>
</div>
<!--FAQs section End-->"#,
        title = config.title,
        faqs = faqs,
    )
}

pub(crate) fn extract(html: &str) -> FaqsConfig {
    let faqs = markup::elements_with_class(html, "details", "question-wrapper")
        .into_iter()
        .map(|details| Faq {
            question: markup::text_with_class(details.inner, "summary", "question-text"),
            answer: markup::text_with_class(details.inner, "p", "answer-text"),
        })
        .collect();

    FaqsConfig {
        title: markup::text_with_class(html, "h2", "faqs-header"),
        faqs,
    }
}
