//! Text-level helpers over the builder's markup dialect.
//!
//! Nothing here builds a DOM: the scanners walk bytes looking for `<`, skip
//! comments, and respect quoted attribute values when locating the end of a
//! tag. Every index returned points at an ASCII byte, so slicing with it is
//! always on a char boundary.

use regex::Regex;
use std::sync::OnceLock;

/// Attribute carrying the owning record's id on each component root element
pub const COMPONENT_ID_ATTR: &str = "data-component-id";

/// An opening tag located in a markup string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag<'a> {
    /// Lowercased tag name
    pub name: String,
    /// Byte offset of `<`
    pub start: usize,
    /// Byte offset one past `>`
    pub end: usize,
    /// The whole tag text, `<` through `>`
    pub raw: &'a str,
}

impl<'a> OpenTag<'a> {
    pub fn is_self_closing(&self) -> bool {
        self.raw.trim_end_matches('>').trim_end().ends_with('/')
    }

    /// Value of attribute `name`, entity-decoded.
    pub fn attribute(&self, name: &str) -> Option<String> {
        attribute(self.raw, name)
    }

    /// Whitespace-separated tokens of the `class` attribute
    pub fn classes(&self) -> Vec<String> {
        self.attribute("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }
}

// ─── Escaping ────────────────────────────────────────────────────────────────

fn entity_regex() -> &'static Regex {
    static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();
    ENTITY_REGEX.get_or_init(|| Regex::new(r"&(quot|amp|#39|#x27);").unwrap())
}

/// Escape a value for a double-quoted attribute.
///
/// A bare `&` stays as is (tracked links stay readable); only an `&` that
/// would start one of the entities [`decode_attr`] understands is escaped.
pub fn escape_attr(value: &str) -> String {
    entity_regex().replace_all(value, "&amp;$1;").replace('"', "&quot;")
}

/// Escape a value for a single-quoted JS string inside a double-quoted
/// attribute (Alpine `x-data`, `@click`, `x-show`).
pub fn escape_js(value: &str) -> String {
    escape_attr(&value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Reverse the entity escapes an attribute value may carry, in one pass.
pub fn decode_attr(value: &str) -> String {
    entity_regex()
        .replace_all(value, |caps: &regex::Captures| match &caps[1] {
            "quot" => "\"",
            "amp" => "&",
            _ => "'",
        })
        .into_owned()
}

/// Reverse the backslash escapes of [`escape_js`] on a value that has
/// already been entity-decoded (as [`attribute`] returns it).
pub fn unescape_js(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

// ─── Tag scanning ────────────────────────────────────────────────────────────

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

/// Index one past the `>` closing the tag that starts at `start`, skipping
/// `>` characters inside quoted attribute values.
pub(crate) fn tag_end(html: &str, start: usize) -> Option<usize> {
    let bytes = html.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = start + 1;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i + 1),
            None => {}
        }
        i += 1;
    }
    None
}

/// Read the tag name starting at `from`, returning it lowercased with the
/// index one past its last byte.
fn tag_name(html: &str, from: usize) -> (String, usize) {
    let bytes = html.as_bytes();
    let mut j = from;
    while j < bytes.len() && is_name_byte(bytes[j]) {
        j += 1;
    }
    (html[from..j].to_ascii_lowercase(), j)
}

/// Index one past the end of the comment starting at `start`, if closed.
pub(crate) fn comment_end(html: &str, start: usize) -> Option<usize> {
    html[start + 4..].find("-->").map(|p| start + 4 + p + 3)
}

/// Parse the opening tag at `start` (which must point at `<` followed by a
/// letter).
pub(crate) fn open_tag_at(html: &str, start: usize) -> Option<OpenTag<'_>> {
    let bytes = html.as_bytes();
    if bytes.get(start) != Some(&b'<') || !bytes.get(start + 1).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    let (name, _) = tag_name(html, start + 1);
    let end = tag_end(html, start)?;
    Some(OpenTag {
        name,
        start,
        end,
        raw: &html[start..end],
    })
}

/// The first element of `html`, skipping whitespace, text, comments and
/// doctype declarations.
pub fn root_element(html: &str) -> Option<OpenTag<'_>> {
    next_open_tag(html, 0)
}

/// The next opening tag at or after byte offset `from`.
pub(crate) fn next_open_tag(html: &str, from: usize) -> Option<OpenTag<'_>> {
    let bytes = html.as_bytes();
    let mut i = from;

    while i < bytes.len() {
        i += html[i..].find('<')?;

        if html[i..].starts_with("<!--") {
            i = comment_end(html, i)?;
        } else if html[i..].starts_with("<!") {
            i = tag_end(html, i)?;
        } else if let Some(tag) = open_tag_at(html, i) {
            return Some(tag);
        } else {
            i += 1;
        }
    }
    None
}

/// Locate the closing tag balancing the element opened at `open.start`.
///
/// Only tags with the same name change the depth; self-closing tags and
/// comments are ignored. Returns `(close_start, close_end)`.
pub(crate) fn matching_close(html: &str, open: &OpenTag<'_>) -> Option<(usize, usize)> {
    let bytes = html.as_bytes();
    let mut depth = 1usize;
    let mut i = open.end;

    while i < bytes.len() {
        let offset = html[i..].find('<')?;
        i += offset;

        if html[i..].starts_with("<!--") {
            i = comment_end(html, i)?;
            continue;
        }

        if html[i..].starts_with("</") {
            let (name, _) = tag_name(html, i + 2);
            let end = tag_end(html, i)?;
            if name == open.name {
                depth -= 1;
                if depth == 0 {
                    return Some((i, end));
                }
            }
            i = end;
            continue;
        }

        match open_tag_at(html, i) {
            Some(tag) => {
                if tag.name == open.name && !tag.is_self_closing() {
                    depth += 1;
                }
                i = tag.end;
            }
            None => i += 1,
        }
    }
    None
}

// ─── Element queries ─────────────────────────────────────────────────────────

/// A balanced element: its opening tag and the markup between the tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    pub tag: OpenTag<'a>,
    pub inner: &'a str,
}

impl<'a> Element<'a> {
    /// Inner markup with surrounding whitespace removed
    pub fn text(&self) -> String {
        self.inner.trim().to_string()
    }
}

/// Every opening tag in document order, comments skipped.
pub(crate) fn open_tags(html: &str) -> Vec<OpenTag<'_>> {
    let mut tags = Vec::new();
    let mut i = 0;
    while let Some(tag) = next_open_tag(html, i) {
        i = tag.end;
        tags.push(tag);
    }
    tags
}

/// First opening tag named `name` whose class list contains `class`.
pub(crate) fn tag_with_class<'a>(html: &'a str, name: &str, class: &str) -> Option<OpenTag<'a>> {
    open_tags(html)
        .into_iter()
        .find(|t| t.name == name && t.has_class(class))
}

/// First opening tag named `name`.
pub(crate) fn first_tag<'a>(html: &'a str, name: &str) -> Option<OpenTag<'a>> {
    open_tags(html).into_iter().find(|t| t.name == name)
}

/// Balanced elements whose opening tag satisfies `pred`, in document order.
///
/// A match nested inside an earlier match is not reported separately;
/// unbalanced candidates are skipped.
pub(crate) fn elements_where<'a>(html: &'a str, pred: impl Fn(&OpenTag<'a>) -> bool) -> Vec<Element<'a>> {
    let mut found = Vec::new();
    let mut i = 0;

    while let Some(tag) = next_open_tag(html, i) {
        if !pred(&tag) || tag.is_self_closing() {
            i = tag.end;
            continue;
        }
        match matching_close(html, &tag) {
            Some((close_start, close_end)) => {
                let inner = &html[tag.end..close_start];
                found.push(Element { tag, inner });
                i = close_end;
            }
            None => i = tag.end,
        }
    }
    found
}

/// Balanced `name` elements carrying class `class`.
pub(crate) fn elements_with_class<'a>(html: &'a str, name: &str, class: &str) -> Vec<Element<'a>> {
    elements_where(html, |t| t.name == name && t.has_class(class))
}

/// First balanced `name` element carrying class `class`.
pub(crate) fn element_with_class<'a>(html: &'a str, name: &str, class: &str) -> Option<Element<'a>> {
    elements_with_class(html, name, class).into_iter().next()
}

/// Trimmed inner markup of the first `name.class` element, or empty.
pub(crate) fn text_with_class(html: &str, name: &str, class: &str) -> String {
    element_with_class(html, name, class)
        .map(|e| e.text())
        .unwrap_or_default()
}

/// Trimmed inner markup of the first `name#id` element, or empty.
pub(crate) fn text_with_id(html: &str, name: &str, id: &str) -> String {
    elements_where(html, |t| t.name == name && t.attribute("id").as_deref() == Some(id))
        .into_iter()
        .next()
        .map(|e| e.text())
        .unwrap_or_default()
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Value of attribute `name` in a raw opening tag, entity-decoded.
pub fn attribute(tag: &str, name: &str) -> Option<String> {
    static ATTR_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = ATTR_REGEX.get_or_init(|| {
        Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#).unwrap()
    });

    // Skip the tag name itself
    let inner = tag.trim_start_matches('<');
    let after_name = inner
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .map(|p| &inner[p..])
        .unwrap_or("");

    re.captures_iter(after_name)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))
        .map(|caps| {
            caps.get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_attr(m.as_str()))
                .unwrap_or_default()
        })
}

/// Add `data-component-id="{id}"` to the root element of `html`.
///
/// Markup whose root already carries the attribute, or that has no element
/// at all, is returned unchanged, so applying this twice is the same as
/// applying it once.
pub fn inject_component_id(html: &str, id: &str) -> String {
    let Some(root) = root_element(html) else {
        return html.to_string();
    };
    if root.attribute(COMPONENT_ID_ATTR).is_some() {
        return html.to_string();
    }

    let body = root.raw.trim_end_matches('>');
    let (body, closing) = match body.strip_suffix('/') {
        Some(b) => (b.trim_end(), " />"),
        None => (body, ">"),
    };

    let mut out = String::with_capacity(html.len() + id.len() + 24);
    out.push_str(&html[..root.start]);
    out.push_str(body);
    out.push_str(&format!(" {}=\"{}\"", COMPONENT_ID_ATTR, escape_attr(id)));
    out.push_str(closing);
    out.push_str(&html[root.end..]);
    out
}

/// Remove `data-component-id` from the root element of `html`.
pub fn strip_component_id(html: &str) -> String {
    static ID_ATTR_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = ID_ATTR_REGEX
        .get_or_init(|| Regex::new(r#"\s+data-component-id\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).unwrap());

    let Some(root) = root_element(html) else {
        return html.to_string();
    };
    let cleaned = re.replace(root.raw, "");
    format!("{}{}{}", &html[..root.start], cleaned, &html[root.end..])
}

// ─── Cleanup of pasted markup ────────────────────────────────────────────────

/// Remove `<script>`, `<style>` and stylesheet `<link>` elements.
pub fn strip_non_component_elements(html: &str) -> String {
    static SCRIPT_REGEX: OnceLock<Regex> = OnceLock::new();
    static STYLE_REGEX: OnceLock<Regex> = OnceLock::new();
    static LINK_REGEX: OnceLock<Regex> = OnceLock::new();

    let script = SCRIPT_REGEX.get_or_init(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
    let style = STYLE_REGEX.get_or_init(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
    let link = LINK_REGEX
        .get_or_init(|| Regex::new(r#"(?i)<link\b[^>]*\brel\s*=\s*["']?stylesheet["']?[^>]*>"#).unwrap());

    let html = script.replace_all(html, "");
    let html = style.replace_all(&html, "");
    link.replace_all(&html, "").into_owned()
}

/// Id of the wrapper element the exporter puts around the page body
pub const BODY_WRAPPER_ID: &str = "ZA_body_fix";

/// Remove the `<div id="ZA_body_fix">` export wrapper, keeping its content.
///
/// Attribute order and quoting of the wrapper do not matter. Markup without
/// a (balanced) wrapper is only trimmed.
pub fn unwrap_body_fix(html: &str) -> String {
    static WRAPPER_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = WRAPPER_REGEX.get_or_init(|| {
        Regex::new(r#"(?i)<div\b[^>]*\bid\s*=\s*["']?ZA_body_fix["']?[^>]*>"#).unwrap()
    });

    let unwrapped = re.find(html).and_then(|m| {
        let open = open_tag_at(html, m.start())?;
        let (close_start, close_end) = matching_close(html, &open)?;
        let mut out = String::with_capacity(html.len());
        out.push_str(&html[..open.start]);
        out.push_str(&html[open.end..close_start]);
        out.push_str(&html[close_end..]);
        Some(out)
    });

    match unwrapped {
        Some(out) => out.trim().to_string(),
        None => html.trim().to_string(),
    }
}

// ─── Regex capture helpers ───────────────────────────────────────────────────

/// First capture group of `re` in `text`, or an empty string.
pub(crate) fn capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Like [`capture`], trimmed.
pub(crate) fn capture_trimmed(re: &Regex, text: &str) -> String {
    capture(re, text).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_element_skips_comments() {
        let html = "<!--Hero Banner Start-->\n<div class=\"hero-banner-wrapper\">x</div>";
        let root = root_element(html).unwrap();
        assert_eq!(root.name, "div");
        assert!(root.has_class("hero-banner-wrapper"));
    }

    #[test]
    fn tag_end_respects_quotes() {
        let html = r#"<div x-show="product.percentoff > 0" class="a">"#;
        assert_eq!(tag_end(html, 0), Some(html.len()));
    }

    #[test]
    fn attributes_in_any_quoting() {
        let tag = r#"<img src='a.jpg' alt="Say &quot;hi&quot;" loading=lazy />"#;
        assert_eq!(attribute(tag, "src").as_deref(), Some("a.jpg"));
        assert_eq!(attribute(tag, "alt").as_deref(), Some("Say \"hi\""));
        assert_eq!(attribute(tag, "loading").as_deref(), Some("lazy"));
        assert_eq!(attribute(tag, "class"), None);
    }

    #[test]
    fn literal_entities_survive_attribute_escaping() {
        for value in ["Tom &amp; Jerry", "a&quot;b", "it&#39;s", "plain & simple", "say \"hi\""] {
            let tag = format!(r#"<img alt="{}">"#, escape_attr(value));
            assert_eq!(attribute(&tag, "alt").as_deref(), Some(value), "{}", tag);
        }
        assert_eq!(escape_attr("https://x.com?a=1&b=2"), "https://x.com?a=1&b=2");
        assert_eq!(decode_attr("&amp;quot; &quot;"), "&quot; \"");
    }

    #[test]
    fn inject_is_idempotent() {
        let html = "<!-- Swiper -->\n<div class=\"swiper mySwiper\"><a href=\"#\"></a></div>";
        let once = inject_component_id(html, "swiper-1");
        assert!(once.contains(r#"<div class="swiper mySwiper" data-component-id="swiper-1">"#));
        assert_eq!(inject_component_id(&once, "swiper-1"), once);
        assert_eq!(inject_component_id(&once, "other"), once);
    }

    #[test]
    fn inject_into_self_closing_root() {
        assert_eq!(
            inject_component_id("<img src=\"a.jpg\" />", "c1"),
            "<img src=\"a.jpg\" data-component-id=\"c1\" />"
        );
        assert_eq!(inject_component_id("plain text", "c1"), "plain text");
    }

    #[test]
    fn matching_close_counts_same_name_only() {
        let html = "<div><span><div></div></span><div/></div><p></p>";
        let open = root_element(html).unwrap();
        let (start, end) = matching_close(html, &open).unwrap();
        assert_eq!(&html[start..end], "</div>");
        assert_eq!(end, html.find("<p>").unwrap());
    }

    #[test]
    fn strips_scripts_styles_and_stylesheets() {
        let html = r#"<script src="a.js"></script><div>a</div><STYLE>p{}</STYLE><link rel="stylesheet" href="x.css" /><script>if (a < b) {}</script>"#;
        assert_eq!(strip_non_component_elements(html), "<div>a</div>");
    }

    #[test]
    fn unwraps_export_wrapper() {
        let html = "<div class='page' id='ZA_body_fix'>\n<div>a</div>\n<div>b</div>\n</div>\n<link rel=\"stylesheet\" href=\"x\" />";
        assert_eq!(
            unwrap_body_fix(html),
            "<div>a</div>\n<div>b</div>\n\n<link rel=\"stylesheet\" href=\"x\" />"
        );
        assert_eq!(unwrap_body_fix("  <p>x</p> "), "<p>x</p>");
    }

    #[test]
    fn js_escaping_round_trips() {
        let value = r#"Men's "Pro" \ kit"#;
        assert_eq!(unescape_js(&decode_attr(&escape_js(value))), value);
    }

    #[test]
    fn strip_reverses_inject() {
        let html = "<!-- x -->\n<section class=\"a\"><div data-component-id=\"inner\"></div></section>";
        let injected = inject_component_id(html, "c-1");
        assert_eq!(strip_component_id(&injected), html);
    }

    #[test]
    fn elements_skip_nested_matches() {
        let html = r#"<ul><li class="item">a<ul><li class="item">b</li></ul></li><li class="item">c</li></ul>"#;
        let items = elements_with_class(html, "li", "item");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].inner, r#"a<ul><li class="item">b</li></ul>"#);
        assert_eq!(items[1].text(), "c");
    }

    #[test]
    fn text_lookup_by_class_and_id() {
        let html = "<div><h2 id=\"showroom-title\">\n  Deals\n</h2><p class=\"lead big\">Hi</p></div>";
        assert_eq!(text_with_id(html, "h2", "showroom-title"), "Deals");
        assert_eq!(text_with_class(html, "p", "big"), "Hi");
        assert_eq!(text_with_class(html, "p", "missing"), "");
    }
}
