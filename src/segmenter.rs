//! Split page markup into top-level component segments.
//!
//! Sentinel-wrapped regions come back exactly as rendered. Everything else
//! is scanned for balanced top-level elements, so markup pasted from
//! elsewhere still splits into one segment per root element.

use log::debug;
use regex::Regex;
use std::sync::OnceLock;

use crate::markup::{self, comment_end, matching_close, open_tag_at};

/// A top-level block of markup and where it started in the cleaned input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub raw: String,
    pub start: usize,
    /// Record id from the surrounding sentinel pair, if any
    pub sentinel_id: Option<String>,
}

/// Remove scripts, styles, stylesheet links and the export wrapper.
///
/// Segment offsets refer to this cleaned text.
pub fn clean(html: &str) -> String {
    markup::unwrap_body_fix(&markup::strip_non_component_elements(html))
}

/// Segments of `html` in document order.
pub fn segment(html: &str) -> Vec<Segment> {
    let cleaned = clean(html);

    let (mut segments, spans) = sentinel_segments(&cleaned);
    segments.extend(unmarked_segments(&cleaned, &spans));
    segments.sort_by_key(|s| s.start);

    debug!(
        "segmented {} bytes into {} segments ({} from sentinels)",
        cleaned.len(),
        segments.len(),
        spans.len()
    );
    for s in &segments {
        debug!("  segment at {} ({:?})", s.start, s.sentinel_id);
    }

    segments
}

/// Sentinel pairs with their content, plus the byte span each pair covers.
fn sentinel_segments(html: &str) -> (Vec<Segment>, Vec<(usize, usize)>) {
    static START_REGEX: OnceLock<Regex> = OnceLock::new();
    let start_re = START_REGEX.get_or_init(|| Regex::new(r"<!--\s*COMPONENT_START\s+(\S+?)\s*-->").unwrap());

    let mut segments = Vec::new();
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(caps) = start_re.captures(&html[cursor..]) {
        let (Some(whole), Some(id)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let start = cursor + whole.start();
        let content_start = cursor + whole.end();
        let id = id.as_str();

        let end_re = Regex::new(&format!(r"<!--\s*COMPONENT_END\s+{}\s*-->", regex::escape(id))).ok();
        match end_re.and_then(|re| re.find(&html[content_start..])) {
            Some(end) => {
                let end_start = content_start + end.start();
                let end_end = content_start + end.end();
                segments.push(Segment {
                    raw: html[content_start..end_start].trim().to_string(),
                    start,
                    sentinel_id: Some(id.to_string()),
                });
                spans.push((start, end_end));
                cursor = end_end;
            }
            // Unterminated marker: treat it as an ordinary comment.
            None => cursor = content_start,
        }
    }

    (segments, spans)
}

fn next_char(html: &str, i: usize) -> usize {
    i + html[i..].chars().next().map_or(1, char::len_utf8)
}

/// Balanced top-level elements outside the sentinel spans.
fn unmarked_segments(html: &str, spans: &[(usize, usize)]) -> Vec<Segment> {
    let bytes = html.as_bytes();
    let overlaps = |from: usize, to: usize| spans.iter().any(|&(s, e)| from < e && s < to);

    let mut segments = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if let Some(&(_, end)) = spans.iter().find(|&&(s, e)| s <= i && i < e) {
            i = end;
            continue;
        }
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if html[i..].starts_with("<!--") {
            match comment_end(html, i) {
                Some(end) => {
                    i = end;
                    continue;
                }
                None => break,
            }
        }

        match open_tag_at(html, i) {
            Some(tag) if tag.is_self_closing() => i = tag.end,
            Some(tag) => match matching_close(html, &tag) {
                Some((_, close_end)) if !overlaps(tag.start, close_end) => {
                    segments.push(Segment {
                        raw: html[tag.start..close_end].to_string(),
                        start: tag.start,
                        sentinel_id: None,
                    });
                    i = close_end;
                }
                _ => i = next_char(html, i),
            },
            None => i = next_char(html, i),
        }
    }

    segments
}
