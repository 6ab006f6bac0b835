//! Campaign-tracking query parameters for outbound links.
//!
//! Links only ever carry UTM parameters when both a source and a campaign
//! name are filled in. The campaign name is wrapped in the storefront's fixed
//! naming template `eg_nc-{campaign}_f-cv_` and `utm_medium` is always
//! `decathlon`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const UTM_SOURCE: &str = "utm_source";
pub const UTM_MEDIUM: &str = "utm_medium";
pub const UTM_CAMPAIGN: &str = "utm_campaign";

/// Fixed value of `utm_medium` on every tracked link
pub const MEDIUM_VALUE: &str = "decathlon";

const CAMPAIGN_PREFIX: &str = "eg_nc-";
const CAMPAIGN_SUFFIX: &str = "_f-cv_";

/// The editable half of a tracked link: source plus bare campaign name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtmParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,
}

impl UtmParams {
    pub fn new(source: impl Into<String>, campaign: impl Into<String>) -> Self {
        Self {
            utm_source: Some(source.into()),
            campaign_name: Some(campaign.into()),
        }
    }

    /// True when source and campaign are both filled in or both blank.
    pub fn is_coupled(&self) -> bool {
        filled(self.utm_source.as_deref()).is_some() == filled(self.campaign_name.as_deref()).is_some()
    }

    /// True when neither field carries a value
    pub fn is_empty(&self) -> bool {
        filled(self.utm_source.as_deref()).is_none() && filled(self.campaign_name.as_deref()).is_none()
    }

    /// Append these parameters to `url` (see [`append`]).
    pub fn apply(&self, url: &str) -> String {
        append(url, self.utm_source.as_deref(), self.campaign_name.as_deref())
    }
}

fn filled(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Build the UTM query string, including the leading `?`.
///
/// Returns an empty string unless both `source` and `campaign` are non-empty
/// after trimming.
pub fn build(source: Option<&str>, campaign: Option<&str>) -> String {
    let (Some(source), Some(campaign)) = (filled(source), filled(campaign)) else {
        return String::new();
    };

    let wrapped = format!("{}{}{}", CAMPAIGN_PREFIX, campaign, CAMPAIGN_SUFFIX);
    let pairs = [
        (UTM_SOURCE, source),
        (UTM_MEDIUM, MEDIUM_VALUE),
        (UTM_CAMPAIGN, wrapped.as_str()),
    ];

    match serde_urlencoded::to_string(pairs) {
        Ok(query) => format!("?{}", query),
        Err(_) => String::new(),
    }
}

/// Append UTM parameters to `url`, joining with `&` when the url already
/// has a query string and keeping any `#fragment` last. Returns `url`
/// unchanged when it is empty or the parameters are incomplete.
pub fn append(url: &str, source: Option<&str>, campaign: Option<&str>) -> String {
    if url.is_empty() {
        return String::new();
    }

    let query = build(source, campaign);
    if query.is_empty() {
        return url.to_string();
    }

    let (base, existing, fragment) = split_url(url);
    let mut out = base.to_string();
    match existing.filter(|q| !q.is_empty()) {
        Some(existing) => {
            out.push('?');
            out.push_str(existing);
            out.push('&');
            out.push_str(&query[1..]);
        }
        None => out.push_str(&query),
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Recover source and bare campaign name from a tracked url.
///
/// A `utm_campaign` value that does not match `eg_nc-{campaign}_f-cv_`
/// exactly yields no campaign.
pub fn parse(url: &str) -> UtmParams {
    let (_, query, _) = split_url(url);
    let pairs = query_pairs(query);

    let utm_source = pairs
        .iter()
        .find(|(k, _)| k == UTM_SOURCE)
        .map(|(_, v)| v.clone())
        .filter(|v| !v.is_empty());

    static CAMPAIGN_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = CAMPAIGN_REGEX.get_or_init(|| Regex::new(r"^eg_nc-(.+?)_f-cv_$").unwrap());

    let campaign_name = pairs
        .iter()
        .find(|(k, _)| k == UTM_CAMPAIGN)
        .and_then(|(_, v)| re.captures(v))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    UtmParams {
        utm_source,
        campaign_name,
    }
}

/// Remove `utm_source`, `utm_medium` and `utm_campaign` from `url`,
/// keeping every other query parameter (as written) and any fragment.
pub fn strip(url: &str) -> String {
    let (base, query, fragment) = split_url(url);
    let Some(query) = query else {
        return url.to_string();
    };

    let parts: Vec<&str> = query.split('&').filter(|part| !part.is_empty()).collect();
    if !parts.iter().any(|part| is_utm_pair(part)) {
        return url.to_string();
    }

    let remaining: Vec<&str> = parts.into_iter().filter(|part| !is_utm_pair(part)).collect();

    let mut out = base.to_string();
    if !remaining.is_empty() {
        out.push('?');
        out.push_str(&remaining.join("&"));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Split a tracked href into the stored link and its UTM parameters.
pub fn split_link(href: &str) -> (String, UtmParams) {
    (strip(href), parse(href))
}

fn is_utm_key(key: &str) -> bool {
    matches!(key, UTM_SOURCE | UTM_MEDIUM | UTM_CAMPAIGN)
}

/// Whether one raw `key=value` query part carries a UTM key.
fn is_utm_pair(part: &str) -> bool {
    serde_urlencoded::from_str::<Vec<(String, String)>>(part)
        .ok()
        .and_then(|pairs| pairs.into_iter().next())
        .is_some_and(|(key, _)| is_utm_key(&key))
}

fn query_pairs(query: Option<&str>) -> Vec<(String, String)> {
    query
        .filter(|q| !q.is_empty())
        .map(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).unwrap_or_default())
        .unwrap_or_default()
}

/// `(base, query, fragment)` without the `?` and `#` separators.
fn split_url(url: &str) -> (&str, Option<&str>, Option<&str>) {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    match rest.split_once('?') {
        Some((base, query)) => (base, Some(query), fragment),
        None => (rest, None, fragment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_both_fields() {
        assert_eq!(build(Some("Src"), None), "");
        assert_eq!(build(None, Some("camp")), "");
        assert_eq!(build(Some("  "), Some("camp")), "");
        assert_eq!(
            build(Some("Src"), Some("camp")),
            "?utm_source=Src&utm_medium=decathlon&utm_campaign=eg_nc-camp_f-cv_"
        );
    }

    #[test]
    fn build_trims_values() {
        assert_eq!(
            build(Some(" Src "), Some(" camp ")),
            "?utm_source=Src&utm_medium=decathlon&utm_campaign=eg_nc-camp_f-cv_"
        );
    }

    #[test]
    fn append_merges_existing_query() {
        assert_eq!(
            append("https://x.com/p?sort=asc", Some("Src"), Some("camp")),
            "https://x.com/p?sort=asc&utm_source=Src&utm_medium=decathlon&utm_campaign=eg_nc-camp_f-cv_"
        );
    }

    #[test]
    fn append_leaves_url_alone_without_pair() {
        assert_eq!(append("https://x.com", Some("Src"), None), "https://x.com");
        assert_eq!(append("https://x.com", None, None), "https://x.com");
        assert_eq!(append("", Some("Src"), Some("camp")), "");
    }

    #[test]
    fn parse_inverts_append() {
        let url = append("https://x.com/p?sort=asc", Some("Spring Sale"), Some("running 2024"));
        assert_eq!(parse(&url), UtmParams::new("Spring Sale", "running 2024"));
    }

    #[test]
    fn parse_rejects_unwrapped_campaign() {
        let params = parse("https://x.com?utm_source=a&utm_medium=decathlon&utm_campaign=summer");
        assert_eq!(params.utm_source.as_deref(), Some("a"));
        assert_eq!(params.campaign_name, None);
    }

    #[test]
    fn parse_without_query_is_empty() {
        assert!(parse("https://x.com/path").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn strip_keeps_other_parameters() {
        let url = "https://x.com/p?sort=asc&utm_source=a&utm_medium=decathlon&utm_campaign=eg_nc-b_f-cv_#top";
        assert_eq!(strip(url), "https://x.com/p?sort=asc#top");
    }

    #[test]
    fn strip_drops_empty_query() {
        let url = append("https://x.com/p", Some("a"), Some("b"));
        assert_eq!(strip(&url), "https://x.com/p");
    }

    #[test]
    fn strip_without_utm_is_identity() {
        assert_eq!(strip("https://x.com/p?q=a%20b"), "https://x.com/p?q=a%20b");
    }

    #[test]
    fn append_keeps_fragment_last() {
        let url = append("https://x.com/p#top", Some("Src"), Some("camp"));
        assert_eq!(
            url,
            "https://x.com/p?utm_source=Src&utm_medium=decathlon&utm_campaign=eg_nc-camp_f-cv_#top"
        );
        assert_eq!(parse(&url), UtmParams::new("Src", "camp"));
        assert_eq!(strip(&url), "https://x.com/p#top");

        let url = append("https://x.com/p?sort=asc#reviews", Some("Src"), Some("camp"));
        assert_eq!(split_link(&url), ("https://x.com/p?sort=asc#reviews".to_string(), UtmParams::new("Src", "camp")));
    }

    #[test]
    fn strip_keeps_other_parameters_as_written() {
        let link = "https://x.com/c?sort=price,asc&f=size:42&q=a%20b";
        let url = append(link, Some("Src"), Some("camp"));
        assert_eq!(strip(&url), link);
    }

    #[test]
    fn coupling() {
        assert!(UtmParams::default().is_coupled());
        assert!(UtmParams::new("a", "b").is_coupled());
        let half = UtmParams {
            utm_source: Some("a".to_string()),
            campaign_name: Some(" ".to_string()),
        };
        assert!(!half.is_coupled());
    }
}
