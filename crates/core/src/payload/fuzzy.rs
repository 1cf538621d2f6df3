//! Fuzzy matching of free-form attribute values against a tracker's
//! enumerated allowed values (editions, disc regions, tags).

use once_cell::sync::Lazy;
use regex_lite::Regex;

static EDITION_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:edition|cut)\b|['’`\s]").expect("valid edition regex")
});

/// Normalize an edition name for comparison.
///
/// `"Director's Cut"` → `"director"`, `"Extended Edition"` → `"extended"`.
pub fn normalize_edition(value: &str) -> String {
    let folded = value.to_lowercase();
    let stripped = EDITION_NOISE.replace_all(&folded, "").into_owned();
    match stripped.strip_suffix('s') {
        Some(singular) => singular.to_string(),
        None => stripped,
    }
}

/// Find the allowed edition matching `value` by normalized containment.
pub fn match_edition<'a>(value: &str, allowed: &'a [String]) -> Option<&'a str> {
    let needle = normalize_edition(value);
    if needle.is_empty() {
        return None;
    }
    allowed
        .iter()
        .find(|candidate| {
            let hay = normalize_edition(candidate);
            !hay.is_empty() && (hay.contains(&needle) || needle.contains(&hay))
        })
        .map(String::as_str)
}

/// Case-insensitive match, exact first, then containment either way.
pub fn match_contains<'a>(value: &str, allowed: &'a [String]) -> Option<&'a str> {
    let needle = value.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    if let Some(exact) = match_exact(&needle, allowed) {
        return Some(exact);
    }
    allowed
        .iter()
        .find(|candidate| {
            let hay = candidate.to_lowercase();
            !hay.is_empty() && (hay.contains(&needle) || needle.contains(&hay))
        })
        .map(String::as_str)
}

/// Case-insensitive exact match.
pub fn match_exact<'a>(value: &str, allowed: &'a [String]) -> Option<&'a str> {
    let value = value.trim();
    allowed
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(value))
        .map(String::as_str)
}

/// Match a comma separated tag list, keeping the tracker's spelling and
/// dropping duplicates and unknown tags.
pub fn match_tags(value: &str, allowed: &[String]) -> Vec<String> {
    let mut matched: Vec<String> = Vec::new();
    for tag in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(hit) = match_contains(tag, allowed) {
            if !matched.iter().any(|m| m == hit) {
                matched.push(hit.to_string());
            }
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_edition() {
        assert_eq!(normalize_edition("Director's Cut"), "director");
        assert_eq!(normalize_edition("Directors Cut"), "director");
        assert_eq!(normalize_edition("Extended Edition"), "extended");
        assert_eq!(normalize_edition("Collector’s Edition"), "collector");
        assert_eq!(normalize_edition("Edition"), "");
        // Only whole words are noise
        assert_eq!(normalize_edition("Uncut"), "uncut");
        assert_eq!(normalize_edition("Cutting Room"), "cuttingroom");
    }

    #[test]
    fn test_match_edition_by_containment() {
        let allowed = list(&["Director's Cut", "Extended", "Theatrical", "Remastered"]);
        assert_eq!(match_edition("DIRECTORS CUT", &allowed), Some("Director's Cut"));
        assert_eq!(match_edition("Extended Edition", &allowed), Some("Extended"));
        assert_eq!(match_edition("4K Remastered", &allowed), Some("Remastered"));
        assert_eq!(match_edition("Criterion Collection", &allowed), None);
        assert_eq!(match_edition("Edition", &allowed), None);
    }

    #[test]
    fn test_match_edition_ignores_noise_inside_words() {
        let allowed = list(&["Director's Cut", "Unrated", "Extended"]);
        assert_eq!(match_edition("Uncut", &allowed), None);
        assert_eq!(match_edition("Final Cut", &allowed), None);
        assert_eq!(match_edition("Unrated Edition", &allowed), Some("Unrated"));
    }

    #[test]
    fn test_match_contains_prefers_exact() {
        let allowed = list(&["HDR10+", "HDR"]);
        assert_eq!(match_contains("hdr", &allowed), Some("HDR"));
        assert_eq!(match_contains("HDR10", &allowed), Some("HDR10+"));
        assert_eq!(match_contains("", &allowed), None);
    }

    #[test]
    fn test_match_region() {
        let allowed = list(&["USA", "GBR", "EUR"]);
        assert_eq!(match_contains("usa", &allowed), Some("USA"));
        assert_eq!(match_contains("JPN", &allowed), None);
    }

    #[test]
    fn test_match_tags() {
        let allowed = list(&["HDR", "Dolby Vision", "Atmos"]);
        assert_eq!(
            match_tags("hdr, dolby vision, DTS, HDR", &allowed),
            vec!["HDR".to_string(), "Dolby Vision".to_string()]
        );
        assert!(match_tags("", &allowed).is_empty());
    }
}
