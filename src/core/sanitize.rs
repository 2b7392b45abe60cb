// src/core/sanitize.rs

/// ASCII-only lowercase. Byte offsets stay valid against the input.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Scraped descriptions still carry the odd HTML entity.
pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&rsquo;", "’")
        .replace("&quot;", "\"")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Drop one leading "the " (any case). "theKlahoose" is left for the
/// normalization table.
pub fn strip_leading_the(s: &str) -> &str {
    let t = s.trim_start();
    match t.get(..4) {
        Some(head) if head.eq_ignore_ascii_case("the ") => t[4..].trim_start(),
        _ => t,
    }
}

pub fn strip_trailing_period(s: &str) -> &str {
    s.trim_end().trim_end_matches('.').trim_end()
}

/// Collapse whitespace, strip a leading "the" and a trailing period.
pub fn clean_phrase(raw: &str) -> String {
    let ws = normalize_ws(raw);
    s!(strip_trailing_period(strip_leading_the(&ws)))
}

/// First `max` chars, with "..." when cut.
pub fn excerpt(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => join!(&s[..cut], "..."),
        None => s!(s),
    }
}
