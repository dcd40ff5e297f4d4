use regex::Regex;

/// Capture `group` of `regex` in `haystack`, trimmed
pub(crate) fn capture_group(regex: &Regex, haystack: &str, group: usize) -> Option<String> {
    regex
        .captures(haystack)?
        .get(group)
        .map(|capture| capture.as_str().trim().to_string())
}
