use std::sync::LazyLock;

use chrono::{SecondsFormat, Utc};
use regex::Regex;

static SLUG_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug regex to compile"));

/// RFC 3339 UTC timestamp with millisecond precision, e.g. `2025-01-31T10:00:00.000Z`.
/// Fixed width, so lexical order is chronological order.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// "Infrastructure Pro per host" -> "infrastructure-pro-per-host"
pub fn slugify(text: &str) -> String {
    SLUG_SEPARATOR
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Product names coming off the vendor pages are not consistently cased
pub fn names_match(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}
