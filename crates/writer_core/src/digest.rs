use std::sync::LazyLock;

use regex::Regex;

pub const DIGEST_MAX_CHARS: usize = 100;
pub const DIGEST_OVERFLOW_MARKER: &str = "...";

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static tag pattern"));

/// Derive an article summary from HTML: strip tags, keep the first
/// [`DIGEST_MAX_CHARS`] characters, trim, and mark truncation with `...`.
///
/// Length is counted in characters, not bytes, so CJK text is cut on a
/// character boundary.
pub fn derive_digest(html: &str) -> String {
    let text = TAG_PATTERN.replace_all(html, "");
    let head: String = text.chars().take(DIGEST_MAX_CHARS).collect();
    let mut digest = head.trim().to_string();
    if text.chars().nth(DIGEST_MAX_CHARS).is_some() {
        digest.push_str(DIGEST_OVERFLOW_MARKER);
    }
    digest
}
