//! Filesystem-safe slugs for region names.

/// Slug substituted when a name has no usable characters left.
pub const FALLBACK_SLUG: &str = "unknown_region";

/// Turn a raw region name into a deterministic, filesystem-safe slug.
///
/// Surrounding whitespace is trimmed, ASCII apostrophes are dropped, every
/// maximal run of characters outside `[A-Za-z0-9_]` becomes a single
/// underscore, the result is lowercased and stripped of leading/trailing
/// underscores. An empty result yields [`FALLBACK_SLUG`].
///
/// Distinct names may collide on the same slug; the writer's last-write-wins
/// behavior on collisions is a documented limitation.
pub fn slugify(raw: &str) -> String {
    let cleaned = raw.trim().replace('\'', "");

    let mut slug = String::with_capacity(cleaned.len());
    let mut pending_separator = false;
    for ch in cleaned.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}
