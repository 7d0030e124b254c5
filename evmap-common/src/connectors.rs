//! Connector-type normalization
//!
//! Station exports describe plug types with a loose vocabulary
//! (`"J1772 CCS"`, `"CHAdeMO|Tesla"`, `"J1772COMBO"`). Everything is folded
//! onto a small canonical tag set before it reaches storage, so the query
//! side only ever deals with exact tags.

/// Canonical connector vocabulary, keyed by substring patterns.
///
/// A token contributes the tag of every pattern that occurs inside it, not
/// just the first match. `J1772COMBO` therefore yields both `J1772` and
/// `CCS`, which mirrors how the source data labels combo plugs.
const CONNECTOR_PATTERNS: &[(&str, &str)] = &[
    ("J1772", "J1772"),
    ("J1772COMBO", "CCS"),
    ("CCS", "CCS"),
    ("CHADEMO", "CHADEMO"),
    ("TESLA", "TESLA/NACS"),
    ("NACS", "TESLA/NACS"),
];

/// Normalize a raw connector-type field into sorted canonical tags.
///
/// `,`, `|` and `/` are equivalent delimiters. Tokens are trimmed and
/// uppercased before matching; tokens matching no pattern are dropped.
/// The result is deduplicated and lexicographically sorted.
pub fn normalize(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    // Standardize splits
    let folded = raw.replace(['|', '/'], ",");

    let mut tags: Vec<String> = Vec::new();
    for token in folded.split(',') {
        let token = token.trim().to_uppercase();
        if token.is_empty() {
            continue;
        }
        for (pattern, tag) in CONNECTOR_PATTERNS {
            if token.contains(pattern) && !tags.iter().any(|t| t == tag) {
                tags.push((*tag).to_string());
            }
        }
    }

    tags.sort();
    tags
}

/// Normalize query-side connector filter values.
///
/// Accepts repeated parameters and/or comma-separated lists, trims and
/// uppercases each entry, and returns them deduplicated and sorted.
///
/// Unlike [`normalize`], values are NOT run through the pattern table:
/// filters are matched by exact equality against stored canonical tags, so
/// callers must already use canonical spellings (and `/` is not treated as
/// a delimiter here, keeping `TESLA/NACS` intact).
pub fn normalize_filter_values(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = values
        .iter()
        .flat_map(|value| value.split(','))
        .map(|part| part.trim().to_uppercase())
        .filter(|part| !part.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}
