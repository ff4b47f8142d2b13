use std::cmp::Ordering;

use semver::Version;

use crate::documentation::types::VersionRecord;

/// Parse a version id into a semver::Version, normalizing partial versions.
///
/// Strips a leading `v`/`V` and pads partial versions with zeros.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "v1.2" -> Version(1, 2, 0)
/// - "1.2.3-beta.1" -> Version(1, 2, 3, pre: beta.1)
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version);
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Compare two ids by version precedence, highest first.
///
/// Semver ids come before anything unparseable. Build metadata is ignored,
/// and two unparseable ids compare equal so a stable sort keeps their order.
pub fn compare_precedence_desc(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(a), Some(b)) => b.cmp_precedence(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort records by descending version precedence, keeping service order on ties
pub fn sort_by_precedence(records: &mut [VersionRecord]) {
    records.sort_by(|a, b| compare_precedence_desc(&a.id, &b.id));
}
