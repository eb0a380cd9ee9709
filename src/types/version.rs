// ABOUTME: Image tag versions: semver, integer timestamps, and opaque custom tags.
// ABOUTME: Defines the cross-kind comparison policy and newest-tag selection.

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

/// Sentinel tag that outranks every other tag.
pub const LATEST: &str = "latest";

static SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)").expect("semver pattern is valid"));

/// The shape of a tag, derived from its raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionKind {
    /// `1.2.3` or `v1.2.3`, trailing suffix ignored.
    Semver,
    /// All decimal digits, e.g. a build timestamp like `1746190043`.
    Timestamp,
    /// Anything else (`stable`, `latest`, `main-abc123`).
    Custom,
}

impl fmt::Display for VersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionKind::Semver => write!(f, "semver"),
            VersionKind::Timestamp => write!(f, "timestamp"),
            VersionKind::Custom => write!(f, "custom"),
        }
    }
}

/// A parsed image tag.
///
/// Parsing never fails: tags that are neither semver nor timestamps become
/// [`VersionKind::Custom`]. Equality and hashing only consider the raw tag.
#[derive(Debug, Clone)]
pub struct Version {
    kind: VersionKind,
    components: Vec<String>,
    raw: String,
}

impl Version {
    pub fn parse(raw: &str) -> Self {
        let (kind, components) = classify(raw);
        Self {
            kind,
            components,
            raw: raw.to_string(),
        }
    }

    pub fn kind(&self) -> VersionKind {
        self.kind
    }

    /// Numeric components as decimal digits without leading zeros.
    ///
    /// Kept as text so tags of any length keep their kind.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_latest(&self) -> bool {
        self.raw == LATEST
    }

    /// Compare two tags under the release ordering policy.
    ///
    /// - identical tags are equal
    /// - `latest` is newer than everything else
    /// - tags of the same kind compare component-wise
    /// - timestamps are newer than semver tags, whatever their magnitude
    /// - any other mix falls back to plain string order
    ///
    /// The relation is not transitive across all kind combinations, so it is
    /// deliberately not exposed as `Ord`.
    pub fn compare(&self, other: &Version) -> Ordering {
        if self.raw == other.raw {
            return Ordering::Equal;
        }

        match (self.is_latest(), other.is_latest()) {
            (true, _) => return Ordering::Greater,
            (_, true) => return Ordering::Less,
            _ => {}
        }

        match (self.kind, other.kind) {
            (a, b) if a == b => compare_components(&self.components, &other.components),
            (VersionKind::Semver, VersionKind::Timestamp) => Ordering::Less,
            (VersionKind::Timestamp, VersionKind::Semver) => Ordering::Greater,
            _ => self.raw.cmp(&other.raw),
        }
    }

    pub fn is_newer_than(&self, other: &Version) -> bool {
        self.compare(other) == Ordering::Greater
    }
}

fn classify(raw: &str) -> (VersionKind, Vec<String>) {
    if let Some(caps) = SEMVER.captures(raw) {
        let parts = (1..=3)
            .filter_map(|i| caps.get(i))
            .map(|m| normalize_digits(m.as_str()))
            .collect();
        return (VersionKind::Semver, parts);
    }

    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return (VersionKind::Timestamp, vec![normalize_digits(raw)]);
    }

    (VersionKind::Custom, Vec::new())
}

fn normalize_digits(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Numeric order over normalized digit strings: shorter is smaller.
fn compare_number(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_components(a: &[String], b: &[String]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match compare_number(x, y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Compare two raw tags. See [`Version::compare`].
pub fn compare(a: &str, b: &str) -> Ordering {
    Version::parse(a).compare(&Version::parse(b))
}

/// Pick the newest tag with a single left-to-right pass.
///
/// A candidate only replaces the running maximum when it is strictly newer,
/// so the earliest of several equal tags wins.
pub fn newest<'a, I>(tags: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    tags.into_iter()
        .map(|t| (t, Version::parse(t)))
        .reduce(|best, candidate| {
            if candidate.1.is_newer_than(&best.1) {
                candidate
            } else {
                best
            }
        })
        .map(|(t, _)| t)
}

/// Order tags newest first for display.
///
/// Stable insertion: each tag is placed before the first already-ranked tag it
/// is strictly newer than. Use [`newest`] to select a maximum.
pub fn rank_newest_first<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut ranked: Vec<Version> = Vec::with_capacity(tags.len());
    for tag in tags {
        let version = Version::parse(tag.as_ref());
        let pos = ranked
            .iter()
            .position(|existing| version.is_newer_than(existing))
            .unwrap_or(ranked.len());
        ranked.insert(pos, version);
    }
    ranked.into_iter().map(|v| v.raw).collect()
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Version::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_semver_with_and_without_prefix() {
        assert_eq!(Version::parse("1.2.3").kind(), VersionKind::Semver);
        assert_eq!(Version::parse("v1.2.3").kind(), VersionKind::Semver);
        assert_eq!(Version::parse("v1.2.3").components(), &["1", "2", "3"]);
    }

    #[test]
    fn semver_suffix_is_ignored() {
        let v = Version::parse("2.0.1-rc.1");
        assert_eq!(v.kind(), VersionKind::Semver);
        assert_eq!(v.components(), &["2", "0", "1"]);
    }

    #[test]
    fn classifies_timestamps() {
        let v = Version::parse("1746190043");
        assert_eq!(v.kind(), VersionKind::Timestamp);
        assert_eq!(v.components(), &["1746190043"]);
        assert_eq!(Version::parse("1.2.3").kind(), VersionKind::Semver);
    }

    #[test]
    fn everything_else_is_custom() {
        for tag in ["latest", "stable", "", "1.2", "v1", "12ab"] {
            let v = Version::parse(tag);
            assert_eq!(v.kind(), VersionKind::Custom, "tag {tag:?}");
            assert!(v.components().is_empty());
        }
    }

    #[test]
    fn digit_strings_beyond_u64_keep_their_kind() {
        let stamp = "100000000000000000000";
        assert_eq!(Version::parse(stamp).kind(), VersionKind::Timestamp);
        assert_eq!(compare(stamp, "2"), Ordering::Greater);
        assert_eq!(compare(stamp, "99999999999999999999"), Ordering::Greater);
        assert_eq!(compare("9.0.0", stamp), Ordering::Less);

        let wide = Version::parse("99999999999999999999.0.0");
        assert_eq!(wide.kind(), VersionKind::Semver);
        assert_eq!(compare("99999999999999999999.0.0", "9.0.0"), Ordering::Greater);
    }

    #[test]
    fn leading_zeros_do_not_change_magnitude() {
        assert_eq!(compare("0100", "99"), Ordering::Greater);
        assert_eq!(compare("1.02.0", "1.10.0"), Ordering::Less);
        assert_eq!(Version::parse("000").components(), &["0"]);
    }

    #[test]
    fn equality_only_considers_raw_text() {
        assert_eq!(Version::parse("v1.2.3"), Version::parse("v1.2.3"));
        assert_ne!(Version::parse("v1.2.3"), Version::parse("1.2.3"));
    }

    #[test]
    fn v_prefix_compares_equal() {
        assert_eq!(compare("v1.2.3", "1.2.3"), Ordering::Equal);
    }

    #[test]
    fn semver_compares_numerically() {
        assert_eq!(compare("1.2.3", "1.2.4"), Ordering::Less);
        assert_eq!(compare("2.0.0", "1.9.9"), Ordering::Greater);
        assert_eq!(compare("1.10.0", "1.9.0"), Ordering::Greater);
    }

    #[test]
    fn timestamps_compare_numerically() {
        assert_eq!(compare("1000", "2000"), Ordering::Less);
        assert_eq!(compare("2000", "1000"), Ordering::Greater);
        assert_eq!(compare("999", "1000"), Ordering::Less);
    }

    #[test]
    fn latest_outranks_everything() {
        assert_eq!(compare("latest", "1.2.3"), Ordering::Greater);
        assert_eq!(compare("1.2.3", "latest"), Ordering::Less);
        assert_eq!(compare("latest", "9999999999"), Ordering::Greater);
        assert_eq!(compare("latest", "latest"), Ordering::Equal);
    }

    #[test]
    fn timestamp_beats_semver_regardless_of_magnitude() {
        assert_eq!(compare("9.9.9", "1"), Ordering::Less);
        assert_eq!(compare("1", "9.9.9"), Ordering::Greater);
        assert_eq!(compare("1.0.0", "1746190043"), Ordering::Less);
    }

    #[test]
    fn other_mixes_use_string_order() {
        assert_eq!(compare("stable", "1.0.0"), Ordering::Greater);
        assert_eq!(compare("1000", "nightly"), Ordering::Less);
    }

    #[test]
    fn newest_of_semver_set() {
        let tags = ["1.0.0", "1.2.0", "1.1.0"];
        assert_eq!(newest(tags), Some("1.2.0"));
    }

    #[test]
    fn newest_of_empty_set_is_none() {
        assert_eq!(newest(std::iter::empty()), None);
    }

    #[test]
    fn newest_keeps_first_of_equals() {
        let tags = ["1.0.0", "v1.0.0"];
        assert_eq!(newest(tags), Some("1.0.0"));
    }

    #[test]
    fn rank_orders_newest_first() {
        let ranked = rank_newest_first(&["1.0.0", "1.2.0", "1.1.0"]);
        assert_eq!(ranked, vec!["1.2.0", "1.1.0", "1.0.0"]);
    }

    #[test]
    fn rank_places_timestamps_above_semver() {
        let ranked = rank_newest_first(&["2.0.0", "1746190043", "latest", "1.0.0"]);
        assert_eq!(ranked, vec!["latest", "1746190043", "2.0.0", "1.0.0"]);
    }
}
