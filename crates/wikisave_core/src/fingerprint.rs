//! Document fingerprints (ETags).
//!
//! A fingerprint is derived from the file's modification time only, so it
//! can be computed with a single `stat` and never requires reading the body.
//! The tag is the modification time in seconds since the Unix epoch with one
//! decimal digit, e.g. `1760870400.3`.

use std::fmt;
use std::path::Path;

use crate::fs::FileSystem;

/// Version token for the document at a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// No file exists at the path. Never equal to a real tag.
    Absent,
    /// Tag derived from the file's modification time.
    Modified(String),
}

impl Fingerprint {
    /// Build the tag for a modification time given in milliseconds.
    ///
    /// Rounds to the nearest tenth of a second.
    pub fn from_millis(millis: i64) -> Self {
        let tenths = (millis + 50).div_euclid(100);
        let sign = if tenths < 0 { "-" } else { "" };
        let tenths = tenths.unsigned_abs();
        Fingerprint::Modified(format!("{}{}.{}", sign, tenths / 10, tenths % 10))
    }

    /// The value to send in an `ETag` header, `None` for [`Fingerprint::Absent`].
    pub fn as_header(&self) -> Option<&str> {
        match self {
            Fingerprint::Absent => None,
            Fingerprint::Modified(tag) => Some(tag),
        }
    }

    /// Whether no file backs this fingerprint
    pub fn is_absent(&self) -> bool {
        matches!(self, Fingerprint::Absent)
    }

    /// Compare a client's `If-Match` claim against this fingerprint.
    ///
    /// - `Absent` is matched by a missing header or a blank value.
    /// - `Modified(tag)` is matched only by a present header equal to `tag`,
    ///   optionally wrapped in double quotes.
    pub fn matches(&self, claim: Option<&str>) -> bool {
        let claim = claim.map(str::trim).filter(|c| !c.is_empty());
        match (self, claim) {
            (Fingerprint::Absent, None) => true,
            (Fingerprint::Absent, Some(_)) => false,
            (Fingerprint::Modified(_), None) => false,
            (Fingerprint::Modified(tag), Some(claim)) => {
                let unquoted = claim
                    .strip_prefix('"')
                    .and_then(|c| c.strip_suffix('"'))
                    .unwrap_or(claim);
                unquoted == tag
            }
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::Absent => write!(f, "<absent>"),
            Fingerprint::Modified(tag) => write!(f, "{}", tag),
        }
    }
}

/// Compute the current fingerprint of `path`.
///
/// Missing files and directories yield [`Fingerprint::Absent`].
pub fn fingerprint<FS: FileSystem + ?Sized>(fs: &FS, path: &Path) -> Fingerprint {
    if fs.is_dir(path) {
        return Fingerprint::Absent;
    }
    match fs.get_modified_time(path) {
        Some(millis) => Fingerprint::from_millis(millis),
        None => Fingerprint::Absent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFileSystem;

    #[test]
    fn test_format_one_decimal() {
        assert_eq!(
            Fingerprint::from_millis(1_760_870_400_300),
            Fingerprint::Modified("1760870400.3".into())
        );
        assert_eq!(
            Fingerprint::from_millis(1_760_870_400_000),
            Fingerprint::Modified("1760870400.0".into())
        );
    }

    #[test]
    fn test_format_rounds_to_nearest_tenth() {
        assert_eq!(
            Fingerprint::from_millis(1_760_870_400_949),
            Fingerprint::Modified("1760870400.9".into())
        );
        assert_eq!(
            Fingerprint::from_millis(1_760_870_400_960),
            Fingerprint::Modified("1760870401.0".into())
        );
    }

    #[test]
    fn test_format_before_epoch() {
        assert_eq!(
            Fingerprint::from_millis(-1_500),
            Fingerprint::Modified("-1.5".into())
        );
        assert_eq!(
            Fingerprint::from_millis(-300),
            Fingerprint::Modified("-0.3".into())
        );
    }

    #[test]
    fn test_missing_file_is_absent() {
        let fs = InMemoryFileSystem::new();
        assert_eq!(
            fingerprint(&fs, Path::new("/wiki/current.html")),
            Fingerprint::Absent
        );
    }

    #[test]
    fn test_directory_is_absent() {
        let fs = InMemoryFileSystem::new().with_dir("/wiki/current.html");
        assert!(fingerprint(&fs, Path::new("/wiki/current.html")).is_absent());
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let fs = InMemoryFileSystem::new().with_file("/wiki/current.html", "<html/>");
        let path = Path::new("/wiki/current.html");
        assert_eq!(fingerprint(&fs, path), fingerprint(&fs, path));
    }

    #[test]
    fn test_absent_matching_rules() {
        let absent = Fingerprint::Absent;
        assert!(absent.matches(None));
        assert!(absent.matches(Some("")));
        assert!(absent.matches(Some("  ")));
        assert!(!absent.matches(Some("1760870400.3")));
    }

    #[test]
    fn test_modified_matching_rules() {
        let tag = Fingerprint::Modified("1760870400.3".into());
        assert!(tag.matches(Some("1760870400.3")));
        assert!(tag.matches(Some("\"1760870400.3\"")));
        assert!(tag.matches(Some(" 1760870400.3 ")));
        assert!(!tag.matches(None));
        assert!(!tag.matches(Some("")));
        assert!(!tag.matches(Some("1760870400.4")));
    }

    #[test]
    fn test_absent_has_no_header() {
        assert_eq!(Fingerprint::Absent.as_header(), None);
        assert_eq!(
            Fingerprint::Modified("1.0".into()).as_header(),
            Some("1.0")
        );
    }
}
