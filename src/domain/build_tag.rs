//! Build tag parsing and branch-to-alias mapping
//!
//! The pipeline publishes versioned build tags of the form
//! `<release>-<build number>` (e.g. `5.1-42`, `master-7`) alongside a
//! mutable alias tag (`latest` / `<release>-latest`) that is repointed at
//! every publication.

use regex::Regex;
use std::sync::OnceLock;

/// Pattern for versioned build tags: `<major>.<minor>-<n>` or `master-<n>`.
/// The trailing numeric group is the build number.
fn build_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+\.\d+|master)-(\d+)$").unwrap())
}

/// Extract the build number from a versioned build tag.
///
/// Returns `None` for anything that is not a build tag (alias tags like
/// `5.1-latest`, bare release numbers like `5.1`, arbitrary strings).
pub fn build_number(tag: &str) -> Option<&str> {
    build_tag_pattern()
        .captures(tag)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Map a branch name to the upstream alias tag it tracks.
///
/// `master` tracks `latest`; release branches are named `R<version>` and
/// track `<version>-latest`. The mapping strips the first character of the
/// branch name unconditionally - that is pipeline policy, applied literally
/// even for branch names outside the `R<version>` convention.
pub fn upstream_alias(branch: &str) -> String {
    if branch == "master" {
        "latest".to_string()
    } else {
        format!("{}-latest", branch.get(1..).unwrap_or_default())
    }
}
