//! Supported-version selection from the repository's release branches.
//!
//! Release branches are named `<major>-<minor>-x` (older lines) or
//! `<major>-x-y` (newer lines). The selector keeps, per leading digit, the
//! lexicographically last protected release branch, retains the last `count`
//! of those groups and drops the branch of the version currently released.
//!
//! Ordering is plain string ordering, so `9-x-y` sorts after `10-x-y` and
//! every two-digit major shares the group of its first digit.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::contract::Branch;

/// Name reserved for the directory of the current release.
pub const CURRENT: &str = "current";

static RELEASE_BRANCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+-(\d+-x|x-y)$").expect("release branch pattern is valid"));

/// Turns a release tag into its `major-minor-x` branch form.
///
/// `v10.1.0` and `v10-1-0` both become `10-1-x`.
pub fn normalize_version(tag: &str) -> String {
    let trimmed = tag.trim().trim_start_matches('v');
    let mut parts = trimmed.split(['.', '-']);
    let major = parts.next().unwrap_or_default();
    let minor = parts.next().unwrap_or("0");
    format!("{major}-{minor}-x")
}

/// Whether a branch name follows the release branch naming.
pub fn is_release_branch(name: &str) -> bool {
    RELEASE_BRANCH.is_match(name)
}

/// Picks the release branches whose docs are kept alongside the current release.
pub fn select_supported_branches(current_tag: &str, branches: &[Branch], count: usize) -> Vec<String> {
    let current = normalize_version(current_tag);

    let mut names: Vec<&str> = branches
        .iter()
        .filter(|b| b.protected && is_release_branch(&b.name))
        .map(|b| b.name.as_str())
        .collect();
    names.sort_unstable();

    let mut newest: BTreeMap<char, &str> = BTreeMap::new();
    for name in names {
        if let Some(digit) = name.chars().next() {
            newest.insert(digit, name);
        }
    }

    let groups: Vec<&str> = newest.into_values().collect();
    let start = groups.len().saturating_sub(count);
    debug!(?groups, start, "[BRANCHES] Newest release branch per leading digit");

    let selected: Vec<String> = groups[start..]
        .iter()
        .filter(|name| **name != current && **name != CURRENT)
        .map(|name| name.to_string())
        .collect();

    info!(
        current = %current,
        count,
        selected = ?selected,
        "[BRANCHES] Selected supported versions"
    );
    selected
}
