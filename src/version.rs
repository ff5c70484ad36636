//! Version information with embedded git metadata.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit SHA at build time, or "unknown" if unavailable.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

/// Whether the working tree was dirty at build time.
pub fn git_dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

/// Short (7 character) commit SHA, or "unknown" when the build had no git
/// metadata (vergen emits a placeholder outside a repository).
pub fn git_commit() -> &'static str {
    if GIT_SHA.len() >= 7 && GIT_SHA.chars().all(|c| c.is_ascii_hexdigit()) {
        &GIT_SHA[..7]
    } else {
        "unknown"
    }
}

/// Full version string: `{version}+{sha}` or `{version}+{sha}.dirty`.
///
/// Examples:
/// - `0.1.0+abc1234`
/// - `0.1.0+abc1234.dirty`
pub fn version_string() -> String {
    let dirty_suffix = if git_dirty() { ".dirty" } else { "" };
    format!("{PKG_VERSION}+{}{dirty_suffix}", git_commit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_contains_pkg_version() {
        let version = version_string();
        assert!(
            version.starts_with(PKG_VERSION),
            "version should start with pkg version"
        );
    }

    #[test]
    fn git_commit_is_short_sha_or_unknown() {
        let commit = git_commit();
        assert!(commit == "unknown" || commit.len() == 7, "got {commit}");
    }
}
