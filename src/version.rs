//! Build metadata emitted by `build.rs` through vergen.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

const UNKNOWN: &str = "unknown";

/// Git branch at build time. Tarball builds have none.
fn git_branch() -> &'static str {
    option_env!("VERGEN_GIT_BRANCH").unwrap_or(UNKNOWN)
}

/// Abbreviated commit SHA with a `-dirty` suffix for uncommitted trees.
fn git_revision() -> String {
    let sha = option_env!("VERGEN_GIT_SHA").unwrap_or(UNKNOWN);
    let short = &sha[..sha.len().min(7)];
    if option_env!("VERGEN_GIT_DIRTY") == Some("true") {
        format!("{short}-dirty")
    } else {
        short.to_string()
    }
}

/// `{version} ({revision}, {branch})`, e.g. `0.1.0 (3f9c2ab, main)`.
pub fn version_string() -> String {
    format!("{PKG_VERSION} ({}, {})", git_revision(), git_branch())
}

/// `User-Agent` sent with every completion API request.
pub(crate) fn user_agent() -> String {
    format!("cellgpt/{PKG_VERSION}")
}
