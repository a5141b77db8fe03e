//! `go.work` generation (§6): a text file beginning with `go <major>.<minor>`,
//! a blank line, then a `use (...)` block enumerating every member repository
//! carrying the `go` category.

use crate::model::{Repository, Workspace};

/// Fallback toolchain version when environment detection fails or is
/// unavailable in this context (§4.4.1 step 8). See DESIGN.md for the Open
/// Question resolution: silently falling back rather than failing the
/// operation.
pub const FALLBACK_GO_VERSION: &str = "1.23";

/// Detect the installed Go toolchain's `major.minor` from `go env GOVERSION`
/// style output (e.g. `go1.23.4` → `1.23`). Returns `None` if the string
/// can't be parsed, letting the caller fall back to [`FALLBACK_GO_VERSION`].
pub fn parse_go_version(raw: &str) -> Option<String> {
    let trimmed = raw.trim().strip_prefix("go")?;
    let mut parts = trimmed.split('.');
    let major = parts.next()?;
    let minor = parts.next()?;
    if major.chars().all(|c| c.is_ascii_digit()) && minor.chars().all(|c| c.is_ascii_digit()) {
        Some(format!("{major}.{minor}"))
    } else {
        None
    }
}

/// Render the `go.work` contents for `workspace`, using `go_version` (pass
/// [`FALLBACK_GO_VERSION`] when detection failed or wasn't attempted).
/// Returns `None` if no member carries the `go` category — callers should
/// delete any existing `go.work` in that case rather than write an empty one.
pub fn render(workspace: &Workspace, go_version: &str) -> Option<String> {
    let go_members: Vec<&Repository> = workspace
        .repositories
        .iter()
        .filter(|r| r.is_go_project())
        .collect();
    if go_members.is_empty() {
        return None;
    }

    let mut out = format!("go {go_version}\n\nuse (\n");
    for repo in &go_members {
        out.push_str(&format!("\t./{}\n", repo.name));
    }
    out.push_str(")\n");
    Some(out)
}
