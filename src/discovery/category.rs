//! Project category classification by marker file (§4.2.1).

use std::collections::BTreeSet;
use std::path::Path;

use crate::ports::FileSystem;

/// `(category, [marker files, any one of which is sufficient])`.
pub const CATEGORY_MARKERS: &[(&str, &[&str])] = &[
    ("go", &["go.mod"]),
    ("nodejs", &["package.json"]),
    ("python", &["setup.py", "pyproject.toml", "requirements.txt"]),
    ("rust", &["Cargo.toml"]),
    ("java", &["pom.xml", "build.gradle"]),
    ("docker", &["Dockerfile", "docker-compose.yml"]),
    ("web", &["index.html"]),
];

/// A repository is assigned every category whose marker file is present.
pub fn classify(repo_root: &Path, fs: &dyn FileSystem) -> BTreeSet<String> {
    let mut categories = BTreeSet::new();
    for (category, markers) in CATEGORY_MARKERS {
        if markers.iter().any(|marker| fs.exists(&repo_root.join(marker))) {
            categories.insert((*category).to_string());
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::InMemoryFileSystem;
    use rstest::rstest;

    #[rstest]
    #[case("go.mod", "go")]
    #[case("package.json", "nodejs")]
    #[case("requirements.txt", "python")]
    #[case("Cargo.toml", "rust")]
    #[case("pom.xml", "java")]
    #[case("docker-compose.yml", "docker")]
    #[case("index.html", "web")]
    fn single_marker_yields_its_category(#[case] marker: &str, #[case] expected: &str) {
        let fs = InMemoryFileSystem::new();
        fs.put_file(format!("/repo/{marker}"), "contents");
        let categories = classify(Path::new("/repo"), &fs);
        assert_eq!(categories, [expected].into_iter().map(String::from).collect());
    }

    #[test]
    fn classifies_go_and_docker_together() {
        let fs = InMemoryFileSystem::new();
        fs.put_file("/repo/go.mod", "module x");
        fs.put_file("/repo/Dockerfile", "FROM scratch");
        let categories = classify(Path::new("/repo"), &fs);
        assert_eq!(
            categories,
            ["docker", "go"].into_iter().map(String::from).collect()
        );
    }

    #[test]
    fn python_any_marker_is_sufficient() {
        let fs = InMemoryFileSystem::new();
        fs.put_file("/repo/pyproject.toml", "[project]");
        let categories = classify(Path::new("/repo"), &fs);
        assert!(categories.contains("python"));
    }

    #[test]
    fn no_markers_yields_no_categories() {
        let fs = InMemoryFileSystem::new();
        fs.put_file("/repo/README.md", "hi");
        let categories = classify(Path::new("/repo"), &fs);
        assert!(categories.is_empty());
    }
}
