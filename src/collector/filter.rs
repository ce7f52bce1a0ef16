use std::collections::BTreeSet;
use std::path::Path;

/// Directory names skipped when no configuration says otherwise.
pub const DEFAULT_EXCLUDES: [&str; 4] = ["regression_data", "tests", ".git", ".github"];

const RULE_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Decides which walked paths are rule files worth indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilter {
    exclude: BTreeSet<String>,
    follow_links: bool,
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDES)
    }
}

impl ScanFilter {
    pub fn new<I, S>(exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude: exclude.into_iter().map(Into::into).collect(),
            follow_links: false,
        }
    }

    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    pub fn follow_links(&self) -> bool {
        self.follow_links
    }

    pub fn excludes(&self) -> impl Iterator<Item = &str> {
        self.exclude.iter().map(String::as_str)
    }

    /// `.yml` or `.yaml`, in any letter case.
    pub fn is_rule_file(&self, path: &Path) -> bool {
        path.extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .is_some_and(|ext| RULE_EXTENSIONS.contains(&ext.as_str()))
    }

    /// True if any component of `path` is an excluded name.
    ///
    /// The whole path is checked, including the components above the scan
    /// root.
    pub fn is_excluded(&self, path: &Path) -> bool {
        path.components()
            .any(|c| self.exclude.contains(&*c.as_os_str().to_string_lossy()))
    }

    pub fn accepts(&self, path: &Path) -> bool {
        self.is_rule_file(path) && !self.is_excluded(path)
    }
}
