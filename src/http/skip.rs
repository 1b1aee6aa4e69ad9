//! Paths exempt from payload logging.
//!
//! Matching is exact and case-sensitive: `/health/live` does not cover
//! `/health/live/` or `/health/liveness`. There is no prefix or glob support.

/// Paths that are never logged unless the list is built with [`SkipList::new`].
pub const DEFAULT_SKIP_PATHS: [&str; 3] = ["/", "/health/live", "/health/ready"];

/// Ordered, de-duplicated set of skipped paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipList {
    paths: Vec<String>,
}

impl SkipList {
    /// Build a list from exactly these paths.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self { paths: Vec::new() };
        list.extend(paths);
        list
    }

    /// The default list extended with a comma-separated configuration value.
    ///
    /// Entries are trimmed and empty entries dropped.
    pub fn from_config_value(extra: &str) -> Self {
        let mut list = Self::default();
        list.extend(extra.split(',').map(str::trim).filter(|p| !p.is_empty()));
        list
    }

    fn extend<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for path in paths {
            let path = path.into();
            if !self.paths.contains(&path) {
                self.paths.push(path);
            }
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_PATHS)
    }
}
