use crate::error::StitchError;
use globset::{Glob, GlobMatcher};
use std::path::Path;

/// 只比對檔名（最後一段路徑）的萬用字元篩選器，支援 `*` 與 `?`
#[derive(Debug, Clone)]
pub struct NameFilter {
    pattern: String,
    matcher: GlobMatcher,
}

impl NameFilter {
    pub fn new(pattern: &str) -> Result<Self, StitchError> {
        let glob = Glob::new(pattern).map_err(|e| StitchError::InvalidFilter {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.matcher.is_match(Path::new(name)))
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
