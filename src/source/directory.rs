use std::fs;
use std::path::PathBuf;

use crate::source::bundled::BundledSource;
use crate::source::{CategoryId, Item, ItemSource, SourceError, parse_items};

/// Reads `<dir>/<category>.json`.
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &CategoryId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl ItemSource for DirectorySource {
    fn fetch(&self, id: &CategoryId) -> Result<Vec<Item>, SourceError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(SourceError::NotFound(id.clone()));
        }
        let content = fs::read(&path)?;
        parse_items(&content)
    }
}

/// User directory first, bundled lists second. A user file that exists but
/// fails to parse is reported instead of silently falling back.
pub struct LocalSource {
    user: DirectorySource,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            user: DirectorySource::new(dir),
        }
    }
}

impl ItemSource for LocalSource {
    fn fetch(&self, id: &CategoryId) -> Result<Vec<Item>, SourceError> {
        match self.user.fetch(id) {
            Err(SourceError::NotFound(_)) => BundledSource.fetch(id),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_list_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("custom.json"),
            r#"[{"word": "猫", "reading": "ねこ", "meaning": "cat"}]"#,
        )
        .unwrap();
        let source = DirectorySource::new(dir.path());
        let items = source.fetch(&CategoryId::new("custom")).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].meaning, "cat");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path());
        assert!(matches!(
            source.fetch(&CategoryId::new("custom")),
            Err(SourceError::NotFound(_))
        ));
    }

    #[test]
    fn local_source_falls_back_to_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalSource::new(dir.path());
        let items = source.fetch(&CategoryId::new("n5")).unwrap();
        assert_eq!(items, BundledSource.fetch(&CategoryId::new("n5")).unwrap());
    }

    #[test]
    fn local_source_prefers_user_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("n5.json"),
            r#"[{"word": "犬", "meaning": "dog"}]"#,
        )
        .unwrap();
        let items = LocalSource::new(dir.path())
            .fetch(&CategoryId::new("n5"))
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].word, "犬");
    }

    #[test]
    fn broken_user_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("n5.json"), "not json").unwrap();
        assert!(matches!(
            LocalSource::new(dir.path()).fetch(&CategoryId::new("n5")),
            Err(SourceError::Parse(_))
        ));
    }
}
