use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use tokio::fs;

use crate::errors::{Error, Result};
use crate::utils::filename_utils::resolve_relative_path;

/// Directory holding the local copy of every captured document.
///
/// Names beginning with `.` are treated as internal (for example the session
/// file). They are left out of listings and can be neither written nor read.
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `content` at `relative`, creating parent directories.
    pub async fn write(&self, relative: &str, content: &[u8]) -> Result<PathBuf> {
        let path = resolve_relative_path(&self.root, relative)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content).await?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(path)
    }

    /// Reads a stored document as text. Invalid UTF-8 is replaced, not rejected.
    pub async fn read_text(&self, relative: &str) -> Result<String> {
        let path = resolve_relative_path(&self.root, relative)
            .map_err(|_| Error::NotFound(relative.to_string()))?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(Error::NotFound(relative.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::NotFound(relative.to_string()))
            }
            Err(e) => return Err(e.into()),
        }
        let bytes = fs::read(&path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Lists every stored document as a `/`-separated path relative to the root, sorted.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        let mut pending = vec![(self.root.clone(), String::new())];

        while let Some((dir, prefix)) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.starts_with('.') {
                    continue;
                }
                let relative = if prefix.is_empty() {
                    name
                } else {
                    format!("{}/{}", prefix, name)
                };
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push((entry.path(), relative));
                } else if file_type.is_file() {
                    files.push(relative);
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_nested_documents_and_lists_them() {
        let tmp = tempdir().unwrap();
        let store = LocalDocumentStore::new(tmp.path());

        store.write("scroll.md", b"top").await.unwrap();
        store.write("journal/2026/day1.md", b"nested").await.unwrap();
        std::fs::write(tmp.path().join(".sessions.json"), "{}").unwrap();

        let files = store.list().await.unwrap();
        assert_eq!(files, vec!["journal/2026/day1.md", "scroll.md"]);
        assert_eq!(store.read_text("journal/2026/day1.md").await.unwrap(), "nested");
    }

    #[tokio::test]
    async fn overwrites_existing_document() {
        let tmp = tempdir().unwrap();
        let store = LocalDocumentStore::new(tmp.path());

        store.write("note.md", b"first").await.unwrap();
        store.write("note.md", b"second").await.unwrap();
        assert_eq!(store.read_text("note.md").await.unwrap(), "second");
    }

    #[tokio::test]
    async fn missing_or_escaping_paths_are_not_found() {
        let tmp = tempdir().unwrap();
        let store = LocalDocumentStore::new(tmp.path().join("scrolls"));
        store.write("a.md", b"a").await.unwrap();

        assert!(matches!(store.read_text("b.md").await, Err(Error::NotFound(_))));
        assert!(matches!(
            store.read_text("../scrolls/a.md").await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(store.write("../x.md", b"x").await, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn listing_a_missing_root_is_empty() {
        let tmp = tempdir().unwrap();
        let store = LocalDocumentStore::new(tmp.path().join("absent"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn internal_files_cannot_be_written_or_read() {
        let tmp = tempdir().unwrap();
        let store = LocalDocumentStore::new(tmp.path());
        std::fs::write(tmp.path().join(".sessions.json"), "{}").unwrap();

        assert!(matches!(
            store.write(".sessions.json", b"overwrite").await,
            Err(Error::Validation(_))
        ));
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(".sessions.json")).unwrap(),
            "{}"
        );
        assert!(matches!(
            store.read_text(".sessions.json").await,
            Err(Error::NotFound(_))
        ));
    }
}
