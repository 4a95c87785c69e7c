//! Local filesystem adapter
//!
//! Thin `tokio::fs` wrapper used by the sync engine. Writes create missing
//! parent directories; the walk reports files only, directories exist
//! remotely as key markers.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Local side of the sync pair
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Read a file's full content into memory
    pub async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }

    /// Write a file, creating missing parent directories first
    pub async fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    pub async fn create_dir_all(&self, path: &Path) -> Result<()> {
        Ok(tokio::fs::create_dir_all(path).await?)
    }

    pub async fn remove_file(&self, path: &Path) -> Result<()> {
        Ok(tokio::fs::remove_file(path).await?)
    }

    /// Every file under `root`, recursively. Directories are not reported.
    pub async fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    files.push(entry.path());
                }
            }
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn write_creates_missing_parents() {
        let root = TempDir::new().unwrap();
        let fs = LocalFs;
        let path = root.path().join("a").join("b").join("c.txt");

        fs.write(&path, b"content").await.unwrap();

        assert_eq!(fs.read(&path).await.unwrap(), b"content");
    }

    #[tokio::test]
    async fn walk_reports_files_only() {
        let root = TempDir::new().unwrap();
        let fs = LocalFs;
        fs.write(&root.path().join("top.txt"), b"1").await.unwrap();
        fs.write(&root.path().join("nested").join("inner.txt"), b"2")
            .await
            .unwrap();
        fs.create_dir_all(&root.path().join("empty")).await.unwrap();

        let mut files = fs.walk(root.path()).await.unwrap();
        files.sort();

        assert_eq!(
            files,
            vec![
                root.path().join("nested").join("inner.txt"),
                root.path().join("top.txt"),
            ]
        );
    }

    #[tokio::test]
    async fn remove_file_deletes() {
        let root = TempDir::new().unwrap();
        let fs = LocalFs;
        let path = root.path().join("gone.txt");
        fs.write(&path, b"x").await.unwrap();

        fs.remove_file(&path).await.unwrap();

        assert!(!fs.exists(&path));
    }
}
