use std::io;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{Error, Result};

/// Final path segment of `url_str`, or a generated name when the path ends in `/`.
pub fn get_filename_from_url(url_str: &str) -> Result<String> {
    let url = Url::parse(url_str)
        .map_err(|e| Error::navigation(format!("invalid download url {url_str:?}: {e}")))?;

    if let Some(segments) = url.path_segments() {
        if let Some(filename) = segments.last() {
            if !filename.is_empty() {
                return Ok(filename.to_string());
            }
        }
    }

    Ok(format!("download_{}", uuid::Uuid::new_v4()))
}

/// Creates `dir` if missing. Returns whether it was created by this call.
///
/// An existing path that is not a directory is an error.
pub async fn ensure_dir(dir: &Path) -> Result<bool> {
    if existing_dir(dir).await? {
        return Ok(false);
    }
    match tokio::fs::create_dir(dir).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            existing_dir(dir).await?;
            Ok(false)
        }
        Err(e) => Err(Error::fs(dir, e)),
    }
}

async fn existing_dir(path: &Path) -> Result<bool> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(true),
        Ok(_) => Err(Error::fs(
            path,
            io::Error::new(io::ErrorKind::AlreadyExists, "exists and is not a directory"),
        )),
        Err(_) => Ok(false),
    }
}

pub fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            return cwd.join(path);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_last_segment() {
        let name = get_filename_from_url(
            "https://product-downloads.atlassian.com/software/confluence/downloads/atlassian-confluence-8.0.0-x64.bin",
        )
        .unwrap();
        assert_eq!(name, "atlassian-confluence-8.0.0-x64.bin");
    }

    #[test]
    fn ignores_query_string() {
        let name = get_filename_from_url("https://example.com/files/crowd-5.1.tar.gz?token=abc").unwrap();
        assert_eq!(name, "crowd-5.1.tar.gz");
    }

    #[test]
    fn generates_name_for_directory_urls() {
        let name = get_filename_from_url("https://example.com/files/").unwrap();
        assert!(name.starts_with("download_"));
    }

    #[test]
    fn rejects_relative_urls() {
        assert!(matches!(
            get_filename_from_url("not a url"),
            Err(Error::Navigation(_))
        ));
    }

    #[tokio::test]
    async fn ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("Bamboo");
        assert!(ensure_dir(&dir).await.unwrap());
        assert!(!ensure_dir(&dir).await.unwrap());
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn ensure_dir_rejects_a_regular_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Crowd 5.1 (2023-02)");
        std::fs::write(&path, b"not a directory").unwrap();
        assert!(matches!(
            ensure_dir(&path).await,
            Err(Error::FileSystem { .. })
        ));
    }

    #[tokio::test]
    async fn ensure_dir_fails_without_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("missing").join("Bamboo");
        assert!(matches!(
            ensure_dir(&dir).await,
            Err(Error::FileSystem { .. })
        ));
    }
}
