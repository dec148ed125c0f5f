//! Copying the public directory into the output directory

use crate::error::{DevServerError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Page every build must ship
pub const INDEX_HTML: &str = "index.html";

/// Copy every file of `public_dir` into `out_dir`
///
/// `index.html` is required and copied first. Subdirectories are skipped.
/// Returns the destination paths in copy order.
pub async fn copy_public_files(public_dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .await
        .map_err(|e| DevServerError::io(out_dir, e))?;

    let index_src = public_dir.join(INDEX_HTML);
    let index_dst = out_dir.join(INDEX_HTML);
    fs::copy(&index_src, &index_dst)
        .await
        .map_err(|e| DevServerError::io(&index_src, e))?;

    let mut entries = fs::read_dir(public_dir)
        .await
        .map_err(|e| DevServerError::io(public_dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DevServerError::io(public_dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| DevServerError::io(entry.path(), e))?;
        if file_type.is_dir() {
            warn!("Skipping directory {}", entry.path().display());
            continue;
        }
        names.push(entry.file_name());
    }
    names.sort();

    let mut copied = Vec::with_capacity(names.len());
    for name in names {
        let src = public_dir.join(&name);
        let dst = out_dir.join(&name);
        fs::copy(&src, &dst)
            .await
            .map_err(|e| DevServerError::io(&src, e))?;
        info!("{} copied to {}", src.display(), dst.display());
        copied.push(dst);
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copies_all_files() {
        let public = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let dist = out.path().join("dist");

        std::fs::write(public.path().join("index.html"), "<div id=\"root\"></div>").unwrap();
        std::fs::write(public.path().join("favicon.ico"), [0u8, 1, 2]).unwrap();
        std::fs::create_dir(public.path().join("drafts")).unwrap();

        let copied = copy_public_files(public.path(), &dist).await.unwrap();

        assert_eq!(copied, vec![dist.join("favicon.ico"), dist.join("index.html")]);
        assert_eq!(
            std::fs::read_to_string(dist.join("index.html")).unwrap(),
            "<div id=\"root\"></div>"
        );
        assert!(!dist.join("drafts").exists());
    }

    #[tokio::test]
    async fn test_missing_index_is_an_error() {
        let public = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(public.path().join("style.css"), "body {}").unwrap();

        let err = copy_public_files(public.path(), out.path()).await.unwrap_err();

        match err {
            DevServerError::Io { path, .. } => assert!(path.ends_with("index.html")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
