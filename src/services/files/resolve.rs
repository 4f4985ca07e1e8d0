use std::io::ErrorKind;
use std::path::PathBuf;

use super::{FileStore, HOMEWORK_URL_PREFIX};
use crate::errors::{Result, WorkUploadError};
use crate::utils::contains_path_traversal;

impl FileStore {
    /// 把相对路径解析为存储根目录内的真实文件
    ///
    /// 绝对路径、`..`、不在作业目录下的路径一律拒绝；
    /// 经符号链接跳出根目录的同样拒绝。错误信息不回显请求的路径。
    pub async fn resolve(&self, url: &str) -> Result<PathBuf> {
        if !is_acceptable_url(url) {
            tracing::info!("拒绝下载路径 {:?}", url);
            return Err(WorkUploadError::validation("非法的文件路径"));
        }

        let root = canonical(&self.root).await?;
        let target = canonical(&self.root.join(url)).await?;

        if !target.starts_with(&root) {
            tracing::warn!("下载路径 {:?} 解析到存储目录之外", url);
            return Err(WorkUploadError::validation("非法的文件路径"));
        }

        let metadata = tokio::fs::metadata(&target)
            .await
            .map_err(|e| WorkUploadError::file_operation(format!("读取文件信息失败: {e}")))?;
        if !metadata.is_file() {
            return Err(WorkUploadError::not_found("文件不存在"));
        }

        Ok(target)
    }

    /// 删除单个作业文件，不存在时视为成功
    pub async fn remove(&self, url: &str) -> Result<()> {
        let path = match self.resolve(url).await {
            Ok(path) => path,
            Err(WorkUploadError::NotFound(_)) => return Ok(()),
            Err(e) => return Err(e),
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WorkUploadError::file_operation(format!("删除文件失败: {e}"))),
        }
    }
}

fn is_acceptable_url(url: &str) -> bool {
    if url.is_empty() || url.contains('\0') {
        return false;
    }
    if url.starts_with('/') || url.starts_with('\\') {
        return false;
    }
    // Windows 盘符
    if url.as_bytes().get(1) == Some(&b':') {
        return false;
    }
    if contains_path_traversal(url) {
        return false;
    }
    url.strip_prefix(HOMEWORK_URL_PREFIX)
        .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
}

async fn canonical(path: &std::path::Path) -> Result<PathBuf> {
    tokio::fs::canonicalize(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => WorkUploadError::not_found("文件不存在"),
        _ => WorkUploadError::file_operation(format!("解析文件路径失败: {e}")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::files::test_support::TempRoot;
    use chrono::Utc;

    #[tokio::test]
    async fn test_resolve_placed_file() {
        let root = TempRoot::new();
        let store = root.store();
        let placed = store
            .place("HW-20240501", "a.txt", "2023001", b"abc", Utc::now())
            .await
            .unwrap();

        let path = store.resolve(&placed.url).await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"abc");
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal_and_absolute() {
        let root = TempRoot::new();
        let store = root.store();
        std::fs::write(root.path().join("secret.txt"), b"s").unwrap();

        for url in [
            "uploads/homework/../../secret.txt",
            "/etc/passwd",
            r"\windows\system32",
            "C:/windows",
            "secret.txt",
            "uploads/homework",
            "",
        ] {
            let err = store.resolve(url).await.unwrap_err();
            assert!(matches!(err, WorkUploadError::Validation(_)), "{url}");
            assert!(!err.message().contains("secret"), "{url}");
        }
    }

    #[tokio::test]
    async fn test_resolve_missing_file_is_not_found() {
        let root = TempRoot::new();
        let store = root.store();

        let err = store
            .resolve("uploads/homework/HW-20240501/nope.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkUploadError::NotFound(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_rejects_symlink_escape() {
        let root = TempRoot::new();
        let store = root.store();
        let outside = TempRoot::new();
        std::fs::write(outside.path().join("x.txt"), b"x").unwrap();

        let dir = root.path().join(HOMEWORK_URL_PREFIX).join("HW-20240501");
        std::fs::create_dir_all(&dir).unwrap();
        std::os::unix::fs::symlink(outside.path().join("x.txt"), dir.join("link.txt")).unwrap();

        let err = store
            .resolve("uploads/homework/HW-20240501/link.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkUploadError::Validation(_)));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let root = TempRoot::new();
        let store = root.store();
        let placed = store
            .place("HW-20240501", "a.txt", "2023001", b"abc", Utc::now())
            .await
            .unwrap();

        store.remove(&placed.url).await.unwrap();
        store.remove(&placed.url).await.unwrap();
        assert!(!root.path().join(&placed.url).exists());
    }
}
