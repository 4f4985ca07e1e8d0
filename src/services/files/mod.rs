//! 作业文件存储
//!
//! 所有文件都位于 `<root>/uploads/homework/<作业文件夹>/` 下，
//! 数据库中保存的是相对 `<root>` 的路径。

pub mod bundle;
pub mod folder;
pub mod place;
pub mod resolve;

use chrono::{DateTime, FixedOffset, Utc};
use std::path::{Path, PathBuf};

use crate::config::StorageConfig;
use crate::errors::{Result, WorkUploadError};

pub use bundle::{Bundle, BundleSource, archive_file_name};
pub use folder::derive_folder_name;
pub use place::PlacedArtifact;

/// 作业文件相对路径前缀
pub const HOMEWORK_URL_PREFIX: &str = "uploads/homework";

/// 临时文件前缀，打包时跳过
pub(crate) const TEMP_FILE_PREFIX: &str = ".upload-";

pub struct FileStore {
    root: PathBuf,
    max_file_size: usize,
    utc_offset: FixedOffset,
}

impl FileStore {
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let utc_offset = FixedOffset::east_opt(config.utc_offset_minutes * 60).ok_or_else(|| {
            WorkUploadError::validation(format!(
                "无效的时区偏移: {} 分钟",
                config.utc_offset_minutes
            ))
        })?;

        Ok(Self {
            root: PathBuf::from(&config.root),
            max_file_size: config.max_file_size,
            utc_offset,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// 转换到配置的本地时区
    pub fn local_time(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(&self.utc_offset)
    }

    /// 按发布日期计算作业文件夹名
    pub fn folder_name_for(&self, class_code: &str, title: &str, publish_time: DateTime<Utc>) -> String {
        derive_folder_name(class_code, title, self.local_time(publish_time).date_naive())
    }

    /// 作业文件夹的绝对路径
    pub(crate) fn homework_dir(&self, folder: &str) -> Result<PathBuf> {
        folder::check_folder_name(folder)?;
        Ok(self.root.join(HOMEWORK_URL_PREFIX).join(folder))
    }

    /// 删除整个作业文件夹，不存在时视为成功
    pub async fn remove_folder(&self, folder: &str) -> Result<()> {
        let dir = self.homework_dir(folder)?;
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WorkUploadError::file_operation(format!(
                "删除作业文件夹 {} 失败: {e}",
                dir.display()
            ))),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::FileStore;
    use crate::config::StorageConfig;
    use std::path::{Path, PathBuf};

    /// 测试用临时存储根目录，析构时删除
    pub struct TempRoot(PathBuf);

    impl TempRoot {
        pub fn new() -> Self {
            let path = std::env::temp_dir().join(format!("workupload-test-{}", uuid::Uuid::new_v4()));
            std::fs::create_dir_all(&path).unwrap();
            Self(path)
        }

        pub fn path(&self) -> &Path {
            &self.0
        }

        pub fn store(&self) -> FileStore {
            FileStore::new(&StorageConfig {
                root: self.0.to_string_lossy().into_owned(),
                max_file_size: 1024 * 1024,
                utc_offset_minutes: 0,
            })
            .unwrap()
        }
    }

    impl Drop for TempRoot {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }
}
