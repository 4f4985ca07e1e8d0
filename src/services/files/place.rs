use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use tokio::io::AsyncWriteExt;

use super::{FileStore, HOMEWORK_URL_PREFIX, TEMP_FILE_PREFIX};
use crate::errors::{Result, WorkUploadError};
use crate::utils::validate_flat_filename;

/// 改名后仍冲突时最多尝试的序号
const MAX_NAME_SUFFIX: u32 = 9;

/// 落盘后的作业文件
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlacedArtifact {
    /// 相对存储根目录的路径
    pub url: String,
    /// 磁盘上的最终文件名
    pub file_name: String,
    /// 是否因重名而改名
    pub renamed: bool,
}

impl FileStore {
    /// 把上传内容写入作业文件夹
    ///
    /// 先写临时文件，再以硬链接方式发布到目标名，目标已存在时不覆盖，
    /// 改用 `学号_HHmmss_原文件名`，仍冲突再依次尝试 `学号_HHmmss-n_原文件名`，
    /// 序号用尽返回 Conflict。
    pub async fn place(
        &self,
        folder: &str,
        original_name: &str,
        student_no: &str,
        bytes: &[u8],
        now: DateTime<Utc>,
    ) -> Result<PlacedArtifact> {
        if bytes.len() > self.max_file_size {
            return Err(WorkUploadError::validation(format!(
                "文件大小超过限制: {} > {} 字节",
                bytes.len(),
                self.max_file_size
            )));
        }

        let file_name = validate_flat_filename(original_name)?;
        let dir = self.homework_dir(folder)?;

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            WorkUploadError::file_operation(format!("创建作业文件夹失败: {e}"))
        })?;

        let temp_path = dir.join(format!("{}{}.tmp", TEMP_FILE_PREFIX, uuid::Uuid::new_v4()));
        let published = self
            .write_and_publish(&dir, &temp_path, file_name, student_no, bytes, now)
            .await;

        if let Err(e) = tokio::fs::remove_file(&temp_path).await
            && e.kind() != ErrorKind::NotFound
        {
            tracing::warn!("清理临时文件 {} 失败: {}", temp_path.display(), e);
        }

        let (stored_name, renamed) = published?;
        if renamed {
            tracing::info!(
                "学号 {} 上传的 {} 与已有文件重名，已保存为 {}",
                student_no,
                file_name,
                stored_name
            );
        }

        Ok(PlacedArtifact {
            url: format!("{}/{}/{}", HOMEWORK_URL_PREFIX, folder, stored_name),
            file_name: stored_name,
            renamed,
        })
    }

    async fn write_and_publish(
        &self,
        dir: &Path,
        temp_path: &Path,
        file_name: &str,
        student_no: &str,
        bytes: &[u8],
        now: DateTime<Utc>,
    ) -> Result<(String, bool)> {
        let mut file = tokio::fs::File::create(temp_path)
            .await
            .map_err(|e| WorkUploadError::file_operation(format!("创建临时文件失败: {e}")))?;
        file.write_all(bytes)
            .await
            .map_err(|e| WorkUploadError::file_operation(format!("写入文件失败: {e}")))?;
        file.sync_all()
            .await
            .map_err(|e| WorkUploadError::file_operation(format!("写入文件失败: {e}")))?;
        drop(file);

        if publish(temp_path, &dir.join(file_name)).await? {
            return Ok((file_name.to_string(), false));
        }

        let stamp = self.local_time(now).format("%H%M%S");
        let fallback = format!("{}_{}_{}", student_no, stamp, file_name);
        if publish(temp_path, &dir.join(&fallback)).await? {
            return Ok((fallback, true));
        }

        // 同一秒内多次重名，追加序号
        for n in 1..=MAX_NAME_SUFFIX {
            let candidate = format!("{}_{}-{}_{}", student_no, stamp, n, file_name);
            if publish(temp_path, &dir.join(&candidate)).await? {
                return Ok((candidate, true));
            }
        }

        Err(WorkUploadError::conflict(format!(
            "文件 {} 已存在，请稍后重试",
            fallback
        )))
    }
}

/// 不覆盖地发布文件，目标已存在时返回 false
async fn publish(temp_path: &Path, target: &Path) -> Result<bool> {
    match tokio::fs::hard_link(temp_path, target).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(WorkUploadError::file_operation(format!(
            "保存文件 {} 失败: {e}",
            target.display()
        ))),
    }
}
