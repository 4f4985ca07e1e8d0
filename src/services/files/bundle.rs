use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{FileStore, TEMP_FILE_PREFIX};
use crate::errors::{Result, WorkUploadError};
use crate::utils::sanitize_path_component;

/// 打包来源
#[derive(Debug, Clone)]
pub enum BundleSource {
    /// 整个作业文件夹
    Folder(String),
    /// 指定的若干文件（相对路径）
    Files(Vec<String>),
}

/// 已生成的压缩包，位于存储根目录的临时目录中
#[derive(Debug)]
pub struct Bundle {
    pub path: PathBuf,
    pub size: u64,
    pub entries: Vec<String>,
}

impl Bundle {
    /// 打开压缩包并立即删除目录项，文件随句柄关闭释放
    pub async fn open_detached(self) -> Result<(tokio::fs::File, u64)> {
        let file = tokio::fs::File::open(&self.path)
            .await
            .map_err(|e| WorkUploadError::file_operation(format!("打开压缩包失败: {e}")))?;
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!("删除临时压缩包 {} 失败: {}", self.path.display(), e);
        }
        Ok((file, self.size))
    }

    pub async fn discard(self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!("删除临时压缩包 {} 失败: {}", self.path.display(), e);
        }
    }
}

/// 下载时使用的压缩包文件名
pub fn archive_file_name(title: &str) -> String {
    sanitize_path_component(&format!("作业提交_{}.zip", title))
}

impl FileStore {
    /// 把作业文件打包成 zip
    pub async fn bundle(&self, source: BundleSource) -> Result<Bundle> {
        let mut files = match source {
            BundleSource::Folder(folder) => self.list_folder(&folder).await?,
            BundleSource::Files(urls) => {
                let mut files = Vec::with_capacity(urls.len());
                for url in urls {
                    match self.resolve(&url).await {
                        Ok(path) => files.push(path),
                        Err(WorkUploadError::NotFound(_)) => {
                            tracing::warn!("打包时文件缺失，已跳过: {}", url);
                        }
                        Err(e) => return Err(e),
                    }
                }
                files
            }
        };
        files.sort();

        let tmp_dir = self.root.join(".tmp");
        tokio::fs::create_dir_all(&tmp_dir)
            .await
            .map_err(|e| WorkUploadError::file_operation(format!("创建临时目录失败: {e}")))?;
        let archive_path = tmp_dir.join(format!("bundle-{}.zip", uuid::Uuid::new_v4()));

        let path = archive_path.clone();
        let written = tokio::task::spawn_blocking(move || write_archive(&path, &files)).await?;

        match written {
            Ok(entries) => {
                let size = tokio::fs::metadata(&archive_path)
                    .await
                    .map_err(|e| WorkUploadError::file_operation(format!("读取压缩包失败: {e}")))?
                    .len();
                tracing::info!("已打包 {} 个文件，大小 {} 字节", entries.len(), size);
                Ok(Bundle {
                    path: archive_path,
                    size,
                    entries,
                })
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&archive_path).await;
                Err(e)
            }
        }
    }

    async fn list_folder(&self, folder: &str) -> Result<Vec<PathBuf>> {
        let dir = self.homework_dir(folder)?;
        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(WorkUploadError::file_operation(format!(
                    "读取作业文件夹失败: {e}"
                )));
            }
        };

        let mut files = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| WorkUploadError::file_operation(format!("读取作业文件夹失败: {e}")))?
        {
            if entry.file_name().to_string_lossy().starts_with(TEMP_FILE_PREFIX) {
                continue;
            }
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| WorkUploadError::file_operation(format!("读取文件信息失败: {e}")))?;
            if file_type.is_file() {
                files.push(entry.path());
            }
        }
        Ok(files)
    }
}

fn write_archive(archive_path: &Path, files: &[PathBuf]) -> Result<Vec<String>> {
    let out = File::create(archive_path)?;
    let mut writer = ZipWriter::new(BufWriter::new(out));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut used = HashSet::new();
    let mut entries = Vec::with_capacity(files.len());
    for path in files {
        let Some(base) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        // 列目录与打包之间文件可能已被撤回，缺失的条目跳过
        let mut input = match File::open(path) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!("打包时读取 {} 失败，已跳过: {}", path.display(), e);
                continue;
            }
        };
        let name = unique_entry_name(&base, &mut used);

        writer.start_file(name.as_str(), options)?;
        io::copy(&mut input, &mut writer)?;
        entries.push(name);
    }

    let mut inner = writer.finish()?;
    io::Write::flush(&mut inner)?;
    Ok(entries)
}

/// 重名条目追加 ` (n)`，放在扩展名之前
fn unique_entry_name(base: &str, used: &mut HashSet<String>) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }

    let (stem, ext) = match base.rfind('.') {
        Some(idx) if idx > 0 => (&base[..idx], &base[idx..]),
        _ => (base, ""),
    };
    let mut n = 1;
    loop {
        let candidate = format!("{} ({}){}", stem, n, ext);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
