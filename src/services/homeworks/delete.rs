use super::HomeworkService;
use crate::errors::{Result, WorkUploadError};
use crate::models::users::entities::User;
use crate::services::submissions::ensure_manages;

pub async fn delete_homework(service: &HomeworkService, actor: &User, homework_id: i64) -> Result<()> {
    let homework = service.load(homework_id).await?;
    ensure_manages(actor, &homework)?;

    // 先删记录，数据库失败时文件保持原样
    if !service.storage.delete_homework_cascade(homework_id).await? {
        return Err(WorkUploadError::not_found("作业不存在"));
    }

    if let Err(e) = service.files.remove_folder(&homework.folder_name).await {
        tracing::warn!("删除作业 {} 的文件夹失败: {}", homework_id, e);
    }

    tracing::info!("Homework {} deleted by {}", homework_id, actor.id);
    Ok(())
}
