use super::{HomeworkService, validate_title, validate_total_score};
use crate::errors::{Result, WorkUploadError};
use crate::models::homeworks::entities::Homework;
use crate::models::homeworks::requests::UpdateHomeworkRequest;
use crate::models::users::entities::User;
use crate::services::submissions::ensure_manages;

/// 修改标题不会移动已有文件，文件夹名保持创建时的值
pub async fn update_homework(
    service: &HomeworkService,
    actor: &User,
    homework_id: i64,
    mut req: UpdateHomeworkRequest,
) -> Result<Homework> {
    let homework = service.load(homework_id).await?;
    ensure_manages(actor, &homework)?;

    if let Some(title) = req.title.as_deref() {
        req.title = Some(validate_title(title)?.to_string());
    }
    if let Some(score) = req.total_score {
        validate_total_score(score)?;
    }
    if let Some(deadline) = req.deadline
        && deadline <= homework.publish_time
    {
        return Err(WorkUploadError::validation("截止时间必须晚于发布时间"));
    }

    let updated = service
        .storage
        .update_homework(homework_id, req)
        .await?
        .ok_or_else(|| WorkUploadError::not_found("作业不存在"))?;

    tracing::info!("Homework {} updated by {}", homework_id, actor.id);
    Ok(updated)
}
