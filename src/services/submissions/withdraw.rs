use super::{SubmissionLedger, ensure_same_class};
use crate::errors::{Result, WorkUploadError};

/// 撤回不受截止时间和批改状态限制
pub async fn withdraw(ledger: &SubmissionLedger, student_id: i64, homework_id: i64) -> Result<()> {
    let Some(existing) = ledger.storage.get_submission(student_id, homework_id).await? else {
        return Err(WorkUploadError::not_found("没有可撤回的提交"));
    };

    let homework = ledger.load_homework(homework_id).await?;
    let student = ledger.load_user(student_id).await?;
    ensure_same_class(&student, &homework)?;

    if let Some(url) = existing.file_url.as_deref()
        && let Err(e) = ledger.files.remove(url).await
    {
        tracing::warn!(
            "撤回时删除文件失败 homework={} student={}: {}",
            homework_id,
            student_id,
            e
        );
    }

    if ledger
        .storage
        .delete_submission_with_mark(student_id, homework_id)
        .await?
        .is_none()
    {
        // 与并发撤回竞争失败
        return Err(WorkUploadError::not_found("没有可撤回的提交"));
    }

    tracing::info!(
        "Submission withdrawn: homework={} student={}",
        homework_id,
        student_id
    );
    Ok(())
}
