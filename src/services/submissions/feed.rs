use std::collections::HashMap;
use std::path::PathBuf;

use super::{SubmissionLedger, ensure_manages};
use crate::errors::{Result, WorkUploadError};
use crate::models::submissions::responses::SubmissionFeedItem;
use crate::models::users::entities::User;
use crate::services::files::{Bundle, BundleSource, archive_file_name};

pub async fn list_submissions(
    ledger: &SubmissionLedger,
    actor: &User,
    homework_id: i64,
) -> Result<Vec<SubmissionFeedItem>> {
    let homework = ledger.load_homework(homework_id).await?;
    ensure_manages(actor, &homework)?;

    let submissions = ledger.storage.list_submissions_by_homework(homework_id).await?;
    let earliest = ledger.storage.earliest_submission_time(homework_id).await?;

    let ids: Vec<i64> = submissions.iter().map(|s| s.student_id).collect();
    let students: HashMap<i64, User> = ledger
        .storage
        .list_users_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(submissions
        .into_iter()
        .map(|submission| {
            let (student_no, real_name) = students
                .get(&submission.student_id)
                .map(|u| (u.student_no.clone(), u.real_name.clone()))
                .unwrap_or_default();
            SubmissionFeedItem::new(submission, student_no, real_name, earliest)
        })
        .collect())
}

/// 打包作业文件夹，返回压缩包和下载文件名
pub async fn download_bundle(
    ledger: &SubmissionLedger,
    actor: &User,
    homework_id: i64,
) -> Result<(Bundle, String)> {
    let homework = ledger.load_homework(homework_id).await?;
    ensure_manages(actor, &homework)?;

    if ledger
        .storage
        .list_submitted_student_ids(homework_id)
        .await?
        .is_empty()
    {
        return Err(WorkUploadError::not_found("该作业暂无提交"));
    }

    let bundle = ledger
        .files
        .bundle(BundleSource::Folder(homework.folder_name.clone()))
        .await?;

    tracing::info!(
        "Bundle prepared: homework={} entries={} by={}",
        homework_id,
        bundle.entries.len(),
        actor.id
    );
    Ok((bundle, archive_file_name(&homework.title)))
}

/// 提交者本人、该班课代表或管理员可以下载
pub async fn artifact_path(
    ledger: &SubmissionLedger,
    actor: &User,
    submission_id: i64,
) -> Result<(PathBuf, String)> {
    let submission = super::mine::submission_detail(ledger, actor, submission_id).await?;

    let (Some(url), Some(file_name)) = (submission.file_url, submission.file_name) else {
        return Err(WorkUploadError::not_found("该提交没有附件"));
    };

    let path = ledger.files.resolve(&url).await?;
    Ok((path, file_name))
}
