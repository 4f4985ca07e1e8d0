use super::{SubmissionLedger, ensure_same_class};
use crate::errors::Result;
use crate::models::submissions::entities::{
    ArtifactRef, Submission, SubmissionStatus, SubmissionUpsert,
};
use crate::models::submissions::responses::SubmitResponse;
use crate::models::users::entities::User;

pub async fn submit(
    ledger: &SubmissionLedger,
    student_id: i64,
    homework_id: i64,
    artifact: Option<ArtifactRef>,
    remarks: Option<String>,
) -> Result<Submission> {
    let homework = ledger.load_homework(homework_id).await?;
    let student = ledger.load_user(student_id).await?;
    ensure_same_class(&student, &homework)?;

    let now = ledger.clock.now();
    let status = SubmissionStatus::classify(now, homework.deadline);

    let submission = ledger
        .storage
        .upsert_submission_with_mark(SubmissionUpsert {
            student_id,
            homework_id,
            class_code: homework.class_code.clone(),
            submitted_at: now,
            artifact,
            status,
            remarks,
        })
        .await?;

    tracing::info!(
        "Submission recorded: homework={} student={} status={}",
        homework_id,
        student_id,
        status
    );
    Ok(submission)
}

pub async fn submit_upload(
    ledger: &SubmissionLedger,
    student: &User,
    homework_id: i64,
    upload: Option<(String, Vec<u8>)>,
    remarks: Option<String>,
) -> Result<SubmitResponse> {
    let homework = ledger.load_homework(homework_id).await?;
    ensure_same_class(student, &homework)?;

    let Some((file_name, bytes)) = upload else {
        let submission = submit(ledger, student.id, homework_id, None, remarks).await?;
        return Ok(SubmitResponse {
            submission,
            renamed: false,
        });
    };

    let placed = ledger
        .files
        .place(
            &homework.folder_name,
            &file_name,
            &student.student_no,
            &bytes,
            ledger.clock.now(),
        )
        .await?;

    let artifact = ArtifactRef {
        url: placed.url.clone(),
        file_name: placed.file_name.clone(),
    };

    let submission = match submit(ledger, student.id, homework_id, Some(artifact), remarks).await {
        Ok(submission) => submission,
        Err(e) => {
            // 记录没写进去，刚落盘的文件也不保留
            if let Err(cleanup) = ledger.files.remove(&placed.url).await {
                tracing::error!("回滚上传文件 {} 失败: {}", placed.url, cleanup);
            }
            return Err(e);
        }
    };

    if placed.renamed
        && let Err(e) = ledger.storage.increment_rename_count(student.id).await
    {
        tracing::warn!("更新用户 {} 重名次数失败: {}", student.id, e);
    }

    Ok(SubmitResponse {
        submission,
        renamed: placed.renamed,
    })
}
