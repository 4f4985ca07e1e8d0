use super::{SubmissionLedger, ensure_manages};
use crate::errors::{Result, WorkUploadError};
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;

pub async fn grade(
    ledger: &SubmissionLedger,
    actor: &User,
    submission_id: i64,
    score: f64,
    feedback: Option<String>,
) -> Result<Submission> {
    if !score.is_finite() || !(0.0..=100.0).contains(&score) {
        return Err(WorkUploadError::validation("分数必须在 0 到 100 之间"));
    }

    let submission = ledger
        .storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| WorkUploadError::not_found("提交不存在"))?;
    let homework = ledger.load_homework(submission.homework_id).await?;
    ensure_manages(actor, &homework)?;

    let graded = ledger
        .storage
        .grade_submission(submission_id, score, feedback, ledger.clock.now())
        .await?
        .ok_or_else(|| WorkUploadError::not_found("提交不存在"))?;

    tracing::info!(
        "Submission graded: homework={} student={} score={} by={}",
        graded.homework_id,
        graded.student_id,
        score,
        actor.id
    );
    Ok(graded)
}
