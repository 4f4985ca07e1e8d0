use std::collections::HashMap;

use super::roster::unsubmitted_students;
use super::{SubmissionLedger, ensure_manages, ensure_same_class};
use crate::errors::{Result, WorkUploadError};
use crate::models::homeworks::entities::Homework;
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::submissions::responses::{HomeworkStats, MySubmissionItem};
use crate::models::users::entities::User;

/// 当前用户的全部提交
pub async fn my_submissions(ledger: &SubmissionLedger, student: &User) -> Result<Vec<MySubmissionItem>> {
    let submissions = ledger.storage.list_submissions_by_student(student.id).await?;

    let ids: Vec<i64> = submissions.iter().map(|s| s.homework_id).collect();
    let homeworks: HashMap<i64, Homework> = ledger
        .storage
        .list_homeworks_by_ids(&ids)
        .await?
        .into_iter()
        .map(|h| (h.id, h))
        .collect();

    Ok(submissions
        .into_iter()
        .map(|submission| {
            let homework = homeworks.get(&submission.homework_id);
            MySubmissionItem {
                homework_title: homework.map(|h| h.title.clone()).unwrap_or_default(),
                deadline: homework.map(|h| h.deadline),
                submission,
            }
        })
        .collect())
}

/// 当前用户在某作业下的提交，未提交时为 None
pub async fn my_submission(
    ledger: &SubmissionLedger,
    student: &User,
    homework_id: i64,
) -> Result<Option<MySubmissionItem>> {
    let homework = ledger.load_homework(homework_id).await?;
    if !student.manages_class(&homework.class_code) {
        ensure_same_class(student, &homework)?;
    }

    let submission = ledger.storage.get_submission(student.id, homework_id).await?;
    Ok(submission.map(|submission| MySubmissionItem {
        submission,
        homework_title: homework.title,
        deadline: Some(homework.deadline),
    }))
}

/// 提交详情：提交者本人、该班课代表或管理员
pub async fn submission_detail(
    ledger: &SubmissionLedger,
    actor: &User,
    submission_id: i64,
) -> Result<Submission> {
    let submission = ledger
        .storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| WorkUploadError::not_found("提交不存在"))?;

    if submission.student_id != actor.id {
        let homework = ledger.load_homework(submission.homework_id).await?;
        ensure_manages(actor, &homework)?;
    }
    Ok(submission)
}

/// 班级提交统计（课代表或管理员）
pub async fn stats(ledger: &SubmissionLedger, actor: &User, homework_id: i64) -> Result<HomeworkStats> {
    let homework = ledger.load_homework(homework_id).await?;
    ensure_manages(actor, &homework)?;

    let total_students = ledger
        .storage
        .list_class_students(&homework.class_code)
        .await?
        .len();
    let unsubmitted =
        unsubmitted_students(ledger.storage.as_ref(), homework_id, &homework.class_code)
            .await?
            .len();
    let submissions = ledger.storage.list_submissions_by_homework(homework_id).await?;

    let on_time = submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::OnTime)
        .count();
    let graded = submissions.iter().filter(|s| s.score.is_some()).count();

    Ok(HomeworkStats {
        homework_id,
        total_students,
        submitted: submissions.len(),
        on_time,
        late: submissions.len() - on_time,
        graded,
        unsubmitted,
    })
}
