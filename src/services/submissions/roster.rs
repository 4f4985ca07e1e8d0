use std::collections::HashSet;

use super::{SubmissionLedger, ensure_manages};
use crate::errors::Result;
use crate::models::homeworks::responses::{StudentBrief, UnsubmittedResponse};
use crate::models::users::entities::User;
use crate::storage::Storage;

/// 班级学生名单减去已提交的学生
pub async fn list_unsubmitted(ledger: &SubmissionLedger, homework_id: i64) -> Result<Vec<StudentBrief>> {
    let homework = ledger.load_homework(homework_id).await?;
    unsubmitted_students(ledger.storage.as_ref(), homework_id, &homework.class_code)
        .await
        .map(|students| students.iter().map(StudentBrief::from).collect())
}

pub async fn unsubmitted_for(
    ledger: &SubmissionLedger,
    actor: &User,
    homework_id: i64,
) -> Result<UnsubmittedResponse> {
    let homework = ledger.load_homework(homework_id).await?;
    ensure_manages(actor, &homework)?;

    let students =
        unsubmitted_students(ledger.storage.as_ref(), homework_id, &homework.class_code).await?;
    Ok(UnsubmittedResponse {
        homework_id,
        deadline: homework.deadline,
        students: students.iter().map(StudentBrief::from).collect(),
    })
}

pub(crate) async fn unsubmitted_students(
    storage: &dyn Storage,
    homework_id: i64,
    class_code: &str,
) -> Result<Vec<User>> {
    let roster = storage.list_class_students(class_code).await?;
    let submitted: HashSet<i64> = storage
        .list_submitted_student_ids(homework_id)
        .await?
        .into_iter()
        .collect();

    Ok(roster
        .into_iter()
        .filter(|student| !submitted.contains(&student.id))
        .collect())
}
