use super::HomeworkService;
use crate::errors::Result;
use crate::models::homeworks::responses::{ReminderCandidate, StudentBrief};
use crate::services::submissions::roster::unsubmitted_students;

/// 截止时间落在 (now, now + 提醒窗口] 内的作业
///
/// 没有选课的学生不提醒；课程代码为 0 的作业提醒所有未提交学生。
pub async fn reminder_candidates(
    service: &HomeworkService,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<Vec<ReminderCandidate>> {
    let due = service
        .storage
        .list_homeworks_due_between(now, now + service.reminder_window)
        .await?;

    let mut candidates = Vec::with_capacity(due.len());
    for homework in due {
        let recipients: Vec<StudentBrief> =
            unsubmitted_students(service.storage.as_ref(), homework.id, &homework.class_code)
                .await?
                .iter()
                .filter(|s| !s.courses.is_empty() && s.courses.contains(homework.course_code))
                .map(StudentBrief::from)
                .collect();

        tracing::debug!(
            "作业 {} 即将截止，待提醒 {} 人",
            homework.id,
            recipients.len()
        );
        candidates.push(ReminderCandidate {
            homework_id: homework.id,
            title: homework.title,
            class_code: homework.class_code,
            deadline: homework.deadline,
            recipients,
        });
    }

    Ok(candidates)
}
