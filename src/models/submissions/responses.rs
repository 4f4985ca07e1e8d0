use serde::Serialize;

use super::entities::{Submission, SubmissionStatus};

/// 提交结果
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub submission: Submission,
    /// 文件是否因重名被改名
    pub renamed: bool,
}

/// 管理视角的提交列表项
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionFeedItem {
    pub submission: Submission,
    pub student_no: String,
    pub real_name: String,
    pub is_late: bool,
    pub is_first: bool,
}

impl SubmissionFeedItem {
    pub fn new(
        submission: Submission,
        student_no: String,
        real_name: String,
        earliest: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Self {
        let is_late = submission.status == SubmissionStatus::Late;
        let is_first = earliest.is_some_and(|t| submission.first_submitted_at == t);
        Self {
            submission,
            student_no,
            real_name,
            is_late,
            is_first,
        }
    }
}

/// 学生视角的提交：带上作业标题和截止时间
#[derive(Debug, Clone, Serialize)]
pub struct MySubmissionItem {
    pub submission: Submission,
    pub homework_title: String,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
}

/// 作业提交统计
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HomeworkStats {
    pub homework_id: i64,
    pub total_students: usize,
    pub submitted: usize,
    pub on_time: usize,
    pub late: usize,
    pub graded: usize,
    pub unsubmitted: usize,
}
