use serde::Serialize;

use crate::models::users::entities::User;

/// 学生简要信息
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentBrief {
    pub id: i64,
    pub student_no: String,
    pub real_name: String,
    pub email: String,
}

impl From<&User> for StudentBrief {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            student_no: user.student_no.clone(),
            real_name: user.real_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// 未提交名单
#[derive(Debug, Clone, Serialize)]
pub struct UnsubmittedResponse {
    pub homework_id: i64,
    pub deadline: chrono::DateTime<chrono::Utc>,
    pub students: Vec<StudentBrief>,
}

/// 截止提醒候选：即将截止的作业及需要提醒的学生
#[derive(Debug, Clone, Serialize)]
pub struct ReminderCandidate {
    pub homework_id: i64,
    pub title: String,
    pub class_code: String,
    pub deadline: chrono::DateTime<chrono::Utc>,
    pub recipients: Vec<StudentBrief>,
}
