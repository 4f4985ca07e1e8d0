use serde::Deserialize;

use super::entities::HomeworkStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateHomeworkRequest {
    /// 管理员可指定班级；课代表只能为本班创建
    pub class_code: Option<String>,
    #[serde(default)]
    pub course_code: i64,
    pub title: String,
    pub description: Option<String>,
    pub deadline: chrono::DateTime<chrono::Utc>,
    pub total_score: Option<f64>,
    pub status: Option<HomeworkStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHomeworkRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
    pub total_score: Option<f64>,
    pub status: Option<HomeworkStatus>,
}
