use serde::{Deserialize, Serialize};

// 作业状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HomeworkStatus {
    Draft,     // 草稿
    Published, // 已发布
    Closed,    // 已关闭
}

impl std::fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HomeworkStatus::Draft => write!(f, "draft"),
            HomeworkStatus::Published => write!(f, "published"),
            HomeworkStatus::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for HomeworkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(HomeworkStatus::Draft),
            "published" => Ok(HomeworkStatus::Published),
            "closed" => Ok(HomeworkStatus::Closed),
            _ => Err(format!("Invalid homework status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Homework {
    pub id: i64,
    // 所属班级
    pub class_code: String,
    // 课程代码（0 表示不限课程）
    pub course_code: i64,
    pub title: String,
    pub description: Option<String>,
    pub publish_time: chrono::DateTime<chrono::Utc>,
    pub deadline: chrono::DateTime<chrono::Utc>,
    pub total_score: f64,
    pub status: HomeworkStatus,
    // 创建时确定的存储文件夹名，之后不随标题变化
    pub folder_name: String,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 写入存储层的新作业
#[derive(Debug, Clone)]
pub struct NewHomework {
    pub class_code: String,
    pub course_code: i64,
    pub title: String,
    pub description: Option<String>,
    pub publish_time: chrono::DateTime<chrono::Utc>,
    pub deadline: chrono::DateTime<chrono::Utc>,
    pub total_score: f64,
    pub status: HomeworkStatus,
    pub folder_name: String,
    pub created_by: i64,
}
