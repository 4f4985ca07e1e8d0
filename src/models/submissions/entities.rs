use serde::{Deserialize, Serialize};

// 提交状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    OnTime, // 按时
    Late,   // 逾期
}

impl SubmissionStatus {
    /// 严格早于截止时间才算按时
    pub fn classify(
        now: chrono::DateTime<chrono::Utc>,
        deadline: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        if now < deadline {
            SubmissionStatus::OnTime
        } else {
            SubmissionStatus::Late
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::OnTime => write!(f, "on_time"),
            SubmissionStatus::Late => write!(f, "late"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_time" => Ok(SubmissionStatus::OnTime),
            "late" => Ok(SubmissionStatus::Late),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 提交标记状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarkStatus {
    NotSubmitted,
    Submitted,
}

impl std::fmt::Display for MarkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkStatus::NotSubmitted => write!(f, "not_submitted"),
            MarkStatus::Submitted => write!(f, "submitted"),
        }
    }
}

impl std::str::FromStr for MarkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_submitted" => Ok(MarkStatus::NotSubmitted),
            "submitted" => Ok(MarkStatus::Submitted),
            _ => Err(format!("Invalid mark status: {s}")),
        }
    }
}

/// 某学生对某作业的当前提交
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub id: i64,
    pub student_id: i64,
    pub homework_id: i64,
    pub class_code: String,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    // 首次提交时间，重新提交不改变
    pub first_submitted_at: chrono::DateTime<chrono::Utc>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub status: SubmissionStatus,
    pub remarks: Option<String>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProgressMark {
    pub homework_id: i64,
    pub student_id: i64,
    pub status: MarkStatus,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 已落盘的作业文件引用
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactRef {
    /// 形如 uploads/homework/<folder>/<file>
    pub url: String,
    pub file_name: String,
}

/// 提交写入（插入或覆盖）
#[derive(Debug, Clone)]
pub struct SubmissionUpsert {
    pub student_id: i64,
    pub homework_id: i64,
    pub class_code: String,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub artifact: Option<ArtifactRef>,
    pub status: SubmissionStatus,
    pub remarks: Option<String>,
}
