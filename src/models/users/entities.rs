use serde::{Deserialize, Serialize};

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,  // 学生
    ClassRep, // 课代表
    Teacher,  // 教师
    Admin,    // 管理员
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const CLASS_REP: &'static str = "class_rep";
    pub const TEACHER: &'static str = "teacher";
    pub const ADMIN: &'static str = "admin";
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, class_rep, teacher, admin"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::ClassRep => write!(f, "{}", UserRole::CLASS_REP),
            UserRole::Teacher => write!(f, "{}", UserRole::TEACHER),
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::CLASS_REP => Ok(UserRole::ClassRep),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::ADMIN => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,   // 正常
    Disabled, // 已停用
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Disabled => write!(f, "disabled"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "disabled" => Ok(UserStatus::Disabled),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

/// 选修课程位图
///
/// 每门课程占一个二进制位，0 表示未选任何课程。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseSet(i64);

impl CourseSet {
    /// 已知课程代码
    pub const KNOWN_CODES: [i64; 7] = [1, 2, 4, 8, 16, 32, 64];

    pub fn from_bits(bits: i64) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> i64 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// 是否选修了指定课程（课程代码 0 表示全部课程）
    pub fn contains(&self, course_code: i64) -> bool {
        course_code == 0 || self.0 & course_code != 0
    }

    /// 展开为已知课程代码列表
    pub fn codes(&self) -> Vec<i64> {
        Self::KNOWN_CODES
            .iter()
            .copied()
            .filter(|code| self.0 & code != 0)
            .collect()
    }
}

impl FromIterator<i64> for CourseSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().fold(0, |acc, code| acc | code))
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub student_no: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: String,
    pub real_name: String,
    pub class_code: String,
    pub role: UserRole,
    pub courses: CourseSet,
    pub status: UserStatus,
    #[serde(skip_serializing, default)]
    pub session_nonce: Option<String>,
    pub rename_count: i32,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// 管理员，或该班级的课代表
    pub fn manages_class(&self, class_code: &str) -> bool {
        match self.role {
            UserRole::Admin => true,
            UserRole::ClassRep => self.class_code == class_code,
            _ => false,
        }
    }
}
