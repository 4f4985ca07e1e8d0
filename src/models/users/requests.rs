use serde::Deserialize;

use super::entities::{CourseSet, UserRole};

// 创建用户请求（password 字段存放已哈希的密码）
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub student_no: String,
    pub email: String,
    pub password: String,
    pub real_name: String,
    pub class_code: String,
    pub role: UserRole,
    #[serde(default)]
    pub courses: CourseSet,
}
