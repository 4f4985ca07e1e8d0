//! 用户实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub student_no: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub real_name: String,
    pub class_code: String,
    pub role: String,
    pub courses: i64,
    pub status: String,
    pub session_nonce: Option<String>,
    pub rename_count: i32,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_user(self) -> crate::models::users::entities::User {
        use crate::models::users::entities::{CourseSet, User, UserRole, UserStatus};
        use chrono::{DateTime, Utc};

        User {
            id: self.id,
            student_no: self.student_no,
            email: self.email,
            password_hash: self.password_hash,
            real_name: self.real_name,
            class_code: self.class_code,
            role: self.role.parse::<UserRole>().unwrap_or(UserRole::Student),
            courses: CourseSet::from_bits(self.courses),
            // 无法识别的状态按停用处理
            status: self
                .status
                .parse::<UserStatus>()
                .unwrap_or(UserStatus::Disabled),
            session_nonce: self.session_nonce,
            rename_count: self.rename_count,
            last_login: self
                .last_login
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
