use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    homeworks::{
        entities::{Homework, NewHomework},
        requests::UpdateHomeworkRequest,
    },
    submissions::entities::{ProgressMark, Submission, SubmissionUpsert},
    users::{entities::User, requests::CreateUserRequest},
};

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过学号获取用户信息
    async fn get_user_by_student_no(&self, student_no: &str) -> Result<Option<User>>;
    // 通过学号或邮箱获取用户信息
    async fn get_user_by_student_no_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;
    // 覆盖用户当前会话随机数（None 表示清除）
    async fn set_session_nonce(&self, id: i64, nonce: Option<String>) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 文件重名次数加一
    async fn increment_rename_count(&self, id: i64) -> Result<()>;
    // 班级内所有学生
    async fn list_class_students(&self, class_code: &str) -> Result<Vec<User>>;
    // 批量获取用户
    async fn list_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;

    /// 作业管理方法
    // 创建作业
    async fn create_homework(&self, homework: NewHomework) -> Result<Homework>;
    // 通过ID获取作业
    async fn get_homework_by_id(&self, id: i64) -> Result<Option<Homework>>;
    // 更新作业
    async fn update_homework(
        &self,
        id: i64,
        update: UpdateHomeworkRequest,
    ) -> Result<Option<Homework>>;
    // 删除作业及其全部提交记录和标记
    async fn delete_homework_cascade(&self, id: i64) -> Result<bool>;
    // 截止时间落在 (from, to] 内的作业
    async fn list_homeworks_due_between(
        &self,
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<Homework>>;
    // 批量获取作业
    async fn list_homeworks_by_ids(&self, ids: &[i64]) -> Result<Vec<Homework>>;

    /// 提交管理方法
    // 写入提交记录并把标记置为已提交（同一事务）
    async fn upsert_submission_with_mark(&self, upsert: SubmissionUpsert) -> Result<Submission>;
    // 删除提交记录并把标记置为未提交（同一事务），返回被删除的记录
    async fn delete_submission_with_mark(
        &self,
        student_id: i64,
        homework_id: i64,
    ) -> Result<Option<Submission>>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 获取某学生某作业的当前提交
    async fn get_submission(&self, student_id: i64, homework_id: i64)
    -> Result<Option<Submission>>;
    // 批改
    async fn grade_submission(
        &self,
        id: i64,
        score: f64,
        feedback: Option<String>,
        graded_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<Submission>>;
    // 某作业的全部提交
    async fn list_submissions_by_homework(&self, homework_id: i64) -> Result<Vec<Submission>>;
    // 某学生的全部提交
    async fn list_submissions_by_student(&self, student_id: i64) -> Result<Vec<Submission>>;
    // 标记为已提交的学生
    async fn list_submitted_student_ids(&self, homework_id: i64) -> Result<Vec<i64>>;
    // 某学生某作业的提交标记
    async fn get_progress_mark(
        &self,
        homework_id: i64,
        student_id: i64,
    ) -> Result<Option<ProgressMark>>;
    // 某作业最早的首次提交时间
    async fn earliest_submission_time(
        &self,
        homework_id: i64,
    ) -> Result<Option<chrono::DateTime<chrono::Utc>>>;
}

/// 根据配置创建存储实例
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
