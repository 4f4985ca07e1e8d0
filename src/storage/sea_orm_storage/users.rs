use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, WorkUploadError};
use crate::models::users::{
    entities::{User, UserRole, UserStatus},
    requests::CreateUserRequest,
};
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_no: Set(req.student_no),
            email: Set(req.email),
            password_hash: Set(req.password),
            real_name: Set(req.real_name),
            class_code: Set(req.class_code),
            role: Set(req.role.to_string()),
            courses: Set(req.courses.bits()),
            status: Set(UserStatus::Active.to_string()),
            session_nonce: Set(None),
            rename_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过学号获取用户
    pub async fn get_user_by_student_no_impl(&self, student_no: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::StudentNo.eq(student_no))
            .one(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过学号或邮箱获取用户
    pub async fn get_user_by_student_no_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::StudentNo.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("统计用户数量失败: {e}")))
    }

    /// 覆盖会话随机数
    ///
    /// 单条 UPDATE，多个登录并发时以最后落库的为准。
    pub async fn set_session_nonce_impl(&self, id: i64, nonce: Option<String>) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::SessionNonce, Expr::value(nonce))
            .col_expr(
                Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("更新会话失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(
                Column::LastLogin,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                WorkUploadError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 文件重名次数加一
    pub async fn increment_rename_count_impl(&self, id: i64) -> Result<()> {
        Users::update_many()
            .col_expr(
                Column::RenameCount,
                Expr::col(Column::RenameCount).add(1),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("更新重名次数失败: {e}")))?;

        Ok(())
    }

    /// 班级内角色为学生的全部用户
    pub async fn list_class_students_impl(&self, class_code: &str) -> Result<Vec<User>> {
        let users = Users::find()
            .filter(Column::ClassCode.eq(class_code))
            .filter(Column::Role.eq(UserRole::STUDENT))
            .order_by_asc(Column::StudentNo)
            .all(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 批量获取用户
    pub async fn list_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = Users::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("批量查询用户失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }
}
