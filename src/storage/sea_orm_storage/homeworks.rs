//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::homeworks::{ActiveModel, Column, Entity as Homeworks};
use crate::entity::submission_marks::{
    Column as SubmissionMarkColumn, Entity as SubmissionMarks,
};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{Result, WorkUploadError};
use crate::models::homeworks::{
    entities::{Homework, NewHomework},
    requests::UpdateHomeworkRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_homework_impl(&self, req: NewHomework) -> Result<Homework> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_code: Set(req.class_code),
            course_code: Set(req.course_code),
            title: Set(req.title),
            description: Set(req.description),
            publish_time: Set(req.publish_time.timestamp()),
            deadline: Set(req.deadline.timestamp()),
            total_score: Set(req.total_score),
            status: Set(req.status.to_string()),
            folder_name: Set(req.folder_name),
            created_by: Set(req.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_homework())
    }

    /// 通过 ID 获取作业
    pub async fn get_homework_by_id_impl(&self, id: i64) -> Result<Option<Homework>> {
        let result = Homeworks::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_homework()))
    }

    /// 更新作业（文件夹名保持不变）
    pub async fn update_homework_impl(
        &self,
        id: i64,
        update: UpdateHomeworkRequest,
    ) -> Result<Option<Homework>> {
        let existing = Homeworks::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询作业失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(deadline) = update.deadline {
            model.deadline = Set(deadline.timestamp());
        }
        if let Some(total_score) = update.total_score {
            model.total_score = Set(total_score);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("更新作业失败: {e}")))?;

        Ok(Some(result.into_homework()))
    }

    /// 删除作业，连同提交记录和提交标记
    pub async fn delete_homework_cascade_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("开启事务失败: {e}")))?;

        Submissions::delete_many()
            .filter(SubmissionColumn::HomeworkId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("删除提交记录失败: {e}")))?;

        SubmissionMarks::delete_many()
            .filter(SubmissionMarkColumn::HomeworkId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("删除提交标记失败: {e}")))?;

        let result = Homeworks::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("删除作业失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 批量获取作业
    pub async fn list_homeworks_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Homework>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let homeworks = Homeworks::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("批量查询作业失败: {e}")))?;

        Ok(homeworks.into_iter().map(|m| m.into_homework()).collect())
    }

    /// 截止时间在 (from, to] 内的作业
    pub async fn list_homeworks_due_between_impl(
        &self,
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<Homework>> {
        let homeworks = Homeworks::find()
            .filter(Column::Deadline.gt(from.timestamp()))
            .filter(Column::Deadline.lte(to.timestamp()))
            .order_by_asc(Column::Deadline)
            .all(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询即将截止作业失败: {e}")))?;

        Ok(homeworks.into_iter().map(|m| m.into_homework()).collect())
    }
}
