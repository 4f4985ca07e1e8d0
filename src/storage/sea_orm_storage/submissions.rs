//! 提交记录存储操作
//!
//! 提交记录与提交标记总是在同一个事务内一起写入。

use super::SeaOrmStorage;
use crate::entity::submission_marks::{
    ActiveModel as SubmissionMarkActiveModel, Column as SubmissionMarkColumn,
    Entity as SubmissionMarks,
};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{Result, WorkUploadError};
use crate::models::submissions::entities::{
    MarkStatus, ProgressMark, Submission, SubmissionUpsert,
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

/// 插入或更新提交标记
async fn upsert_mark<C: ConnectionTrait>(
    conn: &C,
    homework_id: i64,
    student_id: i64,
    status: MarkStatus,
    now: i64,
) -> Result<()> {
    let mark = SubmissionMarkActiveModel {
        homework_id: Set(homework_id),
        student_id: Set(student_id),
        status: Set(status.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    SubmissionMarks::insert(mark)
        .on_conflict(
            OnConflict::columns([
                SubmissionMarkColumn::HomeworkId,
                SubmissionMarkColumn::StudentId,
            ])
            .update_columns([SubmissionMarkColumn::Status, SubmissionMarkColumn::UpdatedAt])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(|e| WorkUploadError::database_operation(format!("更新提交标记失败: {e}")))?;

    Ok(())
}

impl SeaOrmStorage {
    /// 写入提交记录并把标记置为已提交
    ///
    /// 同一 (学生, 作业) 已有记录时原地覆盖：首次提交时间和创建时间保留，
    /// 分数、评语、批改时间清空。
    pub async fn upsert_submission_with_mark_impl(
        &self,
        upsert: SubmissionUpsert,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();
        let submitted_at = upsert.submitted_at.timestamp();
        let (file_url, file_name) = match upsert.artifact {
            Some(artifact) => (Some(artifact.url), Some(artifact.file_name)),
            None => (None, None),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            student_id: Set(upsert.student_id),
            homework_id: Set(upsert.homework_id),
            class_code: Set(upsert.class_code),
            submitted_at: Set(submitted_at),
            first_submitted_at: Set(submitted_at),
            file_url: Set(file_url),
            file_name: Set(file_name),
            score: Set(None),
            feedback: Set(None),
            status: Set(upsert.status.to_string()),
            remarks: Set(upsert.remarks),
            graded_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        // 并发提交时由唯一约束收敛为一条记录，后提交的覆盖先提交的
        Submissions::insert(model)
            .on_conflict(
                OnConflict::columns([Column::StudentId, Column::HomeworkId])
                    .update_columns([
                        Column::ClassCode,
                        Column::SubmittedAt,
                        Column::FileUrl,
                        Column::FileName,
                        Column::Score,
                        Column::Feedback,
                        Column::Status,
                        Column::Remarks,
                        Column::GradedAt,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("写入提交记录失败: {e}")))?;

        upsert_mark(
            &txn,
            upsert.homework_id,
            upsert.student_id,
            MarkStatus::Submitted,
            now,
        )
        .await?;

        let saved = Submissions::find()
            .filter(Column::StudentId.eq(upsert.student_id))
            .filter(Column::HomeworkId.eq(upsert.homework_id))
            .one(&txn)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询提交记录失败: {e}")))?
            .ok_or_else(|| WorkUploadError::database_operation("提交记录写入后未找到"))?;

        txn.commit()
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved.into_submission())
    }

    /// 删除提交记录并把标记置为未提交
    pub async fn delete_submission_with_mark_impl(
        &self,
        student_id: i64,
        homework_id: i64,
    ) -> Result<Option<Submission>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::HomeworkId.eq(homework_id))
            .one(&txn)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询提交记录失败: {e}")))?;

        // 未提交时直接返回，事务随 txn 释放回滚
        let Some(existing) = existing else {
            return Ok(None);
        };

        Submissions::delete_by_id(existing.id)
            .exec(&txn)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("删除提交记录失败: {e}")))?;

        upsert_mark(
            &txn,
            homework_id,
            student_id,
            MarkStatus::NotSubmitted,
            chrono::Utc::now().timestamp(),
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(existing.into_submission()))
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询提交记录失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取某学生某作业的当前提交
    pub async fn get_submission_impl(
        &self,
        student_id: i64,
        homework_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::HomeworkId.eq(homework_id))
            .one(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询提交记录失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 批改
    pub async fn grade_submission_impl(
        &self,
        id: i64,
        score: f64,
        feedback: Option<String>,
        graded_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<Submission>> {
        let existing = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询提交记录失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.score = Set(Some(score));
        model.feedback = Set(feedback);
        model.graded_at = Set(Some(graded_at.timestamp()));
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("批改失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }

    /// 某作业的全部提交（按提交时间排序）
    /// 某学生的全部提交，最近提交在前
    pub async fn list_submissions_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<Submission>> {
        let submissions = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询个人提交失败: {e}")))?;

        Ok(submissions
            .into_iter()
            .map(|m| m.into_submission())
            .collect())
    }

    pub async fn list_submissions_by_homework_impl(
        &self,
        homework_id: i64,
    ) -> Result<Vec<Submission>> {
        let submissions = Submissions::find()
            .filter(Column::HomeworkId.eq(homework_id))
            .order_by_asc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(submissions
            .into_iter()
            .map(|m| m.into_submission())
            .collect())
    }

    /// 标记为已提交的学生 ID
    pub async fn list_submitted_student_ids_impl(&self, homework_id: i64) -> Result<Vec<i64>> {
        SubmissionMarks::find()
            .select_only()
            .column(SubmissionMarkColumn::StudentId)
            .filter(SubmissionMarkColumn::HomeworkId.eq(homework_id))
            .filter(SubmissionMarkColumn::Status.eq(MarkStatus::Submitted.to_string()))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询提交标记失败: {e}")))
    }

    /// 某学生某作业的提交标记
    pub async fn get_progress_mark_impl(
        &self,
        homework_id: i64,
        student_id: i64,
    ) -> Result<Option<ProgressMark>> {
        let result = SubmissionMarks::find()
            .filter(SubmissionMarkColumn::HomeworkId.eq(homework_id))
            .filter(SubmissionMarkColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询提交标记失败: {e}")))?;

        Ok(result.map(|m| m.into_progress_mark()))
    }

    /// 最早的首次提交时间
    pub async fn earliest_submission_time_impl(
        &self,
        homework_id: i64,
    ) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
        let earliest: Option<Option<i64>> = Submissions::find()
            .select_only()
            .column_as(Column::FirstSubmittedAt.min(), "earliest")
            .filter(Column::HomeworkId.eq(homework_id))
            .into_tuple::<Option<i64>>()
            .one(&self.db)
            .await
            .map_err(|e| WorkUploadError::database_operation(format!("查询最早提交时间失败: {e}")))?;

        Ok(earliest
            .flatten()
            .and_then(|ts| chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::homeworks::entities::{HomeworkStatus, NewHomework};
    use crate::models::submissions::entities::{ArtifactRef, SubmissionStatus};
    use crate::models::users::entities::{CourseSet, UserRole};
    use crate::models::users::requests::CreateUserRequest;
    use chrono::{Duration, TimeZone, Utc};

    async fn seed(storage: &SeaOrmStorage) -> (i64, i64) {
        let user = storage
            .create_user_impl(CreateUserRequest {
                student_no: "20230001".into(),
                email: "s1@example.com".into(),
                password: "x".into(),
                real_name: "张三".into(),
                class_code: "CS23-2".into(),
                role: UserRole::Student,
                courses: CourseSet::default(),
            })
            .await
            .unwrap();
        let publish = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let homework = storage
            .create_homework_impl(NewHomework {
                class_code: "CS23-2".into(),
                course_code: 0,
                title: "HW1".into(),
                description: None,
                publish_time: publish,
                deadline: publish + Duration::days(7),
                total_score: 100.0,
                status: HomeworkStatus::Published,
                folder_name: "CS23-2-HW1-20240501".into(),
                created_by: user.id,
            })
            .await
            .unwrap();
        (user.id, homework.id)
    }

    fn upsert(student_id: i64, homework_id: i64, at: i64, file: &str) -> SubmissionUpsert {
        SubmissionUpsert {
            student_id,
            homework_id,
            class_code: "CS23-2".into(),
            submitted_at: Utc.timestamp_opt(at, 0).unwrap(),
            artifact: Some(ArtifactRef {
                url: format!("uploads/homework/CS23-2-HW1-20240501/{file}"),
                file_name: file.into(),
            }),
            status: SubmissionStatus::OnTime,
            remarks: Some(format!("remark {at}")),
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row_and_pins_first_time() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let (student, homework) = seed(&storage).await;

        let first = storage
            .upsert_submission_with_mark_impl(upsert(student, homework, 1_714_600_000, "a.pdf"))
            .await
            .unwrap();
        storage
            .grade_submission_impl(first.id, 88.0, Some("good".into()), Utc::now())
            .await
            .unwrap();

        let second = storage
            .upsert_submission_with_mark_impl(upsert(student, homework, 1_714_700_000, "b.pdf"))
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.file_name.as_deref(), Some("b.pdf"));
        assert_eq!(second.remarks.as_deref(), Some("remark 1714700000"));
        assert_eq!(second.submitted_at.timestamp(), 1_714_700_000);
        assert_eq!(second.first_submitted_at.timestamp(), 1_714_600_000);
        assert_eq!(second.score, None);
        assert_eq!(second.feedback, None);

        let all = storage
            .list_submissions_by_homework_impl(homework)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);

        let mark = storage
            .get_progress_mark_impl(homework, student)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(mark.status, MarkStatus::Submitted);
    }

    #[tokio::test]
    async fn test_delete_resets_mark_in_same_step() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let (student, homework) = seed(&storage).await;

        assert!(
            storage
                .delete_submission_with_mark_impl(student, homework)
                .await
                .unwrap()
                .is_none()
        );
        // 没有记录时不应留下任何标记
        assert!(
            storage
                .get_progress_mark_impl(homework, student)
                .await
                .unwrap()
                .is_none()
        );

        storage
            .upsert_submission_with_mark_impl(upsert(student, homework, 1_714_600_000, "a.pdf"))
            .await
            .unwrap();
        let deleted = storage
            .delete_submission_with_mark_impl(student, homework)
            .await
            .unwrap();
        assert!(deleted.is_some());
        assert!(
            storage
                .get_submission_impl(student, homework)
                .await
                .unwrap()
                .is_none()
        );
        let mark = storage
            .get_progress_mark_impl(homework, student)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(mark.status, MarkStatus::NotSubmitted);
        assert!(
            storage
                .list_submitted_student_ids_impl(homework)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_earliest_submission_time() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let (student, homework) = seed(&storage).await;
        assert_eq!(
            storage.earliest_submission_time_impl(homework).await.unwrap(),
            None
        );

        storage
            .upsert_submission_with_mark_impl(upsert(student, homework, 1_714_600_000, "a.pdf"))
            .await
            .unwrap();
        let earliest = storage
            .earliest_submission_time_impl(homework)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(earliest.timestamp(), 1_714_600_000);
    }
}
