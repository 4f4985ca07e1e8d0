//! 作业管理与截止提醒

pub mod create;
pub mod delete;
pub mod reminder;
pub mod update;

use std::sync::Arc;

use crate::config::ReminderConfig;
use crate::errors::{Result, WorkUploadError};
use crate::models::homeworks::entities::Homework;
use crate::models::homeworks::requests::{CreateHomeworkRequest, UpdateHomeworkRequest};
use crate::models::homeworks::responses::ReminderCandidate;
use crate::models::users::entities::User;
use crate::services::files::FileStore;
use crate::storage::Storage;
use crate::utils::Clock;

pub struct HomeworkService {
    storage: Arc<dyn Storage>,
    files: Arc<FileStore>,
    clock: Arc<dyn Clock>,
    reminder_window: chrono::Duration,
}

impl HomeworkService {
    pub fn new(
        storage: Arc<dyn Storage>,
        files: Arc<FileStore>,
        clock: Arc<dyn Clock>,
        reminder: &ReminderConfig,
    ) -> Self {
        Self {
            storage,
            files,
            clock,
            reminder_window: chrono::Duration::hours(reminder.window_hours),
        }
    }

    pub async fn create(&self, actor: &User, req: CreateHomeworkRequest) -> Result<Homework> {
        create::create_homework(self, actor, req).await
    }

    pub async fn update(&self, actor: &User, homework_id: i64, req: UpdateHomeworkRequest) -> Result<Homework> {
        update::update_homework(self, actor, homework_id, req).await
    }

    pub async fn delete(&self, actor: &User, homework_id: i64) -> Result<()> {
        delete::delete_homework(self, actor, homework_id).await
    }

    // 即将截止的作业及需要提醒的学生
    pub async fn reminder_candidates(&self, now: chrono::DateTime<chrono::Utc>) -> Result<Vec<ReminderCandidate>> {
        reminder::reminder_candidates(self, now).await
    }

    // 以当前时间计算提醒名单
    pub async fn pending_reminders(&self) -> Result<Vec<ReminderCandidate>> {
        reminder::reminder_candidates(self, self.clock.now()).await
    }

    pub(crate) async fn load(&self, homework_id: i64) -> Result<Homework> {
        self.storage
            .get_homework_by_id(homework_id)
            .await?
            .ok_or_else(|| WorkUploadError::not_found("作业不存在"))
    }
}

pub(crate) fn validate_title(title: &str) -> Result<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(WorkUploadError::validation("作业标题不能为空"));
    }
    if title.chars().count() > 100 {
        return Err(WorkUploadError::validation("作业标题不能超过 100 个字符"));
    }
    Ok(title)
}

pub(crate) fn validate_total_score(score: f64) -> Result<f64> {
    if score.is_finite() && score > 0.0 && score <= 100.0 {
        Ok(score)
    } else {
        Err(WorkUploadError::validation("总分必须在 0 到 100 之间"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::files::test_support::TempRoot;
    use crate::services::submissions::SubmissionLedger;
    use crate::services::test_support::{seed_homework, seed_user, storage};
    use crate::utils::clock::FixedClock;
    use chrono::{Duration, TimeZone, Utc};

    struct Fixture {
        service: HomeworkService,
        ledger: SubmissionLedger,
        storage: Arc<dyn Storage>,
        root: TempRoot,
    }

    async fn fixture() -> Fixture {
        let storage = storage().await;
        let root = TempRoot::new();
        let files = Arc::new(root.store());
        let clock = Arc::new(FixedClock::at(
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        ));
        let service = HomeworkService::new(
            storage.clone(),
            files.clone(),
            clock.clone(),
            &ReminderConfig { window_hours: 2 },
        );
        let ledger = SubmissionLedger::new(storage.clone(), files, clock);
        Fixture {
            service,
            ledger,
            storage,
            root,
        }
    }

    fn request(title: &str) -> CreateHomeworkRequest {
        CreateHomeworkRequest {
            class_code: None,
            course_code: 0,
            title: title.to_string(),
            description: None,
            deadline: Utc.with_ymd_and_hms(2024, 5, 8, 16, 0, 0).unwrap(),
            total_score: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_stores_folder_name() {
        let f = fixture().await;
        let rep = seed_user(&f.storage, "2023000", "CS23-2", UserRole::ClassRep, &[]).await;

        let hw = f.service.create(&rep, request("HW#1?")).await.unwrap();
        assert_eq!(hw.class_code, "CS23-2");
        assert_eq!(hw.folder_name, "CS23-2-HW#1_-20240501");
        assert_eq!(hw.total_score, 100.0);
    }

    #[tokio::test]
    async fn test_create_permissions() {
        let f = fixture().await;
        let student = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let rep = seed_user(&f.storage, "2023000", "CS23-2", UserRole::ClassRep, &[]).await;
        let admin = seed_user(&f.storage, "admin", "STAFF", UserRole::Admin, &[]).await;

        let err = f.service.create(&student, request("HW1")).await.unwrap_err();
        assert!(matches!(err, WorkUploadError::Authorization(_)));

        let mut other_class = request("HW1");
        other_class.class_code = Some("CS22-1".to_string());
        let err = f.service.create(&rep, other_class.clone()).await.unwrap_err();
        assert!(matches!(err, WorkUploadError::Authorization(_)));

        let err = f.service.create(&admin, request("HW1")).await.unwrap_err();
        assert!(matches!(err, WorkUploadError::Validation(_)));

        let hw = f.service.create(&admin, other_class).await.unwrap();
        assert_eq!(hw.class_code, "CS22-1");
    }

    #[tokio::test]
    async fn test_update_keeps_folder_name() {
        let f = fixture().await;
        let rep = seed_user(&f.storage, "2023000", "CS23-2", UserRole::ClassRep, &[]).await;
        let hw = f.service.create(&rep, request("HW1")).await.unwrap();

        let updated = f
            .service
            .update(
                &rep,
                hw.id,
                UpdateHomeworkRequest {
                    title: Some("实验一".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "实验一");
        assert_eq!(updated.folder_name, hw.folder_name);

        let err = f
            .service
            .update(
                &rep,
                hw.id,
                UpdateHomeworkRequest {
                    title: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkUploadError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_records_and_folder() {
        let f = fixture().await;
        let rep = seed_user(&f.storage, "2023000", "CS23-2", UserRole::ClassRep, &[]).await;
        let student = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let hw = f.service.create(&rep, request("HW1")).await.unwrap();
        let submitted = f
            .ledger
            .submit_upload(&student, hw.id, Some(("a.pdf".to_string(), b"x".to_vec())), None)
            .await
            .unwrap();
        let url = submitted.submission.file_url.unwrap();
        assert!(f.root.path().join(&url).exists());

        let err = f.service.delete(&student, hw.id).await.unwrap_err();
        assert!(matches!(err, WorkUploadError::Authorization(_)));

        f.service.delete(&rep, hw.id).await.unwrap();
        assert!(f.storage.get_homework_by_id(hw.id).await.unwrap().is_none());
        assert!(
            f.storage
                .get_submission(student.id, hw.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            f.storage
                .get_progress_mark(hw.id, student.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(!f.root.path().join(&url).exists());
    }

    #[tokio::test]
    async fn test_delete_keeps_folder_when_records_fail() {
        use crate::storage::sea_orm_storage::SeaOrmStorage;
        use sea_orm::ConnectionTrait;

        let raw = SeaOrmStorage::new_in_memory().await;
        let storage: Arc<dyn Storage> = Arc::new(raw.clone());
        let root = TempRoot::new();
        let files = Arc::new(root.store());
        let clock = Arc::new(FixedClock::at(
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        ));
        let service = HomeworkService::new(
            storage.clone(),
            files.clone(),
            clock.clone(),
            &ReminderConfig { window_hours: 2 },
        );
        let ledger = SubmissionLedger::new(storage.clone(), files, clock);

        let rep = seed_user(&storage, "2023000", "CS23-2", UserRole::ClassRep, &[]).await;
        let student = seed_user(&storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let hw = service.create(&rep, request("HW1")).await.unwrap();
        let submitted = ledger
            .submit_upload(&student, hw.id, Some(("a.pdf".to_string(), b"x".to_vec())), None)
            .await
            .unwrap();
        let url = submitted.submission.file_url.unwrap();

        // 级联删除在事务中途失败
        raw.db
            .execute_unprepared("DROP TABLE submission_marks")
            .await
            .unwrap();

        assert!(service.delete(&rep, hw.id).await.is_err());
        assert!(storage.get_homework_by_id(hw.id).await.unwrap().is_some());
        assert!(storage.get_submission(student.id, hw.id).await.unwrap().is_some());
        assert!(root.path().join(&url).exists());
    }

    #[tokio::test]
    async fn test_reminder_candidates_window_and_courses() {
        let f = fixture().await;
        let now = Utc.with_ymd_and_hms(2024, 5, 8, 14, 0, 0).unwrap();

        let math = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[1]).await;
        let physics = seed_user(&f.storage, "2023002", "CS23-2", UserRole::Student, &[2]).await;
        let both = seed_user(&f.storage, "2023003", "CS23-2", UserRole::Student, &[1, 2]).await;
        let _none = seed_user(&f.storage, "2023004", "CS23-2", UserRole::Student, &[]).await;

        let math_hw = seed_homework(&f.storage, "CS23-2", "Math", 1, now + Duration::hours(1)).await;
        let general = seed_homework(&f.storage, "CS23-2", "General", 0, now + Duration::hours(2)).await;
        seed_homework(&f.storage, "CS23-2", "Later", 0, now + Duration::hours(3)).await;
        seed_homework(&f.storage, "CS23-2", "Past", 0, now).await;

        f.ledger.submit(both.id, math_hw.id, None, None).await.unwrap();

        let candidates = f.service.reminder_candidates(now).await.unwrap();
        assert_eq!(candidates.len(), 2);

        assert_eq!(candidates[0].homework_id, math_hw.id);
        let ids: Vec<i64> = candidates[0].recipients.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![math.id]);

        assert_eq!(candidates[1].homework_id, general.id);
        let ids: Vec<i64> = candidates[1].recipients.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![math.id, physics.id, both.id]);
    }
}
