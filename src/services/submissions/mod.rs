//! 作业提交台账
//!
//! 一名学生对一份作业只有一条当前提交记录，提交标记与记录在同一事务中维护。
//! 权限检查在这里集中完成，不信任调用方。

pub mod feed;
pub mod grade;
pub mod mine;
pub mod roster;
pub mod submit;
pub mod withdraw;

use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::{Result, WorkUploadError};
use crate::models::homeworks::entities::Homework;
use crate::models::homeworks::responses::{StudentBrief, UnsubmittedResponse};
use crate::models::submissions::entities::{ArtifactRef, Submission};
use crate::models::submissions::responses::{
    HomeworkStats, MySubmissionItem, SubmissionFeedItem, SubmitResponse,
};
use crate::models::users::entities::User;
use crate::services::files::{Bundle, FileStore};
use crate::storage::Storage;
use crate::utils::Clock;

pub struct SubmissionLedger {
    storage: Arc<dyn Storage>,
    files: Arc<FileStore>,
    clock: Arc<dyn Clock>,
}

impl SubmissionLedger {
    pub fn new(storage: Arc<dyn Storage>, files: Arc<FileStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            files,
            clock,
        }
    }

    // 写入提交（文件已落盘）
    pub async fn submit(
        &self,
        student_id: i64,
        homework_id: i64,
        artifact: Option<ArtifactRef>,
        remarks: Option<String>,
    ) -> Result<Submission> {
        submit::submit(self, student_id, homework_id, artifact, remarks).await
    }

    // 上传文件并提交
    pub async fn submit_upload(
        &self,
        student: &User,
        homework_id: i64,
        upload: Option<(String, Vec<u8>)>,
        remarks: Option<String>,
    ) -> Result<SubmitResponse> {
        submit::submit_upload(self, student, homework_id, upload, remarks).await
    }

    // 撤回提交
    pub async fn withdraw(&self, student_id: i64, homework_id: i64) -> Result<()> {
        withdraw::withdraw(self, student_id, homework_id).await
    }

    // 批改
    pub async fn grade(
        &self,
        actor: &User,
        submission_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<Submission> {
        grade::grade(self, actor, submission_id, score, feedback).await
    }

    // 未提交名单
    pub async fn list_unsubmitted(&self, homework_id: i64) -> Result<Vec<StudentBrief>> {
        roster::list_unsubmitted(self, homework_id).await
    }

    // 未提交名单（课代表或管理员）
    pub async fn unsubmitted_for(&self, actor: &User, homework_id: i64) -> Result<UnsubmittedResponse> {
        roster::unsubmitted_for(self, actor, homework_id).await
    }

    // 最早提交时间
    pub async fn earliest_submission_time(
        &self,
        homework_id: i64,
    ) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
        self.storage.earliest_submission_time(homework_id).await
    }

    // 提交列表（课代表或管理员）
    pub async fn list_submissions(&self, actor: &User, homework_id: i64) -> Result<Vec<SubmissionFeedItem>> {
        feed::list_submissions(self, actor, homework_id).await
    }

    // 打包下载（课代表或管理员）
    pub async fn download_bundle(&self, actor: &User, homework_id: i64) -> Result<(Bundle, String)> {
        feed::download_bundle(self, actor, homework_id).await
    }

    // 我的全部提交
    pub async fn my_submissions(&self, student: &User) -> Result<Vec<MySubmissionItem>> {
        mine::my_submissions(self, student).await
    }

    // 我在某作业下的提交
    pub async fn my_submission(&self, student: &User, homework_id: i64) -> Result<Option<MySubmissionItem>> {
        mine::my_submission(self, student, homework_id).await
    }

    // 提交详情（本人、课代表或管理员）
    pub async fn submission_detail(&self, actor: &User, submission_id: i64) -> Result<Submission> {
        mine::submission_detail(self, actor, submission_id).await
    }

    // 提交统计（课代表或管理员）
    pub async fn stats(&self, actor: &User, homework_id: i64) -> Result<HomeworkStats> {
        mine::stats(self, actor, homework_id).await
    }

    // 下载单个提交的文件
    pub async fn artifact_path(&self, actor: &User, submission_id: i64) -> Result<(PathBuf, String)> {
        feed::artifact_path(self, actor, submission_id).await
    }

    pub(crate) async fn load_homework(&self, homework_id: i64) -> Result<Homework> {
        self.storage
            .get_homework_by_id(homework_id)
            .await?
            .ok_or_else(|| WorkUploadError::not_found("作业不存在"))
    }

    pub(crate) async fn load_user(&self, user_id: i64) -> Result<User> {
        self.storage
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| WorkUploadError::not_found("用户不存在"))
    }
}

/// 只有该班课代表或管理员可以管理作业
pub(crate) fn ensure_manages(actor: &User, homework: &Homework) -> Result<()> {
    if actor.manages_class(&homework.class_code) {
        Ok(())
    } else {
        tracing::info!(
            "用户 {} 无权管理班级 {} 的作业 {}",
            actor.id,
            homework.class_code,
            homework.id
        );
        Err(WorkUploadError::authorization("无权管理该作业"))
    }
}

/// 学生只能向本班作业提交
pub(crate) fn ensure_same_class(student: &User, homework: &Homework) -> Result<()> {
    if student.class_code == homework.class_code {
        Ok(())
    } else {
        Err(WorkUploadError::authorization("不能操作其他班级的作业"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::{MarkStatus, SubmissionStatus};
    use crate::models::users::entities::UserRole;
    use crate::services::files::HOMEWORK_URL_PREFIX;
    use crate::services::files::test_support::TempRoot;
    use crate::services::test_support::{seed_homework, seed_user, storage};
    use crate::utils::clock::FixedClock;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::HashSet;

    struct Fixture {
        ledger: SubmissionLedger,
        storage: Arc<dyn Storage>,
        clock: Arc<FixedClock>,
        root: TempRoot,
        deadline: DateTime<Utc>,
    }

    async fn fixture() -> Fixture {
        let storage = storage().await;
        let root = TempRoot::new();
        let deadline = Utc.with_ymd_and_hms(2024, 5, 8, 16, 0, 0).unwrap();
        let clock = Arc::new(FixedClock::at(deadline - Duration::days(1)));
        let ledger = SubmissionLedger::new(storage.clone(), Arc::new(root.store()), clock.clone());
        Fixture {
            ledger,
            storage,
            clock,
            root,
            deadline,
        }
    }

    #[tokio::test]
    async fn test_repeated_submit_keeps_one_record_with_latest_data() {
        let f = fixture().await;
        let student = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let hw = seed_homework(&f.storage, "CS23-2", "HW1", 0, f.deadline).await;

        f.ledger
            .submit(student.id, hw.id, None, Some("first".to_string()))
            .await
            .unwrap();
        f.clock.advance(Duration::hours(1));
        let latest = f
            .ledger
            .submit(
                student.id,
                hw.id,
                Some(ArtifactRef {
                    url: "uploads/homework/x/b.pdf".to_string(),
                    file_name: "b.pdf".to_string(),
                }),
                Some("second".to_string()),
            )
            .await
            .unwrap();

        let all = f.storage.list_submissions_by_homework(hw.id).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], latest);
        assert_eq!(latest.remarks.as_deref(), Some("second"));
        assert_eq!(latest.file_name.as_deref(), Some("b.pdf"));
        assert_eq!(latest.submitted_at, f.clock.now());
    }

    #[tokio::test]
    async fn test_submit_at_deadline_is_late() {
        let f = fixture().await;
        let student = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let hw = seed_homework(&f.storage, "CS23-2", "HW1", 0, f.deadline).await;

        f.clock.set(f.deadline - Duration::seconds(1));
        let on_time = f.ledger.submit(student.id, hw.id, None, None).await.unwrap();
        assert_eq!(on_time.status, SubmissionStatus::OnTime);

        f.clock.set(f.deadline);
        let late = f.ledger.submit(student.id, hw.id, None, None).await.unwrap();
        assert_eq!(late.status, SubmissionStatus::Late);
    }

    #[tokio::test]
    async fn test_submit_unknown_homework_and_other_class() {
        let f = fixture().await;
        let student = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let other = seed_homework(&f.storage, "CS23-1", "HW1", 0, f.deadline).await;

        let missing = f.ledger.submit(student.id, 9999, None, None).await.unwrap_err();
        assert!(matches!(missing, WorkUploadError::NotFound(_)));

        let denied = f.ledger.submit(student.id, other.id, None, None).await.unwrap_err();
        assert!(matches!(denied, WorkUploadError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_withdraw_without_record_is_not_found() {
        let f = fixture().await;
        let student = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let hw = seed_homework(&f.storage, "CS23-2", "HW1", 0, f.deadline).await;

        let err = f.ledger.withdraw(student.id, hw.id).await.unwrap_err();
        assert!(matches!(err, WorkUploadError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_withdraw_returns_student_to_unsubmitted() {
        let f = fixture().await;
        let student = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let hw = seed_homework(&f.storage, "CS23-2", "HW1", 0, f.deadline).await;

        let response = f
            .ledger
            .submit_upload(&student, hw.id, Some(("a.pdf".to_string(), b"pdf".to_vec())), None)
            .await
            .unwrap();
        let url = response.submission.file_url.clone().unwrap();
        assert!(f.ledger.list_unsubmitted(hw.id).await.unwrap().is_empty());

        let rep = seed_user(&f.storage, "2023000", "CS23-2", UserRole::ClassRep, &[]).await;
        f.ledger
            .grade(&rep, response.submission.id, 75.0, None)
            .await
            .unwrap();

        // 截止之后、批改之后依然可以撤回
        f.clock.set(f.deadline + Duration::days(1));
        f.ledger.withdraw(student.id, hw.id).await.unwrap();
        assert!(
            f.storage
                .get_submission(student.id, hw.id)
                .await
                .unwrap()
                .is_none()
        );

        let unsubmitted = f.ledger.list_unsubmitted(hw.id).await.unwrap();
        assert_eq!(unsubmitted.len(), 1);
        assert_eq!(unsubmitted[0].id, student.id);
        assert!(!f.root.path().join(url).exists());

        let mark = f.storage.get_progress_mark(hw.id, student.id).await.unwrap().unwrap();
        assert_eq!(mark.status, MarkStatus::NotSubmitted);
    }

    #[tokio::test]
    async fn test_unsubmitted_partitions_roster() {
        let f = fixture().await;
        let mut roster = Vec::new();
        for no in ["2023001", "2023002", "2023003", "2023004"] {
            roster.push(seed_user(&f.storage, no, "CS23-2", UserRole::Student, &[]).await);
        }
        seed_user(&f.storage, "2023000", "CS23-2", UserRole::ClassRep, &[]).await;
        seed_user(&f.storage, "2022001", "CS22-1", UserRole::Student, &[]).await;
        let hw = seed_homework(&f.storage, "CS23-2", "HW1", 0, f.deadline).await;

        for student in &roster[..2] {
            f.ledger.submit(student.id, hw.id, None, None).await.unwrap();
        }

        let unsubmitted: HashSet<i64> = f
            .ledger
            .list_unsubmitted(hw.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        let submitted: HashSet<i64> = f
            .storage
            .list_submitted_student_ids(hw.id)
            .await
            .unwrap()
            .into_iter()
            .collect();
        let everyone: HashSet<i64> = roster.iter().map(|u| u.id).collect();

        assert!(unsubmitted.is_disjoint(&submitted));
        assert_eq!(&unsubmitted | &submitted, everyone);
    }

    #[tokio::test]
    async fn test_grade_permissions_and_range() {
        let f = fixture().await;
        let student = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let rep = seed_user(&f.storage, "2023000", "CS23-2", UserRole::ClassRep, &[]).await;
        let other_rep = seed_user(&f.storage, "2022000", "CS22-1", UserRole::ClassRep, &[]).await;
        let hw = seed_homework(&f.storage, "CS23-2", "HW1", 0, f.deadline).await;
        let submission = f.ledger.submit(student.id, hw.id, None, None).await.unwrap();

        for actor in [&student, &other_rep] {
            let err = f
                .ledger
                .grade(actor, submission.id, 90.0, None)
                .await
                .unwrap_err();
            assert!(matches!(err, WorkUploadError::Authorization(_)));
        }

        for score in [-1.0, 100.5, f64::NAN] {
            let err = f.ledger.grade(&rep, submission.id, score, None).await.unwrap_err();
            assert!(matches!(err, WorkUploadError::Validation(_)));
        }

        let missing = f.ledger.grade(&rep, 9999, 90.0, None).await.unwrap_err();
        assert!(matches!(missing, WorkUploadError::NotFound(_)));

        let graded = f
            .ledger
            .grade(&rep, submission.id, 100.0, Some("满分".to_string()))
            .await
            .unwrap();
        assert_eq!(graded.score, Some(100.0));
        assert_eq!(graded.status, submission.status);
    }

    #[tokio::test]
    async fn test_submit_then_grade_then_late_resubmit() {
        let f = fixture().await;
        let student = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let rep = seed_user(&f.storage, "2023000", "CS23-2", UserRole::ClassRep, &[]).await;
        let hw = seed_homework(&f.storage, "CS23-2", "HW1", 0, f.deadline).await;

        let first = f
            .ledger
            .submit_upload(&student, hw.id, Some(("a.pdf".to_string(), b"v1".to_vec())), None)
            .await
            .unwrap();
        assert_eq!(first.submission.status, SubmissionStatus::OnTime);
        assert!(!first.renamed);

        let graded = f
            .ledger
            .grade(&rep, first.submission.id, 88.0, Some("good".to_string()))
            .await
            .unwrap();
        assert_eq!(graded.score, Some(88.0));
        assert_eq!(graded.feedback.as_deref(), Some("good"));

        f.clock.set(f.deadline + Duration::hours(2));
        let second = f
            .ledger
            .submit_upload(&student, hw.id, Some(("a.pdf".to_string(), b"v2".to_vec())), None)
            .await
            .unwrap();
        assert!(second.renamed);

        let record = second.submission;
        assert_eq!(record.id, first.submission.id);
        assert_eq!(record.status, SubmissionStatus::Late);
        assert_eq!(record.score, None);
        assert_eq!(record.feedback, None);
        assert_eq!(record.first_submitted_at, first.submission.submitted_at);

        let dir = f.root.path().join(HOMEWORK_URL_PREFIX).join(&hw.folder_name);
        let mut names: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["2023001_180000_a.pdf", "a.pdf"]);
        assert_eq!(record.file_name.as_deref(), Some("2023001_180000_a.pdf"));

        let user = f.storage.get_user_by_id(student.id).await.unwrap().unwrap();
        assert_eq!(user.rename_count, 1);
    }

    #[tokio::test]
    async fn test_first_submitter_is_pinned() {
        let f = fixture().await;
        let a = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let b = seed_user(&f.storage, "2023002", "CS23-2", UserRole::Student, &[]).await;
        let rep = seed_user(&f.storage, "2023000", "CS23-2", UserRole::ClassRep, &[]).await;
        let hw = seed_homework(&f.storage, "CS23-2", "HW1", 0, f.deadline).await;

        let first_time = f.clock.now();
        f.ledger.submit(a.id, hw.id, None, None).await.unwrap();
        f.clock.advance(Duration::minutes(5));
        f.ledger.submit(b.id, hw.id, None, None).await.unwrap();
        f.clock.advance(Duration::minutes(5));
        f.ledger.submit(a.id, hw.id, None, None).await.unwrap();

        assert_eq!(
            f.ledger.earliest_submission_time(hw.id).await.unwrap(),
            Some(first_time)
        );

        let feed = f.ledger.list_submissions(&rep, hw.id).await.unwrap();
        let first: Vec<&str> = feed
            .iter()
            .filter(|item| item.is_first)
            .map(|item| item.student_no.as_str())
            .collect();
        assert_eq!(first, vec!["2023001"]);
    }

    #[tokio::test]
    async fn test_download_bundle() {
        let f = fixture().await;
        let student = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let rep = seed_user(&f.storage, "2023000", "CS23-2", UserRole::ClassRep, &[]).await;
        let hw = seed_homework(&f.storage, "CS23-2", "HW1", 0, f.deadline).await;

        let empty = f.ledger.download_bundle(&rep, hw.id).await.unwrap_err();
        assert!(matches!(empty, WorkUploadError::NotFound(_)));

        f.ledger
            .submit_upload(&student, hw.id, Some(("a.pdf".to_string(), b"v1".to_vec())), None)
            .await
            .unwrap();

        let denied = f.ledger.download_bundle(&student, hw.id).await.unwrap_err();
        assert!(matches!(denied, WorkUploadError::Authorization(_)));

        let (bundle, name) = f.ledger.download_bundle(&rep, hw.id).await.unwrap();
        assert_eq!(name, "作业提交_HW1.zip");
        assert_eq!(bundle.entries, vec!["a.pdf"]);
        bundle.discard().await;
    }

    #[tokio::test]
    async fn test_artifact_path_access() {
        let f = fixture().await;
        let student = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let classmate = seed_user(&f.storage, "2023002", "CS23-2", UserRole::Student, &[]).await;
        let admin = seed_user(&f.storage, "admin", "STAFF", UserRole::Admin, &[]).await;
        let hw = seed_homework(&f.storage, "CS23-2", "HW1", 0, f.deadline).await;

        let submitted = f
            .ledger
            .submit_upload(&student, hw.id, Some(("a.pdf".to_string(), b"v1".to_vec())), None)
            .await
            .unwrap();
        let id = submitted.submission.id;

        let (path, name) = f.ledger.artifact_path(&student, id).await.unwrap();
        assert_eq!(name, "a.pdf");
        assert_eq!(std::fs::read(path).unwrap(), b"v1");
        assert!(f.ledger.artifact_path(&admin, id).await.is_ok());

        let denied = f.ledger.artifact_path(&classmate, id).await.unwrap_err();
        assert!(matches!(denied, WorkUploadError::Authorization(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submit_converges_to_one_record() {
        use crate::config::DatabaseConfig;
        use crate::storage::sea_orm_storage::SeaOrmStorage;

        let root = TempRoot::new();
        let db_path = root.path().join("ledger.db");
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::connect(&DatabaseConfig {
                url: format!("sqlite://{}?mode=rwc", db_path.display()),
                pool_size: 10,
                timeout: 30,
            })
            .await
            .unwrap(),
        );
        let deadline = Utc.with_ymd_and_hms(2024, 5, 8, 16, 0, 0).unwrap();
        let clock = Arc::new(FixedClock::at(deadline - Duration::days(1)));
        let ledger = Arc::new(SubmissionLedger::new(
            storage.clone(),
            Arc::new(root.store()),
            clock,
        ));
        let student = seed_user(&storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let hw = seed_homework(&storage, "CS23-2", "HW1", 0, deadline).await;

        let (student_id, homework_id) = (student.id, hw.id);
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let ledger = ledger.clone();
                tokio::spawn(async move {
                    ledger
                        .submit(student_id, homework_id, None, Some(format!("attempt {i}")))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let all = storage.list_submissions_by_homework(hw.id).await.unwrap();
        assert_eq!(all.len(), 1);
        let mark = storage.get_progress_mark(hw.id, student.id).await.unwrap().unwrap();
        assert_eq!(mark.status, MarkStatus::Submitted);
    }

    #[tokio::test]
    async fn test_student_reads_own_submissions() {
        let f = fixture().await;
        let student = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let classmate = seed_user(&f.storage, "2023002", "CS23-2", UserRole::Student, &[]).await;
        let outsider = seed_user(&f.storage, "2022001", "CS22-1", UserRole::Student, &[]).await;
        let rep = seed_user(&f.storage, "2023000", "CS23-2", UserRole::ClassRep, &[]).await;
        let hw1 = seed_homework(&f.storage, "CS23-2", "HW1", 0, f.deadline).await;
        let hw2 = seed_homework(&f.storage, "CS23-2", "HW2", 0, f.deadline).await;

        assert!(f.ledger.my_submission(&student, hw1.id).await.unwrap().is_none());

        let first = f.ledger.submit(student.id, hw1.id, None, None).await.unwrap();
        f.clock.advance(Duration::minutes(1));
        f.ledger.submit(student.id, hw2.id, None, None).await.unwrap();
        f.ledger
            .grade(&rep, first.id, 92.0, Some("不错".to_string()))
            .await
            .unwrap();

        let mine = f.ledger.my_submissions(&student).await.unwrap();
        let titles: Vec<&str> = mine.iter().map(|m| m.homework_title.as_str()).collect();
        assert_eq!(titles, vec!["HW2", "HW1"]);

        let one = f.ledger.my_submission(&student, hw1.id).await.unwrap().unwrap();
        assert_eq!(one.submission.score, Some(92.0));
        assert_eq!(one.submission.feedback.as_deref(), Some("不错"));
        assert_eq!(one.deadline, Some(f.deadline));

        let denied = f.ledger.my_submission(&outsider, hw1.id).await.unwrap_err();
        assert!(matches!(denied, WorkUploadError::Authorization(_)));
        let missing = f.ledger.my_submission(&student, 9999).await.unwrap_err();
        assert!(matches!(missing, WorkUploadError::NotFound(_)));

        assert_eq!(
            f.ledger.submission_detail(&student, first.id).await.unwrap().id,
            first.id
        );
        assert!(f.ledger.submission_detail(&rep, first.id).await.is_ok());
        let denied = f.ledger.submission_detail(&classmate, first.id).await.unwrap_err();
        assert!(matches!(denied, WorkUploadError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let f = fixture().await;
        let mut roster = Vec::new();
        for no in ["2023001", "2023002", "2023003", "2023004"] {
            roster.push(seed_user(&f.storage, no, "CS23-2", UserRole::Student, &[]).await);
        }
        let rep = seed_user(&f.storage, "2023000", "CS23-2", UserRole::ClassRep, &[]).await;
        let hw = seed_homework(&f.storage, "CS23-2", "HW1", 0, f.deadline).await;

        let on_time = f.ledger.submit(roster[0].id, hw.id, None, None).await.unwrap();
        f.ledger.submit(roster[1].id, hw.id, None, None).await.unwrap();
        f.clock.set(f.deadline + Duration::hours(1));
        f.ledger.submit(roster[2].id, hw.id, None, None).await.unwrap();
        f.ledger.grade(&rep, on_time.id, 80.0, None).await.unwrap();

        let stats = f.ledger.stats(&rep, hw.id).await.unwrap();
        assert_eq!(
            stats,
            HomeworkStats {
                homework_id: hw.id,
                total_students: 4,
                submitted: 3,
                on_time: 2,
                late: 1,
                graded: 1,
                unsubmitted: 1,
            }
        );

        let denied = f.ledger.stats(&roster[0], hw.id).await.unwrap_err();
        assert!(matches!(denied, WorkUploadError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_upload_rejects_nested_file_name() {
        let f = fixture().await;
        let student = seed_user(&f.storage, "2023001", "CS23-2", UserRole::Student, &[]).await;
        let hw = seed_homework(&f.storage, "CS23-2", "HW1", 0, f.deadline).await;

        let err = f
            .ledger
            .submit_upload(&student, hw.id, Some(("../a.pdf".to_string(), b"v1".to_vec())), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkUploadError::Validation(_)));
        assert_eq!(f.ledger.list_unsubmitted(hw.id).await.unwrap().len(), 1);
    }
}
