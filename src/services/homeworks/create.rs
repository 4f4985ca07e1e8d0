use super::{HomeworkService, validate_title, validate_total_score};
use crate::errors::{Result, WorkUploadError};
use crate::models::homeworks::entities::{Homework, HomeworkStatus, NewHomework};
use crate::models::homeworks::requests::CreateHomeworkRequest;
use crate::models::users::entities::{User, UserRole};

pub async fn create_homework(
    service: &HomeworkService,
    actor: &User,
    req: CreateHomeworkRequest,
) -> Result<Homework> {
    // 课代表只能为本班布置作业，管理员必须指定班级
    let class_code = match actor.role {
        UserRole::Admin => req
            .class_code
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| WorkUploadError::validation("必须指定班级"))?,
        UserRole::ClassRep => match req.class_code {
            Some(code) if code != actor.class_code => {
                return Err(WorkUploadError::authorization("不能为其他班级布置作业"));
            }
            _ => actor.class_code.clone(),
        },
        _ => return Err(WorkUploadError::authorization("只有课代表或管理员可以布置作业")),
    };

    let title = validate_title(&req.title)?.to_string();
    let total_score = validate_total_score(req.total_score.unwrap_or(100.0))?;

    let publish_time = service.clock.now();
    if req.deadline <= publish_time {
        return Err(WorkUploadError::validation("截止时间必须晚于发布时间"));
    }

    // 文件夹名只在创建时计算一次
    let folder_name = service
        .files
        .folder_name_for(&class_code, &title, publish_time);

    let homework = service
        .storage
        .create_homework(NewHomework {
            class_code,
            course_code: req.course_code,
            title,
            description: req.description,
            publish_time,
            deadline: req.deadline,
            total_score,
            status: req.status.unwrap_or(HomeworkStatus::Published),
            folder_name,
            created_by: actor.id,
        })
        .await?;

    tracing::info!(
        "Homework {} created in class {} by {} (folder {})",
        homework.id,
        homework.class_code,
        actor.id,
        homework.folder_name
    );
    Ok(homework)
}
