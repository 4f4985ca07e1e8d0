use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use super::files::stream_file;
use super::{current_user, respond, respond_empty};
use crate::errors::WorkUploadError;
use crate::middlewares;
use crate::models::ApiResponse;
use crate::models::homeworks::requests::{CreateHomeworkRequest, UpdateHomeworkRequest};
use crate::services::homeworks::HomeworkService;
use crate::services::submissions::SubmissionLedger;

pub async fn create_homework(
    req: HttpRequest,
    homeworks: web::Data<Arc<HomeworkService>>,
    body: web::Json<CreateHomeworkRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(respond(
        homeworks.create(&actor, body.into_inner()).await,
        "作业创建成功",
    ))
}

pub async fn update_homework(
    req: HttpRequest,
    homeworks: web::Data<Arc<HomeworkService>>,
    homework_id: web::Path<i64>,
    body: web::Json<UpdateHomeworkRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(respond(
        homeworks
            .update(&actor, homework_id.into_inner(), body.into_inner())
            .await,
        "作业更新成功",
    ))
}

pub async fn delete_homework(
    req: HttpRequest,
    homeworks: web::Data<Arc<HomeworkService>>,
    homework_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(respond_empty(
        homeworks.delete(&actor, homework_id.into_inner()).await,
        "作业删除成功",
    ))
}

pub async fn list_unsubmitted(
    req: HttpRequest,
    ledger: web::Data<Arc<SubmissionLedger>>,
    homework_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(respond(
        ledger.unsubmitted_for(&actor, homework_id.into_inner()).await,
        "ok",
    ))
}

pub async fn homework_stats(
    req: HttpRequest,
    ledger: web::Data<Arc<SubmissionLedger>>,
    homework_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(respond(
        ledger.stats(&actor, homework_id.into_inner()).await,
        "ok",
    ))
}

pub async fn list_submissions(
    req: HttpRequest,
    ledger: web::Data<Arc<SubmissionLedger>>,
    homework_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(respond(
        ledger.list_submissions(&actor, homework_id.into_inner()).await,
        "ok",
    ))
}

pub async fn download_bundle(
    req: HttpRequest,
    ledger: web::Data<Arc<SubmissionLedger>>,
    homework_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let (bundle, archive_name) = match ledger
        .download_bundle(&actor, homework_id.into_inner())
        .await
    {
        Ok(prepared) => prepared,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    Ok(match bundle.open_detached().await {
        Ok((file, size)) => stream_file(file, size, &archive_name),
        Err(e) => ApiResponse::from_error(&e),
    })
}

/// 即将截止的作业及待提醒学生，供外部提醒任务拉取
pub async fn reminder_candidates(
    req: HttpRequest,
    homeworks: web::Data<Arc<HomeworkService>>,
) -> ActixResult<HttpResponse> {
    let actor = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if !actor.is_admin() {
        return Ok(ApiResponse::from_error(&WorkUploadError::authorization(
            "只有管理员可以查看提醒名单",
        )));
    }
    Ok(respond(
        homeworks.pending_reminders().await,
        "ok",
    ))
}

// 配置路由
pub fn configure_homeworks_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/homeworks")
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(create_homework))
            .route("/reminders", web::get().to(reminder_candidates))
            .route("/{id}", web::put().to(update_homework))
            .route("/{id}", web::delete().to(delete_homework))
            .route("/{id}/unsubmitted", web::get().to(list_unsubmitted))
            .route("/{id}/submissions", web::get().to(list_submissions))
            .route("/{id}/stats", web::get().to(homework_stats))
            .service(
                web::resource("/{id}/download")
                    .wrap(middlewares::RateLimit::bundle_download())
                    .route(web::get().to(download_bundle)),
            ),
    );
}
