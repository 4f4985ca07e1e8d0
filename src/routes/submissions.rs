use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use futures_util::TryStreamExt;
use std::sync::Arc;

use super::{current_user, respond, respond_empty};
use crate::middlewares;
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::files::FileStore;
use crate::services::submissions::SubmissionLedger;

/// 上传表单：`file`（可选，只允许一个）与 `remarks`（可选）
struct SubmitForm {
    file: Option<(String, Vec<u8>)>,
    remarks: Option<String>,
}

async fn read_submit_form(
    mut payload: Multipart,
    max_file_size: usize,
) -> Result<SubmitForm, HttpResponse> {
    let mut form = SubmitForm {
        file: None,
        remarks: None,
    };

    while let Some(mut field) = payload.try_next().await.map_err(|e| {
        tracing::info!("Multipart payload error: {}", e);
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "上传内容格式错误",
        ))
    })? {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let file_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|e| {
            tracing::info!("Multipart field error: {}", e);
            HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                "读取上传内容失败",
            ))
        })? {
            data.extend_from_slice(&chunk);
            if data.len() > max_file_size {
                return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::FileSizeExceeded,
                    "File size exceeds the limit",
                )));
            }
        }

        match name.as_str() {
            "file" => {
                if form.file.is_some() {
                    return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::MultifileUploadNotAllowed,
                        "Only one file can be uploaded at a time",
                    )));
                }
                let Some(file_name) = file_name else {
                    return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::FileNotFound,
                        "缺少文件名",
                    )));
                };
                form.file = Some((file_name, data));
            }
            "remarks" => {
                let remarks = String::from_utf8_lossy(&data).trim().to_string();
                form.remarks = (!remarks.is_empty()).then_some(remarks);
            }
            _ => {}
        }
    }

    Ok(form)
}

pub async fn submit(
    req: HttpRequest,
    ledger: web::Data<Arc<SubmissionLedger>>,
    files: web::Data<Arc<FileStore>>,
    homework_id: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let student = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let form = match read_submit_form(payload, files.max_file_size()).await {
        Ok(form) => form,
        Err(resp) => return Ok(resp),
    };

    if form.file.is_none() && form.remarks.is_none() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "请上传文件或填写备注",
        )));
    }

    Ok(respond(
        ledger
            .submit_upload(&student, homework_id.into_inner(), form.file, form.remarks)
            .await,
        "提交成功",
    ))
}

pub async fn withdraw(
    req: HttpRequest,
    ledger: web::Data<Arc<SubmissionLedger>>,
    homework_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let student = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    Ok(respond_empty(
        ledger.withdraw(student.id, homework_id.into_inner()).await,
        "撤回成功",
    ))
}

pub async fn grade(
    req: HttpRequest,
    ledger: web::Data<Arc<SubmissionLedger>>,
    submission_id: web::Path<i64>,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let GradeSubmissionRequest { score, feedback } = body.into_inner();

    Ok(respond(
        ledger
            .grade(&actor, submission_id.into_inner(), score, feedback)
            .await,
        "批改成功",
    ))
}

pub async fn my_submissions(
    req: HttpRequest,
    ledger: web::Data<Arc<SubmissionLedger>>,
) -> ActixResult<HttpResponse> {
    let student = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(respond(ledger.my_submissions(&student).await, "ok"))
}

pub async fn my_submission(
    req: HttpRequest,
    ledger: web::Data<Arc<SubmissionLedger>>,
    homework_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let student = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(respond(
        ledger.my_submission(&student, homework_id.into_inner()).await,
        "ok",
    ))
}

pub async fn submission_detail(
    req: HttpRequest,
    ledger: web::Data<Arc<SubmissionLedger>>,
    submission_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(respond(
        ledger
            .submission_detail(&actor, submission_id.into_inner())
            .await,
        "ok",
    ))
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/homework/{homework_id}")
                    .wrap(middlewares::RateLimit::submission_upload())
                    .route(web::post().to(submit))
                    .route(web::delete().to(withdraw)),
            )
            .route("/my", web::get().to(my_submissions))
            .route("/my/{homework_id}", web::get().to(my_submission))
            .route("/{submission_id}", web::get().to(submission_detail))
            .route("/{submission_id}/grade", web::put().to(grade)),
    );
}
