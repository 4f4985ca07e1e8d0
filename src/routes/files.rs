use actix_web::body::SizedStream;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::path::Path;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use super::{attachment, current_user};
use crate::errors::{Result, WorkUploadError};
use crate::middlewares;
use crate::models::ApiResponse;
use crate::services::submissions::SubmissionLedger;

/// 以流的方式发送已打开的文件
pub(crate) fn stream_file(file: tokio::fs::File, size: u64, file_name: &str) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .insert_header(attachment(file_name))
        .body(SizedStream::new(size, ReaderStream::new(file)))
}

async fn open_for_download(path: &Path) -> Result<(tokio::fs::File, u64)> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| WorkUploadError::file_operation(format!("打开文件失败: {e}")))?;
    let size = file
        .metadata()
        .await
        .map_err(|e| WorkUploadError::file_operation(format!("读取文件信息失败: {e}")))?
        .len();
    Ok((file, size))
}

pub async fn handle_download(
    req: HttpRequest,
    ledger: web::Data<Arc<SubmissionLedger>>,
    submission_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let result = async {
        let (path, file_name) = ledger
            .artifact_path(&user, submission_id.into_inner())
            .await?;
        let (file, size) = open_for_download(&path).await?;
        Ok::<_, WorkUploadError>((file, size, file_name))
    }
    .await;

    Ok(match result {
        Ok((file, size, file_name)) => stream_file(file, size, &file_name),
        Err(e) => ApiResponse::from_error(&e),
    })
}

// 配置路由
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/files")
            .wrap(middlewares::RequireJWT)
            .route("/submissions/{submission_id}", web::get().to(handle_download)),
    );
}
