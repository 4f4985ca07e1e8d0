pub mod auth;

pub mod files;

pub mod homeworks;

pub mod submissions;

pub use auth::configure_auth_routes;
pub use files::configure_file_routes;
pub use homeworks::configure_homeworks_routes;
pub use submissions::configure_submissions_routes;

use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;

use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 业务结果转换为统一响应
pub(crate) fn respond<T: Serialize>(result: Result<T>, message: &str) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(data, message)),
        Err(e) => ApiResponse::from_error(&e),
    }
}

pub(crate) fn respond_empty(result: Result<()>, message: &str) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success_empty(message)),
        Err(e) => ApiResponse::from_error(&e),
    }
}

/// 取出中间件放入的当前用户
pub(crate) fn current_user(req: &HttpRequest) -> std::result::Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(req).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthenticated",
        ))
    })
}

/// 附件下载头，同时给出 ASCII 与 UTF-8 文件名
pub(crate) fn attachment(file_name: &str) -> ContentDisposition {
    let ascii_fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() && c != '"' { c } else { '_' })
        .collect();

    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![
            DispositionParam::Filename(ascii_fallback),
            DispositionParam::FilenameExt(ExtendedValue {
                charset: Charset::Ext("UTF-8".to_string()),
                language_tag: None,
                value: file_name.as_bytes().to_vec(),
            }),
        ],
    }
}
