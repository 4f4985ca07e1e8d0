use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::errors::WorkUploadError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 将领域错误转换为 HTTP 响应
    ///
    /// 业务错误带上原始信息；系统错误只记录日志，对外返回通用提示。
    pub fn from_error(err: &WorkUploadError) -> HttpResponse {
        let (status, code) = match err {
            WorkUploadError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
            WorkUploadError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            WorkUploadError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            WorkUploadError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
            WorkUploadError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
            WorkUploadError::FileOperation(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::FileOperationFailed)
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
            ),
        };

        let message = if err.is_business() {
            err.message().to_string()
        } else {
            tracing::error!("{} {}", err.code(), err.format_simple());
            "服务器内部错误".to_string()
        };

        HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
    }
}
