use serde::{Deserialize, Serialize};

/// 接口业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,

    // 文件
    FileUploadFailed = 3000,
    FileNotFound = 3001,
    FileSizeExceeded = 3002,
    MultifileUploadNotAllowed = 3003,
    FileOperationFailed = 3004,
}
