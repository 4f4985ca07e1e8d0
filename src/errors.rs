//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_workupload_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum WorkUploadError {
            $($variant(String),)*
        }

        impl WorkUploadError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(WorkUploadError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(WorkUploadError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(WorkUploadError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl WorkUploadError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        WorkUploadError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_workupload_errors! {
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Conflict("E014", "Conflict Error"),
}

impl WorkUploadError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 业务错误的详情可以直接展示给用户，系统错误只在日志中保留详情
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            WorkUploadError::Authentication(_)
                | WorkUploadError::Authorization(_)
                | WorkUploadError::NotFound(_)
                | WorkUploadError::Conflict(_)
                | WorkUploadError::Validation(_)
        )
    }
}

impl fmt::Display for WorkUploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for WorkUploadError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for WorkUploadError {
    fn from(err: sea_orm::DbErr) -> Self {
        WorkUploadError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for WorkUploadError {
    fn from(err: std::io::Error) -> Self {
        WorkUploadError::FileOperation(err.to_string())
    }
}

impl From<zip::result::ZipError> for WorkUploadError {
    fn from(err: zip::result::ZipError) -> Self {
        WorkUploadError::FileOperation(format!("压缩包生成失败: {err}"))
    }
}

impl From<tokio::task::JoinError> for WorkUploadError {
    fn from(err: tokio::task::JoinError) -> Self {
        WorkUploadError::FileOperation(format!("后台文件任务异常退出: {err}"))
    }
}

impl From<serde_json::Error> for WorkUploadError {
    fn from(err: serde_json::Error) -> Self {
        WorkUploadError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for WorkUploadError {
    fn from(err: chrono::ParseError) -> Self {
        WorkUploadError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WorkUploadError>;

/// 会话校验失败的具体原因
///
/// 只用于服务端日志；对外统一折叠为一个认证错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    InvalidSignature,
    Expired,
    SessionSuperseded,
    IdentityDisabled,
    UnknownIdentity,
}

impl SessionRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionRejection::InvalidSignature => "invalid_signature",
            SessionRejection::Expired => "expired",
            SessionRejection::SessionSuperseded => "session_superseded",
            SessionRejection::IdentityDisabled => "identity_disabled",
            SessionRejection::UnknownIdentity => "unknown_identity",
        }
    }
}

impl fmt::Display for SessionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SessionRejection> for WorkUploadError {
    fn from(_: SessionRejection) -> Self {
        WorkUploadError::authentication("Unauthenticated")
    }
}
