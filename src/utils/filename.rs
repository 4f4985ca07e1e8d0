use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, WorkUploadError};

/// Windows 与类 Unix 文件系统上都不安全的字符
static UNSAFE_PATH_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("Invalid unsafe path char regex"));

/// 把 `\ / : * ? " < > |` 替换为下划线
pub fn sanitize_path_component(raw: &str) -> String {
    UNSAFE_PATH_CHARS.replace_all(raw, "_").into_owned()
}

/// 校验上传文件名：不允许包含目录部分
pub fn validate_flat_filename(filename: &str) -> Result<&str> {
    let trimmed = filename.trim();

    let reason = if trimmed.is_empty() {
        Some("文件名不能为空")
    } else if trimmed.contains('\0') {
        Some("文件名不能包含空字节")
    } else if trimmed.chars().any(|c| c.is_ascii_control()) {
        // 防止 Content-Disposition 头注入
        Some("文件名不能包含控制字符")
    } else if trimmed.contains('/') || trimmed.contains('\\') {
        Some("文件名不能包含路径分隔符")
    } else if trimmed == "." || trimmed == ".." {
        Some("文件名不能为 '.' 或 '..'")
    } else if trimmed.starts_with('.') {
        // 以点开头的名字保留给临时文件
        Some("文件名不能以 '.' 开头")
    } else {
        None
    };

    match reason {
        Some(reason) => {
            tracing::info!("拒绝上传文件名 {:?}: {}", filename, reason);
            Err(WorkUploadError::validation(reason))
        }
        None => Ok(trimmed),
    }
}

/// 路径中是否含有 `..` 段
pub fn contains_path_traversal(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_every_unsafe_char() {
        assert_eq!(
            sanitize_path_component(r#"a\b/c:d*e?f"g<h>i|j"#),
            "a_b_c_d_e_f_g_h_i_j"
        );
        assert_eq!(sanitize_path_component("HW#1 报告"), "HW#1 报告");
    }

    #[test]
    fn test_validate_flat_filename() {
        assert_eq!(validate_flat_filename(" report.docx ").unwrap(), "report.docx");
        assert!(validate_flat_filename("").is_err());
        assert!(validate_flat_filename("../etc/passwd").is_err());
        assert!(validate_flat_filename("dir\\a.pdf").is_err());
        assert!(validate_flat_filename(".hidden").is_err());
        assert!(validate_flat_filename("a\r\nb.pdf").is_err());
        assert!(validate_flat_filename("..").is_err());
    }

    #[test]
    fn test_contains_path_traversal() {
        assert!(contains_path_traversal("../a"));
        assert!(contains_path_traversal("uploads/homework/../../etc"));
        assert!(contains_path_traversal("uploads\\..\\x"));
        assert!(!contains_path_traversal("uploads/homework/a..b/c.pdf"));
    }
}
