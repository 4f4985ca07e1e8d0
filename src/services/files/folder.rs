use chrono::NaiveDate;

use crate::errors::{Result, WorkUploadError};
use crate::utils::sanitize_path_component;

/// 作业文件夹名：`班级-标题-yyyyMMdd`，不安全字符替换为下划线
///
/// 纯函数，相同输入总是得到相同结果。
pub fn derive_folder_name(class_code: &str, title: &str, reference_date: NaiveDate) -> String {
    sanitize_path_component(&format!(
        "{}-{}-{}",
        class_code,
        title,
        reference_date.format("%Y%m%d")
    ))
}

/// 文件夹名只能是单层目录
pub(crate) fn check_folder_name(folder: &str) -> Result<()> {
    if folder.is_empty()
        || folder == "."
        || folder == ".."
        || folder.contains(['/', '\\', '\0'])
    {
        tracing::info!("拒绝非法作业文件夹名 {:?}", folder);
        return Err(WorkUploadError::validation("作业文件夹名不合法"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::files::test_support::TempRoot;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_question_mark_becomes_underscore() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(
            derive_folder_name("CS23-2", "HW#1?", date),
            "CS23-2-HW#1_-20240501"
        );
    }

    #[test]
    fn test_every_unsafe_char_is_replaced() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            derive_folder_name("A/B", r#"x\y:z*w?v"u<t>s|r"#, date),
            "A_B-x_y_z_w_v_u_t_s_r-20241231"
        );
    }

    #[test]
    fn test_deterministic() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(
            derive_folder_name("CS23-2", "实验报告", date),
            derive_folder_name("CS23-2", "实验报告", date)
        );
    }

    #[test]
    fn test_folder_date_uses_configured_offset() {
        let root = TempRoot::new();
        let mut store = root.store();
        store.utc_offset = chrono::FixedOffset::east_opt(8 * 3600).unwrap();
        // UTC 4月30日 20:00 在东八区已是 5月1日
        let publish = Utc.with_ymd_and_hms(2024, 4, 30, 20, 0, 0).unwrap();
        assert_eq!(
            store.folder_name_for("CS23-2", "HW1", publish),
            "CS23-2-HW1-20240501"
        );
    }

    #[test]
    fn test_check_folder_name() {
        assert!(check_folder_name("CS23-2-HW1-20240501").is_ok());
        assert!(check_folder_name("..").is_err());
        assert!(check_folder_name("a/b").is_err());
        assert!(check_folder_name("").is_err());
    }
}
