use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::users::entities::{CourseSet, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::services::files::FileStore;
use crate::services::homeworks::HomeworkService;
use crate::services::session::SessionAuthority;
use crate::services::submissions::SubmissionLedger;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::hash_password;
use crate::utils::{Clock, SystemClock};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub files: Arc<FileStore>,
    pub session: Arc<SessionAuthority>,
    pub ledger: Arc<SubmissionLedger>,
    pub homeworks: Arc<HomeworkService>,
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 初始化默认管理员账号
/// 如果数据库中没有任何用户，则创建一个 admin 账号
async fn seed_admin(storage: &Arc<dyn Storage>, config: &AppConfig) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password, &config.argon2) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        student_no: "admin".to_string(),
        email: "admin@localhost".to_string(),
        password: password_hash,
        real_name: "Administrator".to_string(),
        class_code: String::new(),
        role: UserRole::Admin,
        courses: CourseSet::default(),
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, student_no: {})",
                user.id, user.student_no
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、文件目录和各业务服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 重复安装时返回 Err，忽略即可
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage, config).await;

    let files = Arc::new(FileStore::new(&config.storage)?);
    tokio::fs::create_dir_all(files.root()).await?;
    warn!("File storage rooted at {}", files.root().display());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let session = Arc::new(SessionAuthority::new(
        storage.clone(),
        JwtUtils::new(&config.jwt),
        clock.clone(),
    ));
    let ledger = Arc::new(SubmissionLedger::new(
        storage.clone(),
        files.clone(),
        clock.clone(),
    ));
    let homeworks = Arc::new(HomeworkService::new(
        storage.clone(),
        files.clone(),
        clock,
        &config.reminder,
    ));

    Ok(StartupContext {
        files,
        session,
        ledger,
        homeworks,
    })
}
