use serde::Serialize;

use super::SessionAuthority;
use crate::errors::{Result, WorkUploadError};
use crate::models::users::entities::User;
use crate::utils::password::verify_password;

/// 签发结果
#[derive(Debug, Clone, Serialize)]
pub struct IssuedCredential {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    /// 有效期（秒）
    pub expires_in: i64,
}

pub async fn issue_credential(service: &SessionAuthority, user: &User) -> Result<IssuedCredential> {
    let now = service.clock.now();
    let nonce = uuid::Uuid::new_v4().simple().to_string();

    // 先落库再签名，覆盖之前的会话
    if !service
        .storage
        .set_session_nonce(user.id, Some(nonce.clone()))
        .await?
    {
        return Err(WorkUploadError::not_found("用户不存在"));
    }

    let token = service
        .jwt
        .generate_access_token(&user.student_no, &user.role.to_string(), &nonce, now)
        .map_err(|e| WorkUploadError::serialization(format!("生成令牌失败: {e}")))?;

    let expiry = service.jwt.expiry();
    tracing::info!("Issued session for user {} ({})", user.id, user.student_no);

    Ok(IssuedCredential {
        token,
        expires_at: now + expiry,
        expires_in: expiry.num_seconds(),
    })
}

pub async fn login(
    service: &SessionAuthority,
    identifier: &str,
    password: &str,
) -> Result<(IssuedCredential, User)> {
    let user = service
        .storage
        .get_user_by_student_no_or_email(identifier.trim())
        .await?;

    let Some(user) = user.filter(|u| verify_password(password, &u.password_hash)) else {
        tracing::info!("Login failed for identifier {:?}", identifier);
        return Err(WorkUploadError::authentication("学号/邮箱或密码错误"));
    };

    if !user.is_active() {
        tracing::info!("Login rejected for disabled user {}", user.id);
        return Err(WorkUploadError::authentication("学号/邮箱或密码错误"));
    }

    let credential = issue_credential(service, &user).await?;

    if let Err(e) = service.storage.update_last_login(user.id).await {
        tracing::warn!("更新用户 {} 最后登录时间失败: {}", user.id, e);
    }

    tracing::info!("User {} logged in successfully", user.student_no);
    Ok((credential, user))
}
