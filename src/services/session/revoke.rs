use super::SessionAuthority;
use crate::errors::{Result, WorkUploadError};
use crate::models::users::entities::User;

pub async fn invalidate(service: &SessionAuthority, user_id: i64) -> Result<()> {
    if !service.storage.set_session_nonce(user_id, None).await? {
        return Err(WorkUploadError::not_found("用户不存在"));
    }
    tracing::info!("Session cleared for user {}", user_id);
    Ok(())
}

pub async fn logout(service: &SessionAuthority, user: &User) -> Result<()> {
    invalidate(service, user.id).await
}

pub async fn force_logout(service: &SessionAuthority, actor: &User, target_user_id: i64) -> Result<()> {
    if !actor.is_admin() {
        return Err(WorkUploadError::authorization("只有管理员可以强制下线用户"));
    }

    invalidate(service, target_user_id).await?;
    tracing::warn!("管理员 {} 强制下线了用户 {}", actor.id, target_user_id);
    Ok(())
}
