use super::SessionAuthority;
use crate::errors::{Result, SessionRejection};
use crate::models::users::entities::User;

/// 依次检查签名、过期、用户、会话随机数、账号状态
pub async fn inspect(
    service: &SessionAuthority,
    token: &str,
) -> Result<std::result::Result<User, SessionRejection>> {
    let claims = match service.jwt.decode_token(token) {
        Ok(claims) => claims,
        Err(_) => return Ok(Err(SessionRejection::InvalidSignature)),
    };

    if claims.exp <= service.clock.now().timestamp() {
        return Ok(Err(SessionRejection::Expired));
    }

    // 每次都读库，不缓存用户
    let Some(user) = service.storage.get_user_by_student_no(&claims.sub).await? else {
        return Ok(Err(SessionRejection::UnknownIdentity));
    };

    if user.session_nonce.as_deref() != Some(claims.sid.as_str()) {
        return Ok(Err(SessionRejection::SessionSuperseded));
    }

    if !user.is_active() {
        return Ok(Err(SessionRejection::IdentityDisabled));
    }

    Ok(Ok(user))
}

pub async fn validate(service: &SessionAuthority, token: &str) -> Result<User> {
    match inspect(service, token).await? {
        Ok(user) => Ok(user),
        Err(rejection) => {
            tracing::info!("Session rejected: {}", rejection);
            Err(rejection.into())
        }
    }
}
