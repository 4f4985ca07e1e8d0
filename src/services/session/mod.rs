//! 会话管理
//!
//! 每个用户只有一个有效会话：签发新凭证时覆盖用户记录上的会话随机数，
//! 之前签发的凭证在下一次校验时即失效。

pub mod issue;
pub mod revoke;
pub mod validate;

use std::sync::Arc;

use crate::errors::{Result, SessionRejection};
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::Clock;
use crate::utils::jwt::JwtUtils;

pub use issue::IssuedCredential;

pub struct SessionAuthority {
    storage: Arc<dyn Storage>,
    jwt: JwtUtils,
    clock: Arc<dyn Clock>,
}

impl SessionAuthority {
    pub fn new(storage: Arc<dyn Storage>, jwt: JwtUtils, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            jwt,
            clock,
        }
    }

    // 签发凭证
    pub async fn issue_credential(&self, user: &User) -> Result<IssuedCredential> {
        issue::issue_credential(self, user).await
    }

    // 学号或邮箱 + 密码登录
    pub async fn login(&self, identifier: &str, password: &str) -> Result<(IssuedCredential, User)> {
        issue::login(self, identifier, password).await
    }

    // 校验凭证，返回具体的拒绝原因
    pub async fn inspect(&self, token: &str) -> Result<std::result::Result<User, SessionRejection>> {
        validate::inspect(self, token).await
    }

    // 校验凭证，对外只有一种认证失败
    pub async fn validate(&self, token: &str) -> Result<User> {
        validate::validate(self, token).await
    }

    // 清除用户的会话
    pub async fn invalidate(&self, user_id: i64) -> Result<()> {
        revoke::invalidate(self, user_id).await
    }

    // 主动退出
    pub async fn logout(&self, user: &User) -> Result<()> {
        revoke::logout(self, user).await
    }

    // 管理员强制下线
    pub async fn force_logout(&self, actor: &User, target_user_id: i64) -> Result<()> {
        revoke::force_logout(self, actor, target_user_id).await
    }
}
