use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use super::{current_user, respond_empty};
use crate::errors::WorkUploadError;
use crate::middlewares;
use crate::models::auth::requests::LoginRequest;
use crate::models::auth::responses::LoginResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::session::SessionAuthority;

pub async fn login(
    session: web::Data<Arc<SessionAuthority>>,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    let LoginRequest {
        identifier,
        password,
    } = user_data.into_inner();

    if identifier.trim().is_empty() || password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "学号/邮箱和密码不能为空",
        )));
    }

    match session.login(&identifier, &password).await {
        Ok((credential, user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            LoginResponse {
                access_token: credential.token,
                expires_in: credential.expires_in,
                user,
            },
            "Login successful",
        ))),
        Err(WorkUploadError::Authentication(message)) => Ok(HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::AuthFailed, message))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn logout(
    req: HttpRequest,
    session: web::Data<Arc<SessionAuthority>>,
) -> ActixResult<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(respond_empty(session.logout(&user).await, "Logout successful"))
}

pub async fn force_logout(
    req: HttpRequest,
    session: web::Data<Arc<SessionAuthority>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let actor = match current_user(&req) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(respond_empty(
        session.force_logout(&actor, path.into_inner()).await,
        "用户已被强制下线",
    ))
}

pub async fn get_user(req: HttpRequest) -> ActixResult<HttpResponse> {
    Ok(match current_user(&req) {
        Ok(user) => HttpResponse::Ok().json(ApiResponse::success(user, "ok")),
        Err(resp) => resp,
    })
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(
                web::resource("/login")
                    .wrap(middlewares::RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/logout", web::post().to(logout))
                    .route("/force-logout/{user_id}", web::post().to(force_logout))
                    .route("/me", web::get().to(get_user)),
            ),
    );
}
