/*!
 * 速率限制中间件
 *
 * ```rust,ignore
 * web::resource("/homework/{homework_id}")
 *     .wrap(RateLimit::submission_upload())
 *     .route(web::post().to(submit))
 * ```
 *
 * 登录按客户端地址计数；上传和打包下载挂在 RequireJWT 之内，按用户加作业计数，
 * 一个学生对一份作业的反复上传不会占用他对其他作业的额度。
 * 超过限制返回 429。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 计数窗口
const WINDOW_SECS: u64 = 60;

/// 全局计数，键为 `作用域:主体`
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

/// 计数主体
#[derive(Clone, Debug, PartialEq)]
enum Subject {
    /// 未登录的请求，按客户端地址
    ClientAddr,
    /// 已登录用户在某个作业上的请求，值为路径参数名
    UserOnHomework(&'static str),
}

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    scope: &'static str,
    subject: Subject,
}

impl RateLimit {
    /// 登录：每个地址 5 次/分钟
    pub fn login() -> Self {
        Self {
            max_requests: 5,
            scope: "login",
            subject: Subject::ClientAddr,
        }
    }

    /// 上传提交：每个学生每份作业 10 次/分钟
    pub fn submission_upload() -> Self {
        Self {
            max_requests: 10,
            scope: "submit",
            subject: Subject::UserOnHomework("homework_id"),
        }
    }

    /// 打包下载：每个用户每份作业 3 次/分钟
    pub fn bundle_download() -> Self {
        Self {
            max_requests: 3,
            scope: "bundle",
            subject: Subject::UserOnHomework("id"),
        }
    }

    /// 计数键，取不到主体时为 None
    fn key_for(&self, user_id: Option<i64>, client_addr: Option<&str>, homework: Option<&str>) -> Option<String> {
        match self.subject {
            Subject::ClientAddr => Some(format!("{}:{}", self.scope, client_addr.unwrap_or("unknown"))),
            Subject::UserOnHomework(_) => {
                let user_id = user_id?;
                let homework = homework?;
                Some(format!("{}:{}:{}", self.scope, user_id, homework))
            }
        }
    }

    fn request_key(&self, req: &ServiceRequest) -> Option<String> {
        let user_id = req.extensions().get::<User>().map(|user| user.id);
        let client_addr = req
            .connection_info()
            .realip_remote_addr()
            .map(|s| s.to_string());
        let homework = match self.subject {
            Subject::UserOnHomework(param) => req.match_info().get(param),
            Subject::ClientAddr => None,
        };
        self.key_for(user_id, client_addr.as_deref(), homework)
    }
}

/// 计数加一并返回新值
async fn hit(key: String) -> u32 {
    RATE_LIMIT_CACHE
        .entry(key)
        .and_upsert_with(|existing| {
            let next = existing.map(|e| e.into_value().saturating_add(1)).unwrap_or(1);
            ready(next)
        })
        .await
        .into_value()
}

fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    builder.insert_header((CONTENT_TYPE, "application/json; charset=utf-8"));
    if status == StatusCode::TOO_MANY_REQUESTS {
        builder.insert_header(("Retry-After", WINDOW_SECS.to_string()));
    }
    builder.json(ApiResponse::<()>::error_empty(code, message))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            // 用户维度的限制必须在 RequireJWT 之后
            let Some(key) = limit.request_key(&req) else {
                return Ok(req.into_response(
                    error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Unauthenticated",
                    )
                    .map_into_right_body(),
                ));
            };

            let count = hit(key.clone()).await;
            if count > limit.max_requests {
                warn!(
                    "Rate limit exceeded for key: {} (count: {}/{})",
                    key, count, limit.max_requests
                );
                return Ok(req.into_response(
                    error_response(
                        StatusCode::TOO_MANY_REQUESTS,
                        ErrorCode::RateLimitExceeded,
                        "请求过于频繁，请稍后再试",
                    )
                    .map_into_right_body(),
                ));
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}
