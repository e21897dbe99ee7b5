//! API 路由配置
//!
//! `/auth` 下的注册与登录无需认证，其余路由统一经过 [`SessionAuth`]。

use std::sync::Arc;

use actix_web::web;

use super::admin::AdminApi;
use super::auth::AuthApi;
use super::links::LinkApi;
use super::users::UserApi;
use crate::api::middleware::SessionAuth;
use crate::services::JwtService;

/// 认证路由 `/auth`
///
/// 包含：
/// - POST /auth/signup - 注册
/// - POST /auth/login - 登录并获取访问令牌
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/signup", web::post().to(AuthApi::signup))
        .route("/login", web::post().to(AuthApi::login))
}

/// 管理员路由 `/admin`
pub fn admin_routes() -> actix_web::Scope {
    web::scope("/admin")
        .route("/links", web::get().to(AdminApi::list_all_links))
        .route("/links/{code}", web::delete().to(AdminApi::delete_link))
        .route("/users/{user_id}", web::put().to(AdminApi::update_user))
}

pub fn api_routes(prefix: &str, sessions: Arc<JwtService>) -> actix_web::Scope {
    web::scope(prefix).service(auth_routes()).service(
        web::scope("")
            .wrap(SessionAuth::new(sessions))
            .route("/shorten", web::post().to(LinkApi::shorten))
            .route("/links", web::get().to(LinkApi::list_own))
            .route("/me", web::get().to(UserApi::me))
            .route("/me/password", web::put().to(UserApi::change_password))
            .service(admin_routes()),
    )
}
