pub mod middleware;
pub mod services;

use actix_web::web;

use crate::config::RoutesConfig;
use crate::errors::UrlVaultError;
use crate::services::AppServices;
use services::AppStartTime;
use services::helpers::error_from_vault;

/// 注册全部路由和共享状态
///
/// 服务器与集成测试共用；重定向路由必须最后注册。
pub fn configure(
    cfg: &mut web::ServiceConfig,
    app_services: AppServices,
    routes: RoutesConfig,
    start_time: AppStartTime,
) {
    let sessions = app_services.sessions.clone();

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let vault_err = UrlVaultError::invalid_format(format!("Invalid request body: {}", err));
        let response = error_from_vault(&vault_err);
        actix_web::error::InternalError::from_response(err, response).into()
    });

    cfg.app_data(json_config)
        .app_data(web::Data::new(app_services))
        .app_data(web::Data::new(routes.clone()))
        .app_data(web::Data::new(start_time))
        .service(services::health_routes(&routes.health_prefix))
        .service(services::api_routes(&routes.api_prefix, sessions))
        .service(services::redirect_routes());
}
