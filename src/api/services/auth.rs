//! 注册与登录接口

use actix_web::{Responder, web};
use tracing::info;

use super::helpers::{api_result, created_response, error_from_vault};
use super::types::{AccountSummary, LoginRequest, LoginResponse, SignupRequest};
use crate::api::middleware::SessionUser;
use crate::errors::{ErrorKind, Result, UrlVaultError};
use crate::services::AppServices;
use crate::storage::UserAccount;

pub struct AuthApi;

impl AuthApi {
    pub async fn signup(
        services: web::Data<AppServices>,
        body: web::Json<SignupRequest>,
    ) -> impl Responder {
        let request = body.into_inner();
        match services
            .auth
            .create_account(&request.username, &request.password)
            .await
        {
            Ok(account) => created_response(AccountSummary::from(account)),
            Err(e) => error_from_vault(&e),
        }
    }

    pub async fn login(
        services: web::Data<AppServices>,
        body: web::Json<LoginRequest>,
    ) -> impl Responder {
        let request = body.into_inner();
        let result = async {
            let account = services
                .auth
                .authenticate(&request.username, &request.password)
                .await?;
            let session = services.sessions.issue_session(&account.user_id)?;
            info!("Session issued for {}", account.user_id);
            Ok::<_, UrlVaultError>(LoginResponse {
                access_token: session.access_token,
                token_type: "bearer".to_string(),
                expires_in: session.expires_in,
            })
        }
        .await;

        api_result(result)
    }
}

/// 加载当前会话对应的账户
///
/// 令牌有效但账户已不存在时视为令牌无效。
pub async fn current_account(services: &AppServices, user: &SessionUser) -> Result<UserAccount> {
    services
        .auth
        .get_account(&user.user_id)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::UserNotFound => UrlVaultError::token_invalid("Could not validate credentials"),
            _ => e,
        })
}
