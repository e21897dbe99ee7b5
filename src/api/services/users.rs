//! 当前用户接口

use actix_web::{Responder, web};

use super::auth::current_account;
use super::helpers::api_result;
use super::types::{AccountSummary, ChangePasswordRequest, MessageResponse};
use crate::api::middleware::SessionUser;
use crate::errors::UrlVaultError;
use crate::services::AppServices;

pub struct UserApi;

impl UserApi {
    pub async fn me(services: web::Data<AppServices>, user: SessionUser) -> impl Responder {
        api_result(
            current_account(&services, &user)
                .await
                .map(AccountSummary::from),
        )
    }

    pub async fn change_password(
        services: web::Data<AppServices>,
        user: SessionUser,
        body: web::Json<ChangePasswordRequest>,
    ) -> impl Responder {
        let result = async {
            let account = current_account(&services, &user).await?;
            services
                .auth
                .change_password(&account.user_id, &body.new_password)
                .await?;
            Ok::<_, UrlVaultError>(MessageResponse {
                message: "Password updated.".to_string(),
            })
        }
        .await;

        api_result(result)
    }
}
