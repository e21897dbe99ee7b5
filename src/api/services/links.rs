//! 短链接创建与查询接口

use actix_web::{Responder, web};

use super::auth::current_account;
use super::helpers::{api_result, created_response, error_from_vault};
use super::types::{ShortenRequest, ShortenResponse};
use crate::api::middleware::SessionUser;
use crate::errors::UrlVaultError;
use crate::services::{AppServices, CreateLinkRequest};

pub struct LinkApi;

impl LinkApi {
    pub async fn shorten(
        services: web::Data<AppServices>,
        user: SessionUser,
        body: web::Json<ShortenRequest>,
    ) -> impl Responder {
        let request = body.into_inner();
        let result = async {
            // 确认账户仍然存在
            let account = current_account(&services, &user).await?;
            services
                .links
                .create_link(
                    &account.user_id,
                    CreateLinkRequest {
                        target_url: request.url,
                        custom_code: request.custom_url,
                        length: request.length,
                    },
                )
                .await
        }
        .await;

        match result {
            Ok(link) => created_response(ShortenResponse::from(link)),
            Err(e) => error_from_vault(&e),
        }
    }

    /// 当前用户的全部短链接
    pub async fn list_own(services: web::Data<AppServices>, user: SessionUser) -> impl Responder {
        let result = async {
            let mapping = services.links.list_for_owner(&user.user_id).await?;
            if mapping.is_empty() {
                return Err(UrlVaultError::empty("You have not shortened any URLs yet."));
            }
            Ok::<_, UrlVaultError>(mapping)
        }
        .await;

        api_result(result)
    }
}
